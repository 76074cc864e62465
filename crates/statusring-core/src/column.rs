//! Column references and host slot assignments.

use serde::{Deserialize, Serialize};

/// Aggregation function the host applies to a measure column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregationFunc {
    /// Sum of values
    Sum,
    /// Arithmetic mean
    Average,
    /// Minimum value
    Min,
    /// Maximum value
    Max,
    /// Row count
    Count,
}

/// Identifies a data column in a host dataset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnRef {
    /// Dataset the column belongs to
    pub dataset_id: String,
    /// Column identifier within the dataset
    pub column_id: String,
    /// Hierarchy level for leveled columns
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u32>,
    /// Aggregation applied when used as a measure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregation_func: Option<AggregationFunc>,
}

impl ColumnRef {
    /// Create an un-aggregated column reference.
    #[must_use]
    pub fn new(dataset_id: impl Into<String>, column_id: impl Into<String>) -> Self {
        Self {
            dataset_id: dataset_id.into(),
            column_id: column_id.into(),
            level: None,
            aggregation_func: None,
        }
    }

    /// Set the aggregation function.
    #[must_use]
    pub const fn aggregated(mut self, func: AggregationFunc) -> Self {
        self.aggregation_func = Some(func);
        self
    }

    /// Strip the aggregation function (row-level measure).
    #[must_use]
    pub fn raw(mut self) -> Self {
        self.aggregation_func = None;
        self
    }

    /// Set the hierarchy level.
    #[must_use]
    pub const fn level(mut self, level: u32) -> Self {
        self.level = Some(level);
        self
    }
}

/// Role a slot plays in the widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotRole {
    /// Grouping attribute or score column
    Category,
    /// Count or value measure (`size` and `measure` are aliases)
    #[serde(alias = "size")]
    Measure,
    /// Numeric rank / color index
    Order,
    /// Column whose name becomes the widget title
    Legend,
    /// Companion identifier column
    Identifier,
    /// Per-category metric averaged into the weighted score
    Score,
}

impl SlotRole {
    /// Map a host slot name to a role. Unknown names are ignored.
    #[must_use]
    pub fn from_slot_name(name: &str) -> Option<Self> {
        match name {
            "category" => Some(Self::Category),
            "size" | "measure" => Some(Self::Measure),
            "order" => Some(Self::Order),
            "legend" => Some(Self::Legend),
            "identifier" => Some(Self::Identifier),
            "score" => Some(Self::Score),
            _ => None,
        }
    }
}

/// A column placed in a slot, with its display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotColumn {
    /// Column reference
    #[serde(flatten)]
    pub column: ColumnRef,
    /// Column display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl From<ColumnRef> for SlotColumn {
    fn from(column: ColumnRef) -> Self {
        Self { column, name: None }
    }
}

/// A named slot and the columns assigned to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    /// Slot name as configured by the host
    pub name: String,
    /// Assigned columns (first one wins)
    #[serde(default)]
    pub content: Vec<SlotColumn>,
}

/// All slot assignments for one widget instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotAssignments {
    slots: Vec<Slot>,
}

impl SlotAssignments {
    /// Create empty assignments.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign a column to a slot name.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, column: impl Into<SlotColumn>) -> Self {
        let name = name.into();
        let column = column.into();
        match self.slots.iter_mut().find(|slot| slot.name == name) {
            Some(slot) => slot.content.push(column),
            None => self.slots.push(Slot {
                name,
                content: vec![column],
            }),
        }
        self
    }

    /// Assign a named column to a slot name.
    #[must_use]
    pub fn with_named(
        self,
        name: impl Into<String>,
        column: ColumnRef,
        display_name: impl Into<String>,
    ) -> Self {
        self.with(
            name,
            SlotColumn {
                column,
                name: Some(display_name.into()),
            },
        )
    }

    /// First column assigned to a role, if any.
    #[must_use]
    pub fn get(&self, role: SlotRole) -> Option<&SlotColumn> {
        self.slots
            .iter()
            .filter(|slot| SlotRole::from_slot_name(&slot.name) == Some(role))
            .find_map(|slot| slot.content.first())
    }

    /// Column reference assigned to a role, if any.
    #[must_use]
    pub fn column(&self, role: SlotRole) -> Option<&ColumnRef> {
        self.get(role).map(|slot| &slot.column)
    }

    /// Whether a role has a column.
    #[must_use]
    pub fn has(&self, role: SlotRole) -> bool {
        self.get(role).is_some()
    }

    /// Slots in configuration order.
    #[must_use]
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Fill roles missing here from `defaults`.
    #[must_use]
    pub fn or_defaults(&self, defaults: &Self) -> Self {
        let mut merged = self.clone();
        for slot in &defaults.slots {
            let role = SlotRole::from_slot_name(&slot.name);
            let missing = role.map_or(true, |role| !self.has(role));
            if missing && !slot.content.is_empty() {
                merged.slots.push(slot.clone());
            }
        }
        merged
    }
}

/// Turn a column name into a title: underscores become spaces and each word
/// is capitalized (`TOTAL_DEVICES` becomes `Total Devices`).
#[must_use]
pub fn format_title(raw: &str) -> String {
    raw.split(|c: char| c == '_' || c.is_whitespace())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}
