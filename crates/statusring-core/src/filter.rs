//! Host filter expressions and notification events.

use crate::aggregate::Aggregate;
use crate::column::ColumnRef;
use crate::policy::{Band, Policy};
use crate::state::Selection;
use serde::{Deserialize, Serialize};

/// Origin tag the host expects on widget-issued filters.
pub const FILTER_ORIGIN: &str = "filterFromVizItem";

/// Comparison operator, serialized as the host's expression template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    /// `? = ?`
    #[serde(rename = "? = ?")]
    Equals,
    /// `? >= ?`
    #[serde(rename = "? >= ?")]
    AtLeast,
    /// `? <= ?`
    #[serde(rename = "? <= ?")]
    AtMost,
    /// `? between ?`
    #[serde(rename = "? between ?")]
    Between,
}

/// Column parameter in the host's snake_case shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterColumn {
    /// Column identifier
    pub column_id: String,
    /// Dataset identifier
    pub dataset_id: String,
}

impl From<&ColumnRef> for FilterColumn {
    fn from(column: &ColumnRef) -> Self {
        Self {
            column_id: column.column_id.clone(),
            dataset_id: column.dataset_id.clone(),
        }
    }
}

/// Value parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// Numeric bound
    Number(f64),
    /// Attribute value
    Text(String),
    /// Inclusive `[low, high]` range
    Range([f64; 2]),
}

/// A filter parameter: the column, then the value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterParam {
    /// Column being filtered
    Column(FilterColumn),
    /// Comparison value
    Value(FilterValue),
}

/// Fixed filter properties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterProperties {
    /// Always [`FILTER_ORIGIN`]
    pub origin: String,
    /// Always `"where"`
    #[serde(rename = "type")]
    pub kind: String,
}

impl Default for FilterProperties {
    fn default() -> Self {
        Self {
            origin: FILTER_ORIGIN.to_string(),
            kind: "where".to_string(),
        }
    }
}

/// One host filter expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterExpression {
    /// Expression template
    pub expression: Operator,
    /// `[column, value]`
    pub parameters: Vec<FilterParam>,
    /// Origin and kind
    pub properties: FilterProperties,
}

impl FilterExpression {
    /// Build `column <op> value`.
    #[must_use]
    pub fn new(operator: Operator, column: &ColumnRef, value: FilterValue) -> Self {
        Self {
            expression: operator,
            parameters: vec![
                FilterParam::Column(column.into()),
                FilterParam::Value(value),
            ],
            properties: FilterProperties::default(),
        }
    }
}

/// Filters selecting one category. Score bands translate to bound
/// comparisons; Warning is a single `between` over `[51, 80]`.
#[must_use]
pub fn category_to_filter(policy: Policy, column: &ColumnRef, key: &str) -> Vec<FilterExpression> {
    match policy {
        Policy::Range => match Band::from_name(key) {
            Some(Band::Healthy) => vec![FilterExpression::new(
                Operator::AtLeast,
                column,
                FilterValue::Number(Band::HEALTHY_MIN),
            )],
            Some(Band::Warning) => vec![FilterExpression::new(
                Operator::Between,
                column,
                FilterValue::Range([Band::WARNING_MIN, Band::WARNING_MAX]),
            )],
            Some(Band::Error) => vec![FilterExpression::new(
                Operator::AtMost,
                column,
                FilterValue::Number(Band::ERROR_MAX),
            )],
            None => Vec::new(),
        },
        Policy::Attribute | Policy::ExplicitOrder => vec![FilterExpression::new(
            Operator::Equals,
            column,
            FilterValue::Text(key.to_string()),
        )],
    }
}

/// Filters for a selection state. Unselected clears all filters, as does a
/// selection on data with no source column (sample data).
#[must_use]
pub fn selection_to_filters(
    selection: &Selection,
    policy: Policy,
    column: Option<&ColumnRef>,
) -> Vec<FilterExpression> {
    match (selection.key(), column) {
        (Some(key), Some(column)) => category_to_filter(policy, column, key),
        _ => Vec::new(),
    }
}

/// Event type sent when a category becomes selected.
pub const EVENT_CATEGORY_SELECTED: &str = "categorySelected";
/// Event type sent when the selection is cleared.
pub const EVENT_SELECTION_CLEARED: &str = "selectionCleared";
/// Category reported when nothing is selected.
pub const ALL_CATEGORIES: &str = "All";

/// Notification payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomEventPayload {
    /// Event name
    pub event_type: String,
    /// Selected category, or `"All"`
    pub category: String,
    /// Count of the selected category, or the overall total
    pub count: u64,
    /// Overall record count
    pub total_records: u64,
    /// Weighted score over the working set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregated_score: Option<i64>,
    /// Whether a filter is active
    pub is_filtered: bool,
}

/// Notification describing `aggregate`, which must already reflect the new
/// selection.
#[must_use]
pub fn selection_to_event(aggregate: &Aggregate) -> CustomEventPayload {
    let overall = aggregate.totals.overall_total;
    match aggregate.selected.as_deref() {
        Some(key) => CustomEventPayload {
            event_type: EVENT_CATEGORY_SELECTED.to_string(),
            category: key.to_string(),
            count: aggregate.category(key).map_or(0, |c| c.count),
            total_records: overall,
            aggregated_score: aggregate.aggregated_score(),
            is_filtered: true,
        },
        None => CustomEventPayload {
            event_type: EVENT_SELECTION_CLEARED.to_string(),
            category: ALL_CATEGORIES.to_string(),
            count: overall,
            total_records: overall,
            aggregated_score: aggregate.aggregated_score(),
            is_filtered: false,
        },
    }
}

/// Outbound message to the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum HostMessage {
    /// Replace the widget's filters
    #[serde(rename = "setFilter")]
    SetFilter {
        /// New filter list; empty clears
        filters: Vec<FilterExpression>,
    },
    /// Selection notification
    #[serde(rename = "customEvent")]
    CustomEvent {
        /// Event payload
        data: CustomEventPayload,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Palette;
    use crate::policy::Categorized;
    use serde_json::json;

    fn score() -> ColumnRef {
        ColumnRef::new("ds", "score")
    }

    #[test]
    fn test_healthy_filter_wire_shape() {
        let filters = category_to_filter(Policy::Range, &score(), "Healthy");
        assert_eq!(
            serde_json::to_value(&filters).unwrap(),
            json!([{
                "expression": "? >= ?",
                "parameters": [{"column_id": "score", "dataset_id": "ds"}, 81.0],
                "properties": {"origin": "filterFromVizItem", "type": "where"}
            }])
        );
    }

    #[test]
    fn test_warning_filter_is_between() {
        let filters = category_to_filter(Policy::Range, &score(), "Warning");
        assert_eq!(filters.len(), 1);
        let json = serde_json::to_value(&filters[0]).unwrap();
        assert_eq!(json["expression"], "? between ?");
        assert_eq!(json["parameters"][1], json!([51.0, 80.0]));
    }

    #[test]
    fn test_error_filter_upper_bound() {
        let filters = category_to_filter(Policy::Range, &score(), "Error");
        assert_eq!(filters[0].expression, Operator::AtMost);
        assert_eq!(
            filters[0].parameters[1],
            FilterParam::Value(FilterValue::Number(50.0))
        );
    }

    #[test]
    fn test_attribute_filter_equality() {
        let column = ColumnRef::new("ds", "status");
        let filters = category_to_filter(Policy::ExplicitOrder, &column, "Offline");
        let json = serde_json::to_value(&filters).unwrap();
        assert_eq!(json[0]["expression"], "? = ?");
        assert_eq!(json[0]["parameters"][1], "Offline");
    }

    #[test]
    fn test_unselected_clears_filters() {
        let filters = selection_to_filters(&Selection::Unselected, Policy::Range, Some(&score()));
        assert!(filters.is_empty());
        let filters =
            selection_to_filters(&Selection::Selected("Healthy".into()), Policy::Range, None);
        assert!(filters.is_empty());
    }

    #[test]
    fn test_event_payloads() {
        let categorized = Categorized::sample(Policy::Range);
        let palette = Palette::default();
        let selected = crate::aggregate::aggregate(&categorized, &palette, Some("Warning"));
        let event = selection_to_event(&selected);
        assert_eq!(event.event_type, "categorySelected");
        assert_eq!(event.count, 4);
        assert_eq!(event.total_records, 12);
        assert_eq!(event.aggregated_score, Some(65));
        assert!(event.is_filtered);

        let cleared = crate::aggregate::aggregate(&categorized, &palette, None);
        let event = selection_to_event(&cleared);
        assert_eq!(event.category, "All");
        assert_eq!(event.count, 12);
        assert!(!event.is_filtered);
    }

    #[test]
    fn test_host_message_wire_shape() {
        let msg = HostMessage::SetFilter { filters: Vec::new() };
        assert_eq!(
            serde_json::to_value(&msg).unwrap(),
            json!({"type": "setFilter", "filters": []})
        );
        let msg = HostMessage::CustomEvent {
            data: CustomEventPayload {
                event_type: EVENT_SELECTION_CLEARED.into(),
                category: ALL_CATEGORIES.into(),
                count: 3,
                total_records: 3,
                aggregated_score: None,
                is_filtered: false,
            },
        };
        assert_eq!(
            serde_json::to_value(&msg).unwrap(),
            json!({"type": "customEvent", "data": {
                "eventType": "selectionCleared",
                "category": "All",
                "count": 3,
                "totalRecords": 3,
                "isFiltered": false
            }})
        );
    }
}
