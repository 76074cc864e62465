//! Query descriptors and positional row layout.
//!
//! The host fetches exactly what [`QueryPlan::query`] declares and returns rows
//! with dimensions first, then measures, each in declaration order. The same
//! plan records where every role lands in a row, so row access always agrees
//! with the declared query.

use crate::column::{AggregationFunc, ColumnRef, SlotAssignments, SlotRole};
use crate::policy::{CategorizeBy, Policy};
use serde::{Deserialize, Serialize};

/// Declarative fetch request sent to the host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    /// GROUP-BY columns
    pub dimensions: Vec<ColumnRef>,
    /// Value columns
    pub measures: Vec<ColumnRef>,
}

impl Query {
    /// The empty query, requesting nothing.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether nothing is requested.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dimensions.is_empty() && self.measures.is_empty()
    }

    /// Number of cells each returned row carries.
    #[must_use]
    pub fn width(&self) -> usize {
        self.dimensions.len() + self.measures.len()
    }
}

/// How the host delivers rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DataShape {
    /// One row per category group, counts already aggregated
    PreAggregated,
    /// One row per record
    RowLevel,
}

/// Row index of each role.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowLayout {
    /// Category attribute (Attribute / Explicit-order)
    pub category: Option<usize>,
    /// Order rank
    pub order: Option<usize>,
    /// Companion identifier
    pub identifier: Option<usize>,
    /// Pre-aggregated count
    pub count: Option<usize>,
    /// Score (bucketed for Range, averaged otherwise)
    pub score: Option<usize>,
}

/// Everything derived from one slot configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryPlan {
    /// Active categorization policy
    pub policy: Policy,
    /// Row delivery shape
    pub shape: DataShape,
    /// What to fetch
    pub query: Query,
    /// Where each role sits in a row
    pub layout: RowLayout,
    /// Column a selection filter applies to
    pub filter_column: Option<ColumnRef>,
}

impl QueryPlan {
    /// Resolve slots into a plan. Missing required slots yield an empty query.
    #[must_use]
    pub fn build(by: CategorizeBy, slots: &SlotAssignments) -> Self {
        let policy = Policy::select(by, slots);
        let plan = match policy {
            Policy::Range => Self::range(slots),
            Policy::Attribute | Policy::ExplicitOrder => Self::attribute(policy, slots),
        };
        let plan = plan.unwrap_or_else(|| Self::unwired(policy));
        tracing::debug!(
            ?policy,
            shape = ?plan.shape,
            dimensions = plan.query.dimensions.len(),
            measures = plan.query.measures.len(),
            "built query plan"
        );
        plan
    }

    /// Plan for a widget whose required slots are not filled.
    #[must_use]
    pub fn unwired(policy: Policy) -> Self {
        Self {
            policy,
            shape: match policy {
                Policy::Range => DataShape::RowLevel,
                Policy::Attribute | Policy::ExplicitOrder => DataShape::PreAggregated,
            },
            query: Query::empty(),
            layout: RowLayout::default(),
            filter_column: None,
        }
    }

    /// Whether the plan requests any data.
    #[must_use]
    pub fn is_wired(&self) -> bool {
        !self.query.is_empty()
    }

    // Identifier goes in as a dimension only to keep the host from collapsing
    // every record into a single aggregated row.
    fn range(slots: &SlotAssignments) -> Option<Self> {
        let score = slots
            .column(SlotRole::Category)
            .or_else(|| slots.column(SlotRole::Measure))?
            .clone()
            .raw();
        let mut builder = LayoutBuilder::default();
        let identifier = slots
            .column(SlotRole::Identifier)
            .map(|column| builder.dimension(column.clone()));
        let score_index = builder.measure(score.clone());
        let (query, offset) = builder.finish();
        Some(Self {
            policy: Policy::Range,
            shape: DataShape::RowLevel,
            query,
            layout: RowLayout {
                identifier,
                score: Some(offset + score_index),
                ..RowLayout::default()
            },
            filter_column: Some(score),
        })
    }

    fn attribute(policy: Policy, slots: &SlotAssignments) -> Option<Self> {
        let category = slots.column(SlotRole::Category)?.clone().raw();
        let measure = slots.column(SlotRole::Measure);
        let identifier = slots.column(SlotRole::Identifier);
        if measure.is_none() && identifier.is_none() {
            return None;
        }

        let mut builder = LayoutBuilder::default();
        let category_index = builder.dimension(category.clone());
        let order = if policy == Policy::ExplicitOrder {
            slots
                .column(SlotRole::Order)
                .map(|column| builder.dimension(column.clone().raw()))
        } else {
            None
        };

        let (shape, layout) = if let Some(measure) = measure {
            let count = builder.measure(measure.clone());
            let score = slots.column(SlotRole::Score).map(|column| {
                let func = column.aggregation_func.unwrap_or(AggregationFunc::Average);
                builder.measure(column.clone().aggregated(func))
            });
            (
                DataShape::PreAggregated,
                PartialLayout {
                    count: Some(count),
                    score,
                    identifier: None,
                },
            )
        } else {
            let identifier = identifier.map(|column| builder.dimension(column.clone().raw()));
            let score = slots
                .column(SlotRole::Score)
                .map(|column| builder.measure(column.clone().raw()));
            (
                DataShape::RowLevel,
                PartialLayout {
                    count: None,
                    score,
                    identifier,
                },
            )
        };

        let (query, offset) = builder.finish();
        Some(Self {
            policy,
            shape,
            query,
            layout: RowLayout {
                category: Some(category_index),
                order,
                identifier: layout.identifier,
                count: layout.count.map(|i| offset + i),
                score: layout.score.map(|i| offset + i),
            },
            filter_column: Some(category),
        })
    }
}

/// Pure query builder entry point called by the host before fetching.
#[must_use]
pub fn build_query(by: CategorizeBy, slots: &SlotAssignments) -> Query {
    QueryPlan::build(by, slots).query
}

struct PartialLayout {
    count: Option<usize>,
    score: Option<usize>,
    identifier: Option<usize>,
}

// Measure indices are relative until `finish` reports the dimension count.
#[derive(Default)]
struct LayoutBuilder {
    dimensions: Vec<ColumnRef>,
    measures: Vec<ColumnRef>,
}

impl LayoutBuilder {
    fn dimension(&mut self, column: ColumnRef) -> usize {
        self.dimensions.push(column);
        self.dimensions.len() - 1
    }

    fn measure(&mut self, column: ColumnRef) -> usize {
        self.measures.push(column);
        self.measures.len() - 1
    }

    fn finish(self) -> (Query, usize) {
        let offset = self.dimensions.len();
        (
            Query {
                dimensions: self.dimensions,
                measures: self.measures,
            },
            offset,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn col(id: &str) -> ColumnRef {
        ColumnRef::new("ds", id)
    }

    #[test]
    fn test_range_declares_raw_score_measure() {
        let slots = SlotAssignments::new().with("category", col("score").aggregated(AggregationFunc::Average));
        let plan = QueryPlan::build(CategorizeBy::ScoreBands, &slots);
        assert_eq!(plan.policy, Policy::Range);
        assert!(plan.query.dimensions.is_empty());
        assert_eq!(plan.query.measures, vec![col("score")]);
        assert_eq!(plan.layout.score, Some(0));
    }

    #[test]
    fn test_range_identifier_prevents_aggregation() {
        let slots = SlotAssignments::new()
            .with("measure", col("score"))
            .with("identifier", col("device_id"));
        let plan = QueryPlan::build(CategorizeBy::ScoreBands, &slots);
        assert_eq!(plan.query.dimensions, vec![col("device_id")]);
        assert_eq!(plan.layout.identifier, Some(0));
        assert_eq!(plan.layout.score, Some(1));
        assert_eq!(plan.filter_column, Some(col("score")));
    }

    #[test]
    fn test_attribute_groups_and_carries_aggregation() {
        let slots = SlotAssignments::new()
            .with("category", col("status"))
            .with("size", col("devices").aggregated(AggregationFunc::Sum));
        let plan = QueryPlan::build(CategorizeBy::Attribute, &slots);
        assert_eq!(plan.policy, Policy::Attribute);
        assert_eq!(plan.shape, DataShape::PreAggregated);
        assert_eq!(plan.query.dimensions, vec![col("status")]);
        assert_eq!(
            plan.query.measures,
            vec![col("devices").aggregated(AggregationFunc::Sum)]
        );
        assert_eq!(plan.layout.category, Some(0));
        assert_eq!(plan.layout.count, Some(1));
    }

    #[test]
    fn test_explicit_order_layout_matches_row_shape() {
        // rows look like ["Healthy", 0, 500, 87.5]
        let slots = SlotAssignments::new()
            .with("category", col("status"))
            .with("order", col("rank"))
            .with("size", col("devices").aggregated(AggregationFunc::Count))
            .with("score", col("health"));
        let plan = QueryPlan::build(CategorizeBy::Attribute, &slots);
        assert_eq!(plan.policy, Policy::ExplicitOrder);
        assert_eq!(plan.query.dimensions, vec![col("status"), col("rank")]);
        assert_eq!(
            plan.query.measures[1],
            col("health").aggregated(AggregationFunc::Average)
        );
        assert_eq!(
            plan.layout,
            RowLayout {
                category: Some(0),
                order: Some(1),
                identifier: None,
                count: Some(2),
                score: Some(3),
            }
        );
    }

    #[test]
    fn test_attribute_row_level_with_identifier() {
        let slots = SlotAssignments::new()
            .with("category", col("status"))
            .with("identifier", col("device_id"))
            .with("score", col("health"));
        let plan = QueryPlan::build(CategorizeBy::Attribute, &slots);
        assert_eq!(plan.shape, DataShape::RowLevel);
        assert_eq!(plan.query.dimensions, vec![col("status"), col("device_id")]);
        assert_eq!(plan.query.measures, vec![col("health")]);
        assert_eq!(plan.layout.identifier, Some(1));
        assert_eq!(plan.layout.score, Some(2));
        assert_eq!(plan.layout.count, None);
    }

    #[test]
    fn test_missing_slots_give_empty_query() {
        let slots = SlotAssignments::new().with("category", col("status"));
        assert!(build_query(CategorizeBy::Attribute, &slots).is_empty());
        assert!(build_query(CategorizeBy::ScoreBands, &SlotAssignments::new()).is_empty());
        assert!(!QueryPlan::build(CategorizeBy::Attribute, &slots).is_wired());
    }

    #[test]
    fn test_query_serializes_to_host_shape() {
        let slots = SlotAssignments::new()
            .with("category", col("status"))
            .with("size", col("n").aggregated(AggregationFunc::Count));
        let json = serde_json::to_value(build_query(CategorizeBy::Attribute, &slots)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "dimensions": [{"datasetId": "ds", "columnId": "status"}],
                "measures": [{"datasetId": "ds", "columnId": "n", "aggregationFunc": "count"}]
            })
        );
    }
}
