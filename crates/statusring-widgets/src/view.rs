//! Render-ready view state handed to presenters.

use crate::geometry::{layout_slices, Size, Slice};
use serde::{Deserialize, Serialize};
use statusring_core::{Aggregate, Color, ThemeContext};

/// Guidance shown when nothing can be drawn.
pub const EMPTY_STATE_MESSAGE: &str =
    "No data to display. Assign a category column and a measure column to this widget.";

/// One legend row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegendEntry {
    /// Category name
    pub name: String,
    /// Record count
    pub count: u64,
    /// Rounded share of the overall total
    pub percent: i64,
    /// Swatch color
    pub color: Color,
    /// Whether this row is the selected category
    pub selected: bool,
}

/// Everything a presenter needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    /// Widget title
    pub title: String,
    /// Aggregated categories and totals
    pub aggregate: Aggregate,
    /// Theme for this frame
    pub theme: ThemeContext,
    /// Widget size
    pub size: Size,
    /// Donut slices for the working set
    pub slices: Vec<Slice>,
    /// Legend rows for every category
    pub legend: Vec<LegendEntry>,
}

impl ViewState {
    /// Build the view for an aggregate.
    #[must_use]
    pub fn new(title: String, aggregate: Aggregate, theme: ThemeContext, size: Size) -> Self {
        let slices = layout_slices(aggregate.working_set());
        let legend = aggregate
            .categories
            .iter()
            .map(|c| LegendEntry {
                name: c.name.clone(),
                count: c.count,
                percent: aggregate.percent_of_total(&c.name).unwrap_or(0),
                color: c.color,
                selected: c.selected,
            })
            .collect();
        Self {
            title,
            aggregate,
            theme,
            size,
            slices,
            legend,
        }
    }

    /// Whether the empty state should be drawn.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.aggregate.is_empty()
    }

    /// Center label: the weighted score when the data carries scores,
    /// otherwise the working-set total.
    #[must_use]
    pub fn center_value(&self) -> i64 {
        self.aggregate
            .aggregated_score()
            .unwrap_or_else(|| i64::try_from(self.aggregate.totals.total).unwrap_or(i64::MAX))
    }

    /// Category under `angle`, for hit-testing clicks on the ring.
    #[must_use]
    pub fn slice_at(&self, angle: f64) -> Option<&str> {
        self.slices
            .iter()
            .find(|s| s.contains(angle))
            .map(|s| s.key.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use statusring_core::{aggregate, Categorized, Palette, Policy};
    use std::f64::consts::PI;

    fn view(selected: Option<&str>) -> ViewState {
        let categorized = Categorized::sample(Policy::Attribute);
        let agg = aggregate(&categorized, &Palette::default(), selected);
        ViewState::new("Status".into(), agg, ThemeContext::default(), Size::new(300.0, 300.0))
    }

    #[test]
    fn test_legend_covers_all_categories() {
        let v = view(None);
        assert_eq!(v.legend.len(), 3);
        assert_eq!(v.legend[0].name, "Healthy");
        assert_eq!(v.legend[0].percent, 50);
        assert!(!v.is_empty());
    }

    #[test]
    fn test_selected_view_keeps_overall_percent() {
        let v = view(Some("Healthy"));
        assert_eq!(v.slices.len(), 1);
        assert_eq!(v.legend[0].percent, 50);
        assert!(v.legend[0].selected);
        assert!(!v.legend[1].selected);
    }

    #[test]
    fn test_slice_at_hits_first_half() {
        let v = view(None);
        assert_eq!(v.slice_at(0.1), Some("Healthy"));
        assert_eq!(v.slice_at(PI + 0.1), Some("Warning"));
    }

    #[test]
    fn test_center_value_prefers_score() {
        let v = view(None);
        assert_eq!(v.center_value(), v.aggregate.totals.weighted_score);
    }
}
