//! Totals, weighted scores and the resolved category list.
//!
//! Aggregates are rebuilt from scratch on every data load and every selection
//! change. `overall_total` always covers every category; `total` and the
//! weighted score cover only the working set (the selected category, or all
//! categories when nothing is selected).

use crate::color::{Color, Palette};
use crate::column::ColumnRef;
use crate::policy::{Categorized, Policy};
use crate::resolve::Resolver;
use serde::{Deserialize, Serialize};

/// One resolved category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Category key and display name
    pub name: String,
    /// Record count
    pub count: u64,
    /// Display color
    pub color: Color,
    /// Order value from the order column
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<f64>,
    /// Mean score of the category's records
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_value: Option<f64>,
    /// Column the category came from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_column: Option<ColumnRef>,
    /// Whether this is the selected category
    #[serde(default)]
    pub selected: bool,
}

/// Totals over all categories and over the working set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    /// Count over the working set
    pub total: u64,
    /// Count over every category, regardless of selection
    pub overall_total: u64,
    /// Rounded count-weighted mean score over the working set, 0 when empty
    pub weighted_score: i64,
}

/// Aggregated view of one data load under one selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Aggregate {
    /// Policy that produced the categories
    pub policy: Policy,
    /// Categories in display order
    pub categories: Vec<Category>,
    /// Totals
    pub totals: Totals,
    /// Selected category key
    pub selected: Option<String>,
    /// Whether categories carry scores
    pub has_scores: bool,
    /// Whether this is sample data
    pub sample: bool,
}

impl Aggregate {
    /// Category by key.
    #[must_use]
    pub fn category(&self, key: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == key)
    }

    /// Categories in scope for totals.
    pub fn working_set(&self) -> impl Iterator<Item = &Category> {
        let selected = self.selected.as_deref();
        self.categories
            .iter()
            .filter(move |c| selected.map_or(true, |key| c.name == key))
    }

    /// Share of `key` in the overall total, as a rounded percentage. Never
    /// measured against the selection-scoped total.
    #[must_use]
    pub fn percent_of_total(&self, key: &str) -> Option<i64> {
        self.category(key)
            .map(|c| percent(c.count, self.totals.overall_total))
    }

    /// Category with the highest count; ties go to the earlier one in
    /// display order.
    #[must_use]
    pub fn dominant(&self) -> Option<&Category> {
        self.categories.iter().fold(None, |best: Option<&Category>, c| match best {
            Some(b) if b.count >= c.count => Some(b),
            _ => Some(c),
        })
    }

    /// Whether there is nothing to show.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Rounded weighted score, present when the data carries scores.
    #[must_use]
    pub fn aggregated_score(&self) -> Option<i64> {
        self.has_scores.then_some(self.totals.weighted_score)
    }
}

/// Resolve categories and compute totals for a selection.
#[must_use]
pub fn aggregate(categorized: &Categorized, palette: &Palette, selected: Option<&str>) -> Aggregate {
    let has_order_column = categorized.policy.has_order_column();
    let resolver = Resolver::new(
        palette,
        has_order_column,
        categorized.tallies.iter().map(|t| (t.key.as_str(), t.order)),
    );

    let mut categories: Vec<Category> = categorized
        .tallies
        .iter()
        .map(|tally| Category {
            name: tally.key.clone(),
            count: tally.count,
            color: resolver.color(&tally.key),
            order: resolver.order(&tally.key),
            average_value: tally.average(),
            source_column: tally.source.clone(),
            selected: selected == Some(tally.key.as_str()),
        })
        .collect();
    categories.sort_by(|a, b| resolver.compare(&a.name, &b.name));

    // Computed once over everything, before the selection narrows anything.
    let overall_total = categories.iter().map(|c| c.count).sum();

    let mut aggregate = Aggregate {
        policy: categorized.policy,
        categories,
        totals: Totals {
            total: 0,
            overall_total,
            weighted_score: 0,
        },
        selected: selected.map(str::to_string),
        has_scores: categorized.has_scores,
        sample: categorized.sample,
    };
    let total = aggregate.working_set().map(|c| c.count).sum();
    let score = weighted_score(aggregate.working_set());
    aggregate.totals.total = total;
    aggregate.totals.weighted_score = score;

    tracing::trace!(
        categories = aggregate.categories.len(),
        total = aggregate.totals.total,
        overall_total,
        weighted_score = aggregate.totals.weighted_score,
        selected = ?aggregate.selected,
        "aggregated"
    );
    aggregate
}

/// Count-weighted mean of category averages. `None` when no category with a
/// score has a positive count.
pub fn weighted_mean<'a>(categories: impl IntoIterator<Item = &'a Category>) -> Option<f64> {
    let (sum, weight) = categories
        .into_iter()
        .filter_map(|c| c.average_value.map(|avg| (c.count as f64, avg)))
        .fold((0.0, 0.0), |(sum, weight), (count, avg)| {
            (count.mul_add(avg, sum), weight + count)
        });
    (weight > 0.0).then(|| sum / weight)
}

/// Rounded weighted mean, 0 for an empty working set.
pub fn weighted_score<'a>(categories: impl IntoIterator<Item = &'a Category>) -> i64 {
    weighted_mean(categories).map_or(0, |mean| mean.round() as i64)
}

/// `part` as a rounded percentage of `whole`, 0 when `whole` is 0.
#[must_use]
pub fn percent(part: u64, whole: u64) -> i64 {
    if whole == 0 {
        return 0;
    }
    (part as f64 / whole as f64 * 100.0).round() as i64
}
