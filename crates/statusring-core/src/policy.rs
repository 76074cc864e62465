//! Categorization policies.
//!
//! A policy is chosen once per render from the widget's categorization mode
//! and the filled slots, then drives row categorization, sample data, filter
//! construction and query building.

use crate::cell::{display_name, extract, try_number, Row};
use crate::column::{ColumnRef, SlotAssignments, SlotRole};
use crate::query::{DataShape, QueryPlan};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// How a widget is configured to categorize its data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategorizeBy {
    /// Bucket a numeric score into fixed bands
    ScoreBands,
    /// Use the category column's value directly
    #[default]
    Attribute,
}

/// Active categorization policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Policy {
    /// Score bands: Healthy / Warning / Error
    Range,
    /// Category is the attribute value
    Attribute,
    /// Attribute plus an order column for rank and color index
    ExplicitOrder,
}

impl Policy {
    /// Pick the policy for a configuration. An order slot upgrades the
    /// attribute policy to explicit ordering.
    #[must_use]
    pub fn select(by: CategorizeBy, slots: &SlotAssignments) -> Self {
        match by {
            CategorizeBy::ScoreBands => Self::Range,
            CategorizeBy::Attribute if slots.has(SlotRole::Order) => Self::ExplicitOrder,
            CategorizeBy::Attribute => Self::Attribute,
        }
    }

    /// Whether categories carry an order value.
    #[must_use]
    pub const fn has_order_column(self) -> bool {
        matches!(self, Self::ExplicitOrder)
    }

    /// Fixed sample dataset shown when no data is wired up.
    #[must_use]
    pub fn sample(self) -> Vec<Tally> {
        match self {
            Self::Range => vec![
                Tally::sample(Band::Healthy.name(), 6, 87.0, None),
                Tally::sample(Band::Warning.name(), 4, 65.0, None),
                Tally::sample(Band::Error.name(), 2, 35.0, None),
            ],
            Self::Attribute => vec![
                Tally::sample(Band::Healthy.name(), 500, 87.5, None),
                Tally::sample(Band::Warning.name(), 300, 65.2, None),
                Tally::sample(Band::Error.name(), 200, 35.8, None),
            ],
            Self::ExplicitOrder => vec![
                Tally::sample(Band::Healthy.name(), 500, 87.5, Some(0.0)),
                Tally::sample(Band::Warning.name(), 300, 65.2, Some(1.0)),
                Tally::sample(Band::Error.name(), 200, 35.8, Some(2.0)),
            ],
        }
    }
}

/// Fixed score band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Band {
    /// score >= 81
    Healthy,
    /// 51 <= score <= 80
    Warning,
    /// score <= 50
    Error,
}

impl Band {
    /// All bands in display order.
    pub const ALL: [Self; 3] = [Self::Healthy, Self::Warning, Self::Error];

    /// Lowest score in the Healthy band.
    pub const HEALTHY_MIN: f64 = 81.0;
    /// Lowest score in the Warning band.
    pub const WARNING_MIN: f64 = 51.0;
    /// Highest score in the Warning band.
    pub const WARNING_MAX: f64 = 80.0;
    /// Highest score in the Error band.
    pub const ERROR_MAX: f64 = 50.0;

    /// Band containing `score`. Every real score falls in exactly one band.
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score >= Self::HEALTHY_MIN {
            Self::Healthy
        } else if score >= Self::WARNING_MIN {
            Self::Warning
        } else {
            Self::Error
        }
    }

    /// Category name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Healthy => "Healthy",
            Self::Warning => "Warning",
            Self::Error => "Error",
        }
    }

    /// Band with the given category name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|band| band.name() == name)
    }
}

/// Raw per-category accumulation before totals and colors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tally {
    /// Category key
    pub key: String,
    /// Record count
    pub count: u64,
    /// Sum of score × weight
    pub score_sum: f64,
    /// Weight behind `score_sum` (zero when no score was seen)
    pub score_weight: f64,
    /// Order value, when the order column supplied a numeric one
    pub order: Option<f64>,
    /// Column the category came from
    pub source: Option<ColumnRef>,
}

impl Tally {
    fn new(key: String, source: Option<ColumnRef>) -> Self {
        Self {
            key,
            count: 0,
            score_sum: 0.0,
            score_weight: 0.0,
            order: None,
            source,
        }
    }

    fn sample(key: &str, count: u64, average: f64, order: Option<f64>) -> Self {
        Self {
            key: key.to_string(),
            count,
            score_sum: average * count as f64,
            score_weight: count as f64,
            order,
            source: None,
        }
    }

    /// Mean score, if any score contributed.
    #[must_use]
    pub fn average(&self) -> Option<f64> {
        (self.score_weight > 0.0).then(|| self.score_sum / self.score_weight)
    }

    fn add_score(&mut self, score: f64, weight: f64) {
        self.score_sum += score * weight;
        self.score_weight += weight;
    }
}

/// Result of categorizing one batch of rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Categorized {
    /// Policy that produced the tallies
    pub policy: Policy,
    /// Tallies in first-seen order
    pub tallies: Vec<Tally>,
    /// Whether a score column contributed averages
    pub has_scores: bool,
    /// Whether the tallies are the policy's sample dataset
    pub sample: bool,
}

impl Categorized {
    /// Sample dataset for `policy`.
    #[must_use]
    pub fn sample(policy: Policy) -> Self {
        Self {
            policy,
            tallies: policy.sample(),
            has_scores: true,
            sample: true,
        }
    }
}

/// Categorize rows according to the plan.
///
/// Without rows or without a wired plan the policy's sample dataset is used
/// when `fallback` is set, and nothing otherwise.
#[must_use]
pub fn categorize(rows: &[Row], plan: &QueryPlan, language: &str, fallback: bool) -> Categorized {
    if rows.is_empty() || !plan.is_wired() {
        if fallback {
            tracing::debug!(policy = ?plan.policy, rows = rows.len(), "using sample dataset");
            return Categorized::sample(plan.policy);
        }
        return Categorized {
            policy: plan.policy,
            tallies: Vec::new(),
            has_scores: false,
            sample: false,
        };
    }

    let mut acc = Accumulator::new(plan);
    match (plan.policy, plan.shape) {
        (Policy::Range, _) => {
            for band in Band::ALL {
                acc.entry(band.name());
            }
            for row in rows {
                let score = extract::<f64>(cell(row, plan.layout.score));
                let tally = acc.entry(Band::from_score(score).name());
                tally.count += 1;
                tally.add_score(score, 1.0);
            }
        }
        (_, DataShape::PreAggregated) => {
            for row in rows {
                let key = display_name(cell(row, plan.layout.category), language);
                let count = extract::<f64>(cell(row, plan.layout.count)).round().max(0.0) as u64;
                let score = plan
                    .layout
                    .score
                    .and_then(|i| row.get(i))
                    .and_then(try_number);
                let order = acc.order_value(row);
                let tally = acc.entry(&key);
                tally.count += count;
                if let Some(score) = score {
                    tally.add_score(score, count as f64);
                }
                if tally.order.is_none() {
                    tally.order = order;
                }
            }
        }
        (_, DataShape::RowLevel) => {
            let mut seen: HashMap<String, HashSet<String>> = HashMap::new();
            for row in rows {
                let key = display_name(cell(row, plan.layout.category), language);
                let fresh = match plan.layout.identifier {
                    Some(i) => seen
                        .entry(key.clone())
                        .or_default()
                        .insert(extract::<String>(row.get(i))),
                    None => true,
                };
                let score = plan
                    .layout
                    .score
                    .and_then(|i| row.get(i))
                    .and_then(try_number);
                let order = acc.order_value(row);
                let tally = acc.entry(&key);
                if fresh {
                    tally.count += 1;
                }
                if let Some(score) = score {
                    tally.add_score(score, 1.0);
                }
                if tally.order.is_none() {
                    tally.order = order;
                }
            }
        }
    }

    let has_scores = plan.layout.score.is_some();
    Categorized {
        policy: plan.policy,
        tallies: acc.finish(),
        has_scores,
        sample: false,
    }
}

fn cell(row: &Row, index: Option<usize>) -> Option<&crate::cell::Cell> {
    index.and_then(|i| row.get(i))
}

struct Accumulator<'a> {
    plan: &'a QueryPlan,
    index: HashMap<String, usize>,
    tallies: Vec<Tally>,
}

impl<'a> Accumulator<'a> {
    fn new(plan: &'a QueryPlan) -> Self {
        Self {
            plan,
            index: HashMap::new(),
            tallies: Vec::new(),
        }
    }

    fn entry(&mut self, key: &str) -> &mut Tally {
        let position = match self.index.get(key) {
            Some(&i) => i,
            None => {
                self.tallies
                    .push(Tally::new(key.to_string(), self.plan.filter_column.clone()));
                self.index.insert(key.to_string(), self.tallies.len() - 1);
                self.tallies.len() - 1
            }
        };
        &mut self.tallies[position]
    }

    fn order_value(&self, row: &Row) -> Option<f64> {
        let index = self.plan.layout.order?;
        let value = row.get(index).and_then(try_number);
        if value.is_none() {
            tracing::trace!(index, "ignoring non-numeric order value");
        }
        value
    }

    fn finish(self) -> Vec<Tally> {
        self.tallies
    }
}
