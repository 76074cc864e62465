//! Widget size and donut slice geometry.

use serde::{Deserialize, Serialize};
use statusring_core::{Category, Color};
use std::f64::consts::TAU;

/// Widget dimensions supplied by the host.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    /// Width in pixels
    pub width: f32,
    /// Height in pixels
    pub height: f32,
}

impl Size {
    /// Create a new size.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Whether either dimension is zero or negative.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// One donut slice. Angles are radians clockwise from 12 o'clock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slice {
    /// Category key
    pub key: String,
    /// Start angle
    pub start_angle: f64,
    /// End angle
    pub end_angle: f64,
    /// Fill color
    pub color: Color,
}

impl Slice {
    /// Angular extent.
    #[must_use]
    pub fn sweep(&self) -> f64 {
        self.end_angle - self.start_angle
    }

    /// Whether `angle` (any real value, normalized to `[0, TAU)`) falls in
    /// this slice. Zero-sweep slices contain nothing.
    #[must_use]
    pub fn contains(&self, angle: f64) -> bool {
        let angle = angle.rem_euclid(TAU);
        angle >= self.start_angle && angle < self.end_angle
    }
}

/// Lay out slices proportionally to count, in the given order.
pub fn layout_slices<'a>(categories: impl IntoIterator<Item = &'a Category>) -> Vec<Slice> {
    let categories: Vec<&Category> = categories.into_iter().collect();
    let total: u64 = categories.iter().map(|c| c.count).sum();
    let mut start = 0.0;
    categories
        .into_iter()
        .map(|category| {
            let sweep = if total == 0 {
                0.0
            } else {
                category.count as f64 / total as f64 * TAU
            };
            let slice = Slice {
                key: category.name.clone(),
                start_angle: start,
                end_angle: start + sweep,
                color: category.color,
            };
            start += sweep;
            slice
        })
        .collect()
}
