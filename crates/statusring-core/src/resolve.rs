//! Category color and display order.
//!
//! Precedence for both color and sort order: explicit order column, then the
//! fixed status names, then alphabetical position.

use crate::color::{Color, Palette};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Sort rank for categories whose order value is missing or non-numeric.
pub const MISSING_ORDER_RANK: f64 = 999.0;

/// Fixed name → color table. Attribute values commonly used for the same
/// three states share the status colors.
const NAMED_COLORS: &[(&str, Color)] = &[
    ("Healthy", Color::HEALTHY),
    ("Warning", Color::WARNING),
    ("Error", Color::ERROR),
    ("Online", Color::HEALTHY),
    ("Active", Color::HEALTHY),
    ("Compliant", Color::HEALTHY),
    ("Degraded", Color::WARNING),
    ("Pending", Color::WARNING),
    ("Offline", Color::ERROR),
    ("Inactive", Color::ERROR),
    ("Critical", Color::ERROR),
    ("Non-Compliant", Color::ERROR),
];

/// Display rank of the fixed status names.
const NAMED_ORDER: [&str; 3] = ["Healthy", "Warning", "Error"];

/// Color from the fixed name table.
#[must_use]
pub fn named_color(key: &str) -> Option<Color> {
    NAMED_COLORS
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, color)| *color)
}

fn named_rank(key: &str) -> Option<usize> {
    NAMED_ORDER.iter().position(|name| *name == key)
}

/// Resolves colors and order for one set of category keys.
#[derive(Debug, Clone)]
pub struct Resolver<'a> {
    palette: &'a Palette,
    orders: HashMap<String, f64>,
    has_order_column: bool,
    alphabetical: Vec<String>,
}

impl<'a> Resolver<'a> {
    /// Build a resolver for `keys` with their optional order values.
    /// `None` order values are left out of the order map.
    pub fn new<'k, I>(palette: &'a Palette, has_order_column: bool, keys: I) -> Self
    where
        I: IntoIterator<Item = (&'k str, Option<f64>)>,
    {
        let mut orders = HashMap::new();
        let mut alphabetical = Vec::new();
        for (key, order) in keys {
            if let (true, Some(order)) = (has_order_column, order) {
                orders.entry(key.to_string()).or_insert(order);
            }
            alphabetical.push(key.to_string());
        }
        alphabetical.sort();
        alphabetical.dedup();
        Self {
            palette,
            orders,
            has_order_column,
            alphabetical,
        }
    }

    /// Order value for a key, if the order column supplied one.
    #[must_use]
    pub fn order(&self, key: &str) -> Option<f64> {
        self.orders.get(key).copied()
    }

    /// Position of a key in the alphabetically sorted key list.
    #[must_use]
    pub fn position(&self, key: &str) -> usize {
        self.alphabetical
            .binary_search_by(|probe| probe.as_str().cmp(key))
            .unwrap_or_else(|insert_at| insert_at)
    }

    /// Color for a key.
    #[must_use]
    pub fn color(&self, key: &str) -> Color {
        if self.has_order_column {
            if let Some(order) = self.order(key) {
                return self.palette.wrapped(order.trunc() as i64);
            }
        }
        named_color(key).unwrap_or_else(|| self.palette.wrapped(self.position(key) as i64))
    }

    /// Display ordering between two keys.
    #[must_use]
    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        let by_order = if self.has_order_column {
            let rank = |key: &str| self.order(key).unwrap_or(MISSING_ORDER_RANK);
            rank(a).total_cmp(&rank(b))
        } else {
            Ordering::Equal
        };
        let by_name = match (named_rank(a), named_rank(b)) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        by_order.then(by_name).then_with(|| a.cmp(b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sorted(resolver: &Resolver<'_>, keys: &[&str]) -> Vec<String> {
        let mut keys: Vec<String> = keys.iter().map(|k| (*k).to_string()).collect();
        keys.sort_by(|a, b| resolver.compare(a, b));
        keys
    }

    #[test]
    fn test_order_value_picks_palette_index() {
        let palette = Palette::default();
        let resolver = Resolver::new(
            &palette,
            true,
            [("Healthy", Some(0.0)), ("Warning", Some(1.0)), ("Error", Some(2.0))],
        );
        assert_eq!(resolver.color("Healthy"), Color::HEALTHY);
        assert_eq!(resolver.color("Warning"), Color::WARNING);
        assert_eq!(resolver.color("Error"), Color::ERROR);
    }

    #[test]
    fn test_order_value_wraps_modulo_palette() {
        let palette = Palette::from_hex_list(&["#000001", "#000002", "#000003"]);
        let resolver = Resolver::new(&palette, true, [("a", Some(7.0)), ("b", Some(1.0))]);
        assert_eq!(resolver.color("a"), resolver.color("b"));
        assert_eq!(resolver.color("a"), Color::rgb(0, 0, 2));
    }

    #[test]
    fn test_order_overrides_named_color() {
        let palette = Palette::default();
        let resolver = Resolver::new(&palette, true, [("Healthy", Some(2.0))]);
        assert_eq!(resolver.color("Healthy"), Color::ERROR);
    }

    #[test]
    fn test_named_color_without_order() {
        let palette = Palette::default();
        let resolver = Resolver::new(&palette, false, [("Offline", Some(5.0)), ("Online", None)]);
        assert_eq!(resolver.color("Offline"), Color::ERROR);
        assert_eq!(resolver.color("Online"), Color::HEALTHY);
        assert_eq!(resolver.order("Offline"), None);
    }

    #[test]
    fn test_alphabetical_position_color() {
        let palette = Palette::from_hex_list(&["#000001", "#000002"]);
        let resolver = Resolver::new(&palette, false, [("zeta", None), ("alpha", None), ("mid", None)]);
        assert_eq!(resolver.color("alpha"), Color::rgb(0, 0, 1));
        assert_eq!(resolver.color("mid"), Color::rgb(0, 0, 2));
        assert_eq!(resolver.color("zeta"), Color::rgb(0, 0, 1));
    }

    #[test]
    fn test_missing_order_sorts_last_and_uses_position_color() {
        let palette = Palette::from_hex_list(&["#000001", "#000002", "#000003"]);
        let resolver = Resolver::new(
            &palette,
            true,
            [("b", None), ("a", Some(1000.0)), ("c", Some(3.0))],
        );
        assert_eq!(sorted(&resolver, &["b", "a", "c"]), vec!["c", "b", "a"]);
        assert_eq!(resolver.color("b"), Color::rgb(0, 0, 2));
    }

    #[test]
    fn test_sort_named_then_alphabetical() {
        let palette = Palette::default();
        let resolver = Resolver::new(
            &palette,
            false,
            [("Error", None), ("beta", None), ("Healthy", None), ("Alpha", None), ("Warning", None)],
        );
        assert_eq!(
            sorted(&resolver, &["Error", "beta", "Healthy", "Alpha", "Warning"]),
            vec!["Healthy", "Warning", "Error", "Alpha", "beta"]
        );
    }

    proptest! {
        #[test]
        fn prop_color_is_pure(keys in proptest::collection::vec("[a-z]{1,6}", 1..8), seed in 0i64..20) {
            let palette = Palette::default();
            let entries: Vec<(&str, Option<f64>)> = keys
                .iter()
                .enumerate()
                .map(|(i, k)| (k.as_str(), (i % 2 == 0).then_some((seed + i as i64) as f64)))
                .collect();
            let first = Resolver::new(&palette, true, entries.clone());
            let second = Resolver::new(&palette, true, entries);
            for key in &keys {
                prop_assert_eq!(first.color(key), second.color(key));
                prop_assert!(palette.colors().contains(&first.color(key)) || named_color(key).is_some());
            }
        }
    }
}
