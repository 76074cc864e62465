//! Widget variant presets and per-instance configuration.

use serde::{Deserialize, Serialize};
use statusring_core::{CategorizeBy, Palette, SlotAssignments, SlotRole};

/// Preset combinations of categorization mode, title and styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// Score bands with a background tinted toward the dominant band
    HealthScore,
    /// Attribute categories from pre-aggregated counts
    #[default]
    StatusBreakdown,
    /// Attribute categories ranked and colored by an order column
    OrderedStatus,
    /// Attribute categories counting unique device identifiers
    DeviceStatus,
    /// Attribute categories with a per-category score
    ComplianceScore,
}

impl Variant {
    /// Every variant.
    pub const ALL: [Self; 5] = [
        Self::HealthScore,
        Self::StatusBreakdown,
        Self::OrderedStatus,
        Self::DeviceStatus,
        Self::ComplianceScore,
    ];

    /// Categorization mode.
    #[must_use]
    pub const fn categorize_by(self) -> CategorizeBy {
        match self {
            Self::HealthScore => CategorizeBy::ScoreBands,
            _ => CategorizeBy::Attribute,
        }
    }

    /// Title used when neither a legend slot nor an explicit title is set.
    #[must_use]
    pub const fn default_title(self) -> &'static str {
        match self {
            Self::HealthScore => "Health Score",
            Self::StatusBreakdown => "Status Breakdown",
            Self::OrderedStatus => "Status",
            Self::DeviceStatus => "Device Status",
            Self::ComplianceScore => "Compliance Score",
        }
    }

    /// Whether the background is tinted toward the dominant category.
    #[must_use]
    pub const fn tints_background(self) -> bool {
        matches!(self, Self::HealthScore)
    }

    /// Slot roles the variant needs to show real data. Each entry lists
    /// interchangeable roles; any one of them fills the requirement.
    #[must_use]
    pub const fn required_roles(self) -> &'static [&'static [SlotRole]] {
        match self {
            Self::HealthScore => &[&[SlotRole::Category, SlotRole::Measure]],
            Self::StatusBreakdown => &[&[SlotRole::Category], &[SlotRole::Measure]],
            Self::OrderedStatus => &[
                &[SlotRole::Category],
                &[SlotRole::Order],
                &[SlotRole::Measure],
            ],
            Self::DeviceStatus => &[&[SlotRole::Category], &[SlotRole::Identifier]],
            Self::ComplianceScore => &[
                &[SlotRole::Category],
                &[SlotRole::Measure],
                &[SlotRole::Score],
            ],
        }
    }

    /// Unfilled requirements in `slots`, reported by their first role.
    #[must_use]
    pub fn missing_roles(self, slots: &SlotAssignments) -> Vec<SlotRole> {
        self.required_roles()
            .iter()
            .filter(|alternatives| !alternatives.iter().any(|role| slots.has(*role)))
            .filter_map(|alternatives| alternatives.first().copied())
            .collect()
    }
}

/// Static configuration for one widget instance.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetConfig {
    /// Variant preset
    pub variant: Variant,
    /// Categorization mode
    pub categorize_by: CategorizeBy,
    /// Explicit title
    pub title: Option<String>,
    /// Show the sample dataset when no data is wired up
    pub fallback: bool,
    /// Palette replacing the host palette
    pub palette: Option<Palette>,
    /// Tint the background toward the dominant category
    pub tint_background: bool,
    /// Slot assignments used for roles the host leaves empty
    pub default_slots: SlotAssignments,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self::new(Variant::default())
    }
}

impl WidgetConfig {
    /// Configuration for a variant with its preset defaults.
    #[must_use]
    pub fn new(variant: Variant) -> Self {
        Self {
            variant,
            categorize_by: variant.categorize_by(),
            title: None,
            fallback: true,
            palette: None,
            tint_background: variant.tints_background(),
            default_slots: SlotAssignments::new(),
        }
    }

    /// Set the categorization mode.
    #[must_use]
    pub const fn categorize_by(mut self, by: CategorizeBy) -> Self {
        self.categorize_by = by;
        self
    }

    /// Set an explicit title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Enable or disable the sample dataset fallback.
    #[must_use]
    pub const fn fallback(mut self, fallback: bool) -> Self {
        self.fallback = fallback;
        self
    }

    /// Override the host palette.
    #[must_use]
    pub fn palette(mut self, palette: Palette) -> Self {
        self.palette = Some(palette);
        self
    }

    /// Enable or disable dominant-category tinting.
    #[must_use]
    pub const fn tint_background(mut self, tint: bool) -> Self {
        self.tint_background = tint;
        self
    }

    /// Set default slot assignments.
    #[must_use]
    pub fn default_slots(mut self, slots: SlotAssignments) -> Self {
        self.default_slots = slots;
        self
    }

    /// Host slots with this configuration's defaults filled in.
    #[must_use]
    pub fn effective_slots(&self, slots: &SlotAssignments) -> SlotAssignments {
        slots.or_defaults(&self.default_slots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use statusring_core::ColumnRef;

    #[test]
    fn test_health_score_preset() {
        let config = WidgetConfig::new(Variant::HealthScore);
        assert_eq!(config.categorize_by, CategorizeBy::ScoreBands);
        assert!(config.tint_background);
        assert!(config.fallback);
    }

    #[test]
    fn test_attribute_presets() {
        for variant in Variant::ALL.into_iter().skip(1) {
            let config = WidgetConfig::new(variant);
            assert_eq!(config.categorize_by, CategorizeBy::Attribute);
            assert!(!config.tint_background);
        }
    }

    #[test]
    fn test_builder_overrides() {
        let config = WidgetConfig::new(Variant::StatusBreakdown)
            .title("Fleet")
            .fallback(false)
            .tint_background(true)
            .categorize_by(CategorizeBy::ScoreBands);
        assert_eq!(config.title.as_deref(), Some("Fleet"));
        assert!(!config.fallback);
        assert!(config.tint_background);
        assert_eq!(config.categorize_by, CategorizeBy::ScoreBands);
    }

    #[test]
    fn test_missing_roles() {
        let slots = SlotAssignments::new().with("category", ColumnRef::new("ds", "status"));
        assert_eq!(
            Variant::OrderedStatus.missing_roles(&slots),
            vec![SlotRole::Order, SlotRole::Measure]
        );
        assert!(Variant::HealthScore.missing_roles(&slots).is_empty());
    }

    #[test]
    fn test_health_score_accepts_measure_as_score_column() {
        let slots = SlotAssignments::new().with("measure", ColumnRef::new("ds", "health"));
        assert!(Variant::HealthScore.missing_roles(&slots).is_empty());
        assert_eq!(
            Variant::HealthScore.missing_roles(&SlotAssignments::new()),
            vec![SlotRole::Category]
        );
    }

    #[test]
    fn test_default_slots_fill_gaps() {
        let config = WidgetConfig::default()
            .default_slots(SlotAssignments::new().with("size", ColumnRef::new("ds", "n")));
        let host = SlotAssignments::new().with("category", ColumnRef::new("ds", "status"));
        let merged = config.effective_slots(&host);
        assert!(merged.has(SlotRole::Category));
        assert!(merged.has(SlotRole::Measure));
    }

    #[test]
    fn test_variant_serde_names() {
        let v: Variant = serde_json::from_str("\"device_status\"").unwrap();
        assert_eq!(v, Variant::DeviceStatus);
    }
}
