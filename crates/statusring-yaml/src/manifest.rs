//! Widget manifest types.

use crate::error::ManifestError;
use serde::{Deserialize, Serialize};
use statusring_core::{
    AggregationFunc, CategorizeBy, Color, ColumnRef, Palette, SlotAssignments, SlotColumn,
    SlotRole, ThemeConfig,
};
use statusring_widgets::{DonutWidget, HostSink, Presenter, Variant, WidgetConfig};
use std::collections::BTreeMap;

/// Widget manifest loaded from YAML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetManifest {
    /// Widget name
    pub name: String,
    /// Variant preset
    #[serde(default)]
    pub variant: Variant,
    /// Explicit title
    #[serde(default)]
    pub title: Option<String>,
    /// Categorization mode, overriding the variant's
    #[serde(default)]
    pub categorize_by: Option<CategorizeBy>,
    /// Language used when the host names none
    #[serde(default = "default_language")]
    pub language: String,
    /// Show sample data when nothing is wired up
    #[serde(default = "default_fallback")]
    pub fallback: bool,
    /// Tint the background toward the dominant category, overriding the variant
    #[serde(default)]
    pub tint_background: Option<bool>,
    /// Palette override as `#rrggbb` strings
    #[serde(default)]
    pub palette: Vec<String>,
    /// Theme used when the host supplies none
    #[serde(default)]
    pub theme: Option<ThemeConfig>,
    /// Default slot bindings, keyed by slot name
    #[serde(default)]
    pub slots: BTreeMap<String, SlotBinding>,
}

fn default_language() -> String {
    "en".to_string()
}

const fn default_fallback() -> bool {
    true
}

/// A column bound to a slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotBinding {
    /// Dataset ID
    pub dataset: String,
    /// Column ID
    pub column: String,
    /// Aggregation function for measures
    #[serde(default)]
    pub aggregation: Option<AggregationFunc>,
    /// Column display name
    #[serde(default)]
    pub label: Option<String>,
}

impl SlotBinding {
    fn to_slot_column(&self) -> SlotColumn {
        let mut column = ColumnRef::new(&self.dataset, &self.column);
        column.aggregation_func = self.aggregation;
        SlotColumn {
            column,
            name: self.label.clone(),
        }
    }
}

impl WidgetManifest {
    /// Parse and validate a manifest.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is invalid or the manifest fails
    /// [`validate`](Self::validate).
    pub fn from_yaml(yaml: &str) -> Result<Self, ManifestError> {
        let manifest: Self = serde_yaml_ng::from_str(yaml)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Serialize manifest to YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_yaml(&self) -> Result<String, ManifestError> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    /// Check names, colors and slot bindings.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), ManifestError> {
        if self.name.trim().is_empty() {
            return Err(ManifestError::MissingField("name".to_string()));
        }
        if self.language.trim().is_empty() {
            return Err(ManifestError::invalid("language", "must not be empty"));
        }
        for (i, entry) in self.palette.iter().enumerate() {
            Color::from_hex(entry).map_err(|e| ManifestError::invalid(format!("palette[{i}]"), e))?;
        }
        for (name, binding) in &self.slots {
            let field = format!("slots.{name}");
            if SlotRole::from_slot_name(name).is_none() {
                return Err(ManifestError::invalid(field, "unknown slot name"));
            }
            if binding.dataset.trim().is_empty() {
                return Err(ManifestError::invalid(field, "dataset must not be empty"));
            }
            if binding.column.trim().is_empty() {
                return Err(ManifestError::invalid(field, "column must not be empty"));
            }
        }

        let missing = self.variant.missing_roles(&self.slot_assignments());
        if !missing.is_empty() {
            if !self.fallback {
                return Err(ManifestError::Validation(format!(
                    "{:?} needs slots {missing:?} when fallback is off",
                    self.variant
                )));
            }
            tracing::debug!(
                name = %self.name,
                ?missing,
                "manifest leaves slots for the host to fill"
            );
        }
        Ok(())
    }

    /// Default slot assignments.
    #[must_use]
    pub fn slot_assignments(&self) -> SlotAssignments {
        self.slots
            .iter()
            .fold(SlotAssignments::new(), |slots, (name, binding)| {
                slots.with(name.as_str(), binding.to_slot_column())
            })
    }

    /// Palette override, if any.
    #[must_use]
    pub fn palette(&self) -> Option<Palette> {
        (!self.palette.is_empty()).then(|| Palette::from_hex_list(&self.palette))
    }

    /// Theme config to use when the host supplies none.
    #[must_use]
    pub fn theme_config(&self) -> ThemeConfig {
        self.theme.clone().unwrap_or_default()
    }

    /// Widget configuration for this manifest.
    #[must_use]
    pub fn widget_config(&self) -> WidgetConfig {
        let mut config = WidgetConfig::new(self.variant)
            .fallback(self.fallback)
            .default_slots(self.slot_assignments());
        if let Some(by) = self.categorize_by {
            config = config.categorize_by(by);
        }
        if let Some(tint) = self.tint_background {
            config = config.tint_background(tint);
        }
        if let Some(title) = &self.title {
            config = config.title(title.clone());
        }
        if let Some(palette) = self.palette() {
            config = config.palette(palette);
        }
        config
    }

    /// Create a widget configured by this manifest.
    pub fn build<P: Presenter, S: HostSink>(&self, presenter: P, sink: S) -> DonutWidget<P, S> {
        DonutWidget::new(self.widget_config(), presenter, sink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE_YAML: &str = r##"
name: fleet-health
variant: health_score
title: Fleet Health
palette: ["#10b981", "#F59E0B", "#ef4444"]
slots:
  identifier:
    dataset: devices
    column: device_id
  measure:
    dataset: devices
    column: health
    aggregation: average
"##;

    #[test]
    fn test_parse_manifest() {
        let manifest = WidgetManifest::from_yaml(EXAMPLE_YAML).unwrap();
        assert_eq!(manifest.name, "fleet-health");
        assert_eq!(manifest.variant, Variant::HealthScore);
        assert_eq!(manifest.language, "en");
        assert!(manifest.fallback);
        assert_eq!(manifest.slots.len(), 2);
    }

    #[test]
    fn test_slot_assignments() {
        let manifest = WidgetManifest::from_yaml(EXAMPLE_YAML).unwrap();
        let slots = manifest.slot_assignments();
        let measure = slots.column(SlotRole::Measure).unwrap();
        assert_eq!(measure.column_id, "health");
        assert_eq!(measure.aggregation_func, Some(AggregationFunc::Average));
        assert!(slots.has(SlotRole::Identifier));
    }

    #[test]
    fn test_widget_config() {
        let config = WidgetManifest::from_yaml(EXAMPLE_YAML)
            .unwrap()
            .widget_config();
        assert_eq!(config.categorize_by, CategorizeBy::ScoreBands);
        assert!(config.tint_background);
        assert_eq!(config.title.as_deref(), Some("Fleet Health"));
        let palette = config.palette.unwrap();
        assert_eq!(palette.colors()[1], Color::WARNING);
    }

    #[test]
    fn test_overrides() {
        let yaml = r"
name: breakdown
variant: status_breakdown
categorize_by: score_bands
tint_background: true
fallback: false
slots:
  category: {dataset: ds, column: score}
  size: {dataset: ds, column: n, aggregation: sum}
";
        let config = WidgetManifest::from_yaml(yaml).unwrap().widget_config();
        assert_eq!(config.categorize_by, CategorizeBy::ScoreBands);
        assert!(config.tint_background);
        assert!(!config.fallback);
    }

    #[test]
    fn test_missing_name() {
        let err = WidgetManifest::from_yaml("name: ''").unwrap_err();
        assert!(matches!(err, ManifestError::MissingField(ref f) if f == "name"));
    }

    #[test]
    fn test_invalid_palette_entry() {
        let err = WidgetManifest::from_yaml("name: w\npalette: ['#10b981', 'green']").unwrap_err();
        match err {
            ManifestError::InvalidValue { field, .. } => assert_eq!(field, "palette[1]"),
            other => panic!("expected invalid value, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_slot() {
        let yaml = "name: w\nslots:\n  colour: {dataset: ds, column: c}\n";
        let err = WidgetManifest::from_yaml(yaml).unwrap_err();
        assert_eq!(err.to_string(), "Invalid value for 'slots.colour': unknown slot name");
    }

    #[test]
    fn test_missing_slots_without_fallback() {
        let yaml = "name: w\nvariant: ordered_status\nfallback: false\n";
        let err = WidgetManifest::from_yaml(yaml).unwrap_err();
        assert!(matches!(err, ManifestError::Validation(_)));
    }

    #[test]
    fn test_health_score_measure_only_without_fallback() {
        let yaml = "name: w\nvariant: health_score\nfallback: false\nslots:\n  measure: {dataset: ds, column: health}\n";
        let manifest = WidgetManifest::from_yaml(yaml).unwrap();
        assert!(!manifest.widget_config().fallback);

        let err = WidgetManifest::from_yaml("name: w\nvariant: health_score\nfallback: false\n")
            .unwrap_err();
        assert!(matches!(err, ManifestError::Validation(_)));
    }

    #[test]
    fn test_missing_slots_with_fallback_is_fine() {
        let manifest = WidgetManifest::from_yaml("name: w\nvariant: ordered_status\n").unwrap();
        assert!(manifest.slot_assignments().slots().is_empty());
        assert!(manifest.palette().is_none());
    }

    #[test]
    fn test_roundtrip_yaml() {
        let manifest = WidgetManifest::from_yaml(EXAMPLE_YAML).unwrap();
        let yaml = manifest.to_yaml().unwrap();
        assert_eq!(WidgetManifest::from_yaml(&yaml).unwrap(), manifest);
    }
}
