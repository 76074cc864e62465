//! YAML widget manifests for statusring.
//!
//! A manifest names the widget variant, its title, language, fallback
//! behaviour, palette override and default slot bindings.
//!
//! ```
//! use statusring_yaml::WidgetManifest;
//!
//! let manifest = WidgetManifest::from_yaml(
//!     "name: devices\nvariant: device_status\nslots:\n  category: {dataset: d, column: status}\n",
//! )
//! .unwrap();
//! assert_eq!(manifest.widget_config().title, None);
//! ```

mod error;
mod manifest;

pub use error::ManifestError;
pub use manifest::{SlotBinding, WidgetManifest};

/// Parse and validate a manifest.
///
/// # Errors
///
/// See [`WidgetManifest::from_yaml`].
pub fn parse(yaml: &str) -> Result<WidgetManifest, ManifestError> {
    WidgetManifest::from_yaml(yaml)
}
