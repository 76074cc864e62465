//! Theme context derived from host theme configuration.

use crate::color::{Color, Palette};
use serde::{Deserialize, Serialize};

/// Font stack used when the host names none.
pub const DEFAULT_FONT_FAMILY: &str = "Inter, system-ui, sans-serif";

/// How far the background is blended toward the dominant category color.
pub const DOMINANT_TINT: f64 = 0.15;

/// Theme settings as supplied by the host. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeConfig {
    /// Widget background color
    #[serde(default)]
    pub background_color: Option<String>,
    /// Text color
    #[serde(default)]
    pub text_color: Option<String>,
    /// Font family
    #[serde(default)]
    pub font_family: Option<String>,
    /// Category colors
    #[serde(default)]
    pub color_palette: Vec<String>,
}

/// Read-only theme snapshot computed once per render or resize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeContext {
    /// Background color
    pub background_color: Color,
    /// Text color
    pub text_color: Color,
    /// Font family
    pub font_family: String,
    /// Category palette
    pub color_palette: Palette,
}

impl Default for ThemeContext {
    fn default() -> Self {
        Self::derive(&ThemeConfig::default(), None)
    }
}

impl ThemeContext {
    /// Derive a context from host config. `palette_override` replaces the
    /// host palette when present.
    #[must_use]
    pub fn derive(config: &ThemeConfig, palette_override: Option<&Palette>) -> Self {
        let background_color = parse_or(config.background_color.as_deref(), Color::WHITE);
        let text_color = config
            .text_color
            .as_deref()
            .and_then(|hex| Color::from_hex(hex).ok())
            .unwrap_or_else(|| readable_text(&background_color));
        let font_family = config
            .font_family
            .as_deref()
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .unwrap_or(DEFAULT_FONT_FAMILY)
            .to_string();
        let color_palette = palette_override.cloned().unwrap_or_else(|| {
            if config.color_palette.is_empty() {
                Palette::default()
            } else {
                Palette::from_hex_list(&config.color_palette)
            }
        });
        Self {
            background_color,
            text_color,
            font_family,
            color_palette,
        }
    }

    /// Blend the background toward `dominant`, keeping text readable.
    #[must_use]
    pub fn tinted(mut self, dominant: Color) -> Self {
        self.background_color = self.background_color.mix(&dominant, DOMINANT_TINT);
        self.text_color = readable_text(&self.background_color);
        self
    }
}

fn parse_or(hex: Option<&str>, fallback: Color) -> Color {
    match hex.map(Color::from_hex) {
        Some(Ok(color)) => color,
        Some(Err(err)) => {
            tracing::warn!(%err, "ignoring theme color");
            fallback
        }
        None => fallback,
    }
}

/// Dark or light text, whichever contrasts more with `background`.
#[must_use]
pub fn readable_text(background: &Color) -> Color {
    if Color::INK.contrast_ratio(background) >= Color::PAPER.contrast_ratio(background) {
        Color::INK
    } else {
        Color::PAPER
    }
}
