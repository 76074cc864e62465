//! Hex colors, fixed status colors and the category palette.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque sRGB color, serialized as a 6-digit `#rrggbb` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
}

impl Color {
    /// Create a color from channel values.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a hex color string (`"#10b981"` or `"10B981"`).
    ///
    /// Only the 6-digit form is accepted; palettes never carry alpha.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid 6-digit hex color.
    pub fn from_hex(hex: &str) -> Result<Self, ColorParseError> {
        let hex = hex.trim().trim_start_matches('#');
        if hex.len() != 6 {
            return Err(ColorParseError::InvalidLength);
        }
        if !hex.is_ascii() {
            return Err(ColorParseError::InvalidHex);
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| ColorParseError::InvalidHex)
        };
        Ok(Self::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// Lowercase `#rrggbb` form.
    #[must_use]
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Relative luminance per WCAG 2.1.
    ///
    /// See: <https://www.w3.org/TR/WCAG21/#dfn-relative-luminance>
    #[must_use]
    pub fn relative_luminance(&self) -> f64 {
        let r = Self::linearize(self.r);
        let g = Self::linearize(self.g);
        let b = Self::linearize(self.b);

        0.0722f64.mul_add(b, 0.2126f64.mul_add(r, 0.7152 * g))
    }

    /// Contrast ratio between two colors per WCAG 2.1, in `[1.0, 21.0]`.
    #[must_use]
    pub fn contrast_ratio(&self, other: &Self) -> f64 {
        let l1 = self.relative_luminance();
        let l2 = other.relative_luminance();

        let (lighter, darker) = if l1 > l2 { (l1, l2) } else { (l2, l1) };

        (lighter + 0.05) / (darker + 0.05)
    }

    /// Blend toward `other` by `t` (clamped to `[0, 1]`).
    #[must_use]
    pub fn mix(&self, other: &Self, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        let channel = |a: u8, b: u8| (f64::from(b) - f64::from(a)).mul_add(t, f64::from(a)).round() as u8;
        Self::rgb(
            channel(self.r, other.r),
            channel(self.g, other.g),
            channel(self.b, other.b),
        )
    }

    fn linearize(channel: u8) -> f64 {
        let c = f64::from(channel) / 255.0;
        if c <= 0.04045 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    }

    /// White
    pub const WHITE: Self = Self::rgb(0xff, 0xff, 0xff);
    /// Near-black text color
    pub const INK: Self = Self::rgb(0x1f, 0x29, 0x37);
    /// Near-white text color
    pub const PAPER: Self = Self::rgb(0xf9, 0xfa, 0xfb);

    /// Healthy / positive status
    pub const HEALTHY: Self = Self::rgb(0x10, 0xb9, 0x81);
    /// Warning / degraded status
    pub const WARNING: Self = Self::rgb(0xf5, 0x9e, 0x0b);
    /// Error / critical status
    pub const ERROR: Self = Self::rgb(0xef, 0x44, 0x44);
}

impl Default for Color {
    fn default() -> Self {
        Self::HEALTHY
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl TryFrom<String> for Color {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

/// Error type for color parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorParseError {
    /// Invalid hex characters
    InvalidHex,
    /// Invalid string length
    InvalidLength,
}

impl fmt::Display for ColorParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidHex => write!(f, "invalid hex characters"),
            Self::InvalidLength => write!(f, "invalid hex string length (expected 6)"),
        }
    }
}

impl std::error::Error for ColorParseError {}

/// Default category palette. The first three entries are the status colors so
/// that order values 0, 1, 2 map to healthy, warning, error.
pub const DEFAULT_PALETTE: [Color; 8] = [
    Color::HEALTHY,
    Color::WARNING,
    Color::ERROR,
    Color::rgb(0x3b, 0x82, 0xf6),
    Color::rgb(0x8b, 0x5c, 0xf6),
    Color::rgb(0xec, 0x48, 0x99),
    Color::rgb(0x14, 0xb8, 0xa6),
    Color::rgb(0x6b, 0x72, 0x80),
];

/// Non-empty ordered list of category colors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Color>", into = "Vec<Color>")]
pub struct Palette(Vec<Color>);

impl From<Vec<Color>> for Palette {
    fn from(colors: Vec<Color>) -> Self {
        if colors.is_empty() {
            tracing::warn!("empty palette replaced by default");
            Self::default()
        } else {
            Self(colors)
        }
    }
}

impl From<Palette> for Vec<Color> {
    fn from(palette: Palette) -> Self {
        palette.0
    }
}

impl Palette {
    /// Build a palette from host-supplied strings. Invalid entries are dropped;
    /// if nothing valid remains the default palette is used.
    pub fn from_hex_list<S: AsRef<str>>(entries: &[S]) -> Self {
        let colors: Vec<Color> = entries
            .iter()
            .filter_map(|entry| match Color::from_hex(entry.as_ref()) {
                Ok(color) => Some(color),
                Err(err) => {
                    tracing::warn!(entry = entry.as_ref(), %err, "dropping palette entry");
                    None
                }
            })
            .collect();
        Self::from(colors)
    }

    /// Color at `index`, wrapping around the palette length. Negative indices
    /// wrap from the end.
    #[must_use]
    pub fn wrapped(&self, index: i64) -> Color {
        let len = self.0.len() as i64;
        self.0[index.rem_euclid(len) as usize]
    }

    /// Number of colors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; a palette holds at least one color.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Colors in order.
    #[must_use]
    pub fn colors(&self) -> &[Color] {
        &self.0
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self(DEFAULT_PALETTE.to_vec())
    }
}
