//! Cell values and typed extraction.
//!
//! Hosts send cells either as bare scalars or as `{id, name}` objects whose
//! `name` may be a language → string mapping. Everything downstream works on
//! the two scalar kinds produced here: numbers and resolved display strings.
//! Extraction never fails; missing or unusable input yields the kind default.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Display string used when nothing better can be resolved.
pub const UNKNOWN: &str = "Unknown";

/// A single cell as sent by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    /// `null`
    Null,
    /// Boolean scalar
    Bool(bool),
    /// Numeric scalar
    Number(f64),
    /// String scalar
    Text(String),
    /// `{id, name}` reference object
    Ref(CellRef),
    /// Anything else (arrays, objects without `id`/`name`)
    Other(Value),
}

/// `{id, name}` shaped cell. Objects with other keys land in [`Cell::Other`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CellRef {
    /// Underlying identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    /// Plain or localized display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<Value>,
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for Cell {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

/// One data row. Positions follow the query: dimensions first, then measures.
pub type Row = Vec<Cell>;

/// Scalar kinds a cell can be extracted into.
pub trait Extract: Sized {
    /// Value for missing or unusable cells.
    fn default_value() -> Self;

    /// Convert a cell, falling back to [`Extract::default_value`].
    fn from_cell(cell: &Cell) -> Self;
}

impl Extract for f64 {
    fn default_value() -> Self {
        0.0
    }

    fn from_cell(cell: &Cell) -> Self {
        try_number(cell).unwrap_or(0.0)
    }
}

impl Extract for String {
    fn default_value() -> Self {
        UNKNOWN.to_string()
    }

    fn from_cell(cell: &Cell) -> Self {
        match cell {
            Cell::Null => Self::default_value(),
            Cell::Text(s) => s.clone(),
            Cell::Number(n) => format_number(*n),
            Cell::Bool(b) => b.to_string(),
            Cell::Ref(r) => r.id.as_ref().map_or_else(Self::default_value, value_to_string),
            Cell::Other(Value::Object(map)) => {
                map.get("id").map_or_else(Self::default_value, value_to_string)
            }
            Cell::Other(v) => value_to_string(v),
        }
    }
}

/// Extract a cell into `T`, treating an absent cell like `null`.
pub fn extract<T: Extract>(cell: Option<&Cell>) -> T {
    cell.map_or_else(T::default_value, T::from_cell)
}

/// Numeric value of a cell, or `None` when the cell is missing or not numeric.
///
/// Use this where a non-numeric value must be excluded rather than treated as
/// zero (order columns).
#[must_use]
pub fn try_number(cell: &Cell) -> Option<f64> {
    let n = match cell {
        Cell::Null => return None,
        Cell::Number(n) => *n,
        Cell::Bool(b) => f64::from(u8::from(*b)),
        Cell::Text(s) => parse_number(s)?,
        Cell::Ref(r) => value_to_number(r.id.as_ref()?)?,
        Cell::Other(Value::Object(map)) => value_to_number(map.get("id")?)?,
        Cell::Other(v) => value_to_number(v)?,
    };
    n.is_finite().then_some(n)
}

/// Resolve the display name of a cell for `language`.
///
/// For `{name: {lang: text}}` objects the lookup order is: exact language,
/// its primary subtag, `"en"`, the first entry, then the object's `id`.
/// Empty strings are skipped. Scalars are converted directly.
#[must_use]
pub fn display_name(cell: Option<&Cell>, language: &str) -> String {
    let Some(cell) = cell else {
        return UNKNOWN.to_string();
    };
    let resolved = match cell {
        Cell::Ref(r) => r
            .name
            .as_ref()
            .and_then(|name| localized(name, language))
            .or_else(|| r.id.as_ref().map(value_to_string)),
        Cell::Other(Value::Object(map)) => map
            .get("name")
            .and_then(|name| localized(name, language))
            .or_else(|| map.get("id").map(value_to_string)),
        Cell::Null => None,
        other => Some(String::from_cell(other)),
    };
    resolved
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| UNKNOWN.to_string())
}

fn localized(name: &Value, language: &str) -> Option<String> {
    match name {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Object(map) => lookup_language(map, language),
        _ => None,
    }
}

fn lookup_language(map: &Map<String, Value>, language: &str) -> Option<String> {
    let non_empty = |key: &str| {
        map.get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };
    let primary = language.split(['-', '_']).next().unwrap_or(language);
    non_empty(language)
        .or_else(|| non_empty(primary))
        .or_else(|| non_empty("en"))
        .or_else(|| {
            map.values()
                .filter_map(Value::as_str)
                .find(|s| !s.is_empty())
                .map(str::to_string)
        })
}

fn parse_number(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }
    trimmed.parse::<f64>().ok()
}

fn value_to_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_number(s),
        Value::Bool(b) => Some(f64::from(u8::from(*b))),
        _ => None,
    }
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::Null => UNKNOWN.to_string(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.as_f64().map_or_else(|| n.to_string(), format_number),
        other => other.to_string(),
    }
}

/// Shortest decimal form: integral values print without a fraction.
#[must_use]
pub fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}
