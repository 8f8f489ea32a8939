use serde::{Serialize, Serializer};
use std::fmt;

/// Text values the workbook uses to mean "no value". A cell holding one of
/// these is read as [`CellValue::Missing`].
pub const NA_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// One spreadsheet cell as seen by the table loaders
#[derive(Clone, Debug, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Missing,
    Number(f64),
    Text(String),
    Bool(bool),
}

impl CellValue {
    /// Builds a text cell, folding NA markers into `Missing`
    pub fn text(s: impl Into<String>) -> Self {
        let s = s.into();
        if NA_MARKERS.contains(&s.as_str()) {
            CellValue::Missing
        } else {
            CellValue::Text(s)
        }
    }

    pub fn is_missing(&self) -> bool {
        match self {
            CellValue::Missing => true,
            CellValue::Number(n) => n.is_nan(),
            _ => false,
        }
    }

    /// Numeric coercion used by the score table.
    ///
    /// Numbers pass through, booleans become 1/0, text is parsed after
    /// trimming and becomes `None` when it does not parse.
    pub fn to_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) if !n.is_nan() => Some(*n),
            CellValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            CellValue::Text(s) => s.trim().parse::<f64>().ok().filter(|n| !n.is_nan()),
            _ => None,
        }
    }

    /// Exact comparison against numeric zero. `false` counts as zero, the
    /// text "0" does not.
    pub fn equals_zero(&self) -> bool {
        match self {
            CellValue::Number(n) => *n == 0.0,
            CellValue::Bool(b) => !*b,
            _ => false,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Missing => Ok(()),
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Text(s) => write!(f, "{}", s),
            CellValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CellValue::Missing => serializer.serialize_none(),
            CellValue::Number(n) if n.is_nan() => serializer.serialize_none(),
            CellValue::Number(n) => serializer.serialize_f64(*n),
            CellValue::Text(s) => serializer.serialize_str(s),
            CellValue::Bool(b) => serializer.serialize_bool(*b),
        }
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<i32> for CellValue {
    fn from(n: i32) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::text(s)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}
