//! FILENAME: core/engine/src/value.rs
//! PURPOSE: Defines the value held by a single field of a survey record.
//! CONTEXT: Loader output only contains `Missing` and `Text`; the normalizer
//! turns numeric columns into `Number` and categorical columns into canonical
//! label text.

use serde::{Deserialize, Serialize};

/// The value of one field in one record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    /// Explicit missing marker (null token, empty cell, unmapped code).
    Missing,
    Number(f64),
    Text(String),
}

impl FieldValue {
    pub fn text(s: impl Into<String>) -> Self {
        FieldValue::Text(s.into())
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, FieldValue::Missing)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Returns the display value as a String.
    /// Integral numbers are printed without a fractional part so that
    /// `12.0` reads as `12`.
    pub fn display_value(&self) -> String {
        match self {
            FieldValue::Missing => String::new(),
            FieldValue::Number(n) => format_number(*n),
            FieldValue::Text(s) => s.clone(),
        }
    }
}

impl Default for FieldValue {
    fn default() -> Self {
        FieldValue::Missing
    }
}

/// Format without unnecessary decimal places.
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{:.0}", n)
    } else {
        format!("{}", n)
    }
}
