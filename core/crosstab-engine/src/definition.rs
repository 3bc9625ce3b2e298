//! FILENAME: core/crosstab-engine/src/definition.rs
//! Crosstab Definition - The serializable configuration.
//!
//! This module contains the types needed to DESCRIBE which tables are
//! precomputed. They are plain data, fixed before the dataset is read.

use serde::{Deserialize, Serialize};

// ============================================================================
// AGGREGATION SPEC
// ============================================================================

/// A two-way table to precompute: `(column field, row field)`.
///
/// The first field becomes the column axis (one column per label), the second
/// the row axis. Serialized as a two-element array, e.g. `["sex", "satjob"]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AggregationSpec(pub String, pub String);

impl AggregationSpec {
    pub fn new(column_field: impl Into<String>, row_field: impl Into<String>) -> Self {
        AggregationSpec(column_field.into(), row_field.into())
    }

    pub fn column_field(&self) -> &str {
        &self.0
    }

    pub fn row_field(&self) -> &str {
        &self.1
    }

    /// The unordered key this spec is registered under.
    pub fn key(&self) -> FieldPair {
        FieldPair::new(&self.0, &self.1)
    }
}

// ============================================================================
// FIELD PAIR
// ============================================================================

/// Unordered pair of field names: `{a, b} == {b, a}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FieldPair {
    first: String,
    second: String,
}

impl FieldPair {
    pub fn new(a: &str, b: &str) -> Self {
        let (first, second) = if a <= b { (a, b) } else { (b, a) };
        FieldPair {
            first: first.to_string(),
            second: second.to_string(),
        }
    }

    pub fn fields(&self) -> (&str, &str) {
        (&self.first, &self.second)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.first == field || self.second == field
    }
}

// ============================================================================
// SUMMARY SPEC
// ============================================================================

/// Numeric statistics of `values` for every combination of `group_by` labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummarySpec {
    #[serde(default)]
    pub group_by: Vec<String>,
    pub values: Vec<String>,
}

impl SummarySpec {
    pub fn new(group_by: &[&str], values: &[&str]) -> Self {
        SummarySpec {
            group_by: group_by.iter().map(|s| s.to_string()).collect(),
            values: values.iter().map(|s| s.to_string()).collect(),
        }
    }
}
