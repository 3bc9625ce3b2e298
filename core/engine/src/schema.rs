//! FILENAME: core/engine/src/schema.rs
//! Normalizer configuration - the serializable description of every field.
//!
//! These structures are designed to be:
//! - Serializable (the whole survey configuration can live in a JSON file)
//! - Fully specified before any data is read
//! - Validated once, up front, so normalization never meets a bad rule

use std::collections::{BTreeMap, HashSet};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    #[error("field '{0}' is configured more than once")]
    DuplicateField(String),

    #[error("categorical field '{0}' declares no labels")]
    EmptyLabelSet(String),

    #[error("label '{label}' is declared twice for field '{field}'")]
    DuplicateLabel { field: String, label: String },

    #[error("code '{code}' of field '{field}' maps to undeclared label '{label}'")]
    UndeclaredLabel {
        field: String,
        code: String,
        label: String,
    },

    #[error("derived field '{field}' reads '{source_field}', which is not a numeric field")]
    DerivedSourceNotNumeric { field: String, source_field: String },

    #[error("derived field '{field}' has {edges} bin edges for {labels} labels")]
    BinMismatch {
        field: String,
        edges: usize,
        labels: usize,
    },

    #[error("bin edges of derived field '{0}' are not strictly ascending")]
    BinEdgesNotAscending(String),

    #[error("configured field '{0}' is not a column of the loaded data")]
    MissingColumn(String),
}

// ============================================================================
// FIELD SPECS
// ============================================================================

/// A numeric column. `sentinels` rewrites special strings (an open-ended top
/// bucket such as `89 or older`) to a numeric boundary before parsing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericSpec {
    pub name: String,

    #[serde(default)]
    pub sentinels: BTreeMap<String, f64>,
}

impl NumericSpec {
    pub fn new(name: impl Into<String>) -> Self {
        NumericSpec {
            name: name.into(),
            sentinels: BTreeMap::new(),
        }
    }

    pub fn with_sentinel(mut self, raw: impl Into<String>, value: f64) -> Self {
        self.sentinels.insert(raw.into(), value);
        self
    }
}

/// A categorical column: raw codes, canonical labels and their order.
///
/// An empty `codes` table means the raw values already are the canonical
/// labels (identity mapping over `labels`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoricalSpec {
    pub name: String,

    /// Canonical labels in display order.
    pub labels: Vec<String>,

    /// Raw code -> canonical label.
    #[serde(default)]
    pub codes: BTreeMap<String, String>,
}

impl CategoricalSpec {
    pub fn new(name: impl Into<String>, labels: &[&str]) -> Self {
        CategoricalSpec {
            name: name.into(),
            labels: labels.iter().map(|l| l.to_string()).collect(),
            codes: BTreeMap::new(),
        }
    }

    pub fn with_codes(mut self, codes: &[(&str, &str)]) -> Self {
        self.codes = codes
            .iter()
            .map(|(raw, label)| (raw.to_string(), label.to_string()))
            .collect();
        self
    }

    /// The effective code table: explicit codes, or identity over the labels.
    pub fn code_table(&self) -> BTreeMap<String, String> {
        if self.codes.is_empty() {
            self.labels.iter().map(|l| (l.clone(), l.clone())).collect()
        } else {
            self.codes.clone()
        }
    }
}

/// How a derived categorical field is computed from a numeric source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Derivation {
    /// An integral number becomes its integer label (`12.0` -> `"12"`).
    IntegerLabel,
    /// Right-closed bins: label `i` covers `(edges[i], edges[i + 1]]`.
    /// Values outside every bin become missing.
    Bins { edges: Vec<f64> },
}

/// A categorical field computed from a numeric field of the same record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedSpec {
    pub name: String,
    pub source: String,
    pub labels: Vec<String>,
    pub derivation: Derivation,
}

// ============================================================================
// NORMALIZER CONFIG
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizerConfig {
    #[serde(default)]
    pub numeric: Vec<NumericSpec>,

    #[serde(default)]
    pub categorical: Vec<CategoricalSpec>,

    #[serde(default)]
    pub derived: Vec<DerivedSpec>,
}

impl NormalizerConfig {
    /// Checks the configuration for internal consistency.
    pub fn validate(&self) -> Result<(), SchemaError> {
        let mut names = HashSet::new();
        let all_names = self
            .numeric
            .iter()
            .map(|n| &n.name)
            .chain(self.categorical.iter().map(|c| &c.name))
            .chain(self.derived.iter().map(|d| &d.name));
        for name in all_names {
            if !names.insert(name.as_str()) {
                return Err(SchemaError::DuplicateField(name.clone()));
            }
        }

        for spec in &self.categorical {
            check_labels(&spec.name, &spec.labels)?;
            for (code, label) in &spec.codes {
                if !spec.labels.contains(label) {
                    return Err(SchemaError::UndeclaredLabel {
                        field: spec.name.clone(),
                        code: code.clone(),
                        label: label.clone(),
                    });
                }
            }
        }

        for spec in &self.derived {
            check_labels(&spec.name, &spec.labels)?;
            if !self.numeric.iter().any(|n| n.name == spec.source) {
                return Err(SchemaError::DerivedSourceNotNumeric {
                    field: spec.name.clone(),
                    source_field: spec.source.clone(),
                });
            }
            if let Derivation::Bins { edges } = &spec.derivation {
                if edges.len() != spec.labels.len() + 1 {
                    return Err(SchemaError::BinMismatch {
                        field: spec.name.clone(),
                        edges: edges.len(),
                        labels: spec.labels.len(),
                    });
                }
                if edges.windows(2).any(|w| w[0] >= w[1]) {
                    return Err(SchemaError::BinEdgesNotAscending(spec.name.clone()));
                }
            }
        }

        Ok(())
    }
}

fn check_labels(field: &str, labels: &[String]) -> Result<(), SchemaError> {
    if labels.is_empty() {
        return Err(SchemaError::EmptyLabelSet(field.to_string()));
    }
    let mut seen = HashSet::new();
    for label in labels {
        if !seen.insert(label.as_str()) {
            return Err(SchemaError::DuplicateLabel {
                field: field.to_string(),
                label: label.clone(),
            });
        }
    }
    Ok(())
}
