//! FILENAME: core/engine/src/field.rs
//! PURPOSE: Field descriptors for the cleaned dataset.
//! CONTEXT: A `CategoricalField` carries the canonical label order of a field.
//! The order is metadata only; it never reorders stored records, but every
//! table built from the field enumerates its axis in this order.

use serde::{Deserialize, Serialize};

/// Index of a field within a dataset's schema (0-based).
pub type FieldIndex = usize;

/// The storage kind of a field after normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldKind {
    Numeric,
    Categorical,
    /// Raw text passed through without a mapping.
    Text,
}

/// Name and kind of one column of the cleaned dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    pub kind: FieldKind,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        FieldDescriptor {
            name: name.into(),
            kind,
        }
    }
}

/// A field bound to an explicitly ordered set of canonical labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoricalField {
    pub name: String,
    labels: Vec<String>,
}

impl CategoricalField {
    pub fn new(name: impl Into<String>, labels: Vec<String>) -> Self {
        CategoricalField {
            name: name.into(),
            labels,
        }
    }

    /// Labels in canonical display order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Position of a label in the canonical order.
    pub fn position(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|l| l == label)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.position(label).is_some()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
