//! FILENAME: core/engine/src/record.rs
//! PURPOSE: Row containers for the raw (loaded) and cleaned (normalized) dataset.
//! CONTEXT: Both containers are built once and never mutated afterwards.

use serde::{Deserialize, Serialize};
use crate::field::{CategoricalField, FieldDescriptor, FieldIndex, FieldKind};
use crate::value::FieldValue;

// ============================================================================
// RECORD
// ============================================================================

/// One respondent row. Values are stored in schema order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// The original row index in the source data (0-based, excluding header).
    pub source_row: u32,

    pub values: Vec<FieldValue>,
}

impl Record {
    pub fn new(source_row: u32, values: Vec<FieldValue>) -> Self {
        Record { source_row, values }
    }

    /// Returns the value at `index`, treating out-of-range as missing.
    pub fn get(&self, index: FieldIndex) -> &FieldValue {
        static MISSING: FieldValue = FieldValue::Missing;
        self.values.get(index).unwrap_or(&MISSING)
    }
}

// ============================================================================
// RAW DATASET
// ============================================================================

/// Loader output: canonical column names and untyped cells.
/// Every cell is either `FieldValue::Missing` or `FieldValue::Text`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawDataset {
    pub columns: Vec<String>,
    pub rows: Vec<Record>,
}

impl RawDataset {
    pub fn new(columns: Vec<String>) -> Self {
        RawDataset {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn column_index(&self, name: &str) -> Option<FieldIndex> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ============================================================================
// CLEANED DATASET
// ============================================================================

/// Normalizer output: typed records plus the descriptor of every field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    fields: Vec<FieldDescriptor>,
    categorical: Vec<CategoricalField>,
    records: Vec<Record>,
}

impl Dataset {
    pub fn new(
        fields: Vec<FieldDescriptor>,
        categorical: Vec<CategoricalField>,
        records: Vec<Record>,
    ) -> Self {
        Dataset {
            fields,
            categorical,
            records,
        }
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn field_index(&self, name: &str) -> Option<FieldIndex> {
        self.fields.iter().position(|f| f.name == name)
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Descriptor of a categorical field, `None` for numeric/text/unknown fields.
    pub fn categorical(&self, name: &str) -> Option<&CategoricalField> {
        self.categorical.iter().find(|c| c.name == name)
    }

    pub fn categorical_fields(&self) -> &[CategoricalField] {
        &self.categorical
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn is_numeric(&self, name: &str) -> bool {
        matches!(self.field(name), Some(f) if f.kind == FieldKind::Numeric)
    }

    /// Number of records with a non-missing value on every listed field.
    pub fn count_present(&self, indices: &[FieldIndex]) -> usize {
        self.records
            .iter()
            .filter(|r| indices.iter().all(|&i| !r.get(i).is_missing()))
            .count()
    }
}
