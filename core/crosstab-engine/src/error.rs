//! FILENAME: core/crosstab-engine/src/error.rs

use thiserror::Error;

/// Configuration errors found while building tables. Any of these aborts the
/// build: an inconsistent index is never served.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("field '{0}' is not part of the cleaned dataset")]
    UnknownField(String),

    #[error("field '{0}' is not categorical")]
    NotCategorical(String),

    #[error("field '{0}' is not numeric")]
    NotNumeric(String),

    #[error("aggregation pairs field '{0}' with itself")]
    SameField(String),

    #[error("fields '{0}' and '{1}' are aggregated more than once")]
    DuplicateAggregation(String, String),

    #[error("value '{label}' of field '{field}' is outside its declared labels")]
    LabelOutsideDomain { field: String, label: String },
}

/// Errors returned to a caller of `CrosstabIndex::resolve`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("unknown field '{0}'")]
    UnknownField(String),

    #[error("x and group are both '{0}'")]
    SameField(String),

    #[error("no precomputed aggregation for '{x}' grouped by '{group}'")]
    NoPrecomputedAggregation { x: String, group: String },
}
