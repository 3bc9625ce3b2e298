//! FILENAME: app/src/error.rs
//! PURPOSE: Top-level error type for building and querying the explorer.

use thiserror::Error;

use crosstab_engine::{BuildError, ResolveError};
use engine::SchemaError;
use persistence::PersistenceError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration file: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Load error: {0}")]
    Load(#[from] PersistenceError),

    #[error("Normalizer configuration error: {0}")]
    Schema(#[from] SchemaError),

    #[error("Aggregation error: {0}")]
    Build(#[from] BuildError),

    #[error("Query error: {0}")]
    Resolve(#[from] ResolveError),

    #[error("Normalization found {count} data defect(s) and the defect policy is 'reject'")]
    DefectsRejected { count: usize },

    #[error("Cannot serialize output: {0}")]
    Output(serde_json::Error),
}
