//! FILENAME: core/persistence/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV read error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Required column '{column}' is absent from the source")]
    SchemaMismatch { column: String },

    #[error("Unsupported text encoding: {0}")]
    UnsupportedEncoding(String),

    #[error("Invalid loader configuration: {0}")]
    InvalidConfig(String),
}
