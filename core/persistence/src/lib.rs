//! FILENAME: core/persistence/src/lib.rs
//! Survey Persistence Module
//!
//! Handles reading the raw survey extract (CSV) into a `RawDataset` of
//! canonical columns. This is the only crate that touches bytes or files.

mod config;
mod csv_reader;
mod error;

pub use config::{ColumnSpec, LoaderConfig, NullTokens};
pub use csv_reader::{load_csv, load_reader};
pub use error::PersistenceError;
