//! FILENAME: core/crosstab-engine/src/lib.rs
//! Cross-tabulation subsystem.
//!
//! Every configured (field, field) pair is counted once, at build time, into
//! a `Table`. Requests afterwards only select among those tables.
//!
//! Layers:
//! - `definition`: Serializable configuration (which tables exist)
//! - `cache`: Label interning and accumulators (HOW we count)
//! - `view`: Tables and the read-only views handed to callers (WHAT we serve)
//! - `aggregator`: Builds tables from a cleaned dataset
//! - `index`: Unordered-pair lookup and `resolve`
//! - `summary`: Numeric statistics per categorical group

pub mod aggregator;
pub mod cache;
pub mod definition;
pub mod error;
pub mod index;
pub mod summary;
pub mod view;

pub use definition::*;
pub use error::{BuildError, ResolveError};
pub use aggregator::{build_table, build_tables};
pub use index::CrosstabIndex;
pub use summary::{build_summary, FieldStats, SummaryRow, SummaryTable};
pub use view::{Series, Table, TableView};
