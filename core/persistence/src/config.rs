//! FILENAME: core/persistence/src/config.rs
//! Loader configuration: which columns to keep, what to call them, and which
//! cell spellings mean "no answer".

use std::collections::HashSet;
use serde::{Deserialize, Serialize};
use crate::PersistenceError;

/// One whitelisted source column and its canonical name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Header as it appears in the source file.
    pub source: String,

    /// Canonical name used by every downstream component.
    pub name: String,
}

impl ColumnSpec {
    pub fn new(source: impl Into<String>, name: impl Into<String>) -> Self {
        ColumnSpec {
            source: source.into(),
            name: name.into(),
        }
    }

    /// A column kept under its source name.
    pub fn keep(name: impl Into<String>) -> Self {
        let name = name.into();
        ColumnSpec {
            source: name.clone(),
            name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Column whitelist in output order.
    pub columns: Vec<ColumnSpec>,

    #[serde(default)]
    pub null_tokens: Vec<String>,

    /// WHATWG encoding label of the source bytes.
    #[serde(default = "default_encoding")]
    pub encoding: String,

    #[serde(default = "default_delimiter")]
    pub delimiter: char,
}

fn default_encoding() -> String {
    "windows-1252".to_string()
}

fn default_delimiter() -> char {
    ','
}

impl LoaderConfig {
    pub fn new(columns: Vec<ColumnSpec>) -> Self {
        LoaderConfig {
            columns,
            null_tokens: Vec::new(),
            encoding: default_encoding(),
            delimiter: default_delimiter(),
        }
    }

    pub fn with_null_tokens(mut self, tokens: &[&str]) -> Self {
        self.null_tokens = tokens.iter().map(|t| t.to_string()).collect();
        self
    }

    /// The delimiter as the single byte the CSV reader expects.
    pub fn delimiter_byte(&self) -> Result<u8, PersistenceError> {
        if self.delimiter.is_ascii() {
            Ok(self.delimiter as u8)
        } else {
            Err(PersistenceError::InvalidConfig(format!(
                "delimiter '{}' is not an ASCII character",
                self.delimiter
            )))
        }
    }

    /// Rejects an empty whitelist and duplicate canonical names.
    pub fn validate(&self) -> Result<(), PersistenceError> {
        if self.columns.is_empty() {
            return Err(PersistenceError::InvalidConfig(
                "column whitelist is empty".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        for column in &self.columns {
            if !seen.insert(column.name.as_str()) {
                return Err(PersistenceError::InvalidConfig(format!(
                    "canonical column name '{}' is used twice",
                    column.name
                )));
            }
        }
        self.delimiter_byte()?;
        Ok(())
    }
}

// ============================================================================
// NULL TOKENS
// ============================================================================

/// Set of cell spellings treated as missing.
///
/// Matching ignores case and whitespace, so `IAP, DK, NA, uncodeable` and
/// `IAP,DK,NA,uncodeable` are the same token. Blank cells are always missing.
#[derive(Debug, Clone, Default)]
pub struct NullTokens {
    tokens: HashSet<String>,
}

impl NullTokens {
    pub fn new<S: AsRef<str>>(tokens: &[S]) -> Self {
        NullTokens {
            tokens: tokens.iter().map(|t| Self::canonical(t.as_ref())).collect(),
        }
    }

    pub fn is_null(&self, cell: &str) -> bool {
        let key = Self::canonical(cell);
        key.is_empty() || self.tokens.contains(&key)
    }

    fn canonical(cell: &str) -> String {
        cell.chars()
            .filter(|c| !c.is_whitespace())
            .flat_map(char::to_uppercase)
            .collect()
    }
}
