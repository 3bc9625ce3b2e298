//! FILENAME: core/crosstab-engine/src/view.rs
//! Crosstab View - the tables served to the chart layer.
//!
//! A `Table` is stored once in the orientation it was configured with. Callers receive a
//! `TableView`, a read-only borrow that may present the table transposed so
//! the requested x field is always the column axis.

use serde::{Deserialize, Serialize};
use engine::CategoricalField;

// ============================================================================
// TABLE
// ============================================================================

/// Two-way frequency table: `counts[row][col]`.
///
/// Columns enumerate the column field's declared labels, rows the row
/// field's. Combinations with no records are explicit zeros.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    column_field: String,
    row_field: String,
    column_labels: Vec<String>,
    row_labels: Vec<String>,
    counts: Vec<Vec<u64>>,
}

impl Table {
    /// An all-zero table over the full label sets of both fields.
    pub fn zeros(column: &CategoricalField, row: &CategoricalField) -> Self {
        Table {
            column_field: column.name.clone(),
            row_field: row.name.clone(),
            column_labels: column.labels().to_vec(),
            row_labels: row.labels().to_vec(),
            counts: vec![vec![0; column.len()]; row.len()],
        }
    }

    pub(crate) fn increment(&mut self, row: usize, col: usize) {
        self.counts[row][col] += 1;
    }

    pub fn column_field(&self) -> &str {
        &self.column_field
    }

    pub fn row_field(&self) -> &str {
        &self.row_field
    }

    pub fn column_labels(&self) -> &[String] {
        &self.column_labels
    }

    pub fn row_labels(&self) -> &[String] {
        &self.row_labels
    }

    pub fn counts(&self) -> &[Vec<u64>] {
        &self.counts
    }

    pub fn count(&self, row: usize, col: usize) -> Option<u64> {
        self.counts.get(row).and_then(|r| r.get(col)).copied()
    }

    /// Count for a (column label, row label) pair.
    pub fn count_by_label(&self, column_label: &str, row_label: &str) -> Option<u64> {
        let col = self.column_labels.iter().position(|l| l == column_label)?;
        let row = self.row_labels.iter().position(|l| l == row_label)?;
        self.count(row, col)
    }

    /// Sum of every cell.
    pub fn total(&self) -> u64 {
        self.counts.iter().flatten().sum()
    }

    pub fn column_totals(&self) -> Vec<u64> {
        (0..self.column_labels.len())
            .map(|c| self.counts.iter().map(|r| r[c]).sum())
            .collect()
    }

    pub fn row_totals(&self) -> Vec<u64> {
        self.counts.iter().map(|r| r.iter().sum()).collect()
    }

    /// The same counts with the axes swapped.
    pub fn transposed(&self) -> Table {
        let counts = (0..self.column_labels.len())
            .map(|c| self.counts.iter().map(|r| r[c]).collect())
            .collect();
        Table {
            column_field: self.row_field.clone(),
            row_field: self.column_field.clone(),
            column_labels: self.row_labels.clone(),
            row_labels: self.column_labels.clone(),
            counts,
        }
    }
}

// ============================================================================
// TABLE VIEW
// ============================================================================

/// Read-only view of a stored table with `x` as the column axis and `group`
/// as the row axis. Transposition is index arithmetic, nothing is copied.
#[derive(Debug, Clone, Copy)]
pub struct TableView<'a> {
    table: &'a Table,
    transposed: bool,
}

/// One bar series of a grouped bar chart: a group label and its count per
/// x label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Series {
    pub group_label: String,
    pub counts: Vec<u64>,
}

impl<'a> TableView<'a> {
    pub(crate) fn new(table: &'a Table, transposed: bool) -> Self {
        TableView { table, transposed }
    }

    /// Whether the stored table had to be transposed to put `x` on columns.
    pub fn is_transposed(&self) -> bool {
        self.transposed
    }

    /// The stored table, in the orientation it was configured with.
    pub fn stored(&self) -> &'a Table {
        self.table
    }

    pub fn x_field(&self) -> &'a str {
        if self.transposed {
            self.table.row_field()
        } else {
            self.table.column_field()
        }
    }

    pub fn group_field(&self) -> &'a str {
        if self.transposed {
            self.table.column_field()
        } else {
            self.table.row_field()
        }
    }

    pub fn x_labels(&self) -> &'a [String] {
        if self.transposed {
            self.table.row_labels()
        } else {
            self.table.column_labels()
        }
    }

    pub fn group_labels(&self) -> &'a [String] {
        if self.transposed {
            self.table.column_labels()
        } else {
            self.table.row_labels()
        }
    }

    /// Count at (group index, x index).
    pub fn count(&self, group: usize, x: usize) -> Option<u64> {
        if self.transposed {
            self.table.count(x, group)
        } else {
            self.table.count(group, x)
        }
    }

    pub fn count_by_label(&self, x_label: &str, group_label: &str) -> Option<u64> {
        let x = self.x_labels().iter().position(|l| l == x_label)?;
        let group = self.group_labels().iter().position(|l| l == group_label)?;
        self.count(group, x)
    }

    pub fn total(&self) -> u64 {
        self.table.total()
    }

    /// `counts[group][x]` in view orientation.
    pub fn counts(&self) -> Vec<Vec<u64>> {
        (0..self.group_labels().len())
            .map(|g| {
                (0..self.x_labels().len())
                    .map(|x| self.count(g, x).unwrap_or(0))
                    .collect()
            })
            .collect()
    }

    /// One series per group label, in declared order.
    pub fn series(&self) -> Vec<Series> {
        self.group_labels()
            .iter()
            .zip(self.counts())
            .map(|(label, counts)| Series {
                group_label: label.clone(),
                counts,
            })
            .collect()
    }

    /// An owned table in view orientation.
    pub fn to_table(&self) -> Table {
        if self.transposed {
            self.table.transposed()
        } else {
            self.table.clone()
        }
    }
}
