//! FILENAME: app/src/text.rs
//! PURPOSE: Plain-text rendering of views, summaries and defect reports for the CLI.

use std::fmt::Write;

use crosstab_engine::{FieldStats, SummaryTable, TableView};
use engine::DefectSummary;

use crate::presentation::title_for;

fn pad(cell: &str, width: usize) -> String {
    format!("{:>width$}", cell, width = width)
}

/// Renders rows as right-aligned columns. The first row is the header.
fn columns(rows: &[Vec<String>]) -> String {
    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    let widths: Vec<usize> = (0..width)
        .map(|c| {
            rows.iter()
                .filter_map(|r| r.get(c))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    for row in rows {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, &w)| pad(cell, w))
            .collect();
        let _ = writeln!(out, "{}", line.join("  ").trim_end());
    }
    out
}

/// Counts with group labels down the side and x labels across the top.
pub fn render_view(view: &TableView<'_>) -> String {
    let mut rows = Vec::with_capacity(view.group_labels().len() + 1);

    let mut header = vec![view.group_field().to_string()];
    header.extend(view.x_labels().iter().cloned());
    rows.push(header);

    for series in view.series() {
        let mut row = vec![series.group_label];
        row.extend(series.counts.iter().map(u64::to_string));
        rows.push(row);
    }

    format!("{}\n\n{}", title_for(view.x_field()), columns(&rows))
}

fn stat(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.2}", v))
}

const STAT_COLUMNS: [&str; 6] = ["n", "mean", "sd", "q1", "median", "q3"];

fn stats_cells(stats: &FieldStats) -> [String; 6] {
    [
        stats.count.to_string(),
        stat(stats.mean),
        stat(stats.std_dev),
        stat(stats.q1),
        stat(stats.median),
        stat(stats.q3),
    ]
}

/// One line per group: count, mean, standard deviation and quartiles of each
/// value field.
pub fn render_summary(summary: &SummaryTable) -> String {
    let mut header: Vec<String> = summary.group_by.clone();
    for value in &summary.values {
        header.extend(STAT_COLUMNS.iter().map(|c| format!("{} {}", value, c)));
    }

    let mut rows = vec![header];
    for row in &summary.rows {
        let mut cells = row.group.clone();
        for stats in &row.stats {
            cells.extend(stats_cells(stats));
        }
        rows.push(cells);
    }
    columns(&rows)
}

pub fn render_defects(summary: &[DefectSummary]) -> String {
    if summary.is_empty() {
        return "No data defects.\n".to_string();
    }
    let mut out = String::new();
    for entry in summary {
        let _ = writeln!(
            out,
            "{:?}: field '{}', raw value '{}' x{}",
            entry.kind, entry.field, entry.raw, entry.count
        );
    }
    out
}
