//! FILENAME: core/crosstab-engine/src/summary.rs
//! Numeric summaries per categorical group (average income by sex, and so on).
//!
//! Missing numeric cells are skipped per value field, so a record that failed
//! numeric coercion drops out of that field's statistics only.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use engine::{Dataset, FieldIndex};
use crate::cache::{all_group_keys, AggregateAccumulator, AxisCache, GroupKey, VALUE_ID_EMPTY};
use crate::definition::SummarySpec;
use crate::error::BuildError;

/// Statistics of one numeric field within one group. Quartiles use linear
/// interpolation between order statistics, the usual box-plot convention.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldStats {
    pub count: u64,
    pub mean: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub std_dev: Option<f64>,
    pub q1: Option<f64>,
    pub median: Option<f64>,
    pub q3: Option<f64>,
}

impl FieldStats {
    fn from_samples(samples: &mut GroupSamples) -> Self {
        samples.values.sort_by(f64::total_cmp);
        let acc = &samples.acc;
        FieldStats {
            count: acc.count,
            mean: acc.mean(),
            min: acc.min,
            max: acc.max,
            std_dev: acc.std_dev(),
            q1: quantile(&samples.values, 0.25),
            median: quantile(&samples.values, 0.5),
            q3: quantile(&samples.values, 0.75),
        }
    }
}

/// Running statistics plus the raw values, kept for the quartiles.
#[derive(Debug, Clone, Default)]
struct GroupSamples {
    acc: AggregateAccumulator,
    values: Vec<f64>,
}

impl GroupSamples {
    fn add(&mut self, n: f64) {
        self.acc.add_number(n);
        self.values.push(n);
    }
}

/// `p`-quantile of ascending `sorted`.
fn quantile(sorted: &[f64], p: f64) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;
    let position = p * last as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    /// One label per grouping field.
    pub group: Vec<String>,
    /// One entry per value field.
    pub stats: Vec<FieldStats>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryTable {
    pub group_by: Vec<String>,
    pub values: Vec<String>,
    /// Every label combination in declared order, empty groups included.
    pub rows: Vec<SummaryRow>,
}

impl SummaryTable {
    pub fn row(&self, group: &[&str]) -> Option<&SummaryRow> {
        self.rows.iter().find(|r| {
            r.group.len() == group.len() && r.group.iter().zip(group).all(|(a, b)| a == b)
        })
    }

    pub fn stats(&self, group: &[&str], value_field: &str) -> Option<&FieldStats> {
        let column = self.values.iter().position(|v| v == value_field)?;
        self.row(group)?.stats.get(column)
    }
}

/// Computes a summary table in one pass over the dataset.
pub fn build_summary(dataset: &Dataset, spec: &SummarySpec) -> Result<SummaryTable, BuildError> {
    let axes = spec
        .group_by
        .iter()
        .map(|name| AxisCache::new(dataset, name))
        .collect::<Result<Vec<_>, _>>()?;

    let mut value_indices: Vec<FieldIndex> = Vec::with_capacity(spec.values.len());
    for name in &spec.values {
        let index = dataset
            .field_index(name)
            .ok_or_else(|| BuildError::UnknownField(name.clone()))?;
        if !dataset.is_numeric(name) {
            return Err(BuildError::NotNumeric(name.clone()));
        }
        value_indices.push(index);
    }

    let mut groups: FxHashMap<GroupKey, Vec<GroupSamples>> = FxHashMap::default();
    'records: for record in dataset.records() {
        let mut key = GroupKey::with_capacity(axes.len());
        for axis in &axes {
            let id = axis.value_id(record)?;
            if id == VALUE_ID_EMPTY {
                continue 'records;
            }
            key.push(id);
        }

        let samples = groups
            .entry(key)
            .or_insert_with(|| vec![GroupSamples::default(); value_indices.len()]);
        for (group, &index) in samples.iter_mut().zip(&value_indices) {
            if let Some(n) = record.get(index).as_number() {
                group.add(n);
            }
        }
    }

    let rows = all_group_keys(&axes)
        .into_iter()
        .map(|key| {
            let group = key
                .iter()
                .zip(&axes)
                .map(|(&id, axis)| axis.labels()[id as usize].clone())
                .collect();
            let stats = match groups.get_mut(&key) {
                Some(samples) => samples.iter_mut().map(FieldStats::from_samples).collect(),
                None => vec![FieldStats::default(); value_indices.len()],
            };
            SummaryRow { group, stats }
        })
        .collect();

    Ok(SummaryTable {
        group_by: spec.group_by.clone(),
        values: spec.values.clone(),
        rows,
    })
}
