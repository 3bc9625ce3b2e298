//! FILENAME: core/engine/src/normalizer.rs
//! Normalizer - turns loaded text cells into typed, canonically labelled values.
//!
//! Every categorical column is mapped through an explicit code table. A raw
//! code outside that table becomes missing and is recorded as a defect, so a
//! data-quality problem is never hidden behind a silently dropped row.
//! Numeric columns are parsed after sentinel substitution; a cell that still
//! fails to parse becomes missing, which removes the record from numeric
//! aggregations only (its categorical values are kept).

use std::collections::{BTreeMap, HashMap};
use log::{info, warn};
use serde::Serialize;
use thiserror::Error;
use crate::field::{CategoricalField, FieldDescriptor, FieldIndex, FieldKind};
use crate::record::{Dataset, RawDataset, Record};
use crate::schema::{
    CategoricalSpec, Derivation, DerivedSpec, NormalizerConfig, NumericSpec, SchemaError,
};
use crate::value::{format_number, FieldValue};

// ============================================================================
// DEFECTS
// ============================================================================

/// A data-quality problem found while normalizing one cell.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DataDefect {
    #[error("unmapped categorical value '{raw}' in field '{field}' (row {row})")]
    UnmappedCategoricalValue { field: String, raw: String, row: u32 },

    #[error("cannot coerce '{raw}' to a number in field '{field}' (row {row})")]
    TypeCoercion { field: String, raw: String, row: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum DefectKind {
    UnmappedCategoricalValue,
    TypeCoercion,
}

impl DataDefect {
    pub fn kind(&self) -> DefectKind {
        match self {
            DataDefect::UnmappedCategoricalValue { .. } => DefectKind::UnmappedCategoricalValue,
            DataDefect::TypeCoercion { .. } => DefectKind::TypeCoercion,
        }
    }

    pub fn field(&self) -> &str {
        match self {
            DataDefect::UnmappedCategoricalValue { field, .. }
            | DataDefect::TypeCoercion { field, .. } => field,
        }
    }

    pub fn raw(&self) -> &str {
        match self {
            DataDefect::UnmappedCategoricalValue { raw, .. }
            | DataDefect::TypeCoercion { raw, .. } => raw,
        }
    }

    pub fn row(&self) -> u32 {
        match self {
            DataDefect::UnmappedCategoricalValue { row, .. }
            | DataDefect::TypeCoercion { row, .. } => *row,
        }
    }
}

/// Occurrences of one distinct (kind, field, raw value) defect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DefectSummary {
    pub kind: DefectKind,
    pub field: String,
    pub raw: String,
    pub count: usize,
}

/// Every defect found during one normalization pass, in row order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizationReport {
    defects: Vec<DataDefect>,
}

impl NormalizationReport {
    pub fn defects(&self) -> &[DataDefect] {
        &self.defects
    }

    pub fn is_clean(&self) -> bool {
        self.defects.is_empty()
    }

    pub fn len(&self) -> usize {
        self.defects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defects.is_empty()
    }

    pub fn count(&self, kind: DefectKind) -> usize {
        self.defects.iter().filter(|d| d.kind() == kind).count()
    }

    /// Distinct defects with their occurrence counts, sorted by kind, field
    /// and raw value.
    pub fn summary(&self) -> Vec<DefectSummary> {
        let mut counts: BTreeMap<(DefectKind, &str, &str), usize> = BTreeMap::new();
        for defect in &self.defects {
            *counts
                .entry((defect.kind(), defect.field(), defect.raw()))
                .or_insert(0) += 1;
        }
        counts
            .into_iter()
            .map(|((kind, field, raw), count)| DefectSummary {
                kind,
                field: field.to_string(),
                raw: raw.to_string(),
                count,
            })
            .collect()
    }

    fn push(&mut self, defect: DataDefect) {
        self.defects.push(defect);
    }
}

// ============================================================================
// COLUMN PLAN
// ============================================================================

/// What to do with each loaded column, resolved once per pass.
enum ColumnPlan<'a> {
    Numeric(&'a NumericSpec),
    Categorical(&'a CategoricalRule),
    Passthrough,
}

/// A categorical spec with its effective code table.
struct CategoricalRule {
    field: CategoricalField,
    codes: HashMap<String, String>,
}

impl CategoricalRule {
    fn from_spec(spec: &CategoricalSpec) -> Self {
        CategoricalRule {
            field: CategoricalField::new(spec.name.clone(), spec.labels.clone()),
            codes: spec.code_table().into_iter().collect(),
        }
    }
}

// ============================================================================
// NORMALIZER
// ============================================================================

/// Applies a validated `NormalizerConfig` to a raw dataset.
pub struct Normalizer {
    config: NormalizerConfig,
    rules: Vec<CategoricalRule>,
    derived_fields: Vec<CategoricalField>,
}

impl Normalizer {
    pub fn new(config: NormalizerConfig) -> Result<Self, SchemaError> {
        config.validate()?;
        let rules = config.categorical.iter().map(CategoricalRule::from_spec).collect();
        let derived_fields = config
            .derived
            .iter()
            .map(|d| CategoricalField::new(d.name.clone(), d.labels.clone()))
            .collect();
        Ok(Normalizer {
            config,
            rules,
            derived_fields,
        })
    }

    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    /// Descriptors of every categorical field this normalizer produces,
    /// declared fields first, then derived ones.
    pub fn categorical_fields(&self) -> Vec<CategoricalField> {
        self.rules
            .iter()
            .map(|r| r.field.clone())
            .chain(self.derived_fields.iter().cloned())
            .collect()
    }

    /// Cleans every row of `raw`. Schema problems abort; data problems are
    /// collected into the returned report.
    pub fn normalize(&self, raw: &RawDataset) -> Result<(Dataset, NormalizationReport), SchemaError> {
        for name in self
            .config
            .numeric
            .iter()
            .map(|n| &n.name)
            .chain(self.config.categorical.iter().map(|c| &c.name))
        {
            if raw.column_index(name).is_none() {
                return Err(SchemaError::MissingColumn(name.clone()));
            }
        }
        for derived in &self.config.derived {
            if raw.column_index(&derived.name).is_some() {
                return Err(SchemaError::DuplicateField(derived.name.clone()));
            }
        }

        let plans: Vec<ColumnPlan> = raw.columns.iter().map(|c| self.plan_for(c)).collect();

        let mut fields: Vec<FieldDescriptor> = raw
            .columns
            .iter()
            .zip(plans.iter())
            .map(|(name, plan)| {
                let kind = match plan {
                    ColumnPlan::Numeric(_) => FieldKind::Numeric,
                    ColumnPlan::Categorical(_) => FieldKind::Categorical,
                    ColumnPlan::Passthrough => FieldKind::Text,
                };
                FieldDescriptor::new(name.clone(), kind)
            })
            .collect();

        // Sources are validated as numeric specs, and every numeric spec was
        // checked against the raw columns above.
        let derived_sources: Vec<FieldIndex> = self
            .config
            .derived
            .iter()
            .map(|d| raw.column_index(&d.source).unwrap_or(usize::MAX))
            .collect();
        fields.extend(
            self.config
                .derived
                .iter()
                .map(|d| FieldDescriptor::new(d.name.clone(), FieldKind::Categorical)),
        );

        let mut report = NormalizationReport::default();
        let mut records = Vec::with_capacity(raw.rows.len());

        for row in &raw.rows {
            let mut values = Vec::with_capacity(fields.len());
            for (index, plan) in plans.iter().enumerate() {
                let cell = row.get(index);
                let value = match plan {
                    ColumnPlan::Numeric(spec) => coerce_numeric(spec, cell, row.source_row, &mut report),
                    ColumnPlan::Categorical(rule) => map_categorical(rule, cell, row.source_row, &mut report),
                    ColumnPlan::Passthrough => cell.clone(),
                };
                values.push(value);
            }

            for (spec, &source) in self.config.derived.iter().zip(derived_sources.iter()) {
                let source_value = values.get(source).and_then(FieldValue::as_number);
                values.push(derive(spec, source_value, row.source_row, &mut report));
            }

            records.push(Record::new(row.source_row, values));
        }

        for entry in report.summary() {
            warn!(
                "{:?} in field '{}': raw value '{}' seen {} time(s), treated as missing",
                entry.kind, entry.field, entry.raw, entry.count
            );
        }
        info!(
            "Normalized {} records across {} fields ({} defects)",
            records.len(),
            fields.len(),
            report.len()
        );

        Ok((Dataset::new(fields, self.categorical_fields(), records), report))
    }

    fn plan_for(&self, column: &str) -> ColumnPlan<'_> {
        if let Some(spec) = self.config.numeric.iter().find(|n| n.name == column) {
            ColumnPlan::Numeric(spec)
        } else if let Some(rule) = self.rules.iter().find(|r| r.field.name == column) {
            ColumnPlan::Categorical(rule)
        } else {
            ColumnPlan::Passthrough
        }
    }
}

fn coerce_numeric(
    spec: &NumericSpec,
    cell: &FieldValue,
    row: u32,
    report: &mut NormalizationReport,
) -> FieldValue {
    let raw = match cell {
        FieldValue::Missing => return FieldValue::Missing,
        FieldValue::Number(n) => return FieldValue::Number(*n),
        FieldValue::Text(s) => s.trim(),
    };
    if let Some(&boundary) = spec.sentinels.get(raw) {
        return FieldValue::Number(boundary);
    }
    // NaN and infinities parse as f64 but are not survey values.
    match raw.parse::<f64>() {
        Ok(n) if n.is_finite() => FieldValue::Number(n),
        _ => {
            report.push(DataDefect::TypeCoercion {
                field: spec.name.clone(),
                raw: raw.to_string(),
                row,
            });
            FieldValue::Missing
        }
    }
}

fn map_categorical(
    rule: &CategoricalRule,
    cell: &FieldValue,
    row: u32,
    report: &mut NormalizationReport,
) -> FieldValue {
    let raw = match cell {
        FieldValue::Missing => return FieldValue::Missing,
        FieldValue::Number(n) => format_number(*n),
        FieldValue::Text(s) => s.trim().to_string(),
    };
    match rule.codes.get(&raw) {
        Some(label) => FieldValue::Text(label.clone()),
        None => {
            report.push(DataDefect::UnmappedCategoricalValue {
                field: rule.field.name.clone(),
                raw,
                row,
            });
            FieldValue::Missing
        }
    }
}

fn derive(
    spec: &DerivedSpec,
    source: Option<f64>,
    row: u32,
    report: &mut NormalizationReport,
) -> FieldValue {
    let Some(value) = source else {
        return FieldValue::Missing;
    };
    match &spec.derivation {
        Derivation::IntegerLabel => {
            let label = format_number(value);
            if spec.labels.contains(&label) {
                FieldValue::Text(label)
            } else {
                report.push(DataDefect::UnmappedCategoricalValue {
                    field: spec.name.clone(),
                    raw: label,
                    row,
                });
                FieldValue::Missing
            }
        }
        Derivation::Bins { edges } => edges
            .windows(2)
            .position(|w| value > w[0] && value <= w[1])
            .and_then(|i| spec.labels.get(i))
            .map(|label| FieldValue::Text(label.clone()))
            .unwrap_or(FieldValue::Missing),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> NormalizerConfig {
        NormalizerConfig {
            numeric: vec![
                NumericSpec::new("age").with_sentinel("89 or older", 89.0),
                NumericSpec::new("education"),
                NumericSpec::new("job_prestige"),
            ],
            categorical: vec![
                CategoricalSpec::new("sex", &["Male", "Female"])
                    .with_codes(&[("male", "Male"), ("female", "Female")]),
                CategoricalSpec::new("region", &["pacific", "new england"]),
            ],
            derived: vec![
                DerivedSpec {
                    name: "edu_cat".to_string(),
                    source: "education".to_string(),
                    labels: (0..=20).map(|n| n.to_string()).collect(),
                    derivation: Derivation::IntegerLabel,
                },
                DerivedSpec {
                    name: "prestige_category".to_string(),
                    source: "job_prestige".to_string(),
                    labels: vec!["Low".to_string(), "High".to_string()],
                    derivation: Derivation::Bins { edges: vec![15.0, 50.0, 81.0] },
                },
            ],
        }
    }

    fn raw(rows: &[[&str; 5]]) -> RawDataset {
        let mut raw = RawDataset::new(
            ["age", "sex", "region", "education", "job_prestige"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        );
        for (i, row) in rows.iter().enumerate() {
            let values = row
                .iter()
                .map(|cell| {
                    if cell.is_empty() {
                        FieldValue::Missing
                    } else {
                        FieldValue::text(*cell)
                    }
                })
                .collect();
            raw.rows.push(Record::new(i as u32, values));
        }
        raw
    }

    #[test]
    fn test_maps_codes_and_parses_numbers() {
        let normalizer = Normalizer::new(config()).unwrap();
        let (ds, report) = normalizer
            .normalize(&raw(&[["42", "male", "pacific", "12", "50"]]))
            .unwrap();

        assert!(report.is_clean());
        let record = &ds.records()[0];
        assert_eq!(record.values[0], FieldValue::Number(42.0));
        assert_eq!(record.values[1], FieldValue::text("Male"));
        assert_eq!(record.values[2], FieldValue::text("pacific"));
        assert_eq!(record.values[5], FieldValue::text("12"));
        assert_eq!(record.values[6], FieldValue::text("Low"));
    }

    #[test]
    fn test_sentinel_substitution() {
        let normalizer = Normalizer::new(config()).unwrap();
        let (ds, report) = normalizer
            .normalize(&raw(&[["89 or older", "female", "", "", ""]]))
            .unwrap();

        assert!(report.is_clean());
        assert_eq!(ds.records()[0].values[0], FieldValue::Number(89.0));
        assert!(ds.records()[0].values[2].is_missing());
    }

    #[test]
    fn test_unmapped_value_is_reported() {
        let normalizer = Normalizer::new(config()).unwrap();
        let (ds, report) = normalizer
            .normalize(&raw(&[
                ["30", "MALE", "pacific", "", ""],
                ["31", "MALE", "atlantis", "", ""],
            ]))
            .unwrap();

        assert!(ds.records()[0].values[1].is_missing());
        assert_eq!(report.count(DefectKind::UnmappedCategoricalValue), 3);

        let summary = report.summary();
        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].field, "region");
        assert_eq!(summary[0].raw, "atlantis");
        assert_eq!(summary[1].field, "sex");
        assert_eq!(summary[1].count, 2);
    }

    #[test]
    fn test_type_coercion_keeps_categorical_values() {
        let normalizer = Normalizer::new(config()).unwrap();
        let (ds, report) = normalizer
            .normalize(&raw(&[["thirty", "male", "pacific", "twelve", ""]]))
            .unwrap();

        assert_eq!(report.count(DefectKind::TypeCoercion), 2);
        let record = &ds.records()[0];
        assert!(record.values[0].is_missing());
        assert_eq!(record.values[1], FieldValue::text("Male"));
        // edu_cat follows its numeric source
        assert!(record.values[5].is_missing());
    }

    #[test]
    fn test_integer_label_out_of_domain() {
        let normalizer = Normalizer::new(config()).unwrap();
        let (ds, report) = normalizer
            .normalize(&raw(&[["30", "male", "pacific", "12.5", ""]]))
            .unwrap();

        assert!(ds.records()[0].values[5].is_missing());
        assert_eq!(
            report.defects()[0],
            DataDefect::UnmappedCategoricalValue {
                field: "edu_cat".to_string(),
                raw: "12.5".to_string(),
                row: 0,
            }
        );
    }

    #[test]
    fn test_bins_are_right_closed() {
        let normalizer = Normalizer::new(config()).unwrap();
        let (ds, report) = normalizer
            .normalize(&raw(&[
                ["", "", "", "", "15"],
                ["", "", "", "", "50"],
                ["", "", "", "", "50.5"],
                ["", "", "", "", "90"],
            ]))
            .unwrap();

        assert!(report.is_clean());
        let labels: Vec<FieldValue> = ds.records().iter().map(|r| r.values[6].clone()).collect();
        assert_eq!(
            labels,
            vec![
                FieldValue::Missing,
                FieldValue::text("Low"),
                FieldValue::text("High"),
                FieldValue::Missing,
            ]
        );
    }

    #[test]
    fn test_missing_configured_column() {
        let normalizer = Normalizer::new(config()).unwrap();
        let raw = RawDataset::new(vec!["age".to_string()]);
        assert_eq!(
            normalizer.normalize(&raw).err(),
            Some(SchemaError::MissingColumn("education".to_string()))
        );
    }

    #[test]
    fn test_descriptors_follow_declared_order() {
        let normalizer = Normalizer::new(config()).unwrap();
        let (ds, _) = normalizer
            .normalize(&raw(&[["30", "female", "pacific", "12", "20"]]))
            .unwrap();

        let names: Vec<&str> = ds.categorical_fields().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["sex", "region", "edu_cat", "prestige_category"]);
        assert_eq!(ds.categorical("sex").unwrap().labels(), &["Male", "Female"]);
        assert_eq!(ds.field("edu_cat").unwrap().kind, FieldKind::Categorical);
    }

    #[test]
    fn test_non_finite_numbers_are_defects() {
        let normalizer = Normalizer::new(config()).unwrap();
        let (ds, report) = normalizer
            .normalize(&raw(&[
                ["NaN", "male", "", "", ""],
                ["inf", "male", "", "", ""],
                ["1e400", "male", "", "", ""],
                ["-infinity", "male", "", "", ""],
            ]))
            .unwrap();

        assert_eq!(report.count(DefectKind::TypeCoercion), 4);
        assert!(ds.records().iter().all(|r| r.values[0].is_missing()));
        let raws: Vec<&str> = report.defects().iter().map(|d| d.raw()).collect();
        assert_eq!(raws, vec!["NaN", "inf", "1e400", "-infinity"]);
    }

    #[test]
    fn test_derived_name_clashing_with_loaded_column() {
        let normalizer = Normalizer::new(config()).unwrap();
        let raw = RawDataset::new(
            ["age", "sex", "region", "education", "job_prestige", "edu_cat"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        );
        assert_eq!(
            normalizer.normalize(&raw).err(),
            Some(SchemaError::DuplicateField("edu_cat".to_string()))
        );
    }
}
