//! FILENAME: core/engine/src/lib.rs
//! PURPOSE: Main library entry point for the survey data engine.
//! CONTEXT: Re-exports the record model, field descriptors and the normalizer
//! for use by the persistence, crosstab and app crates.

pub mod field;
pub mod normalizer;
pub mod record;
pub mod schema;
pub mod value;

// Re-export commonly used types at the crate root
pub use field::{CategoricalField, FieldDescriptor, FieldIndex, FieldKind};
pub use normalizer::{DataDefect, DefectKind, DefectSummary, NormalizationReport, Normalizer};
pub use record::{Dataset, RawDataset, Record};
pub use schema::{
    CategoricalSpec, Derivation, DerivedSpec, NormalizerConfig, NumericSpec, SchemaError,
};
pub use value::{format_number, FieldValue};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integration_test_normalize_workflow() {
        let config = NormalizerConfig {
            numeric: vec![NumericSpec::new("age")],
            categorical: vec![CategoricalSpec::new("sex", &["Male", "Female"])
                .with_codes(&[("male", "Male"), ("female", "Female")])],
            derived: Vec::new(),
        };
        let normalizer = Normalizer::new(config).unwrap();

        let mut raw = RawDataset::new(vec!["sex".to_string(), "age".to_string()]);
        raw.rows.push(Record::new(0, vec![FieldValue::text("female"), FieldValue::text("51")]));
        raw.rows.push(Record::new(1, vec![FieldValue::Missing, FieldValue::text("23")]));

        let (dataset, report) = normalizer.normalize(&raw).unwrap();
        assert!(report.is_clean());
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.count_present(&[0, 1]), 1);
        assert_eq!(dataset.records()[0].values[0], FieldValue::text("Female"));
    }
}
