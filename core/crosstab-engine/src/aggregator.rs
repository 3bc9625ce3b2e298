//! FILENAME: core/crosstab-engine/src/aggregator.rs
//! Aggregator - counts a cleaned dataset into two-way tables.
//!
//! Algorithm, per aggregation `(column field, row field)`:
//! 1. Resolve both fields to axis caches (fails fast on unknown or
//!    non-categorical fields)
//! 2. Start from an all-zero table over both declared label sets
//! 3. For each record present on both fields, increment its cell
//!
//! Cell positions come from declared label order only, so the same data
//! always produces the same table regardless of row order.

use log::debug;
use engine::Dataset;
use crate::cache::{AxisCache, VALUE_ID_EMPTY};
use crate::definition::AggregationSpec;
use crate::error::BuildError;
use crate::view::Table;

/// Builds the table for one spec.
pub fn build_table(dataset: &Dataset, spec: &AggregationSpec) -> Result<Table, BuildError> {
    if spec.column_field() == spec.row_field() {
        return Err(BuildError::SameField(spec.column_field().to_string()));
    }

    let column_axis = AxisCache::new(dataset, spec.column_field())?;
    let row_axis = AxisCache::new(dataset, spec.row_field())?;
    let mut table = Table::zeros(column_axis.descriptor, row_axis.descriptor);

    for record in dataset.records() {
        let col = column_axis.value_id(record)?;
        let row = row_axis.value_id(record)?;
        if col == VALUE_ID_EMPTY || row == VALUE_ID_EMPTY {
            continue;
        }
        table.increment(row as usize, col as usize);
    }

    debug!(
        "Built table {} x {}: {} x {} cells, {} records counted",
        spec.column_field(),
        spec.row_field(),
        column_axis.len(),
        row_axis.len(),
        table.total()
    );
    Ok(table)
}

/// Builds every aggregation's table, in order. The first error aborts.
pub fn build_tables(dataset: &Dataset, specs: &[AggregationSpec]) -> Result<Vec<Table>, BuildError> {
    specs.iter().map(|spec| build_table(dataset, spec)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::{CategoricalField, FieldDescriptor, FieldKind, FieldValue, Record};

    fn labels(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn breadwinner_dataset(rows: &[(&str, &str)]) -> Dataset {
        let records = rows
            .iter()
            .enumerate()
            .map(|(i, (sex, mb))| {
                let cell = |s: &str| {
                    if s.is_empty() {
                        FieldValue::Missing
                    } else {
                        FieldValue::text(s)
                    }
                };
                Record::new(i as u32, vec![cell(*sex), cell(*mb), FieldValue::Number(40.0)])
            })
            .collect();
        Dataset::new(
            vec![
                FieldDescriptor::new("sex", FieldKind::Categorical),
                FieldDescriptor::new("male_breadwinner", FieldKind::Categorical),
                FieldDescriptor::new("age", FieldKind::Numeric),
            ],
            vec![
                CategoricalField::new("sex", labels(&["Male", "Female"])),
                CategoricalField::new(
                    "male_breadwinner",
                    labels(&["Strongly disagree", "Disagree", "Agree", "Strongly agree"]),
                ),
            ],
            records,
        )
    }

    #[test]
    fn test_breadwinner_scenario() {
        let ds = breadwinner_dataset(&[
            ("Male", "Agree"),
            ("Female", "Strongly disagree"),
            ("Male", "Agree"),
        ]);
        let table = build_table(&ds, &AggregationSpec::new("sex", "male_breadwinner")).unwrap();

        assert_eq!(table.column_labels(), &["Male", "Female"]);
        assert_eq!(
            table.row_labels(),
            &["Strongly disagree", "Disagree", "Agree", "Strongly agree"]
        );
        assert_eq!(
            table.counts(),
            &[vec![0, 1], vec![0, 0], vec![2, 0], vec![0, 0]]
        );
    }

    #[test]
    fn test_missing_on_either_dimension_is_skipped() {
        let ds = breadwinner_dataset(&[
            ("Male", ""),
            ("", "Agree"),
            ("Female", "Disagree"),
            ("", ""),
        ]);
        let table = build_table(&ds, &AggregationSpec::new("sex", "male_breadwinner")).unwrap();
        assert_eq!(table.total(), 1);
        assert_eq!(table.total() as usize, ds.count_present(&[0, 1]));
    }

    #[test]
    fn test_row_order_does_not_matter() {
        let forward = breadwinner_dataset(&[
            ("Female", "Agree"),
            ("Male", "Strongly agree"),
            ("Male", "Disagree"),
        ]);
        let backward = breadwinner_dataset(&[
            ("Male", "Disagree"),
            ("Male", "Strongly agree"),
            ("Female", "Agree"),
        ]);
        let spec = AggregationSpec::new("male_breadwinner", "sex");
        assert_eq!(
            build_table(&forward, &spec).unwrap(),
            build_table(&backward, &spec).unwrap()
        );
    }

    #[test]
    fn test_configuration_errors() {
        let ds = breadwinner_dataset(&[("Male", "Agree")]);
        assert_eq!(
            build_table(&ds, &AggregationSpec::new("sex", "satjob")).unwrap_err(),
            BuildError::UnknownField("satjob".to_string())
        );
        assert_eq!(
            build_table(&ds, &AggregationSpec::new("age", "sex")).unwrap_err(),
            BuildError::NotCategorical("age".to_string())
        );
        assert_eq!(
            build_table(&ds, &AggregationSpec::new("sex", "sex")).unwrap_err(),
            BuildError::SameField("sex".to_string())
        );
    }

    #[test]
    fn test_undeclared_label_fails_the_build() {
        let ds = breadwinner_dataset(&[("Male", "Maybe")]);
        assert!(matches!(
            build_table(&ds, &AggregationSpec::new("sex", "male_breadwinner")),
            Err(BuildError::LabelOutsideDomain { .. })
        ));
    }

    #[test]
    fn test_build_tables_keeps_spec_order() {
        let ds = breadwinner_dataset(&[("Male", "Agree")]);
        let tables = build_tables(
            &ds,
            &[
                AggregationSpec::new("sex", "male_breadwinner"),
                AggregationSpec::new("male_breadwinner", "sex"),
            ],
        )
        .unwrap();
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[1], tables[0].transposed());
    }
}
