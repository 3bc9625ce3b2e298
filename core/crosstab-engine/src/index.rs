//! FILENAME: core/crosstab-engine/src/index.rs
//! Crosstab Index - every precomputed table, keyed by unordered field pair.
//!
//! The index is built once and never mutated; `resolve` is a pair of hash
//! lookups and returns a borrowed view, so any number of threads may query
//! one index without coordination.

use log::info;
use rustc_hash::{FxHashMap, FxHashSet};
use engine::Dataset;
use crate::aggregator::build_tables;
use crate::definition::{AggregationSpec, FieldPair};
use crate::error::{BuildError, ResolveError};
use crate::view::{Table, TableView};

#[derive(Debug, Clone)]
pub struct CrosstabIndex {
    /// Every field name a request may mention.
    fields: FxHashSet<String>,

    /// Tables in configuration order.
    tables: Vec<Table>,

    /// field -> other field -> position in `tables`. Each table is registered
    /// under both orderings of its pair.
    lookup: FxHashMap<String, FxHashMap<String, usize>>,
}

impl CrosstabIndex {
    /// Builds the table of every aggregation and registers it under `{dimA, dimB}`.
    /// Two specs over the same unordered pair are a configuration error.
    pub fn build(dataset: &Dataset, specs: &[AggregationSpec]) -> Result<Self, BuildError> {
        let mut seen = FxHashSet::default();
        for spec in specs {
            if !seen.insert(spec.key()) {
                return Err(BuildError::DuplicateAggregation(
                    spec.column_field().to_string(),
                    spec.row_field().to_string(),
                ));
            }
        }

        let tables = build_tables(dataset, specs)?;

        let mut lookup: FxHashMap<String, FxHashMap<String, usize>> = FxHashMap::default();
        for (position, table) in tables.iter().enumerate() {
            let (a, b) = (table.column_field(), table.row_field());
            lookup
                .entry(a.to_string())
                .or_default()
                .insert(b.to_string(), position);
            lookup
                .entry(b.to_string())
                .or_default()
                .insert(a.to_string(), position);
        }

        let fields = dataset.fields().iter().map(|f| f.name.clone()).collect();

        info!(
            "Indexed {} precomputed tables over {} records",
            tables.len(),
            dataset.len()
        );
        Ok(CrosstabIndex {
            fields,
            tables,
            lookup,
        })
    }

    /// Returns the table for `{x, group}` oriented with `x` on the column axis.
    pub fn resolve(&self, x: &str, group: &str) -> Result<TableView<'_>, ResolveError> {
        for field in [x, group] {
            if !self.fields.contains(field) {
                return Err(ResolveError::UnknownField(field.to_string()));
            }
        }
        if x == group {
            return Err(ResolveError::SameField(x.to_string()));
        }

        let table = self
            .lookup
            .get(x)
            .and_then(|others| others.get(group))
            .map(|&position| &self.tables[position])
            .ok_or_else(|| ResolveError::NoPrecomputedAggregation {
                x: x.to_string(),
                group: group.to_string(),
            })?;

        Ok(TableView::new(table, table.column_field() != x))
    }

    pub fn contains(&self, x: &str, group: &str) -> bool {
        self.lookup
            .get(x)
            .map_or(false, |others| others.contains_key(group))
    }

    /// Tables in configuration order.
    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    /// Unordered keys of every registered table, in configuration order.
    pub fn pairs(&self) -> Vec<FieldPair> {
        self.tables
            .iter()
            .map(|t| FieldPair::new(t.column_field(), t.row_field()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::{CategoricalField, FieldDescriptor, FieldKind, FieldValue, Record};

    fn labels(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn dataset() -> Dataset {
        let rows = [
            ("Male", "pacific", "Very satisfied"),
            ("Female", "pacific", "Very satisfied"),
            ("Female", "new england", "Moderately satisfied"),
        ];
        let records = rows
            .iter()
            .enumerate()
            .map(|(i, (sex, region, sat))| {
                Record::new(
                    i as u32,
                    vec![FieldValue::text(*sex), FieldValue::text(*region), FieldValue::text(*sat)],
                )
            })
            .collect();
        Dataset::new(
            vec![
                FieldDescriptor::new("sex", FieldKind::Categorical),
                FieldDescriptor::new("region", FieldKind::Categorical),
                FieldDescriptor::new("satjob", FieldKind::Categorical),
            ],
            vec![
                CategoricalField::new("sex", labels(&["Male", "Female"])),
                CategoricalField::new("region", labels(&["pacific", "new england"])),
                CategoricalField::new(
                    "satjob",
                    labels(&[
                        "Very dissatisfied",
                        "A little dissatisfied",
                        "Moderately satisfied",
                        "Very satisfied",
                    ]),
                ),
            ],
            records,
        )
    }

    fn index() -> CrosstabIndex {
        CrosstabIndex::build(&dataset(), &[AggregationSpec::new("sex", "satjob")]).unwrap()
    }

    #[test]
    fn test_resolve_as_stored() {
        let index = index();
        let view = index.resolve("sex", "satjob").unwrap();
        assert!(!view.is_transposed());
        assert_eq!(view.x_field(), "sex");
        assert_eq!(view.group_field(), "satjob");
        assert_eq!(view.count_by_label("Female", "Very satisfied"), Some(1));
    }

    #[test]
    fn test_resolve_transposed() {
        let index = index();
        let view = index.resolve("satjob", "sex").unwrap();
        assert!(view.is_transposed());
        assert_eq!(view.x_field(), "satjob");
        assert_eq!(view.x_labels().len(), 4);
        assert_eq!(view.group_labels(), &["Male", "Female"]);
        assert_eq!(view.count_by_label("Moderately satisfied", "Female"), Some(1));
    }

    #[test]
    fn test_resolve_unregistered_pair() {
        let index = index();
        assert_eq!(
            index.resolve("region", "satjob").unwrap_err(),
            ResolveError::NoPrecomputedAggregation {
                x: "region".to_string(),
                group: "satjob".to_string(),
            }
        );
        assert!(!index.contains("region", "satjob"));
        assert!(index.contains("satjob", "sex"));
    }

    #[test]
    fn test_resolve_input_constraints() {
        let index = index();
        assert_eq!(
            index.resolve("income", "sex").unwrap_err(),
            ResolveError::UnknownField("income".to_string())
        );
        assert_eq!(
            index.resolve("sex", "sex").unwrap_err(),
            ResolveError::SameField("sex".to_string())
        );
    }

    #[test]
    fn test_duplicate_pair_is_rejected() {
        let err = CrosstabIndex::build(
            &dataset(),
            &[
                AggregationSpec::new("sex", "satjob"),
                AggregationSpec::new("satjob", "sex"),
            ],
        )
        .unwrap_err();
        assert_eq!(
            err,
            BuildError::DuplicateAggregation("satjob".to_string(), "sex".to_string())
        );
    }

    #[test]
    fn test_pairs_in_spec_order() {
        let index = CrosstabIndex::build(
            &dataset(),
            &[
                AggregationSpec::new("region", "satjob"),
                AggregationSpec::new("sex", "satjob"),
            ],
        )
        .unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(
            index.pairs(),
            vec![FieldPair::new("region", "satjob"), FieldPair::new("sex", "satjob")]
        );
    }

    #[test]
    fn test_index_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CrosstabIndex>();

        let index = std::sync::Arc::new(index());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let index = std::sync::Arc::clone(&index);
                std::thread::spawn(move || index.resolve("satjob", "sex").map(|v| v.total()))
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), Ok(3));
        }
    }
}
