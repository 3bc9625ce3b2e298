//! FILENAME: core/crosstab-engine/src/cache.rs
//! Crosstab Cache - label interning and accumulators used during the build.
//!
//! Architecture:
//! - Each label of a categorical field is referenced by its position in the
//!   field's declared order (its `ValueId`), so axis order never depends on
//!   the order in which rows arrive
//! - Group keys are short vectors of ValueIds (one per grouping field)
//! - Numeric statistics accumulate in a single pass (Welford's algorithm)

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use engine::{CategoricalField, Dataset, FieldIndex, FieldValue, Record};
use crate::error::BuildError;

// ============================================================================
// VALUE INTERNING
// ============================================================================

/// Position of a label within its field's declared order.
pub type ValueId = u32;

/// Represents a missing value.
pub const VALUE_ID_EMPTY: ValueId = u32::MAX;

/// A key representing one combination of grouping-field labels.
/// Most keys have one or two fields, so they stay inline.
pub type GroupKey = SmallVec<[ValueId; 2]>;

// ============================================================================
// AXIS CACHE
// ============================================================================

/// Lookup from a categorical field's labels to their ValueIds.
#[derive(Debug)]
pub struct AxisCache<'a> {
    /// Column of the field in the dataset schema.
    pub field_index: FieldIndex,

    pub descriptor: &'a CategoricalField,

    label_to_id: FxHashMap<&'a str, ValueId>,
}

impl<'a> AxisCache<'a> {
    /// Builds the axis for `name`, which must be a categorical field of `dataset`.
    pub fn new(dataset: &'a Dataset, name: &str) -> Result<Self, BuildError> {
        let field_index = dataset
            .field_index(name)
            .ok_or_else(|| BuildError::UnknownField(name.to_string()))?;
        let descriptor = dataset
            .categorical(name)
            .ok_or_else(|| BuildError::NotCategorical(name.to_string()))?;

        let label_to_id = descriptor
            .labels()
            .iter()
            .enumerate()
            .map(|(i, label)| (label.as_str(), i as ValueId))
            .collect();

        Ok(AxisCache {
            field_index,
            descriptor,
            label_to_id,
        })
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn labels(&self) -> &'a [String] {
        self.descriptor.labels()
    }

    pub fn len(&self) -> usize {
        self.descriptor.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptor.is_empty()
    }

    /// ValueId of the record's value, `VALUE_ID_EMPTY` when missing.
    /// A present value outside the declared labels is an error, never a skip.
    pub fn value_id(&self, record: &Record) -> Result<ValueId, BuildError> {
        match record.get(self.field_index) {
            FieldValue::Missing => Ok(VALUE_ID_EMPTY),
            FieldValue::Text(label) => self.label_to_id.get(label.as_str()).copied().ok_or_else(|| {
                BuildError::LabelOutsideDomain {
                    field: self.name().to_string(),
                    label: label.clone(),
                }
            }),
            other => Err(BuildError::LabelOutsideDomain {
                field: self.name().to_string(),
                label: other.display_value(),
            }),
        }
    }
}

/// Every key of the cartesian product of the axes, in declared label order
/// (last axis varies fastest). No axes yields a single empty key.
pub fn all_group_keys(axes: &[AxisCache<'_>]) -> Vec<GroupKey> {
    let mut keys: Vec<GroupKey> = vec![GroupKey::new()];
    for axis in axes {
        let mut next = Vec::with_capacity(keys.len() * axis.len());
        for key in &keys {
            for id in 0..axis.len() as ValueId {
                let mut extended = key.clone();
                extended.push(id);
                next.push(extended);
            }
        }
        keys = next;
    }
    keys
}

// ============================================================================
// AGGREGATE ACCUMULATOR
// ============================================================================

/// Accumulator for numeric statistics, filled one value at a time.
#[derive(Debug, Clone, Default)]
pub struct AggregateAccumulator {
    pub count: u64,
    pub sum: f64,
    pub min: Option<f64>,
    pub max: Option<f64>,
    /// Running mean and sum of squared differences from it (Welford).
    pub mean: f64,
    pub m2: f64,
}

impl AggregateAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_number(&mut self, value: f64) {
        self.count += 1;
        self.sum += value;

        self.min = Some(self.min.map_or(value, |m| m.min(value)));
        self.max = Some(self.max.map_or(value, |m| m.max(value)));

        let delta = value - self.mean;
        self.mean += delta / (self.count as f64);
        let delta2 = value - self.mean;
        self.m2 += delta * delta2;
    }

    pub fn mean(&self) -> Option<f64> {
        if self.count > 0 {
            Some(self.sum / self.count as f64)
        } else {
            None
        }
    }

    /// Sample standard deviation (n - 1 denominator).
    pub fn std_dev(&self) -> Option<f64> {
        if self.count > 1 {
            Some((self.m2 / ((self.count - 1) as f64)).sqrt())
        } else {
            None
        }
    }
}
