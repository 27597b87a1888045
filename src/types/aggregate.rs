//! Running aggregates
//!
//! An [Aggregate] summarises the values folded into one group: minimum, maximum, sum and count.
//! The mean is derived from the sum and count when results are emitted and is never stored.
//!
//! Aggregates are built from at least one value, so `count >= 1` and `min <= max` hold for every
//! instance. Merging two aggregates is commutative and associative for `min`, `max` and `count`;
//! `sum` is associative up to floating point rounding.

use serde::Serialize;

/// Summary of the values seen for one group.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Aggregate {
    min: f64,
    max: f64,
    sum: f64,
    count: u64,
}

impl Aggregate {
    /// Returns an aggregate of a single value.
    pub fn new(value: f64) -> Self {
        Self {
            min: value,
            max: value,
            sum: value,
            count: 1,
        }
    }

    /// Returns an aggregate of a sequence of values, or `None` if the sequence is empty.
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        let mut values = values.into_iter();
        let mut aggregate = Self::new(values.next()?);
        for value in values {
            aggregate.update(value);
        }
        Some(aggregate)
    }

    /// Folds another value into the aggregate.
    pub fn update(&mut self, value: f64) {
        // f64::min/max ignore a NaN operand, keeping min <= max for any finite input.
        self.min = self.min.min(value);
        self.max = self.max.max(value);
        self.sum += value;
        self.count += 1;
    }

    /// Merges a partial aggregate for the same group into this one.
    pub fn merge(&mut self, other: &Aggregate) {
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
        self.sum += other.sum;
        self.count += other.count;
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn sum(&self) -> f64 {
        self.sum
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    /// Arithmetic mean of the folded values.
    pub fn mean(&self) -> f64 {
        // count >= 1 by construction.
        self.sum / self.count as f64
    }
}
