//! Weighted lists: map an index in `0..total_weight` onto weighted values.

use crate::error::WeightedListError;

/// A non-empty list of values with non-negative weights and a positive total.
///
/// Each value owns a half-open interval of the cumulative weight; sampling an
/// index returns the value whose interval contains it. Zero-weight values own
/// an empty interval and are never sampled.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedList<T> {
    /// Exclusive upper bound of each value's interval, ascending.
    bounds: Vec<u64>,
    values: Vec<T>,
    total: u64,
}

impl<T> WeightedList<T> {
    pub fn new(entries: Vec<(i64, T)>) -> Result<Self, WeightedListError> {
        if entries.is_empty() {
            return Err(WeightedListError::Empty);
        }

        let mut bounds = Vec::with_capacity(entries.len());
        let mut values = Vec::with_capacity(entries.len());
        let mut total: u64 = 0;

        for (position, (weight, value)) in entries.into_iter().enumerate() {
            if weight < 0 {
                return Err(WeightedListError::NegativeWeight { position, weight });
            }
            total = total
                .checked_add(weight as u64)
                .ok_or(WeightedListError::TotalWeightOverflow { position })?;
            bounds.push(total);
            values.push(value);
        }

        if total == 0 {
            return Err(WeightedListError::ZeroTotalWeight);
        }

        Ok(WeightedList {
            bounds,
            values,
            total,
        })
    }

    pub fn total_weight(&self) -> u64 {
        self.total
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The value whose cumulative-weight interval contains `index`.
    pub fn sample(&self, index: u64) -> Result<&T, WeightedListError> {
        if index >= self.total {
            return Err(WeightedListError::IndexOutOfRange {
                index,
                total: self.total,
            });
        }

        let position = self.bounds.partition_point(|&bound| bound <= index);
        Ok(&self.values[position])
    }
}
