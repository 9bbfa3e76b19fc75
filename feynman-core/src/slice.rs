//! Row-range arithmetic for locating one equation inside a tier partition.

use std::ops::Range;

use crate::{
    error::SliceError,
    partition::{Partition, PartitionSizes},
};

/// Returns the half-open range `[index * count, (index + 1) * count)`.
///
/// # Errors
/// Returns [`SliceError::Overflow`] when the bounds do not fit in `usize`.
///
/// # Examples
/// ```
/// use feynman_core::row_range;
///
/// assert_eq!(row_range(0, 8_000)?, 0..8_000);
/// assert_eq!(row_range(2, 1_000)?, 2_000..3_000);
/// # Ok::<(), feynman_core::SliceError>(())
/// ```
pub const fn row_range(index: usize, count: usize) -> Result<Range<usize>, SliceError> {
    let Some(start) = index.checked_mul(count) else {
        return Err(SliceError::Overflow { index, count });
    };
    let Some(end) = start.checked_add(count) else {
        return Err(SliceError::Overflow { index, count });
    };
    Ok(start..end)
}

/// Row ranges of one equation in every partition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EquationRanges {
    index: usize,
    train: Range<usize>,
    validation: Range<usize>,
    test: Range<usize>,
}

impl EquationRanges {
    /// Computes the ranges of the equation at `index` in a tier laid out
    /// with `sizes`.
    ///
    /// # Errors
    /// Returns [`SliceError::Overflow`] when any range overflows `usize`.
    ///
    /// # Examples
    /// ```
    /// use feynman_core::{EquationRanges, Partition, PartitionSizes};
    ///
    /// let ranges = EquationRanges::new(1, PartitionSizes::FEYNMAN)?;
    /// assert_eq!(ranges.get(Partition::Train), 8_000..16_000);
    /// assert_eq!(ranges.get(Partition::Test), 1_000..2_000);
    /// # Ok::<(), feynman_core::SliceError>(())
    /// ```
    pub fn new(index: usize, sizes: PartitionSizes) -> Result<Self, SliceError> {
        Ok(Self {
            index,
            train: row_range(index, sizes.train)?,
            validation: row_range(index, sizes.validation)?,
            test: row_range(index, sizes.test)?,
        })
    }

    /// Returns the sequential equation index the ranges belong to.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Returns the range of `partition`.
    #[must_use]
    pub fn get(&self, partition: Partition) -> Range<usize> {
        match partition {
            Partition::Train => self.train.clone(),
            Partition::Validation => self.validation.clone(),
            Partition::Test => self.test.clone(),
        }
    }
}
