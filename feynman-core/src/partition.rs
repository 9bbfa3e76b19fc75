//! Dataset partitions and the per-partition row counts of a tier.

use std::fmt;

/// One of the three splits every benchmark tier is published with.
///
/// A partition has two names: the split name used by the remote dataset
/// (`validation`) and the shorter suffix used for exported files (`valid`).
///
/// # Examples
/// ```
/// use feynman_core::Partition;
///
/// assert_eq!(Partition::Validation.split_name(), "validation");
/// assert_eq!(Partition::Validation.file_suffix(), "valid");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Partition {
    /// Training rows.
    Train,
    /// Validation rows.
    Validation,
    /// Held-out test rows.
    Test,
}

impl Partition {
    /// Every partition in export order.
    pub const ALL: [Self; 3] = [Self::Train, Self::Validation, Self::Test];

    /// Returns the split name used by the remote dataset.
    #[must_use]
    pub const fn split_name(self) -> &'static str {
        match self {
            Self::Train => "train",
            Self::Validation => "validation",
            Self::Test => "test",
        }
    }

    /// Returns the suffix appended to exported file names.
    #[must_use]
    pub const fn file_suffix(self) -> &'static str {
        match self {
            Self::Train => "train",
            Self::Validation => "valid",
            Self::Test => "test",
        }
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.split_name())
    }
}

/// Number of rows each equation owns in every partition.
///
/// # Examples
/// ```
/// use feynman_core::{Partition, PartitionSizes};
///
/// let sizes = PartitionSizes::FEYNMAN;
/// assert_eq!(sizes.get(Partition::Train), 8_000);
/// assert_eq!(sizes.get(Partition::Test), 1_000);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PartitionSizes {
    /// Rows per equation in the train partition.
    pub train: usize,
    /// Rows per equation in the validation partition.
    pub validation: usize,
    /// Rows per equation in the test partition.
    pub test: usize,
}

impl PartitionSizes {
    /// Row counts shared by every SRSD Feynman tier.
    pub const FEYNMAN: Self = Self::new(8_000, 1_000, 1_000);

    /// Creates a row-count table.
    #[must_use]
    pub const fn new(train: usize, validation: usize, test: usize) -> Self {
        Self {
            train,
            validation,
            test,
        }
    }

    /// Returns the per-equation row count of `partition`.
    #[must_use]
    pub const fn get(&self, partition: Partition) -> usize {
        match partition {
            Partition::Train => self.train,
            Partition::Validation => self.validation,
            Partition::Test => self.test,
        }
    }
}

impl Default for PartitionSizes {
    fn default() -> Self {
        Self::FEYNMAN
    }
}
