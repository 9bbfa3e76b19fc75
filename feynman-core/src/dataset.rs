//! Fetched tier data and the seam through which it is retrieved.

use std::ops::Range;

use crate::{error::SliceError, partition::Partition};

/// Retrieves the row text of a remote benchmark repository.
///
/// Implementations may download, cache or synthesise data; the exporter
/// only relies on every partition being returned in remote row order.
///
/// # Examples
/// ```
/// use std::convert::Infallible;
/// use feynman_core::{DatasetSource, Partition, TierDataset};
///
/// struct Fixed;
///
/// impl DatasetSource for Fixed {
///     type Error = Infallible;
///
///     fn name(&self) -> &str { "fixed" }
///
///     fn fetch(&self, repository: &str) -> Result<TierDataset, Self::Error> {
///         Ok(TierDataset::new(repository).with_partition(Partition::Train, vec!["1 2".into()]))
///     }
/// }
///
/// let dataset = Fixed.fetch("local/easy").expect("fixed source cannot fail");
/// assert_eq!(dataset.len(Partition::Train), 1);
/// assert!(dataset.rows(Partition::Test).is_empty());
/// ```
pub trait DatasetSource {
    /// Error reported when a repository cannot be fetched.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Returns a human-readable name for diagnostics.
    fn name(&self) -> &str;

    /// Fetches all three partitions of `repository`.
    ///
    /// # Errors
    /// Returns [`Self::Error`] when the repository is unavailable or its data
    /// cannot be decoded.
    fn fetch(&self, repository: &str) -> Result<TierDataset, Self::Error>;
}

/// Row text of every partition of one repository.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TierDataset {
    repository: String,
    train: Vec<String>,
    validation: Vec<String>,
    test: Vec<String>,
}

impl TierDataset {
    /// Creates an empty dataset for `repository`.
    #[must_use]
    pub fn new(repository: impl Into<String>) -> Self {
        Self {
            repository: repository.into(),
            ..Self::default()
        }
    }

    /// Replaces the rows of `partition`.
    #[must_use]
    pub fn with_partition(mut self, partition: Partition, rows: Vec<String>) -> Self {
        *self.rows_mut(partition) = rows;
        self
    }

    /// Returns the repository the rows were fetched from.
    #[must_use]
    pub fn repository(&self) -> &str {
        &self.repository
    }

    /// Returns every row of `partition`.
    #[must_use]
    pub fn rows(&self, partition: Partition) -> &[String] {
        match partition {
            Partition::Train => &self.train,
            Partition::Validation => &self.validation,
            Partition::Test => &self.test,
        }
    }

    /// Returns the number of rows in `partition`.
    #[must_use]
    pub fn len(&self, partition: Partition) -> usize {
        self.rows(partition).len()
    }

    /// Returns whether every partition is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        Partition::ALL
            .iter()
            .all(|&partition| self.rows(partition).is_empty())
    }

    /// Returns the rows of `partition` within `range`.
    ///
    /// # Errors
    /// Returns [`SliceError::OutOfRange`] when `range` extends past the end of
    /// the partition.
    pub fn slice(
        &self,
        partition: Partition,
        range: Range<usize>,
    ) -> Result<&[String], SliceError> {
        let rows = self.rows(partition);
        let available = rows.len();
        rows.get(range.clone()).ok_or(SliceError::OutOfRange {
            partition,
            range,
            available,
        })
    }

    const fn rows_mut(&mut self, partition: Partition) -> &mut Vec<String> {
        match partition {
            Partition::Train => &mut self.train,
            Partition::Validation => &mut self.validation,
            Partition::Test => &mut self.test,
        }
    }
}
