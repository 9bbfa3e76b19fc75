//! In-memory dataset sources and synthetic benchmark rows.
//!
//! Synthetic rows have the form `"{equation} {row} {partition}"`: the
//! equation's index in its tier, the absolute row index within the
//! partition, and the partition code (0 train, 1 validation, 2 test). Every
//! exported value can therefore be traced back to the row it came from.

use std::{cell::RefCell, collections::HashMap};

use feynman_core::{Catalog, DatasetSource, Partition, TierDataset, TierSpec};
use thiserror::Error;

/// Errors reported by [`FixtureSource`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FixtureError {
    /// No dataset was registered for the repository.
    #[error("no fixture registered for `{repository}`")]
    MissingRepository {
        /// Requested repository.
        repository: String,
    },
}

/// [`DatasetSource`] serving registered datasets and recording each fetch.
///
/// # Examples
/// ```
/// use feynman_core::{DatasetSource, TierDataset};
/// use feynman_test_support::fixtures::FixtureSource;
///
/// let source = FixtureSource::new().with_dataset(TierDataset::new("owner/easy"));
/// assert!(source.fetch("owner/easy").is_ok());
/// assert!(source.fetch("owner/hard").is_err());
/// assert_eq!(source.fetches(), ["owner/easy", "owner/hard"]);
/// ```
#[derive(Debug, Default)]
pub struct FixtureSource {
    datasets: HashMap<String, TierDataset>,
    fetches: RefCell<Vec<String>>,
}

impl FixtureSource {
    /// Creates a source with no datasets.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a source serving synthetic data for every tier of `catalog`.
    #[must_use]
    pub fn for_catalog(catalog: &Catalog) -> Self {
        catalog
            .tiers()
            .iter()
            .fold(Self::new(), |source, spec| {
                source.with_dataset(synthetic_dataset(spec))
            })
    }

    /// Registers `dataset` under its repository, replacing any earlier one.
    #[must_use]
    pub fn with_dataset(mut self, dataset: TierDataset) -> Self {
        self.datasets
            .insert(dataset.repository().to_owned(), dataset);
        self
    }

    /// Returns the repositories requested so far, in request order.
    #[must_use]
    pub fn fetches(&self) -> Vec<String> {
        self.fetches.borrow().clone()
    }
}

impl DatasetSource for FixtureSource {
    type Error = FixtureError;

    fn name(&self) -> &str {
        "fixture"
    }

    fn fetch(&self, repository: &str) -> Result<TierDataset, FixtureError> {
        self.fetches.borrow_mut().push(repository.to_owned());
        self.datasets
            .get(repository)
            .cloned()
            .ok_or_else(|| FixtureError::MissingRepository {
                repository: repository.to_owned(),
            })
    }
}

/// Returns the code written in the last column of synthetic rows.
#[must_use]
pub const fn partition_code(partition: Partition) -> usize {
    match partition {
        Partition::Train => 0,
        Partition::Validation => 1,
        Partition::Test => 2,
    }
}

/// Generates `equations * rows_per_equation` synthetic rows for `partition`.
#[must_use]
pub fn synthetic_rows(
    partition: Partition,
    equations: usize,
    rows_per_equation: usize,
) -> Vec<String> {
    let code = partition_code(partition);
    (0..equations)
        .flat_map(|equation| {
            (0..rows_per_equation).map(move |offset| (equation, equation * rows_per_equation + offset))
        })
        .map(|(equation, row)| format!("{equation} {row} {code}"))
        .collect()
}

/// Generates a dataset whose layout matches `spec` exactly.
#[must_use]
pub fn synthetic_dataset(spec: &TierSpec) -> TierDataset {
    Partition::ALL
        .into_iter()
        .fold(TierDataset::new(spec.repository()), |dataset, partition| {
            let rows = synthetic_rows(
                partition,
                spec.equation_count(),
                spec.sizes().get(partition),
            );
            dataset.with_partition(partition, rows)
        })
}

/// Returns the CSV line an exporter writes for a synthetic row.
///
/// # Examples
/// ```
/// use feynman_core::Partition;
/// use feynman_test_support::fixtures::expected_csv_line;
///
/// assert_eq!(expected_csv_line(2, 17, Partition::Test), "2.0,17.0,2.0");
/// ```
#[must_use]
pub fn expected_csv_line(equation: usize, row: usize, partition: Partition) -> String {
    format!("{equation}.0,{row}.0,{}.0", partition_code(partition))
}
