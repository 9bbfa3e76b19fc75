//! The fetch, slice, parse and write pipeline.
//!
//! Tiers are processed one at a time: the whole tier is fetched, its layout
//! is checked against the catalog, and then each equation's rows are sliced,
//! parsed and written to three CSV files. The first failure stops the run;
//! files written before it are left in place.

use std::path::{Path, PathBuf};

use tracing::{Span, debug, field, info, instrument, warn};

use crate::{
    catalog::{Catalog, Tier, TierSpec},
    dataset::{DatasetSource, TierDataset},
    error::{ExportError, Result, SliceError},
    parse::NumericTable,
    partition::Partition,
    slice::EquationRanges,
    write::{output_path, write_csv_file},
};

/// Default directory exported files are written to.
pub const DEFAULT_OUTPUT_DIR: &str = "resources";

/// How strictly fetched partitions must match the catalog's row counts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LayoutPolicy {
    /// Every partition must hold exactly `rows per equation * equations` rows.
    #[default]
    Strict,
    /// Longer partitions are accepted and their trailing rows ignored.
    Lenient,
}

/// Configures and constructs [`Exporter`] instances.
///
/// # Examples
/// ```
/// use feynman_core::{ExporterBuilder, LayoutPolicy, Tier};
///
/// let dir = tempfile::tempdir()?;
/// let exporter = ExporterBuilder::new()
///     .with_output_dir(dir.path())
///     .with_tiers([Tier::Hard, Tier::Easy, Tier::Hard])
///     .with_layout_policy(LayoutPolicy::Lenient)
///     .build()?;
/// assert_eq!(exporter.tiers(), &[Tier::Hard, Tier::Easy]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug)]
pub struct ExporterBuilder {
    output_dir: PathBuf,
    tiers: Vec<Tier>,
    layout: LayoutPolicy,
    catalog: Catalog,
}

impl Default for ExporterBuilder {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            tiers: Tier::ALL.to_vec(),
            layout: LayoutPolicy::default(),
            catalog: Catalog::feynman(),
        }
    }
}

impl ExporterBuilder {
    /// Creates a builder that exports every tier to `resources/`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the output directory.
    #[must_use]
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Selects the tiers to export, in order. Repeated tiers are dropped.
    #[must_use]
    pub fn with_tiers(mut self, tiers: impl IntoIterator<Item = Tier>) -> Self {
        self.tiers.clear();
        for tier in tiers {
            if !self.tiers.contains(&tier) {
                self.tiers.push(tier);
            }
        }
        self
    }

    /// Sets the layout policy.
    #[must_use]
    pub const fn with_layout_policy(mut self, layout: LayoutPolicy) -> Self {
        self.layout = layout;
        self
    }

    /// Replaces the built-in catalog.
    #[must_use]
    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Validates the configuration and constructs an [`Exporter`].
    ///
    /// # Errors
    /// Returns [`ExportError::OutputDirMissing`] when the output directory
    /// does not exist and [`ExportError::Catalog`] when a selected tier has
    /// no catalog entry.
    pub fn build(self) -> Result<Exporter> {
        if !self.output_dir.is_dir() {
            return Err(ExportError::OutputDirMissing {
                path: self.output_dir,
            });
        }
        for &tier in &self.tiers {
            self.catalog.spec(tier)?;
        }
        Ok(Exporter {
            output_dir: self.output_dir,
            tiers: self.tiers,
            layout: self.layout,
            catalog: self.catalog,
        })
    }
}

/// Exports benchmark tiers as per-equation CSV files.
#[derive(Clone, Debug)]
pub struct Exporter {
    output_dir: PathBuf,
    tiers: Vec<Tier>,
    layout: LayoutPolicy,
    catalog: Catalog,
}

/// Outcome of exporting one tier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TierReport {
    /// Tier that was exported.
    pub tier: Tier,
    /// Repository the rows were fetched from.
    pub repository: String,
    /// Number of equations exported.
    pub equations: usize,
    /// Files written, in write order.
    pub files: Vec<PathBuf>,
}

/// Outcome of a full export run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExportSummary {
    /// Per-tier reports in processing order.
    pub tiers: Vec<TierReport>,
}

impl ExportSummary {
    /// Returns the number of equations exported across all tiers.
    #[must_use]
    pub fn equation_count(&self) -> usize {
        self.tiers.iter().map(|report| report.equations).sum()
    }

    /// Returns the number of files written across all tiers.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.tiers.iter().map(|report| report.files.len()).sum()
    }
}

impl Exporter {
    /// Returns the output directory.
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Returns the tiers exported by [`Exporter::run`], in order.
    #[must_use]
    pub fn tiers(&self) -> &[Tier] {
        &self.tiers
    }

    /// Returns the layout policy.
    #[must_use]
    pub const fn layout_policy(&self) -> LayoutPolicy {
        self.layout
    }

    /// Returns the catalog tiers are resolved against.
    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Exports every configured tier from `source`.
    ///
    /// # Errors
    /// Returns the first [`ExportError`] raised by any tier.
    #[instrument(
        name = "export.run",
        err,
        skip(self, source),
        fields(source = source.name(), tiers = self.tiers.len()),
    )]
    pub fn run<S>(&self, source: &S) -> Result<ExportSummary>
    where
        S: DatasetSource + ?Sized,
    {
        let mut summary = ExportSummary::default();
        for &tier in &self.tiers {
            summary.tiers.push(self.export_tier(source, tier)?);
        }
        info!(
            equations = summary.equation_count(),
            files = summary.file_count(),
            "export completed"
        );
        Ok(summary)
    }

    /// Fetches `tier` from `source` and writes every equation's files.
    ///
    /// # Errors
    /// Returns [`ExportError`] when the tier is missing from the catalog, the
    /// fetch fails, the layout check fails, or any equation fails to export.
    #[instrument(
        name = "export.tier",
        err,
        skip(self, source),
        fields(tier = %tier, repository = field::Empty, equations = field::Empty),
    )]
    pub fn export_tier<S>(&self, source: &S, tier: Tier) -> Result<TierReport>
    where
        S: DatasetSource + ?Sized,
    {
        let spec = self.catalog.spec(tier)?;
        let span = Span::current();
        span.record("repository", spec.repository());
        span.record("equations", spec.equation_count());

        let dataset = source
            .fetch(spec.repository())
            .map_err(|err| ExportError::Fetch {
                tier,
                repository: spec.repository().to_owned(),
                source: Box::new(err),
            })?;
        self.check_layout(spec, &dataset)?;

        let mut files = Vec::with_capacity(spec.equation_count() * Partition::ALL.len());
        for index in 0..spec.equation_count() {
            files.extend(self.export_equation(spec, &dataset, index)?);
        }
        info!(files = files.len(), "tier exported");
        Ok(TierReport {
            tier,
            repository: spec.repository().to_owned(),
            equations: spec.equation_count(),
            files,
        })
    }

    /// Writes the three partition files of the equation at `index` in `spec`.
    ///
    /// # Errors
    /// Returns [`ExportError::Slice`] when `index` is not an equation of the
    /// tier or the equation's rows are not all present, [`ExportError::Parse`]
    /// when a row is malformed and [`ExportError::Write`] when a file cannot
    /// be written.
    pub fn export_equation(
        &self,
        spec: &TierSpec,
        dataset: &TierDataset,
        index: usize,
    ) -> Result<Vec<PathBuf>> {
        let equations = spec.equation_count();
        let equation = *spec
            .equations()
            .get(index)
            .ok_or(SliceError::UnknownEquation { index, equations })?;
        let ranges = EquationRanges::new(index, spec.sizes())?;
        let mut files = Vec::with_capacity(Partition::ALL.len());
        for partition in Partition::ALL {
            let range = ranges.get(partition);
            let first_row = range.start;
            let lines = dataset.slice(partition, range)?;
            let table = NumericTable::from_lines(lines, first_row).map_err(|source| {
                ExportError::Parse {
                    equation: equation.to_owned(),
                    partition,
                    source,
                }
            })?;
            let path = output_path(&self.output_dir, equation, partition);
            write_csv_file(&table, &path)?;
            debug!(
                equation,
                partition = partition.split_name(),
                rows = table.rows(),
                path = %path.display(),
                "partition written"
            );
            files.push(path);
        }
        Ok(files)
    }

    fn check_layout(&self, spec: &TierSpec, dataset: &TierDataset) -> Result<()> {
        let equations = spec.equation_count();
        for partition in Partition::ALL {
            let count = spec.sizes().get(partition);
            let expected = spec
                .required_rows(partition)
                .ok_or(SliceError::Overflow {
                    index: equations,
                    count,
                })?;
            let actual = dataset.len(partition);
            let acceptable = match self.layout {
                LayoutPolicy::Strict => actual == expected,
                LayoutPolicy::Lenient => actual >= expected,
            };
            if !acceptable {
                return Err(ExportError::Layout {
                    tier: spec.tier(),
                    partition,
                    expected,
                    actual,
                });
            }
            if actual > expected {
                warn!(
                    partition = partition.split_name(),
                    expected,
                    actual,
                    "ignoring trailing rows"
                );
            }
        }
        Ok(())
    }
}
