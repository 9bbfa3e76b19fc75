//! Small helpers shared across CLI tests.

use std::path::Path;

use feynman_core::{Catalog, PartitionSizes, Tier, TierSpec};
use feynman_test_support::fixtures::FixtureSource;
use tempfile::TempDir;

use super::{CliError, ExportArgs};

pub(super) const EASY_EQUATIONS: &[&str] = &["I.12.1", "I.14.3"];
pub(super) const HARD_EQUATIONS: &[&str] = &["B1", "B2", "B3"];

pub(super) fn temp_dir() -> TempDir {
    match TempDir::new() {
        Ok(dir) => dir,
        Err(err) => panic!("failed to create temp dir: {err}"),
    }
}

/// Two tiers small enough to export in milliseconds.
pub(super) fn small_catalog() -> Catalog {
    Catalog::new(vec![
        TierSpec::new(
            Tier::Easy,
            "owner/easy",
            EASY_EQUATIONS,
            PartitionSizes::new(3, 2, 1),
        ),
        TierSpec::new(
            Tier::Hard,
            "owner/hard",
            HARD_EQUATIONS,
            PartitionSizes::new(2, 1, 1),
        ),
    ])
}

pub(super) fn small_source() -> FixtureSource {
    FixtureSource::for_catalog(&small_catalog())
}

pub(super) fn export_args(output_dir: &Path, tiers: &[Tier]) -> ExportArgs {
    ExportArgs {
        output_dir: output_dir.to_path_buf(),
        tiers: tiers.to_vec(),
        ..ExportArgs::default()
    }
}

pub(super) fn expect_export_error<T>(result: Result<T, CliError>, panic_msg: &str) -> CliError {
    match result {
        Ok(_) => panic!("{panic_msg}"),
        Err(err) => err,
    }
}
