//! Command implementations and argument parsing for the feynman CLI.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use feynman_core::{
    Catalog, CatalogError, DEFAULT_OUTPUT_DIR, DatasetSource, ExportError, ExportSummary,
    ExporterBuilder, LayoutPolicy, Partition, Tier, TierSpec,
};
use feynman_hub::{HubConfig, HuggingFaceHub};
use thiserror::Error;
use tracing::{Span, field, info, instrument};

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(
    name = "feynman",
    version,
    about = "Export the SRSD Feynman benchmark as per-equation CSV files."
)]
pub struct Cli {
    /// Command to execute; defaults to `export`.
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Fetch tiers from the hub and write one CSV file per equation and partition.
    Export(ExportArgs),
    /// Print the built-in catalog of tiers and equations.
    Catalog(CatalogArgs),
}

/// Options accepted by the `export` command.
#[derive(Debug, Args, Clone)]
pub struct ExportArgs {
    /// Existing directory that receives the CSV files.
    #[arg(long = "output-dir", default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Tier to export (easy, medium or hard); repeat for several. Defaults to all.
    #[arg(long = "tier", value_parser = parse_tier)]
    pub tiers: Vec<Tier>,

    /// Directory for cached shard listings and parquet shards.
    #[arg(long = "cache-dir")]
    pub cache_dir: Option<PathBuf>,

    /// Hub endpoint URL.
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Dataset configuration name.
    #[arg(long = "config")]
    pub config_name: Option<String>,

    /// Accept partitions longer than the catalog requires.
    #[arg(long = "lenient-layout")]
    pub lenient_layout: bool,
}

impl Default for ExportArgs {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            tiers: Vec::new(),
            cache_dir: None,
            endpoint: None,
            config_name: None,
            lenient_layout: false,
        }
    }
}

/// Options accepted by the `catalog` command.
#[derive(Debug, Args, Clone, Default)]
pub struct CatalogArgs {
    /// Tier to print; repeat for several. Defaults to all.
    #[arg(long = "tier", value_parser = parse_tier)]
    pub tiers: Vec<Tier>,
}

fn parse_tier(raw: &str) -> Result<Tier, CatalogError> {
    raw.parse()
}

/// Errors surfaced while executing CLI commands.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum CliError {
    /// A tier could not be resolved in the catalog.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    /// The export pipeline failed.
    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Result of a successfully executed command.
#[derive(Debug, Clone)]
pub enum CommandOutput {
    /// Files written by `export`.
    Export(ExportSummary),
    /// Tiers selected by `catalog`, in request order.
    Catalog(Vec<TierSpec>),
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when a tier is unknown or the export fails.
///
/// # Examples
/// ```
/// use feynman_cli::cli::{CatalogArgs, Cli, Command, CommandOutput, run_cli};
/// use feynman_core::Tier;
///
/// let cli = Cli {
///     command: Some(Command::Catalog(CatalogArgs { tiers: vec![Tier::Medium] })),
/// };
/// let CommandOutput::Catalog(specs) = run_cli(cli)? else {
///     unreachable!("catalog command yields catalog output");
/// };
/// assert_eq!(specs.first().map(|spec| spec.equation_count()), Some(40));
/// # Ok::<(), feynman_cli::cli::CliError>(())
/// ```
#[instrument(name = "cli.run", err, skip(cli), fields(command = field::Empty))]
pub fn run_cli(cli: Cli) -> Result<CommandOutput, CliError> {
    let command = cli
        .command
        .unwrap_or_else(|| Command::Export(ExportArgs::default()));
    match command {
        Command::Export(args) => {
            Span::current().record("command", "export");
            let source = HuggingFaceHub::new(hub_config(&args));
            export_with_source(&args, Catalog::feynman(), &source).map(CommandOutput::Export)
        }
        Command::Catalog(args) => {
            Span::current().record("command", "catalog");
            let catalog = Catalog::feynman();
            let tiers = selected_tiers(&args.tiers, &catalog);
            let specs = tiers
                .iter()
                .map(|&tier| catalog.spec(tier).copied())
                .collect::<Result<Vec<_>, _>>()?;
            Ok(CommandOutput::Catalog(specs))
        }
    }
}

/// Builds the hub configuration for `args`, starting from the environment
/// defaults of [`HubConfig::default`].
#[must_use]
pub fn hub_config(args: &ExportArgs) -> HubConfig {
    let mut config = HubConfig::default();
    if let Some(cache_dir) = &args.cache_dir {
        config.cache_dir.clone_from(cache_dir);
    }
    if let Some(endpoint) = &args.endpoint {
        config.endpoint.clone_from(endpoint);
    }
    if let Some(config_name) = &args.config_name {
        config.config_name.clone_from(config_name);
    }
    config
}

/// Runs `export` against an arbitrary source and catalog.
///
/// # Errors
/// Returns [`CliError::Export`] when the exporter cannot be built or any tier
/// fails.
#[instrument(
    name = "cli.export",
    err,
    skip(args, catalog, source),
    fields(
        output_dir = %args.output_dir.display(),
        source = source.name(),
        tiers = field::Empty,
        layout = field::Empty,
    ),
)]
pub fn export_with_source<S>(
    args: &ExportArgs,
    catalog: Catalog,
    source: &S,
) -> Result<ExportSummary, CliError>
where
    S: DatasetSource + ?Sized,
{
    let layout = if args.lenient_layout {
        LayoutPolicy::Lenient
    } else {
        LayoutPolicy::Strict
    };
    let tiers = selected_tiers(&args.tiers, &catalog);
    let span = Span::current();
    span.record("tiers", field::display(tier_list(&tiers)));
    span.record("layout", field::debug(layout));

    let exporter = ExporterBuilder::new()
        .with_output_dir(&args.output_dir)
        .with_tiers(tiers)
        .with_layout_policy(layout)
        .with_catalog(catalog)
        .build()?;
    let summary = exporter.run(source)?;
    info!(
        equations = summary.equation_count(),
        files = summary.file_count(),
        "command completed"
    );
    Ok(summary)
}

/// Returns `requested`, or every tier `catalog` describes when none were named.
fn selected_tiers(requested: &[Tier], catalog: &Catalog) -> Vec<Tier> {
    if requested.is_empty() {
        catalog.tiers().iter().map(TierSpec::tier).collect()
    } else {
        requested.to_vec()
    }
}

fn tier_list(tiers: &[Tier]) -> String {
    tiers
        .iter()
        .map(|tier| tier.as_str())
        .collect::<Vec<_>>()
        .join(",")
}

/// Renders `output` to `writer` in a human-readable text format.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
pub fn render_output(output: &CommandOutput, writer: impl Write) -> io::Result<()> {
    match output {
        CommandOutput::Export(summary) => render_summary(summary, writer),
        CommandOutput::Catalog(specs) => render_catalog(specs, writer),
    }
}

/// Renders an export summary, one line per tier and a closing total.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
///
/// # Examples
/// ```
/// use std::path::PathBuf;
/// use feynman_cli::cli::render_summary;
/// use feynman_core::{ExportSummary, Tier, TierReport};
///
/// let summary = ExportSummary {
///     tiers: vec![TierReport {
///         tier: Tier::Easy,
///         repository: "owner/easy".into(),
///         equations: 1,
///         files: vec![PathBuf::from("resources/A_train.csv")],
///     }],
/// };
/// let mut buffer = Vec::new();
/// render_summary(&summary, &mut buffer)?;
/// assert_eq!(
///     String::from_utf8(buffer)?,
///     "easy\towner/easy\t1 equations\t1 files\ntotal\t1 equations\t1 files\n"
/// );
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn render_summary(summary: &ExportSummary, mut writer: impl Write) -> io::Result<()> {
    for report in &summary.tiers {
        writeln!(
            writer,
            "{}\t{}\t{} equations\t{} files",
            report.tier,
            report.repository,
            report.equations,
            report.files.len()
        )?;
    }
    writeln!(
        writer,
        "total\t{} equations\t{} files",
        summary.equation_count(),
        summary.file_count()
    )
}

/// Renders tier specifications followed by their equation identifiers.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
pub fn render_catalog(specs: &[TierSpec], mut writer: impl Write) -> io::Result<()> {
    for spec in specs {
        let sizes = spec.sizes();
        writeln!(
            writer,
            "{}\t{}\t{} equations\ttrain={} validation={} test={}",
            spec.tier(),
            spec.repository(),
            spec.equation_count(),
            sizes.get(Partition::Train),
            sizes.get(Partition::Validation),
            sizes.get(Partition::Test),
        )?;
        for equation in spec.equations() {
            writeln!(writer, "  {equation}")?;
        }
    }
    Ok(())
}
