//! Command-line interface for exporting the Feynman benchmark.
//!
//! `feynman` with no arguments runs `export` with its defaults: every tier is
//! fetched from the Hugging Face Hub and written to `resources/`. `catalog`
//! prints the built-in tier table without touching the network.

mod commands;

pub use commands::{
    CatalogArgs, Cli, CliError, Command, CommandOutput, ExportArgs, export_with_source, hub_config,
    render_catalog, render_output, render_summary, run_cli,
};

#[cfg(test)]
mod test_helpers;
