//! Core library for exporting the SRSD Feynman symbolic-regression benchmark.
//!
//! The benchmark is published as three remote datasets, one per difficulty
//! [`Tier`]. Each dataset stores the rows of every equation in the tier back
//! to back inside its train, validation and test partitions. This crate
//! locates one equation's rows ([`row_range`]), parses them
//! ([`NumericTable`]) and writes them to CSV ([`write_csv_file`]).
//! [`Exporter`] drives the whole pipeline over any [`DatasetSource`].

mod catalog;
mod dataset;
mod error;
mod export;
mod parse;
mod partition;
mod slice;
mod write;

pub use crate::{
    catalog::{Catalog, Tier, TierSpec},
    dataset::{DatasetSource, TierDataset},
    error::{
        CatalogError, ExportError, ExportErrorCode, ParseError, Result, SliceError, SourceError,
        TableError, WriteError,
    },
    export::{
        DEFAULT_OUTPUT_DIR, ExportSummary, Exporter, ExporterBuilder, LayoutPolicy, TierReport,
    },
    parse::{NumericTable, parse_row},
    partition::{Partition, PartitionSizes},
    slice::{EquationRanges, row_range},
    write::{output_file_name, output_path, write_csv, write_csv_file},
};
