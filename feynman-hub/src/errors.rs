//! Error type for hub access, caching and shard decoding.

use std::{io, path::PathBuf};

use arrow_schema::{ArrowError, DataType};
use thiserror::Error;

/// Errors raised while fetching a dataset from the hub.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum HubError {
    /// A repository or configuration name cannot be used as a path segment.
    #[error("invalid {kind} `{value}`")]
    InvalidName {
        /// What the name identifies, e.g. `repository`.
        kind: &'static str,
        /// Rejected value.
        value: String,
    },
    /// An HTTP request failed or its body could not be read.
    #[error("download failed for `{url}`: {message}")]
    Download {
        /// URL that failed.
        url: String,
        /// Human-readable failure message.
        message: String,
    },
    /// A shard listing is not a JSON array of URLs.
    #[error("invalid shard listing from `{url}`: {source}")]
    InvalidListing {
        /// Listing URL.
        url: String,
        /// Decoder error.
        #[source]
        source: serde_json::Error,
    },
    /// A split has no parquet shards.
    #[error("`{repository}` has no parquet shards for split `{split}`")]
    NoShards {
        /// Repository being fetched.
        repository: String,
        /// Hub split name.
        split: &'static str,
    },
    /// A shard has no text column.
    #[error("column `{column}` not found in `{path}`")]
    ColumnNotFound {
        /// Cached shard path.
        path: PathBuf,
        /// Missing column.
        column: String,
    },
    /// The text column is not a string column.
    #[error("column `{column}` in `{path}` must hold strings but found {actual:?}")]
    InvalidColumnType {
        /// Cached shard path.
        path: PathBuf,
        /// Column name.
        column: String,
        /// Stored Arrow type.
        actual: DataType,
    },
    /// A row of the text column is null.
    #[error("row {row} of `{path}` is null")]
    NullRow {
        /// Cached shard path.
        path: PathBuf,
        /// Row index within the shard.
        row: usize,
    },
    /// The parquet reader rejected a shard.
    #[error("failed to read parquet shard `{path}`: {source}")]
    Parquet {
        /// Cached shard path.
        path: PathBuf,
        /// Reader error.
        #[source]
        source: parquet::errors::ParquetError,
    },
    /// A record batch could not be decoded.
    #[error("failed to decode record batch of `{path}`: {source}")]
    Arrow {
        /// Cached shard path.
        path: PathBuf,
        /// Decoder error.
        #[source]
        source: ArrowError,
    },
    /// Reading or writing the cache failed.
    #[error("cache I/O failed for `{path}`: {source}")]
    Io {
        /// Cache path involved.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
}
