//! Error types for the Feynman export pipeline.
//!
//! Every failure is fatal for the run. [`ExportError`] carries a stable
//! machine-readable [`ExportErrorCode`] so the binary can log failures
//! without string matching.

use std::{error::Error as StdError, fmt, io, ops::Range, path::PathBuf};

use thiserror::Error;

use crate::{catalog::Tier, partition::Partition};

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// Failure to resolve a tier in a [`crate::Catalog`].
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum CatalogError {
    /// The tier name is not one of `easy`, `medium` or `hard`.
    #[error("unknown tier `{name}`; expected one of easy, medium, hard")]
    UnknownTier {
        /// Name supplied by the caller.
        name: String,
    },
    /// The catalog has no entry for a known tier.
    #[error("catalog has no entry for tier `{tier}`")]
    MissingTier {
        /// Tier that was requested.
        tier: Tier,
    },
}

/// Failure to turn one text row into numbers.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum ParseError {
    /// A whitespace-separated token is not a floating-point number.
    #[error("token `{token}` in column {column} is not a number")]
    InvalidToken {
        /// Zero-based column of the token.
        column: usize,
        /// Offending token text.
        token: String,
    },
}

/// A [`ParseError`] located at an absolute row of its partition.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("row {row}: {source}")]
pub struct TableError {
    /// Absolute row index within the partition.
    pub row: usize,
    /// What went wrong with the row.
    #[source]
    pub source: ParseError,
}

/// Failure to compute or apply a row range.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum SliceError {
    /// `index * count` does not fit in `usize`.
    #[error("row range for equation {index} with {count} rows overflows usize")]
    Overflow {
        /// Sequential equation index.
        index: usize,
        /// Rows per equation.
        count: usize,
    },
    /// The equation index is not below the tier's equation count.
    #[error("equation {index} requested but the tier has {equations} equations")]
    UnknownEquation {
        /// Requested sequential equation index.
        index: usize,
        /// Equations in the tier.
        equations: usize,
    },
    /// The range extends past the rows the partition holds.
    #[error("rows {}..{} requested from {partition} but only {available} rows exist", .range.start, .range.end)]
    OutOfRange {
        /// Partition being sliced.
        partition: Partition,
        /// Requested half-open range.
        range: Range<usize>,
        /// Rows available in the partition.
        available: usize,
    },
}

/// Failure to emit a CSV file.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum WriteError {
    /// Creating, writing or renaming the file failed.
    #[error("failed to write `{path}`: {source}")]
    Io {
        /// Destination path.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// The CSV encoder failed.
    #[error("failed to encode CSV for `{path}`: {source}")]
    Csv {
        /// Destination path.
        path: PathBuf,
        /// Underlying encoder error.
        #[source]
        source: csv::Error,
    },
}

/// Boxed error returned by a [`crate::DatasetSource`].
pub type SourceError = Box<dyn StdError + Send + Sync + 'static>;

/// Error type produced while exporting benchmark partitions.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ExportError {
    /// The output directory does not exist or is not a directory.
    #[error("output directory `{path}` does not exist")]
    OutputDirMissing {
        /// Configured output directory.
        path: PathBuf,
    },
    /// A tier could not be resolved in the catalog.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    /// The dataset source failed to fetch a tier.
    #[error("failed to fetch `{repository}` for tier `{tier}`: {source}")]
    Fetch {
        /// Tier being fetched.
        tier: Tier,
        /// Remote repository path.
        repository: String,
        /// Error reported by the source.
        #[source]
        source: SourceError,
    },
    /// A partition does not hold the row count the catalog promises.
    #[error(
        "tier `{tier}` partition `{partition}` has {actual} rows but the catalog requires {expected}"
    )]
    Layout {
        /// Tier being exported.
        tier: Tier,
        /// Partition with the wrong length.
        partition: Partition,
        /// Rows required by the catalog.
        expected: usize,
        /// Rows actually fetched.
        actual: usize,
    },
    /// A row range could not be computed or applied.
    #[error(transparent)]
    Slice(#[from] SliceError),
    /// A row of an equation failed to parse.
    #[error("failed to parse `{equation}` {partition} data: {source}")]
    Parse {
        /// Equation identifier.
        equation: String,
        /// Partition being parsed.
        partition: Partition,
        /// Located parse failure.
        #[source]
        source: TableError,
    },
    /// An output file could not be written.
    #[error(transparent)]
    Write(#[from] WriteError),
}

define_error_codes! {
    /// Stable codes describing [`ExportError`] variants.
    enum ExportErrorCode for ExportError {
        /// The output directory does not exist.
        OutputDirMissing => OutputDirMissing { .. } => "EXPORT_OUTPUT_DIR_MISSING",
        /// A tier could not be resolved in the catalog.
        CatalogLookup => Catalog { .. } => "EXPORT_CATALOG_LOOKUP_FAILED",
        /// The dataset source failed to fetch a tier.
        FetchFailed => Fetch { .. } => "EXPORT_FETCH_FAILED",
        /// A partition does not hold the expected number of rows.
        LayoutMismatch => Layout { .. } => "EXPORT_LAYOUT_MISMATCH",
        /// A row range could not be computed or applied.
        SliceFailed => Slice { .. } => "EXPORT_SLICE_FAILED",
        /// A row failed to parse.
        ParseFailed => Parse { .. } => "EXPORT_PARSE_FAILED",
        /// An output file could not be written.
        WriteFailed => Write { .. } => "EXPORT_WRITE_FAILED",
    }
}

/// Convenient alias for results returned by the export pipeline.
pub type Result<T> = core::result::Result<T, ExportError>;
