//! CSV emission for parsed partitions.
//!
//! Files carry no header row and no index column. Values use the shortest
//! decimal form that round-trips, so `1.0` stays `1.0` and re-parsing a
//! file yields the exact values that were written. Missing values (`NaN`)
//! are written as empty fields.

use std::{
    ffi::OsString,
    fs::{self, File},
    io,
    path::{Path, PathBuf},
};

use csv::{Terminator, WriterBuilder};
use tracing::debug;

use crate::{error::WriteError, parse::NumericTable, partition::Partition};

/// Returns the file name of an equation's partition, e.g. `I.12.1_valid.csv`.
///
/// # Examples
/// ```
/// use feynman_core::{Partition, output_file_name};
///
/// assert_eq!(output_file_name("I.12.1", Partition::Validation), "I.12.1_valid.csv");
/// ```
#[must_use]
pub fn output_file_name(equation: &str, partition: Partition) -> String {
    format!("{equation}_{}.csv", partition.file_suffix())
}

/// Returns the output path of an equation's partition inside `dir`.
#[must_use]
pub fn output_path(dir: &Path, equation: &str, partition: Partition) -> PathBuf {
    dir.join(output_file_name(equation, partition))
}

/// Writes `table` to `writer` as header-less CSV with `\n` line endings.
///
/// `NaN` values become empty fields.
///
/// # Errors
/// Returns [`csv::Error`] if encoding or writing fails.
///
/// # Examples
/// ```
/// use feynman_core::{NumericTable, write_csv};
///
/// let table = NumericTable::from_lines(["1.0 2.5 -3.25"], 0)?;
/// let mut buffer = Vec::new();
/// write_csv(&table, &mut buffer)?;
/// assert_eq!(String::from_utf8(buffer)?, "1.0,2.5,-3.25\n");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn write_csv<W: io::Write>(table: &NumericTable, writer: W) -> Result<(), csv::Error> {
    let mut csv_writer = WriterBuilder::new()
        .has_headers(false)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(writer);
    let mut record: Vec<Option<f64>> = Vec::with_capacity(table.width());
    for row in table.iter_rows() {
        record.clear();
        record.extend(row.iter().map(|&value| (!value.is_nan()).then_some(value)));
        csv_writer.serialize(&record)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Writes `table` to `path`, replacing any existing file.
///
/// The data is written to a sibling `.part` file and renamed into place, so
/// `path` either keeps its previous contents or holds the complete table.
/// The parent directory must already exist.
///
/// # Errors
/// Returns [`WriteError`] if the file cannot be created, encoded or renamed.
pub fn write_csv_file(table: &NumericTable, path: &Path) -> Result<(), WriteError> {
    let part_path = part_path(path);
    let result = write_part(table, path, &part_path).and_then(|()| {
        fs::rename(&part_path, path).map_err(|source| WriteError::Io {
            path: path.to_path_buf(),
            source,
        })
    });
    if result.is_err()
        && part_path.exists()
        && let Err(err) = fs::remove_file(&part_path)
    {
        debug!(path = %part_path.display(), error = %err, "failed to remove partial file");
    }
    result
}

fn write_part(table: &NumericTable, path: &Path, part_path: &Path) -> Result<(), WriteError> {
    let file = File::create(part_path).map_err(|source| WriteError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    write_csv(table, file).map_err(|source| WriteError::Csv {
        path: path.to_path_buf(),
        source,
    })
}

fn part_path(path: &Path) -> PathBuf {
    let mut raw = OsString::from(path.as_os_str());
    raw.push(".part");
    PathBuf::from(raw)
}
