//! Decoding of the text column of parquet shards.
use std::path::Path;

use arrow_array::{Array, LargeStringArray, RecordBatchReader, StringArray, StringViewArray};
use arrow_schema::DataType;
use bytes::Bytes;
use parquet::{
    arrow::{ProjectionMask, arrow_reader::ParquetRecordBatchReaderBuilder},
    errors::ParquetError,
};

use crate::errors::HubError;

/// Decodes every row of `column` in the parquet `payload`, in file order.
///
/// `path` identifies the shard in error reports.
pub(crate) fn read_text_column(
    payload: &[u8],
    path: &Path,
    column: &str,
) -> Result<Vec<String>, HubError> {
    let parquet_error = |source: ParquetError| HubError::Parquet {
        path: path.to_path_buf(),
        source,
    };
    let builder = ParquetRecordBatchReaderBuilder::try_new(Bytes::copy_from_slice(payload))
        .map_err(parquet_error)?;
    let mask = ProjectionMask::columns(builder.parquet_schema(), [column]);
    let reader = builder
        .with_projection(mask)
        .build()
        .map_err(parquet_error)?;
    let schema = reader.schema();
    let index = schema
        .index_of(column)
        .map_err(|_| HubError::ColumnNotFound {
            path: path.to_path_buf(),
            column: column.to_owned(),
        })?;
    validate_text_type(schema.field(index).data_type(), path, column)?;

    let mut rows = Vec::new();
    for next in reader {
        let batch = next.map_err(|source| HubError::Arrow {
            path: path.to_path_buf(),
            source,
        })?;
        append_text_rows(batch.column(index).as_ref(), path, column, &mut rows)?;
    }
    Ok(rows)
}

fn validate_text_type(data_type: &DataType, path: &Path, column: &str) -> Result<(), HubError> {
    match data_type {
        DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View => Ok(()),
        other => Err(invalid_type(other, path, column)),
    }
}

fn append_text_rows(
    array: &dyn Array,
    path: &Path,
    column: &str,
    out: &mut Vec<String>,
) -> Result<(), HubError> {
    let any = array.as_any();
    if let Some(strings) = any.downcast_ref::<StringArray>() {
        return push_rows(strings.iter(), path, out);
    }
    if let Some(strings) = any.downcast_ref::<LargeStringArray>() {
        return push_rows(strings.iter(), path, out);
    }
    if let Some(strings) = any.downcast_ref::<StringViewArray>() {
        return push_rows(strings.iter(), path, out);
    }
    Err(invalid_type(array.data_type(), path, column))
}

fn push_rows<'a>(
    values: impl Iterator<Item = Option<&'a str>>,
    path: &Path,
    out: &mut Vec<String>,
) -> Result<(), HubError> {
    let start_row = out.len();
    out.reserve(values.size_hint().0);
    for (offset, value) in values.enumerate() {
        let Some(text) = value else {
            return Err(HubError::NullRow {
                path: path.to_path_buf(),
                row: start_row + offset,
            });
        };
        out.push(text.to_owned());
    }
    Ok(())
}

fn invalid_type(actual: &DataType, path: &Path, column: &str) -> HubError {
    HubError::InvalidColumnType {
        path: path.to_path_buf(),
        column: column.to_owned(),
        actual: actual.clone(),
    }
}
