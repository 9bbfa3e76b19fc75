use std::{cell::RefCell, collections::HashMap, sync::Arc};

use arrow_array::{ArrayRef, Int64Array, LargeStringArray, RecordBatch, StringArray};
use arrow_schema::{DataType, Field, Schema};
use parquet::arrow::arrow_writer::ArrowWriter;

use crate::{HubClient, HubConfig, HubError};

pub(crate) const ENDPOINT: &str = "https://hub.test";
pub(crate) const REPOSITORY: &str = "owner/srsd-feynman_easy";

/// Serves canned payloads and records every requested URL.
pub(crate) struct FakeClient {
    payloads: HashMap<String, Vec<u8>>,
    requests: RefCell<Vec<String>>,
}

impl FakeClient {
    pub(crate) fn new() -> Self {
        Self {
            payloads: HashMap::new(),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub(crate) fn with_payload(mut self, url: impl Into<String>, payload: Vec<u8>) -> Self {
        self.payloads.insert(url.into(), payload);
        self
    }

    /// Registers a listing for `split` with one shard per entry of `shards`.
    pub(crate) fn with_split(mut self, split: &str, shards: Vec<Vec<u8>>) -> Self {
        let urls: Vec<String> = (0..shards.len())
            .map(|index| format!("{ENDPOINT}/files/{split}/{index}.parquet"))
            .collect();
        let listing = serde_json::to_vec(&urls).expect("listing serialises");
        self.payloads.insert(listing_url(split), listing);
        for (url, shard) in urls.into_iter().zip(shards) {
            self.payloads.insert(url, shard);
        }
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.requests.borrow().len()
    }

    pub(crate) fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }
}

impl HubClient for FakeClient {
    fn download_bytes(&self, url: &str) -> Result<Vec<u8>, HubError> {
        self.requests.borrow_mut().push(url.to_owned());
        self.payloads
            .get(url)
            .cloned()
            .ok_or_else(|| HubError::Download {
                url: url.to_owned(),
                message: "missing fake payload".to_owned(),
            })
    }
}

pub(crate) fn listing_url(split: &str) -> String {
    format!("{ENDPOINT}/api/datasets/{REPOSITORY}/parquet/default/{split}")
}

pub(crate) fn config(cache_dir: &std::path::Path) -> HubConfig {
    HubConfig {
        endpoint: ENDPOINT.to_owned(),
        cache_dir: cache_dir.to_path_buf(),
        config_name: "default".to_owned(),
        token: None,
        max_download_bytes: 1 << 20,
    }
}

pub(crate) fn text_shard(rows: &[&str]) -> Vec<u8> {
    let array = StringArray::from_iter_values(rows.iter().copied());
    write_parquet(
        Field::new("text", DataType::Utf8, false),
        Arc::new(array) as ArrayRef,
    )
}

pub(crate) fn nullable_text_shard(rows: &[Option<&str>]) -> Vec<u8> {
    let array = StringArray::from(rows.to_vec());
    write_parquet(
        Field::new("text", DataType::Utf8, true),
        Arc::new(array) as ArrayRef,
    )
}

pub(crate) fn large_text_shard(rows: &[&str]) -> Vec<u8> {
    let array = LargeStringArray::from_iter_values(rows.iter().copied());
    write_parquet(
        Field::new("text", DataType::LargeUtf8, false),
        Arc::new(array) as ArrayRef,
    )
}

pub(crate) fn integer_shard(column: &str, values: &[i64]) -> Vec<u8> {
    let array = Int64Array::from(values.to_vec());
    write_parquet(
        Field::new(column, DataType::Int64, false),
        Arc::new(array) as ArrayRef,
    )
}

pub(crate) fn write_parquet(field: Field, array: ArrayRef) -> Vec<u8> {
    let schema = Arc::new(Schema::new(vec![field]));
    let batch = RecordBatch::try_new(schema.clone(), vec![array]).expect("batch");
    let mut buffer = Vec::new();
    {
        let mut writer = ArrowWriter::try_new(&mut buffer, schema, None).expect("writer");
        writer.write(&batch).expect("write");
        writer.close().expect("close");
    }
    buffer
}
