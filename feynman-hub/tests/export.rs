#![expect(clippy::expect_used, reason = "tests require contextual panics")]
//! Exports a small tier end to end through [`HuggingFaceHub`].

use std::{collections::HashMap, fs, sync::Arc};

use arrow_array::{ArrayRef, RecordBatch, StringArray};
use arrow_schema::{DataType, Field, Schema};
use feynman_core::{Catalog, ExportError, ExporterBuilder, PartitionSizes, Tier, TierSpec};
use feynman_hub::{HubClient, HubConfig, HubError, HuggingFaceHub};
use parquet::arrow::arrow_writer::ArrowWriter;
use rstest::rstest;
use tempfile::TempDir;

const ENDPOINT: &str = "https://hub.test";
const REPOSITORY: &str = "owner/tiny";

struct StaticClient(HashMap<String, Vec<u8>>);

impl HubClient for StaticClient {
    fn download_bytes(&self, url: &str) -> Result<Vec<u8>, HubError> {
        self.0.get(url).cloned().ok_or_else(|| HubError::Download {
            url: url.to_owned(),
            message: "404 Not Found".to_owned(),
        })
    }
}

fn shard(rows: &[&str]) -> Vec<u8> {
    let schema = Arc::new(Schema::new(vec![Field::new("text", DataType::Utf8, false)]));
    let array = Arc::new(StringArray::from_iter_values(rows.iter().copied())) as ArrayRef;
    let batch = RecordBatch::try_new(schema.clone(), vec![array]).expect("batch");
    let mut buffer = Vec::new();
    let mut writer = ArrowWriter::try_new(&mut buffer, schema, None).expect("writer");
    writer.write(&batch).expect("write");
    writer.close().expect("close");
    buffer
}

fn client(splits: &[(&str, &[&str])]) -> StaticClient {
    let mut payloads = HashMap::new();
    for (split, rows) in splits {
        let shard_url = format!("{ENDPOINT}/shards/{split}/0000.parquet");
        let listing = serde_json::to_vec(&[&shard_url]).expect("listing serialises");
        payloads.insert(
            format!("{ENDPOINT}/api/datasets/{REPOSITORY}/parquet/default/{split}"),
            listing,
        );
        payloads.insert(shard_url, shard(rows));
    }
    StaticClient(payloads)
}

fn tiny_catalog() -> Catalog {
    Catalog::new(vec![TierSpec::new(
        Tier::Easy,
        REPOSITORY,
        &["A1", "A2"],
        PartitionSizes::new(2, 1, 1),
    )])
}

fn hub(cache: &TempDir, client: StaticClient) -> HuggingFaceHub<StaticClient> {
    let config = HubConfig {
        endpoint: ENDPOINT.to_owned(),
        cache_dir: cache.path().to_path_buf(),
        config_name: "default".to_owned(),
        token: None,
        max_download_bytes: 1 << 20,
    };
    HuggingFaceHub::with_client(config, client)
}

#[rstest]
fn exports_tier_fetched_from_hub() {
    let cache = TempDir::new().expect("cache dir");
    let output = TempDir::new().expect("output dir");
    let source = hub(
        &cache,
        client(&[
            ("train", &["1 2", "3 4", "5 6", "7 8"]),
            ("validation", &["0.5 1", "1.5 2"]),
            ("test", &["-1 1e3", "2 2"]),
        ]),
    );
    let exporter = ExporterBuilder::new()
        .with_output_dir(output.path())
        .with_catalog(tiny_catalog())
        .with_tiers([Tier::Easy])
        .build()
        .expect("configuration is valid");

    let summary = exporter.run(&source).expect("export must succeed");
    assert_eq!(summary.file_count(), 6);

    let read = |name: &str| fs::read_to_string(output.path().join(name)).expect("file exists");
    assert_eq!(read("A1_train.csv"), "1.0,2.0\n3.0,4.0\n");
    assert_eq!(read("A2_train.csv"), "5.0,6.0\n7.0,8.0\n");
    assert_eq!(read("A1_valid.csv"), "0.5,1.0\n");
    assert_eq!(read("A2_test.csv"), "2.0,2.0\n");
    assert_eq!(read("A1_test.csv"), "-1.0,1000.0\n");
}

#[rstest]
fn hub_failures_surface_as_fetch_errors() {
    let cache = TempDir::new().expect("cache dir");
    let output = TempDir::new().expect("output dir");
    let source = hub(&cache, client(&[("train", &["1 2", "3 4", "5 6", "7 8"])]));
    let exporter = ExporterBuilder::new()
        .with_output_dir(output.path())
        .with_catalog(tiny_catalog())
        .with_tiers([Tier::Easy])
        .build()
        .expect("configuration is valid");

    let err = exporter.run(&source).expect_err("validation split is missing");
    assert_eq!(err.code().as_str(), "EXPORT_FETCH_FAILED");
    let ExportError::Fetch {
        repository,
        source: cause,
        ..
    } = err
    else {
        panic!("expected a fetch error");
    };
    assert_eq!(repository, REPOSITORY);
    let hub_error = cause
        .downcast_ref::<HubError>()
        .expect("source is a hub error");
    assert!(matches!(hub_error, HubError::Download { .. }));
}
