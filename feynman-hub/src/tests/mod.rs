//! Unit tests for hub listing, caching and shard decoding.

use std::{fs, path::Path};

use feynman_core::{DatasetSource, Partition};
use rstest::{fixture, rstest};
use tempfile::TempDir;

use crate::{
    HubConfig, HubError, HuggingFaceHub, cache::write_atomic, config::cache_dir_from,
    ingest::read_text_column,
};

mod support;

use support::{
    FakeClient, REPOSITORY, config, integer_shard, large_text_shard, listing_url,
    nullable_text_shard, text_shard,
};

#[fixture]
fn cache() -> TempDir {
    TempDir::new().expect("temp dir")
}

fn full_client() -> FakeClient {
    FakeClient::new()
        .with_split("train", vec![text_shard(&["1 2", "3 4"]), text_shard(&["5 6"])])
        .with_split("validation", vec![text_shard(&["7 8"])])
        .with_split("test", vec![large_text_shard(&["9 10"])])
}

#[rstest]
fn fetch_concatenates_shards_in_listing_order(cache: TempDir) {
    let hub = HuggingFaceHub::with_client(config(cache.path()), full_client());
    let dataset = hub.fetch(REPOSITORY).expect("fetch must succeed");

    assert_eq!(dataset.repository(), REPOSITORY);
    assert_eq!(dataset.rows(Partition::Train), ["1 2", "3 4", "5 6"]);
    assert_eq!(dataset.rows(Partition::Validation), ["7 8"]);
    assert_eq!(dataset.rows(Partition::Test), ["9 10"]);
}

#[rstest]
fn second_fetch_is_served_from_cache(cache: TempDir) {
    let hub = HuggingFaceHub::with_client(config(cache.path()), full_client());
    let first = hub.fetch(REPOSITORY).expect("first fetch downloads");
    // Three listings plus four shards.
    assert_eq!(hub.client().calls(), 7);

    let second = hub.fetch(REPOSITORY).expect("second fetch reads the cache");
    assert_eq!(hub.client().calls(), 7);
    assert_eq!(first, second);
}

#[rstest]
fn cache_layout_follows_repository_config_and_split(cache: TempDir) {
    let hub = HuggingFaceHub::with_client(config(cache.path()), full_client());
    hub.fetch(REPOSITORY).expect("fetch must succeed");

    let train = cache
        .path()
        .join("owner--srsd-feynman_easy")
        .join("default")
        .join("train");
    assert!(train.join("shards.json").is_file());
    assert!(train.join("0.parquet").is_file());
    assert!(train.join("1.parquet").is_file());
    assert!(!train.join("0.part").exists());
}

#[rstest]
fn listing_is_requested_from_the_parquet_api(cache: TempDir) {
    let hub = HuggingFaceHub::with_client(config(cache.path()), full_client());
    let shards = hub
        .list_shards(REPOSITORY, Partition::Validation)
        .expect("listing must succeed");
    assert_eq!(shards, ["https://hub.test/files/validation/0.parquet"]);
    assert_eq!(hub.client().requests(), [listing_url("validation")]);
}

#[rstest]
fn empty_listing_is_rejected_and_not_cached(cache: TempDir) {
    let client = FakeClient::new().with_payload(listing_url("train"), b"[]".to_vec());
    let hub = HuggingFaceHub::with_client(config(cache.path()), client);

    let err = hub
        .list_shards(REPOSITORY, Partition::Train)
        .expect_err("no shards must fail");
    assert!(matches!(err, HubError::NoShards { split: "train", .. }));

    hub.list_shards(REPOSITORY, Partition::Train)
        .expect_err("listing is fetched again");
    assert_eq!(hub.client().calls(), 2);
}

#[rstest]
fn malformed_listing_is_reported(cache: TempDir) {
    let client =
        FakeClient::new().with_payload(listing_url("train"), b"{\"error\": \"gated\"}".to_vec());
    let hub = HuggingFaceHub::with_client(config(cache.path()), client);
    let err = hub
        .list_shards(REPOSITORY, Partition::Train)
        .expect_err("object listing must fail");
    assert!(matches!(err, HubError::InvalidListing { ref url, .. } if url == &listing_url("train")));
}

#[rstest]
fn download_failures_propagate(cache: TempDir) {
    let client = FakeClient::new().with_split("train", vec![text_shard(&["1 2"])]);
    let hub = HuggingFaceHub::with_client(config(cache.path()), client);
    let err = hub.fetch(REPOSITORY).expect_err("validation split is missing");
    assert!(matches!(err, HubError::Download { ref url, .. } if url == &listing_url("validation")));
}

#[rstest]
fn invalid_repository_makes_no_requests(cache: TempDir) {
    let hub = HuggingFaceHub::with_client(config(cache.path()), full_client());
    let err = hub.fetch("../escape").expect_err("repository is unsafe");
    assert!(matches!(err, HubError::InvalidName { kind: "repository", .. }));
    assert_eq!(hub.client().calls(), 0);
}

#[rstest]
fn invalid_configuration_name_is_rejected(cache: TempDir) {
    let mut settings = config(cache.path());
    settings.config_name = "../default".to_owned();
    let hub = HuggingFaceHub::with_client(settings, full_client());
    let err = hub.fetch(REPOSITORY).expect_err("configuration is unsafe");
    assert!(matches!(err, HubError::InvalidName { kind: "configuration", .. }));
}

#[rstest]
fn corrupt_shard_is_not_cached(cache: TempDir) {
    let client = FakeClient::new().with_split("train", vec![b"not parquet".to_vec()]);
    let hub = HuggingFaceHub::with_client(config(cache.path()), client);
    let err = hub
        .fetch_partition(REPOSITORY, Partition::Train)
        .expect_err("corrupt shard must fail");
    assert!(matches!(err, HubError::Parquet { .. }));
    let shard = cache
        .path()
        .join("owner--srsd-feynman_easy/default/train/0.parquet");
    assert!(!shard.exists());
}

#[rstest]
fn write_atomic_replaces_a_stale_part_file(cache: TempDir) {
    let path = cache.path().join("shards").join("0.parquet");
    let part = path.with_extension("part");
    fs::create_dir_all(cache.path().join("shards")).expect("create shard dir");
    fs::write(&part, b"interrupted download").expect("seed stale part file");

    write_atomic(&path, b"fresh").expect("write must succeed");

    assert_eq!(fs::read(&path).expect("read back"), b"fresh");
    assert!(!part.exists());
}

#[rstest]
fn fetch_recovers_from_an_interrupted_download(cache: TempDir) {
    let split = cache.path().join("owner--srsd-feynman_easy/default/train");
    fs::create_dir_all(&split).expect("create split dir");
    fs::write(split.join("0.part"), b"truncated").expect("seed stale part file");

    let hub = HuggingFaceHub::with_client(config(cache.path()), full_client());
    hub.fetch_partition(REPOSITORY, Partition::Train)
        .expect("fetch must succeed");

    assert!(split.join("0.parquet").is_file());
    assert!(!split.join("0.part").exists());
}

#[rstest]
fn read_text_column_rejects_null_rows() {
    let payload = nullable_text_shard(&[Some("1 2"), None]);
    let err = read_text_column(&payload, Path::new("0.parquet"), "text")
        .expect_err("null row must fail");
    assert!(matches!(err, HubError::NullRow { row: 1, .. }));
}

#[rstest]
fn read_text_column_requires_the_column() {
    let payload = integer_shard("value", &[1, 2]);
    let err = read_text_column(&payload, Path::new("0.parquet"), "text")
        .expect_err("column is missing");
    assert!(matches!(err, HubError::ColumnNotFound { ref column, .. } if column == "text"));
}

#[rstest]
fn read_text_column_requires_strings() {
    let payload = integer_shard("text", &[1, 2]);
    let err = read_text_column(&payload, Path::new("0.parquet"), "text")
        .expect_err("integers are not text");
    assert!(matches!(err, HubError::InvalidColumnType { .. }));
}

#[rstest]
#[case(&[("FEYNMAN_CACHE_DIR", "/explicit"), ("HOME", "/home/u")], "/explicit")]
#[case(&[("XDG_CACHE_HOME", "/xdg"), ("HOME", "/home/u")], "/xdg/feynman/hub")]
#[case(&[("HOME", "/home/u")], "/home/u/.cache/feynman/hub")]
fn cache_dir_prefers_explicit_settings(#[case] vars: &[(&str, &str)], #[case] expected: &str) {
    let dir = cache_dir_from(|key| {
        vars.iter()
            .find(|(name, _)| *name == key)
            .map(|(_, value)| (*value).into())
    });
    assert_eq!(dir, Path::new(expected));
}

#[rstest]
fn cache_dir_falls_back_to_temp() {
    let dir = cache_dir_from(|_| None);
    assert_eq!(dir, std::env::temp_dir().join("feynman").join("hub"));
}

#[rstest]
fn debug_output_redacts_the_token() {
    let settings = HubConfig {
        token: Some("hf_secret".to_owned()),
        ..config(Path::new("/cache"))
    };
    let rendered = format!("{settings:?}");
    assert!(rendered.contains("<redacted>"));
    assert!(!rendered.contains("hf_secret"));
}
