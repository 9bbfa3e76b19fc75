//! [`DatasetSource`] over the parquet conversion of hub datasets.

use std::path::PathBuf;

use feynman_core::{DatasetSource, Partition, TierDataset};
use tracing::{Span, field, info, instrument};

use crate::{
    cache::ensure_cached,
    client::{HubClient, UreqHubClient},
    config::{HubConfig, TEXT_COLUMN},
    errors::HubError,
    ingest::read_text_column,
};

const LISTING_FILE: &str = "shards.json";

/// Fetches benchmark repositories from the Hugging Face Hub.
///
/// Shard listings and shards are cached under
/// `{cache_dir}/{owner}--{name}/{config}/{split}/`, so later fetches of the
/// same repository make no requests.
#[derive(Debug)]
pub struct HuggingFaceHub<C = UreqHubClient> {
    config: HubConfig,
    client: C,
}

impl HuggingFaceHub {
    /// Creates a hub source that talks HTTP through `ureq`.
    #[must_use]
    pub fn new(config: HubConfig) -> Self {
        let client = UreqHubClient::new(config.token.clone(), config.max_download_bytes);
        Self { config, client }
    }
}

impl<C: HubClient> HuggingFaceHub<C> {
    /// Creates a hub source that issues requests through `client`.
    #[must_use]
    pub const fn with_client(config: HubConfig, client: C) -> Self {
        Self { config, client }
    }

    /// Returns the active configuration.
    #[must_use]
    pub const fn config(&self) -> &HubConfig {
        &self.config
    }

    /// Returns the transport client.
    #[must_use]
    pub const fn client(&self) -> &C {
        &self.client
    }

    /// Returns the parquet shard URLs of `partition`, in row order.
    ///
    /// # Errors
    /// Returns [`HubError`] when the names are invalid, the listing cannot be
    /// downloaded or decoded, or it names no shards.
    pub fn list_shards(
        &self,
        repository: &str,
        partition: Partition,
    ) -> Result<Vec<String>, HubError> {
        let split = partition.split_name();
        let url = self.listing_url(repository, split);
        let path = self.split_dir(repository, split)?.join(LISTING_FILE);
        ensure_cached(&path, &url, &self.client, |bytes| {
            let shards: Vec<String> =
                serde_json::from_slice(bytes).map_err(|source| HubError::InvalidListing {
                    url: url.clone(),
                    source,
                })?;
            if shards.is_empty() {
                return Err(HubError::NoShards {
                    repository: repository.to_owned(),
                    split,
                });
            }
            Ok(shards)
        })
    }

    /// Downloads (or reads from cache) every shard of `partition` and returns
    /// the concatenated text rows.
    ///
    /// # Errors
    /// Returns [`HubError`] when listing, downloading or decoding fails.
    #[instrument(
        name = "hub.partition",
        err,
        skip(self),
        fields(split = partition.split_name(), shards = field::Empty, rows = field::Empty),
    )]
    pub fn fetch_partition(
        &self,
        repository: &str,
        partition: Partition,
    ) -> Result<Vec<String>, HubError> {
        let shards = self.list_shards(repository, partition)?;
        let dir = self.split_dir(repository, partition.split_name())?;
        let mut rows = Vec::new();
        for (index, url) in shards.iter().enumerate() {
            let path = dir.join(format!("{index}.parquet"));
            rows.extend(ensure_cached(&path, url, &self.client, |bytes| {
                read_text_column(bytes, &path, TEXT_COLUMN)
            })?);
        }
        let span = Span::current();
        span.record("shards", shards.len());
        span.record("rows", rows.len());
        Ok(rows)
    }

    fn listing_url(&self, repository: &str, split: &str) -> String {
        format!(
            "{}/api/datasets/{repository}/parquet/{}/{split}",
            self.config.endpoint.trim_end_matches('/'),
            self.config.config_name,
        )
    }

    fn split_dir(&self, repository: &str, split: &str) -> Result<PathBuf, HubError> {
        let (owner, name) = split_repository(repository)?;
        validate_segment("configuration", &self.config.config_name)?;
        Ok(self
            .config
            .cache_dir
            .join(format!("{owner}--{name}"))
            .join(&self.config.config_name)
            .join(split))
    }
}

impl<C: HubClient> DatasetSource for HuggingFaceHub<C> {
    type Error = HubError;

    fn name(&self) -> &str {
        &self.config.endpoint
    }

    #[instrument(name = "hub.fetch", err, skip(self), fields(endpoint = %self.config.endpoint))]
    fn fetch(&self, repository: &str) -> Result<TierDataset, HubError> {
        let mut dataset = TierDataset::new(repository);
        for partition in Partition::ALL {
            let rows = self.fetch_partition(repository, partition)?;
            dataset = dataset.with_partition(partition, rows);
        }
        info!(
            train = dataset.len(Partition::Train),
            validation = dataset.len(Partition::Validation),
            test = dataset.len(Partition::Test),
            "repository fetched"
        );
        Ok(dataset)
    }
}

/// Splits `owner/name`, rejecting anything unsafe as a cache path.
fn split_repository(repository: &str) -> Result<(&str, &str), HubError> {
    let invalid = || HubError::InvalidName {
        kind: "repository",
        value: repository.to_owned(),
    };
    let (owner, name) = repository.split_once('/').ok_or_else(invalid)?;
    validate_segment("repository", owner).map_err(|_| invalid())?;
    validate_segment("repository", name).map_err(|_| invalid())?;
    Ok((owner, name))
}

fn validate_segment(kind: &'static str, value: &str) -> Result<(), HubError> {
    let allowed = |c: char| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.');
    if value.is_empty() || value.chars().all(|c| c == '.') || !value.chars().all(allowed) {
        return Err(HubError::InvalidName {
            kind,
            value: value.to_owned(),
        });
    }
    Ok(())
}
