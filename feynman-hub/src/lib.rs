//! Hugging Face Hub access for the Feynman benchmark exporter.
//!
//! [`HuggingFaceHub`] implements [`feynman_core::DatasetSource`]. For each
//! split it lists the parquet conversion of the dataset, downloads every
//! shard once into an on-disk cache and decodes the `text` column into
//! row strings.

mod cache;
mod client;
mod config;
mod errors;
mod hub;
mod ingest;

pub use crate::{
    client::{HubClient, UreqHubClient},
    config::{
        DEFAULT_CONFIG_NAME, DEFAULT_ENDPOINT, DEFAULT_MAX_DOWNLOAD_BYTES, HubConfig,
        TEXT_COLUMN, default_cache_dir,
    },
    errors::HubError,
    hub::HuggingFaceHub,
};

#[cfg(test)]
mod tests;
