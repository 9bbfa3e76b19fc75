//! Hub endpoint, cache and credential settings.

use std::{env, ffi::OsString, fmt, path::PathBuf};

/// Hub endpoint used when none is configured.
pub const DEFAULT_ENDPOINT: &str = "https://huggingface.co";
/// Dataset configuration whose parquet conversion is read.
pub const DEFAULT_CONFIG_NAME: &str = "default";
/// Upper bound on the size of a single downloaded response.
pub const DEFAULT_MAX_DOWNLOAD_BYTES: u64 = 1 << 30;
/// Column holding the whitespace-separated row text.
pub const TEXT_COLUMN: &str = "text";

/// Configuration for hub access and caching.
///
/// [`HubConfig::default`] reads `FEYNMAN_CACHE_DIR`, `XDG_CACHE_HOME`, `HOME`
/// and `HF_TOKEN` from the environment.
#[derive(Clone)]
pub struct HubConfig {
    /// Base URL of the hub.
    pub endpoint: String,
    /// Directory where listings and parquet shards are cached.
    pub cache_dir: PathBuf,
    /// Dataset configuration name.
    pub config_name: String,
    /// Access token sent as a bearer credential.
    pub token: Option<String>,
    /// Maximum accepted response size in bytes.
    pub max_download_bytes: u64,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            cache_dir: default_cache_dir(),
            config_name: DEFAULT_CONFIG_NAME.to_owned(),
            token: env::var("HF_TOKEN")
                .ok()
                .filter(|token| !token.trim().is_empty()),
            max_download_bytes: DEFAULT_MAX_DOWNLOAD_BYTES,
        }
    }
}

impl fmt::Debug for HubConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HubConfig")
            .field("endpoint", &self.endpoint)
            .field("cache_dir", &self.cache_dir)
            .field("config_name", &self.config_name)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("max_download_bytes", &self.max_download_bytes)
            .finish()
    }
}

/// Returns the cache directory derived from the process environment.
#[must_use]
pub fn default_cache_dir() -> PathBuf {
    cache_dir_from(|key| env::var_os(key))
}

pub(crate) fn cache_dir_from(lookup: impl Fn(&str) -> Option<OsString>) -> PathBuf {
    if let Some(explicit) = lookup("FEYNMAN_CACHE_DIR") {
        return PathBuf::from(explicit);
    }

    if let Some(xdg_cache) = lookup("XDG_CACHE_HOME") {
        return PathBuf::from(xdg_cache).join("feynman").join("hub");
    }

    if let Some(home) = lookup("HOME") {
        return PathBuf::from(home)
            .join(".cache")
            .join("feynman")
            .join("hub");
    }

    env::temp_dir().join("feynman").join("hub")
}
