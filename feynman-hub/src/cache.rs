//! Download-once disk cache.
//!
//! Payloads are decoded before they are cached, so a truncated or malformed
//! download never lands in the cache.

use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::{debug, info};

use crate::{client::HubClient, errors::HubError};

/// Returns the decoded contents of `path`, downloading `url` on a miss.
pub(crate) fn ensure_cached<T, F>(
    path: &Path,
    url: &str,
    client: &dyn HubClient,
    decode: F,
) -> Result<T, HubError>
where
    F: Fn(&[u8]) -> Result<T, HubError>,
{
    if path.exists() {
        debug!(path = %path.display(), "cache hit");
        let bytes = fs::read(path).map_err(|source| io_error(path, source))?;
        return decode(&bytes);
    }

    let payload = client.download_bytes(url)?;
    let decoded = decode(&payload)?;
    write_atomic(path, &payload)?;
    info!(url, bytes = payload.len(), path = %path.display(), "cached download");
    Ok(decoded)
}

pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), HubError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| io_error(parent, source))?;
    }
    let mut part_path = path.to_path_buf();
    part_path.set_extension("part");
    if part_path.exists() {
        fs::remove_file(&part_path).map_err(|source| io_error(&part_path, source))?;
    }
    fs::write(&part_path, bytes).map_err(|source| io_error(&part_path, source))?;
    fs::rename(&part_path, path).map_err(|source| io_error(path, source))
}

fn io_error(path: &Path, source: std::io::Error) -> HubError {
    HubError::Io {
        path: PathBuf::from(path),
        source,
    }
}
