//! HTTP transport used by [`crate::HuggingFaceHub`].

use std::fmt;

use ureq::Agent;

use crate::{config::DEFAULT_MAX_DOWNLOAD_BYTES, errors::HubError};

/// Download client abstraction for hub requests.
pub trait HubClient {
    /// Downloads URL contents as bytes.
    ///
    /// # Errors
    /// Returns [`HubError::Download`] if the request fails, the server
    /// answers with an error status or the body exceeds the size limit.
    fn download_bytes(&self, url: &str) -> Result<Vec<u8>, HubError>;
}

/// [`HubClient`] backed by a blocking `ureq` agent.
#[derive(Clone)]
pub struct UreqHubClient {
    agent: Agent,
    token: Option<String>,
    max_download_bytes: u64,
}

impl UreqHubClient {
    /// Creates a client that sends `token` as a bearer credential and
    /// refuses bodies larger than `max_download_bytes`.
    #[must_use]
    pub fn new(token: Option<String>, max_download_bytes: u64) -> Self {
        Self {
            agent: Agent::new_with_defaults(),
            token,
            max_download_bytes,
        }
    }
}

impl Default for UreqHubClient {
    fn default() -> Self {
        Self::new(None, DEFAULT_MAX_DOWNLOAD_BYTES)
    }
}

impl fmt::Debug for UreqHubClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UreqHubClient")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("max_download_bytes", &self.max_download_bytes)
            .finish_non_exhaustive()
    }
}

impl HubClient for UreqHubClient {
    fn download_bytes(&self, url: &str) -> Result<Vec<u8>, HubError> {
        let download_error = |message: String| HubError::Download {
            url: url.to_owned(),
            message,
        };

        let mut request = self.agent.get(url);
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("Bearer {token}"));
        }
        let mut response = request
            .call()
            .map_err(|error| download_error(error.to_string()))?;

        response
            .body_mut()
            .with_config()
            .limit(self.max_download_bytes)
            .read_to_vec()
            .map_err(|error| download_error(error.to_string()))
    }
}
