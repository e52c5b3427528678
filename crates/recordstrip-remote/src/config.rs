use std::time::Duration;

use crate::errors::RemoteError;

/// Configuration shared by the row-store and auth clients.
#[derive(Clone, Debug)]
pub struct RemoteConfig {
    /// Base URL of the hosted project (no trailing path).
    pub base_url: String,
    /// Project API key, sent on every request.
    pub api_key: String,
    /// Default HTTP timeout for requests.
    pub timeout: Duration,
}

impl RemoteConfig {
    /// Creates a config with the default timeout.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Builds a config from `RECORDSTRIP_API_URL` and `RECORDSTRIP_API_KEY`.
    pub fn from_env() -> Result<Self, RemoteError> {
        let base_url = std::env::var("RECORDSTRIP_API_URL").unwrap_or_default();
        if base_url.trim().is_empty() {
            return Err(RemoteError::Config(
                "missing RECORDSTRIP_API_URL for the hosted project".into(),
            ));
        }
        let api_key = std::env::var("RECORDSTRIP_API_KEY").unwrap_or_default();
        if api_key.trim().is_empty() {
            return Err(RemoteError::Config(
                "missing RECORDSTRIP_API_KEY for the hosted project".into(),
            ));
        }
        Ok(Self::new(base_url, api_key))
    }

    /// Overrides the default HTTP timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub(crate) fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url.trim_end_matches('/'), table)
    }

    pub(crate) fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url.trim_end_matches('/'), path)
    }
}
