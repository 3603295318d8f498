//! Transport configuration

use crate::error::ApiError;

/// Connection settings for the todo service
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Base URL of the REST API, without a trailing slash
    pub base_url: String,
    /// API key sent as the `API-KEY` header
    pub api_key: String,
}

impl ApiConfig {
    /// Creates a configuration from explicit values
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Self {
            base_url,
            api_key: api_key.into(),
        }
    }

    /// Creates a configuration from `BOARDSYNC_API_URL` and
    /// `BOARDSYNC_API_KEY`
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::MissingBaseUrl`] or [`ApiError::MissingApiKey`]
    /// when the corresponding variable is not set.
    pub fn from_env() -> Result<Self, ApiError> {
        let base_url = std::env::var("BOARDSYNC_API_URL").map_err(|_| ApiError::MissingBaseUrl)?;
        let api_key = std::env::var("BOARDSYNC_API_KEY").map_err(|_| ApiError::MissingApiKey)?;

        Ok(Self::new(base_url, api_key))
    }
}
