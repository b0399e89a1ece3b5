//! Auth configuration types

use crate::config::SourceConfig;
use crate::error::Result;
use crate::types::StringMap;

/// Header carrying the credential
pub const AUTHORIZATION_HEADER: &str = "Authorization";

/// Scheme prefix placed before the API key
pub const OAUTH_PREFIX: &str = "OAuth ";

/// Authentication configuration
///
/// Every request of the API is keyed; there is no anonymous access.
#[derive(Clone, PartialEq, Eq)]
pub enum AuthConfig {
    /// Static API key placed in a header
    ApiKey {
        /// Header name
        header_name: String,
        /// Prefix to add before the value (e.g., "OAuth ")
        prefix: String,
        /// The API key value
        value: String,
    },
}

impl AuthConfig {
    /// OAuth-style API key in the `Authorization` header
    pub fn oauth_api_key(value: impl Into<String>) -> Self {
        Self::ApiKey {
            header_name: AUTHORIZATION_HEADER.to_string(),
            prefix: OAUTH_PREFIX.to_string(),
            value: value.into(),
        }
    }

    /// Build the auth config from the source configuration
    ///
    /// Fails when `api_key` is not configured.
    pub fn from_config(config: &SourceConfig) -> Result<Self> {
        Ok(Self::oauth_api_key(config.api_key()?))
    }

    /// Render the headers to attach to each request
    pub fn headers(&self) -> StringMap {
        let Self::ApiKey {
            header_name,
            prefix,
            value,
        } = self;

        let mut headers = StringMap::new();
        headers.insert(header_name.clone(), format!("{prefix}{value}"));
        headers
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Self::ApiKey {
            header_name,
            prefix,
            ..
        } = self;

        f.debug_struct("ApiKey")
            .field("header_name", header_name)
            .field("prefix", prefix)
            .finish_non_exhaustive()
    }
}
