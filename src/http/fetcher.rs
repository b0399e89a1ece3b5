//! Page fetching seam
//!
//! Streams only need one capability from the transport: GET a path relative
//! to the API base URL and hand back the decoded JSON body. Keeping that
//! behind a trait lets the pagination loop run against scripted pages in
//! tests.

use super::client::{HttpClient, RequestConfig};
use crate::error::{Error, Result};
use crate::types::StringMap;
use async_trait::async_trait;
use serde_json::Value;

/// Fetches one page of JSON from the API
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// GET `path` (relative to the base URL) with the given query and headers
    ///
    /// Non-success statuses, transport failures and bodies that are not
    /// JSON are all errors.
    async fn fetch_page(&self, path: &str, query: &StringMap, headers: &StringMap)
        -> Result<Value>;

    /// Issue a single GET of `path` without retries and report the status
    ///
    /// Used for connectivity checks. Error statuses come back as
    /// `Error::HttpStatus`.
    async fn probe(&self, path: &str, headers: &StringMap) -> Result<u16>;
}

#[async_trait]
impl PageFetcher for HttpClient {
    async fn fetch_page(
        &self,
        path: &str,
        query: &StringMap,
        headers: &StringMap,
    ) -> Result<Value> {
        let config = RequestConfig::new().query(query).headers(headers);

        let response = self.get_with_config(path, config).await?;
        let body = response
            .text()
            .await
            .map_err(|e| Error::decode(format!("Failed to read response body: {e}")))?;

        serde_json::from_str(&body)
            .map_err(|e| Error::decode(format!("Response from '{path}' is not valid JSON: {e}")))
    }

    async fn probe(&self, path: &str, headers: &StringMap) -> Result<u16> {
        let config = RequestConfig::new().headers(headers).retries(0);
        let response = self.get_with_config(path, config).await?;
        Ok(response.status().as_u16())
    }
}
