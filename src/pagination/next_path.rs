//! Next-link pagination relative to the API base URL

use super::types::{NextPage, PaginationState};
use crate::error::{Error, Result};
use serde_json::Value;

/// Follows `meta.next` links by stripping the API base URL from them
///
/// The stripped remainder (path plus query string) is requested as-is, so
/// filters from the first request are carried by the link itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NextPathPaginator {
    base_url: String,
}

impl NextPathPaginator {
    /// Create a paginator for links under `base_url`
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self { base_url }
    }

    /// The base URL prefix, always ending in `/`
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Extract the relative path of the next page
    ///
    /// Returns `Ok(None)` when `meta.next` is absent, null or empty. A link
    /// outside the base URL is an error rather than a guess.
    pub fn next_token(&self, page: &Value) -> Result<Option<String>> {
        let next = page.get("meta").and_then(|meta| meta.get("next"));

        let url = match next {
            None | Some(Value::Null) => return Ok(None),
            Some(Value::String(url)) if url.is_empty() => return Ok(None),
            Some(Value::String(url)) => url,
            Some(other) => {
                return Err(Error::pagination(format!(
                    "meta.next must be a URL string, got {other}"
                )))
            }
        };

        match url.strip_prefix(&self.base_url) {
            Some(path) if !path.is_empty() => Ok(Some(path.to_string())),
            Some(_) => Err(Error::pagination(format!(
                "next link '{url}' points at the base URL itself"
            ))),
            None => Err(Error::pagination(format!(
                "next link '{url}' is not under base URL '{}'",
                self.base_url
            ))),
        }
    }

    /// Process a page and advance the pagination state
    pub fn process_response(&self, page: &Value, state: &mut PaginationState) -> Result<NextPage> {
        let next = match self.next_token(page) {
            Ok(Some(path)) => NextPage::with_path(path),
            Ok(None) => NextPage::Done,
            Err(e) => {
                state.mark_done();
                return Err(e);
            }
        };
        state.advance(next.clone());
        Ok(next)
    }
}
