//! Paginated entity stream
//!
//! One generic fetch-and-flatten loop used by every entity. Requests are
//! strictly sequential: the path of each request comes from the previous
//! response.

use super::definition::{EntityKind, StreamDefinition};
use crate::auth::AuthConfig;
use crate::config::SourceConfig;
use crate::decode::{ContainerDecoder, RecordDecoder};
use crate::error::{Error, Result};
use crate::http::PageFetcher;
use crate::pagination::{NextPathPaginator, PaginationState};
use crate::types::StringMap;
use futures::stream::{self, Stream, TryStreamExt};
use serde_json::Value;
use std::pin::Pin;
use std::sync::Arc;
use tracing::debug;

/// Lazy sequence of records produced by one stream
pub type RecordStream = Pin<Box<dyn Stream<Item = Result<Value>> + Send>>;

/// One entity's extraction job
#[derive(Debug, Clone)]
pub struct EntityStream {
    definition: &'static StreamDefinition,
    config: Arc<SourceConfig>,
    paginator: NextPathPaginator,
    decoder: ContainerDecoder,
}

impl EntityStream {
    /// Create a stream for `kind` reading from the API at `base_url`
    pub fn new(kind: EntityKind, config: Arc<SourceConfig>, base_url: &str) -> Self {
        Self {
            definition: kind.definition(),
            config,
            paginator: NextPathPaginator::new(base_url),
            decoder: ContainerDecoder::default(),
        }
    }

    /// Stream name
    pub fn name(&self) -> &'static str {
        self.definition.name
    }

    /// Static definition backing this stream
    pub fn definition(&self) -> &'static StreamDefinition {
        self.definition
    }

    /// Authorization headers for every request of this stream
    pub fn auth_headers(&self) -> Result<StringMap> {
        Ok(AuthConfig::from_config(&self.config)?.headers())
    }

    /// Path of the next request: the pagination token, or the entity root
    pub fn path(&self, token: Option<&str>) -> String {
        token.unwrap_or(self.definition.path).to_string()
    }

    /// Query parameters of the next request
    ///
    /// Empty when following a token, since the token already embeds the
    /// query. Otherwise the configured values of the entity's allowed keys.
    pub fn query_params(&self, token: Option<&str>) -> StringMap {
        if token.is_some() {
            return StringMap::new();
        }

        self.definition
            .allowed_params
            .iter()
            .filter_map(|key| {
                self.config
                    .get(key)
                    .map(|value| ((*key).to_string(), value.to_string()))
            })
            .collect()
    }

    /// Relative path of the page after `page`, if any
    pub fn next_token(&self, page: &Value) -> Result<Option<String>> {
        self.paginator.next_token(page)
    }

    /// Records contained in `page`
    pub fn parse_page(&self, page: Value) -> Vec<Value> {
        self.decoder.decode_value(page)
    }

    /// Read every record of this stream, page by page
    ///
    /// Fails immediately, without any request, when the API key is missing.
    /// The returned stream ends after the first error.
    pub fn records(self, fetcher: Arc<dyn PageFetcher>) -> Result<RecordStream> {
        let headers = self.auth_headers()?;

        let state = ReadState {
            stream: self,
            fetcher,
            headers,
            pagination: PaginationState::new(),
            pending_error: None,
            pages: 0,
            records: 0,
        };

        let records = stream::try_unfold(state, next_page)
            .map_ok(|records| stream::iter(records.into_iter().map(Ok::<Value, Error>)))
            .try_flatten();

        Ok(Box::pin(records))
    }
}

struct ReadState {
    stream: EntityStream,
    fetcher: Arc<dyn PageFetcher>,
    headers: StringMap,
    pagination: PaginationState,
    /// Raised by the previous page after its records were handed out
    pending_error: Option<Error>,
    pages: u64,
    records: u64,
}

async fn next_page(mut state: ReadState) -> Result<Option<(Vec<Value>, ReadState)>> {
    if let Some(e) = state.pending_error.take() {
        return Err(e);
    }

    if state.pagination.is_done() {
        debug!(
            "Stream {} finished: {} records in {} pages",
            state.stream.name(),
            state.records,
            state.pages
        );
        return Ok(None);
    }

    let token = state.pagination.token();
    let path = state.stream.path(token);
    let query = state.stream.query_params(token);

    let page = state
        .fetcher
        .fetch_page(&path, &query, &state.headers)
        .await?;
    state.pages += 1;

    if let Err(e) = state
        .stream
        .paginator
        .process_response(&page, &mut state.pagination)
    {
        state.pending_error = Some(e);
    }

    let records = state.stream.parse_page(page);
    state.records += records.len() as u64;

    debug!(
        "Stream {}: page {} from '{}' with {} records",
        state.stream.name(),
        state.pages,
        path,
        records.len()
    );

    Ok(Some((records, state)))
}
