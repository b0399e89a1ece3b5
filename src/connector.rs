//! Connector trait and the US Vote Foundation source
//!
//! Defines the core Connector trait (spec, check, discover, read) and the
//! connector that serves the four EOD entities through it.

use crate::auth::AuthConfig;
use crate::catalog::{Catalog, ConfiguredCatalog};
use crate::config::{connection_specification, SourceConfig};
use crate::error::{Error, Result};
use crate::http::{HttpClient, HttpClientConfig, PageFetcher};
use crate::stream::{EntityKind, EntityStream};
use crate::types::LogLevel;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::stream::{self, Stream, StreamExt, TryStreamExt};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info};
use url::Url;

/// Production API root
pub const DEFAULT_BASE_URL: &str = "https://api.usvotefoundation.org/eod/v3/";

/// Path fetched by the connection check
pub const DEFAULT_CHECK_PATH: &str = "states/2";

const DOCUMENTATION_URL: &str = "https://civicdata.usvotefoundation.org/";

const ACCEPT_HEADER: &str = "Accept";
const JSON_CONTENT_TYPE: &str = "application/json";

// ============================================================================
// Connector Spec (for UI)
// ============================================================================

/// Connector specification returned by spec()
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectorSpec {
    /// Connector name
    pub name: String,

    /// Human-readable title
    pub title: String,

    /// Description
    pub description: Option<String>,

    /// Documentation URL
    #[serde(rename = "documentationUrl")]
    pub documentation_url: Option<String>,

    /// JSON Schema of the configuration object
    #[serde(rename = "connectionSpecification")]
    pub connection_specification: Value,
}

// ============================================================================
// Check Result
// ============================================================================

/// Result of a connection check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    /// Whether the check succeeded
    pub success: bool,

    /// Error message if failed
    pub message: Option<String>,
}

impl CheckResult {
    /// Create a successful check result
    pub fn success() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    /// Create a failed check result
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }

    /// Protocol status string
    pub fn status(&self) -> &'static str {
        if self.success {
            "SUCCEEDED"
        } else {
            "FAILED"
        }
    }
}

// ============================================================================
// Messages
// ============================================================================

/// Messages emitted during read operations
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// One record of a stream
    Record {
        /// Stream name
        stream: String,
        /// Record exactly as the API returned it
        data: Value,
        /// Timestamp when the record was emitted
        emitted_at: DateTime<Utc>,
    },

    /// Log message
    Log {
        /// Log level
        level: LogLevel,
        /// Log message
        message: String,
    },
}

impl Message {
    /// Create a record message
    pub fn record(stream: impl Into<String>, data: Value) -> Self {
        Self::Record {
            stream: stream.into(),
            data,
            emitted_at: Utc::now(),
        }
    }

    /// Create a log message
    pub fn log(level: LogLevel, message: impl Into<String>) -> Self {
        Self::Log {
            level,
            message: message.into(),
        }
    }

    /// Create an info log message
    pub fn info(message: impl Into<String>) -> Self {
        Self::log(LogLevel::Info, message)
    }

    /// Create an error log message
    pub fn error(message: impl Into<String>) -> Self {
        Self::log(LogLevel::Error, message)
    }

    /// Whether this is a record message
    pub fn is_record(&self) -> bool {
        matches!(self, Self::Record { .. })
    }

    /// Render as a protocol message
    pub fn to_json(&self) -> Value {
        match self {
            Self::Record {
                stream,
                data,
                emitted_at,
            } => json!({
                "type": "RECORD",
                "record": {
                    "stream": stream,
                    "data": data,
                    "emitted_at": emitted_at.timestamp_millis(),
                }
            }),
            Self::Log { level, message } => json!({
                "type": "LOG",
                "log": {
                    "level": level,
                    "message": message,
                }
            }),
        }
    }
}

// ============================================================================
// Connector Trait
// ============================================================================

/// Type alias for the message stream returned by read()
pub type MessageStream = Pin<Box<dyn Stream<Item = Result<Message>> + Send>>;

/// Core trait that all connectors implement
#[async_trait]
pub trait Connector: Send + Sync {
    /// Returns the connector specification (for UI/validation)
    fn spec(&self) -> ConnectorSpec;

    /// Tests if credentials and configuration are valid
    async fn check(&self, config: &Value) -> Result<CheckResult>;

    /// Lists available streams from the source
    async fn discover(&self, config: &Value) -> Result<Catalog>;

    /// Reads data from selected streams
    ///
    /// Returns a stream of messages (records and logs)
    async fn read(&self, config: &Value, catalog: &ConfiguredCatalog) -> Result<MessageStream>;
}

// ============================================================================
// US Vote Foundation Connector
// ============================================================================

/// Source for the US Vote Foundation Election Official Directory API
pub struct UsVoteConnector {
    base_url: String,
    check_path: String,
    fetcher: Arc<dyn PageFetcher>,
}

impl UsVoteConnector {
    /// Connector for the production API
    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Connector for an API served at `base_url`
    pub fn with_base_url(base_url: &str) -> Result<Self> {
        Self::with_http_config(HttpClientConfig::builder().base_url(base_url).build())
    }

    /// Connector using a custom HTTP client configuration
    ///
    /// The client's base URL is used when set, otherwise the production API.
    /// Requests ask for JSON unless the config already sets `Accept`.
    pub fn with_http_config(mut config: HttpClientConfig) -> Result<Self> {
        let base_url = validate_base_url(config.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL))?;
        config.base_url = Some(base_url.clone());
        config
            .default_headers
            .entry(ACCEPT_HEADER.to_string())
            .or_insert_with(|| JSON_CONTENT_TYPE.to_string());

        Ok(Self {
            base_url,
            check_path: DEFAULT_CHECK_PATH.to_string(),
            fetcher: Arc::new(HttpClient::with_config(config)?),
        })
    }

    /// Replace the transport used for every request
    #[must_use]
    pub fn with_fetcher(mut self, fetcher: Arc<dyn PageFetcher>) -> Self {
        self.fetcher = fetcher;
        self
    }

    /// Path fetched by check() instead of the default probe
    #[must_use]
    pub fn with_check_path(mut self, path: impl Into<String>) -> Self {
        self.check_path = path.into();
        self
    }

    /// API root, always ending in '/'
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Path fetched by check()
    pub fn check_path(&self) -> &str {
        &self.check_path
    }

    /// Messages for one stream: a start log, its records, a completion log
    fn stream_messages(&self, kind: EntityKind, config: Arc<SourceConfig>) -> Result<MessageStream> {
        let name = kind.name();
        let records = EntityStream::new(kind, config, &self.base_url).records(self.fetcher.clone())?;
        let count = Arc::new(AtomicU64::new(0));
        let counted = count.clone();

        let start = stream::once(async move {
            info!("Starting stream {}", name);
            Ok::<_, Error>(Message::info(format!("Starting stream {name}")))
        });

        let body = records.map_ok(move |data| {
            counted.fetch_add(1, Ordering::Relaxed);
            Message::record(name, data)
        });

        let end = stream::once(async move {
            let total = count.load(Ordering::Relaxed);
            info!("Finished stream {}: {} records", name, total);
            Ok::<_, Error>(Message::info(format!("Finished stream {name}: {total} records")))
        });

        Ok(Box::pin(start.chain(body).chain(end)))
    }
}

impl std::fmt::Debug for UsVoteConnector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UsVoteConnector")
            .field("base_url", &self.base_url)
            .field("check_path", &self.check_path)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Connector for UsVoteConnector {
    fn spec(&self) -> ConnectorSpec {
        ConnectorSpec {
            name: crate::NAME.to_string(),
            title: "US Vote Foundation".to_string(),
            description: Some(
                "Election officials, offices and jurisdictions from the US Vote Foundation \
                 Election Official Directory API"
                    .to_string(),
            ),
            documentation_url: Some(DOCUMENTATION_URL.to_string()),
            connection_specification: connection_specification(),
        }
    }

    async fn check(&self, config: &Value) -> Result<CheckResult> {
        let headers = match SourceConfig::from_value(config)
            .and_then(|config| AuthConfig::from_config(&config))
        {
            Ok(auth) => auth.headers(),
            Err(e) => return Ok(CheckResult::failure(e.to_string())),
        };

        debug!("Checking connection with GET {}", self.check_path);

        let result = match self.fetcher.probe(&self.check_path, &headers).await {
            Ok(200) => CheckResult::success(),
            Ok(status) => CheckResult::failure(format!(
                "Unexpected status {status} from {}{}",
                self.base_url, self.check_path
            )),
            Err(Error::HttpStatus { status, body }) => CheckResult::failure(format!(
                "Connection check failed with HTTP {status}: {body}"
            )),
            Err(e) => CheckResult::failure(format!("Connection check failed: {e}")),
        };

        Ok(result)
    }

    async fn discover(&self, config: &Value) -> Result<Catalog> {
        if !config.is_null() {
            SourceConfig::from_value(config)?;
        }
        Ok(Catalog::all())
    }

    async fn read(&self, config: &Value, catalog: &ConfiguredCatalog) -> Result<MessageStream> {
        let kinds = catalog
            .streams
            .iter()
            .map(|s| EntityKind::from_name(&s.stream.name))
            .collect::<Result<Vec<_>>>()?;

        let config = Arc::new(SourceConfig::from_value(config)?);
        config.api_key()?;

        let streams = kinds
            .into_iter()
            .map(|kind| self.stream_messages(kind, config.clone()))
            .collect::<Result<Vec<_>>>()?;

        Ok(Box::pin(stream::iter(streams).flatten()))
    }
}

/// Parse `base_url` and normalize it to end in '/'
fn validate_base_url(base_url: &str) -> Result<String> {
    let url = Url::parse(base_url)?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::invalid_value(
            "base_url",
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }

    let mut base = url.to_string();
    if !base.ends_with('/') {
        base.push('/');
    }
    Ok(base)
}
