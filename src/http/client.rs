//! HTTP client with retry and rate limiting
//!
//! Every API request goes through [`HttpClient::get_with_config`]. Each
//! attempt is classified as done, retryable after a delay, or fatal; the
//! loop around it owns the retry budget and the rate limiter.

use super::rate_limit::{RateLimiter, RateLimiterConfig};
use crate::error::{Error, Result};
use crate::types::{BackoffType, StringMap};
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;
use tracing::{debug, warn};

/// Delay used when a 429 carries no usable Retry-After header
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// API root that request paths are relative to
    pub base_url: Option<String>,
    /// Request timeout
    pub timeout: Duration,
    /// Retries after the first attempt
    pub max_retries: u32,
    /// First backoff delay
    pub initial_backoff: Duration,
    /// Upper bound for any backoff delay
    pub max_backoff: Duration,
    /// How the delay grows between attempts
    pub backoff_type: BackoffType,
    /// Token bucket shared by every request of the client
    pub rate_limit: Option<RateLimiterConfig>,
    /// Headers sent with every request
    pub default_headers: StringMap,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: Duration::from_secs(30),
            max_retries: 3,
            initial_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_secs(60),
            backoff_type: BackoffType::Exponential,
            rate_limit: Some(RateLimiterConfig::default()),
            default_headers: StringMap::new(),
            user_agent: format!("{}/{}", crate::NAME, crate::VERSION),
        }
    }
}

impl HttpClientConfig {
    /// Create a new config builder
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }
}

/// Builder for HTTP client config
#[derive(Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    /// Set the API root
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = Some(url.into());
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set max retries
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.config.max_retries = retries;
        self
    }

    /// Set backoff configuration
    pub fn backoff(mut self, backoff_type: BackoffType, initial: Duration, max: Duration) -> Self {
        self.config.backoff_type = backoff_type;
        self.config.initial_backoff = initial;
        self.config.max_backoff = max;
        self
    }

    /// Set rate limiter
    pub fn rate_limit(mut self, config: RateLimiterConfig) -> Self {
        self.config.rate_limit = Some(config);
        self
    }

    /// Disable rate limiting
    pub fn no_rate_limit(mut self) -> Self {
        self.config.rate_limit = None;
        self
    }

    /// Build the config
    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// Per-request settings
#[derive(Debug, Clone, Default)]
pub struct RequestConfig {
    /// Query parameters, appended only when non-empty
    pub query: StringMap,
    /// Headers added to the client's default headers
    pub headers: StringMap,
    /// Retry budget overriding the client's
    pub max_retries: Option<u32>,
}

impl RequestConfig {
    /// Create a new request config
    pub fn new() -> Self {
        Self::default()
    }

    /// Add query parameters
    #[must_use]
    pub fn query(mut self, query: &StringMap) -> Self {
        self.query
            .extend(query.iter().map(|(k, v)| (k.clone(), v.clone())));
        self
    }

    /// Add headers
    #[must_use]
    pub fn headers(mut self, headers: &StringMap) -> Self {
        self.headers
            .extend(headers.iter().map(|(k, v)| (k.clone(), v.clone())));
        self
    }

    /// Set max retries
    #[must_use]
    pub fn retries(mut self, retries: u32) -> Self {
        self.max_retries = Some(retries);
        self
    }
}

/// Outcome of one request attempt
#[derive(Debug)]
enum Attempt {
    /// Response to hand back to the caller
    Done(Response),
    /// Transient failure; try again after `delay` if the budget allows
    Retry { error: Error, delay: Duration },
    /// Failure another attempt would not fix
    Fail(Error),
}

/// HTTP client with retry and rate limiting
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
    rate_limiter: Option<RateLimiter>,
}

impl HttpClient {
    /// Create a client from `config`
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        let rate_limiter = config.rate_limit.as_ref().map(RateLimiter::new);

        Ok(Self {
            client,
            config,
            rate_limiter,
        })
    }

    /// GET `path`, retrying transient failures
    ///
    /// 429 waits for Retry-After; 5xx, timeouts and connect errors back off.
    /// Once the budget is spent the last attempt's error is returned.
    pub async fn get_with_config(&self, path: &str, request: RequestConfig) -> Result<Response> {
        let url = self.build_url(path);
        let max_retries = request.max_retries.unwrap_or(self.config.max_retries);
        let mut attempt = 0;

        loop {
            if let Some(limiter) = &self.rate_limiter {
                limiter.wait().await;
            }

            debug!("GET {} (attempt {})", url, attempt + 1);

            match self.attempt(&url, &request, attempt).await {
                Attempt::Done(response) => {
                    debug!("GET {} -> {}", url, response.status().as_u16());
                    return Ok(response);
                }
                Attempt::Fail(error) => return Err(error),
                Attempt::Retry { error, .. } if attempt >= max_retries => return Err(error),
                Attempt::Retry { error, delay } => {
                    warn!(
                        "GET {} failed: {}, attempt {}/{}, retrying in {:?}",
                        url,
                        error,
                        attempt + 1,
                        max_retries + 1,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }

    async fn attempt(&self, url: &str, request: &RequestConfig, attempt: u32) -> Attempt {
        let mut req = self.client.get(url);

        for (key, value) in self.config.default_headers.iter().chain(&request.headers) {
            req = req.header(key.as_str(), value.as_str());
        }

        // Paths taken from a next link already carry their query string
        if !request.query.is_empty() {
            req = req.query(&request.query);
        }

        match req.send().await {
            Ok(response) => self.classify(response, attempt).await,
            Err(e) if e.is_timeout() => Attempt::Retry {
                error: Error::Timeout {
                    timeout_ms: u64::try_from(self.config.timeout.as_millis()).unwrap_or(u64::MAX),
                },
                delay: self.calculate_backoff(attempt),
            },
            Err(e) if e.is_connect() => Attempt::Retry {
                error: Error::Http(e),
                delay: self.calculate_backoff(attempt),
            },
            Err(e) => Attempt::Fail(Error::Http(e)),
        }
    }

    async fn classify(&self, response: Response, attempt: u32) -> Attempt {
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = retry_after_secs(&response);
            return Attempt::Retry {
                error: Error::RateLimited {
                    retry_after_seconds: retry_after,
                },
                delay: Duration::from_secs(retry_after),
            };
        }

        if !(status.is_client_error() || status.is_server_error()) {
            return Attempt::Done(response);
        }

        let body = response.text().await.unwrap_or_default();
        let error = Error::http_status(status.as_u16(), body);

        if is_retryable_status(status) {
            Attempt::Retry {
                error,
                delay: self.calculate_backoff(attempt),
            }
        } else {
            Attempt::Fail(error)
        }
    }

    /// Resolve `path` against the base URL; absolute URLs pass through
    pub(crate) fn build_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }

        match &self.config.base_url {
            Some(base) => format!(
                "{}/{}",
                base.trim_end_matches('/'),
                path.trim_start_matches('/')
            ),
            None => path.to_string(),
        }
    }

    /// Backoff delay before retry number `attempt + 1`
    pub fn calculate_backoff(&self, attempt: u32) -> Duration {
        let initial = self.config.initial_backoff;
        let delay = match self.config.backoff_type {
            BackoffType::Constant => initial,
            BackoffType::Linear => initial.saturating_mul(attempt.saturating_add(1)),
            BackoffType::Exponential => initial.saturating_mul(2u32.saturating_pow(attempt)),
        };

        delay.min(self.config.max_backoff)
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.config.base_url)
            .field("max_retries", &self.config.max_retries)
            .field("rate_limited", &self.rate_limiter.is_some())
            .finish_non_exhaustive()
    }
}

/// Statuses worth another attempt (besides 429, handled separately)
fn is_retryable_status(status: StatusCode) -> bool {
    status.is_server_error() && !matches!(status.as_u16(), 501 | 505)
}

/// Seconds to wait according to a 429's Retry-After header
fn retry_after_secs(response: &Response) -> u64 {
    response
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(DEFAULT_RETRY_AFTER_SECS)
}
