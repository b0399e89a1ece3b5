//! HTTP client module
//!
//! Provides the HTTP client with retry, rate limiting, and backoff strategies,
//! plus the [`PageFetcher`] trait streams use to request pages.
//!
//! # Features
//!
//! - **Automatic Retries**: Configurable retry logic with backoff
//! - **Rate Limiting**: Token bucket rate limiter using governor
//! - **Backoff Strategies**: Constant, linear, and exponential backoff

mod client;
mod fetcher;
mod rate_limit;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestConfig};
pub use fetcher::PageFetcher;
pub use rate_limit::{RateLimiter, RateLimiterConfig};
