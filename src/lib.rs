// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # US Vote Foundation source connector
//!
//! Extracts election-administration reference data (states, regions,
//! offices, officials) from the US Vote Foundation Election Official
//! Directory API v3 and emits it as line-delimited protocol JSON.
//!
//! ## Features
//!
//! - **Four streams**: states, regions, offices and officials, each a full refresh
//! - **Server-driven pagination**: follows `meta.next` until the API stops
//! - **Filters**: per-stream query parameters taken from the configuration
//! - **Resilient HTTP**: retries with backoff, `Retry-After` and rate limiting
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use futures::StreamExt;
//! use usvote_source::{Catalog, ConfiguredCatalog, Connector, UsVoteConnector, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let connector = UsVoteConnector::new()?;
//!     let config = serde_json::json!({ "api_key": "...", "state": "1" });
//!
//!     // Check connection
//!     let status = connector.check(&config).await?;
//!
//!     // Read regions
//!     let catalog = ConfiguredCatalog::select(&["regions"])?;
//!     let mut messages = connector.read(&config, &catalog).await?;
//!     while let Some(msg) = messages.next().await {
//!         println!("{}", msg?.to_json());
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     Connector Interface                         │
//! │  spec() → ConnectorSpec  check() → CheckResult  discover()      │
//! │  read(config, catalog) → Stream<Message>                        │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//!                  EntityStream (one per entity kind)
//!                                │
//! ┌──────────┬───────────────┬───┴───────────┬─────────────────────┐
//! │   Auth   │     HTTP      │   Paginate    │       Decode        │
//! ├──────────┼───────────────┼───────────────┼─────────────────────┤
//! │ OAuth    │ GET, Retry    │ meta.next     │ objects array       │
//! │ API key  │ Rate Limit    │ prefix strip  │                     │
//! └──────────┴───────────────┴───────────────┴─────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Source configuration
pub mod config;

/// Authentication headers
pub mod auth;

/// HTTP client with retry and rate limiting
pub mod http;

/// Next-link pagination
pub mod pagination;

/// Response decoders
pub mod decode;

/// Entity stream definitions and the paginated read loop
pub mod stream;

/// Discovered and configured catalogs
pub mod catalog;

/// Connector trait and the US Vote Foundation connector
pub mod connector;

/// Protocol output engine
pub mod engine;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use catalog::{Catalog, CatalogStream, ConfiguredCatalog, ConfiguredStream};
pub use config::SourceConfig;
pub use connector::{
    CheckResult, Connector, ConnectorSpec, Message, MessageStream, UsVoteConnector,
    DEFAULT_BASE_URL,
};
pub use error::{Error, Result};
pub use stream::{EntityKind, EntityStream};
pub use types::*;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
