//! CLI module
//!
//! Command-line interface for running the connector.
//!
//! # Commands
//!
//! - `spec` - Show the connector specification
//! - `check` - Test connection to the API
//! - `discover` - List available streams with schemas
//! - `read` - Extract data from streams
//! - `streams` - List stream names (lightweight)

mod commands;
mod runner;

pub use commands::{parse_stream_list, Cli, Commands, OutputFormat};
pub use runner::Runner;
