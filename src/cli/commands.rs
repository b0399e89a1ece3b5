//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// US Vote Foundation source connector
#[derive(Parser, Debug)]
#[command(name = "usvote-source")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (JSON)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// API root to read from instead of the production API
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Retries for failed requests
    #[arg(long, global = true)]
    pub max_retries: Option<u32>,

    /// Client-side request rate limit
    #[arg(long, global = true, value_parser = clap::value_parser!(u32).range(1..))]
    pub requests_per_second: Option<u32>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Test connection to the API
    Check {
        /// Inline config JSON
        #[arg(long)]
        config_json: Option<String>,
    },

    /// Discover available streams
    Discover {
        /// Inline config JSON
        #[arg(long)]
        config_json: Option<String>,
    },

    /// Read data from streams
    Read {
        /// Streams to sync (comma-separated, empty = all)
        #[arg(long)]
        streams: Option<String>,

        /// Configured catalog file (JSON), used when --streams is not given
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Inline config JSON
        #[arg(long)]
        config_json: Option<String>,

        /// Log stream errors and keep reading the remaining streams
        #[arg(long)]
        continue_on_error: bool,
    },

    /// Show connector specification
    Spec,

    /// List available stream names (lightweight, no schemas)
    Streams,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one message per line)
    Json,
    /// Human-readable output
    Pretty,
}

/// Split a comma-separated stream list, dropping empty entries
pub fn parse_stream_list(streams: &str) -> Vec<String> {
    streams
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_check() {
        let cli = Cli::parse_from([
            "usvote-source",
            "check",
            "--config-json",
            r#"{"api_key":"k"}"#,
        ]);
        assert!(matches!(
            cli.command,
            Commands::Check { config_json: Some(ref json) } if json.contains("api_key")
        ));
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(!cli.verbose);
    }

    #[test]
    fn test_parse_read_with_globals() {
        let cli = Cli::parse_from([
            "usvote-source",
            "read",
            "--streams",
            "states,regions",
            "-C",
            "config.json",
            "--base-url",
            "http://localhost:8080/eod/v3/",
            "--continue-on-error",
            "-v",
        ]);

        assert_eq!(cli.config, Some(PathBuf::from("config.json")));
        assert_eq!(
            cli.base_url.as_deref(),
            Some("http://localhost:8080/eod/v3/")
        );
        assert!(cli.verbose);
        match cli.command {
            Commands::Read {
                streams,
                catalog,
                config_json,
                continue_on_error,
            } => {
                assert_eq!(streams.as_deref(), Some("states,regions"));
                assert!(catalog.is_none());
                assert!(config_json.is_none());
                assert!(continue_on_error);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_http_options() {
        let cli = Cli::parse_from([
            "usvote-source",
            "check",
            "--timeout",
            "5",
            "--max-retries",
            "1",
            "--requests-per-second",
            "2",
        ]);
        assert_eq!(cli.timeout, Some(5));
        assert_eq!(cli.max_retries, Some(1));
        assert_eq!(cli.requests_per_second, Some(2));

        let defaults = Cli::parse_from(["usvote-source", "spec"]);
        assert!(defaults.timeout.is_none());
        assert!(defaults.max_retries.is_none());
        assert!(defaults.requests_per_second.is_none());
    }

    #[test]
    fn test_zero_rate_rejected() {
        assert!(Cli::try_parse_from(["usvote-source", "--requests-per-second", "0", "spec"]).is_err());
    }

    #[test]
    fn test_parse_pretty_format() {
        let cli = Cli::parse_from(["usvote-source", "--format", "pretty", "spec"]);
        assert_eq!(cli.format, OutputFormat::Pretty);
        assert!(matches!(cli.command, Commands::Spec));
    }

    #[test]
    fn test_unknown_command_rejected() {
        assert!(Cli::try_parse_from(["usvote-source", "serve"]).is_err());
    }

    #[test]
    fn test_parse_stream_list() {
        assert_eq!(
            parse_stream_list(" states, ,officials,"),
            vec!["states".to_string(), "officials".to_string()]
        );
        assert!(parse_stream_list("").is_empty());
    }
}
