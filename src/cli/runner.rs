//! CLI runner - executes commands

use crate::catalog::{Catalog, ConfiguredCatalog};
use crate::cli::commands::{parse_stream_list, Cli, Commands, OutputFormat};
use crate::config::{parse_config_json, read_config_file};
use crate::connector::{Connector, UsVoteConnector, DEFAULT_BASE_URL};
use crate::engine::{SyncConfig, SyncEngine};
use crate::error::{Error, Result};
use crate::http::{HttpClientConfig, RateLimiterConfig};
use serde_json::{json, Value};
use std::fs;
use std::io::Write;
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command, writing protocol messages to stdout
    pub async fn run(&self) -> Result<()> {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        self.run_to(&mut out).await
    }

    /// Run the CLI command, writing protocol messages to `out`
    pub async fn run_to<W: Write>(&self, out: &mut W) -> Result<()> {
        match &self.cli.command {
            Commands::Check { config_json } => self.check(config_json.as_deref(), out).await,
            Commands::Discover { config_json } => {
                self.discover(config_json.as_deref(), out).await
            }
            Commands::Read {
                streams,
                catalog,
                config_json,
                continue_on_error,
            } => {
                self.read(
                    streams.as_deref(),
                    catalog.as_deref(),
                    config_json.as_deref(),
                    *continue_on_error,
                    out,
                )
                .await
            }
            Commands::Spec => self.spec(out),
            Commands::Streams => self.streams(out),
        }
    }

    /// HTTP settings from the global flags
    fn http_config(&self) -> HttpClientConfig {
        let mut builder = HttpClientConfig::builder()
            .base_url(self.cli.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL));

        if let Some(secs) = self.cli.timeout {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        if let Some(retries) = self.cli.max_retries {
            builder = builder.max_retries(retries);
        }
        if let Some(rate) = self.cli.requests_per_second {
            builder = builder.rate_limit(RateLimiterConfig::new(rate, rate));
        }

        builder.build()
    }

    /// Build the connector, honoring the HTTP flags
    fn connector(&self) -> Result<UsVoteConnector> {
        UsVoteConnector::with_http_config(self.http_config())
    }

    /// Load configuration; inline JSON wins over the config file
    fn load_config(&self, inline: Option<&str>) -> Result<Value> {
        match (inline, &self.cli.config) {
            (Some(json_str), _) => parse_config_json(json_str),
            (None, Some(path)) => read_config_file(path),
            (None, None) => Ok(json!({})),
        }
    }

    /// Select the streams to read
    fn load_catalog(streams: Option<&str>, catalog: Option<&Path>) -> Result<ConfiguredCatalog> {
        if let Some(streams) = streams {
            let names = parse_stream_list(streams);
            if !names.is_empty() {
                return ConfiguredCatalog::select(&names);
            }
        } else if let Some(path) = catalog {
            let content = fs::read_to_string(path)
                .map_err(|e| Error::config(format!("Failed to read catalog file: {e}")))?;
            return serde_json::from_str(&content)
                .map_err(|e| Error::config(format!("Invalid catalog JSON: {e}")));
        }

        Ok(ConfiguredCatalog::from_catalog(&Catalog::all()))
    }

    /// Check connection
    async fn check<W: Write>(&self, config_json: Option<&str>, out: &mut W) -> Result<()> {
        let connector = self.connector()?;
        let config = self.load_config(config_json)?;

        self.output_message(
            out,
            &json!({
                "type": "LOG",
                "log": {
                    "level": "INFO",
                    "message": format!("Checking connection to {}", connector.base_url())
                }
            }),
        )?;

        let result = connector.check(&config).await?;

        let mut status = json!({ "status": result.status() });
        if let Some(message) = &result.message {
            status["message"] = Value::String(message.clone());
        }

        self.output_message(
            out,
            &json!({
                "type": "CONNECTION_STATUS",
                "connectionStatus": status
            }),
        )
    }

    /// Discover streams
    async fn discover<W: Write>(&self, config_json: Option<&str>, out: &mut W) -> Result<()> {
        let connector = self.connector()?;
        let config = self.load_config(config_json)?;
        let catalog = connector.discover(&config).await?;

        self.output_message(
            out,
            &json!({
                "type": "CATALOG",
                "catalog": serde_json::to_value(&catalog)?
            }),
        )
    }

    /// Read streams
    async fn read<W: Write>(
        &self,
        streams: Option<&str>,
        catalog: Option<&Path>,
        config_json: Option<&str>,
        continue_on_error: bool,
        out: &mut W,
    ) -> Result<()> {
        let connector = self.connector()?;
        let config = self.load_config(config_json)?;
        let catalog = Self::load_catalog(streams, catalog)?;

        info!("Reading streams: {}", catalog.stream_names().join(", "));

        let messages = connector.read(&config, &catalog).await?;

        let sync_config = SyncConfig::new()
            .with_fail_fast(!continue_on_error)
            .with_pretty(self.cli.format == OutputFormat::Pretty);
        let mut engine = SyncEngine::new().with_config(sync_config);
        let stats = engine.run(messages, out).await?;

        for (stream, count) in &stats.records_per_stream {
            info!("Stream {}: {} records", stream, count);
        }

        Ok(())
    }

    /// Show spec
    fn spec<W: Write>(&self, out: &mut W) -> Result<()> {
        let spec = self.connector()?.spec();

        self.output_message(
            out,
            &json!({
                "type": "SPEC",
                "spec": serde_json::to_value(&spec)?
            }),
        )
    }

    /// List available streams (lightweight, no schemas)
    fn streams<W: Write>(&self, out: &mut W) -> Result<()> {
        let catalog = Catalog::all();

        self.output_message(
            out,
            &json!({
                "type": "STREAMS",
                "streams": catalog.stream_names(),
                "connector": crate::NAME
            }),
        )
    }

    /// Output a message
    fn output_message<W: Write>(&self, out: &mut W, msg: &Value) -> Result<()> {
        match self.cli.format {
            OutputFormat::Json => serde_json::to_writer(&mut *out, msg)?,
            OutputFormat::Pretty => serde_json::to_writer_pretty(&mut *out, msg)?,
        }
        writeln!(out)?;
        Ok(())
    }
}
