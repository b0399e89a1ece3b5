//! Execution engine module
//!
//! Drains a connector's message stream into protocol output.
//!
//! # Overview
//!
//! The engine module provides:
//! - `SyncEngine` - Writes each message as protocol JSON and keeps statistics
//! - `SyncConfig` - Configuration for sync operations
//! - `SyncStats` - Counters collected during a run

mod types;

pub use types::{SyncConfig, SyncStats};

use crate::connector::{Message, MessageStream};
use crate::error::Result;
use futures::StreamExt;
use serde_json::Value;
use std::io::Write;
use std::time::Instant;
use tracing::{error, info};

/// Sync engine for writing connector output
#[derive(Debug, Default)]
pub struct SyncEngine {
    /// Sync configuration
    config: SyncConfig,
    /// Statistics
    stats: SyncStats,
}

impl SyncEngine {
    /// Create a new sync engine
    pub fn new() -> Self {
        Self::default()
    }

    /// Set sync configuration
    #[must_use]
    pub fn with_config(mut self, config: SyncConfig) -> Self {
        self.config = config;
        self
    }

    /// Get statistics
    pub fn stats(&self) -> &SyncStats {
        &self.stats
    }

    /// Write every message of `messages` to `out`
    ///
    /// In fail-fast mode the first error ends the run and is returned; the
    /// statistics collected up to that point stay available via `stats()`.
    /// Otherwise each error is written as an ERROR log and the run goes on.
    pub async fn run<W: Write>(
        &mut self,
        mut messages: MessageStream,
        out: &mut W,
    ) -> Result<SyncStats> {
        let start = Instant::now();
        self.stats = SyncStats::new();

        while let Some(item) = messages.next().await {
            match item {
                Ok(message) => {
                    match &message {
                        Message::Record { stream, .. } => self.stats.add_record(stream),
                        Message::Log { .. } => self.stats.add_log(),
                    }
                    self.write_message(out, &message.to_json())?;
                }
                Err(e) => {
                    self.stats.add_error();
                    error!("Sync failed: {}", e);

                    if self.config.fail_fast {
                        self.stats.set_duration(elapsed_ms(start));
                        return Err(e);
                    }

                    self.write_message(out, &Message::error(e.to_string()).to_json())?;
                }
            }
        }

        out.flush()?;
        self.stats.set_duration(elapsed_ms(start));

        info!(
            "Sync completed: {} records from {} streams in {}ms",
            self.stats.records_synced, self.stats.streams_synced, self.stats.duration_ms
        );

        Ok(self.stats.clone())
    }

    fn write_message<W: Write>(&self, out: &mut W, message: &Value) -> Result<()> {
        if self.config.pretty {
            serde_json::to_writer_pretty(&mut *out, message)?;
        } else {
            serde_json::to_writer(&mut *out, message)?;
        }
        writeln!(out)?;
        Ok(())
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}
