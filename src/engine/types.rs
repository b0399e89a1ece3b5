//! Engine types
//!
//! Configuration and statistics for the sync engine.

use std::collections::BTreeMap;

/// Configuration for sync operation
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Whether to stop at the first stream error
    pub fail_fast: bool,
    /// Pretty-print each message instead of one line per message
    pub pretty: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            fail_fast: true,
            pretty: false,
        }
    }
}

impl SyncConfig {
    /// Create a new sync config
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set fail fast mode
    #[must_use]
    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// Set pretty output
    #[must_use]
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

/// Statistics from a sync operation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncStats {
    /// Total records synced
    pub records_synced: usize,
    /// Records synced per stream
    pub records_per_stream: BTreeMap<String, usize>,
    /// Streams that emitted at least one record
    pub streams_synced: usize,
    /// Log messages written
    pub logs_emitted: usize,
    /// Errors encountered
    pub errors: usize,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl SyncStats {
    /// Create new stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one record of `stream`
    pub fn add_record(&mut self, stream: &str) {
        self.records_synced += 1;
        let count = self.records_per_stream.entry(stream.to_string()).or_insert(0);
        if *count == 0 {
            self.streams_synced += 1;
        }
        *count += 1;
    }

    /// Records synced for `stream`
    pub fn records_for(&self, stream: &str) -> usize {
        self.records_per_stream.get(stream).copied().unwrap_or(0)
    }

    /// Count a log message
    pub fn add_log(&mut self) {
        self.logs_emitted += 1;
    }

    /// Add an error
    pub fn add_error(&mut self) {
        self.errors += 1;
    }

    /// Set duration
    pub fn set_duration(&mut self, ms: u64) {
        self.duration_ms = ms;
    }
}
