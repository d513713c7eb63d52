//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted to application-layer
//! parameter types where appropriate.

use relay_application::StreamParams;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Aggregator batching settings
    pub stream: FileStreamConfig,
    /// Broadcast channel settings
    pub channels: FileChannelsConfig,
    /// JSONL transcript settings
    pub transcript: FileTranscriptConfig,
}

/// `[stream]` section — flush window control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStreamConfig {
    /// Minimum milliseconds between two non-terminal broadcast events.
    pub flush_interval_ms: u64,
}

impl Default for FileStreamConfig {
    fn default() -> Self {
        Self {
            flush_interval_ms: 100,
        }
    }
}

impl FileStreamConfig {
    /// Convert to [`StreamParams`], falling back to the default window when
    /// the configured value is zero.
    pub fn to_stream_params(&self) -> StreamParams {
        if self.flush_interval_ms == 0 {
            warn!("stream.flush_interval_ms is 0; falling back to default");
            return StreamParams::default();
        }
        StreamParams::default()
            .with_flush_interval(Duration::from_millis(self.flush_interval_ms))
    }
}

/// `[channels]` section — per-channel event buffer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileChannelsConfig {
    /// Events buffered per channel before slow subscribers lag.
    pub capacity: usize,
}

impl Default for FileChannelsConfig {
    fn default() -> Self {
        Self { capacity: 256 }
    }
}

/// `[transcript]` section — structured session log.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileTranscriptConfig {
    /// Enable the JSONL transcript sink.
    pub enabled: bool,
    /// Path of the JSONL file. Required when enabled.
    pub path: Option<PathBuf>,
}
