//! CLI argument definitions

use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for chat-relay
#[derive(Parser, Debug)]
#[command(name = "chat-relay")]
#[command(author, version, about = "Streaming reply aggregator - chunk stream to batched broadcasts")]
#[command(long_about = r#"
chat-relay simulates one streamed assistant reply end to end:

1. The user message is persisted and an empty assistant placeholder created
2. A scripted chunk source streams the reply text chunk by chunk
3. The aggregator batches chunks into time-windowed broadcast events
4. A subscriber prints each event; the final reply is persisted exactly once

Configuration files are loaded from (in priority order):
1. --config <path>     Explicit config file
2. ./relay.toml        Project-level config
3. ~/.config/chat-relay/config.toml   Global config

Example:
  chat-relay "Rust is a systems programming language."
  chat-relay --chunk-size 3 --delay-ms 20 "Streaming demo text"
  chat-relay --fail-after 5 "This stream will fail mid-way"
"#)]
pub struct Cli {
    /// The reply text to stream through the aggregator
    pub text: Option<String>,

    /// Read the reply text from a file instead
    #[arg(short, long, value_name = "PATH", conflicts_with = "text")]
    pub file: Option<PathBuf>,

    /// Conversation identifier (drives the channel name)
    #[arg(short = 'i', long, default_value = "demo")]
    pub conversation: String,

    /// Characters per chunk fed to the aggregator
    #[arg(long, default_value_t = 4)]
    pub chunk_size: usize,

    /// Delay between chunks in milliseconds
    #[arg(long, default_value_t = 15)]
    pub delay_ms: u64,

    /// Override the flush window in milliseconds
    #[arg(long, value_name = "MS")]
    pub flush_ms: Option<u64>,

    /// Fail the chunk source after this many chunks
    #[arg(long, value_name = "N")]
    pub fail_after: Option<usize>,

    /// Write a JSONL transcript of session outcomes to this path
    #[arg(long, value_name = "PATH")]
    pub transcript: Option<PathBuf>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress the event printout
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}
