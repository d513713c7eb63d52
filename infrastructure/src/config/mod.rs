//! Configuration loading.
//!
//! - [`FileConfig`] — raw TOML structure of `relay.toml`
//! - [`ConfigLoader`] — multi-source discovery and merging

pub mod file_config;
pub mod loader;

pub use file_config::{FileChannelsConfig, FileConfig, FileStreamConfig, FileTranscriptConfig};
pub use loader::ConfigLoader;
