//! Infrastructure layer for chat-relay
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod channels;
pub mod config;
pub mod logging;
pub mod source;
pub mod store;

// Re-export commonly used types
pub use channels::ChannelHub;
pub use config::{ConfigLoader, FileChannelsConfig, FileConfig, FileStreamConfig, FileTranscriptConfig};
pub use logging::JsonlTranscriptLogger;
pub use source::ScriptedChunkSource;
pub use store::InMemoryMessageStore;
