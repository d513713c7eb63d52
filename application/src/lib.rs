//! Application layer for chat-relay
//!
//! This crate contains use cases, port definitions, and application
//! configuration. It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::StreamParams;
pub use ports::{
    broadcaster::{BroadcastError, Broadcaster, NoBroadcast},
    chunk_source::{ChunkSource, ChunkStreamHandle, SourceError},
    message_store::{MessageStore, StoreError},
    transcript_logger::{NoTranscriptLogger, TranscriptEvent, TranscriptLogger},
};
pub use use_cases::start_reply::{
    StartReplyError, StartReplyInput, StartReplyOutput, StartReplyUseCase,
};
pub use use_cases::stream_reply::{
    StreamReplyError, StreamReplyInput, StreamReplyUseCase,
};
