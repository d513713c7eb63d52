//! Chunk source port
//!
//! Defines the interface for consuming a model backend's reply stream:
//! a lazy, finite sequence of text fragments that either exhausts normally
//! or fails mid-stream with a description.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

/// Errors raised by a chunk source instead of producing a next chunk.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Stream cancelled")]
    Cancelled,
}

/// A lazy stream of reply chunks from a model backend.
///
/// `Ok(Some(chunk))` yields the next fragment, `Ok(None)` signals normal
/// exhaustion, and `Err` signals a mid-stream failure. After exhaustion or
/// failure the source must not be polled again.
///
/// Cancellation has no dedicated state: a source asked to stop producing
/// surfaces it as exhaustion or as [`SourceError::Cancelled`].
#[async_trait]
pub trait ChunkSource: Send {
    /// Await the next chunk.
    async fn next_chunk(&mut self) -> Result<Option<String>, SourceError>;
}

/// Handle for receiving chunks pushed through an mpsc channel.
///
/// Lets transport code (SSE readers, websocket pumps) run in its own task
/// and feed the aggregator through a channel. A closed channel is treated
/// as normal exhaustion.
pub struct ChunkStreamHandle {
    receiver: mpsc::Receiver<Result<String, SourceError>>,
}

impl ChunkStreamHandle {
    pub fn new(receiver: mpsc::Receiver<Result<String, SourceError>>) -> Self {
        Self { receiver }
    }

    /// Consume the stream and collect all chunks into a single string.
    ///
    /// Useful when streaming happens at the transport level but only the
    /// final text is needed.
    pub async fn collect_text(mut self) -> Result<String, SourceError> {
        let mut full_text = String::new();
        while let Some(chunk) = self.next_chunk().await? {
            full_text.push_str(&chunk);
        }
        Ok(full_text)
    }
}

#[async_trait]
impl ChunkSource for ChunkStreamHandle {
    async fn next_chunk(&mut self) -> Result<Option<String>, SourceError> {
        match self.receiver.recv().await {
            Some(Ok(chunk)) => Ok(Some(chunk)),
            Some(Err(e)) => Err(e),
            None => Ok(None),
        }
    }
}
