//! Deterministic chunk source.
//!
//! [`ScriptedChunkSource`] replays a fixed script of chunks, optionally
//! pacing them with a delay and optionally ending with a failure. It powers
//! the demo binary and integration-style tests where a real model backend
//! would be overkill.

use async_trait::async_trait;
use relay_application::ports::chunk_source::{ChunkSource, SourceError};
use std::collections::VecDeque;
use std::time::Duration;

/// A chunk source that replays a pre-defined script.
pub struct ScriptedChunkSource {
    items: VecDeque<Result<String, SourceError>>,
    delay: Option<Duration>,
}

impl ScriptedChunkSource {
    pub fn new(chunks: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            items: chunks.into_iter().map(|c| Ok(c.into())).collect(),
            delay: None,
        }
    }

    /// Split `text` into chunks of at most `chunk_size` characters,
    /// respecting UTF-8 boundaries.
    pub fn from_text(text: &str, chunk_size: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        let mut chunks = Vec::new();
        let mut current = String::new();
        for ch in text.chars() {
            current.push(ch);
            if current.chars().count() >= chunk_size {
                chunks.push(std::mem::take(&mut current));
            }
        }
        if !current.is_empty() {
            chunks.push(current);
        }
        Self::new(chunks)
    }

    /// Sleep this long before yielding each item.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// End the script with a failure instead of normal exhaustion.
    pub fn failing_with(mut self, error: SourceError) -> Self {
        self.items.push_back(Err(error));
        self
    }

    /// Keep only the first `n` chunks, then fail.
    pub fn fail_after(mut self, n: usize, error: SourceError) -> Self {
        self.items.truncate(n);
        self.items.push_back(Err(error));
        self
    }
}

#[async_trait]
impl ChunkSource for ScriptedChunkSource {
    async fn next_chunk(&mut self) -> Result<Option<String>, SourceError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match self.items.pop_front() {
            Some(Ok(chunk)) => Ok(Some(chunk)),
            Some(Err(e)) => Err(e),
            None => Ok(None),
        }
    }
}
