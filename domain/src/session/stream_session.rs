//! Per-reply aggregation state machine.
//!
//! [`StreamSession`] turns an unbounded chunk stream into a bounded-rate
//! sequence of flush batches. It owns the two buffers and the flush window
//! bookkeeping; the caller owns the clock and passes `now` into every
//! time-sensitive operation, which keeps this crate free of runtime
//! dependencies and makes the window logic testable with plain values.
//!
//! # Invariants
//!
//! - `accumulated` is exactly the ordered concatenation of every chunk ever
//!   appended; nothing is dropped, reordered, or duplicated.
//! - `pending` is always the not-yet-broadcast suffix of `accumulated`;
//!   a flush hands it out and leaves it empty.
//! - Once the session reaches a terminal state no further mutation occurs.

use super::value_objects::ConversationId;
use std::time::{Duration, Instant};

/// Lifecycle state of a stream session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Chunks are still being consumed.
    Streaming,
    /// The chunk source was exhausted normally.
    Completed,
    /// The chunk source failed mid-stream.
    Failed,
}

/// Ephemeral aggregation state for one in-flight reply.
///
/// Created when a reply is requested, driven through zero or more flush
/// cycles, then terminated exactly once via [`complete`](Self::complete)
/// or [`fail`](Self::fail) and discarded.
#[derive(Debug)]
pub struct StreamSession {
    conversation_id: ConversationId,
    channel: String,
    accumulated: String,
    pending: String,
    last_flush: Instant,
    flush_interval: Duration,
    state: SessionState,
}

impl StreamSession {
    /// Start a session for `conversation_id` with the flush window anchored
    /// at `now`.
    pub fn new(conversation_id: ConversationId, flush_interval: Duration, now: Instant) -> Self {
        let channel = conversation_id.channel_name();
        Self {
            conversation_id,
            channel,
            accumulated: String::new(),
            pending: String::new(),
            last_flush: now,
            flush_interval,
            state: SessionState::Streaming,
        }
    }

    pub fn conversation_id(&self) -> &ConversationId {
        &self.conversation_id
    }

    /// Broadcast channel name for all events of this session.
    pub fn channel(&self) -> &str {
        &self.channel
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Full content received so far. On a failed session this is the
    /// preserved partial reply.
    pub fn accumulated(&self) -> &str {
        &self.accumulated
    }

    /// Content received since the last flush.
    pub fn pending(&self) -> &str {
        &self.pending
    }

    /// Append a chunk and decide whether the flush window has elapsed.
    ///
    /// Returns `Some(batch)` when the elapsed time since the last flush is at
    /// or above the flush interval (boundary inclusive) and there is pending
    /// content; the batch is everything buffered since the previous flush and
    /// `pending` is left empty. Returns `None` while the window is still open.
    ///
    /// Empty chunks are ignored. Appends after a terminal state are ignored.
    pub fn append(&mut self, chunk: &str, now: Instant) -> Option<String> {
        if self.state != SessionState::Streaming || chunk.is_empty() {
            return None;
        }

        self.accumulated.push_str(chunk);
        self.pending.push_str(chunk);

        if now.duration_since(self.last_flush) >= self.flush_interval {
            self.last_flush = now;
            return Some(std::mem::take(&mut self.pending));
        }
        None
    }

    /// Terminate the session after normal stream exhaustion.
    ///
    /// Returns the residual pending batch — flushed regardless of elapsed
    /// time so no content is silently dropped — and the full accumulated
    /// content. Calling on an already-terminated session yields no residue.
    pub fn complete(&mut self) -> (Option<String>, String) {
        if self.state != SessionState::Streaming {
            return (None, self.accumulated.clone());
        }
        self.state = SessionState::Completed;
        let residue = if self.pending.is_empty() {
            None
        } else {
            Some(std::mem::take(&mut self.pending))
        };
        (residue, self.accumulated.clone())
    }

    /// Terminate the session after a chunk-source failure.
    ///
    /// Pending content is not flushed as a normal batch; the accumulated
    /// partial reply remains readable via [`accumulated`](Self::accumulated).
    pub fn fail(&mut self) {
        if self.state == SessionState::Streaming {
            self.state = SessionState::Failed;
        }
    }
}
