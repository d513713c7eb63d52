//! Broadcast events for per-conversation channels.
//!
//! [`BroadcastEvent`] is the payload published to a conversation's channel
//! while a reply streams: zero or more non-terminal deltas carrying batched
//! chunks, then exactly one terminal event marking completion or failure.

use serde::{Deserialize, Serialize};

/// An event published to a per-conversation broadcast channel.
///
/// Field names follow the wire format consumed by live clients
/// (`isComplete` rather than `is_complete`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastEvent {
    /// Channel the event belongs to, e.g. `chat.<conversation-id>`.
    pub channel: String,
    /// Chunk batch, full final content, or error description.
    pub content: String,
    /// True only on the terminal event of a session.
    #[serde(rename = "isComplete")]
    pub is_complete: bool,
    /// True only on the failure terminal event.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub error: bool,
}

impl BroadcastEvent {
    /// A non-terminal flush carrying a batch of pending chunks.
    pub fn delta(channel: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            content: content.into(),
            is_complete: false,
            error: false,
        }
    }

    /// The terminal event of a successful session, carrying the full content.
    pub fn completed(channel: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            content: content.into(),
            is_complete: true,
            error: false,
        }
    }

    /// The terminal event of a failed session, carrying an error description.
    pub fn failed(channel: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            content: description.into(),
            is_complete: true,
            error: true,
        }
    }

    /// Returns true if this event is the last one of its session.
    pub fn is_terminal(&self) -> bool {
        self.is_complete
    }
}
