//! Domain layer for chat-relay
//!
//! This crate contains the core aggregation state machine, entities, and
//! value objects. It has no dependencies on infrastructure or runtime
//! concerns — time is passed in by the caller, never read from a clock here.
//!
//! # Core Concepts
//!
//! ## Stream Session
//!
//! A [`StreamSession`] is the per-reply unit of aggregation state: it
//! accumulates chunks from a model backend, batches them into time-windowed
//! flushes, and terminates exactly once into `Completed` or `Failed`.
//!
//! ## Broadcast Event
//!
//! A [`BroadcastEvent`] is the wire shape published to a per-conversation
//! channel: incremental deltas while streaming, then a single terminal event.

pub mod core;
pub mod session;
pub mod util;

// Re-export commonly used types
pub use self::core::error::DomainError;
pub use session::{
    entities::{Message, Role},
    event::BroadcastEvent,
    outcome::TerminalOutcome,
    stream_session::{SessionState, StreamSession},
    value_objects::{ConversationId, MessageId},
};
