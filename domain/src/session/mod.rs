//! Stream session domain.
//!
//! - [`stream_session::StreamSession`] — per-reply aggregation state machine
//! - [`event::BroadcastEvent`] — event published to a conversation channel
//! - [`outcome::TerminalOutcome`] — how a session ended
//! - [`entities::Message`] — a persisted message record

pub mod entities;
pub mod event;
pub mod outcome;
pub mod stream_session;
pub mod value_objects;
