//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod start_reply;
pub mod stream_reply;
