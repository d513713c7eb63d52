//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod broadcaster;
pub mod chunk_source;
pub mod message_store;
pub mod transcript_logger;
