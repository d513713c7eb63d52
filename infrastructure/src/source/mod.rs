//! Chunk source adapters.

pub mod scripted;

pub use scripted::ScriptedChunkSource;
