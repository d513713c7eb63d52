//! Message persistence adapters.

pub mod memory;

pub use memory::InMemoryMessageStore;
