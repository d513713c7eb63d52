//! In-process broadcast channels.

pub mod hub;

pub use hub::ChannelHub;
