//! Broadcast publish port
//!
//! Defines the publish capability handed to the aggregator. Any pub/sub
//! transport (topic-based messaging, WebSocket fan-out, server-sent events)
//! satisfies the contract as long as events on one channel are delivered
//! in publish order. Delivery is at-least-once; subscriber-side
//! deduplication is the transport's concern.

use async_trait::async_trait;
use relay_domain::BroadcastEvent;
use thiserror::Error;

/// Errors that can occur while publishing an event.
#[derive(Error, Debug)]
pub enum BroadcastError {
    #[error("Channel unavailable: {0}")]
    ChannelUnavailable(String),

    #[error("Publish failed: {0}")]
    PublishFailed(String),
}

/// Publish capability for per-conversation channels.
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait Broadcaster: Send + Sync {
    /// Publish one event to its channel.
    async fn publish(&self, event: &BroadcastEvent) -> Result<(), BroadcastError>;
}

/// No-op broadcaster for tests and for running the aggregator without
/// any live subscribers.
pub struct NoBroadcast;

#[async_trait]
impl Broadcaster for NoBroadcast {
    async fn publish(&self, _event: &BroadcastEvent) -> Result<(), BroadcastError> {
        Ok(())
    }
}
