//! In-process pub/sub hub keyed by channel name.
//!
//! [`ChannelHub`] implements the [`Broadcaster`] port over one
//! `tokio::sync::broadcast` sender per channel name. Each sender preserves
//! publish order for its channel; subscribers that fall behind the channel
//! capacity observe a `Lagged` error from their receiver, which is the
//! at-least-once delivery caveat of the broadcast contract.

use async_trait::async_trait;
use relay_application::ports::broadcaster::{BroadcastError, Broadcaster};
use relay_domain::BroadcastEvent;
use std::collections::HashMap;
use std::sync::Mutex;
use tokio::sync::broadcast;
use tracing::trace;

/// Default per-channel event buffer.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Topic registry mapping channel names to broadcast senders.
///
/// Channels are created lazily on first subscribe or publish. Publishing to
/// a channel with no subscribers is not an error — events are
/// fire-and-forget from the publisher's perspective.
pub struct ChannelHub {
    capacity: usize,
    channels: Mutex<HashMap<String, broadcast::Sender<BroadcastEvent>>>,
}

impl ChannelHub {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            channels: Mutex::new(HashMap::new()),
        }
    }

    /// Subscribe to a channel, creating it if needed.
    pub fn subscribe(&self, channel: &str) -> broadcast::Receiver<BroadcastEvent> {
        self.sender(channel).subscribe()
    }

    /// Number of live subscribers on a channel.
    pub fn subscriber_count(&self, channel: &str) -> usize {
        self.channels
            .lock()
            .unwrap()
            .get(channel)
            .map(|tx| tx.receiver_count())
            .unwrap_or(0)
    }

    fn sender(&self, channel: &str) -> broadcast::Sender<BroadcastEvent> {
        let mut channels = self.channels.lock().unwrap();
        channels
            .entry(channel.to_string())
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .clone()
    }
}

impl Default for ChannelHub {
    fn default() -> Self {
        Self::new(DEFAULT_CHANNEL_CAPACITY)
    }
}

#[async_trait]
impl Broadcaster for ChannelHub {
    async fn publish(&self, event: &BroadcastEvent) -> Result<(), BroadcastError> {
        let sender = self.sender(&event.channel);
        // send() only fails when there are no receivers; that is fine here
        let delivered = sender.send(event.clone()).unwrap_or(0);
        trace!(
            channel = %event.channel,
            delivered,
            terminal = event.is_terminal(),
            "Published broadcast event"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscriber_receives_events_in_publish_order() {
        let hub = ChannelHub::default();
        let mut rx = hub.subscribe("chat.1");

        hub.publish(&BroadcastEvent::delta("chat.1", "a")).await.unwrap();
        hub.publish(&BroadcastEvent::delta("chat.1", "b")).await.unwrap();
        hub.publish(&BroadcastEvent::completed("chat.1", "ab"))
            .await
            .unwrap();

        assert_eq!(rx.recv().await.unwrap().content, "a");
        assert_eq!(rx.recv().await.unwrap().content, "b");
        let terminal = rx.recv().await.unwrap();
        assert!(terminal.is_terminal());
    }

    #[tokio::test]
    async fn publish_without_subscribers_succeeds() {
        let hub = ChannelHub::default();
        hub.publish(&BroadcastEvent::delta("chat.orphan", "x"))
            .await
            .unwrap();
        assert_eq!(hub.subscriber_count("chat.orphan"), 0);
    }

    #[tokio::test]
    async fn channels_are_isolated() {
        let hub = ChannelHub::default();
        let mut rx1 = hub.subscribe("chat.1");
        let mut rx2 = hub.subscribe("chat.2");

        hub.publish(&BroadcastEvent::delta("chat.1", "one")).await.unwrap();
        hub.publish(&BroadcastEvent::delta("chat.2", "two")).await.unwrap();

        assert_eq!(rx1.recv().await.unwrap().content, "one");
        assert_eq!(rx2.recv().await.unwrap().content, "two");
    }

    #[tokio::test]
    async fn multiple_subscribers_all_receive() {
        let hub = ChannelHub::default();
        let mut rx1 = hub.subscribe("chat.1");
        let mut rx2 = hub.subscribe("chat.1");
        assert_eq!(hub.subscriber_count("chat.1"), 2);

        hub.publish(&BroadcastEvent::delta("chat.1", "hello"))
            .await
            .unwrap();

        assert_eq!(rx1.recv().await.unwrap().content, "hello");
        assert_eq!(rx2.recv().await.unwrap().content, "hello");
    }
}
