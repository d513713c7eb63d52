//! In-memory message store.
//!
//! Implements the [`MessageStore`] port over a mutex-guarded map with a
//! monotonic id counter. Suitable for the demo binary and tests; a real
//! deployment would back this port with a database.

use async_trait::async_trait;
use relay_application::ports::message_store::{MessageStore, StoreError};
use relay_domain::{ConversationId, Message, MessageId, Role};
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::debug;

#[derive(Default)]
struct Inner {
    next_id: u64,
    messages: HashMap<MessageId, Message>,
}

/// Thread-safe in-memory implementation of the message store port.
#[derive(Default)]
pub struct InMemoryMessageStore {
    inner: Mutex<Inner>,
}

impl InMemoryMessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch a message by id.
    pub fn get(&self, id: &MessageId) -> Option<Message> {
        self.inner.lock().unwrap().messages.get(id).cloned()
    }

    /// All messages of a conversation, in creation order.
    pub fn conversation_messages(&self, conversation_id: &ConversationId) -> Vec<Message> {
        let inner = self.inner.lock().unwrap();
        let mut messages: Vec<Message> = inner
            .messages
            .values()
            .filter(|m| &m.conversation_id == conversation_id)
            .cloned()
            .collect();
        messages.sort_by_key(|m| m.id.value());
        messages
    }
}

#[async_trait]
impl MessageStore for InMemoryMessageStore {
    async fn create_message(
        &self,
        conversation_id: &ConversationId,
        role: Role,
        content: &str,
    ) -> Result<MessageId, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.next_id += 1;
        let id = MessageId::new(inner.next_id);
        inner
            .messages
            .insert(id, Message::new(id, conversation_id.clone(), role, content));
        debug!(message = %id, conversation = %conversation_id, ?role, "Created message");
        Ok(id)
    }

    async fn update_content(&self, id: &MessageId, content: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let message = inner
            .messages
            .get_mut(id)
            .ok_or(StoreError::NotFound(*id))?;
        message.content = content.to_string();
        debug!(message = %id, bytes = content.len(), "Updated message content");
        Ok(())
    }
}
