//! Message store port
//!
//! Defines the two persistence operations the core consumes: creating a
//! message record and replacing a record's content. Both are atomic —
//! they either succeed or fail with no partial write.

use async_trait::async_trait;
use relay_domain::{ConversationId, MessageId, Role};
use thiserror::Error;

/// Errors that can occur during message store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Message not found: {0}")]
    NotFound(MessageId),

    #[error("Write failed: {0}")]
    WriteFailed(String),
}

/// Persistence for conversation messages.
///
/// The aggregator relies on a create-empty / stream / update-once
/// lifecycle: the assistant placeholder is created before streaming
/// begins, and its content is replaced exactly once at the end.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Create a message record and return its handle.
    async fn create_message(
        &self,
        conversation_id: &ConversationId,
        role: Role,
        content: &str,
    ) -> Result<MessageId, StoreError>;

    /// Replace the content of an existing record.
    async fn update_content(&self, id: &MessageId, content: &str) -> Result<(), StoreError>;
}
