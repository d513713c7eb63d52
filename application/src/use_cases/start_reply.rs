//! Start Reply use case.
//!
//! Prepares storage for one streamed reply: persists the user's message and
//! creates the empty assistant placeholder whose handle is passed to
//! [`StreamReplyUseCase`](super::stream_reply::StreamReplyUseCase).
//!
//! The create-empty / stream / update-once ordering guarantees that
//! subscribers querying persisted state mid-stream see a stable placeholder,
//! and that the final write is a single atomic content replacement.

use crate::ports::message_store::{MessageStore, StoreError};
use relay_domain::{ConversationId, MessageId, Role};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur while preparing a reply.
#[derive(Error, Debug)]
pub enum StartReplyError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Input for the [`StartReplyUseCase`].
#[derive(Debug, Clone)]
pub struct StartReplyInput {
    pub conversation_id: ConversationId,
    /// The user's message that triggered the reply.
    pub user_message: String,
}

impl StartReplyInput {
    pub fn new(conversation_id: ConversationId, user_message: impl Into<String>) -> Self {
        Self {
            conversation_id,
            user_message: user_message.into(),
        }
    }
}

/// Handles created for one reply.
#[derive(Debug, Clone, Copy)]
pub struct StartReplyOutput {
    /// The persisted user message.
    pub user_message: MessageId,
    /// The empty assistant placeholder to stream into.
    pub placeholder: MessageId,
}

/// Use case for the placeholder lifecycle preceding a stream.
pub struct StartReplyUseCase {
    store: Arc<dyn MessageStore>,
}

impl StartReplyUseCase {
    pub fn new(store: Arc<dyn MessageStore>) -> Self {
        Self { store }
    }

    /// Persist the user message, then create the empty assistant record.
    pub async fn execute(&self, input: StartReplyInput) -> Result<StartReplyOutput, StartReplyError> {
        let user_message = self
            .store
            .create_message(&input.conversation_id, Role::User, &input.user_message)
            .await?;

        let placeholder = self
            .store
            .create_message(&input.conversation_id, Role::Assistant, "")
            .await?;

        debug!(
            conversation = %input.conversation_id,
            user_message = %user_message,
            placeholder = %placeholder,
            "Reply prepared"
        );

        Ok(StartReplyOutput {
            user_message,
            placeholder,
        })
    }
}
