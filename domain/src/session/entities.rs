//! Message domain entities

use super::value_objects::{ConversationId, MessageId};
use serde::{Deserialize, Serialize};

/// Role of a message in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A persisted message in a conversation (Entity)
///
/// The assistant reply starts life as an empty placeholder record created
/// before streaming begins; its content is replaced exactly once when the
/// stream ends.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub conversation_id: ConversationId,
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(
        id: MessageId,
        conversation_id: ConversationId,
        role: Role,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id,
            conversation_id,
            role,
            content: content.into(),
        }
    }

    /// An empty assistant placeholder for the given conversation.
    pub fn placeholder(id: MessageId, conversation_id: ConversationId) -> Self {
        Self::new(id, conversation_id, Role::Assistant, "")
    }
}
