//! Terminal outcome of a stream session.

use serde::{Deserialize, Serialize};

/// How a stream session ended.
///
/// Returned by the aggregator so the caller decides how to surface the
/// result (log, re-broadcast, alert) without coupling the aggregation
/// algorithm to a reporting transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerminalOutcome {
    /// The chunk source was exhausted normally; `content` is the full reply.
    Completed { content: String },
    /// The chunk source failed mid-stream.
    ///
    /// `partial` holds whatever content had accumulated before the failure.
    /// The aggregator never persists it — the caller chooses whether to keep
    /// the partial reply. It must never be persisted as the error text.
    Failed { description: String, partial: String },
}

impl TerminalOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, TerminalOutcome::Completed { .. })
    }

    /// The assembled reply content: full on completion, partial on failure.
    pub fn content(&self) -> &str {
        match self {
            TerminalOutcome::Completed { content } => content,
            TerminalOutcome::Failed { partial, .. } => partial,
        }
    }
}
