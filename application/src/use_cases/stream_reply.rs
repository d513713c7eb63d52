//! Stream Reply use case.
//!
//! The streaming aggregator: consumes a chunk stream from a model backend,
//! coalesces chunks into time-windowed broadcast events on the
//! conversation's channel, persists the assembled reply exactly once, and
//! signals completion or failure with a single terminal event.
//!
//! The placeholder assistant record must already exist — see
//! [`StartReplyUseCase`](super::start_reply::StartReplyUseCase) — so
//! subscribers that query persisted state mid-stream see a stable empty
//! record rather than a half-written one.

use crate::config::StreamParams;
use crate::ports::broadcaster::Broadcaster;
use crate::ports::chunk_source::ChunkSource;
use crate::ports::message_store::{MessageStore, StoreError};
use crate::ports::transcript_logger::{NoTranscriptLogger, TranscriptEvent, TranscriptLogger};
use relay_domain::util::truncate_str;
use relay_domain::{BroadcastEvent, ConversationId, MessageId, StreamSession, TerminalOutcome};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that abort the aggregation itself.
///
/// A chunk-source failure is not in here: it is recovered locally into
/// [`TerminalOutcome::Failed`]. Only a failed final store write is fatal,
/// and in that case no terminal broadcast is guaranteed.
#[derive(Error, Debug)]
pub enum StreamReplyError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Input for the [`StreamReplyUseCase`].
#[derive(Debug, Clone)]
pub struct StreamReplyInput {
    /// The conversation this reply belongs to.
    pub conversation_id: ConversationId,
    /// Handle to the pre-created empty assistant record.
    pub placeholder: MessageId,
    /// Batching parameters — flush window.
    pub params: StreamParams,
}

impl StreamReplyInput {
    pub fn new(conversation_id: ConversationId, placeholder: MessageId) -> Self {
        Self {
            conversation_id,
            placeholder,
            params: StreamParams::default(),
        }
    }

    pub fn with_params(mut self, params: StreamParams) -> Self {
        self.params = params;
        self
    }
}

/// Use case for aggregating one streamed reply.
///
/// Executes the flow:
/// 1. Build a [`StreamSession`] for the conversation
/// 2. Append each incoming chunk; publish a delta event when the flush
///    window elapses
/// 3. On exhaustion: flush the residue, write the full content to the
///    store, then publish the `Completed` terminal event
/// 4. On source failure: publish the `Failed` terminal event carrying the
///    error description, never the partial content
///
/// The store write happens-before the terminal event, so a subscriber
/// reacting to completion by re-reading storage observes the final content.
pub struct StreamReplyUseCase {
    broadcaster: Arc<dyn Broadcaster>,
    store: Arc<dyn MessageStore>,
    transcript: Arc<dyn TranscriptLogger>,
}

impl StreamReplyUseCase {
    pub fn new(broadcaster: Arc<dyn Broadcaster>, store: Arc<dyn MessageStore>) -> Self {
        Self {
            broadcaster,
            store,
            transcript: Arc::new(NoTranscriptLogger),
        }
    }

    /// Create with a transcript logger.
    pub fn with_transcript_logger(mut self, logger: Arc<dyn TranscriptLogger>) -> Self {
        self.transcript = logger;
        self
    }

    /// Drive the chunk source to its end and return how the session
    /// terminated.
    pub async fn execute(
        &self,
        input: StreamReplyInput,
        mut source: impl ChunkSource,
    ) -> Result<TerminalOutcome, StreamReplyError> {
        info!(
            conversation = %input.conversation_id,
            flush_ms = input.params.flush_interval.as_millis() as u64,
            "Starting reply stream"
        );

        let mut session = StreamSession::new(
            input.conversation_id.clone(),
            input.params.flush_interval,
            tokio::time::Instant::now().into_std(),
        );

        loop {
            match source.next_chunk().await {
                Ok(Some(chunk)) => {
                    let now = tokio::time::Instant::now().into_std();
                    if let Some(batch) = session.append(&chunk, now) {
                        debug!(
                            bytes = batch.len(),
                            preview = truncate_str(&batch, 40),
                            "Flushing chunk batch"
                        );
                        self.publish(BroadcastEvent::delta(session.channel(), batch))
                            .await;
                    }
                }
                Ok(None) => {
                    let (residue, content) = session.complete();
                    if let Some(batch) = residue {
                        debug!(bytes = batch.len(), "Flushing residual batch");
                        self.publish(BroadcastEvent::delta(session.channel(), batch))
                            .await;
                    }

                    // Store write happens-before the terminal event.
                    self.store
                        .update_content(&input.placeholder, &content)
                        .await?;

                    self.publish(BroadcastEvent::completed(session.channel(), content.clone()))
                        .await;

                    info!(
                        conversation = %input.conversation_id,
                        bytes = content.len(),
                        "Reply stream completed"
                    );
                    self.transcript.log(TranscriptEvent::new(
                        "reply_completed",
                        serde_json::json!({
                            "conversation": input.conversation_id.as_str(),
                            "message": input.placeholder.value(),
                            "bytes": content.len(),
                        }),
                    ));

                    return Ok(TerminalOutcome::Completed { content });
                }
                Err(e) => {
                    session.fail();
                    let description = e.to_string();
                    warn!(
                        conversation = %input.conversation_id,
                        error = %description,
                        "Chunk source failed mid-stream"
                    );

                    // The pending buffer is not flushed as a normal batch;
                    // the terminal event carries the description only.
                    self.publish(BroadcastEvent::failed(session.channel(), &description))
                        .await;

                    self.transcript.log(TranscriptEvent::new(
                        "reply_failed",
                        serde_json::json!({
                            "conversation": input.conversation_id.as_str(),
                            "message": input.placeholder.value(),
                            "error": description,
                            "partial_bytes": session.accumulated().len(),
                        }),
                    ));

                    return Ok(TerminalOutcome::Failed {
                        description,
                        partial: session.accumulated().to_string(),
                    });
                }
            }
        }
    }

    /// Publish with BroadcastFailure treated as non-fatal: the accumulation
    /// and the final store write proceed regardless of delivery failures.
    async fn publish(&self, event: BroadcastEvent) {
        if let Err(e) = self.broadcaster.publish(&event).await {
            warn!(channel = %event.channel, "Broadcast publish failed: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::broadcaster::BroadcastError;
    use crate::ports::chunk_source::SourceError;
    use async_trait::async_trait;
    use relay_domain::Role;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    // ==================== Test Mocks ====================

    /// Scripted chunk source: replays a fixed sequence of results, with an
    /// optional delay before each item (virtual time under paused tests).
    struct ScriptedSource {
        items: VecDeque<Result<String, SourceError>>,
        delay: Option<Duration>,
    }

    impl ScriptedSource {
        fn new(chunks: &[&str]) -> Self {
            Self {
                items: chunks.iter().map(|c| Ok(c.to_string())).collect(),
                delay: None,
            }
        }

        fn failing_after(chunks: &[&str], error: SourceError) -> Self {
            let mut items: VecDeque<_> = chunks.iter().map(|c| Ok(c.to_string())).collect();
            items.push_back(Err(error));
            Self { items, delay: None }
        }

        fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }
    }

    #[async_trait]
    impl ChunkSource for ScriptedSource {
        async fn next_chunk(&mut self) -> Result<Option<String>, SourceError> {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            match self.items.pop_front() {
                Some(Ok(chunk)) => Ok(Some(chunk)),
                Some(Err(e)) => Err(e),
                None => Ok(None),
            }
        }
    }

    /// Broadcaster that records every published event.
    struct RecordingBroadcaster {
        events: Mutex<Vec<BroadcastEvent>>,
    }

    impl RecordingBroadcaster {
        fn new() -> Self {
            Self {
                events: Mutex::new(Vec::new()),
            }
        }

        fn events(&self) -> Vec<BroadcastEvent> {
            self.events.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Broadcaster for RecordingBroadcaster {
        async fn publish(&self, event: &BroadcastEvent) -> Result<(), BroadcastError> {
            self.events.lock().unwrap().push(event.clone());
            Ok(())
        }
    }

    /// Broadcaster that always fails.
    struct FailingBroadcaster;

    #[async_trait]
    impl Broadcaster for FailingBroadcaster {
        async fn publish(&self, _event: &BroadcastEvent) -> Result<(), BroadcastError> {
            Err(BroadcastError::PublishFailed("transport down".to_string()))
        }
    }

    /// Store that records update calls, optionally failing them.
    struct MockStore {
        updates: Mutex<Vec<(MessageId, String)>>,
        fail_update: bool,
    }

    impl MockStore {
        fn new() -> Self {
            Self {
                updates: Mutex::new(Vec::new()),
                fail_update: false,
            }
        }

        fn failing() -> Self {
            Self {
                updates: Mutex::new(Vec::new()),
                fail_update: true,
            }
        }

        fn updates(&self) -> Vec<(MessageId, String)> {
            self.updates.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl MessageStore for MockStore {
        async fn create_message(
            &self,
            _conversation_id: &ConversationId,
            _role: Role,
            _content: &str,
        ) -> Result<MessageId, StoreError> {
            Ok(MessageId::new(1))
        }

        async fn update_content(&self, id: &MessageId, content: &str) -> Result<(), StoreError> {
            if self.fail_update {
                return Err(StoreError::WriteFailed("disk full".to_string()));
            }
            self.updates
                .lock()
                .unwrap()
                .push((*id, content.to_string()));
            Ok(())
        }
    }

    fn input() -> StreamReplyInput {
        StreamReplyInput::new(ConversationId::new("7").unwrap(), MessageId::new(1))
    }

    fn use_case(
        broadcaster: Arc<RecordingBroadcaster>,
        store: Arc<MockStore>,
    ) -> StreamReplyUseCase {
        StreamReplyUseCase::new(broadcaster, store)
    }

    // ==================== Tests ====================

    #[tokio::test]
    async fn final_content_is_exact_concatenation() {
        let broadcaster = Arc::new(RecordingBroadcaster::new());
        let store = Arc::new(MockStore::new());
        let chunks = ["The ", "quick ", "brown ", "fox"];

        let outcome = use_case(broadcaster.clone(), store.clone())
            .execute(input(), ScriptedSource::new(&chunks))
            .await
            .unwrap();

        assert_eq!(
            outcome,
            TerminalOutcome::Completed {
                content: "The quick brown fox".to_string()
            }
        );
        assert_eq!(
            store.updates(),
            vec![(MessageId::new(1), "The quick brown fox".to_string())]
        );
    }

    #[tokio::test]
    async fn exactly_one_terminal_event_and_it_is_last() {
        let broadcaster = Arc::new(RecordingBroadcaster::new());
        let store = Arc::new(MockStore::new());

        use_case(broadcaster.clone(), store)
            .execute(input(), ScriptedSource::new(&["a", "b", "c"]))
            .await
            .unwrap();

        let events = broadcaster.events();
        let terminals: Vec<_> = events.iter().filter(|e| e.is_terminal()).collect();
        assert_eq!(terminals.len(), 1);
        assert!(events.last().unwrap().is_terminal());
        assert_eq!(events.last().unwrap().content, "abc");
        assert!(!events.last().unwrap().error);
    }

    #[tokio::test(start_paused = true)]
    async fn no_data_loss_across_flush_boundaries() {
        let broadcaster = Arc::new(RecordingBroadcaster::new());
        let store = Arc::new(MockStore::new());

        // 12 chunks, 30ms apart: several window-triggered flushes plus a
        // residual flush at exhaustion.
        let chunks: Vec<String> = (0..12).map(|i| format!("c{i},")).collect();
        let chunk_refs: Vec<&str> = chunks.iter().map(|s| s.as_str()).collect();
        let source = ScriptedSource::new(&chunk_refs).with_delay(Duration::from_millis(30));

        let outcome = use_case(broadcaster.clone(), store.clone())
            .execute(input(), source)
            .await
            .unwrap();

        let events = broadcaster.events();
        let deltas: Vec<_> = events.iter().filter(|e| !e.is_terminal()).collect();
        assert!(deltas.len() > 1, "expected multiple window flushes");

        let rejoined: String = deltas.iter().map(|e| e.content.as_str()).collect();
        assert_eq!(rejoined, chunks.concat());
        assert_eq!(outcome.content(), chunks.concat());
    }

    #[tokio::test(start_paused = true)]
    async fn store_update_invoked_exactly_once() {
        let store = Arc::new(MockStore::new());

        let chunks: Vec<String> = (0..50).map(|i| format!("{i} ")).collect();
        let chunk_refs: Vec<&str> = chunks.iter().map(|s| s.as_str()).collect();
        let source = ScriptedSource::new(&chunk_refs).with_delay(Duration::from_millis(25));

        StreamReplyUseCase::new(Arc::new(crate::ports::broadcaster::NoBroadcast), store.clone())
            .execute(input(), source)
            .await
            .unwrap();

        assert_eq!(store.updates().len(), 1);
        assert_eq!(store.updates()[0].1, chunks.concat());
    }

    #[tokio::test]
    async fn empty_stream_completes_with_empty_content() {
        let broadcaster = Arc::new(RecordingBroadcaster::new());
        let store = Arc::new(MockStore::new());

        let outcome = use_case(broadcaster.clone(), store.clone())
            .execute(input(), ScriptedSource::new(&[]))
            .await
            .unwrap();

        assert_eq!(
            outcome,
            TerminalOutcome::Completed {
                content: String::new()
            }
        );
        // One terminal Completed event with empty content, no deltas
        let events = broadcaster.events();
        assert_eq!(events.len(), 1);
        assert!(events[0].is_terminal());
        assert!(!events[0].error);
        assert_eq!(events[0].content, "");
        // Final write still happens, with the empty string
        assert_eq!(store.updates(), vec![(MessageId::new(1), String::new())]);
    }

    #[tokio::test]
    async fn failure_before_any_chunk_emits_only_terminal_error() {
        let broadcaster = Arc::new(RecordingBroadcaster::new());
        let store = Arc::new(MockStore::new());

        let source =
            ScriptedSource::failing_after(&[], SourceError::Transport("reset".to_string()));
        let outcome = use_case(broadcaster.clone(), store.clone())
            .execute(input(), source)
            .await
            .unwrap();

        assert!(!outcome.is_completed());
        let events = broadcaster.events();
        assert_eq!(events.len(), 1);
        assert!(events[0].is_terminal());
        assert!(events[0].error);
        // No store write on failure
        assert!(store.updates().is_empty());
    }

    #[tokio::test]
    async fn failure_preserves_partial_content_in_outcome_not_event() {
        let broadcaster = Arc::new(RecordingBroadcaster::new());
        let store = Arc::new(MockStore::new());

        let source = ScriptedSource::failing_after(
            &["Hello, ", "wor"],
            SourceError::Backend("model crashed".to_string()),
        );
        let outcome = use_case(broadcaster.clone(), store.clone())
            .execute(input(), source)
            .await
            .unwrap();

        match outcome {
            TerminalOutcome::Failed {
                description,
                partial,
            } => {
                assert_eq!(partial, "Hello, wor");
                assert!(description.contains("model crashed"));
            }
            _ => panic!("Expected Failed outcome"),
        }

        // The terminal event carries the description, never the partial reply
        let terminal = broadcaster.events().pop().unwrap();
        assert!(terminal.error);
        assert!(terminal.content.contains("model crashed"));
        assert!(!terminal.content.contains("Hello"));
        // The aggregator does not persist the partial content itself
        assert!(store.updates().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn burst_inside_one_window_yields_single_flush() {
        let broadcaster = Arc::new(RecordingBroadcaster::new());
        let store = Arc::new(MockStore::new());

        // 1000 one-char chunks arriving with no delay (all inside the first
        // window), then the source pauses 200ms before exhausting.
        struct BurstSource {
            remaining: usize,
            paused: bool,
        }

        #[async_trait]
        impl ChunkSource for BurstSource {
            async fn next_chunk(&mut self) -> Result<Option<String>, SourceError> {
                if self.remaining > 0 {
                    self.remaining -= 1;
                    return Ok(Some("x".to_string()));
                }
                if !self.paused {
                    self.paused = true;
                    tokio::time::sleep(Duration::from_millis(200)).await;
                }
                Ok(None)
            }
        }

        let outcome = use_case(broadcaster.clone(), store)
            .execute(
                input(),
                BurstSource {
                    remaining: 1000,
                    paused: false,
                },
            )
            .await
            .unwrap();

        let events = broadcaster.events();
        let deltas: Vec<_> = events.iter().filter(|e| !e.is_terminal()).collect();
        assert_eq!(deltas.len(), 1, "burst must coalesce into one flush");
        assert_eq!(deltas[0].content.len(), 1000);
        assert_eq!(outcome.content().len(), 1000);
    }

    #[tokio::test]
    async fn broadcast_failure_is_non_fatal() {
        let store = Arc::new(MockStore::new());
        let use_case = StreamReplyUseCase::new(Arc::new(FailingBroadcaster), store.clone());

        let outcome = use_case
            .execute(input(), ScriptedSource::new(&["a", "b"]))
            .await
            .unwrap();

        // Aggregation and the final store write proceed regardless
        assert_eq!(
            outcome,
            TerminalOutcome::Completed {
                content: "ab".to_string()
            }
        );
        assert_eq!(store.updates(), vec![(MessageId::new(1), "ab".to_string())]);
    }

    #[tokio::test]
    async fn store_failure_propagates_before_terminal_event() {
        let broadcaster = Arc::new(RecordingBroadcaster::new());
        let store = Arc::new(MockStore::failing());
        let use_case = StreamReplyUseCase::new(broadcaster.clone(), store);

        let result = use_case
            .execute(input(), ScriptedSource::new(&["a"]))
            .await;

        assert!(matches!(result, Err(StreamReplyError::Store(_))));
        // No terminal event was broadcast for this session
        assert!(broadcaster.events().iter().all(|e| !e.is_terminal()));
    }

    #[tokio::test]
    async fn events_are_published_on_the_conversation_channel() {
        let broadcaster = Arc::new(RecordingBroadcaster::new());
        let store = Arc::new(MockStore::new());

        use_case(broadcaster.clone(), store)
            .execute(input(), ScriptedSource::new(&["hi"]))
            .await
            .unwrap();

        for event in broadcaster.events() {
            assert_eq!(event.channel, "chat.7");
        }
    }
}
