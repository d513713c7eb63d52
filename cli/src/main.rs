//! CLI entrypoint for chat-relay
//!
//! This is the demo binary that wires together all layers using
//! dependency injection: an in-memory store, an in-process channel hub,
//! and a scripted chunk source standing in for a model backend.

mod args;

use anyhow::{bail, Result};
use args::Cli;
use clap::Parser;
use relay_application::ports::chunk_source::SourceError;
use relay_application::ports::transcript_logger::TranscriptLogger;
use relay_application::{
    StartReplyInput, StartReplyUseCase, StreamReplyInput, StreamReplyUseCase,
};
use relay_domain::{ConversationId, TerminalOutcome};
use relay_infrastructure::{
    ChannelHub, ConfigLoader, InMemoryMessageStore, JsonlTranscriptLogger, ScriptedChunkSource,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    if cli.show_config {
        ConfigLoader::print_config_sources();
        return Ok(());
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).map_err(|e| anyhow::anyhow!(e))?
    };

    // Reply text: positional argument or --file
    let text = match (&cli.text, &cli.file) {
        (Some(text), _) => text.clone(),
        (None, Some(path)) => std::fs::read_to_string(path)?,
        (None, None) => bail!("Reply text is required (positional argument or --file)."),
    };

    let mut params = config.stream.to_stream_params();
    if let Some(flush_ms) = cli.flush_ms {
        params = params.with_flush_interval(Duration::from_millis(flush_ms));
    }

    let conversation = ConversationId::new(cli.conversation.clone())?;

    info!("Starting chat-relay demo");

    // === Dependency Injection ===
    let store = Arc::new(InMemoryMessageStore::new());
    let hub = Arc::new(ChannelHub::new(config.channels.capacity));

    let transcript: Option<Arc<dyn TranscriptLogger>> = cli
        .transcript
        .as_ref()
        .or(config.transcript.path.as_ref().filter(|_| config.transcript.enabled))
        .and_then(|path| JsonlTranscriptLogger::new(path))
        .map(|logger| Arc::new(logger) as Arc<dyn TranscriptLogger>);

    // Persist the user message and the empty assistant placeholder
    let prepared = StartReplyUseCase::new(store.clone())
        .execute(StartReplyInput::new(conversation.clone(), "demo request"))
        .await?;

    // Subscriber: print every event on the conversation's channel
    let mut rx = hub.subscribe(&conversation.channel_name());
    let quiet = cli.quiet;
    let subscriber = tokio::spawn(async move {
        while let Ok(event) = rx.recv().await {
            if event.is_terminal() {
                if !quiet {
                    if event.error {
                        println!("\n[terminal] error: {}", event.content);
                    } else {
                        println!("\n[terminal] complete ({} bytes)", event.content.len());
                    }
                }
                break;
            }
            if !quiet {
                println!("[delta] {:?}", event.content);
            }
        }
    });

    // Scripted chunk source standing in for the model backend
    let mut source = ScriptedChunkSource::from_text(&text, cli.chunk_size)
        .with_delay(Duration::from_millis(cli.delay_ms));
    if let Some(n) = cli.fail_after {
        source = source.fail_after(n, SourceError::Backend("scripted failure".to_string()));
    }

    let mut use_case = StreamReplyUseCase::new(hub.clone(), store.clone());
    if let Some(logger) = transcript {
        use_case = use_case.with_transcript_logger(logger);
    }

    let outcome = match use_case
        .execute(
            StreamReplyInput::new(conversation.clone(), prepared.placeholder).with_params(params),
            source,
        )
        .await
    {
        Ok(outcome) => outcome,
        Err(e) => {
            // No terminal event is guaranteed after a store failure; don't
            // leave the subscriber waiting for one.
            subscriber.abort();
            return Err(e.into());
        }
    };

    subscriber.await?;

    match outcome {
        TerminalOutcome::Completed { content } => {
            let persisted = store
                .get(&prepared.placeholder)
                .map(|m| m.content)
                .unwrap_or_default();
            if !cli.quiet {
                println!();
                println!("Reply ({} bytes): {}", content.len(), content);
                println!("Persisted content matches: {}", persisted == content);
            }
        }
        TerminalOutcome::Failed {
            description,
            partial,
        } => {
            if !cli.quiet {
                println!();
                println!("Stream failed: {}", description);
                println!("Partial reply preserved ({} bytes): {}", partial.len(), partial);
            }
        }
    }

    Ok(())
}
