use super::config::SessionConfig;
use super::router::TurnRouter;
use super::stats::{TurnResult, TurnStats};
use super::turn;
use crate::audio::AudioSink;
use crate::error::TurnError;
use crate::live::{ClientContentMessage, LiveTransport, ServerMessage};
use anyhow::{Context, Result};
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// One live conversation: owns the transport, the inbound queue the
/// transport pushes into, and the per-turn accumulators
pub struct LiveSession {
    /// Session configuration
    config: SessionConfig,

    /// Remote session connection
    transport: Box<dyn LiveTransport>,

    /// Inbound messages in arrival order
    inbound: mpsc::UnboundedReceiver<ServerMessage>,

    /// Text/audio accumulators for the current turn
    router: TurnRouter,
}

impl LiveSession {
    /// Connect the transport and register the inbound queue as its push target
    pub async fn open(
        config: SessionConfig,
        mut transport: Box<dyn LiveTransport>,
        sink: Arc<dyn AudioSink>,
    ) -> Result<Self> {
        info!(
            "Opening live session {} via {} ({})",
            config.session_id,
            transport.name(),
            config.model
        );

        let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();

        transport
            .connect(&config.setup_message(), inbound_tx)
            .await
            .context("Failed to open live session")?;

        let router = TurnRouter::new(config.session_id.clone(), sink);

        Ok(Self {
            config,
            transport,
            inbound: inbound_rx,
            router,
        })
    }

    pub fn session_id(&self) -> &str {
        &self.config.session_id
    }

    /// Send the context lines that open a turn
    pub async fn send_context<I, S>(&mut self, lines: I) -> Result<(), TurnError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let content = ClientContentMessage::user_turn(lines);

        self.transport
            .send_content(&content)
            .await
            .map_err(|e| TurnError::Transport(format!("{:#}", e)))
    }

    /// Wait for the current turn to complete and collect its output
    ///
    /// `&mut self` keeps turns on one session from overlapping.
    pub async fn run_turn(&mut self, cancel: &CancellationToken) -> Result<TurnResult, TurnError> {
        self.router.reset();

        let started_at = Utc::now();
        let outcome = turn::run_turn(
            &mut self.inbound,
            &mut self.router,
            self.config.turn_timeout,
            cancel,
        )
        .await;

        let messages_consumed = match outcome {
            Ok(consumed) => consumed,
            Err(e) => {
                warn!("Turn on session {} failed: {}", self.config.session_id, e);
                return Err(e);
            }
        };

        let fragments = self.router.fragments();
        let stats = TurnStats {
            session_id: self.config.session_id.clone(),
            started_at,
            duration_secs: Utc::now().signed_duration_since(started_at).num_milliseconds() as f64
                / 1000.0,
            messages_consumed,
            audio_fragments: fragments.fragment_count(),
            audio_bytes: fragments.total_len(),
            artifacts_emitted: self.router.artifacts_emitted(),
            sink_failures: self.router.sink_failures(),
        };

        let (text, audio) = self.router.take_output();

        info!(
            "Turn complete on {}: {} messages, {} text chars, {} audio bytes in {:.2}s",
            stats.session_id,
            stats.messages_consumed,
            text.chars().count(),
            stats.audio_bytes,
            stats.duration_secs
        );

        Ok(TurnResult { text, audio, stats })
    }

    /// Close the remote session
    pub async fn close(mut self) -> Result<()> {
        info!("Closing live session {}", self.config.session_id);
        self.transport.close().await
    }

    /// Drive exactly one turn: open, send context, wait for completion, close
    ///
    /// The session is closed whether or not the turn succeeds.
    pub async fn converse<I, S>(
        config: SessionConfig,
        transport: Box<dyn LiveTransport>,
        sink: Arc<dyn AudioSink>,
        context: I,
        cancel: &CancellationToken,
    ) -> Result<TurnResult>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut session = Self::open(config, transport, sink).await?;

        let outcome = match session.send_context(context).await {
            Ok(()) => session.run_turn(cancel).await,
            Err(e) => Err(e),
        };

        let session_id = session.session_id().to_string();
        if let Err(e) = session.close().await {
            warn!("Failed to close live session {}: {:#}", session_id, e);
        }

        Ok(outcome?)
    }
}
