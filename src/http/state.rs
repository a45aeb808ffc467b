use crate::audio::AudioSink;
use crate::live::TransportFactory;
use crate::memory::MemoryStore;
use crate::session::SessionConfig;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Conversation memory document
    pub memory: Arc<MemoryStore>,

    /// Opens one live transport per chat request
    pub transports: Arc<dyn TransportFactory>,

    /// Receives every rebuilt reply artifact
    pub sink: Arc<dyn AudioSink>,

    /// Template for per-request session settings
    pub session: SessionConfig,

    /// Cancelled on shutdown; each turn runs on a child token
    pub shutdown: CancellationToken,
}

impl AppState {
    pub fn new(
        memory: Arc<MemoryStore>,
        transports: Arc<dyn TransportFactory>,
        sink: Arc<dyn AudioSink>,
        session: SessionConfig,
    ) -> Self {
        Self {
            memory,
            transports,
            sink,
            session,
            shutdown: CancellationToken::new(),
        }
    }

    /// Session settings with a fresh session ID
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            session_id: format!("live-{}", uuid::Uuid::new_v4()),
            ..self.session.clone()
        }
    }
}
