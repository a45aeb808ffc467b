use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::audio::ContainerArtifact;

/// Statistics about one completed turn
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnStats {
    /// Session the turn ran on
    pub session_id: String,

    /// When the turn loop started waiting
    pub started_at: DateTime<Utc>,

    /// Wall-clock duration in seconds
    pub duration_secs: f64,

    /// Messages consumed, turn-complete message included
    pub messages_consumed: usize,

    /// Audio fragments received
    pub audio_fragments: usize,

    /// Raw PCM bytes received
    pub audio_bytes: usize,

    /// Artifacts successfully handed to the sink
    pub artifacts_emitted: usize,

    /// Sink writes that failed (logged, not retried)
    pub sink_failures: usize,
}

/// Text and audio accumulated over one turn
#[derive(Debug, Clone)]
pub struct TurnResult {
    /// Concatenated model text
    pub text: String,

    /// Final container artifact, if any audio arrived
    pub audio: Option<ContainerArtifact>,

    pub stats: TurnStats,
}

impl TurnResult {
    /// Artifact bytes, or empty when the turn had no audio
    pub fn audio_bytes(&self) -> &[u8] {
        self.audio.as_ref().map(|a| a.as_bytes()).unwrap_or_default()
    }
}
