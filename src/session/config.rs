use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::live::SetupMessage;

/// Configuration for one live conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Unique session identifier (used in logs)
    pub session_id: String,

    /// Remote model name
    pub model: String,

    /// Prebuilt voice for audio replies
    pub voice: Option<String>,

    /// Requested reply modality ("AUDIO" or "TEXT")
    pub response_modality: String,

    /// Media resolution hint
    pub media_resolution: Option<String>,

    /// Upper bound on how long one turn may take
    /// Default: 60 seconds
    pub turn_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            session_id: format!("live-{}", uuid::Uuid::new_v4()),
            model: "models/gemini-2.5-flash-native-audio-preview-12-2025".to_string(),
            voice: Some("Zephyr".to_string()),
            response_modality: "AUDIO".to_string(),
            media_resolution: Some("MEDIA_RESOLUTION_MEDIUM".to_string()),
            turn_timeout: Duration::from_secs(60),
        }
    }
}

impl SessionConfig {
    pub fn setup_message(&self) -> SetupMessage {
        SetupMessage::new(
            self.model.clone(),
            self.response_modality.clone(),
            self.media_resolution.clone(),
            self.voice.clone(),
        )
    }
}
