use base64::Engine;
use serde::{Deserialize, Serialize};

// ============================================================================
// Server → client
// ============================================================================

/// One event pushed by the live session. Every field is optional; events
/// without `serverContent` (setup acks, usage metadata, ...) are no-ops.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_content: Option<ServerContent>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub setup_complete: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub turn_complete: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_turn: Option<Content>,
}

/// A role-tagged list of parts (model output or client turn)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    #[serde(default)]
    pub parts: Vec<ContentPart>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

/// Base64 payload with its MIME descriptor (e.g. `audio/L16;rate=24000`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub data: String,
    #[serde(default)]
    pub mime_type: String,
}

impl ServerMessage {
    /// Model text chunk
    pub fn text(text: impl Into<String>) -> Self {
        Self::with_part(ContentPart {
            text: Some(text.into()),
            inline_data: None,
        })
    }

    /// Model audio chunk, base64-encoding `pcm`
    pub fn audio(pcm: &[u8], mime_type: impl Into<String>) -> Self {
        Self::with_part(ContentPart {
            text: None,
            inline_data: Some(InlineData {
                data: base64::engine::general_purpose::STANDARD.encode(pcm),
                mime_type: mime_type.into(),
            }),
        })
    }

    /// Bare turn-complete marker
    pub fn turn_complete() -> Self {
        Self {
            server_content: Some(ServerContent {
                turn_complete: Some(true),
                model_turn: None,
            }),
            setup_complete: None,
        }
    }

    fn with_part(part: ContentPart) -> Self {
        Self {
            server_content: Some(ServerContent {
                turn_complete: None,
                model_turn: Some(Content {
                    role: Some("model".to_string()),
                    parts: vec![part],
                }),
            }),
            setup_complete: None,
        }
    }

    pub fn is_turn_complete(&self) -> bool {
        self.server_content
            .as_ref()
            .and_then(|c| c.turn_complete)
            .unwrap_or(false)
    }

    /// Only the first part of a model turn is ever consumed
    pub fn first_part(&self) -> Option<&ContentPart> {
        self.server_content
            .as_ref()?
            .model_turn
            .as_ref()?
            .parts
            .first()
    }
}

// ============================================================================
// Client → server
// ============================================================================

/// First frame on a new connection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetupMessage {
    pub setup: Setup,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Setup {
    pub model: String,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_modalities: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_resolution: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speech_config: Option<SpeechConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechConfig {
    pub voice_config: VoiceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceConfig {
    pub prebuilt_voice_config: PrebuiltVoiceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrebuiltVoiceConfig {
    pub voice_name: String,
}

impl SetupMessage {
    pub fn new(
        model: impl Into<String>,
        response_modality: impl Into<String>,
        media_resolution: Option<String>,
        voice: Option<String>,
    ) -> Self {
        Self {
            setup: Setup {
                model: model.into(),
                generation_config: GenerationConfig {
                    response_modalities: vec![response_modality.into()],
                    media_resolution,
                    speech_config: voice.map(|voice_name| SpeechConfig {
                        voice_config: VoiceConfig {
                            prebuilt_voice_config: PrebuiltVoiceConfig { voice_name },
                        },
                    }),
                },
            },
        }
    }
}

/// Conversation context sent to open a turn
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientContentMessage {
    pub client_content: ClientContent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientContent {
    pub turns: Vec<Content>,
    pub turn_complete: bool,
}

impl ClientContentMessage {
    /// One user turn holding each context line as a text part
    pub fn user_turn<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let parts = lines
            .into_iter()
            .map(|line| ContentPart {
                text: Some(line.into()),
                inline_data: None,
            })
            .collect();

        Self {
            client_content: ClientContent {
                turns: vec![Content {
                    role: Some("user".to_string()),
                    parts,
                }],
                turn_complete: true,
            },
        }
    }
}
