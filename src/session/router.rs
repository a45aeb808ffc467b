use base64::Engine;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::audio::{AudioFormat, AudioSink, ContainerArtifact, FragmentBuffer};
use crate::live::{InlineData, ServerMessage};

/// What `TurnRouter::route` did with a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Routed {
    /// No usable first part
    Ignored,
    Text,
    Audio,
    TextAndAudio,
}

/// Demultiplexes the first part of each message into the turn's text and
/// audio accumulators
///
/// Every audio fragment triggers a full rebuild of the container artifact,
/// which is handed to the sink right away.
pub struct TurnRouter {
    session_id: String,
    text: String,
    fragments: FragmentBuffer,
    artifact: Option<ContainerArtifact>,
    sink: Arc<dyn AudioSink>,
    artifacts_emitted: usize,
    sink_failures: usize,
}

impl TurnRouter {
    pub fn new(session_id: impl Into<String>, sink: Arc<dyn AudioSink>) -> Self {
        Self {
            session_id: session_id.into(),
            text: String::new(),
            fragments: FragmentBuffer::new(),
            artifact: None,
            sink,
            artifacts_emitted: 0,
            sink_failures: 0,
        }
    }

    /// Forget everything accumulated by a previous turn
    pub fn reset(&mut self) {
        self.text.clear();
        self.fragments.clear();
        self.artifact = None;
        self.artifacts_emitted = 0;
        self.sink_failures = 0;
    }

    pub async fn route(&mut self, message: &ServerMessage) -> Routed {
        let Some(part) = message.first_part() else {
            return Routed::Ignored;
        };

        let mut routed_text = false;
        if let Some(text) = part.text.as_deref().filter(|t| !t.is_empty()) {
            self.text.push_str(text);
            routed_text = true;
        }

        let mut routed_audio = false;
        if let Some(inline) = &part.inline_data {
            routed_audio = self.route_audio(inline).await;
        }

        match (routed_text, routed_audio) {
            (true, true) => Routed::TextAndAudio,
            (true, false) => Routed::Text,
            (false, true) => Routed::Audio,
            (false, false) => Routed::Ignored,
        }
    }

    async fn route_audio(&mut self, inline: &InlineData) -> bool {
        let bytes = match base64::engine::general_purpose::STANDARD.decode(&inline.data) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Dropping audio part with invalid base64: {}", e);
                return false;
            }
        };

        let format = AudioFormat::parse(&inline.mime_type);
        debug!(
            "Audio fragment: {} bytes ({}Hz, {} channels, {} bits)",
            bytes.len(),
            format.sample_rate,
            format.channels,
            format.bits_per_sample
        );

        self.fragments.append(bytes);

        let artifact = match ContainerArtifact::build(&self.fragments, format) {
            Ok(artifact) => artifact,
            Err(e) => {
                warn!("Failed to build audio container: {}", e);
                return true;
            }
        };

        match self.sink.emit(&self.session_id, &artifact).await {
            Ok(()) => self.artifacts_emitted += 1,
            Err(e) => {
                // Persistence failures never abort the turn
                self.sink_failures += 1;
                warn!("Failed to emit audio to {} sink: {:#}", self.sink.name(), e);
            }
        }

        self.artifact = Some(artifact);
        true
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn fragments(&self) -> &FragmentBuffer {
        &self.fragments
    }

    /// Latest artifact built this turn
    pub fn artifact(&self) -> Option<&ContainerArtifact> {
        self.artifact.as_ref()
    }

    pub fn artifacts_emitted(&self) -> usize {
        self.artifacts_emitted
    }

    pub fn sink_failures(&self) -> usize {
        self.sink_failures
    }

    /// Move the accumulated text and artifact out, leaving the router empty
    pub fn take_output(&mut self) -> (String, Option<ContainerArtifact>) {
        let text = std::mem::take(&mut self.text);
        let artifact = self.artifact.take();
        self.fragments.clear();
        (text, artifact)
    }
}
