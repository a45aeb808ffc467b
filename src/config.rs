use anyhow::Result;
use serde::Deserialize;
use std::time::Duration;

use crate::session::SessionConfig;

const LIVE_ENDPOINT: &str = concat!(
    "wss://generativelanguage.googleapis.com/ws/",
    "google.ai.generativelanguage.v1beta.GenerativeService.BidiGenerateContent",
);

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub live: LiveConfig,
    pub turn: TurnConfig,
    pub memory: MemoryConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LiveConfig {
    pub endpoint: String,
    pub model: String,
    pub voice: Option<String>,
    pub response_modality: String,
    pub media_resolution: Option<String>,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TurnConfig {
    pub timeout_secs: u64,
    pub audio_output: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MemoryConfig {
    pub path: String,
    pub history_limit: usize,
}

impl Config {
    /// Load defaults, then the optional config file at `path`, then `AKI_*`
    /// environment overrides. `GEMINI_API_KEY` fills in a missing key.
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .set_default("service.name", "aki-backend")?
            .set_default("service.http.bind", "0.0.0.0")?
            .set_default("service.http.port", 3000_i64)?
            .set_default("live.endpoint", LIVE_ENDPOINT)?
            .set_default("live.model", "models/gemini-2.5-flash-native-audio-preview-12-2025")?
            .set_default("live.voice", "Zephyr")?
            .set_default("live.response_modality", "AUDIO")?
            .set_default("live.media_resolution", "MEDIA_RESOLUTION_MEDIUM")?
            .set_default("turn.timeout_secs", 60_i64)?
            .set_default("turn.audio_output", "aki_reply.wav")?
            .set_default("memory.path", "aki_memory.json")?
            .set_default("memory.history_limit", 30_i64)?
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("AKI")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut cfg: Self = settings.try_deserialize()?;

        if cfg.live.api_key.as_deref().map_or(true, str::is_empty) {
            cfg.live.api_key = std::env::var("GEMINI_API_KEY").ok();
        }

        Ok(cfg)
    }

    /// Per-conversation session settings
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            model: self.live.model.clone(),
            voice: self.live.voice.clone(),
            response_modality: self.live.response_modality.clone(),
            media_resolution: self.live.media_resolution.clone(),
            turn_timeout: Duration::from_secs(self.turn.timeout_secs),
            ..SessionConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_defaults_without_file() {
        let cfg = Config::load("/nonexistent/aki-config").unwrap();

        assert_eq!(cfg.service.http.port, 3000);
        assert_eq!(cfg.turn.timeout_secs, 60);
        assert_eq!(cfg.memory.history_limit, 30);
        assert_eq!(cfg.live.voice.as_deref(), Some("Zephyr"));
    }

    #[test]
    fn test_load_file_overrides() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("aki.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[service.http]\nport = 8080\n").unwrap();
        writeln!(file, "[turn]\ntimeout_secs = 5\n").unwrap();
        writeln!(file, "[memory]\npath = \"mem.json\"").unwrap();

        let cfg = Config::load(path.to_str().unwrap()).unwrap();

        assert_eq!(cfg.service.http.port, 8080);
        assert_eq!(cfg.service.http.bind, "0.0.0.0");
        assert_eq!(cfg.memory.path, "mem.json");

        let session = cfg.session_config();
        assert_eq!(session.turn_timeout, Duration::from_secs(5));
        assert!(session.session_id.starts_with("live-"));
    }
}
