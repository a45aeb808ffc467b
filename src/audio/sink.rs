use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::wav::ContainerArtifact;

/// Destination for rebuilt container artifacts
///
/// Called once per audio-bearing message with the full artifact so far, so
/// the last emission for a session always holds that turn's whole audio.
/// One sink is shared by concurrent sessions.
#[async_trait::async_trait]
pub trait AudioSink: Send + Sync {
    /// Persist or forward the artifact produced by `session_id`
    async fn emit(&self, session_id: &str, artifact: &ContainerArtifact) -> Result<()>;

    /// Sink name for logging
    fn name(&self) -> &str;
}

/// Writes each session's artifact to its own WAV file
///
/// `aki_reply.wav` becomes `aki_reply-<session_id>.wav` beside it, so
/// overlapping turns never overwrite each other's audio.
pub struct FileSink {
    base: PathBuf,
}

impl FileSink {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    fn dir(&self) -> &Path {
        self.base
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
    }

    fn stem(&self) -> String {
        self.base
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "reply".to_string())
    }

    fn extension(&self) -> String {
        self.base
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_else(|| "wav".to_string())
    }

    /// File holding the audio of `session_id`
    pub fn session_path(&self, session_id: &str) -> PathBuf {
        self.dir().join(format!("{}-{}.{}", self.stem(), session_id, self.extension()))
    }

    /// Most recently written session file, if any
    pub fn latest(&self) -> Result<Option<PathBuf>> {
        let dir = self.dir();
        if !dir.exists() {
            return Ok(None);
        }

        let prefix = format!("{}-", self.stem());
        let suffix = format!(".{}", self.extension());
        let mut latest: Option<(std::time::SystemTime, PathBuf)> = None;

        let entries = std::fs::read_dir(dir)
            .with_context(|| format!("Failed to list audio directory: {:?}", dir))?;

        for entry in entries {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if !name.starts_with(&prefix) || !name.ends_with(&suffix) {
                continue;
            }

            let modified = entry.metadata()?.modified()?;
            if latest.as_ref().map_or(true, |(newest, _)| modified > *newest) {
                latest = Some((modified, entry.path()));
            }
        }

        Ok(latest.map(|(_, path)| path))
    }
}

#[async_trait::async_trait]
impl AudioSink for FileSink {
    async fn emit(&self, session_id: &str, artifact: &ContainerArtifact) -> Result<()> {
        let dir = self.dir();
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("Failed to create audio directory: {:?}", dir))?;

        let path = self.session_path(session_id);

        // Write beside the target and rename so readers never see a torn file
        let tmp_path = path.with_extension(format!("{}.tmp", uuid::Uuid::new_v4()));
        tokio::fs::write(&tmp_path, artifact.as_bytes())
            .await
            .with_context(|| format!("Failed to write audio file: {:?}", tmp_path))?;
        tokio::fs::rename(&tmp_path, &path)
            .await
            .with_context(|| format!("Failed to replace audio file: {:?}", path))?;

        debug!("Wrote {} bytes to {}", artifact.len(), path.display());

        Ok(())
    }

    fn name(&self) -> &str {
        "file"
    }
}

/// Discards artifacts; the caller only wants the final `TurnResult`
pub struct NullSink;

#[async_trait::async_trait]
impl AudioSink for NullSink {
    async fn emit(&self, _session_id: &str, _artifact: &ContainerArtifact) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "null"
    }
}
