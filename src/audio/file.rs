use anyhow::{Context, Result};
use hound::WavReader;
use std::io::{Cursor, Read};
use std::path::Path;
use tracing::info;

use super::format::AudioFormat;

/// A container artifact read back from disk or memory
pub struct AudioFile {
    pub path: Option<String>,
    pub duration_seconds: f64,
    pub format: AudioFormat,
    /// Samples per channel
    pub frame_count: u32,
}

impl AudioFile {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Opening audio file: {}", path.display());

        let reader = WavReader::open(path).context("Failed to open WAV file")?;

        let mut audio = Self::from_reader(reader)?;
        audio.path = Some(path.display().to_string());

        info!(
            "Audio file loaded: {:.1}s, {}Hz, {} channels, {} bits",
            audio.duration_seconds,
            audio.format.sample_rate,
            audio.format.channels,
            audio.format.bits_per_sample
        );

        Ok(audio)
    }

    /// Parse an in-memory container (e.g. a `ContainerArtifact`)
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let reader = WavReader::new(Cursor::new(bytes)).context("Failed to parse WAV bytes")?;
        Self::from_reader(reader)
    }

    fn from_reader<R: Read>(reader: WavReader<R>) -> Result<Self> {
        let spec = reader.spec();
        let frame_count = reader.duration();

        let duration_seconds = if spec.sample_rate == 0 {
            0.0
        } else {
            frame_count as f64 / spec.sample_rate as f64
        };

        Ok(Self {
            path: None,
            duration_seconds,
            format: AudioFormat {
                channels: spec.channels,
                bits_per_sample: spec.bits_per_sample,
                sample_rate: spec.sample_rate,
            },
            frame_count,
        })
    }
}
