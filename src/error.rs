use std::time::Duration;
use thiserror::Error;

use crate::audio::AudioFormat;

/// Ways a live turn can end without a turn-complete signal
#[derive(Debug, Error)]
pub enum TurnError {
    #[error("Turn timed out after {0:?}")]
    Timeout(Duration),
    #[error("Turn cancelled")]
    Cancelled,
    #[error("Live stream closed before the turn completed")]
    StreamClosed,
    #[error("Transport error: {0}")]
    Transport(String),
}

#[derive(Debug, Error)]
pub enum ContainerError {
    #[error("Audio payload of {0} bytes exceeds the WAV size limit")]
    TooLarge(usize),
    #[error("Audio format {0:?} does not fit a WAV header")]
    UnsupportedFormat(AudioFormat),
}
