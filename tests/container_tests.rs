// Integration tests for WAV container artifacts
//
// These build artifacts from PCM fragments, persist them through the file
// sink, and read them back with hound.

use aki_backend::audio::{
    AudioFile, AudioFormat, AudioSink, ContainerArtifact, FileSink, FragmentBuffer,
};
use anyhow::Result;
use std::fs;
use tempfile::TempDir;

fn pcm_fragment(samples: &[i16]) -> Vec<u8> {
    samples.iter().flat_map(|s| s.to_le_bytes()).collect()
}

#[test]
fn test_roundtrip_recovers_format() -> Result<()> {
    let formats = [
        AudioFormat::parse("audio/L16;rate=24000"),
        AudioFormat::parse("audio/L16;rate=16000;channels=2"),
        AudioFormat::parse("audio/L16;rate=48000"),
    ];

    for format in formats {
        let mut fragments = FragmentBuffer::new();
        fragments.append(pcm_fragment(&[0, 1000, -1000, 2000]));
        fragments.append(pcm_fragment(&[-2000, 3000, -3000, 4000]));

        let artifact = ContainerArtifact::build(&fragments, format)?;
        let audio = AudioFile::from_bytes(artifact.as_bytes())?;

        assert_eq!(audio.format, format, "Format should survive a round trip");
        assert_eq!(audio.frame_count, 8 / format.channels as u32);
    }

    Ok(())
}

#[test]
fn test_samples_survive_roundtrip() -> Result<()> {
    let samples: Vec<i16> = vec![100, -200, 300, -400, i16::MAX, i16::MIN];

    let mut fragments = FragmentBuffer::new();
    fragments.append(pcm_fragment(&samples[..2]));
    fragments.append(pcm_fragment(&samples[2..]));

    let artifact = ContainerArtifact::build(&fragments, AudioFormat::default())?;

    let reader = hound::WavReader::new(std::io::Cursor::new(artifact.as_bytes()))?;
    let decoded: Vec<i16> = reader.into_samples::<i16>().collect::<Result<_, _>>()?;

    assert_eq!(decoded, samples);

    Ok(())
}

#[tokio::test]
async fn test_file_sink_replaces_previous_artifact() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let sink = FileSink::new(temp_dir.path().join("replies").join("reply.wav"));
    let path = sink.session_path("live-1");
    assert!(path.ends_with("replies/reply-live-1.wav"));

    let mut fragments = FragmentBuffer::new();
    fragments.append(vec![0u8; 480]);
    let first = ContainerArtifact::build(&fragments, AudioFormat::default())?;
    sink.emit("live-1", &first).await?;

    fragments.append(vec![1u8; 480]);
    let second = ContainerArtifact::build(&fragments, AudioFormat::default())?;
    sink.emit("live-1", &second).await?;

    assert_eq!(fs::read(&path)?, second.as_bytes());

    // No temp files left behind
    let entries = fs::read_dir(path.parent().unwrap())?.count();
    assert_eq!(entries, 1);

    let audio = AudioFile::open(&path)?;
    assert_eq!(audio.frame_count, 480);
    assert!((audio.duration_seconds - 0.02).abs() < 1e-9);
    assert!(audio.path.unwrap().ends_with("reply-live-1.wav"));

    Ok(())
}

#[tokio::test]
async fn test_file_sink_keeps_sessions_apart() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let sink = FileSink::new(temp_dir.path().join("reply.wav"));
    assert!(sink.latest()?.is_none());

    let mut long_turn = FragmentBuffer::new();
    long_turn.append(vec![1u8; 960]);
    let mut short_turn = FragmentBuffer::new();
    short_turn.append(vec![2u8; 96]);

    // Interleaved emissions from two overlapping turns
    let long_first = ContainerArtifact::build(&long_turn, AudioFormat::default())?;
    sink.emit("live-a", &long_first).await?;
    let short = ContainerArtifact::build(&short_turn, AudioFormat::default())?;
    sink.emit("live-b", &short).await?;
    long_turn.append(vec![3u8; 960]);
    let long_final = ContainerArtifact::build(&long_turn, AudioFormat::default())?;
    sink.emit("live-a", &long_final).await?;

    assert_eq!(fs::read(sink.session_path("live-a"))?, long_final.as_bytes());
    assert_eq!(fs::read(sink.session_path("live-b"))?, short.as_bytes());

    // Files that do not follow the naming scheme are not picked up
    fs::write(temp_dir.path().join("notes.txt"), b"hello")?;
    let latest = sink.latest()?.expect("a reply file should exist");
    assert!(latest == sink.session_path("live-a") || latest == sink.session_path("live-b"));

    Ok(())
}

#[test]
fn test_audio_file_nonexistent() {
    let result = AudioFile::open("/nonexistent/path/to/reply.wav");
    assert!(result.is_err(), "Opening nonexistent file should fail");
}

#[test]
fn test_audio_file_rejects_garbage() {
    assert!(AudioFile::from_bytes(b"definitely not a wav file").is_err());
}
