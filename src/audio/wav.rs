// Canonical 44-byte RIFF/WAVE container for raw little-endian PCM.
//
// The whole artifact is rebuilt from the fragment buffer every time a new
// fragment arrives, so the header's size fields always describe exactly the
// bytes that follow it.

use super::buffer::FragmentBuffer;
use super::format::AudioFormat;
use crate::error::ContainerError;

/// Size of the RIFF/WAVE header in bytes
pub const HEADER_LEN: usize = 44;

/// Largest payload whose RIFF size field (`36 + len`) still fits in a u32
pub const MAX_PAYLOAD_LEN: usize = (u32::MAX - 36) as usize;

/// Encode the WAV header for `payload_len` bytes of PCM in `format`
///
/// Fails when the RIFF size field (`36 + payload_len`) would not fit in a
/// u32, or when the format's byte rate or block align overflow their fields.
pub fn encode_header(
    payload_len: u32,
    format: &AudioFormat,
) -> Result<[u8; HEADER_LEN], ContainerError> {
    let riff_len = payload_len
        .checked_add(36)
        .ok_or(ContainerError::TooLarge(payload_len as usize))?;
    let (Some(byte_rate), Some(block_align)) = (format.byte_rate(), format.block_align()) else {
        return Err(ContainerError::UnsupportedFormat(*format));
    };

    let mut header = [0u8; HEADER_LEN];

    header[0..4].copy_from_slice(b"RIFF");
    header[4..8].copy_from_slice(&riff_len.to_le_bytes());
    header[8..12].copy_from_slice(b"WAVE");

    // fmt chunk
    header[12..16].copy_from_slice(b"fmt ");
    header[16..20].copy_from_slice(&16u32.to_le_bytes());
    header[20..22].copy_from_slice(&1u16.to_le_bytes()); // PCM
    header[22..24].copy_from_slice(&format.channels.to_le_bytes());
    header[24..28].copy_from_slice(&format.sample_rate.to_le_bytes());
    header[28..32].copy_from_slice(&byte_rate.to_le_bytes());
    header[32..34].copy_from_slice(&block_align.to_le_bytes());
    header[34..36].copy_from_slice(&format.bits_per_sample.to_le_bytes());

    // data chunk
    header[36..40].copy_from_slice(b"data");
    header[40..44].copy_from_slice(&payload_len.to_le_bytes());

    Ok(header)
}

/// Header plus PCM payload, immutable once built
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerArtifact {
    bytes: Vec<u8>,
    format: AudioFormat,
}

impl ContainerArtifact {
    /// Build a fresh artifact from every fragment collected so far
    pub fn build(fragments: &FragmentBuffer, format: AudioFormat) -> Result<Self, ContainerError> {
        let total = fragments.total_len();
        if total > MAX_PAYLOAD_LEN {
            return Err(ContainerError::TooLarge(total));
        }

        let header = encode_header(total as u32, &format)?;

        let mut bytes = Vec::with_capacity(HEADER_LEN + total);
        bytes.extend_from_slice(&header);
        for chunk in fragments.snapshot() {
            bytes.extend_from_slice(chunk);
        }

        Ok(Self { bytes, format })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn format(&self) -> AudioFormat {
        self.format
    }

    /// Total artifact length, header included
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// PCM bytes following the header
    pub fn payload(&self) -> &[u8] {
        &self.bytes[HEADER_LEN..]
    }

    /// Audio duration implied by the payload length
    pub fn duration_secs(&self) -> f64 {
        match self.format.byte_rate() {
            Some(byte_rate) if byte_rate > 0 => self.payload().len() as f64 / byte_rate as f64,
            _ => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_u32(bytes: &[u8], offset: usize) -> u32 {
        u32::from_le_bytes(bytes[offset..offset + 4].try_into().unwrap())
    }

    fn read_u16(bytes: &[u8], offset: usize) -> u16 {
        u16::from_le_bytes(bytes[offset..offset + 2].try_into().unwrap())
    }

    #[test]
    fn test_header_layout() {
        let format = AudioFormat::default();
        let header = encode_header(300, &format).unwrap();

        assert_eq!(&header[0..4], b"RIFF");
        assert_eq!(read_u32(&header, 4), 336);
        assert_eq!(&header[8..12], b"WAVE");
        assert_eq!(&header[12..16], b"fmt ");
        assert_eq!(read_u32(&header, 16), 16);
        assert_eq!(read_u16(&header, 20), 1);
        assert_eq!(read_u16(&header, 22), 1);
        assert_eq!(read_u32(&header, 24), 24000);
        assert_eq!(read_u32(&header, 28), 48000);
        assert_eq!(read_u16(&header, 32), 2);
        assert_eq!(read_u16(&header, 34), 16);
        assert_eq!(&header[36..40], b"data");
        assert_eq!(read_u32(&header, 40), 300);
    }

    #[test]
    fn test_header_stereo_byte_rate() {
        let format = AudioFormat {
            channels: 2,
            bits_per_sample: 24,
            sample_rate: 48000,
        };
        let header = encode_header(0, &format).unwrap();

        assert_eq!(read_u32(&header, 28), 48000 * 2 * 3);
        assert_eq!(read_u16(&header, 32), 6);
        assert_eq!(read_u32(&header, 4), 36);
    }

    #[test]
    fn test_header_size_limit() {
        let format = AudioFormat::default();

        let header = encode_header(MAX_PAYLOAD_LEN as u32, &format).unwrap();
        assert_eq!(read_u32(&header, 4), u32::MAX);
        assert_eq!(read_u32(&header, 40), MAX_PAYLOAD_LEN as u32);

        let err = encode_header(MAX_PAYLOAD_LEN as u32 + 1, &format).unwrap_err();
        assert!(matches!(err, ContainerError::TooLarge(len) if len == MAX_PAYLOAD_LEN + 1));

        assert!(matches!(encode_header(u32::MAX, &format), Err(ContainerError::TooLarge(_))));
    }

    #[test]
    fn test_header_rejects_overflowing_format() {
        let format = AudioFormat {
            channels: u16::MAX,
            bits_per_sample: 64,
            sample_rate: 192_000,
        };

        assert!(matches!(
            encode_header(0, &format),
            Err(ContainerError::UnsupportedFormat(f)) if f == format
        ));
        assert!(ContainerArtifact::build(&FragmentBuffer::new(), format).is_err());
    }

    #[test]
    fn test_build_two_fragments() {
        let mut fragments = FragmentBuffer::new();
        fragments.append(vec![1u8; 100]);
        fragments.append(vec![2u8; 200]);

        let format = AudioFormat::parse("audio/L16;rate=24000");
        let artifact = ContainerArtifact::build(&fragments, format).unwrap();

        assert_eq!(artifact.len(), 344);
        assert_eq!(read_u32(artifact.as_bytes(), 40), 300);
        assert_eq!(&artifact.payload()[..100], &[1u8; 100][..]);
        assert_eq!(&artifact.payload()[100..], &[2u8; 200][..]);
    }

    #[test]
    fn test_build_empty_buffer() {
        let artifact =
            ContainerArtifact::build(&FragmentBuffer::new(), AudioFormat::default()).unwrap();

        assert_eq!(artifact.len(), HEADER_LEN);
        assert_eq!(read_u32(artifact.as_bytes(), 40), 0);
        assert_eq!(artifact.duration_secs(), 0.0);
    }

    #[test]
    fn test_declared_size_matches_payload_for_varied_fragments() {
        let mut fragments = FragmentBuffer::new();
        for len in [0usize, 1, 7, 480, 4096, 13] {
            fragments.append(vec![0xAB; len]);

            let artifact = ContainerArtifact::build(&fragments, AudioFormat::default()).unwrap();
            let declared = read_u32(artifact.as_bytes(), 40) as usize;

            assert_eq!(declared, fragments.total_len());
            assert_eq!(declared, artifact.payload().len());
            assert_eq!(read_u32(artifact.as_bytes(), 4) as usize, 36 + declared);
        }
    }

    #[test]
    fn test_duration() {
        let mut fragments = FragmentBuffer::new();
        fragments.append(vec![0u8; 48000]);

        let artifact = ContainerArtifact::build(&fragments, AudioFormat::default()).unwrap();
        assert!((artifact.duration_secs() - 1.0).abs() < f64::EPSILON);
    }
}
