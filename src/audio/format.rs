use serde::{Deserialize, Serialize};

/// PCM parameters carried by an inline audio part's MIME type
/// (e.g. `audio/L16;rate=24000`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AudioFormat {
    /// Number of interleaved channels
    pub channels: u16,
    /// Bits per sample (16 for `L16`)
    pub bits_per_sample: u16,
    /// Sample rate in Hz
    pub sample_rate: u32,
}

impl Default for AudioFormat {
    fn default() -> Self {
        Self {
            channels: 1,         // Mono
            bits_per_sample: 16, // 16-bit linear PCM
            sample_rate: 24000,  // Live API output rate
        }
    }
}

impl AudioFormat {
    /// Parse a MIME-like descriptor, keeping the default for any field that
    /// is missing or malformed. Never fails.
    ///
    /// A combination whose block align or byte rate overflows the WAV header
    /// fields is treated as malformed and yields the default format.
    pub fn parse(mime_type: &str) -> Self {
        let mut format = Self::default();

        let mut tokens = mime_type.split(';').map(str::trim);
        let media = tokens.next().unwrap_or_default();

        // Subtype such as "L16": one letter followed by the bit depth
        if let Some((_, subtype)) = media.split_once('/') {
            if let Some(bits) = parse_bit_depth(subtype.trim()) {
                format.bits_per_sample = bits;
            }
        }

        for param in tokens {
            let Some((key, value)) = param.split_once('=') else {
                continue;
            };

            match key.trim().to_ascii_lowercase().as_str() {
                "rate" => {
                    if let Some(rate) = parse_positive::<u32>(value) {
                        format.sample_rate = rate;
                    }
                }
                "channels" => {
                    if let Some(channels) = parse_positive::<u16>(value) {
                        format.channels = channels;
                    }
                }
                _ => {}
            }
        }

        if format.block_align().is_none() || format.byte_rate().is_none() {
            return Self::default();
        }

        format
    }

    /// Bytes per sample frame (all channels), `None` if it overflows a u16
    pub fn block_align(&self) -> Option<u16> {
        let align = self.channels as u32 * self.bits_per_sample as u32 / 8;
        u16::try_from(align).ok()
    }

    /// Bytes per second of audio, `None` if it overflows a u32
    pub fn byte_rate(&self) -> Option<u32> {
        let rate = self.sample_rate as u64 * self.channels as u64 * self.bits_per_sample as u64 / 8;
        u32::try_from(rate).ok()
    }
}

fn parse_bit_depth(subtype: &str) -> Option<u16> {
    let mut chars = subtype.chars();
    let first = chars.next()?;
    if !first.is_ascii_alphabetic() {
        return None;
    }

    parse_positive::<u16>(chars.as_str())
}

fn parse_positive<T>(value: &str) -> Option<T>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    let value = value.trim();
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    value.parse::<T>().ok().filter(|v| *v > T::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_l16_with_rate() {
        let format = AudioFormat::parse("audio/L16;rate=24000");

        assert_eq!(format.channels, 1);
        assert_eq!(format.bits_per_sample, 16);
        assert_eq!(format.sample_rate, 24000);
    }

    #[test]
    fn test_parse_unknown_subtype_falls_back_to_defaults() {
        assert_eq!(AudioFormat::parse("audio/unknown"), AudioFormat::default());
    }

    #[test]
    fn test_parse_overrides_rate_and_depth() {
        let format = AudioFormat::parse("audio/L8; rate=16000");

        assert_eq!(format.bits_per_sample, 8);
        assert_eq!(format.sample_rate, 16000);
        assert_eq!(format.channels, 1);
    }

    #[test]
    fn test_parse_malformed_tokens_keep_defaults() {
        let format = AudioFormat::parse("audio/Lxx;rate=fast;channels=;=3");
        assert_eq!(format, AudioFormat::default());

        let format = AudioFormat::parse("audio/L0;rate=0");
        assert_eq!(format, AudioFormat::default());

        let format = AudioFormat::parse("audio/L16;rate=-8000");
        assert_eq!(format.sample_rate, 24000);
    }

    #[test]
    fn test_parse_channels_param() {
        let format = AudioFormat::parse("audio/L16;rate=48000;channels=2");

        assert_eq!(format.channels, 2);
        assert_eq!(format.block_align(), Some(4));
        assert_eq!(format.byte_rate(), Some(192000));
    }

    #[test]
    fn test_parse_overflowing_combination_keeps_defaults() {
        // 65535 channels of 64-bit samples: block align overflows a u16
        let format = AudioFormat::parse("audio/L64;rate=24000;channels=65535");
        assert_eq!(format, AudioFormat::default());

        // Block align fits but the byte rate overflows a u32
        let format = AudioFormat::parse("audio/L32;rate=4000000000;channels=2");
        assert_eq!(format, AudioFormat::default());

        // Largest rate that still fits for mono 16-bit
        let format = AudioFormat::parse("audio/L16;rate=2147483647");
        assert_eq!(format.sample_rate, 2_147_483_647);
        assert_eq!(format.byte_rate(), Some(4_294_967_294));
    }

    #[test]
    fn test_parse_empty_and_garbage() {
        assert_eq!(AudioFormat::parse(""), AudioFormat::default());
        assert_eq!(AudioFormat::parse(";;;"), AudioFormat::default());
        assert_eq!(AudioFormat::parse("not a mime"), AudioFormat::default());
    }

    #[test]
    fn test_parse_is_idempotent() {
        let descriptor = "audio/L24;rate=44100";
        assert_eq!(AudioFormat::parse(descriptor), AudioFormat::parse(descriptor));
    }
}
