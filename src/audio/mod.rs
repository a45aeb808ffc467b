//! Audio turn assembly primitives
//!
//! - `format`: MIME descriptor → PCM parameters
//! - `buffer`: ordered PCM fragment accumulator
//! - `wav`: 44-byte RIFF/WAVE header and artifact builder
//! - `sink`: where rebuilt artifacts go
//! - `file`: read artifacts back for inspection

pub mod buffer;
pub mod file;
pub mod format;
pub mod sink;
pub mod wav;

pub use buffer::FragmentBuffer;
pub use file::AudioFile;
pub use format::AudioFormat;
pub use sink::{AudioSink, FileSink, NullSink};
pub use wav::{encode_header, ContainerArtifact, HEADER_LEN};
