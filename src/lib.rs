pub mod audio;
pub mod config;
pub mod error;
pub mod http;
pub mod live;
pub mod memory;
pub mod session;

pub use audio::{
    AudioFile, AudioFormat, AudioSink, ContainerArtifact, FileSink, FragmentBuffer, NullSink,
};
pub use config::Config;
pub use error::{ContainerError, TurnError};
pub use http::{create_router, AppState};
pub use live::{LiveTransport, ServerMessage, TransportFactory, WebSocketFactory};
pub use memory::{MemorySnapshot, MemoryStore};
pub use session::{LiveSession, SessionConfig, TurnResult, TurnRouter, TurnStats};
