//! Remote live-session collaborator
//!
//! `messages` holds the JSON wire shapes, `client` the transport trait and
//! its WebSocket implementation.

pub mod client;
pub mod messages;

pub use client::{LiveTransport, TransportFactory, WebSocketFactory, WebSocketTransport};
pub use messages::{ClientContentMessage, ContentPart, InlineData, ServerMessage, SetupMessage};
