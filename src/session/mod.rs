//! Live turn assembly
//!
//! This module provides the `LiveSession` abstraction that manages:
//! - Opening the remote session and queueing its pushed messages
//! - The turn loop (FIFO consumption until turn-complete, with deadline and cancellation)
//! - Routing first parts into text and audio accumulators
//! - Rebuilding and emitting the audio container per fragment

mod config;
mod router;
mod session;
mod stats;
mod turn;

pub use config::SessionConfig;
pub use router::{Routed, TurnRouter};
pub use session::LiveSession;
pub use stats::{TurnResult, TurnStats};
pub use turn::{run_turn, TurnState};
