//! HTTP API server for the chat client
//!
//! - POST /chat - Run one live turn and return its text and audio
//! - GET /memory - Current memory document
//! - GET /health - Health check

mod handlers;
mod routes;
mod state;

pub use handlers::{ChatRequest, ChatResponse};
pub use routes::create_router;
pub use state::AppState;
