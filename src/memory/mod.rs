//! Conversation memory persisted as a single JSON document

mod model;
mod store;

pub use model::{ChatEntry, LongTermMemory, MemorySnapshot, Personality, UserProfile};
pub use store::{MemoryStore, DEFAULT_HISTORY_LIMIT};
