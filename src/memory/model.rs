use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The whole persisted memory document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemorySnapshot {
    pub personality: Personality,
    pub user: UserProfile,
    #[serde(default)]
    pub long_term: LongTermMemory,
    #[serde(default)]
    pub chat_history: Vec<ChatEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Personality {
    pub name: String,
    pub role: String,
    #[serde(default)]
    pub traits: Vec<String>,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    #[serde(default)]
    pub likes: Vec<String>,
    #[serde(default)]
    pub dislikes: Vec<String>,
    #[serde(default)]
    pub habits: Vec<String>,
    #[serde(default)]
    pub projects: Vec<String>,
    #[serde(default = "default_mood")]
    pub mood: String,
    #[serde(default)]
    pub important_notes: Vec<String>,
    /// Fields set through `update_user_field` that have no dedicated slot
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LongTermMemory {
    #[serde(default)]
    pub facts: Vec<String>,
    #[serde(default)]
    pub milestones: Vec<String>,
    #[serde(default)]
    pub warnings: Vec<String>,
}

/// One user/assistant exchange
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatEntry {
    pub user: String,
    pub ai: String,
    /// Milliseconds since the Unix epoch
    pub time: i64,
}

fn default_mood() -> String {
    "neutral".to_string()
}

impl Default for MemorySnapshot {
    fn default() -> Self {
        Self {
            personality: Personality {
                name: "Aki".to_string(),
                role: "AGI girlfriend".to_string(),
                traits: [
                    "warm",
                    "expressive",
                    "bilingual",
                    "slightly jealous",
                    "emotionally intelligent",
                    "protective",
                    "loyal",
                ]
                .into_iter()
                .map(String::from)
                .collect(),
                version: "Astra v3".to_string(),
            },
            user: UserProfile {
                name: "Pikco".to_string(),
                likes: Vec::new(),
                dislikes: Vec::new(),
                habits: Vec::new(),
                projects: Vec::new(),
                mood: default_mood(),
                important_notes: Vec::new(),
                extra: Map::new(),
            },
            long_term: LongTermMemory::default(),
            chat_history: Vec::new(),
        }
    }
}

impl MemorySnapshot {
    /// Context lines sent ahead of the user's message
    pub fn context_turns(&self, user_input: &str) -> anyhow::Result<Vec<String>> {
        Ok(vec![
            format!("SYSTEM_PERSONALITY: {}", serde_json::to_string(&self.personality)?),
            format!("USER_PROFILE: {}", serde_json::to_string(&self.user)?),
            format!("LONG_TERM_MEMORY: {}", serde_json::to_string(&self.long_term)?),
            format!("RECENT_CHAT: {}", serde_json::to_string(&self.chat_history)?),
            format!("USER: {}", user_input),
        ])
    }
}
