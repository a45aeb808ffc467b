//! JSON file memory store
//!
//! Every mutation is a whole-document read-modify-write. A store-level lock
//! keeps concurrent requests from interleaving those cycles.

use anyhow::{bail, Context, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{error, info};

use super::model::{ChatEntry, MemorySnapshot};

/// Default number of chat exchanges kept
pub const DEFAULT_HISTORY_LIMIT: usize = 30;

pub struct MemoryStore {
    path: PathBuf,
    history_limit: usize,
    lock: Mutex<()>,
}

impl MemoryStore {
    pub fn new(path: impl Into<PathBuf>, history_limit: usize) -> Self {
        Self {
            path: path.into(),
            history_limit,
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the document, creating it with defaults when missing
    ///
    /// An unreadable or corrupt file yields the defaults without overwriting it.
    pub async fn load(&self) -> Result<MemorySnapshot> {
        let _guard = self.lock.lock().await;
        self.load_unlocked().await
    }

    pub async fn save(&self, memory: &MemorySnapshot) -> Result<()> {
        let _guard = self.lock.lock().await;
        self.save_unlocked(memory).await
    }

    /// Record one exchange, dropping the oldest beyond the history limit
    pub async fn append_chat(&self, user: &str, ai: &str) -> Result<()> {
        let entry = ChatEntry {
            user: user.to_string(),
            ai: ai.to_string(),
            time: chrono::Utc::now().timestamp_millis(),
        };
        let limit = self.history_limit;

        self.update(move |memory| {
            memory.chat_history.push(entry);
            if memory.chat_history.len() > limit {
                let excess = memory.chat_history.len() - limit;
                memory.chat_history.drain(..excess);
            }
            Ok(())
        })
        .await
    }

    pub async fn remember_fact(&self, fact: &str) -> Result<()> {
        let fact = fact.to_string();
        self.update(move |memory| {
            memory.long_term.facts.push(fact);
            Ok(())
        })
        .await
    }

    /// Set any user profile field; known fields must keep their JSON type
    pub async fn update_user_field(&self, key: &str, value: Value) -> Result<()> {
        let key = key.to_string();
        self.update(move |memory| {
            let mut user = serde_json::to_value(&memory.user)?;
            let Some(fields) = user.as_object_mut() else {
                bail!("User profile is not a JSON object");
            };
            fields.insert(key.clone(), value);

            memory.user = serde_json::from_value(user)
                .with_context(|| format!("Invalid value for user field '{}'", key))?;
            Ok(())
        })
        .await
    }

    pub async fn add_user_project(&self, project: &str) -> Result<()> {
        let project = project.to_string();
        self.update(move |memory| {
            memory.user.projects.push(project);
            Ok(())
        })
        .await
    }

    pub async fn set_mood(&self, mood: &str) -> Result<()> {
        let mood = mood.to_string();
        self.update(move |memory| {
            memory.user.mood = mood;
            Ok(())
        })
        .await
    }

    pub async fn add_important_note(&self, note: &str) -> Result<()> {
        let note = note.to_string();
        self.update(move |memory| {
            memory.user.important_notes.push(note);
            Ok(())
        })
        .await
    }

    async fn update<F>(&self, mutate: F) -> Result<()>
    where
        F: FnOnce(&mut MemorySnapshot) -> Result<()>,
    {
        let _guard = self.lock.lock().await;

        let mut memory = self.load_unlocked().await?;
        mutate(&mut memory)?;
        self.save_unlocked(&memory).await
    }

    async fn load_unlocked(&self) -> Result<MemorySnapshot> {
        if !tokio::fs::try_exists(&self.path).await.unwrap_or(false) {
            info!("No memory file at {}, creating defaults", self.path.display());
            let memory = MemorySnapshot::default();
            self.save_unlocked(&memory).await?;
            return Ok(memory);
        }

        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) => {
                error!("Failed to read memory file {}: {}", self.path.display(), e);
                return Ok(MemorySnapshot::default());
            }
        };

        match serde_json::from_str(&raw) {
            Ok(memory) => Ok(memory),
            Err(e) => {
                error!("Failed to parse memory file {}: {}", self.path.display(), e);
                Ok(MemorySnapshot::default())
            }
        }
    }

    async fn save_unlocked(&self, memory: &MemorySnapshot) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create memory directory: {:?}", parent))?;
        }

        let json = serde_json::to_string_pretty(memory)?;
        tokio::fs::write(&self.path, json)
            .await
            .with_context(|| format!("Failed to write memory file: {:?}", self.path))?;

        Ok(())
    }
}
