// src/chat/history.rs
// =============================================================================
// The locally stored conversation.
//
// Loading never fails: a missing file is a fresh conversation, and a file
// that can't be read or parsed is logged and also treated as a fresh
// conversation. Saving reports errors so the caller can decide what to do.
// =============================================================================

use super::Language;
use crate::error::PersistError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn user(content: &str) -> Self {
        Self::now(Role::User, content)
    }

    pub fn assistant(content: &str) -> Self {
        Self::now(Role::Assistant, content)
    }

    fn now(role: Role, content: &str) -> Self {
        Self {
            role,
            content: content.to_string(),
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatHistory {
    pub messages: Vec<ChatMessage>,
    pub language: Option<Language>,
}

impl ChatHistory {
    pub async fn load(path: &Path) -> Self {
        let raw = match tokio::fs::read_to_string(path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Self::default(),
            Err(e) => {
                log::warn!("Error loading chat history from {}: {}", path.display(), e);
                return Self::default();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(history) => history,
            Err(e) => {
                log::warn!("Error loading chat history from {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub async fn save(&self, path: &Path) -> Result<(), PersistError> {
        let json = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, json)
            .await
            .map_err(|source| PersistError::Write {
                path: path.to_path_buf(),
                source,
            })
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }
}
