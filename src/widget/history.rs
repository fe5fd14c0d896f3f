use log::{ debug, warn };
use std::sync::Arc;

use super::storage::KeyValueStore;
use crate::models::chat::{ ContextMessage, StoredMessage };

/// Persisted conversation, stored as one JSON array under a fixed key and
/// capped to the newest `limit` entries.
#[derive(Clone)]
pub struct History {
    store: Arc<dyn KeyValueStore>,
    key: String,
    limit: usize,
}

impl History {
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>, limit: usize) -> Self {
        Self { store, key: key.into(), limit }
    }

    /// Reads the stored messages. A missing, unreadable or corrupt entry is an empty history.
    pub fn load(&self) -> Vec<StoredMessage> {
        let raw = match self.store.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                debug!("History '{}' unreadable, starting empty: {}", self.key, e);
                return Vec::new();
            }
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            debug!("History '{}' is not valid JSON, starting empty: {}", self.key, e);
            Vec::new()
        })
    }

    /// Appends one message, evicting the oldest entries past the cap, and persists the result.
    pub fn push(&self, message: StoredMessage) -> Vec<StoredMessage> {
        let mut entries = self.load();
        entries.push(message);
        truncate_oldest(&mut entries, self.limit);
        self.save(&entries);
        entries
    }

    pub fn clear(&self) {
        if let Err(e) = self.store.remove(&self.key) {
            warn!("Failed to clear history '{}': {}", self.key, e);
        }
    }

    /// The newest `count` messages as provider context, oldest first.
    pub fn recent_context(&self, count: usize) -> Vec<ContextMessage> {
        let entries = self.load();
        let start = entries.len().saturating_sub(count);
        entries[start..].iter().map(StoredMessage::to_context).collect()
    }

    fn save(&self, entries: &[StoredMessage]) {
        let result = serde_json::to_string(entries)
            .map_err(|e| e.to_string())
            .and_then(|json| self.store.set(&self.key, &json).map_err(|e| e.to_string()));
        if let Err(e) = result {
            warn!("Failed to persist history '{}': {}", self.key, e);
        }
    }
}

fn truncate_oldest<T>(entries: &mut Vec<T>, limit: usize) {
    if entries.len() > limit {
        let excess = entries.len() - limit;
        entries.drain(..excess);
    }
}
