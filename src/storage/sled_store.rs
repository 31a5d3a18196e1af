//! Embedded on-disk history store

use super::{decode_state, HistoryStore, PersistedState, MESSAGES_KEY, SESSION_KEY};
use crate::chat::Message;
use crate::error::{MultiMcpError, Result};
use sled::Db;
use std::path::Path;

/// History store backed by an embedded `sled` database
///
/// # Examples
///
/// ```
/// use multimcp::storage::{HistoryStore, SledStore};
///
/// # fn main() -> multimcp::error::Result<()> {
/// let dir = tempfile::tempdir()?;
/// let store = SledStore::open(dir.path().join("history"))?;
/// store.save_session("abc")?;
/// assert_eq!(store.load().session_id.as_deref(), Some("abc"));
/// # Ok(())
/// # }
/// ```
pub struct SledStore {
    db: Db,
}

impl SledStore {
    /// Open or create the database directory at `path`
    ///
    /// # Errors
    ///
    /// Returns `MultiMcpError::Storage` if the database cannot be opened
    /// (for example when another process holds its lock)
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                MultiMcpError::Storage(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }

        let db = sled::open(path)
            .map_err(|e| MultiMcpError::Storage(format!("Failed to open database: {}", e)))?;
        tracing::debug!("Opened history store at {}", path.display());
        Ok(Self { db })
    }

    fn put(&self, key: &str, value: Vec<u8>) -> Result<()> {
        self.db
            .insert(key, value)
            .map_err(|e| MultiMcpError::Storage(format!("Insert failed: {}", e)))?;
        self.db
            .flush()
            .map_err(|e| MultiMcpError::Storage(format!("Flush failed: {}", e)))?;
        Ok(())
    }

    fn get(&self, key: &str) -> Option<sled::IVec> {
        match self.db.get(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Failed to read {} from history store: {}", key, e);
                None
            }
        }
    }
}

impl HistoryStore for SledStore {
    fn load(&self) -> PersistedState {
        let messages = self.get(MESSAGES_KEY);
        let session = self.get(SESSION_KEY);
        decode_state(messages.as_deref(), session.as_deref())
    }

    fn save_messages(&self, messages: &[Message]) -> Result<()> {
        let value = serde_json::to_vec(messages)
            .map_err(|e| MultiMcpError::Storage(format!("Serialization failed: {}", e)))?;
        self.put(MESSAGES_KEY, value)
    }

    fn save_session(&self, session_id: &str) -> Result<()> {
        self.put(SESSION_KEY, session_id.as_bytes().to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_open_creates_missing_parent() {
        let dir = tempdir().unwrap();
        let store = SledStore::open(dir.path().join("nested").join("history")).unwrap();
        assert_eq!(store.load(), PersistedState::default());
    }

    #[test]
    fn test_reopen_restores_state() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("history");
        let messages = vec![Message::user("Post hello"), Message::assistant("Posted.")];

        {
            let store = SledStore::open(&path).unwrap();
            store.save_messages(&messages).unwrap();
            store.save_session("s1").unwrap();
        }

        let state = SledStore::open(&path).unwrap().load();
        assert_eq!(state.messages, messages);
        assert_eq!(state.session_id.as_deref(), Some("s1"));
    }

    #[test]
    fn test_malformed_messages_load_empty() {
        let dir = tempdir().unwrap();
        let store = SledStore::open(dir.path().join("history")).unwrap();
        store.put(MESSAGES_KEY, b"[{\"broken\"".to_vec()).unwrap();
        store.save_session("s2").unwrap();

        let state = store.load();
        assert!(state.messages.is_empty());
        assert_eq!(state.session_id.as_deref(), Some("s2"));
    }
}
