//! In-memory history store for tests

use super::{decode_state, HistoryStore, PersistedState, MESSAGES_KEY, SESSION_KEY};
use crate::chat::Message;
use crate::error::{MultiMcpError, Result};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

/// Volatile [`HistoryStore`] keeping raw bytes per key
///
/// Raw access lets tests seed corrupt entries and inspect what was written.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Vec<u8>>>,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store raw bytes under `key`, bypassing serialization
    pub fn insert_raw(&self, key: &str, value: impl Into<Vec<u8>>) {
        self.entries().insert(key.to_string(), value.into());
    }

    /// Raw bytes stored under `key`
    pub fn raw(&self, key: &str) -> Option<Vec<u8>> {
        self.entries().get(key).cloned()
    }

    /// Make every subsequent write fail
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, Vec<u8>>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn put(&self, key: &str, value: Vec<u8>) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(MultiMcpError::Storage(format!("write to {} rejected", key)).into());
        }
        self.insert_raw(key, value);
        Ok(())
    }
}

impl HistoryStore for MemoryStore {
    fn load(&self) -> PersistedState {
        let entries = self.entries();
        decode_state(
            entries.get(MESSAGES_KEY).map(Vec::as_slice),
            entries.get(SESSION_KEY).map(Vec::as_slice),
        )
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
