//! Local persistence of the conversation and session id
//!
//! Two independently keyed entries are kept: [`MESSAGES_KEY`] holds the
//! conversation as a JSON array and [`SESSION_KEY`] holds the raw session id.
//! Loading never fails; absent or corrupt entries read as an empty
//! conversation and/or no session.

use crate::chat::Message;
use crate::error::Result;

pub mod memory;
pub mod sled_store;

pub use memory::MemoryStore;
pub use sled_store::SledStore;

/// Key of the serialized conversation log
pub const MESSAGES_KEY: &str = "chat_messages";

/// Key of the current session id
pub const SESSION_KEY: &str = "session_id";

/// State restored at startup
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersistedState {
    /// Conversation log, oldest first
    pub messages: Vec<Message>,
    /// Session id held when the client last ran
    pub session_id: Option<String>,
}

/// Key-value backend for conversation history
///
/// Writes are synchronous and best effort: callers log failures and carry
/// on. There is no transaction across the two keys.
pub trait HistoryStore: Send + Sync {
    /// Read both entries, failing soft on missing or malformed data
    fn load(&self) -> PersistedState;

    /// Overwrite the stored conversation
    fn save_messages(&self, messages: &[Message]) -> Result<()>;

    /// Overwrite the stored session id
    fn save_session(&self, session_id: &str) -> Result<()>;
}

/// Decode raw entries into a [`PersistedState`]
///
/// Shared by every backend so corrupt data is handled the same way.
pub(crate) fn decode_state(messages: Option<&[u8]>, session: Option<&[u8]>) -> PersistedState {
    let messages = match messages {
        Some(bytes) => match serde_json::from_slice::<Vec<Message>>(bytes) {
            Ok(messages) => messages,
            Err(e) => {
                tracing::warn!("Ignoring malformed stored conversation: {}", e);
                Vec::new()
            }
        },
        None => Vec::new(),
    };

    let session_id = match session.map(std::str::from_utf8) {
        Some(Ok(id)) if !id.trim().is_empty() => Some(id.to_string()),
        Some(Ok(_)) | None => None,
        Some(Err(e)) => {
            tracing::warn!("Ignoring malformed stored session id: {}", e);
            None
        }
    };

    PersistedState {
        messages,
        session_id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::FakeApi;

    #[test]
    fn test_decode_state_missing_entries() {
        assert_eq!(decode_state(None, None), PersistedState::default());
    }

    #[test]
    fn test_decode_state_malformed_messages() {
        let state = decode_state(Some(b"{not json"), Some(b"abc"));
        assert!(state.messages.is_empty());
        assert_eq!(state.session_id.as_deref(), Some("abc"));
    }

    #[test]
    fn test_decode_state_wrong_shape_messages() {
        let state = decode_state(Some(br#"{"messages": []}"#), None);
        assert!(state.messages.is_empty());
    }

    #[test]
    fn test_decode_state_blank_or_invalid_session() {
        assert_eq!(decode_state(None, Some(b"")).session_id, None);
        assert_eq!(decode_state(None, Some(&[0xff, 0xfe])).session_id, None);
    }

    #[test]
    fn test_decode_state_roundtrips_messages() {
        let messages = vec![Message::user("hi"), Message::assistant("hello")];
        let bytes = serde_json::to_vec(&messages).unwrap();
        let state = decode_state(Some(&bytes), None);
        assert_eq!(state.messages, messages);
    }

    #[test]
    fn test_decode_state_keeps_exact_processing_times() {
        let messages: Vec<Message> = (1..=2000u32)
            .map(|i| {
                let secs = f64::from(i).sqrt() / 37.0 + 1.0 / (f64::from(i) + 3.0);
                let mut response = FakeApi::reply("x", "s");
                response.extracted_data = Some(serde_json::json!({ "score": secs * 3.1 }));
                Message::assistant_reply(response, secs)
            })
            .chain(std::iter::once(Message::assistant_reply(
                FakeApi::reply("x", "s"),
                0.036914118733714044,
            )))
            .collect();

        let bytes = serde_json::to_vec(&messages).unwrap();
        let state = decode_state(Some(&bytes), None);
        assert_eq!(state.messages, messages);
    }
}
