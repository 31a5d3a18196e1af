//! Conversation log entries

use crate::api::QueryResponse;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ulid::Ulid;

/// Author of a conversation entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Text typed (or picked from the examples) by the user
    User,
    /// Reply synthesized from a backend response or failure
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
        }
    }
}

/// One entry of the conversation log
///
/// Entries are immutable once appended; the log only ever grows or is
/// reset as a whole.
///
/// # Examples
///
/// ```
/// use multimcp::chat::{Message, Role};
///
/// let message = Message::user("Post hello");
/// assert_eq!(message.role, Role::User);
/// assert!(message.result.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Unique identifier (ULID)
    pub id: String,
    /// Author of the entry
    pub role: Role,
    /// Text body; for assistant entries the backend summary or an error line
    pub content: String,
    /// Creation instant
    pub timestamp: DateTime<Utc>,
    /// Full backend payload for successful assistant replies
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<QueryResponse>,
    /// Round-trip time in seconds for successful assistant replies
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing_time: Option<f64>,
}

impl Message {
    fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: Ulid::new().to_string(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
            result: None,
            processing_time: None,
        }
    }

    /// Create a user entry
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Create an assistant entry without structured result
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Create an assistant entry from a successful backend response
    pub fn assistant_reply(response: QueryResponse, processing_time: f64) -> Self {
        let mut message = Self::new(Role::Assistant, response.result.clone());
        message.result = Some(response);
        message.processing_time = Some(processing_time);
        message
    }

    /// Create the assistant entry recording a failed query
    pub fn assistant_error(reason: &str) -> Self {
        Self::new(Role::Assistant, format!("Error: {}", reason))
    }
}
