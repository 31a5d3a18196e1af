//! Append-only conversation log

use crate::chat::message::Message;

/// Ordered sequence of conversation entries
///
/// Entries can only be appended; the whole log can be reset when a new
/// conversation starts. Individual entries are never edited or removed.
///
/// # Examples
///
/// ```
/// use multimcp::chat::{ConversationLog, Message};
///
/// let mut log = ConversationLog::new();
/// log.append(Message::user("hello"));
/// assert_eq!(log.len(), 1);
/// log.reset();
/// assert!(log.is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConversationLog {
    messages: Vec<Message>,
}

impl ConversationLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a log from persisted entries
    pub fn from_messages(messages: Vec<Message>) -> Self {
        Self { messages }
    }

    /// Add an entry at the end
    pub fn append(&mut self, message: Message) {
        tracing::trace!(id = %message.id, role = %message.role, "Appending message");
        self.messages.push(message);
    }

    /// Drop every entry
    pub fn reset(&mut self) {
        tracing::debug!("Resetting conversation log ({} entries)", self.messages.len());
        self.messages.clear();
    }

    /// All entries in append order
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Most recent entry
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
