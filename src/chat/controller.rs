//! Chat page controller
//!
//! Composes the session manager, conversation log, dispatcher, store and
//! notifier into the operations the chat front end calls. Every mutation
//! of the log or the session id is mirrored into the store right away;
//! write failures are logged and do not interrupt the conversation.

use crate::api::OrchestratorApi;
use crate::chat::dispatcher::{DispatchState, QueryDispatcher};
use crate::chat::log::ConversationLog;
use crate::chat::message::Message;
use crate::chat::notify::{Notification, Notifier};
use crate::chat::progress::ProgressSettings;
use crate::chat::session::SessionManager;
use crate::config::{ChatConfig, ExampleQuery};
use crate::error::{MultiMcpError, Result};
use crate::storage::HistoryStore;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::watch;

/// Chat behavior knobs taken from configuration
#[derive(Debug, Clone)]
pub struct ChatSettings {
    pub progress: ProgressSettings,
    pub examples: Vec<ExampleQuery>,
}

impl ChatSettings {
    pub fn from_config(config: &ChatConfig) -> Self {
        Self {
            progress: ProgressSettings::from_config(config),
            examples: config.examples.clone(),
        }
    }
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self::from_config(&ChatConfig::default())
    }
}

/// What happened to a submission
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The text was blank; nothing changed
    Empty,
    /// A query is already in flight; nothing changed
    Busy,
    /// The backend answered; carries the appended assistant entry
    Replied(Message),
    /// The query failed; carries the appended error entry
    Failed(Message),
}

/// What happened to a new-conversation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NewConversation {
    /// Log cleared and the new session id is held
    Started(String),
    /// A query is in flight; nothing changed
    Busy,
    /// Session creation failed; nothing changed
    Failed(String),
}

/// Stateful core of the chat
pub struct ChatController {
    api: Arc<dyn OrchestratorApi>,
    store: Arc<dyn HistoryStore>,
    notifier: Arc<dyn Notifier>,
    session: SessionManager,
    log: Mutex<ConversationLog>,
    dispatcher: QueryDispatcher,
    examples: Vec<ExampleQuery>,
}

impl ChatController {
    /// Restore persisted state and assemble the controller
    pub fn open(
        api: Arc<dyn OrchestratorApi>,
        store: Arc<dyn HistoryStore>,
        notifier: Arc<dyn Notifier>,
        settings: ChatSettings,
    ) -> Self {
        let state = store.load();
        tracing::debug!(
            messages = state.messages.len(),
            session = ?state.session_id,
            "Restored chat state"
        );

        Self {
            session: SessionManager::new(Arc::clone(&api), state.session_id),
            log: Mutex::new(ConversationLog::from_messages(state.messages)),
            dispatcher: QueryDispatcher::new(settings.progress),
            examples: settings.examples,
            api,
            store,
            notifier,
        }
    }

    /// Submit user text as a query
    ///
    /// Blank text and submissions while another query is in flight are
    /// rejected without touching the log or calling the backend.
    pub async fn submit(&self, text: &str) -> SubmitOutcome {
        let text = text.trim();
        if text.is_empty() {
            return SubmitOutcome::Empty;
        }

        let Some(mut in_flight) = self.dispatcher.try_begin() else {
            tracing::debug!("Rejected submission while a query is in flight");
            return SubmitOutcome::Busy;
        };

        self.append(Message::user(text));

        let session_id = self.session.session_id();
        let settlement = in_flight
            .run_query(self.api.as_ref(), text, session_id.as_deref())
            .await;

        if let Some(returned) = &settlement.session_id {
            if self.session.adopt(returned).is_changed() {
                self.persist_session(returned);
            }
        }

        let success = settlement.is_success();
        let message = settlement.message.clone();
        self.append(settlement.message);
        self.notifier.notify(settlement.notification);
        drop(in_flight);

        if success {
            SubmitOutcome::Replied(message)
        } else {
            SubmitOutcome::Failed(message)
        }
    }

    /// Submit the text of the suggested example with `id`
    ///
    /// # Errors
    ///
    /// Returns `MultiMcpError::InvalidInput` if no example has that id
    pub async fn submit_example(&self, id: &str) -> Result<SubmitOutcome> {
        let text = self
            .examples
            .iter()
            .find(|e| e.id == id)
            .map(|e| e.text.clone())
            .ok_or_else(|| MultiMcpError::InvalidInput(format!("Unknown example: {}", id)))?;
        Ok(self.submit(&text).await)
    }

    /// Drop the backend context and start over with an empty log
    ///
    /// Either both the new session id and the empty log are committed, or
    /// neither is.
    pub async fn new_conversation(&self) -> NewConversation {
        let Some(_in_flight) = self.dispatcher.try_begin() else {
            self.notifier.notify(Notification::error(
                "Failed to start new conversation",
                "A query is still in progress",
            ));
            return NewConversation::Busy;
        };

        match self.session.start_new_conversation().await {
            Ok(session_id) => {
                {
                    let mut log = self.lock_log();
                    log.reset();
                    self.persist_messages(log.messages());
                }
                self.persist_session(&session_id);
                self.notifier.notify(Notification::info(
                    "Started new conversation",
                    "Previous context cleared",
                ));
                NewConversation::Started(session_id)
            }
            Err(e) => {
                let reason = e.to_string();
                tracing::warn!("Failed to start new conversation: {}", reason);
                self.notifier
                    .notify(Notification::error("Failed to start new conversation", &reason));
                NewConversation::Failed(reason)
            }
        }
    }

    /// Create a backend session if none is held
    ///
    /// # Errors
    ///
    /// Returns the backend error if the session cannot be created
    pub async fn ensure_session(&self) -> Result<String> {
        let (session_id, created) = self.session.ensure_session().await?;
        if created {
            self.persist_session(&session_id);
        }
        Ok(session_id)
    }

    /// Snapshot of the conversation, oldest first
    pub fn messages(&self) -> Vec<Message> {
        self.lock_log().messages().to_vec()
    }

    pub fn session_id(&self) -> Option<String> {
        self.session.session_id()
    }

    pub fn state(&self) -> DispatchState {
        self.dispatcher.state()
    }

    /// Current progress step, `None` while idle
    pub fn progress(&self) -> watch::Receiver<Option<String>> {
        self.dispatcher.progress()
    }

    pub fn examples(&self) -> &[ExampleQuery] {
        &self.examples
    }

    /// Backend this controller talks to
    pub fn api(&self) -> &Arc<dyn OrchestratorApi> {
        &self.api
    }

    fn append(&self, message: Message) {
        let mut log = self.lock_log();
        log.append(message);
        self.persist_messages(log.messages());
    }

    fn persist_messages(&self, messages: &[Message]) {
        if let Err(e) = self.store.save_messages(messages) {
            tracing::warn!("Failed to persist conversation: {}", e);
        }
    }

    fn persist_session(&self, session_id: &str) {
        if let Err(e) = self.store.save_session(session_id) {
            tracing::warn!("Failed to persist session id: {}", e);
        }
    }

    fn lock_log(&self) -> MutexGuard<'_, ConversationLog> {
        self.log
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
