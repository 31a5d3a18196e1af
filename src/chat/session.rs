//! Backend session ownership
//!
//! The [`SessionManager`] is the only holder of the current session id.
//! It adopts ids handed back by query responses, creates sessions on
//! demand, and rotates to a fresh session when a new conversation starts.

use crate::api::OrchestratorApi;
use crate::error::Result;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Result of [`SessionManager::adopt`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionChange {
    /// Nothing to adopt, or the same id is already held
    Unchanged,
    /// No id was held; the returned one is now current
    Adopted,
    /// A different id was held and has been replaced
    Replaced { previous: String },
}

impl SessionChange {
    pub fn is_changed(&self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

/// Owner of the current backend session id
pub struct SessionManager {
    api: Arc<dyn OrchestratorApi>,
    current: RwLock<Option<String>>,
}

fn non_empty(id: Option<String>) -> Option<String> {
    id.filter(|id| !id.trim().is_empty())
}

impl SessionManager {
    /// Create a manager holding `initial` (empty ids count as absent)
    pub fn new(api: Arc<dyn OrchestratorApi>, initial: Option<String>) -> Self {
        Self {
            api,
            current: RwLock::new(non_empty(initial)),
        }
    }

    /// Currently held session id
    pub fn session_id(&self) -> Option<String> {
        self.read().clone()
    }

    /// Take on the id returned by a query response
    ///
    /// The most recent non-empty id always wins; replacing a held id is
    /// logged since it means the backend dropped the old session.
    pub fn adopt(&self, returned: &str) -> SessionChange {
        if returned.trim().is_empty() {
            return SessionChange::Unchanged;
        }

        let mut current = self.write();
        match current.as_deref() {
            Some(held) if held == returned => SessionChange::Unchanged,
            Some(held) => {
                let previous = held.to_string();
                tracing::warn!(
                    previous = %previous,
                    returned = %returned,
                    "Backend returned a different session id, switching"
                );
                *current = Some(returned.to_string());
                SessionChange::Replaced { previous }
            }
            None => {
                tracing::debug!(session = %returned, "Adopted session id from response");
                *current = Some(returned.to_string());
                SessionChange::Adopted
            }
        }
    }

    /// Make sure a session id is held, creating one if needed
    ///
    /// Returns the held id and whether it was newly created.
    ///
    /// # Errors
    ///
    /// Returns the backend error if `POST /sessions` fails
    pub async fn ensure_session(&self) -> Result<(String, bool)> {
        if let Some(id) = self.session_id() {
            return Ok((id, false));
        }

        let created = self.api.create_session().await?;
        let mut current = self.write();
        if let Some(id) = current.as_ref() {
            // adopted from a response while the create was in flight
            return Ok((id.clone(), false));
        }
        tracing::info!(session = %created, "Created session");
        *current = Some(created.clone());
        Ok((created, true))
    }

    /// Clear the held session (best effort) and create a new one
    ///
    /// The held id only changes when the create succeeds; the caller is
    /// expected to reset the conversation log in the same step.
    ///
    /// # Errors
    ///
    /// Returns the backend error if `POST /sessions` fails. A failing
    /// `DELETE /sessions/{id}` is logged and ignored.
    pub async fn start_new_conversation(&self) -> Result<String> {
        if let Some(old) = self.session_id() {
            if let Err(e) = self.api.clear_session(&old).await {
                tracing::warn!(session = %old, "Failed to clear session: {}", e);
            }
        }

        let created = self.api.create_session().await?;
        *self.write() = Some(created.clone());
        tracing::info!(session = %created, "Started new session");
        Ok(created)
    }

    fn read(&self) -> RwLockReadGuard<'_, Option<String>> {
        self.current
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Option<String>> {
        self.current
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
