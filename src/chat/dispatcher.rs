//! Single-flight query dispatch
//!
//! The dispatcher is a two-state machine, `Idle -> AwaitingResponse -> Idle`,
//! guarded by an atomic flag. Acquiring the gate yields an [`InFlight`]
//! guard; a second acquisition while the guard is alive fails instead of
//! queueing. The guard also owns the progress rotation, so releasing it
//! stops the rotation and returns the dispatcher to idle in one place.

use crate::api::OrchestratorApi;
use crate::chat::message::Message;
use crate::chat::notify::Notification;
use crate::chat::progress::{ProgressSettings, ProgressTicker};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;

/// Observable dispatcher state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchState {
    Idle,
    AwaitingResponse,
}

/// Outcome of one query round trip, ready to be applied to the log
#[derive(Debug, Clone)]
pub struct Settlement {
    /// Assistant entry to append
    pub message: Message,
    /// Notification to show once the entry is appended
    pub notification: Notification,
    /// Non-empty session id returned by the backend, if any
    pub session_id: Option<String>,
}

impl Settlement {
    pub fn is_success(&self) -> bool {
        self.message.result.is_some()
    }
}

/// Gate and progress publisher for query submissions
#[derive(Debug)]
pub struct QueryDispatcher {
    busy: AtomicBool,
    progress: ProgressSettings,
    progress_tx: Arc<watch::Sender<Option<String>>>,
}

impl QueryDispatcher {
    pub fn new(progress: ProgressSettings) -> Self {
        let (tx, _rx) = watch::channel(None);
        Self {
            busy: AtomicBool::new(false),
            progress,
            progress_tx: Arc::new(tx),
        }
    }

    pub fn state(&self) -> DispatchState {
        if self.busy.load(Ordering::Acquire) {
            DispatchState::AwaitingResponse
        } else {
            DispatchState::Idle
        }
    }

    /// Receiver for the current progress step (`None` when idle)
    pub fn progress(&self) -> watch::Receiver<Option<String>> {
        self.progress_tx.subscribe()
    }

    /// Take the gate, or `None` if something is already in flight
    pub fn try_begin(&self) -> Option<InFlight<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlight {
                dispatcher: self,
                ticker: None,
            })
    }
}

/// Proof that the dispatcher gate is held
///
/// Dropping it stops any progress rotation and then reopens the gate.
#[derive(Debug)]
pub struct InFlight<'a> {
    dispatcher: &'a QueryDispatcher,
    ticker: Option<ProgressTicker>,
}

impl InFlight<'_> {
    /// Send `query` to the backend and turn the outcome into a [`Settlement`]
    ///
    /// Starts the progress rotation before the request; it keeps running
    /// until this guard is dropped.
    pub async fn run_query(
        &mut self,
        api: &dyn OrchestratorApi,
        query: &str,
        session_id: Option<&str>,
    ) -> Settlement {
        self.ticker = Some(ProgressTicker::start(
            &self.dispatcher.progress,
            Arc::clone(&self.dispatcher.progress_tx),
        ));

        let started = Instant::now();
        tracing::debug!(session = ?session_id, "Dispatching query");

        match api.process_query(query, session_id).await {
            Ok(response) => {
                let elapsed = started.elapsed().as_secs_f64();
                tracing::info!(
                    elapsed = elapsed,
                    agents = ?response.agents_used,
                    "Query completed"
                );
                let session_id = Some(response.session_id.clone()).filter(|s| !s.trim().is_empty());
                Settlement {
                    message: Message::assistant_reply(response, elapsed),
                    notification: Notification::success(
                        "Query executed successfully!",
                        format!("Completed in {:.2}s", elapsed),
                    ),
                    session_id,
                }
            }
            Err(e) => {
                let reason = e.to_string();
                tracing::warn!("Query failed: {}", reason);
                Settlement {
                    message: Message::assistant_error(&reason),
                    notification: Notification::error("Failed to process query", reason),
                    session_id: None,
                }
            }
        }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.ticker.take();
        self.dispatcher.busy.store(false, Ordering::Release);
    }
}
