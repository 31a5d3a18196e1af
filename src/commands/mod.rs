/*!
Command handlers for the CLI

This module provides the handlers invoked by the CLI entrypoint:

- `chat`     - Interactive chat
- `query`    - One-shot query through the same chat core
- `session`  - Session rotation and inspection
- `history`  - Persisted conversation inspection
- `registry` - MCP server and agent registries

The handlers stay thin: they wire configuration into the chat core and
the API client, then render results.
*/

use crate::api::{HttpApiClient, OrchestratorApi};
use crate::chat::{ChatController, ChatSettings, Notifier, TerminalNotifier};
use crate::config::Config;
use crate::error::Result;
use crate::storage::{HistoryStore, SledStore};
use colored::Colorize;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::watch;

pub mod chat;
pub mod history;
pub mod query;
pub mod registry;
pub mod session;
pub mod special_commands;

/// Build the HTTP client for the configured backend
pub fn build_api(config: &Config) -> Result<Arc<dyn OrchestratorApi>> {
    Ok(Arc::new(HttpApiClient::new(&config.api)?))
}

/// Open the on-disk history store
pub fn open_store(config: &Config) -> Result<Arc<dyn HistoryStore>> {
    let path = config.storage.resolve_path()?;
    Ok(Arc::new(SledStore::open(path)?))
}

/// Assemble a chat controller over the persisted state without contacting
/// the backend
pub fn build_controller(config: &Config) -> Result<ChatController> {
    let notifier: Arc<dyn Notifier> = Arc::new(TerminalNotifier);
    Ok(ChatController::open(
        build_api(config)?,
        open_store(config)?,
        notifier,
        ChatSettings::from_config(&config.chat),
    ))
}

/// Assemble a chat controller for the terminal front ends
///
/// Creates a session up front when `chat.eager_session` is set; a failure
/// there is reported and the controller falls back to adopting the session
/// from the first query response.
pub async fn open_controller(config: &Config) -> Result<ChatController> {
    let controller = build_controller(config)?;

    if config.chat.eager_session {
        if let Err(e) = controller.ensure_session().await {
            tracing::warn!("Could not create session at startup: {}", e);
            eprintln!("{} {}", "Could not create session:".yellow(), e);
        }
    }

    Ok(controller)
}

/// Drive `work` to completion while echoing progress steps to stderr
pub async fn with_progress<F: Future>(
    mut progress: watch::Receiver<Option<String>>,
    work: F,
) -> F::Output {
    tokio::pin!(work);
    let mut last: Option<String> = None;
    loop {
        tokio::select! {
            output = &mut work => return output,
            changed = progress.changed() => {
                if changed.is_err() {
                    return work.await;
                }
                let step = progress.borrow_and_update().clone();
                if let Some(step) = step {
                    if last.as_deref() != Some(step.as_str()) {
                        eprintln!("{}", format!("⏳ {}", step).dimmed());
                    }
                    last = Some(step);
                }
            }
        }
    }
}
