//! multimcp - Terminal client library for a Multi-MCP orchestration backend
//!
//! This library provides the stateful chat core (conversation log, session
//! ownership, single-flight query dispatch), the backend API client, local
//! history persistence, and the command handlers behind the `multimcp`
//! binary.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `chat`: Conversation log, session manager, dispatcher and controller
//! - `api`: Orchestrator API trait, HTTP client and an in-process fake
//! - `storage`: Persisted conversation and session id
//! - `display`: Terminal rendering of messages and registry tables
//! - `commands`: Handlers for the CLI subcommands
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use multimcp::api::HttpApiClient;
//! use multimcp::chat::{ChatController, ChatSettings, TerminalNotifier};
//! use multimcp::storage::SledStore;
//! use multimcp::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.yaml", &Default::default())?;
//!     config.validate()?;
//!
//!     let controller = ChatController::open(
//!         Arc::new(HttpApiClient::new(&config.api)?),
//!         Arc::new(SledStore::open(config.storage.resolve_path()?)?),
//!         Arc::new(TerminalNotifier),
//!         ChatSettings::from_config(&config.chat),
//!     );
//!     controller.submit("List all available Slack channels").await;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod chat;
pub mod cli;
pub mod commands;
pub mod config;
pub mod display;
pub mod error;
pub mod storage;

// Re-export commonly used types
pub use chat::{ChatController, Message, SubmitOutcome};
pub use config::Config;
pub use error::{MultiMcpError, Result};
