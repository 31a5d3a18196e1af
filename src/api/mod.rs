//! Orchestration backend API
//!
//! [`OrchestratorApi`] is the seam between the chat core and the remote
//! service. [`HttpApiClient`] talks to a real backend over HTTP;
//! [`fake::FakeApi`] is a scripted in-process stand-in for tests.

use crate::error::Result;
use async_trait::async_trait;

pub mod fake;
pub mod http;
pub mod types;

pub use http::HttpApiClient;
pub use types::{
    parse_capabilities, AgentInfo, AgentListResponse, AgentSource, MessageResponse, NewAgent,
    QueryRequest, QueryResponse, ServerInfo, ServerKind, ServerListResponse, SessionResponse,
};

/// Operations offered by the orchestration backend
///
/// Errors carry a user-facing reason in their `Display` output; backend
/// rejections surface the `detail` field of the error body.
#[async_trait]
pub trait OrchestratorApi: Send + Sync {
    /// Run a natural-language query, optionally inside an existing session
    async fn process_query(&self, query: &str, session_id: Option<&str>) -> Result<QueryResponse>;

    /// Create a new backend session and return its id
    async fn create_session(&self) -> Result<String>;

    /// Drop the backend context of a session
    async fn clear_session(&self, session_id: &str) -> Result<()>;

    /// List registered MCP servers
    async fn list_servers(&self) -> Result<ServerListResponse>;

    /// List registered agents
    async fn list_agents(&self) -> Result<AgentListResponse>;

    /// Register a new agent
    async fn add_agent(&self, agent: &NewAgent) -> Result<MessageResponse>;

    /// Remove a database-defined agent
    async fn delete_agent(&self, name: &str) -> Result<MessageResponse>;
}
