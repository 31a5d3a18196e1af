//! In-process fake backend for unit and integration tests
//!
//! [`FakeApi`] implements [`OrchestratorApi`] from scripted replies and
//! records every call it receives, so the chat core can be driven without
//! a network.
//!
//! # Holding a query in flight
//!
//! [`FakeApi::hold_queries`] installs a semaphore gate with zero permits.
//! `process_query` records the call first and then waits for a permit, so a
//! test can observe the in-flight state and release it with
//! `gate.add_permits(1)`.
//!
//! # Example
//!
//! ```
//! use multimcp::api::fake::{ApiCall, FakeApi};
//! use multimcp::api::OrchestratorApi;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let api = FakeApi::new();
//! api.push_query_reply(FakeApi::reply("Posted.", "s1"));
//!
//! let response = api.process_query("Post hello", None).await.unwrap();
//! assert_eq!(response.session_id, "s1");
//! assert_eq!(
//!     api.calls(),
//!     vec![ApiCall::Query { query: "Post hello".to_string(), session_id: None }]
//! );
//! # }
//! ```

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::Semaphore;

use crate::api::types::{
    AgentInfo, AgentListResponse, AgentSource, MessageResponse, NewAgent, QueryResponse,
    ServerListResponse,
};
use crate::api::OrchestratorApi;
use crate::error::{MultiMcpError, Result};

/// A call observed by [`FakeApi`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    Query {
        query: String,
        session_id: Option<String>,
    },
    CreateSession,
    ClearSession(String),
    ListServers,
    ListAgents,
    AddAgent(String),
    DeleteAgent(String),
}

/// Scripted [`OrchestratorApi`] implementation
#[derive(Debug, Default)]
pub struct FakeApi {
    query_replies: Mutex<VecDeque<std::result::Result<QueryResponse, String>>>,
    session_replies: Mutex<VecDeque<std::result::Result<String, String>>>,
    clear_failure: Mutex<Option<String>>,
    servers: Mutex<ServerListResponse>,
    agents: Mutex<AgentListResponse>,
    calls: Mutex<Vec<ApiCall>>,
    gate: Mutex<Option<Arc<Semaphore>>>,
    session_counter: AtomicUsize,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn backend_error(detail: &str) -> anyhow::Error {
    MultiMcpError::Backend {
        status: 500,
        detail: detail.to_string(),
    }
    .into()
}

impl FakeApi {
    /// Create a fake with no scripted replies
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a minimal successful query payload
    pub fn reply(result: &str, session_id: &str) -> QueryResponse {
        QueryResponse {
            result: result.to_string(),
            agents_used: Vec::new(),
            plan: Value::Null,
            session_id: session_id.to_string(),
            extracted_data: None,
            extra: Map::new(),
        }
    }

    /// Queue a successful `process_query` reply
    pub fn push_query_reply(&self, response: QueryResponse) {
        lock(&self.query_replies).push_back(Ok(response));
    }

    /// Queue a `process_query` rejection carrying `detail`
    pub fn push_query_failure(&self, detail: &str) {
        lock(&self.query_replies).push_back(Err(detail.to_string()));
    }

    /// Queue the id returned by the next `create_session`
    pub fn push_session(&self, session_id: &str) {
        lock(&self.session_replies).push_back(Ok(session_id.to_string()));
    }

    /// Make the next `create_session` fail with `detail`
    pub fn push_session_failure(&self, detail: &str) {
        lock(&self.session_replies).push_back(Err(detail.to_string()));
    }

    /// Make every `clear_session` fail with `detail`
    pub fn fail_clear_session(&self, detail: &str) {
        *lock(&self.clear_failure) = Some(detail.to_string());
    }

    /// Replace the server listing
    pub fn set_servers(&self, servers: ServerListResponse) {
        *lock(&self.servers) = servers;
    }

    /// Register an agent in the fake registry
    pub fn insert_agent(&self, agent: AgentInfo) {
        let mut agents = lock(&self.agents);
        if !agents.agents.contains(&agent.name) {
            agents.agents.push(agent.name.clone());
        }
        agents.details.insert(agent.name.clone(), agent);
    }

    /// Hold every `process_query` until permits are added to the returned gate
    pub fn hold_queries(&self) -> Arc<Semaphore> {
        let gate = Arc::new(Semaphore::new(0));
        *lock(&self.gate) = Some(Arc::clone(&gate));
        gate
    }

    /// Every call received so far, in order
    pub fn calls(&self) -> Vec<ApiCall> {
        lock(&self.calls).clone()
    }

    /// Number of `process_query` calls received so far
    pub fn query_count(&self) -> usize {
        lock(&self.calls)
            .iter()
            .filter(|c| matches!(c, ApiCall::Query { .. }))
            .count()
    }

    fn record(&self, call: ApiCall) {
        lock(&self.calls).push(call);
    }
}

#[async_trait]
impl OrchestratorApi for FakeApi {
    async fn process_query(&self, query: &str, session_id: Option<&str>) -> Result<QueryResponse> {
        self.record(ApiCall::Query {
            query: query.to_string(),
            session_id: session_id.map(str::to_string),
        });

        let gate = lock(&self.gate).clone();
        if let Some(gate) = gate {
            let permit = gate
                .acquire()
                .await
                .map_err(|_| MultiMcpError::Network("fake gate closed".to_string()))?;
            permit.forget();
        }

        match lock(&self.query_replies).pop_front() {
            Some(Ok(response)) => Ok(response),
            Some(Err(detail)) => Err(backend_error(&detail)),
            None => Err(backend_error("no scripted reply")),
        }
    }

    async fn create_session(&self) -> Result<String> {
        self.record(ApiCall::CreateSession);
        match lock(&self.session_replies).pop_front() {
            Some(Ok(id)) => Ok(id),
            Some(Err(detail)) => Err(backend_error(&detail)),
            None => {
                let n = self.session_counter.fetch_add(1, Ordering::SeqCst) + 1;
                Ok(format!("session-{}", n))
            }
        }
    }

    async fn clear_session(&self, session_id: &str) -> Result<()> {
        self.record(ApiCall::ClearSession(session_id.to_string()));
        match lock(&self.clear_failure).as_deref() {
            Some(detail) => Err(backend_error(detail)),
            None => Ok(()),
        }
    }

    async fn list_servers(&self) -> Result<ServerListResponse> {
        self.record(ApiCall::ListServers);
        Ok(lock(&self.servers).clone())
    }

    async fn list_agents(&self) -> Result<AgentListResponse> {
        self.record(ApiCall::ListAgents);
        Ok(lock(&self.agents).clone())
    }

    async fn add_agent(&self, agent: &NewAgent) -> Result<MessageResponse> {
        self.record(ApiCall::AddAgent(agent.name.clone()));
        if lock(&self.agents).details.contains_key(&agent.name) {
            return Err(backend_error(&format!("Agent {} already exists", agent.name)));
        }
        self.insert_agent(AgentInfo {
            name: agent.name.clone(),
            display_name: agent.display_name.clone(),
            description: agent.description.clone(),
            capabilities: agent.capabilities.clone(),
            requires_mcp: agent.requires_mcp,
            mcp_server: agent.mcp_server.clone(),
            source: AgentSource::Database,
            instructions: Some(agent.instructions.clone()),
        });
        Ok(MessageResponse {
            message: format!("Agent {} added", agent.name),
        })
    }

    async fn delete_agent(&self, name: &str) -> Result<MessageResponse> {
        self.record(ApiCall::DeleteAgent(name.to_string()));
        let mut agents = lock(&self.agents);
        if agents.details.remove(name).is_none() {
            return Err(backend_error(&format!("Agent {} not found", name)));
        }
        agents.agents.retain(|n| n != name);
        Ok(MessageResponse {
            message: format!("Agent {} deleted", name),
        })
    }
}
