//! Wire types for the orchestration backend
//!
//! The backend contract is only partially pinned down by this client, so
//! payloads keep unknown fields in a flattened map and treat `plan` and
//! `extracted_data` as opaque JSON.

use crate::error::{MultiMcpError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Body of `POST /query`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryRequest<'a> {
    /// Natural-language query
    pub query: &'a str,
    /// Current session id, omitted when none is held
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<&'a str>,
}

/// Successful `POST /query` payload
///
/// Stored verbatim as the structured result of assistant messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    /// Natural-language summary produced by the orchestrator
    pub result: String,
    /// Agents invoked while answering
    #[serde(default)]
    pub agents_used: Vec<String>,
    /// Execution plan (opaque)
    #[serde(default)]
    pub plan: Value,
    /// Session the query ran in
    #[serde(default)]
    pub session_id: String,
    /// Structured data pulled out of tool results (opaque)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracted_data: Option<Value>,
    /// Fields this client does not interpret
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl QueryResponse {
    /// Whether the payload reports an execution error
    pub fn has_error(&self) -> bool {
        self.extra.get("error").is_some_and(|e| !e.is_null())
    }
}

/// `POST /sessions` payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionResponse {
    /// Newly created session id
    pub session_id: String,
}

/// Generic `{message}` acknowledgement from registry mutations
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Human-readable confirmation
    #[serde(default)]
    pub message: String,
}

/// How an MCP server is reached by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerKind {
    /// Spawned as a local command
    Command,
    /// Reached over HTTP
    Http,
    /// Reported kind this client does not know
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for ServerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Command => write!(f, "command"),
            Self::Http => write!(f, "http"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Registry entry for one MCP server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ServerKind,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tools_count: u32,
    #[serde(default)]
    pub status: String,
}

/// `GET /mcp-servers` payload
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ServerListResponse {
    /// Server names in backend order
    #[serde(default)]
    pub servers: Vec<String>,
    /// Details keyed by server name
    #[serde(default)]
    pub details: BTreeMap<String, ServerInfo>,
}

impl ServerListResponse {
    /// Server details ordered by the `servers` list
    ///
    /// Entries present in `details` but missing from `servers` follow in
    /// name order.
    pub fn ordered(&self) -> Vec<ServerInfo> {
        ordered_details(&self.servers, &self.details)
    }
}

/// Where an agent definition lives on the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentSource {
    /// Built into the backend code, cannot be removed
    Code,
    /// Stored in the backend database, removable
    Database,
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for AgentSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Code => write!(f, "code"),
            Self::Database => write!(f, "database"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Registry entry for one agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentInfo {
    pub name: String,
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub capabilities: Vec<String>,
    #[serde(default)]
    pub requires_mcp: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mcp_server: Option<String>,
    pub source: AgentSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

impl AgentInfo {
    /// Only database-defined agents can be deleted
    pub fn is_removable(&self) -> bool {
        self.source == AgentSource::Database
    }
}

/// `GET /agents` payload
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AgentListResponse {
    /// Agent names in backend order
    #[serde(default)]
    pub agents: Vec<String>,
    /// Details keyed by agent name
    #[serde(default)]
    pub details: BTreeMap<String, AgentInfo>,
}

impl AgentListResponse {
    /// Agent details ordered by the `agents` list
    pub fn ordered(&self) -> Vec<AgentInfo> {
        ordered_details(&self.agents, &self.details)
    }
}

fn ordered_details<T: Clone>(names: &[String], details: &BTreeMap<String, T>) -> Vec<T> {
    let mut ordered: Vec<T> = names
        .iter()
        .filter_map(|name| details.get(name).cloned())
        .collect();
    ordered.extend(
        details
            .iter()
            .filter(|(name, _)| !names.contains(name))
            .map(|(_, info)| info.clone()),
    );
    ordered
}

/// Body of `POST /agents`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAgent {
    pub name: String,
    pub display_name: String,
    pub description: String,
    pub instructions: String,
    pub capabilities: Vec<String>,
    pub requires_mcp: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mcp_server: Option<String>,
}

impl NewAgent {
    /// Check the registration form before it is sent
    ///
    /// Every text field must be non-blank and at least one capability is
    /// required. `mcp_server` is dropped unless `requires_mcp` is set.
    ///
    /// # Errors
    ///
    /// Returns `MultiMcpError::InvalidInput` naming the first offending field
    pub fn validated(mut self) -> Result<Self> {
        let fields = [
            ("name", &self.name),
            ("display_name", &self.display_name),
            ("description", &self.description),
            ("instructions", &self.instructions),
        ];
        for (field, value) in fields {
            if value.trim().is_empty() {
                return Err(MultiMcpError::InvalidInput(format!("{} is required", field)).into());
            }
        }

        if self.capabilities.is_empty() {
            return Err(MultiMcpError::InvalidInput(
                "at least one capability is required".to_string(),
            )
            .into());
        }

        if !self.requires_mcp {
            self.mcp_server = None;
        } else if self.mcp_server.as_deref().map_or(false, |s| s.trim().is_empty()) {
            self.mcp_server = None;
        }

        Ok(self)
    }
}

/// Split a comma-separated capability list, dropping blanks
///
/// # Examples
///
/// ```
/// use multimcp::api::parse_capabilities;
///
/// assert_eq!(parse_capabilities(" post, ,read "), vec!["post", "read"]);
/// ```
pub fn parse_capabilities(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_query_request_omits_absent_session() {
        let body = serde_json::to_value(QueryRequest {
            query: "hi",
            session_id: None,
        })
        .unwrap();
        assert_eq!(body, json!({"query": "hi"}));

        let body = serde_json::to_value(QueryRequest {
            query: "hi",
            session_id: Some("s1"),
        })
        .unwrap();
        assert_eq!(body, json!({"query": "hi", "session_id": "s1"}));
    }

    #[test]
    fn test_query_response_keeps_unknown_fields() {
        let response: QueryResponse = serde_json::from_value(json!({
            "result": "Posted.",
            "agents_used": ["slack_agent"],
            "plan": {"steps": 1},
            "session_id": "s1",
            "trace_id": "abc"
        }))
        .unwrap();
        assert_eq!(response.result, "Posted.");
        assert_eq!(response.agents_used, vec!["slack_agent".to_string()]);
        assert_eq!(response.plan, json!({"steps": 1}));
        assert_eq!(response.extracted_data, None);
        assert_eq!(response.extra.get("trace_id"), Some(&json!("abc")));
        assert!(!response.has_error());

        let round_trip = serde_json::to_value(&response).unwrap();
        assert_eq!(round_trip["trace_id"], json!("abc"));
    }

    #[test]
    fn test_query_response_minimal_payload() {
        let response: QueryResponse = serde_json::from_value(json!({"result": "ok"})).unwrap();
        assert!(response.agents_used.is_empty());
        assert!(response.plan.is_null());
        assert!(response.session_id.is_empty());
    }

    #[test]
    fn test_query_response_error_flag() {
        let response: QueryResponse =
            serde_json::from_value(json!({"result": "partial", "error": "tool crashed"})).unwrap();
        assert!(response.has_error());
    }

    #[test]
    fn test_server_list_ordered_follows_name_list() {
        let response: ServerListResponse = serde_json::from_value(json!({
            "servers": ["slack", "hubspot"],
            "details": {
                "hubspot": {"name": "hubspot", "type": "http", "description": "", "tools_count": 12, "status": "connected"},
                "slack": {"name": "slack", "type": "command", "description": "Slack", "tools_count": 8, "status": "connected"},
                "jira": {"name": "jira", "type": "sse", "description": "", "tools_count": 0, "status": "down"}
            }
        }))
        .unwrap();

        let names: Vec<String> = response.ordered().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["slack", "hubspot", "jira"]);
        assert_eq!(response.details["jira"].kind, ServerKind::Unknown);
        assert_eq!(response.details["slack"].kind.to_string(), "command");
    }

    #[test]
    fn test_agent_removable_only_from_database() {
        let response: AgentListResponse = serde_json::from_value(json!({
            "agents": ["slack_agent", "custom"],
            "details": {
                "slack_agent": {"name": "slack_agent", "display_name": "Slack Agent", "description": "", "capabilities": ["post"], "requires_mcp": true, "mcp_server": "slack", "source": "code"},
                "custom": {"name": "custom", "display_name": "Custom", "description": "", "capabilities": [], "requires_mcp": false, "source": "database", "instructions": "Be nice"}
            }
        }))
        .unwrap();
        let agents = response.ordered();
        assert!(!agents[0].is_removable());
        assert!(agents[1].is_removable());
        assert_eq!(agents[1].instructions.as_deref(), Some("Be nice"));
    }

    #[test]
    fn test_new_agent_omits_absent_mcp_server() {
        let agent = NewAgent {
            name: "a".to_string(),
            display_name: "A".to_string(),
            description: "d".to_string(),
            instructions: "i".to_string(),
            capabilities: vec!["x".to_string()],
            requires_mcp: false,
            mcp_server: None,
        };
        let body = serde_json::to_value(&agent).unwrap();
        assert!(body.get("mcp_server").is_none());
    }

    #[test]
    fn test_parse_capabilities() {
        assert_eq!(parse_capabilities("a, b ,c"), vec!["a", "b", "c"]);
        assert!(parse_capabilities(" , ,").is_empty());
    }

    fn form() -> NewAgent {
        NewAgent {
            name: "notion_agent".to_string(),
            display_name: "Notion Agent".to_string(),
            description: "Reads pages".to_string(),
            instructions: "Be brief".to_string(),
            capabilities: parse_capabilities("read,search"),
            requires_mcp: false,
            mcp_server: Some("notion".to_string()),
        }
    }

    #[test]
    fn test_validated_drops_server_without_requires_mcp() {
        let agent = form().validated().unwrap();
        assert_eq!(agent.mcp_server, None);

        let mut with_mcp = form();
        with_mcp.requires_mcp = true;
        assert_eq!(
            with_mcp.validated().unwrap().mcp_server.as_deref(),
            Some("notion")
        );
    }

    #[test]
    fn test_validated_rejects_blank_fields() {
        let mut agent = form();
        agent.display_name = "  ".to_string();
        let err = agent.validated().unwrap_err();
        assert!(err.to_string().contains("display_name"));

        let mut agent = form();
        agent.capabilities.clear();
        assert!(agent.validated().is_err());
    }
}
