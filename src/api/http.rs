//! HTTP client for the orchestration backend
//!
//! Wraps `reqwest` and normalizes every failure into a [`MultiMcpError`]
//! whose display text is the user-facing reason: the backend's `detail`
//! for rejected requests, a per-operation fallback when the error body is
//! unusable, or a network/timeout description when the request never
//! completed.

use crate::api::types::{
    AgentListResponse, MessageResponse, NewAgent, QueryRequest, QueryResponse,
    ServerListResponse, SessionResponse,
};
use crate::api::OrchestratorApi;
use crate::config::ApiConfig;
use crate::error::{MultiMcpError, Result};

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use url::Url;

/// Orchestration backend client over HTTP/JSON
///
/// # Examples
///
/// ```
/// use multimcp::api::HttpApiClient;
/// use multimcp::config::ApiConfig;
///
/// let client = HttpApiClient::new(&ApiConfig::default()).unwrap();
/// assert_eq!(client.base_url().as_str(), "http://localhost:8000/");
/// ```
#[derive(Debug, Clone)]
pub struct HttpApiClient {
    client: Client,
    base_url: Url,
    timeout_seconds: u64,
}

impl HttpApiClient {
    /// Create a client from the API configuration
    ///
    /// # Errors
    ///
    /// Returns `MultiMcpError::Config` if the base URL is invalid or the
    /// HTTP client cannot be built
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            MultiMcpError::Config(format!("Invalid api.base_url {}: {}", config.base_url, e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(MultiMcpError::Config(format!(
                "api.base_url cannot be used as a base: {}",
                config.base_url
            ))
            .into());
        }

        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("multimcp/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| MultiMcpError::Config(format!("Failed to create HTTP client: {}", e)))?;

        tracing::debug!(
            "Initialized orchestrator client: base_url={}, timeout={}s",
            base_url,
            config.timeout_seconds
        );

        Ok(Self {
            client,
            base_url,
            timeout_seconds: config.timeout_seconds,
        })
    }

    /// Base URL every endpoint is resolved against
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build an endpoint URL, percent-encoding each path segment
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                MultiMcpError::Config(format!("api.base_url cannot be a base: {}", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send(&self, request: RequestBuilder, fallback: &str) -> Result<Response> {
        let response = request.send().await.map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.bytes().await.unwrap_or_default();
        let detail = extract_detail(&body).unwrap_or_else(|| fallback.to_string());
        tracing::debug!(status = status.as_u16(), detail = %detail, "Backend rejected request");

        Err(MultiMcpError::Backend {
            status: status.as_u16(),
            detail,
        }
        .into())
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        fallback: &str,
    ) -> Result<T> {
        let response = self.send(request, fallback).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| self.decode_error(e).into())
    }

    fn transport_error(&self, error: reqwest::Error) -> anyhow::Error {
        if error.is_timeout() {
            MultiMcpError::Timeout {
                seconds: self.timeout_seconds,
            }
            .into()
        } else {
            MultiMcpError::Network(error.to_string()).into()
        }
    }

    fn decode_error(&self, error: reqwest::Error) -> MultiMcpError {
        if error.is_timeout() {
            MultiMcpError::Timeout {
                seconds: self.timeout_seconds,
            }
        } else {
            MultiMcpError::InvalidResponse(error.to_string())
        }
    }
}

/// Pull a usable `detail` reason out of an error body
///
/// String details are returned as-is; structured details (e.g. validation
/// error lists) are rendered as compact JSON. Empty or missing details and
/// unparseable bodies yield `None`.
pub(crate) fn extract_detail(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    match value.get("detail")? {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) if s.trim().is_empty() => None,
        serde_json::Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[async_trait]
impl OrchestratorApi for HttpApiClient {
    async fn process_query(&self, query: &str, session_id: Option<&str>) -> Result<QueryResponse> {
        let url = self.endpoint(&["query"])?;
        tracing::debug!(session = ?session_id, "POST {}", url);
        let request = self
            .client
            .post(url)
            .json(&QueryRequest { query, session_id });
        self.send_json(request, "Query failed").await
    }

    async fn create_session(&self) -> Result<String> {
        let url = self.endpoint(&["sessions"])?;
        tracing::debug!("POST {}", url);
        let response: SessionResponse = self
            .send_json(self.client.post(url), "Failed to create session")
            .await?;
        if response.session_id.trim().is_empty() {
            return Err(MultiMcpError::InvalidResponse(
                "backend returned an empty session id".to_string(),
            )
            .into());
        }
        Ok(response.session_id)
    }

    async fn clear_session(&self, session_id: &str) -> Result<()> {
        let url = self.endpoint(&["sessions", session_id])?;
        tracing::debug!("DELETE {}", url);
        self.send(self.client.delete(url), "Failed to clear session")
            .await?;
        Ok(())
    }

    async fn list_servers(&self) -> Result<ServerListResponse> {
        let url = self.endpoint(&["mcp-servers"])?;
        self.send_json(self.client.get(url), "Failed to fetch servers")
            .await
    }

    async fn list_agents(&self) -> Result<AgentListResponse> {
        let url = self.endpoint(&["agents"])?;
        self.send_json(self.client.get(url), "Failed to fetch agents")
            .await
    }

    async fn add_agent(&self, agent: &NewAgent) -> Result<MessageResponse> {
        let url = self.endpoint(&["agents"])?;
        tracing::debug!(agent = %agent.name, "POST {}", url);
        self.send_json(self.client.post(url).json(agent), "Failed to add agent")
            .await
    }

    async fn delete_agent(&self, name: &str) -> Result<MessageResponse> {
        let url = self.endpoint(&["agents", name])?;
        tracing::debug!("DELETE {}", url);
        let response = self
            .send(self.client.delete(url), "Failed to delete agent")
            .await?;
        // some backends answer 204 with no body
        let body = response.bytes().await.map_err(|e| self.decode_error(e))?;
        if body.is_empty() {
            return Ok(MessageResponse::default());
        }
        serde_json::from_slice(&body)
            .map_err(|e| MultiMcpError::InvalidResponse(e.to_string()).into())
    }
}
