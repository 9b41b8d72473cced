use std::time::Duration;

use anyhow::Result;
use tracing::debug;

use sessionlens_api::*;

use crate::backend::SessionBackend;
use crate::error::ApiError;
use crate::retry::{RetryConfig, retry_get};

/// Typed HTTP client for the sessionlens backend.
///
/// GET endpoints are idempotent and go through [`retry_get`]; `POST /sync`
/// is sent once.
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    auth_token: Option<String>,
    retry: RetryConfig,
}

impl ApiClient {
    /// Create a new client with the given base URL and timeout.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    /// Create from an existing `reqwest::Client` (e.g. shared in tests).
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_token: None,
            retry: RetryConfig::default(),
        }
    }

    pub fn set_auth(&mut self, token: String) {
        self.auth_token = Some(token).filter(|t| !t.trim().is_empty());
    }

    pub fn set_retry(&mut self, retry: RetryConfig) {
        self.retry = retry;
    }

    pub fn auth_token(&self) -> Option<&str> {
        self.auth_token.as_deref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        debug!("GET {url}");
        let resp = retry_get(&self.client, url, self.auth_token(), &self.retry).await?;
        parse_response(resp).await
    }

    // ── Health ────────────────────────────────────────────────────────────

    pub async fn get_health(&self) -> Result<HealthResponse> {
        self.get_json(&self.url("/health")).await
    }

    // ── Sessions ──────────────────────────────────────────────────────────

    pub async fn get_sessions(&self, query: &SessionListQuery) -> Result<SessionListResponse> {
        let mut params = vec![format!("limit={}", query.limit)];
        if let Some(ref project) = query.project {
            params.push(format!("project={}", urlencoding::encode(project)));
        }
        let url = format!("{}?{}", self.url("/sessions"), params.join("&"));
        self.get_json(&url).await
    }

    pub async fn get_projects(&self) -> Result<ProjectListResponse> {
        self.get_json(&self.url("/projects")).await
    }

    pub async fn get_messages(&self, session_id: &str) -> Result<MessageListResponse> {
        let path = format!("/sessions/{}/messages", urlencoding::encode(session_id));
        self.get_json(&self.url(&path)).await
    }

    pub async fn get_session_updates(
        &self,
        session_id: &str,
        known_count: usize,
    ) -> Result<SessionUpdateResponse> {
        let path = format!(
            "/sessions/{}/updates?known={known_count}",
            urlencoding::encode(session_id)
        );
        self.get_json(&self.url(&path)).await
    }

    // ── Search ────────────────────────────────────────────────────────────

    pub async fn get_search(&self, query: &SearchQuery) -> Result<SearchResponse> {
        let url = format!(
            "{}?q={}&limit={}",
            self.url("/search"),
            urlencoding::encode(&query.q),
            query.limit
        );
        self.get_json(&url).await
    }

    // ── Sync ──────────────────────────────────────────────────────────────

    pub async fn post_sync(&self) -> Result<SyncResponse> {
        let mut req = self.client.post(self.url("/sync"));
        if let Some(token) = self.auth_token() {
            req = req.bearer_auth(token);
        }
        let resp = req.send().await?;
        parse_response(resp).await
    }
}

impl SessionBackend for ApiClient {
    async fn list_sessions(&self, query: &SessionListQuery) -> Result<Vec<SessionSummary>> {
        Ok(self.get_sessions(query).await?.sessions)
    }

    async fn list_projects(&self) -> Result<Vec<String>> {
        let mut projects = self.get_projects().await?.projects;
        projects.sort();
        projects.dedup();
        Ok(projects)
    }

    async fn fetch_messages(&self, session_id: &str) -> Result<Vec<Message>> {
        Ok(self.get_messages(session_id).await?.messages)
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchHit>> {
        Ok(self.get_search(query).await?.results)
    }

    async fn trigger_sync(&self) -> Result<u64> {
        Ok(self.post_sync().await?.synced)
    }

    async fn check_session_update(&self, session_id: &str, known_count: usize) -> Result<bool> {
        let resp = self.get_session_updates(session_id, known_count).await?;
        Ok(resp.has_updates
            || resp
                .message_count
                .is_some_and(|count| count > known_count as u64))
    }

    async fn health(&self) -> Result<HealthResponse> {
        self.get_health().await
    }
}

/// Parse an HTTP response: return the deserialized body on 2xx,
/// or an [`ApiError::Status`] containing the status and body text.
async fn parse_response<T: serde::de::DeserializeOwned>(resp: reqwest::Response) -> Result<T> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(ApiError::Status {
            status: status.as_u16(),
            body,
        }
        .into());
    }
    Ok(resp.json().await?)
}
