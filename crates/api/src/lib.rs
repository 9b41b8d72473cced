//! Shared API types for the sessionlens backend.
//!
//! This crate is the single source of truth for request/response shapes the
//! viewer exchanges with the session store. Transport lives in
//! `sessionlens-api-client`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod highlight;

// Re-export core types for convenience
pub use sessionlens_core::{Message, MessageId, Role};

// ─── Sessions ────────────────────────────────────────────────────────────────

/// One row of the session list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub id: String,
    #[serde(default)]
    pub project: String,
    #[serde(default)]
    pub first_message: String,
    #[serde(default)]
    pub message_count: u64,
    pub started_at: DateTime<Utc>,
    #[serde(default)]
    pub agent: String,
}

/// Query parameters for `GET /api/sessions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionListQuery {
    #[serde(default = "default_session_limit")]
    pub limit: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
}

impl Default for SessionListQuery {
    fn default() -> Self {
        Self {
            limit: default_session_limit(),
            project: None,
        }
    }
}

fn default_session_limit() -> u32 {
    200
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionListResponse {
    pub sessions: Vec<SessionSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectListResponse {
    pub projects: Vec<String>,
}

/// Response of `GET /api/sessions/:id/messages`, in chronological order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageListResponse {
    pub session_id: String,
    pub messages: Vec<Message>,
}

// ─── Search ──────────────────────────────────────────────────────────────────

/// Query parameters for `GET /api/search`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub q: String,
    #[serde(default = "default_search_limit")]
    pub limit: u32,
}

impl SearchQuery {
    pub fn new(q: impl Into<String>, limit: u32) -> Self {
        Self {
            q: q.into(),
            limit,
        }
    }
}

fn default_search_limit() -> u32 {
    50
}

/// A ranked full-text search hit. `snippet` carries `<mark>` highlight markup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub session_id: String,
    pub msg_id: MessageId,
    #[serde(default)]
    pub project: String,
    pub role: Role,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub snippet: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<SearchHit>,
}

// ─── Sync / Updates ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncResponse {
    pub synced: u64,
}

/// Response of `GET /api/sessions/:id/updates`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUpdateResponse {
    pub has_updates: bool,
    #[serde(default)]
    pub message_count: Option<u64>,
}

// ─── Health ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_summary_tolerates_missing_optional_fields() {
        let raw = r#"{"id":"s1","started_at":"2025-03-01T10:00:00Z"}"#;
        let summary: SessionSummary = serde_json::from_str(raw).unwrap();
        assert_eq!(summary.id, "s1");
        assert_eq!(summary.message_count, 0);
        assert!(summary.project.is_empty());
    }

    #[test]
    fn session_list_query_skips_absent_project() {
        let json = serde_json::to_value(SessionListQuery::default()).unwrap();
        assert_eq!(json, serde_json::json!({ "limit": 200 }));
    }

    #[test]
    fn search_hit_parses_role_and_id() {
        let raw = r#"{
            "session_id": "s1",
            "msg_id": "m7",
            "project": "web",
            "role": "assistant",
            "content": "full text",
            "snippet": "the <mark>cache</mark> was stale"
        }"#;
        let hit: SearchHit = serde_json::from_str(raw).unwrap();
        assert_eq!(hit.msg_id.as_str(), "m7");
        assert_eq!(hit.role, Role::Agent);
    }
}
