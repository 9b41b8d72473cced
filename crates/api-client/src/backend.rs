use std::future::Future;

use anyhow::Result;
use sessionlens_api::{
    HealthResponse, Message, SearchHit, SearchQuery, SessionListQuery, SessionSummary,
};

/// The session store as seen by the viewer.
///
/// Everything the viewer knows about sessions comes through these calls; the
/// transport behind them is an implementation detail ([`crate::ApiClient`] speaks
/// HTTP, tests use in-memory fakes).
pub trait SessionBackend {
    fn list_sessions(
        &self,
        query: &SessionListQuery,
    ) -> impl Future<Output = Result<Vec<SessionSummary>>>;

    fn list_projects(&self) -> impl Future<Output = Result<Vec<String>>>;

    /// Messages of one session in chronological order.
    fn fetch_messages(&self, session_id: &str) -> impl Future<Output = Result<Vec<Message>>>;

    fn search(&self, query: &SearchQuery) -> impl Future<Output = Result<Vec<SearchHit>>>;

    /// Ask the store to ingest new sessions; returns how many were synced.
    fn trigger_sync(&self) -> impl Future<Output = Result<u64>>;

    /// Whether the session gained content beyond `known_count` messages.
    fn check_session_update(
        &self,
        session_id: &str,
        known_count: usize,
    ) -> impl Future<Output = Result<bool>>;

    fn health(&self) -> impl Future<Output = Result<HealthResponse>>;
}
