//! In-memory backend and drawing helpers shared by the TUI tests.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Mutex;

use anyhow::Result;
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::buffer::Buffer;
use sessionlens_api::{
    HealthResponse, Message, SearchHit, SearchQuery, SessionListQuery, SessionSummary,
};
use sessionlens_api_client::{ApiError, SessionBackend};
use sessionlens_core::testing::base_time;

use crate::app::App;
use crate::async_ops::execute;
use crate::ui;

#[derive(Default)]
pub struct FakeBackend {
    pub sessions: Vec<SessionSummary>,
    pub projects: Vec<String>,
    pub messages: HashMap<String, Vec<Message>>,
    pub hits: Vec<SearchHit>,
    pub synced: u64,
    pub has_updates: bool,
    pub fail_updates: bool,
    pub calls: Mutex<Vec<String>>,
}

impl FakeBackend {
    fn record(&self, call: &str) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call.to_string());
        }
    }

    pub fn call_log(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

impl SessionBackend for FakeBackend {
    async fn list_sessions(&self, query: &SessionListQuery) -> Result<Vec<SessionSummary>> {
        self.record("list_sessions");
        Ok(self
            .sessions
            .iter()
            .filter(|s| query.project.as_ref().is_none_or(|p| &s.project == p))
            .take(query.limit as usize)
            .cloned()
            .collect())
    }

    async fn list_projects(&self) -> Result<Vec<String>> {
        self.record("list_projects");
        Ok(self.projects.clone())
    }

    async fn fetch_messages(&self, session_id: &str) -> Result<Vec<Message>> {
        self.record("fetch_messages");
        match self.messages.get(session_id) {
            Some(messages) => Ok(messages.clone()),
            None => Err(ApiError::Status {
                status: 404,
                body: format!("no session {session_id}"),
            }
            .into()),
        }
    }

    async fn search(&self, _query: &SearchQuery) -> Result<Vec<SearchHit>> {
        self.record("search");
        Ok(self.hits.clone())
    }

    async fn trigger_sync(&self) -> Result<u64> {
        self.record("sync");
        Ok(self.synced)
    }

    async fn check_session_update(&self, _session_id: &str, _known_count: usize) -> Result<bool> {
        self.record("check_update");
        if self.fail_updates {
            anyhow::bail!("connection refused");
        }
        Ok(self.has_updates)
    }

    async fn health(&self) -> Result<HealthResponse> {
        self.record("health");
        Ok(HealthResponse {
            status: "ok".into(),
            version: "test".into(),
        })
    }
}

pub fn block_on<F: Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("runtime")
        .block_on(future)
}

pub fn summary(id: &str, project: &str) -> SessionSummary {
    SessionSummary {
        id: id.to_string(),
        project: project.to_string(),
        first_message: format!("first message of {id}"),
        message_count: 3,
        started_at: base_time(),
        agent: "claude-code".to_string(),
    }
}

/// Run queued commands against `backend` until the queue is empty.
pub fn drain(app: &mut App, backend: &FakeBackend) {
    while let Some(cmd) = app.pending_commands.pop_front() {
        let result = block_on(execute(cmd, backend));
        app.apply_command_result(result);
    }
}

pub fn buffer_to_string(buffer: &Buffer) -> String {
    let area = *buffer.area();
    let mut out = String::new();
    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            out.push_str(buffer[(x, y)].symbol());
        }
        out.push('\n');
    }
    out
}

/// Draw one full frame of `app` and return the screen text.
pub fn draw(app: &mut App, width: u16, height: u16) -> String {
    let backend = TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend).expect("terminal");
    terminal.draw(|frame| ui::render(frame, app)).expect("draw");
    buffer_to_string(terminal.backend().buffer())
}
