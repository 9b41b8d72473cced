use sessionlens_api::{HealthResponse, Message, SearchHit, SearchQuery, SessionListQuery, SessionSummary};
use sessionlens_api_client::{ApiError, SessionBackend};

/// Commands that require async I/O (backend calls).
#[derive(Debug, Clone, PartialEq)]
pub enum AsyncCommand {
    CheckHealth,
    FetchSessions(SessionListQuery),
    FetchProjects,
    FetchMessages {
        session_id: String,
    },
    Search(SearchQuery),
    Sync,
    CheckUpdate {
        session_id: String,
        known_count: usize,
    },
}

/// Results returned by async commands.
#[derive(Debug)]
pub enum CommandResult {
    Health(Result<HealthResponse, String>),
    Sessions(Result<Vec<SessionSummary>, String>),
    Projects(Result<Vec<String>, String>),
    Messages {
        session_id: String,
        result: Result<Vec<Message>, String>,
    },
    SearchResults {
        query: String,
        result: Result<Vec<SearchHit>, String>,
    },
    Synced(Result<u64, String>),
    UpdateChecked {
        session_id: String,
        result: Result<bool, String>,
    },
}

/// Flatten a backend error into the text shown in the footer.
fn describe(err: anyhow::Error) -> String {
    match err.downcast_ref::<ApiError>() {
        Some(api) if api.is_not_found() => "not found".to_string(),
        Some(ApiError::Status { status, .. }) => format!("server returned {status}"),
        None => format!("{err:#}"),
    }
}

pub async fn execute<B: SessionBackend>(cmd: AsyncCommand, backend: &B) -> CommandResult {
    match cmd {
        AsyncCommand::CheckHealth => CommandResult::Health(backend.health().await.map_err(describe)),

        // ── Sessions ──────────────────────────────────────────────────
        AsyncCommand::FetchSessions(query) => {
            CommandResult::Sessions(backend.list_sessions(&query).await.map_err(describe))
        }
        AsyncCommand::FetchProjects => {
            CommandResult::Projects(backend.list_projects().await.map_err(describe))
        }
        AsyncCommand::FetchMessages { session_id } => {
            let result = backend.fetch_messages(&session_id).await.map_err(describe);
            CommandResult::Messages { session_id, result }
        }

        // ── Search / sync ─────────────────────────────────────────────
        AsyncCommand::Search(query) => {
            let result = backend.search(&query).await.map_err(describe);
            CommandResult::SearchResults {
                query: query.q,
                result,
            }
        }
        AsyncCommand::Sync => CommandResult::Synced(backend.trigger_sync().await.map_err(describe)),

        // ── Live updates ──────────────────────────────────────────────
        AsyncCommand::CheckUpdate {
            session_id,
            known_count,
        } => {
            let result = backend
                .check_session_update(&session_id, known_count)
                .await
                .map_err(describe);
            CommandResult::UpdateChecked { session_id, result }
        }
    }
}
