use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Position, Rect};
use ratatui::widgets::ListState;
use sessionlens_api::{SearchHit, SearchQuery, SessionListQuery, SessionSummary};
use sessionlens_core::SortDirection;
use sessionlens_runtime_config::ViewerConfig;
use sessionlens_viewport::{SessionController, ViewState, ViewportConfig};
use tracing::{debug, info, warn};

use crate::async_ops::{AsyncCommand, CommandResult};
use crate::live::{FollowTailState, UpdatePoller};

/// Rows moved per mouse wheel notch in the detail view.
const WHEEL_ROWS: i64 = 3;
const LIST_PAGE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    SessionList,
    SessionDetail,
    SearchResults,
    Help,
}

/// Flash message severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashLevel {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ServerStatus {
    #[default]
    Unknown,
    Online(String),
    Offline,
}

/// Screen rows `[top, bottom)` a rendered message occupies, for click-to-select.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageHit {
    pub index: usize,
    pub top: u16,
    pub bottom: u16,
}

pub struct App {
    pub view: View,
    /// View that Esc returns to from the detail view.
    detail_return: View,
    /// View the help overlay was opened from.
    help_return: View,

    // ── Session list ──────────────────────────────────────────────────
    pub sessions: Vec<SessionSummary>,
    pub list_state: ListState,
    pub loading_sessions: bool,
    pub projects: Vec<String>,
    pub project_filter: Option<String>,

    // ── Detail ────────────────────────────────────────────────────────
    pub controller: SessionController,
    pub follow: FollowTailState,
    /// Keep the viewport glued to the bottom while new rows are measured.
    pub tail_pinned: bool,
    pub poller: UpdatePoller,
    pub message_hits: Vec<MessageHit>,
    pub detail_area: Option<Rect>,
    pub minimap_area: Option<Rect>,

    // ── Search ────────────────────────────────────────────────────────
    pub searching: bool,
    pub search_query: String,
    pub last_search: Option<String>,
    pub search_results: Vec<SearchHit>,
    pub search_state: ListState,

    // ── Misc ──────────────────────────────────────────────────────────
    pub pending_commands: VecDeque<AsyncCommand>,
    pub flash_message: Option<(String, FlashLevel)>,
    pub server_url: String,
    pub server_status: ServerStatus,
    session_limit: u32,
    search_limit: u32,
}

impl App {
    pub fn new(config: &ViewerConfig) -> Self {
        let sort = if config.viewer.newest_first {
            SortDirection::NewestFirst
        } else {
            SortDirection::Chronological
        };
        Self {
            view: View::SessionList,
            detail_return: View::SessionList,
            help_return: View::SessionList,
            sessions: Vec::new(),
            list_state: ListState::default(),
            loading_sessions: false,
            projects: Vec::new(),
            project_filter: None,
            controller: SessionController::new(
                ViewportConfig::from(&config.viewport),
                sort,
                config.viewer.compact_tools,
            ),
            follow: FollowTailState::default(),
            tail_pinned: false,
            poller: UpdatePoller::new(Duration::from_secs(config.viewer.poll_interval_secs)),
            message_hits: Vec::new(),
            detail_area: None,
            minimap_area: None,
            searching: false,
            search_query: String::new(),
            last_search: None,
            search_results: Vec::new(),
            search_state: ListState::default(),
            pending_commands: VecDeque::new(),
            flash_message: None,
            server_url: config.server.url.clone(),
            server_status: ServerStatus::Unknown,
            session_limit: config.viewer.session_limit,
            search_limit: config.viewer.search_limit,
        }
    }

    /// Queue the initial fetches; optionally open a session right away.
    pub fn startup(&mut self, initial_session: Option<String>) {
        self.pending_commands.push_back(AsyncCommand::CheckHealth);
        self.pending_commands.push_back(AsyncCommand::FetchProjects);
        self.refresh_sessions();
        if let Some(id) = initial_session {
            self.open_session(&id);
        }
    }

    fn session_query(&self) -> SessionListQuery {
        SessionListQuery {
            limit: self.session_limit,
            project: self.project_filter.clone(),
        }
    }

    fn refresh_sessions(&mut self) {
        self.loading_sessions = true;
        self.pending_commands
            .push_back(AsyncCommand::FetchSessions(self.session_query()));
    }

    // ── Keyboard ──────────────────────────────────────────────────────

    /// Returns true if the app should quit.
    pub fn handle_key(&mut self, key: KeyCode) -> bool {
        // Clear flash message on any key press
        self.flash_message = None;

        if self.searching {
            self.handle_search_input_key(key);
            return false;
        }

        if matches!(key, KeyCode::Char('?')) {
            if self.view == View::Help {
                self.view = self.help_return;
            } else {
                self.help_return = self.view;
                self.view = View::Help;
            }
            return false;
        }
        if self.view == View::Help {
            self.view = self.help_return;
            return false;
        }

        match key {
            KeyCode::Char('q') => return true,
            KeyCode::Char('/') => {
                self.searching = true;
                self.search_query.clear();
                return false;
            }
            KeyCode::Char('s') => {
                self.request_sync();
                return false;
            }
            _ => {}
        }

        match self.view {
            View::SessionList => self.handle_list_key(key),
            View::SessionDetail => self.handle_detail_key(key),
            View::SearchResults => self.handle_search_results_key(key),
            View::Help => {}
        }
        false
    }

    fn handle_list_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('j') | KeyCode::Down => self.list_move(1),
            KeyCode::Char('k') | KeyCode::Up => self.list_move(-1),
            KeyCode::PageDown => self.list_move(LIST_PAGE as isize),
            KeyCode::PageUp => self.list_move(-(LIST_PAGE as isize)),
            KeyCode::Char('g') | KeyCode::Home => self.list_select(0),
            KeyCode::Char('G') | KeyCode::End => {
                self.list_select(self.sessions.len().saturating_sub(1))
            }
            KeyCode::Enter => self.open_selected_session(),
            KeyCode::Char('p') => self.cycle_project_filter(),
            _ => {}
        }
    }

    fn handle_detail_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('j') | KeyCode::Down => {
                self.controller.select_next();
                self.release_tail_pin();
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.controller.select_previous();
                self.detach_follow();
            }
            KeyCode::Char('J') | KeyCode::Char(']') => self.next_session(),
            KeyCode::Char('K') | KeyCode::Char('[') => self.previous_session(),
            KeyCode::PageDown => {
                let rows = self.controller.viewport().viewport_height();
                self.controller.viewport_mut().scroll_by(i64::from(rows));
            }
            KeyCode::PageUp => {
                let rows = self.controller.viewport().viewport_height();
                self.controller.viewport_mut().scroll_by(-i64::from(rows));
                self.detach_follow();
            }
            KeyCode::Char('g') | KeyCode::Home => {
                self.controller.select_first();
                self.detach_follow();
            }
            KeyCode::Char('G') | KeyCode::End => {
                self.controller.select_last();
                self.controller.viewport_mut().scroll_to_bottom();
                self.follow.reattach();
                self.tail_pinned = true;
            }
            KeyCode::Char('o') => {
                let sort = self.controller.toggle_sort();
                self.detach_follow();
                self.flash_info(format!("Sort: {}", sort.label()));
            }
            KeyCode::Char('t') => {
                let compact = self.controller.toggle_compact_tools();
                self.release_tail_pin();
                self.flash_info(if compact {
                    "Tool output: compact"
                } else {
                    "Tool output: full"
                });
            }
            KeyCode::Esc => self.view = self.detail_return,
            _ => {}
        }
    }

    fn handle_search_results_key(&mut self, key: KeyCode) {
        let len = self.search_results.len();
        match key {
            KeyCode::Char('j') | KeyCode::Down if len > 0 => {
                let next = self.search_state.selected().map_or(0, |i| (i + 1).min(len - 1));
                self.search_state.select(Some(next));
            }
            KeyCode::Char('k') | KeyCode::Up if len > 0 => {
                let prev = self.search_state.selected().map_or(0, |i| i.saturating_sub(1));
                self.search_state.select(Some(prev));
            }
            KeyCode::Enter => self.open_selected_hit(),
            KeyCode::Esc => {
                self.search_results.clear();
                self.search_state.select(None);
                self.last_search = None;
                self.view = View::SessionList;
            }
            _ => {}
        }
    }

    fn handle_search_input_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => {
                self.searching = false;
                self.search_query.clear();
            }
            KeyCode::Enter => {
                self.searching = false;
                let query = self.search_query.trim().to_string();
                if query.is_empty() {
                    return;
                }
                self.pending_commands
                    .push_back(AsyncCommand::Search(SearchQuery::new(query, self.search_limit)));
            }
            KeyCode::Backspace => {
                self.search_query.pop();
            }
            KeyCode::Char(c) => self.search_query.push(c),
            _ => {}
        }
    }

    // ── Mouse ─────────────────────────────────────────────────────────

    pub fn handle_mouse(&mut self, mouse: MouseEvent) -> bool {
        self.handle_mouse_at(mouse, Instant::now())
    }

    pub(crate) fn handle_mouse_at(&mut self, mouse: MouseEvent, now: Instant) -> bool {
        let position = Position::new(mouse.column, mouse.row);
        match (self.view, mouse.kind) {
            (View::SessionList, MouseEventKind::ScrollDown) => self.list_move(1),
            (View::SessionList, MouseEventKind::ScrollUp) => self.list_move(-1),
            (View::SessionDetail, MouseEventKind::ScrollDown) => {
                self.controller.viewport_mut().scroll_by(WHEEL_ROWS);
            }
            (View::SessionDetail, MouseEventKind::ScrollUp) => {
                self.controller.viewport_mut().scroll_by(-WHEEL_ROWS);
                self.detach_follow();
            }
            (View::SessionDetail, MouseEventKind::Down(MouseButton::Left)) => {
                if let Some(area) = self.minimap_area.filter(|a| a.contains(position)) {
                    let y = f64::from(mouse.row - area.y) + 0.5;
                    let target = self.controller.viewport_mut().click_minimap(now, y);
                    debug!(target, "minimap jump");
                    self.detach_follow();
                } else if let Some(hit) = self
                    .message_hits
                    .iter()
                    .find(|hit| hit.top <= mouse.row && mouse.row < hit.bottom)
                    .filter(|_| self.detail_area.is_some_and(|a| a.contains(position)))
                    .copied()
                {
                    self.controller.select(hit.index);
                }
            }
            _ => {}
        }
        false
    }

    // ── Session list helpers ──────────────────────────────────────────

    fn list_move(&mut self, delta: isize) {
        if self.sessions.is_empty() {
            return;
        }
        let current = self.list_state.selected().unwrap_or(0) as isize;
        let next = (current + delta).clamp(0, self.sessions.len() as isize - 1);
        self.list_select(next as usize);
    }

    fn list_select(&mut self, index: usize) {
        if self.sessions.is_empty() {
            self.list_state.select(None);
        } else {
            self.list_state
                .select(Some(index.min(self.sessions.len() - 1)));
        }
    }

    pub fn selected_session(&self) -> Option<&SessionSummary> {
        self.list_state.selected().and_then(|i| self.sessions.get(i))
    }

    fn open_selected_session(&mut self) {
        if let Some(id) = self.selected_session().map(|s| s.id.clone()) {
            self.detail_return = View::SessionList;
            self.open_session(&id);
        }
    }

    fn open_selected_hit(&mut self) {
        let Some(hit) = self
            .search_state
            .selected()
            .and_then(|i| self.search_results.get(i))
            .cloned()
        else {
            return;
        };
        self.detail_return = View::SearchResults;
        self.open_session(&hit.session_id);
        self.controller.focus_message(&hit.msg_id);
        self.detach_follow();
    }

    pub fn open_session(&mut self, session_id: &str) {
        if let Some(id) = self.controller.open_session(session_id) {
            self.pending_commands
                .push_back(AsyncCommand::FetchMessages { session_id: id });
        }
        self.view = View::SessionDetail;
        self.sync_list_selection();
    }

    fn next_session(&mut self) {
        match self.controller.next_session() {
            Some(id) => {
                self.pending_commands
                    .push_back(AsyncCommand::FetchMessages { session_id: id });
                self.sync_list_selection();
            }
            None => self.flash_info("Last session"),
        }
    }

    fn previous_session(&mut self) {
        match self.controller.previous_session() {
            Some(id) => {
                self.pending_commands
                    .push_back(AsyncCommand::FetchMessages { session_id: id });
                self.sync_list_selection();
            }
            None => self.flash_info("First session"),
        }
    }

    fn sync_list_selection(&mut self) {
        if let Some(index) = self.controller.session_index() {
            self.list_state.select(Some(index));
        }
    }

    fn cycle_project_filter(&mut self) {
        self.project_filter = match &self.project_filter {
            None => self.projects.first().cloned(),
            Some(current) => self
                .projects
                .iter()
                .position(|p| p == current)
                .and_then(|i| self.projects.get(i + 1))
                .cloned(),
        };
        self.flash_info(format!("Project: {}", self.project_label()));
        self.refresh_sessions();
    }

    pub fn help_return(&self) -> View {
        self.help_return
    }

    pub fn project_label(&self) -> &str {
        self.project_filter.as_deref().unwrap_or("all")
    }

    fn request_sync(&mut self) {
        self.pending_commands.push_back(AsyncCommand::Sync);
        self.flash_info("Syncing...");
    }

    fn detach_follow(&mut self) {
        self.follow.detach();
        self.tail_pinned = false;
    }

    /// A selection scroll that leaves the bottom wins over the tail pin.
    fn release_tail_pin(&mut self) {
        if self.tail_pinned && !self.controller.viewport().is_at_bottom() {
            self.detach_follow();
        }
    }

    // ── Live updates ──────────────────────────────────────────────────

    /// Time-driven work between frames: schedule the update check for the
    /// open session.
    pub fn tick(&mut self, now: Instant) {
        let ViewState::Loaded { session_id } = self.controller.state() else {
            return;
        };
        if self.poller.is_due(now) {
            let command = AsyncCommand::CheckUpdate {
                session_id: session_id.clone(),
                known_count: self.controller.viewport().len(),
            };
            self.poller.mark_sent(now);
            self.pending_commands.push_back(command);
        }
    }

    fn loaded_session(&self) -> Option<&str> {
        match self.controller.state() {
            ViewState::Loaded { session_id } => Some(session_id.as_str()),
            _ => None,
        }
    }

    // ── Async results ─────────────────────────────────────────────────

    pub fn apply_command_result(&mut self, result: CommandResult) {
        match result {
            CommandResult::Health(Ok(health)) => {
                self.server_status = ServerStatus::Online(health.version);
            }
            CommandResult::Health(Err(e)) => {
                debug!("health check failed: {e}");
                self.server_status = ServerStatus::Offline;
            }

            CommandResult::Sessions(Ok(sessions)) => {
                self.loading_sessions = false;
                self.controller
                    .set_sessions(sessions.iter().map(|s| s.id.clone()).collect());
                self.sessions = sessions;
                let selected = self
                    .controller
                    .session_index()
                    .or(self.list_state.selected())
                    .unwrap_or(0);
                self.list_select(selected);
            }
            CommandResult::Sessions(Err(e)) => {
                self.loading_sessions = false;
                self.flash_error(format!("Failed to list sessions: {e}"));
            }

            CommandResult::Projects(Ok(projects)) => self.projects = projects,
            CommandResult::Projects(Err(e)) => {
                warn!("failed to list projects: {e}");
            }

            CommandResult::Messages {
                session_id,
                result: Ok(messages),
            } => self.apply_messages(&session_id, messages),
            CommandResult::Messages {
                session_id,
                result: Err(e),
            } => {
                if self.controller.is_switching_to(&session_id) {
                    self.controller.fail_load(&session_id);
                    self.flash_error(format!("Failed to load session {session_id}: {e}"));
                } else {
                    warn!(session_id, "refresh failed: {e}");
                }
            }

            CommandResult::SearchResults {
                query,
                result: Ok(hits),
            } => {
                self.search_state
                    .select(if hits.is_empty() { None } else { Some(0) });
                if hits.is_empty() {
                    self.flash_info(format!("No results for \"{query}\""));
                }
                self.search_results = hits;
                self.last_search = Some(query);
                self.view = View::SearchResults;
            }
            CommandResult::SearchResults {
                result: Err(e), ..
            } => self.flash_error(format!("Search failed: {e}")),

            CommandResult::Synced(Ok(synced)) => {
                info!(synced, "sync finished");
                self.flash_success(format!("Synced {synced} sessions"));
                self.pending_commands.push_back(AsyncCommand::FetchProjects);
                self.refresh_sessions();
            }
            CommandResult::Synced(Err(e)) => self.flash_error(format!("Sync failed: {e}")),

            CommandResult::UpdateChecked { session_id, result } => {
                self.poller.mark_done();
                match result {
                    Ok(true) if self.loaded_session() == Some(session_id.as_str()) => {
                        debug!(session_id, "session has updates");
                        self.pending_commands
                            .push_back(AsyncCommand::FetchMessages { session_id });
                    }
                    Ok(_) => {}
                    Err(e) => warn!(session_id, "update check failed: {e}"),
                }
            }
        }
    }

    fn apply_messages(&mut self, session_id: &str, messages: Vec<sessionlens_api::Message>) {
        let refresh = self.loaded_session() == Some(session_id);
        if refresh {
            let at_tail = self.controller.viewport().is_at_bottom();
            self.follow.mark_before_update(at_tail);
        }
        if !self.controller.apply_messages(session_id, messages) {
            return;
        }
        if refresh {
            if self.follow.should_follow_after_update() {
                self.controller.viewport_mut().scroll_to_bottom();
                self.tail_pinned = true;
            }
        } else {
            self.follow.reset();
            self.tail_pinned = false;
            self.message_hits.clear();
            self.poller.restart(Instant::now());
        }
    }

    // ── Flash ─────────────────────────────────────────────────────────

    pub fn flash_success(&mut self, msg: impl Into<String>) {
        self.flash_message = Some((msg.into(), FlashLevel::Success));
    }

    pub fn flash_error(&mut self, msg: impl Into<String>) {
        self.flash_message = Some((msg.into(), FlashLevel::Error));
    }

    pub fn flash_info(&mut self, msg: impl Into<String>) {
        self.flash_message = Some((msg.into(), FlashLevel::Info));
    }
}
