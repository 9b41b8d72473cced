use sessionlens_core::{Message, MessageId, SortDirection};
use tracing::{debug, info};

use crate::config::ViewportConfig;
use crate::engine::Viewport;

/// Where the detail view is in a session's viewing lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ViewState {
    #[default]
    Empty,
    Loaded {
        session_id: String,
    },
    /// Messages for `to` are being fetched; `from` stays on screen meanwhile.
    Switching {
        from: Option<String>,
        to: String,
    },
}

/// Session switching, message selection and ordering on top of one [`Viewport`].
#[derive(Debug, Clone)]
pub struct SessionController {
    viewport: Viewport,
    state: ViewState,
    sessions: Vec<String>,
    session_index: Option<usize>,
    selection: Option<usize>,
    sort: SortDirection,
    compact_tools: bool,
    pending_focus: Option<MessageId>,
}

impl SessionController {
    pub fn new(config: ViewportConfig, sort: SortDirection, compact_tools: bool) -> Self {
        Self {
            viewport: Viewport::new(config),
            state: ViewState::Empty,
            sessions: Vec::new(),
            session_index: None,
            selection: None,
            sort,
            compact_tools,
            pending_focus: None,
        }
    }

    // ── Sessions ──────────────────────────────────────────────────────────

    /// Replace the outer session list (ids in display order).
    pub fn set_sessions(&mut self, ids: Vec<String>) {
        self.sessions = ids;
        self.session_index = self
            .current_or_target()
            .and_then(|id| self.sessions.iter().position(|s| s == id));
    }

    fn current_or_target(&self) -> Option<&str> {
        match &self.state {
            ViewState::Empty => None,
            ViewState::Loaded { session_id } => Some(session_id.as_str()),
            ViewState::Switching { to, .. } => Some(to.as_str()),
        }
    }

    /// Begin switching to `session_id`. Returns the id to fetch, or `None`
    /// when it is already on screen.
    pub fn open_session(&mut self, session_id: &str) -> Option<String> {
        if self.current_session() == Some(session_id)
            && matches!(self.state, ViewState::Loaded { .. })
        {
            return None;
        }
        let from = self.current_session().map(str::to_string);
        self.state = ViewState::Switching {
            from,
            to: session_id.to_string(),
        };
        self.session_index = self.sessions.iter().position(|s| s == session_id);
        debug!(session_id, "switching session");
        Some(session_id.to_string())
    }

    pub fn open_index(&mut self, index: usize) -> Option<String> {
        let id = self.sessions.get(index)?.clone();
        self.open_session(&id)
    }

    pub fn next_session(&mut self) -> Option<String> {
        let next = match self.session_index {
            Some(i) if i + 1 < self.sessions.len() => i + 1,
            Some(_) => return None,
            None if self.sessions.is_empty() => return None,
            None => 0,
        };
        self.open_index(next)
    }

    pub fn previous_session(&mut self) -> Option<String> {
        let previous = match self.session_index {
            Some(i) if i > 0 => i - 1,
            Some(_) => return None,
            None if self.sessions.is_empty() => return None,
            None => 0,
        };
        self.open_index(previous)
    }

    /// Messages arrived for `session_id` (in chronological order).
    ///
    /// Completes a pending switch with a full reset, or refreshes the loaded
    /// session in place. Results for any other session are stale and dropped.
    pub fn apply_messages(&mut self, session_id: &str, messages: Vec<Message>) -> bool {
        let messages = self.sort.arrange(messages);
        match &self.state {
            ViewState::Switching { to, .. } if to == session_id => {
                self.viewport.load(messages);
                self.selection = None;
                self.state = ViewState::Loaded {
                    session_id: session_id.to_string(),
                };
                info!(
                    session_id,
                    messages = self.viewport.len(),
                    "session loaded"
                );
                if let Some(id) = self.pending_focus.take() {
                    self.focus_message(&id);
                }
                true
            }
            ViewState::Loaded { session_id: current } if current == session_id => {
                let selected = self.selected_message().map(|m| m.id.clone());
                self.viewport.refresh(messages);
                self.selection = selected.and_then(|id| self.viewport.model().index_of(&id));
                debug!(session_id, messages = self.viewport.len(), "session refreshed");
                true
            }
            _ => {
                debug!(session_id, "dropping messages for a session no longer shown");
                false
            }
        }
    }

    /// Loading `session_id` failed: go back to what was shown before.
    pub fn fail_load(&mut self, session_id: &str) {
        let ViewState::Switching { from, to } = &self.state else {
            return;
        };
        if to != session_id {
            return;
        }
        self.state = match from.clone() {
            Some(session_id) => ViewState::Loaded { session_id },
            None => ViewState::Empty,
        };
        self.pending_focus = None;
        self.session_index = self
            .current_session()
            .and_then(|id| self.sessions.iter().position(|s| s == id));
    }

    // ── Selection ─────────────────────────────────────────────────────────

    /// Select message `index` (clamped), scrolling only if it is not already
    /// fully visible.
    pub fn select(&mut self, index: usize) -> Option<usize> {
        let len = self.viewport.len();
        if len == 0 {
            self.selection = None;
            return None;
        }
        let index = index.min(len - 1);
        self.selection = Some(index);
        if !self.viewport.is_fully_visible(index) {
            let margin = self.viewport.config().selection_margin;
            let target = self.viewport.model().offset(index).saturating_sub(margin);
            self.viewport.on_scroll(target);
        }
        Some(index)
    }

    pub fn select_next(&mut self) -> Option<usize> {
        let next = self.selection.map_or(0, |i| i.saturating_add(1));
        self.select(next)
    }

    pub fn select_previous(&mut self) -> Option<usize> {
        let previous = self.selection.map_or(0, |i| i.saturating_sub(1));
        self.select(previous)
    }

    pub fn select_first(&mut self) -> Option<usize> {
        self.select(0)
    }

    pub fn select_last(&mut self) -> Option<usize> {
        self.select(self.viewport.len().saturating_sub(1))
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Select a message by id. If the session is still loading, the focus is
    /// kept and applied once it arrives; unknown ids are dropped.
    pub fn focus_message(&mut self, id: &MessageId) -> bool {
        if matches!(self.state, ViewState::Switching { .. }) {
            self.pending_focus = Some(id.clone());
            return false;
        }
        match self.viewport.model().index_of(id) {
            Some(index) => {
                self.select(index);
                true
            }
            None => {
                debug!(msg_id = %id, "focus target not in session");
                false
            }
        }
    }

    // ── Modes ─────────────────────────────────────────────────────────────

    /// Flip the sort order, keeping the selected message selected.
    pub fn toggle_sort(&mut self) -> SortDirection {
        self.sort = self.sort.toggled();
        self.viewport.reverse_order();
        match self.selection {
            Some(i) => {
                let mirrored = self.viewport.len().saturating_sub(1).saturating_sub(i);
                self.selection = None;
                self.select(mirrored);
            }
            None => self.viewport.on_scroll(0),
        }
        self.sort
    }

    /// Toggle compact tool output. Heights change with it, so the cache is dropped.
    pub fn toggle_compact_tools(&mut self) -> bool {
        self.compact_tools = !self.compact_tools;
        self.viewport.invalidate_layout();
        if let Some(i) = self.selection {
            self.select(i);
        }
        self.compact_tools
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Session whose messages are on screen.
    pub fn current_session(&self) -> Option<&str> {
        match &self.state {
            ViewState::Empty => None,
            ViewState::Loaded { session_id } => Some(session_id.as_str()),
            ViewState::Switching { from, .. } => from.as_deref(),
        }
    }

    /// Whether a load of `session_id` is still outstanding.
    pub fn is_switching_to(&self, session_id: &str) -> bool {
        matches!(&self.state, ViewState::Switching { to, .. } if to == session_id)
    }

    pub fn session_index(&self) -> Option<usize> {
        self.session_index
    }

    pub fn selection(&self) -> Option<usize> {
        self.selection
    }

    pub fn selected_message(&self) -> Option<&Message> {
        self.selection.and_then(|i| self.viewport.model().message(i))
    }

    pub fn sort(&self) -> SortDirection {
        self.sort
    }

    pub fn compact_tools(&self) -> bool {
        self.compact_tools
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FixedSurface;
    use pretty_assertions::assert_eq;
    use sessionlens_core::testing;
    use std::time::Instant;

    fn config() -> ViewportConfig {
        ViewportConfig {
            estimated_height: 80,
            gap: 16,
            overscan: 400,
            selection_margin: 8,
            ..ViewportConfig::default()
        }
    }

    fn loaded(count: usize) -> SessionController {
        let mut controller = SessionController::new(config(), SortDirection::Chronological, false);
        controller.set_sessions(vec!["a".into(), "b".into(), "c".into()]);
        controller.viewport_mut().set_viewport_height(200);
        assert_eq!(controller.open_session("a"), Some("a".to_string()));
        assert!(controller.apply_messages("a", testing::messages(count)));
        controller
    }

    fn settle(controller: &mut SessionController) {
        controller
            .viewport_mut()
            .frame(Instant::now(), &mut FixedSurface::uniform(80));
    }

    #[test]
    fn switching_keeps_previous_session_until_messages_arrive() {
        let mut controller = loaded(3);
        assert_eq!(controller.next_session(), Some("b".to_string()));
        assert_eq!(
            controller.state(),
            &ViewState::Switching {
                from: Some("a".into()),
                to: "b".into()
            }
        );
        assert_eq!(controller.current_session(), Some("a"));
        assert_eq!(controller.viewport().len(), 3);

        assert!(controller.apply_messages("b", testing::messages(5)));
        assert_eq!(controller.current_session(), Some("b"));
        assert_eq!(controller.viewport().len(), 5);
        assert_eq!(controller.viewport().generation(), 2);
        assert_eq!(controller.session_index(), Some(1));
    }

    #[test]
    fn stale_results_are_dropped() {
        let mut controller = loaded(3);
        controller.open_session("b");
        controller.open_session("c");
        assert!(!controller.apply_messages("b", testing::messages(9)));
        assert_eq!(controller.viewport().len(), 3);
        assert!(controller.apply_messages("c", testing::messages(2)));
        assert_eq!(controller.current_session(), Some("c"));
    }

    #[test]
    fn failed_load_reverts_to_previous_session() {
        let mut controller = loaded(3);
        controller.open_session("c");
        assert!(controller.is_switching_to("c"));
        assert!(!controller.is_switching_to("a"));
        controller.fail_load("c");
        assert!(!controller.is_switching_to("c"));
        assert_eq!(
            controller.state(),
            &ViewState::Loaded {
                session_id: "a".into()
            }
        );
        assert_eq!(controller.session_index(), Some(0));
        assert_eq!(controller.viewport().len(), 3);
    }

    #[test]
    fn session_navigation_stops_at_the_ends() {
        let mut controller = loaded(1);
        assert_eq!(controller.previous_session(), None);
        controller.open_index(2);
        controller.apply_messages("c", testing::messages(1));
        assert_eq!(controller.next_session(), None);
    }

    #[test]
    fn selecting_a_visible_message_keeps_scroll() {
        let mut controller = loaded(20);
        settle(&mut controller);
        // Message 1 spans [96, 176), inside the [0, 200) viewport.
        assert_eq!(controller.select(1), Some(1));
        settle(&mut controller);
        assert_eq!(controller.viewport().scroll_top(), 0);
    }

    #[test]
    fn selecting_an_offscreen_message_scrolls_to_it_with_margin() {
        let mut controller = loaded(20);
        settle(&mut controller);
        controller.select(10);
        settle(&mut controller);
        assert_eq!(controller.viewport().scroll_top(), 960 - 8);

        // Message 12 starts right at the viewport's bottom edge.
        controller.select(12);
        settle(&mut controller);
        assert_eq!(controller.viewport().scroll_top(), 1152 - 8);
    }

    #[test]
    fn scroll_target_is_clamped_at_zero() {
        let mut controller = loaded(20);
        controller.viewport_mut().on_scroll(500);
        settle(&mut controller);
        controller.select(0);
        settle(&mut controller);
        assert_eq!(controller.viewport().scroll_top(), 0);
    }

    #[test]
    fn keyboard_navigation_clamps_to_bounds() {
        let mut controller = loaded(3);
        assert_eq!(controller.select_previous(), Some(0));
        assert_eq!(controller.select_next(), Some(1));
        assert_eq!(controller.select_next(), Some(2));
        assert_eq!(controller.select_next(), Some(2));
        assert_eq!(controller.select(99), Some(2));
    }

    #[test]
    fn selection_is_cleared_on_session_change() {
        let mut controller = loaded(3);
        controller.select(2);
        controller.next_session();
        controller.apply_messages("b", testing::messages(3));
        assert_eq!(controller.selection(), None);
    }

    #[test]
    fn toggling_sort_reverses_and_keeps_selected_message() {
        let mut controller = loaded(5);
        settle(&mut controller);
        controller.select(1);

        assert_eq!(controller.toggle_sort(), SortDirection::NewestFirst);
        assert_eq!(controller.viewport().model().measured_count(), 0);
        assert_eq!(
            controller.viewport().model().offsets(),
            &[0, 96, 192, 288, 384]
        );
        assert_eq!(controller.selection(), Some(3));
        assert_eq!(
            controller.selected_message().map(|m| m.id.as_str()),
            Some("m1")
        );
    }

    #[test]
    fn newest_first_applies_to_loaded_and_refreshed_messages() {
        let mut controller = SessionController::new(config(), SortDirection::NewestFirst, false);
        controller.open_session("a");
        controller.apply_messages("a", testing::messages(3));
        assert_eq!(
            controller.viewport().model().message(0).map(|m| m.id.as_str()),
            Some("m2")
        );

        controller.select(0);
        controller.apply_messages("a", testing::messages(4));
        assert_eq!(controller.selection(), Some(1));
        assert_eq!(controller.viewport().generation(), 1);
    }

    #[test]
    fn focus_waits_for_pending_session() {
        let mut controller = loaded(3);
        controller.open_session("b");
        assert!(!controller.focus_message(&MessageId::from("m4")));
        controller.apply_messages("b", testing::messages(6));
        assert_eq!(controller.selection(), Some(4));
    }

    #[test]
    fn unknown_focus_target_is_ignored() {
        let mut controller = loaded(3);
        assert!(!controller.focus_message(&MessageId::from("nope")));
        assert_eq!(controller.selection(), None);
    }

    #[test]
    fn compact_toggle_invalidates_heights() {
        let mut controller = loaded(3);
        controller
            .viewport_mut()
            .frame(Instant::now(), &mut FixedSurface::uniform(30));
        assert_eq!(controller.viewport().model().measured_count(), 3);
        assert!(controller.toggle_compact_tools());
        assert_eq!(controller.viewport().model().measured_count(), 0);
    }
}
