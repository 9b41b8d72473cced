use std::time::Instant;

use crate::app::{App, MessageHit};
use crate::theme::{self, Theme};
use crate::views::{minimap, split_by_width, truncate, truncate_to_width};
use chrono::Local;
use ratatui::buffer::Buffer;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use sessionlens_core::{Message, Role};
use sessionlens_viewport::{RenderPlan, RenderSurface, ViewState};
use tracing::trace;

const CONTENT_INDENT: &str = "  ";
const TAB: &str = "    ";

pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = Theme::block_dim();
    let inner = block.inner(area);

    if app.controller.viewport().is_empty() {
        let msg = match app.controller.state() {
            ViewState::Switching { .. } => "Loading session...",
            ViewState::Loaded { .. } => "This session has no messages.",
            ViewState::Empty => "No session open. Pick one from the list.",
        };
        frame.render_widget(block.title(detail_title(app)), area);
        frame.render_widget(
            Paragraph::new(msg).style(Style::new().fg(Color::DarkGray)),
            inner,
        );
        app.message_hits.clear();
        app.detail_area = None;
        app.minimap_area = None;
        return;
    }

    let [body, minimap_area] = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length(minimap::MINIMAP_WIDTH),
    ])
    .areas(inner);

    let selected = app.controller.selection();
    let compact_tools = app.controller.compact_tools();
    let pinned = app.tail_pinned;

    let viewport = app.controller.viewport_mut();
    viewport.set_viewport_height(u32::from(body.height));
    viewport.set_minimap_height(u32::from(minimap_area.height));
    if pinned {
        viewport.scroll_to_bottom();
    }

    let mut surface = TerminalSurface::new(frame.buffer_mut(), body, selected, compact_tools);
    let outcome = viewport.frame(Instant::now(), &mut surface);
    let hits = surface.into_hits();
    if outcome.heights_changed() {
        trace!(
            changed = outcome.changed,
            first_seen = outcome.newly_measured,
            "measured heights differ from cache"
        );
    }
    minimap::render(frame.buffer_mut(), minimap_area, viewport.minimap());

    app.message_hits = hits;
    app.detail_area = Some(body);
    app.minimap_area = Some(minimap_area);
    frame.render_widget(block.title(detail_title(app)), area);
}

fn detail_title(app: &App) -> String {
    let controller = &app.controller;
    let Some(session_id) = controller.current_session() else {
        return match controller.state() {
            ViewState::Switching { to, .. } => format!(" {} ", truncate(to, 32)),
            _ => " Session ".to_string(),
        };
    };
    let viewport = controller.viewport();
    let mut title = format!(
        " {} · {} msgs · {} · {} ",
        truncate(session_id, 32),
        viewport.len(),
        controller.sort().label(),
        app.follow.label()
    );
    let window = viewport.window();
    if !window.is_empty() {
        title.push_str(&format!("· {}-{} ", window.start + 1, window.end));
    }
    if let ViewState::Switching { to, .. } = controller.state() {
        title.push_str(&format!("· loading {} ", truncate(to, 16)));
    }
    title
}

// ── Surface ───────────────────────────────────────────────────────────

/// Draws windowed messages straight into the frame buffer.
///
/// Messages are laid out in flow starting at the plan's leading spacer; only
/// rows inside `[scroll_top, scroll_top + area.height)` reach the buffer.
/// Every message is still measured in full, and the rows it actually occupies
/// on screen are kept for click-to-select.
pub struct TerminalSurface<'a> {
    buf: &'a mut Buffer,
    area: Rect,
    selected: Option<usize>,
    compact_tools: bool,
    hits: Vec<MessageHit>,
}

impl<'a> TerminalSurface<'a> {
    pub fn new(
        buf: &'a mut Buffer,
        area: Rect,
        selected: Option<usize>,
        compact_tools: bool,
    ) -> Self {
        Self {
            buf,
            area,
            selected,
            compact_tools,
            hits: Vec::new(),
        }
    }

    pub fn into_hits(self) -> Vec<MessageHit> {
        self.hits
    }
}

impl RenderSurface for TerminalSurface<'_> {
    fn materialize(&mut self, plan: &RenderPlan, messages: &[Message]) -> Vec<u32> {
        let view_top = plan.scroll_top;
        let view_bottom = view_top.saturating_add(u32::from(self.area.height));
        let mut row = plan.leading_spacer;
        let mut heights = Vec::with_capacity(messages.len());

        for (index, message) in plan.indices().zip(messages) {
            let lines = message_lines(message, self.area.width, self.compact_tools);
            let height = lines.len() as u32;
            let selected = self.selected == Some(index);

            for (offset, line) in lines.iter().enumerate() {
                let content_row = row + offset as u32;
                if content_row < view_top || content_row >= view_bottom {
                    continue;
                }
                let y = self.area.y + (content_row - view_top) as u16;
                if selected {
                    self.buf.set_style(
                        Rect::new(self.area.x, y, self.area.width, 1),
                        Style::new().bg(Theme::BG_SELECTED),
                    );
                }
                self.buf.set_line(self.area.x, y, line, self.area.width);
            }

            let top = row.max(view_top);
            let bottom = row.saturating_add(height).min(view_bottom);
            if top < bottom {
                self.hits.push(MessageHit {
                    index,
                    top: self.area.y + (top - view_top) as u16,
                    bottom: self.area.y + (bottom - view_top) as u16,
                });
            }

            heights.push(height);
            row = row.saturating_add(height).saturating_add(plan.gap);
        }
        heights
    }
}

// ── Message layout ────────────────────────────────────────────────────

/// A message as terminal lines: role header, then content wrapped to `width`.
/// Tool output collapses to one line in compact mode.
pub fn message_lines(message: &Message, width: u16, compact_tools: bool) -> Vec<Line<'static>> {
    let mut lines = vec![header_line(message)];
    let available = usize::from(width)
        .saturating_sub(CONTENT_INDENT.len())
        .max(1);
    let style = content_style(message.role);

    if compact_tools && message.role == Role::Tool {
        let first = message.first_line().replace('\t', TAB);
        let more = message.content.trim().lines().count() > 1;
        let mut text = truncate_to_width(&first, available.saturating_sub(2));
        if more {
            text.push_str(" …");
        }
        lines.push(content_line(text, style));
        return lines;
    }

    for raw in message.content.trim_end().lines() {
        for chunk in split_by_width(&raw.replace('\t', TAB), available) {
            lines.push(content_line(chunk, style));
        }
    }
    lines
}

fn header_line(message: &Message) -> Line<'static> {
    let time = message
        .timestamp
        .with_timezone(&Local)
        .format("%H:%M:%S")
        .to_string();
    Line::from(vec![
        Span::styled(
            theme::role_badge(message.role),
            Style::new()
                .fg(Color::Black)
                .bg(theme::role_color(message.role))
                .bold(),
        ),
        Span::raw(" "),
        Span::styled(time, Style::new().fg(Theme::TEXT_SECONDARY)),
        Span::raw(" "),
        Span::styled(message.id.to_string(), Style::new().fg(Theme::TEXT_MUTED)),
    ])
}

fn content_style(role: Role) -> Style {
    match role {
        Role::Tool | Role::System => Style::new().fg(Theme::TEXT_SECONDARY),
        Role::User | Role::Agent => Style::new().fg(Theme::TEXT_CONTENT),
    }
}

fn content_line(text: String, style: Style) -> Line<'static> {
    Line::from(vec![Span::raw(CONTENT_INDENT), Span::styled(text, style)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeBackend, buffer_to_string, drain, draw, summary};
    use crossterm::event::KeyCode;
    use pretty_assertions::assert_eq;
    use sessionlens_core::testing;
    use sessionlens_runtime_config::ViewerConfig;
    use sessionlens_viewport::{Viewport, ViewportConfig};

    fn line_text(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn content_wraps_to_width() {
        let message = testing::message("m0", Role::Agent, "abcdefghij");
        let lines = message_lines(&message, 8, false);
        let texts: Vec<_> = lines.iter().skip(1).map(line_text).collect();
        assert_eq!(texts, vec!["  abcdef", "  ghij"]);
    }

    #[test]
    fn tabs_expand_before_wrapping() {
        let message = testing::message("m0", Role::User, "\tx");
        let lines = message_lines(&message, 40, false);
        assert_eq!(line_text(&lines[1]), "      x");
    }

    #[test]
    fn compact_mode_collapses_tool_output() {
        let message = testing::message("t1", Role::Tool, "cargo build\nline 2\nline 3");
        assert_eq!(message_lines(&message, 40, false).len(), 4);

        let compact = message_lines(&message, 40, true);
        assert_eq!(compact.len(), 2);
        assert_eq!(line_text(&compact[1]), "  cargo build …");

        // Other roles are never collapsed.
        let user = testing::message("u1", Role::User, "a\nb");
        assert_eq!(message_lines(&user, 40, true).len(), 3);
    }

    #[test]
    fn surface_draws_only_rows_inside_the_viewport() {
        let mut viewport = Viewport::new(ViewportConfig::default());
        viewport.load(testing::messages(10));
        viewport.set_viewport_height(6);
        viewport.on_scroll(5);

        let area = Rect::new(0, 0, 30, 6);
        let mut buf = Buffer::empty(area);
        let mut surface = TerminalSurface::new(&mut buf, area, None, false);
        let outcome = viewport.frame(Instant::now(), &mut surface);
        let hits = surface.into_hits();

        // Each message is two rows (header + one line) with a one-row gap,
        // so content rows 5..11 show the gap after m1, then m2 and m3.
        assert!(outcome.heights_changed());
        assert_eq!(
            hits,
            vec![
                MessageHit {
                    index: 2,
                    top: 1,
                    bottom: 3
                },
                MessageHit {
                    index: 3,
                    top: 4,
                    bottom: 6
                },
            ]
        );
        let text = buffer_to_string(&buf);
        let rows: Vec<_> = text.lines().collect();
        assert!(rows[0].trim().is_empty());
        assert!(rows[1].contains(" USER "));
        assert!(rows[2].contains("message 2"));
        assert!(rows[5].contains("message 3"));
        assert!(!text.contains("message 1"));
    }

    #[test]
    fn selected_message_rows_are_highlighted() {
        let mut viewport = Viewport::new(ViewportConfig::default());
        viewport.load(testing::messages(3));
        viewport.set_viewport_height(10);

        let area = Rect::new(0, 0, 30, 10);
        let mut buf = Buffer::empty(area);
        let mut surface = TerminalSurface::new(&mut buf, area, Some(1), false);
        viewport.frame(Instant::now(), &mut surface);

        // m1 occupies content rows 3 and 4.
        assert_eq!(buf[(20, 3)].bg, Theme::BG_SELECTED);
        assert_eq!(buf[(20, 4)].bg, Theme::BG_SELECTED);
        assert_ne!(buf[(20, 0)].bg, Theme::BG_SELECTED);
    }

    fn opened_app(count: usize) -> App {
        let mut backend = FakeBackend {
            sessions: vec![summary("s1", "web")],
            ..FakeBackend::default()
        };
        backend
            .messages
            .insert("s1".into(), testing::messages(count));
        let mut app = App::new(&ViewerConfig::default());
        app.startup(Some("s1".into()));
        drain(&mut app, &backend);
        app
    }

    #[test]
    fn detail_view_shows_messages_title_and_minimap() {
        let mut app = opened_app(3);
        let text = draw(&mut app, 80, 24);
        assert!(text.contains("s1 · 3 msgs · oldest first"));
        assert!(text.contains(" USER "));
        assert!(text.contains(" AGENT "));
        assert!(text.contains("message 2"));
        assert!(text.contains("▀") || text.contains("▄"));
        assert!(app.minimap_area.is_some());
        assert_eq!(app.message_hits.len(), 3);
    }

    #[test]
    fn newest_first_reverses_drawn_order() {
        let mut app = opened_app(3);
        app.handle_key(KeyCode::Char('o'));
        let text = draw(&mut app, 80, 24);
        let first = text.find("message 2").expect("message 2 drawn");
        let last = text.find("message 0").expect("message 0 drawn");
        assert!(first < last);
        assert!(text.contains("newest first"));
    }

    #[test]
    fn empty_detail_explains_state() {
        let mut app = App::new(&ViewerConfig::default());
        app.open_session("s9");
        let text = draw(&mut app, 80, 24);
        assert!(text.contains("Loading session..."));
        assert!(text.contains(" s9 "));
    }
}
