use crate::app::App;
use crate::theme::{self, Theme};
use crate::views::{format_relative_datetime, truncate};
use ratatui::prelude::*;
use ratatui::widgets::{HighlightSpacing, List, ListItem, Paragraph};
use sessionlens_api::SessionSummary;

pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    if app.sessions.is_empty() {
        let msg = if app.loading_sessions {
            "Loading sessions..."
        } else if app.project_filter.is_some() {
            "No sessions in this project. Press p to change the filter."
        } else {
            "No sessions yet. Press s to ask the server to sync."
        };
        render_empty(frame, area, msg, app);
        return;
    }

    let title_width = area.width.saturating_sub(12) as usize;
    let items: Vec<ListItem> = app
        .sessions
        .iter()
        .map(|session| session_item(session, title_width))
        .collect();

    let list = List::new(items)
        .block(Theme::block_dim().title(list_title(app)))
        .highlight_style(
            Style::new()
                .bg(Theme::BG_SURFACE)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol(" > ")
        .highlight_spacing(HighlightSpacing::Always);

    frame.render_stateful_widget(list, area, &mut app.list_state);
}

fn session_item(session: &SessionSummary, title_width: usize) -> ListItem<'static> {
    let title = if session.first_message.trim().is_empty() {
        session.id.as_str()
    } else {
        session.first_message.lines().next().unwrap_or_default()
    };

    // Line 1: agent icon + first prompt
    let line1 = Line::from(vec![
        Span::styled(
            theme::agent_icon(&session.agent),
            Style::new().fg(theme::agent_color(&session.agent)).bold(),
        ),
        Span::raw(" "),
        Span::styled(
            truncate(title, title_width),
            Style::new().fg(Theme::TEXT_PRIMARY).bold(),
        ),
    ]);

    // Line 2: metadata with subtle separators
    let line2 = Line::from(vec![
        Span::raw("     "),
        Span::styled(
            format_relative_datetime(session.started_at),
            Style::new().fg(Theme::TEXT_PRIMARY),
        ),
        Span::styled("  ", Style::new().fg(Theme::TEXT_MUTED)),
        Span::styled(session.project.clone(), Style::new().fg(Color::Blue)),
        Span::styled("  ", Style::new().fg(Theme::TEXT_MUTED)),
        Span::styled(
            format!("{} msgs", session.message_count),
            Style::new().fg(Color::Green),
        ),
        Span::styled("  ", Style::new().fg(Theme::TEXT_MUTED)),
        Span::styled(session.id.clone(), Style::new().fg(Theme::TEXT_MUTED)),
    ]);

    ListItem::new(vec![line1, line2, Line::raw("")])
}

fn render_empty(frame: &mut Frame, area: Rect, msg: &str, app: &App) {
    let block = Theme::block_dim()
        .title(list_title(app))
        .padding(Theme::PADDING_CARD);
    let paragraph = Paragraph::new(msg)
        .block(block)
        .style(Style::new().fg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}

fn list_title(app: &App) -> String {
    match &app.project_filter {
        Some(project) => format!(" Sessions [project:{}] ", truncate(project, 40)),
        None => " Sessions ".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use crate::app::App;
    use crate::testing::{FakeBackend, drain, draw, summary};
    use crossterm::event::KeyCode;
    use sessionlens_runtime_config::ViewerConfig;

    #[test]
    fn lists_sessions_with_metadata() {
        let backend = FakeBackend {
            sessions: vec![summary("s1", "web"), summary("s2", "cli")],
            ..FakeBackend::default()
        };
        let mut app = App::new(&ViewerConfig::default());
        app.startup(None);
        drain(&mut app, &backend);

        let text = draw(&mut app, 100, 20);
        assert!(text.contains(" Sessions "));
        assert!(text.contains(" > "));
        assert!(text.contains("first message of s1"));
        assert!(text.contains("3 msgs"));
        assert!(text.contains(" CC "));
    }

    #[test]
    fn empty_list_explains_project_filter() {
        let backend = FakeBackend {
            projects: vec!["web".into()],
            ..FakeBackend::default()
        };
        let mut app = App::new(&ViewerConfig::default());
        app.startup(None);
        drain(&mut app, &backend);
        app.handle_key(KeyCode::Char('p'));
        drain(&mut app, &backend);

        let text = draw(&mut app, 100, 20);
        assert!(text.contains("[project:web]"));
        assert!(text.contains("No sessions in this project"));
    }
}
