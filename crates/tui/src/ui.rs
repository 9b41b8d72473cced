use crate::app::{App, FlashLevel, ServerStatus, View};
use crate::theme::Theme;
use crate::views::{help, search, session_detail, session_list};
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

pub fn render(frame: &mut Frame, app: &mut App) {
    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    render_header(frame, app, header_area);

    // Help is an overlay; keep drawing whatever it was opened from.
    let body_view = if app.view == View::Help {
        app.help_return()
    } else {
        app.view
    };
    match body_view {
        View::SessionList | View::Help => session_list::render(frame, app, body_area),
        View::SessionDetail => session_detail::render(frame, app, body_area),
        View::SearchResults => search::render(frame, app, body_area),
    }

    render_footer(frame, app, footer_area);

    if app.view == View::Help {
        help::render(frame, frame.area());
    }
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let block = Theme::block();
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let count_span = if app.loading_sessions {
        Span::styled("Loading...", Style::new().fg(Theme::ACCENT_YELLOW).italic())
    } else {
        Span::styled(
            format!("{} sessions", app.sessions.len()),
            Style::new().fg(Theme::TEXT_SECONDARY),
        )
    };

    let mut left = vec![
        Span::styled(
            " sessionlens ",
            Style::new().fg(Theme::ACCENT_ORANGE).bold(),
        ),
        Span::raw(" "),
        count_span,
    ];
    if let Some(project) = &app.project_filter {
        left.push(Span::styled(
            format!("  project:{project}"),
            Style::new().fg(Theme::ACCENT_PURPLE),
        ));
    }

    let right = Line::from(server_status_spans(app)).alignment(Alignment::Right);
    frame.render_widget(Paragraph::new(Line::from(left)), inner);
    frame.render_widget(Paragraph::new(right), inner);
}

fn server_status_spans(app: &App) -> Vec<Span<'_>> {
    let display_url = app
        .server_url
        .trim_start_matches("http://")
        .trim_start_matches("https://");
    let url = Span::styled(
        format!("{display_url} "),
        Style::new().fg(Theme::TEXT_SECONDARY),
    );
    match &app.server_status {
        ServerStatus::Online(version) => vec![
            url,
            Span::styled(
                format!("online v{version} "),
                Style::new().fg(Theme::ACCENT_GREEN),
            ),
        ],
        ServerStatus::Offline => vec![
            url,
            Span::styled("offline ", Style::new().fg(Theme::ACCENT_RED)),
        ],
        ServerStatus::Unknown => vec![url],
    }
}

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let key_style = Style::new().fg(Theme::TEXT_KEY);
    let desc_style = Style::new().fg(Theme::TEXT_KEY_DESC);

    let help = if app.searching {
        Line::from(vec![
            Span::styled(
                " / ",
                Style::new()
                    .fg(Color::Black)
                    .bg(Theme::ACCENT_YELLOW)
                    .bold(),
            ),
            Span::styled(
                format!(" {}", app.search_query),
                Style::new().fg(Theme::TEXT_PRIMARY),
            ),
            Span::styled("_", Style::new().fg(Theme::ACCENT_YELLOW)),
            Span::styled("  ESC cancel  Enter search", desc_style),
        ])
    } else {
        match app.view {
            View::SessionList => Line::from(vec![
                Span::styled(" j/k ", key_style),
                Span::styled("navigate  ", desc_style),
                Span::styled("Enter ", key_style),
                Span::styled("open  ", desc_style),
                Span::styled("/ ", key_style),
                Span::styled("search  ", desc_style),
                Span::styled("p ", key_style),
                Span::styled("project  ", desc_style),
                Span::styled("s ", key_style),
                Span::styled("sync  ", desc_style),
                Span::styled("q ", key_style),
                Span::styled("quit", desc_style),
            ]),
            View::SessionDetail => Line::from(vec![
                Span::styled(" j/k ", key_style),
                Span::styled("select  ", desc_style),
                Span::styled("J/K ", key_style),
                Span::styled("session  ", desc_style),
                Span::styled("g/G ", key_style),
                Span::styled("first/last  ", desc_style),
                Span::styled("o ", key_style),
                Span::styled("order  ", desc_style),
                Span::styled("t ", key_style),
                Span::styled("tools  ", desc_style),
                Span::styled("Esc ", key_style),
                Span::styled("back", desc_style),
            ]),
            View::SearchResults => Line::from(vec![
                Span::styled(" j/k ", key_style),
                Span::styled("navigate  ", desc_style),
                Span::styled("Enter ", key_style),
                Span::styled("open  ", desc_style),
                Span::styled("/ ", key_style),
                Span::styled("new search  ", desc_style),
                Span::styled("Esc ", key_style),
                Span::styled("close", desc_style),
            ]),
            View::Help => Line::raw(""),
        }
    };

    let mut spans = help.spans;
    // Append flash message to any view's footer
    if let Some((ref msg, level)) = app.flash_message {
        let color = match level {
            FlashLevel::Success => Theme::ACCENT_GREEN,
            FlashLevel::Error => Theme::ACCENT_RED,
            FlashLevel::Info => Theme::ACCENT_BLUE,
        };
        spans.push(Span::styled("  ", Style::new()));
        spans.push(Span::styled(msg.as_str(), Style::new().fg(color)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
