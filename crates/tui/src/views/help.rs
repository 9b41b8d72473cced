use crate::theme::Theme;
use ratatui::prelude::*;
use ratatui::widgets::{Clear, Paragraph};

const SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "Global",
        &[
            ("?", "Toggle this help"),
            ("/", "Search messages"),
            ("s", "Sync sessions on the server"),
            ("q", "Quit"),
        ],
    ),
    (
        "Session List",
        &[
            ("j/k", "Navigate up/down"),
            ("g/G", "Jump to first/last"),
            ("PgDn/PgUp", "Move 10 sessions"),
            ("Enter", "Open session"),
            ("p", "Cycle project filter"),
        ],
    ),
    (
        "Session Detail",
        &[
            ("j/k", "Select next/previous message"),
            ("J/K, ]/[", "Next/previous session"),
            ("PgDn/PgUp", "Scroll one screen"),
            ("g/G", "First message / follow the tail"),
            ("o", "Toggle oldest/newest first"),
            ("t", "Compact/full tool output"),
            ("click", "Select message, jump via minimap"),
            ("Esc", "Back"),
        ],
    ),
    (
        "Search",
        &[
            ("Enter", "Run query / open hit"),
            ("Esc", "Cancel / close results"),
        ],
    ),
];

pub fn render(frame: &mut Frame, area: Rect) {
    // Center the help overlay
    let popup_width = 60u16.min(area.width.saturating_sub(4));
    let popup_height = 32u16.min(area.height.saturating_sub(4));
    let x = (area.width.saturating_sub(popup_width)) / 2;
    let y = (area.height.saturating_sub(popup_height)) / 2;
    let popup_area = Rect::new(x, y, popup_width, popup_height);

    frame.render_widget(Clear, popup_area);

    let block = Theme::block_accent()
        .title(" Keyboard Shortcuts ")
        .padding(Theme::PADDING_CARD);
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let key_style = Style::new().fg(Theme::ACCENT_YELLOW).bold();
    let desc_style = Style::new().fg(Theme::TEXT_CONTENT);
    let header_style = Style::new().fg(Theme::ACCENT_BLUE).bold();
    let close_hint_line = Line::from(Span::styled(
        "Press any key to close",
        Style::new().fg(Color::DarkGray),
    ));

    let mut lines = Vec::new();
    for (title, entries) in SECTIONS {
        if !lines.is_empty() {
            lines.push(Line::raw(""));
        }
        lines.push(Line::from(Span::styled(
            format!("── {title} ──"),
            header_style,
        )));
        for (key, desc) in entries.iter() {
            lines.push(Line::from(vec![
                Span::styled(format!("  {key:<10}"), key_style),
                Span::styled(*desc, desc_style),
            ]));
        }
    }
    lines.push(Line::raw(""));
    lines.push(close_hint_line.clone());

    // Keep close hint visible even when the help body exceeds the popup height.
    let max_lines = inner.height as usize;
    if max_lines == 0 {
        return;
    }
    if lines.len() > max_lines {
        lines.truncate(max_lines);
        if let Some(last) = lines.last_mut() {
            *last = close_hint_line;
        }
    }

    frame.render_widget(Paragraph::new(lines), inner);
}
