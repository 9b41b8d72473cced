use crate::app::App;
use crate::theme::{self, Theme};
use crate::views::truncate;
use ratatui::prelude::*;
use ratatui::widgets::{HighlightSpacing, List, ListItem, Paragraph};
use sessionlens_api::SearchHit;
use sessionlens_api::highlight;

pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let title = format!(
        " Search: {} ({}) ",
        truncate(app.last_search.as_deref().unwrap_or_default(), 40),
        app.search_results.len()
    );

    if app.search_results.is_empty() {
        let paragraph = Paragraph::new("No matching messages.")
            .block(Theme::block_dim().title(title).padding(Theme::PADDING_CARD))
            .style(Style::new().fg(Color::DarkGray));
        frame.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = app.search_results.iter().map(hit_item).collect();
    let list = List::new(items)
        .block(Theme::block_dim().title(title))
        .highlight_style(
            Style::new()
                .bg(Theme::BG_SURFACE)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol(" > ")
        .highlight_spacing(HighlightSpacing::Always);

    frame.render_stateful_widget(list, area, &mut app.search_state);
}

fn hit_item(hit: &SearchHit) -> ListItem<'static> {
    let header = Line::from(vec![
        Span::styled(
            theme::role_badge(hit.role),
            Style::new()
                .fg(Color::Black)
                .bg(theme::role_color(hit.role))
                .bold(),
        ),
        Span::raw(" "),
        Span::styled(hit.project.clone(), Style::new().fg(Color::Blue)),
        Span::styled("  ", Style::new().fg(Theme::TEXT_MUTED)),
        Span::styled(hit.session_id.clone(), Style::new().fg(Theme::TEXT_SECONDARY)),
        Span::styled(
            format!(" #{}", hit.msg_id),
            Style::new().fg(Theme::TEXT_MUTED),
        ),
    ]);

    ListItem::new(vec![header, snippet_line(hit), Line::raw("")])
}

/// The snippet with `<mark>` ranges highlighted; falls back to the content.
fn snippet_line(hit: &SearchHit) -> Line<'static> {
    let source = if hit.snippet.trim().is_empty() {
        hit.content.as_str()
    } else {
        hit.snippet.as_str()
    };
    let mut spans = vec![Span::raw("   ")];
    for segment in highlight::segments(source) {
        let text = segment.text.replace('\n', " ");
        let style = if segment.highlighted {
            Style::new().fg(Theme::MARK_FG).bg(Theme::MARK_BG).bold()
        } else {
            Style::new().fg(Theme::TEXT_CONTENT)
        };
        spans.push(Span::styled(text, style));
    }
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sessionlens_api::{MessageId, Role};

    fn hit(snippet: &str) -> SearchHit {
        SearchHit {
            session_id: "s1".into(),
            msg_id: MessageId::from("m3"),
            project: "web".into(),
            role: Role::User,
            content: "why is the cache stale".into(),
            snippet: snippet.into(),
        }
    }

    #[test]
    fn marked_ranges_get_highlight_style() {
        let line = snippet_line(&hit("the <mark>cache</mark> is stale"));
        let marked: Vec<_> = line
            .spans
            .iter()
            .filter(|s| s.style.bg == Some(Theme::MARK_BG))
            .map(|s| s.content.to_string())
            .collect();
        assert_eq!(marked, vec!["cache".to_string()]);
    }

    #[test]
    fn empty_snippet_falls_back_to_content() {
        let line = snippet_line(&hit(""));
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, "   why is the cache stale");
    }
}
