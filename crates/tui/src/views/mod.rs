pub mod help;
pub mod minimap;
pub mod search;
pub mod session_detail;
pub mod session_list;

use chrono::{DateTime, Datelike, Local, Utc};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{}…", truncated)
    }
}

pub fn format_relative_datetime(dt: DateTime<Utc>) -> String {
    let local = dt.with_timezone(&Local);
    let today = Local::now().date_naive();
    let date = local.date_naive();
    let diff = today.signed_duration_since(date).num_days();

    if diff == 0 {
        // Today → show time only
        local.format("%H:%M").to_string()
    } else if diff == 1 {
        "yesterday".to_string()
    } else if (2..=7).contains(&diff) {
        format!("{}d ago", diff)
    } else if date.year() == today.year() {
        local.format("%m/%d").to_string()
    } else {
        local.format("%y/%m/%d").to_string()
    }
}

/// Cut `text` to at most `max_width` display columns.
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    if text.is_empty() || max_width == 0 {
        return String::new();
    }
    if UnicodeWidthStr::width(text) <= max_width {
        return text.to_string();
    }

    let mut output = String::new();
    let mut width = 0usize;
    for ch in text.chars() {
        let ch_width = UnicodeWidthChar::width(ch).unwrap_or(1);
        if output.is_empty() && ch_width > max_width {
            output.push(ch);
            break;
        }
        if width + ch_width > max_width {
            break;
        }
        output.push(ch);
        width += ch_width;
    }
    output
}

/// Break one line into chunks of at most `max_width` display columns.
/// Characters wider than the limit get a chunk of their own.
pub fn split_by_width(text: &str, max_width: usize) -> Vec<String> {
    if text.is_empty() {
        return vec![String::new()];
    }
    if max_width == 0 {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0usize;

    for ch in text.chars() {
        let ch_width = UnicodeWidthChar::width(ch).unwrap_or(1);

        if current.is_empty() && ch_width > max_width {
            lines.push(ch.to_string());
            continue;
        }

        if current_width + ch_width > max_width && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
            current_width = 0;
        }

        current.push(ch);
        current_width += ch_width;
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
