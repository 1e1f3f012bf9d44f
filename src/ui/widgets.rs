//! Common UI widgets and utilities

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
};
use unicode_width::UnicodeWidthStr;

use super::theme::Theme;

pub fn error_bar(frame: &mut Frame, area: Rect, message: &str) {
    let paragraph = Paragraph::new(format!(" Error: {} ", message)).style(Theme::error_bar());
    frame.render_widget(paragraph, area);
}

pub fn status_line(frame: &mut Frame, area: Rect, message: &str) {
    let paragraph = Paragraph::new(format!(" {} ", message)).style(Theme::status_bar());
    frame.render_widget(paragraph, area);
}

/// Key hints that fit the width, dropping from the right
pub fn help_bar(frame: &mut Frame, area: Rect, hints: &[(&str, &str)]) {
    let available_width = area.width as usize;

    // Format: " key desc │" (separator between hints)
    let mut total_width = 0;
    let mut hints_to_show = 0;
    for (i, (key, desc)) in hints.iter().enumerate() {
        let separator = if i + 1 < hints.len() { 3 } else { 1 };
        let width = key.width() + 2 + desc.width() + separator;
        if total_width + width > available_width {
            break;
        }
        total_width += width;
        hints_to_show += 1;
    }

    // Show at least one hint if possible
    hints_to_show = hints_to_show.max(1).min(hints.len());

    let mut spans: Vec<Span> = Vec::new();
    for (i, (key, desc)) in hints.iter().take(hints_to_show).enumerate() {
        spans.push(Span::styled(format!(" {} ", key), Theme::help_key()));
        spans.push(Span::styled(desc.to_string(), Theme::help_desc()));
        if i + 1 < hints_to_show {
            spans.push(Span::styled(" │ ", Theme::help_desc()));
        }
    }
    spans.push(Span::styled(" ", Theme::help_desc()));

    let paragraph = Paragraph::new(Line::from(spans)).style(Theme::help_bar());
    frame.render_widget(paragraph, area);
}

/// Shorten to `max_width` display columns, ending in "..." when cut
pub fn truncate_string(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    if max_width <= 3 {
        return s.chars().take(max_width).collect();
    }

    let mut out = String::new();
    let mut width = 0;
    for c in s.chars() {
        let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
        if width + w > max_width - 3 {
            break;
        }
        width += w;
        out.push(c);
    }
    out.push_str("...");
    out
}
