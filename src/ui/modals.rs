//! Modal popups drawn over the composer.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};

use super::components::centered_rect_constrained;
use super::theme::{Theme, borders, symbols};
use super::widgets::{help_bar, truncate_string};
use crate::compose::FileBrowser;

fn popup_block(title: &str) -> Block<'static> {
    Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_type(borders::popup())
        .border_style(Theme::border_focused())
        .style(Theme::main_bg())
}

pub fn render_notice(frame: &mut Frame, message: &str) {
    let area = centered_rect_constrained(frame.area(), 30, 60, 5, 9);
    frame.render_widget(Clear, area);

    let block = popup_block("Notice");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(inner);

    let text = Paragraph::new(message.to_string())
        .style(Theme::text())
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(text, chunks[0]);

    let hint = Paragraph::new(Line::from(vec![
        Span::styled("Enter", Theme::help_key()),
        Span::styled(" dismiss", Theme::text_muted()),
    ]))
    .alignment(Alignment::Center);
    frame.render_widget(hint, chunks[1]);
}

pub fn render_assist_prompt(frame: &mut Frame, input: &str) {
    let area = centered_rect_constrained(frame.area(), 30, 70, 5, 5);
    frame.render_widget(Clear, area);

    let block = popup_block(&format!("{} Write with prompt", symbols::ASSIST));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Length(1)])
        .split(inner);

    frame.render_widget(
        Paragraph::new("What should the assistant write?").style(Theme::text_muted()),
        chunks[0],
    );

    let width = chunks[1].width.saturating_sub(1) as usize;
    let mut shown: String = input.to_string();
    while unicode_width::UnicodeWidthStr::width(shown.as_str()) > width && !shown.is_empty() {
        shown.remove(0);
    }
    frame.render_widget(
        Paragraph::new(format!("{}│", shown)).style(Theme::input_highlight()),
        chunks[1],
    );

    help_bar(frame, chunks[2], &[("Enter", "submit"), ("Esc", "cancel")]);
}

pub fn render_file_browser(frame: &mut Frame, browser: &FileBrowser) {
    let area = centered_rect_constrained(frame.area(), 30, 80, 8, 24);
    frame.render_widget(Clear, area);

    let title = truncate_string(
        &format!("Attach: {}", browser.dir.display()),
        area.width.saturating_sub(4) as usize,
    );
    let block = popup_block(&title);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(inner);

    if let Some(ref error) = browser.error {
        frame.render_widget(
            Paragraph::new(error.clone())
                .style(Theme::error_bar())
                .wrap(Wrap { trim: true }),
            chunks[0],
        );
    } else if browser.entries.is_empty() {
        frame.render_widget(
            Paragraph::new("Empty directory")
                .style(Theme::text_muted())
                .alignment(Alignment::Center),
            chunks[0],
        );
    } else {
        let name_width = chunks[0].width.saturating_sub(6) as usize;
        let items: Vec<ListItem> = browser
            .entries
            .iter()
            .enumerate()
            .map(|(idx, entry)| {
                let marker = if entry.is_dir {
                    symbols::DIRECTORY
                } else if browser.marked.contains(&idx) {
                    symbols::MARKED
                } else {
                    symbols::UNMARKED
                };
                let style = if entry.is_dir {
                    Theme::text_accent()
                } else {
                    Theme::text()
                };
                ListItem::new(Line::from(vec![
                    Span::styled(format!(" {} ", marker), Theme::text_secondary()),
                    Span::styled(truncate_string(&entry.name, name_width), style),
                ]))
            })
            .collect();

        let list = List::new(items).highlight_style(Theme::selected());
        let mut list_state = ListState::default().with_selected(Some(browser.selected));
        frame.render_stateful_widget(list, chunks[0], &mut list_state);
    }

    let summary = if browser.marked.is_empty() {
        "open".to_string()
    } else {
        format!("attach {}", browser.marked.len())
    };
    help_bar(
        frame,
        chunks[1],
        &[
            ("Enter", summary.as_str()),
            ("Space", "mark"),
            ("Bksp", "up"),
            ("Esc", "cancel"),
        ],
    );
}
