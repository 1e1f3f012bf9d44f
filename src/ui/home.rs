use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    text::{Line, Span},
    widgets::{Block, Paragraph},
};

use super::components::centered_rect_constrained;
use super::theme::{Theme, symbols};
use super::widgets::{error_bar, help_bar, truncate_string};
use crate::app::state::AppState;

pub fn render_home(frame: &mut Frame, state: &AppState) {
    frame.render_widget(Block::default().style(Theme::main_bg()), frame.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(frame.area());

    let card = centered_rect_constrained(chunks[0], 30, 64, 6, 8);
    let width = card.width.saturating_sub(2) as usize;

    let mut lines = vec![
        Line::from(Span::styled("posta", Theme::title())),
        Line::from(Span::styled(state.from.clone(), Theme::text_muted())),
        Line::default(),
    ];

    match &state.last_sent {
        Some(sent) => {
            lines.push(Line::from(vec![
                Span::styled(format!("{} ", symbols::SENT), Theme::text_success()),
                Span::styled(
                    truncate_string(&format!("Sent to {}", sent.to), width.saturating_sub(2)),
                    Theme::text(),
                ),
            ]));
            let mut detail = format!("\"{}\"", sent.subject);
            if sent.attachments > 0 {
                detail.push_str(&format!(
                    " {} {}",
                    symbols::ATTACHMENT,
                    sent.attachments
                ));
            }
            lines.push(Line::from(Span::styled(
                truncate_string(&detail, width),
                Theme::text_secondary(),
            )));
            lines.push(Line::from(Span::styled(
                format!("{} · {}", sent.at.format("%H:%M"), sent.id),
                Theme::text_muted(),
            )));
        }
        None => lines.push(Line::from(Span::styled(
            "No messages sent yet",
            Theme::text_muted(),
        ))),
    }

    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), card);

    if let Some(ref error) = state.status.error {
        error_bar(frame, chunks[1], error);
    } else {
        help_bar(
            frame,
            chunks[1],
            &[
                (state.keys.compose.as_str(), "new message"),
                (state.keys.quit.as_str(), "quit"),
            ],
        );
    }
}
