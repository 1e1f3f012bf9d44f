use ratatui::{
    Frame,
    widgets::{Block, Borders, Clear, List, ListItem},
};

use super::anchored::OverlayView;
use crate::ui::theme::{Theme, borders};

/// Draw an open overlay. Call last so it sits above every other layer.
pub fn render_overlay_menu(frame: &mut Frame, view: &OverlayView) {
    let area = view.area.intersection(frame.area());
    if area.is_empty() {
        return;
    }

    frame.render_widget(Clear, area);

    let items: Vec<ListItem> = view
        .labels
        .iter()
        .enumerate()
        .map(|(idx, label)| {
            let style = if idx == view.highlighted {
                Theme::selected()
            } else {
                Theme::text()
            };
            ListItem::new(format!(" {} ", label)).style(style)
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(borders::popup())
            .border_style(Theme::border_focused())
            .style(Theme::main_bg()),
    );

    frame.render_widget(list, area);
}
