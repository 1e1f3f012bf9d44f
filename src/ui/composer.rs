use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Position, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};
use unicode_width::UnicodeWidthStr;

use super::modals::{render_assist_prompt, render_file_browser, render_notice};
use super::overlay::render_overlay_menu;
use super::theme::{Theme, borders, symbols, with_selection_bg};
use super::widgets::{error_bar, help_bar, status_line, truncate_string};
use crate::app::state::{AppState, ComposerField, Modal};
use crate::compose::{Draft, DraftField};
use crate::constants::{MAX_ATTACHMENT_ROWS, MIN_ASSIST_BUTTON_WIDTH};

const SEND_LABEL: &str = " Send ";

fn assist_label() -> String {
    format!(" {} AI ", symbols::ASSIST)
}

/// Where everything in the composer sits for a given frame size.
///
/// Shared by rendering and pointer hit-testing so both agree on what is
/// under the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComposerLayout {
    pub header: Rect,
    /// Trigger for the assist menu; `None` when the header is too narrow
    pub ai_button: Option<Rect>,
    pub send_button: Rect,
    pub to: Rect,
    pub cc: Option<Rect>,
    pub bcc: Option<Rect>,
    pub subject: Rect,
    pub toolbar: Option<Rect>,
    pub body: Rect,
    pub attachments: Option<Rect>,
    pub help: Rect,
}

impl ComposerLayout {
    pub fn compute(area: Rect, draft: &Draft) -> Self {
        let expanded = draft.cc_bcc_expanded;
        let attachment_count = u16::try_from(draft.attachments().len()).unwrap_or(u16::MAX);

        let mut constraints = vec![Constraint::Length(1), Constraint::Length(3)];
        if expanded {
            constraints.extend([Constraint::Length(3), Constraint::Length(3)]);
        }
        constraints.push(Constraint::Length(3));
        if draft.formatting_open {
            constraints.push(Constraint::Length(1));
        }
        constraints.push(Constraint::Min(3));
        if attachment_count > 0 {
            constraints.push(Constraint::Length(
                attachment_count.min(MAX_ATTACHMENT_ROWS) + 2,
            ));
        }
        constraints.push(Constraint::Length(1));

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);
        let mut next = chunks.iter().copied();
        let mut take = || next.next().unwrap_or_default();

        let header = take();
        let to = take();
        let (cc, bcc) = if expanded {
            (Some(take()), Some(take()))
        } else {
            (None, None)
        };
        let subject = take();
        let toolbar = draft.formatting_open.then(&mut take);
        let body = take();
        let attachments = (attachment_count > 0).then(&mut take);
        let help = take();

        let send_width = SEND_LABEL.width() as u16;
        let send_button = Rect::new(
            header.right().saturating_sub(send_width),
            header.y,
            send_width.min(header.width),
            header.height,
        );
        let ai_button = (header.width >= MIN_ASSIST_BUTTON_WIDTH).then(|| {
            let width = assist_label().width() as u16;
            Rect::new(
                send_button.x.saturating_sub(width + 1),
                header.y,
                width,
                header.height,
            )
        });

        Self {
            header,
            ai_button,
            send_button,
            to,
            cc,
            bcc,
            subject,
            toolbar,
            body,
            attachments,
            help,
        }
    }

    /// The focusable region under a screen cell
    pub fn field_at(&self, at: Position) -> Option<ComposerField> {
        let regions = [
            (Some(self.to), ComposerField::To),
            (self.cc, ComposerField::Cc),
            (self.bcc, ComposerField::Bcc),
            (Some(self.subject), ComposerField::Subject),
            (Some(self.body), ComposerField::Body),
            (self.attachments, ComposerField::Attachments),
        ];
        regions
            .into_iter()
            .find(|(rect, _)| rect.is_some_and(|r| r.contains(at)))
            .map(|(_, field)| field)
    }

    /// Attachment index under a screen cell
    pub fn attachment_at(&self, at: Position, scroll: usize) -> Option<usize> {
        let panel = self.attachments?;
        if !panel.contains(at) || at.y == panel.y || at.y + 1 >= panel.bottom() {
            return None;
        }
        Some((at.y - panel.y - 1) as usize + scroll)
    }
}

/// First attachment row shown so the cursor stays visible
pub fn attachment_scroll(cursor: usize) -> usize {
    cursor.saturating_sub(MAX_ATTACHMENT_ROWS as usize - 1)
}

pub fn render_composer(frame: &mut Frame, state: &AppState, draft: &Draft, field: ComposerField) {
    frame.render_widget(Block::default().style(Theme::main_bg()), frame.area());
    let layout = ComposerLayout::compute(frame.area(), draft);

    render_header(frame, &layout, state);

    render_field(frame, layout.to, DraftField::To.label(), &draft.to, field == ComposerField::To);
    if let Some(cc) = layout.cc {
        render_field(frame, cc, DraftField::Cc.label(), &draft.cc, field == ComposerField::Cc);
    }
    if let Some(bcc) = layout.bcc {
        render_field(frame, bcc, DraftField::Bcc.label(), &draft.bcc, field == ComposerField::Bcc);
    }
    render_field(
        frame,
        layout.subject,
        DraftField::Subject.label(),
        &draft.subject,
        field == ComposerField::Subject,
    );
    if let Some(toolbar) = layout.toolbar {
        render_toolbar(frame, toolbar);
    }
    render_body_field(frame, layout.body, &draft.body, field == ComposerField::Body);
    if let Some(panel) = layout.attachments {
        render_attachments(
            frame,
            panel,
            draft,
            state.attachment_cursor,
            field == ComposerField::Attachments,
        );
    }

    if let Some(ref error) = state.status.error {
        error_bar(frame, layout.help, error);
    } else if state.assist.pending.is_some() {
        status_line(frame, layout.help, &state.status.message);
    } else {
        let hints: &[(&str, &str)] = if field == ComposerField::Attachments {
            &[
                ("↑/↓", "select"),
                ("x", "remove"),
                ("Tab", "next"),
                ("Ctrl+S", "send"),
                ("Esc", "cancel"),
            ]
        } else {
            &[
                ("Tab", "next"),
                ("Ctrl+S", "send"),
                ("Ctrl+O", "attach"),
                ("Ctrl+P", "AI"),
                ("Ctrl+E", "cc/bcc"),
                ("Ctrl+F", "format"),
                ("Esc", "cancel"),
            ]
        };
        help_bar(frame, layout.help, hints);
    }

    match &state.modal {
        Modal::None => {}
        Modal::Notice(message) => render_notice(frame, message),
        Modal::FileBrowser(browser) => render_file_browser(frame, browser),
        Modal::AssistPrompt { input } => render_assist_prompt(frame, input),
    }

    // Top layer
    if let Some(ref menu) = state.assist.menu {
        render_overlay_menu(frame, menu);
    }
}

fn render_header(frame: &mut Frame, layout: &ComposerLayout, state: &AppState) {
    frame.render_widget(Block::default().style(Theme::status_bar()), layout.header);

    let mut spans = vec![
        Span::styled(" New message ", Theme::status_bar()),
        Span::styled(format!(" {} ", state.from), Theme::help_desc()),
    ];
    if !state.status.message.is_empty() && state.assist.pending.is_none() {
        spans.push(Span::styled(
            format!("· {}", state.status.message),
            Theme::help_desc(),
        ));
    }
    let title = Line::from(spans);
    frame.render_widget(Paragraph::new(title), layout.header);

    if let Some(ai) = layout.ai_button {
        let menu_open = state.assist.menu.is_some();
        frame.render_widget(
            Paragraph::new(assist_label()).style(Theme::assist_button(menu_open)),
            ai,
        );
    }
    frame.render_widget(
        Paragraph::new(SEND_LABEL).style(Theme::button()),
        layout.send_button,
    );
}

fn field_block(label: &str, focused: bool) -> Block<'static> {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(format!(" {} ", label), Theme::label()));
    if focused {
        block
            .border_style(Theme::border_focused())
            .border_type(borders::input_focused())
    } else {
        block.border_style(Theme::border())
    }
}

fn render_field(frame: &mut Frame, area: Rect, label: &str, value: &str, focused: bool) {
    let block = field_block(label, focused);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let style = if focused {
        Theme::text()
    } else {
        Theme::text_secondary()
    };

    // Keep the tail (where typing happens) visible
    let available = inner.width.saturating_sub(1) as usize;
    let mut shown: String = value.to_string();
    while shown.width() > available && !shown.is_empty() {
        shown.remove(0);
    }
    if focused {
        shown.push('│');
    }

    frame.render_widget(Paragraph::new(shown).style(style), inner);
}

fn render_toolbar(frame: &mut Frame, area: Rect) {
    // Display only; formatting is not applied to the plain text body
    let tools = ["B", "I", "U", "• List", "1. List", "Link", "Quote"];
    let mut spans = vec![Span::styled(" ", Theme::text_muted())];
    for tool in tools {
        spans.push(Span::styled(format!("[{}]", tool), Theme::text_accent()));
        spans.push(Span::styled(" ", Theme::text_muted()));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_body_field(frame: &mut Frame, area: Rect, body: &str, focused: bool) {
    let title = format!("Body ({} chars)", body.chars().count());
    let block = field_block(&title, focused);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let style = if focused {
        Theme::text()
    } else {
        Theme::text_secondary()
    };
    let text = if focused {
        format!("{}│", body)
    } else {
        body.to_string()
    };

    // Scroll so the last lines (where the cursor is) stay in view
    let line_count = text.lines().count().max(1) as u16 + u16::from(text.ends_with('\n'));
    let scroll = line_count.saturating_sub(inner.height);

    let paragraph = Paragraph::new(text)
        .style(style)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    frame.render_widget(paragraph, inner);
}

fn render_attachments(frame: &mut Frame, area: Rect, draft: &Draft, cursor: usize, focused: bool) {
    let attachments = draft.attachments();
    let block = field_block(&format!("Attachments ({})", attachments.len()), focused);
    let inner = block.inner(area);

    let scroll = attachment_scroll(cursor);
    let name_width = (inner.width as usize).saturating_sub(14);
    let items: Vec<ListItem> = attachments
        .iter()
        .enumerate()
        .skip(scroll)
        .take(inner.height as usize)
        .map(|(idx, attachment)| {
            let selected = focused && idx == cursor;
            let style = if selected {
                Theme::selected()
            } else {
                Theme::text()
            };
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!(" {} ", symbols::ATTACHMENT),
                    with_selection_bg(Theme::text_accent(), selected),
                ),
                Span::styled(truncate_string(&attachment.name, name_width), style),
                Span::styled(
                    format!("  {}", attachment.display_size()),
                    with_selection_bg(Theme::text_muted(), selected),
                ),
            ]))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::AttachmentHandle;
    use std::path::PathBuf;

    fn handle(name: &str) -> AttachmentHandle {
        AttachmentHandle {
            path: PathBuf::from(name),
            name: name.to_string(),
            size: 10,
        }
    }

    #[test]
    fn test_collapsed_layout() {
        let layout = ComposerLayout::compute(Rect::new(0, 0, 80, 24), &Draft::new());
        assert_eq!(layout.header, Rect::new(0, 0, 80, 1));
        assert_eq!(layout.to, Rect::new(0, 1, 80, 3));
        assert!(layout.cc.is_none() && layout.bcc.is_none());
        assert_eq!(layout.subject.y, 4);
        assert_eq!(layout.body.y, 7);
        assert!(layout.attachments.is_none());
        assert_eq!(layout.help, Rect::new(0, 23, 80, 1));
    }

    #[test]
    fn test_expanded_layout_with_toolbar_and_attachments() {
        let mut draft = Draft::new();
        draft.toggle_cc_bcc();
        draft.toggle_formatting();
        draft.add_attachments([handle("a"), handle("b")]);

        let layout = ComposerLayout::compute(Rect::new(0, 0, 80, 30), &draft);
        assert_eq!(layout.cc, Some(Rect::new(0, 4, 80, 3)));
        assert_eq!(layout.bcc, Some(Rect::new(0, 7, 80, 3)));
        assert_eq!(layout.subject.y, 10);
        assert_eq!(layout.toolbar, Some(Rect::new(0, 13, 80, 1)));
        assert_eq!(layout.attachments.map(|r| r.height), Some(4));
        assert_eq!(layout.help.y, 29);
    }

    #[test]
    fn test_buttons_right_aligned() {
        let layout = ComposerLayout::compute(Rect::new(0, 0, 80, 24), &Draft::new());
        assert_eq!(layout.send_button.right(), 80);
        let ai = layout.ai_button.unwrap();
        assert_eq!(ai.y, 0);
        assert_eq!(ai.right() + 1, layout.send_button.x);
    }

    #[test]
    fn test_narrow_header_unmounts_ai_button() {
        let layout = ComposerLayout::compute(Rect::new(0, 0, 30, 24), &Draft::new());
        assert!(layout.ai_button.is_none());
    }

    #[test]
    fn test_field_hit_testing() {
        let mut draft = Draft::new();
        draft.add_attachments([handle("a"), handle("b"), handle("c")]);
        let layout = ComposerLayout::compute(Rect::new(0, 0, 80, 24), &draft);

        assert_eq!(layout.field_at(Position::new(5, 2)), Some(ComposerField::To));
        assert_eq!(layout.field_at(Position::new(5, 5)), Some(ComposerField::Subject));
        assert_eq!(layout.field_at(Position::new(5, 0)), None);

        let panel = layout.attachments.unwrap();
        assert_eq!(
            layout.field_at(Position::new(3, panel.y + 1)),
            Some(ComposerField::Attachments)
        );
        assert_eq!(layout.attachment_at(Position::new(3, panel.y + 2), 0), Some(1));
        assert_eq!(layout.attachment_at(Position::new(3, panel.y), 0), None);
    }

    #[test]
    fn test_field_title_uses_draft_label() {
        use ratatui::{buffer::Buffer, widgets::Widget};

        let area = Rect::new(0, 0, 20, 3);
        let mut buf = Buffer::empty(area);
        field_block(DraftField::Subject.label(), false).render(area, &mut buf);

        let top: String = (0..area.width).map(|x| buf[(x, 0)].symbol()).collect();
        assert!(top.contains(" Subject "));
    }

    #[test]
    fn test_attachment_scroll_follows_cursor() {
        assert_eq!(attachment_scroll(0), 0);
        assert_eq!(attachment_scroll(3), 0);
        assert_eq!(attachment_scroll(5), 2);
    }
}
