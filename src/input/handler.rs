use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEventKind};
use ratatui::layout::Position;

use super::keybindings::{Action, KeyBindings};
use crate::app::state::{AppState, ComposerField, Modal, View};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputResult {
    Continue,
    Quit,
    Action(Action),
    Char(char),
    Backspace,
    /// Mouse button pressed at a screen cell
    Pointer(Position),
    Resize(u16, u16),
}

pub fn handle_input(event: Event, state: &AppState, bindings: &KeyBindings) -> InputResult {
    match event {
        Event::Key(key_event) if key_event.kind != KeyEventKind::Release => {
            handle_key(key_event, state, bindings)
        }
        Event::Mouse(mouse) if matches!(mouse.kind, MouseEventKind::Down(_)) => {
            InputResult::Pointer(Position::new(mouse.column, mouse.row))
        }
        Event::Resize(width, height) => InputResult::Resize(width, height),
        _ => InputResult::Continue,
    }
}

/// Modal precedence: notice, assist prompt, file browser, assist menu,
/// then the composer or home screen.
fn handle_key(key: KeyEvent, state: &AppState, bindings: &KeyBindings) -> InputResult {
    match &state.modal {
        Modal::Notice(_) => return handle_notice_input(key),
        Modal::AssistPrompt { .. } => return handle_prompt_input(key),
        Modal::FileBrowser(_) => return handle_browser_input(key, bindings),
        Modal::None => {}
    }

    if state.assist.menu.is_some() {
        return handle_menu_input(key, bindings);
    }

    match &state.view {
        View::Composer { field, .. } => handle_composer_input(key, *field, bindings),
        View::Home => handle_home_input(key, bindings),
    }
}

fn handle_notice_input(key: KeyEvent) -> InputResult {
    match key.code {
        KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ') => {
            InputResult::Action(Action::DismissNotice)
        }
        _ => InputResult::Continue,
    }
}

fn handle_prompt_input(key: KeyEvent) -> InputResult {
    match key.code {
        KeyCode::Char(c) => InputResult::Char(c),
        KeyCode::Backspace => InputResult::Backspace,
        KeyCode::Enter => InputResult::Action(Action::SubmitPrompt),
        KeyCode::Esc => InputResult::Action(Action::CancelPrompt),
        _ => InputResult::Continue,
    }
}

fn handle_browser_input(key: KeyEvent, bindings: &KeyBindings) -> InputResult {
    // In file browser: j/k navigate, Space marks, Enter opens or confirms
    if let Some(action) = bindings.get(&key) {
        match action {
            Action::Up => return InputResult::Action(Action::BrowserUp),
            Action::Down => return InputResult::Action(Action::BrowserDown),
            _ => {}
        }
    }

    match key.code {
        KeyCode::Up => InputResult::Action(Action::BrowserUp),
        KeyCode::Down => InputResult::Action(Action::BrowserDown),
        KeyCode::Char(' ') => InputResult::Action(Action::BrowserMark),
        KeyCode::Enter => InputResult::Action(Action::BrowserEnter),
        KeyCode::Backspace | KeyCode::Left | KeyCode::Char('h') => {
            InputResult::Action(Action::BrowserParent)
        }
        KeyCode::Esc => InputResult::Action(Action::BrowserCancel),
        _ => InputResult::Continue,
    }
}

fn handle_menu_input(key: KeyEvent, bindings: &KeyBindings) -> InputResult {
    // The open menu swallows every other key
    if let Some(action) = bindings.get(&key) {
        match action {
            Action::Up => return InputResult::Action(Action::MenuUp),
            Action::Down => return InputResult::Action(Action::MenuDown),
            Action::AssistMenu => return InputResult::Action(Action::MenuClose),
            _ => {}
        }
    }

    match key.code {
        KeyCode::Up => InputResult::Action(Action::MenuUp),
        KeyCode::Down => InputResult::Action(Action::MenuDown),
        KeyCode::Enter => InputResult::Action(Action::MenuSelect),
        KeyCode::Esc => InputResult::Action(Action::MenuClose),
        _ => InputResult::Continue,
    }
}

fn handle_composer_input(key: KeyEvent, field: ComposerField, bindings: &KeyBindings) -> InputResult {
    if key.code == KeyCode::Tab {
        return InputResult::Action(Action::NextField);
    }

    if let Some(action) = bindings.get(&key) {
        match action {
            Action::Send
            | Action::Cancel
            | Action::NextField
            | Action::PrevField
            | Action::ToggleCcBcc
            | Action::ToggleFormatting
            | Action::Attach
            | Action::RemoveAttachment
            | Action::AssistMenu => return InputResult::Action(action),
            Action::Back => return InputResult::Action(Action::Cancel),
            _ => {}
        }
    }

    if field == ComposerField::Attachments {
        return handle_attachment_panel_input(key, bindings);
    }

    match key.code {
        // Unbound chords are not text
        KeyCode::Char(_) if key.modifiers.contains(KeyModifiers::CONTROL) => InputResult::Continue,
        KeyCode::Char(c) => InputResult::Char(c),
        KeyCode::Backspace => InputResult::Backspace,
        KeyCode::Enter if field == ComposerField::Body => InputResult::Char('\n'),
        KeyCode::Enter => InputResult::Action(Action::NextField),
        _ => InputResult::Continue,
    }
}

fn handle_attachment_panel_input(key: KeyEvent, bindings: &KeyBindings) -> InputResult {
    if let Some(action @ (Action::Up | Action::Down)) = bindings.get(&key) {
        return InputResult::Action(action);
    }

    match key.code {
        KeyCode::Up => InputResult::Action(Action::Up),
        KeyCode::Down => InputResult::Action(Action::Down),
        KeyCode::Delete | KeyCode::Backspace | KeyCode::Char('x') => {
            InputResult::Action(Action::RemoveAttachment)
        }
        _ => InputResult::Continue,
    }
}

fn handle_home_input(key: KeyEvent, bindings: &KeyBindings) -> InputResult {
    match bindings.get(&key) {
        Some(Action::Quit) | Some(Action::Back) => InputResult::Quit,
        Some(Action::Compose) | Some(Action::Open) => InputResult::Action(Action::Compose),
        _ => InputResult::Continue,
    }
}
