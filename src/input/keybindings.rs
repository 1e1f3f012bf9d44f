use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

use crate::config::KeybindingMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    // Navigation
    Up,
    Down,
    Open,
    Back,
    Quit,
    Compose,

    // Composer
    NextField,
    PrevField,
    Send,
    Cancel,
    ToggleCcBcc,
    ToggleFormatting,
    Attach,
    RemoveAttachment,
    AssistMenu,

    // Assist menu
    MenuUp,
    MenuDown,
    MenuSelect,
    MenuClose,

    // File browser
    BrowserUp,
    BrowserDown,
    BrowserMark,
    BrowserEnter,
    BrowserParent,
    BrowserCancel,

    // Assist prompt input
    SubmitPrompt,
    CancelPrompt,

    DismissNotice,
}

pub struct KeyBindings {
    bindings: HashMap<KeyEvent, Action>,
}

impl KeyBindings {
    pub fn new(mode: &KeybindingMode) -> Self {
        let mut bindings = match mode {
            KeybindingMode::Vim => Self::vim_bindings(),
            KeybindingMode::Arrows => Self::arrow_bindings(),
        };
        bindings.extend(Self::composer_bindings());
        Self { bindings }
    }

    pub fn get(&self, event: &KeyEvent) -> Option<Action> {
        self.bindings.get(event).copied()
    }

    /// Display string for the first key bound to `action`, e.g. "Ctrl+S"
    pub fn key_for(&self, action: Action) -> Option<String> {
        let mut keys: Vec<String> = self
            .bindings
            .iter()
            .filter(|(_, a)| **a == action)
            .map(|(event, _)| format_key_event(event))
            .collect();
        // HashMap order is arbitrary; shortest name is the friendliest hint
        keys.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));
        keys.into_iter().next()
    }

    fn vim_bindings() -> HashMap<KeyEvent, Action> {
        let mut map = HashMap::new();

        map.insert(key('j'), Action::Down);
        map.insert(key('k'), Action::Up);
        map.insert(key_code(KeyCode::Down), Action::Down);
        map.insert(key_code(KeyCode::Up), Action::Up);
        map.insert(key_code(KeyCode::Enter), Action::Open);
        map.insert(key_code(KeyCode::Esc), Action::Back);
        map.insert(key('q'), Action::Quit);
        map.insert(key('c'), Action::Compose);

        map
    }

    fn arrow_bindings() -> HashMap<KeyEvent, Action> {
        let mut map = HashMap::new();

        map.insert(key_code(KeyCode::Down), Action::Down);
        map.insert(key_code(KeyCode::Up), Action::Up);
        map.insert(key_code(KeyCode::Enter), Action::Open);
        map.insert(key_code(KeyCode::Esc), Action::Back);
        map.insert(ctrl_key('q'), Action::Quit);
        map.insert(ctrl_key('n'), Action::Compose);
        map.insert(ctrl_key('c'), Action::Cancel);

        map
    }

    /// Control keys that work the same in both modes while composing.
    /// Tab is resolved by the handler so it never reaches the text fields.
    fn composer_bindings() -> HashMap<KeyEvent, Action> {
        let mut map = HashMap::new();

        map.insert(shift_key_code(KeyCode::BackTab), Action::PrevField);
        map.insert(key_code(KeyCode::BackTab), Action::PrevField);
        map.insert(ctrl_key('s'), Action::Send);
        map.insert(ctrl_key('e'), Action::ToggleCcBcc);
        map.insert(ctrl_key('f'), Action::ToggleFormatting);
        map.insert(ctrl_key('o'), Action::Attach);
        map.insert(ctrl_key('d'), Action::RemoveAttachment);
        map.insert(ctrl_key('p'), Action::AssistMenu);

        map
    }
}

fn key(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
}

fn ctrl_key(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
}

fn key_code(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn shift_key_code(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::SHIFT)
}

/// Format a KeyEvent for display
fn format_key_event(event: &KeyEvent) -> String {
    let mut parts = Vec::new();

    if event.modifiers.contains(KeyModifiers::CONTROL) {
        parts.push("Ctrl+");
    }
    if event.modifiers.contains(KeyModifiers::ALT) {
        parts.push("Alt+");
    }

    let key_str = match event.code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) if event.modifiers.contains(KeyModifiers::CONTROL) => {
            c.to_ascii_uppercase().to_string()
        }
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::BackTab => "Shift+Tab".to_string(),
        KeyCode::Backspace => "Backspace".to_string(),
        KeyCode::Delete => "Delete".to_string(),
        KeyCode::Up => "↑".to_string(),
        KeyCode::Down => "↓".to_string(),
        KeyCode::Left => "←".to_string(),
        KeyCode::Right => "→".to_string(),
        KeyCode::F(n) => format!("F{}", n),
        _ => format!("{:?}", event.code),
    };

    format!("{}{}", parts.join(""), key_str)
}
