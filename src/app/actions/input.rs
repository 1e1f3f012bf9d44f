//! Text input handling (chars, backspace)

use crate::app::state::{Modal, View};

use super::super::App;

impl App {
    pub(crate) fn handle_char(&mut self, c: char) {
        if let Modal::AssistPrompt { input } = &mut self.state.modal {
            input.push(c);
            return;
        }

        if let View::Composer { draft, field } = &mut self.state.view
            && let Some(target) = field.as_draft_field()
        {
            draft.push_char(target, c);
        }
    }

    pub(crate) fn handle_backspace(&mut self) {
        if let Modal::AssistPrompt { input } = &mut self.state.modal {
            input.pop();
            return;
        }

        if let View::Composer { draft, field } = &mut self.state.view
            && let Some(target) = field.as_draft_field()
        {
            draft.pop_char(target);
        }
    }
}
