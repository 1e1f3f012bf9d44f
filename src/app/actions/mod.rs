//! Action handlers for user input
//!
//! This module is split into focused submodules:
//! - `compose`: Draft lifecycle, focus and sending
//! - `input`: Text input handling
//! - `attachment`: File browser and the attachment list
//! - `ai`: Assist menu and body revisions

mod ai;
mod attachment;
mod compose;
mod input;

use anyhow::Result;

use crate::app::state::ComposerField;
use crate::input::Action;

use super::App;

impl App {
    pub(crate) async fn handle_action(&mut self, action: Action) -> Result<()> {
        match action {
            // Home
            Action::Compose | Action::Open => {
                if !self.state.is_composing() {
                    self.start_compose();
                }
            }
            Action::Quit | Action::Back => {} // Handled in input/event loop

            // Attachment list when it has focus
            Action::Up => {
                if self.state.composer_field() == Some(ComposerField::Attachments) {
                    self.state.attachment_cursor = self.state.attachment_cursor.saturating_sub(1);
                }
            }
            Action::Down => {
                if self.state.composer_field() == Some(ComposerField::Attachments) {
                    self.state.attachment_cursor += 1;
                    self.state.normalize_focus();
                }
            }

            // Composer
            Action::NextField => self.next_composer_field(),
            Action::PrevField => self.prev_composer_field(),
            Action::Send => self.send_draft().await,
            Action::Cancel => self.cancel_compose(),
            Action::ToggleCcBcc => self.toggle_cc_bcc(),
            Action::ToggleFormatting => {
                if let Some(draft) = self.state.draft_mut() {
                    draft.toggle_formatting();
                }
            }
            Action::Attach => self.open_file_browser(),
            Action::RemoveAttachment => self.remove_selected_attachment(),

            // Assist menu
            Action::AssistMenu => self.toggle_assist_menu(),
            Action::MenuUp => self.ai_menu.highlight_prev(),
            Action::MenuDown => self.ai_menu.highlight_next(),
            Action::MenuSelect => {
                if let Some(&selection) = self.ai_menu.selected_payload() {
                    self.run_assist_selection(selection).await;
                }
            }
            Action::MenuClose => {
                self.ai_menu.close();
            }

            // File browser
            Action::BrowserUp => self.with_browser(|b| b.move_up()),
            Action::BrowserDown => self.with_browser(|b| b.move_down()),
            Action::BrowserMark => self.with_browser(|b| b.toggle_mark()),
            Action::BrowserParent => self.with_browser(|b| b.parent()),
            Action::BrowserEnter => self.browser_enter(),
            Action::BrowserCancel => self.close_file_browser(),

            // Assist prompt
            Action::SubmitPrompt => self.submit_assist_prompt().await,
            Action::CancelPrompt => self.cancel_assist_prompt(),

            Action::DismissNotice => self.dismiss_notice(),
        }

        Ok(())
    }
}
