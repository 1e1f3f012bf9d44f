//! Main event loop and pointer/resize routing

use anyhow::Result;
use crossterm::event;
use ratatui::layout::{Position, Size};
use std::time::Duration;

use crate::app::state::ComposerField;
use crate::constants::{POLL_BUSY_MS, POLL_IDLE_MS};
use crate::input::{InputResult, handle_input};
use crate::ui::composer::attachment_scroll;

use super::App;
use super::render_thread::RenderThread;

impl App {
    pub(crate) async fn event_loop(&mut self, render_thread: &RenderThread) -> Result<()> {
        loop {
            // Process AI events from the actor (non-blocking)
            if self.process_ai_events() {
                self.dirty = true;
            }

            // Clear expired errors
            if self.state.clear_error_if_expired() {
                self.dirty = true;
            }

            // Render only when dirty; a dropped frame stays dirty
            if self.dirty {
                self.sync_overlay();
                self.dirty = !render_thread.render(self.state.clone());
            }

            // Poll faster while a revision is in flight
            let poll_timeout = if self.state.assist.pending.is_some() {
                POLL_BUSY_MS
            } else {
                POLL_IDLE_MS
            };
            if event::poll(Duration::from_millis(poll_timeout))? {
                let evt = event::read()?;
                // Any input event (including resize) requires re-render
                self.dirty = true;
                match handle_input(evt, &self.state, &self.bindings) {
                    InputResult::Quit => break,
                    InputResult::Action(action) => self.handle_action(action).await?,
                    InputResult::Char(c) => self.handle_char(c),
                    InputResult::Backspace => self.handle_backspace(),
                    InputResult::Pointer(at) => self.handle_pointer(at).await,
                    InputResult::Resize(width, height) => self.handle_resize(width, height),
                    InputResult::Continue => {}
                }
            }
        }

        Ok(())
    }

    /// Pointer-down: capture-phase listeners first, then the element under
    /// the pointer.
    pub(crate) async fn handle_pointer(&mut self, at: Position) {
        self.pointer_bus.dispatch(at);
        if self.menu_dismissed.replace(false) {
            tracing::debug!("Assist menu dismissed by pointer at {:?}", at);
            self.ai_menu.close();
        }
        self.dirty = true;

        if self.state.modal.is_active() {
            return;
        }
        let Some(layout) = self.composer_layout() else {
            return;
        };

        if let Some(index) = self.ai_menu.entry_at(at) {
            if let Some(&selection) = self.ai_menu.select(index) {
                self.run_assist_selection(selection).await;
            }
            return;
        }

        // Borders of the open menu shadow whatever is drawn beneath them
        if self.ai_menu.area().is_some_and(|area| area.contains(at)) {
            return;
        }

        if layout.ai_button.is_some_and(|button| button.contains(at)) {
            self.toggle_assist_menu();
            return;
        }

        if layout.send_button.contains(at) {
            self.send_draft().await;
            return;
        }

        if let Some(field) = layout.field_at(at) {
            self.focus_field(field);
            if field == ComposerField::Attachments {
                let scroll = attachment_scroll(self.state.attachment_cursor);
                if let Some(index) = layout.attachment_at(at, scroll) {
                    self.state.attachment_cursor = index;
                    self.state.normalize_focus();
                }
            }
        }
    }

    pub(crate) fn handle_resize(&mut self, width: u16, height: u16) {
        self.viewport = Size::new(width, height);
        self.sync_overlay();
        self.dirty = true;
    }
}
