//! Draft lifecycle: start, focus, send and cancel

use chrono::Local;

use crate::app::state::{ComposerField, Modal, SentSummary, View};
use crate::compose::Draft;

use super::super::App;

impl App {
    pub(crate) fn start_compose(&mut self) {
        let mut draft = Draft::new();
        let mut field = ComposerField::To;

        // The seed only ever fills the first draft
        if let Some(seed) = self.seed.take()
            && draft.initialize_from(&seed)
        {
            tracing::debug!("Draft seeded from {:?}", seed.id);
            if !draft.to.trim().is_empty() {
                field = ComposerField::Body;
            }
        }

        self.state.view = View::Composer { draft, field };
        self.state.modal = Modal::None;
        self.state.attachment_cursor = 0;
        self.ai_menu.close();
    }

    pub(super) fn next_composer_field(&mut self) {
        if let View::Composer { draft, field } = &mut self.state.view {
            *field = field.next(draft);
        }
    }

    pub(super) fn prev_composer_field(&mut self) {
        if let View::Composer { draft, field } = &mut self.state.view {
            *field = field.prev(draft);
        }
    }

    pub(crate) fn focus_field(&mut self, target: ComposerField) {
        if let View::Composer { draft, field } = &mut self.state.view
            && target.is_visible(draft)
        {
            *field = target;
        }
    }

    pub(super) fn toggle_cc_bcc(&mut self) {
        if let Some(draft) = self.state.draft_mut() {
            draft.toggle_cc_bcc();
        }
        self.state.normalize_focus();
    }

    /// Validate, deliver to the outbox and leave compose mode on success.
    /// Validation and delivery failures keep the draft open.
    pub(crate) async fn send_draft(&mut self) {
        let Some(draft) = self.state.draft() else {
            return;
        };

        let outgoing = match draft.try_send() {
            Ok(outgoing) => outgoing,
            Err(e) => {
                self.ai_menu.close();
                self.state.modal = Modal::Notice(e.to_string());
                return;
            }
        };

        self.state.set_status("Sending...");
        match self.outbox.deliver(&outgoing).await {
            Ok(id) => {
                self.state.last_sent = Some(SentSummary {
                    id,
                    to: outgoing.to.clone(),
                    subject: outgoing.subject.clone(),
                    attachments: outgoing.attachments.len(),
                    at: Local::now(),
                });
                self.leave_composer();
                self.state
                    .set_status(format!("Message saved to {}", self.outbox.dir().display()));
            }
            Err(e) => {
                tracing::error!("Send failed: {:#}", e);
                self.state.set_error(format!("Send failed: {:#}", e));
            }
        }
    }

    /// Discard the draft without sending
    pub(crate) fn cancel_compose(&mut self) {
        let Some(draft) = self.state.draft() else {
            return;
        };
        if draft.has_content() {
            tracing::debug!("Discarding unsent draft");
        }
        self.leave_composer();
        self.state.set_status("Draft discarded");
    }

    fn leave_composer(&mut self) {
        self.ai_menu.close();
        self.state.view = View::Home;
        self.state.modal = Modal::None;
        // A revision still in flight belongs to the closed draft
        self.state.assist.pending = None;
        self.state.attachment_cursor = 0;
    }

    pub(crate) fn dismiss_notice(&mut self) {
        if matches!(self.state.modal, Modal::Notice(_)) {
            self.state.modal = Modal::None;
        }
    }
}
