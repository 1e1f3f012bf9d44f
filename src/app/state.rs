//! Application state types
//!
//! All state types live here to maintain clean dependency:
//! UI layer imports from app layer, not vice versa. `AppState` is cloned
//! into the render thread, so everything in it is plain data.

use chrono::{DateTime, Local};

use crate::ai::RequestId;
use crate::compose::{Draft, DraftField, FileBrowser};
use crate::constants::ERROR_TTL_SECS;
use crate::ui::overlay::OverlayView;

#[derive(Debug, Clone, Default)]
pub enum View {
    /// Landing screen between drafts
    #[default]
    Home,
    Composer {
        draft: Draft,
        field: ComposerField,
    },
}

/// Focusable regions of the composer, in tab order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ComposerField {
    #[default]
    To,
    Cc,
    Bcc,
    Subject,
    Body,
    Attachments,
}

impl ComposerField {
    const ORDER: [ComposerField; 6] = [
        Self::To,
        Self::Cc,
        Self::Bcc,
        Self::Subject,
        Self::Body,
        Self::Attachments,
    ];

    /// Whether the field is shown for this draft
    pub fn is_visible(self, draft: &Draft) -> bool {
        match self {
            Self::Cc | Self::Bcc => draft.cc_bcc_expanded,
            Self::Attachments => !draft.attachments().is_empty(),
            _ => true,
        }
    }

    pub fn next(self, draft: &Draft) -> Self {
        self.step(draft, 1)
    }

    pub fn prev(self, draft: &Draft) -> Self {
        self.step(draft, Self::ORDER.len() - 1)
    }

    fn step(self, draft: &Draft, by: usize) -> Self {
        let len = Self::ORDER.len();
        let start = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        (1..=len)
            .map(|i| Self::ORDER[(start + i * by) % len])
            .find(|f| f.is_visible(draft))
            .unwrap_or(Self::To)
    }

    /// The draft text field this region edits, if any
    pub fn as_draft_field(self) -> Option<DraftField> {
        match self {
            Self::To => Some(DraftField::To),
            Self::Cc => Some(DraftField::Cc),
            Self::Bcc => Some(DraftField::Bcc),
            Self::Subject => Some(DraftField::Subject),
            Self::Body => Some(DraftField::Body),
            Self::Attachments => None,
        }
    }
}

/// Modal layer over the composer - only one can be active at a time
#[derive(Debug, Clone, Default)]
pub enum Modal {
    #[default]
    None,
    /// Must be dismissed before anything else is accepted
    Notice(String),
    FileBrowser(FileBrowser),
    /// Instruction input for a prompt-driven rewrite
    AssistPrompt { input: String },
}

impl Modal {
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::None)
    }
}

/// Transient error and status message state
#[derive(Debug, Clone, Default)]
pub struct StatusState {
    pub error: Option<String>,
    pub error_time: Option<std::time::Instant>,
    pub message: String,
}

impl StatusState {
    pub fn set_error(&mut self, error: impl ToString) {
        self.error = Some(error.to_string());
        self.error_time = Some(std::time::Instant::now());
    }

    pub fn clear_error(&mut self) {
        self.error = None;
        self.error_time = None;
    }

    /// Clear error if TTL expired. Returns true if error was cleared.
    pub fn clear_error_if_expired(&mut self) -> bool {
        if let Some(time) = self.error_time
            && time.elapsed().as_secs() >= ERROR_TTL_SECS
        {
            self.clear_error();
            true
        } else {
            false
        }
    }

    pub fn set_message(&mut self, msg: impl ToString) {
        self.message = msg.to_string();
    }
}

/// Writing assistant state visible to the renderer
#[derive(Debug, Clone, Default)]
pub struct AssistState {
    /// An API key is configured and the feature is on
    pub enabled: bool,
    /// Request whose result may still replace the body
    pub pending: Option<RequestId>,
    /// Snapshot of the open assist menu
    pub menu: Option<OverlayView>,
}

/// Shown on the home screen after a successful send
#[derive(Debug, Clone)]
pub struct SentSummary {
    pub id: String,
    pub to: String,
    pub subject: String,
    pub attachments: usize,
    pub at: DateTime<Local>,
}

/// Key labels for the home screen, resolved from the active bindings
#[derive(Debug, Clone, Default)]
pub struct KeyHints {
    pub compose: String,
    pub quit: String,
}

#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub view: View,
    pub modal: Modal,
    pub status: StatusState,
    pub assist: AssistState,
    /// Highlighted row when the attachment panel has focus
    pub attachment_cursor: usize,
    pub last_sent: Option<SentSummary>,
    /// Sender shown in the composer header
    pub from: String,
    pub keys: KeyHints,
}

impl AppState {
    pub fn set_error(&mut self, error: impl ToString) {
        self.status.set_error(error);
    }

    pub fn clear_error_if_expired(&mut self) -> bool {
        self.status.clear_error_if_expired()
    }

    pub fn set_status(&mut self, msg: impl ToString) {
        self.status.set_message(msg);
    }

    pub fn is_composing(&self) -> bool {
        matches!(self.view, View::Composer { .. })
    }

    pub fn draft(&self) -> Option<&Draft> {
        match &self.view {
            View::Composer { draft, .. } => Some(draft),
            View::Home => None,
        }
    }

    pub fn draft_mut(&mut self) -> Option<&mut Draft> {
        match &mut self.view {
            View::Composer { draft, .. } => Some(draft),
            View::Home => None,
        }
    }

    pub fn composer_field(&self) -> Option<ComposerField> {
        match &self.view {
            View::Composer { field, .. } => Some(*field),
            View::Home => None,
        }
    }

    /// Keep focus and the attachment cursor on something that exists
    pub fn normalize_focus(&mut self) {
        let cursor = &mut self.attachment_cursor;
        if let View::Composer { draft, field } = &mut self.view {
            let count = draft.attachments().len();
            *cursor = (*cursor).min(count.saturating_sub(1));
            if !field.is_visible(draft) {
                *field = field.prev(draft);
            }
        }
    }
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
            size: 1,
        }
    }

    #[test]
    fn test_tab_order_skips_collapsed_cc_bcc() {
        let draft = Draft::new();
        assert_eq!(ComposerField::To.next(&draft), ComposerField::Subject);
        assert_eq!(ComposerField::Subject.prev(&draft), ComposerField::To);
        // No attachments: Body wraps to To
        assert_eq!(ComposerField::Body.next(&draft), ComposerField::To);
        assert_eq!(ComposerField::To.prev(&draft), ComposerField::Body);
    }

    #[test]
    fn test_tab_order_with_everything_visible() {
        let mut draft = Draft::new();
        draft.toggle_cc_bcc();
        draft.add_attachments([handle("a.txt")]);

        let mut field = ComposerField::To;
        let mut seen = Vec::new();
        for _ in 0..6 {
            field = field.next(&draft);
            seen.push(field);
        }
        assert_eq!(
            seen,
            [
                ComposerField::Cc,
                ComposerField::Bcc,
                ComposerField::Subject,
                ComposerField::Body,
                ComposerField::Attachments,
                ComposerField::To,
            ]
        );
    }

    #[test]
    fn test_normalize_focus_after_collapse_and_removal() {
        let mut draft = Draft::new();
        draft.toggle_cc_bcc();
        draft.add_attachments([handle("a.txt"), handle("b.txt")]);

        let mut state = AppState {
            view: View::Composer {
                draft,
                field: ComposerField::Bcc,
            },
            attachment_cursor: 1,
            ..Default::default()
        };

        if let Some(draft) = state.draft_mut() {
            draft.toggle_cc_bcc();
            draft.remove_attachment(1);
        }
        state.normalize_focus();

        assert_eq!(state.composer_field(), Some(ComposerField::To));
        assert_eq!(state.attachment_cursor, 0);
    }

    #[test]
    fn test_error_ttl() {
        let mut status = StatusState::default();
        status.set_error("Send failed");
        assert!(!status.clear_error_if_expired());
        assert_eq!(status.error.as_deref(), Some("Send failed"));

        status.error_time =
            Some(std::time::Instant::now() - std::time::Duration::from_secs(ERROR_TTL_SECS));
        assert!(status.clear_error_if_expired());
        assert!(status.error.is_none());
    }
}
