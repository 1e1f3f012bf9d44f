//! In-progress message state and the send gate

use std::collections::HashSet;

use thiserror::Error;

use super::attachment::AttachmentHandle;

/// Errors that block sending a draft
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("Recipient is required")]
    EmptyRecipient,
}

/// Scalar text fields of a draft
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DraftField {
    To,
    Cc,
    Bcc,
    Subject,
    Body,
}

impl DraftField {
    pub fn label(self) -> &'static str {
        match self {
            Self::To => "To",
            Self::Cc => "Cc",
            Self::Bcc => "Bcc",
            Self::Subject => "Subject",
            Self::Body => "Body",
        }
    }
}

/// Identity of an externally supplied seed (reply, resumed draft).
/// Two seeds with the same id are the same seed, whatever their content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SeedId(pub u64);

/// Values used to pre-populate a new draft
#[derive(Debug, Clone)]
pub struct DraftSeed {
    pub id: SeedId,
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Send-ready snapshot of a draft. Owned by whoever receives it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMessage {
    pub to: String,
    pub cc: String,
    pub bcc: String,
    pub subject: String,
    pub body: String,
    pub attachments: Vec<AttachmentHandle>,
}

#[derive(Debug, Clone, Default)]
pub struct Draft {
    pub to: String,
    pub cc: String,
    pub bcc: String,
    pub subject: String,
    pub body: String,
    attachments: Vec<AttachmentHandle>,
    pub cc_bcc_expanded: bool,
    pub formatting_open: bool,
    /// Seeds already applied, so re-delivery of any of them keeps user edits
    applied_seeds: HashSet<SeedId>,
}

impl Draft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(&self, field: DraftField) -> &str {
        match field {
            DraftField::To => &self.to,
            DraftField::Cc => &self.cc,
            DraftField::Bcc => &self.bcc,
            DraftField::Subject => &self.subject,
            DraftField::Body => &self.body,
        }
    }

    fn field_mut(&mut self, field: DraftField) -> &mut String {
        match field {
            DraftField::To => &mut self.to,
            DraftField::Cc => &mut self.cc,
            DraftField::Bcc => &mut self.bcc,
            DraftField::Subject => &mut self.subject,
            DraftField::Body => &mut self.body,
        }
    }

    /// Overwrite a field. No validation happens at write time.
    pub fn set_field(&mut self, field: DraftField, value: impl Into<String>) {
        *self.field_mut(field) = value.into();
    }

    pub fn push_char(&mut self, field: DraftField, c: char) {
        self.field_mut(field).push(c);
    }

    pub fn pop_char(&mut self, field: DraftField) {
        self.field_mut(field).pop();
    }

    pub fn attachments(&self) -> &[AttachmentHandle] {
        &self.attachments
    }

    /// Append files in the order supplied
    pub fn add_attachments(&mut self, files: impl IntoIterator<Item = AttachmentHandle>) {
        self.attachments.extend(files);
    }

    /// Remove the attachment at `index`. Out of range is a no-op.
    pub fn remove_attachment(&mut self, index: usize) -> Option<AttachmentHandle> {
        if index < self.attachments.len() {
            Some(self.attachments.remove(index))
        } else {
            None
        }
    }

    pub fn toggle_cc_bcc(&mut self) {
        self.cc_bcc_expanded = !self.cc_bcc_expanded;
    }

    pub fn toggle_formatting(&mut self) {
        self.formatting_open = !self.formatting_open;
    }

    pub fn has_content(&self) -> bool {
        !self.to.is_empty()
            || !self.cc.is_empty()
            || !self.bcc.is_empty()
            || !self.subject.is_empty()
            || !self.body.is_empty()
            || !self.attachments.is_empty()
    }

    /// Validate and snapshot the draft for sending.
    ///
    /// Only an empty (after trimming) `to` blocks sending. The draft itself is
    /// left untouched; the caller decides whether to leave compose mode.
    pub fn try_send(&self) -> Result<OutgoingMessage, DraftError> {
        if self.to.trim().is_empty() {
            return Err(DraftError::EmptyRecipient);
        }

        Ok(OutgoingMessage {
            to: self.to.clone(),
            cc: self.cc.clone(),
            bcc: self.bcc.clone(),
            subject: self.subject.clone(),
            body: self.body.clone(),
            attachments: self.attachments.clone(),
        })
    }

    /// Seed `to`, `subject` and `body` from an external draft.
    ///
    /// Applied once per seed identity. Returns false when the seed was already
    /// applied and was therefore ignored.
    pub fn initialize_from(&mut self, seed: &DraftSeed) -> bool {
        if !self.applied_seeds.insert(seed.id) {
            return false;
        }

        self.to = seed.to.clone();
        self.subject = seed.subject.clone();
        self.body = seed.body.clone();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn file(name: &str) -> AttachmentHandle {
        AttachmentHandle {
            path: PathBuf::from("/tmp").join(name),
            name: name.to_string(),
            size: 1,
        }
    }

    fn names(draft: &Draft) -> Vec<&str> {
        draft.attachments().iter().map(|a| a.name.as_str()).collect()
    }

    fn seed(id: u64, to: &str) -> DraftSeed {
        DraftSeed {
            id: SeedId(id),
            to: to.to_string(),
            subject: "Re: lunch".to_string(),
            body: "> see you".to_string(),
        }
    }

    #[test]
    fn test_last_write_wins() {
        let mut draft = Draft::new();
        let writes = [
            (DraftField::To, "a@x.com"),
            (DraftField::Subject, "first"),
            (DraftField::To, "b@x.com"),
            (DraftField::Body, "hello"),
            (DraftField::Subject, "second"),
            (DraftField::Bcc, "c@x.com"),
            (DraftField::Body, ""),
        ];
        for (field, value) in writes {
            draft.set_field(field, value);
        }

        assert_eq!(draft.to, "b@x.com");
        assert_eq!(draft.subject, "second");
        assert_eq!(draft.body, "");
        assert_eq!(draft.bcc, "c@x.com");
        assert_eq!(draft.cc, "");
    }

    #[test]
    fn test_typing_edits_field() {
        let mut draft = Draft::new();
        for c in "hey!".chars() {
            draft.push_char(DraftField::Subject, c);
        }
        draft.pop_char(DraftField::Subject);
        assert_eq!(draft.field(DraftField::Subject), "hey");
        assert!(draft.field(DraftField::Body).is_empty());
    }

    #[test]
    fn test_attachments_keep_insertion_order() {
        let mut draft = Draft::new();
        draft.add_attachments([file("a"), file("b")]);
        draft.add_attachments([file("c")]);
        assert_eq!(names(&draft), ["a", "b", "c"]);
    }

    #[test]
    fn test_remove_attachment_by_position() {
        let mut draft = Draft::new();
        draft.add_attachments([file("a"), file("b"), file("c")]);

        let removed = draft.remove_attachment(1);
        assert_eq!(removed.map(|a| a.name), Some("b".to_string()));
        assert_eq!(names(&draft), ["a", "c"]);

        assert!(draft.remove_attachment(5).is_none());
        assert_eq!(names(&draft), ["a", "c"]);
    }

    #[test]
    fn test_duplicate_attachment_names_allowed() {
        let mut draft = Draft::new();
        draft.add_attachments([file("report.pdf"), file("report.pdf")]);
        draft.remove_attachment(0);
        assert_eq!(names(&draft), ["report.pdf"]);
    }

    #[test]
    fn test_removing_all_attachments_keeps_fields() {
        let mut draft = Draft::new();
        draft.set_field(DraftField::To, "x@y.com");
        draft.set_field(DraftField::Body, "body");
        draft.add_attachments([file("a"), file("b")]);
        draft.remove_attachment(0);
        draft.remove_attachment(0);

        assert!(draft.attachments().is_empty());
        assert_eq!(draft.to, "x@y.com");
        assert_eq!(draft.body, "body");
    }

    #[test]
    fn test_send_requires_recipient() {
        let mut draft = Draft::new();
        draft.set_field(DraftField::To, "  ");
        draft.set_field(DraftField::Body, "hi");
        assert_eq!(draft.try_send(), Err(DraftError::EmptyRecipient));
        assert_eq!(
            DraftError::EmptyRecipient.to_string(),
            "Recipient is required"
        );
    }

    #[test]
    fn test_send_snapshots_current_fields() {
        let mut draft = Draft::new();
        draft.set_field(DraftField::To, "x@y.com");
        draft.set_field(DraftField::Cc, "cc@y.com");
        draft.set_field(DraftField::Subject, "Plans");
        draft.set_field(DraftField::Body, "Friday?");
        draft.add_attachments([file("a")]);

        let message = draft.try_send().unwrap();
        assert_eq!(message.to, "x@y.com");
        assert_eq!(message.cc, "cc@y.com");
        assert_eq!(message.bcc, "");
        assert_eq!(message.subject, "Plans");
        assert_eq!(message.body, "Friday?");
        assert_eq!(message.attachments, draft.attachments());

        // Snapshot is detached from later edits
        draft.set_field(DraftField::Body, "Saturday?");
        assert_eq!(message.body, "Friday?");
        assert_eq!(draft.attachments().len(), 1);
    }

    #[test]
    fn test_send_without_attachments() {
        let mut draft = Draft::new();
        draft.set_field(DraftField::To, "x@y.com");
        let message = draft.try_send().unwrap();
        assert!(message.attachments.is_empty());
    }

    #[test]
    fn test_toggles_are_independent() {
        let mut draft = Draft::new();
        assert!(!draft.cc_bcc_expanded);
        assert!(!draft.formatting_open);

        draft.toggle_cc_bcc();
        draft.toggle_cc_bcc();
        assert!(!draft.cc_bcc_expanded);

        draft.toggle_cc_bcc();
        draft.toggle_formatting();
        draft.toggle_formatting();
        draft.toggle_formatting();
        assert!(draft.cc_bcc_expanded);
        assert!(draft.formatting_open);
    }

    #[test]
    fn test_has_content() {
        let mut draft = Draft::new();
        assert!(!draft.has_content());

        draft.toggle_formatting();
        assert!(!draft.has_content());

        draft.add_attachments([file("a")]);
        assert!(draft.has_content());

        draft.remove_attachment(0);
        draft.set_field(DraftField::Bcc, "b@y.com");
        assert!(draft.has_content());
    }

    #[test]
    fn test_seed_applies_once_per_identity() {
        let mut draft = Draft::new();
        assert!(draft.initialize_from(&seed(1, "a@x.com")));
        assert_eq!(draft.to, "a@x.com");
        assert_eq!(draft.subject, "Re: lunch");

        draft.set_field(DraftField::Body, "user edit");
        assert!(!draft.initialize_from(&seed(1, "a@x.com")));
        assert_eq!(draft.body, "user edit");

        // A new identity is a new seed, even with identical content
        assert!(draft.initialize_from(&seed(2, "a@x.com")));
        assert_eq!(draft.body, "> see you");
    }

    #[test]
    fn test_earlier_seed_not_reapplied_after_another() {
        let mut draft = Draft::new();
        assert!(draft.initialize_from(&seed(1, "a@x.com")));
        assert!(draft.initialize_from(&seed(2, "b@x.com")));
        draft.set_field(DraftField::Body, "user edit");

        assert!(!draft.initialize_from(&seed(1, "a@x.com")));
        assert_eq!(draft.to, "b@x.com");
        assert_eq!(draft.body, "user edit");
    }

    #[test]
    fn test_seed_leaves_cc_and_attachments() {
        let mut draft = Draft::new();
        draft.set_field(DraftField::Cc, "keep@x.com");
        draft.add_attachments([file("a")]);
        draft.initialize_from(&seed(7, "a@x.com"));
        assert_eq!(draft.cc, "keep@x.com");
        assert_eq!(draft.attachments().len(), 1);
    }
}
