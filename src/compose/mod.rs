//! Message composition: the draft under construction and its attachments

mod attachment;
mod draft;

pub use attachment::{AttachmentHandle, FileBrowser};
pub use draft::{Draft, DraftField, DraftSeed, OutgoingMessage, SeedId};
