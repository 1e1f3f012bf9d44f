//! Send boundary: turns a validated draft snapshot into an RFC 5322 message
//! and hands it to lettre's file transport.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MessageBuilder, MultiPart, SinglePart};
use lettre::{AsyncFileTransport, AsyncTransport, Message, Tokio1Executor};

use crate::compose::OutgoingMessage;

/// File contents loaded for an attachment part
struct LoadedAttachment {
    name: String,
    data: Vec<u8>,
}

pub struct Outbox {
    transport: AsyncFileTransport<Tokio1Executor>,
    dir: PathBuf,
    from: String,
}

impl Outbox {
    /// `from` is an RFC 5322 mailbox such as `Ada <ada@example.com>`
    pub fn new(dir: impl Into<PathBuf>, from: impl Into<String>) -> Self {
        let dir = dir.into();
        Self {
            transport: AsyncFileTransport::<Tokio1Executor>::new(&dir),
            dir,
            from: from.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write the message to the outbox. Returns the message id (the `.eml`
    /// file stem).
    pub async fn deliver(&self, outgoing: &OutgoingMessage) -> Result<String> {
        let mut loaded = Vec::with_capacity(outgoing.attachments.len());
        for handle in &outgoing.attachments {
            let data = tokio::fs::read(&handle.path)
                .await
                .with_context(|| format!("Failed to read attachment: {}", handle.path.display()))?;
            loaded.push(LoadedAttachment {
                name: handle.name.clone(),
                data,
            });
        }

        let message = build_message(&self.from, outgoing, loaded)?;
        let id = self
            .transport
            .send(message)
            .await
            .with_context(|| format!("Failed to write message to {}", self.dir.display()))?;

        tracing::info!(
            "Message {} queued to {} (cc: {}, attachments: {})",
            id,
            outgoing.to,
            outgoing.cc,
            outgoing.attachments.len()
        );
        Ok(id)
    }
}

/// Add every comma separated address in `list` via `add`
fn add_recipients(
    mut builder: MessageBuilder,
    list: &str,
    kind: &str,
    add: fn(MessageBuilder, Mailbox) -> MessageBuilder,
) -> Result<MessageBuilder> {
    for addr in list.split(',').map(str::trim).filter(|a| !a.is_empty()) {
        let mailbox = addr
            .parse::<Mailbox>()
            .with_context(|| format!("Invalid {} address: {}", kind, addr))?;
        builder = add(builder, mailbox);
    }
    Ok(builder)
}

fn build_message(
    from: &str,
    outgoing: &OutgoingMessage,
    attachments: Vec<LoadedAttachment>,
) -> Result<Message> {
    let from = from.parse::<Mailbox>().context("Invalid from address")?;

    let mut builder = Message::builder()
        .from(from)
        .subject(outgoing.subject.clone())
        .date_now()
        .keep_bcc();
    builder = add_recipients(builder, &outgoing.to, "recipient", MessageBuilder::to)?;
    builder = add_recipients(builder, &outgoing.cc, "Cc", MessageBuilder::cc)?;
    builder = add_recipients(builder, &outgoing.bcc, "Bcc", MessageBuilder::bcc)?;

    let message = if attachments.is_empty() {
        builder
            .header(ContentType::TEXT_PLAIN)
            .body(outgoing.body.clone())
    } else {
        let octet_stream = ContentType::parse("application/octet-stream")
            .map_err(|_| anyhow::anyhow!("Invalid attachment content type"))?;
        let mut parts = MultiPart::mixed().singlepart(SinglePart::plain(outgoing.body.clone()));
        for attachment in attachments {
            parts = parts.singlepart(
                Attachment::new(attachment.name).body(attachment.data, octet_stream.clone()),
            );
        }
        builder.multipart(parts)
    };

    message.context("Failed to build email message")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::AttachmentHandle;

    fn outgoing() -> OutgoingMessage {
        OutgoingMessage {
            to: "bob@example.com, Carol <carol@example.com>,".to_string(),
            cc: String::new(),
            bcc: "audit@example.com".to_string(),
            subject: "Lunch".to_string(),
            body: "Noon works for me.".to_string(),
            attachments: Vec::new(),
        }
    }

    fn formatted(message: &Message) -> String {
        String::from_utf8_lossy(&message.formatted()).into_owned()
    }

    #[test]
    fn test_plain_message_headers() {
        let message = build_message("Ada <ada@example.com>", &outgoing(), Vec::new()).unwrap();
        let text = formatted(&message);

        assert!(text.contains("From: Ada <ada@example.com>"));
        assert!(text.contains("bob@example.com"));
        assert!(text.contains("Carol <carol@example.com>"));
        assert!(text.contains("Bcc: audit@example.com"));
        assert!(text.contains("Subject: Lunch"));
        assert!(text.contains("Noon works for me."));
        assert!(!text.contains("multipart/mixed"));

        let envelope = message.envelope();
        assert_eq!(envelope.to().len(), 3);
    }

    #[test]
    fn test_attachments_become_octet_stream_parts() {
        let attachments = vec![
            LoadedAttachment {
                name: "notes.txt".to_string(),
                data: b"first".to_vec(),
            },
            LoadedAttachment {
                name: "notes.txt".to_string(),
                data: b"second".to_vec(),
            },
        ];
        let message = build_message("ada@example.com", &outgoing(), attachments).unwrap();
        let text = formatted(&message);

        assert!(text.contains("multipart/mixed"));
        assert_eq!(text.matches("application/octet-stream").count(), 2);
        assert_eq!(text.matches("filename=\"notes.txt\"").count(), 2);
    }

    #[test]
    fn test_invalid_recipient_is_reported() {
        let mut message = outgoing();
        message.cc = "not an address".to_string();

        let err = build_message("ada@example.com", &message, Vec::new()).unwrap_err();
        assert!(err.to_string().contains("Invalid Cc address: not an address"));
    }

    #[tokio::test]
    async fn test_deliver_writes_eml() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("agenda.md");
        std::fs::write(&file, "# Agenda").unwrap();

        let mut message = outgoing();
        message.attachments = vec![AttachmentHandle::from_path(&file).unwrap()];

        let outbox = Outbox::new(dir.path(), "ada@example.com");
        let id = outbox.deliver(&message).await.unwrap();

        let written = std::fs::read_to_string(dir.path().join(format!("{}.eml", id))).unwrap();
        assert!(written.contains("Subject: Lunch"));
        assert!(written.contains("filename=\"agenda.md\""));
    }

    #[tokio::test]
    async fn test_missing_attachment_fails_before_writing() {
        let dir = tempfile::tempdir().unwrap();
        let mut message = outgoing();
        message.attachments = vec![AttachmentHandle {
            path: dir.path().join("gone.pdf"),
            name: "gone.pdf".to_string(),
            size: 10,
        }];

        let outbox = Outbox::new(dir.path(), "ada@example.com");
        let err = outbox.deliver(&message).await.unwrap_err();
        assert!(err.to_string().contains("Failed to read attachment"));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
