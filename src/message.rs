// ABOUTME: Message builder — turns user text and persisted attachments into an agent message.
// ABOUTME: Pure transform: text block first, then one reference block per attachment.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::attachments::PersistedAttachment;

/// Text used when a message would otherwise carry no content.
pub const FALLBACK_TEXT: &str = "The user uploaded files without additional context.";

/// One unit of an outgoing message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    /// Freeform text typed by the user.
    Text { text: String },
    /// Instruction telling the agent where to read an uploaded file.
    AttachmentReference {
        name: String,
        path: String,
        text: String,
    },
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Reference block for a persisted attachment.
    pub fn attachment(attachment: &PersistedAttachment) -> Self {
        let path = attachment.agent_path();
        let text = format!(
            "The user attached \"{}\". It is saved at {}. Read the file from that path when you need its contents.",
            attachment.name, path
        );
        Self::AttachmentReference {
            name: attachment.name.clone(),
            path,
            text,
        }
    }

    /// The text the agent receives for this block.
    pub fn as_text(&self) -> &str {
        match self {
            Self::Text { text } => text,
            Self::AttachmentReference { text, .. } => text,
        }
    }
}

/// Message role. User input is the only role this crate produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
}

/// A message ready to be queued for the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingMessage {
    pub role: Role,
    pub content: Vec<ContentBlock>,
}

impl OutgoingMessage {
    /// Wire shape understood by the agent: every block is a text block.
    pub fn to_json(&self) -> Value {
        let content: Vec<Value> = self
            .content
            .iter()
            .map(|block| json!({ "type": "text", "text": block.as_text() }))
            .collect();
        json!({ "role": "user", "content": content })
    }
}

/// Build the outgoing message for already-trimmed `text` and persisted attachments.
///
/// The result always has at least one block.
pub fn build_message(text: &str, attachments: &[PersistedAttachment]) -> OutgoingMessage {
    let mut content = Vec::with_capacity(attachments.len() + 1);

    if !text.is_empty() {
        content.push(ContentBlock::text(text));
    }
    content.extend(attachments.iter().map(ContentBlock::attachment));

    if content.is_empty() {
        content.push(ContentBlock::text(FALLBACK_TEXT));
    }

    OutgoingMessage {
        role: Role::User,
        content,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attachment(name: &str, relative_path: &str, in_workspace: bool) -> PersistedAttachment {
        PersistedAttachment {
            name: name.to_string(),
            mime_type: "text/plain".to_string(),
            size: 10,
            saved_path: format!("/ws/{}", relative_path),
            relative_path: relative_path.to_string(),
            in_workspace,
        }
    }

    #[test]
    fn empty_input_yields_single_fallback_block() {
        let msg = build_message("", &[]);
        assert_eq!(msg.content, vec![ContentBlock::text(FALLBACK_TEXT)]);
        assert_eq!(msg.role, Role::User);
    }

    #[test]
    fn text_only_yields_single_text_block() {
        let msg = build_message("hello", &[]);
        assert_eq!(msg.content, vec![ContentBlock::text("hello")]);
    }

    #[test]
    fn attachment_only_yields_single_reference_block() {
        let att = attachment("notes.txt", ".attachments/1-abc-notes.txt", true);
        let msg = build_message("", std::slice::from_ref(&att));
        assert_eq!(msg.content.len(), 1);
        match &msg.content[0] {
            ContentBlock::AttachmentReference { name, path, text } => {
                assert_eq!(name, "notes.txt");
                assert_eq!(path, "./.attachments/1-abc-notes.txt");
                assert!(text.contains("notes.txt"));
                assert!(text.contains("./.attachments/1-abc-notes.txt"));
            }
            other => panic!("expected AttachmentReference, got {:?}", other),
        }
    }

    #[test]
    fn text_comes_first_then_attachments_in_order() {
        let a = attachment("a.txt", ".attachments/1-a.txt", true);
        let b = attachment("b.txt", ".attachments/2-b.txt", true);
        let msg = build_message("look", &[a, b]);

        assert_eq!(msg.content.len(), 3);
        assert_eq!(msg.content[0], ContentBlock::text("look"));
        let names: Vec<&str> = msg.content[1..]
            .iter()
            .map(|block| match block {
                ContentBlock::AttachmentReference { name, .. } => name.as_str(),
                other => panic!("unexpected block {:?}", other),
            })
            .collect();
        assert_eq!(names, vec!["a.txt", "b.txt"]);
    }

    #[test]
    fn reference_uses_original_display_name() {
        let att = attachment("a<b>.png", ".attachments/1-abc-a_b_.png", true);
        let block = ContentBlock::attachment(&att);
        assert!(block.as_text().contains("\"a<b>.png\""));
    }

    #[test]
    fn outside_workspace_uses_absolute_path() {
        let att = PersistedAttachment {
            name: "far.txt".to_string(),
            mime_type: "text/plain".to_string(),
            size: 1,
            saved_path: "/elsewhere/far.txt".to_string(),
            relative_path: "/elsewhere/far.txt".to_string(),
            in_workspace: false,
        };
        match ContentBlock::attachment(&att) {
            ContentBlock::AttachmentReference { path, .. } => assert_eq!(path, "/elsewhere/far.txt"),
            other => panic!("expected AttachmentReference, got {:?}", other),
        }
    }

    #[test]
    fn wire_shape_is_text_blocks() {
        let att = attachment("notes.txt", ".attachments/1-notes.txt", true);
        let value = build_message("hi", &[att]).to_json();
        assert_eq!(value["role"], "user");
        let content = value["content"].as_array().unwrap();
        assert_eq!(content.len(), 2);
        assert_eq!(content[0], json!({"type": "text", "text": "hi"}));
        assert_eq!(content[1]["type"], "text");
        assert!(content[1]["text"].as_str().unwrap().contains("notes.txt"));
    }
}
