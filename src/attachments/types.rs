// ABOUTME: Attachment data types — the transient upload and its persisted descriptor.
// ABOUTME: PersistedAttachment serializes to the {name, mimeType, size, savedPath, relativePath} shape.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// An uploaded file as received from the caller. Never persisted as-is.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomingAttachment {
    pub name: String,
    #[serde(default)]
    pub mime_type: String,
    pub size: u64,
    #[serde(default)]
    pub data: Vec<u8>,
}

impl IncomingAttachment {
    /// Build an attachment from raw bytes, taking `size` from the payload length.
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            size: data.len() as u64,
            data,
        }
    }

    /// Size used for limit checks: the larger of the declared and actual sizes.
    pub fn effective_size(&self) -> u64 {
        self.size.max(self.data.len() as u64)
    }
}

/// Descriptor of an attachment written to disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedAttachment {
    /// Original, unsanitized display name.
    pub name: String,
    pub mime_type: String,
    pub size: u64,
    /// Absolute path of the saved file.
    pub saved_path: String,
    /// Path relative to the workspace root, or the absolute path when outside it.
    pub relative_path: String,
    #[serde(skip)]
    pub in_workspace: bool,
}

impl PersistedAttachment {
    /// The path the agent should use to open this file.
    ///
    /// Inside the workspace this is an explicit relative reference (`./...`);
    /// otherwise the absolute path.
    pub fn agent_path(&self) -> String {
        if !self.in_workspace {
            return self.saved_path.clone();
        }
        let relative = self.relative_path.replace('\\', "/");
        if relative.starts_with("./") {
            relative
        } else {
            format!("./{}", relative)
        }
    }

    pub fn saved_path(&self) -> &Path {
        Path::new(&self.saved_path)
    }
}

/// Best-effort MIME type guess from a file extension.
pub fn guess_mime_type(file_name: &str) -> String {
    mime_guess::from_path(file_name)
        .first_or_octet_stream()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn persisted(relative_path: &str, in_workspace: bool) -> PersistedAttachment {
        PersistedAttachment {
            name: "notes.txt".to_string(),
            mime_type: "text/plain".to_string(),
            size: 10,
            saved_path: "/elsewhere/notes.txt".to_string(),
            relative_path: relative_path.to_string(),
            in_workspace,
        }
    }

    #[test]
    fn effective_size_uses_larger_value() {
        let mut att = IncomingAttachment::new("a.bin", "", vec![0u8; 8]);
        att.size = 2;
        assert_eq!(att.effective_size(), 8);
        att.size = 100;
        assert_eq!(att.effective_size(), 100);
    }

    #[test]
    fn agent_path_prefixes_relative_paths() {
        let att = persisted(".attachments/1-abc-notes.txt", true);
        assert_eq!(att.agent_path(), "./.attachments/1-abc-notes.txt");
    }

    #[test]
    fn agent_path_keeps_existing_prefix() {
        let att = persisted("./.attachments/1-abc-notes.txt", true);
        assert_eq!(att.agent_path(), "./.attachments/1-abc-notes.txt");
    }

    #[test]
    fn agent_path_uses_absolute_outside_workspace() {
        let att = persisted("/elsewhere/notes.txt", false);
        assert_eq!(att.agent_path(), "/elsewhere/notes.txt");
    }

    #[test]
    fn serializes_with_camel_case_fields() {
        let att = persisted(".attachments/x.txt", true);
        let json = serde_json::to_value(&att).unwrap();
        assert_eq!(json["mimeType"], "text/plain");
        assert_eq!(json["savedPath"], "/elsewhere/notes.txt");
        assert_eq!(json["relativePath"], ".attachments/x.txt");
        assert!(json.get("inWorkspace").is_none());
    }

    #[test]
    fn guesses_common_types() {
        assert_eq!(guess_mime_type("photo.PNG"), "image/png");
        assert_eq!(guess_mime_type("notes.txt"), "text/plain");
        assert_eq!(guess_mime_type("README"), "application/octet-stream");
        assert_eq!(guess_mime_type("archive.zip"), "application/zip");
    }
}
