// ABOUTME: AttachmentStore — size-checks and writes incoming attachments under the workspace.
// ABOUTME: One oversized or unwritable attachment fails the whole persist call.

use std::path::{Path, PathBuf};

use crate::config::AttachmentConfig;
use crate::error::IntakeError;

use super::naming::{relativize, unique_file_name};
use super::types::{IncomingAttachment, PersistedAttachment, guess_mime_type};

/// Persists uploads into `<workspace_root>/<dir_name>`.
///
/// Files written before a later item fails are left on disk; the caller
/// treats the whole batch as failed and never references them.
pub struct AttachmentStore {
    workspace_root: PathBuf,
    dir_name: String,
    max_bytes: u64,
}

impl AttachmentStore {
    pub fn new(workspace_root: impl Into<PathBuf>, config: &AttachmentConfig) -> Self {
        Self {
            workspace_root: workspace_root.into(),
            dir_name: config.dir_name.clone(),
            max_bytes: config.max_bytes,
        }
    }

    /// Byte ceiling applied to each attachment.
    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    fn absolute_root(&self) -> Result<PathBuf, IntakeError> {
        std::path::absolute(&self.workspace_root)
            .map_err(|e| IntakeError::io(&self.workspace_root, e))
    }

    /// Validate and write every attachment, returning descriptors in input order.
    pub async fn persist(
        &self,
        attachments: Vec<IncomingAttachment>,
    ) -> Result<Vec<PersistedAttachment>, IntakeError> {
        if attachments.is_empty() {
            return Ok(Vec::new());
        }

        let root = self.absolute_root()?;
        let dest_dir = root.join(&self.dir_name);
        tokio::fs::create_dir_all(&dest_dir)
            .await
            .map_err(|e| IntakeError::io(&dest_dir, e))?;

        let mut persisted = Vec::with_capacity(attachments.len());
        for attachment in attachments {
            persisted.push(self.persist_one(&root, &dest_dir, attachment).await?);
        }
        Ok(persisted)
    }

    async fn persist_one(
        &self,
        root: &Path,
        dest_dir: &Path,
        attachment: IncomingAttachment,
    ) -> Result<PersistedAttachment, IntakeError> {
        let size = attachment.effective_size();
        if size > self.max_bytes {
            return Err(IntakeError::AttachmentTooLarge {
                name: attachment.name,
                size,
                limit: self.max_bytes,
            });
        }

        let saved_path = dest_dir.join(unique_file_name(&attachment.name));
        tokio::fs::write(&saved_path, &attachment.data)
            .await
            .map_err(|e| IntakeError::io(&saved_path, e))?;

        let saved = saved_path.to_string_lossy().to_string();
        let (relative_path, in_workspace) = match relativize(root, &saved_path) {
            Some(rel) => (rel.to_string_lossy().to_string(), true),
            None => (saved.clone(), false),
        };

        let mime_type = if attachment.mime_type.trim().is_empty() {
            guess_mime_type(&attachment.name)
        } else {
            attachment.mime_type
        };

        tracing::debug!(
            name = %attachment.name,
            saved_path = %saved,
            in_workspace,
            "persisted attachment"
        );

        Ok(PersistedAttachment {
            name: attachment.name,
            mime_type,
            size: attachment.size,
            saved_path: saved,
            relative_path,
            in_workspace,
        })
    }
}
