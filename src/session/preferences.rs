// ABOUTME: Model preference persistence — save and load the chosen preference as JSON.
// ABOUTME: Writes are atomic (tmp file + rename) so a failed write never leaves a torn file.

use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::service::ModelPreference;

/// On-disk preference record.
#[derive(Debug, Serialize, Deserialize)]
pub struct StoredPreferences {
    pub model: ModelPreference,
    pub updated_at: String,
}

/// File-backed store for the model preference.
#[derive(Debug, Clone)]
pub struct PreferenceStore {
    path: PathBuf,
}

impl PreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored preference, if one exists.
    pub fn load(&self) -> anyhow::Result<Option<ModelPreference>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path)?;
        let stored: StoredPreferences = serde_json::from_str(&content)?;
        Ok(Some(stored.model))
    }

    /// Persist a preference (atomic write via tmp + rename).
    pub fn save(&self, model: ModelPreference) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let stored = StoredPreferences {
            model,
            updated_at: Utc::now().to_rfc3339(),
        };
        let tmp_path = self.path.with_extension("json.tmp");
        let content = serde_json::to_string_pretty(&stored)?;
        std::fs::write(&tmp_path, &content)?;
        std::fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preference_roundtrip() {
        let tmp = tempfile::tempdir().unwrap();
        let store = PreferenceStore::new(tmp.path().join("nested").join("preferences.json"));

        store.save(ModelPreference::Smart).unwrap();
        assert_eq!(store.load().unwrap(), Some(ModelPreference::Smart));
    }

    #[test]
    fn load_nonexistent_returns_none() {
        let tmp = tempfile::tempdir().unwrap();
        let store = PreferenceStore::new(tmp.path().join("missing.json"));
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn save_is_atomic() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("preferences.json");
        let store = PreferenceStore::new(&path);
        store.save(ModelPreference::Fast).unwrap();

        assert!(path.exists(), "preferences.json should exist after save");
        assert!(
            !path.with_extension("json.tmp").exists(),
            "tmp file should not exist after successful save"
        );
    }

    #[test]
    fn save_overwrites_existing() {
        let tmp = tempfile::tempdir().unwrap();
        let store = PreferenceStore::new(tmp.path().join("preferences.json"));
        store.save(ModelPreference::Fast).unwrap();
        store.save(ModelPreference::Smart).unwrap();
        assert_eq!(store.load().unwrap(), Some(ModelPreference::Smart));
    }

    #[test]
    fn save_fails_when_parent_is_a_file() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("blocker");
        std::fs::write(&blocker, "file").unwrap();
        let store = PreferenceStore::new(blocker.join("preferences.json"));
        assert!(store.save(ModelPreference::Smart).is_err());
    }
}
