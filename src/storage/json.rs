//! JSON file-based session storage.
//!
//! The whole file is rewritten on every change using write-to-temp + rename,
//! so a crash never leaves a half-written token behind.

use crate::domain::error::{ConsoleError, Result};
use crate::storage::backend::SessionStorage;
use crate::storage::models::{SessionFile, SessionRecord};
use std::path::{Path, PathBuf};

/// Session storage backed by a single JSON file.
///
/// The file content is mirrored in memory and written through on every
/// [`save`](SessionStorage::save) or [`clear`](SessionStorage::clear).
#[derive(Debug)]
pub struct JsonSessionStorage {
    file_path: PathBuf,
    data: SessionFile,
}

impl JsonSessionStorage {
    /// Opens (or prepares) the session file at `file_path`.
    ///
    /// Parent directories are created. A missing file is treated as an empty
    /// store and is not created until the first write.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created, or the file
    /// exists but cannot be read or parsed.
    pub fn new(file_path: PathBuf) -> Result<Self> {
        tracing::debug!(path = ?file_path, "initializing session storage");

        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let data = if file_path.exists() {
            Self::load_from_file(&file_path)?
        } else {
            SessionFile::default()
        };

        tracing::debug!(has_session = data.session.is_some(), "session storage initialized");

        Ok(Self { file_path, data })
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn load_from_file(path: &Path) -> Result<SessionFile> {
        let contents = std::fs::read_to_string(path)?;
        let data: SessionFile = serde_json::from_str(&contents)
            .map_err(|e| ConsoleError::Storage(format!("failed to parse JSON: {e}")))?;

        tracing::debug!(version = data.version, "loaded session file");
        Ok(data)
    }

    fn write_atomic(&self, data: &SessionFile) -> Result<()> {
        let json = serde_json::to_string_pretty(data)
            .map_err(|e| ConsoleError::Storage(format!("failed to serialize JSON: {e}")))?;

        let tmp_path = self.file_path.with_extension("tmp");
        tracing::trace!(tmp_path = ?tmp_path, "writing to temporary file");
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &self.file_path)?;

        tracing::debug!(path = ?self.file_path, "session file saved");
        Ok(())
    }
}

impl SessionStorage for JsonSessionStorage {
    fn load(&self) -> Result<Option<SessionRecord>> {
        let _span = tracing::debug_span!("json_load_session").entered();
        Ok(self.data.session.clone())
    }

    fn save(&mut self, record: &SessionRecord) -> Result<()> {
        let _span = tracing::debug_span!("json_save_session", saved_at = record.saved_at).entered();

        let next = SessionFile {
            session: Some(record.clone()),
            ..SessionFile::default()
        };
        self.write_atomic(&next)?;
        self.data = next;
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        let _span = tracing::debug_span!("json_clear_session").entered();

        if self.data.session.is_none() && !self.file_path.exists() {
            tracing::trace!("nothing to clear");
            return Ok(());
        }

        let next = SessionFile::default();
        self.write_atomic(&next)?;
        self.data = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionToken;

    fn record(token: &str) -> SessionRecord {
        SessionRecord {
            token: SessionToken::new(token),
            saved_at: 1_718_000_000,
        }
    }

    #[test]
    fn missing_file_is_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonSessionStorage::new(dir.path().join("zusers/session.json")).unwrap();

        assert_eq!(storage.load().unwrap(), None);
        assert!(!storage.path().exists());
        assert!(dir.path().join("zusers").is_dir());
    }

    #[test]
    fn saved_token_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let mut storage = JsonSessionStorage::new(path.clone()).unwrap();
        storage.save(&record("QpwL5tke4Pnpja7X4")).unwrap();
        drop(storage);

        let reopened = JsonSessionStorage::new(path.clone()).unwrap();
        assert_eq!(reopened.load().unwrap(), Some(record("QpwL5tke4Pnpja7X4")));
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn clear_removes_token_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let mut storage = JsonSessionStorage::new(path.clone()).unwrap();
        storage.save(&record("token")).unwrap();
        storage.clear().unwrap();

        assert_eq!(storage.load().unwrap(), None);
        let on_disk = std::fs::read_to_string(&path).unwrap();
        assert!(!on_disk.contains("token\""));
        assert_eq!(JsonSessionStorage::new(path).unwrap().load().unwrap(), None);
    }

    #[test]
    fn clearing_empty_store_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let mut storage = JsonSessionStorage::new(path.clone()).unwrap();
        storage.clear().unwrap();

        assert!(!path.exists());
    }

    #[test]
    fn corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{ not json").unwrap();

        let error = JsonSessionStorage::new(path).unwrap_err();

        assert!(matches!(error, ConsoleError::Storage(_)));
    }
}
