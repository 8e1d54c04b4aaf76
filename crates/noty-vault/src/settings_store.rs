//! Persistence for the [`Settings`] record.
//!
//! Every mutation is a read-modify-write of `utils/settings.json`, and
//! every write goes through a temp file and a rename. There is no
//! locking: two processes mutating the same record can still lose an
//! update, the rename only guarantees the file is never half-written.

use std::path::{Path, PathBuf};

use tracing::debug;

use noty_core::error::{NotyError, Result};
use noty_core::note::NoteId;
use noty_core::settings::Settings;

use crate::fsutil;

pub const SETTINGS_FILE: &str = "settings.json";

/// Handle on the settings file of one repository.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    /// Open the settings record in `utils_dir`, creating an empty one
    /// (`max_id = -1`, no subjects) if none exists. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`NotyError::Io`] if the record cannot be created.
    pub fn initialize(utils_dir: &Path) -> Result<Self> {
        let store = Self {
            path: utils_dir.join(SETTINGS_FILE),
        };
        if !store.path.exists() {
            debug!(path = %store.path.display(), "creating settings record");
            store.replace(&Settings::default())?;
        }
        Ok(store)
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the current record from disk.
    ///
    /// # Errors
    ///
    /// Returns [`NotyError::MissingFile`] if the record was removed, or
    /// [`NotyError::Serialization`] if it does not decode.
    pub fn load(&self) -> Result<Settings> {
        let raw = std::fs::read(&self.path).map_err(|e| NotyError::from_io_at(e, &self.path))?;
        serde_json::from_slice(&raw).map_err(|e| {
            NotyError::Serialization(format!("{}: {e}", self.path.display()))
        })
    }

    /// Overwrite the record.
    ///
    /// # Errors
    ///
    /// Returns [`NotyError::Io`] on write failure.
    pub fn replace(&self, settings: &Settings) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(settings)?;
        fsutil::write_atomic(&self.path, &bytes)
    }

    /// # Errors
    ///
    /// Propagates [`SettingsStore::load`] failures.
    pub fn contains_subject(&self, subject: &str) -> Result<bool> {
        Ok(self.load()?.contains(subject))
    }

    /// The id the next registration would hand out, without committing it.
    ///
    /// # Errors
    ///
    /// Propagates [`SettingsStore::load`] failures.
    pub fn peek_next_id(&self) -> Result<NoteId> {
        Ok(self.load()?.next_id())
    }

    /// Bump the counter, register `subject`, persist, and return the new id.
    ///
    /// # Errors
    ///
    /// Returns [`NotyError::DuplicateSubject`] if `subject` is already
    /// registered; nothing is written in that case.
    pub fn next_id_and_register(&self, subject: &str) -> Result<NoteId> {
        let id = self.update(|s| s.register(subject))?;
        debug!(id, subject, "registered subject");
        Ok(id)
    }

    /// Remove `subject` from the registry and persist.
    ///
    /// # Errors
    ///
    /// Returns [`NotyError::SubjectNotFound`] if `subject` is not registered.
    pub fn release(&self, subject: &str) -> Result<()> {
        self.update(|s| s.release(subject))?;
        debug!(subject, "released subject");
        Ok(())
    }

    fn update<T>(&self, f: impl FnOnce(&mut Settings) -> Result<T>) -> Result<T> {
        let mut settings = self.load()?;
        let out = f(&mut settings)?;
        self.replace(&settings)?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn store() -> (tempfile::TempDir, SettingsStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::initialize(dir.path()).unwrap();
        (dir, store)
    }

    #[test]
    fn initialize_creates_empty_record() {
        let (_dir, store) = store();
        let s = store.load().unwrap();
        assert_eq!(s, Settings::default());
    }

    #[test]
    fn initialize_is_idempotent() {
        let (dir, store) = store();
        store.next_id_and_register("taxes").unwrap();

        let again = SettingsStore::initialize(dir.path()).unwrap();
        let s = again.load().unwrap();
        assert_eq!(s.max_id, 0);
        assert!(s.contains("taxes"));
    }

    #[test]
    fn register_persists_counter_and_subject() {
        let (_dir, store) = store();
        assert_eq!(store.peek_next_id().unwrap(), 0);
        assert_eq!(store.next_id_and_register("taxes").unwrap(), 0);
        assert_eq!(store.next_id_and_register("groceries").unwrap(), 1);
        assert!(store.contains_subject("taxes").unwrap());
        assert_eq!(store.peek_next_id().unwrap(), 2);
    }

    #[test]
    fn duplicate_register_leaves_file_untouched() {
        let (_dir, store) = store();
        store.next_id_and_register("taxes").unwrap();
        let before = fs::read(store.path()).unwrap();

        let err = store.next_id_and_register("taxes").unwrap_err();
        assert!(matches!(err, NotyError::DuplicateSubject(_)));
        assert_eq!(fs::read(store.path()).unwrap(), before);
    }

    #[test]
    fn release_unknown_subject_fails() {
        let (_dir, store) = store();
        let err = store.release("ghost").unwrap_err();
        assert!(matches!(err, NotyError::SubjectNotFound(_)));
    }

    #[test]
    fn corrupt_record_is_a_serialization_error() {
        let (_dir, store) = store();
        fs::write(store.path(), "{not json").unwrap();
        let err = store.load().unwrap_err();
        assert!(matches!(err, NotyError::Serialization(_)));
    }

    #[test]
    fn writes_leave_only_the_settings_file() {
        let (dir, store) = store();
        store.next_id_and_register("a").unwrap();
        store.release("a").unwrap();

        let names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec![SETTINGS_FILE.to_string()]);
    }
}
