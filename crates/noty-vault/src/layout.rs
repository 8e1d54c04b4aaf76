//! Directory layout of a repository root.
//!
//! ```text
//! <root>/
//!   notes/               one content file per note, <key>.txt
//!   metadatas/           one descriptor per note, <key>.json
//!   utils/settings.json  settings record
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use noty_core::error::Result;

pub const NOTES_DIR: &str = "notes";
pub const METADATAS_DIR: &str = "metadatas";
pub const UTILS_DIR: &str = "utils";

/// Resolved store directories under a repository root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultLayout {
    pub root: PathBuf,
    pub notes: PathBuf,
    pub metadatas: PathBuf,
    pub utils: PathBuf,
}

impl VaultLayout {
    #[must_use]
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            notes: root.join(NOTES_DIR),
            metadatas: root.join(METADATAS_DIR),
            utils: root.join(UTILS_DIR),
        }
    }

    /// Create every missing directory. Existing ones are left alone.
    ///
    /// # Errors
    ///
    /// Returns [`noty_core::NotyError::Io`] if a directory cannot be created.
    pub fn ensure(&self) -> Result<()> {
        for dir in [&self.notes, &self.metadatas, &self.utils] {
            fs::create_dir_all(dir)?;
        }
        Ok(())
    }

    /// The three store directories, in the order they are mirrored.
    #[must_use]
    pub fn store_dirs(&self) -> [&Path; 3] {
        [&self.notes, &self.metadatas, &self.utils]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_creates_store_directories() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("nested").join(".noty");
        let layout = VaultLayout::new(&root);

        layout.ensure().unwrap();
        layout.ensure().unwrap();

        assert!(layout.notes.is_dir());
        assert!(layout.metadatas.is_dir());
        assert!(layout.utils.is_dir());
        assert_eq!(layout.store_dirs()[1], root.join("metadatas"));
    }
}
