//! Raw note text files in `notes/`.
//!
//! The store only manages existence: a file is created empty next to its
//! descriptor and removed with it. Editing happens outside noty.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use noty_core::error::{NotyError, Result};
use noty_core::note::ContentRef;

use crate::fsutil;

pub const CONTENT_EXTENSION: &str = "txt";

#[derive(Debug, Clone)]
pub struct ContentStore {
    dir: PathBuf,
}

impl ContentStore {
    #[must_use]
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
        }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn file_name(key: &str) -> String {
        format!("{key}.{CONTENT_EXTENSION}")
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.dir.join(Self::file_name(key)).exists()
    }

    /// Create an empty content file for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`NotyError::Io`] on failure, including when the file exists.
    pub fn create(&self, key: &str) -> Result<ContentRef> {
        let name = Self::file_name(key);
        let path = self.dir.join(&name);
        fsutil::write_new(&path, b"")?;
        debug!(path = %path.display(), "created content file");
        Ok(ContentRef::new(name))
    }

    /// # Errors
    ///
    /// Returns [`NotyError::MissingFile`] if the file is absent.
    pub fn delete(&self, content_ref: &ContentRef) -> Result<()> {
        let path = self.resolve(content_ref);
        fsutil::remove(&path)?;
        debug!(path = %path.display(), "removed content file");
        Ok(())
    }

    #[must_use]
    pub fn resolve(&self, content_ref: &ContentRef) -> PathBuf {
        content_ref.resolve_in(&self.dir)
    }

    #[must_use]
    pub fn exists(&self, content_ref: &ContentRef) -> bool {
        self.resolve(content_ref).is_file()
    }

    /// Every content file currently on disk.
    ///
    /// # Errors
    ///
    /// Returns [`NotyError::Io`] if the directory cannot be listed.
    pub fn files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in fs::read_dir(&self.dir).map_err(|e| NotyError::from_io_at(e, &self.dir))? {
            let path = entry?.path();
            if path.is_file()
                && path.extension().and_then(|e| e.to_str()) == Some(CONTENT_EXTENSION)
            {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }
}
