//! Per-note descriptor files in `metadatas/`.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use noty_core::error::{NotyError, Result};
use noty_core::note::{ContentRef, NoteDescriptor, NoteId};

use crate::fsutil;

pub const DESCRIPTOR_EXTENSION: &str = "json";

/// Descriptor store rooted at one directory.
#[derive(Debug, Clone)]
pub struct MetadataStore {
    dir: PathBuf,
}

impl MetadataStore {
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

    #[must_use]
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.{DESCRIPTOR_EXTENSION}"))
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.path_for(key).exists()
    }

    /// Write a new descriptor keyed by `date`.
    ///
    /// # Errors
    ///
    /// Returns [`NotyError::Io`] on write failure, including when a
    /// descriptor with the same key already exists.
    pub fn write(
        &self,
        id: NoteId,
        date: &str,
        subject: &str,
        content_ref: &ContentRef,
    ) -> Result<NoteDescriptor> {
        let descriptor = NoteDescriptor {
            id,
            date: date.to_string(),
            subject: subject.to_string(),
            content_ref: content_ref.clone(),
        };
        let path = self.path_for(date);
        let bytes = serde_json::to_vec_pretty(&descriptor)?;
        fsutil::write_new(&path, &bytes)?;
        debug!(id, path = %path.display(), "wrote descriptor");
        Ok(descriptor)
    }

    /// Start a fresh scan of every stored descriptor.
    ///
    /// Order follows directory enumeration and is not stable. Each call
    /// re-reads the directory, so the sequence can be restarted at will.
    ///
    /// # Errors
    ///
    /// Returns [`NotyError::Io`] if the directory cannot be listed.
    pub fn read_all(&self) -> Result<Descriptors> {
        let entries = fs::read_dir(&self.dir).map_err(|e| NotyError::from_io_at(e, &self.dir))?;
        Ok(Descriptors { entries })
    }

    /// Linear scan for the descriptor carrying `id`.
    ///
    /// # Errors
    ///
    /// Returns [`NotyError::NoteNotFound`] if no descriptor matches, or
    /// the first read/decode failure met during the scan.
    pub fn find_by_id(&self, id: NoteId) -> Result<NoteDescriptor> {
        for descriptor in self.read_all()? {
            let descriptor = descriptor?;
            if descriptor.id == id {
                return Ok(descriptor);
            }
        }
        Err(NotyError::NoteNotFound(id))
    }

    /// Remove the descriptor's backing file.
    ///
    /// # Errors
    ///
    /// Returns [`NotyError::MissingFile`] if it is already gone.
    pub fn delete(&self, descriptor: &NoteDescriptor) -> Result<()> {
        let path = self.path_for(&descriptor.date);
        fsutil::remove(&path)?;
        debug!(id = descriptor.id, path = %path.display(), "removed descriptor");
        Ok(())
    }
}

/// Lazy sequence of descriptors produced by [`MetadataStore::read_all`].
#[derive(Debug)]
pub struct Descriptors {
    entries: fs::ReadDir,
}

impl Iterator for Descriptors {
    type Item = Result<NoteDescriptor>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.entries.next()? {
                Ok(entry) => entry,
                Err(e) => return Some(Err(e.into())),
            };
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(DESCRIPTOR_EXTENSION) {
                continue;
            }
            if !path.is_file() {
                continue;
            }
            return Some(read_descriptor(&path));
        }
    }
}

fn read_descriptor(path: &Path) -> Result<NoteDescriptor> {
    let raw = fs::read(path).map_err(|e| NotyError::from_io_at(e, path))?;
    serde_json::from_slice(&raw)
        .map_err(|e| NotyError::Serialization(format!("{}: {e}", path.display())))
}
