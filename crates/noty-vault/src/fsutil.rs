//! Small file-writing helpers shared by the stores.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use noty_core::error::{NotyError, Result};

/// Replace `path` with `bytes` via a temp file in the same directory and a rename.
///
/// Readers see either the old or the new contents, never a torn write.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = path.parent().ok_or_else(|| {
        NotyError::Io(std::io::Error::other(format!(
            "{} has no parent directory",
            path.display()
        )))
    })?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| NotyError::Io(e.error))?;
    Ok(())
}

/// Write `bytes` to a file that must not exist yet.
pub(crate) fn write_new(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)?;
    file.write_all(bytes)?;
    file.sync_all()?;
    Ok(())
}

/// Remove `path`, reporting an absent file as [`NotyError::MissingFile`].
pub(crate) fn remove(path: &Path) -> Result<()> {
    std::fs::remove_file(path).map_err(|e| NotyError::from_io_at(e, path))
}
