//! Mirror the store directories to a backup location.

use std::collections::HashSet;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use noty_core::capability::Mirror;
use noty_core::error::{NotyError, Result};

/// Copies each store directory into `<dest>/<dir name>/`.
///
/// New or changed files (by size or modification time) are copied and
/// files that no longer exist in the source are removed. Stores are flat,
/// so subdirectories are ignored.
#[derive(Debug, Clone)]
pub struct DirMirror {
    dest: PathBuf,
}

impl DirMirror {
    pub fn new(dest: impl Into<PathBuf>) -> Self {
        Self { dest: dest.into() }
    }

    fn mirror_dir(&self, src: &Path) -> Result<usize> {
        let name = src.file_name().ok_or_else(|| {
            NotyError::Config(format!("cannot mirror {}: no directory name", src.display()))
        })?;
        let target = self.dest.join(name);
        fs::create_dir_all(&target)?;

        let mut seen: HashSet<OsString> = HashSet::new();
        let mut copied = 0;
        for entry in fs::read_dir(src).map_err(|e| NotyError::from_io_at(e, src))? {
            let entry = entry?;
            let meta = entry.metadata()?;
            if !meta.is_file() {
                continue;
            }
            let to = target.join(entry.file_name());
            seen.insert(entry.file_name());
            if is_current(&meta, &to) {
                continue;
            }
            fs::copy(entry.path(), &to)?;
            copied += 1;
        }

        for entry in fs::read_dir(&target)? {
            let entry = entry?;
            if entry.metadata()?.is_file() && !seen.contains(&entry.file_name()) {
                fs::remove_file(entry.path())?;
            }
        }

        debug!(src = %src.display(), dest = %target.display(), copied, "mirrored store");
        Ok(copied)
    }
}

/// The copy at `to` has the same size and is not older than the source.
fn is_current(src: &fs::Metadata, to: &Path) -> bool {
    let Ok(dst) = fs::metadata(to) else {
        return false;
    };
    match (src.modified(), dst.modified()) {
        (Ok(s), Ok(d)) => dst.len() == src.len() && d >= s,
        _ => false,
    }
}

impl Mirror for DirMirror {
    fn mirror(&self, dirs: &[&Path]) -> Result<()> {
        for dir in dirs {
            self.mirror_dir(dir)?;
        }
        Ok(())
    }
}
