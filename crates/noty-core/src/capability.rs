//! Injected capabilities for the tools noty drives but does not own.
//!
//! The repository never spawns processes or touches backup locations
//! itself. Callers hand it implementations of these traits; tests
//! substitute fakes.

use std::path::Path;

use crate::error::Result;

/// Opens a note's content file for the user to edit.
pub trait Editor {
    /// Open `content` and return once the editor session is over.
    ///
    /// # Errors
    ///
    /// Returns an error if the editor cannot be started.
    fn open(&self, content: &Path) -> Result<()>;
}

/// Mirrors store directories to a backup location.
pub trait Mirror {
    /// Mirror every directory in `dirs`.
    ///
    /// # Errors
    ///
    /// Returns the first failure. Callers treat mirroring as best-effort
    /// and never abort a note operation because of it.
    fn mirror(&self, dirs: &[&Path]) -> Result<()>;
}

/// A [`Mirror`] that does nothing, for when no backup is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoMirror;

impl Mirror for NoMirror {
    fn mirror(&self, _dirs: &[&Path]) -> Result<()> {
        Ok(())
    }
}

impl<T: Editor + ?Sized> Editor for &T {
    fn open(&self, content: &Path) -> Result<()> {
        (**self).open(content)
    }
}

impl<T: Mirror + ?Sized> Mirror for &T {
    fn mirror(&self, dirs: &[&Path]) -> Result<()> {
        (**self).mirror(dirs)
    }
}
