//! Command handlers: the repository plus the injected editor, wired the
//! way each CLI command needs it.

use std::path::Path;

use tracing::warn;

use noty_core::capability::{Editor, Mirror};
use noty_core::error::{NotyError, Result};
use noty_core::note::{NoteDescriptor, NoteId, NoteSummary};
use noty_search::{NoteScanner, Pattern, SearchHit, SearchOptions};
use noty_vault::{NoteRepository, ReconcileReport};

pub struct Noty<E> {
    repo: NoteRepository,
    editor: E,
}

impl<E: Editor> Noty<E> {
    /// Open the repository at `root`, then mirror it. A mirror failure
    /// is logged and otherwise ignored.
    pub fn open(root: &Path, editor: E, mirror: &dyn Mirror) -> Result<Self> {
        let repo = NoteRepository::open(root)?;
        if let Err(e) = mirror.mirror(&repo.layout().store_dirs()) {
            warn!(error = %e, "backup mirror failed");
        }
        Ok(Self { repo, editor })
    }

    #[cfg(test)]
    pub fn repo(&self) -> &NoteRepository {
        &self.repo
    }

    /// Create a note and, if `launch`, open it in the editor.
    ///
    /// The note exists once this returns the id, even if the editor then fails.
    pub fn create(&self, subject: &str, launch: bool) -> Result<NoteId> {
        let id = self.repo.create_note(subject)?;
        if launch {
            if let Err(e) = self.launch(id) {
                warn!(id, error = %e, "note created but editor failed");
            }
        }
        Ok(id)
    }

    pub fn delete(&self, id: NoteId) -> Result<NoteDescriptor> {
        self.repo.delete_note(id)
    }

    pub fn launch(&self, id: NoteId) -> Result<()> {
        let path = self.repo.content_path(id)?;
        self.editor.open(&path)
    }

    /// Every live note, ordered by id.
    pub fn list(&self) -> Result<Vec<NoteSummary>> {
        let mut notes = self.repo.list_notes()?.collect::<Result<Vec<_>>>()?;
        notes.sort();
        Ok(notes)
    }

    /// Hits ordered by id. Notes whose content file is missing are
    /// skipped with a warning; any other failure aborts.
    pub fn search(&self, pattern: &Pattern, opts: SearchOptions) -> Result<Vec<SearchHit>> {
        let scanner = NoteScanner::new(&self.repo);
        let mut hits = Vec::new();
        for hit in scanner.search(pattern, opts)? {
            match hit {
                Ok(hit) => hits.push(hit),
                Err(NotyError::MissingFile(path)) => {
                    warn!(path = %path.display(), "skipping note without content file");
                }
                Err(e) => return Err(e),
            }
        }
        hits.sort_by_key(|h| h.id);
        Ok(hits)
    }

    pub fn check(&self, repair: bool) -> Result<ReconcileReport> {
        self.repo.reconcile(repair)
    }
}
