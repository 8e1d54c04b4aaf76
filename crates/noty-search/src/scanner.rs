//! Linear full-text scan over every note's content file.
//!
//! There is no index: each search walks all descriptors and reads each
//! referenced content file once. Cost grows with total note size.

use std::fs::File;
use std::io::BufReader;

use serde::{Deserialize, Serialize};
use tracing::debug;

use noty_core::error::{NotyError, Result};
use noty_core::note::{NoteDescriptor, NoteId};
use noty_vault::NoteRepository;

use crate::pattern::{GrepSearcher, HitLine, LineSearcher, Pattern, SearchOptions};

/// All emitted lines for one note that matched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: NoteId,
    pub subject: String,
    pub matched_lines: Vec<HitLine>,
}

/// Searches the content of every note in a repository.
pub struct NoteScanner<'r, S = GrepSearcher> {
    repo: &'r NoteRepository,
    searcher: S,
}

impl<'r> NoteScanner<'r, GrepSearcher> {
    #[must_use]
    pub fn new(repo: &'r NoteRepository) -> Self {
        Self {
            repo,
            searcher: GrepSearcher,
        }
    }
}

impl<'r, S: LineSearcher> NoteScanner<'r, S> {
    /// Use a different search primitive.
    pub fn with_searcher(repo: &'r NoteRepository, searcher: S) -> Self {
        Self { repo, searcher }
    }

    /// Lazily yield a [`SearchHit`] for each note whose content matches.
    ///
    /// Notes without a match are skipped. A descriptor whose content file
    /// is missing yields [`NotyError::MissingFile`] and the scan goes on.
    ///
    /// # Errors
    ///
    /// Returns [`NotyError::Io`] if the metadata directory cannot be read.
    pub fn search<'s>(
        &'s self,
        pattern: &'s Pattern,
        opts: SearchOptions,
    ) -> Result<impl Iterator<Item = Result<SearchHit>> + 's> {
        let descriptors = self.repo.metadata().read_all()?;
        let repo: &'s NoteRepository = self.repo;
        let searcher = &self.searcher;
        Ok(descriptors.filter_map(move |descriptor| {
            descriptor
                .and_then(|d| scan_note(repo, searcher, &d, pattern, &opts))
                .transpose()
        }))
    }
}

fn scan_note<S: LineSearcher>(
    repo: &NoteRepository,
    searcher: &S,
    descriptor: &NoteDescriptor,
    pattern: &Pattern,
    opts: &SearchOptions,
) -> Result<Option<SearchHit>> {
    let path = repo.content().resolve(&descriptor.content_ref);
    let file = File::open(&path).map_err(|e| NotyError::from_io_at(e, &path))?;
    let mut reader = BufReader::new(file);

    let lines = searcher.search_lines(&mut reader, pattern, opts)?;
    if lines.is_empty() {
        return Ok(None);
    }
    debug!(id = descriptor.id, lines = lines.len(), "note matched");
    Ok(Some(SearchHit {
        id: descriptor.id,
        subject: descriptor.subject.clone(),
        matched_lines: lines,
    }))
}
