//! Note descriptor types.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Numeric note identifier. Assigned ids start at 0; `-1` only ever
/// appears as the initial `max_id` of an empty repository.
pub type NoteId = i64;

/// Opaque locator for a note's content file.
///
/// Stored as the file name relative to the notes directory. Older
/// repositories stored an absolute path; both forms resolve through
/// [`ContentRef::resolve_in`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentRef(String);

impl ContentRef {
    pub fn new(locator: impl Into<String>) -> Self {
        Self(locator.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Resolve against the notes directory. Absolute locators win over the base.
    #[must_use]
    pub fn resolve_in(&self, notes_dir: &Path) -> std::path::PathBuf {
        notes_dir.join(&self.0)
    }
}

impl fmt::Display for ContentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The metadata record for one note, persisted as `metadatas/<date>.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteDescriptor {
    pub id: NoteId,
    /// Creation timestamp; doubles as the storage key of both note files.
    pub date: String,
    pub subject: String,
    #[serde(alias = "path_note")]
    pub content_ref: ContentRef,
}

impl NoteDescriptor {
    /// The `(id, subject)` pair shown in listings.
    #[must_use]
    pub fn summary(&self) -> NoteSummary {
        NoteSummary {
            id: self.id,
            subject: self.subject.clone(),
        }
    }
}

/// A listing entry.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NoteSummary {
    pub id: NoteId,
    pub subject: String,
}
