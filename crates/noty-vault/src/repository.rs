//! The note repository: the only writer of the three stores.
//!
//! Create order is content file, descriptor, settings commit. Delete
//! order is settings release, descriptor, content file. Neither
//! operation rolls back on partial failure; [`NoteRepository::reconcile`]
//! reports and repairs what a crash leaves behind.

use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::{info, warn};

use noty_core::error::{NotyError, Result};
use noty_core::key;
use noty_core::note::{NoteDescriptor, NoteId, NoteSummary};

use crate::content_store::ContentStore;
use crate::layout::VaultLayout;
use crate::metadata_store::MetadataStore;
use crate::settings_store::SettingsStore;

/// Coordinates the settings, metadata, and content stores of one root.
#[derive(Debug, Clone)]
pub struct NoteRepository {
    layout: VaultLayout,
    pub(crate) settings: SettingsStore,
    pub(crate) metadata: MetadataStore,
    pub(crate) content: ContentStore,
}

impl NoteRepository {
    /// Open (and if needed lay out) the repository at `root`.
    ///
    /// # Errors
    ///
    /// Returns [`NotyError::Io`] if directories or the settings record
    /// cannot be created.
    pub fn open(root: &Path) -> Result<Self> {
        let layout = VaultLayout::new(root);
        layout.ensure()?;
        let settings = SettingsStore::initialize(&layout.utils)?;
        let metadata = MetadataStore::new(&layout.metadatas);
        let content = ContentStore::new(&layout.notes);
        Ok(Self {
            layout,
            settings,
            metadata,
            content,
        })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.layout.root
    }

    #[must_use]
    pub fn layout(&self) -> &VaultLayout {
        &self.layout
    }

    #[must_use]
    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    #[must_use]
    pub fn metadata(&self) -> &MetadataStore {
        &self.metadata
    }

    #[must_use]
    pub fn content(&self) -> &ContentStore {
        &self.content
    }

    /// Create an empty note under `subject` and return its id.
    ///
    /// # Errors
    ///
    /// - [`NotyError::DuplicateSubject`] if the subject is live; nothing
    ///   is written.
    /// - [`NotyError::Conflict`] if the settings record handed out a
    ///   different id than the descriptor was written with (another
    ///   process got there first). Both files stay on disk.
    /// - [`NotyError::Io`] on filesystem failure.
    pub fn create_note(&self, subject: &str) -> Result<NoteId> {
        if self.settings.contains_subject(subject)? {
            return Err(NotyError::DuplicateSubject(subject.to_string()));
        }

        let key = self.fresh_key();
        let content_ref = self.content.create(&key)?;

        let provisional = self.settings.peek_next_id()?;
        self.metadata
            .write(provisional, &key, subject, &content_ref)?;
        let id = self.settings.next_id_and_register(subject)?;

        if id != provisional {
            warn!(
                expected = provisional,
                actual = id,
                key = %key,
                "settings changed underneath create"
            );
            return Err(NotyError::Conflict {
                expected: provisional,
                actual: id,
            });
        }

        info!(id, subject, key = %key, "note created");
        Ok(id)
    }

    /// # Errors
    ///
    /// Returns [`NotyError::NoteNotFound`] if no live note has `id`.
    pub fn get_note(&self, id: NoteId) -> Result<NoteDescriptor> {
        self.metadata.find_by_id(id)
    }

    /// Delete note `id` and return the descriptor it had.
    ///
    /// # Errors
    ///
    /// Returns [`NotyError::NoteNotFound`] for an unknown id. A failure
    /// after the subject is released leaves the files in place with the
    /// subject already free.
    pub fn delete_note(&self, id: NoteId) -> Result<NoteDescriptor> {
        let descriptor = self.get_note(id)?;
        self.settings.release(&descriptor.subject)?;
        self.metadata.delete(&descriptor)?;
        self.content.delete(&descriptor.content_ref)?;
        info!(id, subject = %descriptor.subject, "note deleted");
        Ok(descriptor)
    }

    /// Lazily list `(id, subject)` for every live note, in storage order.
    ///
    /// # Errors
    ///
    /// Returns [`NotyError::Io`] if the metadata directory cannot be read.
    pub fn list_notes(&self) -> Result<impl Iterator<Item = Result<NoteSummary>> + '_> {
        Ok(self
            .metadata
            .read_all()?
            .map(|descriptor| descriptor.map(|d| d.summary())))
    }

    /// Path of note `id`'s content file, for handing to an editor.
    ///
    /// # Errors
    ///
    /// Returns [`NotyError::NoteNotFound`] for an unknown id, or
    /// [`NotyError::MissingFile`] if the content file is gone.
    pub fn content_path(&self, id: NoteId) -> Result<PathBuf> {
        let descriptor = self.get_note(id)?;
        let path = self.content.resolve(&descriptor.content_ref);
        if !path.is_file() {
            return Err(NotyError::MissingFile(path));
        }
        Ok(path)
    }

    fn fresh_key(&self) -> String {
        let base = key::timestamp_key(&Local::now());
        key::disambiguate(&base, |candidate| {
            self.content.contains_key(candidate) || self.metadata.contains_key(candidate)
        })
    }
}
