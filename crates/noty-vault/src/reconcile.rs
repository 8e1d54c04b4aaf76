//! Consistency check between the settings record and the files on disk.
//!
//! A crash between the steps of create or delete leaves one of a few
//! recognizable states: a descriptor whose subject was never
//! registered, a subject still registered after its files are gone, or
//! a content file without a descriptor. The settings record can always
//! be rebuilt from a full descriptor scan; files are never deleted here.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::PathBuf;

use serde::Serialize;
use tracing::{info, warn};

use noty_core::error::Result;
use noty_core::note::{NoteId, NoteSummary};
use noty_core::settings::Settings;

use crate::repository::NoteRepository;

/// Findings of one reconcile pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    /// Registered in settings, carried by no descriptor.
    pub stale_subjects: Vec<String>,
    /// Carried by a descriptor, missing from settings.
    pub unregistered_subjects: Vec<String>,
    /// Carried by more than one descriptor.
    pub duplicate_subjects: Vec<String>,
    pub max_id: NoteId,
    pub highest_descriptor_id: Option<NoteId>,
    /// Descriptors whose content file does not exist.
    pub missing_content: Vec<NoteSummary>,
    /// Content files no descriptor points at.
    pub orphaned_content: Vec<PathBuf>,
    /// Whether the settings record was rewritten.
    pub repaired: bool,
}

impl ReconcileReport {
    /// `max_id` is behind an id already on disk.
    #[must_use]
    pub fn counter_behind(&self) -> bool {
        self.highest_descriptor_id
            .is_some_and(|highest| highest > self.max_id)
    }

    /// True when no finding needs attention.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.stale_subjects.is_empty()
            && self.unregistered_subjects.is_empty()
            && self.duplicate_subjects.is_empty()
            && !self.counter_behind()
            && self.missing_content.is_empty()
            && self.orphaned_content.is_empty()
    }
}

impl NoteRepository {
    /// Compare settings against a full scan of descriptors and content files.
    ///
    /// With `repair`, the settings record is rewritten so that `subjects`
    /// is exactly the set of descriptor subjects and `max_id` is at least
    /// the highest descriptor id. The counter never moves backwards.
    ///
    /// # Errors
    ///
    /// Returns the first read or decode failure met during the scan, or
    /// a write failure while repairing.
    pub fn reconcile(&self, repair: bool) -> Result<ReconcileReport> {
        let settings = self.settings.load()?;

        let mut by_subject: BTreeMap<String, usize> = BTreeMap::new();
        let mut highest: Option<NoteId> = None;
        let mut referenced: HashSet<PathBuf> = HashSet::new();
        let mut missing_content = Vec::new();

        for descriptor in self.metadata.read_all()? {
            let descriptor = descriptor?;
            *by_subject.entry(descriptor.subject.clone()).or_default() += 1;
            highest = Some(highest.map_or(descriptor.id, |h| h.max(descriptor.id)));

            let path = self.content.resolve(&descriptor.content_ref);
            if !path.is_file() {
                missing_content.push(descriptor.summary());
            }
            referenced.insert(path);
        }
        missing_content.sort();

        let live: BTreeSet<String> = by_subject.keys().cloned().collect();
        let mut report = ReconcileReport {
            stale_subjects: settings.subjects.difference(&live).cloned().collect(),
            unregistered_subjects: live.difference(&settings.subjects).cloned().collect(),
            duplicate_subjects: by_subject
                .iter()
                .filter(|(_, count)| **count > 1)
                .map(|(subject, _)| subject.clone())
                .collect(),
            max_id: settings.max_id,
            highest_descriptor_id: highest,
            missing_content,
            orphaned_content: self
                .content
                .files()?
                .into_iter()
                .filter(|path| !referenced.contains(path))
                .collect(),
            repaired: false,
        };

        if report.is_consistent() {
            return Ok(report);
        }
        warn!(
            stale = report.stale_subjects.len(),
            unregistered = report.unregistered_subjects.len(),
            duplicates = report.duplicate_subjects.len(),
            missing_content = report.missing_content.len(),
            orphaned_content = report.orphaned_content.len(),
            "repository is inconsistent"
        );

        let settings_drift = !report.stale_subjects.is_empty()
            || !report.unregistered_subjects.is_empty()
            || report.counter_behind();
        if repair && settings_drift {
            let rebuilt = Settings {
                max_id: highest.map_or(settings.max_id, |h| h.max(settings.max_id)),
                subjects: live,
            };
            self.settings.replace(&rebuilt)?;
            report.repaired = true;
            info!(max_id = rebuilt.max_id, subjects = rebuilt.subjects.len(), "settings rebuilt from descriptors");
        }

        Ok(report)
    }
}
