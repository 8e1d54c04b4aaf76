//! The settings record: id counter plus the registry of live subjects.
//!
//! This is a plain value. Loading and persisting it is the job of the
//! settings store in `noty-vault`, which wraps every mutation in a
//! read-modify-write cycle.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{NotyError, Result};
use crate::note::NoteId;

/// Singleton record stored at `utils/settings.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Highest id ever handed out, `-1` when none has been.
    #[serde(alias = "max_idx")]
    pub max_id: NoteId,
    /// Subjects of live notes.
    #[serde(default)]
    pub subjects: BTreeSet<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_id: -1,
            subjects: BTreeSet::new(),
        }
    }
}

impl Settings {
    /// The id the next successful [`Settings::register`] will return.
    #[must_use]
    pub fn next_id(&self) -> NoteId {
        self.max_id + 1
    }

    #[must_use]
    pub fn contains(&self, subject: &str) -> bool {
        self.subjects.contains(subject)
    }

    /// Claim the next id for `subject`.
    ///
    /// # Errors
    ///
    /// Returns [`NotyError::DuplicateSubject`] if the subject is taken.
    /// The record is left untouched in that case.
    pub fn register(&mut self, subject: &str) -> Result<NoteId> {
        if self.contains(subject) {
            return Err(NotyError::DuplicateSubject(subject.to_string()));
        }
        self.max_id += 1;
        self.subjects.insert(subject.to_string());
        Ok(self.max_id)
    }

    /// Free `subject` for reuse. The counter is not touched.
    ///
    /// # Errors
    ///
    /// Returns [`NotyError::SubjectNotFound`] if the subject is not registered.
    pub fn release(&mut self, subject: &str) -> Result<()> {
        if self.subjects.remove(subject) {
            Ok(())
        } else {
            Err(NotyError::SubjectNotFound(subject.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn fresh_record_has_no_ids() {
        let s = Settings::default();
        assert_eq!(s.max_id, -1);
        assert_eq!(s.next_id(), 0);
        assert!(s.subjects.is_empty());
    }

    #[test]
    fn register_rejects_duplicates_without_mutating() {
        let mut s = Settings::default();
        assert_eq!(s.register("taxes").unwrap(), 0);
        let before = s.clone();

        let err = s.register("taxes").unwrap_err();
        assert!(matches!(err, NotyError::DuplicateSubject(ref subj) if subj == "taxes"));
        assert_eq!(s, before);
    }

    #[test]
    fn release_keeps_counter_and_frees_subject() {
        let mut s = Settings::default();
        s.register("taxes").unwrap();
        s.register("groceries").unwrap();
        s.release("taxes").unwrap();

        assert_eq!(s.max_id, 1);
        assert!(!s.contains("taxes"));
        assert_eq!(s.register("taxes").unwrap(), 2);
    }

    #[test]
    fn release_unknown_subject_is_not_found() {
        let mut s = Settings::default();
        let err = s.release("nope").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn legacy_record_deserializes() {
        let legacy = r#"{"max_idx": 3, "subjects": ["a", "b"]}"#;
        let s: Settings = serde_json::from_str(legacy).unwrap();
        assert_eq!(s.max_id, 3);
        assert!(s.contains("a"));
        assert!(s.contains("b"));
    }

    proptest! {
        #[test]
        fn ids_are_dense_and_increasing(subjects in prop::collection::btree_set("[a-z]{1,8}", 1..40)) {
            let mut s = Settings::default();
            let ids: Vec<NoteId> = subjects.iter().map(|subj| s.register(subj).unwrap()).collect();
            let expected: Vec<NoteId> = (0..subjects.len() as NoteId).collect();
            prop_assert_eq!(ids, expected);
        }

        #[test]
        fn counter_never_decreases(ops in prop::collection::vec((any::<bool>(), 0usize..5), 1..60)) {
            let mut s = Settings::default();
            let pool = ["a", "b", "c", "d", "e"];
            let mut last = s.max_id;
            for (create, idx) in ops {
                let subject = pool[idx];
                if create {
                    let _ = s.register(subject);
                } else {
                    let _ = s.release(subject);
                }
                prop_assert!(s.max_id >= last);
                last = s.max_id;
            }
        }
    }
}
