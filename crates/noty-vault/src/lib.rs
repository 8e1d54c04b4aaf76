//! # noty-vault
//!
//! File system stores and the note repository.
//!
//! The files under the repository root are the only source of truth:
//! content files in `notes/`, descriptors in `metadatas/`, and the
//! settings record in `utils/`. [`NoteRepository`] is the only type
//! that mutates them and keeps the three consistent across create and
//! delete. Nothing here locks; one process per root is assumed.

mod fsutil;

pub mod content_store;
pub mod layout;
pub mod metadata_store;
pub mod reconcile;
pub mod repository;
pub mod settings_store;

pub use content_store::ContentStore;
pub use layout::VaultLayout;
pub use metadata_store::{Descriptors, MetadataStore};
pub use reconcile::ReconcileReport;
pub use repository::NoteRepository;
pub use settings_store::SettingsStore;
