//! # noty-core
//!
//! Core types for the noty note repository.
//!
//! This crate defines the foundational types shared by the other noty crates:
//! - [`NoteDescriptor`] and [`ContentRef`]: the per-note metadata record
//! - [`Settings`]: the id counter and subject registry
//! - Storage key generation ([`key`])
//! - Capability traits for external tools ([`Editor`], [`Mirror`])
//! - Error hierarchy ([`NotyError`])

pub mod capability;
pub mod error;
pub mod key;
pub mod note;
pub mod settings;

pub use capability::{Editor, Mirror, NoMirror};
pub use error::{NotyError, Result};
pub use note::{ContentRef, NoteDescriptor, NoteId, NoteSummary};
pub use settings::Settings;
