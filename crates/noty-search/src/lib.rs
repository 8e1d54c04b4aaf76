//! # noty-search
//!
//! Free-text search over note contents.
//!
//! Includes:
//! - Line pattern matching with grep-style context ([`pattern`])
//! - The linear note scanner ([`scanner`])
//! - Text / JSON / Markdown formatting of listings and hits ([`formatter`])

pub mod formatter;
pub mod pattern;
pub mod scanner;

pub use formatter::{format_hits, format_listing, OutputFormat};
pub use pattern::{GrepSearcher, HitLine, LineSearcher, Pattern, SearchOptions};
pub use scanner::{NoteScanner, SearchHit};
