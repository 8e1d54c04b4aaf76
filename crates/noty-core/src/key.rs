//! Storage keys: creation timestamps that name a note's two files.

use chrono::{DateTime, TimeZone};

/// `YYYY_MM_DD-HH_MM_SS_ffffff`, microsecond resolution.
pub const KEY_FORMAT: &str = "%Y_%m_%d-%H_%M_%S_%6f";

/// Format a timestamp as a storage key.
#[must_use]
pub fn timestamp_key<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format(KEY_FORMAT).to_string()
}

/// Return `base`, or `base-N` for the smallest `N >= 1` that is free.
///
/// Two creates inside the same microsecond (or a clock step backwards)
/// would otherwise collide on file names.
pub fn disambiguate(base: &str, mut is_taken: impl FnMut(&str) -> bool) -> String {
    if !is_taken(base) {
        return base.to_string();
    }
    let mut n = 1u32;
    loop {
        let candidate = format!("{base}-{n}");
        if !is_taken(&candidate) {
            return candidate;
        }
        n += 1;
    }
}
