//! Line-oriented pattern matching with grep-style context windows.

use std::collections::VecDeque;
use std::fmt;
use std::io::BufRead;

use regex::Regex;
use serde::{Deserialize, Serialize};

use noty_core::error::{NotyError, Result};

/// What to look for on each line. Matching is case-sensitive.
#[derive(Debug, Clone)]
pub enum Pattern {
    Literal(String),
    Regex(Regex),
}

impl Pattern {
    pub fn literal(text: impl Into<String>) -> Self {
        Self::Literal(text.into())
    }

    /// # Errors
    ///
    /// Returns [`NotyError::Pattern`] if `expr` is not a valid regular expression.
    pub fn regex(expr: &str) -> Result<Self> {
        Regex::new(expr)
            .map(Self::Regex)
            .map_err(|e| NotyError::Pattern(e.to_string()))
    }

    #[must_use]
    pub fn is_match(&self, line: &str) -> bool {
        match self {
            Self::Literal(text) => line.contains(text.as_str()),
            Self::Regex(re) => re.is_match(line),
        }
    }
}

/// Knobs for one search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOptions {
    /// Lines of context printed before and after each match.
    pub context_lines: usize,
    /// Matches counted per note before the scan of that note stops.
    pub max_matches: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            context_lines: 1,
            max_matches: 1,
        }
    }
}

/// One emitted line: a match or surrounding context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitLine {
    /// 1-based line number in the content file.
    pub number: usize,
    pub text: String,
    pub is_match: bool,
}

impl fmt::Display for HitLine {
    /// `12:text` for matches, `12-text` for context, like `grep -n`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sep = if self.is_match { ':' } else { '-' };
        write!(f, "{}{}{}", self.number, sep, self.text)
    }
}

/// The search primitive run over each note's content.
pub trait LineSearcher {
    /// Scan `reader` and return matched and context lines in file order,
    /// each line at most once. Empty means no match.
    ///
    /// # Errors
    ///
    /// Returns [`NotyError::Io`] if reading fails.
    fn search_lines(
        &self,
        reader: &mut dyn BufRead,
        pattern: &Pattern,
        opts: &SearchOptions,
    ) -> Result<Vec<HitLine>>;
}

/// In-process searcher with `grep -n -A c -B c -m n` semantics.
///
/// Once `max_matches` is reached the trailing context of the last match
/// is still emitted, then the scan stops.
#[derive(Debug, Default, Clone, Copy)]
pub struct GrepSearcher;

impl LineSearcher for GrepSearcher {
    fn search_lines(
        &self,
        reader: &mut dyn BufRead,
        pattern: &Pattern,
        opts: &SearchOptions,
    ) -> Result<Vec<HitLine>> {
        let mut out = Vec::new();
        if opts.max_matches == 0 {
            return Ok(out);
        }

        let mut before: VecDeque<(usize, String)> = VecDeque::new();
        let mut last_emitted = 0usize;
        let mut after_remaining = 0usize;
        let mut matches = 0usize;
        let mut number = 0usize;
        let mut buf = Vec::new();

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            number += 1;
            let text = decode_line(&buf);

            if matches < opts.max_matches && pattern.is_match(&text) {
                for (n, t) in before.drain(..) {
                    if n > last_emitted {
                        out.push(HitLine {
                            number: n,
                            text: t,
                            is_match: false,
                        });
                    }
                }
                out.push(HitLine {
                    number,
                    text,
                    is_match: true,
                });
                last_emitted = number;
                matches += 1;
                after_remaining = opts.context_lines;
                continue;
            }

            if after_remaining > 0 {
                out.push(HitLine {
                    number,
                    text: text.clone(),
                    is_match: false,
                });
                last_emitted = number;
                after_remaining -= 1;
            } else if matches >= opts.max_matches {
                break;
            }

            if opts.context_lines > 0 {
                if before.len() == opts.context_lines {
                    before.pop_front();
                }
                before.push_back((number, text));
            }
        }

        Ok(out)
    }
}

fn decode_line(raw: &[u8]) -> String {
    let line = raw.strip_suffix(b"\n").unwrap_or(raw);
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    String::from_utf8_lossy(line).into_owned()
}
