//! Result formatting: plain text, JSON, and Markdown output.

use std::fmt::Write as _;
use std::str::FromStr;

use noty_core::note::NoteSummary;

use crate::scanner::SearchHit;

/// Output format for listings and search hits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Markdown,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "markdown" | "md" => Ok(Self::Markdown),
            other => Err(format!(
                "unknown format '{other}' (expected text, json, or markdown)"
            )),
        }
    }
}

/// Format a note listing.
#[must_use]
pub fn format_listing(notes: &[NoteSummary], format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => notes.iter().map(|n| format!("{}\n", header(n.id, &n.subject))).collect(),
        OutputFormat::Json => {
            serde_json::to_string_pretty(notes).unwrap_or_else(|_| "[]".to_string())
        }
        OutputFormat::Markdown => listing_markdown(notes),
    }
}

/// Format search hits.
#[must_use]
pub fn format_hits(hits: &[SearchHit], format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => hits_text(hits),
        OutputFormat::Json => {
            serde_json::to_string_pretty(hits).unwrap_or_else(|_| "[]".to_string())
        }
        OutputFormat::Markdown => hits_markdown(hits),
    }
}

fn header(id: i64, subject: &str) -> String {
    format!("note id: {id}, subject: {subject}")
}

fn listing_markdown(notes: &[NoteSummary]) -> String {
    if notes.is_empty() {
        return "*No notes*\n".to_string();
    }

    let mut output = String::from("| id | subject |\n| --- | --- |\n");
    for note in notes {
        let _ = writeln!(output, "| {} | {} |", note.id, escape_pipes(&note.subject));
    }
    output
}

/// Grep-style blocks: a header per note, then `N:line` / `N-line` rows,
/// with `--` between groups that are not adjacent.
fn hits_text(hits: &[SearchHit]) -> String {
    let mut output = String::new();
    for hit in hits {
        let _ = writeln!(output, "{}", header(hit.id, &hit.subject));
        push_lines(&mut output, hit);
        output.push('\n');
    }
    output
}

fn hits_markdown(hits: &[SearchHit]) -> String {
    if hits.is_empty() {
        return "*No matches*\n".to_string();
    }

    let mut output = String::new();
    for hit in hits {
        let _ = writeln!(output, "### {}. {}\n", hit.id, hit.subject);
        output.push_str("```text\n");
        push_lines(&mut output, hit);
        output.push_str("```\n\n");
    }
    output
}

fn push_lines(output: &mut String, hit: &SearchHit) {
    let mut previous: Option<usize> = None;
    for line in &hit.matched_lines {
        if previous.is_some_and(|p| line.number > p + 1) {
            output.push_str("--\n");
        }
        let _ = writeln!(output, "{line}");
        previous = Some(line.number);
    }
}

fn escape_pipes(s: &str) -> String {
    s.replace('|', "\\|")
}
