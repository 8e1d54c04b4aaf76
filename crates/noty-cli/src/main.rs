//! noty CLI: subject-tagged plain-file notes.
//!
//! Commands: create, delete, launch, list, search, check, completions

mod app;
mod backup;
mod config;
mod editor;

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use noty_core::capability::{Mirror, NoMirror};
use noty_core::note::NoteId;
use noty_search::{format_hits, format_listing, OutputFormat, Pattern, SearchOptions};
use noty_vault::ReconcileReport;

use crate::app::Noty;
use crate::backup::DirMirror;
use crate::config::{NotyConfig, Overrides};
use crate::editor::CommandEditor;

#[derive(Parser)]
#[command(name = "noty")]
#[command(version)]
#[command(about = "Subject-tagged plain-file notes")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Repository root (default: $NOTY_ROOT, config file, or ~/.noty)
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// TOML config file (default: $NOTY_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Editor command used by create and launch
    #[arg(long, global = true)]
    editor: Option<String>,

    /// Output format: text, json, markdown
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Create a note and open it in the editor
    #[command(alias = "c")]
    Create {
        #[arg(value_parser = clap::builder::NonEmptyStringValueParser::new())]
        subject: String,
        /// Do not open the editor after creating
        #[arg(long)]
        no_launch: bool,
    },
    /// Delete a note
    #[command(alias = "rm")]
    Delete { id: NoteId },
    /// Open an existing note in the editor
    #[command(alias = "open")]
    Launch { id: NoteId },
    /// List notes
    #[command(alias = "ls")]
    List,
    /// Search note contents
    #[command(alias = "s")]
    Search {
        text: String,
        /// Lines of context around each match
        #[arg(short = 'C', long)]
        context: Option<usize>,
        /// Matches shown per note
        #[arg(short = 'm', long)]
        max_count: Option<usize>,
        /// Treat TEXT as a regular expression
        #[arg(long)]
        regex: bool,
    },
    /// Check settings against the files on disk
    Check {
        /// Rebuild the settings record from the descriptors
        #[arg(long)]
        repair: bool,
    },
    /// Print a shell completion script
    Completions { shell: clap_complete::Shell },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_env("NOTY_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<ExitCode> {
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        println!();
        return Ok(ExitCode::SUCCESS);
    };
    let overrides = Overrides {
        config: cli.config,
        root: cli.root,
        editor: cli.editor,
    };

    let mut out = io::stdout().lock();
    match command {
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "noty", &mut out);
        }
        Commands::Create { subject, no_launch } => {
            let (app, _) = open(overrides)?;
            let id = app
                .create(&subject, !no_launch)
                .with_context(|| format!("failed to create note '{subject}'"))?;
            match cli.format {
                OutputFormat::Json => writeln!(out, "{}", serde_json::json!({ "id": id, "subject": subject }))?,
                _ => writeln!(out, "created note {id}: {subject}")?,
            }
        }
        Commands::Delete { id } => {
            let (app, _) = open(overrides)?;
            let removed = app
                .delete(id)
                .with_context(|| format!("failed to delete note {id}"))?;
            match cli.format {
                OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(&removed)?)?,
                _ => writeln!(out, "deleted note {}: {}", removed.id, removed.subject)?,
            }
        }
        Commands::Launch { id } => {
            let (app, _) = open(overrides)?;
            app.launch(id)
                .with_context(|| format!("failed to launch note {id}"))?;
        }
        Commands::List => {
            let (app, _) = open(overrides)?;
            let notes = app.list().context("failed to list notes")?;
            emit(&mut out, &format_listing(&notes, cli.format))?;
        }
        Commands::Search {
            text,
            context,
            max_count,
            regex,
        } => {
            let pattern = if regex {
                Pattern::regex(&text)?
            } else {
                Pattern::literal(text)
            };
            let (app, config) = open(overrides)?;
            let opts = SearchOptions {
                context_lines: context.unwrap_or(config.search.context_lines),
                max_matches: max_count.unwrap_or(config.search.max_matches),
            };
            let hits = app.search(&pattern, opts).context("search failed")?;
            emit(&mut out, &format_hits(&hits, cli.format))?;
        }
        Commands::Check { repair } => {
            let (app, _) = open(overrides)?;
            let report = app.check(repair).context("consistency check failed")?;
            emit(&mut out, &format_report(&report, cli.format)?)?;
            if !report.is_consistent() && !report.repaired {
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Resolve configuration, then open (and mirror) the repository.
fn open(overrides: Overrides) -> Result<(Noty<CommandEditor>, NotyConfig)> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            return Err(e).context("failed to load .env");
        }
    }
    let config = NotyConfig::load(overrides)?;
    tracing::debug!(root = %config.root.display(), editor = %config.editor, "configuration resolved");

    let mirror: Box<dyn Mirror> = match &config.backup_dir {
        Some(dir) => Box::new(DirMirror::new(dir)),
        None => Box::new(NoMirror),
    };
    let app = Noty::open(&config.root, CommandEditor::new(&config.editor), mirror.as_ref())
        .with_context(|| format!("failed to open repository at {}", config.root.display()))?;
    Ok((app, config))
}

/// Write `text`, terminated by a newline if it is not already.
fn emit(out: &mut impl Write, text: &str) -> io::Result<()> {
    out.write_all(text.as_bytes())?;
    if !text.is_empty() && !text.ends_with('\n') {
        out.write_all(b"\n")?;
    }
    Ok(())
}

fn format_report(report: &ReconcileReport, format: OutputFormat) -> Result<String> {
    if format == OutputFormat::Json {
        return Ok(serde_json::to_string_pretty(report)?);
    }

    if report.is_consistent() {
        return Ok("repository is consistent\n".to_string());
    }

    let mut lines = Vec::new();
    for subject in &report.stale_subjects {
        lines.push(format!("stale subject (no note): {subject}"));
    }
    for subject in &report.unregistered_subjects {
        lines.push(format!("unregistered subject: {subject}"));
    }
    for subject in &report.duplicate_subjects {
        lines.push(format!("subject used by several notes: {subject}"));
    }
    if report.counter_behind() {
        lines.push(format!(
            "id counter {} is behind highest note id {}",
            report.max_id,
            report.highest_descriptor_id.unwrap_or(report.max_id)
        ));
    }
    for note in &report.missing_content {
        lines.push(format!("note {} ({}) has no content file", note.id, note.subject));
    }
    for path in &report.orphaned_content {
        lines.push(format!("orphaned content file: {}", path.display()));
    }
    if report.repaired {
        lines.push("settings rebuilt from notes".to_string());
    }
    Ok(lines.join("\n") + "\n")
}
