//! Runtime configuration.
//!
//! Sources, lowest precedence first: built-in defaults, a TOML file
//! (`--config` or `$NOTY_CONFIG`), environment variables (a `.env` file
//! is loaded into the environment beforehand), command-line flags.
//!
//! ```toml
//! root = "/home/me/.noty"
//! editor = "nvim"
//! backup_dir = "/mnt/backup/noty"
//!
//! [search]
//! context_lines = 2
//! max_matches = 3
//! ```

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use noty_search::SearchOptions;

const DEFAULT_EDITOR: &str = "vi";
const DEFAULT_DIR_NAME: &str = ".noty";

/// Shape of the TOML config file. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub root: Option<PathBuf>,
    pub editor: Option<String>,
    pub backup_dir: Option<PathBuf>,
    pub search: SearchSection,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchSection {
    pub context_lines: Option<usize>,
    pub max_matches: Option<usize>,
}

/// Values given on the command line; they win over everything else.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub config: Option<PathBuf>,
    pub root: Option<PathBuf>,
    pub editor: Option<String>,
}

/// Fully resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotyConfig {
    pub root: PathBuf,
    pub editor: String,
    pub backup_dir: Option<PathBuf>,
    pub search: SearchOptions,
}

impl NotyConfig {
    /// Resolve configuration from the process environment.
    pub fn load(overrides: Overrides) -> Result<Self> {
        Self::resolve(overrides, |key| std::env::var(key).ok())
    }

    /// Resolve configuration with `env` standing in for the environment.
    pub fn resolve(overrides: Overrides, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let config_path = overrides
            .config
            .clone()
            .or_else(|| non_empty(env("NOTY_CONFIG")).map(PathBuf::from));
        let file = match config_path {
            Some(path) => read_file_config(&path)?,
            None => FileConfig::default(),
        };

        let root = match overrides.root {
            Some(root) => root,
            None => env_root(&env)
                .or(file.root)
                .or_else(|| non_empty(env("HOME")).map(|home| PathBuf::from(home).join(DEFAULT_DIR_NAME)))
                .context("no repository root: set NOTY_ROOT, pass --root, or set HOME")?,
        };

        let editor = overrides
            .editor
            .or_else(|| non_empty(env("NOTY_EDITOR")))
            .or_else(|| non_empty(env("text_editor")))
            .or(file.editor)
            .or_else(|| non_empty(env("EDITOR")))
            .unwrap_or_else(|| DEFAULT_EDITOR.to_string());

        let backup_dir = non_empty(env("NOTY_BACKUP_DIR"))
            .map(PathBuf::from)
            .or(file.backup_dir);

        let defaults = SearchOptions::default();
        let search = SearchOptions {
            context_lines: file.search.context_lines.unwrap_or(defaults.context_lines),
            max_matches: file.search.max_matches.unwrap_or(defaults.max_matches),
        };

        Ok(Self {
            root,
            editor,
            backup_dir,
            search,
        })
    }
}

/// `NOTY_ROOT` names the root itself; the older `path_root` / `root_path`
/// keys name the directory that contains `.noty/`.
fn env_root(env: &impl Fn(&str) -> Option<String>) -> Option<PathBuf> {
    if let Some(root) = non_empty(env("NOTY_ROOT")) {
        return Some(PathBuf::from(root));
    }
    non_empty(env("path_root"))
        .or_else(|| non_empty(env("root_path")))
        .map(|parent| PathBuf::from(parent).join(DEFAULT_DIR_NAME))
}

fn read_file_config(path: &Path) -> Result<FileConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let config: FileConfig = toml::from_str(&raw)
        .with_context(|| format!("invalid config file {}", path.display()))?;
    if config.editor.as_deref().is_some_and(|e| e.trim().is_empty()) {
        bail!("config file {}: editor must not be empty", path.display());
    }
    Ok(config)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
