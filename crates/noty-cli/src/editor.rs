//! Launch the user's text editor on a note.

use std::path::Path;
use std::process::Command;

use tracing::{debug, warn};

use noty_core::capability::Editor;
use noty_core::error::{NotyError, Result};

/// Runs a configured command with the content file appended as the last
/// argument, e.g. `code -w` becomes `code -w <path>`.
///
/// A command that names an existing file is run as-is, so a program path
/// containing spaces needs no quoting.
#[derive(Debug, Clone)]
pub struct CommandEditor {
    command: String,
}

impl CommandEditor {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    fn program_and_args(&self) -> Result<(&str, Vec<&str>)> {
        let command = self.command.trim();
        if command.contains(char::is_whitespace) && Path::new(command).is_file() {
            return Ok((command, Vec::new()));
        }
        let mut parts = command.split_whitespace();
        let program = parts
            .next()
            .ok_or_else(|| NotyError::Config("editor command is empty".to_string()))?;
        Ok((program, parts.collect()))
    }
}

impl Editor for CommandEditor {
    fn open(&self, content: &Path) -> Result<()> {
        let (program, args) = self.program_and_args()?;

        debug!(program, path = %content.display(), "launching editor");
        let status = Command::new(program).args(args).arg(content).status()?;
        if !status.success() {
            warn!(program, %status, "editor exited unsuccessfully");
        }
        Ok(())
    }
}
