//! Terminal implementation of the selection dialog.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use srcsync_core::{CoreResult, SelectionDialog, SelectionFilter};

/// Asks on stdin/stdout, unless the answer was given on the command line.
pub struct TerminalDialog {
    preset: Option<PathBuf>,
    assume_yes: bool,
}

impl TerminalDialog {
    pub fn new(preset: Option<PathBuf>, assume_yes: bool) -> Self {
        Self { preset, assume_yes }
    }
}

#[async_trait]
impl SelectionDialog for TerminalDialog {
    async fn request_selection(&self, filter: SelectionFilter) -> CoreResult<Option<PathBuf>> {
        if let Some(path) = &self.preset {
            return Ok(Some(path.clone()));
        }
        let label = match filter {
            SelectionFilter::Directory => "directory",
            SelectionFilter::File => "file",
        };
        let answer = prompt(format!("Select a {label} (empty to cancel): ")).await?;
        Ok(parse_selection(&answer))
    }

    async fn request_read_permission(&self, path: &Path) -> CoreResult<bool> {
        if self.assume_yes {
            return Ok(true);
        }
        let answer = prompt(format!(
            "Allow srcsync to read {}? [y/N] ",
            path.display()
        ))
        .await?;
        Ok(is_yes(&answer))
    }
}

/// Prints `message` and reads one line from stdin. EOF reads as an empty
/// line.
pub async fn prompt(message: String) -> io::Result<String> {
    tokio::task::spawn_blocking(move || {
        let mut stdout = io::stdout();
        stdout.write_all(message.as_bytes())?;
        stdout.flush()?;
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        Ok(line)
    })
    .await
    .map_err(io::Error::other)?
}

fn parse_selection(answer: &str) -> Option<PathBuf> {
    let trimmed = answer.trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.strip_prefix("~/") {
        Some(rest) => match std::env::var("HOME") {
            Ok(home) => Some(PathBuf::from(home).join(rest)),
            Err(_) => Some(PathBuf::from(trimmed)),
        },
        None => Some(PathBuf::from(trimmed)),
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
