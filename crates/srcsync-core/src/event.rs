//! Notices sent from the core to whatever frontend is listening.
//!
//! Events flow **Core → UI** over an unbounded tokio channel. Sending never
//! blocks and a closed receiver is ignored, so the core behaves the same
//! whether or not anyone is listening.

use std::path::PathBuf;

use tokio::sync::mpsc::UnboundedSender;

/// Sending half handed to the cache.
pub type EventSender = UnboundedSender<Event>;

/// A notification the core sends back to the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A scan found no file matching the suffix filter. Frontends should
    /// show this to the user.
    NoMatchingFiles {
        dir: PathBuf,
        suffix: String,
    },
    /// A scan finished and produced a snapshot.
    ScanComplete {
        dir: PathBuf,
        files: usize,
        reloaded: usize,
        reused: usize,
    },
    /// A scan was aborted by a read failure.
    ScanFailed {
        dir: PathBuf,
        error: String,
    },
}

impl Event {
    /// Returns `true` for events meant to be shown to the user.
    pub fn is_notice(&self) -> bool {
        matches!(self, Event::NoMatchingFiles { .. } | Event::ScanFailed { .. })
    }

    /// A one-line, human-readable description.
    pub fn message(&self) -> String {
        match self {
            Event::NoMatchingFiles { dir, suffix } => {
                format!("No `{suffix}` files found in {}", dir.display())
            }
            Event::ScanComplete {
                dir,
                files,
                reloaded,
                reused,
            } => format!(
                "Scanned {}: {files} files ({reloaded} reloaded, {reused} cached)",
                dir.display()
            ),
            Event::ScanFailed { dir, error } => {
                format!("Scan of {} failed: {error}", dir.display())
            }
        }
    }
}

pub(crate) fn emit(sender: Option<&EventSender>, event: Event) {
    if let Some(tx) = sender {
        let _ = tx.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[test]
    fn no_matching_files_is_a_notice() {
        let event = Event::NoMatchingFiles {
            dir: PathBuf::from("/ai"),
            suffix: ".rs".to_string(),
        };
        assert!(event.is_notice());
        assert_eq!(event.message(), "No `.rs` files found in /ai");
    }

    #[test]
    fn scan_complete_is_not_a_notice() {
        let event = Event::ScanComplete {
            dir: PathBuf::from("/ai"),
            files: 3,
            reloaded: 1,
            reused: 2,
        };
        assert!(!event.is_notice());
        assert_eq!(event.message(), "Scanned /ai: 3 files (1 reloaded, 2 cached)");
    }

    #[test]
    fn emit_delivers_to_receiver() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let event = Event::ScanFailed {
            dir: PathBuf::from("/ai"),
            error: "gone".to_string(),
        };
        emit(Some(&tx), event.clone());
        assert_eq!(rx.try_recv().unwrap(), event);
    }

    #[test]
    fn emit_ignores_closed_or_missing_receiver() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        let event = Event::ScanFailed {
            dir: PathBuf::from("/ai"),
            error: "gone".to_string(),
        };
        emit(Some(&tx), event.clone());
        emit(None, event);
    }
}
