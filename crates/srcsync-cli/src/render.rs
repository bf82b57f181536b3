//! Plain-text and JSON output of snapshots.

use std::io::{self, Write};

use chrono::{DateTime, Local};
use srcsync_core::config::settings::UiConfig;
use srcsync_core::{ScanStats, Snapshot};

/// Formats epoch milliseconds in local time. Out-of-range values print raw.
pub fn format_timestamp(ms: i64, format: &str) -> String {
    match DateTime::from_timestamp_millis(ms) {
        Some(utc) => utc.with_timezone(&Local).format(format).to_string(),
        None => ms.to_string(),
    }
}

/// Writes one line per file plus the first `ui.preview_lines` lines of
/// each, followed by a summary line.
pub fn write_snapshot<W: Write>(
    out: &mut W,
    snapshot: &Snapshot,
    stats: &ScanStats,
    ui: &UiConfig,
) -> io::Result<()> {
    let width = snapshot
        .iter()
        .map(|f| f.name.chars().count())
        .max()
        .unwrap_or(0);

    for file in snapshot {
        writeln!(
            out,
            "{:<width$}  {}  {} lines",
            file.name,
            format_timestamp(file.last_modified, &ui.date_format),
            file.contents.lines().count(),
        )?;
        for line in file.contents.lines().take(ui.preview_lines) {
            writeln!(out, "    │ {line}")?;
        }
    }

    writeln!(
        out,
        "{} files ({} reloaded, {} cached)",
        stats.listed, stats.reloaded, stats.reused
    )
}

pub fn write_json<W: Write>(out: &mut W, snapshot: &Snapshot) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *out, snapshot)?;
    writeln!(out)?;
    Ok(())
}
