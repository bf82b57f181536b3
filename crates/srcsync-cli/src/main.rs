//! srcsync: load a directory of source files and keep it fresh.
//!
//! This binary acquires a directory (or file) through a terminal dialog,
//! then scans it once, on demand, or on a timer.

mod cli;
mod dialog;
mod render;

use std::future::Future;
use std::io::{self, Write};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use srcsync_core::config::settings::LogConfig;
use srcsync_core::{
    Config, CoreError, DirectoryAccessGateway, DirectorySession, Event, SingleFileAccessor,
};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use crate::cli::{Args, Command, ReadArgs, ScanArgs};
use crate::dialog::{prompt, TerminalDialog};

/// What the user asked for at the rescan prompt.
#[derive(Debug, PartialEq, Eq)]
enum LoopAction {
    Rescan,
    Reload,
    Quit,
}

fn parse_loop_action(line: &str) -> LoopAction {
    match line.trim() {
        "q" | "quit" => LoopAction::Quit,
        "c" | "clear" => LoopAction::Reload,
        _ => LoopAction::Rescan,
    }
}

/// Logs to the configured file so terminal output stays readable.
fn init_tracing(log: &LogConfig) -> anyhow::Result<()> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log.file)
        .with_context(|| format!("failed to open log file {}", log.file.display()))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("srcsync={0},srcsync_core={0}", log.level))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config_path = args.config.clone().unwrap_or_else(Config::default_path);
    let config = Config::load_or_default(&config_path)
        .with_context(|| format!("failed to load {}", config_path.display()))?;

    init_tracing(&config.log)?;
    tracing::debug!(config = %config_path.display(), "starting");

    let result = match args.command {
        Command::Scan(scan) => run_scan(scan, config).await,
        Command::Read(read) => run_read(read).await,
    };

    match result {
        Err(e) if is_cancelled(&e) => {
            eprintln!("Cancelled.");
            Ok(())
        }
        other => other,
    }
}

fn is_cancelled(e: &anyhow::Error) -> bool {
    e.downcast_ref::<CoreError>()
        .is_some_and(CoreError::is_cancelled)
}

async fn run_read(args: ReadArgs) -> anyhow::Result<()> {
    let gateway = DirectoryAccessGateway::local(TerminalDialog::new(args.file, args.yes));
    let accessor = SingleFileAccessor::new(gateway.request_file().await?);
    let text = accessor.read().await?;

    let mut stdout = io::stdout().lock();
    stdout.write_all(text.as_bytes())?;
    if !text.ends_with('\n') {
        writeln!(stdout)?;
    }
    Ok(())
}

async fn run_scan(args: ScanArgs, config: Config) -> anyhow::Result<()> {
    let suffix = args
        .suffix
        .unwrap_or_else(|| config.scan.suffix.clone());
    let assume_yes = args.yes || !config.scan.confirm_access;
    let gateway = DirectoryAccessGateway::local(TerminalDialog::new(args.dir, assume_yes));
    let capability = gateway.request_directory().await?;

    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let notices = tokio::spawn(print_notices(events_rx));
    let session = DirectorySession::with_events(capability, suffix, events_tx);

    let result = if args.json {
        scan_json(&session).await
    } else if let Some(secs) = args.interval {
        scan_periodically(
            &session,
            Duration::from_secs(secs.max(1)),
            &config,
            tokio::signal::ctrl_c(),
        )
        .await
    } else {
        scan_interactively(&session, &config).await
    };

    // Dropping the session closes the channel so the printer can finish.
    drop(session);
    let _ = notices.await;
    result
}

async fn print_notices(mut rx: mpsc::UnboundedReceiver<Event>) {
    while let Some(event) = rx.recv().await {
        if event.is_notice() {
            eprintln!("! {}", event.message());
        } else {
            tracing::debug!("{}", event.message());
        }
    }
}

async fn scan_json(session: &DirectorySession) -> anyhow::Result<()> {
    let snapshot = session.scan().await?;
    render::write_json(&mut io::stdout().lock(), &snapshot)
}

/// Runs one scan and prints it. Errors that a later scan may clear up are
/// reported and swallowed; anything else is returned.
async fn scan_and_print(session: &DirectorySession, config: &Config) -> anyhow::Result<()> {
    match session.scan_with_stats().await {
        Ok((snapshot, stats)) => {
            render::write_snapshot(&mut io::stdout().lock(), &snapshot, &stats, &config.ui)?;
            Ok(())
        }
        // the notice printer already told the user
        Err(CoreError::NoMatchingFiles { .. } | CoreError::ReadFailure { .. }) => Ok(()),
        Err(e) => Err(e.into()),
    }
}

async fn scan_interactively(session: &DirectorySession, config: &Config) -> anyhow::Result<()> {
    scan_and_print(session, config).await?;
    loop {
        let line = prompt("[Enter] rescan  [c] reload all  [q] quit > ".to_string()).await?;
        // EOF reads as an empty line; treat a closed stdin as quit
        if line.is_empty() {
            return Ok(());
        }
        match parse_loop_action(&line) {
            LoopAction::Quit => return Ok(()),
            LoopAction::Reload => {
                session.cache().clear();
                scan_and_print(session, config).await?;
            }
            LoopAction::Rescan => scan_and_print(session, config).await?,
        }
    }
}

/// Scans every `period` until `shutdown` resolves. `shutdown` is polled
/// ahead of the ticker and lives across passes, so a signal that arrives
/// mid-scan ends the loop once that scan returns.
async fn scan_periodically<F>(
    session: &DirectorySession,
    period: Duration,
    config: &Config,
    shutdown: F,
) -> anyhow::Result<()>
where
    F: Future<Output = io::Result<()>>,
{
    let mut ticker = tokio::time::interval(period);
    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            biased;
            _ = &mut shutdown => {
                tracing::info!("interrupted");
                return Ok(());
            }
            _ = ticker.tick() => scan_and_print(session, config).await?,
        }
    }
}
