//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "srcsync", version, about = "Keep a directory of source files in sync, in memory")]
pub struct Args {
    /// Config file (defaults to ~/.config/srcsync/config.toml).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load every matching file in a directory and rescan on demand.
    Scan(ScanArgs),
    /// Print one file's current text.
    Read(ReadArgs),
}

#[derive(clap::Args, Debug)]
pub struct ScanArgs {
    /// Directory to scan. Prompts when omitted.
    pub dir: Option<PathBuf>,

    /// Only files whose name ends with this are loaded.
    #[arg(short, long)]
    pub suffix: Option<String>,

    /// Grant read access without asking.
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Print the snapshot as JSON and exit.
    #[arg(long, conflicts_with = "interval")]
    pub json: bool,

    /// Rescan every SECS seconds instead of waiting for input.
    #[arg(short, long, value_name = "SECS")]
    pub interval: Option<u64>,
}

#[derive(clap::Args, Debug)]
pub struct ReadArgs {
    /// File to read. Prompts when omitted.
    pub file: Option<PathBuf>,

    /// Grant read access without asking.
    #[arg(short = 'y', long)]
    pub yes: bool,
}
