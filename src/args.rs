//! Command-line argument definitions.
//!
//! This module defines the CLI surfaced by `desktop-entries`.

// -- std imports
use std::path::PathBuf;

// -- crate imports
use clap::{Parser, Subcommand};

/// Command-line arguments for `desktop-entries`.
///
/// Use `--help` to see all options and defaults.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "desktop-entries",
    about = "Locate .desktop files by XDG priority and print their parsed sections"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Print JSON output (machine readable)
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all logging output
    #[arg(long, global = true)]
    pub no_log: bool,

    /// Home directory used for user-local dirs (defaults to $HOME)
    #[arg(long, global = true)]
    pub home: Option<PathBuf>,

    /// Base directory searched for an `applications` dir (can be passed multiple times;
    /// replaces $XDG_DATA_DIRS)
    #[arg(long = "data-dir", global = true)]
    pub data_dirs: Vec<PathBuf>,

    /// Fail instead of skipping directories that exist but cannot be listed
    #[arg(long, global = true)]
    pub strict_dirs: bool,

    /// Let the first directory providing a file name win, not only the user-local one
    #[arg(long, global = true)]
    pub first_wins: bool,
}

/// What to print.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print the directories searched for .desktop files, highest priority first
    Dirs,

    /// Print the .desktop files in priority order
    Files,

    /// Parse the given .desktop files and print their sections
    Show {
        /// Files to parse
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Parse every located .desktop file and print a report
    Dump {
        /// Max concurrent parses (defaults to CPU count * 4)
        #[arg(long)]
        jobs: Option<usize>,
    },
}
