//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Overseas-day counter.
///
/// Reads border-crossing records, repairs document mismatches between paired
/// exits and entries, and counts the calendar days spent abroad.
#[derive(Debug, Parser)]
#[command(name = "od", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Align entry documents with their paired exits and report anomalies.
    ///
    /// Corrected events are written to stdout as JSON Lines; issues go to
    /// stderr.
    Correct {
        /// Event file (JSON array or JSON Lines), or `-` for stdin.
        input: PathBuf,

        /// Output the full correction result as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Count days spent abroad within a window.
    Count {
        /// Event file (JSON array or JSON Lines), or `-` for stdin.
        input: PathBuf,

        /// Window start: YYYY-MM-DD, RFC 3339, or relative ("30 days ago").
        #[arg(long)]
        from: String,

        /// Window end (inclusive), same formats as --from.
        #[arg(long)]
        to: String,

        /// Day used to close stays with no entry (defaults to the current day).
        #[arg(long)]
        today: Option<String>,

        /// Skip the document-matching correction pass.
        #[arg(long)]
        no_correct: bool,

        /// Also show days per travel document.
        #[arg(long)]
        per_document: bool,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
}
