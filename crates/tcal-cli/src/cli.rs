//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Plain-text weekly schedule to iCalendar converter.
///
/// Reads schedules written in the terse French notation
/// (`semaine du 12/09`, `LUNDI 8h00-10h00: Maths (Prof X) [Salle 12]`)
/// and produces machine-importable calendar files.
#[derive(Debug, Parser)]
#[command(name = "tcal", version, about, long_about = None)]
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
    /// Convert schedule text files into iCalendar files.
    Convert {
        /// Input schedule text files.
        #[arg(short, long, required = true, num_args = 1..)]
        input: Vec<PathBuf>,

        /// Output iCalendar files, one per input.
        #[arg(short, long, required = true, num_args = 1..)]
        output: Vec<PathBuf>,

        /// Location applied to every timed event lacking one.
        #[arg(short, long)]
        location: Option<String>,
    },

    /// Print a parsed schedule in human-readable form.
    Show {
        /// Schedule text file.
        file: PathBuf,
    },

    /// List the events parsed from a schedule.
    Events {
        /// Schedule text file.
        file: PathBuf,

        /// Output as JSON lines instead of aligned text.
        #[arg(long)]
        json: bool,
    },
}
