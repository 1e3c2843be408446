//! Implementation of the `tcal show` command.
//!
//! Parses a schedule and prints it back in human-readable form, one block
//! per week with the day's events reconstructed as
//! `name (organizer) [location]` clauses.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tcal_core::{RunClock, Schedule, YearPolicy};

/// Run the show command.
pub fn run(file: &Path, policy: YearPolicy) -> Result<()> {
    let text = fs::read_to_string(file)
        .with_context(|| format!("failed to read input file: {}", file.display()))?;

    let clock = RunClock::capture();
    let schedule = Schedule::parse(&text, policy, &clock);
    if schedule.is_empty() {
        tracing::warn!(file = %file.display(), "no week headers recognized in input");
    }

    print!("{schedule}");
    Ok(())
}
