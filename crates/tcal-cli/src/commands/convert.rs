//! Implementation of the `tcal convert` command.
//!
//! Each input file is fully read, parsed into a schedule, and serialized
//! to the paired output file. The input/output lists must have equal
//! length; the mismatch is reported before any file is touched.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tcal_core::{RunClock, Schedule, YearPolicy};

/// Run the convert command over paired input/output files.
pub fn run(
    inputs: &[PathBuf],
    outputs: &[PathBuf],
    location: Option<&str>,
    policy: YearPolicy,
) -> Result<()> {
    if inputs.len() != outputs.len() {
        bail!(
            "need one output file per input file (got {} inputs, {} outputs)",
            inputs.len(),
            outputs.len()
        );
    }

    // One clock for the whole run keeps year inference and creation
    // stamps consistent across files.
    let clock = RunClock::capture();

    for (input, output) in inputs.iter().zip(outputs) {
        convert_file(input, output, location, policy, &clock)?;
    }

    Ok(())
}

/// Converts a single schedule file, writing the exchange document.
fn convert_file(
    input: &Path,
    output: &Path,
    location: Option<&str>,
    policy: YearPolicy,
    clock: &RunClock,
) -> Result<()> {
    let text = fs::read_to_string(input)
        .with_context(|| format!("failed to read input file: {}", input.display()))?;

    let mut schedule = Schedule::parse(&text, policy, clock);
    if schedule.is_empty() {
        tracing::warn!(input = %input.display(), "no week headers recognized in input");
    }

    if let Some(location) = location {
        apply_default_location(&mut schedule, location);
    }

    let document = schedule.to_document(clock);
    fs::write(output, document.to_string())
        .with_context(|| format!("failed to write output file: {}", output.display()))?;

    tracing::debug!(
        input = %input.display(),
        output = %output.display(),
        events = schedule.events().count(),
        "converted schedule"
    );
    Ok(())
}

/// Attaches `location` to every timed event that has none of its own.
/// All-day events are left untouched.
fn apply_default_location(schedule: &mut Schedule, location: &str) {
    for event in schedule.events_mut() {
        if !event.is_all_day() && event.location().is_none() {
            event.set_location(location);
        }
    }
}
