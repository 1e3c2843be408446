//! Implementation of the `tcal events` command.
//!
//! Prints the structured event list parsed from a schedule, either as
//! aligned text or as JSON lines.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use tcal_core::{EventKind, RunClock, Schedule, VEvent, YearPolicy};

/// Flat record for one parsed event.
#[derive(Debug, Serialize)]
struct EventRecord<'a> {
    date: NaiveDate,
    all_day: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    start: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    end: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    organizer: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    location: Option<&'a str>,
    uid: &'a str,
}

impl<'a> EventRecord<'a> {
    fn new(event: &'a VEvent) -> Self {
        let (all_day, start, end) = match event.kind() {
            EventKind::AllDay { .. } => (true, None, None),
            EventKind::TimeRange { start, end } => (false, Some(start), Some(end)),
            EventKind::Instant { at } => (false, Some(at), Some(at)),
        };
        Self {
            date: event.kind().date(),
            all_day,
            start,
            end,
            summary: event.summary(),
            organizer: event.organizer(),
            location: event.location(),
            uid: event.uid(),
        }
    }
}

/// Run the events command.
pub fn run(file: &Path, json: bool, policy: YearPolicy) -> Result<()> {
    let text = fs::read_to_string(file)
        .with_context(|| format!("failed to read input file: {}", file.display()))?;

    let clock = RunClock::capture();
    let schedule = Schedule::parse(&text, policy, &clock);

    for event in schedule.events() {
        if json {
            let record = EventRecord::new(event);
            println!(
                "{}",
                serde_json::to_string(&record).context("failed to serialize event")?
            );
        } else {
            println!("{}", format_line(event));
        }
    }

    Ok(())
}

/// One aligned text line per event: date, time span, clause.
fn format_line(event: &VEvent) -> String {
    let span = match event.kind() {
        EventKind::AllDay { .. } => "all day".to_string(),
        EventKind::TimeRange { start, end } => {
            format!("{}-{}", start.format("%H:%M"), end.format("%H:%M"))
        }
        EventKind::Instant { at } => at.format("%H:%M").to_string(),
    };
    format!("{}  {:<11}  {}", event.kind().date(), span, event.render_summary())
}
