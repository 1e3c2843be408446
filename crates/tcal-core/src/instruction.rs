//! Day-level instruction parsing.
//!
//! A day's raw text is a sequence of `" / "`-separated sub-instructions.
//! Each sub-instruction optionally starts with a time range followed by a
//! colon; the remainder carries an optional name, an optional parenthesized
//! organizer, and an optional bracketed location:
//!
//! ```text
//! 8h00-10h00: Maths (Prof X) [Salle 12]
//! ```
//!
//! Parse failures are recovered locally: a malformed time token degrades
//! the sub-instruction to an all-day event, and a body with no extractable
//! field drops the sub-instruction with a diagnostic.

use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;

use crate::clock::RunClock;
use crate::event::VEvent;

/// Separator between sub-instructions within one day line.
const SUB_INSTRUCTION_SEPARATOR: &str = " / ";

/// Pre-compiled time-range grammar: `HhM` optionally followed by `-HhM`.
static TIME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?<begin_hour>\d{1,2})\s*[hH]\s*(?<begin_minute>\d{1,2})\s*(?:-\s*(?<end_hour>\d{1,2})\s*[hH]\s*(?<end_minute>\d{1,2}))?$",
    )
    .unwrap()
});

/// Pre-compiled body grammar: `[name] [(organizer)] [[location]]`.
static BODY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?<name>[^(\[]+)?\s*(?:\((?<organizer>[^)]+)\))?\s*(?:\[(?<location>[^\]]+)\])?")
        .unwrap()
});

/// Parses one day's instruction text into events, in source order.
pub fn parse_instructions(day: NaiveDate, text: &str, clock: &RunClock) -> Vec<VEvent> {
    text.split(SUB_INSTRUCTION_SEPARATOR)
        .filter_map(|sub| parse_sub_instruction(day, sub, clock))
        .collect()
}

/// Parses a single sub-instruction into at most one event.
fn parse_sub_instruction(day: NaiveDate, text: &str, clock: &RunClock) -> Option<VEvent> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    // Only the first colon separates the time token from the body.
    let (mut event, body) = match text.split_once(':').and_then(|(time, body)| {
        parse_time_range(day, time.trim()).map(|(begin, end)| (begin, end, body))
    }) {
        Some((begin, Some(end), body)) => (VEvent::timed(begin, end, clock), body),
        Some((begin, None, body)) => (VEvent::timed(begin, begin, clock), body),
        // No colon, unparsable time token, or out-of-range hour/minute:
        // the whole sub-instruction becomes an all-day event.
        None => (VEvent::all_day(day, clock), text),
    };

    let fields = parse_body(body.trim());
    if fields.is_empty() {
        tracing::warn!(%day, text, "no usable instruction body, dropping sub-instruction");
        return None;
    }

    if let Some(name) = fields.name {
        event.set_summary(name);
    }
    if let Some(organizer) = fields.organizer {
        event.set_organizer(organizer);
    }
    if let Some(location) = fields.location {
        event.set_location(location);
    }
    Some(event)
}

/// Matches a time token against the time grammar.
///
/// Returns the begin instant and, when an end time is present, the end
/// instant, both as offsets from the day's midnight. `None` means the
/// token does not resolve to valid times and the caller should fall back
/// to an all-day event.
fn parse_time_range(
    day: NaiveDate,
    token: &str,
) -> Option<(NaiveDateTime, Option<NaiveDateTime>)> {
    let caps = TIME_RE.captures(token)?;

    let begin = time_of_day(day, &caps["begin_hour"], &caps["begin_minute"])?;
    let end = match (caps.name("end_hour"), caps.name("end_minute")) {
        (Some(hour), Some(minute)) => Some(time_of_day(day, hour.as_str(), minute.as_str())?),
        _ => None,
    };
    Some((begin, end))
}

/// Resolves an hour/minute pair to an instant on `day`.
///
/// Hour must be 0-23 and minute 0-59; anything else is rejected.
fn time_of_day(day: NaiveDate, hour: &str, minute: &str) -> Option<NaiveDateTime> {
    let hour: u32 = hour.parse().ok()?;
    let minute: u32 = minute.parse().ok()?;
    day.and_hms_opt(hour, minute, 0)
}

/// Fields extracted from an instruction body.
#[derive(Debug, Default, PartialEq, Eq)]
struct BodyFields {
    name: Option<String>,
    organizer: Option<String>,
    location: Option<String>,
}

impl BodyFields {
    fn is_empty(&self) -> bool {
        self.name.is_none() && self.organizer.is_none() && self.location.is_none()
    }
}

/// Matches a body token against the body grammar.
///
/// Every field is optional, so the grammar itself is total; a body is
/// considered unparsable when it yields no field at all.
fn parse_body(body: &str) -> BodyFields {
    let Some(caps) = BODY_RE.captures(body) else {
        return BodyFields::default();
    };

    let field = |name: &str| {
        caps.name(name)
            .map(|m| m.as_str().trim())
            .filter(|s| !s.is_empty())
            .map(String::from)
    };

    BodyFields {
        name: field("name"),
        organizer: field("organizer"),
        location: field("location"),
    }
}
