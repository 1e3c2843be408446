//! Calendar event construction and serialization.
//!
//! Events come in three mutually exclusive kinds (all-day, time-range,
//! instant). Every construction stamps the run clock's "now" as the
//! creation time and generates a fresh unique identifier; neither is ever
//! supplied by the caller or recomputed later. Optional decorations
//! (summary, description, location, organizer) can be attached afterwards.

use chrono::{Days, NaiveDate, NaiveDateTime};
use serde::Serialize;
use uuid::Uuid;

use crate::clock::RunClock;
use crate::document::{Container, ContentLine, Param};

/// Value format for timed markers.
const DATE_TIME_FORMAT: &str = "%Y%m%dT%H%M%S";

/// Value format for date-only markers.
const DATE_FORMAT: &str = "%Y%m%d";

/// The three event shapes, as a tagged variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventKind {
    /// Spans one full calendar date; serialized as a date-only start marker
    /// and an exclusive next-day end marker.
    AllDay { date: NaiveDate },
    /// Distinct start and end instants with the local timezone attached.
    TimeRange {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
    /// A time-range degenerated to start == end.
    Instant { at: NaiveDateTime },
}

impl EventKind {
    /// The calendar date this event belongs to.
    pub const fn date(&self) -> NaiveDate {
        match self {
            Self::AllDay { date } => *date,
            Self::TimeRange { start, .. } => start.date(),
            Self::Instant { at } => at.date(),
        }
    }
}

/// An event block under construction.
#[derive(Debug, Clone, Serialize)]
pub struct VEvent {
    #[serde(flatten)]
    kind: EventKind,
    uid: String,
    #[serde(skip)]
    stamp: NaiveDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    organizer: Option<String>,
}

impl VEvent {
    fn new(kind: EventKind, clock: &RunClock) -> Self {
        Self {
            kind,
            uid: Uuid::new_v4().to_string().to_ascii_uppercase(),
            stamp: clock.now(),
            summary: None,
            description: None,
            location: None,
            organizer: None,
        }
    }

    /// An event spanning the whole of `date`.
    pub fn all_day(date: NaiveDate, clock: &RunClock) -> Self {
        Self::new(EventKind::AllDay { date }, clock)
    }

    /// A timed event; degenerates to an instant when `start == end`.
    pub fn timed(start: NaiveDateTime, end: NaiveDateTime, clock: &RunClock) -> Self {
        let kind = if start == end {
            EventKind::Instant { at: start }
        } else {
            EventKind::TimeRange { start, end }
        };
        Self::new(kind, clock)
    }

    /// An event at `start` lasting until `end` if given.
    ///
    /// With no end the time-of-day is discarded and the event spans the
    /// whole calendar date.
    pub fn spanning(start: NaiveDateTime, end: Option<NaiveDateTime>, clock: &RunClock) -> Self {
        match end {
            Some(end) => Self::timed(start, end, clock),
            None => Self::all_day(start.date(), clock),
        }
    }

    pub const fn kind(&self) -> EventKind {
        self.kind
    }

    pub const fn is_all_day(&self) -> bool {
        matches!(self.kind, EventKind::AllDay { .. })
    }

    pub fn uid(&self) -> &str {
        &self.uid
    }

    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn organizer(&self) -> Option<&str> {
        self.organizer.as_deref()
    }

    pub fn set_summary(&mut self, summary: impl Into<String>) {
        self.summary = Some(summary.into());
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = Some(description.into());
    }

    pub fn set_location(&mut self, location: impl Into<String>) {
        self.location = Some(location.into());
    }

    pub fn set_organizer(&mut self, organizer: impl Into<String>) {
        self.organizer = Some(organizer.into());
    }

    /// Reconstructs the human-readable instruction text in the fixed
    /// `name (organizer) [location]` order.
    pub fn render_summary(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        if let Some(summary) = &self.summary {
            parts.push(summary.clone());
        }
        if let Some(organizer) = &self.organizer {
            parts.push(format!("({organizer})"));
        }
        if let Some(location) = &self.location {
            parts.push(format!("[{location}]"));
        }
        parts.join(" ")
    }

    /// Serializes the event into a `VEVENT` container.
    ///
    /// Creation-id lines (DTSTAMP, UID) come first, then the start/end
    /// markers of the variant, then any decorations.
    pub fn to_container(&self, tzid: &str) -> Container {
        let mut event = Container::new("VEVENT");
        event.push_line(timed_line("DTSTAMP", self.stamp, tzid));
        event.push_line(ContentLine::new("UID", &self.uid));

        match self.kind {
            EventKind::AllDay { date } => {
                event.push_line(date_line("DTSTART", date));
                event.push_line(date_line("DTEND", date + Days::new(1)));
            }
            EventKind::TimeRange { start, end } => {
                event.push_line(timed_line("DTSTART", start, tzid));
                event.push_line(timed_line("DTEND", end, tzid));
            }
            EventKind::Instant { at } => {
                event.push_line(timed_line("DTSTART", at, tzid));
                event.push_line(timed_line("DTEND", at, tzid));
            }
        }

        if let Some(summary) = &self.summary {
            event.push_line(ContentLine::new("SUMMARY", summary));
        }
        if let Some(description) = &self.description {
            event.push_line(ContentLine::new("DESCRIPTION", description));
        }
        if let Some(location) = &self.location {
            event.push_line(ContentLine::new("LOCATION", location));
        }
        if let Some(organizer) = &self.organizer {
            event.push_line(ContentLine::new("ORGANIZER", format!("mailto:{organizer}")));
        }

        event
    }
}

/// A marker carrying full date-time precision and the local timezone.
fn timed_line(name: &str, instant: NaiveDateTime, tzid: &str) -> ContentLine {
    ContentLine::new(name, instant.format(DATE_TIME_FORMAT).to_string())
        .with_param(Param::new("TZID", tzid))
}

/// A date-only marker.
fn date_line(name: &str, date: NaiveDate) -> ContentLine {
    ContentLine::new(name, date.format(DATE_FORMAT).to_string())
        .with_param(Param::new("VALUE", "DATE"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clock() -> RunClock {
        let now = NaiveDate::from_ymd_opt(2024, 9, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        RunClock::fixed(now, "Europe/Paris")
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn all_day_emits_exclusive_next_day_end() {
        let event = VEvent::all_day(date(2024, 9, 9), &clock());
        let text = event.to_container("Europe/Paris").to_string();

        assert!(text.contains("DTSTART;VALUE=DATE:20240909"));
        assert!(text.contains("DTEND;VALUE=DATE:20240910"));
    }

    #[test]
    fn all_day_end_crosses_month_boundary() {
        let event = VEvent::all_day(date(2024, 9, 30), &clock());
        let text = event.to_container("Europe/Paris").to_string();

        assert!(text.contains("DTEND;VALUE=DATE:20241001"));
    }

    #[test]
    fn time_range_carries_timezone_parameter() {
        let start = date(2024, 9, 9).and_hms_opt(8, 0, 0).unwrap();
        let end = date(2024, 9, 9).and_hms_opt(10, 0, 0).unwrap();
        let event = VEvent::timed(start, end, &clock());
        let text = event.to_container("Europe/Paris").to_string();

        assert!(text.contains("DTSTART;TZID=Europe/Paris:20240909T080000"));
        assert!(text.contains("DTEND;TZID=Europe/Paris:20240909T100000"));
    }

    #[test]
    fn timed_with_equal_bounds_degenerates_to_instant() {
        let at = date(2024, 9, 9).and_hms_opt(8, 0, 0).unwrap();
        let event = VEvent::timed(at, at, &clock());

        assert_eq!(event.kind(), EventKind::Instant { at });
        let text = event.to_container("Europe/Paris").to_string();
        assert!(text.contains("DTSTART;TZID=Europe/Paris:20240909T080000"));
        assert!(text.contains("DTEND;TZID=Europe/Paris:20240909T080000"));
    }

    #[test]
    fn spanning_without_end_floors_to_date() {
        let start = date(2024, 9, 9).and_hms_opt(15, 45, 0).unwrap();
        let event = VEvent::spanning(start, None, &clock());

        assert_eq!(
            event.kind(),
            EventKind::AllDay {
                date: date(2024, 9, 9)
            }
        );
    }

    #[test]
    fn creation_lines_come_first() {
        let event = VEvent::all_day(date(2024, 9, 9), &clock());
        let text = event.to_container("Europe/Paris").to_string();
        let lines: Vec<&str> = text.split("\r\n").collect();

        assert_eq!(lines[0], "BEGIN:VEVENT");
        assert!(lines[1].starts_with("DTSTAMP;TZID=Europe/Paris:20240901T120000"));
        assert!(lines[2].starts_with("UID:"));
    }

    #[test]
    fn uid_is_unique_and_uppercase() {
        let a = VEvent::all_day(date(2024, 9, 9), &clock());
        let b = VEvent::all_day(date(2024, 9, 9), &clock());

        assert_ne!(a.uid(), b.uid());
        assert_eq!(a.uid(), a.uid().to_ascii_uppercase());
    }

    #[test]
    fn organizer_gets_mailto_prefix() {
        let mut event = VEvent::all_day(date(2024, 9, 9), &clock());
        event.set_organizer("Prof X");
        let text = event.to_container("Europe/Paris").to_string();

        assert!(text.contains("ORGANIZER:mailto:Prof X"));
    }

    #[test]
    fn decorations_serialize_after_markers() {
        let mut event = VEvent::all_day(date(2024, 9, 9), &clock());
        event.set_summary("Maths");
        event.set_description("Chapitre 3");
        let text = event.to_container("Europe/Paris").to_string();

        let dtend = text.find("DTEND").unwrap();
        let summary = text.find("SUMMARY:Maths").unwrap();
        let description = text.find("DESCRIPTION:Chapitre 3").unwrap();
        assert!(dtend < summary && summary < description);
    }

    #[test]
    fn render_summary_honors_fixed_field_order() {
        let mut event = VEvent::all_day(date(2024, 9, 9), &clock());
        event.set_location("Salle 12");
        event.set_organizer("Prof X");
        event.set_summary("Maths");

        assert_eq!(event.render_summary(), "Maths (Prof X) [Salle 12]");
    }

    #[test]
    fn render_summary_omits_absent_fields() {
        let mut event = VEvent::all_day(date(2024, 9, 9), &clock());
        event.set_summary("Conge");

        assert_eq!(event.render_summary(), "Conge");
    }
}
