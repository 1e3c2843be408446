//! Week and day assembly from raw schedule lines.
//!
//! Input is a plain-text schedule read top-to-bottom: a week header
//! (`semaine du 12/09`) followed by day lines (`LUNDI 8h00-10h00: Maths`).
//! The assembler scans forward, attaching each day line to the most recent
//! valid header; lines before any header, or following a header whose date
//! cannot be resolved, are discarded with a diagnostic.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use chrono::{Datelike, Days, NaiveDate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::clock::RunClock;
use crate::document::Document;
use crate::event::VEvent;
use crate::instruction::parse_instructions;

/// Fixed weekday vocabulary, Monday first.
const WEEK_DAY_NAMES: [&str; 7] = [
    "LUNDI", "MARDI", "MERCREDI", "JEUDI", "VENDREDI", "SAMEDI", "DIMANCHE",
];

/// Pre-compiled week-header grammar: `semaine du DD/MM[/YY[YY]]`.
///
/// Separators may be slashes, dashes, or spaces; trailing text after the
/// matched date is ignored.
static WEEK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^semaine\s+du\s+(?<day>\d{1,2})[-/\s]+(?<month>\d{1,2})(?:[-/\s]+(?<year>\d{2}(?:\d{2})?))?",
    )
    .unwrap()
});

/// How a week header with no year is resolved to an absolute date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum YearPolicy {
    /// Whichever of the previous, current, or next calendar year places the
    /// date nearest to the run clock's "now". Minimizes drift across year
    /// boundaries.
    #[default]
    Nearest,
    /// Always the run clock's calendar year.
    Current,
}

/// A week-header date that cannot be resolved.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WeekDateError {
    #[error("invalid date {day:02}/{month:02}/{year}")]
    InvalidDate { day: u32, month: u32, year: i32 },
    #[error("{day:02}/{month:02} is not a valid date in any candidate year")]
    NoValidYear { day: u32, month: u32 },
}

/// Events produced from one calendar day's instruction text.
#[derive(Debug)]
pub struct Day {
    date: NaiveDate,
    events: Vec<VEvent>,
}

impl Day {
    const fn new(date: NaiveDate) -> Self {
        Self {
            date,
            events: Vec::new(),
        }
    }

    /// Parses one instruction line, appending its events in source order.
    fn eval(&mut self, text: &str, clock: &RunClock) {
        self.events.extend(parse_instructions(self.date, text, clock));
    }

    pub const fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn events(&self) -> &[VEvent] {
        &self.events
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.events.iter().map(VEvent::render_summary).collect();
        f.write_str(&rendered.join(" / "))
    }
}

/// One parsed week: a Monday anchor plus its days keyed by absolute date.
#[derive(Debug)]
pub struct Week {
    anchor: NaiveDate,
    days: BTreeMap<NaiveDate, Day>,
}

impl Week {
    /// Creates a week anchored to the Monday on or before `date`.
    fn new(date: NaiveDate) -> Self {
        Self {
            anchor: monday_of(date),
            days: BTreeMap::new(),
        }
    }

    /// Dispatches one buffered line to its day.
    ///
    /// The first whitespace-delimited token must match a weekday name; the
    /// remainder is instruction text. Two lines naming the same day
    /// accumulate into one `Day`.
    fn eval_line(&mut self, line: &str, clock: &RunClock) {
        let Some((name, instructions)) = line.split_once(char::is_whitespace) else {
            tracing::debug!(line, "line has no instruction text, skipping");
            return;
        };

        let Some(offset) = WEEK_DAY_NAMES
            .iter()
            .position(|day| day.eq_ignore_ascii_case(name))
        else {
            tracing::debug!(line, "line does not start with a weekday name, skipping");
            return;
        };

        let date = self.anchor + Days::new(offset as u64);
        self.days
            .entry(date)
            .or_insert_with(|| Day::new(date))
            .eval(instructions.trim(), clock);
    }

    /// The Monday anchoring this week.
    pub const fn anchor(&self) -> NaiveDate {
        self.anchor
    }

    /// Days in date order.
    pub fn days(&self) -> impl Iterator<Item = &Day> {
        self.days.values()
    }

    /// Events of all days in date, then source, order.
    pub fn events(&self) -> impl Iterator<Item = &VEvent> {
        self.days.values().flat_map(|day| day.events.iter())
    }
}

impl fmt::Display for Week {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Semaine du {}/{}/{}:",
            self.anchor.day(),
            self.anchor.month(),
            self.anchor.year()
        )?;
        for day in self.days.values() {
            let name = WEEK_DAY_NAMES[day.date.weekday().num_days_from_monday() as usize];
            writeln!(f, "{name:<10}{day}")?;
        }
        Ok(())
    }
}

/// A full parsed schedule: weeks keyed by their Monday anchor.
///
/// Two headers resolving to the same Monday merge into one week.
#[derive(Debug, Default)]
pub struct Schedule {
    weeks: BTreeMap<NaiveDate, Week>,
}

/// Where buffered day lines currently belong during the forward scan.
#[derive(Debug, Clone, Copy)]
enum Segment {
    /// No header seen yet.
    Unanchored,
    /// The last header's date could not be resolved; its lines are dropped.
    Skipped,
    /// Lines attach to the week at this anchor.
    Active(NaiveDate),
}

impl Schedule {
    /// Parses a full schedule text.
    pub fn parse(text: &str, policy: YearPolicy, clock: &RunClock) -> Self {
        Self::parse_lines(text.lines(), policy, clock)
    }

    /// Parses an ordered sequence of raw lines.
    ///
    /// No parse failure is fatal: malformed headers and unrecognized lines
    /// are skipped with diagnostics and scanning continues.
    pub fn parse_lines<'a>(
        lines: impl IntoIterator<Item = &'a str>,
        policy: YearPolicy,
        clock: &RunClock,
    ) -> Self {
        let mut schedule = Self::default();
        let mut segment = Segment::Unanchored;

        for line in lines {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            if let Some(caps) = WEEK_RE.captures(line) {
                segment = match resolve_week_date(&caps, policy, clock) {
                    Ok(date) => {
                        let anchor = monday_of(date);
                        schedule
                            .weeks
                            .entry(anchor)
                            .or_insert_with(|| Week::new(date));
                        Segment::Active(anchor)
                    }
                    Err(error) => {
                        tracing::warn!(line, %error, "skipping unparsable week header");
                        Segment::Skipped
                    }
                };
                continue;
            }

            match segment {
                Segment::Active(anchor) => {
                    if let Some(week) = schedule.weeks.get_mut(&anchor) {
                        week.eval_line(line, clock);
                    }
                }
                Segment::Skipped => {
                    tracing::debug!(line, "discarding line after skipped week header");
                }
                Segment::Unanchored => {
                    tracing::warn!(line, "discarding line before any week header");
                }
            }
        }

        schedule
    }

    /// Weeks in anchor order.
    pub fn weeks(&self) -> impl Iterator<Item = &Week> {
        self.weeks.values()
    }

    /// All events in week, day, then source order.
    pub fn events(&self) -> impl Iterator<Item = &VEvent> {
        self.weeks.values().flat_map(Week::events)
    }

    /// Mutable view over all events, for post-parse decoration.
    pub fn events_mut(&mut self) -> impl Iterator<Item = &mut VEvent> {
        self.weeks
            .values_mut()
            .flat_map(|week| week.days.values_mut())
            .flat_map(|day| day.events.iter_mut())
    }

    pub fn is_empty(&self) -> bool {
        self.weeks.is_empty()
    }

    /// Serializes every event into an exchange document.
    pub fn to_document(&self, clock: &RunClock) -> Document {
        let mut document = Document::new();
        for event in self.events() {
            document.push_event(event.to_container(clock.tzid()));
        }
        document
    }
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.weeks.values().map(Week::to_string).collect();
        f.write_str(&rendered.join("\n"))
    }
}

/// The Monday on or before `date`.
fn monday_of(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.weekday().num_days_from_monday()))
}

/// Resolves a matched week header to an absolute date.
fn resolve_week_date(
    caps: &regex::Captures<'_>,
    policy: YearPolicy,
    clock: &RunClock,
) -> Result<NaiveDate, WeekDateError> {
    // The regex guarantees 1-2 digit numbers, which always fit.
    let day: u32 = caps["day"].parse().unwrap_or_default();
    let month: u32 = caps["month"].parse().unwrap_or_default();

    let Some(year) = caps.name("year") else {
        return infer_year(day, month, policy, clock);
    };

    let year = year.as_str();
    let year: i32 = if year.len() == 2 {
        let century = clock.today().year() / 100 * 100;
        century + year.parse::<i32>().unwrap_or_default()
    } else {
        year.parse().unwrap_or_default()
    };

    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or(WeekDateError::InvalidDate { day, month, year })
}

/// Picks a year for a day/month pair with no explicit year.
fn infer_year(
    day: u32,
    month: u32,
    policy: YearPolicy,
    clock: &RunClock,
) -> Result<NaiveDate, WeekDateError> {
    let today = clock.today();

    match policy {
        YearPolicy::Current => NaiveDate::from_ymd_opt(today.year(), month, day).ok_or(
            WeekDateError::InvalidDate {
                day,
                month,
                year: today.year(),
            },
        ),
        YearPolicy::Nearest => (today.year() - 1..=today.year() + 1)
            .filter_map(|year| NaiveDate::from_ymd_opt(year, month, day))
            .min_by_key(|date| (*date - today).num_days().abs())
            .ok_or(WeekDateError::NoValidYear { day, month }),
    }
}
