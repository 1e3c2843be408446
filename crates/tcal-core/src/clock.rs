//! Per-run capture of "now" and the local timezone label.
//!
//! Both values are read once at the start of a run and threaded explicitly
//! into every constructor that needs them, so year inference, creation
//! timestamps, and timezone parameters stay consistent within a run.

use chrono::{Local, NaiveDate, NaiveDateTime, Offset};

/// The captured wall clock for one conversion run.
#[derive(Debug, Clone)]
pub struct RunClock {
    now: NaiveDateTime,
    tzid: String,
}

impl RunClock {
    /// Captures the current local time and timezone label.
    ///
    /// Falls back to the numeric UTC offset when the IANA name cannot be
    /// determined.
    pub fn capture() -> Self {
        let local = Local::now();
        let tzid = iana_time_zone::get_timezone()
            .unwrap_or_else(|_| local.offset().fix().to_string());
        Self {
            now: local.naive_local(),
            tzid,
        }
    }

    /// A pinned clock for deterministic tests and reproducible runs.
    pub fn fixed(now: NaiveDateTime, tzid: impl Into<String>) -> Self {
        Self {
            now,
            tzid: tzid.into(),
        }
    }

    /// The instant captured at the start of the run.
    pub const fn now(&self) -> NaiveDateTime {
        self.now
    }

    /// The calendar date of the captured instant.
    pub const fn today(&self) -> NaiveDate {
        self.now.date()
    }

    /// The local timezone label attached to every timed marker.
    pub fn tzid(&self) -> &str {
        &self.tzid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_reports_pinned_values() {
        let now = NaiveDate::from_ymd_opt(2024, 9, 1)
            .unwrap()
            .and_hms_opt(12, 30, 0)
            .unwrap();
        let clock = RunClock::fixed(now, "Europe/Paris");

        assert_eq!(clock.now(), now);
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2024, 9, 1).unwrap());
        assert_eq!(clock.tzid(), "Europe/Paris");
    }

    #[test]
    fn capture_returns_nonempty_tzid() {
        let clock = RunClock::capture();
        assert!(!clock.tzid().is_empty());
    }
}
