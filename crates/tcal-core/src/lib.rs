//! Core logic for textcal: plain-text weekly schedules to iCalendar.
//!
//! This crate contains the fundamental types and logic for:
//! - Document model: the generic container/content-line tree and its
//!   CRLF serialization
//! - Event building: all-day, time-range, and instant events with
//!   creation stamps and unique identifiers
//! - Instruction parsing: `8h00-10h00: Maths (Prof X) [Salle 12]` lines
//! - Schedule assembly: week headers, year inference, Monday anchoring

mod clock;
pub mod document;
pub mod event;
pub mod instruction;
pub mod schedule;

pub use clock::RunClock;
pub use document::{Container, ContentLine, Document, Param};
pub use event::{EventKind, VEvent};
pub use schedule::{Day, Schedule, Week, WeekDateError, YearPolicy};
