//! # skip-engine
//!
//! Advance a date by N days while skipping blocked days.
//!
//! Given a start date, a day count, and a set of blocked days (holidays,
//! recurring patterns like weekends, explicit dates and spans), the engine finds
//! the end date such that exactly N unblocked days lie in `[start, end)`, and
//! reports which blocked days fell inside that window.
//!
//! ## Quick start
//!
//! ```rust
//! use chrono::NaiveDate;
//! use skip_engine::SkipCalendar;
//!
//! let mut cal = SkipCalendar::new();
//! cal.set_start_date(NaiveDate::from_ymd_opt(2011, 7, 1).unwrap()).unwrap();
//! cal.parse_spec_text("Independence Day\nRRULE:FREQ=WEEKLY;BYDAY=SA,SU\n7/22");
//!
//! let result = cal.resolve(30).unwrap();
//! assert_eq!(result.end(), NaiveDate::from_ymd_opt(2011, 8, 16).unwrap());
//! assert!(cal.bad_formats().is_empty());
//! ```
//!
//! ## Modules
//!
//! - [`collector`] — `SkipCalendar`: gathers blocked days from values and free text
//! - [`resolver`] — fixed-point window resolution
//! - [`blocked`] — blocked entries, the blocked set, and its intersections
//! - [`span`] — half-open day spans
//! - [`recurrence`] — RRULE expansion into calendar days
//! - [`holidays`] — named holiday tables
//! - [`parser`] — flexible date-string parsing
//! - [`options`] — typed and JSON construction options
//! - [`error`] — Error types

pub mod blocked;
pub mod collector;
pub mod error;
pub mod holidays;
pub mod options;
pub mod parser;
pub mod recurrence;
pub mod resolver;
pub mod span;

pub use blocked::{BlockedDays, BlockedEntry, BlockedSet, CalendarValue};
pub use collector::{BadFormats, SkipCalendar};
pub use error::SkipError;
pub use holidays::{HolidayTable, UsHolidays};
pub use options::{day_count_from_value, CalendarOptions};
pub use parser::DateParser;
pub use recurrence::Recurrence;
pub use resolver::{Resolution, WindowResolver};
pub use span::DateSpan;
