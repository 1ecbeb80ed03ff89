//! Blocked-day collection -- the stateful front of the engine.
//!
//! A [`SkipCalendar`] owns a start date, a grow-only [`BlockedSet`], and a
//! [`BadFormats`] registry. Values arrive either as typed [`CalendarValue`]s or
//! as free text, one specification per line:
//!
//! ```text
//! RRULE:FREQ=WEEKLY;BYDAY=SA,SU
//! Independence Day
//! 7/22
//! ```
//!
//! Each line is tried as a recurrence rule (`RRULE:` prefix, any case), then as
//! an exact holiday name, then as a free-form date. A line that is none of these
//! lands in [`BadFormats`] and the rest of the text is still applied.

use std::fmt;
use std::sync::Arc;

use chrono::{Datelike, Local, NaiveDate};
use serde::{Serialize, Serializer};
use serde_json::Value;
use tracing::{debug, warn};

use crate::blocked::{BlockedEntry, BlockedSet, CalendarValue};
use crate::error::{Result, SkipError};
use crate::holidays::{HolidayTable, UsHolidays};
use crate::options::CalendarOptions;
use crate::parser::DateParser;
use crate::recurrence::{has_rrule_prefix, Recurrence};
use crate::resolver::{Resolution, WindowResolver};

const UNRECOGNIZED: &str = "not a recurrence rule, known holiday, or recognizable date";

/// Lines that could not be interpreted, with the reason for each.
///
/// Keyed by the normalized line and kept in first-seen order. Recording the
/// same line again replaces its reason without moving it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BadFormats {
    entries: Vec<(String, String)>,
}

impl BadFormats {
    pub fn record(&mut self, line: impl Into<String>, reason: impl Into<String>) {
        let line = line.into();
        let reason = reason.into();
        match self.entries.iter_mut().find(|(known, _)| *known == line) {
            Some(entry) => entry.1 = reason,
            None => self.entries.push((line, reason)),
        }
    }

    /// The offending lines, in first-seen order.
    pub fn lines(&self) -> Vec<&str> {
        self.entries.iter().map(|(line, _)| line.as_str()).collect()
    }

    /// The reason recorded for `line`.
    pub fn get(&self, line: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(known, _)| known == line)
            .map(|(_, reason)| reason.as_str())
    }

    /// `(line, reason)` pairs, in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(line, reason)| (line.as_str(), reason.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for BadFormats {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

/// Collects blocked days and resolves day-count windows against them.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use skip_engine::SkipCalendar;
///
/// let mut cal = SkipCalendar::new();
/// cal.set_start_date(NaiveDate::from_ymd_opt(2011, 7, 1).unwrap()).unwrap();
/// cal.parse_spec_text("Independence Day");
///
/// let result = cal.resolve(30).unwrap();
/// assert_eq!(result.end(), NaiveDate::from_ymd_opt(2011, 8, 1).unwrap());
/// assert_eq!(result.skipped.len(), 1);
/// ```
#[derive(Clone)]
pub struct SkipCalendar {
    start: Option<NaiveDate>,
    blocked: BlockedSet,
    bad_formats: BadFormats,
    holidays: Arc<dyn HolidayTable + Send + Sync>,
}

impl Default for SkipCalendar {
    fn default() -> Self {
        Self::new()
    }
}

impl SkipCalendar {
    /// An empty calendar using the [`UsHolidays`] table.
    pub fn new() -> Self {
        Self::with_holiday_table(UsHolidays)
    }

    /// An empty calendar resolving holiday names against `table`.
    pub fn with_holiday_table(table: impl HolidayTable + Send + Sync + 'static) -> Self {
        Self {
            start: None,
            blocked: BlockedSet::new(),
            bad_formats: BadFormats::default(),
            holidays: Arc::new(table),
        }
    }

    /// Build a calendar from typed options.
    ///
    /// Options are applied through the regular setters in a fixed order: start
    /// date, then blocked entries, then spec text, so yearless dates in the text
    /// resolve against the start date's year.
    ///
    /// # Errors
    /// Whatever [`set_start_date`](Self::set_start_date) or
    /// [`add_blocked`](Self::add_blocked) reject.
    pub fn with_options(options: CalendarOptions) -> Result<Self> {
        let mut cal = Self::new();
        cal.apply_options(options)?;
        Ok(cal)
    }

    /// Build a calendar from a JSON options document.
    ///
    /// # Errors
    /// Returns [`SkipError::InvalidArgument`] if the JSON is malformed, is not an
    /// object, or carries a recognized key with the wrong kind of value.
    pub fn from_options_json(json: &str) -> Result<Self> {
        Self::with_options(CalendarOptions::from_json(json)?)
    }

    /// Build a calendar from an already-parsed JSON options value.
    ///
    /// # Errors
    /// See [`from_options_json`](Self::from_options_json).
    pub fn from_options_value(value: &Value) -> Result<Self> {
        Self::with_options(CalendarOptions::from_value(value)?)
    }

    fn apply_options(&mut self, options: CalendarOptions) -> Result<()> {
        if let Some(start) = options.start_date {
            self.set_start_date(start)?;
        }
        if !options.blocked_entries.is_empty() {
            self.add_blocked(options.blocked_entries)?;
        }
        if let Some(text) = options.blocked_spec_text {
            self.parse_spec_text(&text);
        }
        Ok(())
    }

    pub fn start_date(&self) -> Option<NaiveDate> {
        self.start
    }

    pub fn blocked(&self) -> &BlockedSet {
        &self.blocked
    }

    pub fn holiday_table(&self) -> &(dyn HolidayTable + Send + Sync) {
        self.holidays.as_ref()
    }

    /// Union every value into the blocked set, in order.
    ///
    /// All values are converted before any is applied: if one fails, the set is
    /// left exactly as it was.
    ///
    /// # Errors
    /// Returns [`SkipError::InvalidRule`] if a [`CalendarValue::Rule`] does not parse.
    pub fn add_blocked<I>(&mut self, values: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: Into<CalendarValue>,
    {
        let entries = values
            .into_iter()
            .map(|v| BlockedEntry::try_from(v.into()))
            .collect::<Result<Vec<_>>>()?;
        debug!(count = entries.len(), "adding blocked entries");
        self.blocked.extend(entries);
        Ok(())
    }

    /// Store the day resolution starts from.
    ///
    /// Date-times are truncated to their calendar day; the stored day is a copy.
    ///
    /// # Errors
    /// Returns [`SkipError::InvalidArgument`] for spans, recurrences and rules.
    pub fn set_start_date(&mut self, value: impl Into<CalendarValue>) -> Result<()> {
        let day = value
            .into()
            .as_day()
            .ok_or_else(|| SkipError::InvalidArgument("must pass a date value".to_string()))?;
        self.start = Some(day);
        Ok(())
    }

    /// Interpret free text, one blocked-day specification per line.
    ///
    /// Never fails: unrecognized lines go to [`bad_formats`](Self::bad_formats).
    /// Returns the number of entries added.
    pub fn parse_spec_text(&mut self, text: &str) -> usize {
        let mut added = 0;
        for raw in text.lines() {
            let line = raw.split_whitespace().collect::<Vec<_>>().join(" ");
            if line.is_empty() {
                continue;
            }
            match self.parse_line(&line) {
                Ok(entry) => {
                    self.blocked.union(entry);
                    added += 1;
                }
                Err(reason) => {
                    warn!(line = %line, reason = %reason, "unrecognized blocked-day line");
                    self.bad_formats.record(line, reason);
                }
            }
        }
        added
    }

    /// Dynamically-typed variant of [`parse_spec_text`](Self::parse_spec_text).
    ///
    /// # Errors
    /// Returns [`SkipError::InvalidArgument`] unless `value` is a JSON string.
    pub fn parse_spec_value(&mut self, value: &Value) -> Result<usize> {
        match value {
            Value::String(text) => Ok(self.parse_spec_text(text)),
            _ => Err(SkipError::InvalidArgument(
                "expected a plain text value".to_string(),
            )),
        }
    }

    pub fn bad_formats(&self) -> &BadFormats {
        &self.bad_formats
    }

    /// A resolver over this calendar's start date and blocked set.
    pub fn resolver(&self) -> WindowResolver<'_> {
        let resolver = WindowResolver::new().with_blocked(&self.blocked);
        match self.start {
            Some(start) => resolver.with_start(start),
            None => resolver,
        }
    }

    /// Advance the start date by `day_count` unblocked days.
    ///
    /// # Errors
    /// See [`WindowResolver::resolve`].
    pub fn resolve(&self, day_count: i64) -> Result<Resolution> {
        self.resolver().resolve(day_count)
    }

    /// The parser used for free-form dates: yearless dates fall in the start
    /// date's year, or the current local year before a start date is set.
    pub fn date_parser(&self) -> DateParser {
        DateParser::new(self.start.map_or_else(local_year, |d| d.year()))
    }

    /// Classify one normalized line. The error is the diagnostic to record.
    fn parse_line(&self, line: &str) -> std::result::Result<BlockedEntry, String> {
        if has_rrule_prefix(line) {
            return Recurrence::parse(line)
                .map(BlockedEntry::Recurring)
                .map_err(|e| e.to_string());
        }

        match self.holidays.lookup(line) {
            Ok(Some(rule)) => return Ok(BlockedEntry::Recurring(rule)),
            Ok(None) => {}
            Err(e) => return Err(e.to_string()),
        }

        self.date_parser()
            .parse(line)
            .map(BlockedEntry::Single)
            .map_err(|_| UNRECOGNIZED.to_string())
    }
}

impl fmt::Debug for SkipCalendar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SkipCalendar")
            .field("start", &self.start)
            .field("blocked", &self.blocked)
            .field("bad_formats", &self.bad_formats)
            .finish_non_exhaustive()
    }
}

/// The current year on the local clock.
pub(crate) fn local_year() -> i32 {
    Local::now().year()
}
