//! Half-open spans of calendar days.
//!
//! A [`DateSpan`] covers `[start, end)`: the start day is included, the end day
//! is not. An empty span (`start == end`) is valid and contains no days.

use chrono::{Days, NaiveDate};
use serde::Serialize;

use crate::error::{Result, SkipError};

/// A half-open interval of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DateSpan {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateSpan {
    /// Build a span from explicit bounds.
    ///
    /// # Errors
    /// Returns [`SkipError::InvalidArgument`] if `end` is before `start`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if end < start {
            return Err(SkipError::InvalidArgument(format!(
                "span end {} is before start {}",
                end, start
            )));
        }
        Ok(Self { start, end })
    }

    /// Build a span covering `days` calendar days from `start`.
    ///
    /// # Errors
    /// Returns [`SkipError::Convergence`] if the end falls outside the
    /// representable calendar.
    pub fn from_days(start: NaiveDate, days: u64) -> Result<Self> {
        let end = start.checked_add_days(Days::new(days)).ok_or_else(|| {
            SkipError::Convergence(format!(
                "{} + {} days overflows the calendar",
                start, days
            ))
        })?;
        Ok(Self { start, end })
    }

    /// A span holding exactly one day.
    ///
    /// # Errors
    /// Returns [`SkipError::Convergence`] for [`NaiveDate::MAX`], which has no
    /// following day to close the span.
    pub fn single(day: NaiveDate) -> Result<Self> {
        Self::from_days(day, 1)
    }

    /// Move the end out to `end`. Never shrinks the span.
    pub(crate) fn extend_to(&mut self, end: NaiveDate) {
        if end > self.end {
            self.end = end;
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of calendar days in the span.
    pub fn len_days(&self) -> u64 {
        (self.end - self.start).num_days().max(0) as u64
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day < self.end
    }

    /// The overlap of two spans, or `None` when they share no day.
    ///
    /// Adjacent spans (one ends where the other starts) do not overlap.
    pub fn intersect(&self, other: &DateSpan) -> Option<DateSpan> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        if start < end {
            Some(DateSpan { start, end })
        } else {
            None
        }
    }

    /// Iterate every day in the span, in order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d < end)
    }
}

impl std::fmt::Display for DateSpan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}
