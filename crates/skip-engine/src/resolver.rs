//! Fixed-point resolution of the day-count window.
//!
//! Starting from `[start, start + n)`, the resolver counts the blocked days
//! inside the window, widens the window by that many days, and repeats until
//! the count stops changing. At that point exactly `n` days of the window are
//! unblocked.
//!
//! Each window contains the previous one, so only the newly added days are
//! counted on each pass. Blocked days are expanded ahead of the window in
//! strides that double, so the set is intersected a logarithmic number of times.
//!
//! Recurrences that block every day never converge. If the window grows by a
//! whole [`STALL_DAYS`] cycle (plus the bounded blocked days) without gaining an
//! unblocked day, resolution stops with [`SkipError::Convergence`].

use chrono::{Days, NaiveDate};
use serde::Serialize;
use tracing::{debug, trace};

use crate::blocked::{BlockedDays, BlockedSet};
use crate::error::{Result, SkipError};
use crate::span::DateSpan;

/// Days in one 400-year Gregorian cycle.
///
/// Calendar rules repeat their weekday and leap-year pattern over this cycle.
pub const STALL_DAYS: u64 = 146_097;

/// Smallest stride by which blocked days are expanded past the window.
const MIN_STRIDE_DAYS: u64 = 366;

/// The window and the blocked days skipped inside it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolution {
    /// `[start, end)`: `end` is the first day after the counted days.
    pub window: DateSpan,
    /// Blocked days inside `window`, ascending.
    pub skipped: BlockedDays,
    /// Fixed-point iterations run before the window stabilized.
    pub iterations: u64,
}

impl Resolution {
    pub fn end(&self) -> NaiveDate {
        self.window.end()
    }
}

/// Resolves windows against an optional start date and blocked set.
///
/// Both inputs are optional so a standalone resolver can report which one is
/// missing; [`crate::SkipCalendar`] always supplies a blocked set.
#[derive(Debug, Clone, Copy, Default)]
pub struct WindowResolver<'a> {
    start: Option<NaiveDate>,
    blocked: Option<&'a BlockedSet>,
}

impl<'a> WindowResolver<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_start(mut self, start: NaiveDate) -> Self {
        self.start = Some(start);
        self
    }

    pub fn with_blocked(mut self, blocked: &'a BlockedSet) -> Self {
        self.blocked = Some(blocked);
        self
    }

    /// Find the smallest window from the start date holding `day_count`
    /// unblocked days.
    ///
    /// # Errors
    /// - [`SkipError::InvalidArgument`] if `day_count` is negative.
    /// - [`SkipError::Precondition`] if no start date or no blocked set was given.
    /// - [`SkipError::Convergence`] if the window grows by more than
    ///   [`stall_limit`] days without gaining an unblocked day, or would run
    ///   past the end of the calendar.
    pub fn resolve(&self, day_count: i64) -> Result<Resolution> {
        let day_count = u64::try_from(day_count)
            .map_err(|_| SkipError::InvalidArgument("must provide integer >= 0".to_string()))?;
        let start = self
            .start
            .ok_or_else(|| SkipError::Precondition("no start date provided".to_string()))?;
        let blocked = self
            .blocked
            .ok_or_else(|| SkipError::Precondition("no blocked-day set provided".to_string()))?;

        let stall_days = stall_limit(blocked);
        let mut ahead = Lookahead::new(start, blocked);
        let mut extra: u64 = 0;
        let mut counted_end = start;
        let mut blocked_so_far: u64 = 0;
        let mut best_unblocked: u64 = 0;
        let mut progress_end = start;
        let mut iterations: u64 = 0;

        loop {
            iterations += 1;

            let window = DateSpan::from_days(start, day_count.saturating_add(extra))?;
            ahead.cover(window.end())?;
            blocked_so_far += ahead.days.count_between(counted_end, window.end()) as u64;
            counted_end = window.end();
            let new_extra = blocked_so_far;

            trace!(iteration = iterations, %window, skipped = new_extra, "resolver step");

            if new_extra == extra {
                debug!(
                    %start,
                    day_count,
                    end = %window.end(),
                    skipped = new_extra,
                    iterations,
                    "window resolved"
                );
                return Ok(Resolution {
                    window,
                    skipped: ahead.days.within(&window),
                    iterations,
                });
            }

            let unblocked = window.len_days().saturating_sub(new_extra);
            if unblocked > best_unblocked {
                best_unblocked = unblocked;
                progress_end = window.end();
            } else if (window.end() - progress_end).num_days() as u64 > stall_days {
                return Err(SkipError::Convergence(format!(
                    "window from {} for {} days found no unblocked day between {} and {}",
                    start,
                    day_count,
                    progress_end,
                    window.end()
                )));
            }
            extra = new_extra;
        }
    }
}

/// How far the window may grow without gaining an unblocked day before
/// resolution gives up: one [`STALL_DAYS`] cycle plus every bounded blocked day.
pub fn stall_limit(blocked: &BlockedSet) -> u64 {
    STALL_DAYS.saturating_add(blocked.finite_day_count())
}

/// Blocked days of `[start, end)`, expanded ahead of the window.
struct Lookahead<'a> {
    blocked: &'a BlockedSet,
    start: NaiveDate,
    end: NaiveDate,
    days: BlockedDays,
}

impl<'a> Lookahead<'a> {
    fn new(start: NaiveDate, blocked: &'a BlockedSet) -> Self {
        Self {
            blocked,
            start,
            end: start,
            days: BlockedDays::default(),
        }
    }

    /// Expand through at least `target`, doubling the covered range.
    fn cover(&mut self, target: NaiveDate) -> Result<()> {
        if target <= self.end {
            return Ok(());
        }
        let covered = (self.end - self.start).num_days().max(0) as u64;
        let stride = covered.max(MIN_STRIDE_DAYS);
        let end = self
            .end
            .checked_add_days(Days::new(stride))
            .map_or(target, |d| d.max(target));

        let slice = DateSpan::new(self.end, end)?;
        trace!(%slice, "expanding blocked days");
        self.days.append(self.blocked.intersect(&slice));
        self.end = end;
        Ok(())
    }
}
