//! The blocked-day set and the values that feed it.
//!
//! A [`BlockedSet`] is a union of [`BlockedEntry`] values: single days, day spans,
//! and recurrences. It only ever grows. Intersecting it with a finite span
//! flattens every entry into concrete days and yields a [`BlockedDays`], the
//! ordered, de-duplicated set of blocked days inside that span.

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use chrono_tz::Tz;
use serde::{Serialize, Serializer};

use crate::error::{Result, SkipError};
use crate::recurrence::Recurrence;
use crate::span::DateSpan;

/// Any value a caller can hand to the collector.
///
/// Setters accept the kinds that make sense for them: `add_blocked` takes every
/// variant, `set_start_date` only the day-like ones.
#[derive(Debug, Clone, PartialEq)]
pub enum CalendarValue {
    Date(NaiveDate),
    /// Truncated to its calendar day.
    DateTime(NaiveDateTime),
    /// Truncated to the calendar day local to its timezone.
    Zoned(DateTime<Tz>),
    Span(DateSpan),
    Recurring(Recurrence),
    /// Raw RRULE text, parsed when the value is consumed.
    Rule(String),
}

impl CalendarValue {
    /// The calendar day this value names, if it names exactly one.
    pub fn as_day(&self) -> Option<NaiveDate> {
        match self {
            CalendarValue::Date(d) => Some(*d),
            CalendarValue::DateTime(dt) => Some(dt.date()),
            CalendarValue::Zoned(dt) => Some(dt.date_naive()),
            CalendarValue::Span(_) | CalendarValue::Recurring(_) | CalendarValue::Rule(_) => None,
        }
    }
}

impl From<NaiveDate> for CalendarValue {
    fn from(d: NaiveDate) -> Self {
        CalendarValue::Date(d)
    }
}

impl From<NaiveDateTime> for CalendarValue {
    fn from(dt: NaiveDateTime) -> Self {
        CalendarValue::DateTime(dt)
    }
}

impl From<DateTime<Tz>> for CalendarValue {
    fn from(dt: DateTime<Tz>) -> Self {
        CalendarValue::Zoned(dt)
    }
}

impl From<DateSpan> for CalendarValue {
    fn from(span: DateSpan) -> Self {
        CalendarValue::Span(span)
    }
}

impl From<Recurrence> for CalendarValue {
    fn from(r: Recurrence) -> Self {
        CalendarValue::Recurring(r)
    }
}

/// One member of a [`BlockedSet`].
#[derive(Debug, Clone, PartialEq)]
pub enum BlockedEntry {
    Single(NaiveDate),
    Range(DateSpan),
    Recurring(Recurrence),
}

impl BlockedEntry {
    /// Number of days this entry blocks, or `None` for an unbounded recurrence.
    pub fn finite_len(&self) -> Option<u64> {
        match self {
            BlockedEntry::Single(_) => Some(1),
            BlockedEntry::Range(span) => Some(span.len_days()),
            BlockedEntry::Recurring(_) => None,
        }
    }

    /// Push every day of this entry that falls inside `window` into `out`.
    fn collect_days(&self, window: &DateSpan, out: &mut BTreeSet<NaiveDate>) {
        match self {
            BlockedEntry::Single(day) => {
                if window.contains(*day) {
                    out.insert(*day);
                }
            }
            BlockedEntry::Range(span) => {
                if let Some(overlap) = span.intersect(window) {
                    out.extend(overlap.days());
                }
            }
            BlockedEntry::Recurring(rule) => {
                out.extend(rule.occurrences_in(window));
            }
        }
    }
}

impl TryFrom<CalendarValue> for BlockedEntry {
    type Error = SkipError;

    fn try_from(value: CalendarValue) -> Result<Self> {
        Ok(match value {
            CalendarValue::Date(d) => BlockedEntry::Single(d),
            CalendarValue::DateTime(dt) => BlockedEntry::Single(dt.date()),
            CalendarValue::Zoned(dt) => BlockedEntry::Single(dt.date_naive()),
            CalendarValue::Span(span) => BlockedEntry::Range(span),
            CalendarValue::Recurring(r) => BlockedEntry::Recurring(r),
            CalendarValue::Rule(text) => BlockedEntry::Recurring(Recurrence::parse(&text)?),
        })
    }
}

/// A grow-only union of blocked entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockedSet {
    entries: Vec<BlockedEntry>,
}

impl BlockedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one entry to the union.
    pub fn union(&mut self, entry: BlockedEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[BlockedEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total days blocked by bounded entries (single days and spans).
    ///
    /// Overlapping entries are counted once per entry, so this is an upper bound
    /// on the distinct bounded days.
    pub fn finite_day_count(&self) -> u64 {
        self.entries
            .iter()
            .filter_map(BlockedEntry::finite_len)
            .fold(0u64, u64::saturating_add)
    }

    /// The blocked days that fall inside `window`.
    pub fn intersect(&self, window: &DateSpan) -> BlockedDays {
        let mut days = BTreeSet::new();
        if window.is_empty() {
            return BlockedDays { days };
        }
        for entry in &self.entries {
            entry.collect_days(window, &mut days);
        }
        BlockedDays { days }
    }
}

impl Extend<BlockedEntry> for BlockedSet {
    fn extend<I: IntoIterator<Item = BlockedEntry>>(&mut self, iter: I) {
        self.entries.extend(iter);
    }
}

/// Ordered, de-duplicated blocked days inside one span.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockedDays {
    days: BTreeSet<NaiveDate>,
}

impl BlockedDays {
    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.days.contains(&day)
    }

    /// Every blocked day, ascending.
    pub fn iter(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.days.iter().copied()
    }

    pub fn to_vec(&self) -> Vec<NaiveDate> {
        self.iter().collect()
    }

    /// Runs of consecutive blocked days, as sorted non-overlapping spans.
    pub fn spans(&self) -> Vec<DateSpan> {
        let mut merged: Vec<DateSpan> = Vec::new();
        for day in self.iter() {
            // Stored days come from a half-open span, so each is before
            // NaiveDate::MAX and has a successor.
            let Some(next) = day.succ_opt() else { break };
            match merged.last_mut() {
                Some(run) if run.end() == day => run.extend_to(next),
                _ => merged.extend(DateSpan::new(day, next).ok()),
            }
        }
        merged
    }

    /// Number of stored days in `[from, to)`.
    pub(crate) fn count_between(&self, from: NaiveDate, to: NaiveDate) -> usize {
        if from >= to {
            return 0;
        }
        self.days.range(from..to).count()
    }

    /// The stored days inside `window`.
    pub(crate) fn within(&self, window: &DateSpan) -> BlockedDays {
        if window.is_empty() {
            return BlockedDays::default();
        }
        BlockedDays {
            days: self
                .days
                .range(window.start()..window.end())
                .copied()
                .collect(),
        }
    }

    /// Merge in days taken from a later, disjoint span.
    pub(crate) fn append(&mut self, mut other: BlockedDays) {
        self.days.append(&mut other.days);
    }
}

impl Serialize for BlockedDays {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.days.iter())
    }
}
