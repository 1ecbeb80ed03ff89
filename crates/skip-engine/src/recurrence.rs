//! Recurring blocked days -- wraps RRULE expansion into calendar-day sets.
//!
//! Builds on the `rrule` crate. Every rule is anchored at a DTSTART (midnight UTC
//! on the anchor day) and expanded on demand, walking instances in order until
//! the end of the requested span, so an unbounded rule like
//! `FREQ=WEEKLY;BYDAY=SA,SU` can be intersected with any finite span.

use std::fmt;

use chrono::{NaiveDate, Utc};
use rrule::RRuleSet;

use crate::error::{Result, SkipError};
use crate::span::DateSpan;

/// Default DTSTART for rules that don't supply their own anchor.
pub const DEFAULT_ANCHOR: NaiveDate = match NaiveDate::from_ymd_opt(1970, 1, 1) {
    Some(d) => d,
    None => panic!("invalid default anchor"),
};

/// A recurrence rule anchored at a start day.
#[derive(Clone)]
pub struct Recurrence {
    rule: String,
    anchor: NaiveDate,
    set: RRuleSet,
}

impl Recurrence {
    /// Parse an RRULE body anchored at [`DEFAULT_ANCHOR`].
    ///
    /// Accepts the body with or without a leading `RRULE:` token, in any case
    /// (e.g. `"FREQ=WEEKLY;BYDAY=SA,SU"` or `"rrule:freq=yearly;bymonth=7;bymonthday=4"`).
    ///
    /// # Errors
    /// Returns [`SkipError::InvalidRule`] if the rule is empty or unparseable.
    pub fn parse(rule: &str) -> Result<Self> {
        Self::with_anchor(rule, DEFAULT_ANCHOR)
    }

    /// Parse an RRULE body whose first possible instance is `anchor`.
    ///
    /// # Errors
    /// Returns [`SkipError::InvalidRule`] if the rule is empty or unparseable.
    pub fn with_anchor(rule: &str, anchor: NaiveDate) -> Result<Self> {
        let body = strip_rrule_prefix(rule.trim()).trim().to_uppercase();
        if body.is_empty() {
            return Err(SkipError::InvalidRule("empty RRULE string".to_string()));
        }

        // The rrule crate needs a datetime, so the anchor day becomes midnight UTC.
        let rrule_text = format!("DTSTART:{}T000000Z\nRRULE:{}", anchor.format("%Y%m%d"), body);

        let set: RRuleSet = rrule_text
            .parse()
            .map_err(|e| SkipError::InvalidRule(format!("{}", e)))?;

        Ok(Self {
            rule: body,
            anchor,
            set,
        })
    }

    /// The normalized (upper-cased, prefix-free) rule body.
    pub fn rule(&self) -> &str {
        &self.rule
    }

    pub fn anchor(&self) -> NaiveDate {
        self.anchor
    }

    /// The distinct calendar days (in UTC) on which the rule fires inside `span`.
    ///
    /// Returned in ascending order. Instances are walked once, in order, from
    /// the anchor and the walk stops at the end of the span.
    pub fn occurrences_in(&self, span: &DateSpan) -> Vec<NaiveDate> {
        if span.is_empty() {
            return Vec::new();
        }

        let mut days: Vec<NaiveDate> = (&self.set)
            .into_iter()
            .map(|dt| dt.with_timezone(&Utc).date_naive())
            .skip_while(|d| *d < span.start())
            .take_while(|d| *d < span.end())
            .collect();
        // Sub-daily rules fire several times a day.
        days.dedup();
        days
    }
}

impl fmt::Debug for Recurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Recurrence")
            .field("rule", &self.rule)
            .field("anchor", &self.anchor)
            .finish()
    }
}

impl PartialEq for Recurrence {
    fn eq(&self, other: &Self) -> bool {
        self.rule == other.rule && self.anchor == other.anchor
    }
}

impl Eq for Recurrence {}

/// Strip a leading `RRULE:` token (case-insensitive), if present.
pub(crate) fn strip_rrule_prefix(line: &str) -> &str {
    match line.get(..6) {
        Some(head) if head.eq_ignore_ascii_case("RRULE:") => &line[6..],
        _ => line,
    }
}

/// True when `line` opens with the case-insensitive `RRULE:` token.
pub(crate) fn has_rrule_prefix(line: &str) -> bool {
    line.get(..6)
        .is_some_and(|head| head.eq_ignore_ascii_case("RRULE:"))
}
