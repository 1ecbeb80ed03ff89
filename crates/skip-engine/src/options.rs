//! Construction options, typed and JSON.
//!
//! [`CalendarOptions`] is the typed form: every field is optional and goes
//! through the same setter a direct call would use. The JSON form is a single
//! object with any of these keys:
//!
//! ```json
//! {
//!   "start_date": "2011-07-01",
//!   "blocked_spec_text": "Independence Day\nRRULE:FREQ=WEEKLY;BYDAY=SA,SU",
//!   "blocked_entries": [
//!     "7/22",
//!     "RRULE:FREQ=YEARLY;BYMONTH=12;BYMONTHDAY=26",
//!     { "start": "2011-12-24", "end": "2012-01-02" },
//!     { "rrule": "FREQ=MONTHLY;BYMONTHDAY=1" }
//!   ]
//! }
//! ```
//!
//! Unknown keys are ignored. The day count is never an option; it is only
//! accepted by `resolve`.

use chrono::{Datelike, NaiveDate};
use serde_json::{Map, Value};

use crate::blocked::CalendarValue;
use crate::collector::local_year;
use crate::error::{Result, SkipError};
use crate::parser::DateParser;
use crate::recurrence::has_rrule_prefix;
use crate::span::DateSpan;

/// Typed construction options for [`crate::SkipCalendar::with_options`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CalendarOptions {
    pub start_date: Option<CalendarValue>,
    pub blocked_spec_text: Option<String>,
    pub blocked_entries: Vec<CalendarValue>,
}

impl CalendarOptions {
    /// Parse a JSON options document.
    ///
    /// # Errors
    /// Returns [`SkipError::InvalidArgument`] for malformed JSON or any of the
    /// conditions listed on [`from_value`](Self::from_value).
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)
            .map_err(|e| SkipError::InvalidArgument(format!("options are not valid JSON: {}", e)))?;
        Self::from_value(&value)
    }

    /// Convert a JSON options value.
    ///
    /// # Errors
    /// Returns [`SkipError::InvalidArgument`] if `value` is not an object, if
    /// `start_date` is not a date string, if `blocked_spec_text` is not a
    /// string, or if `blocked_entries` is not an array of recognizable entries.
    pub fn from_value(value: &Value) -> Result<Self> {
        let map = value.as_object().ok_or_else(|| {
            SkipError::InvalidArgument("options must be a key/value mapping".to_string())
        })?;

        let start_date = start_date_from(map)?;
        let default_year = start_date.map_or_else(local_year, |d| d.year());
        let parser = DateParser::new(default_year);

        let blocked_spec_text = match map.get("blocked_spec_text") {
            None | Some(Value::Null) => None,
            Some(Value::String(text)) => Some(text.clone()),
            Some(_) => {
                return Err(SkipError::InvalidArgument(
                    "expected a plain text value".to_string(),
                ))
            }
        };

        let blocked_entries = match map.get("blocked_entries") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items
                .iter()
                .enumerate()
                .map(|(i, item)| entry_from(item, &parser).map_err(|e| index_error(i, e)))
                .collect::<Result<Vec<_>>>()?,
            Some(_) => {
                return Err(SkipError::InvalidArgument(
                    "blocked_entries must be an array".to_string(),
                ))
            }
        };

        Ok(Self {
            start_date: start_date.map(CalendarValue::Date),
            blocked_spec_text,
            blocked_entries,
        })
    }
}

/// Coerce a JSON day count: integers, integral floats, and numeric strings.
///
/// # Errors
/// Returns [`SkipError::InvalidArgument`] for negative, fractional or
/// non-numeric values.
pub fn day_count_from_value(value: &Value) -> Result<i64> {
    let invalid = || SkipError::InvalidArgument("must provide integer >= 0".to_string());

    let n = match value {
        Value::Number(n) => match n.as_i64() {
            Some(i) => i,
            None => {
                let f = n.as_f64().ok_or_else(invalid)?;
                if f.fract() != 0.0 || f < 0.0 || f > i64::MAX as f64 {
                    return Err(invalid());
                }
                f as i64
            }
        },
        Value::String(s) => s.trim().parse::<i64>().map_err(|_| invalid())?,
        _ => return Err(invalid()),
    };

    if n < 0 {
        return Err(invalid());
    }
    Ok(n)
}

fn start_date_from(map: &Map<String, Value>) -> Result<Option<NaiveDate>> {
    let not_a_date = || SkipError::InvalidArgument("must pass a date value".to_string());
    match map.get("start_date") {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => DateParser::new(local_year())
            .parse(s)
            .map(Some)
            .map_err(|_| not_a_date()),
        Some(_) => Err(not_a_date()),
    }
}

fn entry_from(item: &Value, parser: &DateParser) -> Result<CalendarValue> {
    match item {
        Value::String(s) if has_rrule_prefix(s.trim()) => Ok(CalendarValue::Rule(s.clone())),
        Value::String(s) => parser
            .parse(s)
            .map(CalendarValue::Date)
            .map_err(|e| SkipError::InvalidArgument(e.to_string())),
        Value::Object(obj) => {
            if let Some(rule) = obj.get("rrule") {
                let rule = rule.as_str().ok_or_else(|| {
                    SkipError::InvalidArgument("rrule must be a string".to_string())
                })?;
                return Ok(CalendarValue::Rule(rule.to_string()));
            }
            let start = span_bound(obj, "start", parser)?;
            let end = span_bound(obj, "end", parser)?;
            Ok(CalendarValue::Span(DateSpan::new(start, end)?))
        }
        _ => Err(SkipError::InvalidArgument(
            "expected a date string, span object, or rrule object".to_string(),
        )),
    }
}

fn span_bound(obj: &Map<String, Value>, key: &str, parser: &DateParser) -> Result<NaiveDate> {
    let raw = obj
        .get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| SkipError::InvalidArgument(format!("span object needs a '{}' date", key)))?;
    parser
        .parse(raw)
        .map_err(|e| SkipError::InvalidArgument(e.to_string()))
}

fn index_error(index: usize, err: SkipError) -> SkipError {
    match err {
        SkipError::InvalidArgument(msg) => {
            SkipError::InvalidArgument(format!("blocked_entries[{}]: {}", index, msg))
        }
        other => other,
    }
}
