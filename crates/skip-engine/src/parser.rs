//! Best-effort parsing of human-written dates.
//!
//! [`DateParser`] tries a fixed chain of recognizers, most specific first:
//!
//! 1. RFC 3339 instants (`2011-07-22T09:30:00-05:00`), truncated to the day
//!    local to their offset
//! 2. ISO datetimes without offset (`2011-07-22T09:30`, `2011-07-22 09:30:00`)
//! 3. Numeric dates (`2011-07-22`, `2011/07/22`, `20110722`, `7/22/2011`,
//!    `7-22-11`, `7/22`)
//! 4. Named-month dates (`July 22, 2011`, `22 Jul 2011`, `Friday, July 22nd`)
//!
//! A date written without a year takes the parser's default year. Nothing here
//! reads the system clock; the caller picks the default year.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::error::{Result, SkipError};

const ISO_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Flexible date-string parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateParser {
    default_year: i32,
}

impl DateParser {
    /// A parser that resolves yearless dates (`7/22`, `July 22`) into `default_year`.
    pub fn new(default_year: i32) -> Self {
        Self { default_year }
    }

    pub fn default_year(&self) -> i32 {
        self.default_year
    }

    /// Parse `input` into a calendar day.
    ///
    /// # Errors
    /// Returns [`SkipError::InvalidDate`] when no recognizer accepts the input,
    /// or when it names an impossible day (`2/30/2011`).
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use skip_engine::DateParser;
    ///
    /// let parser = DateParser::new(2011);
    /// let expected = NaiveDate::from_ymd_opt(2011, 7, 22).unwrap();
    /// assert_eq!(parser.parse("7/22").unwrap(), expected);
    /// assert_eq!(parser.parse("Friday, July 22nd, 2011").unwrap(), expected);
    /// assert!(parser.parse("not a real date").is_err());
    /// ```
    pub fn parse(&self, input: &str) -> Result<NaiveDate> {
        let raw = input.trim();
        if raw.is_empty() {
            return Err(SkipError::InvalidDate("empty date string".to_string()));
        }

        if let Some(day) = try_rfc3339(raw).or_else(|| try_iso_datetime(raw)) {
            return Ok(day);
        }

        let normalized = normalize(raw);
        self.try_numeric(&normalized)
            .or_else(|| self.try_named_month(&normalized))
            .ok_or_else(|| SkipError::InvalidDate(format!("unrecognized date format: '{}'", raw)))
    }

    /// `YYYY-MM-DD`, `YYYYMMDD`, `M/D/YYYY`, `M/D/YY`, `M/D` (any one of `/`, `-`, `.`).
    fn try_numeric(&self, s: &str) -> Option<NaiveDate> {
        let sep = ['/', '-', '.'].into_iter().find(|c| s.contains(*c));
        let parts: Vec<&str> = match sep {
            Some(c) => s.split(c).collect(),
            None => vec![s],
        };
        if parts.iter().any(|p| p.is_empty() || !p.bytes().all(|b| b.is_ascii_digit())) {
            return None;
        }

        match parts.as_slice() {
            [compact] if compact.len() == 8 => {
                let year = compact[..4].parse().ok()?;
                let month = compact[4..6].parse().ok()?;
                let day = compact[6..].parse().ok()?;
                NaiveDate::from_ymd_opt(year, month, day)
            }
            [y, m, d] if y.len() == 4 && m.len() <= 2 && d.len() <= 2 => {
                NaiveDate::from_ymd_opt(y.parse().ok()?, m.parse().ok()?, d.parse().ok()?)
            }
            [m, d, y] if m.len() <= 2 && d.len() <= 2 => {
                let year = match y.len() {
                    4 => y.parse().ok()?,
                    1 | 2 => pivot_two_digit_year(y.parse().ok()?),
                    _ => return None,
                };
                NaiveDate::from_ymd_opt(year, m.parse().ok()?, d.parse().ok()?)
            }
            [m, d] if sep.is_some() && m.len() <= 2 && d.len() <= 2 => {
                NaiveDate::from_ymd_opt(self.default_year, m.parse().ok()?, d.parse().ok()?)
            }
            _ => None,
        }
    }

    /// `July 22 2011`, `Jul 22`, `22 July 2011`, `22 jul`.
    fn try_named_month(&self, s: &str) -> Option<NaiveDate> {
        let mut tokens: Vec<&str> = s.split(' ').collect();
        if tokens.first().is_some_and(|t| is_weekday_name(t)) {
            tokens.remove(0);
        }

        let (month, day, year) = match tokens.as_slice() {
            [a, b] => match (parse_month(a), parse_month(b)) {
                (Some(m), None) => (m, parse_day(b)?, None),
                (None, Some(m)) => (m, parse_day(a)?, None),
                _ => return None,
            },
            [a, b, y] => match (parse_month(a), parse_month(b)) {
                (Some(m), None) => (m, parse_day(b)?, Some(parse_year(y)?)),
                (None, Some(m)) => (m, parse_day(a)?, Some(parse_year(y)?)),
                _ => return None,
            },
            _ => return None,
        };

        NaiveDate::from_ymd_opt(year.unwrap_or(self.default_year), month, day)
    }
}

fn try_rfc3339(s: &str) -> Option<NaiveDate> {
    DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive())
}

fn try_iso_datetime(s: &str) -> Option<NaiveDate> {
    ISO_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|dt| dt.date())
}

/// Lowercase, turn commas into spaces, drop a trailing period, collapse spaces.
fn normalize(s: &str) -> String {
    let s = s.to_lowercase().replace(',', " ");
    let s = s.trim().trim_end_matches('.');
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Two-digit years: 00-69 land in the 2000s, 70-99 in the 1900s.
fn pivot_two_digit_year(yy: i32) -> i32 {
    if yy < 70 {
        2000 + yy
    } else {
        1900 + yy
    }
}

fn is_weekday_name(s: &str) -> bool {
    matches!(
        s,
        "monday"
            | "mon"
            | "tuesday"
            | "tue"
            | "tues"
            | "wednesday"
            | "wed"
            | "thursday"
            | "thu"
            | "thurs"
            | "friday"
            | "fri"
            | "saturday"
            | "sat"
            | "sunday"
            | "sun"
    )
}

/// Parse a month name to number (1-12). Full names and common abbreviations.
fn parse_month(s: &str) -> Option<u32> {
    match s.trim_end_matches('.') {
        "january" | "jan" => Some(1),
        "february" | "feb" => Some(2),
        "march" | "mar" => Some(3),
        "april" | "apr" => Some(4),
        "may" => Some(5),
        "june" | "jun" => Some(6),
        "july" | "jul" => Some(7),
        "august" | "aug" => Some(8),
        "september" | "sep" | "sept" => Some(9),
        "october" | "oct" => Some(10),
        "november" | "nov" => Some(11),
        "december" | "dec" => Some(12),
        _ => None,
    }
}

/// Day of month, with an optional ordinal suffix ("22", "22nd", "1st").
fn parse_day(s: &str) -> Option<u32> {
    let digits = ["st", "nd", "rd", "th"]
        .iter()
        .find_map(|suffix| s.strip_suffix(suffix))
        .unwrap_or(s);
    if digits.is_empty() || digits.len() > 2 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

fn parse_year(s: &str) -> Option<i32> {
    if s.len() == 4 && s.bytes().all(|b| b.is_ascii_digit()) {
        s.parse().ok()
    } else {
        None
    }
}
