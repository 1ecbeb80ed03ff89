//! Tests for the flexible date parser.

use chrono::NaiveDate;
use skip_engine::{DateParser, SkipError};

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn parse(input: &str) -> Result<NaiveDate, SkipError> {
    DateParser::new(2011).parse(input)
}

#[test]
fn iso_and_compact_numeric_dates() {
    assert_eq!(parse("2011-07-22").unwrap(), ymd(2011, 7, 22));
    assert_eq!(parse("2011/7/22").unwrap(), ymd(2011, 7, 22));
    assert_eq!(parse("20110722").unwrap(), ymd(2011, 7, 22));
}

#[test]
fn us_style_numeric_dates() {
    assert_eq!(parse("7/22/2011").unwrap(), ymd(2011, 7, 22));
    assert_eq!(parse("07-22-2011").unwrap(), ymd(2011, 7, 22));
    assert_eq!(parse("7.22.2011").unwrap(), ymd(2011, 7, 22));
}

#[test]
fn two_digit_years_pivot_at_seventy() {
    assert_eq!(parse("7/22/11").unwrap(), ymd(2011, 7, 22));
    assert_eq!(parse("7/22/69").unwrap(), ymd(2069, 7, 22));
    assert_eq!(parse("7/22/70").unwrap(), ymd(1970, 7, 22));
    assert_eq!(parse("12/31/99").unwrap(), ymd(1999, 12, 31));
}

#[test]
fn yearless_dates_take_the_default_year() {
    assert_eq!(parse("7/22").unwrap(), ymd(2011, 7, 22));
    assert_eq!(parse("7-22").unwrap(), ymd(2011, 7, 22));
    assert_eq!(DateParser::new(2024).parse("2/29").unwrap(), ymd(2024, 2, 29));
}

#[test]
fn named_month_dates() {
    assert_eq!(parse("July 22, 2011").unwrap(), ymd(2011, 7, 22));
    assert_eq!(parse("Jul 22 2011").unwrap(), ymd(2011, 7, 22));
    assert_eq!(parse("22 July 2011").unwrap(), ymd(2011, 7, 22));
    assert_eq!(parse("22 jul").unwrap(), ymd(2011, 7, 22));
    assert_eq!(parse("SEPT 9").unwrap(), ymd(2011, 9, 9));
    assert_eq!(parse("Dec. 25").unwrap(), ymd(2011, 12, 25));
}

#[test]
fn weekday_prefix_and_ordinal_suffix_are_ignored() {
    assert_eq!(parse("Friday, July 22nd, 2011").unwrap(), ymd(2011, 7, 22));
    assert_eq!(parse("Mon July 4th").unwrap(), ymd(2011, 7, 4));
    assert_eq!(parse("1st May").unwrap(), ymd(2011, 5, 1));
}

#[test]
fn date_times_are_truncated_to_the_day() {
    assert_eq!(parse("2011-07-22T23:59:59").unwrap(), ymd(2011, 7, 22));
    assert_eq!(parse("2011-07-22 08:15").unwrap(), ymd(2011, 7, 22));
}

#[test]
fn rfc3339_keeps_the_day_local_to_its_offset() {
    // 23:30 in UTC-05:00 is already the 23rd in UTC, but the written day wins.
    assert_eq!(parse("2011-07-22T23:30:00-05:00").unwrap(), ymd(2011, 7, 22));
    assert_eq!(parse("2011-07-22T00:00:00Z").unwrap(), ymd(2011, 7, 22));
}

#[test]
fn impossible_days_are_rejected() {
    assert!(parse("2/30/2011").is_err());
    assert!(parse("13/1/2011").is_err());
    assert!(parse("2/29").is_err(), "2011 is not a leap year");
    assert!(parse("February 30").is_err());
}

#[test]
fn non_dates_are_invalid_date_errors() {
    for input in [
        "not a real date",
        "",
        "   ",
        "22",
        "2011",
        "Independence Day",
        "July",
        "7/22/2011/1",
        "July 22 11",
    ] {
        let err = parse(input).unwrap_err();
        assert!(
            matches!(err, SkipError::InvalidDate(_)),
            "{:?} should be an InvalidDate error, got {:?}",
            input,
            err
        );
    }
}
