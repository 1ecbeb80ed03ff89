//! Named holiday tables.
//!
//! A [`HolidayTable`] maps exact holiday names to yearly RRULE bodies. Lookups
//! are case-sensitive and whole-name only: `"Independence Day"` matches,
//! `"independence day"` and `"Independence Day parade"` do not.

use crate::error::Result;
use crate::recurrence::Recurrence;

/// A table of known holiday names and the rules that generate them.
pub trait HolidayTable {
    /// Every holiday name this table recognizes, in table order.
    fn names(&self) -> Vec<&str>;

    /// The RRULE body for `name`, or `None` when the name is unknown.
    fn rule_for(&self, name: &str) -> Option<&str>;

    /// Resolve `name` into an annual recurrence.
    ///
    /// # Errors
    /// Returns [`crate::SkipError::InvalidRule`] if the table's rule for the
    /// name does not parse.
    fn lookup(&self, name: &str) -> Result<Option<Recurrence>> {
        self.rule_for(name).map(Recurrence::parse).transpose()
    }
}

/// US federal holidays and widely observed US days.
///
/// Only observances expressible as a yearly RRULE are included; Easter and the
/// days derived from it are not.
#[derive(Debug, Clone, Copy, Default)]
pub struct UsHolidays;

const US_HOLIDAYS: &[(&str, &str)] = &[
    ("New Year's Day", "FREQ=YEARLY;BYMONTH=1;BYMONTHDAY=1"),
    ("Martin Luther King Jr. Day", "FREQ=YEARLY;BYMONTH=1;BYDAY=3MO"),
    ("Groundhog Day", "FREQ=YEARLY;BYMONTH=2;BYMONTHDAY=2"),
    ("Valentine's Day", "FREQ=YEARLY;BYMONTH=2;BYMONTHDAY=14"),
    ("Presidents Day", "FREQ=YEARLY;BYMONTH=2;BYDAY=3MO"),
    ("Washington's Birthday", "FREQ=YEARLY;BYMONTH=2;BYDAY=3MO"),
    ("St. Patrick's Day", "FREQ=YEARLY;BYMONTH=3;BYMONTHDAY=17"),
    ("Arbor Day", "FREQ=YEARLY;BYMONTH=4;BYDAY=-1FR"),
    ("Mother's Day", "FREQ=YEARLY;BYMONTH=5;BYDAY=2SU"),
    ("Armed Forces Day", "FREQ=YEARLY;BYMONTH=5;BYDAY=3SA"),
    ("Memorial Day", "FREQ=YEARLY;BYMONTH=5;BYDAY=-1MO"),
    ("Flag Day", "FREQ=YEARLY;BYMONTH=6;BYMONTHDAY=14"),
    ("Father's Day", "FREQ=YEARLY;BYMONTH=6;BYDAY=3SU"),
    ("Juneteenth", "FREQ=YEARLY;BYMONTH=6;BYMONTHDAY=19"),
    ("Independence Day", "FREQ=YEARLY;BYMONTH=7;BYMONTHDAY=4"),
    ("Labor Day", "FREQ=YEARLY;BYMONTH=9;BYDAY=1MO"),
    ("Patriot Day", "FREQ=YEARLY;BYMONTH=9;BYMONTHDAY=11"),
    ("Columbus Day", "FREQ=YEARLY;BYMONTH=10;BYDAY=2MO"),
    ("Halloween", "FREQ=YEARLY;BYMONTH=10;BYMONTHDAY=31"),
    // First Tuesday after the first Monday: always the 2nd through the 8th.
    (
        "Election Day",
        "FREQ=YEARLY;BYMONTH=11;BYDAY=TU;BYMONTHDAY=2,3,4,5,6,7,8",
    ),
    ("Veterans Day", "FREQ=YEARLY;BYMONTH=11;BYMONTHDAY=11"),
    ("Thanksgiving", "FREQ=YEARLY;BYMONTH=11;BYDAY=4TH"),
    // The Friday after the fourth Thursday falls on the 23rd through the 29th.
    (
        "Black Friday",
        "FREQ=YEARLY;BYMONTH=11;BYDAY=FR;BYMONTHDAY=23,24,25,26,27,28,29",
    ),
    ("Christmas Eve", "FREQ=YEARLY;BYMONTH=12;BYMONTHDAY=24"),
    ("Christmas Day", "FREQ=YEARLY;BYMONTH=12;BYMONTHDAY=25"),
    ("New Year's Eve", "FREQ=YEARLY;BYMONTH=12;BYMONTHDAY=31"),
];

impl HolidayTable for UsHolidays {
    fn names(&self) -> Vec<&str> {
        US_HOLIDAYS.iter().map(|(name, _)| *name).collect()
    }

    fn rule_for(&self, name: &str) -> Option<&str> {
        US_HOLIDAYS
            .iter()
            .find(|(known, _)| *known == name)
            .map(|(_, rule)| *rule)
    }
}
