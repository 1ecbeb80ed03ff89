//! Property-based tests for window resolution using proptest.
//!
//! These hold for any start date, day count, and mix of blocked entries, not
//! just the July 2011 scenarios in `resolver_tests.rs`.

use chrono::{Days, NaiveDate};
use proptest::prelude::*;
use skip_engine::{BlockedEntry, BlockedSet, DateSpan, Recurrence, WindowResolver};

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

/// A start date in 2010-2030. Day is capped at 28 to avoid invalid month/day combos.
fn arb_start() -> impl Strategy<Value = NaiveDate> {
    (2010i32..=2030, 1u32..=12, 1u32..=28)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

fn arb_day_count() -> impl Strategy<Value = i64> {
    0i64..=400
}

/// Rules that never block every day, so resolution always converges.
fn arb_rule() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("FREQ=WEEKLY;BYDAY=SA,SU".to_string()),
        Just("FREQ=WEEKLY;BYDAY=WE".to_string()),
        Just("FREQ=MONTHLY;BYMONTHDAY=1,15".to_string()),
        Just("FREQ=YEARLY;BYMONTH=7;BYMONTHDAY=4".to_string()),
        Just("FREQ=YEARLY;BYMONTH=11;BYDAY=4TH".to_string()),
    ]
}

/// A blocked entry placed relative to a base date.
fn arb_entry() -> impl Strategy<Value = (u64, u64, Option<String>)> {
    (0u64..=500, 1u64..=10, proptest::option::of(arb_rule()))
}

fn build_set(base: NaiveDate, raw: &[(u64, u64, Option<String>)]) -> BlockedSet {
    let mut set = BlockedSet::new();
    for (offset, len, rule) in raw {
        let day = base.checked_add_days(Days::new(*offset)).unwrap();
        let entry = match rule {
            Some(rule) => BlockedEntry::Recurring(Recurrence::parse(rule).unwrap()),
            None if *len == 1 => BlockedEntry::Single(day),
            None => BlockedEntry::Range(DateSpan::from_days(day, *len).unwrap()),
        };
        set.union(entry);
    }
    set
}

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: 64,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Property 1: the window holds exactly the requested number of unblocked days
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn window_holds_exactly_n_unblocked_days(
        start in arb_start(),
        n in arb_day_count(),
        raw in proptest::collection::vec(arb_entry(), 0..6),
    ) {
        let set = build_set(start, &raw);
        let result = WindowResolver::new()
            .with_start(start)
            .with_blocked(&set)
            .resolve(n)
            .unwrap();

        prop_assert_eq!(result.window.start(), start);
        prop_assert_eq!(result.skipped.clone(), set.intersect(&result.window));

        let unblocked = result.window.days().filter(|d| !result.skipped.contains(*d)).count();
        prop_assert_eq!(unblocked as i64, n);
        prop_assert_eq!(
            result.window.len_days(),
            n as u64 + result.skipped.len() as u64
        );
    }
}

// ---------------------------------------------------------------------------
// Property 2: the end is the smallest one that works
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn window_is_minimal(
        start in arb_start(),
        n in 1i64..=200,
        raw in proptest::collection::vec(arb_entry(), 0..6),
    ) {
        let set = build_set(start, &raw);
        let result = WindowResolver::new()
            .with_start(start)
            .with_blocked(&set)
            .resolve(n)
            .unwrap();

        // The last day of a non-empty window is never blocked.
        let last = result.end().pred_opt().unwrap();
        prop_assert!(!result.skipped.contains(last), "window ends on blocked day {}", last);
    }
}

// ---------------------------------------------------------------------------
// Property 3: adding blocked entries never moves the end earlier
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn more_blocked_entries_never_end_earlier(
        start in arb_start(),
        n in arb_day_count(),
        base in proptest::collection::vec(arb_entry(), 0..4),
        extra in proptest::collection::vec(arb_entry(), 1..4),
    ) {
        let smaller = build_set(start, &base);
        let mut larger = smaller.clone();
        larger.extend(build_set(start, &extra).entries().iter().cloned());

        let resolve = |set: &BlockedSet| {
            WindowResolver::new().with_start(start).with_blocked(set).resolve(n).unwrap()
        };
        prop_assert!(resolve(&larger).end() >= resolve(&smaller).end());
    }
}

// ---------------------------------------------------------------------------
// Property 4: resolution is deterministic
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn resolution_is_deterministic(
        start in arb_start(),
        n in arb_day_count(),
        raw in proptest::collection::vec(arb_entry(), 0..6),
    ) {
        let set = build_set(start, &raw);
        let resolver = WindowResolver::new().with_start(start).with_blocked(&set);
        prop_assert_eq!(resolver.resolve(n).unwrap(), resolver.resolve(n).unwrap());
    }
}
