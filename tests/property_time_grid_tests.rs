use chrono::{FixedOffset, TimeDelta};
use proptest::prelude::*;
use series_sketch::core::{TimeGrid, parse_timestamp};

proptest! {
    #[test]
    fn grid_is_strictly_increasing_with_ceil_cardinality(
        span_minutes in 2i64..5_000,
        period_minutes in 1i64..600
    ) {
        prop_assume!(period_minutes < span_minutes);
        let utc = FixedOffset::east_opt(0).expect("utc offset");
        let start = parse_timestamp("2023-01-01", utc).expect("start");
        let end = start + TimeDelta::minutes(span_minutes);

        let grid = TimeGrid::new(start, end, TimeDelta::minutes(period_minutes))
            .expect("valid grid");

        let expected = (span_minutes + period_minutes - 1) / period_minutes;
        prop_assert_eq!(grid.len() as i64, expected);
        prop_assert_eq!(grid.first(), start);
        prop_assert!(grid.last() < end);
        for pair in grid.timestamps().windows(2) {
            prop_assert_eq!(pair[1] - pair[0], TimeDelta::minutes(period_minutes));
        }
    }

    #[test]
    fn nearest_after_is_always_a_later_grid_point(
        current_idx in 0usize..23,
        target_offset_seconds in -7_200i64..90_000
    ) {
        let utc = FixedOffset::east_opt(0).expect("utc offset");
        let start = parse_timestamp("2023-01-01", utc).expect("start");
        let grid = TimeGrid::new(start, start + TimeDelta::days(1), TimeDelta::hours(1))
            .expect("valid grid");
        let current = grid.timestamps()[current_idx];
        let target = start + TimeDelta::seconds(target_offset_seconds);

        let snapped = grid.nearest_after(current, target).expect("a later point exists");
        prop_assert!(snapped > current);
        prop_assert!(grid.contains(snapped));
        for candidate in grid.timestamps().iter().filter(|time| **time > current) {
            prop_assert!((snapped - target).abs() <= (*candidate - target).abs());
        }
    }
}
