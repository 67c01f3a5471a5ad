use chrono::{FixedOffset, TimeDelta};
use proptest::prelude::*;
use series_sketch::capture::SeriesCapture;
use series_sketch::core::{TimeGrid, ValueRange, parse_timestamp, timestamp_to_unix_seconds};

fn hourly_capture() -> SeriesCapture {
    let utc = FixedOffset::east_opt(0).expect("utc offset");
    let start = parse_timestamp("2023-01-01", utc).expect("start");
    let grid = TimeGrid::new(start, start + TimeDelta::hours(1), TimeDelta::minutes(5))
        .expect("valid grid");
    let range = ValueRange::new(0.0, 100.0).expect("valid range");
    SeriesCapture::new(grid, "timestamp", range)
}

proptest! {
    #[test]
    fn clicked_points_form_a_gap_free_grid_prefix(
        clicks in prop::collection::vec((-3_600.0f64..7_200.0, -500.0f64..500.0), 1..40)
    ) {
        let mut capture = hourly_capture();
        let origin = timestamp_to_unix_seconds(capture.grid().first());
        capture.begin_series("random").expect("begin");

        for (offset_seconds, value) in clicks {
            if !capture.add_point(origin + offset_seconds, value).expect("click") {
                break;
            }
        }

        let grid = capture.grid().timestamps().to_vec();
        let points = capture.points().to_vec();
        prop_assert!(!points.is_empty());
        prop_assert!(points.len() <= grid.len());
        for (point, expected) in points.iter().zip(&grid) {
            prop_assert_eq!(point.time, *expected);
        }

        let report = capture.finish_series().expect("finish");
        prop_assert_eq!(report.validation.off_grid_points, 0);
        prop_assert_eq!(report.validation.conflicting_points, 0);
        prop_assert_eq!(report.validation.actual_points, points.len());
        prop_assert_eq!(report.validation.is_valid(), points.len() == grid.len());

        let column = capture.table().column("random").expect("committed");
        prop_assert_eq!(column.len(), grid.len());
        prop_assert_eq!(column.iter().filter(|cell| cell.is_some()).count(), points.len());
    }

    #[test]
    fn interpolated_values_stay_between_their_endpoints(
        start_value in -1_000.0f64..1_000.0,
        end_value in -1_000.0f64..1_000.0,
        skipped in 1usize..10
    ) {
        let mut capture = hourly_capture();
        let origin = timestamp_to_unix_seconds(capture.grid().first());
        capture.begin_series("line").expect("begin");
        capture.add_point(origin, start_value).expect("first");
        capture
            .add_point(origin + 300.0 * (skipped as f64 + 1.0), end_value)
            .expect("second");

        let points = capture.points();
        prop_assert_eq!(points.len(), skipped + 2);
        let low = start_value.min(end_value) - 1e-9;
        let high = start_value.max(end_value) + 1e-9;
        for pair in points.windows(2) {
            prop_assert!(pair[1].value >= low && pair[1].value <= high);
            if end_value >= start_value {
                prop_assert!(pair[1].value >= pair[0].value - 1e-9);
            } else {
                prop_assert!(pair[1].value <= pair[0].value + 1e-9);
            }
        }
    }
}
