use approx::assert_relative_eq;
use chrono::{FixedOffset, TimeDelta};
use series_sketch::capture::SeriesCapture;
use series_sketch::core::{TimeGrid, Timestamp, ValueRange, parse_timestamp, timestamp_to_unix_seconds};
use series_sketch::table::CellValue;

fn ts(text: &str) -> Timestamp {
    let utc = FixedOffset::east_opt(0).expect("utc offset");
    parse_timestamp(text, utc).expect("valid timestamp")
}

fn x(text: &str) -> f64 {
    timestamp_to_unix_seconds(ts(text))
}

fn capture(end: &str, period: TimeDelta) -> SeriesCapture {
    let grid = TimeGrid::new(ts("2023-01-01 00:00"), ts(end), period).expect("valid grid");
    let range = ValueRange::new(0.0, 100.0).expect("valid range");
    SeriesCapture::new(grid, "timestamp", range)
}

#[test]
fn skipped_grid_points_fall_on_the_connecting_line() {
    let mut capture = capture("2023-01-01 01:00", TimeDelta::minutes(5));
    capture.begin_series("ramp").expect("begin");
    capture.add_point(x("2023-01-01 00:00"), 5.0).expect("first");
    capture.add_point(x("2023-01-01 00:15"), 11.0).expect("second");

    let points = capture.points();
    assert_eq!(points.len(), 4);
    assert_eq!(points[1].time, ts("2023-01-01 00:05"));
    assert_eq!(points[2].time, ts("2023-01-01 00:10"));
    assert_relative_eq!(points[1].value, 7.0, epsilon = 1e-9);
    assert_relative_eq!(points[2].value, 9.0, epsilon = 1e-9);
    assert_eq!(points[3].time, ts("2023-01-01 00:15"));
    assert_eq!(points[3].value, 11.0);
}

#[test]
fn adjacent_clicks_add_no_fills() {
    let mut capture = capture("2023-01-01 01:00", TimeDelta::minutes(5));
    capture.begin_series("steps").expect("begin");
    capture.add_point(x("2023-01-01 00:00"), 5.0).expect("first");
    capture.add_point(x("2023-01-01 00:05"), 50.0).expect("second");

    assert_eq!(capture.points().len(), 2);
}

#[test]
fn slope_is_measured_in_fractional_minutes() {
    let mut capture = capture("2023-01-01 00:02", TimeDelta::seconds(30));
    capture.begin_series("fast").expect("begin");
    capture.add_point(x("2023-01-01 00:00"), 0.0).expect("first");
    capture
        .add_point(x("2023-01-01 00:01:30"), 3.0)
        .expect("second");

    let points = capture.points();
    assert_eq!(points.len(), 4);
    assert_relative_eq!(points[1].value, 1.0, epsilon = 1e-9);
    assert_relative_eq!(points[2].value, 2.0, epsilon = 1e-9);
}

#[test]
fn partial_series_commits_with_missing_trailing_rows_and_can_be_redrawn() {
    let mut capture = capture("2023-01-01 00:20", TimeDelta::minutes(5));
    capture.begin_series("partial").expect("begin");
    capture.add_point(x("2023-01-01 00:00"), 0.0).expect("first");
    capture.add_point(x("2023-01-01 00:10"), 10.0).expect("second");

    let report = capture.finish_series().expect("finish");
    assert!(!report.validation.is_valid());
    assert_eq!(report.validation.expected_points, 4);
    assert_eq!(report.validation.actual_points, 3);

    let column = capture.table().column("partial").expect("committed column");
    assert_eq!(column.len(), 4);
    assert_eq!(column[0], Some(CellValue::Number(0.0)));
    assert_eq!(column[3], None);
    let middle = column[1]
        .as_ref()
        .and_then(CellValue::as_number)
        .expect("interpolated value");
    assert_relative_eq!(middle, 5.0, epsilon = 1e-9);

    capture.begin_series("complete").expect("begin second");
    capture.add_point(x("2023-01-01 00:00"), 0.0).expect("first");
    capture.add_point(x("2023-01-01 00:10"), 10.0).expect("second");
    let accepts_more = capture
        .add_point(x("2023-01-01 00:15"), 15.0)
        .expect("third");
    assert!(!accepts_more);

    let report = capture.finish_series().expect("finish second");
    assert!(report.validation.is_valid());
    assert_eq!(capture.series_count(), 2);
}
