use chrono::FixedOffset;
use series_sketch::core::{parse_timestamp, timestamp_to_unix_seconds};
use series_sketch::interaction::{
    ClickSource, PointerEvent, ScriptedClicks, SeriesScript, parse_click_line,
};

#[test]
fn scripted_clicks_end_with_end_of_input() {
    let mut clicks = ScriptedClicks::default();
    clicks.push(PointerEvent::Pixel { x: 1.0, y: 2.0 });

    assert_eq!(
        clicks.next_event().expect("event"),
        PointerEvent::Pixel { x: 1.0, y: 2.0 }
    );
    assert_eq!(clicks.next_event().expect("event"), PointerEvent::EndOfInput);
    assert_eq!(clicks.next_event().expect("event"), PointerEvent::EndOfInput);
}

#[test]
fn pointer_events_use_a_type_tag() {
    let event: PointerEvent =
        serde_json::from_str(r#"{"type": "native", "x": 1.5, "y": -2.0}"#).expect("event");
    assert_eq!(event, PointerEvent::Native { x: 1.5, y: -2.0 });

    let end = serde_json::to_string(&PointerEvent::EndOfInput).expect("json");
    assert_eq!(end, r#"{"type":"end_of_input"}"#);
}

#[test]
fn series_scripts_convert_times_to_native_clicks() {
    let scripts = SeriesScript::load_all(
        r#"[
            {"name": "load", "clicks": [
                {"time": "2023-01-01 00:00", "value": 1.0},
                {"time": "2023-01-01T01:00:00+01:00", "value": 2.0}
            ]}
        ]"#,
    )
    .expect("valid script");
    assert_eq!(scripts.len(), 1);

    let utc = FixedOffset::east_opt(0).expect("utc offset");
    let mut clicks = scripts[0].to_clicks(utc).expect("clicks");
    let midnight = timestamp_to_unix_seconds(
        parse_timestamp("2023-01-01 00:00", utc).expect("timestamp"),
    );

    assert_eq!(clicks.remaining(), 2);
    assert_eq!(
        clicks.next_event().expect("first"),
        PointerEvent::Native {
            x: midnight,
            y: 1.0
        }
    );
    assert_eq!(
        clicks.next_event().expect("second"),
        PointerEvent::Native {
            x: midnight,
            y: 2.0
        }
    );
}

#[test]
fn scripts_with_bad_times_are_rejected() {
    let scripts =
        SeriesScript::load_all(r#"[{"name": "bad", "clicks": [{"time": "soon", "value": 1.0}]}]"#)
            .expect("valid json");
    let utc = FixedOffset::east_opt(0).expect("utc offset");

    assert!(scripts[0].to_clicks(utc).is_err());
}

#[test]
fn console_click_lines_need_a_time_and_a_finite_value() {
    let utc = FixedOffset::east_opt(0).expect("utc offset");
    let expected_x = timestamp_to_unix_seconds(
        parse_timestamp("2023-01-01 00:05", utc).expect("timestamp"),
    );

    assert_eq!(
        parse_click_line(" 2023-01-01 00:05   12.5 ", utc),
        Some(PointerEvent::Native {
            x: expected_x,
            y: 12.5
        })
    );
    for line in [
        "2023-01-01 00:05 nan",
        "2023-01-01 00:05 inf",
        "2023-01-01 00:05 -infinity",
        "2023-01-01 00:05",
        "soon 3",
        "12.5",
    ] {
        assert_eq!(parse_click_line(line, utc), None, "{line}");
    }
}
