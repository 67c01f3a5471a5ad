use chrono::{
    DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, TimeZone, Utc,
};

use crate::core::types::Timestamp;

const MICROS_PER_MINUTE: f64 = 60_000_000.0;

const NAIVE_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

const OFFSET_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%z"];

/// Export layout for timestamps; fractional seconds are only printed when present.
pub const TIMESTAMP_EXPORT_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f%:z";

#[must_use]
pub fn timestamp_to_unix_seconds(time: Timestamp) -> f64 {
    time.timestamp_millis() as f64 / 1000.0
}

/// Converts native x coordinates (unix seconds) into a timestamp at millisecond resolution.
#[must_use]
pub fn unix_seconds_to_timestamp(seconds: f64, offset: FixedOffset) -> Option<Timestamp> {
    if !seconds.is_finite() {
        return None;
    }
    let millis = (seconds * 1000.0).round();
    if millis < i64::MIN as f64 || millis > i64::MAX as f64 {
        return None;
    }
    DateTime::<Utc>::from_timestamp_millis(millis as i64).map(|time| time.with_timezone(&offset))
}

/// Length of `delta` in fractional minutes.
#[must_use]
pub fn delta_minutes(delta: TimeDelta) -> f64 {
    match delta.num_microseconds() {
        Some(micros) => micros as f64 / MICROS_PER_MINUTE,
        None => delta.num_milliseconds() as f64 * 1000.0 / MICROS_PER_MINUTE,
    }
}

#[must_use]
pub fn format_timestamp(time: Timestamp) -> String {
    time.format(TIMESTAMP_EXPORT_FORMAT).to_string()
}

/// Parses `UTC`, `Z` or a fixed `±HH:MM` / `±HHMM` / `±HH` offset.
#[must_use]
pub fn parse_offset(text: &str) -> Option<FixedOffset> {
    let text = text.trim();
    if ["utc", "z", "gmt"]
        .iter()
        .any(|name| text.eq_ignore_ascii_case(name))
    {
        return FixedOffset::east_opt(0);
    }

    let (sign, rest) = match text.as_bytes().first()? {
        b'+' => (1, &text[1..]),
        b'-' => (-1, &text[1..]),
        _ => return None,
    };
    let digits: String = rest.chars().filter(|ch| *ch != ':').collect();
    if !digits.chars().all(|ch| ch.is_ascii_digit()) {
        return None;
    }
    let (hours, minutes) = match digits.len() {
        2 => (digits.parse::<i32>().ok()?, 0),
        4 => (
            digits[..2].parse::<i32>().ok()?,
            digits[2..].parse::<i32>().ok()?,
        ),
        _ => return None,
    };
    if minutes >= 60 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

/// Parses an RFC 3339 timestamp, a timestamp with explicit offset, or a naive
/// date/datetime interpreted in `offset`.
#[must_use]
pub fn parse_timestamp(text: &str, offset: FixedOffset) -> Option<Timestamp> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(time) = DateTime::parse_from_rfc3339(text) {
        return Some(time.with_timezone(&offset));
    }
    for format in OFFSET_DATETIME_FORMATS {
        if let Ok(time) = DateTime::parse_from_str(text, format) {
            return Some(time.with_timezone(&offset));
        }
    }

    let naive = NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .map(|date| date.and_time(NaiveTime::MIN))
        })?;
    offset.from_local_datetime(&naive).single()
}

/// Parses a period expression such as `5min`, `30s`, `1h`, `2 days` or `00:05:00`.
#[must_use]
pub fn parse_period(text: &str) -> Option<TimeDelta> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if text.contains(':') {
        return parse_clock_period(text);
    }

    let split = text
        .find(|ch: char| !(ch.is_ascii_digit() || ch == '.' || ch == '-' || ch == '+'))
        .unwrap_or(text.len());
    let (number, unit) = text.split_at(split);
    let amount = if number.is_empty() {
        1.0
    } else {
        number.parse::<f64>().ok()?
    };
    let unit_micros = unit_micros(unit.trim())?;
    micros_delta(amount * unit_micros)
}

fn parse_clock_period(text: &str) -> Option<TimeDelta> {
    let parts: Vec<&str> = text.split(':').collect();
    if parts.len() != 3 {
        return None;
    }
    let hours = parts[0].parse::<u32>().ok()?;
    let minutes = parts[1].parse::<u32>().ok()?;
    let seconds = parts[2].parse::<f64>().ok()?;
    if minutes >= 60 || !(0.0..60.0).contains(&seconds) {
        return None;
    }
    let total_seconds = f64::from(hours) * 3600.0 + f64::from(minutes) * 60.0 + seconds;
    micros_delta(total_seconds * 1_000_000.0)
}

fn unit_micros(unit: &str) -> Option<f64> {
    // `T` and `m` keep their minute meaning; months are not fixed periods.
    let micros = match unit.to_ascii_lowercase().as_str() {
        "us" | "micro" | "micros" | "microsecond" | "microseconds" => 1.0,
        "ms" | "milli" | "millis" | "millisecond" | "milliseconds" => 1_000.0,
        "s" | "sec" | "secs" | "second" | "seconds" => 1_000_000.0,
        "t" | "m" | "min" | "mins" | "minute" | "minutes" => MICROS_PER_MINUTE,
        "h" | "hr" | "hrs" | "hour" | "hours" => 3_600_000_000.0,
        "d" | "day" | "days" => 86_400_000_000.0,
        "w" | "week" | "weeks" => 604_800_000_000.0,
        _ => return None,
    };
    Some(micros)
}

fn micros_delta(micros: f64) -> Option<TimeDelta> {
    let micros = micros.round();
    if !micros.is_finite() || micros.abs() > i64::MAX as f64 {
        return None;
    }
    Some(TimeDelta::microseconds(micros as i64))
}

#[cfg(test)]
mod tests {
    use super::{delta_minutes, parse_offset, parse_period, parse_timestamp};
    use chrono::{FixedOffset, TimeDelta, Timelike};

    #[test]
    fn period_accepts_pandas_style_units() {
        assert_eq!(parse_period("5min"), Some(TimeDelta::minutes(5)));
        assert_eq!(parse_period("5T"), Some(TimeDelta::minutes(5)));
        assert_eq!(parse_period("30s"), Some(TimeDelta::seconds(30)));
        assert_eq!(parse_period("1h"), Some(TimeDelta::hours(1)));
        assert_eq!(parse_period("2 days"), Some(TimeDelta::days(2)));
        assert_eq!(parse_period("250ms"), Some(TimeDelta::milliseconds(250)));
        assert_eq!(parse_period("1.5h"), Some(TimeDelta::minutes(90)));
        assert_eq!(parse_period("00:05:00"), Some(TimeDelta::minutes(5)));
        assert_eq!(parse_period("h"), Some(TimeDelta::hours(1)));
    }

    #[test]
    fn period_rejects_unknown_or_unitless_input() {
        assert_eq!(parse_period(""), None);
        assert_eq!(parse_period("5"), None);
        assert_eq!(parse_period("5 fortnights"), None);
        assert_eq!(parse_period("00:61:00"), None);
    }

    #[test]
    fn offset_accepts_utc_and_fixed_forms() {
        assert_eq!(parse_offset("UTC"), FixedOffset::east_opt(0));
        assert_eq!(parse_offset("+05:30"), FixedOffset::east_opt(19_800));
        assert_eq!(parse_offset("-0800"), FixedOffset::west_opt(28_800));
        assert_eq!(parse_offset("+02"), FixedOffset::east_opt(7_200));
        assert_eq!(parse_offset("Europe/Paris"), None);
        assert_eq!(parse_offset("+05:75"), None);
    }

    #[test]
    fn naive_timestamps_take_the_session_offset() {
        let offset = FixedOffset::east_opt(3_600).expect("offset");
        let time = parse_timestamp("2023-01-01", offset).expect("date");
        assert_eq!(time.offset(), &offset);
        assert_eq!(time.hour(), 0);

        let time = parse_timestamp("2023-01-01 06:30", offset).expect("datetime");
        assert_eq!(time.minute(), 30);

        let converted = parse_timestamp("2023-01-01T00:00:00Z", offset).expect("rfc3339");
        assert_eq!(converted.hour(), 1);
        assert!(parse_timestamp("yesterday", offset).is_none());
    }

    #[test]
    fn minutes_are_fractional() {
        assert_eq!(delta_minutes(TimeDelta::seconds(90)), 1.5);
        assert_eq!(delta_minutes(TimeDelta::minutes(-5)), -5.0);
    }
}
