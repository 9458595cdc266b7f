use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// Parses the timestamp inside a log line's leading brackets.
/// Supports "2020-07-20 11:34:40", "2020-07-20T11:34:40" and a bare "11:34:40",
/// which needs the date taken from the log file name.
pub fn parse_line_timestamp(stamp: &str, assumed_date: Option<NaiveDate>) -> Option<NaiveDateTime> {
    if stamp.is_empty() {
        return None;
    }

    if let Ok(dt) = NaiveDateTime::parse_from_str(stamp, "%Y-%m-%d %H:%M:%S") {
        return Some(dt);
    }

    if let Ok(dt) = NaiveDateTime::parse_from_str(stamp, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt);
    }

    // Chatterino's own format only carries the time of day
    let time = NaiveTime::parse_from_str(stamp, "%H:%M:%S").ok()?;
    assumed_date.map(|date| date.and_time(time))
}

/// Extracts the date a log file covers from its name.
/// Chatterino names files like "quinndt-2021-05-26.log".
pub fn log_file_date(file_name: &str) -> Option<NaiveDate> {
    let stem = file_name.strip_suffix(".log")?;
    // YYYY-MM-DD is always the last 10 characters
    if stem.len() < 11 || !stem.is_char_boundary(stem.len() - 10) {
        return None;
    }
    let (head, date) = stem.split_at(stem.len() - 10);
    if !head.ends_with('-') {
        return None;
    }
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

/// ISO-8601 without offset, fractional seconds only when non-zero.
/// Matches how the datetimes serialize to JSON.
pub fn to_iso8601(dt: &NaiveDateTime) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S%.f").to_string()
}

/// Removes line breaks embedded in a message
pub fn strip_line_breaks(text: &str) -> String {
    text.chars().filter(|c| *c != '\n' && *c != '\r').collect()
}
