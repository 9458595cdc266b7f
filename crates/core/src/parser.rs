//! Chatterino log line parsing.
//!
//! A chat line looks like `[11:34:40]  user: message`. The bracket can also hold
//! a full date. Everything else (comments, joins, timeouts, noise) is skipped.

use chrono::NaiveDate;

use crate::domain::ChatEvent;
use crate::utils::{parse_line_timestamp, strip_line_breaks};

/// Parses one log line into a chat event.
///
/// Returns `None` for anything that isn't a user message. Never panics,
/// whatever the input.
pub fn parse_line(line: &str, channel: &str, assumed_date: Option<NaiveDate>) -> Option<ChatEvent> {
    // A byte order mark may lead the first line of a file
    let line = line
        .trim_start_matches('\u{feff}')
        .trim_end_matches(['\r', '\n']);

    // Comments, e.g. logging start time and timezone
    if line.starts_with('#') {
        return None;
    }

    let rest = line.strip_prefix('[')?;
    let (stamp, rest) = rest.split_once(']')?;
    let timestamp = parse_line_timestamp(stamp.trim(), assumed_date)?;

    let (user, message) = rest.trim_start().split_once(": ")?;
    let username = login_name(user)?;

    Some(ChatEvent {
        timestamp,
        username: username.to_string(),
        channel: channel.to_string(),
        message: strip_line_breaks(message),
    })
}

/// Users with CJK display names are logged as "<display name> <login>".
/// Any other name containing a space is a system line.
fn login_name(user: &str) -> Option<&str> {
    let user = if user.is_ascii() {
        user
    } else {
        user.rsplit(' ').next()?
    };

    if user.is_empty() || user.contains(char::is_whitespace) {
        return None;
    }
    Some(user)
}
