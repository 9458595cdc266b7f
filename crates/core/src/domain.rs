use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One user chat message parsed out of a log line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatEvent {
    pub timestamp: NaiveDateTime,
    pub username: String,
    pub channel: String,
    pub message: String,
}

/// An image link found in a chat message.
///
/// Field order is the export order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRecord {
    /// The link text as it appeared in the message
    pub link: String,
    pub user: String,
    pub date: NaiveDateTime,
    pub channel: String,
    /// Provider resource identifier, when the URL carries one
    pub specific_id: Option<String>,
    pub message: String,
    /// Provider tag, e.g. "imgur.com"
    #[serde(rename = "type")]
    pub link_type: String,
    /// Direct-image form of `link`
    pub raw_link: String,
}

/// Everything an exporter needs for one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportBundle {
    pub total: usize,
    pub created: NaiveDateTime,
    pub channels: Vec<String>,
    pub links: Vec<LinkRecord>,
}

/// A requested channel name, either exact or `prefix*`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelPattern {
    Literal(String),
    PrefixWildcard(String),
}

impl ChannelPattern {
    /// Parses a pattern as typed by the user. Names are lowercased since
    /// channel directories are stored lowercase.
    pub fn parse(raw: &str) -> Self {
        let lowered = raw.trim().to_lowercase();
        match lowered.strip_suffix('*') {
            Some(prefix) => ChannelPattern::PrefixWildcard(prefix.to_string()),
            None => ChannelPattern::Literal(lowered),
        }
    }

    pub fn matches(&self, channel: &str) -> bool {
        match self {
            ChannelPattern::Literal(name) => name == channel,
            ChannelPattern::PrefixWildcard(prefix) => channel.starts_with(prefix.as_str()),
        }
    }

    /// The pattern as it would be typed, used for provenance and logs
    pub fn as_requested(&self) -> String {
        match self {
            ChannelPattern::Literal(name) => name.clone(),
            ChannelPattern::PrefixWildcard(prefix) => format!("{}*", prefix),
        }
    }
}

/// Counters collected while scanning, reported once at the end of a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanStats {
    pub files_scanned: usize,
    pub files_unreadable: usize,
    pub lines_read: usize,
    pub lines_skipped: usize,
    pub links_discarded: usize,
    pub unmatched_patterns: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("foo", ChannelPattern::Literal("foo".into()) ; "literal")]
    #[test_case("Bar*", ChannelPattern::PrefixWildcard("bar".into()) ; "wildcard lowercased")]
    #[test_case("*", ChannelPattern::PrefixWildcard(String::new()) ; "match all")]
    #[test_case(" xqc ", ChannelPattern::Literal("xqc".into()) ; "trimmed")]
    fn test_parse_pattern(raw: &str, expected: ChannelPattern) {
        assert_eq!(ChannelPattern::parse(raw), expected);
    }

    #[test]
    fn test_literal_matches_exact_name_only() {
        let pattern = ChannelPattern::parse("foo");
        assert!(pattern.matches("foo"));
        assert!(!pattern.matches("foobar"));
    }

    #[test]
    fn test_wildcard_matches_prefix() {
        let pattern = ChannelPattern::parse("bar*");
        assert!(pattern.matches("barry"));
        assert!(pattern.matches("bar"));
        assert!(!pattern.matches("baz"));
    }

    #[test]
    fn test_inner_star_is_literal() {
        let pattern = ChannelPattern::parse("b*r");
        assert_eq!(pattern, ChannelPattern::Literal("b*r".into()));
        assert!(!pattern.matches("bar"));
    }

    #[test]
    fn test_as_requested_round_trips() {
        assert_eq!(ChannelPattern::parse("bar*").as_requested(), "bar*");
        assert_eq!(ChannelPattern::parse("foo").as_requested(), "foo");
    }
}
