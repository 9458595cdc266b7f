use regex::Regex;
use std::sync::LazyLock;

/// Optional scheme, dotted host, optional path up to the next whitespace.
/// Bare `imgur.com/ID` mentions are common in chat, so the scheme is optional.
static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\b(?:https?://)?(?:[a-z0-9](?:[a-z0-9-]*[a-z0-9])?\.)+[a-z]{2,}(?:/[^\s<>"]*)?"#)
        .expect("URL pattern is valid")
});

const TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?', ')', ']', '}', '\'', '"'];

/// Yields every URL-shaped substring of `text`, left to right.
pub fn extract_links(text: &str) -> impl Iterator<Item = &str> + '_ {
    URL_PATTERN
        .find_iter(text)
        .map(|m| m.as_str().trim_end_matches(TRAILING_PUNCTUATION))
        .filter(|candidate| !candidate.is_empty())
}
