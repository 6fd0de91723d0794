//! Batch text normalization
//!
//! Strips everything the entity service would trip over: links, user
//! mentions, the repost marker, and any non-alphabetic run. Patterns apply
//! in that fixed order, each match replaced with a single space.
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref URL: Regex = Regex::new(r"https?://[-a-zA-Z0-9@:%_\+.~#?&/=]+").unwrap();
    static ref MENTION: Regex = Regex::new(r"@[a-zA-Z0-9_-]+").unwrap();
    static ref REPOST_MARKER: Regex = Regex::new(r"(?i)\bRT\b").unwrap();
    static ref NON_ALPHA: Regex = Regex::new(r"[^a-zA-Z]+").unwrap();
}

/// Join the batch with single spaces and scrub it down to bare words.
pub fn scrub(texts: &[String]) -> String {
    let mut text = texts.join(" ");
    for pattern in [&*URL, &*MENTION, &*REPOST_MARKER, &*NON_ALPHA] {
        text = pattern.replace_all(&text, " ").into_owned();
    }
    text.trim().to_string()
}
