//! Geogif Guard: publish-text screening
//!
//! A maintained blocklist of disallowed words, checked against the status
//! text right before publishing. The effective list is configurable per
//! deployment: `deny` adds entries, `allow` removes them. Removing a
//! default entry is an explicit, intentional override of that entry; the
//! check itself always runs.
use tracing::debug;

/// Words that block a publish out of the box. Deployments extend or trim
/// this through configuration.
const DEFAULT_BLOCKLIST: [&str; 12] = [
    "fuck", "shit", "cunt", "bitch", "bastard", "asshole", "dick", "whore", "slut", "piss",
    "wank", "twat",
];

/// Case-insensitive substring blocklist.
#[derive(Debug, Clone)]
pub struct Blocklist {
    words: Vec<String>,
}

impl Blocklist {
    /// An empty list that blocks nothing.
    pub fn empty() -> Self {
        Self { words: Vec::new() }
    }

    /// The default list.
    pub fn new() -> Self {
        Self {
            words: DEFAULT_BLOCKLIST.iter().map(|w| w.to_string()).collect(),
        }
    }

    /// Add a word to the effective list.
    pub fn deny(&mut self, word: impl Into<String>) {
        let word = word.into().to_lowercase();
        if !word.is_empty() && !self.words.contains(&word) {
            self.words.push(word);
        }
    }

    /// Remove a word from the effective list for this deployment.
    pub fn allow(&mut self, word: &str) {
        let word = word.to_lowercase();
        self.words.retain(|w| *w != word);
    }

    /// First blocked word found in `text`, if any.
    pub fn screen(&self, text: &str) -> Option<String> {
        let lower = text.to_lowercase();
        let hit = self.words.iter().find(|w| lower.contains(w.as_str()));
        if let Some(word) = hit {
            debug!(word = %word, "blocklist hit");
        }
        hit.cloned()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Default for Blocklist {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocks_listed_word() {
        let list = Blocklist::new();
        assert_eq!(list.screen("what the fuck: you are here."), Some("fuck".into()));
    }

    #[test]
    fn test_match_is_case_insensitive() {
        let list = Blocklist::new();
        assert!(list.screen("SHIT happens").is_some());
    }

    #[test]
    fn test_clean_text_passes() {
        let list = Blocklist::new();
        assert_eq!(list.screen("Paris: you are here."), None);
    }

    #[test]
    fn test_allow_overrides_default_entry() {
        let mut list = Blocklist::new();
        list.allow("dick");
        // Explicitly removed for this run: Moby-Dick country is fine.
        assert_eq!(list.screen("Dickinson: you are here."), None);
    }

    #[test]
    fn test_deny_extends_list() {
        let mut list = Blocklist::new();
        list.deny("voldemort");
        assert_eq!(
            list.screen("Voldemort: you are here."),
            Some("voldemort".into())
        );
    }

    #[test]
    fn test_deny_deduplicates() {
        let mut list = Blocklist::new();
        let before = list.len();
        list.deny("fuck");
        assert_eq!(list.len(), before);
    }
}
