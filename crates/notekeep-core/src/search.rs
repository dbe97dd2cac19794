//! Record filters shared by every store backend.

/// Which notes a count or list operation considers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum NoteFilter {
    /// Every note.
    #[default]
    All,
    /// Notes whose title or content contains the query, ignoring case.
    ///
    /// The query is a literal substring: no tokenization, no ranking, and no
    /// pattern syntax. `"cat"` matches both "Concatenate" and "Cats".
    Contains(String),
}

impl NoteFilter {
    /// Build a search filter from a raw query string.
    pub fn contains(query: impl Into<String>) -> Self {
        NoteFilter::Contains(query.into())
    }

    /// The search query, if this is a search filter.
    pub fn query(&self) -> Option<&str> {
        match self {
            NoteFilter::All => None,
            NoteFilter::Contains(q) => Some(q),
        }
    }

    /// Evaluate the filter against a note's fields.
    pub fn matches(&self, title: &str, content: &str) -> bool {
        match self {
            NoteFilter::All => true,
            NoteFilter::Contains(query) => {
                let needle = query.to_lowercase();
                title.to_lowercase().contains(&needle) || content.to_lowercase().contains(&needle)
            }
        }
    }
}

/// Escape LIKE/ILIKE wildcard characters (`%`, `_`, `\`) in user input.
pub fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// ILIKE pattern matching `query` anywhere in a column.
pub fn contains_pattern(query: &str) -> String {
    format!("%{}%", escape_like(query))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_matches_everything() {
        assert!(NoteFilter::All.matches("", ""));
        assert!(NoteFilter::default().matches("anything", "at all"));
    }

    #[test]
    fn test_contains_is_substring_not_word() {
        let f = NoteFilter::contains("cat");
        assert!(f.matches("Concatenation", "unrelated"));
        assert!(f.matches("Pets", "I have a cat"));
        assert!(!f.matches("Dogs", "I have a dog"));
    }

    #[test]
    fn test_contains_ignores_case() {
        let f = NoteFilter::contains("CaT");
        assert!(f.matches("CATS", ""));
        assert!(f.matches("", "bobcat"));
    }

    #[test]
    fn test_contains_treats_pattern_characters_literally() {
        let f = NoteFilter::contains("a.c");
        assert!(f.matches("a.c", ""));
        assert!(!f.matches("abc", ""));

        let f = NoteFilter::contains("50%");
        assert!(f.matches("50% off", ""));
        assert!(!f.matches("500 off", ""));
    }

    #[test]
    fn test_query_accessor() {
        assert_eq!(NoteFilter::All.query(), None);
        assert_eq!(NoteFilter::contains("x").query(), Some("x"));
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("snake_case"), "snake\\_case");
        assert_eq!(escape_like("back\\slash"), "back\\\\slash");
        assert_eq!(escape_like("plain"), "plain");
    }

    #[test]
    fn test_contains_pattern() {
        assert_eq!(contains_pattern("cat"), "%cat%");
        assert_eq!(contains_pattern("a_b"), "%a\\_b%");
    }
}
