//! Case-insensitive whole-word search used by leak detection and vote parsing.

/// Byte offset (into the lowercased haystack) of the first whole-word,
/// case-insensitive occurrence of `needle`.
///
/// A match must not be preceded or followed by an alphanumeric character,
/// so "Agent 1" does not match inside "Agent 12" and "pear" does not match
/// inside "appearance".
pub fn find_whole_word(haystack: &str, needle: &str) -> Option<usize> {
    let needle = needle.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }
    let haystack = haystack.to_lowercase();

    let mut from = 0;
    while let Some(pos) = haystack[from..].find(&needle) {
        let start = from + pos;
        let end = start + needle.len();
        let before_ok = haystack[..start]
            .chars()
            .next_back()
            .is_none_or(|c| !c.is_alphanumeric());
        let after_ok = haystack[end..]
            .chars()
            .next()
            .is_none_or(|c| !c.is_alphanumeric());
        if before_ok && after_ok {
            return Some(start);
        }
        // Advance past the first char of this match
        from = start + haystack[start..].chars().next().map_or(1, char::len_utf8);
    }
    None
}

pub fn contains_whole_word(haystack: &str, needle: &str) -> bool {
    find_whole_word(haystack, needle).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_word_matches() {
        assert!(contains_whole_word("I had a PEAR today.", "pear"));
        assert!(contains_whole_word("pear", "Pear"));
        assert!(contains_whole_word("(ice cream)", "ice cream"));
    }

    #[test]
    fn test_partial_words_do_not_match() {
        assert!(!contains_whole_word("Its appearance is green", "pear"));
        assert!(!contains_whole_word("pears are nice", "pear"));
        assert!(!contains_whole_word("I suspect Agent 12", "Agent 1"));
        assert!(!contains_whole_word("anything", ""));
    }

    #[test]
    fn test_finds_later_occurrence_after_partial_one() {
        assert_eq!(find_whole_word("Agent 12 and Agent 1", "agent 1"), Some(13));
    }
}
