//! Glob-style matching over strings.
//!
//! `*` matches any run of characters (including none), `?` matches exactly one
//! character and `\` makes the next character literal. Matching is iterative
//! with single-star backtracking, so hostile patterns cost at most
//! `O(pattern * subject)` and never recurse.

/// Returns `true` when `pattern` contains an unescaped `*` or `?`.
///
/// # Examples
///
/// ```
/// use json_lens_util::wildcard::is_pattern;
///
/// assert!(is_pattern("na*"));
/// assert!(is_pattern("n?me"));
/// assert!(!is_pattern("name"));
/// assert!(!is_pattern("a\\*b"));
/// ```
pub fn is_pattern(pattern: &str) -> bool {
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '*' | '?' => return true,
            _ => {}
        }
    }
    false
}

/// Test `subject` against a glob `pattern`.
///
/// # Examples
///
/// ```
/// use json_lens_util::wildcard::matches;
///
/// assert!(matches("*", "anything"));
/// assert!(matches("ch?ld*", "children"));
/// assert!(!matches("ch?ld", "children"));
/// assert!(matches("a\\*", "a*"));
/// assert!(!matches("a\\*", "ab"));
/// ```
pub fn matches(pattern: &str, subject: &str) -> bool {
    if pattern == "*" {
        return true;
    }
    let p: Vec<char> = pattern.chars().collect();
    let s: Vec<char> = subject.chars().collect();
    let (mut pi, mut si) = (0usize, 0usize);
    // Position of the last `*` seen and the subject index it is currently
    // assumed to absorb up to.
    let mut star: Option<(usize, usize)> = None;

    while si < s.len() {
        let step = match p.get(pi) {
            Some('*') => {
                star = Some((pi, si));
                pi += 1;
                continue;
            }
            Some('?') => Some(1),
            Some('\\') if pi + 1 < p.len() => (p[pi + 1] == s[si]).then_some(2),
            Some(&c) => (c == s[si]).then_some(1),
            None => None,
        };
        match (step, star) {
            (Some(width), _) => {
                pi += width;
                si += 1;
            }
            (None, Some((star_pi, star_si))) => {
                pi = star_pi + 1;
                si = star_si + 1;
                star = Some((star_pi, star_si + 1));
            }
            (None, None) => return false,
        }
    }
    while p.get(pi) == Some(&'*') {
        pi += 1;
    }
    pi == p.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn literal_patterns_need_exact_match() {
        assert!(matches("", ""));
        assert!(matches("abc", "abc"));
        assert!(!matches("abc", "abcd"));
        assert!(!matches("abcd", "abc"));
        assert!(!matches("", "a"));
    }

    #[test]
    fn star_matches_any_run() {
        assert!(matches("a*", "a"));
        assert!(matches("a*", "abc"));
        assert!(matches("*c", "abc"));
        assert!(matches("a*c", "abbbc"));
        assert!(matches("*b*", "abc"));
        assert!(!matches("a*d", "abc"));
        assert!(matches("**", ""));
    }

    #[test]
    fn question_mark_matches_one_char() {
        assert!(matches("a?c", "abc"));
        assert!(!matches("a?c", "ac"));
        assert!(matches("???", "日本語"));
    }

    #[test]
    fn backtracks_across_multiple_stars() {
        assert!(matches("*ab*ab", "xabyabab"));
        assert!(!matches("*ab*abz", "xabyabab"));
    }

    #[test]
    fn escape_makes_metacharacters_literal() {
        assert!(matches("\\?", "?"));
        assert!(!matches("\\?", "x"));
        assert!(matches("a\\\\", "a\\"));
        assert!(matches("end\\", "end\\"));
    }

    #[test]
    fn detects_patterns() {
        assert!(is_pattern("*"));
        assert!(is_pattern("a?"));
        assert!(!is_pattern("a\\?"));
        assert!(!is_pattern(""));
    }

    proptest! {
        #[test]
        fn star_prefix_and_suffix_match_any_containing_string(
            prefix in "[a-z]{0,6}",
            middle in "[a-z]{0,6}",
            suffix in "[a-z]{0,6}",
        ) {
            let subject = format!("{prefix}{middle}{suffix}");
            let pattern = format!("*{middle}*");
            prop_assert!(matches(&pattern, &subject));
        }

        #[test]
        fn plain_text_matches_itself(subject in "[a-z0-9 ]{0,12}") {
            prop_assert!(matches(&subject, &subject));
        }
    }
}
