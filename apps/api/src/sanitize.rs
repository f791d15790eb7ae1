//! Text sanitization for LLM input and cache fingerprinting.
//!
//! PDF extraction leaves zero-width spaces, null bytes, and other control
//! characters in resume text. Those confuse the model and make otherwise
//! identical inputs hash differently, so everything funnels through
//! `clean_for_ai` before prompting or fingerprinting.

/// Normalizes arbitrary text into single-spaced printable ASCII.
///
/// Characters outside `0x20..=0x7E` (including newlines and tabs) become
/// spaces, then consecutive whitespace collapses to one space and the result
/// is trimmed. Total over any input; idempotent.
pub fn clean_for_ai(text: &str) -> String {
    let flattened: String = text
        .chars()
        .map(|c| if ('\x20'..='\x7e').contains(&c) { c } else { ' ' })
        .collect();

    flattened.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Returns at most `max` bytes of `s`, cut at a char boundary.
///
/// Sanitized text is pure ASCII so the boundary walk never triggers there,
/// but callers also truncate raw user input.
pub fn bounded_prefix(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_yields_empty_string() {
        assert_eq!(clean_for_ai(""), "");
    }

    #[test]
    fn test_whitespace_only_yields_empty_string() {
        assert_eq!(clean_for_ai(" \n\t  \r\n "), "");
    }

    #[test]
    fn test_control_characters_become_spaces() {
        assert_eq!(clean_for_ai("foo\x00bar\x07baz"), "foo bar baz");
    }

    #[test]
    fn test_newlines_and_tabs_flatten() {
        assert_eq!(clean_for_ai("line one\nline two\tend"), "line one line two end");
    }

    #[test]
    fn test_non_ascii_replaced() {
        // \u{a0} (non-breaking space) and zero-width space are common PDF artifacts
        assert_eq!(clean_for_ai("Python\u{a0}SQL\u{200b}Rust"), "Python SQL Rust");
    }

    #[test]
    fn test_consecutive_whitespace_collapses() {
        assert_eq!(clean_for_ai("a    b  \n\n  c"), "a b c");
    }

    #[test]
    fn test_leading_trailing_whitespace_trimmed() {
        assert_eq!(clean_for_ai("  hello  "), "hello");
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        let inputs = [
            "Experienced backend engineer,\nPython, SQL\t4 years",
            "\x00\x01garbage\u{fffd}text",
            "   already clean   ",
            "",
        ];
        for input in inputs {
            let once = clean_for_ai(input);
            let twice = clean_for_ai(&once);
            assert_eq!(once, twice, "sanitize not idempotent for {input:?}");
        }
    }

    #[test]
    fn test_bounded_prefix_shorter_than_limit() {
        assert_eq!(bounded_prefix("abc", 10), "abc");
    }

    #[test]
    fn test_bounded_prefix_cuts_at_limit() {
        assert_eq!(bounded_prefix("abcdef", 3), "abc");
    }

    #[test]
    fn test_bounded_prefix_respects_char_boundary() {
        // 'é' is two bytes; cutting at 1 must back off to 0
        let s = "é";
        assert_eq!(bounded_prefix(s, 1), "");
    }
}
