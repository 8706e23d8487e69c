//! String helpers shared by the parser and the layout engine.

/// Characters that count as whitespace in markup text: space, TAB, LF, VT,
/// FF and CR.
#[must_use]
pub const fn is_markup_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\u{0B}' | '\u{0C}' | '\r')
}

/// Characters after which a line may be broken: CR, LF, TAB, VT, space and
/// hyphen.
#[must_use]
pub const fn is_wrap_delimiter(c: char) -> bool {
    matches!(c, '\r' | '\n' | '\t' | '\u{0B}' | ' ' | '-')
}

/// Map every whitespace character to a space and collapse runs of spaces to
/// one. Applying it twice gives the same result as applying it once.
#[must_use]
pub fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_run = false;
    for c in text.chars() {
        if is_markup_whitespace(c) {
            if !in_run {
                out.push(' ');
            }
            in_run = true;
        } else {
            out.push(c);
            in_run = false;
        }
    }
    out
}

/// Turn CRLF and lone CR into LF, leaving everything else untouched.
#[must_use]
pub fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Split a whitespace-separated token list (`class="a b"`), dropping empties.
#[must_use]
pub fn split_token_list(value: &str) -> Vec<&str> {
    value.split(is_markup_whitespace).filter(|s| !s.is_empty()).collect()
}

/// Trim markup whitespace from both ends.
#[must_use]
pub fn trim_markup(text: &str) -> &str {
    text.trim_matches(is_markup_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_mixed_whitespace() {
        assert_eq!(collapse_whitespace("a \t\r\n b\u{0B}c"), "a b c");
        assert_eq!(collapse_whitespace("   "), " ");
        assert_eq!(collapse_whitespace(""), "");
    }

    #[test]
    fn newline_normalization() {
        assert_eq!(normalize_newlines("a\r\nb\rc\n"), "a\nb\nc\n");
    }

    #[test]
    fn token_lists() {
        assert_eq!(split_token_list("  one\ttwo  three "), vec!["one", "two", "three"]);
        assert!(split_token_list(" ").is_empty());
    }
}
