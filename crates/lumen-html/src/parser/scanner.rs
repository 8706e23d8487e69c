//! Character cursor over the source buffer.

/// A read cursor that only moves forward, except when rewinding to a
/// position saved with [`Scanner::position`].
#[derive(Debug, Clone)]
pub struct Scanner {
    chars: Vec<char>,
    pos: usize,
}

impl Scanner {
    pub fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
        }
    }

    pub const fn position(&self) -> usize {
        self.pos
    }

    pub fn rewind_to(&mut self, pos: usize) {
        self.pos = pos.min(self.chars.len());
    }

    pub fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    pub fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    /// Consume and return the next character.
    pub fn next_char(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    pub fn advance(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.chars.len());
    }

    /// Everything from the cursor to the end.
    pub fn rest(&self) -> &[char] {
        &self.chars[self.pos..]
    }

    /// ASCII case-insensitive prefix test at the cursor.
    pub fn starts_with(&self, prefix: &str) -> bool {
        let mut rest = self.rest().iter();
        prefix
            .chars()
            .all(|p| rest.next().is_some_and(|c| c.eq_ignore_ascii_case(&p)))
    }

    /// Offset from the cursor of the first occurrence of `needle`.
    pub fn find(&self, needle: &str) -> Option<usize> {
        let needle: Vec<char> = needle.chars().collect();
        if needle.is_empty() {
            return Some(0);
        }
        self.rest().windows(needle.len()).position(|w| w == needle.as_slice())
    }

    /// Consume `n` characters and return them as a string.
    pub fn take(&mut self, n: usize) -> String {
        let end = (self.pos + n).min(self.chars.len());
        let s: String = self.chars[self.pos..end].iter().collect();
        self.pos = end;
        s
    }

    /// Consume characters while `pred` holds.
    pub fn take_while(&mut self, mut pred: impl FnMut(char) -> bool) -> String {
        let mut out = String::new();
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            out.push(c);
            self.pos += 1;
        }
        out
    }

    pub fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(lumen_common::text::is_markup_whitespace) {
            self.pos += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_and_rewind() {
        let mut s = Scanner::new("<!--x-->");
        assert_eq!(s.next_char(), Some('<'));
        assert_eq!(s.position(), 1);
        assert!(s.starts_with("!--"));
        assert_eq!(s.find("-->"), Some(4));
        let mark = s.position();
        assert_eq!(s.take(3), "!--");
        s.rewind_to(mark);
        assert_eq!(s.peek(), Some('!'));
    }

    #[test]
    fn case_insensitive_prefix() {
        let s = Scanner::new("/SCRIPT>");
        assert!(s.starts_with("/script"));
        assert!(!s.starts_with("/scripts"));
    }
}
