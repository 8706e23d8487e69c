//! List nesting data and item markers.

use serde::Serialize;

/// Unordered bullet shapes, cycled by nesting depth.
pub const BULLETS: [char; 3] = ['\u{2022}', '\u{25E6}', '\u{25AA}'];

/// One active `ul` or `ol`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ListData {
    /// `ol` rather than `ul`.
    pub ordered: bool,
    /// 1-based number of the current item; 0 before the first item.
    pub index: u32,
    /// The list's indent has been applied to the layout area.
    pub inflated: bool,
}

impl ListData {
    /// A list with no items yet.
    #[must_use]
    pub const fn new(ordered: bool) -> Self {
        Self {
            ordered,
            index: 0,
            inflated: false,
        }
    }

    /// Marker for the current item of a list nested `depth` levels deep
    /// (1 = outermost).
    ///
    /// Unordered lists cycle disc, circle and square. Ordered lists
    /// alternate decimal and lower-alpha numbering.
    #[must_use]
    pub fn marker(&self, depth: usize) -> String {
        let level = depth.saturating_sub(1);
        if self.ordered {
            if level % 2 == 0 {
                format!("{}.", self.index)
            } else {
                format!("{}.", lower_alpha(self.index))
            }
        } else {
            BULLETS[level % BULLETS.len()].to_string()
        }
    }
}

/// [§ 7.2 Alphabetic counter styles](https://www.w3.org/TR/css-counter-styles-3/#alphabetic)
///
/// a, b, ..., z, aa, ab, ...; zero has no representation and falls back to "0".
fn lower_alpha(mut n: u32) -> String {
    if n == 0 {
        return "0".to_string();
    }
    let mut letters = Vec::new();
    while n > 0 {
        n -= 1;
        letters.push(char::from(b'a' + u8::try_from(n % 26).unwrap_or(0)));
        n /= 26;
    }
    letters.iter().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bullets_cycle_by_depth() {
        let list = ListData::new(false);
        assert_eq!(list.marker(1), "\u{2022}");
        assert_eq!(list.marker(2), "\u{25E6}");
        assert_eq!(list.marker(3), "\u{25AA}");
        assert_eq!(list.marker(4), "\u{2022}");
    }

    #[test]
    fn ordered_numbering_alternates() {
        let mut list = ListData::new(true);
        list.index = 3;
        assert_eq!(list.marker(1), "3.");
        assert_eq!(list.marker(2), "c.");
        assert_eq!(list.marker(3), "3.");
    }

    #[test]
    fn alpha_counter() {
        assert_eq!(lower_alpha(1), "a");
        assert_eq!(lower_alpha(26), "z");
        assert_eq!(lower_alpha(27), "aa");
        assert_eq!(lower_alpha(52), "az");
        assert_eq!(lower_alpha(53), "ba");
    }
}
