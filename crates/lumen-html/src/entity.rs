//! Character reference resolution.
//!
//! [§ 13.5 Named character references](https://html.spec.whatwg.org/multipage/named-characters.html)
//!
//! Only the `;`-terminated forms are recognized. Legacy unterminated
//! references (`&amp` without `;`) are not valid XHTML and stay literal.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Longest name in [`NAMED_ENTITIES`], bounding the lookahead.
const MAX_NAME_LEN: usize = 8;

/// Longest numeric reference body (`#x10FFFF`) we bother scanning.
const MAX_NUMERIC_LEN: usize = 10;

/// Entity names (without `&` and `;`) and the code point they stand for.
static NAMED_ENTITIES: LazyLock<HashMap<&'static str, char>> = LazyLock::new(|| {
    HashMap::from([
        ("amp", '&'),
        ("lt", '<'),
        ("gt", '>'),
        ("quot", '"'),
        ("apos", '\''),
        ("nbsp", '\u{00A0}'),
        // Punctuation and symbols
        ("copy", '\u{00A9}'),   // ©
        ("reg", '\u{00AE}'),    // ®
        ("trade", '\u{2122}'),  // ™
        ("mdash", '\u{2014}'),
        ("ndash", '\u{2013}'),
        ("hellip", '\u{2026}'), // …
        ("bull", '\u{2022}'),   // •
        ("middot", '\u{00B7}'), // ·
        ("sect", '\u{00A7}'),   // §
        ("para", '\u{00B6}'),   // ¶
        ("lsquo", '\u{2018}'),
        ("rsquo", '\u{2019}'),
        ("ldquo", '\u{201C}'),
        ("rdquo", '\u{201D}'),
        ("laquo", '\u{00AB}'), // «
        ("raquo", '\u{00BB}'), // »
        ("iexcl", '\u{00A1}'),
        ("iquest", '\u{00BF}'),
        ("shy", '\u{00AD}'),
        // Currency
        ("cent", '\u{00A2}'),
        ("pound", '\u{00A3}'),
        ("euro", '\u{20AC}'),
        ("yen", '\u{00A5}'),
        ("curren", '\u{00A4}'),
        // Math
        ("times", '\u{00D7}'),
        ("divide", '\u{00F7}'),
        ("plusmn", '\u{00B1}'),
        ("minus", '\u{2212}'),
        ("ne", '\u{2260}'),
        ("le", '\u{2264}'),
        ("ge", '\u{2265}'),
        ("deg", '\u{00B0}'),
        ("micro", '\u{00B5}'),
        ("frac12", '\u{00BD}'),
        ("frac14", '\u{00BC}'),
        ("frac34", '\u{00BE}'),
        ("sup1", '\u{00B9}'),
        ("sup2", '\u{00B2}'),
        ("sup3", '\u{00B3}'),
        ("infin", '\u{221E}'),
        // Arrows
        ("larr", '\u{2190}'),
        ("rarr", '\u{2192}'),
        ("uarr", '\u{2191}'),
        ("darr", '\u{2193}'),
        ("harr", '\u{2194}'),
        // Greek
        ("alpha", '\u{03B1}'),
        ("beta", '\u{03B2}'),
        ("gamma", '\u{03B3}'),
        ("delta", '\u{03B4}'),
        ("epsilon", '\u{03B5}'),
        ("lambda", '\u{03BB}'),
        ("mu", '\u{03BC}'),
        ("pi", '\u{03C0}'),
        ("sigma", '\u{03C3}'),
        ("omega", '\u{03C9}'),
        ("Omega", '\u{03A9}'),
        // Latin-1 letters
        ("Agrave", '\u{00C0}'),
        ("Aacute", '\u{00C1}'),
        ("Acirc", '\u{00C2}'),
        ("Atilde", '\u{00C3}'),
        ("Auml", '\u{00C4}'),
        ("Aring", '\u{00C5}'),
        ("AElig", '\u{00C6}'),
        ("Ccedil", '\u{00C7}'),
        ("Egrave", '\u{00C8}'),
        ("Eacute", '\u{00C9}'),
        ("Euml", '\u{00CB}'),
        ("Iacute", '\u{00CD}'),
        ("Ntilde", '\u{00D1}'),
        ("Oacute", '\u{00D3}'),
        ("Ouml", '\u{00D6}'),
        ("Oslash", '\u{00D8}'),
        ("Uacute", '\u{00DA}'),
        ("Uuml", '\u{00DC}'),
        ("szlig", '\u{00DF}'),
        ("agrave", '\u{00E0}'),
        ("aacute", '\u{00E1}'),
        ("acirc", '\u{00E2}'),
        ("atilde", '\u{00E3}'),
        ("auml", '\u{00E4}'),
        ("aring", '\u{00E5}'),
        ("aelig", '\u{00E6}'),
        ("ccedil", '\u{00E7}'),
        ("egrave", '\u{00E8}'),
        ("eacute", '\u{00E9}'),
        ("ecirc", '\u{00EA}'),
        ("euml", '\u{00EB}'),
        ("igrave", '\u{00EC}'),
        ("iacute", '\u{00ED}'),
        ("iuml", '\u{00EF}'),
        ("ntilde", '\u{00F1}'),
        ("ograve", '\u{00F2}'),
        ("oacute", '\u{00F3}'),
        ("ocirc", '\u{00F4}'),
        ("ouml", '\u{00F6}'),
        ("oslash", '\u{00F8}'),
        ("ugrave", '\u{00F9}'),
        ("uacute", '\u{00FA}'),
        ("ucirc", '\u{00FB}'),
        ("uuml", '\u{00FC}'),
        ("yuml", '\u{00FF}'),
    ])
});

/// Resolve a character reference.
///
/// `input` starts immediately after the `&`. On success returns the code
/// point and how many characters of `input` the reference occupies,
/// including the terminating `;`. Returns `None` when no valid reference
/// starts here; the caller then treats the `&` as literal text.
///
/// # Example
/// ```ignore
/// let input: Vec<char> = "amp; rest".chars().collect();
/// assert_eq!(resolve(&input), Some(('&', 4)));
/// ```
#[must_use]
pub fn resolve(input: &[char]) -> Option<(char, usize)> {
    if input.first() == Some(&'#') {
        return resolve_numeric(input);
    }
    let name_len = input
        .iter()
        .take(MAX_NAME_LEN + 1)
        .take_while(|c| c.is_ascii_alphanumeric())
        .count();
    if name_len == 0 || input.get(name_len) != Some(&';') {
        return None;
    }
    let name: String = input[..name_len].iter().collect();
    lookup(&name).map(|c| (c, name_len + 1))
}

/// [§ 13.2.5.75 Numeric character reference state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-state)
///
/// `#68;` (decimal) or `#x44;` / `#X44;` (hexadecimal). NUL, surrogates and
/// values past U+10FFFF are rejected.
fn resolve_numeric(input: &[char]) -> Option<(char, usize)> {
    let (radix, digits_start) = match input.get(1) {
        Some('x' | 'X') => (16, 2),
        _ => (10, 1),
    };
    let digits = input
        .iter()
        .skip(digits_start)
        .take(MAX_NUMERIC_LEN)
        .take_while(|c| c.is_digit(radix))
        .count();
    let end = digits_start + digits;
    if digits == 0 || input.get(end) != Some(&';') {
        return None;
    }
    let text: String = input[digits_start..end].iter().collect();
    let value = u32::from_str_radix(&text, radix).ok()?;
    if value == 0 {
        return None;
    }
    char::from_u32(value).map(|c| (c, end + 1))
}

/// Look up a named reference by its bare name (`"amp"`).
#[must_use]
pub fn lookup(name: &str) -> Option<char> {
    NAMED_ENTITIES.get(name).copied()
}

/// Every supported name with its code point.
pub fn named_entities() -> impl Iterator<Item = (&'static str, char)> {
    NAMED_ENTITIES.iter().map(|(&name, &c)| (name, c))
}

/// Whether `input` (after a `&`) has the shape of a reference, `name;` or
/// `#digits;`, regardless of whether the name is known. Used to decide if a
/// literal `&` deserves a diagnostic.
#[must_use]
pub fn looks_like_reference(input: &[char]) -> bool {
    let body = input
        .iter()
        .take(32)
        .take_while(|c| c.is_ascii_alphanumeric() || **c == '#')
        .count();
    body > 0 && input.get(body) == Some(&';')
}
