//! Property tests for the parser, entity resolver and whitespace helpers.

use lumen_common::text::collapse_whitespace;
use lumen_dom::ElementType;
use lumen_html::{entity, parse};
use quickcheck_macros::quickcheck;

/// Container tags that nest freely.
const NESTABLE: &[&str] = &["div", "span", "p", "b", "i", "em", "strong", "u", "code", "pre"];

#[quickcheck]
fn parser_is_total(input: String) -> bool {
    let out = parse(&input);
    out.consumed == input.chars().count()
}

#[quickcheck]
fn parser_is_total_on_markup_soup(pieces: Vec<u8>) -> bool {
    const SOUP: &[&str] = &[
        "<", ">", "</", "/>", "<!--", "-->", "&", ";", "&amp;", "&#", "<p>", "</p>", "<pre>",
        "</pre>", "<script>", "</script>", "=", "\"", "'", " ", "\n", "x", "<br", "<?", "<!",
    ];
    let input: String = pieces
        .iter()
        .map(|&b| SOUP[usize::from(b) % SOUP.len()])
        .collect();
    let out = parse(&input);
    out.consumed == input.chars().count()
}

#[quickcheck]
fn balanced_markup_has_no_warnings_and_matching_depth(choices: Vec<u8>) -> bool {
    let tags: Vec<&str> = choices
        .iter()
        .take(24)
        .map(|&b| NESTABLE[usize::from(b) % NESTABLE.len()])
        .collect();
    let mut input = String::new();
    for tag in &tags {
        input.push_str(&format!("<{tag}>"));
    }
    input.push('x');
    for tag in tags.iter().rev() {
        input.push_str(&format!("</{tag}>"));
    }

    let out = parse(&input);
    let depth = out
        .tree
        .roots()
        .iter()
        .map(|&r| out.tree.element_height(r))
        .max()
        .unwrap_or(0);
    out.diagnostics.is_empty() && depth == tags.len()
}

#[quickcheck]
fn whitespace_collapse_is_idempotent(text: String) -> bool {
    let once = collapse_whitespace(&text);
    collapse_whitespace(&once) == once
}

#[quickcheck]
fn pre_keeps_every_line_break(lines: Vec<String>) -> bool {
    let lines: Vec<String> = lines
        .into_iter()
        .map(|l| l.chars().filter(|c| c.is_ascii_alphanumeric() || *c == ' ').collect())
        .collect();
    if lines.is_empty() {
        return true;
    }
    let input = format!("<pre>{}</pre>", lines.join("\n"));
    let out = parse(&input);
    let Some(pre) = out.first_root(ElementType::Preformatted) else {
        return false;
    };
    let breaks = out
        .tree
        .children(pre)
        .iter()
        .filter(|&&c| out.tree.element_type(c) == Some(ElementType::Break))
        .count();
    let texts: Vec<&str> = out
        .tree
        .children(pre)
        .iter()
        .filter_map(|&c| out.tree.as_text(c))
        .collect();
    let expected: Vec<&str> = lines.iter().map(String::as_str).filter(|l| !l.is_empty()).collect();
    breaks == lines.len() - 1 && texts == expected
}

#[test]
fn every_named_entity_resolves_with_exact_span() {
    for (name, expected) in entity::named_entities() {
        let source: Vec<char> = format!("{name};tail").chars().collect();
        assert_eq!(
            entity::resolve(&source),
            Some((expected, name.chars().count() + 1)),
            "&{name};"
        );
    }
}

#[test]
fn named_entities_resolve_in_documents() {
    for (name, expected) in entity::named_entities() {
        let out = parse(&format!("<p>&{name};</p>"));
        let p = out.first_root(ElementType::Paragraph).unwrap();
        let text = out.tree.text_content(p);
        assert_eq!(text, expected.to_string(), "&{name};");
    }
}
