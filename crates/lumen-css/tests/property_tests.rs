//! Property-based tests for wrapping, the occupied size and the cascade.

use lumen_css::{Document, FontCollection, FormattedElement, StyleSheet};
use lumen_dom::Color;
use lumen_html::parse;
use quickcheck::TestResult;
use quickcheck_macros::quickcheck;

const GLYPH: f32 = 9.6;

fn layout(source: &str, width: f32) -> Document {
    let mut doc = Document::from_tree(parse(source).tree);
    doc.layout_default((width, 600.0), &FontCollection::approximate())
        .unwrap();
    doc
}

/// Words of 1 to 12 letters, one per seed byte.
fn words_from(seeds: &[u8]) -> Vec<String> {
    seeds
        .iter()
        .map(|&s| {
            let letter = char::from(b'a' + s % 26);
            letter.to_string().repeat(usize::from(s % 12) + 1)
        })
        .collect()
}

#[quickcheck]
fn wrapped_lines_stay_inside_the_viewport(seeds: Vec<u8>, columns: u8) -> TestResult {
    if seeds.is_empty() {
        return TestResult::discard();
    }
    let width = f32::from(columns % 40 + 4) * GLYPH;
    let words = words_from(&seeds);
    let doc = layout(&format!("<p>{}</p>", words.join(" ")), width);

    for text in doc.content().iter().filter_map(FormattedElement::as_text) {
        if text.rect.left < 0.0 {
            return TestResult::failed();
        }
        let lone_token = !text.text.trim().contains(' ');
        if text.rect.right > width + 0.01 && !lone_token {
            return TestResult::failed();
        }
    }
    TestResult::passed()
}

#[quickcheck]
fn wrapping_keeps_every_word_in_order(seeds: Vec<u8>, columns: u8) -> bool {
    let width = f32::from(columns % 40 + 4) * GLYPH;
    let words = words_from(&seeds);
    let doc = layout(&format!("<p>{}</p>", words.join(" ")), width);

    let laid_out: Vec<String> = doc
        .content()
        .iter()
        .filter_map(FormattedElement::as_text)
        .flat_map(|t| t.text.split_whitespace().map(str::to_string).collect::<Vec<_>>())
        .collect();
    laid_out == words
}

#[quickcheck]
fn lines_never_overlap(seeds: Vec<u8>, columns: u8) -> bool {
    let width = f32::from(columns % 40 + 4) * GLYPH;
    let words = words_from(&seeds);
    let doc = layout(&format!("<p>{}</p>", words.join(" ")), width);

    let tops: Vec<f32> = doc
        .content()
        .iter()
        .filter_map(FormattedElement::as_text)
        .map(|t| t.rect.top)
        .collect();
    tops.windows(2).all(|w| w[1] >= w[0])
}

#[quickcheck]
fn occupied_height_grows_with_content(paragraphs: Vec<u8>, extra: u8) -> bool {
    let body: String = paragraphs
        .iter()
        .map(|&p| format!("<p>{}</p>", words_from(&[p, p / 2, p / 3]).join(" ")))
        .collect();
    let longer = format!("{body}<p>{}</p>", words_from(&[extra]).join(" "));

    let (w1, h1) = layout(&body, 200.0).occupied_layout_size();
    let (w2, h2) = layout(&longer, 200.0).occupied_layout_size();
    h2 >= h1 && w2 >= w1
}

#[quickcheck]
fn relayout_gives_identical_output(seeds: Vec<u8>, columns: u8) -> bool {
    let width = f32::from(columns % 40 + 4) * GLYPH;
    let source = format!("<ul><li>{}</li></ul>", words_from(&seeds).join(" <b>x</b> "));
    let mut doc = layout(&source, width);
    let first = doc.content().to_vec();
    doc.layout_default((width, 600.0), &FontCollection::approximate())
        .unwrap();
    doc.content() == first.as_slice()
}

#[quickcheck]
fn inline_style_overrides_rules(r: u8, g: u8, b: u8) -> bool {
    let source = format!(
        "<style>p.x {{ color: red }} p {{ color: green }}</style>\
         <p class=\"x\" style=\"color: rgb({r}, {g}, {b})\">t</p>"
    );
    let tree = parse(&source).tree;
    let sheet = StyleSheet::from_tree(&tree);
    let Some(p) = tree.find_first(tree.root(), lumen_dom::ElementType::Paragraph) else {
        return false;
    };
    sheet.computed_for(&tree, p).fore_color() == Some(Color::rgb(r, g, b))
}
