//! Scrolling and link hit-testing over real layouts.

use lumen_css::{Document, FontCollection, FormattedElement, ScrollView};
use lumen_html::parse;

fn layout(source: &str, viewport: (f32, f32)) -> Document {
    let mut doc = Document::from_tree(parse(source).tree);
    doc.layout_default(viewport, &FontCollection::approximate())
        .unwrap();
    doc
}

#[test]
fn test_hit_test_finds_link() {
    let doc = layout(
        "<p>go <a href=\"https://example.test/next\">here</a> now</p>",
        (400.0, 300.0),
    );
    let view = ScrollView::new(400.0, 300.0);
    let link = doc
        .content()
        .iter()
        .find_map(FormattedElement::as_rectangle)
        .unwrap();
    let (x, y) = (
        (link.rect.left + link.rect.right) / 2.0,
        (link.rect.top + link.rect.bottom) / 2.0,
    );
    assert_eq!(
        view.hit_test(doc.content(), x, y),
        Some("https://example.test/next")
    );
    // "go " is plain text.
    assert_eq!(view.hit_test(doc.content(), 1.0, y), None);
}

#[test]
fn test_hit_test_follows_scroll_offset() {
    let links: String = (0..40)
        .map(|i| format!("<p><a href=\"#{i}\">link {i}</a></p>"))
        .collect();
    let doc = layout(&links, (300.0, 100.0));
    let mut view = ScrollView::new(300.0, 100.0);
    view.update(&doc);

    let target = doc
        .content()
        .iter()
        .filter_map(FormattedElement::as_rectangle)
        .find(|r| r.link.as_deref() == Some("#20"))
        .unwrap();
    view.scroll_to(0.0, target.rect.top);
    assert_eq!(view.offset().1, target.rect.top);
    assert_eq!(view.hit_test(doc.content(), 2.0, 2.0), Some("#20"));
}

#[test]
fn test_visible_elements_and_scrollbar() {
    let paragraphs: String = (0..50).map(|i| format!("<p>line {i}</p>")).collect();
    let doc = layout(&paragraphs, (300.0, 200.0));
    let mut view = ScrollView::new(300.0, 200.0);
    view.update(&doc);

    let (_, height) = doc.occupied_layout_size();
    assert!(height > 200.0);
    let bar = view.vertical_scrollbar().unwrap();
    assert!(bar.start.abs() < f32::EPSILON);
    assert!(bar.end < 1.0);
    assert_eq!(view.horizontal_scrollbar(), None);

    let visible = view.visible(doc.content()).count();
    assert!(visible > 0 && visible < doc.content().len());

    view.scroll_by(0.0, f32::MAX);
    assert_eq!(view.offset().1, height - 200.0);
    assert!(view.visible(doc.content()).count() > 0);
}
