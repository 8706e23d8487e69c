//! Tests for tree construction, traversal and the style entry model.

use lumen_dom::{
    Color, DomError, DomTree, ElementType, Length, NodeId, StyleEntry, StyleError, StyleFlags,
    Unit,
};

fn build_sample() -> (DomTree, NodeId, NodeId, NodeId) {
    let mut tree = DomTree::new();
    let html = tree.append_element(NodeId::ROOT, ElementType::Html).unwrap();
    let body = tree.append_element(html, ElementType::Body).unwrap();
    let p = tree.append_element(body, ElementType::Paragraph).unwrap();
    let _ = tree.append_text(p, "Hello ").unwrap();
    let b = tree.append_element(p, ElementType::Bold).unwrap();
    let _ = tree.append_text(b, "World").unwrap();
    (tree, html, p, b)
}

// ========== structure ==========

#[test]
fn test_append_links_siblings() {
    let (tree, _, p, b) = build_sample();
    let text = tree.first_child(p).unwrap();
    assert_eq!(tree.next_sibling(text), Some(b));
    assert_eq!(tree.prev_sibling(b), Some(text));
    assert_eq!(tree.parent(b), Some(p));
    assert_eq!(tree.preceding_siblings(b).collect::<Vec<_>>(), vec![text]);
}

#[test]
fn test_leaf_cannot_own_children() {
    let mut tree = DomTree::new();
    let br = tree.append_element(NodeId::ROOT, ElementType::Break).unwrap();
    let text = tree.create_text("x");
    assert_eq!(tree.append_child(br, text), Err(DomError::NotAContainer(br)));
}

#[test]
fn test_node_cannot_have_two_parents() {
    let mut tree = DomTree::new();
    let a = tree.append_element(NodeId::ROOT, ElementType::Division).unwrap();
    let b = tree.append_element(NodeId::ROOT, ElementType::Division).unwrap();
    let child = tree.append_element(a, ElementType::Span).unwrap();
    assert_eq!(tree.append_child(b, child), Err(DomError::AlreadyAttached(child)));
    assert!(tree.children(b).is_empty());
}

#[test]
fn test_cycles_are_rejected() {
    let mut tree = DomTree::new();
    let outer = tree.create_element(ElementType::Division);
    let inner = tree.append_element(outer, ElementType::Division).unwrap();
    assert_eq!(
        tree.append_child(inner, outer),
        Err(DomError::Cycle {
            parent: inner,
            child: outer
        })
    );
    assert_eq!(
        tree.append_child(outer, outer),
        Err(DomError::Cycle {
            parent: outer,
            child: outer
        })
    );
}

#[test]
fn test_style_only_on_styleable_elements() {
    let mut tree = DomTree::new();
    let head = tree.append_element(NodeId::ROOT, ElementType::Head).unwrap();
    let span = tree.append_element(NodeId::ROOT, ElementType::Span).unwrap();
    assert_eq!(
        tree.set_style(head, StyleEntry::new()),
        Err(DomError::NotStyleable(head))
    );
    assert!(tree.set_style(span, StyleEntry::parse("color: red")).is_ok());
    let style = tree.as_element(span).unwrap().style.as_ref().unwrap();
    assert_eq!(style.fore_color(), Some(Color::rgb(255, 0, 0)));
}

// ========== traversal ==========

#[test]
fn test_descendants_are_in_document_order() {
    let (tree, html, _, _) = build_sample();
    let types: Vec<_> = tree
        .descendants(html)
        .filter_map(|id| tree.element_type(id))
        .collect();
    assert_eq!(
        types,
        vec![
            ElementType::Html,
            ElementType::Body,
            ElementType::Paragraph,
            ElementType::Text,
            ElementType::Bold,
            ElementType::Text,
        ]
    );
}

#[test]
fn test_queries() {
    let (mut tree, html, p, b) = build_sample();
    tree.as_element_mut(b).unwrap().set_attribute("id", "shout");
    assert_eq!(tree.element_by_id("shout"), Some(b));
    assert_eq!(tree.element_by_id("missing"), None);
    assert_eq!(tree.first_root(ElementType::Html), Some(html));
    assert_eq!(tree.find_first(html, ElementType::Bold), Some(b));
    assert_eq!(tree.text_content(p), "Hello World");
    assert_eq!(tree.depth(b), 4);
    assert!(tree.is_descendant_of(b, html));
    assert!(!tree.is_descendant_of(html, b));
    assert_eq!(tree.element_height(html), 4);
}

// ========== style entries ==========

#[test]
fn test_margin_shorthand_sets_only_margin_flag() {
    let entry = StyleEntry::parse("margin: 4px 8px");
    assert_eq!(entry.flags(), StyleFlags::MARGIN);
    let m = entry.margin().unwrap();
    assert_eq!(m.top, Length::px(4.0));
    assert_eq!(m.bottom, Length::px(4.0));
    assert_eq!(m.left, Length::px(8.0));
    assert_eq!(m.right, Length::px(8.0));
    assert_eq!(m.left.unit, Unit::Pixel);
    assert_eq!(entry.padding(), None);
    assert_eq!(entry.fore_color(), None);
}

#[test]
fn test_unflagged_fields_read_as_none() {
    let entry = StyleEntry::new();
    assert!(entry.is_empty());
    assert_eq!(entry.fore_color(), None);
    assert_eq!(entry.opacity(), None);
    assert_eq!(entry.font_family(), None);
    assert_eq!(entry.bold(), None);
}

#[test]
fn test_declarations_parse() {
    let (entry, errors) = StyleEntry::parse_with_errors(
        "color: #00f; font-size: 12pt; font-weight: bold; font-style: italic; \
         opacity: 150%; text-decoration: underline line-through; border: 2px solid red",
    );
    assert!(errors.is_empty(), "{errors:?}");
    assert_eq!(entry.fore_color(), Some(Color::rgb(0, 0, 255)));
    assert_eq!(entry.font_size(), Some(Length::new(12.0, Unit::Point)));
    assert_eq!(entry.bold(), Some(true));
    assert_eq!(entry.italic(), Some(true));
    assert_eq!(entry.opacity(), Some(1.0));
    let deco = entry.text_decoration().unwrap();
    assert!(deco.underline && deco.strikethrough);
    assert_eq!(entry.border_color(), Some(Color::rgb(255, 0, 0)));
    assert_eq!(entry.border_width().unwrap().left, Length::px(2.0));
}

#[test]
fn test_bad_declarations_are_reported_and_skipped() {
    let (entry, errors) =
        StyleEntry::parse_with_errors("color: nope; float: left; padding 3px; margin: 1px");
    assert_eq!(entry.flags(), StyleFlags::MARGIN);
    assert_eq!(errors.len(), 3);
    assert!(matches!(errors[0], StyleError::InvalidValue { .. }));
    assert_eq!(errors[1], StyleError::UnknownProperty("float".to_string()));
    assert!(matches!(errors[2], StyleError::Malformed(_)));
}

#[test]
fn test_merge_only_copies_flagged_fields() {
    let mut global = StyleEntry::parse("color: red; background-color: yellow");
    let local = StyleEntry::parse("color: blue");
    global.merge_from(&local);
    assert_eq!(global.fore_color(), Some(Color::rgb(0, 0, 255)));
    assert_eq!(global.back_color(), Some(Color::rgb(255, 255, 0)));
    assert_eq!(
        global.flags(),
        StyleFlags::FORE_COLOR | StyleFlags::BACK_COLOR
    );
}

#[test]
fn test_important_suffix_is_ignored() {
    let entry = StyleEntry::parse("padding: 1px 2px 3px 4px !important");
    let p = entry.padding().unwrap();
    assert_eq!(
        (p.top.value, p.right.value, p.bottom.value, p.left.value),
        (1.0, 2.0, 3.0, 4.0)
    );
}
