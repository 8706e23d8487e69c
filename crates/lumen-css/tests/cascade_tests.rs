//! Tests for `<style>` rules and their resolution order.

use lumen_css::{Selector, StyleSheet};
use lumen_dom::{Color, DomTree, ElementType, Length, NodeId};
use lumen_html::parse;

/// Helper to parse markup and return the tree with its sheet
fn parse_with_sheet(source: &str) -> (DomTree, StyleSheet) {
    let tree = parse(source).tree;
    let sheet = StyleSheet::from_tree(&tree);
    (tree, sheet)
}

fn first(tree: &DomTree, ty: ElementType) -> NodeId {
    tree.find_first(tree.root(), ty)
        .unwrap_or_else(|| panic!("no {ty} element"))
}

// ========== rule collection ==========

#[test]
fn test_rules_from_every_style_block() {
    let (_, sheet) = parse_with_sheet(
        "<html><head><style>p { color: red }</style><style>.a, .b { font-weight: bold }</style>\
         </head><body></body></html>",
    );
    let selectors: Vec<&Selector> = sheet.rules().iter().map(|r| &r.selector).collect();
    assert_eq!(
        selectors,
        vec![
            &Selector::Tag(ElementType::Paragraph),
            &Selector::Class("a".to_string()),
            &Selector::Class("b".to_string()),
        ]
    );
    assert!(sheet.warnings().is_empty());
}

#[test]
fn test_unsupported_selectors_are_skipped() {
    let sheet = StyleSheet::parse("div > p { color: red } #main { color: blue } p { color: green }");
    assert_eq!(sheet.rules().len(), 1);
    assert_eq!(sheet.warnings().len(), 2);
}

#[test]
fn test_bad_declarations_keep_the_good_ones() {
    let sheet = StyleSheet::parse("p { color: nope; font-size: 20px }");
    assert_eq!(sheet.rules().len(), 1);
    assert_eq!(sheet.rules()[0].entry.font_size(), Some(Length::px(20.0)));
    assert_eq!(sheet.rules()[0].entry.fore_color(), None);
    assert_eq!(sheet.warnings().len(), 1);
}

// ========== resolution ==========

#[test]
fn test_class_rule_beats_tag_rule_regardless_of_order() {
    let (tree, sheet) = parse_with_sheet(
        "<style>.x { color: red } p { color: green; font-weight: bold }</style><p class=\"x\">t</p>",
    );
    let computed = sheet.computed_for(&tree, first(&tree, ElementType::Paragraph));
    assert_eq!(computed.fore_color(), Some(Color::rgb(255, 0, 0)));
    assert_eq!(computed.bold(), Some(true));
}

#[test]
fn test_later_rule_of_same_kind_wins() {
    let (tree, sheet) = parse_with_sheet(
        "<style>.x { color: red } .y { color: blue }</style><p class=\"y x\">t</p>",
    );
    let computed = sheet.computed_for(&tree, first(&tree, ElementType::Paragraph));
    assert_eq!(computed.fore_color(), Some(Color::rgb(0, 0, 255)));
}

#[test]
fn test_inline_entry_wins_field_by_field() {
    let (tree, sheet) = parse_with_sheet(
        "<style>p.note { color: red; font-size: 20px }</style>\
         <p class=\"note\" style=\"color: blue\">t</p>",
    );
    let p = first(&tree, ElementType::Paragraph);
    assert_eq!(sheet.entries_for(&tree, p).len(), 2);
    let computed = sheet.computed_for(&tree, p);
    assert_eq!(computed.fore_color(), Some(Color::rgb(0, 0, 255)));
    assert_eq!(computed.font_size(), Some(Length::px(20.0)));
}

#[test]
fn test_non_matching_rules_do_not_apply() {
    let (tree, sheet) = parse_with_sheet(
        "<style>div.x { color: red } .y { color: blue }</style><p class=\"x\">t</p>",
    );
    let p = first(&tree, ElementType::Paragraph);
    assert!(sheet.entries_for(&tree, p).is_empty());
    assert_eq!(sheet.computed_for(&tree, p).fore_color(), None);
}

#[test]
fn test_text_nodes_have_no_entries() {
    let (tree, sheet) = parse_with_sheet("<style>p { color: red }</style><p>t</p>");
    let p = first(&tree, ElementType::Paragraph);
    let text = tree.children(p)[0];
    assert!(sheet.entries_for(&tree, text).is_empty());
}
