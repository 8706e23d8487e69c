//! Integration tests for the markup parser.

use lumen_dom::{DomTree, ElementType, NodeId, NodeKind};
use lumen_html::{ParseOutput, Severity, dump_tree, parse};

/// Helper to get the element types of a node's children
fn child_types(tree: &DomTree, id: NodeId) -> Vec<ElementType> {
    tree.children(id)
        .iter()
        .filter_map(|&c| tree.element_type(c))
        .collect()
}

/// Helper to collect the text runs directly under a node
fn child_texts(tree: &DomTree, id: NodeId) -> Vec<&str> {
    tree.children(id)
        .iter()
        .filter_map(|&c| tree.as_text(c))
        .collect()
}

fn messages(out: &ParseOutput, severity: Severity) -> Vec<String> {
    out.diagnostics
        .iter()
        .filter(|d| d.severity == severity)
        .map(|d| d.message.clone())
        .collect()
}

// ========== structure ==========

#[test]
fn test_paragraph_with_bold() {
    let out = parse("<p>Hello <b>World</b></p>");
    assert!(out.diagnostics.is_empty(), "{:?}", out.diagnostics);
    let p = out.first_root(ElementType::Paragraph).unwrap();
    assert_eq!(child_types(&out.tree, p), vec![ElementType::Text, ElementType::Bold]);
    assert_eq!(child_texts(&out.tree, p), vec!["Hello "]);
    let b = out.tree.children(p)[1];
    assert_eq!(child_texts(&out.tree, b), vec!["World"]);
}

#[test]
fn test_document_structure() {
    let out = parse(
        "<?xml version=\"1.0\"?>\n<!DOCTYPE html>\n<html>\n <head><title>T</title></head>\n \
         <body>\n  <p>x</p>\n </body>\n</html>\n",
    );
    assert!(out.diagnostics.is_empty(), "{:?}", out.diagnostics);
    let html = out.first_root(ElementType::Html).unwrap();
    assert_eq!(out.tree.roots(), &[html]);
    assert_eq!(
        child_types(&out.tree, html),
        vec![ElementType::Head, ElementType::Body]
    );
    let body = out.tree.find_first(html, ElementType::Body).unwrap();
    assert_eq!(child_types(&out.tree, body), vec![ElementType::Paragraph]);
}

#[test]
fn test_attributes_and_inline_style() {
    let out = parse(
        "<div id='main' class=\"a  b\" title=x&amp;y style=\"color: red; margin: 4px 8px\"></div>",
    );
    let div = out.first_root(ElementType::Division).unwrap();
    let data = out.tree.as_element(div).unwrap();
    assert_eq!(data.id.as_deref(), Some("main"));
    assert_eq!(data.classes, vec!["a", "b"]);
    assert_eq!(data.attribute("title"), Some("x&y"));
    let style = data.style.as_ref().unwrap();
    assert!(style.fore_color().is_some());
    assert!(style.margin().is_some());
}

#[test]
fn test_self_closing_and_always_empty_tags() {
    let out = parse("<p>a<br>b<br/>c<img src='x.png'>d</p>");
    assert!(out.diagnostics.is_empty(), "{:?}", out.diagnostics);
    let p = out.first_root(ElementType::Paragraph).unwrap();
    assert_eq!(
        child_types(&out.tree, p),
        vec![
            ElementType::Text,
            ElementType::Break,
            ElementType::Text,
            ElementType::Break,
            ElementType::Text,
            ElementType::Image,
            ElementType::Text,
        ]
    );
}

#[test]
fn test_comments_become_nodes() {
    let out = parse("<div><!-- note --></div>");
    let div = out.first_root(ElementType::Division).unwrap();
    let comment = out.tree.children(div)[0];
    assert!(matches!(
        &out.tree.get(comment).unwrap().kind,
        NodeKind::Comment(text) if text == " note "
    ));
}

// ========== whitespace ==========

#[test]
fn test_whitespace_collapses_outside_pre() {
    let out = parse("<p>\n  one\t\r\n two   three </p>");
    let p = out.first_root(ElementType::Paragraph).unwrap();
    assert_eq!(child_texts(&out.tree, p), vec!["one two three "]);
}

#[test]
fn test_leading_space_dropped_after_block() {
    let out = parse("<div><p>a</p> b <span>c</span> d</div>");
    let div = out.first_root(ElementType::Division).unwrap();
    assert_eq!(child_texts(&out.tree, div), vec!["b ", " d"]);
}

#[test]
fn test_pre_preserves_line_breaks() {
    let out = parse("<pre>a  b\r\nc\n\nd</pre>");
    let pre = out.first_root(ElementType::Preformatted).unwrap();
    assert_eq!(
        child_types(&out.tree, pre),
        vec![
            ElementType::Text,
            ElementType::Break,
            ElementType::Text,
            ElementType::Break,
            ElementType::Break,
            ElementType::Text,
        ]
    );
    assert_eq!(child_texts(&out.tree, pre), vec!["a  b", "c", "d"]);
}

#[test]
fn test_unclosed_pre_still_preserves() {
    let out = parse("<pre>x\ny");
    let pre = out.first_root(ElementType::Preformatted).unwrap();
    assert_eq!(
        child_types(&out.tree, pre),
        vec![ElementType::Text, ElementType::Break, ElementType::Text]
    );
    assert_eq!(messages(&out, Severity::Warning).len(), 1);
}

#[test]
fn test_stray_pre_close_does_not_go_negative() {
    let out = parse("<div></pre>a\nb</div><p>c\nd</p>");
    let p = out.first_root(ElementType::Paragraph).unwrap();
    assert_eq!(child_texts(&out.tree, p), vec!["c d"]);
}

// ========== raw text ==========

#[test]
fn test_script_body_is_verbatim() {
    let out = parse("<html><head><script>if (a < b && c > d) {}</script></head></html>");
    assert!(out.errors().next().is_none(), "{:?}", out.diagnostics);
    let script = out.tree.find_first(NodeId::ROOT, ElementType::Script).unwrap();
    assert_eq!(
        child_texts(&out.tree, script),
        vec!["if (a < b && c > d) {}"]
    );
}

#[test]
fn test_style_body_is_verbatim() {
    let out = parse("<style>p.note > b { color: red }</style>");
    let style = out.first_root(ElementType::Style).unwrap();
    assert_eq!(child_texts(&out.tree, style), vec!["p.note > b { color: red }"]);
}

// ========== entities ==========

#[test]
fn test_entities_in_text() {
    let out = parse("<p>&lt;tag&gt; &#68;&#x44; &copy;</p>");
    let p = out.first_root(ElementType::Paragraph).unwrap();
    assert_eq!(child_texts(&out.tree, p), vec!["<tag> DD \u{00A9}"]);
}

#[test]
fn test_unknown_entity_is_literal_with_warning() {
    let out = parse("<p>a &bogus; b & c</p>");
    let p = out.first_root(ElementType::Paragraph).unwrap();
    assert_eq!(child_texts(&out.tree, p), vec!["a &bogus; b & c"]);
    let warnings = messages(&out, Severity::Warning);
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("bogus"));
}

// ========== diagnostics ==========

#[test]
fn test_mismatched_end_tag() {
    let out = parse("<p>Oops</div>");
    let p = out.first_root(ElementType::Paragraph).unwrap();
    assert_eq!(child_texts(&out.tree, p), vec!["Oops"]);
    assert_eq!(out.warnings().count(), 1);
    assert_eq!(out.errors().count(), 0);
    assert!(out.diagnostics[0].message.contains("does not match"));
}

#[test]
fn test_unterminated_comment_is_error() {
    let out = parse("<p>a</p><!-- never closed");
    assert_eq!(messages(&out, Severity::Error), vec!["unterminated comment"]);
    assert_eq!(out.consumed, "<p>a</p><!-- never closed".chars().count());
}

#[test]
fn test_orphan_and_unknown_tags() {
    let out = parse("</b><blink>x</blink>");
    assert_eq!(out.errors().count(), 1);
    assert_eq!(out.warnings().count(), 2);
    assert_eq!(child_texts(&out.tree, NodeId::ROOT), vec!["x"]);
}

#[test]
fn test_multiple_html_roots() {
    let out = parse("<html></html><html></html>");
    assert_eq!(out.tree.roots().len(), 2);
    assert_eq!(
        messages(&out, Severity::Error),
        vec!["more than one <html> element"]
    );
}

#[test]
fn test_trailing_content_after_root() {
    let out = parse("<html><body></body></html>tail");
    assert_eq!(
        messages(&out, Severity::Warning),
        vec!["content after the root element"]
    );
}

#[test]
fn test_unterminated_tag_becomes_text() {
    let out = parse("<p>a <b class='x");
    assert_eq!(out.errors().count(), 1);
    let p = out.first_root(ElementType::Paragraph).unwrap();
    assert_eq!(child_texts(&out.tree, p), vec!["a <b class='x"]);
}

#[test]
fn test_less_than_in_text() {
    let out = parse("<p>1 < 2</p>");
    let p = out.first_root(ElementType::Paragraph).unwrap();
    assert_eq!(child_texts(&out.tree, p), vec!["1 < 2"]);
    assert_eq!(out.errors().count(), 0);
}

// ========== dumps ==========

#[test]
fn test_dump_tree() {
    let out = parse("<p class=\"x\">a b<br/></p>");
    let dump = dump_tree(&out.tree, NodeId::ROOT);
    assert_eq!(dump, "Document\n  <p class=\"x\">\n    \"a\u{00B7}b\"\n    <br>\n");
}
