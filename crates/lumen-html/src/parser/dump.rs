//! Human-readable tree dumps.

use std::fmt::Write as _;

use lumen_dom::{DomTree, NodeId, NodeKind};

/// Render the subtree at `id` as indented text, one node per line.
///
/// Elements print as `<tag attr="value">`, text runs quoted with spaces shown
/// as `·`, comments as `<!-- ... -->`.
#[must_use]
pub fn dump_tree(tree: &DomTree, id: NodeId) -> String {
    let mut out = String::new();
    dump_into(tree, id, 0, &mut out);
    out
}

fn dump_into(tree: &DomTree, id: NodeId, indent: usize, out: &mut String) {
    let prefix = "  ".repeat(indent);
    let Some(node) = tree.get(id) else {
        return;
    };
    let _ = match &node.kind {
        NodeKind::Document => writeln!(out, "{prefix}Document"),
        NodeKind::Element(data) => {
            let attrs: Vec<String> = data
                .attributes
                .iter()
                .map(|a| {
                    if a.value.is_empty() {
                        a.name.clone()
                    } else {
                        format!("{}=\"{}\"", a.name, a.value)
                    }
                })
                .collect();
            if attrs.is_empty() {
                writeln!(out, "{prefix}<{}>", data.element_type)
            } else {
                writeln!(out, "{prefix}<{} {}>", data.element_type, attrs.join(" "))
            }
        }
        NodeKind::Text(text) => {
            let display = text.replace('\n', "\\n").replace(' ', "\u{00B7}");
            writeln!(out, "{prefix}\"{display}\"")
        }
        NodeKind::Comment(text) => writeln!(out, "{prefix}<!-- {text} -->"),
    };
    for &child in tree.children(id) {
        dump_into(tree, child, indent + 1, out);
    }
}

/// Print [`dump_tree`] to stdout.
pub fn print_tree(tree: &DomTree, id: NodeId) {
    print!("{}", dump_tree(tree, id));
}
