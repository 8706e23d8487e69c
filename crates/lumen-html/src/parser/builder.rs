use lumen_common::text::{collapse_whitespace, is_markup_whitespace, normalize_newlines};
use lumen_common::warning::warn_once;
use lumen_dom::{DomTree, ElementData, ElementType, NodeId, NodeKind, StyleEntry};

use super::scanner::Scanner;
use crate::diagnostics::{Diagnostic, Severity};
use crate::entity;

/// Result of a parse: the tree, every diagnostic in source order, and how
/// many characters were consumed.
#[derive(Debug, Clone)]
pub struct ParseOutput {
    /// The element tree. Top-level elements are children of the document node.
    pub tree: DomTree,
    /// Recoverable anomalies in the order they were found.
    pub diagnostics: Vec<Diagnostic>,
    /// Number of source characters consumed. Equals the input length.
    pub consumed: usize,
}

impl ParseOutput {
    /// The first top-level element of the given type.
    #[must_use]
    pub fn first_root(&self, element_type: ElementType) -> Option<NodeId> {
        self.tree.first_root(element_type)
    }

    /// Diagnostics with [`Severity::Error`].
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_error())
    }

    /// Diagnostics with [`Severity::Warning`].
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_warning())
    }
}

/// A tag as scanned, before it becomes a node.
struct ScannedTag {
    name: String,
    attributes: Vec<(String, String)>,
    self_closing: bool,
}

/// Single-pass markup parser.
///
/// Scans the source once, building the tree as tags are recognized. Nothing
/// aborts the parse: every anomaly becomes a [`Diagnostic`] and the parser
/// carries on with a best-effort tree.
pub struct HtmlParser {
    scanner: Scanner,
    tree: DomTree,

    /// Open elements, innermost last. Empty means the document node is the
    /// insertion point.
    stack: Vec<NodeId>,

    /// Characters seen since the last tag, entities already resolved.
    pending_text: String,
    /// Where `pending_text` started, for diagnostics.
    pending_start: usize,

    /// Nesting count of open `<pre>` elements. Never negative.
    pre_depth: usize,

    /// Set while inside `<script>` or `<style>`: the body is kept verbatim
    /// and only the matching end tag is recognized.
    raw_text_element: Option<ElementType>,

    /// Whether the last structural event opened or closed a block. A text
    /// run following one drops its leading space.
    after_block_boundary: bool,

    /// Whether an `<html>` element has been opened.
    seen_html: bool,

    diagnostics: Vec<Diagnostic>,
}

impl HtmlParser {
    /// Create a parser over `source`.
    #[must_use]
    pub fn new(source: &str) -> Self {
        Self {
            scanner: Scanner::new(source),
            tree: DomTree::new(),
            stack: Vec::new(),
            pending_text: String::new(),
            pending_start: 0,
            pre_depth: 0,
            raw_text_element: None,
            after_block_boundary: true,
            seen_html: false,
            diagnostics: Vec::new(),
        }
    }

    /// Parse and return just the tree.
    #[must_use]
    pub fn run(self) -> DomTree {
        self.run_with_diagnostics().tree
    }

    /// Parse and return the tree together with diagnostics.
    #[must_use]
    pub fn run_with_diagnostics(mut self) -> ParseOutput {
        while let Some(c) = self.scanner.next_char() {
            match c {
                '<' => self.handle_less_than(),
                '&' if self.raw_text_element.is_none() => self.handle_ampersand(),
                c => self.push_text(c),
            }
        }
        self.flush_text();
        self.finish();

        ParseOutput {
            consumed: self.scanner.position(),
            tree: self.tree,
            diagnostics: self.diagnostics,
        }
    }

    fn record(&mut self, severity: Severity, position: usize, message: String) {
        let _printed = warn_once("HTML Parser", &message);
        self.diagnostics.push(Diagnostic {
            severity,
            message,
            position,
        });
    }

    fn error(&mut self, position: usize, message: String) {
        self.record(Severity::Error, position, message);
    }

    fn warning(&mut self, position: usize, message: String) {
        self.record(Severity::Warning, position, message);
    }

    fn current_parent(&self) -> NodeId {
        self.stack.last().copied().unwrap_or(NodeId::ROOT)
    }

    fn push_text(&mut self, c: char) {
        if self.pending_text.is_empty() {
            self.pending_start = self.scanner.position().saturating_sub(1);
        }
        self.pending_text.push(c);
    }

    // ===== character references =====

    fn handle_ampersand(&mut self) {
        let start = self.scanner.position() - 1;
        match entity::resolve(self.scanner.rest()) {
            Some((c, consumed)) => {
                if self.pending_text.is_empty() {
                    self.pending_start = start;
                }
                self.pending_text.push(c);
                self.scanner.advance(consumed);
            }
            None => {
                if entity::looks_like_reference(self.scanner.rest()) {
                    let len = self.scanner.find(";").unwrap_or(0);
                    let name: String = self.scanner.rest()[..len].iter().collect();
                    self.warning(start, format!("unknown entity '&{name};' kept as text"));
                }
                self.push_text('&');
            }
        }
    }

    /// Resolve references inside an attribute value. Unknown ones stay
    /// literal.
    fn decode_attribute_value(&mut self, raw: &str, position: usize) -> String {
        if !raw.contains('&') {
            return raw.to_string();
        }
        let chars: Vec<char> = raw.chars().collect();
        let mut out = String::with_capacity(raw.len());
        let mut i = 0;
        while i < chars.len() {
            if chars[i] == '&' {
                if let Some((c, consumed)) = entity::resolve(&chars[i + 1..]) {
                    out.push(c);
                    i += consumed + 1;
                    continue;
                }
                if entity::looks_like_reference(&chars[i + 1..]) {
                    self.warning(position, "unknown entity in attribute value".to_string());
                }
            }
            out.push(chars[i]);
            i += 1;
        }
        out
    }

    // ===== markup =====

    /// Called with the cursor just past a `<`.
    fn handle_less_than(&mut self) {
        let start = self.scanner.position() - 1;

        if let Some(raw) = self.raw_text_element {
            let closing = format!("/{}", raw.tag_name());
            let terminated = matches!(
                self.scanner.peek_at(closing.len()),
                None | Some('>' | ' ' | '\t' | '\n' | '\r')
            );
            if self.scanner.starts_with(&closing) && terminated {
                self.handle_end_tag(start);
            } else {
                self.push_text('<');
            }
            return;
        }

        if self.scanner.starts_with("!--") {
            self.handle_comment(start);
        } else if self.scanner.starts_with("!") {
            self.skip_declaration(start, ">", "declaration");
        } else if self.scanner.starts_with("?") {
            self.skip_declaration(start, "?>", "processing instruction");
        } else if self.scanner.starts_with("/") {
            self.handle_end_tag(start);
        } else if self.scanner.peek().is_some_and(|c| c.is_ascii_alphabetic()) {
            self.handle_start_tag(start);
        } else {
            self.warning(start, "'<' does not start a tag; kept as text".to_string());
            self.push_text('<');
        }
    }

    fn handle_comment(&mut self, start: usize) {
        self.scanner.advance(3);
        if let Some(len) = self.scanner.find("-->") {
            let text = self.scanner.take(len);
            self.scanner.advance(3);
            self.flush_text();
            let comment = self.tree.create_comment(&text);
            self.attach(comment, start);
        } else {
            let rest = self.scanner.rest().len();
            self.scanner.advance(rest);
            self.error(start, "unterminated comment".to_string());
        }
    }

    /// `<!DOCTYPE ...>` and `<?xml ...?>` carry nothing we use.
    fn skip_declaration(&mut self, start: usize, terminator: &str, what: &str) {
        if let Some(len) = self.scanner.find(terminator) {
            self.scanner.advance(len + terminator.len());
        } else {
            let rest = self.scanner.rest().len();
            self.scanner.advance(rest);
            self.error(start, format!("unterminated {what}"));
        }
    }

    /// Scan `name attr="v" ... >` or `/>`. On failure the cursor is left
    /// wherever scanning stopped and `None` is returned.
    fn scan_tag(&mut self) -> Option<ScannedTag> {
        let name = self
            .scanner
            .take_while(|c| c.is_ascii_alphanumeric() || c == '-' || c == ':' || c == '_');
        let mut attributes = Vec::new();
        loop {
            self.scanner.skip_whitespace();
            match self.scanner.peek()? {
                '>' => {
                    self.scanner.advance(1);
                    return Some(ScannedTag {
                        name,
                        attributes,
                        self_closing: false,
                    });
                }
                '/' if self.scanner.peek_at(1) == Some('>') => {
                    self.scanner.advance(2);
                    return Some(ScannedTag {
                        name,
                        attributes,
                        self_closing: true,
                    });
                }
                '<' => return None,
                _ => {}
            }

            let attr_start = self.scanner.position();
            let attr_name = self.scanner.take_while(|c| {
                !is_markup_whitespace(c) && !matches!(c, '=' | '>' | '/' | '<' | '"' | '\'')
            });
            if attr_name.is_empty() {
                let stray = self.scanner.next_char()?;
                self.warning(
                    attr_start,
                    format!("unexpected '{stray}' in <{name}> tag ignored"),
                );
                continue;
            }

            self.scanner.skip_whitespace();
            let value = if self.scanner.peek() == Some('=') {
                self.scanner.advance(1);
                self.scanner.skip_whitespace();
                match self.scanner.peek()? {
                    quote @ ('"' | '\'') => {
                        self.scanner.advance(1);
                        let len = self.scanner.find(&quote.to_string())?;
                        let raw = self.scanner.take(len);
                        self.scanner.advance(1);
                        raw
                    }
                    _ => self
                        .scanner
                        .take_while(|c| !is_markup_whitespace(c) && c != '>' && c != '<'),
                }
            } else {
                String::new()
            };
            let value = self.decode_attribute_value(&value, attr_start);
            attributes.push((attr_name.to_ascii_lowercase(), value));
        }
    }

    fn handle_start_tag(&mut self, start: usize) {
        let Some(tag) = self.scan_tag() else {
            self.error(start, "unterminated tag; '<' kept as text".to_string());
            self.scanner.rewind_to(start + 1);
            self.push_text('<');
            return;
        };

        let Some(element_type) = ElementType::from_tag_name(&tag.name) else {
            self.error(start, format!("unknown tag <{}> skipped", tag.name));
            return;
        };

        self.flush_text();

        if element_type == ElementType::Html {
            if self.seen_html {
                self.error(start, "more than one <html> element".to_string());
            }
            self.seen_html = true;
        }

        let mut data = ElementData::new(element_type);
        for (name, value) in &tag.attributes {
            data.set_attribute(name, value);
        }
        if let Some(style) = data.attribute("style").map(str::to_string) {
            if element_type.is_styleable() {
                let (entry, problems) = StyleEntry::parse_with_errors(&style);
                for problem in problems {
                    self.warning(start, format!("style on <{element_type}>: {problem}"));
                }
                data.style = Some(entry);
            } else {
                self.warning(start, format!("style attribute on <{element_type}> ignored"));
            }
        }

        let node = self.tree.alloc(NodeKind::Element(data));
        self.attach(node, start);

        let leaf = tag.self_closing
            || element_type.is_always_auto_closed()
            || !element_type.is_container();
        if !leaf {
            self.stack.push(node);
            if element_type == ElementType::Preformatted {
                self.pre_depth += 1;
            }
            if matches!(element_type, ElementType::Script | ElementType::Style) {
                self.raw_text_element = Some(element_type);
            }
        }
        self.after_block_boundary = element_type.is_block_structuring();
    }

    fn handle_end_tag(&mut self, start: usize) {
        self.scanner.advance(1);
        let name = self
            .scanner
            .take_while(|c| c.is_ascii_alphanumeric() || c == '-' || c == ':' || c == '_');
        self.scanner.skip_whitespace();
        if self.scanner.peek() == Some('>') {
            self.scanner.advance(1);
        } else {
            self.error(start, format!("malformed end tag </{name}; '<' kept as text"));
            self.scanner.rewind_to(start + 1);
            self.push_text('<');
            return;
        }

        let Some(element_type) = ElementType::from_tag_name(&name) else {
            self.warning(start, format!("unknown end tag </{name}> ignored"));
            return;
        };
        if element_type.is_always_auto_closed() {
            return;
        }

        self.flush_text();
        self.raw_text_element = None;

        if element_type == ElementType::Preformatted {
            self.pre_depth = self.pre_depth.saturating_sub(1);
        }

        let Some(open) = self.stack.pop() else {
            self.warning(start, format!("end tag </{name}> has no open element"));
            return;
        };
        let open_type = self.tree.element_type(open);
        if open_type != Some(element_type) {
            let open_name = open_type.map_or("?", ElementType::tag_name);
            self.warning(
                start,
                format!("end tag </{name}> does not match open <{open_name}>"),
            );
            if open_type == Some(ElementType::Preformatted) {
                self.pre_depth = self.pre_depth.saturating_sub(1);
            }
        }
        self.after_block_boundary = element_type.is_block_structuring();
    }

    fn attach(&mut self, node: NodeId, position: usize) {
        let parent = self.current_parent();
        // An empty stack with an <html> root means the root is already closed.
        let trailing = parent == NodeId::ROOT
            && self.tree.first_root(ElementType::Html).is_some()
            && !matches!(
                self.tree.element_type(node),
                Some(ElementType::Html | ElementType::Comment)
            );
        if trailing {
            self.warning(position, "content after the root element".to_string());
        }
        if let Err(e) = self.tree.append_child(parent, node) {
            self.error(position, format!("could not insert node: {e}"));
        }
    }

    // ===== text =====

    /// Turn the pending characters into nodes.
    ///
    /// Inside `<script>`/`<style>` the text is kept verbatim. Inside `<pre>`
    /// line breaks become Break elements. Everywhere else whitespace is
    /// collapsed.
    fn flush_text(&mut self) {
        if self.pending_text.is_empty() {
            return;
        }
        let raw = std::mem::take(&mut self.pending_text);
        let start = self.pending_start;

        if self.raw_text_element.is_some() {
            let node = self.tree.create_text(&raw);
            self.attach(node, start);
            return;
        }

        if self.pre_depth > 0 {
            let normalized = normalize_newlines(&raw);
            for (i, line) in normalized.split('\n').enumerate() {
                if i > 0 {
                    let br = self.tree.create_element(ElementType::Break);
                    self.attach(br, start);
                }
                if !line.is_empty() {
                    let node = self.tree.create_text(line);
                    self.attach(node, start);
                }
            }
            self.after_block_boundary = normalized.ends_with('\n');
            return;
        }

        let collapsed = collapse_whitespace(&raw);
        let text = if self.after_block_boundary {
            collapsed.trim_start_matches(' ')
        } else {
            collapsed.as_str()
        };
        if text.is_empty() {
            return;
        }
        let node = self.tree.create_text(text);
        self.attach(node, start);
        self.after_block_boundary = false;
    }

    fn finish(&mut self) {
        let end = self.scanner.position();
        while let Some(open) = self.stack.pop() {
            let name = self.tree.element_type(open).map_or("?", ElementType::tag_name);
            self.warning(end, format!("<{name}> not closed at end of input"));
        }
        self.pre_depth = 0;
        self.raw_text_element = None;
    }
}

/// Parse `source` into a tree with diagnostics.
#[must_use]
pub fn parse(source: &str) -> ParseOutput {
    HtmlParser::new(source).run_with_diagnostics()
}
