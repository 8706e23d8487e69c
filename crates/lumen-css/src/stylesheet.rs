//! Global style rules from `<style>` blocks, and per-element resolution.
//!
//! Only three selector shapes exist: `tag`, `.class` and `tag.class`, plus
//! comma-separated lists of them. Anything else is reported and skipped.
//! There is no specificity: resolution orders entries as tag rules, then
//! class rules, then the element's inline entry, with document order
//! breaking ties, and later entries override earlier ones field by field.

use lumen_common::warning::warn_once;
use lumen_dom::{DomTree, ElementType, NodeId, StyleEntry};

/// What a rule matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// `p`
    Tag(ElementType),
    /// `.note`
    Class(String),
    /// `p.note`
    TagClass(ElementType, String),
}

impl Selector {
    /// Parse one compound selector.
    ///
    /// # Errors
    ///
    /// Returns a description of why the selector is unsupported.
    pub fn parse(text: &str) -> Result<Self, String> {
        let text = text.trim();
        if text.is_empty() {
            return Err("empty selector".to_string());
        }
        if text
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '>' | '+' | '~' | '#' | '[' | ':' | '*'))
        {
            return Err(format!("unsupported selector '{text}'"));
        }

        let (tag, class) = match text.split_once('.') {
            Some((tag, class)) => (tag, Some(class)),
            None => (text, None),
        };
        if class.is_some_and(|c| c.is_empty() || c.contains('.')) {
            return Err(format!("unsupported selector '{text}'"));
        }

        let element_type = if tag.is_empty() {
            None
        } else {
            let ty = ElementType::from_tag_name(&tag.to_ascii_lowercase())
                .ok_or_else(|| format!("unknown element '{tag}' in selector"))?;
            Some(ty)
        };

        match (element_type, class) {
            (Some(ty), None) => Ok(Self::Tag(ty)),
            (None, Some(class)) => Ok(Self::Class(class.to_string())),
            (Some(ty), Some(class)) => Ok(Self::TagClass(ty, class.to_string())),
            (None, None) => Err("empty selector".to_string()),
        }
    }

    /// Whether an element of `element_type` with `classes` matches.
    #[must_use]
    pub fn matches(&self, element_type: ElementType, classes: &[String]) -> bool {
        match self {
            Self::Tag(ty) => *ty == element_type,
            Self::Class(class) => classes.iter().any(|c| c == class),
            Self::TagClass(ty, class) => {
                *ty == element_type && classes.iter().any(|c| c == class)
            }
        }
    }

    /// Tag-only selectors sort before class selectors.
    #[must_use]
    pub const fn is_tag_only(&self) -> bool {
        matches!(self, Self::Tag(_))
    }
}

/// A selector and the declarations it applies.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleRule {
    /// What the rule matches.
    pub selector: Selector,
    /// The declarations.
    pub entry: StyleEntry,
}

/// Rules from every `<style>` block, in document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleSheet {
    rules: Vec<StyleRule>,
    warnings: Vec<String>,
}

impl StyleSheet {
    /// An empty sheet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse style sheet text. Problems are collected in
    /// [`StyleSheet::warnings`] and echoed once each to stderr.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut sheet = Self::new();
        sheet.add_source(text);
        sheet
    }

    /// Collect the text of every `style` element in the tree.
    #[must_use]
    pub fn from_tree(tree: &DomTree) -> Self {
        let mut sheet = Self::new();
        for id in tree.descendants(tree.root()) {
            if tree.element_type(id) == Some(ElementType::Style) {
                sheet.add_source(&tree.text_content(id));
            }
        }
        sheet
    }

    /// Append the rules in `text`.
    pub fn add_source(&mut self, text: &str) {
        let text = strip_comments(text);
        let mut rest = text.as_str();

        while let Some(open) = rest.find('{') {
            let prelude = rest[..open].trim();
            let Some(close) = matching_brace(&rest[open..]) else {
                self.warn("unterminated rule block".to_string());
                return;
            };
            let body = &rest[open + 1..open + close];
            rest = &rest[open + close + 1..];

            if prelude.starts_with('@') {
                self.warn(format!("at-rule '{prelude}' is not supported"));
                continue;
            }
            self.add_rule(prelude, body);
        }

        if !rest.trim().is_empty() {
            self.warn(format!("stray text '{}' in style sheet", rest.trim()));
        }
    }

    fn add_rule(&mut self, prelude: &str, body: &str) {
        let (entry, errors) = StyleEntry::parse_with_errors(body);
        for error in errors {
            self.warn(format!("{error} in rule '{prelude}'"));
        }
        for part in prelude.split(',') {
            match Selector::parse(part) {
                Ok(selector) => self.rules.push(StyleRule {
                    selector,
                    entry: entry.clone(),
                }),
                Err(message) => self.warn(message),
            }
        }
    }

    fn warn(&mut self, message: String) {
        let _printed = warn_once("Style Sheet", &message);
        self.warnings.push(message);
    }

    /// All rules in document order.
    #[must_use]
    pub fn rules(&self) -> &[StyleRule] {
        &self.rules
    }

    /// Problems found while parsing.
    #[must_use]
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// No rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Entries that apply to `node`, lowest priority first: matching tag
    /// rules, matching class rules, then the inline entry.
    #[must_use]
    pub fn entries_for<'a>(&'a self, tree: &'a DomTree, node: NodeId) -> Vec<&'a StyleEntry> {
        let Some(data) = tree.as_element(node) else {
            return Vec::new();
        };
        let mut entries: Vec<&StyleEntry> = Vec::new();
        let mut class_entries: Vec<&StyleEntry> = Vec::new();
        for rule in &self.rules {
            if !rule.selector.matches(data.element_type, &data.classes) {
                continue;
            }
            if rule.selector.is_tag_only() {
                entries.push(&rule.entry);
            } else {
                class_entries.push(&rule.entry);
            }
        }
        entries.append(&mut class_entries);
        if let Some(inline) = data.style.as_ref() {
            entries.push(inline);
        }
        entries
    }

    /// The merged result of [`StyleSheet::entries_for`].
    #[must_use]
    pub fn computed_for(&self, tree: &DomTree, node: NodeId) -> StyleEntry {
        let mut computed = StyleEntry::new();
        for entry in self.entries_for(tree, node) {
            computed.merge_from(entry);
        }
        computed
    }
}

/// Remove `/* ... */` comments; an unterminated comment runs to the end.
fn strip_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find("/*") {
        out.push_str(&rest[..start]);
        match rest[start + 2..].find("*/") {
            Some(end) => rest = &rest[start + 2 + end + 2..],
            None => return out,
        }
    }
    out.push_str(rest);
    out
}

/// Offset of the `}` closing the `{` at the start of `text`.
fn matching_brace(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in text.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_shapes() {
        assert_eq!(Selector::parse("p"), Ok(Selector::Tag(ElementType::Paragraph)));
        assert_eq!(
            Selector::parse(".note"),
            Ok(Selector::Class("note".to_string()))
        );
        assert_eq!(
            Selector::parse("DIV.box"),
            Ok(Selector::TagClass(ElementType::Division, "box".to_string()))
        );
        assert!(Selector::parse("div p").is_err());
        assert!(Selector::parse("#id").is_err());
        assert!(Selector::parse("blink").is_err());
        assert!(Selector::parse("p.a.b").is_err());
    }

    #[test]
    fn parses_rules_and_skips_the_rest() {
        let sheet = StyleSheet::parse(
            "/* header */ p { color: red } @media print { p { color: blue } }\n\
             h1, .x, ul li { font-weight: bold }",
        );
        assert_eq!(sheet.rules().len(), 3);
        assert_eq!(sheet.warnings().len(), 2, "{:?}", sheet.warnings());
    }

    #[test]
    fn unterminated_block_is_reported() {
        let sheet = StyleSheet::parse("p { color: red");
        assert!(sheet.is_empty());
        assert_eq!(sheet.warnings().to_vec(), vec!["unterminated rule block".to_string()]);
    }

    #[test]
    fn comment_stripping() {
        assert_eq!(strip_comments("a/* x */b/* y"), "ab");
    }
}
