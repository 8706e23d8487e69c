//! Element types, attributes and per-element data.

use serde::Serialize;
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::style::StyleEntry;

/// The closed set of node types the viewer understands.
///
/// `Text` and `Comment` are pseudo-elements: they never appear as tags in
/// markup, and [`ElementType::from_tag_name`] refuses them.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr, Serialize,
)]
#[strum(ascii_case_insensitive)]
pub enum ElementType {
    /// A run of character data.
    #[strum(serialize = "#text")]
    Text,
    /// `<br>`, and every preserved line break inside `<pre>`.
    #[strum(serialize = "br")]
    Break,
    /// `<html>`
    #[strum(serialize = "html")]
    Html,
    /// `<head>`
    #[strum(serialize = "head")]
    Head,
    /// `<title>`
    #[strum(serialize = "title")]
    Title,
    /// `<style>`, holding the document's class rules as text.
    #[strum(serialize = "style")]
    Style,
    /// `<script>`, never laid out.
    #[strum(serialize = "script")]
    Script,
    /// `<body>`
    #[strum(serialize = "body")]
    Body,
    /// `<div>`
    #[strum(serialize = "div")]
    Division,
    /// `<span>`
    #[strum(serialize = "span")]
    Span,
    /// `<p>`
    #[strum(serialize = "p")]
    Paragraph,
    /// `<h1>`
    #[strum(serialize = "h1")]
    H1,
    /// `<h2>`
    #[strum(serialize = "h2")]
    H2,
    /// `<h3>`
    #[strum(serialize = "h3")]
    H3,
    /// `<h4>`
    #[strum(serialize = "h4")]
    H4,
    /// `<h5>`
    #[strum(serialize = "h5")]
    H5,
    /// `<h6>`
    #[strum(serialize = "h6")]
    H6,
    /// `<em>`
    #[strum(serialize = "em")]
    Emphasis,
    /// `<strong>`
    #[strum(serialize = "strong")]
    Strong,
    /// `<i>`
    #[strum(serialize = "i")]
    Italic,
    /// `<b>`
    #[strum(serialize = "b")]
    Bold,
    /// `<u>`
    #[strum(serialize = "u")]
    Underline,
    /// `<sup>`
    #[strum(serialize = "sup")]
    Superscript,
    /// `<sub>`
    #[strum(serialize = "sub")]
    Subscript,
    /// `<ul>`
    #[strum(serialize = "ul")]
    UnorderedList,
    /// `<ol>`
    #[strum(serialize = "ol")]
    OrderedList,
    /// `<li>`
    #[strum(serialize = "li")]
    ListItem,
    /// `<img>`
    #[strum(serialize = "img")]
    Image,
    /// `<a>`
    #[strum(serialize = "a")]
    Anchor,
    /// `<pre>`
    #[strum(serialize = "pre")]
    Preformatted,
    /// `<code>`
    #[strum(serialize = "code")]
    Code,
    /// `<!-- ... -->`
    #[strum(serialize = "#comment")]
    Comment,
}

impl ElementType {
    /// Look up a tag name from markup (ASCII case-insensitive).
    ///
    /// Pseudo-element names (`#text`, `#comment`) are not tag names.
    #[must_use]
    pub fn from_tag_name(name: &str) -> Option<Self> {
        if name.starts_with('#') {
            return None;
        }
        name.parse().ok()
    }

    /// The tag name as written in markup (`"div"`, `"h1"`, `"#text"`).
    #[must_use]
    pub fn tag_name(self) -> &'static str {
        self.into()
    }

    /// Whether nodes of this type own children.
    #[must_use]
    pub const fn is_container(self) -> bool {
        !matches!(
            self,
            Self::Text | Self::Break | Self::Image | Self::Comment
        )
    }

    /// Whether nodes of this type may carry an inline style entry.
    #[must_use]
    pub const fn is_styleable(self) -> bool {
        !matches!(
            self,
            Self::Text
                | Self::Break
                | Self::Comment
                | Self::Html
                | Self::Head
                | Self::Title
                | Self::Style
                | Self::Script
        )
    }

    /// Tags that never have content and close themselves even without `/>`.
    #[must_use]
    pub const fn is_always_auto_closed(self) -> bool {
        matches!(self, Self::Break | Self::Image)
    }

    /// Elements that start and end on their own line.
    ///
    /// The parser drops a leading space after any of these, and the layout
    /// engine uses the same set to decide where vertical gaps go.
    #[must_use]
    pub const fn is_block_structuring(self) -> bool {
        matches!(
            self,
            Self::Html
                | Self::Head
                | Self::Title
                | Self::Style
                | Self::Script
                | Self::Body
                | Self::Division
                | Self::Paragraph
                | Self::H1
                | Self::H2
                | Self::H3
                | Self::H4
                | Self::H5
                | Self::H6
                | Self::UnorderedList
                | Self::OrderedList
                | Self::ListItem
                | Self::Preformatted
                | Self::Break
        )
    }

    /// Heading level 1-6, or `None` for non-headings.
    #[must_use]
    pub const fn heading_level(self) -> Option<u8> {
        match self {
            Self::H1 => Some(1),
            Self::H2 => Some(2),
            Self::H3 => Some(3),
            Self::H4 => Some(4),
            Self::H5 => Some(5),
            Self::H6 => Some(6),
            _ => None,
        }
    }

    /// Whether this is `<ul>` or `<ol>`.
    #[must_use]
    pub const fn is_list(self) -> bool {
        matches!(self, Self::UnorderedList | Self::OrderedList)
    }

    /// Content that is never laid out (metadata and scripts).
    #[must_use]
    pub const fn is_metadata(self) -> bool {
        matches!(
            self,
            Self::Head | Self::Title | Self::Style | Self::Script | Self::Comment
        )
    }
}

/// A single name/value attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    /// Attribute name, lowercased.
    pub name: String,
    /// Attribute value with entities resolved.
    pub value: String,
}

/// Attributes of an element in document order.
///
/// Setting an existing name replaces its value in place (last write wins)
/// without moving it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Attributes(Vec<Attribute>);

impl Attributes {
    /// Create an empty attribute list.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Set `name` to `value`, replacing an earlier value for the same name.
    pub fn set(&mut self, name: &str, value: &str) {
        let name = name.to_ascii_lowercase();
        if let Some(existing) = self.0.iter_mut().find(|a| a.name == name) {
            existing.value = value.to_string();
        } else {
            self.0.push(Attribute {
                name,
                value: value.to_string(),
            });
        }
    }

    /// Value for `name` (ASCII case-insensitive).
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
            .map(|a| a.value.as_str())
    }

    /// Whether `name` is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Iterate in document order.
    pub fn iter(&self) -> impl Iterator<Item = &Attribute> {
        self.0.iter()
    }

    /// Number of distinct attribute names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no attributes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Element-specific data.
#[derive(Debug, Clone, Serialize)]
pub struct ElementData {
    /// Which element this is.
    pub element_type: ElementType,
    /// The `id` attribute, if any.
    pub id: Option<String>,
    /// The whitespace-separated `class` attribute, split.
    pub classes: Vec<String>,
    /// All attributes, including `id`, `class` and `style` in raw form.
    pub attributes: Attributes,
    /// Parsed inline `style` attribute. Only styleable elements carry one.
    pub style: Option<StyleEntry>,
}

impl ElementData {
    /// Create element data with no attributes.
    #[must_use]
    pub const fn new(element_type: ElementType) -> Self {
        Self {
            element_type,
            id: None,
            classes: Vec::new(),
            attributes: Attributes::new(),
            style: None,
        }
    }

    /// Set an attribute, keeping `id` and `classes` in sync.
    pub fn set_attribute(&mut self, name: &str, value: &str) {
        self.attributes.set(name, value);
        if name.eq_ignore_ascii_case("id") {
            self.id = Some(value.to_string());
        } else if name.eq_ignore_ascii_case("class") {
            self.classes = value.split_whitespace().map(str::to_string).collect();
        }
    }

    /// Value of attribute `name`, if present.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name)
    }

    /// Whether `class` contains `name`.
    #[must_use]
    pub fn has_class(&self, name: &str) -> bool {
        self.classes.iter().any(|c| c == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_names_round_trip_through_lookup() {
        assert_eq!(ElementType::from_tag_name("DIV"), Some(ElementType::Division));
        assert_eq!(ElementType::from_tag_name("h3"), Some(ElementType::H3));
        assert_eq!(ElementType::from_tag_name("#text"), None);
        assert_eq!(ElementType::from_tag_name("blink"), None);
        assert_eq!(ElementType::Paragraph.tag_name(), "p");
    }

    #[test]
    fn attributes_keep_first_position_on_overwrite() {
        let mut attrs = Attributes::new();
        attrs.set("a", "1");
        attrs.set("b", "2");
        attrs.set("A", "3");
        let names: Vec<_> = attrs.iter().map(|a| (a.name.as_str(), a.value.as_str())).collect();
        assert_eq!(names, vec![("a", "3"), ("b", "2")]);
    }

    #[test]
    fn class_attribute_is_split() {
        let mut data = ElementData::new(ElementType::Span);
        data.set_attribute("class", "  note   warn ");
        assert_eq!(data.classes, vec!["note", "warn"]);
        assert!(data.has_class("warn"));
    }
}
