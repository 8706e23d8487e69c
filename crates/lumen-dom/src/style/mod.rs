//! Inline style entries: the typed form of a `style="..."` attribute.
//!
//! A [`StyleEntry`] stores every value it knows about together with a
//! [`StyleFlags`] set recording which of them were written explicitly.
//! Unflagged fields hold defaults and must never be treated as authoritative;
//! the getters return `None` for them, and [`StyleEntry::merge_from`] only
//! copies flagged fields.

mod color;
mod length;

pub use color::Color;
pub use length::{DEFAULT_FONT_SIZE_PX, Edges, Length, PIXELS_PER_POINT, Unit};

use bitflags::bitflags;
use serde::Serialize;
use thiserror::Error;

bitflags! {
    /// Which fields of a [`StyleEntry`] were set explicitly.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
    pub struct StyleFlags: u16 {
        /// `color`
        const FORE_COLOR = 1 << 0;
        /// `background-color`
        const BACK_COLOR = 1 << 1;
        /// `border-color`
        const BORDER_COLOR = 1 << 2;
        /// `opacity`
        const OPACITY = 1 << 3;
        /// `font-family`
        const FONT_FAMILY = 1 << 4;
        /// `font-size`
        const FONT_SIZE = 1 << 5;
        /// `font-weight`
        const FONT_WEIGHT = 1 << 6;
        /// `font-style`
        const FONT_STYLE = 1 << 7;
        /// `text-decoration`
        const TEXT_DECORATION = 1 << 8;
        /// `margin`
        const MARGIN = 1 << 9;
        /// `border-width`
        const BORDER_WIDTH = 1 << 10;
        /// `padding`
        const PADDING = 1 << 11;
    }
}

/// A problem with one declaration. The rest of the attribute still applies.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StyleError {
    /// A declaration without a `:` separator.
    #[error("malformed declaration '{0}'")]
    Malformed(String),
    /// A property name we do not support.
    #[error("unsupported property '{0}'")]
    UnknownProperty(String),
    /// A supported property with a value we could not parse.
    #[error("invalid value '{value}' for '{property}'")]
    InvalidValue {
        /// The property name.
        property: String,
        /// The offending value.
        value: String,
    },
}

/// Parsed inline style with explicit-presence flags.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StyleEntry {
    flags: StyleFlags,
    fore_color: Color,
    back_color: Color,
    border_color: Color,
    opacity: f32,
    font_family: String,
    font_size: Length,
    bold: bool,
    italic: bool,
    underline: bool,
    strikethrough: bool,
    margin: Edges<Length>,
    border_width: Edges<Length>,
    padding: Edges<Length>,
}

/// Text-decoration bits of a style entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TextDecoration {
    /// Draw a line under the text.
    pub underline: bool,
    /// Draw a line through the text.
    pub strikethrough: bool,
}

impl StyleEntry {
    /// An entry with nothing set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a `style` attribute, discarding per-declaration problems.
    #[must_use]
    pub fn parse(declarations: &str) -> Self {
        Self::parse_with_errors(declarations).0
    }

    /// Parse `key: value; key: value; ...`.
    ///
    /// Declarations are applied left to right, so a later declaration of the
    /// same property wins. Problems are returned alongside the entry rather
    /// than aborting it.
    #[must_use]
    pub fn parse_with_errors(declarations: &str) -> (Self, Vec<StyleError>) {
        let mut entry = Self::new();
        let mut errors = Vec::new();
        for declaration in declarations.split(';') {
            let declaration = declaration.trim();
            if declaration.is_empty() {
                continue;
            }
            let Some((property, value)) = declaration.split_once(':') else {
                errors.push(StyleError::Malformed(declaration.to_string()));
                continue;
            };
            if let Err(e) = entry.apply_declaration(property, value) {
                errors.push(e);
            }
        }
        (entry, errors)
    }

    /// Apply a single `property: value` declaration.
    ///
    /// # Errors
    ///
    /// Returns a [`StyleError`] when the property is unknown or its value
    /// cannot be parsed; the entry is left unchanged in that case.
    pub fn apply_declaration(&mut self, property: &str, value: &str) -> Result<(), StyleError> {
        let property = property.trim().to_ascii_lowercase();
        let value = value.trim();
        let value = value
            .strip_suffix("!important")
            .map_or(value, str::trim_end);
        let invalid = || StyleError::InvalidValue {
            property: property.clone(),
            value: value.to_string(),
        };

        match property.as_str() {
            "color" => self.set_fore_color(Color::parse(value).ok_or_else(invalid)?),
            "background-color" => self.set_back_color(Color::parse(value).ok_or_else(invalid)?),
            // Only the color part of the `background` shorthand is supported.
            "background" => {
                let color = value
                    .split_whitespace()
                    .find_map(Color::parse)
                    .ok_or_else(invalid)?;
                self.set_back_color(color);
            }
            "border-color" => self.set_border_color(Color::parse(value).ok_or_else(invalid)?),
            "opacity" => self.set_opacity(parse_opacity(value).ok_or_else(invalid)?),
            "font-family" => {
                if value.is_empty() {
                    return Err(invalid());
                }
                self.set_font_family(value);
            }
            "font-size" => self.set_font_size(Length::parse(value).ok_or_else(invalid)?),
            "font-weight" => self.set_bold(parse_weight(value).ok_or_else(invalid)?),
            "font-style" => self.set_italic(parse_slant(value).ok_or_else(invalid)?),
            "text-decoration" | "text-decoration-line" => {
                self.set_text_decoration(parse_decoration(value).ok_or_else(invalid)?);
            }
            "margin" => self.set_margin(parse_edges(value).ok_or_else(invalid)?),
            "border-width" => self.set_border_width(parse_edges(value).ok_or_else(invalid)?),
            "padding" => self.set_padding(parse_edges(value).ok_or_else(invalid)?),
            // `border: <width> <style> <color>` in any order.
            "border" => {
                let mut width = None;
                let mut color = None;
                for token in value.split_whitespace() {
                    if let Some(l) = Length::parse(token) {
                        width = Some(l);
                    } else if let Some(c) = Color::parse(token) {
                        color = Some(c);
                    } else if !is_border_style_keyword(token) {
                        return Err(invalid());
                    }
                }
                if width.is_none() && color.is_none() {
                    return Err(invalid());
                }
                if let Some(w) = width {
                    self.set_border_width(Edges::uniform(w));
                }
                if let Some(c) = color {
                    self.set_border_color(c);
                }
            }
            _ => return Err(StyleError::UnknownProperty(property)),
        }
        Ok(())
    }

    /// Copy every field flagged in `other` into `self`, leaving the rest.
    pub fn merge_from(&mut self, other: &Self) {
        let f = other.flags;
        if f.contains(StyleFlags::FORE_COLOR) {
            self.fore_color = other.fore_color;
        }
        if f.contains(StyleFlags::BACK_COLOR) {
            self.back_color = other.back_color;
        }
        if f.contains(StyleFlags::BORDER_COLOR) {
            self.border_color = other.border_color;
        }
        if f.contains(StyleFlags::OPACITY) {
            self.opacity = other.opacity;
        }
        if f.contains(StyleFlags::FONT_FAMILY) {
            self.font_family.clone_from(&other.font_family);
        }
        if f.contains(StyleFlags::FONT_SIZE) {
            self.font_size = other.font_size;
        }
        if f.contains(StyleFlags::FONT_WEIGHT) {
            self.bold = other.bold;
        }
        if f.contains(StyleFlags::FONT_STYLE) {
            self.italic = other.italic;
        }
        if f.contains(StyleFlags::TEXT_DECORATION) {
            self.underline = other.underline;
            self.strikethrough = other.strikethrough;
        }
        if f.contains(StyleFlags::MARGIN) {
            self.margin = other.margin;
        }
        if f.contains(StyleFlags::BORDER_WIDTH) {
            self.border_width = other.border_width;
        }
        if f.contains(StyleFlags::PADDING) {
            self.padding = other.padding;
        }
        self.flags |= f;
    }

    /// The explicit-presence flags.
    #[must_use]
    pub const fn flags(&self) -> StyleFlags {
        self.flags
    }

    /// Whether every flag in `flags` is set.
    #[must_use]
    pub const fn is_set(&self, flags: StyleFlags) -> bool {
        self.flags.contains(flags)
    }

    /// Whether nothing was set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    const fn flagged<T: Copy>(&self, flag: StyleFlags, value: T) -> Option<T> {
        if self.flags.contains(flag) { Some(value) } else { None }
    }

    /// Foreground (text) color, if set.
    #[must_use]
    pub const fn fore_color(&self) -> Option<Color> {
        self.flagged(StyleFlags::FORE_COLOR, self.fore_color)
    }

    /// Background color, if set.
    #[must_use]
    pub const fn back_color(&self) -> Option<Color> {
        self.flagged(StyleFlags::BACK_COLOR, self.back_color)
    }

    /// Border color, if set.
    #[must_use]
    pub const fn border_color(&self) -> Option<Color> {
        self.flagged(StyleFlags::BORDER_COLOR, self.border_color)
    }

    /// Opacity in 0..=1, if set.
    #[must_use]
    pub const fn opacity(&self) -> Option<f32> {
        self.flagged(StyleFlags::OPACITY, self.opacity)
    }

    /// The raw `font-family` list, if set.
    #[must_use]
    pub fn font_family(&self) -> Option<&str> {
        self.flags
            .contains(StyleFlags::FONT_FAMILY)
            .then_some(self.font_family.as_str())
    }

    /// Font size, if set.
    #[must_use]
    pub const fn font_size(&self) -> Option<Length> {
        self.flagged(StyleFlags::FONT_SIZE, self.font_size)
    }

    /// Bold weight, if the weight was set.
    #[must_use]
    pub const fn bold(&self) -> Option<bool> {
        self.flagged(StyleFlags::FONT_WEIGHT, self.bold)
    }

    /// Italic slant, if the slant was set.
    #[must_use]
    pub const fn italic(&self) -> Option<bool> {
        self.flagged(StyleFlags::FONT_STYLE, self.italic)
    }

    /// Underline/strikethrough, if text decoration was set.
    #[must_use]
    pub const fn text_decoration(&self) -> Option<TextDecoration> {
        self.flagged(
            StyleFlags::TEXT_DECORATION,
            TextDecoration {
                underline: self.underline,
                strikethrough: self.strikethrough,
            },
        )
    }

    /// Margin, if set.
    #[must_use]
    pub const fn margin(&self) -> Option<Edges<Length>> {
        self.flagged(StyleFlags::MARGIN, self.margin)
    }

    /// Border widths, if set.
    #[must_use]
    pub const fn border_width(&self) -> Option<Edges<Length>> {
        self.flagged(StyleFlags::BORDER_WIDTH, self.border_width)
    }

    /// Padding, if set.
    #[must_use]
    pub const fn padding(&self) -> Option<Edges<Length>> {
        self.flagged(StyleFlags::PADDING, self.padding)
    }

    /// Set the foreground color.
    pub fn set_fore_color(&mut self, color: Color) {
        self.fore_color = color;
        self.flags |= StyleFlags::FORE_COLOR;
    }

    /// Set the background color.
    pub fn set_back_color(&mut self, color: Color) {
        self.back_color = color;
        self.flags |= StyleFlags::BACK_COLOR;
    }

    /// Set the border color.
    pub fn set_border_color(&mut self, color: Color) {
        self.border_color = color;
        self.flags |= StyleFlags::BORDER_COLOR;
    }

    /// Set the opacity, clamped to 0..=1.
    pub fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity.clamp(0.0, 1.0);
        self.flags |= StyleFlags::OPACITY;
    }

    /// Set the font family list.
    pub fn set_font_family(&mut self, family: &str) {
        self.font_family = family.to_string();
        self.flags |= StyleFlags::FONT_FAMILY;
    }

    /// Set the font size.
    pub fn set_font_size(&mut self, size: Length) {
        self.font_size = size;
        self.flags |= StyleFlags::FONT_SIZE;
    }

    /// Set bold on or off.
    pub fn set_bold(&mut self, bold: bool) {
        self.bold = bold;
        self.flags |= StyleFlags::FONT_WEIGHT;
    }

    /// Set italic on or off.
    pub fn set_italic(&mut self, italic: bool) {
        self.italic = italic;
        self.flags |= StyleFlags::FONT_STYLE;
    }

    /// Set underline and strikethrough together.
    pub fn set_text_decoration(&mut self, decoration: TextDecoration) {
        self.underline = decoration.underline;
        self.strikethrough = decoration.strikethrough;
        self.flags |= StyleFlags::TEXT_DECORATION;
    }

    /// Set all four margins.
    pub fn set_margin(&mut self, margin: Edges<Length>) {
        self.margin = margin;
        self.flags |= StyleFlags::MARGIN;
    }

    /// Set all four border widths.
    pub fn set_border_width(&mut self, width: Edges<Length>) {
        self.border_width = width;
        self.flags |= StyleFlags::BORDER_WIDTH;
    }

    /// Set all four paddings.
    pub fn set_padding(&mut self, padding: Edges<Length>) {
        self.padding = padding;
        self.flags |= StyleFlags::PADDING;
    }
}

fn parse_opacity(value: &str) -> Option<f32> {
    let v = if let Some(pct) = value.strip_suffix('%') {
        pct.trim().parse::<f32>().ok()? / 100.0
    } else {
        value.parse::<f32>().ok()?
    };
    v.is_finite().then_some(v)
}

/// [§ 3.2 font-weight](https://www.w3.org/TR/css-fonts-4/#font-weight-prop)
///
/// Collapsed to a boolean: 600 and above counts as bold.
fn parse_weight(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "bold" | "bolder" => Some(true),
        "normal" | "lighter" => Some(false),
        number => number.parse::<u16>().ok().map(|w| w >= 600),
    }
}

/// [§ 3.3 font-style](https://www.w3.org/TR/css-fonts-4/#font-style-prop)
fn parse_slant(value: &str) -> Option<bool> {
    let lower = value.to_ascii_lowercase();
    match lower.split_whitespace().next()? {
        "italic" | "oblique" => Some(true),
        "normal" => Some(false),
        _ => None,
    }
}

fn parse_decoration(value: &str) -> Option<TextDecoration> {
    let mut decoration = TextDecoration::default();
    for word in value.split_whitespace() {
        match word.to_ascii_lowercase().as_str() {
            "underline" => decoration.underline = true,
            "line-through" => decoration.strikethrough = true,
            "none" => decoration = TextDecoration::default(),
            // Decoration style and color are not modelled.
            w if Color::parse(w).is_some() || is_border_style_keyword(w) => {}
            _ => return None,
        }
    }
    Some(decoration)
}

fn parse_edges(value: &str) -> Option<Edges<Length>> {
    let lengths: Option<Vec<Length>> = value.split_whitespace().map(Length::parse).collect();
    Edges::from_shorthand(&lengths?)
}

fn is_border_style_keyword(word: &str) -> bool {
    matches!(
        word.to_ascii_lowercase().as_str(),
        "none" | "solid" | "dashed" | "dotted" | "double" | "groove" | "ridge" | "inset" | "outset"
            | "wavy" | "hidden"
    )
}
