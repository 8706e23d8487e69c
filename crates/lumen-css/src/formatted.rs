//! Formatted elements: the positioned primitives layout produces.
//!
//! The list is ordered back to front. A block's background rectangle is
//! pushed when the block opens, so it precedes the text drawn on top of it;
//! link rectangles are pushed after the primitives they cover.

use std::sync::Arc;

use lumen_common::LoadedImage;
use lumen_dom::{Color, Edges, NodeId};
use serde::Serialize;

use crate::font::FontRef;

/// Axis-aligned rectangle in layout space, before scrolling.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Rect {
    /// Left edge.
    pub left: f32,
    /// Top edge.
    pub top: f32,
    /// Right edge.
    pub right: f32,
    /// Bottom edge.
    pub bottom: f32,
}

impl Rect {
    /// A rectangle from its four edges.
    #[must_use]
    pub const fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// A rectangle from its origin and size.
    #[must_use]
    pub fn from_origin_size(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self::new(left, top, left + width, top + height)
    }

    /// `right - left`
    #[must_use]
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    /// `bottom - top`
    #[must_use]
    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    /// Point containment; the right and bottom edges are exclusive.
    #[must_use]
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.left && x < self.right && y >= self.top && y < self.bottom
    }

    /// Whether the two rectangles overlap or touch.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        self.left <= other.right
            && other.left <= self.right
            && self.top <= other.bottom
            && other.top <= self.bottom
    }

    /// The rectangle moved by `(dx, dy)`.
    #[must_use]
    pub fn translated(self, dx: f32, dy: f32) -> Self {
        Self::new(self.left + dx, self.top + dy, self.right + dx, self.bottom + dy)
    }

    /// The rectangle shrunk by per-side insets.
    #[must_use]
    pub fn inset(self, edges: Edges<f32>) -> Self {
        Self::new(
            self.left + edges.left,
            self.top + edges.top,
            self.right - edges.right,
            self.bottom - edges.bottom,
        )
    }
}

/// A run of text drawn with one font, size and color.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextSection {
    /// Text node the run came from.
    pub node: NodeId,
    /// Where the run is drawn.
    pub rect: Rect,
    /// Line the run was placed on, identified by the line's top edge.
    pub line_top: f32,
    /// The characters, whitespace already collapsed.
    pub text: String,
    /// Face used to measure and draw.
    pub font: FontRef,
    /// Font size in pixels.
    pub font_size: f32,
    /// Text color.
    pub color: Color,
    /// Multiplied into the color's alpha when painting.
    pub opacity: f32,
    /// Draw a line under the run.
    pub underline: bool,
    /// Draw a line through the run.
    pub strikethrough: bool,
    /// Inline background behind the run.
    pub back_color: Option<Color>,
}

/// A decoded image, or an empty slot if decoding failed.
#[derive(Debug, Clone, Serialize)]
pub struct ImageSection {
    /// The `img` element.
    pub node: NodeId,
    /// Where the image is drawn.
    pub rect: Rect,
    /// Line the image was placed on.
    pub line_top: f32,
    /// Pixels, if the source loaded.
    #[serde(skip)]
    pub image: Option<Arc<LoadedImage>>,
    /// Render size after `width`/`height` attributes.
    pub logical_size: (f32, f32),
    /// Decoded size, `(0, 0)` for a placeholder.
    pub physical_size: (u32, u32),
    /// Multiplied into the image's alpha when painting.
    pub opacity: f32,
}

impl PartialEq for ImageSection {
    fn eq(&self, other: &Self) -> bool {
        self.node == other.node
            && self.rect == other.rect
            && self.line_top == other.line_top
            && self.logical_size == other.logical_size
            && self.physical_size == other.physical_size
            && self.opacity == other.opacity
    }
}

/// Background and border of a block, or a link's hit area.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RectangleSection {
    /// Element the rectangle belongs to.
    pub node: NodeId,
    /// Border box of the element.
    pub rect: Rect,
    /// Line the rectangle sits on; `None` for block rectangles, which span
    /// whole lines and never move with a line.
    pub line_top: Option<f32>,
    /// Fill, if any.
    pub back_color: Option<Color>,
    /// Border color.
    pub border_color: Color,
    /// Border width per side, in pixels.
    pub border_width: Edges<f32>,
    /// Multiplied into both colors' alpha when painting.
    pub opacity: f32,
    /// Target of an anchor; set only on link rectangles.
    pub link: Option<String>,
}

impl RectangleSection {
    /// A link rectangle is invisible and only used for hit-testing.
    #[must_use]
    pub const fn is_link(&self) -> bool {
        self.link.is_some()
    }

    /// Whether anything would be drawn.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        let border = self.border_width.vertical() + self.border_width.horizontal() > 0.0
            && self.border_color.a > 0;
        let fill = self.back_color.is_some_and(|c| c.a > 0);
        self.opacity > 0.0 && (border || fill)
    }
}

/// One positioned primitive.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum FormattedElement {
    /// A text run.
    TextSection(TextSection),
    /// An image.
    Image(ImageSection),
    /// A background/border or link rectangle.
    Rectangle(RectangleSection),
}

impl FormattedElement {
    /// The element this primitive came from.
    #[must_use]
    pub const fn node(&self) -> NodeId {
        match self {
            Self::TextSection(t) => t.node,
            Self::Image(i) => i.node,
            Self::Rectangle(r) => r.node,
        }
    }

    /// Render rectangle.
    #[must_use]
    pub const fn rect(&self) -> &Rect {
        match self {
            Self::TextSection(t) => &t.rect,
            Self::Image(i) => &i.rect,
            Self::Rectangle(r) => &r.rect,
        }
    }

    pub(crate) const fn rect_mut(&mut self) -> &mut Rect {
        match self {
            Self::TextSection(t) => &mut t.rect,
            Self::Image(i) => &mut i.rect,
            Self::Rectangle(r) => &mut r.rect,
        }
    }

    /// The line this primitive was placed on, `None` for block rectangles.
    #[must_use]
    pub const fn line_top(&self) -> Option<f32> {
        match self {
            Self::TextSection(t) => Some(t.line_top),
            Self::Image(i) => Some(i.line_top),
            Self::Rectangle(r) => r.line_top,
        }
    }

    /// The text section payload, if this is one.
    #[must_use]
    pub const fn as_text(&self) -> Option<&TextSection> {
        match self {
            Self::TextSection(t) => Some(t),
            _ => None,
        }
    }

    /// The image payload, if this is one.
    #[must_use]
    pub const fn as_image(&self) -> Option<&ImageSection> {
        match self {
            Self::Image(i) => Some(i),
            _ => None,
        }
    }

    /// The rectangle payload, if this is one.
    #[must_use]
    pub const fn as_rectangle(&self) -> Option<&RectangleSection> {
        match self {
            Self::Rectangle(r) => Some(r),
            _ => None,
        }
    }

    /// Target URL if this is a link rectangle.
    #[must_use]
    pub fn link(&self) -> Option<&str> {
        self.as_rectangle().and_then(|r| r.link.as_deref())
    }
}
