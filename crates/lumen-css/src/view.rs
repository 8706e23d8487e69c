//! Headless scroll and hit-test glue over a laid-out document.
//!
//! Holds no widget state beyond the viewport size, the content size and a
//! scroll offset. The offset is always clamped so the viewport never
//! scrolls past the content.

use crate::document::Document;
use crate::formatted::{FormattedElement, Rect};

/// Thumb position of a scrollbar as fractions of the track, `0..=1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollbarRange {
    /// Start of the thumb.
    pub start: f32,
    /// End of the thumb.
    pub end: f32,
}

/// A viewport scrolled over a document's layout output.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollView {
    viewport: (f32, f32),
    content: (f32, f32),
    offset: (f32, f32),
}

impl ScrollView {
    /// A view of the given viewport size over empty content.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self {
            viewport: (width, height),
            content: (0.0, 0.0),
            offset: (0.0, 0.0),
        }
    }

    /// Resize the viewport, keeping the offset within range.
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.viewport = (width, height);
        self.clamp();
    }

    /// Take the content size from a document's last layout.
    pub fn update(&mut self, document: &Document) {
        let (w, h) = document.occupied_layout_size();
        self.set_content_size(w, h);
    }

    /// Set the content size, keeping the offset within range.
    pub fn set_content_size(&mut self, width: f32, height: f32) {
        self.content = (width, height);
        self.clamp();
    }

    /// Viewport size.
    #[must_use]
    pub const fn viewport(&self) -> (f32, f32) {
        self.viewport
    }

    /// Current scroll offset.
    #[must_use]
    pub const fn offset(&self) -> (f32, f32) {
        self.offset
    }

    /// Largest offset on each axis.
    #[must_use]
    pub fn max_offset(&self) -> (f32, f32) {
        (
            (self.content.0 - self.viewport.0).max(0.0),
            (self.content.1 - self.viewport.1).max(0.0),
        )
    }

    /// Scroll to an absolute offset, clamped.
    pub fn scroll_to(&mut self, x: f32, y: f32) {
        self.offset = (x, y);
        self.clamp();
    }

    /// Scroll by a delta, clamped.
    pub fn scroll_by(&mut self, dx: f32, dy: f32) {
        self.scroll_to(self.offset.0 + dx, self.offset.1 + dy);
    }

    fn clamp(&mut self) {
        let (max_x, max_y) = self.max_offset();
        let clamp = |v: f32, max: f32| if v.is_finite() { v.clamp(0.0, max) } else { 0.0 };
        self.offset = (clamp(self.offset.0, max_x), clamp(self.offset.1, max_y));
    }

    /// Vertical thumb, or `None` when the content fits.
    #[must_use]
    pub fn vertical_scrollbar(&self) -> Option<ScrollbarRange> {
        range(self.offset.1, self.viewport.1, self.content.1)
    }

    /// Horizontal thumb, or `None` when the content fits.
    #[must_use]
    pub fn horizontal_scrollbar(&self) -> Option<ScrollbarRange> {
        range(self.offset.0, self.viewport.0, self.content.0)
    }

    /// The visible part of layout space.
    #[must_use]
    pub fn visible_rect(&self) -> Rect {
        Rect::from_origin_size(self.offset.0, self.offset.1, self.viewport.0, self.viewport.1)
    }

    /// Primitives that intersect the viewport, in paint order.
    pub fn visible<'a>(
        &self,
        content: &'a [FormattedElement],
    ) -> impl Iterator<Item = &'a FormattedElement> + use<'a> {
        let visible = self.visible_rect();
        content.iter().filter(move |e| e.rect().intersects(&visible))
    }

    /// Layout-space rectangle converted to viewport coordinates.
    #[must_use]
    pub fn to_viewport(&self, rect: Rect) -> Rect {
        rect.translated(-self.offset.0, -self.offset.1)
    }

    /// The link under viewport point `(x, y)`, topmost first.
    #[must_use]
    pub fn hit_test<'a>(&self, content: &'a [FormattedElement], x: f32, y: f32) -> Option<&'a str> {
        let (lx, ly) = (x + self.offset.0, y + self.offset.1);
        content
            .iter()
            .rev()
            .filter(|e| e.rect().contains(lx, ly))
            .find_map(FormattedElement::link)
    }
}

fn range(offset: f32, viewport: f32, content: f32) -> Option<ScrollbarRange> {
    if content <= viewport || content <= 0.0 {
        return None;
    }
    Some(ScrollbarRange {
        start: offset / content,
        end: ((offset + viewport) / content).min(1.0),
    })
}
