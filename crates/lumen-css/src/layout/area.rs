//! The evolving layout area: write cursor plus remaining space.

use lumen_dom::Edges;

/// Horizontal extent available to the current block, the top of the line
/// being filled, and how much of that line is used.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LayoutArea {
    /// Left edge of the content area.
    pub left: f32,
    /// Right edge of the content area.
    pub right: f32,
    /// Top of the current line.
    pub top: f32,
    /// Width already used on the current line.
    pub run_length: f32,
    /// Height of the current line; 0 while nothing sits on it.
    pub line_height: f32,
}

impl LayoutArea {
    /// An area spanning `width` from the origin.
    #[must_use]
    pub const fn new(width: f32) -> Self {
        Self {
            left: 0.0,
            right: width,
            top: 0.0,
            run_length: 0.0,
            line_height: 0.0,
        }
    }

    /// Width between the edges, never negative.
    #[must_use]
    pub fn width(&self) -> f32 {
        (self.right - self.left).max(0.0)
    }

    /// Width still free on the current line.
    #[must_use]
    pub fn remaining(&self) -> f32 {
        (self.width() - self.run_length).max(0.0)
    }

    /// Where the next inline item starts.
    #[must_use]
    pub fn cursor_x(&self) -> f32 {
        self.left + self.run_length
    }

    /// Nothing has been placed on the current line.
    #[must_use]
    pub fn is_line_empty(&self) -> bool {
        self.run_length <= 0.0 && self.line_height <= 0.0
    }

    /// Shrink the edges and move the top down by `edges`.
    pub fn inflate(&mut self, edges: Edges<f32>) {
        self.left += edges.left;
        self.right -= edges.right;
        self.top += edges.top;
    }

    /// Undo the horizontal part of [`LayoutArea::inflate`] and move the top
    /// down by the bottom edge.
    pub fn deflate(&mut self, edges: Edges<f32>) {
        self.left -= edges.left;
        self.right += edges.right;
        self.top += edges.bottom;
    }
}
