//! The inherited formatting context of a layout visit.

use lumen_dom::{Color, DEFAULT_FONT_SIZE_PX, Edges};
use serde::Serialize;

use super::list::ListData;
use crate::font::FontRef;

/// Style in effect while laying out one element.
///
/// The engine copies the whole value before entering an element and puts
/// the copy back when the element is done, so nothing an element changes
/// leaks to its following siblings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormattingState {
    /// Text color.
    pub fore_color: Color,
    /// Inline background behind text runs.
    pub back_color: Option<Color>,
    /// Product of every enclosing element's opacity.
    pub opacity: f32,
    /// Font size in pixels.
    pub text_height: f32,
    /// Pack, weight and slant.
    pub font: FontRef,
    /// Underline text runs.
    pub underline: bool,
    /// Strike through text runs.
    pub strikethrough: bool,
    /// Vertical offset of text runs from the line's baseline; negative
    /// raises (superscript), positive lowers (subscript).
    pub baseline_shift: f32,
    /// Enclosing lists, outermost first.
    pub lists: Vec<ListData>,
    /// Border width of the element being laid out, in pixels.
    pub border_width: Edges<f32>,
    /// Padding of the element being laid out, in pixels.
    pub padding: Edges<f32>,
    /// `href` of the enclosing anchor.
    pub link: Option<String>,
}

impl FormattingState {
    /// The state layout starts from.
    #[must_use]
    pub fn new(text_height: f32, fore_color: Color, opacity: f32) -> Self {
        Self {
            fore_color,
            back_color: None,
            opacity: opacity.clamp(0.0, 1.0),
            text_height,
            font: FontRef::default(),
            underline: false,
            strikethrough: false,
            baseline_shift: 0.0,
            lists: Vec::new(),
            border_width: Edges::default(),
            padding: Edges::default(),
            link: None,
        }
    }

    /// Nesting depth of the innermost list, 1 for a top-level list.
    #[must_use]
    pub fn list_depth(&self) -> usize {
        self.lists.len()
    }

    /// Superscript or subscript: shrink the text by a third and move the
    /// baseline by the same amount.
    pub fn shift_baseline(&mut self, raise: bool) {
        let offset = self.text_height / 3.0;
        self.text_height -= offset;
        if raise {
            self.baseline_shift -= offset;
        } else {
            self.baseline_shift += offset;
        }
    }

    /// Border and padding belong to one element and are not inherited.
    pub fn reset_box(&mut self) {
        self.border_width = Edges::default();
        self.padding = Edges::default();
    }
}

impl Default for FormattingState {
    fn default() -> Self {
        Self::new(DEFAULT_FONT_SIZE_PX, Color::BLACK, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn superscript_shrinks_and_raises() {
        let mut state = FormattingState::new(18.0, Color::BLACK, 1.0);
        state.shift_baseline(true);
        assert!((state.text_height - 12.0).abs() < 1e-4);
        assert!((state.baseline_shift + 6.0).abs() < 1e-4);
        state.shift_baseline(false);
        assert!((state.text_height - 8.0).abs() < 1e-4);
        assert!((state.baseline_shift + 2.0).abs() < 1e-4);
    }

    #[test]
    fn snapshot_restore_is_a_plain_copy() {
        let mut state = FormattingState::default();
        let snapshot = state.clone();
        state.lists.push(ListData::new(true));
        state.font = state.font.emboldened();
        state = snapshot;
        assert!(state.lists.is_empty());
        assert!(!state.font.bold);
    }
}
