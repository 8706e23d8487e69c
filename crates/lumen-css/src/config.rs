//! Layout tunables.

use serde::{Deserialize, Serialize};

/// Distances and ratios the layout engine uses for vertical rhythm,
/// list indentation and image placeholders.
///
/// Gap values ending in `_gap` are fractions of the current line height.
/// Every field has a default, so a JSON file may set any subset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Horizontal indent applied once per list, in pixels.
    pub list_indent: f32,
    /// Space between a bullet and the item text, in pixels.
    pub bullet_gap: f32,
    /// Font size multipliers for `h1` through `h6`.
    pub heading_scales: [f32; 6],
    /// Blank space before a heading that does not follow another heading.
    pub heading_gap: f32,
    /// Space after every heading.
    pub heading_trailing_gap: f32,
    /// Space around a paragraph.
    pub paragraph_gap: f32,
    /// Space around a division.
    pub division_gap: f32,
    /// Space around a preformatted block.
    pub preformatted_gap: f32,
    /// Space around a block-level code element.
    pub code_gap: f32,
    /// Space around a list that is not nested in a list item.
    pub list_gap: f32,
    /// Size of an image whose source could not be loaded and that has no
    /// `width`/`height` attributes, in pixels.
    pub image_placeholder: [f32; 2],
    /// Extra height added below the last primitive when reporting the
    /// occupied size.
    pub trailing_gap: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            list_indent: 32.0,
            bullet_gap: 6.0,
            heading_scales: [2.0, 1.5, 1.17, 1.0, 0.83, 0.67],
            heading_gap: 1.0,
            heading_trailing_gap: 0.5,
            paragraph_gap: 0.5,
            division_gap: 0.25,
            preformatted_gap: 0.5,
            code_gap: 0.25,
            list_gap: 0.5,
            image_placeholder: [16.0, 16.0],
            trailing_gap: 0.5,
        }
    }
}

impl LayoutConfig {
    /// Multiplier for heading level 1-6; out-of-range levels get 1.0.
    #[must_use]
    pub fn heading_scale(&self, level: u8) -> f32 {
        usize::from(level)
            .checked_sub(1)
            .and_then(|i| self.heading_scales.get(i))
            .copied()
            .unwrap_or(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heading_scale_lookup() {
        let config = LayoutConfig::default();
        assert!((config.heading_scale(1) - 2.0).abs() < f32::EPSILON);
        assert!((config.heading_scale(6) - 0.67).abs() < f32::EPSILON);
        assert!((config.heading_scale(0) - 1.0).abs() < f32::EPSILON);
        assert!((config.heading_scale(7) - 1.0).abs() < f32::EPSILON);
    }
}
