//! Font metrics backed by fontdue for accurate text measurement during layout.
//!
//! [§ 10.8 Line height calculations](https://www.w3.org/TR/CSS2/visudet.html#line-height)
//!
//! "CSS assumes that every font has font metrics that specify a
//! characteristic height above the baseline and a depth below it."

use fontdue::Font;
use lumen_css::FontMetrics;

/// Font metrics implementation backed by fontdue's per-glyph metrics.
///
/// Owns its [`Font`] so it can be shared between font packs behind an
/// `Arc`. Measurement uses `Font::metrics()`, never `Font::rasterize()`,
/// so no bitmaps are generated.
pub struct FontdueFontMetrics {
    font: Font,
}

impl FontdueFontMetrics {
    /// Wrap a parsed fontdue font.
    #[must_use]
    pub const fn new(font: Font) -> Self {
        Self { font }
    }

    /// The wrapped font.
    #[must_use]
    pub const fn font(&self) -> &Font {
        &self.font
    }
}

impl std::fmt::Debug for FontdueFontMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontdueFontMetrics")
            .field("name", &self.font.name())
            .finish()
    }
}

impl FontMetrics for FontdueFontMetrics {
    fn text_width(&self, text: &str, font_size: f32) -> f32 {
        // Sum of per-character advance widths; control characters such as
        // tabs and newlines take no room.
        text.chars()
            .filter(|ch| !ch.is_control())
            .map(|ch| self.font.metrics(ch, font_size).advance_width)
            .sum()
    }

    fn line_height(&self, font_size: f32) -> f32 {
        // [§ 10.8.1 Leading and half-leading](https://www.w3.org/TR/CSS2/visudet.html#leading)
        //
        // "We recommend a used value for 'normal' between 1.0 and 1.2."
        font_size * 1.2
    }
}
