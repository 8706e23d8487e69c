//! Font measurement interface and the three-pack font collection.
//!
//! [§ 10.8 Line height calculations](https://www.w3.org/TR/CSS2/visudet.html#line-height)
//!
//! "CSS assumes that every font has font metrics that specify a
//! characteristic height above the baseline and a depth below it."
//!
//! The layout engine never touches glyph data. It asks a [`FontMetrics`]
//! implementation for advance widths and line heights, and picks the
//! implementation from a [`FontCollection`] by family, weight and slant.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use strum_macros::Display;

/// Font metrics interface for text measurement during layout.
///
/// Implementors provide the per-glyph advance widths and line height values
/// needed for line breaking and primitive placement.
pub trait FontMetrics {
    /// Measure the total advance width of a text string at the given font size.
    ///
    /// This should sum the advance width of each glyph in the string,
    /// matching the cursor advancement used when the text is drawn.
    fn text_width(&self, text: &str, font_size: f32) -> f32;

    /// Calculate the line height for a given font size.
    ///
    /// [§ 10.8.1 Leading and half-leading](https://www.w3.org/TR/CSS2/visudet.html#leading)
    ///
    /// "The initial value of 'line-height' is 'normal'. We recommend a used
    /// value for 'normal' between 1.0 and 1.2."
    fn line_height(&self, font_size: f32) -> f32;
}

/// Approximate font metrics using fixed ratios.
///
/// The average advance width of Latin glyphs in a proportional font is
/// roughly 0.6× the font size, and line height uses 1.2×, the upper end of
/// the recommended range for `line-height: normal`.
///
/// This is used as a fallback when no font files are available, and in tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApproximateFontMetrics {
    /// Advance width of every glyph, as a fraction of the font size.
    pub char_width_ratio: f32,
    /// Line height as a multiple of the font size.
    pub line_height_ratio: f32,
}

impl ApproximateFontMetrics {
    /// The default 0.6 / 1.2 ratios.
    pub const DEFAULT: Self = Self::new(0.6, 1.2);

    /// Metrics with custom ratios.
    #[must_use]
    pub const fn new(char_width_ratio: f32, line_height_ratio: f32) -> Self {
        Self {
            char_width_ratio,
            line_height_ratio,
        }
    }
}

impl Default for ApproximateFontMetrics {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl FontMetrics for ApproximateFontMetrics {
    #[allow(clippy::cast_precision_loss)]
    fn text_width(&self, text: &str, font_size: f32) -> f32 {
        text.chars().count() as f32 * font_size * self.char_width_ratio
    }

    fn line_height(&self, font_size: f32) -> f32 {
        font_size * self.line_height_ratio
    }
}

/// [§ 2.1 Generic font families](https://www.w3.org/TR/css-fonts-4/#generic-font-families)
///
/// The three packs a collection carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, Serialize)]
pub enum FontFamily {
    /// "Sans-serif fonts ... have stroke endings that are plain."
    #[default]
    #[strum(serialize = "sans-serif")]
    Sans,
    /// "Serif fonts represent the formal text style for a script."
    #[strum(serialize = "serif")]
    Serif,
    /// "The sole criterion of a monospace font is that all glyphs have the
    /// same fixed width."
    #[strum(serialize = "monospace")]
    Mono,
}

/// A font selection: pack plus weight and slant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct FontRef {
    /// Which pack.
    pub family: FontFamily,
    /// Bold variant.
    pub bold: bool,
    /// Italic variant.
    pub italic: bool,
}

impl FontRef {
    /// Regular face of `family`.
    #[must_use]
    pub const fn regular(family: FontFamily) -> Self {
        Self {
            family,
            bold: false,
            italic: false,
        }
    }

    /// Same weight and slant in another pack.
    #[must_use]
    pub const fn with_family(self, family: FontFamily) -> Self {
        Self { family, ..self }
    }

    /// Same pack and slant, bold.
    #[must_use]
    pub const fn emboldened(self) -> Self {
        Self { bold: true, ..self }
    }

    /// Same pack and weight, italic.
    #[must_use]
    pub const fn slanted(self) -> Self {
        Self {
            italic: true,
            ..self
        }
    }
}

impl fmt::Display for FontRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let variant = match (self.bold, self.italic) {
            (false, false) => "regular",
            (true, false) => "bold",
            (false, true) => "italic",
            (true, true) => "bold-italic",
        };
        write!(f, "{} {variant}", self.family)
    }
}

/// Shared handle to a face's metrics.
pub type SharedMetrics = Arc<dyn FontMetrics + Send + Sync>;

/// Regular, bold, italic and bold-italic faces of one family.
#[derive(Clone)]
pub struct FontPack {
    /// Upright, normal weight.
    pub regular: SharedMetrics,
    /// Upright, bold.
    pub bold: SharedMetrics,
    /// Slanted, normal weight.
    pub italic: SharedMetrics,
    /// Slanted, bold.
    pub bold_italic: SharedMetrics,
}

impl FontPack {
    /// A pack whose four variants share one set of metrics.
    #[must_use]
    pub fn uniform(metrics: SharedMetrics) -> Self {
        Self {
            regular: Arc::clone(&metrics),
            bold: Arc::clone(&metrics),
            italic: Arc::clone(&metrics),
            bold_italic: metrics,
        }
    }

    /// The variant for the given weight and slant.
    #[must_use]
    pub fn variant(&self, bold: bool, italic: bool) -> &SharedMetrics {
        match (bold, italic) {
            (false, false) => &self.regular,
            (true, false) => &self.bold,
            (false, true) => &self.italic,
            (true, true) => &self.bold_italic,
        }
    }
}

impl fmt::Debug for FontPack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontPack").finish_non_exhaustive()
    }
}

/// Sans, serif and mono packs.
///
/// Layout refuses to run unless all three are present, see
/// [`FontCollection::is_valid`].
#[derive(Debug, Clone, Default)]
pub struct FontCollection {
    /// Default pack for body text.
    pub sans: Option<FontPack>,
    /// Pack for serif family names.
    pub serif: Option<FontPack>,
    /// Pack for `pre`, `code` and unordered list bullets.
    pub mono: Option<FontPack>,
}

impl FontCollection {
    /// A collection from three complete packs.
    #[must_use]
    pub const fn new(sans: FontPack, serif: FontPack, mono: FontPack) -> Self {
        Self {
            sans: Some(sans),
            serif: Some(serif),
            mono: Some(mono),
        }
    }

    /// Every pack backed by [`ApproximateFontMetrics::DEFAULT`].
    #[must_use]
    pub fn approximate() -> Self {
        let pack = FontPack::uniform(Arc::new(ApproximateFontMetrics::DEFAULT));
        Self::new(pack.clone(), pack.clone(), pack)
    }

    /// All three packs are present.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.sans.is_some() && self.serif.is_some() && self.mono.is_some()
    }

    /// Names of the missing packs, for error reporting.
    #[must_use]
    pub fn missing_packs(&self) -> Vec<FontFamily> {
        [
            (FontFamily::Sans, self.sans.is_none()),
            (FontFamily::Serif, self.serif.is_none()),
            (FontFamily::Mono, self.mono.is_none()),
        ]
        .into_iter()
        .filter_map(|(family, missing)| missing.then_some(family))
        .collect()
    }

    /// The pack for `family`, if loaded.
    #[must_use]
    pub const fn pack(&self, family: FontFamily) -> Option<&FontPack> {
        match family {
            FontFamily::Sans => self.sans.as_ref(),
            FontFamily::Serif => self.serif.as_ref(),
            FontFamily::Mono => self.mono.as_ref(),
        }
    }

    /// Metrics for a font selection.
    #[must_use]
    pub fn face(&self, font: FontRef) -> Option<&SharedMetrics> {
        self.pack(font.family)
            .map(|pack| pack.variant(font.bold, font.italic))
    }
}

/// Family name fragments that identify a monospace face.
const MONO_NAMES: &[&str] = &[
    "mono",
    "courier",
    "consolas",
    "menlo",
    "monaco",
    "inconsolata",
    "fixedsys",
    "lucida console",
    "source code",
    "fira code",
];

/// Family name fragments that identify a sans-serif face.
///
/// Checked before [`SERIF_NAMES`] because "sans-serif" contains "serif".
const SANS_NAMES: &[&str] = &[
    "sans",
    "arial",
    "helvetica",
    "verdana",
    "tahoma",
    "segoe",
    "calibri",
    "trebuchet",
    "roboto",
    "ubuntu",
    "lucida grande",
    "system-ui",
];

/// Family name fragments that identify a serif face.
const SERIF_NAMES: &[&str] = &[
    "serif",
    "times",
    "georgia",
    "garamond",
    "palatino",
    "cambria",
    "baskerville",
    "bookman",
    "didot",
    "roman",
];

/// [§ 3.1 font-family](https://www.w3.org/TR/css-fonts-4/#font-family-prop)
///
/// Pick a pack for a `font-family` value. Names are tried in order and the
/// first one any table recognizes wins; `None` when nothing matches.
#[must_use]
pub fn classify_family(value: &str) -> Option<FontFamily> {
    value.split(',').find_map(|name| {
        let name = name
            .trim()
            .trim_matches(|c| c == '"' || c == '\'')
            .to_ascii_lowercase();
        if name.is_empty() {
            None
        } else if MONO_NAMES.iter().any(|n| name.contains(n)) {
            Some(FontFamily::Mono)
        } else if SANS_NAMES.iter().any(|n| name.contains(n)) {
            Some(FontFamily::Sans)
        } else if SERIF_NAMES.iter().any(|n| name.contains(n)) {
            Some(FontFamily::Serif)
        } else {
            None
        }
    })
}
