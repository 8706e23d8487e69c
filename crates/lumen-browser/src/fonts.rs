//! System font discovery.
//!
//! Each pack has four search lists, one per variant. The first file that
//! exists and parses wins. A missing variant falls back to the pack's
//! regular face; a missing serif or mono pack falls back to the sans pack.
//! Only a missing sans regular face is an error.

use std::path::Path;
use std::sync::Arc;

use fontdue::{Font, FontSettings};
use lumen_common::warning::warn_once;
use lumen_css::{FontCollection, FontFamily, FontPack, SharedMetrics};
use thiserror::Error;

use crate::font_metrics::FontdueFontMetrics;

/// Search lists for the four variants of one family.
#[derive(Debug, Clone, Copy)]
pub struct FaceSearchPaths {
    /// Upright, normal weight.
    pub regular: &'static [&'static str],
    /// Upright, bold.
    pub bold: &'static [&'static str],
    /// Slanted, normal weight.
    pub italic: &'static [&'static str],
    /// Slanted, bold.
    pub bold_italic: &'static [&'static str],
}

/// Sans-serif faces on macOS, Linux and Windows.
pub const SANS_PATHS: FaceSearchPaths = FaceSearchPaths {
    regular: &[
        "/System/Library/Fonts/Supplemental/Arial.ttf",
        "/Library/Fonts/Arial.ttf",
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
        "/usr/share/fonts/truetype/freefont/FreeSans.ttf",
        "C:\\Windows\\Fonts\\arial.ttf",
        "C:\\Windows\\Fonts\\segoeui.ttf",
    ],
    bold: &[
        "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
        "/Library/Fonts/Arial Bold.ttf",
        "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
        "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
        "/usr/share/fonts/truetype/freefont/FreeSansBold.ttf",
        "C:\\Windows\\Fonts\\arialbd.ttf",
    ],
    italic: &[
        "/System/Library/Fonts/Supplemental/Arial Italic.ttf",
        "/Library/Fonts/Arial Italic.ttf",
        "/usr/share/fonts/truetype/dejavu/DejaVuSans-Oblique.ttf",
        "/usr/share/fonts/TTF/DejaVuSans-Oblique.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationSans-Italic.ttf",
        "/usr/share/fonts/truetype/freefont/FreeSansOblique.ttf",
        "C:\\Windows\\Fonts\\ariali.ttf",
    ],
    bold_italic: &[
        "/System/Library/Fonts/Supplemental/Arial Bold Italic.ttf",
        "/Library/Fonts/Arial Bold Italic.ttf",
        "/usr/share/fonts/truetype/dejavu/DejaVuSans-BoldOblique.ttf",
        "/usr/share/fonts/TTF/DejaVuSans-BoldOblique.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationSans-BoldItalic.ttf",
        "/usr/share/fonts/truetype/freefont/FreeSansBoldOblique.ttf",
        "C:\\Windows\\Fonts\\arialbi.ttf",
    ],
};

/// Serif faces on macOS, Linux and Windows.
pub const SERIF_PATHS: FaceSearchPaths = FaceSearchPaths {
    regular: &[
        "/System/Library/Fonts/Supplemental/Times New Roman.ttf",
        "/Library/Fonts/Times New Roman.ttf",
        "/usr/share/fonts/truetype/dejavu/DejaVuSerif.ttf",
        "/usr/share/fonts/TTF/DejaVuSerif.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationSerif-Regular.ttf",
        "/usr/share/fonts/truetype/freefont/FreeSerif.ttf",
        "C:\\Windows\\Fonts\\times.ttf",
    ],
    bold: &[
        "/System/Library/Fonts/Supplemental/Times New Roman Bold.ttf",
        "/Library/Fonts/Times New Roman Bold.ttf",
        "/usr/share/fonts/truetype/dejavu/DejaVuSerif-Bold.ttf",
        "/usr/share/fonts/TTF/DejaVuSerif-Bold.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationSerif-Bold.ttf",
        "/usr/share/fonts/truetype/freefont/FreeSerifBold.ttf",
        "C:\\Windows\\Fonts\\timesbd.ttf",
    ],
    italic: &[
        "/System/Library/Fonts/Supplemental/Times New Roman Italic.ttf",
        "/Library/Fonts/Times New Roman Italic.ttf",
        "/usr/share/fonts/truetype/dejavu/DejaVuSerif-Italic.ttf",
        "/usr/share/fonts/TTF/DejaVuSerif-Italic.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationSerif-Italic.ttf",
        "/usr/share/fonts/truetype/freefont/FreeSerifItalic.ttf",
        "C:\\Windows\\Fonts\\timesi.ttf",
    ],
    bold_italic: &[
        "/System/Library/Fonts/Supplemental/Times New Roman Bold Italic.ttf",
        "/Library/Fonts/Times New Roman Bold Italic.ttf",
        "/usr/share/fonts/truetype/dejavu/DejaVuSerif-BoldItalic.ttf",
        "/usr/share/fonts/TTF/DejaVuSerif-BoldItalic.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationSerif-BoldItalic.ttf",
        "/usr/share/fonts/truetype/freefont/FreeSerifBoldItalic.ttf",
        "C:\\Windows\\Fonts\\timesbi.ttf",
    ],
};

/// Monospace faces on macOS, Linux and Windows.
pub const MONO_PATHS: FaceSearchPaths = FaceSearchPaths {
    regular: &[
        "/System/Library/Fonts/Supplemental/Courier New.ttf",
        "/Library/Fonts/Courier New.ttf",
        "/usr/share/fonts/truetype/dejavu/DejaVuSansMono.ttf",
        "/usr/share/fonts/TTF/DejaVuSansMono.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationMono-Regular.ttf",
        "/usr/share/fonts/truetype/freefont/FreeMono.ttf",
        "C:\\Windows\\Fonts\\consola.ttf",
        "C:\\Windows\\Fonts\\cour.ttf",
    ],
    bold: &[
        "/System/Library/Fonts/Supplemental/Courier New Bold.ttf",
        "/Library/Fonts/Courier New Bold.ttf",
        "/usr/share/fonts/truetype/dejavu/DejaVuSansMono-Bold.ttf",
        "/usr/share/fonts/TTF/DejaVuSansMono-Bold.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationMono-Bold.ttf",
        "/usr/share/fonts/truetype/freefont/FreeMonoBold.ttf",
        "C:\\Windows\\Fonts\\consolab.ttf",
        "C:\\Windows\\Fonts\\courbd.ttf",
    ],
    italic: &[
        "/System/Library/Fonts/Supplemental/Courier New Italic.ttf",
        "/Library/Fonts/Courier New Italic.ttf",
        "/usr/share/fonts/truetype/dejavu/DejaVuSansMono-Oblique.ttf",
        "/usr/share/fonts/TTF/DejaVuSansMono-Oblique.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationMono-Italic.ttf",
        "/usr/share/fonts/truetype/freefont/FreeMonoOblique.ttf",
        "C:\\Windows\\Fonts\\consolai.ttf",
        "C:\\Windows\\Fonts\\couri.ttf",
    ],
    bold_italic: &[
        "/System/Library/Fonts/Supplemental/Courier New Bold Italic.ttf",
        "/Library/Fonts/Courier New Bold Italic.ttf",
        "/usr/share/fonts/truetype/dejavu/DejaVuSansMono-BoldOblique.ttf",
        "/usr/share/fonts/TTF/DejaVuSansMono-BoldOblique.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationMono-BoldItalic.ttf",
        "/usr/share/fonts/truetype/freefont/FreeMonoBoldOblique.ttf",
        "C:\\Windows\\Fonts\\consolaz.ttf",
        "C:\\Windows\\Fonts\\courbi.ttf",
    ],
};

/// Failure to build a font collection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FontLoadError {
    /// The file could not be read.
    #[error("failed to read font '{path}': {message}")]
    Io {
        /// File that was tried.
        path: String,
        /// OS error text.
        message: String,
    },
    /// The file is not a font fontdue understands.
    #[error("failed to parse font '{path}': {message}")]
    Parse {
        /// File that was tried.
        path: String,
        /// fontdue's error text.
        message: String,
    },
    /// No regular face of a required family was found.
    #[error("no {family} font found in {searched} search paths")]
    NotFound {
        /// The family that is missing.
        family: FontFamily,
        /// Number of paths tried.
        searched: usize,
    },
}

/// Parse one font file.
///
/// # Errors
///
/// Returns [`FontLoadError::Io`] or [`FontLoadError::Parse`].
pub fn load_font_file(path: &Path) -> Result<FontdueFontMetrics, FontLoadError> {
    let data = std::fs::read(path).map_err(|e| FontLoadError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    let font = Font::from_bytes(data, FontSettings::default()).map_err(|e| {
        FontLoadError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        }
    })?;
    Ok(FontdueFontMetrics::new(font))
}

/// First font in `paths` that loads.
fn load_font_from_paths(paths: &[&str]) -> Option<SharedMetrics> {
    paths
        .iter()
        .find_map(|path| load_font_file(Path::new(path)).ok())
        .map(|metrics| Arc::new(metrics) as SharedMetrics)
}

/// Load a pack from search lists. Missing variants reuse the regular face.
///
/// Returns `None` when no regular face exists.
#[must_use]
pub fn load_pack(family: FontFamily, paths: &FaceSearchPaths) -> Option<FontPack> {
    let regular = load_font_from_paths(paths.regular)?;
    let variant = |list: &[&str], label: &str| {
        load_font_from_paths(list).unwrap_or_else(|| {
            let _printed = warn_once(
                "Fonts",
                &format!("no {family} {label} face found, using regular"),
            );
            Arc::clone(&regular)
        })
    };
    let bold = variant(paths.bold, "bold");
    let italic = variant(paths.italic, "italic");
    let bold_italic = variant(paths.bold_italic, "bold-italic");
    Some(FontPack {
        regular,
        bold,
        italic,
        bold_italic,
    })
}

/// Build a collection from the platform's installed fonts.
///
/// # Errors
///
/// Returns [`FontLoadError::NotFound`] if no sans-serif regular face is
/// installed.
pub fn load_system_fonts() -> Result<FontCollection, FontLoadError> {
    load_fonts_from(&SANS_PATHS, &SERIF_PATHS, &MONO_PATHS)
}

/// Build a collection from explicit search lists.
///
/// # Errors
///
/// Returns [`FontLoadError::NotFound`] if no sans regular face loads.
pub fn load_fonts_from(
    sans: &FaceSearchPaths,
    serif: &FaceSearchPaths,
    mono: &FaceSearchPaths,
) -> Result<FontCollection, FontLoadError> {
    let sans_pack =
        load_pack(FontFamily::Sans, sans).ok_or(FontLoadError::NotFound {
            family: FontFamily::Sans,
            searched: sans.regular.len(),
        })?;
    let fallback = |family: FontFamily, paths: &FaceSearchPaths| {
        load_pack(family, paths).unwrap_or_else(|| {
            let _printed = warn_once(
                "Fonts",
                &format!("no {family} font found, using {}", FontFamily::Sans),
            );
            sans_pack.clone()
        })
    };
    let serif_pack = fallback(FontFamily::Serif, serif);
    let mono_pack = fallback(FontFamily::Mono, mono);
    Ok(FontCollection::new(sans_pack, serif_pack, mono_pack))
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOWHERE: FaceSearchPaths = FaceSearchPaths {
        regular: &["/nonexistent/lumen/Regular.ttf"],
        bold: &[],
        italic: &[],
        bold_italic: &[],
    };

    #[test]
    fn missing_sans_is_an_error() {
        let err = load_fonts_from(&NOWHERE, &NOWHERE, &NOWHERE).unwrap_err();
        assert_eq!(
            err,
            FontLoadError::NotFound {
                family: FontFamily::Sans,
                searched: 1
            }
        );
        assert_eq!(err.to_string(), "no sans-serif font found in 1 search paths");
    }

    #[test]
    fn unreadable_file() {
        let err = load_font_file(Path::new("/nonexistent/lumen/font.ttf")).unwrap_err();
        assert!(matches!(err, FontLoadError::Io { .. }));
    }

    #[test]
    fn search_lists_cover_every_variant() {
        for paths in [SANS_PATHS, SERIF_PATHS, MONO_PATHS] {
            assert!(!paths.regular.is_empty());
            assert!(!paths.bold.is_empty());
            assert!(!paths.italic.is_empty());
            assert!(!paths.bold_italic.is_empty());
        }
    }
}
