//! Host integration for the Lumen viewer.
//!
//! # Scope
//!
//! This crate provides:
//! - **Document Loading** - read a file, decode it and parse it into a
//!   [`Document`] ready for layout
//! - **System Fonts** - a fontdue-backed [`FontCollection`] built from the
//!   platform's installed fonts
//! - **Image Decoding** - raster images through the `image` crate
//!
//! # Not Yet Implemented
//!
//! - Network loading (`http://` sources)
//! - SVG images

pub mod font_metrics;
pub mod fonts;
pub mod image_loader;
pub mod source;

pub use lumen_css as css;
pub use lumen_dom as dom;
pub use lumen_html as html;

pub use font_metrics::FontdueFontMetrics;
pub use fonts::{FaceSearchPaths, FontLoadError, load_font_file, load_system_fonts};
pub use image_loader::RasterDecoder;
pub use source::{DecodeError, SourceEncoding, decode_source};

use std::fs;
use std::path::Path;

use lumen_common::warning::clear_warnings;
use lumen_css::{Document, FontCollection};
use lumen_html::{Diagnostic, parse};
use thiserror::Error;

/// A document read from disk, with what the parser reported about it.
#[derive(Debug)]
pub struct LoadedDocument {
    /// The parsed document, with the raster decoder installed and images
    /// resolved relative to the file's directory.
    pub document: Document,
    /// Parser diagnostics in source order.
    pub diagnostics: Vec<Diagnostic>,
    /// The encoding the file was decoded from.
    pub encoding: SourceEncoding,
    /// Decoded source text.
    pub source: String,
}

/// Error type for document loading.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("failed to read '{path}': {source}")]
    Io {
        /// The path that was given.
        path: String,
        /// The OS error.
        source: std::io::Error,
    },
    /// The bytes are not valid text.
    #[error("failed to decode '{path}': {source}")]
    Decode {
        /// The path that was given.
        path: String,
        /// Where decoding failed.
        source: DecodeError,
    },
}

/// Load and parse a document from a file.
///
/// Warnings from a previous document are forgotten first, so each load
/// reports its own problems once.
///
/// # Errors
///
/// Returns [`LoadError`] if the file cannot be read or decoded. Markup
/// problems never fail the load; they are returned as diagnostics.
pub fn load_document(path: &Path) -> Result<LoadedDocument, LoadError> {
    let bytes = fs::read(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let (source, encoding) = decode_source(&bytes).map_err(|source| LoadError::Decode {
        path: path.display().to_string(),
        source,
    })?;

    clear_warnings();
    let mut loaded = parse_document(&source);
    loaded.encoding = encoding;
    loaded.document.set_base_dir(path.parent());
    Ok(loaded)
}

/// Parse source text into a document with the raster decoder installed.
///
/// Relative image paths resolve against the working directory.
#[must_use]
pub fn parse_document(source: &str) -> LoadedDocument {
    let output = parse(source);
    let mut document = Document::from_tree(output.tree);
    document.set_image_decoder(Box::new(RasterDecoder));
    LoadedDocument {
        document,
        diagnostics: output.diagnostics,
        encoding: SourceEncoding::Utf8,
        source: source.to_string(),
    }
}

/// The installed fonts, or approximate metrics if none are found.
///
/// Returns the collection and, on fallback, the error that caused it.
#[must_use]
pub fn fonts_or_approximate() -> (FontCollection, Option<FontLoadError>) {
    match load_system_fonts() {
        Ok(fonts) => (fonts, None),
        Err(e) => (FontCollection::approximate(), Some(e)),
    }
}
