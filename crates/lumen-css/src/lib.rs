//! Style resolution and layout for the Lumen XHTML viewer.
//!
//! # Scope
//!
//! This crate implements:
//! - **Style sheets**: `tag`, `.class` and `tag.class` rules from `<style>`
//!   blocks, resolved per element together with the inline `style`
//!   attribute ([`stylesheet`]).
//! - **Fonts**: the [`FontMetrics`] measurement interface and the
//!   sans/serif/mono [`FontCollection`] layout draws from ([`font`]).
//! - **Layout**: a single depth-first pass producing positioned
//!   [`FormattedElement`]s and the occupied size ([`layout`]).
//! - **Documents**: tree, style sheet, image cache and layout output in one
//!   owner ([`Document`]).
//! - **View glue**: scrolling, scrollbar ranges and link hit-testing
//!   ([`ScrollView`]).
//!
//! # Not Implemented
//!
//! - Selector combinators, ids, attributes and pseudo-classes
//! - Floats, positioning, tables, flex
//! - Bidirectional text and shaping

/// Layout tunables.
pub mod config;
/// The laid-out document.
pub mod document;
/// Font metrics and the font collection.
pub mod font;
/// Layout output primitives.
pub mod formatted;
/// Image loading and caching.
pub mod image;
/// The layout engine.
pub mod layout;
/// Style sheet parsing and per-element resolution.
pub mod stylesheet;
/// Scroll and hit-test glue.
pub mod view;

pub use config::LayoutConfig;
pub use document::Document;
pub use font::{
    ApproximateFontMetrics, FontCollection, FontFamily, FontMetrics, FontPack, FontRef,
    SharedMetrics, classify_family,
};
pub use formatted::{FormattedElement, ImageSection, Rect, RectangleSection, TextSection};
pub use image::{ImageCache, ImageDecoder, ImageError, fetch_image_bytes};
pub use layout::{FormattingState, LayoutError, ListData};
pub use stylesheet::{Selector, StyleRule, StyleSheet};
pub use view::{ScrollView, ScrollbarRange};
