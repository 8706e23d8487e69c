//! Common utilities for the Lumen XHTML viewer.
//!
//! This crate provides shared infrastructure used by all viewer components:
//! - **Warning System** - colored, deduplicated terminal output for
//!   recoverable problems (unsupported properties, failed image loads)
//! - **Images** - the decoded image type handed between the image loader
//!   and the layout engine
//! - **URIs** - `data:` URI decoding, `file://` scheme handling and the
//!   hash used to key the image cache
//! - **Text** - whitespace classification and normalization shared by the
//!   parser and the line breaker

pub mod image;
pub mod text;
pub mod uri;
pub mod warning;

pub use image::LoadedImage;
pub use uri::{DataUrl, DataUrlError, ImageSource, uri_hash};
