//! Image resolution for `img` elements.
//!
//! Layout asks the [`ImageCache`] for a `src`; the cache fetches the bytes
//! (inline `data:` payload or local file) and hands them to an
//! [`ImageDecoder`]. Results, failures included, are kept under the hash of
//! the `src` string so a repeated layout never decodes the same URI twice.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use lumen_common::{DataUrlError, ImageSource, LoadedImage, uri_hash};
use thiserror::Error;

/// Why an image could not be produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImageError {
    /// The `src` is a malformed `data:` URI.
    #[error("invalid image source: {0}")]
    Source(#[from] DataUrlError),
    /// The file could not be read.
    #[error("failed to read '{path}': {message}")]
    Io {
        /// Path that was tried.
        path: PathBuf,
        /// OS error text.
        message: String,
    },
    /// The bytes are not an image the decoder understands.
    #[error("could not decode image ({0})")]
    Decode(String),
    /// No decoder has been installed.
    #[error("no image decoder installed")]
    NoDecoder,
}

/// Turns encoded image bytes into RGBA pixels.
pub trait ImageDecoder {
    /// Human-readable name for log messages.
    fn name(&self) -> &'static str;

    /// Decode raw bytes into a [`LoadedImage`].
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::Decode`] if the bytes cannot be decoded.
    fn decode(&self, bytes: &[u8]) -> Result<LoadedImage, ImageError>;
}

/// Read the encoded bytes an [`ImageSource`] points at.
///
/// # Errors
///
/// Returns an error if the data URL payload is malformed or the file cannot
/// be read.
pub fn fetch_image_bytes(source: &ImageSource) -> Result<Vec<u8>, ImageError> {
    match source {
        ImageSource::Data(url) => Ok(url.decode()?),
        ImageSource::File(path) => fs::read(path).map_err(|e| ImageError::Io {
            path: path.clone(),
            message: e.to_string(),
        }),
    }
}

/// Decoded images keyed by the hash of their `src`.
#[derive(Default)]
pub struct ImageCache {
    entries: HashMap<u64, Result<Arc<LoadedImage>, ImageError>>,
    decoder: Option<Box<dyn ImageDecoder>>,
    base_dir: Option<PathBuf>,
    decode_attempts: usize,
    hits: usize,
}

impl ImageCache {
    /// An empty cache with no decoder; every lookup fails with
    /// [`ImageError::NoDecoder`] until one is installed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the decoder. Cached entries are dropped, since failures
    /// recorded without a decoder may now succeed.
    pub fn set_decoder(&mut self, decoder: Box<dyn ImageDecoder>) {
        self.decoder = Some(decoder);
        self.entries.clear();
    }

    /// Name of the installed decoder.
    #[must_use]
    pub fn decoder_name(&self) -> Option<&'static str> {
        self.decoder.as_ref().map(|d| d.name())
    }

    /// Directory relative `src` paths are resolved against. Changing it
    /// drops cached entries.
    pub fn set_base_dir(&mut self, dir: Option<&Path>) {
        let dir = dir.map(Path::to_path_buf);
        if dir != self.base_dir {
            self.base_dir = dir;
            self.entries.clear();
        }
    }

    /// Look up `src`, decoding it on a miss.
    ///
    /// # Errors
    ///
    /// Returns the (possibly cached) reason the image is unavailable.
    pub fn resolve(&mut self, src: &str) -> Result<Arc<LoadedImage>, ImageError> {
        let key = uri_hash(src);
        if let Some(entry) = self.entries.get(&key) {
            self.hits += 1;
            return entry.clone();
        }

        let result = self.load(src);
        let _previous = self.entries.insert(key, result.clone());
        result
    }

    fn load(&mut self, src: &str) -> Result<Arc<LoadedImage>, ImageError> {
        let decoder = self.decoder.as_ref().ok_or(ImageError::NoDecoder)?;
        let source = ImageSource::classify(src, self.base_dir.as_deref())?;
        let bytes = fetch_image_bytes(&source)?;
        self.decode_attempts += 1;
        decoder.decode(&bytes).map(Arc::new)
    }

    /// Number of times bytes were handed to the decoder.
    #[must_use]
    pub const fn decode_attempts(&self) -> usize {
        self.decode_attempts
    }

    /// Number of lookups answered from the cache.
    #[must_use]
    pub const fn hits(&self) -> usize {
        self.hits
    }

    /// Number of distinct sources seen.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// No source has been looked up yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Forget every cached image and reset the statistics.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.decode_attempts = 0;
        self.hits = 0;
    }
}

impl std::fmt::Debug for ImageCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageCache")
            .field("entries", &self.entries.len())
            .field("decoder", &self.decoder_name())
            .field("decode_attempts", &self.decode_attempts)
            .field("hits", &self.hits)
            .finish()
    }
}
