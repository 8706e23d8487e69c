//! Image `src` URI handling.
//!
//! Two schemes are recognized: `data:` (payload embedded in the URI) and
//! `file://` (local path, scheme stripped before reading). Anything else is
//! treated as a plain path, optionally relative to the document's location.

use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

use base64::Engine;
use rustc_hash::FxHasher;
use thiserror::Error;

/// Errors produced while decoding a `data:` URI.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataUrlError {
    /// The URI does not start with `data:`.
    #[error("not a data URL")]
    NotADataUrl,
    /// There is no `,` separating the metadata from the payload.
    #[error("invalid data URL: missing comma")]
    MissingComma,
    /// The payload is not valid base64.
    #[error("base64 decode error: {0}")]
    Base64(String),
    /// The payload uses an encoding we cannot decode.
    #[error("unrecognized data URL encoding: {0}")]
    UnsupportedEncoding(String),
}

/// A parsed `data:` URL that can be decoded into raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
    /// The full raw `data:` URL string (e.g. `data:image/png;base64,...`).
    raw: String,
}

impl DataUrl {
    /// Wrap a raw `data:` URL string.
    ///
    /// # Errors
    ///
    /// Returns [`DataUrlError::NotADataUrl`] if `raw` does not use the
    /// `data:` scheme.
    pub fn new(raw: &str) -> Result<Self, DataUrlError> {
        if raw.trim_start().starts_with("data:") {
            Ok(Self {
                raw: raw.trim().to_string(),
            })
        } else {
            Err(DataUrlError::NotADataUrl)
        }
    }

    /// The media type declared in the metadata (e.g. `image/png`), if any.
    #[must_use]
    pub fn media_type(&self) -> Option<&str> {
        let metadata = self.metadata()?;
        let media = metadata.split(';').next().unwrap_or_default();
        if media.is_empty() { None } else { Some(media) }
    }

    fn metadata(&self) -> Option<&str> {
        let rest = self.raw.strip_prefix("data:")?;
        rest.find(',').map(|i| &rest[..i])
    }

    /// Decode the data URL payload into raw bytes.
    ///
    /// Base64 payloads are decoded (embedded whitespace is ignored, since
    /// hand-written markup often wraps long payloads). Payloads without the
    /// `;base64` marker are returned as their literal bytes when they contain
    /// no percent-escapes.
    ///
    /// # Errors
    ///
    /// Returns an error if the comma separator is missing, base64 decoding
    /// fails, or the payload is percent-encoded.
    pub fn decode(&self) -> Result<Vec<u8>, DataUrlError> {
        let rest = self
            .raw
            .strip_prefix("data:")
            .ok_or(DataUrlError::NotADataUrl)?;
        let (metadata, data) = rest.split_once(',').ok_or(DataUrlError::MissingComma)?;

        if metadata.ends_with(";base64") {
            let compact: String = data.chars().filter(|c| !c.is_whitespace()).collect();
            base64::engine::general_purpose::STANDARD
                .decode(compact.as_bytes())
                .map_err(|e| DataUrlError::Base64(e.to_string()))
        } else if data.contains('%') {
            Err(DataUrlError::UnsupportedEncoding(metadata.to_string()))
        } else {
            Ok(data.as_bytes().to_vec())
        }
    }
}

/// Where the bytes of an image `src` come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// Inline payload.
    Data(DataUrl),
    /// Local file; for `file://` URIs the scheme has been stripped.
    File(PathBuf),
}

impl ImageSource {
    /// Classify an image `src` attribute value.
    ///
    /// Relative paths are joined onto `base_dir` when one is given.
    ///
    /// # Errors
    ///
    /// Returns a [`DataUrlError`] only for malformed `data:` URIs.
    pub fn classify(src: &str, base_dir: Option<&Path>) -> Result<Self, DataUrlError> {
        let src = src.trim();
        if src.starts_with("data:") {
            return DataUrl::new(src).map(Self::Data);
        }
        let path = strip_file_scheme(src);
        let path = Path::new(path);
        match base_dir {
            Some(base) if path.is_relative() => Ok(Self::File(base.join(path))),
            _ => Ok(Self::File(path.to_path_buf())),
        }
    }
}

/// Strip a leading `file://` scheme, leaving the local path.
#[must_use]
pub fn strip_file_scheme(src: &str) -> &str {
    src.strip_prefix("file://").unwrap_or(src)
}

/// Hash of a source URI, used as the image cache key.
#[must_use]
pub fn uri_hash(uri: &str) -> u64 {
    let mut hasher = FxHasher::default();
    uri.hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_base64_payload() {
        let url = DataUrl::new("data:text/plain;base64,SGVsbG8=").unwrap();
        assert_eq!(url.decode().unwrap(), b"Hello");
        assert_eq!(url.media_type(), Some("text/plain"));
    }

    #[test]
    fn missing_comma_is_an_error() {
        let url = DataUrl::new("data:image/png;base64").unwrap();
        assert_eq!(url.decode(), Err(DataUrlError::MissingComma));
    }

    #[test]
    fn file_scheme_is_stripped() {
        let source = ImageSource::classify("file:///tmp/a.png", None).unwrap();
        assert_eq!(source, ImageSource::File(PathBuf::from("/tmp/a.png")));
    }

    #[test]
    fn relative_path_joins_base() {
        let source = ImageSource::classify("img/a.png", Some(Path::new("/docs"))).unwrap();
        assert_eq!(source, ImageSource::File(PathBuf::from("/docs/img/a.png")));
    }

    #[test]
    fn hash_is_stable_per_uri() {
        assert_eq!(uri_hash("a.png"), uri_hash("a.png"));
        assert_ne!(uri_hash("a.png"), uri_hash("b.png"));
    }
}
