//! Turning file bytes into source text.
//!
//! [§ 13.2.3.2 Determining the character encoding](https://html.spec.whatwg.org/multipage/parsing.html#determining-the-character-encoding)
//!
//! Only the byte order mark is consulted: UTF-8 with or without a BOM, and
//! UTF-16 in either byte order when a BOM says so.

use std::fmt;

use thiserror::Error;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];
const UTF16_LE_BOM: &[u8] = &[0xFF, 0xFE];
const UTF16_BE_BOM: &[u8] = &[0xFE, 0xFF];

/// The encoding a source was decoded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceEncoding {
    /// UTF-8, no byte order mark.
    Utf8,
    /// UTF-8 with a leading byte order mark.
    Utf8Bom,
    /// UTF-16, little endian.
    Utf16Le,
    /// UTF-16, big endian.
    Utf16Be,
}

impl fmt::Display for SourceEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Utf8 => "UTF-8",
            Self::Utf8Bom => "UTF-8 (BOM)",
            Self::Utf16Le => "UTF-16LE",
            Self::Utf16Be => "UTF-16BE",
        })
    }
}

/// Why bytes could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {encoding} at byte {offset}")]
pub struct DecodeError {
    /// The encoding that was attempted.
    pub encoding: SourceEncoding,
    /// Byte offset of the first bad sequence.
    pub offset: usize,
}

/// Sniff the byte order mark.
#[must_use]
pub fn detect_encoding(bytes: &[u8]) -> SourceEncoding {
    if bytes.starts_with(UTF8_BOM) {
        SourceEncoding::Utf8Bom
    } else if bytes.starts_with(UTF16_LE_BOM) {
        SourceEncoding::Utf16Le
    } else if bytes.starts_with(UTF16_BE_BOM) {
        SourceEncoding::Utf16Be
    } else {
        SourceEncoding::Utf8
    }
}

/// Decode `bytes` to text, dropping any byte order mark.
///
/// # Errors
///
/// Returns [`DecodeError`] for malformed UTF-8, an odd number of UTF-16
/// bytes, or an unpaired surrogate.
pub fn decode_source(bytes: &[u8]) -> Result<(String, SourceEncoding), DecodeError> {
    let encoding = detect_encoding(bytes);
    let text = match encoding {
        SourceEncoding::Utf8 => decode_utf8(bytes, 0)?,
        SourceEncoding::Utf8Bom => decode_utf8(&bytes[UTF8_BOM.len()..], UTF8_BOM.len())?,
        SourceEncoding::Utf16Le => decode_utf16(&bytes[2..], encoding, u16::from_le_bytes)?,
        SourceEncoding::Utf16Be => decode_utf16(&bytes[2..], encoding, u16::from_be_bytes)?,
    };
    Ok((text, encoding))
}

fn decode_utf8(bytes: &[u8], base: usize) -> Result<String, DecodeError> {
    std::str::from_utf8(bytes)
        .map(str::to_string)
        .map_err(|e| DecodeError {
            encoding: if base == 0 {
                SourceEncoding::Utf8
            } else {
                SourceEncoding::Utf8Bom
            },
            offset: base + e.valid_up_to(),
        })
}

fn decode_utf16(
    bytes: &[u8],
    encoding: SourceEncoding,
    unit: fn([u8; 2]) -> u16,
) -> Result<String, DecodeError> {
    let chunks = bytes.chunks_exact(2);
    if !chunks.remainder().is_empty() {
        return Err(DecodeError {
            encoding,
            offset: bytes.len() + 1,
        });
    }
    let units: Vec<u16> = chunks.map(|pair| unit([pair[0], pair[1]])).collect();

    let mut text = String::with_capacity(units.len());
    for (i, decoded) in char::decode_utf16(units.iter().copied()).enumerate() {
        match decoded {
            Ok(c) => text.push(c),
            Err(_) => {
                return Err(DecodeError {
                    encoding,
                    offset: 2 + 2 * i,
                });
            }
        }
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utf16(text: &str, le: bool) -> Vec<u8> {
        let mut out = if le { vec![0xFF, 0xFE] } else { vec![0xFE, 0xFF] };
        for unit in text.encode_utf16() {
            let bytes = if le { unit.to_le_bytes() } else { unit.to_be_bytes() };
            out.extend_from_slice(&bytes);
        }
        out
    }

    #[test]
    fn plain_and_bom_utf8() {
        assert_eq!(
            decode_source("<p>é</p>".as_bytes()),
            Ok(("<p>é</p>".to_string(), SourceEncoding::Utf8))
        );
        let mut bom = UTF8_BOM.to_vec();
        bom.extend_from_slice(b"<p/>");
        assert_eq!(
            decode_source(&bom),
            Ok(("<p/>".to_string(), SourceEncoding::Utf8Bom))
        );
    }

    #[test]
    fn utf16_both_orders() {
        let text = "<p>\u{1F600} ok</p>";
        assert_eq!(
            decode_source(&utf16(text, true)),
            Ok((text.to_string(), SourceEncoding::Utf16Le))
        );
        assert_eq!(
            decode_source(&utf16(text, false)),
            Ok((text.to_string(), SourceEncoding::Utf16Be))
        );
    }

    #[test]
    fn malformed_input() {
        let err = decode_source(b"ab\xFFcd").unwrap_err();
        assert_eq!(
            err,
            DecodeError {
                encoding: SourceEncoding::Utf8,
                offset: 2
            }
        );
        // Odd byte count.
        assert!(decode_source(&[0xFF, 0xFE, 0x41]).is_err());
        // Lone high surrogate.
        assert!(decode_source(&[0xFF, 0xFE, 0x00, 0xD8]).is_err());
    }
}
