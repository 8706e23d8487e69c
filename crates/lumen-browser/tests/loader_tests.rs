//! End-to-end tests: file on disk to laid-out document.

use std::fs;
use std::io::Cursor;
use std::path::PathBuf;

use lumen_browser::{LoadError, SourceEncoding, load_document, parse_document};
use lumen_css::{FontCollection, FormattedElement};

/// Helper to create a scratch directory unique to one test
fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("lumen-browser-{}-{name}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_png(path: &std::path::Path, width: u32, height: u32) {
    let buffer = image::RgbaImage::from_pixel(width, height, image::Rgba([0, 0, 0, 255]));
    let mut out = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgba8(buffer)
        .write_to(&mut out, image::ImageFormat::Png)
        .unwrap();
    fs::write(path, out.into_inner()).unwrap();
}

#[test]
fn test_load_resolves_images_next_to_the_file() {
    let dir = scratch_dir("images");
    write_png(&dir.join("dot.png"), 4, 3);
    let page = dir.join("page.html");
    fs::write(&page, "<p>see <img src=\"dot.png\"/></p>").unwrap();

    let mut loaded = load_document(&page).unwrap();
    assert!(loaded.diagnostics.is_empty());
    assert_eq!(loaded.encoding, SourceEncoding::Utf8);

    loaded
        .document
        .layout_default((400.0, 300.0), &FontCollection::approximate())
        .unwrap();
    let image = loaded
        .document
        .content()
        .iter()
        .find_map(FormattedElement::as_image)
        .unwrap();
    assert_eq!(image.physical_size, (4, 3));
    assert_eq!(image.logical_size, (4.0, 3.0));
    assert!(image.image.is_some());

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_load_utf16_source() {
    let dir = scratch_dir("utf16");
    let page = dir.join("page.html");
    let mut bytes = vec![0xFF, 0xFE];
    for unit in "<p>caf\u{e9}</p>".encode_utf16() {
        bytes.extend_from_slice(&unit.to_le_bytes());
    }
    fs::write(&page, bytes).unwrap();

    let loaded = load_document(&page).unwrap();
    assert_eq!(loaded.encoding, SourceEncoding::Utf16Le);
    assert_eq!(loaded.source, "<p>caf\u{e9}</p>");

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_missing_file_is_an_error() {
    let err = load_document(std::path::Path::new("/nonexistent/lumen/page.html")).unwrap_err();
    assert!(matches!(err, LoadError::Io { .. }));
    assert!(err.to_string().contains("/nonexistent/lumen/page.html"));
}

#[test]
fn test_invalid_utf8_is_an_error() {
    let dir = scratch_dir("badutf8");
    let page = dir.join("page.html");
    fs::write(&page, b"<p>\xC3</p>").unwrap();
    let err = load_document(&page).unwrap_err();
    assert!(matches!(err, LoadError::Decode { .. }));
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_parse_diagnostics_are_kept() {
    let loaded = parse_document("<p>unclosed <b>bold</p>");
    assert!(!loaded.diagnostics.is_empty());
}

#[test]
fn test_undecodable_image_falls_back_to_placeholder() {
    let dir = scratch_dir("badimage");
    fs::write(dir.join("broken.png"), b"not a png").unwrap();
    let page = dir.join("page.html");
    fs::write(&page, "<p><img src=\"broken.png\"/></p>").unwrap();

    let mut loaded = load_document(&page).unwrap();
    loaded
        .document
        .layout_default((400.0, 300.0), &FontCollection::approximate())
        .unwrap();
    let image = loaded
        .document
        .content()
        .iter()
        .find_map(FormattedElement::as_image)
        .unwrap();
    assert!(image.image.is_none());
    assert_eq!(loaded.document.images().decode_attempts(), 1);

    fs::remove_dir_all(&dir).unwrap();
}
