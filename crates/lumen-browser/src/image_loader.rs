//! Raster image decoding via the `image` crate.
//!
//! [§ 4.8.3 The img element](https://html.spec.whatwg.org/multipage/embedded-content.html#the-img-element)
//!
//! Fetching and caching live in `lumen_css::image`; this module only turns
//! bytes into RGBA pixels.

use lumen_common::LoadedImage;
use lumen_css::{ImageDecoder, ImageError};

/// Decodes raster images (PNG, JPEG, GIF, BMP, ...) via the `image` crate.
///
/// The format is sniffed from the bytes, so the `src` extension does not
/// matter.
#[derive(Debug, Clone, Copy, Default)]
pub struct RasterDecoder;

impl ImageDecoder for RasterDecoder {
    fn name(&self) -> &'static str {
        "Raster (image crate)"
    }

    fn decode(&self, bytes: &[u8]) -> Result<LoadedImage, ImageError> {
        let dynamic_img = image::load_from_memory(bytes)
            .map_err(|e| ImageError::Decode(format!("could not decode image ({e})")))?;
        let rgba = dynamic_img.to_rgba8();
        let (w, h) = rgba.dimensions();
        Ok(LoadedImage::new(w, h, rgba.into_raw()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Encode a solid-color RGBA image as PNG.
    fn png(width: u32, height: u32) -> Vec<u8> {
        let buffer = image::RgbaImage::from_pixel(width, height, image::Rgba([10, 20, 30, 255]));
        let mut out = std::io::Cursor::new(Vec::new());
        image::DynamicImage::ImageRgba8(buffer)
            .write_to(&mut out, image::ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    #[test]
    fn decodes_png() {
        let image = RasterDecoder.decode(&png(3, 2)).unwrap();
        assert_eq!((image.width(), image.height()), (3, 2));
        assert_eq!(image.rgba_data().len(), 3 * 2 * 4);
        assert_eq!(&image.rgba_data()[..4], &[10, 20, 30, 255]);
    }

    #[test]
    fn rejects_garbage() {
        let err = RasterDecoder.decode(b"definitely not an image").unwrap_err();
        assert!(matches!(err, ImageError::Decode(_)));
    }
}
