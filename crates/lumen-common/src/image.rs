//! Image data types shared across viewer components.

/// Decoded image data for a loaded image resource.
///
/// Contains the decoded RGBA pixel data and physical dimensions. The layout
/// engine only reads the dimensions; the pixels travel through to the paint
/// backend untouched.
#[derive(Clone, PartialEq, Eq)]
pub struct LoadedImage {
    /// Physical width of the image in pixels.
    width: u32,
    /// Physical height of the image in pixels.
    height: u32,
    /// Raw RGBA pixel data (width * height * 4 bytes).
    rgba_data: Vec<u8>,
}

impl LoadedImage {
    /// Create a new `LoadedImage` from decoded RGBA pixel data.
    ///
    /// # Arguments
    ///
    /// * `width` - Physical width of the image in pixels
    /// * `height` - Physical height of the image in pixels
    /// * `rgba_data` - Raw RGBA pixel data (should be `width * height * 4` bytes)
    #[must_use]
    pub const fn new(width: u32, height: u32, rgba_data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            rgba_data,
        }
    }

    /// Physical width of the image in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Physical height of the image in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Physical dimensions as `(width, height)` in `f32`, for layout.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn dimensions_f32(&self) -> (f32, f32) {
        (self.width as f32, self.height as f32)
    }

    /// Raw RGBA pixel data.
    #[must_use]
    pub fn rgba_data(&self) -> &[u8] {
        &self.rgba_data
    }
}

impl std::fmt::Debug for LoadedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.rgba_data.len())
            .finish()
    }
}
