//! The laid-out document: element tree plus layout output.

use std::path::Path;

use lumen_dom::{Color, DEFAULT_FONT_SIZE_PX, DomTree, ElementType};

use crate::config::LayoutConfig;
use crate::font::FontCollection;
use crate::formatted::FormattedElement;
use crate::image::{ImageCache, ImageDecoder};
use crate::layout::{FormattingState, LayoutEngine, LayoutError, check_inputs};
use crate::stylesheet::StyleSheet;

/// Owns an element tree, its style sheet, the image cache and the most
/// recent layout.
///
/// Every call to [`Document::layout`] clears the previous output and
/// rebuilds it from the tree, so repeated calls with the same inputs give
/// the same result.
#[derive(Debug)]
pub struct Document {
    tree: DomTree,
    style_sheet: StyleSheet,
    config: LayoutConfig,
    images: ImageCache,
    state: FormattingState,
    content: Vec<FormattedElement>,
    occupied: (f32, f32),
    viewport: (f32, f32),
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// An empty document with only the synthetic root.
    #[must_use]
    pub fn new() -> Self {
        Self::from_tree(DomTree::new())
    }

    /// Wrap a parsed tree, collecting its `<style>` rules.
    #[must_use]
    pub fn from_tree(tree: DomTree) -> Self {
        let style_sheet = StyleSheet::from_tree(&tree);
        Self {
            tree,
            style_sheet,
            config: LayoutConfig::default(),
            images: ImageCache::new(),
            state: FormattingState::default(),
            content: Vec::new(),
            occupied: (0.0, 0.0),
            viewport: (0.0, 0.0),
        }
    }

    /// Replace the layout configuration.
    #[must_use]
    pub fn with_config(mut self, config: LayoutConfig) -> Self {
        self.config = config;
        self
    }

    /// The element tree.
    #[must_use]
    pub const fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Replace the element tree. The style sheet is rebuilt and the
    /// previous layout output is discarded.
    pub fn set_tree(&mut self, tree: DomTree) {
        self.style_sheet = StyleSheet::from_tree(&tree);
        self.tree = tree;
        self.content.clear();
        self.occupied = (0.0, 0.0);
    }

    /// Rules from the document's `<style>` blocks.
    #[must_use]
    pub const fn style_sheet(&self) -> &StyleSheet {
        &self.style_sheet
    }

    /// Current layout configuration.
    #[must_use]
    pub const fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Mutable layout configuration; takes effect on the next layout.
    pub fn config_mut(&mut self) -> &mut LayoutConfig {
        &mut self.config
    }

    /// The image cache, for statistics.
    #[must_use]
    pub const fn images(&self) -> &ImageCache {
        &self.images
    }

    /// Install the decoder used for `img` sources.
    pub fn set_image_decoder(&mut self, decoder: Box<dyn ImageDecoder>) {
        self.images.set_decoder(decoder);
    }

    /// Directory relative image paths are resolved against, usually the
    /// directory of the source file.
    pub fn set_base_dir(&mut self, dir: Option<&Path>) {
        self.images.set_base_dir(dir);
    }

    /// Text of the first `<title>` element, trimmed.
    #[must_use]
    pub fn title(&self) -> Option<String> {
        let title = self.tree.find_first(self.tree.root(), ElementType::Title)?;
        let text = self.tree.text_content(title);
        let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
        (!text.is_empty()).then_some(text)
    }

    /// Lay the tree out into a `viewport` wide area.
    ///
    /// `keep_selection` is accepted for interface compatibility and has no
    /// effect: the output is always rebuilt from scratch.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError`] without touching the previous output if the
    /// font collection is incomplete or a size is not usable.
    pub fn layout(
        &mut self,
        viewport: (f32, f32),
        base_text_size: f32,
        base_fore_color: Color,
        base_opacity: f32,
        fonts: &FontCollection,
        _keep_selection: bool,
    ) -> Result<(), LayoutError> {
        check_inputs(viewport, base_text_size, fonts)?;

        self.content.clear();
        self.occupied = (0.0, 0.0);
        self.viewport = viewport;
        self.state = FormattingState::new(base_text_size, base_fore_color, base_opacity);

        let engine = LayoutEngine::new(
            &self.tree,
            &self.style_sheet,
            fonts,
            &self.config,
            &mut self.images,
            viewport.0,
            self.state.clone(),
        );
        let output = engine.run();

        self.content = output.content;
        self.occupied = output.occupied;
        self.state = output.state;
        Ok(())
    }

    /// [`Document::layout`] with the default text size, black text, full
    /// opacity and `keep_selection` off.
    ///
    /// # Errors
    ///
    /// See [`Document::layout`].
    pub fn layout_default(
        &mut self,
        viewport: (f32, f32),
        fonts: &FontCollection,
    ) -> Result<(), LayoutError> {
        self.layout(viewport, DEFAULT_FONT_SIZE_PX, Color::BLACK, 1.0, fonts, false)
    }

    /// Width and height covered by the last layout.
    #[must_use]
    pub const fn occupied_layout_size(&self) -> (f32, f32) {
        self.occupied
    }

    /// Primitives from the last layout, back to front.
    #[must_use]
    pub fn content(&self) -> &[FormattedElement] {
        &self.content
    }

    /// The formatting state layout was seeded with.
    #[must_use]
    pub const fn formatting_state(&self) -> &FormattingState {
        &self.state
    }

    /// Viewport of the last layout.
    #[must_use]
    pub const fn viewport(&self) -> (f32, f32) {
        self.viewport
    }
}
