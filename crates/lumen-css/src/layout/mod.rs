//! Single-pass layout of the element tree into formatted elements.
//!
//! The engine walks the tree once, depth first. Every element follows the
//! same protocol: snapshot the [`FormattingState`], apply the element's
//! intrinsic style and then its resolved style entries, advance the cursor
//! by the element's leading gap, open a box (background rectangle plus
//! margin/border/padding) if it has one, lay out the children, close the
//! box, apply the trailing gap and restore the snapshot.
//!
//! Lines are filled left to right. Items on a line share its bottom edge;
//! when a taller item arrives the items already on the line are moved down
//! so the line grows upward.

mod area;
mod list;
mod state;

#[cfg(feature = "layout-trace")]
use std::cell::Cell;

use lumen_common::LoadedImage;
use lumen_common::text::is_wrap_delimiter;
use lumen_common::warning::warn_once;
use lumen_dom::{
    Color, DomTree, Edges, ElementData, ElementType, Length, NodeId, NodeKind, StyleEntry,
    StyleFlags,
};
use thiserror::Error;

pub use area::LayoutArea;
pub use list::{BULLETS, ListData};
pub use state::FormattingState;

use crate::config::LayoutConfig;
use crate::font::{FontCollection, FontFamily, FontMetrics, FontRef, SharedMetrics, classify_family};
use crate::formatted::{FormattedElement, ImageSection, Rect, RectangleSection, TextSection};
use crate::image::ImageCache;
use crate::stylesheet::StyleSheet;

/// Slack allowed when comparing measured widths against available space.
const FIT_TOLERANCE: f32 = 0.01;

#[cfg(feature = "layout-trace")]
thread_local! {
    static LAYOUT_DEPTH: Cell<usize> = const { Cell::new(0) };
}

/// Rejected layout inputs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    /// One or more font packs are missing.
    #[error("font collection is incomplete: missing {}", family_list(.missing))]
    InvalidFontCollection {
        /// The packs that are absent.
        missing: Vec<FontFamily>,
    },
    /// The base text size is not a positive finite number.
    #[error("base text size must be positive and finite, got {0}")]
    InvalidTextSize(f32),
    /// The viewport has a negative or non-finite dimension.
    #[error("viewport must be non-negative and finite, got {width}x{height}")]
    InvalidViewport {
        /// Requested width.
        width: f32,
        /// Requested height.
        height: f32,
    },
}

fn family_list(families: &[FontFamily]) -> String {
    families
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Check the layout entry preconditions.
///
/// # Errors
///
/// Returns the first violated precondition.
pub fn check_inputs(
    viewport: (f32, f32),
    base_text_size: f32,
    fonts: &FontCollection,
) -> Result<(), LayoutError> {
    if !fonts.is_valid() {
        return Err(LayoutError::InvalidFontCollection {
            missing: fonts.missing_packs(),
        });
    }
    if !base_text_size.is_finite() || base_text_size <= 0.0 {
        return Err(LayoutError::InvalidTextSize(base_text_size));
    }
    let (width, height) = viewport;
    if !width.is_finite() || !height.is_finite() || width < 0.0 || height < 0.0 {
        return Err(LayoutError::InvalidViewport { width, height });
    }
    Ok(())
}

/// What a finished layout pass produced.
#[derive(Debug, Clone)]
pub struct LayoutOutput {
    /// Primitives, back to front.
    pub content: Vec<FormattedElement>,
    /// Width and height covered by the primitives, plus trailing margin.
    pub occupied: (f32, f32),
    /// The state after the pass; equal to the seed state.
    pub state: FormattingState,
}

/// Per-child facts the parent knows and the child needs.
#[derive(Debug, Clone, Copy)]
struct VisitContext {
    /// The previous sibling (or the parent, for a first child) ends a block.
    predecessor_was_block: bool,
    /// The parent has character data of its own next to this child.
    parent_has_text: bool,
}

/// Margin, border and padding applied by an open block.
#[derive(Debug, Clone, Copy)]
struct OpenBox {
    margin: Edges<f32>,
    inner: Edges<f32>,
    rect_index: Option<usize>,
}

/// A list marker waiting for its item's first inline primitive, so it
/// lands on the same line even when the item opens with a block.
#[derive(Debug, Clone)]
struct PendingMarker {
    node: NodeId,
    text: String,
    font: FontRef,
    left: f32,
    width: f32,
    height: f32,
    state: FormattingState,
}

/// One layout pass over a tree.
pub struct LayoutEngine<'a> {
    tree: &'a DomTree,
    sheet: &'a StyleSheet,
    fonts: &'a FontCollection,
    config: &'a LayoutConfig,
    images: &'a mut ImageCache,
    area: LayoutArea,
    state: FormattingState,
    content: Vec<FormattedElement>,
    pre_depth: usize,
    marker: Option<PendingMarker>,
}

impl<'a> LayoutEngine<'a> {
    /// Set up a pass over `tree` with a viewport `width` wide.
    ///
    /// Callers validate `fonts` with [`check_inputs`] first; faces missing
    /// from an invalid collection are skipped, not reported.
    pub fn new(
        tree: &'a DomTree,
        sheet: &'a StyleSheet,
        fonts: &'a FontCollection,
        config: &'a LayoutConfig,
        images: &'a mut ImageCache,
        width: f32,
        state: FormattingState,
    ) -> Self {
        Self {
            tree,
            sheet,
            fonts,
            config,
            images,
            area: LayoutArea::new(width),
            state,
            content: Vec::new(),
            pre_depth: 0,
            marker: None,
        }
    }

    /// Lay out every child of the root.
    #[must_use]
    pub fn run(mut self) -> LayoutOutput {
        let root = self.tree.root();
        self.visit_children(root, true);
        self.finish_line();

        let trailing = self.config.trailing_gap * self.line_height();
        let occupied = occupied_size(&self.content, trailing);
        LayoutOutput {
            content: self.content,
            occupied,
            state: self.state,
        }
    }

    fn face(&self, font: FontRef) -> Option<SharedMetrics> {
        self.fonts.face(font).cloned()
    }

    /// Line height of the current font at the current size.
    fn line_height(&self) -> f32 {
        self.face(self.state.font)
            .map_or(0.0, |m| m.line_height(self.state.text_height))
    }

    // ========== tree walk ==========

    fn visit_children(&mut self, parent: NodeId, parent_is_block: bool) {
        let tree = self.tree;
        let parent_has_text = has_direct_text(tree, parent);
        let mut predecessor_was_block = parent_is_block;

        for &child in tree.children(parent) {
            let ctx = VisitContext {
                predecessor_was_block,
                parent_has_text,
            };
            self.visit(child, ctx);

            match tree.get(child).map(|n| &n.kind) {
                Some(NodeKind::Element(data)) => {
                    predecessor_was_block = data.element_type.is_block_structuring();
                }
                Some(NodeKind::Text(text)) if !text.trim().is_empty() => {
                    predecessor_was_block = false;
                }
                _ => {}
            }
        }
    }

    fn visit(&mut self, node: NodeId, ctx: VisitContext) {
        let tree = self.tree;
        let Some(n) = tree.get(node) else {
            return;
        };
        match &n.kind {
            NodeKind::Document => self.visit_children(node, true),
            NodeKind::Comment(_) => {}
            NodeKind::Text(text) => self.layout_text(node, text),
            NodeKind::Element(data) => self.visit_element(node, data, ctx),
        }
    }

    fn visit_element(&mut self, node: NodeId, data: &ElementData, ctx: VisitContext) {
        let ty = data.element_type;

        #[cfg(feature = "layout-trace")]
        let _depth = trace_enter(node, ty, &self.area);

        match ty {
            ElementType::Head
            | ElementType::Title
            | ElementType::Style
            | ElementType::Script
            | ElementType::Comment
            | ElementType::Text => {}
            ElementType::Html => self.visit_children(node, true),
            ElementType::Break => self.new_line(),
            ElementType::Image => self.layout_image(node, data),
            _ => self.layout_element(node, data, ctx),
        }
    }

    /// The block protocol shared by every container element.
    fn layout_element(&mut self, node: NodeId, data: &ElementData, ctx: VisitContext) {
        let ty = data.element_type;
        let is_block =
            ty.is_block_structuring() || (ty == ElementType::Code && !ctx.parent_has_text);

        if ty == ElementType::ListItem {
            self.finish_line();
            self.begin_list_item();
        }

        let snapshot = self.state.clone();
        self.apply_intrinsic_style(ty, data);

        let style = self.sheet.computed_for(self.tree, node);
        let wants_rect = is_block && has_rect_style(ty, &style);
        self.apply_cascade(&style, wants_rect);

        if is_block {
            self.finish_line();
        }
        self.leading_gap(node, ty, ctx);

        let open_box = if is_block {
            self.open_box(node, &style, wants_rect)
        } else {
            None
        };

        if ty == ElementType::ListItem {
            self.emit_marker(node);
        }

        let first_emitted = self.content.len();
        if ty == ElementType::Preformatted {
            self.pre_depth += 1;
        }
        self.visit_children(node, is_block);
        if ty == ElementType::Preformatted {
            self.pre_depth = self.pre_depth.saturating_sub(1);
        }

        if ty == ElementType::Anchor {
            self.push_link_rects(node, first_emitted);
        }
        if ty == ElementType::ListItem {
            // An item without inline content still shows its marker.
            self.flush_marker();
        }

        if is_block {
            self.finish_line();
        }
        if let Some(open_box) = open_box {
            self.close_box(open_box);
        }
        self.trailing_gap(node, ty, is_block);

        if ty.is_list() {
            // The indent was applied by the first item; it is removed here,
            // when the list closes, not when that item closes.
            if let Some(list) = self.state.lists.last() {
                if list.inflated {
                    self.area.left -= self.config.list_indent;
                }
            }
        }

        self.state = snapshot;
    }

    // ========== style ==========

    fn apply_intrinsic_style(&mut self, ty: ElementType, data: &ElementData) {
        let state = &mut self.state;
        state.reset_box();
        if let Some(level) = ty.heading_level() {
            state.text_height *= self.config.heading_scale(level);
            state.font = state.font.emboldened();
            return;
        }
        match ty {
            ElementType::Emphasis | ElementType::Italic => state.font = state.font.slanted(),
            ElementType::Strong | ElementType::Bold => state.font = state.font.emboldened(),
            ElementType::Underline => state.underline = true,
            ElementType::Superscript => state.shift_baseline(true),
            ElementType::Subscript => state.shift_baseline(false),
            ElementType::UnorderedList => state.lists.push(ListData::new(false)),
            ElementType::OrderedList => state.lists.push(ListData::new(true)),
            ElementType::Preformatted | ElementType::Code => {
                state.font = state.font.with_family(FontFamily::Mono);
            }
            ElementType::Anchor => {
                state.fore_color = Color::LINK;
                state.underline = true;
                state.link = data.attribute("href").map(str::to_string);
            }
            _ => {}
        }
    }

    /// Apply the fields a resolved entry marks as set.
    fn apply_cascade(&mut self, style: &StyleEntry, opens_rect: bool) {
        let reference_width = self.area.width();
        let state = &mut self.state;

        if let Some(color) = style.fore_color() {
            state.fore_color = color;
        }
        if let Some(color) = style.back_color() {
            if !opens_rect {
                state.back_color = Some(color);
            }
        }
        if let Some(opacity) = style.opacity() {
            state.opacity *= opacity.clamp(0.0, 1.0);
        }
        if let Some(family) = style.font_family() {
            match classify_family(family) {
                Some(pack) => state.font = state.font.with_family(pack),
                None => {
                    let _printed = warn_once(
                        "Layout",
                        &format!(
                            "no font pack matches font-family '{family}', keeping {}",
                            state.font.family
                        ),
                    );
                }
            }
        }
        if let Some(bold) = style.bold() {
            state.font.bold = bold;
        }
        if let Some(italic) = style.italic() {
            state.font.italic = italic;
        }
        if let Some(size) = style.font_size() {
            let px = size.to_px(state.text_height);
            if px.is_finite() && px > 0.0 {
                state.text_height = px;
            } else {
                let _printed = warn_once(
                    "Layout",
                    &format!("ignoring font-size {}{}", size.value, size.unit),
                );
            }
        }
        if let Some(decoration) = style.text_decoration() {
            state.underline = decoration.underline;
            state.strikethrough = decoration.strikethrough;
        }
        if let Some(border) = style.border_width() {
            state.border_width = non_negative(border.to_px(reference_width));
        }
        if let Some(padding) = style.padding() {
            state.padding = non_negative(padding.to_px(reference_width));
        }
    }

    // ========== vertical rhythm ==========

    /// Move the cursor down by `ratio` lines of the current font.
    fn gap(&mut self, ratio: f32) {
        self.finish_line();
        self.area.top += ratio * self.line_height();
    }

    fn leading_gap(&mut self, node: NodeId, ty: ElementType, ctx: VisitContext) {
        let config = self.config;
        if ty.heading_level().is_some() {
            if !self.follows_heading(node) {
                self.gap(config.heading_gap);
            }
            return;
        }
        let ratio = match ty {
            ElementType::UnorderedList | ElementType::OrderedList => {
                (!self.parent_is_list_item(node)).then_some(config.list_gap)
            }
            ElementType::Paragraph => (!ctx.predecessor_was_block).then_some(config.paragraph_gap),
            ElementType::Division => (!ctx.predecessor_was_block).then_some(config.division_gap),
            ElementType::Preformatted => {
                (!ctx.predecessor_was_block).then_some(config.preformatted_gap)
            }
            ElementType::Code if !ctx.parent_has_text => {
                (!ctx.predecessor_was_block).then_some(config.code_gap)
            }
            _ => None,
        };
        if let Some(ratio) = ratio {
            self.gap(ratio);
        }
    }

    fn trailing_gap(&mut self, node: NodeId, ty: ElementType, is_block: bool) {
        let config = self.config;
        if ty.heading_level().is_some() {
            self.gap(config.heading_trailing_gap);
            return;
        }
        let ratio = match ty {
            ElementType::UnorderedList | ElementType::OrderedList => {
                (!self.parent_is_list_item(node)).then_some(config.list_gap)
            }
            ElementType::Paragraph => Some(config.paragraph_gap),
            ElementType::Division => Some(config.division_gap),
            ElementType::Preformatted => Some(config.preformatted_gap),
            ElementType::Code if is_block => Some(config.code_gap),
            _ => None,
        };
        if let Some(ratio) = ratio {
            self.gap(ratio);
        }
    }

    fn follows_heading(&self, node: NodeId) -> bool {
        self.tree
            .preceding_siblings(node)
            .find(|&id| is_significant(self.tree, id))
            .and_then(|id| self.tree.element_type(id))
            .is_some_and(|ty| ty.heading_level().is_some())
    }

    fn parent_is_list_item(&self, node: NodeId) -> bool {
        self.tree
            .parent(node)
            .and_then(|p| self.tree.element_type(p))
            == Some(ElementType::ListItem)
    }

    // ========== boxes ==========

    fn open_box(&mut self, node: NodeId, style: &StyleEntry, wants_rect: bool) -> Option<OpenBox> {
        let margin = style
            .margin()
            .map(|m| m.to_px(self.area.width()))
            .unwrap_or_default();
        let inner = self.state.border_width.add(self.state.padding);
        if !wants_rect && is_zero(margin) && is_zero(inner) {
            return None;
        }

        let rect_index = wants_rect.then(|| {
            let rect = Rect::new(
                self.area.left + margin.left,
                self.area.top + margin.top,
                self.area.right - margin.right,
                self.area.top + margin.top,
            );
            self.content
                .push(FormattedElement::Rectangle(RectangleSection {
                    node,
                    rect,
                    line_top: None,
                    back_color: style.back_color(),
                    border_color: style.border_color().unwrap_or(self.state.fore_color),
                    border_width: self.state.border_width,
                    opacity: self.state.opacity,
                    link: None,
                }));
            self.content.len() - 1
        });

        self.area.inflate(margin.add(inner));
        Some(OpenBox {
            margin,
            inner,
            rect_index,
        })
    }

    fn close_box(&mut self, open_box: OpenBox) {
        self.area.deflate(open_box.inner);
        if let Some(index) = open_box.rect_index {
            if let Some(FormattedElement::Rectangle(rect)) = self.content.get_mut(index) {
                rect.rect.bottom = self.area.top;
            }
        }
        self.area.deflate(open_box.margin);
    }

    // ========== lists ==========

    /// Count the item and, on a list's first item, indent the list.
    fn begin_list_item(&mut self) {
        let indent = self.config.list_indent;
        match self.state.lists.last_mut() {
            Some(list) => {
                list.index += 1;
                if !list.inflated {
                    list.inflated = true;
                    self.area.left += indent;
                }
            }
            None => {
                let _printed = warn_once("Layout", "list item outside of a list");
            }
        }
    }

    /// Prepare the item's bullet or number, hung left of the content edge.
    /// It is placed by [`Self::flush_marker`].
    fn emit_marker(&mut self, node: NodeId) {
        self.flush_marker();
        let depth = self.state.list_depth().max(1);
        let list = self.state.lists.last().copied().unwrap_or(ListData {
            ordered: false,
            index: 1,
            inflated: false,
        });
        let text = list.marker(depth);
        let font = if list.ordered {
            self.state.font
        } else {
            FontRef::regular(FontFamily::Mono)
        };
        let Some(metrics) = self.face(font) else {
            return;
        };
        let size = self.state.text_height;
        let width = metrics.text_width(&text, size);
        let height = metrics.line_height(size);
        self.marker = Some(PendingMarker {
            node,
            text,
            font,
            left: self.area.left - width - self.config.bullet_gap,
            width,
            height,
            state: self.state.clone(),
        });
    }

    /// Place the pending marker on the current line.
    fn flush_marker(&mut self) {
        let Some(marker) = self.marker.take() else {
            return;
        };
        let item_state = std::mem::replace(&mut self.state, marker.state);
        let rect = self.place_at(
            marker.left,
            marker.width,
            marker.height,
            self.state.baseline_shift,
        );
        self.push_text(marker.node, marker.text, rect, marker.font);
        self.state = item_state;
    }

    // ========== line placement ==========

    /// Start a new line. An empty line still advances by one line of the
    /// current font, so consecutive breaks leave blank lines.
    fn new_line(&mut self) {
        let advance = if self.area.line_height > 0.0 {
            self.area.line_height
        } else {
            self.line_height()
        };
        self.area.top += advance;
        self.area.run_length = 0.0;
        self.area.line_height = 0.0;
    }

    /// End the current line if anything is on it.
    fn finish_line(&mut self) {
        if !self.area.is_line_empty() {
            self.new_line();
        }
    }

    /// Place an item at the cursor and advance the cursor past it.
    fn place(&mut self, width: f32, height: f32) -> Rect {
        self.flush_marker();
        let left = self.area.cursor_x();
        let rect = self.place_at(left, width, height, self.state.baseline_shift);
        self.area.run_length += width;
        rect
    }

    /// Place an item on the current line at `left` without moving the
    /// cursor. Items sit on the line's bottom edge, offset by `shift`.
    fn place_at(&mut self, left: f32, width: f32, height: f32, shift: f32) -> Rect {
        let required = height + (-shift).max(0.0);
        if required > self.area.line_height {
            let delta = required - self.area.line_height;
            if self.area.line_height > 0.0 {
                self.lower_current_line(delta);
            }
            self.area.line_height = required;
        }
        let top = self.area.top + self.area.line_height - height + shift;
        Rect::from_origin_size(left, top, width, height)
    }

    /// Move every primitive already on the current line down by `delta`,
    /// newest first, stopping at the first one placed elsewhere.
    fn lower_current_line(&mut self, delta: f32) {
        let line_top = self.area.top;
        for item in self.content.iter_mut().rev() {
            if item.line_top() != Some(line_top) {
                break;
            }
            let rect = item.rect_mut();
            rect.top += delta;
            rect.bottom += delta;
        }
    }

    // ========== text ==========

    fn layout_text(&mut self, node: NodeId, text: &str) {
        if self.pre_depth > 0 {
            for (i, line) in text.split('\n').enumerate() {
                if i > 0 {
                    self.new_line();
                }
                self.layout_run(node, line);
            }
        } else {
            self.layout_run(node, text);
        }
    }

    /// Greedily pack `text` onto lines.
    fn layout_run(&mut self, node: NodeId, text: &str) {
        let font = self.state.font;
        let size = self.state.text_height;
        let Some(metrics) = self.face(font) else {
            return;
        };
        let height = metrics.line_height(size);
        let preformatted = self.pre_depth > 0;
        let mut rest = text;

        loop {
            if !preformatted && self.area.run_length <= 0.0 {
                rest = rest.trim_start_matches(' ');
            }
            if rest.is_empty() {
                break;
            }

            let available = self.area.remaining();
            let total = metrics.text_width(rest, size);
            if total <= available + FIT_TOLERANCE {
                self.emit_text(node, rest, total, height, font);
                break;
            }

            if let Some(split) = find_break(metrics.as_ref(), rest, size, available, total) {
                let head = trim_wrap_end(&rest[..split]);
                let width = metrics.text_width(head, size);
                self.emit_text(node, head, width, height, font);
                self.new_line();
                rest = &rest[split..];
            } else if self.area.run_length > 0.0 {
                // Nothing fits after what is already on this line.
                self.new_line();
            } else {
                // A single token wider than the whole line goes out alone.
                let end = token_end(rest);
                let head = trim_wrap_end(&rest[..end]);
                let width = metrics.text_width(head, size);
                self.emit_text(node, head, width, height, font);
                rest = &rest[end..];
                if !rest.is_empty() {
                    self.new_line();
                }
            }
        }
    }

    fn emit_text(&mut self, node: NodeId, text: &str, width: f32, height: f32, font: FontRef) {
        if text.is_empty() {
            return;
        }
        let rect = self.place(width, height);
        self.push_text(node, text.to_string(), rect, font);
    }

    fn push_text(&mut self, node: NodeId, text: String, rect: Rect, font: FontRef) {
        let state = &self.state;
        self.content.push(FormattedElement::TextSection(TextSection {
            node,
            rect,
            line_top: self.area.top,
            text,
            font,
            font_size: state.text_height,
            color: state.fore_color,
            opacity: state.opacity,
            underline: state.underline,
            strikethrough: state.strikethrough,
            back_color: state.back_color,
        }));
    }

    // ========== images ==========

    fn layout_image(&mut self, node: NodeId, data: &ElementData) {
        let snapshot = self.state.clone();
        self.state.reset_box();
        let style = self.sheet.computed_for(self.tree, node);
        let wants_rect = has_rect_style(ElementType::Image, &style);
        self.apply_cascade(&style, wants_rect);

        let loaded = match data.attribute("src") {
            Some(src) => match self.images.resolve(src) {
                Ok(image) => Some(image),
                Err(e) => {
                    let _printed = warn_once(
                        "Layout",
                        &format!("image '{}' unavailable: {e}", abbreviate(src)),
                    );
                    None
                }
            },
            None => {
                let _printed = warn_once("Layout", "img element without src");
                None
            }
        };

        let (width, height) = self.image_size(data, loaded.as_deref());
        let margin = style
            .margin()
            .map(|m| m.to_px(self.area.width()))
            .unwrap_or_default();
        let inner = self.state.border_width.add(self.state.padding);
        let outer = margin.add(inner);
        let outer_width = width + outer.horizontal();
        let outer_height = height + outer.vertical();

        if outer_width > self.area.remaining() + FIT_TOLERANCE && self.area.run_length > 0.0 {
            self.new_line();
        }
        let placed = self.place(outer_width, outer_height);
        let line_top = self.area.top;
        let border_box = placed.inset(margin);

        if wants_rect {
            self.content
                .push(FormattedElement::Rectangle(RectangleSection {
                    node,
                    rect: border_box,
                    line_top: Some(line_top),
                    back_color: style.back_color(),
                    border_color: style.border_color().unwrap_or(self.state.fore_color),
                    border_width: self.state.border_width,
                    opacity: self.state.opacity,
                    link: None,
                }));
        }

        let physical_size = loaded
            .as_ref()
            .map_or((0, 0), |image| (image.width(), image.height()));
        self.content.push(FormattedElement::Image(ImageSection {
            node,
            rect: border_box.inset(inner),
            line_top,
            image: loaded,
            logical_size: (width, height),
            physical_size,
            opacity: self.state.opacity,
        }));

        self.state = snapshot;
    }

    /// Render size: `width`/`height` attributes win over the decoded size;
    /// a single attribute keeps the decoded aspect ratio.
    fn image_size(&self, data: &ElementData, loaded: Option<&LoadedImage>) -> (f32, f32) {
        let reference = self.area.width();
        let attribute = |name: &str| {
            data.attribute(name)
                .and_then(Length::parse)
                .map(|l| l.to_px(reference))
                .filter(|v| v.is_finite() && *v >= 0.0)
        };
        let [placeholder_w, placeholder_h] = self.config.image_placeholder;
        let physical = loaded
            .map(LoadedImage::dimensions_f32)
            .filter(|&(w, h)| w > 0.0 && h > 0.0);

        match (attribute("width"), attribute("height"), physical) {
            (Some(w), Some(h), _) => (w, h),
            (Some(w), None, Some((pw, ph))) => (w, w * ph / pw),
            (None, Some(h), Some((pw, ph))) => (h * pw / ph, h),
            (Some(w), None, None) => (w, placeholder_h),
            (None, Some(h), None) => (placeholder_w, h),
            (None, None, Some(size)) => size,
            (None, None, None) => (placeholder_w, placeholder_h),
        }
    }

    // ========== links ==========

    /// Cover every text run and image the anchor emitted with a link
    /// rectangle. Each rectangle directly follows the primitive it covers,
    /// so the primitives of one line stay contiguous for
    /// [`Self::lower_current_line`].
    fn push_link_rects(&mut self, node: NodeId, first: usize) {
        let Some(href) = self.state.link.clone() else {
            return;
        };
        let emitted = self.content.split_off(first.min(self.content.len()));
        self.content.reserve(emitted.len() * 2);
        for element in emitted {
            let link = self.covers_with_link(&element).then(|| {
                FormattedElement::Rectangle(RectangleSection {
                    node,
                    rect: *element.rect(),
                    line_top: element.line_top(),
                    back_color: None,
                    border_color: Color::TRANSPARENT,
                    border_width: Edges::default(),
                    opacity: 1.0,
                    link: Some(href.clone()),
                })
            });
            self.content.push(element);
            self.content.extend(link);
        }
    }

    /// Text runs and images are clickable; list markers are not.
    fn covers_with_link(&self, element: &FormattedElement) -> bool {
        match element {
            FormattedElement::TextSection(_) | FormattedElement::Image(_) => {
                self.tree.element_type(element.node()) != Some(ElementType::ListItem)
            }
            FormattedElement::Rectangle(_) => false,
        }
    }
}

/// Elements eligible for a background/border rectangle, when their resolved
/// style sets a background, border or opacity.
fn has_rect_style(ty: ElementType, style: &StyleEntry) -> bool {
    let eligible = matches!(
        ty,
        ElementType::Body
            | ElementType::UnorderedList
            | ElementType::OrderedList
            | ElementType::Paragraph
            | ElementType::Preformatted
            | ElementType::Code
            | ElementType::Division
            | ElementType::Image
    );
    eligible
        && style.flags().intersects(
            StyleFlags::BACK_COLOR
                | StyleFlags::BORDER_COLOR
                | StyleFlags::BORDER_WIDTH
                | StyleFlags::OPACITY,
        )
}

/// Whether `parent` has a text child that is not just whitespace.
fn has_direct_text(tree: &DomTree, parent: NodeId) -> bool {
    tree.children(parent)
        .iter()
        .filter_map(|&c| tree.as_text(c))
        .any(|t| !t.trim().is_empty())
}

/// Elements and non-blank text count as siblings; comments and
/// whitespace-only text do not.
fn is_significant(tree: &DomTree, id: NodeId) -> bool {
    match tree.get(id).map(|n| &n.kind) {
        Some(NodeKind::Element(_)) => true,
        Some(NodeKind::Text(text)) => !text.trim().is_empty(),
        _ => false,
    }
}

fn is_zero(edges: Edges<f32>) -> bool {
    edges.horizontal() == 0.0 && edges.vertical() == 0.0
}

fn non_negative(edges: Edges<f32>) -> Edges<f32> {
    edges.map(|v| if v.is_finite() { v.max(0.0) } else { 0.0 })
}

/// Drop trailing spaces and tabs from a line's last run.
fn trim_wrap_end(text: &str) -> &str {
    text.trim_end_matches([' ', '\t'])
}

/// Byte offset just past the first wrap delimiter after the first
/// character, or the end of `text`.
fn token_end(text: &str) -> usize {
    text.char_indices()
        .skip(1)
        .find(|&(_, c)| is_wrap_delimiter(c))
        .map_or(text.len(), |(i, c)| i + c.len_utf8())
}

/// Byte offset after the last delimiter whose prefix fits in `available`.
///
/// The search starts at an offset proportional to `available / total`,
/// walks back to the nearest delimiter that fits, then forward over any
/// later delimiters that still fit. Every candidate is measured.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn find_break(
    metrics: &(dyn FontMetrics + Send + Sync),
    text: &str,
    size: f32,
    available: f32,
    total: f32,
) -> Option<usize> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let count = chars.len();
    if count == 0 || total <= 0.0 {
        return None;
    }
    let ratio = (available / total).clamp(0.0, 1.0);
    let estimate = ((count as f32 * ratio) as usize).min(count - 1);

    let fits = |end: usize| {
        let head = trim_wrap_end(&text[..end]);
        !head.is_empty() && metrics.text_width(head, size) <= available + FIT_TOLERANCE
    };
    let end_of = |(i, c): (usize, char)| i + c.len_utf8();

    let mut best = chars[..=estimate]
        .iter()
        .rev()
        .filter(|&&(_, c)| is_wrap_delimiter(c))
        .map(|&ic| end_of(ic))
        .find(|&end| fits(end));

    for &ic in chars[estimate + 1..]
        .iter()
        .filter(|&&(_, c)| is_wrap_delimiter(c))
    {
        let end = end_of(ic);
        if !fits(end) {
            break;
        }
        best = Some(end);
    }
    best
}

/// Max right edge, and max bottom edge plus `trailing`.
fn occupied_size(content: &[FormattedElement], trailing: f32) -> (f32, f32) {
    if content.is_empty() {
        return (0.0, 0.0);
    }
    let right = content.iter().map(|e| e.rect().right).fold(0.0, f32::max);
    let bottom = content.iter().map(|e| e.rect().bottom).fold(0.0, f32::max);
    (right, bottom + trailing)
}

/// Shorten long `src` values (usually data URLs) for log messages.
fn abbreviate(src: &str) -> String {
    const LIMIT: usize = 48;
    if src.chars().count() <= LIMIT {
        src.to_string()
    } else {
        let head: String = src.chars().take(LIMIT).collect();
        format!("{head}\u{2026}")
    }
}

/// Decrements the trace depth counter on all return paths.
#[cfg(feature = "layout-trace")]
struct DepthGuard;

#[cfg(feature = "layout-trace")]
impl Drop for DepthGuard {
    fn drop(&mut self) {
        LAYOUT_DEPTH.with(|d| d.set(d.get() - 1));
    }
}

#[cfg(feature = "layout-trace")]
fn trace_enter(node: NodeId, ty: ElementType, area: &LayoutArea) -> DepthGuard {
    let depth = LAYOUT_DEPTH.with(|d| {
        let current = d.get();
        d.set(current + 1);
        current
    });
    eprintln!(
        "[LAYOUT DEPTH] depth={depth} node={node} element={ty} left={:.1} right={:.1} top={:.1} run={:.1}",
        area.left, area.right, area.top, area.run_length
    );
    DepthGuard
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::ApproximateFontMetrics;

    #[test]
    fn break_search_measures_candidates() {
        let m = ApproximateFontMetrics::new(1.0, 1.0);
        // 1px per char at size 1.
        let text = "aaa bbb ccc";
        assert_eq!(find_break(&m, text, 1.0, 7.0, 11.0), Some(8));
        assert_eq!(find_break(&m, text, 1.0, 3.0, 11.0), Some(4));
        assert_eq!(find_break(&m, text, 1.0, 2.0, 11.0), None);
    }

    #[test]
    fn break_search_accepts_hyphens() {
        let m = ApproximateFontMetrics::new(1.0, 1.0);
        assert_eq!(find_break(&m, "well-known fact", 1.0, 6.0, 15.0), Some(5));
    }

    #[test]
    fn lone_token_end() {
        assert_eq!(token_end("abc def"), 4);
        assert_eq!(token_end("abcdef"), 6);
        assert_eq!(token_end(" abc"), 4);
    }

    #[test]
    fn inputs_are_checked() {
        let fonts = FontCollection::approximate();
        assert!(check_inputs((100.0, 100.0), 16.0, &fonts).is_ok());
        assert_eq!(
            check_inputs((100.0, 100.0), 0.0, &fonts),
            Err(LayoutError::InvalidTextSize(0.0))
        );
        assert!(matches!(
            check_inputs((f32::NAN, 100.0), 16.0, &fonts),
            Err(LayoutError::InvalidViewport { .. })
        ));
        let empty = FontCollection::default();
        let err = check_inputs((100.0, 100.0), 16.0, &empty).unwrap_err();
        assert_eq!(
            err.to_string(),
            "font collection is incomplete: missing sans-serif, serif, monospace"
        );
    }
}
