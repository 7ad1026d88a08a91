//! Preview and export composites of a panel.

use frame_core::{Editor, Layer, LayerKind, Scale};
use image::RgbaImage;

use crate::surface;
use crate::text::TextRasterizer;

/// Paints editors onto fresh surfaces.
///
/// The stack is walked from the last layer to the first, so index 0 ends up
/// on top. Exclusion zones are painted at their own stack position: a layer
/// above the zone layer can cover the cutout again.
#[derive(Debug, Default)]
pub struct Compositor {
    text: TextRasterizer,
}

impl Compositor {
    /// Create a compositor.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Text rasterizer (and its font cache).
    #[must_use]
    pub const fn text(&self) -> &TextRasterizer {
        &self.text
    }

    /// Composite at preview resolution.
    pub fn render_preview(&mut self, editor: &Editor) -> RgbaImage {
        self.composite(editor, Scale::preview(editor.panel().ratio))
    }

    /// Composite at export resolution.
    pub fn export_composite(&mut self, editor: &Editor) -> RgbaImage {
        self.composite(editor, Scale::export(editor.panel().ratio))
    }

    /// Composite in the space targeted by `scale`.
    pub fn composite(&mut self, editor: &Editor, scale: Scale) -> RgbaImage {
        let (width, height) = if scale.is_export() {
            editor.panel().export_size()
        } else {
            editor.panel().preview_size()
        };
        let mut target = surface::solid(width, height, editor.background());
        for layer in editor.layers().iter().rev() {
            self.paint(&mut target, layer, scale, editor);
        }
        tracing::debug!(
            "Composited {} layer(s) at {width}x{height} ({:?})",
            editor.len(),
            scale.space
        );
        target
    }

    fn paint(&mut self, target: &mut RgbaImage, layer: &Layer, scale: Scale, editor: &Editor) {
        if !layer.visible {
            return;
        }
        let at = layer.position(scale);
        match layer.kind() {
            LayerKind::Image(image) => {
                if let Some(raster) = image.raster(scale) {
                    surface::paste_masked(target, raster, at);
                }
            }
            LayerKind::Text(text) => self.text.draw(target, text, at, scale, editor.fonts()),
            LayerKind::ExclusionZone(zone) => {
                for rect in zone.zones() {
                    surface::punch_rect(target, scale.rect(*rect));
                }
            }
        }
    }
}
