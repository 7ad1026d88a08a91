//! Text rasterization.
//!
//! A text layer is written as a one-element SVG document the size of the
//! target surface, rasterized with resvg into a transparent pixmap and
//! pasted with its own coverage as the mask. The glyph outlines are
//! re-rasterized at the requested point size every time, so export text is
//! as sharp as the export resolution allows.

use std::collections::HashMap;
use std::fmt::Write;

use frame_core::{FontResolver, Point, ResolvedFont, Scale, TextLayer};
use image::{Rgba, RgbaImage};

use crate::font_cache::{FontCache, FALLBACK_FAMILY};
use crate::surface;

/// Resolver plus the persisted font name and family of a text layer.
type LookupKey = (FontResolver, String, String);

/// Draws text layers onto surfaces.
///
/// Font file lookups are remembered per resolver, so the fonts directory is
/// walked once per font rather than on every recomposite. Files added to the
/// directory afterwards are not seen by this rasterizer.
#[derive(Debug, Default)]
pub struct TextRasterizer {
    cache: FontCache,
    lookups: HashMap<LookupKey, ResolvedFont>,
}

impl TextRasterizer {
    /// Create a rasterizer with an empty font cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Font cache backing this rasterizer.
    #[must_use]
    pub const fn cache(&self) -> &FontCache {
        &self.cache
    }

    /// Draw `text` at `at` (top-left of the line box) in the space targeted
    /// by `scale`. Font problems degrade to the fallback family and never
    /// fail the draw.
    pub fn draw(
        &mut self,
        target: &mut RgbaImage,
        text: &TextLayer,
        at: Point,
        scale: Scale,
        fonts: &FontResolver,
    ) {
        if text.text().is_empty() {
            return;
        }
        let resolved = self.locate(text, fonts);
        let font = self.cache.get(resolved.path.as_deref());
        let size = text.render_size(scale);
        let (width, height) = target.dimensions();
        let svg = text_svg((width, height), text, at, size, &font.family);

        let options = usvg::Options {
            font_family: font.family.clone(),
            fontdb: font.database,
            ..usvg::Options::default()
        };
        let tree = match usvg::Tree::from_str(&svg, &options) {
            Ok(tree) => tree,
            Err(e) => {
                tracing::warn!("Text layer skipped, SVG rejected: {e}");
                return;
            }
        };
        let Some(mut pixmap) = tiny_skia::Pixmap::new(width, height) else {
            return;
        };
        resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());
        surface::paste_masked(target, &pixmap_to_rgba(&pixmap), Point::default());
    }
}

impl TextRasterizer {
    fn locate(&mut self, text: &TextLayer, fonts: &FontResolver) -> ResolvedFont {
        let key = (
            fonts.clone(),
            text.font_name().to_string(),
            text.font().family.clone(),
        );
        if let Some(resolved) = self.lookups.get(&key) {
            return resolved.clone();
        }
        let resolved = fonts.locate(&key.1, &key.2);
        if resolved.is_fallback {
            tracing::debug!("No font file for {:?} ({}), using fallback", key.2, key.1);
        }
        self.lookups.insert(key, resolved.clone());
        resolved
    }
}

fn text_svg(size: (u32, u32), text: &TextLayer, at: Point, font_size: u32, family: &str) -> String {
    let (width, height) = size;
    let baseline = i64::from(at.y) + i64::from(font_size);
    let family = if family == FALLBACK_FAMILY {
        family.to_string()
    } else {
        format!("'{}'", escape_xml(family))
    };
    let mut svg = String::with_capacity(256);
    let _ = write!(
        svg,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">\
         <text x=\"{}\" y=\"{baseline}\" font-size=\"{font_size}\" fill=\"{}\" font-family=\"{family}\" xml:space=\"preserve\">{}</text></svg>",
        at.x,
        text.color(),
        escape_xml(text.text()),
    );
    svg
}

fn pixmap_to_rgba(pixmap: &tiny_skia::Pixmap) -> RgbaImage {
    let mut out = RgbaImage::new(pixmap.width(), pixmap.height());
    for (dst, src) in out.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        *dst = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }
    out
}

/// Escape XML special characters.
fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
