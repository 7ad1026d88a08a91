//! Layers - the building blocks of a panel.
//!
//! A [`Layer`] carries the state every variant shares (name, positions,
//! visibility, lock) and a [`LayerKind`] payload. Behaviour that differs per
//! variant is dispatched by matching on the kind.

mod image;
mod text;
mod zone;

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

pub use self::image::ImageLayer;
pub use self::text::{
    FontSelection, TextLayer, DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE, DEFAULT_TEXT, MIN_FONT_SIZE,
};
pub use self::zone::ExclusionZoneLayer;

use crate::controls::{ControlField, ControlPanel};
use crate::{FrameResult, Point, Rect, Scale};

/// Preview pixels added or removed per wheel notch on an image layer.
pub const IMAGE_WHEEL_STEP: i32 = 10;

/// Points added or removed per wheel notch on a text layer.
pub const TEXT_WHEEL_STEP: i32 = 2;

/// Suffix appended to the name of a cloned layer.
pub const CLONE_SUFFIX: &str = "-copy";

/// Discriminant of a layer variant, persisted as `layer_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LayerType {
    /// Imported raster.
    #[serde(rename = "image")]
    Image,
    /// Text label.
    #[serde(rename = "text")]
    Text,
    /// Transparent photo zones.
    #[serde(rename = "ZoneEx")]
    ZoneEx,
}

impl LayerType {
    /// Human label used when auto-naming layers.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Image => "Image",
            Self::Text => "Text",
            Self::ZoneEx => "Zone",
        }
    }
}

impl fmt::Display for LayerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Variant payload of a layer.
#[derive(Debug, Clone)]
pub enum LayerKind {
    /// Imported raster.
    Image(ImageLayer),
    /// Text label.
    Text(TextLayer),
    /// Transparent photo zones.
    ExclusionZone(ExclusionZoneLayer),
}

/// A layer of a panel.
///
/// `image_position` is kept equal to `display_position * ratio` by every
/// mutation.
#[derive(Debug, Clone)]
pub struct Layer {
    /// Display label.
    pub name: String,
    /// Skipped by both composites when false.
    pub visible: bool,
    /// Ignores drag and resize input when true.
    pub locked: bool,
    display_position: Point,
    image_position: Point,
    ratio: u32,
    kind: LayerKind,
}

impl Layer {
    /// Create a layer at the origin.
    #[must_use]
    pub fn new(name: impl Into<String>, ratio: u32, kind: LayerKind) -> Self {
        Self {
            name: name.into(),
            visible: true,
            locked: false,
            display_position: Point::default(),
            image_position: Point::default(),
            ratio,
            kind,
        }
    }

    /// Create an empty image layer.
    #[must_use]
    pub fn image(name: impl Into<String>, ratio: u32) -> Self {
        Self::new(name, ratio, LayerKind::Image(ImageLayer::default()))
    }

    /// Create a text layer with default content.
    #[must_use]
    pub fn text(name: impl Into<String>, ratio: u32, text: TextLayer) -> Self {
        Self::new(name, ratio, LayerKind::Text(text))
    }

    /// Create an exclusion-zone layer.
    #[must_use]
    pub fn exclusion_zone(name: impl Into<String>, ratio: u32, zones: Vec<Rect>) -> Self {
        Self::new(
            name,
            ratio,
            LayerKind::ExclusionZone(ExclusionZoneLayer::new(zones)),
        )
    }

    /// Variant tag.
    #[must_use]
    pub const fn layer_type(&self) -> LayerType {
        match self.kind {
            LayerKind::Image(_) => LayerType::Image,
            LayerKind::Text(_) => LayerType::Text,
            LayerKind::ExclusionZone(_) => LayerType::ZoneEx,
        }
    }

    /// Whether this layer holds exclusion zones.
    #[must_use]
    pub const fn is_exclusion_zone(&self) -> bool {
        matches!(self.kind, LayerKind::ExclusionZone(_))
    }

    /// Export/preview ratio this layer was built for.
    #[must_use]
    pub const fn ratio(&self) -> u32 {
        self.ratio
    }

    /// Position in preview space.
    #[must_use]
    pub const fn display_position(&self) -> Point {
        self.display_position
    }

    /// Position in export space.
    #[must_use]
    pub const fn image_position(&self) -> Point {
        self.image_position
    }

    /// Position in the space targeted by `scale`.
    #[must_use]
    pub const fn position(&self, scale: Scale) -> Point {
        if scale.is_export() {
            self.image_position
        } else {
            self.display_position
        }
    }

    /// Move to a preview-space position, keeping export space in sync.
    pub fn set_display_position(&mut self, position: Point) {
        self.display_position = position;
        self.image_position = position.scaled(self.ratio);
    }

    /// Whether pointer and wheel input affect this layer.
    #[must_use]
    pub const fn accepts_input(&self) -> bool {
        self.visible && !self.locked
    }

    /// Move by a preview-space delta. Returns whether the layer moved.
    pub fn drag(&mut self, delta: Point) -> bool {
        if !self.accepts_input() {
            return false;
        }
        self.set_display_position(self.display_position.offset(delta));
        true
    }

    /// Apply one wheel notch: images grow/shrink by [`IMAGE_WHEEL_STEP`]
    /// pixels, text by [`TEXT_WHEEL_STEP`] points. Returns whether anything
    /// changed.
    pub fn wheel(&mut self, grow: bool) -> bool {
        if self.locked {
            return false;
        }
        let sign = if grow { 1 } else { -1 };
        match &mut self.kind {
            LayerKind::Image(image) => image.resize(sign * IMAGE_WHEEL_STEP, self.ratio),
            LayerKind::Text(text) => {
                text.resize_font(sign * TEXT_WHEEL_STEP);
                true
            }
            LayerKind::ExclusionZone(_) => false,
        }
    }

    /// Deep copy with a `-copy` name suffix. Raster buffers are never shared
    /// with the original.
    #[must_use]
    pub fn clone_layer(&self) -> Self {
        let mut copy = self.clone();
        copy.name.push_str(CLONE_SUFFIX);
        copy
    }

    /// Rebuild this layer for a panel with another ratio.
    #[must_use]
    pub fn with_ratio(mut self, ratio: u32) -> Self {
        if ratio != self.ratio {
            self.ratio = ratio;
            self.set_display_position(self.display_position);
            if let LayerKind::Image(image) = &mut self.kind {
                image.rescale(ratio);
            }
        }
        self
    }

    /// Variant payload.
    #[must_use]
    pub const fn kind(&self) -> &LayerKind {
        &self.kind
    }

    /// Image payload, if this is an image layer.
    #[must_use]
    pub const fn as_image(&self) -> Option<&ImageLayer> {
        match &self.kind {
            LayerKind::Image(image) => Some(image),
            _ => None,
        }
    }

    /// Mutable image payload.
    pub fn as_image_mut(&mut self) -> Option<&mut ImageLayer> {
        match &mut self.kind {
            LayerKind::Image(image) => Some(image),
            _ => None,
        }
    }

    /// Text payload, if this is a text layer.
    #[must_use]
    pub const fn as_text(&self) -> Option<&TextLayer> {
        match &self.kind {
            LayerKind::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Mutable text payload.
    pub fn as_text_mut(&mut self) -> Option<&mut TextLayer> {
        match &mut self.kind {
            LayerKind::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Exclusion payload, if this is an exclusion-zone layer.
    #[must_use]
    pub const fn as_exclusion_zone(&self) -> Option<&ExclusionZoneLayer> {
        match &self.kind {
            LayerKind::ExclusionZone(zone) => Some(zone),
            _ => None,
        }
    }

    /// Mutable exclusion payload.
    pub fn as_exclusion_zone_mut(&mut self) -> Option<&mut ExclusionZoneLayer> {
        match &mut self.kind {
            LayerKind::ExclusionZone(zone) => Some(zone),
            _ => None,
        }
    }

    /// Import an image file into an image layer.
    ///
    /// # Errors
    ///
    /// Propagates [`ImageLayer::import`] failures. Non-image layers are left
    /// untouched and return [`crate::FrameError::InvalidOperation`].
    pub fn import_image(&mut self, path: &Path, preview_width: u32) -> FrameResult<()> {
        let ratio = self.ratio;
        match &mut self.kind {
            LayerKind::Image(image) => image.import(path, preview_width, ratio),
            _ => Err(crate::FrameError::InvalidOperation(format!(
                "{} is not an image layer",
                self.name
            ))),
        }
    }

    /// Fill `panel` with this layer's editable fields, clearing it first.
    pub fn describe_controls(&self, panel: &mut dyn ControlPanel) {
        panel.clear();
        match &self.kind {
            LayerKind::Image(image) => {
                panel.push(ControlField::Label(format!("image layer {}", self.name)));
                panel.push(ControlField::Source(image.source_path().map(Path::to_path_buf)));
                if image.has_image() {
                    let (width, height) = image.preview_size();
                    panel.push(ControlField::Size { width, height });
                }
            }
            LayerKind::Text(text) => {
                panel.push(ControlField::Label(format!("text layer {}", self.name)));
                panel.push(ControlField::Text(text.text().to_string()));
                panel.push(ControlField::Color(text.color()));
                panel.push(ControlField::Font {
                    family: text.font().family.clone(),
                    size: text.font().size,
                });
            }
            LayerKind::ExclusionZone(zone) => {
                panel.push(ControlField::Label("exclusion zone layer".to_string()));
                panel.push(ControlField::ZoneCount(zone.zones().len()));
            }
        }
    }
}
