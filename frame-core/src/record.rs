//! Persisted project format.
//!
//! A project document is a single JSON object:
//!
//! ```json
//! {
//!   "project_name": "frame_set",
//!   "app1": { "layers": [ ... ], "background_couleur": "#FFFFFF" },
//!   "app4": { "layers": [ ... ], "background_couleur": "#FFFFFF" },
//!   "template": "template_std.xml"
//! }
//! ```
//!
//! Each layer record is tagged by `class` and carries the shared fields
//! (`layer_type`, `name`, positions, flags) next to its variant fields.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::layer::{FontSelection, Layer, LayerKind, LayerType, TextLayer};
use crate::{HexColor, PanelConfig, Point, Rect};

/// Fields every layer record carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerHeader {
    /// Variant tag, redundant with `class`.
    pub layer_type: LayerType,
    /// Display label.
    pub name: String,
    /// Preview-space position.
    pub display_position: Point,
    /// Export-space position.
    pub image_position: Point,
    /// Visibility flag.
    #[serde(default = "default_true")]
    pub visible: bool,
    /// Lock flag.
    #[serde(default)]
    pub locked: bool,
}

const fn default_true() -> bool {
    true
}

/// Persisted image layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRecord {
    /// Shared fields.
    #[serde(flatten)]
    pub header: LayerHeader,
    /// Source file, `null` when nothing was imported.
    pub imported_image_path: Option<PathBuf>,
    /// Preview size at save time, so a resized image reloads at that size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_size: Option<[u32; 2]>,
}

/// Persisted text layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRecord {
    /// Shared fields.
    #[serde(flatten)]
    pub header: LayerHeader,
    /// Label content.
    pub text: String,
    /// Fill color as `#RRGGBB`.
    pub font_color: HexColor,
    /// Family and preview point size.
    pub sel_font: FontSelection,
    /// Resolved font file.
    pub font_name: String,
}

/// Persisted exclusion-zone layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneRecord {
    /// Shared fields.
    #[serde(flatten)]
    pub header: LayerHeader,
    /// Preview-space rectangles as `[x, y, w, h]`.
    pub exclusion_zone: Vec<Rect>,
}

/// One persisted layer, tagged by `class`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "class")]
pub enum LayerRecord {
    /// Image layer.
    #[serde(rename = "LayerImage")]
    Image(ImageRecord),
    /// Text layer.
    #[serde(rename = "LayerText")]
    Text(TextRecord),
    /// Exclusion-zone layer.
    #[serde(rename = "LayerExcluZone")]
    ExclusionZone(ZoneRecord),
}

impl LayerRecord {
    /// Shared fields.
    #[must_use]
    pub const fn header(&self) -> &LayerHeader {
        match self {
            Self::Image(r) => &r.header,
            Self::Text(r) => &r.header,
            Self::ExclusionZone(r) => &r.header,
        }
    }

    /// Rebuild a layer for a panel.
    ///
    /// Never fails: an image whose source cannot be read becomes an empty
    /// image layer that still remembers its path. The export position is
    /// recomputed from the display position and the panel ratio.
    #[must_use]
    pub fn into_layer(self, panel: &PanelConfig) -> Layer {
        let ratio = panel.ratio;
        let (header, mut layer) = match self {
            Self::Image(record) => {
                let mut layer = Layer::image(record.header.name.clone(), ratio);
                if let (Some(path), Some(image)) =
                    (record.imported_image_path.as_deref(), layer.as_image_mut())
                {
                    let size = record.display_size.map(|[w, h]| (w, h));
                    if let Err(e) = image.restore(path, size, panel.preview_width, ratio) {
                        tracing::warn!("Image layer {:?} restored empty: {e}", record.header.name);
                    }
                }
                (record.header, layer)
            }
            Self::Text(record) => {
                let text = TextLayer::from_parts(
                    record.text,
                    record.font_color,
                    record.sel_font,
                    record.font_name,
                );
                let layer = Layer::text(record.header.name.clone(), ratio, text);
                (record.header, layer)
            }
            Self::ExclusionZone(record) => {
                let layer =
                    Layer::exclusion_zone(record.header.name.clone(), ratio, record.exclusion_zone);
                (record.header, layer)
            }
        };
        layer.visible = header.visible;
        layer.locked = header.locked;
        layer.set_display_position(header.display_position);
        if layer.image_position() != header.image_position {
            tracing::debug!(
                "Layer {:?}: export position {:?} recomputed as {:?}",
                header.name,
                header.image_position,
                layer.image_position()
            );
        }
        layer
    }
}

impl From<&Layer> for LayerRecord {
    fn from(layer: &Layer) -> Self {
        let header = LayerHeader {
            layer_type: layer.layer_type(),
            name: layer.name.clone(),
            display_position: layer.display_position(),
            image_position: layer.image_position(),
            visible: layer.visible,
            locked: layer.locked,
        };
        match layer.kind() {
            LayerKind::Image(image) => Self::Image(ImageRecord {
                header,
                imported_image_path: image.source_path().map(Into::into),
                display_size: image.has_image().then(|| {
                    let (w, h) = image.preview_size();
                    [w, h]
                }),
            }),
            LayerKind::Text(text) => Self::Text(TextRecord {
                header,
                text: text.text().to_string(),
                font_color: text.color(),
                sel_font: text.font().clone(),
                font_name: text.font_name().to_string(),
            }),
            LayerKind::ExclusionZone(zone) => Self::ExclusionZone(ZoneRecord {
                header,
                exclusion_zone: zone.zones().to_vec(),
            }),
        }
    }
}

/// Persisted panel: layers top to bottom plus background.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelRecord {
    /// Layer records, index 0 on top.
    pub layers: Vec<LayerRecord>,
    /// Background as `#RRGGBB`.
    pub background_couleur: HexColor,
}

/// Persisted project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectDocument {
    /// Export base name; older documents omit it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    /// Single-photo panel.
    pub app1: PanelRecord,
    /// Four-photo panel.
    pub app4: PanelRecord,
    /// Active template identifier.
    pub template: String,
}
