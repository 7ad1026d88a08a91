//! Layer stack of one panel.
//!
//! Index 0 is the topmost layer: composites iterate the stack in reverse so
//! it is painted last. Exactly one exclusion-zone layer normally exists per
//! editor; it cannot be deleted.

use std::path::Path;

use crate::event::PanelEvent;
use crate::fonts::FontResolver;
use crate::layer::{FontSelection, Layer, LayerType, TextLayer, DEFAULT_FONT_FAMILY};
use crate::{FrameResult, HexColor, PanelConfig, Point, Rect};

/// Editable composition of one printed panel.
#[derive(Debug, Clone)]
pub struct Editor {
    layers: Vec<Layer>,
    active: Option<usize>,
    background: HexColor,
    panel: PanelConfig,
    fonts: FontResolver,
    drag_anchor: Option<Point>,
    dirty: bool,
}

impl Editor {
    /// Create an empty editor with a white background.
    #[must_use]
    pub fn new(panel: PanelConfig, fonts: FontResolver) -> Self {
        Self {
            layers: Vec::new(),
            active: None,
            background: HexColor::WHITE,
            panel,
            fonts,
            drag_anchor: None,
            dirty: true,
        }
    }

    /// Create an editor holding one exclusion-zone layer over `zones`.
    #[must_use]
    pub fn with_zones(panel: PanelConfig, fonts: FontResolver, zones: Vec<Rect>) -> Self {
        let mut editor = Self::new(panel, fonts);
        editor.add_exclusion_zone_layer(zones);
        editor
    }

    /// Panel dimensions and ratio.
    #[must_use]
    pub const fn panel(&self) -> &PanelConfig {
        &self.panel
    }

    /// Font resolver used for text layers.
    #[must_use]
    pub const fn fonts(&self) -> &FontResolver {
        &self.fonts
    }

    /// Background fill.
    #[must_use]
    pub const fn background(&self) -> HexColor {
        self.background
    }

    /// Layers, index 0 on top.
    #[must_use]
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Layer at `index`.
    #[must_use]
    pub fn layer(&self, index: usize) -> Option<&Layer> {
        self.layers.get(index)
    }

    /// Number of layers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Whether the stack holds no layer at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Selected layer index.
    #[must_use]
    pub const fn active_index(&self) -> Option<usize> {
        self.active
    }

    /// Selected layer.
    #[must_use]
    pub fn active_layer(&self) -> Option<&Layer> {
        self.active.and_then(|i| self.layers.get(i))
    }

    fn active_layer_mut(&mut self) -> Option<&mut Layer> {
        self.active.and_then(|i| self.layers.get_mut(i))
    }

    /// Total number of exclusion rectangles across the stack.
    #[must_use]
    pub fn zone_count(&self) -> usize {
        self.layers
            .iter()
            .filter_map(Layer::as_exclusion_zone)
            .map(|zone| zone.zones().len())
            .sum()
    }

    /// Whether anything changed since the last [`Self::take_dirty`].
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Return and reset the dirty flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Flag the panel for recomposite.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Auto-name for a new layer: `"{Type} {n}"`, `n` counting existing
    /// layers of that type plus one.
    #[must_use]
    pub fn next_layer_name(&self, layer_type: LayerType) -> String {
        let n = self
            .layers
            .iter()
            .filter(|l| l.layer_type() == layer_type)
            .count()
            + 1;
        format!("{layer_type} {n}")
    }

    /// Append `layer`, select it and mark dirty. Returns its index.
    pub fn push_layer(&mut self, layer: Layer) -> usize {
        let layer = layer.with_ratio(self.panel.ratio);
        tracing::debug!("Layer {:?} added ({})", layer.name, layer.layer_type());
        self.layers.push(layer);
        let index = self.layers.len() - 1;
        self.active = Some(index);
        self.drag_anchor = None;
        self.dirty = true;
        index
    }

    /// Import an image into a new layer.
    ///
    /// `None` means the user cancelled the file choice: nothing is added.
    ///
    /// # Errors
    ///
    /// Import failures are returned and the new layer is discarded, leaving
    /// the stack unchanged.
    pub fn add_image_layer(&mut self, source: Option<&Path>) -> FrameResult<Option<usize>> {
        let Some(path) = source else {
            tracing::debug!("Image import cancelled");
            return Ok(None);
        };
        let mut layer = Layer::image(self.next_layer_name(LayerType::Image), self.panel.ratio);
        layer.import_image(path, self.panel.preview_width)?;
        Ok(Some(self.push_layer(layer)))
    }

    /// Add a text layer with default content, color and font.
    pub fn add_text_layer(&mut self) -> usize {
        let font_name = self.fonts.font_name_for(DEFAULT_FONT_FAMILY);
        let layer = Layer::text(
            self.next_layer_name(LayerType::Text),
            self.panel.ratio,
            TextLayer::new(font_name),
        );
        self.push_layer(layer)
    }

    /// Add an exclusion-zone layer over `zones`.
    pub fn add_exclusion_zone_layer(&mut self, zones: Vec<Rect>) -> usize {
        let layer = Layer::exclusion_zone(
            self.next_layer_name(LayerType::ZoneEx),
            self.panel.ratio,
            zones,
        );
        self.push_layer(layer)
    }

    /// Remove the active layer unless it is an exclusion-zone layer. The
    /// previous index is selected afterwards.
    pub fn delete_active_layer(&mut self) -> bool {
        let Some(index) = self.active else {
            return false;
        };
        match self.layers.get(index) {
            Some(layer) if !layer.is_exclusion_zone() => {}
            _ => return false,
        }
        let removed = self.layers.remove(index);
        tracing::debug!("Layer {:?} deleted", removed.name);
        self.active = if self.layers.is_empty() {
            None
        } else {
            Some(index.saturating_sub(1))
        };
        self.drag_anchor = None;
        self.dirty = true;
        true
    }

    /// Swap the active layer with its neighbour `direction` steps away
    /// (`-1` towards the top, `1` towards the bottom).
    pub fn move_active_layer(&mut self, direction: i32) -> bool {
        let Some(index) = self.active else {
            return false;
        };
        let Some(target) = isize::try_from(direction)
            .ok()
            .and_then(|d| index.checked_add_signed(d))
            .filter(|&t| t < self.layers.len())
        else {
            return false;
        };
        self.layers.swap(index, target);
        self.active = Some(target);
        self.dirty = true;
        true
    }

    /// Select the layer at `index`; out of range is ignored.
    pub fn select_layer(&mut self, index: usize) -> bool {
        if index >= self.layers.len() {
            return false;
        }
        self.active = Some(index);
        self.drag_anchor = None;
        true
    }

    /// Set the background from a `#RRGGBB` string.
    ///
    /// # Errors
    ///
    /// Returns [`crate::FrameError::InvalidColor`] and keeps the current
    /// background if `value` is not exactly `#` plus six hex digits.
    pub fn set_background_color(&mut self, value: &str) -> FrameResult<()> {
        let color = HexColor::parse(value)?;
        self.set_background(color);
        Ok(())
    }

    /// Set the background.
    pub fn set_background(&mut self, color: HexColor) {
        self.background = color;
        self.dirty = true;
    }

    /// Replace the rectangles of every exclusion-zone layer, creating one on
    /// top if the stack has none.
    pub fn set_zones(&mut self, zones: &[Rect]) {
        let mut updated = false;
        for zone in self.layers.iter_mut().filter_map(Layer::as_exclusion_zone_mut) {
            zone.set_zones(zones.to_vec());
            updated = true;
        }
        if !updated {
            let layer = Layer::exclusion_zone(
                self.next_layer_name(LayerType::ZoneEx),
                self.panel.ratio,
                zones.to_vec(),
            );
            self.insert_top(layer);
        }
        self.dirty = true;
    }

    fn insert_top(&mut self, layer: Layer) {
        self.layers.insert(0, layer);
        self.active = self.active.map(|i| i + 1);
    }

    /// Show or hide the active layer.
    pub fn set_active_visible(&mut self, visible: bool) -> bool {
        let Some(layer) = self.active_layer_mut() else {
            return false;
        };
        layer.visible = visible;
        self.dirty = true;
        true
    }

    /// Lock or unlock the active layer.
    pub fn set_active_locked(&mut self, locked: bool) -> bool {
        let Some(layer) = self.active_layer_mut() else {
            return false;
        };
        layer.locked = locked;
        true
    }

    /// Replace the content of the active text layer.
    pub fn set_active_text(&mut self, text: &str) -> bool {
        let Some(layer) = self.active_layer_mut().and_then(Layer::as_text_mut) else {
            return false;
        };
        layer.set_text(text);
        self.dirty = true;
        true
    }

    /// Set the fill color of the active text layer from a `#RRGGBB` string.
    ///
    /// # Errors
    ///
    /// Returns [`crate::FrameError::InvalidColor`] without touching the layer.
    pub fn set_active_text_color(&mut self, value: &str) -> FrameResult<bool> {
        let color = HexColor::parse(value)?;
        let Some(layer) = self.active_layer_mut().and_then(Layer::as_text_mut) else {
            return Ok(false);
        };
        layer.set_color(color);
        self.dirty = true;
        Ok(true)
    }

    /// Set family and size of the active text layer, re-resolving its font
    /// file.
    pub fn set_active_font(&mut self, family: &str, size: u32) -> bool {
        let font_name = self.fonts.font_name_for(family);
        let Some(layer) = self.active_layer_mut().and_then(Layer::as_text_mut) else {
            return false;
        };
        layer.set_font(
            FontSelection {
                family: family.to_string(),
                size,
            },
            font_name,
        );
        self.dirty = true;
        true
    }

    /// Route a pointer or wheel event to the active layer. Returns whether
    /// the panel became dirty.
    pub fn handle_event(&mut self, event: &PanelEvent) -> bool {
        let changed = match *event {
            PanelEvent::PointerDown { x, y } => {
                if self.active_layer().is_some() {
                    self.drag_anchor = Some(Point::new(x, y));
                }
                false
            }
            PanelEvent::PointerDrag { x, y } => {
                let position = Point::new(x, y);
                let Some(anchor) = self.drag_anchor else {
                    return false;
                };
                self.drag_anchor = Some(position);
                self.active_layer_mut()
                    .is_some_and(|layer| layer.drag(position.delta_from(anchor)))
            }
            PanelEvent::PointerUp => {
                self.drag_anchor = None;
                false
            }
            PanelEvent::Wheel { delta } => self
                .active_layer_mut()
                .is_some_and(|layer| layer.wheel(delta > 0)),
        };
        if changed {
            self.dirty = true;
        }
        changed
    }

    /// Layers other than exclusion zones, top to bottom.
    pub fn editable_layers(&self) -> impl Iterator<Item = &Layer> {
        self.layers.iter().filter(|l| !l.is_exclusion_zone())
    }

    /// Replace every editable layer with `layers`, keeping this stack's
    /// exclusion-zone layers. They are placed at `zone_index` (clamped), or
    /// on top when `None`. Clears the selection.
    pub fn replace_editable_layers(&mut self, layers: Vec<Layer>, zone_index: Option<usize>) {
        let zones: Vec<Layer> = std::mem::take(&mut self.layers)
            .into_iter()
            .filter(Layer::is_exclusion_zone)
            .collect();
        let ratio = self.panel.ratio;
        let mut rebuilt: Vec<Layer> = layers
            .into_iter()
            .filter(|l| !l.is_exclusion_zone())
            .map(|l| l.with_ratio(ratio))
            .collect();
        let at = zone_index.unwrap_or(0).min(rebuilt.len());
        rebuilt.splice(at..at, zones);
        self.layers = rebuilt;
        self.active = None;
        self.drag_anchor = None;
        self.dirty = true;
    }

    /// Replace the whole stack with restored layers. If `layers` holds no
    /// exclusion-zone layer, the current ones are kept on top.
    pub fn restore_layers(&mut self, layers: Vec<Layer>) {
        if layers.iter().any(Layer::is_exclusion_zone) {
            let ratio = self.panel.ratio;
            self.layers = layers.into_iter().map(|l| l.with_ratio(ratio)).collect();
            self.active = None;
            self.drag_anchor = None;
            self.dirty = true;
        } else {
            self.replace_editable_layers(layers, None);
        }
    }
}
