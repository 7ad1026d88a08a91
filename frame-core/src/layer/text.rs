//! Text layer payload.

use serde::{Deserialize, Serialize};

use crate::{HexColor, Scale};

/// Content of a freshly added text layer.
pub const DEFAULT_TEXT: &str = "Text";

/// Family of a freshly added text layer.
pub const DEFAULT_FONT_FAMILY: &str = "arial";

/// Preview-space point size of a freshly added text layer.
pub const DEFAULT_FONT_SIZE: u32 = 32;

/// Smallest point size reachable by shrinking.
pub const MIN_FONT_SIZE: u32 = 4;

/// Font family and preview-space point size, persisted as `sel_font`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontSelection {
    /// Family name.
    pub family: String,
    /// Point size in preview space.
    pub size: u32,
}

impl Default for FontSelection {
    fn default() -> Self {
        Self {
            family: DEFAULT_FONT_FAMILY.to_string(),
            size: DEFAULT_FONT_SIZE,
        }
    }
}

/// A single-line text label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextLayer {
    text: String,
    color: HexColor,
    font: FontSelection,
    font_name: String,
}

impl TextLayer {
    /// Default text in black, resolved to `font_name`.
    #[must_use]
    pub fn new(font_name: impl Into<String>) -> Self {
        Self {
            text: DEFAULT_TEXT.to_string(),
            color: HexColor::BLACK,
            font: FontSelection::default(),
            font_name: font_name.into(),
        }
    }

    /// Rebuild a text layer from persisted parts.
    #[must_use]
    pub fn from_parts(
        text: String,
        color: HexColor,
        font: FontSelection,
        font_name: String,
    ) -> Self {
        let mut layer = Self {
            text,
            color,
            font,
            font_name,
        };
        layer.font.size = layer.font.size.max(MIN_FONT_SIZE);
        layer
    }

    /// Label content.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the label content.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Fill color.
    #[must_use]
    pub const fn color(&self) -> HexColor {
        self.color
    }

    /// Replace the fill color.
    pub fn set_color(&mut self, color: HexColor) {
        self.color = color;
    }

    /// Family and preview size.
    #[must_use]
    pub const fn font(&self) -> &FontSelection {
        &self.font
    }

    /// Font file (or file name) the family resolved to.
    #[must_use]
    pub fn font_name(&self) -> &str {
        &self.font_name
    }

    /// Replace family, size and resolved font file.
    pub fn set_font(&mut self, font: FontSelection, font_name: impl Into<String>) {
        self.font = font;
        self.font.size = self.font.size.max(MIN_FONT_SIZE);
        self.font_name = font_name.into();
    }

    /// Adjust the point size by `delta`, never below [`MIN_FONT_SIZE`].
    pub fn resize_font(&mut self, delta: i32) {
        self.font.size = self
            .font
            .size
            .saturating_add_signed(delta)
            .max(MIN_FONT_SIZE);
    }

    /// Point size in the space targeted by `scale`.
    #[must_use]
    pub const fn render_size(&self, scale: Scale) -> u32 {
        scale.length(self.font.size)
    }
}
