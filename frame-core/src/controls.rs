//! Parameter panel description.
//!
//! Layers describe their editable fields into an externally owned panel;
//! the host decides how to draw them.

use std::path::PathBuf;

use crate::HexColor;

/// One editable (or informational) field of a layer.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlField {
    /// Static caption.
    Label(String),
    /// Editable text content.
    Text(String),
    /// Editable color.
    Color(HexColor),
    /// Font family and point size.
    Font {
        /// Family name.
        family: String,
        /// Preview-space point size.
        size: u32,
    },
    /// Source file of an image, if any.
    Source(Option<PathBuf>),
    /// Preview-space size of a raster.
    Size {
        /// Width in preview pixels.
        width: u32,
        /// Height in preview pixels.
        height: u32,
    },
    /// Number of exclusion rectangles.
    ZoneCount(usize),
}

/// A parameter panel owned by the host.
pub trait ControlPanel {
    /// Remove every field currently shown.
    fn clear(&mut self);

    /// Append a field.
    fn push(&mut self, field: ControlField);
}

/// Plain list panel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ControlList {
    /// Fields in display order.
    pub fields: Vec<ControlField>,
}

impl ControlPanel for ControlList {
    fn clear(&mut self) {
        self.fields.clear();
    }

    fn push(&mut self, field: ControlField) {
        self.fields.push(field);
    }
}
