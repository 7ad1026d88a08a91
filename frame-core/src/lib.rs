//! # Frame Studio Core
//!
//! Layered composition model for printed photo frames.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                  Project                    │
//! │   single panel (app1)   quad panel (app4)   │
//! ├─────────────────────────────────────────────┤
//! │  Editor (layer stack)  │  Templates          │
//! │  - active layer        │  - draw.io zones    │
//! │  - background          │  Fonts              │
//! │  - event routing       │  - family lookup    │
//! ├─────────────────────────────────────────────┤
//! │  Layer = Image | Text | ExclusionZone       │
//! │  preview space  x ratio  =  export space    │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! Painting lives in `frame-renderer`; this crate only holds state.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod color;
pub mod config;
pub mod controls;
pub mod editor;
pub mod error;
pub mod event;
pub mod fonts;
pub mod geometry;
pub mod layer;
pub mod project;
pub mod raster;
pub mod record;
pub mod template;

pub use color::HexColor;
pub use config::{PanelConfig, StudioConfig};
pub use controls::{ControlField, ControlList, ControlPanel};
pub use editor::Editor;
pub use error::{FrameError, FrameResult};
pub use event::PanelEvent;
pub use fonts::{FontResolver, ResolvedFont};
pub use geometry::{Point, Rect, RenderSpace, Scale};
pub use layer::{
    ExclusionZoneLayer, FontSelection, ImageLayer, Layer, LayerKind, LayerType, TextLayer,
};
pub use project::{PanelId, Project};
pub use record::{LayerRecord, PanelRecord, ProjectDocument};
pub use template::{DrawioTemplates, TemplateResolver, TemplateZones};

/// Frame core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
