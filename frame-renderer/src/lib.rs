//! # Frame Studio Renderer
//!
//! CPU compositor for Frame Studio panels.
//!
//! ## Pipeline
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │      background fill (opaque, #RRGGBB)      │
//! ├─────────────────────────────────────────────┤
//! │  layers, last index first:                  │
//! │  Image ──── masked paste (source alpha)     │
//! │  Text ───── SVG text → resvg → masked paste │
//! │  Zone ───── punch to alpha 0                │
//! ├─────────────────────────────────────────────┤
//! │  preview surface │ export surface → PNG     │
//! └─────────────────────────────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod compositor;
pub mod error;
pub mod export;
pub mod font_cache;
pub mod surface;
pub mod text;

pub use compositor::Compositor;
pub use error::{RenderError, RenderResult};
pub use export::{encode_png, save_preview_png, write_png, ExportReport, ProjectExporter};
pub use font_cache::{CacheStats, FontCache};
pub use text::TextRasterizer;
