//! Template geometry: exclusion rectangles for both panels.
//!
//! A template is an externally authored draw.io document. The single-photo
//! panel takes the first geometry of page `Page-5`; the four-photo panel
//! takes up to four geometries of page `Page-8`.

use std::path::{Path, PathBuf};

use crate::{FrameError, FrameResult, Rect};

/// Diagram page holding the single-photo zone.
pub const SINGLE_PAGE: &str = "Page-5";

/// Diagram page holding the four-photo zones.
pub const QUAD_PAGE: &str = "Page-8";

/// Maximum number of zones read for the four-photo panel.
pub const QUAD_ZONE_LIMIT: usize = 4;

/// Rectangles a template assigns to each panel, in preview space.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateZones {
    /// Zones of the single-photo panel.
    pub single: Vec<Rect>,
    /// Zones of the four-photo panel.
    pub quad: Vec<Rect>,
}

/// Resolves template identifiers to zone lists.
pub trait TemplateResolver {
    /// Resolve `id` to the zones of both panels.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::NotFound`] or [`FrameError::Io`] if the template
    /// cannot be read and [`FrameError::Format`] if it cannot be parsed.
    fn resolve(&self, id: &str) -> FrameResult<TemplateZones>;

    /// File backing `id`, copied next to exported artifacts.
    fn source_path(&self, id: &str) -> Option<PathBuf>;
}

/// Templates stored as draw.io XML files in one directory.
#[derive(Debug, Clone)]
pub struct DrawioTemplates {
    dir: PathBuf,
}

impl DrawioTemplates {
    /// Create a resolver reading templates from `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Template directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl TemplateResolver for DrawioTemplates {
    fn resolve(&self, id: &str) -> FrameResult<TemplateZones> {
        let path = self.dir.join(id);
        let xml = std::fs::read_to_string(&path).map_err(|e| FrameError::from_io(e, &path))?;
        parse_drawio(&xml)
    }

    fn source_path(&self, id: &str) -> Option<PathBuf> {
        let path = self.dir.join(id);
        path.is_file().then_some(path)
    }
}

/// Extract template zones from draw.io XML.
///
/// # Errors
///
/// Returns [`FrameError::Format`] if the XML is malformed or a geometry
/// carries a non-numeric size.
pub fn parse_drawio(xml: &str) -> FrameResult<TemplateZones> {
    let doc = roxmltree::Document::parse(xml)
        .map_err(|e| FrameError::Format(format!("template XML: {e}")))?;

    let mut zones = TemplateZones::default();
    for diagram in doc
        .descendants()
        .filter(|n| n.is_element() && n.tag_name().name().contains("diagram"))
    {
        match diagram.attribute("name") {
            Some(SINGLE_PAGE) => zones.single = geometries(diagram, 1)?,
            Some(QUAD_PAGE) => zones.quad = geometries(diagram, QUAD_ZONE_LIMIT)?,
            _ => {}
        }
    }
    tracing::debug!(
        "Template parsed: {} single zone(s), {} quad zone(s)",
        zones.single.len(),
        zones.quad.len()
    );
    Ok(zones)
}

fn geometries(diagram: roxmltree::Node<'_, '_>, limit: usize) -> FrameResult<Vec<Rect>> {
    diagram
        .descendants()
        .filter(|n| n.is_element() && n.tag_name().name().contains("mxGeometry"))
        .take(limit)
        .map(|n| {
            Ok(Rect::new(
                number(n, "x", true)?,
                number(n, "y", true)?,
                number(n, "width", false)?,
                number(n, "height", false)?,
            ))
        })
        .collect()
}

fn number(node: roxmltree::Node<'_, '_>, attr: &str, optional: bool) -> FrameResult<f64> {
    match node.attribute(attr) {
        Some(raw) => raw
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| FrameError::Format(format!("mxGeometry {attr}={raw:?} is not a number"))),
        None if optional => Ok(0.0),
        None => Err(FrameError::Format(format!("mxGeometry is missing {attr}"))),
    }
}
