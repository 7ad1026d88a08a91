//! Export artifacts.
//!
//! A project export writes, into one output directory:
//! - `{name}_{zones}.png` per panel, `zones` being that panel's exclusion
//!   rectangle count (1 for the single panel, 4 for the quad panel with the
//!   stock templates), composited at export resolution;
//! - `{name}.xml`, a copy of the selected template file.

use std::path::{Path, PathBuf};

use frame_core::{Editor, FrameError, PanelId, Project, TemplateResolver};
use image::{ImageEncoder, RgbaImage};

use crate::compositor::Compositor;
use crate::error::{RenderError, RenderResult};

/// Encode a surface as PNG bytes.
///
/// # Errors
///
/// Returns [`RenderError::Encode`] if the encoder fails.
pub fn encode_png(image: &RgbaImage) -> RenderResult<Vec<u8>> {
    let mut buf = std::io::Cursor::new(Vec::new());
    image::codecs::png::PngEncoder::new(&mut buf)
        .write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            image::ExtendedColorType::Rgba8,
        )
        .map_err(|e| RenderError::Encode(format!("PNG encoding failed: {e}")))?;
    Ok(buf.into_inner())
}

/// Encode `image` as PNG and write it to `path`.
///
/// # Errors
///
/// Returns [`RenderError::Encode`] or [`RenderError::Io`].
pub fn write_png(image: &RgbaImage, path: &Path) -> RenderResult<()> {
    let bytes = encode_png(image)?;
    std::fs::write(path, bytes).map_err(|e| RenderError::io(e, path))
}

/// Composite `editor` at preview resolution and write it as PNG.
///
/// # Errors
///
/// Returns [`RenderError::Encode`] or [`RenderError::Io`].
pub fn save_preview_png(compositor: &mut Compositor, editor: &Editor, path: &Path) -> RenderResult<()> {
    let surface = compositor.render_preview(editor);
    write_png(&surface, path)?;
    tracing::info!("Preview written to {}", path.display());
    Ok(())
}

/// Files written by [`ProjectExporter::export`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    /// Panel images, single panel first.
    pub panels: Vec<PathBuf>,
    /// Template copy.
    pub template: PathBuf,
}

/// Writes the print artifacts of a project into a directory.
#[derive(Debug, Clone)]
pub struct ProjectExporter {
    out_dir: PathBuf,
}

impl ProjectExporter {
    /// Create an exporter writing into `out_dir`.
    #[must_use]
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }

    /// Output directory.
    #[must_use]
    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Path of the image written for `panel`.
    #[must_use]
    pub fn panel_path(&self, project: &Project, panel: PanelId) -> PathBuf {
        let zones = project.panel(panel).zone_count();
        self.out_dir.join(format!("{}_{zones}.png", project.name()))
    }

    /// Path of the template copy.
    #[must_use]
    pub fn template_path(&self, project: &Project) -> PathBuf {
        self.out_dir.join(format!("{}.xml", project.name()))
    }

    /// Composite both panels at export resolution and write every artifact.
    ///
    /// # Errors
    ///
    /// [`FrameError::InvalidOperation`] for an empty project name or when
    /// both panels would be written to the same file (equal zone counts),
    /// and [`FrameError::MissingResource`] when the template file is
    /// unknown, all checked before anything is written. Write failures are
    /// [`RenderError::Io`] or [`RenderError::Encode`].
    pub fn export(
        &self,
        project: &Project,
        compositor: &mut Compositor,
        templates: &dyn TemplateResolver,
    ) -> RenderResult<ExportReport> {
        if project.name().trim().is_empty() {
            return Err(FrameError::InvalidOperation("project name is empty".to_string()).into());
        }
        let paths = PanelId::ALL.map(|id| self.panel_path(project, id));
        if paths[0] == paths[1] {
            return Err(FrameError::InvalidOperation(format!(
                "both panels would be exported to {}",
                paths[0].display()
            ))
            .into());
        }
        let template_source = templates
            .source_path(project.template())
            .ok_or_else(|| FrameError::MissingResource(PathBuf::from(project.template())))?;
        std::fs::create_dir_all(&self.out_dir).map_err(|e| RenderError::io(e, &self.out_dir))?;

        let mut panels = Vec::with_capacity(PanelId::ALL.len());
        for (id, path) in PanelId::ALL.into_iter().zip(paths) {
            let surface = compositor.export_composite(project.panel(id));
            write_png(&surface, &path)?;
            tracing::debug!("Panel {id} exported to {}", path.display());
            panels.push(path);
        }

        let template = self.template_path(project);
        std::fs::copy(&template_source, &template).map_err(|e| RenderError::io(e, &template))?;
        tracing::info!(
            "Exported {:?} to {} ({} panel(s) + template)",
            project.name(),
            self.out_dir.display(),
            panels.len()
        );
        Ok(ExportReport { panels, template })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_png_round_trip_dimensions() {
        let img = RgbaImage::from_pixel(7, 5, Rgba([1, 2, 3, 4]));
        let bytes = encode_png(&img).expect("encode");
        assert_eq!(&bytes[..4], &[0x89, 0x50, 0x4E, 0x47]);
        let back = image::load_from_memory(&bytes).expect("decode").to_rgba8();
        assert_eq!(back.dimensions(), (7, 5));
        assert_eq!(*back.get_pixel(3, 3), Rgba([1, 2, 3, 4]));
    }

    #[test]
    fn test_write_png_reports_path() {
        let img = RgbaImage::new(1, 1);
        let err = write_png(&img, Path::new("/no/such/dir/out.png")).unwrap_err();
        match err {
            RenderError::Io { path, .. } => assert_eq!(path, Path::new("/no/such/dir/out.png")),
            other => panic!("unexpected error {other:?}"),
        }
    }
}
