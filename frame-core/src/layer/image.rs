//! Image layer payload.

use std::path::{Path, PathBuf};

use ::image::RgbaImage;

use crate::raster::{self, fit_to_width, resized_preview};
use crate::{FrameError, FrameResult, Scale};

/// Decoded original plus the two resampled copies painted by the composites.
#[derive(Debug, Clone)]
struct Rasters {
    original: RgbaImage,
    preview: RgbaImage,
    export: RgbaImage,
}

impl Rasters {
    /// `None` when the export copy would be too large to allocate.
    fn build(original: RgbaImage, preview_size: (u32, u32), ratio: u32) -> Option<Self> {
        let (export_width, export_height) = raster::export_size(preview_size, ratio)?;
        let preview = raster::resample(&original, preview_size.0, preview_size.1);
        let export = raster::resample(&original, export_width, export_height);
        Some(Self {
            original,
            preview,
            export,
        })
    }
}

fn too_large(path: &Path, size: (u32, u32), ratio: u32) -> FrameError {
    FrameError::InvalidOperation(format!(
        "{} is too large to export at {}x{} (ratio {ratio})",
        path.display(),
        size.0,
        size.1
    ))
}

/// An imported raster.
///
/// The export copy is always `ratio` times the preview copy and both are
/// resampled from the untouched original, never from each other.
#[derive(Debug, Clone, Default)]
pub struct ImageLayer {
    source: Option<PathBuf>,
    rasters: Option<Rasters>,
}

impl ImageLayer {
    /// Decode `path` and fit it to `preview_width` at its own aspect ratio.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::NotFound`], [`FrameError::Io`] or
    /// [`FrameError::Decode`], or [`FrameError::InvalidOperation`] when the
    /// fitted image would exceed [`raster::MAX_EXPORT_PIXELS`] at `ratio`.
    /// On failure the layer holds no image.
    pub fn import(&mut self, path: &Path, preview_width: u32, ratio: u32) -> FrameResult<()> {
        self.source = None;
        self.rasters = None;
        let original = raster::load_rgba(path)?;
        let size = fit_to_width(original.dimensions(), preview_width);
        let rasters =
            Rasters::build(original, size, ratio).ok_or_else(|| too_large(path, size, ratio))?;
        tracing::debug!(
            "Imported {} at {}x{} (preview)",
            path.display(),
            size.0,
            size.1
        );
        self.source = Some(path.to_path_buf());
        self.rasters = Some(rasters);
        Ok(())
    }

    /// Re-import a persisted source, at `display_size` if one was recorded.
    ///
    /// Only the recorded width is trusted; the height follows the original's
    /// aspect ratio. A recorded size that cannot be exported at `ratio` falls
    /// back to the fitted size.
    ///
    /// # Errors
    ///
    /// Same as [`Self::import`], except that the source path is kept so it
    /// survives a later save.
    pub fn restore(
        &mut self,
        path: &Path,
        display_size: Option<(u32, u32)>,
        preview_width: u32,
        ratio: u32,
    ) -> FrameResult<()> {
        self.source = Some(path.to_path_buf());
        self.rasters = None;
        let original = raster::load_rgba(path)?;
        let dimensions = original.dimensions();
        let recorded = display_size
            .filter(|&(w, h)| w > 0 && h > 0)
            .map(|(w, _)| resized_preview(dimensions, w, 0))
            .filter(|&size| {
                let fits = raster::export_size(size, ratio).is_some();
                if !fits {
                    tracing::warn!(
                        "Recorded size {}x{} of {} is too large, refitting",
                        size.0,
                        size.1,
                        path.display()
                    );
                }
                fits
            });
        let size = recorded.unwrap_or_else(|| fit_to_width(dimensions, preview_width));
        let rasters =
            Rasters::build(original, size, ratio).ok_or_else(|| too_large(path, size, ratio))?;
        self.rasters = Some(rasters);
        Ok(())
    }

    /// Grow or shrink the preview width by `delta` pixels, keeping aspect.
    /// Returns false if there is no image or the new size could not be
    /// exported at `ratio`.
    pub fn resize(&mut self, delta: i32, ratio: u32) -> bool {
        let Some(rasters) = self.rasters.as_ref() else {
            return false;
        };
        let size = resized_preview(
            rasters.original.dimensions(),
            rasters.preview.width(),
            delta,
        );
        if raster::export_size(size, ratio).is_none() {
            tracing::debug!("Resize to {}x{} refused: export too large", size.0, size.1);
            return false;
        }
        self.rasters = self
            .rasters
            .take()
            .and_then(|rasters| Rasters::build(rasters.original, size, ratio));
        true
    }

    pub(crate) fn rescale(&mut self, ratio: u32) {
        if let Some(rasters) = self.rasters.take() {
            let size = rasters.preview.dimensions();
            self.rasters = Rasters::build(rasters.original, size, ratio);
            if self.rasters.is_none() {
                tracing::warn!(
                    "Dropped image {}x{}: too large at ratio {ratio}",
                    size.0,
                    size.1
                );
            }
        }
    }

    /// Whether an image is loaded.
    #[must_use]
    pub const fn has_image(&self) -> bool {
        self.rasters.is_some()
    }

    /// File the image was imported from.
    #[must_use]
    pub fn source_path(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Decoded original size, or `(0, 0)`.
    #[must_use]
    pub fn original_size(&self) -> (u32, u32) {
        self.rasters
            .as_ref()
            .map_or((0, 0), |r| r.original.dimensions())
    }

    /// Preview size, or `(0, 0)`.
    #[must_use]
    pub fn preview_size(&self) -> (u32, u32) {
        self.rasters
            .as_ref()
            .map_or((0, 0), |r| r.preview.dimensions())
    }

    /// Export size, or `(0, 0)`.
    #[must_use]
    pub fn export_size(&self) -> (u32, u32) {
        self.rasters.as_ref().map_or((0, 0), |r| r.export.dimensions())
    }

    /// Raster to paint in the space targeted by `scale`.
    #[must_use]
    pub fn raster(&self, scale: Scale) -> Option<&RgbaImage> {
        self.rasters.as_ref().map(|r| {
            if scale.is_export() {
                &r.export
            } else {
                &r.preview
            }
        })
    }
}
