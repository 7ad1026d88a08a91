//! Raster loading and resampling.
//!
//! Imported images are decoded once into RGBA and every derived copy is
//! resampled from that original.

use std::path::Path;

use image::imageops::FilterType;
use image::RgbaImage;

use crate::{FrameError, FrameResult};

/// Filter used for every resample (bicubic).
const RESAMPLE_FILTER: FilterType = FilterType::CatmullRom;

/// Minimum preview width of an image layer.
pub const MIN_PREVIEW_WIDTH: u32 = 15;

/// Minimum preview height of an image layer.
pub const MIN_PREVIEW_HEIGHT: u32 = 10;

/// Largest export raster an image layer may hold, in pixels (512 MiB of
/// RGBA).
pub const MAX_EXPORT_PIXELS: u64 = 1 << 27;

/// Read and decode an image file into RGBA.
///
/// # Errors
///
/// Returns [`FrameError::NotFound`] if the path does not exist,
/// [`FrameError::Io`] if it cannot be read and [`FrameError::Decode`] if the
/// bytes are not a supported image.
pub fn load_rgba(path: &Path) -> FrameResult<RgbaImage> {
    let bytes = std::fs::read(path).map_err(|e| FrameError::from_io(e, path))?;
    let format = image::guess_format(&bytes).ok();
    let img = image::load_from_memory(&bytes)
        .map_err(|e| FrameError::Decode(format!("{}: {e}", path.display())))?;
    tracing::debug!(
        "Decoded {} as {format:?} ({}x{})",
        path.display(),
        img.width(),
        img.height()
    );
    Ok(img.to_rgba8())
}

/// Resample `original` to exactly `width` x `height`.
#[must_use]
pub fn resample(original: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    image::imageops::resize(original, width.max(1), height.max(1), RESAMPLE_FILTER)
}

/// Export size for a preview size at `ratio`, or `None` when an edge
/// overflows or the raster would exceed [`MAX_EXPORT_PIXELS`].
#[must_use]
pub fn export_size(preview: (u32, u32), ratio: u32) -> Option<(u32, u32)> {
    let width = preview.0.checked_mul(ratio)?;
    let height = preview.1.checked_mul(ratio)?;
    (u64::from(width) * u64::from(height) <= MAX_EXPORT_PIXELS).then_some((width, height))
}

/// Size that fills `target_width` while keeping the original aspect ratio.
#[must_use]
pub fn fit_to_width(original: (u32, u32), target_width: u32) -> (u32, u32) {
    (target_width, height_for_width(original, target_width).max(1))
}

/// Height matching `width` at the original aspect ratio (truncated,
/// saturating at `u32::MAX`).
#[must_use]
pub fn height_for_width(original: (u32, u32), width: u32) -> u32 {
    let (w0, h0) = original;
    if w0 == 0 {
        return 0;
    }
    u32::try_from(u64::from(width) * u64::from(h0) / u64::from(w0)).unwrap_or(u32::MAX)
}

/// Width matching `height` at the original aspect ratio (rounded up,
/// saturating at `u32::MAX`).
#[must_use]
pub fn width_for_height(original: (u32, u32), height: u32) -> u32 {
    let (w0, h0) = original;
    if h0 == 0 {
        return 0;
    }
    u32::try_from((u64::from(height) * u64::from(w0)).div_ceil(u64::from(h0)))
        .unwrap_or(u32::MAX)
}

/// Preview size after growing the width by `delta`, floored at
/// [`MIN_PREVIEW_WIDTH`] x [`MIN_PREVIEW_HEIGHT`].
///
/// When the height floor kicks in the width is recomputed from it so the
/// aspect ratio still holds.
#[must_use]
pub fn resized_preview(original: (u32, u32), current_width: u32, delta: i32) -> (u32, u32) {
    let requested = i64::from(current_width) + i64::from(delta);
    let width = u32::try_from(requested.max(i64::from(MIN_PREVIEW_WIDTH))).unwrap_or(u32::MAX);
    let height = height_for_width(original, width);
    if height >= MIN_PREVIEW_HEIGHT {
        return (width, height);
    }
    let width = width_for_height(original, MIN_PREVIEW_HEIGHT).max(MIN_PREVIEW_WIDTH);
    (width, height_for_width(original, width).max(MIN_PREVIEW_HEIGHT))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_size_bounds() {
        assert_eq!(export_size((600, 300), 6), Some((3600, 1800)));
        assert_eq!(export_size((2_000_000_000, 1), 3), None);
        assert_eq!(export_size((20_000, 20_000), 1), None);
    }

    #[test]
    fn test_fit_to_width() {
        assert_eq!(fit_to_width((200, 100), 600), (600, 300));
        assert_eq!(fit_to_width((100, 300), 600), (600, 1800));
    }

    #[test]
    fn test_resize_floor_keeps_aspect() {
        // 4:1 image shrunk hard: height floor drives width back up.
        assert_eq!(resized_preview((400, 100), 600, -10_000), (40, 10));
        // Portrait image stops at the width floor.
        assert_eq!(resized_preview((100, 200), 600, -10_000), (15, 30));
    }

    #[test]
    fn test_resize_grows() {
        assert_eq!(resized_preview((200, 100), 600, 10), (610, 305));
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_rgba(Path::new("/definitely/not/here.png")).unwrap_err();
        assert!(matches!(err, FrameError::NotFound(_)));
    }

    #[test]
    fn test_load_corrupt_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"\x89PNG not really").expect("write");
        assert!(matches!(load_rgba(&path), Err(FrameError::Decode(_))));
    }

    #[test]
    fn test_resample_dimensions() {
        let img = RgbaImage::from_pixel(20, 10, image::Rgba([255, 0, 0, 255]));
        let out = resample(&img, 60, 30);
        assert_eq!(out.dimensions(), (60, 30));
    }
}
