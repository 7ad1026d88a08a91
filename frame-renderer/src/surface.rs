//! Raster primitives on RGBA surfaces.
//!
//! Surfaces are straight-alpha [`RgbaImage`]s. Pastes are masked overlays:
//! only pixels covered by the source are touched, and each one is blended
//! on all four channels by the source alpha.

use frame_core::{HexColor, Point, Rect};
use image::{Rgba, RgbaImage};

/// Pixel written by an exclusion zone: white, fully transparent.
pub const PUNCH_PIXEL: Rgba<u8> = Rgba([255, 255, 255, 0]);

/// Opaque surface filled with `color`.
#[must_use]
pub fn solid(width: u32, height: u32, color: HexColor) -> RgbaImage {
    RgbaImage::from_pixel(width, height, Rgba(color.to_rgba(u8::MAX)))
}

/// Blend `src` onto `dst` with its top-left corner at `at`, using the
/// source alpha as the mask. Parts falling outside `dst` are clipped.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_possible_wrap)]
pub fn paste_masked(dst: &mut RgbaImage, src: &RgbaImage, at: Point) {
    let (dst_w, dst_h) = (i64::from(dst.width()), i64::from(dst.height()));
    for (sx, sy, pixel) in src.enumerate_pixels() {
        let x = i64::from(at.x) + i64::from(sx);
        let y = i64::from(at.y) + i64::from(sy);
        if x < 0 || y < 0 || x >= dst_w || y >= dst_h {
            continue;
        }
        let mask = pixel[3];
        if mask == 0 {
            continue;
        }
        let target = dst.get_pixel_mut(x as u32, y as u32);
        if mask == u8::MAX {
            *target = *pixel;
            continue;
        }
        for channel in 0..4 {
            target[channel] = blend(pixel[channel], target[channel], mask);
        }
    }
}

fn blend(src: u8, dst: u8, mask: u8) -> u8 {
    let a = u32::from(mask);
    let value = (u32::from(src) * a + u32::from(dst) * (255 - a) + 127) / 255;
    u8::try_from(value).unwrap_or(u8::MAX)
}

/// Overwrite `rect` with [`PUNCH_PIXEL`], whatever lies beneath.
///
/// Edges are inclusive: a rectangle at `x` with width `w` covers columns
/// `x..=x + w`. Rectangles without area punch nothing.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn punch_rect(dst: &mut RgbaImage, rect: Rect) {
    let (width, height) = dst.dimensions();
    if rect.is_empty() || width == 0 || height == 0 {
        return;
    }
    let clamp = |v: f64, max: u32| -> Option<u32> {
        if v < 0.0 {
            Some(0)
        } else if v >= f64::from(max) {
            None
        } else {
            Some(v.floor() as u32)
        }
    };
    let (Some(x0), Some(y0)) = (clamp(rect.x, width), clamp(rect.y, height)) else {
        return;
    };
    let x1 = rect.x + rect.width;
    let y1 = rect.y + rect.height;
    if x1 < 0.0 || y1 < 0.0 {
        return;
    }
    let x1 = clamp(x1, width).unwrap_or(width - 1);
    let y1 = clamp(y1, height).unwrap_or(height - 1);
    for y in y0..=y1 {
        for x in x0..=x1 {
            dst.put_pixel(x, y, PUNCH_PIXEL);
        }
    }
}
