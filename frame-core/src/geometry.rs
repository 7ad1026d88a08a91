//! Coordinates, rectangles and the preview/export scale.
//!
//! Every panel has two pixel spaces: the small preview space used while
//! editing and the export space used for the printed artifact. Export space
//! is always `ratio` times preview space.

use serde::{Deserialize, Serialize};

/// Integer position, serialized as `[x, y]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[i32; 2]", into = "[i32; 2]")]
pub struct Point {
    /// Horizontal coordinate.
    pub x: i32,
    /// Vertical coordinate.
    pub y: i32,
}

impl Point {
    /// Create a point.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Component-wise sum, saturating.
    #[must_use]
    pub const fn offset(self, delta: Self) -> Self {
        Self::new(self.x.saturating_add(delta.x), self.y.saturating_add(delta.y))
    }

    /// Delta from `origin` to `self`, saturating.
    #[must_use]
    pub const fn delta_from(self, origin: Self) -> Self {
        Self::new(self.x.saturating_sub(origin.x), self.y.saturating_sub(origin.y))
    }

    /// Multiply both components by `factor`, saturating.
    #[must_use]
    pub fn scaled(self, factor: u32) -> Self {
        let f = i32::try_from(factor).unwrap_or(i32::MAX);
        Self::new(self.x.saturating_mul(f), self.y.saturating_mul(f))
    }
}

impl From<[i32; 2]> for Point {
    fn from([x, y]: [i32; 2]) -> Self {
        Self::new(x, y)
    }
}

impl From<Point> for [i32; 2] {
    fn from(p: Point) -> Self {
        [p.x, p.y]
    }
}

/// Axis-aligned rectangle in preview space, serialized as `[x, y, w, h]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl Rect {
    /// Create a rectangle.
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Multiply origin and size by `factor`.
    #[must_use]
    pub fn scaled(self, factor: u32) -> Self {
        let f = f64::from(factor);
        Self::new(self.x * f, self.y * f, self.width * f, self.height * f)
    }

    /// A rectangle with no area covers nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

impl From<[f64; 4]> for Rect {
    fn from([x, y, width, height]: [f64; 4]) -> Self {
        Self::new(x, y, width, height)
    }
}

impl From<Rect> for [f64; 4] {
    fn from(r: Rect) -> Self {
        [r.x, r.y, r.width, r.height]
    }
}

/// Which pixel space a composite targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderSpace {
    /// On-screen editing surface.
    Preview,
    /// Full-resolution print surface.
    Export,
}

/// Scale applied uniformly by every layer when it paints.
///
/// Layers never re-derive `size * ratio` themselves; they ask the scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Scale {
    /// Target space.
    pub space: RenderSpace,
    /// Export/preview ratio of the panel.
    pub ratio: u32,
}

impl Scale {
    /// Preview scale for a panel with the given ratio.
    #[must_use]
    pub const fn preview(ratio: u32) -> Self {
        Self {
            space: RenderSpace::Preview,
            ratio,
        }
    }

    /// Export scale for a panel with the given ratio.
    #[must_use]
    pub const fn export(ratio: u32) -> Self {
        Self {
            space: RenderSpace::Export,
            ratio,
        }
    }

    /// Whether this scale targets export space.
    #[must_use]
    pub const fn is_export(&self) -> bool {
        matches!(self.space, RenderSpace::Export)
    }

    /// Multiplier from preview units to the target space.
    #[must_use]
    pub const fn factor(&self) -> u32 {
        match self.space {
            RenderSpace::Preview => 1,
            RenderSpace::Export => self.ratio,
        }
    }

    /// Scale a preview-space length, saturating.
    #[must_use]
    pub const fn length(&self, value: u32) -> u32 {
        value.saturating_mul(self.factor())
    }

    /// Scale a preview-space rectangle.
    #[must_use]
    pub fn rect(&self, rect: Rect) -> Rect {
        rect.scaled(self.factor())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_serializes_as_pair() {
        let json = serde_json::to_string(&Point::new(10, -5)).expect("serialize");
        assert_eq!(json, "[10,-5]");
        let back: Point = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, Point::new(10, -5));
    }

    #[test]
    fn test_rect_serializes_as_quad() {
        let json = serde_json::to_string(&Rect::new(50.0, 20.0, 330.0, 470.0)).expect("serialize");
        assert_eq!(json, "[50.0,20.0,330.0,470.0]");
    }

    #[test]
    fn test_point_delta_and_scale() {
        let p = Point::new(12, 7).delta_from(Point::new(2, 12));
        assert_eq!(p, Point::new(10, -5));
        assert_eq!(p.scaled(6), Point::new(60, -30));
    }

    #[test]
    fn test_rect_keeps_template_precision() {
        let r: Rect =
            serde_json::from_str("[0.1, 16777217.0, 330.25, 470.0]").expect("deserialize");
        assert_eq!(r, Rect::new(0.1, 16_777_217.0, 330.25, 470.0));
        let json = serde_json::to_string(&r).expect("serialize");
        assert_eq!(json, "[0.1,16777217.0,330.25,470.0]");
    }

    #[test]
    fn test_point_arithmetic_saturates() {
        let far = Point::new(2_000_000_000, -2_000_000_000);
        assert_eq!(far.scaled(6), Point::new(i32::MAX, i32::MIN));
        assert_eq!(far.offset(far), Point::new(i32::MAX, i32::MIN));
        assert_eq!(far.delta_from(Point::new(-2_000_000_000, 0)).x, i32::MAX);
        assert_eq!(Scale::export(u32::MAX).length(2), u32::MAX);
    }

    #[test]
    fn test_scale_factor() {
        assert_eq!(Scale::preview(3).factor(), 1);
        assert_eq!(Scale::export(3).factor(), 3);
        assert_eq!(Scale::export(3).length(32), 96);
        let r = Scale::export(2).rect(Rect::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(r, Rect::new(2.0, 4.0, 6.0, 8.0));
    }

    #[test]
    fn test_empty_rect() {
        assert!(Rect::default().is_empty());
        assert!(!Rect::new(0.0, 0.0, 1.0, 1.0).is_empty());
    }
}
