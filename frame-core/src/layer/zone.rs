//! Exclusion-zone layer payload.

use crate::Rect;

/// Rectangles punched fully transparent in every composite, so the printed
/// frame shows the photos mounted behind it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExclusionZoneLayer {
    zones: Vec<Rect>,
}

impl ExclusionZoneLayer {
    /// Create a layer over `zones`.
    #[must_use]
    pub fn new(zones: Vec<Rect>) -> Self {
        Self { zones }
    }

    /// Preview-space rectangles.
    #[must_use]
    pub fn zones(&self) -> &[Rect] {
        &self.zones
    }

    /// Replace every rectangle.
    pub fn set_zones(&mut self, zones: Vec<Rect>) {
        self.zones = zones;
    }
}
