//! Input events delivered to a panel by the host.

use serde::{Deserialize, Serialize};

/// Pointer and wheel input on the preview surface.
///
/// Coordinates are in preview space. Events act on the active layer only;
/// there is no hit-testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum PanelEvent {
    /// Primary button pressed: records the drag anchor.
    PointerDown {
        /// X coordinate.
        x: i32,
        /// Y coordinate.
        y: i32,
    },

    /// Pointer moved with the button held.
    PointerDrag {
        /// X coordinate.
        x: i32,
        /// Y coordinate.
        y: i32,
    },

    /// Primary button released.
    PointerUp,

    /// Wheel notch. Positive grows the active layer, anything else shrinks it.
    Wheel {
        /// Signed wheel delta.
        delta: i32,
    },
}
