//! Geometry provider: the presentation layer's measurement capability
//!
//! Rectangle geometry is produced asynchronously by the presentation layer
//! (text reflow, font loading), so the core queries it on demand instead of
//! observing it. `None` means "not rendered yet" and triggers the fallback
//! connector.

use crate::models::Rect;

/// On-demand bounding rectangles for rendered elements
pub trait GeometryProvider {
    /// Current bounding rectangle of a note card, if rendered
    fn note_rect(&self, note_id: &str) -> Option<Rect>;

    /// Current bounding rectangle of the line enclosing a highlight's anchor,
    /// if rendered
    fn anchor_rect(&self, highlight_id: &str) -> Option<Rect>;

    /// The canvas viewport
    fn viewport(&self) -> Rect;
}

/// Fixed-rectangle provider for tests and headless runs
#[derive(Debug, Clone, Default)]
pub struct StaticGeometry {
    pub notes: std::collections::HashMap<String, Rect>,
    pub anchors: std::collections::HashMap<String, Rect>,
    pub viewport: Rect,
}

impl GeometryProvider for StaticGeometry {
    fn note_rect(&self, note_id: &str) -> Option<Rect> {
        self.notes.get(note_id).copied()
    }

    fn anchor_rect(&self, highlight_id: &str) -> Option<Rect> {
        self.anchors.get(highlight_id).copied()
    }

    fn viewport(&self) -> Rect {
        self.viewport
    }
}
