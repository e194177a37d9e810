//! Floating toolbar geometry.

use kurbo::{Point, Size};

/// Horizontal space reserved for the toolbar when clamping.
pub const TOOLBAR_WIDTH: f64 = 250.0;
/// Vertical space reserved for the toolbar when clamping.
pub const TOOLBAR_HEIGHT: f64 = 50.0;
/// Distance from the annotation's top edge up to the toolbar.
pub const TOOLBAR_OFFSET_Y: f64 = 80.0;
/// Toolbar position when it is not following the annotation.
pub const DEFAULT_TOOLBAR_POSITION: Point = Point::new(50.0, 10.0);

/// How the toolbar position is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToolbarPlacement {
    /// Parked at [`DEFAULT_TOOLBAR_POSITION`].
    Resting,
    /// Tracks the annotation through [`toolbar_position`].
    #[default]
    Following,
}

impl ToolbarPlacement {
    pub fn resolve(self, annotation_position: Point, container: Size) -> Point {
        match self {
            ToolbarPlacement::Resting => DEFAULT_TOOLBAR_POSITION,
            ToolbarPlacement::Following => toolbar_position(annotation_position, container),
        }
    }
}

/// Toolbar top-left for an annotation at `annotation_position`.
///
/// Sits [`TOOLBAR_OFFSET_Y`] above the annotation and stays inside the
/// container. A container smaller than the toolbar pins it to 0.
pub fn toolbar_position(annotation_position: Point, container: Size) -> Point {
    let left = annotation_position
        .x
        .min(container.width - TOOLBAR_WIDTH)
        .max(0.0);
    let top = (annotation_position.y - TOOLBAR_OFFSET_Y)
        .min(container.height - TOOLBAR_HEIGHT)
        .max(0.0);
    Point::new(left, top)
}
