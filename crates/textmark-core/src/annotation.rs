//! The text annotation placed on the surface.

use crate::measure::PLACEHOLDER_TEXT;
use crate::options::{FontFamily, FontSize, NamedColor};
use kurbo::{Point, Rect};
use peniko::Color;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for the annotation.
pub type AnnotationId = Uuid;

/// Where a freshly created or cleared annotation sits.
pub const HOME_POSITION: Point = Point::new(50.0, 50.0);

/// Notifications queued by the annotation's own edit and move machinery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationEvent {
    /// Content changed through in-place typing.
    Changed,
    /// The annotation was dragged.
    Moving,
    EditingEntered,
    EditingExited,
}

/// A single editable, draggable text box.
///
/// Canvas-side mutations (`type_text`, `drag_to`, `enter_editing`,
/// `exit_editing`) queue an [`AnnotationEvent`]. The `set_*` methods are
/// programmatic writes and queue nothing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Annotation {
    id: AnnotationId,
    /// Top-left corner of the text box, in surface pixels.
    pub position: Point,
    content: String,
    font_family: FontFamily,
    font_size: FontSize,
    color: NamedColor,
    box_width: f64,
    editing: bool,
    /// Bumped on every programmatic content write.
    content_revision: u64,
    #[serde(skip)]
    events: Vec<AnnotationEvent>,
}

impl Annotation {
    /// Space between the text and the dashed border.
    pub const PADDING: f64 = 6.0;
    /// Dash pattern of the border.
    pub const BORDER_DASHES: [f64; 2] = [5.0, 5.0];
    pub const BORDER_WIDTH: f64 = 1.0;
    /// Line height as a multiple of the font size.
    pub const LINE_HEIGHT: f64 = 1.2;

    /// Create an annotation showing the placeholder at the home position.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            position: HOME_POSITION,
            content: PLACEHOLDER_TEXT.to_string(),
            font_family: FontFamily::default(),
            font_size: FontSize::default(),
            color: NamedColor::default(),
            box_width: 0.0,
            editing: false,
            content_revision: 0,
            events: Vec::new(),
        }
    }

    pub fn id(&self) -> AnnotationId {
        self.id
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn font_family(&self) -> FontFamily {
        self.font_family
    }

    pub fn font_size(&self) -> FontSize {
        self.font_size
    }

    pub fn color(&self) -> NamedColor {
        self.color
    }

    pub fn box_width(&self) -> f64 {
        self.box_width
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn content_revision(&self) -> u64 {
        self.content_revision
    }

    /// Border color of the text box.
    pub fn border_color() -> Color {
        Color::from_rgb8(0, 0, 0)
    }

    // --- canvas-side mutations ---

    /// Replace the content from in-place editing.
    pub fn type_text(&mut self, text: &str) {
        if self.content == text {
            return;
        }
        self.content = text.to_string();
        self.events.push(AnnotationEvent::Changed);
    }

    /// Move the annotation from a pointer drag.
    pub fn drag_to(&mut self, position: Point) {
        self.position = position;
        self.events.push(AnnotationEvent::Moving);
    }

    pub fn enter_editing(&mut self) {
        if !self.editing {
            self.editing = true;
            self.events.push(AnnotationEvent::EditingEntered);
        }
    }

    pub fn exit_editing(&mut self) {
        if self.editing {
            self.editing = false;
            self.events.push(AnnotationEvent::EditingExited);
        }
    }

    /// Drain the queued notifications.
    pub fn take_events(&mut self) -> Vec<AnnotationEvent> {
        std::mem::take(&mut self.events)
    }

    /// Drop queued notifications of one kind.
    pub(crate) fn discard_events(&mut self, kind: AnnotationEvent) {
        self.events.retain(|event| *event != kind);
    }

    // --- programmatic writes ---

    /// Write the content. Returns `false` when it was already equal.
    pub fn set_content(&mut self, content: &str) -> bool {
        if self.content == content {
            return false;
        }
        self.content = content.to_string();
        self.content_revision += 1;
        true
    }

    pub fn set_font_family(&mut self, family: FontFamily) {
        self.font_family = family;
    }

    pub fn set_font_size(&mut self, size: FontSize) {
        self.font_size = size;
    }

    pub fn set_color(&mut self, color: NamedColor) {
        self.color = color;
    }

    pub fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    pub fn set_box_width(&mut self, width: f64) {
        self.box_width = width;
    }

    /// Leave edit mode without notifying.
    pub(crate) fn force_idle(&mut self) {
        self.editing = false;
    }

    /// Approximate height based on font size and number of lines.
    pub fn approximate_height(&self) -> f64 {
        let line_count = self.content.lines().count().max(1);
        // lines() drops a trailing empty line
        let line_count = if self.content.ends_with('\n') {
            line_count + 1
        } else {
            line_count
        };
        line_count as f64 * self.font_size.points() * Self::LINE_HEIGHT
    }

    /// Text box without padding.
    pub fn text_bounds(&self) -> Rect {
        Rect::new(
            self.position.x,
            self.position.y,
            self.position.x + self.box_width,
            self.position.y + self.approximate_height(),
        )
    }

    /// Box including padding, as outlined by the dashed border.
    pub fn bounds(&self) -> Rect {
        self.text_bounds().inflate(Self::PADDING, Self::PADDING)
    }

    pub fn hit_test(&self, point: Point) -> bool {
        self.bounds().contains(point)
    }
}

impl Default for Annotation {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_annotation_creation() {
        let annotation = Annotation::new();
        assert_eq!(annotation.content(), PLACEHOLDER_TEXT);
        assert_eq!(annotation.position, HOME_POSITION);
        assert_eq!(annotation.font_family(), FontFamily::Roboto);
        assert_eq!(annotation.font_size(), FontSize::Pt20);
        assert_eq!(annotation.color(), NamedColor::Black);
        assert!(!annotation.is_editing());
    }

    #[test]
    fn test_type_text_queues_changed_once() {
        let mut annotation = Annotation::new();
        annotation.type_text("Hello");
        annotation.type_text("Hello");
        assert_eq!(annotation.take_events(), vec![AnnotationEvent::Changed]);
        assert!(annotation.take_events().is_empty());
        // Typing does not count as a programmatic write
        assert_eq!(annotation.content_revision(), 0);
    }

    #[test]
    fn test_set_content_is_silent() {
        let mut annotation = Annotation::new();
        assert!(annotation.set_content("Hi"));
        assert!(!annotation.set_content("Hi"));
        assert_eq!(annotation.content_revision(), 1);
        assert!(annotation.take_events().is_empty());
    }

    #[test]
    fn test_editing_transitions() {
        let mut annotation = Annotation::new();
        annotation.enter_editing();
        annotation.enter_editing();
        annotation.exit_editing();
        assert_eq!(
            annotation.take_events(),
            vec![AnnotationEvent::EditingEntered, AnnotationEvent::EditingExited]
        );
    }

    #[test]
    fn test_drag_to() {
        let mut annotation = Annotation::new();
        annotation.drag_to(Point::new(120.0, 80.0));
        assert_eq!(annotation.position, Point::new(120.0, 80.0));
        assert_eq!(annotation.take_events(), vec![AnnotationEvent::Moving]);
    }

    #[test]
    fn test_bounds_include_padding() {
        let mut annotation = Annotation::new();
        annotation.set_box_width(100.0);
        let bounds = annotation.bounds();
        assert!((bounds.x0 - 44.0).abs() < f64::EPSILON);
        assert!((bounds.width() - 112.0).abs() < f64::EPSILON);
        assert!((bounds.height() - (20.0 * 1.2 + 12.0)).abs() < 1e-9);
        assert!(annotation.hit_test(Point::new(46.0, 46.0)));
        assert!(!annotation.hit_test(Point::new(10.0, 10.0)));
    }

    #[test]
    fn test_approximate_height_counts_trailing_newline() {
        let mut annotation = Annotation::new();
        annotation.set_content("one\ntwo\n");
        assert!((annotation.approximate_height() - 3.0 * 20.0 * 1.2).abs() < 1e-9);
    }
}
