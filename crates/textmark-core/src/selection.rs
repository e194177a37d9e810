//! Pointer interaction with the annotation: press routing and dragging.

use crate::annotation::Annotation;
use kurbo::{Point, Vec2};

/// What a left-button press on the surface should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressOutcome {
    /// Start moving the annotation.
    BeginDrag,
    /// Double-click on the annotation: start in-place editing.
    EnterEditing,
    /// Press inside the annotation while editing: move the caret.
    PlaceCursor,
    /// Press outside the annotation while editing.
    ExitEditing,
    /// Press on empty surface: the annotation loses focus.
    Blur,
}

/// Decide what a press at `point` does.
pub fn classify_press(annotation: &Annotation, point: Point, double_click: bool) -> PressOutcome {
    let hit = annotation.hit_test(point);
    match (annotation.is_editing(), hit) {
        (true, true) => PressOutcome::PlaceCursor,
        (true, false) => PressOutcome::ExitEditing,
        (false, true) if double_click => PressOutcome::EnterEditing,
        (false, true) => PressOutcome::BeginDrag,
        (false, false) => PressOutcome::Blur,
    }
}

/// State of an in-progress annotation drag.
#[derive(Debug, Clone, Copy)]
pub struct DragState {
    /// Starting point of the drag.
    pub start_point: Point,
    /// Current point of the drag.
    pub current_point: Point,
    /// Annotation position when the drag began.
    pub original_position: Point,
}

impl DragState {
    pub fn new(start_point: Point, original_position: Point) -> Self {
        Self {
            start_point,
            current_point: start_point,
            original_position,
        }
    }

    pub fn delta(&self) -> Vec2 {
        self.current_point - self.start_point
    }

    /// Where the annotation belongs for the current pointer position.
    pub fn target(&self) -> Point {
        self.original_position + self.delta()
    }

    /// Track the pointer and move the annotation along with it.
    pub fn update(&mut self, pointer: Point, annotation: &mut Annotation) {
        if pointer == self.current_point {
            return;
        }
        self.current_point = pointer;
        annotation.drag_to(self.target());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::AnnotationEvent;

    fn annotation() -> Annotation {
        let mut annotation = Annotation::new();
        annotation.set_box_width(200.0);
        annotation
    }

    #[test]
    fn test_classify_press() {
        let mut annotation = annotation();
        let inside = Point::new(60.0, 60.0);
        let outside = Point::new(700.0, 500.0);

        assert_eq!(classify_press(&annotation, inside, false), PressOutcome::BeginDrag);
        assert_eq!(classify_press(&annotation, inside, true), PressOutcome::EnterEditing);
        assert_eq!(classify_press(&annotation, outside, false), PressOutcome::Blur);
        assert_eq!(classify_press(&annotation, outside, true), PressOutcome::Blur);

        annotation.enter_editing();
        assert_eq!(classify_press(&annotation, inside, false), PressOutcome::PlaceCursor);
        assert_eq!(classify_press(&annotation, inside, true), PressOutcome::PlaceCursor);
        assert_eq!(classify_press(&annotation, outside, false), PressOutcome::ExitEditing);
    }

    #[test]
    fn test_padding_is_grabbable() {
        let annotation = annotation();
        // 4px left of the text, inside the 6px padding
        assert_eq!(
            classify_press(&annotation, Point::new(46.0, 55.0), false),
            PressOutcome::BeginDrag
        );
    }

    #[test]
    fn test_drag_keeps_grab_offset() {
        let mut annotation = annotation();
        let mut drag = DragState::new(Point::new(70.0, 60.0), annotation.position);

        drag.update(Point::new(170.0, 160.0), &mut annotation);
        assert_eq!(annotation.position, Point::new(150.0, 150.0));
        assert_eq!(drag.delta(), Vec2::new(100.0, 100.0));
        assert_eq!(annotation.take_events(), vec![AnnotationEvent::Moving]);

        // Same pointer position: no notification
        drag.update(Point::new(170.0, 160.0), &mut annotation);
        assert!(annotation.take_events().is_empty());
    }
}
