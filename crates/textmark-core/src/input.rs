//! Pointer and modifier state for the annotation surface.

use kurbo::Point;

// Use web_time for WASM compatibility
#[cfg(not(target_arch = "wasm32"))]
pub use std::time::Instant;
#[cfg(target_arch = "wasm32")]
pub use web_time::Instant;

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

/// Pointer event in surface coordinates.
#[derive(Debug, Clone, Copy)]
pub enum PointerEvent {
    Down { position: Point, button: MouseButton },
    Up { position: Point, button: MouseButton },
    Move { position: Point },
}

/// Double-click detection constants.
pub const DOUBLE_CLICK_TIME_MS: u128 = 500;
pub const DOUBLE_CLICK_DISTANCE: f64 = 5.0;

/// Tracks pointer state between events.
#[derive(Debug, Clone)]
pub struct InputState {
    /// Current pointer position in surface coordinates.
    pub pointer_position: Point,
    pub modifiers: Modifiers,
    last_click: Option<(Instant, Point)>,
    double_click: bool,
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            pointer_position: Point::ZERO,
            modifiers: Modifiers::default(),
            last_click: None,
            double_click: false,
        }
    }
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a pointer event at the current time.
    pub fn handle_pointer_event(&mut self, event: PointerEvent) {
        self.handle_pointer_event_at(event, Instant::now());
    }

    /// Process a pointer event that happened at `now`.
    pub fn handle_pointer_event_at(&mut self, event: PointerEvent, now: Instant) {
        match event {
            PointerEvent::Down { position, button } => {
                self.pointer_position = position;
                if button != MouseButton::Left {
                    return;
                }
                self.double_click = match self.last_click {
                    Some((time, at)) => {
                        now.duration_since(time).as_millis() < DOUBLE_CLICK_TIME_MS
                            && (position - at).hypot() < DOUBLE_CLICK_DISTANCE
                    }
                    None => false,
                };
                // A detected double-click does not arm a third click
                self.last_click = if self.double_click {
                    None
                } else {
                    Some((now, position))
                };
            }
            PointerEvent::Up { position, .. } => {
                self.pointer_position = position;
            }
            PointerEvent::Move { position } => {
                self.pointer_position = position;
            }
        }
    }

    pub fn set_modifiers(&mut self, modifiers: Modifiers) {
        self.modifiers = modifiers;
    }

    /// Whether the most recent left press completed a double-click.
    pub fn is_double_click(&self) -> bool {
        self.double_click
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn down(x: f64, y: f64) -> PointerEvent {
        PointerEvent::Down {
            position: Point::new(x, y),
            button: MouseButton::Left,
        }
    }

    fn up(x: f64, y: f64) -> PointerEvent {
        PointerEvent::Up {
            position: Point::new(x, y),
            button: MouseButton::Left,
        }
    }

    #[test]
    fn test_pointer_position_tracks_events() {
        let mut input = InputState::new();
        input.handle_pointer_event(down(100.0, 100.0));
        assert_eq!(input.pointer_position, Point::new(100.0, 100.0));

        input.handle_pointer_event(PointerEvent::Move {
            position: Point::new(150.0, 120.0),
        });
        assert_eq!(input.pointer_position, Point::new(150.0, 120.0));

        input.handle_pointer_event(up(160.0, 130.0));
        assert_eq!(input.pointer_position, Point::new(160.0, 130.0));
    }

    #[test]
    fn test_right_button_ignored() {
        let mut input = InputState::new();
        input.handle_pointer_event(PointerEvent::Down {
            position: Point::new(10.0, 10.0),
            button: MouseButton::Right,
        });
        assert!(!input.is_double_click());
        assert_eq!(input.pointer_position, Point::new(10.0, 10.0));
    }

    #[test]
    fn test_double_click_detection() {
        let mut input = InputState::new();
        let t0 = Instant::now();

        input.handle_pointer_event_at(down(100.0, 100.0), t0);
        assert!(!input.is_double_click());
        input.handle_pointer_event_at(up(100.0, 100.0), t0);

        input.handle_pointer_event_at(down(102.0, 101.0), t0 + Duration::from_millis(200));
        assert!(input.is_double_click());

        // Third click does not chain into another double-click
        input.handle_pointer_event_at(down(102.0, 101.0), t0 + Duration::from_millis(300));
        assert!(!input.is_double_click());
    }

    #[test]
    fn test_double_click_too_slow() {
        let mut input = InputState::new();
        let t0 = Instant::now();
        input.handle_pointer_event_at(down(100.0, 100.0), t0);
        input.handle_pointer_event_at(down(100.0, 100.0), t0 + Duration::from_millis(600));
        assert!(!input.is_double_click());
    }

    #[test]
    fn test_double_click_too_far() {
        let mut input = InputState::new();
        let t0 = Instant::now();
        input.handle_pointer_event_at(down(100.0, 100.0), t0);
        input.handle_pointer_event_at(down(200.0, 200.0), t0 + Duration::from_millis(100));
        assert!(!input.is_double_click());
    }
}
