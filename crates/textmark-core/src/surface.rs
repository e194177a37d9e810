//! The annotation surface: one annotation kept in sync with toolbar state.
//!
//! [`AnnotationState`] is the single source of truth for what the toolbar
//! shows. Two projections keep it and the [`Annotation`] aligned:
//!
//! - canvas to state: [`Surface::dispatch_events`] drains the annotation's
//!   queued notifications after the user typed, dragged or toggled edit mode;
//! - state to canvas: [`Surface::apply_state`] writes text, font, size and
//!   color back onto the annotation after a toolbar change.

use crate::annotation::{Annotation, AnnotationEvent, HOME_POSITION};
use crate::measure::{self, PLACEHOLDER_TEXT, TextMeasure};
use crate::options::{Duration, FontFamily, FontSize, NamedColor};
use crate::toolbar::ToolbarPlacement;
use kurbo::{Point, Size};
use thiserror::Error;

/// Surface errors.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SurfaceError {
    #[error("container has no usable size ({width} x {height})")]
    InvalidContainer { width: f64, height: f64 },
}

pub type SurfaceResult<T> = Result<T, SurfaceError>;

/// UI-visible state of the annotation.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationState {
    pub text: String,
    pub font_family: FontFamily,
    pub font_size: FontSize,
    pub color: NamedColor,
    /// Inert: kept for the toolbar, never applied.
    pub duration: Duration,
    /// Whether the annotation is capturing keystrokes.
    pub editing: bool,
    /// False while the placeholder is showing.
    pub has_user_content: bool,
}

impl Default for AnnotationState {
    fn default() -> Self {
        Self {
            text: PLACEHOLDER_TEXT.to_string(),
            font_family: FontFamily::default(),
            font_size: FontSize::default(),
            color: NamedColor::default(),
            duration: Duration::default(),
            editing: false,
            has_user_content: false,
        }
    }
}

/// Drawing surface holding exactly one annotation.
#[derive(Debug)]
pub struct Surface {
    container: Size,
    annotation: Annotation,
    state: AnnotationState,
    toolbar: ToolbarPlacement,
    /// Whether the annotation is the active object.
    focused: bool,
    render_generation: u64,
    needs_render: bool,
}

fn validate_container(container: Size) -> SurfaceResult<Size> {
    let usable = container.width.is_finite()
        && container.height.is_finite()
        && container.width > 0.0
        && container.height > 0.0;
    if usable {
        Ok(container)
    } else {
        Err(SurfaceError::InvalidContainer {
            width: container.width,
            height: container.height,
        })
    }
}

impl Surface {
    /// Create the surface for a container and place the annotation on it.
    pub fn mount(container: Size, measure: &mut dyn TextMeasure) -> SurfaceResult<Self> {
        let container = validate_container(container)?;
        let mut surface = Self {
            container,
            annotation: Annotation::new(),
            state: AnnotationState::default(),
            toolbar: ToolbarPlacement::Following,
            focused: true,
            render_generation: 0,
            needs_render: false,
        };
        surface.refresh_box_width(measure);
        surface.request_render();
        log::info!(
            "Mounted annotation surface {}x{} (annotation {})",
            container.width,
            container.height,
            surface.annotation.id()
        );
        Ok(surface)
    }

    pub fn container(&self) -> Size {
        self.container
    }

    pub fn annotation(&self) -> &Annotation {
        &self.annotation
    }

    /// Mutable access for the canvas-side machinery (typing, dragging, edit mode).
    pub fn annotation_mut(&mut self) -> &mut Annotation {
        &mut self.annotation
    }

    pub fn state(&self) -> &AnnotationState {
        &self.state
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn set_focused(&mut self, focused: bool) {
        if self.focused != focused {
            self.focused = focused;
            self.request_render();
        }
    }

    /// Where the floating toolbar currently belongs.
    pub fn toolbar_position(&self) -> Point {
        self.toolbar.resolve(self.annotation.position, self.container)
    }

    /// Number of render requests raised so far.
    pub fn render_generation(&self) -> u64 {
        self.render_generation
    }

    /// Returns whether a render was requested since the last call.
    pub fn take_render_request(&mut self) -> bool {
        std::mem::take(&mut self.needs_render)
    }

    fn request_render(&mut self) {
        self.render_generation += 1;
        self.needs_render = true;
    }

    fn refresh_box_width(&mut self, measure: &mut dyn TextMeasure) {
        let width = measure::box_width(
            self.state.has_user_content,
            self.annotation.font_family(),
            self.annotation.font_size(),
            measure,
        );
        self.annotation.set_box_width(width);
    }

    /// Update the container bounds after a resize.
    pub fn resize(&mut self, container: Size) -> SurfaceResult<()> {
        self.container = validate_container(container)?;
        self.request_render();
        Ok(())
    }

    // --- canvas -> state ---

    /// Mirror queued annotation notifications into the state.
    ///
    /// Returns the number of notifications handled.
    pub fn dispatch_events(&mut self, measure: &mut dyn TextMeasure) -> usize {
        let events = self.annotation.take_events();
        for event in &events {
            match event {
                AnnotationEvent::Changed => self.on_text_changed(measure),
                AnnotationEvent::Moving => self.on_moved(),
                AnnotationEvent::EditingEntered => {
                    log::debug!("Annotation entered edit mode");
                    self.state.editing = true;
                }
                AnnotationEvent::EditingExited => {
                    log::debug!("Annotation left edit mode");
                    self.state.editing = false;
                }
            }
        }
        events.len()
    }

    fn on_text_changed(&mut self, measure: &mut dyn TextMeasure) {
        let content = self.annotation.content();
        if content == self.state.text && self.state.has_user_content {
            return;
        }
        if !self.state.has_user_content {
            log::debug!("Placeholder replaced by user text");
            self.state.has_user_content = true;
        }
        self.state.text = content.to_string();
        self.refresh_box_width(measure);
        self.toolbar = ToolbarPlacement::Following;
        self.request_render();
    }

    fn on_moved(&mut self) {
        self.toolbar = ToolbarPlacement::Following;
        self.request_render();
    }

    // --- state -> canvas ---

    /// Write text, font, size and color from the state onto the annotation.
    ///
    /// Writing text equal to the current content leaves the annotation's
    /// content revision alone, so an in-place editor keeps its cursor.
    pub fn apply_state(&mut self, measure: &mut dyn TextMeasure) {
        let text_written = self.annotation.set_content(&self.state.text);
        self.annotation.set_font_family(self.state.font_family);
        self.annotation.set_font_size(self.state.font_size);
        self.annotation.set_color(self.state.color);
        self.refresh_box_width(measure);
        // Anything typed before this write is superseded by the state
        self.annotation.discard_events(AnnotationEvent::Changed);

        self.toolbar = ToolbarPlacement::Following;
        self.request_render();
        log::debug!(
            "Applied state: font={} size={} color={} text_written={}",
            self.state.font_family.name(),
            self.state.font_size.display_name(),
            self.state.color.display_name(),
            text_written
        );
    }

    /// Set the text from outside the canvas.
    ///
    /// Any explicit write, empty included, replaces the placeholder.
    pub fn set_text(&mut self, text: &str, measure: &mut dyn TextMeasure) {
        self.state.has_user_content = true;
        self.state.text = text.to_string();
        self.apply_state(measure);
    }

    pub fn set_font(&mut self, family: FontFamily, measure: &mut dyn TextMeasure) {
        self.state.font_family = family;
        self.apply_state(measure);
    }

    pub fn set_size(&mut self, size: FontSize, measure: &mut dyn TextMeasure) {
        self.state.font_size = size;
        self.apply_state(measure);
    }

    pub fn set_color(&mut self, color: NamedColor, measure: &mut dyn TextMeasure) {
        self.state.color = color;
        self.apply_state(measure);
    }

    /// Record the duration. It has no effect on the annotation.
    pub fn set_duration(&mut self, duration: Duration) {
        log::debug!("Duration set to {}", duration.display_name());
        self.state.duration = duration;
    }

    /// Clear the annotation and send it home.
    ///
    /// The annotation object survives; the placeholder is not restored.
    pub fn delete(&mut self, measure: &mut dyn TextMeasure) {
        self.state.has_user_content = true;
        self.state.text.clear();
        self.state.editing = false;
        self.annotation.force_idle();
        self.annotation.set_position(HOME_POSITION);
        self.apply_state(measure);
        // Notifications from before the delete refer to the old content
        self.annotation.take_events();
        self.focused = true;
        self.toolbar = ToolbarPlacement::Resting;
        log::debug!("Annotation cleared");
    }

    // --- edit mode ---

    /// Put the annotation into edit mode and focus it.
    pub fn begin_editing(&mut self, measure: &mut dyn TextMeasure) {
        self.focused = true;
        self.annotation.enter_editing();
        self.dispatch_events(measure);
        self.request_render();
    }

    pub fn end_editing(&mut self, measure: &mut dyn TextMeasure) {
        self.annotation.exit_editing();
        self.dispatch_events(measure);
        self.request_render();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measure::{ApproximateMeasure, min_box_width};
    use crate::toolbar::DEFAULT_TOOLBAR_POSITION;

    fn mounted() -> Surface {
        Surface::mount(Size::new(800.0, 600.0), &mut ApproximateMeasure).unwrap()
    }

    fn placeholder_width(family: FontFamily, size: FontSize) -> f64 {
        ApproximateMeasure.measure_width(PLACEHOLDER_TEXT, family, size)
    }

    #[test]
    fn test_mount_defaults() {
        let surface = mounted();
        let annotation = surface.annotation();
        assert_eq!(annotation.content(), PLACEHOLDER_TEXT);
        assert_eq!(annotation.position, Point::new(50.0, 50.0));
        assert_eq!(annotation.font_family(), FontFamily::Roboto);
        assert_eq!(annotation.font_size(), FontSize::Pt20);
        assert_eq!(
            annotation.box_width(),
            placeholder_width(FontFamily::Roboto, FontSize::Pt20)
        );
        assert!(surface.is_focused());
        assert!(!surface.state().has_user_content);
        assert_eq!(surface.toolbar_position(), Point::new(50.0, 0.0));
        assert_eq!(surface.render_generation(), 1);
    }

    #[test]
    fn test_mount_rejects_invalid_container() {
        let mut measure = ApproximateMeasure;
        assert!(matches!(
            Surface::mount(Size::new(0.0, 600.0), &mut measure),
            Err(SurfaceError::InvalidContainer { .. })
        ));
        assert!(Surface::mount(Size::new(800.0, f64::NAN), &mut measure).is_err());
        assert!(Surface::mount(Size::new(-1.0, -1.0), &mut measure).is_err());
    }

    #[test]
    fn test_every_selection_applies_and_renders() {
        let mut surface = mounted();
        let mut measure = ApproximateMeasure;

        for &family in FontFamily::all() {
            let before = surface.render_generation();
            surface.set_font(family, &mut measure);
            assert_eq!(surface.annotation().font_family(), family);
            assert!(surface.render_generation() > before);
        }
        for &size in FontSize::all() {
            let before = surface.render_generation();
            surface.set_size(size, &mut measure);
            assert_eq!(surface.annotation().font_size(), size);
            assert!(surface.render_generation() > before);
        }
        for &color in NamedColor::all() {
            let before = surface.render_generation();
            surface.set_color(color, &mut measure);
            assert_eq!(surface.annotation().color(), color);
            assert!(surface.render_generation() > before);
        }
    }

    #[test]
    fn test_apply_state_is_idempotent() {
        let mut surface = mounted();
        let mut measure = ApproximateMeasure;
        surface.set_text("Hello", &mut measure);
        surface.set_font(FontFamily::Georgia, &mut measure);

        let once = surface.annotation().clone();
        let revision = once.content_revision();
        surface.apply_state(&mut measure);
        let twice = surface.annotation();

        assert_eq!(twice.content(), once.content());
        assert_eq!(twice.font_family(), once.font_family());
        assert_eq!(twice.font_size(), once.font_size());
        assert_eq!(twice.color(), once.color());
        assert_eq!(twice.box_width(), once.box_width());
        assert_eq!(twice.position, once.position);
        assert_eq!(twice.content_revision(), revision);
    }

    #[test]
    fn test_sentinel_exit() {
        let mut surface = mounted();
        let mut measure = ApproximateMeasure;
        assert_eq!(surface.state().text, PLACEHOLDER_TEXT);

        surface.annotation_mut().type_text("Hello");
        assert_eq!(surface.dispatch_events(&mut measure), 1);

        assert_eq!(surface.state().text, "Hello");
        assert!(surface.state().has_user_content);
        assert_eq!(surface.annotation().box_width(), min_box_width(FontSize::Pt20));
    }

    #[test]
    fn test_set_empty_text_uses_minimum_width() {
        let mut surface = mounted();
        let mut measure = ApproximateMeasure;
        surface.set_text("", &mut measure);

        assert!(surface.state().has_user_content);
        assert_eq!(surface.annotation().content(), "");
        let width = surface.annotation().box_width();
        assert!((width - min_box_width(FontSize::Pt20)).abs() < 1e-9);

        // Changing size keeps the minimum rule rather than the placeholder width
        surface.set_size(FontSize::Pt72, &mut measure);
        let width = surface.annotation().box_width();
        assert!((width - min_box_width(FontSize::Pt72)).abs() < 1e-9);
    }

    #[test]
    fn test_typing_placeholder_literally_counts_as_content() {
        let mut surface = mounted();
        let mut measure = ApproximateMeasure;
        surface.annotation_mut().type_text("Start");
        surface.dispatch_events(&mut measure);
        surface.annotation_mut().type_text(PLACEHOLDER_TEXT);
        surface.dispatch_events(&mut measure);

        assert_eq!(surface.state().text, PLACEHOLDER_TEXT);
        assert!(surface.state().has_user_content);
        assert_eq!(surface.annotation().box_width(), min_box_width(FontSize::Pt20));
    }

    #[test]
    fn test_width_rule_for_all_font_size_pairs() {
        let mut surface = mounted();
        let mut measure = ApproximateMeasure;

        for &family in FontFamily::all() {
            for &size in FontSize::all() {
                surface.set_font(family, &mut measure);
                surface.set_size(size, &mut measure);
                assert_eq!(surface.annotation().content(), PLACEHOLDER_TEXT);
                assert_eq!(surface.annotation().box_width(), placeholder_width(family, size));
            }
        }

        surface.annotation_mut().type_text("Hello");
        surface.dispatch_events(&mut measure);
        for &family in FontFamily::all() {
            for &size in FontSize::all() {
                surface.set_font(family, &mut measure);
                surface.set_size(size, &mut measure);
                assert_eq!(surface.annotation().box_width(), min_box_width(size));
            }
        }
    }

    #[test]
    fn test_unchanged_text_converges() {
        let mut surface = mounted();
        let mut measure = ApproximateMeasure;
        surface.annotation_mut().type_text("Hello");
        surface.dispatch_events(&mut measure);
        let generation = surface.render_generation();

        // A state write of the same text keeps the editor's revision
        let revision = surface.annotation().content_revision();
        surface.set_color(NamedColor::Red, &mut measure);
        assert_eq!(surface.annotation().content_revision(), revision);
        assert_eq!(surface.dispatch_events(&mut measure), 0);
        assert!(surface.render_generation() > generation);
    }

    #[test]
    fn test_apply_state_drops_stale_changes() {
        let mut surface = mounted();
        let mut measure = ApproximateMeasure;
        surface.set_text("From toolbar", &mut measure);
        surface.annotation_mut().type_text("typed");
        surface.apply_state(&mut measure);

        assert_eq!(surface.annotation().content(), "From toolbar");
        assert_eq!(surface.dispatch_events(&mut measure), 0);
        assert_eq!(surface.state().text, "From toolbar");
    }

    #[test]
    fn test_drag_moves_toolbar() {
        let mut surface = mounted();
        let mut measure = ApproximateMeasure;
        surface.annotation_mut().drag_to(Point::new(300.0, 700.0));
        surface.dispatch_events(&mut measure);
        assert_eq!(surface.toolbar_position(), Point::new(300.0, 550.0));

        surface.annotation_mut().drag_to(Point::new(-20.0, 200.0));
        surface.dispatch_events(&mut measure);
        assert_eq!(surface.toolbar_position(), Point::new(0.0, 120.0));
    }

    #[test]
    fn test_delete_scenario() {
        let mut surface = mounted();
        let mut measure = ApproximateMeasure;
        surface.annotation_mut().type_text("Hello World");
        surface.annotation_mut().drag_to(Point::new(300.0, 300.0));
        surface.dispatch_events(&mut measure);
        surface.set_focused(false);

        surface.delete(&mut measure);

        assert_eq!(surface.annotation().content(), "");
        assert_eq!(surface.state().text, "");
        assert_eq!(surface.annotation().position, Point::new(50.0, 50.0));
        assert_eq!(surface.toolbar_position(), DEFAULT_TOOLBAR_POSITION);
        assert!(surface.is_focused());
        assert_ne!(surface.annotation().content(), PLACEHOLDER_TEXT);
        assert_eq!(surface.annotation().box_width(), min_box_width(FontSize::Pt20));
    }

    #[test]
    fn test_delete_while_editing() {
        let mut surface = mounted();
        let mut measure = ApproximateMeasure;
        surface.begin_editing(&mut measure);
        surface.annotation_mut().type_text("draft");
        surface.delete(&mut measure);

        assert!(!surface.annotation().is_editing());
        assert!(!surface.state().editing);
        assert_eq!(surface.dispatch_events(&mut measure), 0);
        assert_eq!(surface.state().text, "");
    }

    #[test]
    fn test_toolbar_follows_again_after_delete() {
        let mut surface = mounted();
        let mut measure = ApproximateMeasure;
        surface.delete(&mut measure);
        assert_eq!(surface.toolbar_position(), DEFAULT_TOOLBAR_POSITION);

        surface.set_size(FontSize::Pt56, &mut measure);
        assert_eq!(surface.toolbar_position(), Point::new(50.0, 0.0));
    }

    #[test]
    fn test_editing_is_tracked() {
        let mut surface = mounted();
        let mut measure = ApproximateMeasure;
        surface.begin_editing(&mut measure);
        assert!(surface.state().editing);
        assert!(surface.annotation().is_editing());
        surface.end_editing(&mut measure);
        assert!(!surface.state().editing);
    }

    #[test]
    fn test_duration_is_inert() {
        let mut surface = mounted();
        let before = surface.annotation().clone();
        let generation = surface.render_generation();
        surface.set_duration(Duration::SecondHalf);

        assert_eq!(surface.state().duration, Duration::SecondHalf);
        assert_eq!(surface.render_generation(), generation);
        assert_eq!(surface.annotation().content(), before.content());
        assert_eq!(surface.annotation().box_width(), before.box_width());
    }

    #[test]
    fn test_resize_reclamps_toolbar() {
        let mut surface = mounted();
        let mut measure = ApproximateMeasure;
        surface.annotation_mut().drag_to(Point::new(700.0, 400.0));
        surface.dispatch_events(&mut measure);
        assert_eq!(surface.toolbar_position(), Point::new(550.0, 320.0));

        surface.resize(Size::new(400.0, 300.0)).unwrap();
        assert_eq!(surface.toolbar_position(), Point::new(150.0, 250.0));

        assert!(surface.resize(Size::new(0.0, 0.0)).is_err());
        assert_eq!(surface.container(), Size::new(400.0, 300.0));
    }

    #[test]
    fn test_exactly_one_annotation() {
        let mut surface = mounted();
        let mut measure = ApproximateMeasure;
        let id = surface.annotation().id();

        surface.begin_editing(&mut measure);
        surface.annotation_mut().type_text("Hello");
        surface.dispatch_events(&mut measure);
        surface.set_font(FontFamily::CourierNew, &mut measure);
        surface.annotation_mut().drag_to(Point::new(10.0, 10.0));
        surface.dispatch_events(&mut measure);
        surface.delete(&mut measure);
        surface.set_color(NamedColor::Blue, &mut measure);

        assert_eq!(surface.annotation().id(), id);
    }

    #[test]
    fn test_take_render_request() {
        let mut surface = mounted();
        assert!(surface.take_render_request());
        assert!(!surface.take_render_request());
        surface.set_color(NamedColor::Red, &mut ApproximateMeasure);
        assert!(surface.take_render_request());
    }
}
