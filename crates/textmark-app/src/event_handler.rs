//! Pointer and keyboard routing for the annotation.

use kurbo::Point;
use textmark_core::selection::classify_press;
use textmark_core::{Annotation, DragState, PressOutcome, Surface, SurfaceHost};
use textmark_render::{TextEditResult, TextEditState, TextKey, TextModifiers, VelloRenderer};

/// Convert a surface point to coordinates local to the annotation's text origin.
fn text_local(annotation: &Annotation, point: Point) -> (f32, f32) {
    let origin = annotation.position;
    ((point.x - origin.x) as f32, (point.y - origin.y) as f32)
}

/// Translates pointer and key input into annotation operations.
///
/// Every canvas-side change is followed by a dispatch, so the UI state is
/// current before the next toolbar action can write it back.
pub struct EventHandler {
    /// Drag in progress, if the annotation was grabbed.
    drag: Option<DragState>,
    /// In-place editor while the annotation is in edit mode.
    text_edit: Option<TextEditState>,
}

impl EventHandler {
    pub fn new() -> Self {
        Self {
            drag: None,
            text_edit: None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn is_editing(&self) -> bool {
        self.text_edit.is_some()
    }

    pub fn text_edit_mut(&mut self) -> Option<&mut TextEditState> {
        self.text_edit.as_mut()
    }

    /// Handle a left-button press. Returns whether anything changed.
    pub fn handle_press(
        &mut self,
        host: &mut SurfaceHost,
        renderer: &mut VelloRenderer,
        point: Point,
        double_click: bool,
        shift: bool,
    ) -> bool {
        let Some(surface) = host.surface_mut() else {
            return false;
        };

        let outcome = classify_press(surface.annotation(), point, double_click);
        log::debug!("Press at ({:.0}, {:.0}): {outcome:?}", point.x, point.y);

        match outcome {
            PressOutcome::BeginDrag => {
                surface.set_focused(true);
                self.drag = Some(DragState::new(point, surface.annotation().position));
            }
            PressOutcome::EnterEditing => {
                self.drag = None;
                self.begin_edit(surface, renderer);
            }
            PressOutcome::PlaceCursor => {
                if let Some(edit) = self.text_edit.as_mut() {
                    let (x, y) = text_local(surface.annotation(), point);
                    let (font_cx, layout_cx) = renderer.contexts_mut();
                    edit.handle_mouse_down(x, y, shift, font_cx, layout_cx);
                }
            }
            PressOutcome::ExitEditing => {
                self.end_edit(surface, renderer);
                surface.set_focused(false);
            }
            PressOutcome::Blur => surface.set_focused(false),
        }
        true
    }

    /// Handle a double-click inside the annotation while already editing.
    pub fn handle_word_select(
        &mut self,
        host: &mut SurfaceHost,
        renderer: &mut VelloRenderer,
        point: Point,
    ) {
        let (Some(surface), Some(edit)) = (host.surface(), self.text_edit.as_mut()) else {
            return;
        };
        let (x, y) = text_local(surface.annotation(), point);
        let (font_cx, layout_cx) = renderer.contexts_mut();
        edit.handle_double_click(x, y, font_cx, layout_cx);
    }

    /// Handle pointer motion. Returns whether a redraw is needed.
    pub fn handle_pointer_move(
        &mut self,
        host: &mut SurfaceHost,
        renderer: &mut VelloRenderer,
        point: Point,
    ) -> bool {
        let Some(surface) = host.surface_mut() else {
            return false;
        };

        if let Some(drag) = self.drag.as_mut() {
            drag.update(point, surface.annotation_mut());
            surface.dispatch_events(renderer);
            return true;
        }

        match self.text_edit.as_mut() {
            Some(edit) if edit.is_dragging() => {
                let (x, y) = text_local(surface.annotation(), point);
                let (font_cx, layout_cx) = renderer.contexts_mut();
                edit.handle_mouse_drag(x, y, font_cx, layout_cx);
                true
            }
            _ => false,
        }
    }

    /// Handle a left-button release.
    pub fn handle_release(&mut self) {
        if let Some(drag) = self.drag.take() {
            let delta = drag.delta();
            log::debug!("Drag ended after ({:.0}, {:.0})", delta.x, delta.y);
        }
        if let Some(edit) = self.text_edit.as_mut() {
            edit.handle_mouse_up();
        }
    }

    /// Handle a key press while editing. Returns whether the key was consumed.
    pub fn handle_key(
        &mut self,
        host: &mut SurfaceHost,
        renderer: &mut VelloRenderer,
        key: TextKey,
        modifiers: TextModifiers,
    ) -> bool {
        let Some(surface) = host.surface_mut() else {
            return false;
        };
        let Some(edit) = self.text_edit.as_mut() else {
            return false;
        };

        let (font_cx, layout_cx) = renderer.contexts_mut();
        let result = edit.handle_key(key, modifiers, font_cx, layout_cx);
        let text = edit.text();

        match result {
            TextEditResult::ExitEdit => {
                self.end_edit(surface, renderer);
                true
            }
            TextEditResult::Handled => {
                surface.annotation_mut().type_text(&text);
                surface.dispatch_events(renderer);
                true
            }
            TextEditResult::NotHandled => false,
        }
    }

    /// Bring the editor in line with the annotation after a programmatic write.
    ///
    /// Drops the editor if the annotation left edit mode without it, as
    /// delete does.
    pub fn sync_editor(&mut self, host: &SurfaceHost) {
        let Some(surface) = host.surface() else {
            self.text_edit = None;
            self.drag = None;
            return;
        };
        if !surface.annotation().is_editing() {
            if self.text_edit.take().is_some() {
                log::debug!("Editor dropped: annotation is no longer editing");
            }
            return;
        }
        if let Some(edit) = self.text_edit.as_mut() {
            if edit.sync_from(surface.annotation()) {
                log::debug!("Editor reloaded from annotation");
            }
            edit.cursor_blink();
        }
    }

    fn begin_edit(&mut self, surface: &mut Surface, renderer: &mut VelloRenderer) {
        surface.begin_editing(renderer);
        let mut edit = TextEditState::for_annotation(surface.annotation());
        if !surface.state().has_user_content {
            // First keystroke replaces the placeholder
            let (font_cx, layout_cx) = renderer.contexts_mut();
            edit.select_all(font_cx, layout_cx);
        }
        self.text_edit = Some(edit);
    }

    fn end_edit(&mut self, surface: &mut Surface, renderer: &mut VelloRenderer) {
        self.text_edit = None;
        surface.end_editing(renderer);
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}
