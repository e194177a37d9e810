//! In-place editing state for the annotation, using Parley's PlainEditor.

use crate::fonts::font_stack;
use parley::editing::PlainEditor;
use parley::{FontContext, LayoutContext, StyleProperty};
use peniko::Brush;
use std::time::Duration;
use textmark_core::annotation::Annotation;

// Use web_time for WASM compatibility
#[cfg(target_arch = "wasm32")]
use web_time::Instant;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

/// Keyboard key for text editing.
#[derive(Debug, Clone, PartialEq)]
pub enum TextKey {
    Character(String),
    Backspace,
    Delete,
    Enter,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    Escape,
}

/// Keyboard modifiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextModifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl TextModifiers {
    /// Get the action modifier (Ctrl on Windows/Linux, Cmd on macOS).
    pub fn action_mod(&self) -> bool {
        if cfg!(target_os = "macos") {
            self.meta
        } else {
            self.ctrl
        }
    }
}

/// Result of handling a text editing event.
#[derive(Debug, Clone, PartialEq)]
pub enum TextEditResult {
    /// Event was handled, text may have changed.
    Handled,
    /// Event was handled, user wants to exit editing.
    ExitEdit,
    /// Event was not handled (pass to other handlers).
    NotHandled,
}

const BLINK_PERIOD: Duration = Duration::from_millis(500);

/// Editor for the annotation while it is in edit mode.
pub struct TextEditState {
    editor: PlainEditor<Brush>,
    cursor_visible: bool,
    /// Start time for cursor blinking.
    blink_start: Option<Instant>,
    /// Whether a mouse drag is extending the selection.
    is_dragging: bool,
    /// Content revision of the annotation this editor was loaded from.
    revision: u64,
}

impl TextEditState {
    /// Load an editor from the annotation's current content and style.
    pub fn for_annotation(annotation: &Annotation) -> Self {
        let mut editor = PlainEditor::new(annotation.font_size().points() as f32);
        editor.set_text(annotation.content());
        editor.set_scale(1.0);
        let mut state = Self {
            editor,
            cursor_visible: true,
            blink_start: None,
            is_dragging: false,
            revision: annotation.content_revision(),
        };
        state.apply_style(annotation);
        state.cursor_reset();
        state
    }

    /// Match font, size, color and wrap width to the annotation.
    pub fn apply_style(&mut self, annotation: &Annotation) {
        self.editor.set_width(Some(annotation.box_width() as f32));
        let styles = self.editor.edit_styles();
        styles.insert(StyleProperty::FontSize(annotation.font_size().points() as f32));
        styles.insert(StyleProperty::Brush(Brush::Solid(annotation.color().to_color())));
        styles.insert(StyleProperty::FontStack(font_stack(annotation.font_family())));
    }

    /// Reload the text if the annotation was rewritten from outside the editor.
    ///
    /// Returns whether a reload happened.
    pub fn sync_from(&mut self, annotation: &Annotation) -> bool {
        self.apply_style(annotation);
        if annotation.content_revision() == self.revision {
            return false;
        }
        self.revision = annotation.content_revision();
        if self.editor.text().to_string() != annotation.content() {
            self.editor.set_text(annotation.content());
        }
        true
    }

    pub fn editor(&self) -> &PlainEditor<Brush> {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut PlainEditor<Brush> {
        &mut self.editor
    }

    /// Get the current text content.
    pub fn text(&self) -> String {
        self.editor.text().to_string()
    }

    /// Select everything, so the next keystroke replaces it.
    pub fn select_all(&mut self, font_cx: &mut FontContext, layout_cx: &mut LayoutContext<Brush>) {
        self.editor.driver(font_cx, layout_cx).select_all();
    }

    /// Reset cursor to visible state and restart blinking.
    pub fn cursor_reset(&mut self) {
        self.blink_start = Some(Instant::now());
        self.cursor_visible = true;
    }

    /// Update cursor visibility based on blink state.
    pub fn cursor_blink(&mut self) {
        self.cursor_visible = self.blink_start.is_some_and(|start| {
            let elapsed = Instant::now().duration_since(start);
            (elapsed.as_millis() / BLINK_PERIOD.as_millis()) % 2 == 0
        });
    }

    pub fn is_cursor_visible(&self) -> bool {
        self.cursor_visible
    }

    /// Handle a key press event.
    pub fn handle_key(
        &mut self,
        key: TextKey,
        modifiers: TextModifiers,
        font_cx: &mut FontContext,
        layout_cx: &mut LayoutContext<Brush>,
    ) -> TextEditResult {
        // Don't process keys while composing (IME)
        if self.editor.is_composing() {
            return TextEditResult::NotHandled;
        }
        if key == TextKey::Escape {
            return TextEditResult::ExitEdit;
        }

        self.cursor_reset();
        let action_mod = modifiers.action_mod();
        let shift = modifiers.shift;
        let mut drv = self.editor.driver(font_cx, layout_cx);

        match key {
            TextKey::Escape => {}
            TextKey::Backspace if action_mod => drv.backdelete_word(),
            TextKey::Backspace => drv.backdelete(),
            TextKey::Delete if action_mod => drv.delete_word(),
            TextKey::Delete => drv.delete(),
            TextKey::Enter => drv.insert_or_replace_selection("\n"),
            TextKey::Left => match (action_mod, shift) {
                (true, true) => drv.select_word_left(),
                (true, false) => drv.move_word_left(),
                (false, true) => drv.select_left(),
                (false, false) => drv.move_left(),
            },
            TextKey::Right => match (action_mod, shift) {
                (true, true) => drv.select_word_right(),
                (true, false) => drv.move_word_right(),
                (false, true) => drv.select_right(),
                (false, false) => drv.move_right(),
            },
            TextKey::Up if shift => drv.select_up(),
            TextKey::Up => drv.move_up(),
            TextKey::Down if shift => drv.select_down(),
            TextKey::Down => drv.move_down(),
            TextKey::Home => match (action_mod, shift) {
                (true, true) => drv.select_to_text_start(),
                (true, false) => drv.move_to_text_start(),
                (false, true) => drv.select_to_line_start(),
                (false, false) => drv.move_to_line_start(),
            },
            TextKey::End => match (action_mod, shift) {
                (true, true) => drv.select_to_text_end(),
                (true, false) => drv.move_to_text_end(),
                (false, true) => drv.select_to_line_end(),
                (false, false) => drv.move_to_line_end(),
            },
            TextKey::Character(ref c) => {
                if action_mod && c.eq_ignore_ascii_case("a") {
                    drv.select_all();
                } else if !action_mod {
                    drv.insert_or_replace_selection(c);
                } else {
                    return TextEditResult::NotHandled;
                }
            }
        }

        TextEditResult::Handled
    }

    /// Handle mouse press at coordinates local to the annotation's text origin.
    pub fn handle_mouse_down(
        &mut self,
        local_x: f32,
        local_y: f32,
        shift: bool,
        font_cx: &mut FontContext,
        layout_cx: &mut LayoutContext<Brush>,
    ) {
        self.cursor_reset();
        self.is_dragging = true;
        let mut drv = self.editor.driver(font_cx, layout_cx);
        if shift {
            drv.extend_selection_to_point(local_x, local_y);
        } else {
            drv.move_to_point(local_x, local_y);
        }
    }

    /// Handle mouse drag at the given local coordinates.
    pub fn handle_mouse_drag(
        &mut self,
        local_x: f32,
        local_y: f32,
        font_cx: &mut FontContext,
        layout_cx: &mut LayoutContext<Brush>,
    ) {
        if !self.is_dragging {
            return;
        }
        self.cursor_reset();
        self.editor
            .driver(font_cx, layout_cx)
            .extend_selection_to_point(local_x, local_y);
    }

    pub fn handle_mouse_up(&mut self) {
        self.is_dragging = false;
    }

    pub fn is_dragging(&self) -> bool {
        self.is_dragging
    }

    /// Select the word under a double-click.
    pub fn handle_double_click(
        &mut self,
        local_x: f32,
        local_y: f32,
        font_cx: &mut FontContext,
        layout_cx: &mut LayoutContext<Brush>,
    ) {
        self.cursor_reset();
        self.editor
            .driver(font_cx, layout_cx)
            .select_word_at_point(local_x, local_y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contexts() -> (FontContext, LayoutContext<Brush>) {
        (FontContext::new(), LayoutContext::new())
    }

    #[test]
    fn test_loads_annotation_text() {
        let annotation = Annotation::new();
        let state = TextEditState::for_annotation(&annotation);
        assert_eq!(state.text(), annotation.content());
        assert!(state.is_cursor_visible());
    }

    #[test]
    fn test_escape_exits() {
        let (mut font_cx, mut layout_cx) = contexts();
        let mut state = TextEditState::for_annotation(&Annotation::new());
        let result = state.handle_key(
            TextKey::Escape,
            TextModifiers::default(),
            &mut font_cx,
            &mut layout_cx,
        );
        assert_eq!(result, TextEditResult::ExitEdit);
    }

    #[test]
    fn test_sync_reloads_on_revision_change() {
        let mut annotation = Annotation::new();
        let mut state = TextEditState::for_annotation(&annotation);
        assert!(!state.sync_from(&annotation));

        annotation.set_content("");
        assert!(state.sync_from(&annotation));
        assert_eq!(state.text(), "");
        assert!(!state.sync_from(&annotation));
    }
}
