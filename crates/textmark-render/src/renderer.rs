//! Renderer trait abstraction.

use kurbo::Size;
use peniko::Color;
use textmark_core::annotation::Annotation;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Initialization failed: {0}")]
    InitFailed(String),
    #[error("Render failed: {0}")]
    RenderFailed(String),
    #[error("Surface error: {0}")]
    Surface(String),
}

/// Result type for renderer operations.
pub type RendererResult<T> = Result<T, RendererError>;

/// Context for a single render frame.
pub struct RenderContext<'a> {
    /// The annotation to draw.
    pub annotation: &'a Annotation,
    /// Viewport size in logical pixels.
    pub viewport_size: Size,
    /// Device pixel ratio (for HiDPI).
    pub scale_factor: f64,
    /// Backdrop behind the transparent surface.
    pub background_color: Color,
    /// Whether the annotation is the active object (draws its border).
    pub focused: bool,
    /// Whether the annotation is being edited in place.
    ///
    /// The annotation body is then left to the edit-mode pass.
    pub editing: bool,
}

impl<'a> RenderContext<'a> {
    /// Create a new render context.
    pub fn new(annotation: &'a Annotation, viewport_size: Size) -> Self {
        Self {
            annotation,
            viewport_size,
            scale_factor: 1.0,
            background_color: Color::from_rgba8(245, 245, 245, 255),
            focused: true,
            editing: false,
        }
    }

    /// Set the scale factor for HiDPI.
    pub fn with_scale_factor(mut self, scale_factor: f64) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    /// Set the background color.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }

    pub fn with_focus(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub fn with_editing(mut self, editing: bool) -> Self {
        self.editing = editing;
        self
    }
}

/// Trait for rendering backends.
pub trait Renderer {
    /// Build the scene/command buffer for a frame.
    ///
    /// This method is called once per frame and should prepare all drawing commands.
    fn build_scene(&mut self, ctx: &RenderContext);

    /// Get the background color (for clearing).
    fn background_color(&self, ctx: &RenderContext) -> Color {
        ctx.background_color
    }
}
