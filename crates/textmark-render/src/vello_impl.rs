//! Vello-based renderer implementation.

use crate::fonts::font_stack;
use crate::renderer::{RenderContext, Renderer};
use crate::text_editor::TextEditState;
use kurbo::{Affine, Rect, Stroke};
use parley::layout::{Layout, PositionedLayoutItem};
use parley::{FontContext, LayoutContext, StyleProperty};
use peniko::{Brush, Color, Fill};
use std::sync::Arc;
use textmark_core::annotation::Annotation;
use textmark_core::measure::{ApproximateMeasure, TextMeasure};
use textmark_core::options::{FontFamily, FontSize};
use vello::Scene;

/// Selection highlight behind edited text.
const SELECTION_COLOR: Color = Color::from_rgba8(70, 130, 180, 128);
const CURSOR_WIDTH: f32 = 1.5;

// Bundled faces so text renders without system fonts (wasm)
static DEJAVU_SANS: &[u8] = include_bytes!("../assets/DejaVuSans.ttf");
static DEJAVU_SERIF: &[u8] = include_bytes!("../assets/DejaVuSerif.ttf");
static DEJAVU_SANS_MONO: &[u8] = include_bytes!("../assets/DejaVuSansMono.ttf");

/// Vello-based renderer for the annotation surface.
pub struct VelloRenderer {
    /// The Vello scene being built.
    scene: Scene,
    /// Font context for text rendering (cached to avoid re-registering fonts).
    font_cx: FontContext,
    /// Layout context for text rendering.
    layout_cx: LayoutContext<Brush>,
}

impl Default for VelloRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert a Parley BoundingBox to a Kurbo Rect.
fn convert_rect(rect: &parley::BoundingBox) -> Rect {
    Rect::new(rect.x0, rect.y0, rect.x1, rect.y1)
}

/// Draw every glyph run of `layout`. Returns the number of glyphs drawn.
fn draw_layout(scene: &mut Scene, layout: &Layout<Brush>, transform: Affine) -> usize {
    let mut glyph_count = 0;
    for line in layout.lines() {
        for item in line.items() {
            let PositionedLayoutItem::GlyphRun(glyph_run) = item else {
                continue;
            };
            let brush = &glyph_run.style().brush;
            let mut x = glyph_run.offset();
            let y = glyph_run.baseline();
            let run = glyph_run.run();
            let glyph_xform = run
                .synthesis()
                .skew()
                .map(|angle| Affine::skew(angle.to_radians().tan() as f64, 0.0));

            let glyphs: Vec<vello::Glyph> = glyph_run
                .glyphs()
                .map(|glyph| {
                    let gx = x + glyph.x;
                    let gy = y - glyph.y;
                    x += glyph.advance;
                    vello::Glyph {
                        id: glyph.id,
                        x: gx,
                        y: gy,
                    }
                })
                .collect();

            if glyphs.is_empty() {
                continue;
            }
            glyph_count += glyphs.len();
            scene
                .draw_glyphs(run.font())
                .brush(brush)
                .hint(true)
                .transform(transform)
                .glyph_transform(glyph_xform)
                .font_size(run.font_size())
                .normalized_coords(run.normalized_coords())
                .draw(Fill::NonZero, glyphs.into_iter());
        }
    }
    glyph_count
}

impl VelloRenderer {
    /// Create a new Vello renderer.
    ///
    /// On native targets the font context starts with the system collection.
    /// The bundled faces are registered on every target.
    pub fn new() -> Self {
        Self::with_fonts(FontContext::new())
    }

    fn with_fonts(mut font_cx: FontContext) -> Self {
        let mut registered = 0;
        for data in [DEJAVU_SANS, DEJAVU_SERIF, DEJAVU_SANS_MONO] {
            registered += font_cx
                .collection
                .register_fonts(vello::peniko::Blob::new(Arc::new(data)), None)
                .len();
        }
        log::debug!("Registered {registered} bundled font families");

        Self {
            scene: Scene::new(),
            font_cx,
            layout_cx: LayoutContext::new(),
        }
    }

    /// Get the built scene for rendering.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Take ownership of the scene (resets internal scene).
    pub fn take_scene(&mut self) -> Scene {
        std::mem::take(&mut self.scene)
    }

    /// Get mutable references to both font and layout contexts for text editing.
    pub fn contexts_mut(&mut self) -> (&mut FontContext, &mut LayoutContext<Brush>) {
        (&mut self.font_cx, &mut self.layout_cx)
    }

    fn layout_text(
        &mut self,
        text: &str,
        family: FontFamily,
        size: FontSize,
        brush: Brush,
        max_width: Option<f32>,
    ) -> Layout<Brush> {
        let mut builder = self.layout_cx.ranged_builder(&mut self.font_cx, text, 1.0, false);
        builder.push_default(StyleProperty::FontSize(size.points() as f32));
        builder.push_default(StyleProperty::Brush(brush));
        builder.push_default(StyleProperty::FontStack(font_stack(family)));
        let mut layout = builder.build(text);
        layout.break_all_lines(max_width);
        layout.align(max_width, parley::Alignment::Start, parley::AlignmentOptions::default());
        layout
    }

    /// Dashed border around the padded text box.
    fn render_border(&mut self, annotation: &Annotation, text_height: f64, transform: Affine) {
        let height = text_height.max(annotation.font_size().points() * Annotation::LINE_HEIGHT);
        let rect = Rect::new(
            annotation.position.x,
            annotation.position.y,
            annotation.position.x + annotation.box_width(),
            annotation.position.y + height,
        )
        .inflate(Annotation::PADDING, Annotation::PADDING);
        let stroke =
            Stroke::new(Annotation::BORDER_WIDTH).with_dashes(0.0, Annotation::BORDER_DASHES);
        self.scene
            .stroke(&stroke, transform, Annotation::border_color(), None, &rect);
    }

    /// Render the annotation at rest.
    fn render_annotation(&mut self, annotation: &Annotation, focused: bool, transform: Affine) {
        let brush = Brush::Solid(annotation.color().to_color());
        let layout = self.layout_text(
            annotation.content(),
            annotation.font_family(),
            annotation.font_size(),
            brush,
            Some(annotation.box_width() as f32),
        );
        let text_transform =
            transform * Affine::translate((annotation.position.x, annotation.position.y));
        let drawn = draw_layout(&mut self.scene, &layout, text_transform);
        if drawn == 0 && !annotation.content().trim().is_empty() {
            log::debug!(
                "No glyphs for {:?}; is the font available?",
                annotation.font_family().name()
            );
        }
        if focused {
            self.render_border(annotation, layout.height() as f64, transform);
        }
    }

    /// Render the annotation in edit mode, with selection and cursor.
    pub fn render_annotation_editing(
        &mut self,
        annotation: &Annotation,
        edit_state: &mut TextEditState,
        scale_factor: f64,
    ) {
        let transform = Affine::scale(scale_factor);
        let text_transform =
            transform * Affine::translate((annotation.position.x, annotation.position.y));

        edit_state.apply_style(annotation);
        // Layout must be computed before cursor and selection geometry
        let layout = edit_state
            .editor_mut()
            .layout(&mut self.font_cx, &mut self.layout_cx);
        draw_layout(&mut self.scene, layout, text_transform);
        let text_height = layout.height() as f64;

        edit_state.editor().selection_geometry_with(|rect, _| {
            self.scene.fill(
                Fill::NonZero,
                text_transform,
                SELECTION_COLOR,
                None,
                &convert_rect(&rect),
            );
        });

        if edit_state.is_cursor_visible() {
            let cursor = match edit_state.editor().cursor_geometry(CURSOR_WIDTH) {
                Some(cursor) => convert_rect(&cursor),
                // Empty text has no cursor geometry; draw one at the origin
                None => Rect::new(
                    0.0,
                    0.0,
                    CURSOR_WIDTH as f64,
                    annotation.font_size().points() * Annotation::LINE_HEIGHT,
                ),
            };
            self.scene.fill(
                Fill::NonZero,
                text_transform,
                annotation.color().to_color(),
                None,
                &cursor,
            );
        }

        self.render_border(annotation, text_height, transform);
    }
}

impl TextMeasure for VelloRenderer {
    fn measure_width(&mut self, text: &str, family: FontFamily, size: FontSize) -> f64 {
        let layout = self.layout_text(text, family, size, Brush::default(), None);
        let width = layout.width() as f64;
        if width > 0.0 {
            width
        } else {
            // No usable font yet
            ApproximateMeasure.measure_width(text, family, size)
        }
    }
}

impl Renderer for VelloRenderer {
    fn build_scene(&mut self, ctx: &RenderContext) {
        self.scene.reset();
        let transform = Affine::scale(ctx.scale_factor);

        let viewport = Rect::new(0.0, 0.0, ctx.viewport_size.width, ctx.viewport_size.height);
        self.scene.fill(
            Fill::NonZero,
            transform,
            ctx.background_color,
            None,
            &viewport,
        );

        // The edit-mode pass draws the annotation itself
        if !ctx.editing {
            self.render_annotation(ctx.annotation, ctx.focused, transform);
        }
    }
}
