//! Color swatches for the annotation fill picker.

use egui::{Color32, CursorIcon, Rect, Sense, Stroke, Ui, Vec2, vec2};

use crate::{sizing, theme};

/// Swatch diameter in dense toolbars.
const COMPACT_SIZE: f32 = 16.0;

/// Whether `color` is light enough to vanish against a light panel.
pub fn is_light(color: Color32) -> bool {
    let [r, g, b, _] = color.to_array();
    // Rec. 601 luma
    let luma = 0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32;
    luma > 200.0
}

/// A clickable color swatch.
pub struct ColorSwatch<'a> {
    color: Color32,
    tooltip: &'a str,
    selected: bool,
    size: Vec2,
}

impl<'a> ColorSwatch<'a> {
    /// Create a new color swatch.
    pub fn new(color: Color32, tooltip: &'a str) -> Self {
        Self {
            color,
            tooltip,
            selected: false,
            size: vec2(sizing::SMALL, sizing::SMALL),
        }
    }

    /// Set whether this swatch is selected.
    pub fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    pub fn compact(mut self) -> Self {
        self.size = vec2(COMPACT_SIZE, COMPACT_SIZE);
        self
    }

    /// Show the swatch and return (clicked, rect).
    pub fn show(self, ui: &mut Ui) -> (bool, Rect) {
        let (rect, response) = ui.allocate_exact_size(self.size, Sense::click());

        if ui.is_rect_visible(rect) {
            let painter = ui.painter();
            let center = rect.center();
            let radius = rect.width().min(rect.height()) / 2.0;
            let light = is_light(self.color);

            painter.circle_filled(center, radius, self.color);
            // Light swatches get a hairline so they stay visible
            if light {
                painter.circle_stroke(center, radius - 0.5, Stroke::new(1.0, theme::BORDER));
            }
            if self.selected {
                let ring = if light { Color32::from_gray(30) } else { Color32::WHITE };
                painter.circle_stroke(center, radius - 3.0, Stroke::new(2.0, ring));
            }
        }

        let clicked = response.clicked();
        response
            .on_hover_text(self.tooltip)
            .on_hover_cursor(CursorIcon::PointingHand);
        (clicked, rect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_light() {
        assert!(is_light(Color32::WHITE));
        assert!(is_light(Color32::from_rgb(255, 255, 0)));
        assert!(!is_light(Color32::BLACK));
        assert!(!is_light(Color32::from_rgb(0, 0, 255)));
    }

    fn shown_rect(compact: bool) -> Rect {
        let ctx = egui::Context::default();
        let mut rect = Rect::NOTHING;
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                let swatch = ColorSwatch::new(Color32::RED, "Red").selected(true);
                let swatch = if compact { swatch.compact() } else { swatch };
                rect = swatch.show(ui).1;
            });
        });
        rect
    }

    #[test]
    fn test_swatch_sizes() {
        assert_eq!(shown_rect(false).size(), vec2(sizing::SMALL, sizing::SMALL));
        assert_eq!(shown_rect(true).size(), vec2(COMPACT_SIZE, COMPACT_SIZE));
    }
}
