//! Icon buttons.

use egui::{vec2, Color32, CornerRadius, CursorIcon, Image, ImageSource, Rect, Sense, Ui, Vec2};

use crate::{sizing, theme};

/// Style configuration for icon buttons.
#[derive(Clone)]
struct IconButtonStyle {
    size: Vec2,
    /// Icon size (should be smaller than button size)
    icon_size: Vec2,
    corner_radius: u8,
    bg_color: Color32,
    hover_color: Color32,
    /// Icon tint at rest (None = no tint)
    icon_tint: Option<Color32>,
    hover_icon_tint: Option<Color32>,
}

impl Default for IconButtonStyle {
    fn default() -> Self {
        Self {
            size: vec2(sizing::MEDIUM, sizing::MEDIUM),
            icon_size: vec2(18.0, 18.0),
            corner_radius: sizing::CORNER_RADIUS,
            bg_color: Color32::TRANSPARENT,
            hover_color: theme::HOVER_BG,
            icon_tint: Some(Color32::from_gray(80)),
            hover_icon_tint: Some(Color32::from_gray(40)),
        }
    }
}

impl IconButtonStyle {
    /// Destructive action: turns red on hover.
    fn danger() -> Self {
        Self {
            hover_color: theme::DANGER_BG,
            hover_icon_tint: Some(theme::DANGER),
            ..Self::default()
        }
    }
}

/// An icon button that displays an image/SVG.
pub struct IconButton<'a> {
    icon: ImageSource<'a>,
    tooltip: &'a str,
    style: IconButtonStyle,
}

impl<'a> IconButton<'a> {
    pub fn new(icon: ImageSource<'a>, tooltip: &'a str) -> Self {
        Self {
            icon,
            tooltip,
            style: IconButtonStyle::default(),
        }
    }

    /// Red hover for destructive actions.
    pub fn danger(mut self) -> Self {
        self.style = IconButtonStyle::danger();
        self
    }

    /// Show the button and return true if clicked.
    pub fn show(self, ui: &mut Ui) -> bool {
        let (rect, response) = ui.allocate_exact_size(self.style.size, Sense::click());

        if ui.is_rect_visible(rect) {
            let hovered = response.hovered();
            let bg_color = if hovered {
                self.style.hover_color
            } else {
                self.style.bg_color
            };
            ui.painter().rect_filled(
                rect,
                CornerRadius::same(self.style.corner_radius),
                bg_color,
            );

            let icon_tint = if hovered {
                self.style.hover_icon_tint
            } else {
                self.style.icon_tint
            };
            let icon_rect = Rect::from_center_size(rect.center(), self.style.icon_size);
            let mut image = Image::new(self.icon).fit_to_exact_size(self.style.icon_size);
            if let Some(tint) = icon_tint {
                image = image.tint(tint);
            }
            image.paint_at(ui, icon_rect);
        }

        let clicked = response.clicked();
        response
            .on_hover_text(self.tooltip)
            .on_hover_cursor(CursorIcon::PointingHand);
        clicked
    }
}
