//! Toolbar frame and compact drop-down selectors.

use egui::{vec2, Color32, CornerRadius, CursorIcon, Frame, Margin, Pos2, Sense, Stroke, Ui};

use crate::{sizing, theme};

/// One entry inside a selector popup. Returns true when clicked.
pub fn select_item(ui: &mut Ui, label: &str, selected: bool) -> bool {
    let size = vec2(ui.available_width().max(96.0), 26.0);
    let (rect, response) = ui.allocate_exact_size(size, Sense::click());

    if ui.is_rect_visible(rect) {
        let bg_color = if selected {
            theme::SELECTED_BG
        } else if response.hovered() {
            theme::HOVER_BG
        } else {
            Color32::TRANSPARENT
        };
        ui.painter()
            .rect_filled(rect, CornerRadius::same(sizing::CORNER_RADIUS), bg_color);

        let text_color = if selected { theme::ACCENT } else { theme::TEXT };
        ui.painter().text(
            Pos2::new(rect.left() + 10.0, rect.center().y),
            egui::Align2::LEFT_CENTER,
            label,
            egui::FontId::proportional(13.0),
            text_color,
        );
    }

    let clicked = response.clicked();
    response.on_hover_cursor(CursorIcon::PointingHand);
    clicked
}

/// Drop-down selector over a fixed option list.
///
/// Returns the newly picked option, if any.
pub fn select_menu<T: Copy + PartialEq>(
    ui: &mut Ui,
    id_salt: &str,
    tooltip: &str,
    current: T,
    options: &[T],
    label: impl Fn(&T) -> &'static str,
    width: f32,
) -> Option<T> {
    let mut picked = None;
    let response = egui::ComboBox::from_id_salt(id_salt)
        .selected_text(label(&current))
        .width(width)
        .show_ui(ui, |ui| {
            for option in options {
                if select_item(ui, label(option), *option == current) {
                    picked = Some(*option);
                }
            }
        });
    response.response.on_hover_text(tooltip);
    picked.filter(|option| *option != current)
}

/// Frame for the floating toolbar.
pub fn toolbar_frame() -> Frame {
    Frame::new()
        .fill(theme::PANEL_BG)
        .corner_radius(CornerRadius::same(sizing::PANEL_RADIUS))
        .stroke(Stroke::new(1.0, theme::BORDER))
        .shadow(egui::epaint::Shadow {
            spread: 0,
            blur: 6,
            offset: [0, 2],
            color: Color32::from_black_alpha(10),
        })
        .inner_margin(Margin::symmetric(10, 6))
}
