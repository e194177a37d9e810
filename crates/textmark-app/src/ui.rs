//! Floating toolbar built with egui.

use egui::{Color32, Context, Pos2, Vec2, include_image};
use kurbo::Point;
use textmark_core::{AnnotationState, Duration, FontFamily, FontSize, NamedColor, ToolbarAction};
use textmark_widgets::{
    ColorSwatch, IconButton, section_label, select_menu, toolbar_frame, vertical_separator,
};

/// Toolbar selections, mirrored from the surface every frame.
#[derive(Debug, Clone, PartialEq)]
pub struct UiState {
    pub color: NamedColor,
    pub font_family: FontFamily,
    pub font_size: FontSize,
    pub duration: Duration,
}

impl Default for UiState {
    fn default() -> Self {
        Self::from_state(&AnnotationState::default())
    }
}

impl UiState {
    pub fn from_state(state: &AnnotationState) -> Self {
        Self {
            color: state.color,
            font_family: state.font_family,
            font_size: state.font_size,
            duration: state.duration,
        }
    }
}

/// Actions that can be triggered from the toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiAction {
    SetColor(NamedColor),
    SetFont(FontFamily),
    SetSize(FontSize),
    SetDuration(Duration),
    Delete,
}

impl From<UiAction> for ToolbarAction {
    fn from(action: UiAction) -> Self {
        match action {
            UiAction::SetColor(color) => ToolbarAction::SetColor(color),
            UiAction::SetFont(family) => ToolbarAction::SetFont(family),
            UiAction::SetSize(size) => ToolbarAction::SetSize(size),
            UiAction::SetDuration(duration) => ToolbarAction::SetDuration(duration),
            UiAction::Delete => ToolbarAction::Delete,
        }
    }
}

/// Convert a named annotation color for display in egui.
pub fn color32(color: NamedColor) -> Color32 {
    let rgba = color.to_color().to_rgba8();
    Color32::from_rgba_unmultiplied(rgba.r, rgba.g, rgba.b, rgba.a)
}

/// Render the toolbar at `position` and return any triggered action.
pub fn render_ui(ctx: &Context, ui_state: &UiState, position: Point) -> Option<UiAction> {
    egui_extras::install_image_loaders(ctx);

    let mut action = None;
    egui::Area::new(egui::Id::new("annotation_toolbar"))
        .fixed_pos(Pos2::new(position.x as f32, position.y as f32))
        .show(ctx, |ui| {
            toolbar_frame().show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.spacing_mut().item_spacing = Vec2::new(6.0, 0.0);
                    section_label(ui, "Text");

                    ui.horizontal(|ui| {
                        ui.spacing_mut().item_spacing = Vec2::new(2.0, 0.0);
                        for &color in NamedColor::all() {
                            let (clicked, _) = ColorSwatch::new(color32(color), color.display_name())
                                .selected(ui_state.color == color)
                                .compact()
                                .show(ui);
                            if clicked && ui_state.color != color {
                                action = Some(UiAction::SetColor(color));
                            }
                        }
                    });

                    vertical_separator(ui);

                    if let Some(family) = select_menu(
                        ui,
                        "font_family",
                        "Font",
                        ui_state.font_family,
                        FontFamily::all(),
                        FontFamily::display_name,
                        110.0,
                    ) {
                        action = Some(UiAction::SetFont(family));
                    }
                    if let Some(size) = select_menu(
                        ui,
                        "font_size",
                        "Size",
                        ui_state.font_size,
                        FontSize::all(),
                        FontSize::display_name,
                        40.0,
                    ) {
                        action = Some(UiAction::SetSize(size));
                    }

                    vertical_separator(ui);

                    if let Some(duration) = select_menu(
                        ui,
                        "duration",
                        "Duration",
                        ui_state.duration,
                        Duration::all(),
                        Duration::display_name,
                        110.0,
                    ) {
                        action = Some(UiAction::SetDuration(duration));
                    }

                    vertical_separator(ui);

                    let trash = include_image!("../assets/trash.svg");
                    if IconButton::new(trash, "Delete annotation").danger().show(ui) {
                        action = Some(UiAction::Delete);
                    }
                });
            });
        });

    action
}
