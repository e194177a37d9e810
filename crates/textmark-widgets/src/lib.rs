//! Reusable egui widget components for the textmark toolbar.
//!
//! - **Buttons**: icon buttons
//! - **Colors**: color swatches
//! - **Menu**: drop-down selectors, toolbar frame
//! - **Layout**: section labels, separators

pub mod buttons;
pub mod colors;
pub mod layout;
pub mod menu;

pub use buttons::IconButton;
pub use colors::{ColorSwatch, is_light};
pub use layout::{section_label, vertical_separator};
pub use menu::{select_item, select_menu, toolbar_frame};

/// Standard sizing constants used across widgets.
pub mod sizing {
    /// Small button size (icons, color swatches)
    pub const SMALL: f32 = 20.0;
    /// Medium button size (toolbar buttons)
    pub const MEDIUM: f32 = 28.0;
    /// Standard corner radius
    pub const CORNER_RADIUS: u8 = 4;
    /// Panel corner radius
    pub const PANEL_RADIUS: u8 = 8;
}

/// Standard colors used across widgets.
pub mod theme {
    use egui::Color32;

    /// Text color (dark gray)
    pub const TEXT: Color32 = Color32::from_rgb(60, 60, 60);
    /// Muted text color
    pub const TEXT_MUTED: Color32 = Color32::from_rgb(120, 120, 120);
    /// Border color
    pub const BORDER: Color32 = Color32::from_rgb(220, 220, 220);
    /// Selection/active color (blue)
    pub const ACCENT: Color32 = Color32::from_rgb(59, 130, 246);
    /// Hover background
    pub const HOVER_BG: Color32 = Color32::from_rgb(245, 245, 245);
    /// Selected background
    pub const SELECTED_BG: Color32 = Color32::from_rgb(235, 245, 255);
    /// Destructive action color (red)
    pub const DANGER: Color32 = Color32::from_rgb(220, 38, 38);
    pub const DANGER_BG: Color32 = Color32::from_rgb(254, 226, 226);
    /// Panel background
    pub const PANEL_BG: Color32 = Color32::from_rgba_premultiplied(250, 250, 252, 250);
}
