//! Enumerated style options offered by the toolbar.
//!
//! Every option set defaults to its first entry.

use peniko::Color;
use serde::{Deserialize, Serialize};

/// Font family options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FontFamily {
    #[default]
    Roboto,
    TimesNewRoman,
    Arial,
    Georgia,
    CourierNew,
}

impl FontFamily {
    /// Get the font family name as used by the renderer.
    pub fn name(&self) -> &'static str {
        match self {
            FontFamily::Roboto => "Roboto",
            FontFamily::TimesNewRoman => "Times New Roman",
            FontFamily::Arial => "Arial",
            FontFamily::Georgia => "Georgia",
            FontFamily::CourierNew => "Courier New",
        }
    }

    /// Get display name for UI.
    pub fn display_name(&self) -> &'static str {
        self.name()
    }

    /// Average glyph advance as a fraction of the font size.
    ///
    /// Rough per-family estimates used when no real font is available.
    pub fn char_width_factor(&self) -> f64 {
        match self {
            FontFamily::Roboto => 0.55,
            FontFamily::TimesNewRoman => 0.50,
            FontFamily::Arial => 0.55,
            FontFamily::Georgia => 0.58,
            FontFamily::CourierNew => 0.60,
        }
    }

    /// Get all available font families.
    pub fn all() -> &'static [FontFamily] {
        &[
            FontFamily::Roboto,
            FontFamily::TimesNewRoman,
            FontFamily::Arial,
            FontFamily::Georgia,
            FontFamily::CourierNew,
        ]
    }
}

/// Font size presets, in points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FontSize {
    #[default]
    Pt20,
    Pt32,
    Pt56,
    Pt72,
    Pt96,
}

impl FontSize {
    /// Point size. The canvas uses it unscaled as the pixel size.
    pub fn points(&self) -> f64 {
        match self {
            FontSize::Pt20 => 20.0,
            FontSize::Pt32 => 32.0,
            FontSize::Pt56 => 56.0,
            FontSize::Pt72 => 72.0,
            FontSize::Pt96 => 96.0,
        }
    }

    /// Get display name for UI.
    pub fn display_name(&self) -> &'static str {
        match self {
            FontSize::Pt20 => "20",
            FontSize::Pt32 => "32",
            FontSize::Pt56 => "56",
            FontSize::Pt72 => "72",
            FontSize::Pt96 => "96",
        }
    }

    pub fn all() -> &'static [FontSize] {
        &[
            FontSize::Pt20,
            FontSize::Pt32,
            FontSize::Pt56,
            FontSize::Pt72,
            FontSize::Pt96,
        ]
    }
}

/// Named fill colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum NamedColor {
    #[default]
    Black,
    White,
    Red,
    Green,
    Blue,
    Yellow,
}

impl NamedColor {
    /// Resolve to a concrete color. Values follow the CSS named colors.
    pub fn to_color(&self) -> Color {
        match self {
            NamedColor::Black => Color::from_rgb8(0, 0, 0),
            NamedColor::White => Color::from_rgb8(255, 255, 255),
            NamedColor::Red => Color::from_rgb8(255, 0, 0),
            NamedColor::Green => Color::from_rgb8(0, 128, 0),
            NamedColor::Blue => Color::from_rgb8(0, 0, 255),
            NamedColor::Yellow => Color::from_rgb8(255, 255, 0),
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            NamedColor::Black => "Black",
            NamedColor::White => "White",
            NamedColor::Red => "Red",
            NamedColor::Green => "Green",
            NamedColor::Blue => "Blue",
            NamedColor::Yellow => "Yellow",
        }
    }

    pub fn all() -> &'static [NamedColor] {
        &[
            NamedColor::Black,
            NamedColor::White,
            NamedColor::Red,
            NamedColor::Green,
            NamedColor::Blue,
            NamedColor::Yellow,
        ]
    }
}

impl From<NamedColor> for Color {
    fn from(color: NamedColor) -> Self {
        color.to_color()
    }
}

/// Which part of the sequence the annotation is meant to cover.
///
/// Stored and shown in the toolbar only. Nothing consumes it yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Duration {
    #[default]
    WholeSequence,
    FirstHalf,
    SecondHalf,
}

impl Duration {
    pub fn display_name(&self) -> &'static str {
        match self {
            Duration::WholeSequence => "Whole sequence",
            Duration::FirstHalf => "First half",
            Duration::SecondHalf => "Second half",
        }
    }

    pub fn all() -> &'static [Duration] {
        &[
            Duration::WholeSequence,
            Duration::FirstHalf,
            Duration::SecondHalf,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_first_entries() {
        assert_eq!(FontFamily::default(), FontFamily::all()[0]);
        assert_eq!(FontSize::default(), FontSize::all()[0]);
        assert_eq!(NamedColor::default(), NamedColor::all()[0]);
        assert_eq!(Duration::default(), Duration::all()[0]);
    }

    #[test]
    fn test_option_counts() {
        assert_eq!(FontFamily::all().len(), 5);
        assert_eq!(FontSize::all().len(), 5);
        assert_eq!(NamedColor::all().len(), 6);
        assert_eq!(Duration::all().len(), 3);
    }

    #[test]
    fn test_font_sizes_ascend() {
        let points: Vec<f64> = FontSize::all().iter().map(FontSize::points).collect();
        assert_eq!(points, vec![20.0, 32.0, 56.0, 72.0, 96.0]);
    }

    #[test]
    fn test_font_names() {
        assert_eq!(FontFamily::TimesNewRoman.name(), "Times New Roman");
        assert_eq!(FontFamily::CourierNew.display_name(), "Courier New");
    }

    #[test]
    fn test_named_colors() {
        let green = NamedColor::Green.to_color().to_rgba8();
        assert_eq!((green.r, green.g, green.b, green.a), (0, 128, 0, 255));
        let yellow: Color = NamedColor::Yellow.into();
        let yellow = yellow.to_rgba8();
        assert_eq!((yellow.r, yellow.g, yellow.b), (255, 255, 0));
    }
}
