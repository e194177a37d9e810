//! Text measurement and the annotation box-width rule.

use crate::options::{FontFamily, FontSize};

/// Placeholder shown until the user provides content.
pub const PLACEHOLDER_TEXT: &str = "StartTyping...";

/// Character count the fixed minimum width is sized for.
pub const MIN_WIDTH_CHARS: f64 = 50.0;

/// Average character advance as a fraction of the font size.
pub const AVG_CHAR_WIDTH: f64 = 0.6;

/// Measures the rendered width of a single run of text.
pub trait TextMeasure {
    /// Width in pixels of `text` laid out on one line.
    fn measure_width(&mut self, text: &str, family: FontFamily, size: FontSize) -> f64;
}

/// Font-free width estimate from per-family character factors.
///
/// Deterministic, so it serves headless hosts and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproximateMeasure;

impl TextMeasure for ApproximateMeasure {
    fn measure_width(&mut self, text: &str, family: FontFamily, size: FontSize) -> f64 {
        // Widest line wins
        let max_line_len = text.lines().map(|line| line.chars().count()).max().unwrap_or(0);
        max_line_len as f64 * size.points() * family.char_width_factor()
    }
}

/// Fixed minimum box width: fifty average characters at `size`.
pub fn min_box_width(size: FontSize) -> f64 {
    MIN_WIDTH_CHARS * AVG_CHAR_WIDTH * size.points()
}

/// Box width for the annotation.
///
/// While the placeholder is showing the box hugs the measured placeholder,
/// otherwise it uses the fixed minimum.
pub fn box_width(
    has_user_content: bool,
    family: FontFamily,
    size: FontSize,
    measure: &mut dyn TextMeasure,
) -> f64 {
    if has_user_content {
        min_box_width(size)
    } else {
        measure.measure_width(PLACEHOLDER_TEXT, family, size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_box_width() {
        assert!((min_box_width(FontSize::Pt20) - 600.0).abs() < 1e-9);
        assert!((min_box_width(FontSize::Pt96) - 2880.0).abs() < 1e-9);
    }

    #[test]
    fn test_approximate_measure_uses_widest_line() {
        let mut measure = ApproximateMeasure;
        let single = measure.measure_width("abcd", FontFamily::CourierNew, FontSize::Pt20);
        let multi = measure.measure_width("ab\nabcd\na", FontFamily::CourierNew, FontSize::Pt20);
        assert!((single - 48.0).abs() < 1e-9);
        assert!((single - multi).abs() < 1e-9);
        assert_eq!(measure.measure_width("", FontFamily::Arial, FontSize::Pt32), 0.0);
    }

    #[test]
    fn test_box_width_placeholder_vs_content() {
        let mut measure = ApproximateMeasure;
        for &family in FontFamily::all() {
            for &size in FontSize::all() {
                let expected = measure.measure_width(PLACEHOLDER_TEXT, family, size);
                assert_eq!(box_width(false, family, size, &mut measure), expected);
                assert_eq!(box_width(true, family, size, &mut measure), min_box_width(size));
            }
        }
    }
}
