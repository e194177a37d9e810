//! Mapping from annotation font choices to parley font stacks.

use parley::FontStack;
use std::borrow::Cow;
use textmark_core::options::FontFamily;

/// Generic family to fall back on when the named font is not installed.
pub fn generic_fallback(family: FontFamily) -> &'static str {
    match family {
        FontFamily::Roboto | FontFamily::Arial => "sans-serif",
        FontFamily::TimesNewRoman | FontFamily::Georgia => "serif",
        FontFamily::CourierNew => "monospace",
    }
}

/// Bundled face standing in for `family` when it is not installed.
pub fn bundled_family(family: FontFamily) -> &'static str {
    match family {
        FontFamily::Roboto | FontFamily::Arial => "DejaVu Sans",
        FontFamily::TimesNewRoman | FontFamily::Georgia => "DejaVu Serif",
        FontFamily::CourierNew => "DejaVu Sans Mono",
    }
}

/// Font stack for `family`: named face, bundled face, then the generic family.
pub fn font_stack(family: FontFamily) -> FontStack<'static> {
    FontStack::Source(Cow::Owned(format!(
        "\"{}\", \"{}\", {}",
        family.name(),
        bundled_family(family),
        generic_fallback(family)
    )))
}
