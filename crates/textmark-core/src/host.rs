//! Owner of the surface across mount and teardown.
//!
//! Every operation is a no-op once the surface is gone, so late toolbar
//! clicks or queued notifications cannot act on a torn-down surface.

use crate::measure::TextMeasure;
use crate::options::{Duration, FontFamily, FontSize, NamedColor};
use crate::surface::{Surface, SurfaceResult};
use kurbo::{Point, Size};

/// Actions the floating toolbar can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarAction {
    SetColor(NamedColor),
    SetFont(FontFamily),
    SetSize(FontSize),
    SetDuration(Duration),
    Delete,
}

/// Holds the surface while it is mounted.
#[derive(Debug, Default)]
pub struct SurfaceHost {
    surface: Option<Surface>,
}

impl SurfaceHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount a fresh surface, replacing any previous one.
    pub fn mount(&mut self, container: Size, measure: &mut dyn TextMeasure) -> SurfaceResult<()> {
        if self.surface.is_some() {
            self.teardown();
        }
        self.surface = Some(Surface::mount(container, measure)?);
        Ok(())
    }

    /// Release the surface along with any undelivered notifications.
    pub fn teardown(&mut self) {
        if self.surface.take().is_some() {
            log::info!("Annotation surface torn down");
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.surface.is_some()
    }

    pub fn surface(&self) -> Option<&Surface> {
        self.surface.as_ref()
    }

    pub fn surface_mut(&mut self) -> Option<&mut Surface> {
        self.surface.as_mut()
    }

    /// Apply a toolbar action. Returns `false` if there is no surface.
    pub fn apply(&mut self, action: ToolbarAction, measure: &mut dyn TextMeasure) -> bool {
        let Some(surface) = self.surface.as_mut() else {
            log::debug!("Ignoring {action:?}: no surface");
            return false;
        };
        log::debug!("Toolbar action: {action:?}");
        match action {
            ToolbarAction::SetColor(color) => surface.set_color(color, measure),
            ToolbarAction::SetFont(family) => surface.set_font(family, measure),
            ToolbarAction::SetSize(size) => surface.set_size(size, measure),
            ToolbarAction::SetDuration(duration) => surface.set_duration(duration),
            ToolbarAction::Delete => surface.delete(measure),
        }
        true
    }

    /// Deliver queued annotation notifications.
    pub fn dispatch(&mut self, measure: &mut dyn TextMeasure) -> usize {
        match self.surface.as_mut() {
            Some(surface) => surface.dispatch_events(measure),
            None => 0,
        }
    }

    /// Resize the surface. Invalid sizes are ignored with a warning.
    pub fn resize(&mut self, container: Size) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        if let Err(e) = surface.resize(container) {
            log::warn!("Keeping previous surface size: {e}");
        }
    }

    pub fn toolbar_position(&self) -> Option<Point> {
        self.surface.as_ref().map(Surface::toolbar_position)
    }

    /// Returns whether the surface asked for a redraw.
    pub fn take_render_request(&mut self) -> bool {
        self.surface
            .as_mut()
            .is_some_and(Surface::take_render_request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measure::ApproximateMeasure;
    use crate::toolbar::DEFAULT_TOOLBAR_POSITION;

    fn mounted_host() -> SurfaceHost {
        let mut host = SurfaceHost::new();
        host.mount(Size::new(800.0, 600.0), &mut ApproximateMeasure)
            .unwrap();
        host
    }

    #[test]
    fn test_actions_reach_surface() {
        let mut host = mounted_host();
        let mut measure = ApproximateMeasure;
        assert!(host.apply(ToolbarAction::SetColor(NamedColor::Blue), &mut measure));
        assert!(host.apply(ToolbarAction::SetFont(FontFamily::Arial), &mut measure));
        assert!(host.apply(ToolbarAction::SetSize(FontSize::Pt72), &mut measure));
        assert!(host.apply(ToolbarAction::SetDuration(Duration::FirstHalf), &mut measure));

        let surface = host.surface().unwrap();
        assert_eq!(surface.annotation().color(), NamedColor::Blue);
        assert_eq!(surface.annotation().font_family(), FontFamily::Arial);
        assert_eq!(surface.annotation().font_size(), FontSize::Pt72);
        assert_eq!(surface.state().duration, Duration::FirstHalf);
    }

    #[test]
    fn test_delete_action() {
        let mut host = mounted_host();
        let mut measure = ApproximateMeasure;
        assert!(host.apply(ToolbarAction::Delete, &mut measure));
        assert_eq!(host.toolbar_position(), Some(DEFAULT_TOOLBAR_POSITION));
    }

    #[test]
    fn test_noop_after_teardown() {
        let mut host = mounted_host();
        let mut measure = ApproximateMeasure;
        if let Some(surface) = host.surface_mut() {
            surface.annotation_mut().type_text("pending");
        }
        host.teardown();

        assert!(!host.is_mounted());
        assert!(!host.apply(ToolbarAction::Delete, &mut measure));
        assert!(!host.apply(ToolbarAction::SetColor(NamedColor::Red), &mut measure));
        assert_eq!(host.dispatch(&mut measure), 0);
        assert_eq!(host.toolbar_position(), None);
        assert!(!host.take_render_request());
        host.resize(Size::new(100.0, 100.0));
        host.teardown();
    }

    #[test]
    fn test_invalid_resize_is_ignored() {
        let mut host = mounted_host();
        host.resize(Size::new(-5.0, 10.0));
        assert_eq!(host.surface().unwrap().container(), Size::new(800.0, 600.0));
    }

    #[test]
    fn test_remount_replaces_surface() {
        let mut host = mounted_host();
        let first = host.surface().unwrap().annotation().id();
        host.mount(Size::new(640.0, 480.0), &mut ApproximateMeasure)
            .unwrap();
        let surface = host.surface().unwrap();
        assert_ne!(surface.annotation().id(), first);
        assert_eq!(surface.container(), Size::new(640.0, 480.0));
    }

    #[test]
    fn test_failed_mount_leaves_host_empty() {
        let mut host = SurfaceHost::new();
        assert!(host.mount(Size::ZERO, &mut ApproximateMeasure).is_err());
        assert!(!host.is_mounted());
    }
}
