//! textmark core library
//!
//! Platform-agnostic model for a single text annotation on an overlay
//! surface, kept in two-way sync with a floating toolbar.

pub mod annotation;
pub mod host;
pub mod input;
pub mod measure;
pub mod options;
pub mod selection;
pub mod surface;
pub mod toolbar;

pub use annotation::{Annotation, AnnotationEvent, AnnotationId};
pub use host::{SurfaceHost, ToolbarAction};
pub use input::InputState;
pub use measure::{ApproximateMeasure, PLACEHOLDER_TEXT, TextMeasure};
pub use options::{Duration, FontFamily, FontSize, NamedColor};
pub use selection::{DragState, PressOutcome};
pub use surface::{AnnotationState, Surface, SurfaceError, SurfaceResult};
pub use toolbar::{ToolbarPlacement, toolbar_position};
