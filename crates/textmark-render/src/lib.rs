//! textmark render library
//!
//! Renderer abstraction for the annotation surface.
//! The default implementation uses Vello for GPU-accelerated rendering
//! and Parley for text layout and measurement.

pub mod fonts;
mod renderer;
pub mod text_editor;

#[cfg(feature = "vello-renderer")]
mod vello_impl;

pub use renderer::{RenderContext, Renderer, RendererError, RendererResult};
pub use text_editor::{TextEditResult, TextEditState, TextKey, TextModifiers};

#[cfg(feature = "vello-renderer")]
pub use vello_impl::VelloRenderer;
