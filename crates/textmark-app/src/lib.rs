//! textmark application
//!
//! Window, render loop and floating toolbar around the annotation surface.

mod app;
mod event_handler;
mod ui;

pub use app::{App, AppConfig, AppError, AppResult};
pub use ui::{UiAction, UiState, render_ui};

#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use web::run_wasm;
