//! WebAssembly entry point and container lookup.

use kurbo::Size;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

const CANVAS_ID: &str = "textmark-canvas";
/// Inline style that stretches the canvas over its container.
const CANVAS_STYLE: [(&str, &str); 3] = [
    ("width", "100%"),
    ("height", "100%"),
    ("display", "block"),
];

fn container(id: &str) -> Option<web_sys::HtmlElement> {
    web_sys::window()?
        .document()?
        .get_element_by_id(id)?
        .dyn_into::<web_sys::HtmlElement>()
        .ok()
}

/// Offset size of the container element, in CSS pixels.
pub fn container_size(id: &str) -> Option<Size> {
    let element = container(id)?;
    Some(Size::new(
        element.offset_width() as f64,
        element.offset_height() as f64,
    ))
}

/// Container size in device pixels.
pub fn physical_container_size(id: &str) -> Option<(u32, u32)> {
    let size = container_size(id)?;
    let dpr = web_sys::window()?.device_pixel_ratio();
    Some(((size.width * dpr) as u32, (size.height * dpr) as u32))
}

/// Find the canvas inside the container, creating it if needed.
pub fn attach_canvas(id: &str) -> Option<web_sys::HtmlCanvasElement> {
    let document = web_sys::window()?.document()?;
    let element = container(id)?;

    let canvas = match document
        .get_element_by_id(CANVAS_ID)
        .and_then(|e| e.dyn_into::<web_sys::HtmlCanvasElement>().ok())
    {
        Some(canvas) => canvas,
        None => {
            let canvas = document.create_element("canvas").ok()?;
            canvas.set_id(CANVAS_ID);
            element.append_child(&canvas).ok()?;
            canvas.dyn_into::<web_sys::HtmlCanvasElement>().ok()?
        }
    };

    if let Some((width, height)) = physical_container_size(id) {
        canvas.set_width(width);
        canvas.set_height(height);
    }
    let style = canvas.style();
    for (property, value) in CANVAS_STYLE {
        if let Err(e) = style.set_property(property, value) {
            log::warn!("Failed to set canvas {property}: {e:?}");
        }
    }

    log::info!(
        "Canvas attached to #{id}: {}x{}",
        canvas.width(),
        canvas.height()
    );
    Some(canvas)
}

/// Initialize and run the WASM application.
#[wasm_bindgen(start)]
pub async fn run_wasm() {
    console_error_panic_hook::set_once();

    if let Err(e) = console_log::init_with_level(log::Level::Debug) {
        web_sys::console::error_1(&format!("Failed to initialize logger: {e}").into());
    }

    log::info!("Starting textmark (WASM)");

    if let Err(e) = crate::App::run().await {
        log::error!("{e}");
    }
}
