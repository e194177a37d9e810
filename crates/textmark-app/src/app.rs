//! Core application state and lifecycle.

use kurbo::{Point, Size};
use peniko::Color;
use std::sync::Arc;
use textmark_core::input::{Modifiers, MouseButton as PointerButton, PointerEvent};
use textmark_core::{InputState, SurfaceHost};
use textmark_render::{
    RenderContext, Renderer, RendererError, TextKey, TextModifiers, VelloRenderer,
};
use thiserror::Error;
use vello::util::RenderSurface;
use vello::wgpu::PresentMode;
use vello::{AaConfig, RenderParams, RendererOptions};
use winit::application::ApplicationHandler;
#[cfg(not(target_arch = "wasm32"))]
use winit::dpi::LogicalSize;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{Key, ModifiersState, NamedKey};
use winit::window::{Window, WindowId};

use crate::event_handler::EventHandler;
use crate::ui::{UiState, render_ui};

/// Application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
}

/// Result type for application operations.
pub type AppResult<T> = Result<T, AppError>;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Backdrop behind the transparent annotation surface.
    pub background_color: Color,
    /// Element the canvas is mounted into on the web.
    pub container_id: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "textmark".to_string(),
            width: 1280,
            height: 800,
            background_color: Color::from_rgba8(245, 245, 245, 255),
            container_id: "textmark-container".to_string(),
        }
    }
}

/// Map a winit key to an editor key.
fn text_key(key: &Key) -> Option<TextKey> {
    match key {
        Key::Named(NamedKey::Escape) => Some(TextKey::Escape),
        Key::Named(NamedKey::Backspace) => Some(TextKey::Backspace),
        Key::Named(NamedKey::Delete) => Some(TextKey::Delete),
        Key::Named(NamedKey::Enter) => Some(TextKey::Enter),
        Key::Named(NamedKey::ArrowLeft) => Some(TextKey::Left),
        Key::Named(NamedKey::ArrowRight) => Some(TextKey::Right),
        Key::Named(NamedKey::ArrowUp) => Some(TextKey::Up),
        Key::Named(NamedKey::ArrowDown) => Some(TextKey::Down),
        Key::Named(NamedKey::Home) => Some(TextKey::Home),
        Key::Named(NamedKey::End) => Some(TextKey::End),
        Key::Named(NamedKey::Space) => Some(TextKey::Character(" ".to_string())),
        Key::Character(c) => Some(TextKey::Character(c.to_string())),
        _ => None,
    }
}

fn pointer_button(button: MouseButton) -> Option<PointerButton> {
    match button {
        MouseButton::Left => Some(PointerButton::Left),
        MouseButton::Right => Some(PointerButton::Right),
        MouseButton::Middle => Some(PointerButton::Middle),
        _ => None,
    }
}

fn modifiers(state: ModifiersState) -> Modifiers {
    Modifiers {
        shift: state.shift_key(),
        ctrl: state.control_key(),
        alt: state.alt_key(),
        meta: state.super_key(),
    }
}

fn text_modifiers(modifiers: Modifiers) -> TextModifiers {
    TextModifiers {
        shift: modifiers.shift,
        ctrl: modifiers.ctrl,
        alt: modifiers.alt,
        meta: modifiers.meta,
    }
}

/// Container size in surface units (logical pixels).
fn logical_size(window: &Window) -> Size {
    let size = window.inner_size().to_logical::<f64>(window.scale_factor());
    Size::new(size.width, size.height)
}

/// Runtime state for the application.
struct AppState {
    // Windowing
    window: Arc<Window>,
    surface: RenderSurface<'static>,

    // Rendering
    vello_renderer: vello::Renderer,
    /// Texture blitter for RGBA->surface format conversion (needed for WebGPU/WASM)
    texture_blitter: vello::wgpu::util::TextureBlitter,
    renderer: VelloRenderer,

    // egui
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,

    // Annotation
    host: SurfaceHost,
    input: InputState,
    event_handler: EventHandler,
    config: AppConfig,
}

impl AppState {
    /// Mount or resize the annotation surface to the window's current size.
    fn fit_surface(&mut self, container: Size) {
        if self.host.is_mounted() {
            self.host.resize(container);
        } else if let Err(e) = self.host.mount(container, &mut self.renderer) {
            log::warn!("Annotation surface not mounted: {e}");
        }
    }

    /// Run the toolbar, bring the annotation up to date and rebuild the scene.
    ///
    /// Returns the egui output to paint over the scene.
    fn update(&mut self) -> (Vec<egui::ClippedPrimitive>, egui::TexturesDelta, f32) {
        let ui_state = self
            .host
            .surface()
            .map(|surface| UiState::from_state(surface.state()))
            .unwrap_or_default();
        let toolbar_position = self.host.toolbar_position();

        let egui_input = self.egui_state.take_egui_input(&self.window);
        let mut action = None;
        let egui_output = self.egui_ctx.run(egui_input, |ctx| {
            if let Some(position) = toolbar_position {
                action = render_ui(ctx, &ui_state, position);
            }
        });
        self.egui_state
            .handle_platform_output(&self.window, egui_output.platform_output);

        if let Some(action) = action {
            self.host.apply(action.into(), &mut self.renderer);
        }
        self.event_handler.sync_editor(&self.host);
        self.host.dispatch(&mut self.renderer);

        let editing = self.event_handler.is_editing();
        if self.host.take_render_request() || editing {
            self.build_scene(editing);
        }

        let primitives = self
            .egui_ctx
            .tessellate(egui_output.shapes, egui_output.pixels_per_point);
        (
            primitives,
            egui_output.textures_delta,
            egui_output.pixels_per_point,
        )
    }

    fn build_scene(&mut self, editing: bool) {
        let Some(surface) = self.host.surface() else {
            self.renderer.take_scene();
            return;
        };
        let scale_factor = self.window.scale_factor();
        let ctx = RenderContext::new(surface.annotation(), surface.container())
            .with_scale_factor(scale_factor)
            .with_background(self.config.background_color)
            .with_focus(surface.is_focused())
            .with_editing(editing);
        self.renderer.build_scene(&ctx);

        if let Some(edit) = self.event_handler.text_edit_mut() {
            self.renderer
                .render_annotation_editing(surface.annotation(), edit, scale_factor);
        }
    }

    /// Paint the scene and the toolbar to the window.
    fn present(&mut self, render_cx: &vello::util::RenderContext) {
        let (egui_primitives, textures_delta, pixels_per_point) = self.update();

        let device_handle = &render_cx.devices[self.surface.dev_id];
        let device = &device_handle.device;
        let queue = &device_handle.queue;

        let surface_texture = match self.surface.surface.get_current_texture() {
            Ok(t) => t,
            Err(e) => {
                log::warn!("Failed to get surface texture: {:?}", e);
                return;
            }
        };

        let width = self.surface.config.width;
        let height = self.surface.config.height;

        let params = RenderParams {
            base_color: self.config.background_color,
            width,
            height,
            antialiasing_method: AaConfig::Area,
        };

        // Vello's compute shaders need a StorageBinding target, which WebGPU
        // only allows for Rgba8Unorm; the result is blitted to the surface.
        let render_texture = device.create_texture(&vello::wgpu::TextureDescriptor {
            label: Some("vello render texture"),
            size: vello::wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: vello::wgpu::TextureDimension::D2,
            format: vello::wgpu::TextureFormat::Rgba8Unorm,
            usage: vello::wgpu::TextureUsages::STORAGE_BINDING
                | vello::wgpu::TextureUsages::COPY_SRC
                | vello::wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let render_texture_view =
            render_texture.create_view(&vello::wgpu::TextureViewDescriptor::default());

        if let Err(e) = self.vello_renderer.render_to_texture(
            device,
            queue,
            self.renderer.scene(),
            &render_texture_view,
            &params,
        ) {
            log::error!("{}", RendererError::RenderFailed(format!("{e:?}")));
            return;
        }

        let surface_view = surface_texture
            .texture
            .create_view(&vello::wgpu::TextureViewDescriptor::default());

        {
            let mut blit_encoder =
                device.create_command_encoder(&vello::wgpu::CommandEncoderDescriptor {
                    label: Some("blit encoder"),
                });
            self.texture_blitter.copy(
                device,
                &mut blit_encoder,
                &render_texture_view,
                &surface_view,
            );
            queue.submit(std::iter::once(blit_encoder.finish()));
        }

        for (id, image_delta) in &textures_delta.set {
            self.egui_renderer
                .update_texture(device, queue, *id, image_delta);
        }

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [width, height],
            pixels_per_point,
        };

        {
            let mut egui_encoder =
                device.create_command_encoder(&vello::wgpu::CommandEncoderDescriptor {
                    label: Some("egui encoder"),
                });
            self.egui_renderer.update_buffers(
                device,
                queue,
                &mut egui_encoder,
                &egui_primitives,
                &screen_descriptor,
            );

            let render_pass = egui_encoder.begin_render_pass(&vello::wgpu::RenderPassDescriptor {
                label: Some("egui render pass"),
                color_attachments: &[Some(vello::wgpu::RenderPassColorAttachment {
                    view: &surface_view,
                    resolve_target: None,
                    ops: vello::wgpu::Operations {
                        // Keep the Vello content underneath
                        load: vello::wgpu::LoadOp::Load,
                        store: vello::wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            // egui-wgpu wants a 'static render pass
            let mut render_pass = render_pass.forget_lifetime();
            self.egui_renderer
                .render(&mut render_pass, &egui_primitives, &screen_descriptor);
            drop(render_pass);

            queue.submit(std::iter::once(egui_encoder.finish()));
        }

        for id in &textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
        surface_texture.present();
    }

    fn handle_pointer_button(&mut self, button: MouseButton, pressed: bool, pointer_blocked: bool) {
        let Some(button) = pointer_button(button) else {
            return;
        };
        let position = self.input.pointer_position;

        if !pressed {
            self.input
                .handle_pointer_event(PointerEvent::Up { position, button });
            if button == PointerButton::Left {
                self.event_handler.handle_release();
            }
            return;
        }

        if pointer_blocked {
            return;
        }
        self.input
            .handle_pointer_event(PointerEvent::Down { position, button });
        if button != PointerButton::Left {
            return;
        }

        let double_click = self.input.is_double_click();
        let was_editing = self.event_handler.is_editing();
        self.event_handler.handle_press(
            &mut self.host,
            &mut self.renderer,
            position,
            double_click,
            self.input.modifiers.shift,
        );
        if double_click && was_editing && self.event_handler.is_editing() {
            self.event_handler
                .handle_word_select(&mut self.host, &mut self.renderer, position);
        }
    }
}

/// Main application struct.
pub struct App {
    config: AppConfig,
    state: Option<AppState>,
    render_cx: Option<vello::util::RenderContext>,
    /// Window waiting for async surface creation (WASM only)
    pending_window: Option<Arc<Window>>,
    /// Flag to indicate async init is in progress
    #[cfg(target_arch = "wasm32")]
    init_in_progress: std::cell::Cell<bool>,
}

impl App {
    /// Create a new application with default configuration.
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// Create a new application with custom configuration.
    pub fn with_config(config: AppConfig) -> Self {
        Self {
            config,
            state: None,
            render_cx: None,
            pending_window: None,
            #[cfg(target_arch = "wasm32")]
            init_in_progress: std::cell::Cell::new(false),
        }
    }

    /// Run the application with the default configuration.
    pub async fn run() -> AppResult<()> {
        Self::run_with_config(AppConfig::default()).await
    }

    /// Run the application.
    pub async fn run_with_config(config: AppConfig) -> AppResult<()> {
        let event_loop = EventLoop::new()?;
        let app = App::with_config(config);

        #[cfg(target_arch = "wasm32")]
        {
            use winit::platform::web::EventLoopExtWebSys;
            event_loop.spawn_app(app);
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let mut app = app;
            event_loop.run_app(&mut app)?;
        }

        Ok(())
    }

    /// Finish initialization after surface is created.
    fn finish_init(&mut self, window: Arc<Window>, surface: RenderSurface<'static>) {
        let Some(render_cx) = self.render_cx.as_ref() else {
            log::error!("{}", RendererError::InitFailed("no render context".into()));
            return;
        };
        let device = &render_cx.devices[surface.dev_id].device;

        let vello_renderer = match vello::Renderer::new(device, RendererOptions::default()) {
            Ok(renderer) => renderer,
            Err(e) => {
                log::error!("{}", RendererError::InitFailed(format!("{e:?}")));
                return;
            }
        };

        let texture_blitter =
            vello::wgpu::util::TextureBlitter::new(device, surface.config.format);

        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(
            device,
            surface.config.format,
            egui_wgpu::RendererOptions::default(),
        );

        log::info!(
            "Renderer initialized - {}x{}",
            surface.config.width,
            surface.config.height
        );

        #[cfg(target_arch = "wasm32")]
        let container = crate::web::container_size(&self.config.container_id)
            .unwrap_or_else(|| logical_size(&window));
        #[cfg(not(target_arch = "wasm32"))]
        let container = logical_size(&window);

        let mut state = AppState {
            window: window.clone(),
            surface,
            vello_renderer,
            texture_blitter,
            renderer: VelloRenderer::new(),
            egui_ctx,
            egui_state,
            egui_renderer,
            host: SurfaceHost::new(),
            input: InputState::new(),
            event_handler: EventHandler::new(),
            config: self.config.clone(),
        };
        state.fit_surface(container);

        self.state = Some(state);
        self.pending_window = None;

        window.request_redraw();
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn window_attributes(&self) -> Option<winit::window::WindowAttributes> {
        Some(
            Window::default_attributes()
                .with_title(&self.config.title)
                .with_inner_size(LogicalSize::new(self.config.width, self.config.height)),
        )
    }

    #[cfg(target_arch = "wasm32")]
    fn window_attributes(&self) -> Option<winit::window::WindowAttributes> {
        use winit::platform::web::WindowAttributesExtWebSys;

        let Some(canvas) = crate::web::attach_canvas(&self.config.container_id) else {
            log::error!("Container #{} not found", self.config.container_id);
            return None;
        };
        Some(
            Window::default_attributes()
                .with_title(&self.config.title)
                .with_canvas(Some(canvas)),
        )
    }

    /// Start creating the render surface in the background (WASM only).
    #[cfg(target_arch = "wasm32")]
    fn start_async_init(&mut self, window: Arc<Window>) {
        if self.init_in_progress.get() {
            return;
        }
        self.init_in_progress.set(true);

        let (width, height) = crate::web::physical_container_size(&self.config.container_id)
            .unwrap_or((self.config.width, self.config.height));

        let self_ptr = self as *mut Self;
        wasm_bindgen_futures::spawn_local(async move {
            log::info!("Creating surface asynchronously...");
            let mut render_cx = vello::util::RenderContext::new();
            let created = render_cx
                .create_surface(window.clone(), width, height, PresentMode::AutoVsync)
                .await;

            // SAFETY: WASM is single-threaded and the event loop keeps the App alive
            let app = unsafe { &mut *self_ptr };
            match created {
                Ok(surface) => {
                    app.render_cx = Some(render_cx);
                    app.finish_init(window, surface);
                }
                Err(e) => {
                    log::error!("{}", RendererError::Surface(format!("{e:?}")));
                    app.init_in_progress.set(false);
                }
            }
        });
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() || self.pending_window.is_some() {
            return;
        }

        log::info!("Creating window...");
        let Some(window_attrs) = self.window_attributes() else {
            return;
        };
        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        let size = window.inner_size();
        let (width, height) = if size.width == 0 || size.height == 0 {
            (self.config.width, self.config.height)
        } else {
            (size.width, size.height)
        };
        log::info!("Surface size: {}x{}", width, height);

        #[cfg(not(target_arch = "wasm32"))]
        {
            let render_cx = self
                .render_cx
                .get_or_insert_with(vello::util::RenderContext::new);
            let surface = match pollster::block_on(render_cx.create_surface(
                window.clone(),
                width,
                height,
                PresentMode::AutoVsync,
            )) {
                Ok(surface) => surface,
                Err(e) => {
                    log::error!("{}", RendererError::Surface(format!("{e:?}")));
                    event_loop.exit();
                    return;
                }
            };
            self.finish_init(window, surface);
        }

        #[cfg(target_arch = "wasm32")]
        {
            self.pending_window = Some(window);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        #[cfg(target_arch = "wasm32")]
        if self.state.is_none() {
            if let Some(window) = self.pending_window.clone() {
                self.start_async_init(window.clone());
                // Keep the event loop turning until the surface exists
                window.request_redraw();
            }
            return;
        }

        let Some(state) = &mut self.state else {
            return;
        };

        let egui_response = state.egui_state.on_window_event(&state.window, &event);
        let pointer_blocked = egui_response.consumed
            || state.egui_ctx.is_pointer_over_area()
            || state.egui_ctx.wants_pointer_input();
        let keyboard_blocked = state.egui_ctx.wants_keyboard_input();

        match event {
            WindowEvent::CloseRequested => {
                state.host.teardown();
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if size.width == 0 || size.height == 0 {
                    return;
                }
                if let Some(render_cx) = self.render_cx.as_mut() {
                    render_cx.resize_surface(&mut state.surface, size.width, size.height);
                }
                let container = logical_size(&state.window);
                state.fit_surface(container);
                state.window.request_redraw();
            }

            WindowEvent::RedrawRequested => {
                let Some(render_cx) = self.render_cx.as_ref() else {
                    return;
                };
                state.present(render_cx);
                state.window.request_redraw();
            }

            WindowEvent::CursorMoved { position, .. } => {
                let position = position.to_logical::<f64>(state.window.scale_factor());
                let point = Point::new(position.x, position.y);
                state
                    .input
                    .handle_pointer_event(PointerEvent::Move { position: point });

                // A drag that started on the canvas keeps going under the toolbar
                if pointer_blocked && !state.event_handler.is_dragging() {
                    return;
                }
                if state
                    .event_handler
                    .handle_pointer_move(&mut state.host, &mut state.renderer, point)
                {
                    state.window.request_redraw();
                }
            }

            WindowEvent::MouseInput {
                state: button_state,
                button,
                ..
            } => {
                state.handle_pointer_button(
                    button,
                    button_state == ElementState::Pressed,
                    pointer_blocked,
                );
                state.window.request_redraw();
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if keyboard_blocked || event.state != ElementState::Pressed {
                    return;
                }
                let Some(key) = text_key(&event.logical_key) else {
                    return;
                };
                let modifiers = text_modifiers(state.input.modifiers);
                if state.event_handler.handle_key(
                    &mut state.host,
                    &mut state.renderer,
                    key,
                    modifiers,
                ) {
                    state.window.request_redraw();
                }
            }

            WindowEvent::ModifiersChanged(new_modifiers) => {
                state.input.set_modifiers(modifiers(new_modifiers.state()));
            }

            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &mut self.state {
            state.host.teardown();
        }
    }
}
