//! The winit application: window, GPU setup, input, and the frame loop.
//!
//! Each redraw runs the frame in a fixed order: keyboard actions and mouse
//! gestures are applied to the [`SolarSystem`], the fixed-step ticks due since
//! the last frame run with the current hover ray, and the scene is drawn.
//! Transient input is cleared last so a tap shorter than a frame is never
//! lost.

use std::sync::Arc;
use std::time::Instant;

use glam::Vec2;
use orrery_config::{Config, InputConfig};
use orrery_input::{Action, ActionResolver, ActionState, InputMap, KeyboardState, MouseState};
use orrery_render::{
    FrameEncoder, RenderContext, SurfaceError, SurfaceWrapper, init_render_context_blocking,
};
use orrery_sim::{BodyId, FocusCommand, Ray, SolarSystem, TickInput};
use orrery_space::TextureSource;
use tracing::{debug, error, info, instrument, warn};
use winit::application::ApplicationHandler;
use winit::error::EventLoopError;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Fullscreen, Window, WindowAttributes, WindowId};

use crate::game_loop::GameLoop;
use crate::hud::{FpsCounter, HudSnapshot, format_title};
use crate::scene::SceneRenderer;

/// Factor applied to the speed multiplier per speed-up or slow-down press.
pub const SPEED_STEP: f32 = 1.25;

pub fn window_attributes_from_config(config: &Config) -> WindowAttributes {
    let attrs = WindowAttributes::default()
        .with_title(config.window.title.clone())
        .with_inner_size(winit::dpi::LogicalSize::new(
            config.window.width as f64,
            config.window.height as f64,
        ));
    if config.window.fullscreen {
        attrs.with_fullscreen(Some(Fullscreen::Borderless(None)))
    } else {
        attrs
    }
}

/// Whether the event loop keeps going after an action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Quit,
}

/// Apply one triggered action to the simulation.
pub fn apply_action(system: &mut SolarSystem, action: Action) -> Outcome {
    match action {
        Action::TogglePlay => system.toggle_play(),
        Action::Reset => system.select(FocusCommand::Reset),
        Action::Focus(slot) => match BodyId::ALL.get(usize::from(slot)) {
            Some(&body) => system.select(FocusCommand::Select(body)),
            None => warn!(slot, "No body in focus slot"),
        },
        Action::CloseInfo => system.close_info(),
        Action::SpeedUp => system.scale_speed(SPEED_STEP),
        Action::SpeedDown => system.scale_speed(1.0 / SPEED_STEP),
        Action::Quit => return Outcome::Quit,
    }
    Outcome::Continue
}

/// Drag in pixels turned into a camera orbit delta.
pub fn camera_drag(drag: Vec2, input: &InputConfig) -> Vec2 {
    let dy = if input.invert_y { -drag.y } else { drag.y };
    Vec2::new(drag.x, dy) * input.mouse_sensitivity
}

pub struct AppState {
    pub config: Config,
    textures: TextureSource,
    pub window: Option<Arc<Window>>,
    pub gpu: Option<RenderContext>,
    scene: Option<SceneRenderer>,
    pub surface_wrapper: SurfaceWrapper,
    pub game_loop: GameLoop,
    pub system: SolarSystem,
    input_map: InputMap,
    keyboard: KeyboardState,
    mouse: MouseState,
    actions: ActionState,
    fps: FpsCounter,
    title: String,
}

impl AppState {
    pub fn new(config: Config, textures: TextureSource) -> Self {
        let system = SolarSystem::new(&config);
        let input_map = InputMap::from_config(&config.input);
        Self {
            textures,
            window: None,
            gpu: None,
            scene: None,
            surface_wrapper: SurfaceWrapper::new(config.window.width, config.window.height, 1.0),
            game_loop: GameLoop::new(),
            system,
            input_map,
            keyboard: KeyboardState::new(),
            mouse: MouseState::new(),
            actions: ActionState::new(),
            fps: FpsCounter::new(),
            title: config.window.title.clone(),
            config,
        }
    }

    fn viewport(&self) -> Vec2 {
        let size = self.surface_wrapper.physical_size();
        Vec2::new(size.width as f32, size.height as f32)
    }

    /// Ray under the cursor for hover effects. Suppressed while dragging.
    fn hover_ray(&self, viewport: Vec2) -> Option<Ray> {
        if self.mouse.is_dragging() {
            return None;
        }
        let cursor = self.mouse.hover_position()?;
        self.scene.as_ref()?.pointer_ray(cursor, viewport)
    }

    fn apply_input(&mut self) -> Outcome {
        ActionResolver::resolve(&self.input_map, &self.keyboard, &mut self.actions);
        for action in self.actions.triggered() {
            debug!(%action, "Action triggered");
            if apply_action(&mut self.system, action) == Outcome::Quit {
                return Outcome::Quit;
            }
        }

        let viewport = self.viewport();
        if let Some(cursor) = self.mouse.take_click()
            && let Some(ray) = self
                .scene
                .as_ref()
                .and_then(|scene| scene.pointer_ray(cursor, viewport))
            && let Some(body) = self.system.click(&ray)
        {
            debug!(%body, "Body clicked");
        }

        let drag = camera_drag(self.mouse.drag_delta(), &self.config.input);
        if drag != Vec2::ZERO {
            self.system.orbit_camera(drag.x, drag.y);
        }
        let scroll = self.mouse.scroll();
        if scroll != 0.0 {
            self.system.zoom_camera(scroll);
        }
        Outcome::Continue
    }

    fn resize(&mut self, width: u32, height: u32) {
        let Some(resize) = self.surface_wrapper.handle_resize(width, height) else {
            return;
        };
        self.apply_resize(resize.physical.width, resize.physical.height);
    }

    fn apply_resize(&mut self, width: u32, height: u32) {
        if let Some(gpu) = &mut self.gpu {
            gpu.resize(width, height);
            if let Some(scene) = &mut self.scene {
                scene.resize(&gpu.device, width, height);
            }
        }
        debug!(width, height, "Surface resized");
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let steps = self.game_loop.tick();
        if self.apply_input() == Outcome::Quit {
            info!("Quit requested");
            event_loop.exit();
            return;
        }

        let viewport = self.viewport();
        for _ in 0..steps {
            let pointer = self.hover_ray(viewport);
            self.system.tick(TickInput { pointer });
            if let Some(scene) = &mut self.scene {
                scene.sync_camera(self.system.camera_pose());
            }
        }

        self.present(event_loop);
        self.update_title();

        self.keyboard.clear_transients();
        self.mouse.clear_transients();
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn present(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(gpu), Some(scene)) = (self.gpu.as_mut(), self.scene.as_mut()) else {
            return;
        };
        let size = self.surface_wrapper.physical_size();
        let pixel_ratio = self.surface_wrapper.scale_factor() as f32;
        scene.update(&gpu.queue, &self.system, (size.width, size.height), pixel_ratio);

        match gpu.get_current_texture() {
            Ok(texture) => {
                let mut frame = FrameEncoder::new(&gpu.device, Arc::clone(&gpu.queue), texture);
                scene.render(&mut frame);
                frame.submit();
                self.fps.frame(Instant::now());
            }
            Err(SurfaceError::Lost) => gpu.resize(size.width, size.height),
            Err(SurfaceError::OutOfMemory) => {
                error!("GPU out of memory");
                event_loop.exit();
            }
            Err(SurfaceError::Timeout) => warn!("Surface timeout, skipping frame"),
        }
    }

    fn update_title(&mut self) {
        let Some(window) = &self.window else {
            return;
        };
        let fps = if self.config.debug.show_fps {
            self.fps.fps()
        } else {
            None
        };
        let title = format_title(
            &self.config.window.title,
            &HudSnapshot::capture(&self.system, fps),
        );
        if title != self.title {
            window.set_title(&title);
            self.title = title;
        }
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let window = match event_loop.create_window(window_attributes_from_config(&self.config))
        {
            Ok(window) => Arc::new(window),
            Err(e) => {
                error!("Failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        let scale_factor = window.scale_factor();
        let inner_size = window.inner_size();
        self.surface_wrapper =
            SurfaceWrapper::new(inner_size.width, inner_size.height, scale_factor);
        info!(
            "Window {}x{} (scale: {:.2})",
            inner_size.width, inner_size.height, scale_factor
        );

        match init_render_context_blocking(Arc::clone(&window), self.config.window.vsync) {
            Ok(gpu) => {
                self.scene = Some(SceneRenderer::new(
                    &gpu,
                    &self.config,
                    &self.system,
                    &self.textures,
                ));
                self.gpu = Some(gpu);
            }
            Err(e) => {
                error!("GPU initialization failed: {e}");
                event_loop.exit();
                return;
            }
        }

        window.request_redraw();
        self.window = Some(window);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested, shutting down");
                event_loop.exit();
            }
            WindowEvent::Resized(size) => self.resize(size.width, size.height),
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                let Some(size) = self.window.as_ref().map(|w| w.inner_size()) else {
                    return;
                };
                if let Some(resize) = self.surface_wrapper.handle_scale_factor_changed(
                    scale_factor,
                    size.width,
                    size.height,
                ) {
                    self.apply_resize(resize.physical.width, resize.physical.height);
                }
            }
            WindowEvent::Focused(false) => self.keyboard.release_all(),
            WindowEvent::KeyboardInput { event, .. } => self.keyboard.process_event(&event),
            WindowEvent::CursorMoved { position, .. } => {
                self.mouse.on_cursor_moved(position.x, position.y);
            }
            WindowEvent::CursorEntered { .. } => self.mouse.on_cursor_entered(),
            WindowEvent::CursorLeft { .. } => self.mouse.on_cursor_left(),
            WindowEvent::MouseInput { state, button, .. } => self.mouse.on_button(button, state),
            WindowEvent::MouseWheel { delta, .. } => self.mouse.on_scroll(delta),
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }
}

/// Open the window and run until it closes.
///
/// # Errors
///
/// Returns the event loop's error if it cannot be created or fails.
#[instrument(skip_all)]
pub fn run(config: Config, textures: TextureSource) -> Result<(), EventLoopError> {
    let event_loop = EventLoop::new()?;
    let mut app = AppState::new(config, textures);
    event_loop.run_app(&mut app)
}
