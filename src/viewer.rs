//! Windowed viewer: event loop, input and the per-frame render loop.
//!
//! # Example
//!
//! ```ignore
//! use iridescent::prelude::*;
//!
//! fn main() -> Result<(), ViewerError> {
//!     Viewer::new()
//!         .with_params(ShadingParams { octaves: 5, ..Default::default() })
//!         .with_noise_seed(7)
//!         .run()
//! }
//! ```
//!
//! # Controls
//!
//! | Input | Action |
//! |---|---|
//! | Left drag | Orbit |
//! | Wheel | Zoom |
//! | `W` | Toggle wireframe |
//! | `[` / `]` | Subdivisions -5 / +5 |
//! | `Up` / `Down` | Octaves +1 / -1 |
//! | `Space` | Pause time |
//! | `R` | Reset time |
//! | `Esc` | Quit |

use std::path::PathBuf;
use std::sync::Arc;

use glam::Vec2;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::camera::OrbitCamera;
use crate::error::ViewerError;
#[cfg(feature = "egui")]
use crate::gpu::egui_integration::EguiIntegration;
use crate::gpu::GpuState;
use crate::mesh::IcoSphere;
#[cfg(feature = "egui")]
use crate::panel::{show_panel, PanelStats};
use crate::params::{RenderConfig, ShadingParams};
use crate::textures::NoiseTexture;
use crate::time::Time;
use crate::uniforms::ShadingUniforms;

/// Side length of the generated noise texture.
pub const NOISE_TEXTURE_SIZE: u32 = 256;
/// Subdivision change per `[` / `]` press.
const SUBDIVISION_STEP: i32 = 5;
/// Frames between FPS log lines.
const FPS_LOG_INTERVAL: u64 = 300;

/// Where the noise texture comes from.
enum TextureSource {
    Procedural { seed: u32 },
    File(PathBuf),
    Image(NoiseTexture),
}

/// Builder for the interactive viewer window.
pub struct Viewer {
    params: ShadingParams,
    config: RenderConfig,
    texture: TextureSource,
}

impl Viewer {
    pub fn new() -> Self {
        Self {
            params: ShadingParams::default(),
            config: RenderConfig::default(),
            texture: TextureSource::Procedural { seed: 0 },
        }
    }

    /// Initial shading parameters. Out-of-range values are clamped.
    pub fn with_params(mut self, params: ShadingParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_config(mut self, config: RenderConfig) -> Self {
        self.config = config;
        self
    }

    /// Use an already built noise texture.
    pub fn with_texture(mut self, texture: NoiseTexture) -> Self {
        self.texture = TextureSource::Image(texture);
        self
    }

    /// Load the noise texture from an image file when the viewer starts.
    pub fn with_texture_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.texture = TextureSource::File(path.into());
        self
    }

    /// Generate the noise texture procedurally with this seed.
    pub fn with_noise_seed(mut self, seed: u32) -> Self {
        self.texture = TextureSource::Procedural { seed };
        self
    }

    /// Open the window and run until it is closed.
    pub fn run(self) -> Result<(), ViewerError> {
        let noise = match self.texture {
            TextureSource::Procedural { seed } => {
                log::info!("generating {NOISE_TEXTURE_SIZE}x{NOISE_TEXTURE_SIZE} noise texture (seed {seed})");
                NoiseTexture::noise(NOISE_TEXTURE_SIZE, seed)
            }
            TextureSource::File(path) => NoiseTexture::from_file(path)?,
            TextureSource::Image(texture) => texture,
        };

        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = App::new(self.params.sanitized(), self.config, noise);
        event_loop.run_app(&mut app)?;

        match app.error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl Default for Viewer {
    fn default() -> Self {
        Self::new()
    }
}

struct App {
    window: Option<Arc<Window>>,
    gpu: Option<GpuState>,
    #[cfg(feature = "egui")]
    egui: Option<EguiIntegration>,
    params: ShadingParams,
    config: RenderConfig,
    mesh: IcoSphere,
    noise: NoiseTexture,
    camera: OrbitCamera,
    time: Time,
    mouse_pressed: bool,
    last_mouse_pos: Option<(f64, f64)>,
    /// First error raised inside a callback, returned from `Viewer::run`.
    error: Option<ViewerError>,
}

impl App {
    fn new(params: ShadingParams, config: RenderConfig, noise: NoiseTexture) -> Self {
        let mesh = IcoSphere::new(config.sphere_radius, params.subdivisions);
        log::info!(
            "icosphere detail {}: {} vertices, {} triangles",
            mesh.detail(),
            mesh.vertices().len(),
            mesh.triangle_count()
        );

        Self {
            window: None,
            gpu: None,
            #[cfg(feature = "egui")]
            egui: None,
            camera: OrbitCamera::from_config(&config),
            params,
            config,
            mesh,
            noise,
            time: Time::new(),
            mouse_pressed: false,
            last_mouse_pos: None,
            error: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: ViewerError) {
        log::error!("{err}");
        if self.error.is_none() {
            self.error = Some(err);
        }
        event_loop.exit();
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), ViewerError> {
        let window_attrs = Window::default_attributes()
            .with_title("Iridescent")
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.config.window_width,
                self.config.window_height,
            ));

        let window = Arc::new(event_loop.create_window(window_attrs)?);
        self.window = Some(window.clone());

        let gpu = pollster::block_on(GpuState::new(
            window.clone(),
            &self.mesh,
            &self.noise,
            self.config.clear_color,
        ))?;

        #[cfg(feature = "egui")]
        {
            self.egui = Some(EguiIntegration::new(gpu.device(), gpu.config.format, &window));
        }

        self.gpu = Some(gpu);
        window.request_redraw();
        Ok(())
    }

    /// Rebuild the icosphere if the subdivision level changed.
    fn sync_mesh(&mut self) {
        if self.mesh.detail() == self.params.subdivisions {
            return;
        }
        self.mesh = IcoSphere::new(self.config.sphere_radius, self.params.subdivisions);
        if let Some(gpu) = &mut self.gpu {
            gpu.replace_mesh(&self.mesh);
        }
        log::debug!(
            "rebuilt icosphere at detail {} ({} triangles)",
            self.mesh.detail(),
            self.mesh.triangle_count()
        );
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, event: &KeyEvent) {
        if event.state != ElementState::Pressed {
            return;
        }
        let PhysicalKey::Code(code) = event.physical_key else {
            return;
        };

        match code {
            KeyCode::Escape => event_loop.exit(),
            KeyCode::KeyW if !event.repeat => {
                self.params.wireframe = !self.params.wireframe;
                log::debug!("wireframe {}", if self.params.wireframe { "on" } else { "off" });
            }
            KeyCode::BracketLeft => {
                self.params.step_subdivisions(-SUBDIVISION_STEP);
                log::debug!("subdivisions {}", self.params.subdivisions);
            }
            KeyCode::BracketRight => {
                self.params.step_subdivisions(SUBDIVISION_STEP);
                log::debug!("subdivisions {}", self.params.subdivisions);
            }
            KeyCode::ArrowUp => {
                self.params.step_octaves(1);
                log::debug!("octaves {}", self.params.octaves);
            }
            KeyCode::ArrowDown => {
                self.params.step_octaves(-1);
                log::debug!("octaves {}", self.params.octaves);
            }
            KeyCode::Space if !event.repeat => {
                self.time.toggle_pause();
                log::debug!("time {}", if self.time.is_paused() { "paused" } else { "running" });
            }
            KeyCode::KeyR => {
                self.time.reset();
                log::debug!("time reset");
            }
            _ => {}
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        self.sync_mesh();

        #[cfg(feature = "egui")]
        let overlay = match (&mut self.egui, &self.window) {
            (Some(egui), Some(window)) => {
                let stats = PanelStats {
                    fps: self.time.fps(),
                    time: self.time.value(),
                    triangles: self.mesh.triangle_count(),
                    paused: self.time.is_paused(),
                };
                let params = &mut self.params;
                Some(egui.run(window, |ctx| {
                    if show_panel(ctx, params, stats) {
                        log::debug!("parameters changed: {params:?}");
                    }
                }))
            }
            _ => None,
        };

        let Some(gpu) = &mut self.gpu else {
            return;
        };

        self.camera.update();
        let time = self.time.tick();

        let (width, height) = gpu.size();
        let uniforms = ShadingUniforms::new(
            &self.params,
            time,
            self.camera.view_proj(gpu.aspect_ratio()),
            self.camera.position(),
            Vec2::new(width as f32, height as f32),
        );

        #[cfg(feature = "egui")]
        let result = {
            let ui = match (&mut self.egui, &overlay) {
                (Some(egui), Some(output)) => Some((egui, output)),
                _ => None,
            };
            gpu.render(&uniforms, self.params.wireframe, ui)
        };
        #[cfg(not(feature = "egui"))]
        let result = gpu.render(&uniforms, self.params.wireframe);

        match result {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => gpu.reconfigure(),
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("GPU out of memory");
                event_loop.exit();
            }
            Err(e) => log::warn!("skipped frame: {e:?}"),
        }

        if self.time.frame() % FPS_LOG_INTERVAL == 0 {
            log::debug!("{:.1} fps at t = {:.2}", self.time.fps(), self.time.value());
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(err) = self.init(event_loop) {
                self.fail(event_loop, err);
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        #[cfg(feature = "egui")]
        if let (Some(egui), Some(window)) = (&mut self.egui, &self.window) {
            let consumed = egui.on_window_event(window, &event);
            let is_input = matches!(
                event,
                WindowEvent::MouseInput { .. }
                    | WindowEvent::MouseWheel { .. }
                    | WindowEvent::KeyboardInput { .. }
            );
            if consumed && is_input {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(physical_size);
                }
                self.time.reset();
                log::debug!("resized to {}x{}", physical_size.width, physical_size.height);
            }
            WindowEvent::KeyboardInput { event, .. } => {
                self.handle_key(event_loop, &event);
            }
            WindowEvent::MouseInput { state, button, .. } => {
                if button == MouseButton::Left {
                    self.mouse_pressed = state == ElementState::Pressed;
                    if !self.mouse_pressed {
                        self.last_mouse_pos = None;
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                if self.mouse_pressed {
                    if let Some((last_x, last_y)) = self.last_mouse_pos {
                        self.camera
                            .rotate((position.x - last_x) as f32, (position.y - last_y) as f32);
                    }
                    self.last_mouse_pos = Some((position.x, position.y));
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * 0.1,
                };
                self.camera.zoom(lines);
            }
            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}
