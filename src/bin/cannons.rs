//! Cannons - desktop host
//!
//! Runs the game against the simulated tracking session.
//!
//! Controls:
//! - Left click: place a cannon on the detected floor
//! - Right drag: aim the current player's cannon
//! - F / Space: Fire!
//! - WASD: move the camera, Q/E: down/up, arrow keys: look around
//! - T: toggle camera tracking loss
//! - Escape: exit
//!
//! Usage: `cannons [config.json]`

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use log::{error, info, warn};
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowAttributes, WindowId};

use cannons_ar_engine::config::CannonsConfig;
use cannons_ar_engine::frame::{FrameOrchestrator, InputHandle};
use cannons_ar_engine::render::{GpuContext, GpuContextConfig, SceneRenderer};
use cannons_ar_engine::tracking::{DeviceProfile, SimulatedSession, TrackingState};

const MOVE_STEP: f32 = 0.1;
const LOOK_STEP: f32 = 0.05;

struct CannonsApp {
    config: CannonsConfig,
    orchestrator: FrameOrchestrator<SimulatedSession>,
    input: InputHandle,
    window: Option<Arc<Window>>,
    renderer: Option<SceneRenderer>,
    cursor: Option<(f32, f32)>,
    dragging: bool,
    title: String,
}

impl CannonsApp {
    fn new(config: CannonsConfig, session: SimulatedSession) -> Self {
        let (orchestrator, input) = FrameOrchestrator::new(session, config.clone());
        Self {
            config,
            orchestrator,
            input,
            window: None,
            renderer: None,
            cursor: None,
            dragging: false,
            title: String::new(),
        }
    }

    fn initialize(&mut self, event_loop: &ActiveEventLoop, window: Arc<Window>) {
        let gpu = match GpuContext::new(Arc::clone(&window), GpuContextConfig::default()) {
            Ok(gpu) => gpu,
            Err(e) => {
                error!("{}", e);
                event_loop.exit();
                return;
            }
        };
        let renderer = SceneRenderer::new(gpu, &self.config);

        let (width, height) = renderer.dimensions();
        self.orchestrator
            .set_camera_texture(renderer.camera_texture_handle());
        self.orchestrator.on_surface_changed(width, height);

        self.window = Some(window);
        self.renderer = Some(renderer);
        self.resume(event_loop);
    }

    fn resume(&mut self, event_loop: &ActiveEventLoop) {
        if let Err(e) = self.orchestrator.on_resume() {
            error!("Failed to resume tracking session: {}", e);
            eprintln!("{}", e.user_message());
            event_loop.exit();
        }
    }

    fn handle_key(&mut self, key: KeyCode) {
        let session = self.orchestrator.session_mut();
        match key {
            KeyCode::KeyF | KeyCode::Space => self.input.fire(),
            KeyCode::KeyW => session.move_camera(MOVE_STEP, 0.0, 0.0),
            KeyCode::KeyS => session.move_camera(-MOVE_STEP, 0.0, 0.0),
            KeyCode::KeyD => session.move_camera(0.0, MOVE_STEP, 0.0),
            KeyCode::KeyA => session.move_camera(0.0, -MOVE_STEP, 0.0),
            KeyCode::KeyE => session.move_camera(0.0, 0.0, MOVE_STEP),
            KeyCode::KeyQ => session.move_camera(0.0, 0.0, -MOVE_STEP),
            KeyCode::ArrowLeft => session.look(-LOOK_STEP, 0.0),
            KeyCode::ArrowRight => session.look(LOOK_STEP, 0.0),
            KeyCode::ArrowUp => session.look(0.0, LOOK_STEP),
            KeyCode::ArrowDown => session.look(0.0, -LOOK_STEP),
            KeyCode::KeyT => {
                let next = match session.camera_tracking() {
                    TrackingState::Tracking => TrackingState::Paused,
                    _ => TrackingState::Tracking,
                };
                info!("Simulated camera tracking: {:?}", next);
                session.set_camera_tracking(next);
            }
            _ => {}
        }
    }

    fn redraw(&mut self) {
        let Some(renderer) = self.renderer.as_mut() else {
            return;
        };
        self.orchestrator.on_draw_frame(renderer);

        let title = format!("Cannons - {}", self.orchestrator.status());
        if title != self.title {
            if let Some(window) = &self.window {
                window.set_title(&title);
            }
            self.title = title;
        }
    }
}

impl ApplicationHandler for CannonsApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            let attrs = WindowAttributes::default()
                .with_title("Cannons")
                .with_inner_size(PhysicalSize::new(1280, 720));
            match event_loop.create_window(attrs) {
                Ok(window) => self.initialize(event_loop, Arc::new(window)),
                Err(e) => {
                    error!("Failed to create window: {}", e);
                    event_loop.exit();
                }
            }
        } else {
            self.resume(event_loop);
        }
    }

    fn suspended(&mut self, _: &ActiveEventLoop) {
        self.orchestrator.on_pause();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key) = event.physical_key {
                    if event.state != ElementState::Pressed {
                        return;
                    }
                    if key == KeyCode::Escape {
                        event_loop.exit();
                        return;
                    }
                    self.handle_key(key);
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let pressed = state == ElementState::Pressed;
                match button {
                    MouseButton::Left if pressed => {
                        if let Some((x, y)) = self.cursor {
                            if !self.input.tap(x, y) {
                                warn!("Tap dropped: too many pending taps");
                            }
                        }
                    }
                    MouseButton::Right => self.dragging = pressed,
                    _ => {}
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                let current = (position.x as f32, position.y as f32);
                if self.dragging {
                    if let Some(previous) = self.cursor {
                        let (distance_x, distance_y) = scroll_distance(previous, current);
                        self.input.drag(distance_x, distance_y);
                    }
                }
                self.cursor = Some(current);
            }
            WindowEvent::Resized(size) => {
                if let Some(renderer) = self.renderer.as_mut() {
                    renderer.resize(size.width, size.height);
                    let (width, height) = renderer.dimensions();
                    self.orchestrator.on_surface_changed(width, height);
                }
            }
            WindowEvent::RedrawRequested => self.redraw(),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

/// Scroll distance as touch screens report it: previous minus current
/// position, so dragging right yields a negative x distance.
fn scroll_distance(previous: (f32, f32), current: (f32, f32)) -> (f32, f32) {
    (previous.0 - current.0, previous.1 - current.1)
}

fn load_config() -> CannonsConfig {
    let Some(path) = std::env::args().nth(1) else {
        return CannonsConfig::default();
    };
    match CannonsConfig::load(Path::new(&path)) {
        Ok(config) => {
            info!("Loaded config from {}", path);
            config
        }
        Err(e) => {
            warn!("Failed to load config {}: {}; using defaults", path, e);
            CannonsConfig::default()
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("===========================================");
    println!("   Cannons");
    println!("===========================================");
    println!("Left click: place cannon | Right drag: aim | F/Space: Fire!");
    println!("WASD/QE: move camera | Arrows: look | T: toggle tracking | ESC: exit");
    println!();

    let config = load_config();
    let session = SimulatedSession::create(DeviceProfile::default())
        .map_err(|e| anyhow::anyhow!(e.user_message()))?;

    let event_loop = EventLoop::new().context("failed to create event loop")?;
    event_loop.set_control_flow(ControlFlow::Poll);
    let mut app = CannonsApp::new(config, session);
    event_loop.run_app(&mut app).context("event loop failed")?;
    Ok(())
}
