//! Cannons AR Engine Library
//!
//! Rendering and turn-logic core for a two-player augmented-reality artillery
//! game. Camera tracking, plane detection and light estimation come from an
//! external tracking subsystem behind the [`tracking::TrackingSession`] trait;
//! this crate turns its per-frame output into draw calls.
//!
//! # Modules
//!
//! - [`tracking`] - Poses, planes, anchors, frames and the session trait (plus a simulated backend)
//! - [`assets`] - OBJ mesh and PNG/JPEG texture loading
//! - [`input`] - Bounded tap queue and cross-thread aim/fire controls
//! - [`render`] - wgpu renderers for the camera background, planes and lit objects
//! - [`frame`] - Per-frame orchestrator producing a [`frame::FramePlan`]
//! - [`camera`] - Screen-space raycasting used by hit tests
//! - [`config`] - Tunables with JSON overrides
//!
//! # Example
//!
//! ```rust,ignore
//! use cannons_ar_engine::config::CannonsConfig;
//! use cannons_ar_engine::frame::FrameOrchestrator;
//! use cannons_ar_engine::tracking::{DeviceProfile, SimulatedSession};
//!
//! let session = SimulatedSession::create(DeviceProfile::default())?;
//! let (mut orchestrator, input) = FrameOrchestrator::new(session, CannonsConfig::default());
//! orchestrator.on_resume()?;
//!
//! // Input thread:
//! input.taps.offer(Tap::new(640.0, 500.0));
//!
//! // Render thread, once per display refresh:
//! orchestrator.on_draw_frame(&mut scene_renderer);
//! ```

pub mod assets;
pub mod camera;
pub mod config;
pub mod frame;
pub mod input;
pub mod render;
pub mod tracking;

// Game-specific modules (located in src/game/ directory)
#[path = "../../src/game/mod.rs"]
pub mod game;

pub use config::CannonsConfig;
pub use frame::{FrameError, FrameOrchestrator, FramePlan, FrameSink, InputHandle};
pub use game::{GamePhase, GameState, Player, TurnState};
pub use tracking::{Pose, Tap, TrackingSession, TrackingState};
