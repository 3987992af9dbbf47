//! Frame Module
//!
//! Per-frame orchestration: pull a tracking frame, apply input, advance the
//! turn state machine and describe what to draw.

pub mod orchestrator;
pub mod plan;

pub use orchestrator::{FrameOrchestrator, InputHandle};
pub use plan::{CameraMatrices, FramePlan, FrameSink, ObjectDraw, ObjectSlot};

use thiserror::Error;

use crate::tracking::UpdateError;

/// Failure while producing or drawing one frame. The frame is skipped; the
/// next one starts fresh.
#[derive(Debug, Error)]
pub enum FrameError {
    #[error("tracking update failed: {0}")]
    Session(#[from] UpdateError),
    #[error("surface acquisition failed: {0}")]
    Surface(#[from] wgpu::SurfaceError),
    #[error("renderer failed: {0}")]
    Renderer(String),
}
