//! Input Module
//!
//! Cross-thread plumbing between the UI/input thread and the render thread.
//! Nothing here depends on a windowing system.
//!
//! - Taps go through a bounded queue drained once per frame.
//! - Drag deltas accumulate into per-player aim angles.
//! - The "Fire!" action is a request flag consumed by the render thread.

pub mod aim;
pub mod tap_queue;

pub use aim::{AimAngles, AimControls};
pub use tap_queue::{TapReceiver, TapSender, tap_queue};
