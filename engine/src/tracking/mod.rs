//! Tracking Module
//!
//! Model of the external camera-tracking subsystem: poses, planes, anchors,
//! per-frame camera data and the [`TrackingSession`] trait the game consumes.
//! A [`SimulatedSession`] backend drives the game on a desktop.

pub mod plane;
pub mod pose;
pub mod session;
pub mod simulated;

pub use plane::{Plane, PlaneId, PlaneType, point_in_polygon};
pub use pose::Pose;
pub use session::{
    Anchor, AnchorHandle, CameraImage, CameraTextureHandle, Frame, HitResult, SessionConfig,
    SessionError, Tap, Trackable, TrackingSession, TrackingState, UpdateError, IDENTITY_DISPLAY_UVS,
};
pub use simulated::{DeviceProfile, SimulatedSession};
