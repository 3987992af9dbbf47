//! Tracking Session Interface
//!
//! Everything the game needs from the camera-tracking subsystem, expressed as
//! plain data plus one trait. The game never mutates tracked entities; it only
//! creates anchors from hit results and reads their poses back.

use glam::{Mat4, Vec2};
use thiserror::Error;

use super::plane::{Plane, PlaneId};
use super::pose::Pose;

/// Whether a tracked entity currently has a valid, up-to-date pose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackingState {
    Tracking,
    /// Temporarily lost; may resume
    Paused,
    /// Will never resume
    Stopped,
}

/// A single tap in surface pixel coordinates (origin top-left).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tap {
    pub x: f32,
    pub y: f32,
}

impl Tap {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Handle of the GPU texture the tracking subsystem writes camera frames into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CameraTextureHandle(pub u32);

/// Handle of an anchor owned by the tracking subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnchorHandle(pub u64);

/// Live state of an anchor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub pose: Pose,
    pub tracking_state: TrackingState,
}

/// What a hit test ray struck.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trackable {
    Plane(PlaneId),
    /// Feature point or other non-plane geometry
    Point,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitResult {
    pub pose: Pose,
    /// Distance from the camera along the ray (meters)
    pub distance: f32,
    pub trackable: Trackable,
}

/// Camera image delivered with a frame, tightly packed RGBA8.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// Texture coordinates of the screen corners in order: bottom-left,
/// bottom-right, top-left, top-right.
pub const IDENTITY_DISPLAY_UVS: [Vec2; 4] = [
    Vec2::new(0.0, 1.0),
    Vec2::new(1.0, 1.0),
    Vec2::new(0.0, 0.0),
    Vec2::new(1.0, 0.0),
];

/// Per-frame camera data.
#[derive(Debug, Clone)]
pub struct Frame {
    pub timestamp_ns: u64,
    pub camera_pose: Pose,
    pub camera_tracking_state: TrackingState,
    pub view_matrix: Mat4,
    pub projection_matrix: Mat4,
    /// Scalar ambient brightness estimate in 0..=1
    pub light_intensity: f32,
    /// Camera-texture UVs for the screen corners; compensates for display
    /// rotation and aspect crop (see [`IDENTITY_DISPLAY_UVS`] for the order).
    pub display_uvs: [Vec2; 4],
    /// New camera image, if one arrived since the previous frame
    pub camera_image: Option<CameraImage>,
}

impl Frame {
    pub fn is_tracking(&self) -> bool {
        self.camera_tracking_state == TrackingState::Tracking
    }
}

/// Session configuration requested by the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    pub horizontal_plane_detection: bool,
    pub light_estimation: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            horizontal_plane_detection: true,
            light_estimation: true,
        }
    }
}

/// Reasons a tracking session cannot be created or configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("tracking service is not installed")]
    NotInstalled,
    #[error("tracking service is too old")]
    ApkTooOld,
    #[error("application is too old for the installed tracking service")]
    SdkTooOld,
    #[error("device does not support AR")]
    Unsupported,
}

impl SessionError {
    /// Message shown to the player before the app exits.
    pub fn user_message(&self) -> &'static str {
        match self {
            SessionError::NotInstalled => "Please install ARCore",
            SessionError::ApkTooOld => "Please update ARCore",
            SessionError::SdkTooOld => "Please update this app",
            SessionError::Unsupported => "This device does not support AR",
        }
    }
}

/// Failures of [`TrackingSession::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum UpdateError {
    #[error("session is not resumed")]
    NotResumed,
    #[error("no camera texture has been registered")]
    MissingCameraTexture,
    #[error("camera frame unavailable")]
    CameraUnavailable,
}

/// The external tracking subsystem, as seen by the game.
pub trait TrackingSession {
    /// Apply a configuration; unsupported configurations are rejected.
    fn configure(&mut self, config: &SessionConfig) -> Result<(), SessionError>;

    fn resume(&mut self) -> Result<(), SessionError>;

    fn pause(&mut self);

    /// Register the texture camera images are delivered for.
    fn set_camera_texture(&mut self, handle: CameraTextureHandle);

    /// Notify the session of the drawing surface size so projection and
    /// display UVs match it.
    fn set_display_geometry(&mut self, width: u32, height: u32);

    /// Advance to the latest camera frame.
    fn update(&mut self, near: f32, far: f32) -> Result<Frame, UpdateError>;

    /// Cast a ray through a tap; results are ordered nearest first.
    fn hit_test(&self, frame: &Frame, tap: Tap) -> Vec<HitResult>;

    /// All planes currently known, in any tracking state.
    fn tracked_planes(&self) -> Vec<Plane>;

    fn create_anchor(&mut self, pose: Pose) -> AnchorHandle;

    /// Current state of an anchor, or `None` once it has been discarded.
    fn anchor(&self, handle: AnchorHandle) -> Option<Anchor>;
}
