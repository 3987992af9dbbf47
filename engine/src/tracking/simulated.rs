//! Simulated Tracking Session
//!
//! Desktop stand-in for the device tracking subsystem. A virtual camera sits
//! above a single floor plane that is "detected" after a short warm-up, the
//! camera feed is a procedural image, and hit tests are exact ray/plane
//! intersections. Lets the game run (and be tested) without a device.

use std::collections::HashMap;

use glam::{Mat4, Quat, Vec2, Vec3};

use super::plane::{Plane, PlaneId, PlaneType};
use super::pose::Pose;
use super::session::{
    Anchor, AnchorHandle, CameraImage, CameraTextureHandle, Frame, HitResult, SessionConfig,
    SessionError, Tap, Trackable, TrackingSession, TrackingState, UpdateError,
};
use crate::camera::raycast::{intersect_plane, screen_to_ray};

/// Frames before the floor plane starts tracking
pub const DEFAULT_DETECTION_DELAY: u64 = 30;
/// Height of the virtual floor below the starting camera position
pub const FLOOR_HEIGHT: f32 = -1.2;
/// Radius of the octagonal floor polygon
pub const FLOOR_RADIUS: f32 = 1.5;

const FEED_WIDTH: u32 = 160;
const FEED_HEIGHT: u32 = 120;
const FRAME_INTERVAL_NS: u64 = 33_333_333;

/// Availability of the tracking service on the simulated device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceProfile {
    pub service_installed: bool,
    pub service_up_to_date: bool,
    pub sdk_up_to_date: bool,
    pub supports_ar: bool,
}

impl Default for DeviceProfile {
    fn default() -> Self {
        Self {
            service_installed: true,
            service_up_to_date: true,
            sdk_up_to_date: true,
            supports_ar: true,
        }
    }
}

pub struct SimulatedSession {
    config: SessionConfig,
    resumed: bool,
    camera_texture: Option<CameraTextureHandle>,
    viewport: (u32, u32),

    camera_position: Vec3,
    yaw: f32,
    pitch: f32,
    fov_y: f32,
    camera_tracking: TrackingState,
    light_intensity: f32,

    frame_count: u64,
    detection_delay: u64,
    floor: Plane,

    anchors: HashMap<u64, Pose>,
    next_anchor_id: u64,
}

impl SimulatedSession {
    /// Create a session, failing the way a real device would when the
    /// tracking service is missing, outdated, or unsupported.
    pub fn create(profile: DeviceProfile) -> Result<Self, SessionError> {
        if !profile.service_installed {
            return Err(SessionError::NotInstalled);
        }
        if !profile.service_up_to_date {
            return Err(SessionError::ApkTooOld);
        }
        if !profile.sdk_up_to_date {
            return Err(SessionError::SdkTooOld);
        }
        if !profile.supports_ar {
            return Err(SessionError::Unsupported);
        }

        Ok(Self {
            config: SessionConfig::default(),
            resumed: false,
            camera_texture: None,
            viewport: (1280, 720),
            camera_position: Vec3::ZERO,
            yaw: 0.0,
            pitch: -0.6,
            fov_y: 60.0_f32.to_radians(),
            camera_tracking: TrackingState::Tracking,
            light_intensity: 0.8,
            frame_count: 0,
            detection_delay: DEFAULT_DETECTION_DELAY,
            floor: Plane {
                id: PlaneId(1),
                plane_type: PlaneType::HorizontalUpwardFacing,
                tracking_state: TrackingState::Paused,
                center_pose: Pose::from_translation(Vec3::new(0.0, FLOOR_HEIGHT, -1.5)),
                polygon: octagon(FLOOR_RADIUS),
            },
            anchors: HashMap::new(),
            next_anchor_id: 1,
        })
    }

    /// Number of frames before the floor is detected.
    pub fn with_detection_delay(mut self, frames: u64) -> Self {
        self.detection_delay = frames;
        self
    }

    pub fn floor(&self) -> &Plane {
        &self.floor
    }

    /// Move the camera in its horizontal frame (forward/right) and vertically.
    pub fn move_camera(&mut self, forward: f32, right: f32, up: f32) {
        let forward_xz = Vec3::new(self.yaw.sin(), 0.0, -self.yaw.cos());
        let right_xz = Vec3::new(self.yaw.cos(), 0.0, self.yaw.sin());
        self.camera_position += forward_xz * forward + right_xz * right + Vec3::Y * up;
    }

    /// Rotate the camera; pitch is clamped short of straight up/down.
    pub fn look(&mut self, delta_yaw: f32, delta_pitch: f32) {
        self.yaw += delta_yaw;
        let pitch_limit = 89.0_f32.to_radians();
        self.pitch = (self.pitch + delta_pitch).clamp(-pitch_limit, pitch_limit);
    }

    pub fn camera_tracking(&self) -> TrackingState {
        self.camera_tracking
    }

    /// Simulate losing or regaining camera tracking.
    pub fn set_camera_tracking(&mut self, state: TrackingState) {
        self.camera_tracking = state;
    }

    fn forward(&self) -> Vec3 {
        Vec3::new(
            self.yaw.sin() * self.pitch.cos(),
            self.pitch.sin(),
            -self.yaw.cos() * self.pitch.cos(),
        )
        .normalize()
    }

    fn camera_pose(&self) -> Pose {
        let rotation = Quat::from_rotation_y(-self.yaw) * Quat::from_rotation_x(self.pitch);
        Pose::new(self.camera_position, rotation)
    }

    /// UVs that center-crop the camera feed to the viewport aspect.
    fn display_uvs(&self) -> [Vec2; 4] {
        let view_aspect = self.viewport.0.max(1) as f32 / self.viewport.1.max(1) as f32;
        let feed_aspect = FEED_WIDTH as f32 / FEED_HEIGHT as f32;

        let (u_span, v_span) = if view_aspect > feed_aspect {
            (1.0, feed_aspect / view_aspect)
        } else {
            (view_aspect / feed_aspect, 1.0)
        };
        let (u0, u1) = (0.5 - u_span * 0.5, 0.5 + u_span * 0.5);
        let (v0, v1) = (0.5 - v_span * 0.5, 0.5 + v_span * 0.5);

        [
            Vec2::new(u0, v1),
            Vec2::new(u1, v1),
            Vec2::new(u0, v0),
            Vec2::new(u1, v0),
        ]
    }

    /// Procedural camera image: a warm "floor" gradient with slowly
    /// drifting stripes so motion is visible behind the overlays.
    fn camera_image(&self) -> CameraImage {
        let mut pixels = Vec::with_capacity((FEED_WIDTH * FEED_HEIGHT * 4) as usize);
        let shift = (self.frame_count % 64) as u32;
        for y in 0..FEED_HEIGHT {
            let t = y as f32 / FEED_HEIGHT as f32;
            for x in 0..FEED_WIDTH {
                let stripe = if ((x + shift) / 16 + y / 16) % 2 == 0 { 12.0 } else { 0.0 };
                let r = (90.0 + 80.0 * t + stripe) as u8;
                let g = (80.0 + 60.0 * t + stripe) as u8;
                let b = (70.0 + 30.0 * t + stripe) as u8;
                pixels.extend_from_slice(&[r, g, b, 255]);
            }
        }
        CameraImage {
            width: FEED_WIDTH,
            height: FEED_HEIGHT,
            pixels,
        }
    }
}

impl TrackingSession for SimulatedSession {
    fn configure(&mut self, config: &SessionConfig) -> Result<(), SessionError> {
        self.config = *config;
        Ok(())
    }

    fn resume(&mut self) -> Result<(), SessionError> {
        self.resumed = true;
        Ok(())
    }

    fn pause(&mut self) {
        self.resumed = false;
    }

    fn set_camera_texture(&mut self, handle: CameraTextureHandle) {
        self.camera_texture = Some(handle);
    }

    fn set_display_geometry(&mut self, width: u32, height: u32) {
        self.viewport = (width, height);
    }

    fn update(&mut self, near: f32, far: f32) -> Result<Frame, UpdateError> {
        if !self.resumed {
            return Err(UpdateError::NotResumed);
        }
        if self.camera_texture.is_none() {
            return Err(UpdateError::MissingCameraTexture);
        }

        self.frame_count += 1;
        if self.config.horizontal_plane_detection && self.frame_count >= self.detection_delay {
            self.floor.tracking_state = self.camera_tracking;
        }

        let aspect = self.viewport.0.max(1) as f32 / self.viewport.1.max(1) as f32;
        let view_matrix = Mat4::look_to_rh(self.camera_position, self.forward(), Vec3::Y);
        let projection_matrix = Mat4::perspective_rh(self.fov_y, aspect, near, far);
        let light_intensity = if self.config.light_estimation {
            self.light_intensity
        } else {
            1.0
        };

        Ok(Frame {
            timestamp_ns: self.frame_count * FRAME_INTERVAL_NS,
            camera_pose: self.camera_pose(),
            camera_tracking_state: self.camera_tracking,
            view_matrix,
            projection_matrix,
            light_intensity,
            display_uvs: self.display_uvs(),
            camera_image: Some(self.camera_image()),
        })
    }

    fn hit_test(&self, frame: &Frame, tap: Tap) -> Vec<HitResult> {
        if !frame.is_tracking() {
            return Vec::new();
        }
        let Some(ray) = screen_to_ray(
            (tap.x, tap.y),
            self.viewport,
            frame.view_matrix,
            frame.projection_matrix,
        ) else {
            return Vec::new();
        };

        let mut hits: Vec<HitResult> = self
            .tracked_planes()
            .iter()
            .filter(|plane| plane.tracking_state == TrackingState::Tracking)
            .filter_map(|plane| {
                let center = plane.center_pose;
                let t = intersect_plane(&ray, center.translation, center.up())?;
                Some(HitResult {
                    pose: Pose::new(ray.at(t), center.rotation),
                    distance: t,
                    trackable: Trackable::Plane(plane.id),
                })
            })
            .collect();
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }

    fn tracked_planes(&self) -> Vec<Plane> {
        vec![self.floor.clone()]
    }

    fn create_anchor(&mut self, pose: Pose) -> AnchorHandle {
        let id = self.next_anchor_id;
        self.next_anchor_id += 1;
        self.anchors.insert(id, pose);
        AnchorHandle(id)
    }

    fn anchor(&self, handle: AnchorHandle) -> Option<Anchor> {
        let pose = *self.anchors.get(&handle.0)?;
        // Anchors follow the camera's tracking: no camera pose, no anchor pose
        let tracking_state = match self.camera_tracking {
            TrackingState::Tracking => TrackingState::Tracking,
            _ => TrackingState::Paused,
        };
        Some(Anchor { pose, tracking_state })
    }
}

fn octagon(radius: f32) -> Vec<Vec2> {
    (0..8)
        .map(|i| {
            let angle = i as f32 * std::f32::consts::TAU / 8.0;
            Vec2::new(radius * angle.cos(), radius * angle.sin())
        })
        .collect()
}
