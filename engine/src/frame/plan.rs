//! Frame Plan
//!
//! Everything one frame should put on screen, computed without touching the
//! GPU. A [`FrameSink`] turns it into draw calls.

use glam::{Mat4, Vec2};

use super::FrameError;
use crate::game::StatusUpdate;
use crate::render::object_transform::ObjectTransform;
use crate::tracking::{CameraImage, Frame, Plane};

/// View-dependent data shared by every draw after the background.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraMatrices {
    pub view: Mat4,
    pub projection: Mat4,
    /// Ambient light estimate in 0..=1
    pub light_intensity: f32,
}

/// Which of the three object renderer instances draws an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectSlot {
    Cannon1,
    Cannon2,
    Projectile,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectDraw {
    pub slot: ObjectSlot,
    pub transform: ObjectTransform,
}

#[derive(Debug, Clone)]
pub struct FramePlan {
    /// Camera-texture UVs of the screen corners for this frame
    pub display_uvs: [Vec2; 4],
    /// New camera image to upload before drawing the background
    pub camera_image: Option<CameraImage>,
    /// `None` when the camera is not tracking: only the background is drawn
    pub camera: Option<CameraMatrices>,
    pub planes: Vec<Plane>,
    pub objects: Vec<ObjectDraw>,
    /// Present only when the status line changed this frame
    pub status: Option<StatusUpdate>,
}

impl FramePlan {
    /// Plan that draws just the camera feed for `frame`.
    pub fn background(frame: &Frame) -> Self {
        Self {
            display_uvs: frame.display_uvs,
            camera_image: frame.camera_image.clone(),
            camera: None,
            planes: Vec::new(),
            objects: Vec::new(),
            status: None,
        }
    }

    pub fn object(&self, slot: ObjectSlot) -> Option<&ObjectDraw> {
        self.objects.iter().find(|draw| draw.slot == slot)
    }

    pub fn is_background_only(&self) -> bool {
        self.camera.is_none() && self.planes.is_empty() && self.objects.is_empty()
    }
}

/// Consumer of frame plans; the GPU scene renderer in the app, a recorder in
/// tests.
pub trait FrameSink {
    fn submit(&mut self, plan: &FramePlan) -> Result<(), FrameError>;
}
