//! Detected Planes
//!
//! A plane is owned by the tracking subsystem and re-queried every frame.
//! Its boundary polygon lives in plane-local space as (x, z) pairs; the
//! plane's centre pose maps that space into the world.

use glam::{Vec2, Vec3};

use super::pose::Pose;
use super::session::TrackingState;

/// Stable identifier of a plane across frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlaneId(pub u64);

/// Orientation class of a detected plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaneType {
    HorizontalUpwardFacing,
    HorizontalDownwardFacing,
    Vertical,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    pub id: PlaneId,
    pub plane_type: PlaneType,
    pub tracking_state: TrackingState,
    pub center_pose: Pose,
    /// Boundary in plane-local (x, z) coordinates, in order.
    pub polygon: Vec<Vec2>,
}

impl Plane {
    /// Plane the game can place cannons on: horizontal, facing up, tracking.
    pub fn is_placeable(&self) -> bool {
        self.plane_type == PlaneType::HorizontalUpwardFacing
            && self.tracking_state == TrackingState::Tracking
    }

    /// Average of the boundary points, in plane-local space.
    pub fn centroid(&self) -> Option<Vec2> {
        if self.polygon.is_empty() {
            return None;
        }
        let sum: Vec2 = self.polygon.iter().copied().sum();
        Some(sum / self.polygon.len() as f32)
    }

    /// Whether a world-space pose projects inside this plane's polygon.
    ///
    /// A hit on the plane's infinite extent outside the detected boundary
    /// returns false.
    pub fn is_pose_in_polygon(&self, pose: &Pose) -> bool {
        let local: Vec3 = self.center_pose.inverse().transform_point(pose.translation);
        point_in_polygon(Vec2::new(local.x, local.z), &self.polygon)
    }
}

/// Even-odd point-in-polygon test. Polygons with fewer than three points
/// contain nothing.
pub fn point_in_polygon(point: Vec2, polygon: &[Vec2]) -> bool {
    if polygon.len() < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        let a = polygon[i];
        let b = polygon[j];
        if (a.y > point.y) != (b.y > point.y) {
            let x_cross = (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x;
            if point.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}
