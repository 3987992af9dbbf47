//! Rigid pose (translation + rotation) reported by the tracking subsystem.

use glam::{Mat4, Quat, Vec3};

/// Position and orientation in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub translation: Vec3,
    pub rotation: Quat,
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Pose {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    pub fn new(translation: Vec3, rotation: Quat) -> Self {
        Self { translation, rotation }
    }

    pub fn from_translation(translation: Vec3) -> Self {
        Self::new(translation, Quat::IDENTITY)
    }

    /// Column-major 4x4 matrix equivalent of this pose.
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.translation)
    }

    pub fn inverse(&self) -> Self {
        let rotation = self.rotation.inverse();
        Self {
            translation: rotation * -self.translation,
            rotation,
        }
    }

    /// Map a point from this pose's local frame into world space.
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.rotation * point + self.translation
    }

    /// The pose's local +Y axis in world space.
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inverse_round_trips_point() {
        let pose = Pose::new(Vec3::new(1.0, -2.0, 3.0), Quat::from_rotation_y(0.7));
        let p = Vec3::new(0.3, 0.4, -0.5);
        let back = pose.inverse().transform_point(pose.transform_point(p));
        assert!((back - p).length() < 1e-5);
    }

    #[test]
    fn test_matrix_matches_transform_point() {
        let pose = Pose::new(Vec3::new(0.5, 0.0, -1.0), Quat::from_rotation_x(0.3));
        let p = Vec3::new(1.0, 2.0, 3.0);
        let via_matrix = pose.to_matrix().transform_point3(p);
        assert!((via_matrix - pose.transform_point(p)).length() < 1e-5);
    }
}
