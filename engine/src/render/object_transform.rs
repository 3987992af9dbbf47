//! Object model matrix composition.
//!
//! model = pose * scale * rot_y(horizontal) * rot_x(vertical)
//!
//! Kept separate from the GPU object renderer so the orchestrator can build
//! transforms without a device.

use glam::{Mat4, Vec3};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectTransform {
    pose: Mat4,
    scale: f32,
    horizontal_deg: f32,
    vertical_deg: f32,
}

impl Default for ObjectTransform {
    fn default() -> Self {
        Self {
            pose: Mat4::IDENTITY,
            scale: 1.0,
            horizontal_deg: 0.0,
            vertical_deg: 0.0,
        }
    }
}

impl ObjectTransform {
    /// Set the placement pose and uniform scale.
    pub fn update_model_matrix(&mut self, pose: Mat4, scale: f32) {
        self.pose = pose;
        self.scale = scale;
    }

    /// Set user aim in degrees: horizontal about the local up axis, vertical
    /// about the local tilt (X) axis.
    pub fn update_rotation(&mut self, horizontal_deg: f32, vertical_deg: f32) {
        self.horizontal_deg = horizontal_deg;
        self.vertical_deg = vertical_deg;
    }

    pub fn pose(&self) -> Mat4 {
        self.pose
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Aim angles in degrees, (horizontal, vertical).
    pub fn rotation(&self) -> (f32, f32) {
        (self.horizontal_deg, self.vertical_deg)
    }

    pub fn model_matrix(&self) -> Mat4 {
        let scaled = self.pose * Mat4::from_scale(Vec3::splat(self.scale));
        if self.horizontal_deg == 0.0 && self.vertical_deg == 0.0 {
            return scaled;
        }
        scaled
            * Mat4::from_rotation_y(self.horizontal_deg.to_radians())
            * Mat4::from_rotation_x(self.vertical_deg.to_radians())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;

    #[test]
    fn test_zero_rotation_is_scaled_pose() {
        let pose = Mat4::from_rotation_translation(
            Quat::from_rotation_y(0.7),
            Vec3::new(0.5, -1.2, -2.0),
        );
        let mut transform = ObjectTransform::default();
        transform.update_model_matrix(pose, 0.12);
        transform.update_rotation(0.0, 0.0);

        let expected = pose * Mat4::from_scale(Vec3::splat(0.12));
        assert!(transform.model_matrix().abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn test_rebuild_from_parts_matches_model() {
        // The object renderer re-applies a planned transform from its parts
        let mut planned = ObjectTransform::default();
        planned.update_model_matrix(Mat4::from_translation(Vec3::new(1.0, 0.0, -2.0)), 0.02);
        planned.update_rotation(-12.0, 33.0);

        let mut rebuilt = ObjectTransform::default();
        let (horizontal, vertical) = planned.rotation();
        rebuilt.update_model_matrix(planned.pose(), planned.scale());
        rebuilt.update_rotation(horizontal, vertical);
        assert_eq!(rebuilt, planned);
        assert_eq!(rebuilt.model_matrix(), planned.model_matrix());
    }

    #[test]
    fn test_horizontal_rotates_about_up() {
        let mut transform = ObjectTransform::default();
        transform.update_rotation(90.0, 0.0);

        let forward = transform.model_matrix().transform_vector3(Vec3::X);
        assert!(forward.abs_diff_eq(Vec3::new(0.0, 0.0, -1.0), 1e-5));
    }

    #[test]
    fn test_vertical_tilts_barrel() {
        let mut transform = ObjectTransform::default();
        transform.update_rotation(0.0, 90.0);

        // Tilt is about X; the barrel axis (X) is unaffected, up swings to +Z
        let up = transform.model_matrix().transform_vector3(Vec3::Y);
        assert!(up.abs_diff_eq(Vec3::Z, 1e-5));
    }
}
