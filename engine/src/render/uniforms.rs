//! Uniform Structs for GPU Shaders
//!
//! Must match the WGSL struct layouts in `shaders/` exactly.

use glam::{Mat4, Vec3, Vec4};
use static_assertions::assert_eq_size;

use crate::config::MaterialConfig;

/// Directional light in world space; points toward the light.
pub const LIGHT_DIRECTION: Vec3 = Vec3::new(0.0, 1.0, 0.25);

/// Object shader uniforms.
///
/// WGSL layout (240 bytes):
///   offset   0: model (mat4x4<f32>)          = 64 bytes
///   offset  64: model_view (mat4x4<f32>)     = 64 bytes
///   offset 128: mvp (mat4x4<f32>)            = 64 bytes
///   offset 192: light_dir_view (vec4<f32>)   = 16 bytes (w unused)
///   offset 208: material (vec4<f32>)         = 16 bytes (ambient, diffuse, specular, power)
///   offset 224: lighting (vec4<f32>)         = 16 bytes (x = light intensity)
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniforms {
    pub model: [[f32; 4]; 4],
    pub model_view: [[f32; 4]; 4],
    pub mvp: [[f32; 4]; 4],
    pub light_dir_view: [f32; 4],
    pub material: [f32; 4],
    pub lighting: [f32; 4],
}

assert_eq_size!(ObjectUniforms, [u8; 240]);

impl ObjectUniforms {
    pub fn new(
        model: Mat4,
        view: Mat4,
        projection: Mat4,
        material: &MaterialConfig,
        light_intensity: f32,
    ) -> Self {
        let model_view = view * model;
        let light_dir_view = view
            .transform_vector3(LIGHT_DIRECTION)
            .normalize_or_zero()
            .extend(0.0);
        Self {
            model: model.to_cols_array_2d(),
            model_view: model_view.to_cols_array_2d(),
            mvp: (projection * model_view).to_cols_array_2d(),
            light_dir_view: light_dir_view.to_array(),
            material: [
                material.ambient,
                material.diffuse,
                material.specular,
                material.specular_power,
            ],
            lighting: [light_intensity.clamp(0.0, 1.0), 0.0, 0.0, 0.0],
        }
    }
}

/// Plane shader uniforms (80 bytes).
///
///   offset  0: view_proj (mat4x4<f32>)
///   offset 64: grid (vec4<f32>): x = grid repeats per meter, y = grid opacity
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PlaneUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub grid: [f32; 4],
}

assert_eq_size!(PlaneUniforms, [u8; 80]);

impl PlaneUniforms {
    pub const GRID_SCALE: f32 = 5.0;
    pub const GRID_OPACITY: f32 = 0.8;

    pub fn new(view: Mat4, projection: Mat4) -> Self {
        Self {
            view_proj: (projection * view).to_cols_array_2d(),
            grid: Vec4::new(Self::GRID_SCALE, Self::GRID_OPACITY, 0.0, 0.0).to_array(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_light_intensity_clamped() {
        let uniforms = ObjectUniforms::new(
            Mat4::IDENTITY,
            Mat4::IDENTITY,
            Mat4::IDENTITY,
            &MaterialConfig::default(),
            1.7,
        );
        assert_eq!(uniforms.lighting[0], 1.0);
        assert_eq!(uniforms.material, [0.0, 3.5, 1.0, 6.0]);
    }

    #[test]
    fn test_light_direction_follows_view() {
        let view = Mat4::from_rotation_x(std::f32::consts::FRAC_PI_2);
        let uniforms = ObjectUniforms::new(
            Mat4::IDENTITY,
            view,
            Mat4::IDENTITY,
            &MaterialConfig::default(),
            1.0,
        );
        let expected = view.transform_vector3(LIGHT_DIRECTION).normalize();
        let actual = Vec3::from_slice(&uniforms.light_dir_view[..3]);
        assert!(actual.abs_diff_eq(expected, 1e-6));
        assert_eq!(uniforms.light_dir_view[3], 0.0);
    }
}
