//! Raycast Module
//!
//! Screen-to-world rays for hit testing taps against detected planes.

use glam::{Mat4, Vec3, Vec4};

/// A world-space ray with a normalized direction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Build a ray through a screen pixel.
///
/// # Arguments
/// * `screen` - Pixel coordinates, origin top-left
/// * `viewport` - Surface size in pixels
/// * `view` - Camera view matrix
/// * `projection` - Camera projection matrix (wgpu 0..1 depth range)
///
/// # Returns
/// * `Some(Ray)` starting on the near plane
/// * `None` if the viewport is empty or the matrices are singular
pub fn screen_to_ray(
    screen: (f32, f32),
    viewport: (u32, u32),
    view: Mat4,
    projection: Mat4,
) -> Option<Ray> {
    if viewport.0 == 0 || viewport.1 == 0 {
        return None;
    }

    // Pixel to NDC (-1 to 1), Y up
    let ndc_x = screen.0 / viewport.0 as f32 * 2.0 - 1.0;
    let ndc_y = 1.0 - screen.1 / viewport.1 as f32 * 2.0;

    let view_proj = projection * view;
    if view_proj.determinant().abs() < f32::EPSILON {
        return None;
    }
    let inv = view_proj.inverse();

    let near = inv * Vec4::new(ndc_x, ndc_y, 0.0, 1.0);
    let far = inv * Vec4::new(ndc_x, ndc_y, 1.0, 1.0);
    if near.w.abs() < f32::EPSILON || far.w.abs() < f32::EPSILON {
        return None;
    }
    let near = near.truncate() / near.w;
    let far = far.truncate() / far.w;

    let direction = (far - near).normalize_or_zero();
    if direction == Vec3::ZERO {
        return None;
    }
    Some(Ray { origin: near, direction })
}

/// Intersect a ray with an infinite plane.
///
/// # Returns
/// * `Some(t)` - Distance along the ray to the intersection
/// * `None` - If the ray is parallel to the plane or the hit is behind the origin
pub fn intersect_plane(ray: &Ray, plane_point: Vec3, plane_normal: Vec3) -> Option<f32> {
    let denom = plane_normal.dot(ray.direction);
    if denom.abs() < 0.0001 {
        // Ray is parallel to plane
        return None;
    }

    let t = (plane_point - ray.origin).dot(plane_normal) / denom;
    if t < 0.0 {
        // Intersection is behind the ray origin
        return None;
    }
    Some(t)
}
