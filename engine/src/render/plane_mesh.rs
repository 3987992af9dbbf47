//! Plane Mesh Generation
//!
//! Turns detected plane polygons into world-space triangle fans with a soft
//! edge. Each polygon becomes:
//!
//! ```text
//!   boundary ring (alpha 0)
//!     \  fade band  /
//!   inner ring (alpha 1), boundary inset toward the centroid by the fade width
//!     \   fan   /
//!       centroid (alpha 1)
//! ```
//!
//! GPU-free so the draw list can be tested without a device.

use glam::{Vec2, Vec3};

use crate::tracking::{Plane, PlaneId, TrackingState};

/// Per-plane tint, keyed by plane id.
pub const PLANE_COLORS: [[f32; 4]; 16] = [
    [1.00, 1.00, 1.00, 1.0],
    [0.96, 0.26, 0.21, 1.0],
    [0.91, 0.12, 0.39, 1.0],
    [0.61, 0.15, 0.69, 1.0],
    [0.40, 0.23, 0.72, 1.0],
    [0.25, 0.32, 0.71, 1.0],
    [0.13, 0.59, 0.95, 1.0],
    [0.01, 0.66, 0.96, 1.0],
    [0.00, 0.74, 0.83, 1.0],
    [0.00, 0.59, 0.53, 1.0],
    [0.30, 0.69, 0.31, 1.0],
    [0.55, 0.76, 0.29, 1.0],
    [0.80, 0.86, 0.22, 1.0],
    [1.00, 0.92, 0.23, 1.0],
    [1.00, 0.76, 0.03, 1.0],
    [1.00, 0.60, 0.00, 1.0],
];

pub fn plane_color(id: PlaneId) -> [f32; 4] {
    PLANE_COLORS[(id.0 % PLANE_COLORS.len() as u64) as usize]
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PlaneVertex {
    /// World-space position
    pub position: [f32; 3],
    /// Plane-local (x, z), used for the grid texture
    pub grid_uv: [f32; 2],
    /// 1 inside, fading to 0 at the boundary
    pub alpha: f32,
    pub color: [f32; 4],
}

/// Geometry for one plane; one draw call.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaneDraw {
    pub plane: PlaneId,
    pub vertices: Vec<PlaneVertex>,
    pub indices: Vec<u32>,
}

/// Build draws for every tracking plane with a usable polygon.
pub fn build_plane_draws(planes: &[Plane], fade_width: f32) -> Vec<PlaneDraw> {
    planes
        .iter()
        .filter(|plane| plane.tracking_state == TrackingState::Tracking)
        .filter_map(|plane| build_plane_draw(plane, fade_width))
        .collect()
}

fn build_plane_draw(plane: &Plane, fade_width: f32) -> Option<PlaneDraw> {
    if plane.polygon.len() < 3 {
        return None;
    }
    let centroid = plane.centroid()?;
    let model = plane.center_pose.to_matrix();
    let color = plane_color(plane.id);
    let n = plane.polygon.len() as u32;

    let vertex = |local: Vec2, alpha: f32| PlaneVertex {
        position: model
            .transform_point3(Vec3::new(local.x, 0.0, local.y))
            .to_array(),
        grid_uv: local.to_array(),
        alpha,
        color,
    };

    let mut vertices = Vec::with_capacity(1 + 2 * plane.polygon.len());
    vertices.push(vertex(centroid, 1.0));

    // Inner ring: 1..=n
    for &point in &plane.polygon {
        let offset = point - centroid;
        let length = offset.length();
        let inset = if length > 0.0 {
            centroid + offset * ((length - fade_width).max(0.0) / length)
        } else {
            point
        };
        vertices.push(vertex(inset, 1.0));
    }
    // Boundary ring: n+1..=2n
    for &point in &plane.polygon {
        vertices.push(vertex(point, 0.0));
    }

    let mut indices = Vec::with_capacity(9 * plane.polygon.len());
    for i in 0..n {
        let next = (i + 1) % n;
        let (inner, inner_next) = (1 + i, 1 + next);
        let (outer, outer_next) = (1 + n + i, 1 + n + next);

        indices.extend_from_slice(&[0, inner, inner_next]);
        indices.extend_from_slice(&[inner, outer, outer_next]);
        indices.extend_from_slice(&[inner, outer_next, inner_next]);
    }

    Some(PlaneDraw {
        plane: plane.id,
        vertices,
        indices,
    })
}
