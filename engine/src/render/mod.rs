//! Render Module
//!
//! wgpu renderers for the camera background, detected planes and lit
//! objects, plus the scene renderer that drives them from a frame plan.
//! `object_transform`, `plane_mesh` and `uniforms` are GPU-free.

pub mod background;
pub mod gpu_context;
pub mod gpu_texture;
pub mod object_renderer;
pub mod object_transform;
pub mod plane_mesh;
pub mod plane_renderer;
pub mod renderable;
pub mod scene_renderer;
pub mod uniforms;

pub use background::BackgroundRenderer;
pub use gpu_context::{GpuContext, GpuContextConfig, GpuInitError};
pub use object_renderer::ObjectRenderer;
pub use object_transform::ObjectTransform;
pub use plane_mesh::{PlaneDraw, PlaneVertex, build_plane_draws};
pub use plane_renderer::PlaneRenderer;
pub use renderable::{RenderContext, RenderPriority, Renderable};
pub use scene_renderer::SceneRenderer;
pub use uniforms::{ObjectUniforms, PlaneUniforms};
