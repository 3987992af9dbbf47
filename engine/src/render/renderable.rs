//! Renderable Abstraction
//!
//! Each renderer prepares its GPU data from the frame plan, then records its
//! draws into the single shared render pass. Draw order follows priority.

use wgpu::util::DeviceExt;

use crate::frame::{FrameError, FramePlan};

/// Draw order within the frame (lower = earlier)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RenderPriority {
    /// Camera feed; must be first since it ignores depth
    Background = 0,
    /// Translucent detected planes
    Planes = 100,
    /// Lit meshes (cannons, projectile)
    Objects = 200,
}

/// GPU handles shared by all renderers during one frame.
pub struct RenderContext<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub surface_format: wgpu::TextureFormat,
    pub width: u32,
    pub height: u32,
}

impl RenderContext<'_> {
    /// Create a uniform buffer with initial data
    pub fn create_uniform_buffer<T: bytemuck::Pod>(&self, label: &str, data: &T) -> wgpu::Buffer {
        self.device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytemuck::bytes_of(data),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            })
    }

    /// Create a vertex buffer with initial data
    pub fn create_vertex_buffer<T: bytemuck::Pod>(&self, label: &str, data: &[T]) -> wgpu::Buffer {
        self.device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytemuck::cast_slice(data),
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            })
    }

    /// Create an index buffer with initial data
    pub fn create_index_buffer(&self, label: &str, data: &[u32]) -> wgpu::Buffer {
        self.device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytemuck::cast_slice(data),
                usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
            })
    }

    /// Create a dynamic buffer of `size` bytes for per-frame data
    pub fn create_dynamic_buffer(
        &self,
        label: &str,
        size: u64,
        usage: wgpu::BufferUsages,
    ) -> wgpu::Buffer {
        self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size,
            usage: usage | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    /// Write data to the start of a buffer
    pub fn write_buffer<T: bytemuck::Pod>(&self, buffer: &wgpu::Buffer, data: &[T]) {
        self.queue.write_buffer(buffer, 0, bytemuck::cast_slice(data));
    }

    pub fn create_shader(&self, label: &str, source: &str) -> wgpu::ShaderModule {
        self.device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(label),
                source: wgpu::ShaderSource::Wgsl(source.into()),
            })
    }

    /// Pipeline layout with a single bind group.
    pub fn create_pipeline_layout(
        &self,
        label: &str,
        bind_group_layout: &wgpu::BindGroupLayout,
    ) -> wgpu::PipelineLayout {
        self.device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some(label),
                bind_group_layouts: &[bind_group_layout],
                push_constant_ranges: &[],
            })
    }
}

/// A renderer taking part in the frame.
pub trait Renderable {
    /// Unique name (for logging)
    fn name(&self) -> &'static str;

    fn priority(&self) -> RenderPriority;

    /// Upload this frame's data. Called before the render pass begins.
    fn prepare(&mut self, ctx: &RenderContext, plan: &FramePlan) -> Result<(), FrameError>;

    /// Record draw calls. Draws nothing if `prepare` found nothing to draw.
    fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>);
}
