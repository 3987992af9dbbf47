//! Camera Background Renderer
//!
//! Draws the camera feed as a screen-filling quad. The quad's texture
//! coordinates come from the tracking frame every frame, so display rotation
//! and aspect crop are handled by the tracking side.

use std::sync::atomic::{AtomicU32, Ordering};

use glam::Vec2;

use super::gpu_context::DEPTH_FORMAT;
use super::gpu_texture::GpuTexture;
use super::renderable::{RenderContext, RenderPriority, Renderable};
use crate::frame::{FrameError, FramePlan};
use crate::tracking::{CameraImage, CameraTextureHandle, IDENTITY_DISPLAY_UVS};

const SHADER: &str = include_str!("../../../shaders/background.wgsl");

/// Placeholder size until the first camera image arrives.
const INITIAL_SIZE: (u32, u32) = (1, 1);

static NEXT_HANDLE: AtomicU32 = AtomicU32::new(1);

/// Clip-space corners in display UV order: bottom-left, bottom-right,
/// top-left, top-right (drawn as a triangle strip).
const QUAD_POSITIONS: [[f32; 2]; 4] = [[-1.0, -1.0], [1.0, -1.0], [-1.0, 1.0], [1.0, 1.0]];

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct BackgroundVertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
}

/// Quad vertices for the given screen-corner UVs.
pub fn quad_vertices(display_uvs: &[Vec2; 4]) -> [BackgroundVertex; 4] {
    std::array::from_fn(|i| BackgroundVertex {
        position: QUAD_POSITIONS[i],
        uv: display_uvs[i].to_array(),
    })
}

pub struct BackgroundRenderer {
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
    camera_texture: GpuTexture,
    vertex_buffer: wgpu::Buffer,
}

impl BackgroundRenderer {
    /// Allocate the camera texture and pipeline. The returned handle is what
    /// the tracking session writes camera frames for.
    pub fn create(ctx: &RenderContext) -> (Self, CameraTextureHandle) {
        let handle = CameraTextureHandle(NEXT_HANDLE.fetch_add(1, Ordering::Relaxed));

        let bind_group_layout = ctx
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Background Bind Group Layout"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                            view_dimension: wgpu::TextureViewDimension::D2,
                            multisampled: false,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
            });

        let camera_texture = GpuTexture::empty(
            ctx,
            "Camera Texture",
            INITIAL_SIZE.0,
            INITIAL_SIZE.1,
            wgpu::AddressMode::ClampToEdge,
        );
        let bind_group = Self::create_bind_group(ctx, &bind_group_layout, &camera_texture);

        let vertex_buffer =
            ctx.create_vertex_buffer("Background Quad", &quad_vertices(&IDENTITY_DISPLAY_UVS));

        let shader = ctx.create_shader("Background Shader", SHADER);
        let layout = ctx.create_pipeline_layout("Background Pipeline Layout", &bind_group_layout);
        let pipeline = ctx
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("Background Pipeline"),
                layout: Some(&layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    buffers: &[wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<BackgroundVertex>() as u64,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x2],
                    }],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: ctx.surface_format,
                        blend: Some(wgpu::BlendState::REPLACE),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleStrip,
                    cull_mode: None,
                    ..Default::default()
                },
                // Never occludes anything drawn after it
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: DEPTH_FORMAT,
                    depth_write_enabled: false,
                    depth_compare: wgpu::CompareFunction::Always,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            });

        let renderer = Self {
            pipeline,
            bind_group_layout,
            bind_group,
            camera_texture,
            vertex_buffer,
        };
        (renderer, handle)
    }

    fn create_bind_group(
        ctx: &RenderContext,
        layout: &wgpu::BindGroupLayout,
        texture: &GpuTexture,
    ) -> wgpu::BindGroup {
        ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Background Bind Group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&texture.sampler),
                },
            ],
        })
    }
}

impl Renderable for BackgroundRenderer {
    fn name(&self) -> &'static str {
        "background"
    }

    fn priority(&self) -> RenderPriority {
        RenderPriority::Background
    }

    fn prepare(&mut self, ctx: &RenderContext, plan: &FramePlan) -> Result<(), FrameError> {
        if let Some(image) = uploadable_image(plan.camera_image.as_ref())? {
            if self.camera_texture.size() != (image.width, image.height) {
                log::debug!("Camera texture resized to {}x{}", image.width, image.height);
                self.camera_texture = GpuTexture::empty(
                    ctx,
                    "Camera Texture",
                    image.width,
                    image.height,
                    wgpu::AddressMode::ClampToEdge,
                );
                self.bind_group =
                    Self::create_bind_group(ctx, &self.bind_group_layout, &self.camera_texture);
            }
            self.camera_texture.write(ctx.queue, &image.pixels);
        }

        ctx.write_buffer(&self.vertex_buffer, &quad_vertices(&plan.display_uvs));
        Ok(())
    }

    fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.draw(0..4, 0..1);
    }
}

/// The camera image to upload this frame, if any. Empty images are skipped;
/// a pixel buffer that does not match the stated size is an error.
fn uploadable_image(image: Option<&CameraImage>) -> Result<Option<&CameraImage>, FrameError> {
    let Some(image) = image else {
        return Ok(None);
    };
    if image.width == 0 || image.height == 0 {
        return Ok(None);
    }
    let expected = image.width as usize * image.height as usize * 4;
    if image.pixels.len() != expected {
        return Err(FrameError::Renderer(format!(
            "camera image is {} bytes, expected {} for {}x{}",
            image.pixels.len(),
            expected,
            image.width,
            image.height
        )));
    }
    Ok(Some(image))
}
