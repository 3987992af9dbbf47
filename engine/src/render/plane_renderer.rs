//! Plane Renderer
//!
//! Draws detected planes as translucent, grid-textured fans. All planes share
//! one vertex and one index buffer per frame; each plane is still its own
//! draw call.

use std::ops::Range;

use super::gpu_context::DEPTH_FORMAT;
use super::gpu_texture::GpuTexture;
use super::plane_mesh::{PlaneVertex, build_plane_draws};
use super::renderable::{RenderContext, RenderPriority, Renderable};
use super::uniforms::PlaneUniforms;
use crate::assets::Texture;
use crate::frame::{FrameError, FramePlan};

const SHADER: &str = include_str!("../../../shaders/plane.wgsl");

const INITIAL_VERTEX_CAPACITY: u64 = 256;
const INITIAL_INDEX_CAPACITY: u64 = 1024;

struct PlaneDrawRange {
    indices: Range<u32>,
    base_vertex: i32,
}

pub struct PlaneRenderer {
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    uniform_buffer: wgpu::Buffer,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    vertex_capacity: u64,
    index_capacity: u64,
    ranges: Vec<PlaneDrawRange>,
    fade_width: f32,
    _grid_texture: GpuTexture,
}

impl PlaneRenderer {
    pub fn create(ctx: &RenderContext, grid_texture: &Texture, fade_width: f32) -> Self {
        let grid_texture =
            GpuTexture::upload(ctx, "Plane Grid Texture", grid_texture, wgpu::AddressMode::Repeat);

        let uniform_buffer = ctx.create_uniform_buffer(
            "Plane Uniforms",
            &PlaneUniforms::new(glam::Mat4::IDENTITY, glam::Mat4::IDENTITY),
        );

        let bind_group_layout = ctx
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Plane Bind Group Layout"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: None,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                            view_dimension: wgpu::TextureViewDimension::D2,
                            multisampled: false,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 2,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
            });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Plane Bind Group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&grid_texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&grid_texture.sampler),
                },
            ],
        });

        let shader = ctx.create_shader("Plane Shader", SHADER);
        let layout = ctx.create_pipeline_layout("Plane Pipeline Layout", &bind_group_layout);
        let pipeline = ctx
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("Plane Pipeline"),
                layout: Some(&layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    buffers: &[wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<PlaneVertex>() as u64,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &wgpu::vertex_attr_array![
                            0 => Float32x3,
                            1 => Float32x2,
                            2 => Float32,
                            3 => Float32x4
                        ],
                    }],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: ctx.surface_format,
                        blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    cull_mode: None,
                    ..Default::default()
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: DEPTH_FORMAT,
                    depth_write_enabled: false,
                    depth_compare: wgpu::CompareFunction::LessEqual,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            });

        let vertex_buffer = Self::vertex_buffer(ctx, INITIAL_VERTEX_CAPACITY);
        let index_buffer = Self::index_buffer(ctx, INITIAL_INDEX_CAPACITY);

        Self {
            pipeline,
            bind_group,
            uniform_buffer,
            vertex_buffer,
            index_buffer,
            vertex_capacity: INITIAL_VERTEX_CAPACITY,
            index_capacity: INITIAL_INDEX_CAPACITY,
            ranges: Vec::new(),
            fade_width,
            _grid_texture: grid_texture,
        }
    }

    fn vertex_buffer(ctx: &RenderContext, capacity: u64) -> wgpu::Buffer {
        ctx.create_dynamic_buffer(
            "Plane Vertices",
            capacity * std::mem::size_of::<PlaneVertex>() as u64,
            wgpu::BufferUsages::VERTEX,
        )
    }

    fn index_buffer(ctx: &RenderContext, capacity: u64) -> wgpu::Buffer {
        ctx.create_dynamic_buffer(
            "Plane Indices",
            capacity * std::mem::size_of::<u32>() as u64,
            wgpu::BufferUsages::INDEX,
        )
    }
}

impl Renderable for PlaneRenderer {
    fn name(&self) -> &'static str {
        "planes"
    }

    fn priority(&self) -> RenderPriority {
        RenderPriority::Planes
    }

    fn prepare(&mut self, ctx: &RenderContext, plan: &FramePlan) -> Result<(), FrameError> {
        self.ranges.clear();
        let Some(camera) = plan.camera else {
            return Ok(());
        };

        let draws = build_plane_draws(&plan.planes, self.fade_width);
        if draws.is_empty() {
            return Ok(());
        }

        let mut vertices = Vec::new();
        let mut indices = Vec::new();
        for draw in &draws {
            let first_index = indices.len() as u32;
            self.ranges.push(PlaneDrawRange {
                indices: first_index..first_index + draw.indices.len() as u32,
                base_vertex: vertices.len() as i32,
            });
            vertices.extend_from_slice(&draw.vertices);
            indices.extend_from_slice(&draw.indices);
        }

        if vertices.len() as u64 > self.vertex_capacity {
            self.vertex_capacity = (vertices.len() as u64).next_power_of_two();
            self.vertex_buffer = Self::vertex_buffer(ctx, self.vertex_capacity);
        }
        if indices.len() as u64 > self.index_capacity {
            self.index_capacity = (indices.len() as u64).next_power_of_two();
            self.index_buffer = Self::index_buffer(ctx, self.index_capacity);
        }

        ctx.write_buffer(&self.vertex_buffer, &vertices);
        ctx.write_buffer(&self.index_buffer, &indices);
        ctx.write_buffer(
            &self.uniform_buffer,
            &[PlaneUniforms::new(camera.view, camera.projection)],
        );
        Ok(())
    }

    fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        if self.ranges.is_empty() {
            return;
        }
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        for range in &self.ranges {
            render_pass.draw_indexed(range.indices.clone(), range.base_vertex, 0..1);
        }
    }
}
