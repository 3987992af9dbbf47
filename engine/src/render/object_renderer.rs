//! Object Renderer
//!
//! One textured mesh lit by a single directional light (ambient, wrapped
//! diffuse and Phong specular, all scaled by the light estimate). Every
//! instance owns its own transform and uniform buffer; the game uses one per
//! cannon plus one for the projectile.

use glam::Mat4;

use super::gpu_context::DEPTH_FORMAT;
use super::gpu_texture::GpuTexture;
use super::object_transform::ObjectTransform;
use super::renderable::{RenderContext, RenderPriority, Renderable};
use super::uniforms::ObjectUniforms;
use crate::assets::{Mesh, Texture};
use crate::config::MaterialConfig;
use crate::frame::{FrameError, FramePlan, ObjectSlot};

const SHADER: &str = include_str!("../../../shaders/object.wgsl");

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

/// Interleave a loaded mesh for upload.
pub fn interleave(mesh: &Mesh) -> Vec<ObjectVertex> {
    (0..mesh.vertex_count())
        .map(|i| ObjectVertex {
            position: mesh.positions[i],
            normal: mesh.normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]),
            uv: mesh.uvs.get(i).copied().unwrap_or([0.0, 0.0]),
        })
        .collect()
}

pub struct ObjectRenderer {
    slot: ObjectSlot,
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    uniform_buffer: wgpu::Buffer,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    material: MaterialConfig,
    transform: ObjectTransform,
    visible: bool,
    _texture: GpuTexture,
}

impl ObjectRenderer {
    pub fn create(ctx: &RenderContext, slot: ObjectSlot, mesh: &Mesh, texture: &Texture) -> Self {
        let label = format!("{:?}", slot);
        let texture = GpuTexture::upload(
            ctx,
            &format!("{} Texture", label),
            texture,
            wgpu::AddressMode::Repeat,
        );

        let vertex_buffer =
            ctx.create_vertex_buffer(&format!("{} Vertices", label), &interleave(mesh));
        let index_buffer = ctx.create_index_buffer(&format!("{} Indices", label), &mesh.indices);

        let material = MaterialConfig::default();
        let uniform_buffer = ctx.create_uniform_buffer(
            &format!("{} Uniforms", label),
            &ObjectUniforms::new(
                Mat4::IDENTITY,
                Mat4::IDENTITY,
                Mat4::IDENTITY,
                &material,
                1.0,
            ),
        );

        let bind_group_layout = ctx
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Object Bind Group Layout"),
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
            label: Some(&format!("{} Bind Group", label)),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&texture.sampler),
                },
            ],
        });

        let shader = ctx.create_shader("Object Shader", SHADER);
        let layout = ctx.create_pipeline_layout("Object Pipeline Layout", &bind_group_layout);
        let pipeline = ctx
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(&format!("{} Pipeline", label)),
                layout: Some(&layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    buffers: &[wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<ObjectVertex>() as u64,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &wgpu::vertex_attr_array![
                            0 => Float32x3,
                            1 => Float32x3,
                            2 => Float32x2
                        ],
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
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: Some(wgpu::Face::Back),
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: DEPTH_FORMAT,
                    depth_write_enabled: true,
                    depth_compare: wgpu::CompareFunction::Less,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            });

        Self {
            slot,
            pipeline,
            bind_group,
            uniform_buffer,
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
            material,
            transform: ObjectTransform::default(),
            visible: false,
            _texture: texture,
        }
    }

    pub fn set_material(&mut self, ambient: f32, diffuse: f32, specular: f32, specular_power: f32) {
        self.material = MaterialConfig {
            ambient,
            diffuse,
            specular,
            specular_power,
        };
    }

    pub fn update_model_matrix(&mut self, pose: Mat4, scale: f32) {
        self.transform.update_model_matrix(pose, scale);
    }

    pub fn update_rotation(&mut self, horizontal_deg: f32, vertical_deg: f32) {
        self.transform.update_rotation(horizontal_deg, vertical_deg);
    }

    /// Upload uniforms for the current transform and mark the object visible
    /// this frame.
    pub fn update_uniforms(
        &mut self,
        ctx: &RenderContext,
        view: Mat4,
        projection: Mat4,
        light_intensity: f32,
    ) {
        let uniforms = ObjectUniforms::new(
            self.transform.model_matrix(),
            view,
            projection,
            &self.material,
            light_intensity,
        );
        ctx.write_buffer(&self.uniform_buffer, &[uniforms]);
        self.visible = true;
    }
}

impl Renderable for ObjectRenderer {
    fn name(&self) -> &'static str {
        match self.slot {
            ObjectSlot::Cannon1 => "cannon1",
            ObjectSlot::Cannon2 => "cannon2",
            ObjectSlot::Projectile => "projectile",
        }
    }

    fn priority(&self) -> RenderPriority {
        RenderPriority::Objects
    }

    fn prepare(&mut self, ctx: &RenderContext, plan: &FramePlan) -> Result<(), FrameError> {
        self.visible = false;
        let (Some(camera), Some(object)) = (plan.camera, plan.object(self.slot)) else {
            return Ok(());
        };
        let (horizontal, vertical) = object.transform.rotation();
        self.update_model_matrix(object.transform.pose(), object.transform.scale());
        self.update_rotation(horizontal, vertical);
        self.update_uniforms(ctx, camera.view, camera.projection, camera.light_intensity);
        Ok(())
    }

    fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        if !self.visible || self.index_count == 0 {
            return;
        }
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        render_pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interleave() {
        let mesh = Mesh {
            positions: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            normals: vec![[0.0, 0.0, 1.0]; 3],
            uvs: vec![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]],
            indices: vec![0, 1, 2],
        };
        let vertices = interleave(&mesh);
        assert_eq!(vertices.len(), 3);
        assert_eq!(vertices[1].position, [1.0, 0.0, 0.0]);
        assert_eq!(vertices[2].uv, [0.0, 1.0]);
        assert_eq!(std::mem::size_of::<ObjectVertex>(), 32);
    }
}
