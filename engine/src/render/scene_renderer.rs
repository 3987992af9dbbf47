//! Scene Renderer
//!
//! Owns the GPU context and every renderer, and turns a [`FramePlan`] into
//! one render pass: background, then planes, then objects.

use log::{error, info, warn};

use super::background::BackgroundRenderer;
use super::gpu_context::GpuContext;
use super::object_renderer::ObjectRenderer;
use super::plane_renderer::PlaneRenderer;
use super::renderable::Renderable;
use crate::assets::{AssetError, Mesh, Texture, load_mesh, load_texture};
use crate::config::CannonsConfig;
use crate::frame::{FrameError, FramePlan, FrameSink, ObjectSlot};
use crate::tracking::CameraTextureHandle;

/// Clear color behind the camera feed (visible only before the first image).
const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.1,
    g: 0.1,
    b: 0.1,
    a: 1.0,
};

pub struct SceneRenderer {
    gpu: GpuContext,
    renderers: Vec<Box<dyn Renderable>>,
    camera_texture: CameraTextureHandle,
}

impl SceneRenderer {
    /// Create all renderers. A renderer whose assets fail to load is left out
    /// for the rest of the session; the game keeps running without it.
    pub fn new(gpu: GpuContext, config: &CannonsConfig) -> Self {
        let ctx = gpu.render_context();
        let mut renderers: Vec<Box<dyn Renderable>> = Vec::new();

        let (background, camera_texture) = BackgroundRenderer::create(&ctx);
        renderers.push(Box::new(background));

        match load_texture(&config.asset_path(&config.assets.plane_grid_texture)) {
            Ok(grid) => renderers.push(Box::new(PlaneRenderer::create(
                &ctx,
                &grid,
                config.plane_fade_width,
            ))),
            Err(e) => error!("Failed to read plane grid texture: {}", e),
        }

        let cannon = load_object_assets(
            config,
            &config.assets.cannon_mesh,
            &config.assets.cannon_texture,
        );
        let projectile = load_object_assets(
            config,
            &config.assets.projectile_mesh,
            &config.assets.projectile_texture,
        );
        let objects = [
            (ObjectSlot::Cannon1, cannon.as_ref()),
            (ObjectSlot::Cannon2, cannon.as_ref()),
            (ObjectSlot::Projectile, projectile.as_ref()),
        ];
        for (slot, assets) in objects {
            match assets {
                Ok((mesh, texture)) => {
                    let mut renderer = ObjectRenderer::create(&ctx, slot, mesh, texture);
                    let m = &config.material;
                    renderer.set_material(m.ambient, m.diffuse, m.specular, m.specular_power);
                    renderers.push(Box::new(renderer));
                }
                Err(e) => error!("Failed to read {:?} asset file: {}", slot, e),
            }
        }

        renderers.sort_by_key(|r| r.priority());
        if renderers.len() < 5 {
            warn!("Running with {} of 5 renderers", renderers.len());
        }
        info!(
            "Scene renderer ready: {}",
            renderers
                .iter()
                .map(|r| r.name())
                .collect::<Vec<_>>()
                .join(", ")
        );

        Self {
            gpu,
            renderers,
            camera_texture,
        }
    }

    /// Texture the tracking session should deliver camera frames for.
    pub fn camera_texture_handle(&self) -> CameraTextureHandle {
        self.camera_texture
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.gpu.resize(width, height);
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.gpu.dimensions()
    }
}

fn load_object_assets(
    config: &CannonsConfig,
    mesh: &str,
    texture: &str,
) -> Result<(Mesh, Texture), AssetError> {
    let mesh = load_mesh(&config.asset_path(mesh))?;
    let texture = load_texture(&config.asset_path(texture))?;
    Ok((mesh, texture))
}

impl FrameSink for SceneRenderer {
    fn submit(&mut self, plan: &FramePlan) -> Result<(), FrameError> {
        let ctx = self.gpu.render_context();
        for renderer in &mut self.renderers {
            renderer.prepare(&ctx, plan)?;
        }

        let output = self.gpu.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.gpu.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            for renderer in &self.renderers {
                renderer.draw(&mut render_pass);
            }
        }

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}
