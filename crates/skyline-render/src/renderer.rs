//! Plays recorded landscape draw commands back through wgpu.

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use glam::Mat4;
use skyline_landscape::{BlendMode, DrawCommand, Mesh, TextureHandle, Topology};

use crate::buffer::MeshBuffer;
use crate::pipeline::{DrawUniform, LandscapePipelines};
use crate::texture::{TextureCache, TextureError};

struct CachedMesh {
    source: Weak<Mesh>,
    buffer: MeshBuffer,
}

struct UniformSlot {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

struct PreparedDraw {
    mesh: usize,
    texture: Option<TextureHandle>,
    blend: BlendMode,
    topology: Topology,
}

/// Uploads what a frame's draw commands reference and replays them in a
/// render pass, in submission order.
pub struct LandscapeRenderer {
    pipelines: LandscapePipelines,
    textures: TextureCache,
    meshes: HashMap<usize, CachedMesh>,
    uniforms: Vec<UniformSlot>,
    draws: Vec<PreparedDraw>,
}

impl LandscapeRenderer {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        target_format: wgpu::TextureFormat,
    ) -> Self {
        let textures = TextureCache::new(device, queue);
        let pipelines = LandscapePipelines::new(device, target_format, textures.bind_group_layout());
        Self {
            pipelines,
            textures,
            meshes: HashMap::new(),
            uniforms: Vec::new(),
            draws: Vec::new(),
        }
    }

    /// Upload meshes, textures and per-draw uniforms for `commands`.
    /// Commands whose texture is still pending or whose mesh is empty are
    /// dropped.
    pub fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view_proj: Mat4,
        commands: &[DrawCommand],
    ) -> Result<(), TextureError> {
        self.draws.clear();
        self.meshes.retain(|_, cached| cached.source.strong_count() > 0);
        self.textures.evict_dropped();

        for command in commands {
            let key = Arc::as_ptr(&command.mesh) as usize;
            if !self.meshes.contains_key(&key) {
                let label = format!("landscape-{:?}", command.layer);
                let Some(buffer) = MeshBuffer::upload(device, &label, &command.mesh) else {
                    continue;
                };
                self.meshes.insert(
                    key,
                    CachedMesh {
                        source: Arc::downgrade(&command.mesh),
                        buffer,
                    },
                );
            }

            if let Some(handle) = &command.texture
                && !self.textures.ensure(device, queue, handle)?
            {
                log::trace!("Texture '{}' not ready, skipping draw", handle.name());
                continue;
            }

            let slot = self.draws.len();
            if slot == self.uniforms.len() {
                let uniform_slot = self.create_uniform_slot(device, slot);
                self.uniforms.push(uniform_slot);
            }
            let uniform = DrawUniform::new(view_proj * command.transform, command.color);
            queue.write_buffer(&self.uniforms[slot].buffer, 0, bytemuck::bytes_of(&uniform));

            self.draws.push(PreparedDraw {
                mesh: key,
                texture: command.texture.clone(),
                blend: command.blend,
                topology: command.mesh.topology,
            });
        }
        Ok(())
    }

    /// Record the prepared draws into `pass`.
    pub fn render<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>) {
        for (slot, draw) in self.draws.iter().enumerate() {
            let (Some(pipeline), Some(mesh)) = (
                self.pipelines.get(draw.blend, draw.topology),
                self.meshes.get(&draw.mesh),
            ) else {
                continue;
            };
            let texture = draw
                .texture
                .as_ref()
                .and_then(|handle| self.textures.get(handle))
                .unwrap_or_else(|| self.textures.white());

            pass.set_pipeline(pipeline);
            pass.set_bind_group(0, &self.uniforms[slot].bind_group, &[]);
            pass.set_bind_group(1, &texture.bind_group, &[]);
            mesh.buffer.bind(pass);
            mesh.buffer.draw(pass);
        }
    }

    /// Draws prepared for the next [`render`](Self::render).
    pub fn draw_count(&self) -> usize {
        self.draws.len()
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    /// Forget every uploaded texture, including ones still referenced.
    pub fn clear_textures(&mut self) {
        self.textures.clear();
    }

    fn create_uniform_slot(&self, device: &wgpu::Device, slot: usize) -> UniformSlot {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("landscape-draw-uniform-{slot}")),
            size: std::mem::size_of::<DrawUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("landscape-draw-bind-group-{slot}")),
            layout: &self.pipelines.draw_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });
        UniformSlot { buffer, bind_group }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpu::HeadlessGpu;
    use skyline_landscape::mesh::{fan_disk, outline_strip};
    use skyline_landscape::{DrawList, LandscapePainter, Layer, TextureImage};
    use skyline_math::{NADIR, SphericalPolygon, direction_from_azalt};

    const TARGET: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

    fn ground_command(texture: TextureHandle) -> DrawCommand {
        DrawCommand {
            layer: Layer::Ground,
            mesh: Arc::new(fan_disk(1.0, 4, 2, -0.2)),
            texture: Some(texture),
            color: [1.0; 4],
            blend: BlendMode::Alpha,
            transform: Mat4::IDENTITY,
        }
    }

    fn line_command() -> DrawCommand {
        let vertices = (0..8)
            .map(|i| direction_from_azalt(i as f64 * std::f64::consts::TAU / 8.0, 0.1))
            .collect();
        let polygon = SphericalPolygon::new(vertices, NADIR).unwrap();
        DrawCommand {
            layer: Layer::HorizonLine,
            mesh: Arc::new(outline_strip(&polygon, 1.0, 2)),
            texture: None,
            color: [1.0, 0.0, 0.0, 1.0],
            blend: BlendMode::Alpha,
            transform: Mat4::IDENTITY,
        }
    }

    #[test]
    fn test_prepare_uploads_and_skips_pending() {
        let Ok(gpu) = HeadlessGpu::new_blocking() else {
            return;
        };
        let mut renderer = LandscapeRenderer::new(&gpu.device, &gpu.queue, TARGET);
        let ground = TextureHandle::ready("ground.png", TextureImage::filled(2, 2, [50, 80, 20, 255]));
        let mut list = DrawList::new();
        list.submit(ground_command(ground.clone()));
        list.submit(ground_command(TextureHandle::pending("late.png")));
        list.submit(line_command());

        renderer
            .prepare(&gpu.device, &gpu.queue, Mat4::IDENTITY, list.commands())
            .unwrap();
        assert_eq!(renderer.draw_count(), 2);
        assert_eq!(renderer.texture_count(), 1);
        assert_eq!(renderer.mesh_count(), 3);
    }

    #[test]
    fn test_dropped_meshes_are_evicted() {
        let Ok(gpu) = HeadlessGpu::new_blocking() else {
            return;
        };
        let mut renderer = LandscapeRenderer::new(&gpu.device, &gpu.queue, TARGET);
        let mut list = DrawList::new();
        list.submit(line_command());
        renderer
            .prepare(&gpu.device, &gpu.queue, Mat4::IDENTITY, list.commands())
            .unwrap();
        assert_eq!(renderer.mesh_count(), 1);

        list.clear();
        renderer
            .prepare(&gpu.device, &gpu.queue, Mat4::IDENTITY, list.commands())
            .unwrap();
        assert_eq!(renderer.mesh_count(), 0);
        assert_eq!(renderer.draw_count(), 0);
    }

    #[test]
    fn test_dropped_textures_are_evicted() {
        let Ok(gpu) = HeadlessGpu::new_blocking() else {
            return;
        };
        let mut renderer = LandscapeRenderer::new(&gpu.device, &gpu.queue, TARGET);
        let mut list = DrawList::new();
        list.submit(ground_command(TextureHandle::ready(
            "ground.png",
            TextureImage::filled(2, 2, [50, 80, 20, 255]),
        )));
        renderer
            .prepare(&gpu.device, &gpu.queue, Mat4::IDENTITY, list.commands())
            .unwrap();
        assert_eq!(renderer.texture_count(), 1);

        list.clear();
        renderer
            .prepare(&gpu.device, &gpu.queue, Mat4::IDENTITY, list.commands())
            .unwrap();
        assert_eq!(renderer.texture_count(), 0);
    }

    #[test]
    fn test_render_offscreen() {
        let Ok(gpu) = HeadlessGpu::new_blocking() else {
            return;
        };
        let mut renderer = LandscapeRenderer::new(&gpu.device, &gpu.queue, TARGET);
        let ground = TextureHandle::ready("ground.png", TextureImage::filled(2, 2, [50, 80, 20, 255]));
        let mut list = DrawList::new();
        list.submit(ground_command(ground));
        list.submit(line_command());
        let view_proj = Mat4::perspective_rh(1.2, 1.0, 0.01, 10.0)
            * Mat4::look_at_rh(glam::Vec3::ZERO, glam::Vec3::X, glam::Vec3::Z);
        renderer
            .prepare(&gpu.device, &gpu.queue, view_proj, list.commands())
            .unwrap();

        let target = gpu.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("offscreen"),
            size: wgpu::Extent3d {
                width: 16,
                height: 16,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: TARGET,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = target.create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("landscape-test-pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                ..Default::default()
            });
            renderer.render(&mut pass);
        }
        gpu.queue.submit(std::iter::once(encoder.finish()));
        assert_eq!(renderer.draw_count(), 2);
    }
}
