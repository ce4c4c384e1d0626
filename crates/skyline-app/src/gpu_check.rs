//! One offscreen frame of the loaded landscape, to catch GPU-side failures
//! (texture uploads, pipeline creation) without opening a window.

use glam::{Mat4, Vec3};
use skyline_landscape::{Brightness, DrawList, Landscape};
use skyline_render::{HeadlessGpu, LandscapeRenderer};

use crate::error::ProbeError;

const TARGET_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;
const TARGET_SIZE: u32 = 256;

/// Camera at the observer looking north at the horizon, 90° wide.
pub fn horizon_view_projection() -> Mat4 {
    let projection = Mat4::perspective_rh(std::f32::consts::FRAC_PI_2, 1.0, 0.01, 100.0);
    let view = Mat4::look_at_rh(Vec3::ZERO, Vec3::NEG_X, Vec3::Z);
    projection * view
}

/// Render `landscape` once into an offscreen target. Returns how many draws
/// reached the GPU.
pub fn render_offscreen(
    landscape: &dyn Landscape,
    brightness: Brightness,
) -> Result<usize, ProbeError> {
    let gpu = HeadlessGpu::new_blocking()?;

    let mut commands = DrawList::new();
    landscape.draw(&mut commands, brightness);
    log::debug!("Landscape submitted {} draw commands", commands.len());

    let mut renderer = LandscapeRenderer::new(&gpu.device, &gpu.queue, TARGET_FORMAT);
    renderer.prepare(
        &gpu.device,
        &gpu.queue,
        horizon_view_projection(),
        commands.commands(),
    )?;

    let target = gpu.device.create_texture(&wgpu::TextureDescriptor {
        label: Some("probe-target"),
        size: wgpu::Extent3d {
            width: TARGET_SIZE,
            height: TARGET_SIZE,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: TARGET_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    let view = target.create_view(&wgpu::TextureViewDescriptor::default());

    let mut encoder = gpu
        .device
        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("probe-encoder"),
        });
    {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("probe-pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color {
                        r: 0.05,
                        g: 0.1,
                        b: 0.3,
                        a: 1.0,
                    }),
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

    Ok(renderer.draw_count())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_looks_north() {
        let clip = horizon_view_projection() * glam::Vec4::new(-10.0, 0.0, 0.0, 1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-5);
        assert!(ndc.y.abs() < 1e-5);
        // zenith is up on screen
        let up = horizon_view_projection() * glam::Vec4::new(-10.0, 0.0, 5.0, 1.0);
        assert!(up.y / up.w > 0.0);
        // east is to the right
        let east = horizon_view_projection() * glam::Vec4::new(-10.0, 5.0, 0.0, 1.0);
        assert!(east.x / east.w > 0.0);
    }
}
