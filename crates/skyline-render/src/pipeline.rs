//! Render pipelines for landscape draw commands, one per blend mode and
//! topology.

use std::collections::HashMap;
use std::num::NonZeroU64;

use bytemuck::{Pod, Zeroable};
use skyline_landscape::{BlendMode, Topology};

use crate::buffer::landscape_vertex_layout;

/// Per-draw uniform: model-view-projection and the color multiplier.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct DrawUniform {
    pub mvp: [[f32; 4]; 4],
    pub color: [f32; 4],
}

impl DrawUniform {
    pub fn new(mvp: glam::Mat4, color: [f32; 4]) -> Self {
        Self {
            mvp: mvp.to_cols_array_2d(),
            color,
        }
    }
}

/// Framebuffer blending for a landscape blend mode.
pub fn blend_state(blend: BlendMode) -> wgpu::BlendState {
    let additive = |src_factor| wgpu::BlendComponent {
        src_factor,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    };
    match blend {
        BlendMode::Alpha => wgpu::BlendState::ALPHA_BLENDING,
        BlendMode::Additive => wgpu::BlendState {
            color: additive(wgpu::BlendFactor::One),
            alpha: additive(wgpu::BlendFactor::One),
        },
        BlendMode::AdditiveAlpha => wgpu::BlendState {
            color: additive(wgpu::BlendFactor::SrcAlpha),
            alpha: additive(wgpu::BlendFactor::One),
        },
    }
}

pub fn primitive_topology(topology: Topology) -> wgpu::PrimitiveTopology {
    match topology {
        Topology::Triangles => wgpu::PrimitiveTopology::TriangleList,
        Topology::LineStrip => wgpu::PrimitiveTopology::LineStrip,
    }
}

/// All pipeline variants a landscape can ask for, sharing one layout.
pub struct LandscapePipelines {
    pipelines: HashMap<(BlendMode, Topology), wgpu::RenderPipeline>,
    pub draw_bind_group_layout: wgpu::BindGroupLayout,
}

impl LandscapePipelines {
    /// `texture_bind_group_layout` is the layout for group 1 (texture + sampler).
    pub fn new(
        device: &wgpu::Device,
        target_format: wgpu::TextureFormat,
        texture_bind_group_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("landscape-shader"),
            source: wgpu::ShaderSource::Wgsl(LANDSCAPE_SHADER_SOURCE.into()),
        });

        let draw_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("landscape-draw-bind-group-layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: NonZeroU64::new(
                            std::mem::size_of::<DrawUniform>() as u64
                        ),
                    },
                    count: None,
                }],
            });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("landscape-pipeline-layout"),
            bind_group_layouts: &[&draw_bind_group_layout, texture_bind_group_layout],
            immediate_size: 0,
        });

        let mut pipelines = HashMap::new();
        for blend in [BlendMode::Alpha, BlendMode::Additive, BlendMode::AdditiveAlpha] {
            for topology in [Topology::Triangles, Topology::LineStrip] {
                let pipeline = create_pipeline(
                    device,
                    &shader,
                    &pipeline_layout,
                    target_format,
                    blend,
                    topology,
                );
                pipelines.insert((blend, topology), pipeline);
            }
        }

        Self {
            pipelines,
            draw_bind_group_layout,
        }
    }

    pub fn get(&self, blend: BlendMode, topology: Topology) -> Option<&wgpu::RenderPipeline> {
        self.pipelines.get(&(blend, topology))
    }
}

fn create_pipeline(
    device: &wgpu::Device,
    shader: &wgpu::ShaderModule,
    layout: &wgpu::PipelineLayout,
    target_format: wgpu::TextureFormat,
    blend: BlendMode,
    topology: Topology,
) -> wgpu::RenderPipeline {
    let strip_index_format = match topology {
        Topology::LineStrip => Some(wgpu::IndexFormat::Uint32),
        Topology::Triangles => None,
    };
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(&format!("landscape-pipeline-{blend:?}-{topology:?}")),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &[landscape_vertex_layout()],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        primitive: wgpu::PrimitiveState {
            topology: primitive_topology(topology),
            strip_index_format,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None, // panels are seen from inside
            unclipped_depth: false,
            polygon_mode: wgpu::PolygonMode::Fill,
            conservative: false,
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: target_format,
                blend: Some(blend_state(blend)),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        multiview_mask: None,
        cache: None,
    })
}

/// WGSL shader source for landscape layers.
pub const LANDSCAPE_SHADER_SOURCE: &str = r#"
struct DrawUniform {
    mvp: mat4x4<f32>,
    color: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> draw: DrawUniform;

@group(1) @binding(0)
var t_layer: texture_2d<f32>;
@group(1) @binding(1)
var s_layer: sampler;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) uv: vec2<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = draw.mvp * vec4<f32>(in.position, 1.0);
    out.uv = in.uv;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return textureSample(t_layer, s_layer, in.uv) * draw.color;
}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draw_uniform_layout() {
        // mat4x4 + vec4
        assert_eq!(std::mem::size_of::<DrawUniform>(), 80);
        let uniform = DrawUniform::new(glam::Mat4::IDENTITY, [0.1, 0.2, 0.3, 0.4]);
        let floats: &[f32] = bytemuck::cast_slice(bytemuck::bytes_of(&uniform));
        assert_eq!(floats[0], 1.0);
        assert_eq!(floats[5], 1.0);
        assert_eq!(&floats[16..], &[0.1, 0.2, 0.3, 0.4]);
    }

    #[test]
    fn test_translation_lands_in_last_column() {
        let uniform = DrawUniform::new(glam::Mat4::from_translation(glam::Vec3::new(1.0, 2.0, 3.0)), [1.0; 4]);
        assert_eq!(uniform.mvp[3], [1.0, 2.0, 3.0, 1.0]);
    }

    #[test]
    fn test_blend_states() {
        assert_eq!(blend_state(BlendMode::Alpha), wgpu::BlendState::ALPHA_BLENDING);
        let additive = blend_state(BlendMode::Additive);
        assert_eq!(additive.color.src_factor, wgpu::BlendFactor::One);
        assert_eq!(additive.color.dst_factor, wgpu::BlendFactor::One);
        let lights = blend_state(BlendMode::AdditiveAlpha);
        assert_eq!(lights.color.src_factor, wgpu::BlendFactor::SrcAlpha);
        assert_eq!(lights.color.dst_factor, wgpu::BlendFactor::One);
    }

    #[test]
    fn test_topologies() {
        assert_eq!(
            primitive_topology(Topology::Triangles),
            wgpu::PrimitiveTopology::TriangleList
        );
        assert_eq!(
            primitive_topology(Topology::LineStrip),
            wgpu::PrimitiveTopology::LineStrip
        );
    }
}
