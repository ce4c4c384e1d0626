//! wgpu backend for landscape draw commands: mesh and texture upload, one
//! pipeline per blend mode and topology, and playback into a render pass.

pub mod buffer;
pub mod gpu;
pub mod pipeline;
pub mod renderer;
pub mod texture;

pub use buffer::{MeshBuffer, landscape_vertex_layout};
pub use gpu::{GpuError, HeadlessGpu};
pub use pipeline::{DrawUniform, LANDSCAPE_SHADER_SOURCE, LandscapePipelines, blend_state};
pub use renderer::LandscapeRenderer;
pub use texture::{GpuTexture, TextureCache, TextureError};
