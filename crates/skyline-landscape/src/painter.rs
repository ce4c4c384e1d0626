//! The seam between landscapes and whatever draws them.
//!
//! Landscapes describe a frame as a sequence of [`DrawCommand`]s; a
//! [`LandscapePainter`] consumes them in order. [`DrawList`] simply records
//! them, which is what the GPU backend and the tests use.

use std::sync::Arc;

use glam::Mat4;

use crate::mesh::Mesh;
use crate::texture::TextureHandle;

/// Which part of a landscape a command draws.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Layer {
    /// Side panels or the day image.
    Decor,
    Ground,
    Fog,
    /// Night lights.
    Illumination,
    /// Flat fill of a measured horizon.
    Fill,
    HorizonLine,
}

/// How a command's fragments combine with what is already drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BlendMode {
    /// Standard `src_alpha, one_minus_src_alpha`.
    Alpha,
    /// `one, one`.
    Additive,
    /// `src_alpha, one`.
    AdditiveAlpha,
}

/// One mesh drawn with one texture, color and transform.
#[derive(Clone, Debug)]
pub struct DrawCommand {
    pub layer: Layer,
    pub mesh: Arc<Mesh>,
    /// `None` draws with the color alone.
    pub texture: Option<TextureHandle>,
    /// Multiplies the texture; alpha carries the fade level.
    pub color: [f32; 4],
    pub blend: BlendMode,
    /// Model transform into the horizon frame.
    pub transform: Mat4,
}

/// Receives a landscape's draw commands.
pub trait LandscapePainter {
    fn submit(&mut self, command: DrawCommand);
}

/// Records commands for later playback.
#[derive(Clone, Debug, Default)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Commands drawing the given layer, in submission order.
    pub fn layer(&self, layer: Layer) -> impl Iterator<Item = &DrawCommand> + '_ {
        self.commands.iter().filter(move |c| c.layer == layer)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl LandscapePainter for DrawList {
    fn submit(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }
}

/// Submit a textured command unless its texture is still pending.
pub(crate) fn submit_textured(
    painter: &mut dyn LandscapePainter,
    texture: &TextureHandle,
    command: impl FnOnce(TextureHandle) -> DrawCommand,
) {
    if texture.is_ready() {
        painter.submit(command(texture.clone()));
    } else {
        log::trace!("Skipping draw of pending texture {}", texture.name());
    }
}
