//! Day, fog and night-light image layers shared by the fisheye and
//! spherical projections.

use std::sync::Arc;

use glam::Mat4;

use crate::base::LandscapeBase;
use crate::brightness::Brightness;
use crate::mesh::Mesh;
use crate::painter::{BlendMode, DrawCommand, LandscapePainter, Layer, submit_textured};
use crate::texture::TextureHandle;

/// An image and the mesh it is drawn on.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct MapLayer {
    pub texture: TextureHandle,
    pub mesh: Arc<Mesh>,
}

/// The layers of one image-mapped landscape.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct MapLayers {
    pub day: Option<MapLayer>,
    pub fog: Option<MapLayer>,
    pub illumination: Option<MapLayer>,
}

impl MapLayers {
    /// Submit the day image, fog and night lights, each skipped while
    /// faded out or not loaded.
    pub fn draw(
        &self,
        base: &LandscapeBase,
        painter: &mut dyn LandscapePainter,
        brightness: Brightness,
        transform: Mat4,
    ) {
        let land = base.land_fader().level();
        let fog = base.fog_fader().level();
        let b = brightness.land;

        if land > 0.0
            && let Some(day) = &self.day
        {
            submit_textured(painter, &day.texture, |t| DrawCommand {
                layer: Layer::Decor,
                mesh: Arc::clone(&day.mesh),
                texture: Some(t),
                color: [b, b, b, land],
                blend: BlendMode::Alpha,
                transform,
            });
        }

        if fog > 0.0
            && let Some(layer) = &self.fog
        {
            let c = fog * (0.1 + 0.1 * b);
            submit_textured(painter, &layer.texture, |t| DrawCommand {
                layer: Layer::Fog,
                mesh: Arc::clone(&layer.mesh),
                texture: Some(t),
                color: [c, c, c, fog],
                blend: BlendMode::Additive,
                transform,
            });
        }

        let lights = brightness.light_pollution;
        if land > 0.0
            && lights > 0.0
            && let Some(layer) = &self.illumination
        {
            submit_textured(painter, &layer.texture, |t| DrawCommand {
                layer: Layer::Illumination,
                mesh: Arc::clone(&layer.mesh),
                texture: Some(t),
                color: [lights, lights, lights, land],
                blend: BlendMode::AdditiveAlpha,
                transform,
            });
        }
    }
}
