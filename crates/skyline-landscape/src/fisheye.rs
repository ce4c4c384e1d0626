//! Landscapes photographed with a fisheye lens pointing at the zenith.

use std::f64::consts::FRAC_PI_2;
use std::sync::Arc;

use glam::DVec3;
use skyline_config::{LandscapeConfig, LandscapeKind};
use skyline_math::{azalt_from_direction, rotate_azimuth};

use crate::base::LandscapeBase;
use crate::brightness::Brightness;
use crate::error::LandscapeError;
use crate::landscape::{Landscape, check_kind, finish_load};
use crate::layers::{MapLayer, MapLayers};
use crate::mesh::fisheye_cap;
use crate::painter::LandscapePainter;
use crate::projection::fisheye_uv;
use crate::texture::{TextureHandle, TextureResolver, resolve_optional, resolve_required};

pub const DEFAULT_ROWS: u32 = 20;
pub const DEFAULT_COLS: u32 = 40;

/// Everything a fisheye landscape is built from.
#[derive(Clone, Debug)]
pub struct FisheyeParams {
    pub map: TextureHandle,
    pub fog: Option<TextureHandle>,
    pub illumination: Option<TextureHandle>,
    /// Field of view covered by the image circle, degrees.
    pub texture_fov_deg: f64,
    /// Azimuth of the image's top border relative to south, degrees.
    pub rotation_deg: f64,
    pub rows: u32,
    pub cols: u32,
    pub radius: f64,
}

impl FisheyeParams {
    /// A full-sphere image with default tessellation.
    pub fn new(map: TextureHandle) -> Self {
        Self {
            map,
            fog: None,
            illumination: None,
            texture_fov_deg: 360.0,
            rotation_deg: 0.0,
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            radius: 1.0,
        }
    }
}

/// A fisheye image mapped onto a cap around the zenith.
#[derive(Clone, Debug)]
pub struct FisheyeLandscape {
    base: LandscapeBase,
    layers: MapLayers,
    /// Radians.
    field_of_view: f64,
    /// Radians.
    rotation: f64,
}

impl Default for FisheyeLandscape {
    fn default() -> Self {
        Self::new()
    }
}

impl FisheyeLandscape {
    pub fn new() -> Self {
        Self {
            base: LandscapeBase::new(1.0),
            layers: MapLayers::default(),
            field_of_view: std::f64::consts::TAU,
            rotation: 0.0,
        }
    }

    /// Build a landscape directly from its parts.
    pub fn create(name: &str, params: FisheyeParams) -> Result<Self, LandscapeError> {
        let mut landscape = Self::new();
        landscape.base.set_radius(params.radius);
        landscape.base.set_identity(name)?;
        landscape.apply(params);
        landscape.base.set_valid(true);
        log::info!("Created fisheye landscape '{name}'");
        Ok(landscape)
    }

    /// Field of view of the image circle, radians.
    pub fn field_of_view(&self) -> f64 {
        self.field_of_view
    }

    fn apply(&mut self, params: FisheyeParams) {
        self.field_of_view = params.texture_fov_deg.clamp(1.0, 360.0).to_radians();
        self.rotation = params.rotation_deg.to_radians();
        let mesh = Arc::new(fisheye_cap(
            self.base.radius(),
            params.rows,
            params.cols,
            self.field_of_view,
        ));
        let layer = |texture: TextureHandle| MapLayer {
            texture,
            mesh: Arc::clone(&mesh),
        };
        self.layers = MapLayers {
            day: Some(layer(params.map)),
            fog: params.fog.map(layer),
            illumination: params.illumination.map(layer),
        };
    }

    fn try_load(
        &mut self,
        config: &LandscapeConfig,
        textures: &dyn TextureResolver,
    ) -> Result<(), LandscapeError> {
        check_kind(config, LandscapeKind::Fisheye)?;
        self.layers = MapLayers::default();
        self.base.load_common(config)?;

        let section = &config.landscape;
        let id = config.id.as_str();
        let Some(map) = &section.maptex else {
            return Err(LandscapeError::MissingKey {
                id: id.to_string(),
                key: "maptex",
            });
        };
        let params = FisheyeParams {
            map: resolve_required(textures, id, map)?,
            fog: resolve_optional(textures, id, section.maptex_fog.as_deref()),
            illumination: resolve_optional(textures, id, section.maptex_illum.as_deref()),
            texture_fov_deg: section.texturefov as f64,
            rotation_deg: section.angle_rotatez as f64,
            rows: section.tesselation_rows().unwrap_or(DEFAULT_ROWS),
            cols: section.tesselation_cols().unwrap_or(DEFAULT_COLS),
            radius: self.base.radius(),
        };
        self.apply(params);
        Ok(())
    }
}

impl Landscape for FisheyeLandscape {
    fn base(&self) -> &LandscapeBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut LandscapeBase {
        &mut self.base
    }

    fn kind(&self) -> LandscapeKind {
        LandscapeKind::Fisheye
    }

    fn load(
        &mut self,
        config: &LandscapeConfig,
        textures: &dyn TextureResolver,
    ) -> Result<(), LandscapeError> {
        let result = self.try_load(config, textures);
        finish_load(&mut self.base, result)
    }

    fn draw(&self, painter: &mut dyn LandscapePainter, brightness: Brightness) {
        if !self.base.is_valid() {
            return;
        }
        let transform = self.base.azimuth_transform(self.rotation);
        self.layers.draw(&self.base, painter, brightness, transform);
        self.base.draw_horizon_line(painter);
    }

    fn opacity(&self, direction: DVec3) -> f32 {
        if !self.base.is_valid() {
            return LandscapeBase::default_opacity(direction);
        }
        if let Some(opacity) = self.base.polygon_opacity(direction) {
            return opacity;
        }
        let Some(day) = &self.layers.day else {
            return LandscapeBase::default_opacity(direction);
        };
        let Some(image) = day.texture.get() else {
            return LandscapeBase::default_opacity(direction);
        };

        let local = rotate_azimuth(direction, -(self.rotation + self.base.z_rotation()));
        let (azimuth, altitude) = azalt_from_direction(local);
        let ([u, v], radius) = fisheye_uv(azimuth, FRAC_PI_2 - altitude, self.field_of_view);
        if radius > 1.0 {
            return 0.0;
        }
        image.alpha_at(u, v)
    }
}
