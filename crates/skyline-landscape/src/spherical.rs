//! Landscapes stored as equirectangular panoramas.

use std::sync::Arc;

use glam::DVec3;
use skyline_config::{LandscapeConfig, LandscapeKind};
use skyline_math::{azalt_from_direction, rotate_azimuth};

use crate::base::LandscapeBase;
use crate::brightness::Brightness;
use crate::error::LandscapeError;
use crate::landscape::{Landscape, check_kind, finish_load};
use crate::layers::{MapLayer, MapLayers};
use crate::mesh::sphere_band;
use crate::painter::LandscapePainter;
use crate::projection::equirect_uv;
use crate::texture::{TextureHandle, TextureResolver, resolve_optional, resolve_required};

pub const DEFAULT_ROWS: u32 = 20;
pub const DEFAULT_COLS: u32 = 40;

/// Altitudes of an image's first and last rows, degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Extent {
    pub top_deg: f64,
    pub bottom_deg: f64,
}

impl Extent {
    /// Zenith to nadir.
    pub const FULL: Self = Self {
        top_deg: 90.0,
        bottom_deg: -90.0,
    };

    pub fn new(top_deg: f64, bottom_deg: f64) -> Self {
        Self {
            top_deg,
            bottom_deg,
        }
    }

    fn radians(&self) -> (f64, f64) {
        (self.top_deg.to_radians(), self.bottom_deg.to_radians())
    }
}

impl Default for Extent {
    fn default() -> Self {
        Self::FULL
    }
}

/// Everything a spherical landscape is built from.
#[derive(Clone, Debug)]
pub struct SphericalParams {
    pub map: TextureHandle,
    pub map_extent: Extent,
    pub fog: Option<TextureHandle>,
    pub fog_extent: Extent,
    pub illumination: Option<TextureHandle>,
    pub illumination_extent: Extent,
    /// Azimuth of the image's left border relative to east, degrees.
    pub rotation_deg: f64,
    pub rows: u32,
    pub cols: u32,
    pub radius: f64,
}

impl SphericalParams {
    /// A full-sphere day image with default tessellation.
    pub fn new(map: TextureHandle) -> Self {
        Self {
            map,
            map_extent: Extent::FULL,
            fog: None,
            fog_extent: Extent::FULL,
            illumination: None,
            illumination_extent: Extent::FULL,
            rotation_deg: 0.0,
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            radius: 1.0,
        }
    }
}

/// Equirectangular images mapped onto bands of a sphere.
#[derive(Clone, Debug)]
pub struct SphericalLandscape {
    base: LandscapeBase,
    layers: MapLayers,
    map_extent: Extent,
    /// Radians.
    rotation: f64,
}

impl Default for SphericalLandscape {
    fn default() -> Self {
        Self::new()
    }
}

impl SphericalLandscape {
    pub fn new() -> Self {
        Self {
            base: LandscapeBase::new(1.0),
            layers: MapLayers::default(),
            map_extent: Extent::FULL,
            rotation: 0.0,
        }
    }

    /// Build a landscape directly from its parts.
    pub fn create(name: &str, params: SphericalParams) -> Result<Self, LandscapeError> {
        let mut landscape = Self::new();
        landscape.base.set_radius(params.radius);
        landscape.base.set_identity(name)?;
        landscape.apply(params);
        landscape.base.set_valid(true);
        log::info!("Created spherical landscape '{name}'");
        Ok(landscape)
    }

    /// Altitude range of the day image.
    pub fn map_extent(&self) -> Extent {
        self.map_extent
    }

    fn apply(&mut self, params: SphericalParams) {
        let radius = self.base.radius();
        let (rows, cols) = (params.rows, params.cols);
        let layer = |texture: TextureHandle, extent: Extent| {
            let (top, bottom) = extent.radians();
            MapLayer {
                texture,
                mesh: Arc::new(sphere_band(radius, rows, cols, top, bottom)),
            }
        };
        self.rotation = params.rotation_deg.to_radians();
        self.map_extent = params.map_extent;
        self.layers = MapLayers {
            day: Some(layer(params.map, params.map_extent)),
            fog: params.fog.map(|t| layer(t, params.fog_extent)),
            illumination: params
                .illumination
                .map(|t| layer(t, params.illumination_extent)),
        };
    }

    fn try_load(
        &mut self,
        config: &LandscapeConfig,
        textures: &dyn TextureResolver,
    ) -> Result<(), LandscapeError> {
        check_kind(config, LandscapeKind::Spherical)?;
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
        let extent = |top: f32, bottom: f32| Extent::new(top as f64, bottom as f64);
        let params = SphericalParams {
            map: resolve_required(textures, id, map)?,
            map_extent: extent(section.maptex_top, section.maptex_bottom),
            fog: resolve_optional(textures, id, section.maptex_fog.as_deref()),
            fog_extent: extent(section.maptex_fog_top, section.maptex_fog_bottom),
            illumination: resolve_optional(textures, id, section.maptex_illum.as_deref()),
            illumination_extent: extent(section.maptex_illum_top, section.maptex_illum_bottom),
            rotation_deg: section.angle_rotatez as f64,
            rows: section.tesselation_rows().unwrap_or(DEFAULT_ROWS),
            cols: section.tesselation_cols().unwrap_or(DEFAULT_COLS),
            radius: self.base.radius(),
        };
        self.apply(params);
        Ok(())
    }
}

impl Landscape for SphericalLandscape {
    fn base(&self) -> &LandscapeBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut LandscapeBase {
        &mut self.base
    }

    fn kind(&self) -> LandscapeKind {
        LandscapeKind::Spherical
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
        let Some(image) = self.layers.day.as_ref().and_then(|day| day.texture.get()) else {
            return LandscapeBase::default_opacity(direction);
        };

        let local = rotate_azimuth(direction, -(self.rotation + self.base.z_rotation()));
        let (azimuth, altitude) = azalt_from_direction(local);
        let (top, bottom) = self.map_extent.radians();
        let [u, v] = equirect_uv(azimuth, altitude, top, bottom);
        image.alpha_at(u, v)
    }
}
