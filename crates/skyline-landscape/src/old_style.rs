//! Landscapes assembled from photographic side panels around a cylinder,
//! with a ground disk underneath and an optional fog band.

use std::f64::consts::{FRAC_PI_2, TAU};
use std::sync::Arc;

use glam::{DVec3, Mat4};
use skyline_config::{LandscapeConfig, LandscapeKind, SideSpec};
use skyline_math::{azalt_from_direction, rotate_azimuth};

use crate::base::LandscapeBase;
use crate::brightness::Brightness;
use crate::error::LandscapeError;
use crate::landscape::{Landscape, check_kind, finish_load};
use crate::mesh::{CylinderBand, Mesh, cylinder_band, fan_disk};
use crate::painter::{BlendMode, DrawCommand, LandscapePainter, Layer, submit_textured};
use crate::texture::{TextureHandle, TextureResolver, resolve_optional, resolve_required};

/// Cylinder radius of old-style landscapes.
pub const DEFAULT_RADIUS: f64 = 2.0;

/// Total slices around the cylinder, shared out among the panels.
const TOTAL_SLICES: usize = 192;
const FOG_SLICES: u32 = 64;
const GROUND_INNER_SLICES: u32 = 4;
const GROUND_LEVELS: u32 = 5;

#[derive(Clone, Copy, Debug, PartialEq)]
enum Placement {
    /// Rings evenly spaced in altitude (radians).
    Angular { bottom: f64, top: f64 },
    /// Rings evenly spaced in height on the cylinder.
    Linear { bottom: f64, top: f64 },
}

/// Vertical placement of the side panels on the cylinder.
///
/// Calibrated panoramas map their rows to true altitudes. Uncalibrated ones
/// keep the historical placement, where the band starts at `r·f(shift)` and
/// is `r·f(alt)` tall (`f` is `tan` for cylindrical panoramas and `sin`
/// otherwise), which only approximates the photographed altitudes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SideGeometry {
    radius: f64,
    stacks: u32,
    placement: Placement,
}

impl SideGeometry {
    /// `angle_shift` and `alt_angle` in degrees.
    pub fn new(
        radius: f64,
        calibrated: bool,
        tan_mode: bool,
        angle_shift: f64,
        alt_angle: f64,
        stacks: u32,
    ) -> Self {
        let shift = angle_shift.to_radians();
        let alt = alt_angle.to_radians();
        let placement = match (calibrated, tan_mode) {
            (true, false) => Placement::Angular {
                bottom: shift,
                top: shift + alt,
            },
            (true, true) => Placement::Linear {
                bottom: radius * shift.tan(),
                top: radius * (shift + alt).tan(),
            },
            (false, tan_mode) => {
                let f = |a: f64| if tan_mode { a.tan() } else { a.sin() };
                let bottom = radius * f(shift);
                Placement::Linear {
                    bottom,
                    top: bottom + radius * f(alt),
                }
            }
        };
        Self {
            radius,
            stacks: stacks.max(1),
            placement,
        }
    }

    pub fn stacks(&self) -> u32 {
        self.stacks
    }

    /// Heights of the panel rings, bottom to top.
    pub fn ring_heights(&self) -> Vec<f64> {
        (0..=self.stacks)
            .map(|k| {
                let t = k as f64 / self.stacks as f64;
                match self.placement {
                    Placement::Angular { bottom, top } => {
                        self.radius * (bottom + (top - bottom) * t).tan()
                    }
                    Placement::Linear { bottom, top } => bottom + (top - bottom) * t,
                }
            })
            .collect()
    }

    /// Where a direction of the given altitude meets the band: 0 at the
    /// bottom ring, 1 at the top, outside `[0, 1]` beyond it.
    pub fn band_fraction(&self, altitude: f64) -> f64 {
        let (value, bottom, top) = match self.placement {
            Placement::Angular { bottom, top } => (altitude, bottom, top),
            Placement::Linear { bottom, top } => {
                if altitude >= FRAC_PI_2 {
                    return f64::INFINITY;
                }
                if altitude <= -FRAC_PI_2 {
                    return f64::NEG_INFINITY;
                }
                (self.radius * altitude.tan(), bottom, top)
            }
        };
        if (top - bottom).abs() < f64::EPSILON {
            return if value < bottom {
                f64::NEG_INFINITY
            } else {
                f64::INFINITY
            };
        }
        (value - bottom) / (top - bottom)
    }
}

#[derive(Clone, Debug)]
struct SideTexture {
    day: TextureHandle,
    light: Option<TextureHandle>,
}

#[derive(Clone, Debug)]
struct Panel {
    side: usize,
    mesh: Arc<Mesh>,
}

#[derive(Clone, Debug)]
struct TexturedMesh {
    texture: TextureHandle,
    mesh: Arc<Mesh>,
}

/// Side panels on a cylinder, ground disk and fog band.
#[derive(Clone, Debug)]
pub struct OldStyleLandscape {
    base: LandscapeBase,
    side_textures: Vec<SideTexture>,
    sides: Vec<SideSpec>,
    panels: Vec<Panel>,
    geometry: SideGeometry,
    ground: Option<TexturedMesh>,
    fog: Option<TexturedMesh>,
    /// Load-time rotation of the panels, radians.
    decor_rotation: f64,
    /// Load-time rotation of the ground disk, radians.
    ground_rotation: f64,
    draw_ground_first: bool,
    calibrated: bool,
}

impl Default for OldStyleLandscape {
    fn default() -> Self {
        Self::new()
    }
}

impl OldStyleLandscape {
    pub fn new() -> Self {
        Self {
            base: LandscapeBase::new(DEFAULT_RADIUS),
            side_textures: Vec::new(),
            sides: Vec::new(),
            panels: Vec::new(),
            geometry: SideGeometry::new(DEFAULT_RADIUS, false, false, 0.0, 0.0, 1),
            ground: None,
            fog: None,
            decor_rotation: 0.0,
            ground_rotation: 0.0,
            draw_ground_first: false,
            calibrated: false,
        }
    }

    /// Vertical placement of the side panels.
    pub fn side_geometry(&self) -> &SideGeometry {
        &self.geometry
    }

    /// Number of panels around the cylinder, repeats included.
    pub fn panel_count(&self) -> usize {
        self.panels.len()
    }

    fn try_load(
        &mut self,
        config: &LandscapeConfig,
        textures: &dyn TextureResolver,
    ) -> Result<(), LandscapeError> {
        check_kind(config, LandscapeKind::OldStyle)?;
        self.base.load_common(config)?;
        self.panels.clear();
        self.side_textures.clear();
        self.ground = None;
        self.fog = None;

        let section = &config.landscape;
        let id = config.id.as_str();
        let radius = self.base.radius();
        if section.side_textures.is_empty() {
            return Err(LandscapeError::MissingKey {
                id: id.to_string(),
                key: "side_textures",
            });
        }
        if section.sides.is_empty() {
            return Err(LandscapeError::MissingKey {
                id: id.to_string(),
                key: "sides",
            });
        }

        let mut side_textures = Vec::with_capacity(section.side_textures.len());
        for (index, name) in section.side_textures.iter().enumerate() {
            let day = resolve_required(textures, id, name)?;
            let light = resolve_optional(
                textures,
                id,
                section.light_textures.get(&index).map(String::as_str),
            );
            side_textures.push(SideTexture { day, light });
        }
        for (side, spec) in section.sides.iter().enumerate() {
            if spec.texture >= side_textures.len() {
                return Err(LandscapeError::InvalidSide {
                    side,
                    texture: spec.texture,
                    available: side_textures.len(),
                });
            }
        }

        self.calibrated = section.calibrated;
        let repeat = section.decor_repeat() as usize;
        let panel_count = section.sides.len() * repeat;
        let stacks = section
            .tesselation_rows()
            .unwrap_or(if self.calibrated { 16 } else { 8 });
        let total_slices = section
            .tesselation_cols()
            .map_or(TOTAL_SLICES, |cols| cols as usize);
        let slices = (total_slices / panel_count).max(1) as u32;

        self.geometry = SideGeometry::new(
            radius,
            self.calibrated,
            section.tan_mode,
            section.decor_angle_shift as f64,
            section.decor_alt_angle as f64,
            stacks,
        );
        let heights = self.geometry.ring_heights();
        let span = TAU / panel_count as f64;
        for index in 0..panel_count {
            let side = index % section.sides.len();
            let [x0, y0, x1, y1] = section.sides[side].tex_coords.map(f64::from);
            let mesh = cylinder_band(&CylinderBand {
                radius,
                start_azimuth: FRAC_PI_2 + span * index as f64,
                azimuth_span: span,
                slices,
                heights: &heights,
                uv_rect: [x0, 1.0 - y0, x1, 1.0 - y1],
            });
            self.panels.push(Panel {
                side,
                mesh: Arc::new(mesh),
            });
        }
        self.sides = section.sides.clone();
        self.side_textures = side_textures;

        let vertical = |angle: f32| {
            let a = (angle as f64).to_radians();
            if section.tan_mode || self.calibrated {
                radius * a.tan()
            } else {
                radius * a.sin()
            }
        };

        if let Some(texture) = resolve_optional(textures, id, section.groundtex.as_deref()) {
            let z = vertical(section.ground_angle_shift);
            self.ground = Some(TexturedMesh {
                texture,
                mesh: Arc::new(fan_disk(radius, GROUND_INNER_SLICES, GROUND_LEVELS, z)),
            });
        }

        if let Some(texture) = resolve_optional(textures, id, section.fogtex.as_deref()) {
            let shift = (section.fog_angle_shift as f64).to_radians();
            let alt = (section.fog_alt_angle as f64).to_radians();
            let height = if self.calibrated {
                radius * ((shift + alt).tan() - shift.tan())
            } else if section.tan_mode {
                radius * alt.tan()
            } else {
                radius * alt.sin()
            };
            let bottom = vertical(section.fog_angle_shift);
            let mesh = cylinder_band(&CylinderBand {
                radius,
                start_azimuth: FRAC_PI_2,
                azimuth_span: TAU,
                slices: FOG_SLICES,
                heights: &[bottom, bottom + height],
                uv_rect: [0.0, 1.0, 1.0, 0.0],
            });
            self.fog = Some(TexturedMesh {
                texture,
                mesh: Arc::new(mesh),
            });
        }

        self.decor_rotation = (section.decor_angle_rotatez as f64).to_radians();
        self.ground_rotation = (section.ground_angle_rotatez as f64).to_radians();
        self.draw_ground_first = section.draw_ground_first;

        log::debug!(
            "Old-style landscape '{id}': {panel_count} panels, {slices} slices, {} stacks",
            self.geometry.stacks()
        );
        Ok(())
    }

    fn draw_decor(&self, painter: &mut dyn LandscapePainter, brightness: Brightness, level: f32) {
        let transform = self.base.azimuth_transform(self.decor_rotation);
        let b = brightness.land;
        for panel in &self.panels {
            let texture = &self.side_textures[self.sides[panel.side].texture];
            submit_textured(painter, &texture.day, |t| DrawCommand {
                layer: Layer::Decor,
                mesh: Arc::clone(&panel.mesh),
                texture: Some(t),
                color: [b, b, b, level],
                blend: BlendMode::Alpha,
                transform,
            });
        }

        let lights = brightness.light_pollution;
        if lights <= 0.0 {
            return;
        }
        for panel in &self.panels {
            let texture = &self.side_textures[self.sides[panel.side].texture];
            if let Some(light) = &texture.light {
                submit_textured(painter, light, |t| DrawCommand {
                    layer: Layer::Illumination,
                    mesh: Arc::clone(&panel.mesh),
                    texture: Some(t),
                    color: [lights, lights, lights, level],
                    blend: BlendMode::AdditiveAlpha,
                    transform,
                });
            }
        }
    }

    fn draw_ground(&self, painter: &mut dyn LandscapePainter, brightness: Brightness, level: f32) {
        let Some(ground) = &self.ground else {
            return;
        };
        let b = brightness.land;
        let transform =
            Mat4::from_rotation_z((self.ground_rotation - self.base.z_rotation()) as f32);
        submit_textured(painter, &ground.texture, |t| DrawCommand {
            layer: Layer::Ground,
            mesh: Arc::clone(&ground.mesh),
            texture: Some(t),
            color: [b, b, b, level],
            blend: BlendMode::Alpha,
            transform,
        });
    }

    fn draw_fog(&self, painter: &mut dyn LandscapePainter, brightness: Brightness) {
        let Some(fog) = &self.fog else {
            return;
        };
        let level = self.base.fog_fader().level();
        if level <= 0.0 {
            return;
        }
        let c = level * (0.1 + 0.1 * brightness.land);
        let transform = if self.calibrated {
            self.base.azimuth_transform(self.decor_rotation)
        } else {
            Mat4::IDENTITY
        };
        submit_textured(painter, &fog.texture, |t| DrawCommand {
            layer: Layer::Fog,
            mesh: Arc::clone(&fog.mesh),
            texture: Some(t),
            color: [c, c, c, level],
            blend: BlendMode::Additive,
            transform,
        });
    }
}

impl Landscape for OldStyleLandscape {
    fn base(&self) -> &LandscapeBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut LandscapeBase {
        &mut self.base
    }

    fn kind(&self) -> LandscapeKind {
        LandscapeKind::OldStyle
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
        let level = self.base.land_fader().level();
        if level > 0.0 {
            if self.draw_ground_first {
                self.draw_ground(painter, brightness, level);
            }
            self.draw_decor(painter, brightness, level);
            if !self.draw_ground_first {
                self.draw_ground(painter, brightness, level);
            }
        }
        self.draw_fog(painter, brightness);
        self.base.draw_horizon_line(painter);
    }

    fn opacity(&self, direction: DVec3) -> f32 {
        if !self.base.is_valid() || self.panels.is_empty() {
            return LandscapeBase::default_opacity(direction);
        }
        if let Some(opacity) = self.base.polygon_opacity(direction) {
            return opacity;
        }

        let local = rotate_azimuth(direction, -(self.decor_rotation + self.base.z_rotation()));
        let (azimuth, altitude) = azalt_from_direction(local);
        let t = self.geometry.band_fraction(altitude);
        if t < 0.0 {
            return 1.0;
        }
        if t > 1.0 {
            return 0.0;
        }

        let span = TAU / self.panels.len() as f64;
        let position = (azimuth - FRAC_PI_2).rem_euclid(TAU) / span;
        let index = (position.floor() as usize).min(self.panels.len() - 1);
        let fraction = position - index as f64;
        let spec = &self.sides[self.panels[index].side];
        let [x0, y0, x1, y1] = spec.tex_coords.map(f64::from);
        let u = x0 + (x1 - x0) * fraction;
        let v = 1.0 - (y0 + (y1 - y0) * t);
        match self.side_textures[spec.texture].day.get() {
            Some(image) => image.alpha_at(u, v),
            None => LandscapeBase::default_opacity(direction),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::painter::DrawList;
    use crate::texture::{MemoryTextures, TextureImage};
    use skyline_config::LandscapeSection;
    use skyline_math::direction_from_azalt;
    use std::collections::BTreeMap;

    /// Opaque lower half, transparent upper half.
    fn half_image() -> TextureImage {
        TextureImage::from_fn(8, 8, |_, y| [90, 90, 90, if y >= 4 { 255 } else { 0 }])
    }

    fn textures() -> MemoryTextures {
        let mut textures = MemoryTextures::new();
        textures.insert("side0.png", half_image());
        textures.insert("side1.png", half_image());
        textures.insert("light0.png", TextureImage::filled(2, 2, [255, 200, 100, 255]));
        textures.insert("ground.png", TextureImage::filled(2, 2, [40, 60, 20, 255]));
        textures.insert("fog.png", TextureImage::filled(2, 2, [128, 128, 128, 128]));
        textures
    }

    fn config() -> LandscapeConfig {
        LandscapeConfig {
            id: "hill".to_string(),
            landscape: LandscapeSection {
                kind: LandscapeKind::OldStyle,
                name: "Hill".to_string(),
                side_textures: vec!["side0.png".to_string(), "side1.png".to_string()],
                light_textures: BTreeMap::from([(0, "light0.png".to_string())]),
                sides: vec![
                    SideSpec {
                        texture: 0,
                        tex_coords: [0.0, 0.0, 1.0, 1.0],
                    },
                    SideSpec {
                        texture: 1,
                        tex_coords: [0.0, 0.0, 1.0, 1.0],
                    },
                ],
                nb_decor_repeat: 2,
                groundtex: Some("ground.png".to_string()),
                fogtex: Some("fog.png".to_string()),
                fog_alt_angle: 10.0,
                decor_alt_angle: 20.0,
                decor_angle_shift: 0.0,
                calibrated: true,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn loaded() -> OldStyleLandscape {
        let mut landscape = OldStyleLandscape::new();
        landscape.load(&config(), &textures()).unwrap();
        landscape.base_mut().set_flag_show(true);
        landscape.base_mut().set_flag_show_fog(true);
        landscape.update(1.0);
        landscape
    }

    #[test]
    fn test_calibrated_and_historical_placement_differ() {
        let calibrated = SideGeometry::new(2.0, true, false, -5.0, 30.0, 8);
        let historical = SideGeometry::new(2.0, false, false, -5.0, 30.0, 8);
        let a = calibrated.ring_heights();
        let b = historical.ring_heights();
        assert_eq!(a.len(), b.len());
        assert!((a[0] - 2.0 * (-5f64).to_radians().tan()).abs() < 1e-12);
        assert!((b[0] - 2.0 * (-5f64).to_radians().sin()).abs() < 1e-12);
        let top_historical = 2.0 * (-5f64).to_radians().sin() + 2.0 * 30f64.to_radians().sin();
        assert!((b[8] - top_historical).abs() < 1e-12);
        assert!((a[8] - 2.0 * 25f64.to_radians().tan()).abs() < 1e-12);
        assert!(a.iter().zip(&b).any(|(x, y)| (x - y).abs() > 1e-3));
    }

    #[test]
    fn test_calibrated_tan_mode_is_linear() {
        let geometry = SideGeometry::new(1.0, true, true, 0.0, 45.0, 4);
        let heights = geometry.ring_heights();
        assert!((heights[2] - 0.5).abs() < 1e-12);
        assert!((geometry.band_fraction(45f64.to_radians()) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_band_fraction_inverts_angular_placement() {
        let geometry = SideGeometry::new(2.0, true, false, -10.0, 40.0, 16);
        assert!((geometry.band_fraction(-10f64.to_radians())).abs() < 1e-12);
        assert!((geometry.band_fraction(10f64.to_radians()) - 0.5).abs() < 1e-12);
        assert!(geometry.band_fraction(-30f64.to_radians()) < 0.0);
        assert!(geometry.band_fraction(45f64.to_radians()) > 1.0);
    }

    #[test]
    fn test_load_builds_panels() {
        let landscape = loaded();
        assert!(landscape.is_valid());
        assert_eq!(landscape.panel_count(), 4);
        assert_eq!(landscape.side_geometry().stacks(), 16);
        let panel = &landscape.panels[0].mesh;
        // 192 / 4 slices, 16 stacks.
        assert_eq!(panel.vertices.len(), 49 * 17);
    }

    #[test]
    fn test_tessellation_overrides() {
        let mut cfg = config();
        cfg.landscape.tesselate_rows = Some(3);
        cfg.landscape.tesselate_cols = Some(8);
        let mut landscape = OldStyleLandscape::new();
        landscape.load(&cfg, &textures()).unwrap();
        assert_eq!(landscape.side_geometry().stacks(), 3);
        assert_eq!(landscape.panels[0].mesh.vertices.len(), 3 * 4);
    }

    #[test]
    fn test_oversized_repeat_is_clamped() {
        let mut cfg = config();
        cfg.landscape.nb_decor_repeat = u32::MAX;
        let mut landscape = OldStyleLandscape::new();
        landscape.load(&cfg, &textures()).unwrap();
        assert_eq!(
            landscape.panel_count(),
            2 * skyline_config::MAX_DECOR_REPEAT as usize
        );
        assert_eq!(landscape.panels[0].mesh.vertices.len(), 2 * 17);
    }

    #[test]
    fn test_draw_order_and_colors() {
        let landscape = loaded();
        let mut list = DrawList::new();
        let brightness = Brightness {
            land: 0.5,
            light_pollution: 0.0,
        };
        landscape.draw(&mut list, brightness);
        let layers: Vec<Layer> = list.commands().iter().map(|c| c.layer).collect();
        assert_eq!(
            layers,
            vec![
                Layer::Decor,
                Layer::Decor,
                Layer::Decor,
                Layer::Decor,
                Layer::Ground,
                Layer::Fog
            ]
        );
        assert_eq!(list.commands()[0].color, [0.5, 0.5, 0.5, 1.0]);
        let fog = list.layer(Layer::Fog).next().unwrap();
        assert!((fog.color[0] - 0.15).abs() < 1e-6);
        assert_eq!(fog.blend, BlendMode::Additive);
    }

    #[test]
    fn test_ground_first_and_night_lights() {
        let mut cfg = config();
        cfg.landscape.draw_ground_first = true;
        let mut landscape = OldStyleLandscape::new();
        landscape.load(&cfg, &textures()).unwrap();
        landscape.base_mut().set_flag_show(true);
        landscape.update(1.0);

        let mut list = DrawList::new();
        landscape.draw(
            &mut list,
            Brightness {
                land: 0.1,
                light_pollution: 0.8,
            },
        );
        assert_eq!(list.commands()[0].layer, Layer::Ground);
        // Only the two panels showing side texture 0 have lights.
        let lights: Vec<_> = list.layer(Layer::Illumination).collect();
        assert_eq!(lights.len(), 2);
        assert_eq!(lights[0].color, [0.8, 0.8, 0.8, 1.0]);
        assert_eq!(lights[0].blend, BlendMode::AdditiveAlpha);
        assert_eq!(list.layer(Layer::Fog).count(), 0);
    }

    #[test]
    fn test_hidden_landscape_draws_nothing() {
        let mut landscape = OldStyleLandscape::new();
        landscape.load(&config(), &textures()).unwrap();
        let mut list = DrawList::new();
        landscape.draw(&mut list, Brightness::default());
        assert!(list.is_empty());
    }

    #[test]
    fn test_opacity_samples_side_alpha() {
        let landscape = loaded();
        let az = 100f64.to_radians();
        assert_eq!(landscape.opacity(direction_from_azalt(az, 5f64.to_radians())), 1.0);
        assert_eq!(landscape.opacity(direction_from_azalt(az, 15f64.to_radians())), 0.0);
        assert_eq!(landscape.opacity(direction_from_azalt(az, -5f64.to_radians())), 1.0);
        assert_eq!(landscape.opacity(direction_from_azalt(az, 40f64.to_radians())), 0.0);
    }

    #[test]
    fn test_opacity_follows_rotation() {
        let mut cfg = config();
        // Transparent panel texture on side 1 only.
        let mut textures = textures();
        textures.insert("side1.png", TextureImage::filled(4, 4, [0, 0, 0, 0]));
        cfg.landscape.nb_decor_repeat = 1;
        let mut landscape = OldStyleLandscape::new();
        landscape.load(&cfg, &textures).unwrap();

        // Side 0 spans azimuth 90°..270°, side 1 the rest.
        let low_south = direction_from_azalt(180f64.to_radians(), 5f64.to_radians());
        assert_eq!(landscape.opacity(low_south), 1.0);
        landscape.base_mut().set_z_rotation(180.0);
        assert_eq!(landscape.opacity(low_south), 0.0);
    }

    #[test]
    fn test_missing_side_texture_invalidates() {
        let mut cfg = config();
        cfg.landscape.side_textures[1] = "absent.png".to_string();
        let mut landscape = OldStyleLandscape::new();
        let result = landscape.load(&cfg, &textures());
        assert!(matches!(result, Err(LandscapeError::TextureUnavailable { .. })));
        assert!(!landscape.is_valid());
        let up = direction_from_azalt(0.0, 0.3);
        assert_eq!(landscape.opacity(up), 0.0);
        assert_eq!(landscape.opacity(-up), 1.0);
    }

    #[test]
    fn test_side_referencing_unknown_texture() {
        let mut cfg = config();
        cfg.landscape.sides[1].texture = 5;
        let mut landscape = OldStyleLandscape::new();
        let result = landscape.load(&cfg, &textures());
        assert!(matches!(result, Err(LandscapeError::InvalidSide { side: 1, .. })));
    }

    #[test]
    fn test_missing_optional_layers() {
        let mut cfg = config();
        cfg.landscape.fogtex = Some("nofog.png".to_string());
        cfg.landscape.groundtex = None;
        let mut landscape = OldStyleLandscape::new();
        landscape.load(&cfg, &textures()).unwrap();
        assert!(landscape.fog.is_none());
        assert!(landscape.ground.is_none());
    }

    #[test]
    fn test_pending_side_texture_skips_draw_and_sampling() {
        let mut textures = textures();
        textures.insert_pending("side1.png");
        let mut landscape = OldStyleLandscape::new();
        landscape.load(&config(), &textures).unwrap();
        landscape.base_mut().set_flag_show(true);
        landscape.update(1.0);

        let mut list = DrawList::new();
        landscape.draw(&mut list, Brightness::default());
        assert_eq!(list.layer(Layer::Decor).count(), 2);

        // Panel 1 covers azimuth 180°..270° and shows side texture 1.
        let pending_dir = direction_from_azalt(200f64.to_radians(), 15f64.to_radians());
        assert_eq!(landscape.opacity(pending_dir), 0.0);
    }
}
