//! State every landscape projection shares.

use std::sync::Arc;

use glam::{DVec3, Mat4};
use skyline_config::{AtmosphereDefaults, LandscapeConfig, Location};
use skyline_math::{SphericalPolygon, rotate_azimuth};

use crate::brightness::Brightness;
use crate::error::LandscapeError;
use crate::fader::Fader;
use crate::horizon_list::HorizonListMode;
use crate::horizon_polygon::load_horizon_polygon;
use crate::mesh::{Mesh, outline_strip};
use crate::painter::{BlendMode, DrawCommand, Layer, LandscapePainter};

/// Great-circle pieces per horizon polygon edge when drawn.
const OUTLINE_SEGMENTS: usize = 4;

/// Identity, metadata, fades and the optional measured horizon of a
/// landscape. Projections hold one by composition.
#[derive(Clone, Debug)]
pub struct LandscapeBase {
    id: String,
    name: String,
    author: String,
    description: String,
    radius: f64,
    location: Option<Location>,
    atmosphere: AtmosphereDefaults,
    minimal_brightness: Option<f32>,
    land_fader: Fader,
    fog_fader: Fader,
    horizon_polygon: Option<SphericalPolygon>,
    horizon_line_color: Option<[f32; 3]>,
    horizon_outline: Option<Arc<Mesh>>,
    /// Runtime azimuth rotation, radians.
    z_rotation: f64,
    brightness: Brightness,
    valid: bool,
}

impl LandscapeBase {
    /// Empty, invalid state for a landscape drawn on a sphere of `radius`.
    pub fn new(radius: f64) -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            author: String::new(),
            description: String::new(),
            radius,
            location: None,
            atmosphere: AtmosphereDefaults::default(),
            minimal_brightness: None,
            land_fader: Fader::default(),
            fog_fader: Fader::default(),
            horizon_polygon: None,
            horizon_line_color: None,
            horizon_outline: None,
            z_rotation: 0.0,
            brightness: Brightness::default(),
            valid: false,
        }
    }

    /// Read the settings every projection shares. Fades, runtime rotation
    /// and brightness survive a reload; everything else is replaced.
    pub fn load_common(&mut self, config: &LandscapeConfig) -> Result<(), LandscapeError> {
        let section = &config.landscape;
        self.valid = false;
        self.id = config.id.clone();
        self.name = section.name.trim().to_string();
        self.author = section.author.clone();
        self.description = section.display_description();
        self.location = None;
        self.atmosphere = AtmosphereDefaults::default();
        self.horizon_polygon = None;
        self.horizon_outline = None;
        self.horizon_line_color = None;

        if self.name.is_empty() {
            return Err(LandscapeError::MissingName {
                id: self.id.clone(),
            });
        }
        if self.radius <= 0.0 {
            return Err(LandscapeError::InvalidRadius(self.radius));
        }

        if let Some(location) = &config.location {
            self.location = Some(location.to_location(&self.name));
            self.atmosphere = location.atmosphere();
        }
        self.minimal_brightness = section.minimal_brightness();

        if let Some(list) = &section.polygonal_horizon_list {
            let mode = HorizonListMode::from_name_or_default(&section.polygonal_horizon_list_mode);
            let rotation = (section.polygonal_angle_rotatez as f64).to_radians();
            let path = config.resolve_path(list);
            self.horizon_polygon = load_horizon_polygon(&path, mode, rotation);
        }
        self.horizon_line_color = section.horizon_line_color();
        if self.horizon_line_color.is_some()
            && let Some(polygon) = &self.horizon_polygon
        {
            self.horizon_outline = Some(Arc::new(outline_strip(
                polygon,
                self.radius,
                OUTLINE_SEGMENTS,
            )));
        }

        log::info!("Loaded landscape '{}' ({})", self.name, self.id);
        Ok(())
    }

    /// Identity for programmatically built landscapes.
    pub(crate) fn set_identity(&mut self, name: &str) -> Result<(), LandscapeError> {
        self.valid = false;
        self.name = name.trim().to_string();
        self.id = self.name.clone();
        if self.name.is_empty() {
            return Err(LandscapeError::MissingName {
                id: self.id.clone(),
            });
        }
        if self.radius <= 0.0 {
            return Err(LandscapeError::InvalidRadius(self.radius));
        }
        Ok(())
    }

    pub(crate) fn set_radius(&mut self, radius: f64) {
        self.radius = radius;
    }

    pub(crate) fn set_valid(&mut self, valid: bool) {
        self.valid = valid;
    }

    /// Opacity when nothing better is known: solid below the mathematical
    /// horizon, clear above it.
    pub fn default_opacity(direction: DVec3) -> f32 {
        if direction.z < 0.0 { 1.0 } else { 0.0 }
    }

    /// Containment in the measured horizon, if there is one.
    pub fn polygon_opacity(&self, direction: DVec3) -> Option<f32> {
        let polygon = self.horizon_polygon.as_ref()?;
        let local = rotate_azimuth(direction, -self.z_rotation);
        Some(if polygon.contains(local) { 1.0 } else { 0.0 })
    }

    /// Stroke the measured horizon if it has a line color.
    pub fn draw_horizon_line(&self, painter: &mut dyn LandscapePainter) {
        let (Some(mesh), Some([r, g, b])) = (&self.horizon_outline, self.horizon_line_color) else {
            return;
        };
        let level = self.land_fader.level();
        if level <= 0.0 {
            return;
        }
        painter.submit(DrawCommand {
            layer: Layer::HorizonLine,
            mesh: Arc::clone(mesh),
            texture: None,
            color: [r, g, b, level],
            blend: BlendMode::Alpha,
            transform: self.azimuth_transform(0.0),
        });
    }

    /// Transform turning local geometry by `rotation` plus the runtime
    /// rotation, both growing compass azimuth.
    pub fn azimuth_transform(&self, rotation: f64) -> Mat4 {
        Mat4::from_rotation_z(-(rotation + self.z_rotation) as f32)
    }

    pub fn update(&mut self, dt: f32) {
        self.land_fader.update(dt);
        self.fog_fader.update(dt);
    }

    pub fn set_brightness(&mut self, land: f32, light_pollution: f32) {
        self.brightness = Brightness {
            land,
            light_pollution,
        };
    }

    pub fn brightness(&self) -> Brightness {
        self.brightness
    }

    pub fn set_flag_show(&mut self, shown: bool) {
        self.land_fader.set_shown(shown);
    }

    pub fn flag_show(&self) -> bool {
        self.land_fader.is_shown()
    }

    pub fn set_flag_show_fog(&mut self, shown: bool) {
        self.fog_fader.set_shown(shown);
    }

    pub fn flag_show_fog(&self) -> bool {
        self.fog_fader.is_shown()
    }

    pub fn is_fully_visible(&self) -> bool {
        self.land_fader.is_fully_on()
    }

    pub fn set_fade_duration(&mut self, seconds: f32) {
        self.land_fader.set_duration(seconds);
        self.fog_fader.set_duration(seconds);
    }

    pub fn land_fader(&self) -> &Fader {
        &self.land_fader
    }

    pub fn fog_fader(&self) -> &Fader {
        &self.fog_fader
    }

    /// Runtime azimuth rotation, in degrees.
    pub fn set_z_rotation(&mut self, degrees: f64) {
        self.z_rotation = degrees.to_radians();
    }

    /// Runtime azimuth rotation, in radians.
    pub fn z_rotation(&self) -> f64 {
        self.z_rotation
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }

    pub fn has_location(&self) -> bool {
        self.location.as_ref().is_some_and(|l| !l.planet.is_empty())
    }

    pub fn atmosphere(&self) -> &AtmosphereDefaults {
        &self.atmosphere
    }

    /// Brightness floor the landscape asks for.
    pub fn minimal_brightness(&self) -> Option<f32> {
        self.minimal_brightness
    }

    pub fn horizon_polygon(&self) -> Option<&SphericalPolygon> {
        self.horizon_polygon.as_ref()
    }

    pub fn horizon_line_color(&self) -> Option<[f32; 3]> {
        self.horizon_line_color
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }
}
