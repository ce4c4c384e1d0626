//! Per-landscape description (`landscape.ron`), and interpretation of the
//! flat `section/key` maps older landscape packages ship.
//!
//! Raw fields keep the historical sentinel encoding (`-1`, `-1000`, `-2`) so
//! existing packages read unchanged; the typed accessors translate them to
//! `Option`s and nothing past this crate sees a sentinel.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use skyline_math::parse_dec_angle;

use crate::error::ConfigError;

/// File name of a landscape description inside its directory.
pub const LANDSCAPE_FILE: &str = "landscape.ron";

/// Most side textures, and most sides, a key map may declare.
pub const MAX_SIDES: usize = 256;
/// Most repetitions of the side panels around the horizon.
pub const MAX_DECOR_REPEAT: u32 = 64;
/// Most rows or columns a landscape mesh is tessellated into.
pub const MAX_TESSELATION: u32 = 1024;

/// Which projection a landscape uses.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum LandscapeKind {
    /// Multi-panel cylinder with separate ground and fog.
    #[default]
    OldStyle,
    /// Measured horizon line filled with a flat color.
    Polygonal,
    /// Single zenith-centred fisheye image.
    Fisheye,
    /// Equirectangular panorama.
    Spherical,
}

impl LandscapeKind {
    /// Name used in landscape descriptions.
    pub fn as_str(self) -> &'static str {
        match self {
            LandscapeKind::OldStyle => "old_style",
            LandscapeKind::Polygonal => "polygonal",
            LandscapeKind::Fisheye => "fisheye",
            LandscapeKind::Spherical => "spherical",
        }
    }
}

impl fmt::Display for LandscapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LandscapeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "old_style" => Ok(LandscapeKind::OldStyle),
            "polygonal" => Ok(LandscapeKind::Polygonal),
            "fisheye" => Ok(LandscapeKind::Fisheye),
            "spherical" => Ok(LandscapeKind::Spherical),
            other => Err(format!("unknown landscape type '{other}'")),
        }
    }
}

/// One side panel of an old-style landscape: which side texture it shows
/// and the sub-rectangle `[x0, y0, x1, y1]` of that texture (y up).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SideSpec {
    /// Index into [`LandscapeSection::side_textures`].
    pub texture: usize,
    /// Texture rectangle, GL convention (0 at the bottom edge).
    pub tex_coords: [f32; 4],
}

impl Default for SideSpec {
    fn default() -> Self {
        Self {
            texture: 0,
            tex_coords: [0.0, 0.0, 1.0, 1.0],
        }
    }
}

impl FromStr for SideSpec {
    type Err = String;

    /// Parse the `texN:x0:y0:x1:y1` form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split(':').collect();
        if parts.len() != 5 {
            return Err(format!("expected texN:x0:y0:x1:y1, got '{s}'"));
        }
        let texture = parts[0]
            .strip_prefix("tex")
            .and_then(|n| n.parse().ok())
            .ok_or_else(|| format!("bad texture reference '{}'", parts[0]))?;
        let mut tex_coords = [0.0f32; 4];
        for (slot, text) in tex_coords.iter_mut().zip(&parts[1..]) {
            *slot = text
                .trim()
                .parse()
                .map_err(|_| format!("bad texture coordinate '{text}'"))?;
        }
        Ok(Self {
            texture,
            tex_coords,
        })
    }
}

/// The `[landscape]` section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LandscapeSection {
    /// Projection variant.
    #[serde(rename = "type")]
    pub kind: LandscapeKind,
    pub name: String,
    pub author: String,
    pub description: String,
    /// Brightness floor; negative means "use the viewer's setting".
    pub minimal_brightness: f32,
    /// Azimuth rotation of fisheye/spherical images, degrees.
    pub angle_rotatez: f32,
    /// Azimuth rotation of old-style side panels, degrees.
    pub decor_angle_rotatez: f32,
    pub tesselate_rows: Option<u32>,
    pub tesselate_cols: Option<u32>,

    /// Horizon list file, relative to the landscape directory.
    pub polygonal_horizon_list: Option<String>,
    /// One of the six list modes, e.g. `azDeg_altDeg`.
    pub polygonal_horizon_list_mode: String,
    /// Calibration rotation of the horizon list, degrees.
    pub polygonal_angle_rotatez: f32,
    /// Horizon line color; a negative red channel disables the line.
    pub horizon_line_color: [f32; 3],
    /// Fill color of polygonal landscapes.
    pub ground_color: [f32; 3],

    // Old style.
    pub side_textures: Vec<String>,
    /// Night-light textures keyed by side texture index.
    pub light_textures: BTreeMap<usize, String>,
    pub sides: Vec<SideSpec>,
    pub nb_decor_repeat: u32,
    pub groundtex: Option<String>,
    pub fogtex: Option<String>,
    pub fog_alt_angle: f32,
    pub fog_angle_shift: f32,
    pub decor_alt_angle: f32,
    pub decor_angle_shift: f32,
    pub ground_angle_shift: f32,
    pub ground_angle_rotatez: f32,
    pub draw_ground_first: bool,
    /// Side panels come from a cylindrical panorama.
    pub tan_mode: bool,
    /// Use the corrected vertical placement instead of the historical one.
    pub calibrated: bool,

    // Fisheye and spherical.
    pub maptex: Option<String>,
    pub maptex_fog: Option<String>,
    pub maptex_illum: Option<String>,
    /// Fisheye field of view, degrees.
    pub texturefov: f32,
    pub maptex_top: f32,
    pub maptex_bottom: f32,
    pub maptex_fog_top: f32,
    pub maptex_fog_bottom: f32,
    pub maptex_illum_top: f32,
    pub maptex_illum_bottom: f32,
}

impl Default for LandscapeSection {
    fn default() -> Self {
        Self {
            kind: LandscapeKind::OldStyle,
            name: String::new(),
            author: String::new(),
            description: String::new(),
            minimal_brightness: -1.0,
            angle_rotatez: 0.0,
            decor_angle_rotatez: 0.0,
            tesselate_rows: None,
            tesselate_cols: None,
            polygonal_horizon_list: None,
            polygonal_horizon_list_mode: "azDeg_altDeg".to_string(),
            polygonal_angle_rotatez: 0.0,
            horizon_line_color: [-1.0, 0.0, 0.0],
            ground_color: [0.0, 0.0, 0.0],
            side_textures: Vec::new(),
            light_textures: BTreeMap::new(),
            sides: Vec::new(),
            nb_decor_repeat: 1,
            groundtex: None,
            fogtex: None,
            fog_alt_angle: 0.0,
            fog_angle_shift: 0.0,
            decor_alt_angle: 0.0,
            decor_angle_shift: 0.0,
            ground_angle_shift: 0.0,
            ground_angle_rotatez: 0.0,
            draw_ground_first: false,
            tan_mode: false,
            calibrated: false,
            maptex: None,
            maptex_fog: None,
            maptex_illum: None,
            texturefov: 360.0,
            maptex_top: 90.0,
            maptex_bottom: -90.0,
            maptex_fog_top: 90.0,
            maptex_fog_bottom: -90.0,
            maptex_illum_top: 90.0,
            maptex_illum_bottom: -90.0,
        }
    }
}

impl LandscapeSection {
    /// Brightness floor override, if the landscape sets one.
    pub fn minimal_brightness(&self) -> Option<f32> {
        (self.minimal_brightness >= 0.0).then_some(self.minimal_brightness)
    }

    /// Horizon line color, unless drawing the line is disabled.
    pub fn horizon_line_color(&self) -> Option<[f32; 3]> {
        (self.horizon_line_color[0] >= 0.0).then_some(self.horizon_line_color)
    }

    /// Panel repetitions, at least one and at most [`MAX_DECOR_REPEAT`].
    pub fn decor_repeat(&self) -> u32 {
        clamp_count("nb_decor_repeat", self.nb_decor_repeat.max(1), MAX_DECOR_REPEAT)
    }

    /// Requested mesh rows, at most [`MAX_TESSELATION`].
    pub fn tesselation_rows(&self) -> Option<u32> {
        self.tesselate_rows
            .map(|rows| clamp_count("tesselate_rows", rows, MAX_TESSELATION))
    }

    /// Requested mesh columns, at most [`MAX_TESSELATION`].
    pub fn tesselation_cols(&self) -> Option<u32> {
        self.tesselate_cols
            .map(|cols| clamp_count("tesselate_cols", cols, MAX_TESSELATION))
    }

    /// Description with escaped line breaks flattened to spaces.
    pub fn display_description(&self) -> String {
        self.description.replace("\\n", " ")
    }
}

/// The optional `[location]` section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LocationSection {
    pub planet: Option<String>,
    pub name: Option<String>,
    pub country: Option<String>,
    pub state: Option<String>,
    /// Decimal or sexagesimal text, e.g. `+48d12'30"`.
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    /// Metres above sea level.
    pub altitude: i32,
    /// Bortle index; `-1` for no change.
    pub light_pollution: i32,
    /// `-1` no change, `0` off, `1` on.
    pub display_fog: i32,
    /// mag/airmass; `-1` for no change.
    pub atmospheric_extinction_coefficient: f32,
    /// °C; `-1000` for no change.
    pub atmospheric_temperature: f32,
    /// mbar; `-1` computes from altitude, `-2` for no change.
    pub atmospheric_pressure: f32,
}

impl Default for LocationSection {
    fn default() -> Self {
        Self {
            planet: None,
            name: None,
            country: None,
            state: None,
            latitude: None,
            longitude: None,
            altitude: 0,
            light_pollution: -1,
            display_fog: -1,
            atmospheric_extinction_coefficient: -1.0,
            atmospheric_temperature: -1000.0,
            atmospheric_pressure: -2.0,
        }
    }
}

/// Where a landscape's photograph was taken.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Location {
    /// Body the place lies on; empty means "no location".
    pub planet: String,
    pub name: String,
    pub country: String,
    pub state: String,
    /// Degrees, north positive.
    pub latitude: f64,
    /// Degrees, east positive.
    pub longitude: f64,
    /// Metres.
    pub altitude: i32,
}

/// Atmospheric pressure a landscape asks for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PressureSetting {
    /// Standard atmosphere for the location's altitude.
    FromAltitude,
    /// Explicit pressure in millibar.
    Millibar(f32),
}

/// Atmosphere defaults a landscape may impose on the viewer. `None` leaves
/// the viewer's current value untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AtmosphereDefaults {
    pub bortle_index: Option<u8>,
    pub show_fog: Option<bool>,
    pub extinction_coefficient: Option<f32>,
    pub temperature_celsius: Option<f32>,
    pub pressure: Option<PressureSetting>,
}

impl LocationSection {
    /// Typed location; the planet defaults to Earth and the place name to
    /// the landscape name.
    pub fn to_location(&self, landscape_name: &str) -> Location {
        let angle = |text: &Option<String>, what: &str| -> f64 {
            match text.as_deref() {
                None => 0.0,
                Some(t) => parse_dec_angle(t).unwrap_or_else(|| {
                    log::warn!("Ignoring unparseable {what} '{t}'");
                    0.0
                }),
            }
        };
        Location {
            planet: self.planet.clone().unwrap_or_else(|| "Earth".to_string()),
            name: self
                .name
                .clone()
                .unwrap_or_else(|| landscape_name.to_string()),
            country: self.country.clone().unwrap_or_default(),
            state: self.state.clone().unwrap_or_default(),
            latitude: angle(&self.latitude, "latitude"),
            longitude: angle(&self.longitude, "longitude"),
            altitude: self.altitude,
        }
    }

    /// Bortle index clamped to `1..=9`; non-positive means no change.
    pub fn bortle_index(&self) -> Option<u8> {
        match self.light_pollution {
            i32::MIN..=0 => None,
            1..=9 => Some(self.light_pollution as u8),
            _ => Some(9),
        }
    }

    pub fn fog_setting(&self) -> Option<bool> {
        match self.display_fog {
            0 => Some(false),
            1 => Some(true),
            _ => None,
        }
    }

    pub fn extinction_coefficient(&self) -> Option<f32> {
        (self.atmospheric_extinction_coefficient >= 0.0)
            .then_some(self.atmospheric_extinction_coefficient)
    }

    /// Temperature in °C; anything below absolute zero (the `-1000`
    /// sentinel included) means no change.
    pub fn temperature(&self) -> Option<f32> {
        (self.atmospheric_temperature >= -273.15).then_some(self.atmospheric_temperature)
    }

    pub fn pressure(&self) -> Option<PressureSetting> {
        let p = self.atmospheric_pressure;
        if p >= 0.0 {
            Some(PressureSetting::Millibar(p))
        } else if (p + 1.0).abs() < 1e-3 {
            Some(PressureSetting::FromAltitude)
        } else {
            None
        }
    }

    pub fn atmosphere(&self) -> AtmosphereDefaults {
        AtmosphereDefaults {
            bortle_index: self.bortle_index(),
            show_fog: self.fog_setting(),
            extinction_coefficient: self.extinction_coefficient(),
            temperature_celsius: self.temperature(),
            pressure: self.pressure(),
        }
    }
}

/// A complete landscape description plus where it came from.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LandscapeConfig {
    /// Identifier (the directory name).
    #[serde(skip)]
    pub id: String,
    /// Directory holding the description, textures and horizon list.
    #[serde(skip)]
    pub directory: PathBuf,
    pub landscape: LandscapeSection,
    pub location: Option<LocationSection>,
}

impl LandscapeConfig {
    /// Load `landscape.ron` from a landscape directory. The directory name
    /// becomes the landscape id.
    pub fn load(directory: &Path) -> Result<Self, ConfigError> {
        let path = directory.join(LANDSCAPE_FILE);
        if !path.exists() {
            return Err(ConfigError::MissingLandscape(directory.to_path_buf()));
        }
        let contents = std::fs::read_to_string(&path).map_err(ConfigError::ReadError)?;
        let mut config: LandscapeConfig =
            ron::from_str(&contents).map_err(ConfigError::ParseError)?;
        config.id = directory
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        config.directory = directory.to_path_buf();
        log::debug!("Loaded landscape description {}", path.display());
        Ok(config)
    }

    /// Write the description back as `landscape.ron` in `directory`.
    pub fn save(&self, directory: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(directory).map_err(ConfigError::WriteError)?;
        let pretty = ron::ser::PrettyConfig::new().depth_limit(3);
        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;
        std::fs::write(directory.join(LANDSCAPE_FILE), serialized)
            .map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Interpret a flat `section/key → value` map, as produced by an ini
    /// reader. Missing keys take their defaults; malformed values are
    /// logged and also take their defaults.
    pub fn from_key_values(id: &str, directory: &Path, values: &HashMap<String, String>) -> Self {
        let reader = KeyValues { values };
        let d = LandscapeSection::default();

        let nb_side_tex = reader.count("landscape/nbsidetex", MAX_SIDES);
        let mut side_textures = Vec::new();
        let mut light_textures = BTreeMap::new();
        for i in 0..nb_side_tex {
            side_textures.push(reader.text(&format!("landscape/tex{i}")).unwrap_or_default());
            if let Some(light) = reader.text(&format!("landscape/light{i}")) {
                light_textures.insert(i, light);
            }
        }

        let nb_side = reader.count("landscape/nbside", MAX_SIDES);
        let mut sides = Vec::new();
        for i in 0..nb_side {
            let key = format!("landscape/side{i}");
            sides.push(reader.parse(&key, SideSpec::default()));
        }

        let landscape = LandscapeSection {
            kind: reader.parse("landscape/type", d.kind),
            name: reader.text("landscape/name").unwrap_or_default(),
            author: reader.text("landscape/author").unwrap_or_default(),
            description: reader.text("landscape/description").unwrap_or_default(),
            minimal_brightness: reader.parse("landscape/minimal_brightness", d.minimal_brightness),
            angle_rotatez: reader.parse("landscape/angle_rotatez", d.angle_rotatez),
            decor_angle_rotatez: reader.parse("landscape/decor_angle_rotatez", 0.0),
            tesselate_rows: reader.parse_opt("landscape/tesselate_rows"),
            tesselate_cols: reader.parse_opt("landscape/tesselate_cols"),
            polygonal_horizon_list: reader.text("landscape/polygonal_horizon_list"),
            polygonal_horizon_list_mode: reader
                .text("landscape/polygonal_horizon_list_mode")
                .unwrap_or(d.polygonal_horizon_list_mode),
            polygonal_angle_rotatez: reader.parse("landscape/polygonal_angle_rotatez", 0.0),
            horizon_line_color: reader.color("landscape/horizon_line_color", d.horizon_line_color),
            ground_color: reader.color("landscape/ground_color", d.ground_color),
            side_textures,
            light_textures,
            sides,
            nb_decor_repeat: reader.parse("landscape/nb_decor_repeat", d.nb_decor_repeat),
            groundtex: reader.text("landscape/groundtex"),
            fogtex: reader.text("landscape/fogtex"),
            fog_alt_angle: reader.parse("landscape/fog_alt_angle", 0.0),
            fog_angle_shift: reader.parse("landscape/fog_angle_shift", 0.0),
            decor_alt_angle: reader.parse("landscape/decor_alt_angle", 0.0),
            decor_angle_shift: reader.parse("landscape/decor_angle_shift", 0.0),
            ground_angle_shift: reader.parse("landscape/ground_angle_shift", 0.0),
            ground_angle_rotatez: reader.parse("landscape/ground_angle_rotatez", 0.0),
            draw_ground_first: reader.flag("landscape/draw_ground_first"),
            tan_mode: reader.flag("landscape/tan_mode"),
            calibrated: reader.flag("landscape/calibrated"),
            maptex: reader.text("landscape/maptex"),
            maptex_fog: reader.text("landscape/maptex_fog"),
            maptex_illum: reader.text("landscape/maptex_illum"),
            texturefov: reader.parse("landscape/texturefov", d.texturefov),
            maptex_top: reader.parse("landscape/maptex_top", d.maptex_top),
            maptex_bottom: reader.parse("landscape/maptex_bottom", d.maptex_bottom),
            maptex_fog_top: reader.parse("landscape/maptex_fog_top", d.maptex_fog_top),
            maptex_fog_bottom: reader.parse("landscape/maptex_fog_bottom", d.maptex_fog_bottom),
            maptex_illum_top: reader.parse("landscape/maptex_illum_top", d.maptex_illum_top),
            maptex_illum_bottom: reader
                .parse("landscape/maptex_illum_bottom", d.maptex_illum_bottom),
        };

        let location = values
            .keys()
            .any(|k| k.starts_with("location/"))
            .then(|| {
                let ld = LocationSection::default();
                LocationSection {
                    planet: reader.text("location/planet"),
                    name: reader.text("location/name"),
                    country: reader.text("location/country"),
                    state: reader.text("location/state"),
                    latitude: reader.text("location/latitude"),
                    longitude: reader.text("location/longitude"),
                    altitude: reader.parse("location/altitude", ld.altitude),
                    light_pollution: reader.parse("location/light_pollution", ld.light_pollution),
                    display_fog: reader.parse("location/display_fog", ld.display_fog),
                    atmospheric_extinction_coefficient: reader.parse(
                        "location/atmospheric_extinction_coefficient",
                        ld.atmospheric_extinction_coefficient,
                    ),
                    atmospheric_temperature: reader
                        .parse("location/atmospheric_temperature", ld.atmospheric_temperature),
                    atmospheric_pressure: reader
                        .parse("location/atmospheric_pressure", ld.atmospheric_pressure),
                }
            });

        Self {
            id: id.to_string(),
            directory: directory.to_path_buf(),
            landscape,
            location,
        }
    }

    /// Absolute path of a file referenced by the description.
    pub fn resolve_path(&self, file_name: &str) -> PathBuf {
        self.directory.join(file_name)
    }
}

fn clamp_count<T: PartialOrd + fmt::Display>(key: &str, value: T, max: T) -> T {
    if value > max {
        log::warn!("Clamping {key} = {value} to {max}");
        max
    } else {
        value
    }
}

struct KeyValues<'a> {
    values: &'a HashMap<String, String>,
}

impl KeyValues<'_> {
    fn text(&self, key: &str) -> Option<String> {
        self.values
            .get(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn parse<T: FromStr>(&self, key: &str, default: T) -> T {
        match self.values.get(key) {
            None => default,
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                log::warn!("Ignoring malformed value '{raw}' for {key}");
                default
            }),
        }
    }

    /// A count that sizes a list; oversized values are clamped to `max`.
    fn count(&self, key: &str, max: usize) -> usize {
        clamp_count(key, self.parse(key, 0usize), max)
    }

    fn parse_opt<T: FromStr>(&self, key: &str) -> Option<T> {
        let raw = self.values.get(key)?;
        match raw.trim().parse() {
            Ok(v) => Some(v),
            Err(_) => {
                log::warn!("Ignoring malformed value '{raw}' for {key}");
                None
            }
        }
    }

    fn flag(&self, key: &str) -> bool {
        match self.values.get(key).map(|v| v.trim().to_ascii_lowercase()) {
            None => false,
            Some(v) => match v.as_str() {
                "true" | "1" | "yes" | "on" => true,
                "false" | "0" | "no" | "off" | "" => false,
                _ => {
                    log::warn!("Ignoring malformed flag '{v}' for {key}");
                    false
                }
            },
        }
    }

    fn color(&self, key: &str, default: [f32; 3]) -> [f32; 3] {
        let Some(raw) = self.values.get(key) else {
            return default;
        };
        let parsed: Vec<f32> = raw
            .split(',')
            .filter_map(|c| c.trim().parse().ok())
            .collect();
        match parsed.as_slice() {
            [r, g, b] => [*r, *g, *b],
            _ => {
                log::warn!("Ignoring malformed color '{raw}' for {key}");
                default
            }
        }
    }
}
