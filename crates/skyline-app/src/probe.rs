//! Loading a landscape directory and summarising what came out of it.

use std::fmt;
use std::path::Path;

use skyline_config::{Config, ConfigError, LANDSCAPE_FILE, LandscapeConfig, LandscapeKind};
use skyline_landscape::{Landscape, MinimalBrightnessPolicy, horizon_profile, load_landscape};

use crate::error::ProbeError;
use crate::ini::{INI_FILE, read_ini};
use crate::resolver::DirectoryTextureResolver;

/// Read a landscape description, preferring `landscape.ron` over
/// `landscape.ini`.
pub fn load_description(dir: &Path) -> Result<LandscapeConfig, ProbeError> {
    if dir.join(LANDSCAPE_FILE).is_file() {
        return Ok(LandscapeConfig::load(dir)?);
    }
    let ini_path = dir.join(INI_FILE);
    if !ini_path.is_file() {
        return Err(ConfigError::MissingLandscape(dir.to_path_buf()).into());
    }
    let values = read_ini(&ini_path).map_err(|source| ProbeError::Ini {
        path: ini_path.clone(),
        source,
    })?;
    let id = dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    log::debug!("Loaded landscape description {}", ini_path.display());
    Ok(LandscapeConfig::from_key_values(&id, dir, &values))
}

/// Load the landscape in `dir` and bring it fully on screen with the
/// viewer's fade and fog settings.
pub fn open_landscape(dir: &Path, config: &Config) -> Result<Box<dyn Landscape>, ProbeError> {
    let description = load_description(dir)?;
    let resolver =
        DirectoryTextureResolver::new(dir, config.landscape.shared_texture_dir.clone());
    let mut landscape = load_landscape(&description, &resolver)?;

    let fade = config.landscape.fade_duration_seconds;
    let show_fog = landscape
        .base()
        .atmosphere()
        .show_fog
        .unwrap_or(config.landscape.show_fog);
    let base = landscape.base_mut();
    base.set_fade_duration(fade);
    base.set_flag_show(true);
    base.set_flag_show_fog(show_fog);
    landscape.update(fade);
    Ok(landscape)
}

/// What the probe prints about a loaded landscape.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub id: String,
    pub name: String,
    pub author: String,
    pub kind: LandscapeKind,
    pub valid: bool,
    pub location: Option<String>,
    /// Brightness floor the viewer would apply, if any.
    pub brightness_floor: Option<f32>,
    pub fog_shown: bool,
    /// `(azimuth, altitude)` pairs in degrees; `None` is open sky.
    pub profile: Vec<(f64, Option<f64>)>,
}

impl Report {
    /// Summarise `landscape`, sampling its horizon every `step_deg` degrees.
    pub fn collect(
        landscape: &dyn Landscape,
        policy: &MinimalBrightnessPolicy,
        step_deg: f64,
    ) -> Self {
        let base = landscape.base();
        let location = base.location().filter(|_| base.has_location()).map(|l| {
            format!(
                "{} ({}) {:.4}°, {:.4}°, {} m",
                l.name, l.planet, l.latitude, l.longitude, l.altitude
            )
        });
        let profile = horizon_profile(landscape, step_deg.to_radians())
            .into_iter()
            .map(|(az, alt)| (az.to_degrees(), alt.map(f64::to_degrees)))
            .collect();
        Self {
            id: base.id().to_string(),
            name: base.name().to_string(),
            author: base.author().to_string(),
            kind: landscape.kind(),
            valid: landscape.is_valid(),
            location,
            brightness_floor: policy.floor(base.minimal_brightness()),
            fog_shown: base.flag_show_fog(),
            profile,
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} [{}] ({})", self.name, self.id, self.kind)?;
        if !self.author.is_empty() {
            writeln!(f, "  author:   {}", self.author)?;
        }
        writeln!(f, "  valid:    {}", self.valid)?;
        match &self.location {
            Some(location) => writeln!(f, "  location: {location}")?,
            None => writeln!(f, "  location: none")?,
        }
        match self.brightness_floor {
            Some(floor) => writeln!(f, "  floor:    {floor}")?,
            None => writeln!(f, "  floor:    off")?,
        }
        writeln!(f, "  fog:      {}", if self.fog_shown { "on" } else { "off" })?;
        writeln!(f, "  horizon:")?;
        for (az, alt) in &self.profile {
            match alt {
                Some(alt) => writeln!(f, "    {az:7.2}° {alt:7.2}°")?,
                None => writeln!(f, "    {az:7.2}°     sky")?,
            }
        }
        Ok(())
    }
}
