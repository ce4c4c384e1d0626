//! The landscape trait, loading by configured type, and horizon profiles.

use std::f64::consts::FRAC_PI_2;

use glam::DVec3;
use skyline_config::{LandscapeConfig, LandscapeKind};
use skyline_math::direction_from_azalt;

use crate::base::LandscapeBase;
use crate::brightness::Brightness;
use crate::error::LandscapeError;
use crate::fisheye::FisheyeLandscape;
use crate::old_style::OldStyleLandscape;
use crate::painter::LandscapePainter;
use crate::polygonal::PolygonalLandscape;
use crate::spherical::SphericalLandscape;
use crate::texture::TextureResolver;

/// A horizon environment around the observer.
pub trait Landscape {
    fn base(&self) -> &LandscapeBase;

    fn base_mut(&mut self) -> &mut LandscapeBase;

    /// Projection this landscape implements.
    fn kind(&self) -> LandscapeKind;

    /// (Re)load from a description. On error the landscape is left invalid.
    fn load(
        &mut self,
        config: &LandscapeConfig,
        textures: &dyn TextureResolver,
    ) -> Result<(), LandscapeError>;

    /// Submit this frame's draw commands.
    fn draw(&self, painter: &mut dyn LandscapePainter, brightness: Brightness);

    /// How opaque the landscape is toward `direction` (horizon frame, any
    /// length): 1 for solid ground, 0 for open sky.
    fn opacity(&self, direction: DVec3) -> f32 {
        LandscapeBase::default_opacity(direction)
    }

    /// Advance the fades by `dt` seconds.
    fn update(&mut self, dt: f32) {
        self.base_mut().update(dt);
    }

    /// Draw with the brightness last given to
    /// [`LandscapeBase::set_brightness`].
    fn render(&self, painter: &mut dyn LandscapePainter) {
        self.draw(painter, self.base().brightness());
    }

    fn is_valid(&self) -> bool {
        self.base().is_valid()
    }
}

/// An empty landscape of the given projection.
pub fn create_landscape(kind: LandscapeKind) -> Box<dyn Landscape> {
    match kind {
        LandscapeKind::OldStyle => Box::new(OldStyleLandscape::new()),
        LandscapeKind::Polygonal => Box::new(PolygonalLandscape::new()),
        LandscapeKind::Fisheye => Box::new(FisheyeLandscape::new()),
        LandscapeKind::Spherical => Box::new(SphericalLandscape::new()),
    }
}

/// Create and load the landscape a description asks for.
pub fn load_landscape(
    config: &LandscapeConfig,
    textures: &dyn TextureResolver,
) -> Result<Box<dyn Landscape>, LandscapeError> {
    let mut landscape = create_landscape(config.landscape.kind);
    landscape.load(config, textures)?;
    Ok(landscape)
}

/// Reject a description written for another projection.
pub(crate) fn check_kind(
    config: &LandscapeConfig,
    expected: LandscapeKind,
) -> Result<(), LandscapeError> {
    let found = config.landscape.kind;
    if found != expected {
        return Err(LandscapeError::TypeMismatch {
            id: config.id.clone(),
            expected,
            found,
        });
    }
    Ok(())
}

/// Record the outcome of a load attempt in the validity flag.
pub(crate) fn finish_load(
    base: &mut LandscapeBase,
    result: Result<(), LandscapeError>,
) -> Result<(), LandscapeError> {
    base.set_valid(result.is_ok());
    if let Err(e) = &result {
        log::warn!("Landscape '{}' failed to load: {e}", base.id());
    }
    result
}

/// Opacity at or above which a direction counts as ground.
const GROUND_THRESHOLD: f32 = 0.5;

/// Coarse scan step of [`horizon_altitude`], radians.
const SCAN_STEP: f64 = 0.5 * std::f64::consts::PI / 180.0;

/// Altitude (radians) of the visible horizon toward `azimuth`.
///
/// Scans down from the zenith for the first direction that counts as
/// ground, then bisects the last step. Returns `None` if the whole vertical
/// is open sky, and `π/2` if it is solid.
pub fn horizon_altitude(landscape: &dyn Landscape, azimuth: f64) -> Option<f64> {
    let is_ground =
        |alt: f64| landscape.opacity(direction_from_azalt(azimuth, alt)) >= GROUND_THRESHOLD;

    if is_ground(FRAC_PI_2) {
        return Some(FRAC_PI_2);
    }
    let mut sky = FRAC_PI_2;
    loop {
        let below = (sky - SCAN_STEP).max(-FRAC_PI_2);
        if is_ground(below) {
            let mut ground = below;
            for _ in 0..40 {
                let mid = 0.5 * (ground + sky);
                if is_ground(mid) {
                    ground = mid;
                } else {
                    sky = mid;
                }
            }
            return Some(0.5 * (ground + sky));
        }
        if below <= -FRAC_PI_2 {
            return None;
        }
        sky = below;
    }
}

/// Horizon altitude at every `step` radians of azimuth, starting at north.
pub fn horizon_profile(landscape: &dyn Landscape, step: f64) -> Vec<(f64, Option<f64>)> {
    if step <= 0.0 {
        return Vec::new();
    }
    let count = (std::f64::consts::TAU / step - 1e-9).ceil() as usize;
    (0..count)
        .map(|i| {
            let azimuth = i as f64 * step;
            (azimuth, horizon_altitude(landscape, azimuth))
        })
        .collect()
}
