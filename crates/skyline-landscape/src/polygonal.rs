//! Landscapes described only by a measured horizon line, filled with a
//! flat ground color.

use std::sync::Arc;

use glam::DVec3;
use skyline_config::{LandscapeConfig, LandscapeKind};

use crate::base::LandscapeBase;
use crate::brightness::Brightness;
use crate::error::LandscapeError;
use crate::landscape::{Landscape, check_kind, finish_load};
use crate::mesh::{Mesh, polygon_skirt};
use crate::painter::{BlendMode, DrawCommand, LandscapePainter, Layer};
use crate::texture::TextureResolver;

const FILL_SEGMENTS: usize = 4;
const FILL_STEPS: u32 = 8;

/// Solid ground below a horizon polygon.
#[derive(Clone, Debug)]
pub struct PolygonalLandscape {
    base: LandscapeBase,
    ground_color: [f32; 3],
    fill: Option<Arc<Mesh>>,
}

impl Default for PolygonalLandscape {
    fn default() -> Self {
        Self::new()
    }
}

impl PolygonalLandscape {
    pub fn new() -> Self {
        Self {
            base: LandscapeBase::new(1.0),
            ground_color: [0.0; 3],
            fill: None,
        }
    }

    pub fn ground_color(&self) -> [f32; 3] {
        self.ground_color
    }

    fn try_load(&mut self, config: &LandscapeConfig) -> Result<(), LandscapeError> {
        check_kind(config, LandscapeKind::Polygonal)?;
        self.fill = None;
        self.base.load_common(config)?;

        let section = &config.landscape;
        let Some(list) = &section.polygonal_horizon_list else {
            return Err(LandscapeError::MissingKey {
                id: config.id.clone(),
                key: "polygonal_horizon_list",
            });
        };
        let Some(polygon) = self.base.horizon_polygon() else {
            return Err(LandscapeError::DegenerateHorizon {
                path: config.resolve_path(list),
            });
        };
        self.fill = Some(Arc::new(polygon_skirt(
            polygon,
            self.base.radius(),
            FILL_SEGMENTS,
            FILL_STEPS,
        )));
        self.ground_color = section.ground_color;
        Ok(())
    }
}

impl Landscape for PolygonalLandscape {
    fn base(&self) -> &LandscapeBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut LandscapeBase {
        &mut self.base
    }

    fn kind(&self) -> LandscapeKind {
        LandscapeKind::Polygonal
    }

    fn load(
        &mut self,
        config: &LandscapeConfig,
        _textures: &dyn TextureResolver,
    ) -> Result<(), LandscapeError> {
        let result = self.try_load(config);
        finish_load(&mut self.base, result)
    }

    fn draw(&self, painter: &mut dyn LandscapePainter, brightness: Brightness) {
        if !self.base.is_valid() {
            return;
        }
        let level = self.base.land_fader().level();
        if level > 0.0
            && let Some(fill) = &self.fill
        {
            let [r, g, b] = self.ground_color.map(|c| c * brightness.land);
            painter.submit(DrawCommand {
                layer: Layer::Fill,
                mesh: Arc::clone(fill),
                texture: None,
                color: [r, g, b, level],
                blend: BlendMode::Alpha,
                transform: self.base.azimuth_transform(0.0),
            });
        }
        self.base.draw_horizon_line(painter);
    }

    fn opacity(&self, direction: DVec3) -> f32 {
        if !self.base.is_valid() {
            return LandscapeBase::default_opacity(direction);
        }
        self.base
            .polygon_opacity(direction)
            .unwrap_or_else(|| LandscapeBase::default_opacity(direction))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::painter::DrawList;
    use crate::texture::MemoryTextures;
    use skyline_config::LandscapeSection;
    use skyline_math::direction_from_azalt;
    use std::io::Write;
    use std::path::Path;

    fn write_list(dir: &Path, lines: &[String]) {
        let mut file = std::fs::File::create(dir.join("horizon.txt")).unwrap();
        for line in lines {
            writeln!(file, "{line}").unwrap();
        }
    }

    fn config(dir: &Path) -> LandscapeConfig {
        LandscapeConfig {
            id: "flat".to_string(),
            directory: dir.to_path_buf(),
            landscape: LandscapeSection {
                kind: LandscapeKind::Polygonal,
                name: "Flat".to_string(),
                polygonal_horizon_list: Some("horizon.txt".to_string()),
                ground_color: [0.2, 0.4, 0.1],
                horizon_line_color: [1.0, 1.0, 0.0],
                ..Default::default()
            },
            location: None,
        }
    }

    fn ring(dir: &Path, altitude: f64) -> PolygonalLandscape {
        let lines: Vec<String> = (0..360)
            .step_by(10)
            .map(|az| format!("{az} {altitude}"))
            .collect();
        write_list(dir, &lines);
        let mut landscape = PolygonalLandscape::new();
        landscape.load(&config(dir), &MemoryTextures::new()).unwrap();
        landscape
    }

    #[test]
    fn test_constant_horizon_opacity() {
        let dir = tempfile::tempdir().unwrap();
        let landscape = ring(dir.path(), 10.0);
        for az in [0.0, 45.0, 123.0, 271.0] {
            let az = f64::to_radians(az);
            assert_eq!(landscape.opacity(direction_from_azalt(az, 5f64.to_radians())), 1.0);
            assert_eq!(landscape.opacity(direction_from_azalt(az, 20f64.to_radians())), 0.0);
        }
    }

    #[test]
    fn test_draw_fill_and_outline() {
        let dir = tempfile::tempdir().unwrap();
        let mut landscape = ring(dir.path(), 10.0);
        landscape.base_mut().set_flag_show(true);
        landscape.update(1.0);

        let mut list = DrawList::new();
        landscape.draw(
            &mut list,
            Brightness {
                land: 0.5,
                light_pollution: 0.0,
            },
        );
        assert_eq!(list.len(), 2);
        let fill = &list.commands()[0];
        assert_eq!(fill.layer, Layer::Fill);
        assert!(fill.texture.is_none());
        assert_eq!(fill.color, [0.1, 0.2, 0.05, 1.0]);
        assert_eq!(list.commands()[1].layer, Layer::HorizonLine);
    }

    #[test]
    fn test_stored_brightness_render() {
        let dir = tempfile::tempdir().unwrap();
        let mut landscape = ring(dir.path(), 10.0);
        landscape.base_mut().set_flag_show(true);
        landscape.update(1.0);
        landscape.base_mut().set_brightness(0.0, 0.0);
        let mut list = DrawList::new();
        landscape.render(&mut list);
        assert_eq!(list.commands()[0].color, [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_missing_list_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = config(dir.path());
        cfg.landscape.polygonal_horizon_list = None;
        let mut landscape = PolygonalLandscape::new();
        let result = landscape.load(&cfg, &MemoryTextures::new());
        assert!(matches!(result, Err(LandscapeError::MissingKey { .. })));
        assert!(!landscape.is_valid());
        assert_eq!(landscape.opacity(direction_from_azalt(0.0, -0.1)), 1.0);
    }

    #[test]
    fn test_degenerate_list_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        write_list(dir.path(), &["0 5".to_string(), "# only two".to_string(), "90 5".to_string()]);
        let mut landscape = PolygonalLandscape::new();
        let result = landscape.load(&config(dir.path()), &MemoryTextures::new());
        assert!(matches!(result, Err(LandscapeError::DegenerateHorizon { .. })));

        let mut list = DrawList::new();
        landscape.base_mut().set_flag_show(true);
        landscape.update(1.0);
        landscape.draw(&mut list, Brightness::default());
        assert!(list.is_empty());
    }

    #[test]
    fn test_reload_replaces_horizon() {
        let dir = tempfile::tempdir().unwrap();
        let mut landscape = ring(dir.path(), 10.0);
        let probe = direction_from_azalt(1.0, 15f64.to_radians());
        assert_eq!(landscape.opacity(probe), 0.0);

        let lines: Vec<String> = (0..360).step_by(10).map(|az| format!("{az} 30")).collect();
        write_list(dir.path(), &lines);
        landscape.load(&config(dir.path()), &MemoryTextures::new()).unwrap();
        assert_eq!(landscape.opacity(probe), 1.0);
    }
}
