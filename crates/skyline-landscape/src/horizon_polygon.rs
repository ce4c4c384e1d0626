//! Closed horizon polygons built from measured horizon points.

use std::path::Path;

use glam::DVec3;
use skyline_math::{NADIR, SphericalPolygon, rotate_azimuth};

use crate::horizon_list::{HorizonListMode, decode_file};

/// Build the ground region bounded by `directions`, after rotating every
/// point by `rotation` radians of azimuth. The region is the side holding
/// the nadir. Fewer than three points give no polygon.
pub fn build_horizon_polygon(directions: &[DVec3], rotation: f64) -> Option<SphericalPolygon> {
    let vertices = directions
        .iter()
        .map(|d| rotate_azimuth(*d, rotation))
        .collect();
    SphericalPolygon::new(vertices, NADIR)
}

/// Decode a list file and build its polygon.
pub fn load_horizon_polygon(
    path: &Path,
    mode: HorizonListMode,
    rotation: f64,
) -> Option<SphericalPolygon> {
    let directions = decode_file(path, mode);
    let polygon = build_horizon_polygon(&directions, rotation);
    if polygon.is_none() {
        log::warn!(
            "Horizon list {} has {} usable points, need at least {}",
            path.display(),
            directions.len(),
            SphericalPolygon::MIN_VERTICES
        );
    }
    polygon
}

#[cfg(test)]
mod tests {
    use super::*;
    use skyline_math::{ZENITH, azalt_from_direction, direction_from_azalt};
    use std::f64::consts::TAU;

    fn ring(altitude_deg: f64, count: usize) -> Vec<DVec3> {
        (0..count)
            .map(|i| direction_from_azalt(i as f64 * TAU / count as f64, altitude_deg.to_radians()))
            .collect()
    }

    #[test]
    fn test_too_few_points() {
        assert!(build_horizon_polygon(&ring(5.0, 2), 0.0).is_none());
        assert!(build_horizon_polygon(&[], 0.0).is_none());
    }

    #[test]
    fn test_interior_is_ground() {
        let polygon = build_horizon_polygon(&ring(10.0, 72), 0.0).unwrap();
        assert!(polygon.contains(NADIR));
        assert!(!polygon.contains(ZENITH));
        assert!(polygon.contains(direction_from_azalt(1.0, 5f64.to_radians())));
        assert!(!polygon.contains(direction_from_azalt(1.0, 20f64.to_radians())));
    }

    #[test]
    fn test_rotation_shifts_azimuths() {
        let points = vec![
            direction_from_azalt(0.0, 0.1),
            direction_from_azalt(2.0, 0.1),
            direction_from_azalt(4.0, 0.1),
        ];
        let polygon = build_horizon_polygon(&points, 0.5).unwrap();
        let (az, _) = azalt_from_direction(polygon.vertices()[1]);
        assert!((az - 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_rotated_bump_follows_calibration() {
        // A mountain between azimuth 80° and 100° reaching 30°.
        let mut points = ring(2.0, 36);
        points[9] = direction_from_azalt(85f64.to_radians(), 30f64.to_radians());
        points.insert(10, direction_from_azalt(95f64.to_radians(), 30f64.to_radians()));
        let polygon = build_horizon_polygon(&points, 90f64.to_radians()).unwrap();
        let on_peak = direction_from_azalt(180f64.to_radians(), 20f64.to_radians());
        let old_peak = direction_from_azalt(90f64.to_radians(), 20f64.to_radians());
        assert!(polygon.contains(on_peak));
        assert!(!polygon.contains(old_peak));
    }
}
