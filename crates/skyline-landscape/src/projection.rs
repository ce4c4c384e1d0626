//! Image projections shared by tessellation and opacity sampling.
//!
//! Both map a direction in the landscape's own (unrotated) horizon frame to
//! image coordinates with `v` growing downward.

use std::f64::consts::{PI, TAU};

/// Fisheye image position of a direction. The zenith sits at the image
/// centre, due south at the top border and due east on the left. The radial
/// distance grows linearly with zenith distance and reaches the border at
/// half the field of view.
///
/// Returns the coordinates together with the normalized radius; a radius
/// above 1 lies outside the image circle.
pub fn fisheye_uv(azimuth: f64, zenith_distance: f64, field_of_view: f64) -> ([f64; 2], f64) {
    let psi = azimuth - PI;
    let radius = zenith_distance / (field_of_view * 0.5);
    let (sin_psi, cos_psi) = psi.sin_cos();
    (
        [0.5 + 0.5 * radius * sin_psi, 0.5 - 0.5 * radius * cos_psi],
        radius,
    )
}

/// Equirectangular image position of a direction. The left border is due
/// east; `top` and `bottom` are the altitudes of the first and last rows.
/// Altitudes outside that range clamp to the edge rows.
pub fn equirect_uv(azimuth: f64, altitude: f64, top: f64, bottom: f64) -> [f64; 2] {
    let u = ((azimuth - PI / 2.0) / TAU).rem_euclid(1.0);
    let span = top - bottom;
    let v = if span.abs() < f64::EPSILON {
        0.0
    } else {
        ((top - altitude) / span).clamp(0.0, 1.0)
    };
    [u, v]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fisheye_zenith_is_centre() {
        let (uv, r) = fisheye_uv(1.3, 0.0, PI);
        assert_eq!(uv, [0.5, 0.5]);
        assert_eq!(r, 0.0);
    }

    #[test]
    fn test_fisheye_cardinal_points() {
        let fov = PI;
        let (south, r) = fisheye_uv(PI, PI / 2.0, fov);
        assert!((south[0] - 0.5).abs() < 1e-12 && south[1].abs() < 1e-12);
        assert!((r - 1.0).abs() < 1e-12);
        let (east, _) = fisheye_uv(PI / 2.0, PI / 2.0, fov);
        assert!(east[0].abs() < 1e-12 && (east[1] - 0.5).abs() < 1e-12);
        let (north, _) = fisheye_uv(0.0, PI / 2.0, fov);
        assert!((north[1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_fisheye_outside_field() {
        let (_, r) = fisheye_uv(0.0, PI * 0.75, PI);
        assert!(r > 1.0);
    }

    #[test]
    fn test_equirect_edges() {
        let top = 40f64.to_radians();
        let bottom = -10f64.to_radians();
        assert_eq!(equirect_uv(PI / 2.0, top, top, bottom), [0.0, 0.0]);
        assert_eq!(equirect_uv(PI / 2.0, -PI / 2.0, top, bottom)[1], 1.0);
        assert_eq!(equirect_uv(PI / 2.0, PI / 2.0, top, bottom)[1], 0.0);
        assert!((equirect_uv(PI, 0.0, top, bottom)[0] - 0.25).abs() < 1e-12);
        assert!((equirect_uv(0.0, 0.0, top, bottom)[0] - 0.75).abs() < 1e-12);
    }
}
