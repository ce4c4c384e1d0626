//! The horizon (azimuth/altitude) frame.
//!
//! Right-handed unit-sphere frame with +X due south, +Y due east and +Z at the
//! zenith. Azimuths are compass bearings: north 0, east π/2, south π,
//! west 3π/2.

use std::f64::consts::{PI, TAU};

use glam::{DQuat, DVec3};

/// Straight up.
pub const ZENITH: DVec3 = DVec3::Z;

/// Straight down.
pub const NADIR: DVec3 = DVec3::NEG_Z;

/// Unit direction for a compass azimuth and altitude, both in radians.
#[must_use]
pub fn direction_from_azalt(azimuth: f64, altitude: f64) -> DVec3 {
    let longitude = PI - azimuth;
    let (sin_alt, cos_alt) = altitude.sin_cos();
    DVec3::new(cos_alt * longitude.cos(), cos_alt * longitude.sin(), sin_alt)
}

/// Compass azimuth in `[0, 2π)` and altitude in `[-π/2, π/2]` of a direction.
///
/// The direction does not need to be unit length. At the poles the azimuth
/// is 0.
#[must_use]
pub fn azalt_from_direction(direction: DVec3) -> (f64, f64) {
    let dir = direction.normalize_or_zero();
    let altitude = dir.z.clamp(-1.0, 1.0).asin();
    if dir.x.abs() < 1e-15 && dir.y.abs() < 1e-15 {
        return (0.0, altitude);
    }
    let azimuth = (PI - dir.y.atan2(dir.x)).rem_euclid(TAU);
    (azimuth, altitude)
}

/// Altitude of a direction in radians.
#[must_use]
pub fn altitude_of(direction: DVec3) -> f64 {
    direction.normalize_or_zero().z.clamp(-1.0, 1.0).asin()
}

/// Rotate a direction about the zenith so that its compass azimuth grows by
/// `angle` radians.
#[must_use]
pub fn rotate_azimuth(direction: DVec3, angle: f64) -> DVec3 {
    DQuat::from_rotation_z(-angle) * direction
}

/// Spherical linear interpolation between two unit vectors.
///
/// Falls back to normalized linear interpolation when the vectors are nearly
/// parallel. Antipodal inputs have no unique great circle; the result then
/// follows an arbitrary one.
#[must_use]
pub fn slerp_unit(from: DVec3, to: DVec3, t: f64) -> DVec3 {
    let cos_theta = from.dot(to).clamp(-1.0, 1.0);
    if cos_theta > 1.0 - 1e-12 {
        return from.lerp(to, t).normalize_or_zero();
    }
    if cos_theta < -1.0 + 1e-12 {
        let axis = from.any_orthonormal_vector();
        return DQuat::from_axis_angle(axis, PI * t) * from;
    }
    let theta = cos_theta.acos();
    let sin_theta = theta.sin();
    let a = ((1.0 - t) * theta).sin() / sin_theta;
    let b = (t * theta).sin() / sin_theta;
    (from * a + to * b).normalize()
}
