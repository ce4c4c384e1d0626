//! Spherical geometry for the horizon frame: angle units, azimuth/altitude
//! conversion, and closed spherical polygons with containment queries.

mod angle;
mod horizon;
mod polygon;

pub use angle::{AngleUnit, parse_dec_angle};
pub use horizon::{
    NADIR, ZENITH, altitude_of, azalt_from_direction, direction_from_azalt, rotate_azimuth,
    slerp_unit,
};
pub use polygon::{SphericalPolygon, arcs_intersect};
