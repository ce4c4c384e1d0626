//! Closed spherical polygons bounded by great-circle arcs.
//!
//! A polygon on the sphere splits it into two regions, so the interior is
//! pinned by a reference point known to lie inside. Containment counts how
//! often a path from the query to that reference point crosses the boundary.

use glam::{DQuat, DVec3};

use crate::horizon::slerp_unit;

/// Closed polygon on the unit sphere.
#[derive(Clone, Debug, PartialEq)]
pub struct SphericalPolygon {
    vertices: Vec<DVec3>,
    interior_point: DVec3,
}

impl SphericalPolygon {
    /// Minimum vertex count of a closed polygon.
    pub const MIN_VERTICES: usize = 3;

    /// Build a polygon from its vertices (implicitly closed) and a point
    /// inside the region it bounds.
    ///
    /// Returns `None` when fewer than [`Self::MIN_VERTICES`] usable vertices
    /// remain after normalization.
    pub fn new(vertices: Vec<DVec3>, interior_point: DVec3) -> Option<Self> {
        let vertices: Vec<DVec3> = vertices
            .into_iter()
            .map(DVec3::normalize_or_zero)
            .filter(|v| *v != DVec3::ZERO)
            .collect();
        let interior_point = interior_point.normalize_or_zero();
        if vertices.len() < Self::MIN_VERTICES || interior_point == DVec3::ZERO {
            return None;
        }
        Some(Self {
            vertices,
            interior_point,
        })
    }

    /// Polygon vertices in boundary order.
    pub fn vertices(&self) -> &[DVec3] {
        &self.vertices
    }

    /// Reference point inside the region.
    pub fn interior_point(&self) -> DVec3 {
        self.interior_point
    }

    /// Number of vertices (equal to the number of edges).
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Always false: construction rejects degenerate input.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Boundary edges, including the closing edge from the last vertex back
    /// to the first.
    pub fn edges(&self) -> impl Iterator<Item = (DVec3, DVec3)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }

    /// Whether `direction` lies inside the region.
    pub fn contains(&self, direction: DVec3) -> bool {
        let query = direction.normalize_or_zero();
        if query == DVec3::ZERO {
            return false;
        }
        let target = self.interior_point;
        if query.dot(target) > 1.0 - 1e-12 {
            return true;
        }

        let crossings = if query.dot(target) < -1.0 + 1e-9 {
            // No unique shortest arc to the antipode: detour through a point
            // a quarter turn away from both.
            let via = target.any_orthonormal_vector();
            self.count_crossings(query, via) + self.count_crossings(via, target)
        } else {
            self.count_crossings(query, target)
        };
        crossings % 2 == 0
    }

    /// Copy of the polygon with every vertex and the reference point rotated.
    #[must_use]
    pub fn rotated(&self, rotation: DQuat) -> Self {
        Self {
            vertices: self.vertices.iter().map(|v| rotation * *v).collect(),
            interior_point: rotation * self.interior_point,
        }
    }

    /// The closed boundary as a point list, each edge split into
    /// `segments_per_edge` great-circle pieces. The first point is repeated
    /// at the end.
    pub fn boundary_points(&self, segments_per_edge: usize) -> Vec<DVec3> {
        let segments = segments_per_edge.max(1);
        let mut points = Vec::with_capacity(self.vertices.len() * segments + 1);
        for (a, b) in self.edges() {
            for s in 0..segments {
                points.push(slerp_unit(a, b, s as f64 / segments as f64));
            }
        }
        points.push(self.vertices[0]);
        points
    }

    fn count_crossings(&self, from: DVec3, to: DVec3) -> usize {
        self.edges()
            .filter(|(a, b)| arcs_intersect(from, to, *a, *b))
            .count()
    }
}

/// Whether the minor great-circle arcs `a–b` and `c–d` cross.
///
/// Endpoints lying exactly on the other arc's great circle count as being on
/// its negative side, so a path through a shared vertex is counted once.
pub fn arcs_intersect(a: DVec3, b: DVec3, c: DVec3, d: DVec3) -> bool {
    let n_ab = a.cross(b);
    let n_cd = c.cross(d);

    if (n_ab.dot(c) > 0.0) == (n_ab.dot(d) > 0.0) {
        return false;
    }
    if (n_cd.dot(a) > 0.0) == (n_cd.dot(b) > 0.0) {
        return false;
    }

    let axis = n_ab.cross(n_cd);
    if axis.length_squared() < 1e-30 {
        return false;
    }
    // Each arc meets the other great circle at one of ±axis; they cross only
    // if it is the same one.
    (axis.dot(a + b) > 0.0) == (axis.dot(c + d) > 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::horizon::{NADIR, ZENITH, direction_from_azalt};
    use std::f64::consts::{PI, TAU};

    fn constant_horizon(altitude_deg: f64, count: usize) -> SphericalPolygon {
        let vertices = (0..count)
            .map(|i| direction_from_azalt(i as f64 * TAU / count as f64, altitude_deg.to_radians()))
            .collect();
        SphericalPolygon::new(vertices, NADIR).unwrap()
    }

    #[test]
    fn test_rejects_too_few_vertices() {
        assert!(SphericalPolygon::new(vec![DVec3::X, DVec3::Y], NADIR).is_none());
        assert!(SphericalPolygon::new(vec![DVec3::X, DVec3::Y, DVec3::ZERO], NADIR).is_none());
    }

    #[test]
    fn test_constant_altitude_horizon_containment() {
        let poly = constant_horizon(10.0, 36);
        for az_step in 0..24 {
            let az = az_step as f64 * TAU / 24.0 + 0.01;
            assert!(poly.contains(direction_from_azalt(az, 5f64.to_radians())));
            assert!(!poly.contains(direction_from_azalt(az, 20f64.to_radians())));
        }
    }

    #[test]
    fn test_poles() {
        let poly = constant_horizon(10.0, 36);
        assert!(poly.contains(NADIR));
        assert!(!poly.contains(ZENITH));
    }

    #[test]
    fn test_edges_close_the_loop() {
        let poly = constant_horizon(0.0, 4);
        let edges: Vec<_> = poly.edges().collect();
        assert_eq!(edges.len(), 4);
        assert_eq!(edges[3].1, poly.vertices()[0]);
    }

    #[test]
    fn test_containment_is_rotation_equivariant() {
        let vertices: Vec<DVec3> = (0..48)
            .map(|i| {
                let az = i as f64 * TAU / 48.0;
                let alt = 8.0 + 6.0 * (3.0 * az).sin();
                direction_from_azalt(az, alt.to_radians())
            })
            .collect();
        let poly = SphericalPolygon::new(vertices, NADIR).unwrap();
        let rotations = [
            DQuat::from_rotation_z(0.7),
            DQuat::from_rotation_x(1.9),
            DQuat::from_axis_angle(DVec3::new(1.0, -2.0, 0.5).normalize(), 2.4),
        ];

        for rotation in rotations {
            let rotated = poly.rotated(rotation);
            for az_step in 0..30 {
                for alt_step in -8..=8 {
                    let q = direction_from_azalt(
                        az_step as f64 * TAU / 30.0 + 0.013,
                        alt_step as f64 * PI / 18.0 + 0.007,
                    );
                    assert_eq!(
                        poly.contains(q),
                        rotated.contains(rotation * q),
                        "mismatch for {q:?} under {rotation:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_boundary_points_repeat_first_vertex() {
        let poly = constant_horizon(10.0, 6);
        let points = poly.boundary_points(4);
        assert_eq!(points.len(), 6 * 4 + 1);
        assert_eq!(points.first(), points.last());
    }

    #[test]
    fn test_arcs_intersect_basic() {
        let a = direction_from_azalt(0.0, 0.0);
        let b = direction_from_azalt(0.4, 0.0);
        let c = direction_from_azalt(0.2, 0.3);
        let d = direction_from_azalt(0.2, -0.3);
        assert!(arcs_intersect(a, b, c, d));
        assert!(!arcs_intersect(a, b, -c, -d));
    }

    #[test]
    fn test_arcs_disjoint_on_same_great_circle_side() {
        let a = direction_from_azalt(0.0, 0.0);
        let b = direction_from_azalt(0.4, 0.0);
        let c = direction_from_azalt(1.0, 0.3);
        let d = direction_from_azalt(1.0, -0.3);
        assert!(!arcs_intersect(a, b, c, d));
    }
}
