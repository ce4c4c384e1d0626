//! Landscape tessellation.
//!
//! Every builder works in the landscape's own horizon frame (+X south,
//! +Y east, +Z zenith) and bakes texture coordinates in image convention,
//! `v` growing downward. Rotation is left to the draw transform.

use std::f64::consts::{PI, TAU};

use bytemuck::{Pod, Zeroable};
use glam::DVec3;
use skyline_math::{SphericalPolygon, direction_from_azalt, slerp_unit};

use crate::projection::fisheye_uv;

/// Vertex uploaded to the GPU: position and texture coordinates.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct LandscapeVertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

/// How indices are assembled into primitives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Topology {
    Triangles,
    LineStrip,
}

/// Indexed vertex data, built once at load time.
#[derive(Clone, Debug, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<LandscapeVertex>,
    pub indices: Vec<u32>,
    pub topology: Topology,
}

impl Mesh {
    pub fn new(topology: Topology) -> Self {
        Self {
            vertices: Vec::new(),
            indices: Vec::new(),
            topology,
        }
    }

    /// Append a vertex and return its index.
    pub fn push_vertex(&mut self, position: DVec3, uv: [f64; 2]) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(LandscapeVertex {
            position: position.as_vec3().to_array(),
            uv: [uv[0] as f32, uv[1] as f32],
        });
        index
    }

    pub fn push_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.extend_from_slice(&[a, b, c]);
    }

    /// Two triangles `a b c` and `a c d`.
    pub fn push_quad(&mut self, a: u32, b: u32, c: u32, d: u32) {
        self.indices.extend_from_slice(&[a, b, c, a, c, d]);
    }

    pub fn triangle_count(&self) -> usize {
        match self.topology {
            Topology::Triangles => self.indices.len() / 3,
            Topology::LineStrip => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// A `(rows + 1) × (cols + 1)` vertex grid stitched into quads.
    fn push_grid(
        &mut self,
        rows: u32,
        cols: u32,
        mut vertex: impl FnMut(u32, u32) -> (DVec3, [f64; 2]),
    ) {
        let base = self.vertices.len() as u32;
        for r in 0..=rows {
            for c in 0..=cols {
                let (position, uv) = vertex(r, c);
                self.push_vertex(position, uv);
            }
        }
        let stride = cols + 1;
        for r in 0..rows {
            for c in 0..cols {
                let a = base + r * stride + c;
                self.push_quad(a, a + 1, a + stride + 1, a + stride);
            }
        }
    }
}

/// An upright band on a cylinder around the zenith axis.
#[derive(Clone, Debug)]
pub struct CylinderBand<'a> {
    pub radius: f64,
    /// Compass azimuth of the left edge, radians.
    pub start_azimuth: f64,
    /// Azimuth covered clockwise from the left edge, radians.
    pub azimuth_span: f64,
    pub slices: u32,
    /// Ring heights from the bottom up; at least two.
    pub heights: &'a [f64],
    /// `[u_left, v_bottom, u_right, v_top]`.
    pub uv_rect: [f64; 4],
}

pub fn cylinder_band(band: &CylinderBand<'_>) -> Mesh {
    let mut mesh = Mesh::new(Topology::Triangles);
    if band.heights.len() < 2 || band.slices == 0 {
        return mesh;
    }
    let rows = band.heights.len() as u32 - 1;
    let [u0, v0, u1, v1] = band.uv_rect;
    mesh.push_grid(rows, band.slices, |r, c| {
        let s = c as f64 / band.slices as f64;
        let t = r as f64 / rows as f64;
        let rim = direction_from_azalt(band.start_azimuth + band.azimuth_span * s, 0.0);
        let position = DVec3::new(
            rim.x * band.radius,
            rim.y * band.radius,
            band.heights[r as usize],
        );
        (position, [u0 + (u1 - u0) * s, v0 + (v1 - v0) * t])
    });
    mesh
}

/// Radii of the fan disk rings, innermost first. The outermost equals
/// `radius`; each inner ring shrinks so its triangles stay close to
/// equilateral.
pub fn fan_disk_radii(radius: f64, inner_slices: u32, levels: u32) -> Vec<f64> {
    let levels = levels as usize;
    let mut radii = vec![0.0; levels + 1];
    radii[levels] = radius;
    for i in (0..levels).rev() {
        let slices = (inner_slices << (i + 1)) as f64;
        radii[i] = radii[i + 1] * (1.0 - PI / slices) * 2.0 / 3.0;
    }
    radii
}

/// Flat disk at height `z` whose slice count doubles from ring to ring, so
/// the inner triangles are not slivers. Texture coordinates map the disk
/// onto the whole image, east at the top.
pub fn fan_disk(radius: f64, inner_slices: u32, levels: u32, z: f64) -> Mesh {
    let inner_slices = inner_slices.max(3);
    let levels = levels.min(12);
    let radii = fan_disk_radii(radius, inner_slices, levels);
    let mut mesh = Mesh::new(Topology::Triangles);
    let uv = |x: f64, y: f64| [0.5 + x / (2.0 * radius), 0.5 - y / (2.0 * radius)];

    let center = mesh.push_vertex(DVec3::new(0.0, 0.0, z), [0.5, 0.5]);
    let mut rings: Vec<Vec<u32>> = Vec::with_capacity(radii.len());
    for (level, r) in radii.iter().enumerate() {
        let count = inner_slices << level;
        let ring = (0..count)
            .map(|j| {
                let (sin, cos) = (TAU * j as f64 / count as f64).sin_cos();
                let (x, y) = (r * cos, r * sin);
                mesh.push_vertex(DVec3::new(x, y, z), uv(x, y))
            })
            .collect();
        rings.push(ring);
    }

    let first = &rings[0];
    for j in 0..first.len() {
        mesh.push_triangle(center, first[j], first[(j + 1) % first.len()]);
    }
    for pair in rings.windows(2) {
        let (inner, outer) = (&pair[0], &pair[1]);
        let (n, m) = (inner.len(), outer.len());
        for j in 0..n {
            let (p0, p1) = (inner[j], inner[(j + 1) % n]);
            let (q0, q1, q2) = (outer[2 * j], outer[2 * j + 1], outer[(2 * j + 2) % m]);
            mesh.push_triangle(p0, q0, q1);
            mesh.push_triangle(p0, q1, p1);
            mesh.push_triangle(p1, q1, q2);
        }
    }
    mesh
}

/// Sphere cap around the zenith textured with a fisheye image of the given
/// field of view (radians). The cap extends to half the field of view.
pub fn fisheye_cap(radius: f64, rows: u32, cols: u32, field_of_view: f64) -> Mesh {
    let mut mesh = Mesh::new(Topology::Triangles);
    let rows = rows.max(1);
    let cols = cols.max(3);
    let max_zd = (field_of_view * 0.5).min(PI);
    mesh.push_grid(rows, cols, |r, c| {
        let zd = max_zd * r as f64 / rows as f64;
        let az = TAU * c as f64 / cols as f64;
        let position = direction_from_azalt(az, PI / 2.0 - zd) * radius;
        (position, fisheye_uv(az, zd, field_of_view).0)
    });
    mesh
}

/// Sphere band between two altitudes textured with an equirectangular
/// image whose left border is due east.
pub fn sphere_band(radius: f64, rows: u32, cols: u32, top: f64, bottom: f64) -> Mesh {
    let mut mesh = Mesh::new(Topology::Triangles);
    let rows = rows.max(1);
    let cols = cols.max(3);
    mesh.push_grid(rows, cols, |r, c| {
        let u = c as f64 / cols as f64;
        let v = r as f64 / rows as f64;
        let az = PI / 2.0 + TAU * u;
        let alt = top + (bottom - top) * v;
        (direction_from_azalt(az, alt) * radius, [u, v])
    });
    mesh
}

/// Fill of the region between a polygon's boundary and its interior
/// reference point, swept along great circles.
pub fn polygon_skirt(
    polygon: &SphericalPolygon,
    radius: f64,
    segments_per_edge: usize,
    steps: u32,
) -> Mesh {
    let boundary = polygon.boundary_points(segments_per_edge);
    let inner = polygon.interior_point();
    let steps = steps.max(1);
    let mut mesh = Mesh::new(Topology::Triangles);
    let cols = boundary.len() as u32 - 1;
    mesh.push_grid(steps, cols, |r, c| {
        let t = r as f64 / steps as f64;
        (slerp_unit(boundary[c as usize], inner, t) * radius, [0.0, 0.0])
    });
    mesh
}

/// Closed line strip along a polygon's boundary.
pub fn outline_strip(polygon: &SphericalPolygon, radius: f64, segments_per_edge: usize) -> Mesh {
    let mut mesh = Mesh::new(Topology::LineStrip);
    for point in polygon.boundary_points(segments_per_edge) {
        let index = mesh.push_vertex(point * radius, [0.0, 0.0]);
        mesh.indices.push(index);
    }
    mesh
}
