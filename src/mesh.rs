//! Subdivided icosahedron surface.
//!
//! Each of the 20 icosahedron faces is split into a triangular grid of
//! `(detail + 1)²` triangles, every grid point is pushed out onto the sphere,
//! and points shared between neighbouring faces are welded. Grid points are
//! identified by their integer barycentric weights over the icosahedron
//! corners, so welding is exact and never depends on float tolerances.
//!
//! Vertices are only duplicated along the UV seam, where the same position
//! needs two texture coordinates. Normals are accumulated per welded
//! position, so seam duplicates share one normal and the displaced surface
//! stays closed.

use std::collections::{HashMap, HashSet};
use std::f32::consts::{PI, TAU};

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};

use crate::params::SUBDIVISION_RANGE;

/// Highest subdivision level accepted by [`IcoSphere::new`].
pub const MAX_DETAIL: u32 = *SUBDIVISION_RANGE.end();

/// Mesh vertex as laid out in the vertex buffer.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2];

    /// Buffer layout matching `VertexInput` in the render shader.
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Triangulated sphere with per-vertex normals and spherical UVs.
#[derive(Debug, Clone)]
pub struct IcoSphere {
    radius: f32,
    detail: u32,
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
    edge_indices: Vec<u32>,
}

impl IcoSphere {
    /// Build a sphere of `radius`; `detail` is clamped to [`MAX_DETAIL`].
    pub fn new(radius: f32, detail: u32) -> Self {
        let detail = detail.min(MAX_DETAIL);
        let n = detail + 1;
        let (corners, faces) = icosahedron();

        let mut builder = Builder::default();
        for face in faces {
            // grid[i][j]: weights (n - i - j, j, i) over the face corners
            let grid: Vec<Vec<u32>> = (0..=n)
                .map(|i| {
                    (0..=n - i)
                        .map(|j| {
                            builder.point(&corners, [(face[0], n - i - j), (face[1], j), (face[2], i)])
                        })
                        .collect()
                })
                .collect();

            for i in 0..n as usize {
                let rows = n as usize - i;
                for j in 0..(2 * rows - 1) {
                    let k = j / 2;
                    let tri = if j % 2 == 0 {
                        [grid[i][k + 1], grid[i + 1][k], grid[i][k]]
                    } else {
                        [grid[i][k + 1], grid[i + 1][k + 1], grid[i + 1][k]]
                    };
                    builder.triangles.push(tri);
                }
            }
        }

        builder.finish(radius, detail)
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn detail(&self) -> u32 {
        self.detail
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Triangle list indices.
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Line list indices, one pair per unique edge.
    pub fn edge_indices(&self) -> &[u32] {
        &self.edge_indices
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn edge_count(&self) -> usize {
        self.edge_indices.len() / 2
    }
}

/// Unit-scale icosahedron corners and its 20 faces.
fn icosahedron() -> ([Vec3; 12], [[u32; 3]; 20]) {
    let phi = (1.0 + 5.0_f32.sqrt()) / 2.0;

    let corners = [
        Vec3::new(-1.0, phi, 0.0),
        Vec3::new(1.0, phi, 0.0),
        Vec3::new(-1.0, -phi, 0.0),
        Vec3::new(1.0, -phi, 0.0),
        Vec3::new(0.0, -1.0, phi),
        Vec3::new(0.0, 1.0, phi),
        Vec3::new(0.0, -1.0, -phi),
        Vec3::new(0.0, 1.0, -phi),
        Vec3::new(phi, 0.0, -1.0),
        Vec3::new(phi, 0.0, 1.0),
        Vec3::new(-phi, 0.0, -1.0),
        Vec3::new(-phi, 0.0, 1.0),
    ];

    let faces = [
        [0, 11, 5], [0, 5, 1], [0, 1, 7], [0, 7, 10], [0, 10, 11],
        [1, 5, 9], [5, 11, 4], [11, 10, 2], [10, 7, 6], [7, 1, 8],
        [3, 9, 4], [3, 4, 2], [3, 2, 6], [3, 6, 8], [3, 8, 9],
        [4, 9, 5], [2, 4, 11], [6, 2, 10], [8, 6, 7], [9, 8, 1],
    ];

    (corners, faces)
}

/// Key of a grid point: `(corner, weight)` pairs, sorted, unused slots last.
type PointKey = [(u32, u32); 3];

#[derive(Default)]
struct Builder {
    point_ids: HashMap<PointKey, u32>,
    /// Unit-sphere position of every welded point.
    points: Vec<Vec3>,
    /// Triangles over welded point ids.
    triangles: Vec<[u32; 3]>,
}

impl Builder {
    fn point(&mut self, corners: &[Vec3; 12], weights: [(u32, u32); 3]) -> u32 {
        let mut key = weights.map(|(corner, w)| if w == 0 { (u32::MAX, 0) } else { (corner, w) });
        key.sort_unstable();

        if let Some(&id) = self.point_ids.get(&key) {
            return id;
        }

        let sum = key
            .iter()
            .filter(|(_, w)| *w > 0)
            .fold(Vec3::ZERO, |acc, &(corner, w)| acc + corners[corner as usize] * w as f32);

        let id = self.points.len() as u32;
        self.points.push(sum.normalize());
        self.point_ids.insert(key, id);
        id
    }

    fn finish(self, radius: f32, detail: u32) -> IcoSphere {
        let Builder { points, mut triangles, .. } = self;

        let mut normals = vec![Vec3::ZERO; points.len()];
        for tri in &mut triangles {
            let [a, b, c] = tri.map(|p| points[p as usize]);
            let mut face_normal = (b - a).cross(c - a);
            if face_normal.dot(a + b + c) < 0.0 {
                tri.swap(1, 2);
                face_normal = -face_normal;
            }
            for p in *tri {
                normals[p as usize] += face_normal;
            }
        }

        let mut vertex_ids: HashMap<(u32, [u32; 2]), u32> = HashMap::new();
        let mut vertices = Vec::new();
        let mut indices = Vec::with_capacity(triangles.len() * 3);

        for tri in &triangles {
            let uvs = triangle_uvs(tri.map(|p| points[p as usize]));
            for (&p, uv) in tri.iter().zip(uvs) {
                let key = (p, [uv.x.to_bits(), uv.y.to_bits()]);
                let id = *vertex_ids.entry(key).or_insert_with(|| {
                    vertices.push(Vertex {
                        position: (points[p as usize] * radius).to_array(),
                        normal: normals[p as usize].normalize_or_zero().to_array(),
                        uv: uv.to_array(),
                    });
                    (vertices.len() - 1) as u32
                });
                indices.push(id);
            }
        }

        let edge_indices = unique_edges(&indices);

        log::debug!(
            "icosphere detail {}: {} vertices, {} triangles, {} edges",
            detail,
            vertices.len(),
            indices.len() / 3,
            edge_indices.len() / 2
        );

        IcoSphere {
            radius,
            detail,
            vertices,
            indices,
            edge_indices,
        }
    }
}

/// Line list over every distinct triangle edge, in first-seen order.
fn unique_edges(indices: &[u32]) -> Vec<u32> {
    let mut seen = HashSet::new();
    let mut edges = Vec::new();
    for tri in indices.chunks_exact(3) {
        for (a, b) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
            if seen.insert((a.min(b), a.max(b))) {
                edges.push(a);
                edges.push(b);
            }
        }
    }
    edges
}

fn azimuth(v: Vec3) -> f32 {
    v.z.atan2(-v.x)
}

fn inclination(v: Vec3) -> f32 {
    (-v.y).atan2((v.x * v.x + v.z * v.z).sqrt())
}

fn sphere_uv(v: Vec3) -> Vec2 {
    Vec2::new(azimuth(v) / TAU + 0.5, 0.5 - inclination(v) / PI)
}

/// Spherical UVs of one triangle, fixed up at the seam and the poles.
fn triangle_uvs(corners: [Vec3; 3]) -> [Vec2; 3] {
    let mut uvs = corners.map(sphere_uv);
    let centre_azimuth = azimuth((corners[0] + corners[1] + corners[2]) / 3.0);

    for (uv, p) in uvs.iter_mut().zip(corners) {
        if centre_azimuth < 0.0 && uv.x == 1.0 {
            uv.x -= 1.0;
        }
        // Poles have no azimuth of their own
        if p.x == 0.0 && p.z == 0.0 {
            uv.x = centre_azimuth / TAU + 0.5;
        }
    }

    let min_u = uvs.iter().map(|uv| uv.x).fold(f32::INFINITY, f32::min);
    let max_u = uvs.iter().map(|uv| uv.x).fold(f32::NEG_INFINITY, f32::max);
    if max_u > 0.9 && min_u < 0.1 {
        for uv in &mut uvs {
            if uv.x < 0.2 {
                uv.x += 1.0;
            }
        }
    }

    uvs
}

#[cfg(test)]
mod tests {
    use super::*;

    type PosKey = [u32; 3];

    fn pos_key(v: &Vertex) -> PosKey {
        v.position.map(f32::to_bits)
    }

    /// Triangle and edge counts over welded positions.
    fn welded_edge_use(sphere: &IcoSphere) -> HashMap<(PosKey, PosKey), u32> {
        let mut uses = HashMap::new();
        for tri in sphere.indices().chunks_exact(3) {
            let keys = [0, 1, 2].map(|i| pos_key(&sphere.vertices()[tri[i] as usize]));
            for (a, b) in [(keys[0], keys[1]), (keys[1], keys[2]), (keys[2], keys[0])] {
                let edge = if a < b { (a, b) } else { (b, a) };
                *uses.entry(edge).or_insert(0) += 1;
            }
        }
        uses
    }

    fn assert_valid(sphere: &IcoSphere) {
        let n = (sphere.detail() + 1) as usize;
        assert_eq!(sphere.triangle_count(), 20 * n * n);

        let positions: HashSet<PosKey> = sphere.vertices().iter().map(pos_key).collect();
        assert_eq!(positions.len(), 10 * n * n + 2);

        let uses = welded_edge_use(sphere);
        assert_eq!(uses.len(), 30 * n * n);
        assert!(uses.values().all(|&count| count == 2), "mesh is not closed");

        for v in sphere.vertices() {
            let p = Vec3::from_array(v.position);
            let normal = Vec3::from_array(v.normal);
            assert!((p.length() - sphere.radius()).abs() < 1e-4);
            assert!((normal.length() - 1.0).abs() < 1e-4);
            assert!(normal.dot(p.normalize()) > 0.99);
            assert!(v.uv.iter().all(|c| c.is_finite()));
        }
    }

    #[test]
    fn test_base_icosahedron() {
        let sphere = IcoSphere::new(1.0, 0);
        assert_valid(&sphere);
        assert_eq!(sphere.triangle_count(), 20);
    }

    #[test]
    fn test_subdivided_spheres_are_closed() {
        for detail in [1, 2, 5, 12] {
            assert_valid(&IcoSphere::new(2.5, detail));
        }
    }

    #[test]
    fn test_triangles_wind_outward() {
        let sphere = IcoSphere::new(2.5, 4);
        let v = sphere.vertices();
        for tri in sphere.indices().chunks_exact(3) {
            let [a, b, c] = [0, 1, 2].map(|i| Vec3::from_array(v[tri[i] as usize].position));
            assert!((b - a).cross(c - a).dot(a + b + c) > 0.0);
        }
    }

    #[test]
    fn test_rebuild_from_fifty_to_ten() {
        let high = IcoSphere::new(2.5, 50);
        assert_eq!(high.triangle_count(), 20 * 51 * 51);
        let low = IcoSphere::new(2.5, 10);
        assert_valid(&low);
        assert!(low.vertices().len() < high.vertices().len());
    }

    #[test]
    fn test_detail_is_clamped() {
        let sphere = IcoSphere::new(1.0, 500);
        assert_eq!(sphere.detail(), MAX_DETAIL);
    }

    #[test]
    fn test_edges_are_unique_pairs() {
        let sphere = IcoSphere::new(1.0, 3);
        let edges = sphere.edge_indices();
        assert_eq!(edges.len() % 2, 0);

        let mut seen = HashSet::new();
        for pair in edges.chunks_exact(2) {
            assert_ne!(pair[0], pair[1]);
            assert!(seen.insert((pair[0].min(pair[1]), pair[0].max(pair[1]))));
        }
        assert!(sphere.edge_count() >= 30 * 16);
    }

    #[test]
    fn test_vertex_layout_stride() {
        assert_eq!(std::mem::size_of::<Vertex>(), 32);
        assert_eq!(Vertex::layout().array_stride, 32);
    }
}
