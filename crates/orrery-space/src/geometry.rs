//! CPU mesh generation: geodesic spheres, flat ring annuli, and the
//! flat-shaded dodecahedron used for asteroids.

use std::collections::HashMap;

use glam::{Vec2, Vec3};
use orrery_render::MeshVertex;
use orrery_sim::picking::sphere_uv;

const PHI: f32 = 1.618_034;

/// Unit icosahedron corners (unnormalized).
const ICOSAHEDRON_VERTICES: [[f32; 3]; 12] = [
    [-1.0, PHI, 0.0],
    [1.0, PHI, 0.0],
    [-1.0, -PHI, 0.0],
    [1.0, -PHI, 0.0],
    [0.0, -1.0, PHI],
    [0.0, 1.0, PHI],
    [0.0, -1.0, -PHI],
    [0.0, 1.0, -PHI],
    [PHI, 0.0, -1.0],
    [PHI, 0.0, 1.0],
    [-PHI, 0.0, -1.0],
    [-PHI, 0.0, 1.0],
];

/// Counter-clockwise seen from outside.
const ICOSAHEDRON_FACES: [[usize; 3]; 20] = [
    [0, 11, 5],
    [0, 5, 1],
    [0, 1, 7],
    [0, 7, 10],
    [0, 10, 11],
    [1, 5, 9],
    [5, 11, 4],
    [11, 10, 2],
    [10, 7, 6],
    [7, 1, 8],
    [3, 9, 4],
    [3, 4, 2],
    [3, 2, 6],
    [3, 6, 8],
    [3, 8, 9],
    [4, 9, 5],
    [2, 4, 11],
    [6, 2, 10],
    [8, 6, 7],
    [9, 8, 1],
];

/// CPU-side indexed mesh.
#[derive(Clone, Debug, Default)]
pub struct Mesh {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

fn vertex(position: Vec3, normal: Vec3, uv: Vec2) -> MeshVertex {
    MeshVertex {
        position: position.to_array(),
        normal: normal.to_array(),
        uv: uv.to_array(),
    }
}

/// Bit pattern key with `-0.0` folded into `+0.0`.
fn position_key(p: Vec3) -> [u32; 3] {
    [
        (p.x + 0.0).to_bits(),
        (p.y + 0.0).to_bits(),
        (p.z + 0.0).to_bits(),
    ]
}

/// Unit geodesic sphere. Each icosahedron edge is split into `detail + 1`
/// segments. Vertices are shared between faces, giving `10n² + 2` points
/// for `n = detail + 1`, each with its outward normal and equirectangular UV.
pub fn geodesic_sphere(detail: u32) -> Mesh {
    let n = detail + 1;
    let nf = n as f32;
    let corners = ICOSAHEDRON_VERTICES.map(|c| Vec3::from_array(c).normalize());

    let mut mesh = Mesh::default();
    let mut lookup: HashMap<[u32; 3], u32> = HashMap::new();

    for face in ICOSAHEDRON_FACES {
        let [a, b, c] = face.map(|i| corners[i]);

        // Lattice point (i, j) on this face; row i runs from `a` toward `b`.
        // Integer barycentric weights keep shared edge points bitwise equal.
        let mut point_index = |i: u32, j: u32| -> u32 {
            let wa = (n - i) as f32;
            let wb = (i - j) as f32;
            let wc = j as f32;
            let p = ((a * wa + b * wb + c * wc) / nf).normalize();
            *lookup.entry(position_key(p)).or_insert_with(|| {
                mesh.vertices.push(vertex(p, p, sphere_uv(p)));
                (mesh.vertices.len() - 1) as u32
            })
        };

        let mut rows: Vec<Vec<u32>> = Vec::with_capacity(n as usize + 1);
        for i in 0..=n {
            rows.push((0..=i).map(|j| point_index(i, j)).collect());
        }

        for i in 0..n as usize {
            for j in 0..=i {
                let top = rows[i][j];
                let left = rows[i + 1][j];
                let right = rows[i + 1][j + 1];
                mesh.indices.extend_from_slice(&[top, left, right]);
                if j < i {
                    let next = rows[i][j + 1];
                    mesh.indices.extend_from_slice(&[top, right, next]);
                }
            }
        }
    }

    mesh
}

/// Flat annulus in the local XY plane, facing +Z. UVs follow the usual
/// planar mapping; the ring shader derives its radial coordinate from
/// position instead.
pub fn ring_annulus(inner: f32, outer: f32, segments: u32) -> Mesh {
    let segments = segments.max(3);
    let mut mesh = Mesh::default();
    for s in 0..=segments {
        let theta = s as f32 / segments as f32 * std::f32::consts::TAU;
        let (sin, cos) = theta.sin_cos();
        for radius in [inner, outer] {
            let p = Vec3::new(cos * radius, sin * radius, 0.0);
            let uv = Vec2::new(p.x / outer * 0.5 + 0.5, p.y / outer * 0.5 + 0.5);
            mesh.vertices.push(vertex(p, Vec3::Z, uv));
        }
    }
    for s in 0..segments {
        let i = s * 2;
        let (a, b, c, d) = (i, i + 1, i + 2, i + 3);
        mesh.indices.extend_from_slice(&[a, b, d, a, d, c]);
    }
    mesh
}

/// Flat-shaded regular dodecahedron of circumradius 1, built as the dual of
/// the icosahedron: one pentagon per icosahedron corner.
pub fn dodecahedron() -> Mesh {
    let corners = ICOSAHEDRON_VERTICES.map(|c| Vec3::from_array(c).normalize());
    let face_centers: Vec<Vec3> = ICOSAHEDRON_FACES
        .iter()
        .map(|f| (corners[f[0]] + corners[f[1]] + corners[f[2]]).normalize())
        .collect();

    let mut mesh = Mesh::default();
    for (corner_index, &normal) in corners.iter().enumerate() {
        let mut ring: Vec<Vec3> = ICOSAHEDRON_FACES
            .iter()
            .zip(&face_centers)
            .filter(|(f, _)| f.contains(&corner_index))
            .map(|(_, &c)| c)
            .collect();

        // Sort counter-clockwise around the outward normal.
        let tangent = (ring[0] - normal * ring[0].dot(normal)).normalize();
        let bitangent = normal.cross(tangent);
        ring.sort_by(|p, q| {
            let ap = p.dot(bitangent).atan2(p.dot(tangent));
            let aq = q.dot(bitangent).atan2(q.dot(tangent));
            ap.total_cmp(&aq)
        });

        let base = mesh.vertices.len() as u32;
        for p in &ring {
            mesh.vertices.push(vertex(*p, normal, sphere_uv(*p)));
        }
        for k in 1..ring.len() as u32 - 1 {
            mesh.indices.extend_from_slice(&[base, base + k, base + k + 1]);
        }
    }
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position(mesh: &Mesh, i: u32) -> Vec3 {
        Vec3::from_array(mesh.vertices[i as usize].position)
    }

    fn assert_outward(mesh: &Mesh) {
        for tri in mesh.indices.chunks(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| position(mesh, i));
            let normal = (b - a).cross(c - a);
            let centroid = (a + b + c) / 3.0;
            assert!(normal.dot(centroid) > 0.0, "inward facing triangle {tri:?}");
        }
    }

    #[test]
    fn test_icosahedron_counts() {
        let mesh = geodesic_sphere(0);
        assert_eq!(mesh.vertices.len(), 12);
        assert_eq!(mesh.triangle_count(), 20);
    }

    #[test]
    fn test_geodesic_vertex_count_is_shared() {
        for detail in [1, 3, 7] {
            let n = (detail + 1) as usize;
            let mesh = geodesic_sphere(detail);
            assert_eq!(mesh.vertices.len(), 10 * n * n + 2, "detail {detail}");
            assert_eq!(mesh.triangle_count(), 20 * n * n);
        }
    }

    #[test]
    fn test_geodesic_points_on_unit_sphere() {
        let mesh = geodesic_sphere(4);
        for v in &mesh.vertices {
            let p = Vec3::from_array(v.position);
            assert!((p.length() - 1.0).abs() < 1e-5);
            assert_eq!(v.normal, v.position);
            assert!((0.0..=1.0).contains(&v.uv[0]) && (0.0..=1.0).contains(&v.uv[1]));
        }
    }

    #[test]
    fn test_geodesic_faces_outward() {
        assert_outward(&geodesic_sphere(2));
    }

    #[test]
    fn test_ring_annulus_radii() {
        let mesh = ring_annulus(1.4, 2.3, 64);
        assert_eq!(mesh.vertices.len(), 65 * 2);
        assert_eq!(mesh.triangle_count(), 128);
        for v in &mesh.vertices {
            let r = Vec2::new(v.position[0], v.position[1]).length();
            assert!((r - 1.4).abs() < 1e-4 || (r - 2.3).abs() < 1e-4);
            assert_eq!(v.position[2], 0.0);
        }
    }

    #[test]
    fn test_dodecahedron_shape() {
        let mesh = dodecahedron();
        assert_eq!(mesh.vertices.len(), 60);
        assert_eq!(mesh.triangle_count(), 36);
        for v in &mesh.vertices {
            assert!((Vec3::from_array(v.position).length() - 1.0).abs() < 1e-5);
        }
        assert_outward(&mesh);
    }
}
