//! Base meshes for sculpting: segmented box and subdivided icosahedron

use glam::Vec3;
use std::collections::HashMap;
use tracing::warn;

use super::ShardMesh;

const MAX_SEGMENTS: u32 = 512;
const MAX_DETAIL: u32 = 96;

/// One box face: outward normal plus the (u, v) axes spanning it
struct Face {
    normal: Vec3,
    u: Vec3,
    v: Vec3,
    half_n: f32,
    half_u: f32,
    half_v: f32,
    seg_u: u32,
    seg_v: u32,
}

/// Generate a segmented box centered at the origin
///
/// Each face is its own grid of `(seg_u + 1) × (seg_v + 1)` vertices, so
/// vertices along box edges are duplicated per face (with exactly equal
/// positions) and carry that face's normal.
///
/// # Arguments
/// * `width`, `height`, `depth` - Extents along X, Y, Z (> 0)
/// * `segments` - Grid divisions along X, Y, Z (min 1, max 512)
pub fn generate_box(width: f32, height: f32, depth: f32, segments: [u32; 3]) -> ShardMesh {
    let [w, h, d] = [width, height, depth].map(|e| {
        if e > 0.0 && e.is_finite() {
            e
        } else {
            warn!("generate_box: extent must be > 0.0, clamping to 0.001");
            0.001
        }
    });
    let [sx, sy, sz] = segments.map(|s| {
        if s == 0 {
            warn!("generate_box: segment count must be >= 1, clamping to 1");
        }
        s.clamp(1, MAX_SEGMENTS)
    });

    let (hw, hh, hd) = (w * 0.5, h * 0.5, d * 0.5);

    #[rustfmt::skip]
    let faces = [
        Face { normal: Vec3::X, u: Vec3::NEG_Z, v: Vec3::Y, half_n: hw, half_u: hd, half_v: hh, seg_u: sz, seg_v: sy },
        Face { normal: Vec3::NEG_X, u: Vec3::Z, v: Vec3::Y, half_n: hw, half_u: hd, half_v: hh, seg_u: sz, seg_v: sy },
        Face { normal: Vec3::Y, u: Vec3::X, v: Vec3::NEG_Z, half_n: hh, half_u: hw, half_v: hd, seg_u: sx, seg_v: sz },
        Face { normal: Vec3::NEG_Y, u: Vec3::X, v: Vec3::Z, half_n: hh, half_u: hw, half_v: hd, seg_u: sx, seg_v: sz },
        Face { normal: Vec3::Z, u: Vec3::X, v: Vec3::Y, half_n: hd, half_u: hw, half_v: hh, seg_u: sx, seg_v: sy },
        Face { normal: Vec3::NEG_Z, u: Vec3::NEG_X, v: Vec3::Y, half_n: hd, half_u: hw, half_v: hh, seg_u: sx, seg_v: sy },
    ];

    let mut mesh = ShardMesh::new();
    for face in &faces {
        add_face(&mut mesh, face);
    }
    mesh
}

fn add_face(mesh: &mut ShardMesh, face: &Face) {
    let base = mesh.vertex_count() as u32;
    let row = face.seg_u + 1;

    for j in 0..=face.seg_v {
        // 2t - 1 hits exactly -1 and 1 at the edges, so shared edges line up
        let sv = 2.0 * (j as f32 / face.seg_v as f32) - 1.0;
        for i in 0..=face.seg_u {
            let su = 2.0 * (i as f32 / face.seg_u as f32) - 1.0;
            let position = face.normal * face.half_n
                + face.u * (face.half_u * su)
                + face.v * (face.half_v * sv);
            mesh.add_vertex(position, face.normal);
        }
    }

    for j in 0..face.seg_v {
        for i in 0..face.seg_u {
            let a = base + j * row + i;
            let b = a + 1;
            let c = a + row + 1;
            let d = a + row;

            // CCW when viewed from outside (u × v = normal)
            mesh.add_triangle(a, b, c);
            mesh.add_triangle(a, c, d);
        }
    }
}

/// Generate an icosphere by subdividing each icosahedron face
///
/// # Arguments
/// * `radius` - Sphere radius (> 0)
/// * `detail` - Extra subdivisions per edge (0 = plain icosahedron, max 96)
///
/// # Returns
/// Indexed mesh with shared vertices and smooth radial normals
pub fn generate_icosphere(radius: f32, detail: u32) -> ShardMesh {
    let radius = if radius > 0.0 && radius.is_finite() {
        radius
    } else {
        warn!("generate_icosphere: radius must be > 0.0, clamping to 0.001");
        0.001
    };
    let detail = if detail > MAX_DETAIL {
        warn!("generate_icosphere: detail {} too high, clamping to {}", detail, MAX_DETAIL);
        MAX_DETAIL
    } else {
        detail
    };

    let t = (1.0 + 5.0f32.sqrt()) / 2.0;
    let corners = [
        Vec3::new(-1.0, t, 0.0),
        Vec3::new(1.0, t, 0.0),
        Vec3::new(-1.0, -t, 0.0),
        Vec3::new(1.0, -t, 0.0),
        Vec3::new(0.0, -1.0, t),
        Vec3::new(0.0, 1.0, t),
        Vec3::new(0.0, -1.0, -t),
        Vec3::new(0.0, 1.0, -t),
        Vec3::new(t, 0.0, -1.0),
        Vec3::new(t, 0.0, 1.0),
        Vec3::new(-t, 0.0, -1.0),
        Vec3::new(-t, 0.0, 1.0),
    ];
    #[rustfmt::skip]
    let faces: [[usize; 3]; 20] = [
        [0, 11, 5], [0, 5, 1], [0, 1, 7], [0, 7, 10], [0, 10, 11],
        [1, 5, 9], [5, 11, 4], [11, 10, 2], [10, 7, 6], [7, 1, 8],
        [3, 9, 4], [3, 4, 2], [3, 2, 6], [3, 6, 8], [3, 8, 9],
        [4, 9, 5], [2, 4, 11], [6, 2, 10], [8, 6, 7], [9, 8, 1],
    ];

    let cols = detail + 1;
    let mut mesh = ShardMesh::new();
    let mut welded: HashMap<[i64; 3], u32> = HashMap::new();

    for face in &faces {
        let a = corners[face[0]];
        let b = corners[face[1]];
        let c = corners[face[2]];

        // grid[i][j] for i + j <= cols
        let mut grid: Vec<Vec<u32>> = Vec::with_capacity(cols as usize + 1);
        for i in 0..=cols {
            let mut row = Vec::with_capacity((cols - i) as usize + 1);
            for j in 0..=(cols - i) {
                // Weighted sum is order-independent for two non-zero terms, so
                // points on a shared edge come out bit-identical from both faces
                let wa = (cols - i - j) as f32;
                let p = (a * wa + b * i as f32 + c * j as f32) / cols as f32;
                let normal = p.normalize();
                let position = normal * radius;
                let key = weld_key(position);
                let index = *welded
                    .entry(key)
                    .or_insert_with(|| mesh.add_vertex(position, normal));
                row.push(index);
            }
            grid.push(row);
        }

        for i in 0..cols as usize {
            for j in 0..(cols as usize - i) {
                mesh.add_triangle(grid[i][j], grid[i + 1][j], grid[i][j + 1]);
                if i + j + 1 < cols as usize {
                    mesh.add_triangle(grid[i + 1][j], grid[i + 1][j + 1], grid[i][j + 1]);
                }
            }
        }
    }

    mesh
}

fn weld_key(p: Vec3) -> [i64; 3] {
    const QUANTUM: f32 = 1.0e5;
    [
        (p.x * QUANTUM).round() as i64,
        (p.y * QUANTUM).round() as i64,
        (p.z * QUANTUM).round() as i64,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn box_vertex_count(sx: usize, sy: usize, sz: usize) -> usize {
        2 * ((sx + 1) * (sy + 1) + (sx + 1) * (sz + 1) + (sy + 1) * (sz + 1))
    }

    #[test]
    fn test_box_counts() {
        let mesh = generate_box(2.0, 3.0, 1.0, [8, 8, 8]);
        assert_eq!(mesh.vertex_count(), box_vertex_count(8, 8, 8));
        assert_eq!(mesh.triangle_count(), 2 * 2 * (8 * 8 * 3));
        assert!(mesh.aux_parity());

        let mesh = generate_box(2.75, 3.75, 1.6, [32, 48, 32]);
        assert_eq!(mesh.vertex_count(), box_vertex_count(32, 48, 32));
    }

    #[test]
    fn test_box_extents_exact() {
        let mesh = generate_box(2.75, 3.75, 1.6, [5, 7, 3]);
        let (min, max) = mesh.bounds().unwrap();
        assert_eq!(max, Vec3::new(1.375, 1.875, 0.8));
        assert_eq!(min, -max);
    }

    #[test]
    fn test_box_winding_outward() {
        let mesh = generate_box(1.0, 1.0, 1.0, [2, 2, 2]);
        for tri in mesh.triangles() {
            let p0 = Vec3::from(mesh.positions[tri[0]]);
            let p1 = Vec3::from(mesh.positions[tri[1]]);
            let p2 = Vec3::from(mesh.positions[tri[2]]);
            let face_normal = (p1 - p0).cross(p2 - p0);
            let centroid = (p0 + p1 + p2) / 3.0;
            assert!(face_normal.dot(centroid) > 0.0, "triangle faces inward");
        }
    }

    #[test]
    fn test_box_zero_segments_clamped() {
        let mesh = generate_box(1.0, 1.0, 1.0, [0, 0, 0]);
        assert_eq!(mesh.vertex_count(), box_vertex_count(1, 1, 1));
    }

    #[test]
    fn test_icosphere_base_counts() {
        let mesh = generate_icosphere(1.0, 0);
        assert_eq!(mesh.vertex_count(), 12);
        assert_eq!(mesh.triangle_count(), 20);
    }

    #[test]
    fn test_icosphere_subdivided_counts() {
        // Shared vertices: 10 * cols^2 + 2
        let mesh = generate_icosphere(1.0, 3);
        assert_eq!(mesh.vertex_count(), 10 * 16 + 2);
        assert_eq!(mesh.triangle_count(), 20 * 16);
    }

    #[test]
    fn test_icosphere_on_sphere() {
        let mesh = generate_icosphere(2.0, 4);
        for p in &mesh.positions {
            assert!((Vec3::from(*p).length() - 2.0).abs() < 1e-4);
        }
        for tri in mesh.triangles() {
            let p0 = Vec3::from(mesh.positions[tri[0]]);
            let p1 = Vec3::from(mesh.positions[tri[1]]);
            let p2 = Vec3::from(mesh.positions[tri[2]]);
            assert!((p1 - p0).cross(p2 - p0).dot(p0 + p1 + p2) > 0.0);
        }
    }
}
