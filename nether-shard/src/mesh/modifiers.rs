//! Mesh modifiers for shard geometry
//!
//! Modifiers operate on a [`ShardMesh`] in place and always keep the
//! per-vertex auxiliary arrays in step with the vertex list.
//!
//! # Fluent API
//!
//! ```no_run
//! use nether_shard::mesh::*;
//!
//! let mut mesh = generate_icosphere(1.0, 8);
//! mesh.apply(Transform::scale(1.4, 1.9, 0.8))
//!     .apply(SmoothNormals::default())
//!     .apply(Unweld);
//! ```

use glam::{Mat4, Vec3};
use std::collections::HashMap;

use super::{ShardMesh, BARYCENTRIC_CYCLE};

/// Trait for mesh modifiers
pub trait MeshModifier {
    /// Apply this modifier to a mesh, modifying it in place
    fn apply(&self, mesh: &mut ShardMesh);
}

/// Extension trait for fluent modifier application
pub trait MeshApply {
    /// Apply a modifier and return `&mut Self` for chaining
    fn apply<M: MeshModifier>(&mut self, modifier: M) -> &mut Self;
}

impl MeshApply for ShardMesh {
    fn apply<M: MeshModifier>(&mut self, modifier: M) -> &mut Self {
        modifier.apply(self);
        self
    }
}

/// Transform mesh vertices and normals using a 4x4 matrix
///
/// Normals use the inverse-transpose so non-uniform scaling keeps them
/// perpendicular to the surface.
pub struct Transform {
    matrix: Mat4,
}

impl Transform {
    /// Create a non-uniform scale transform
    pub fn scale(x: f32, y: f32, z: f32) -> Self {
        Self {
            matrix: Mat4::from_scale(Vec3::new(x, y, z)),
        }
    }

    /// Create a transform from a custom 4x4 matrix
    pub fn from_matrix(matrix: Mat4) -> Self {
        Self { matrix }
    }
}

impl MeshModifier for Transform {
    fn apply(&self, mesh: &mut ShardMesh) {
        let normal_matrix = self.matrix.inverse().transpose();

        for pos in &mut mesh.positions {
            *pos = self.matrix.transform_point3(Vec3::from(*pos)).to_array();
        }

        for norm in &mut mesh.normals {
            let n = normal_matrix.transform_vector3(Vec3::from(*norm));
            *norm = n.normalize_or_zero().to_array();
        }
    }
}

/// Recalculate normals by averaging face normals over shared positions
///
/// Vertices closer than `weld_threshold` are treated as one point, so
/// duplicated seam vertices (box edges, unwelded triangles) shade
/// continuously. Positions are bucketed on a grid of cell size
/// `weld_threshold` and only the 27 neighbouring cells are searched.
pub struct SmoothNormals {
    /// Distance threshold for considering vertices as sharing a position
    pub weld_threshold: f32,
}

impl Default for SmoothNormals {
    fn default() -> Self {
        Self {
            weld_threshold: 0.0001,
        }
    }
}

impl SmoothNormals {
    /// Assign every vertex to a weld group, returning group ids per vertex
    fn weld_groups(&self, positions: &[[f32; 3]]) -> (Vec<usize>, usize) {
        let threshold = self.weld_threshold.max(f32::EPSILON);
        let cell_of = |p: Vec3| -> [i64; 3] {
            let c = (p / threshold).floor();
            [c.x as i64, c.y as i64, c.z as i64]
        };

        // cell -> (group id, representative position)
        let mut cells: HashMap<[i64; 3], Vec<(usize, Vec3)>> = HashMap::new();
        let mut group_of = Vec::with_capacity(positions.len());
        let mut group_count = 0;

        for pos in positions {
            let p = Vec3::from(*pos);
            let cell = cell_of(p);

            let mut found = None;
            'search: for dx in -1..=1 {
                for dy in -1..=1 {
                    for dz in -1..=1 {
                        let key = [cell[0] + dx, cell[1] + dy, cell[2] + dz];
                        if let Some(entries) = cells.get(&key) {
                            for &(group, rep) in entries {
                                if rep.distance(p) < threshold {
                                    found = Some(group);
                                    break 'search;
                                }
                            }
                        }
                    }
                }
            }

            let group = match found {
                Some(group) => group,
                None => {
                    let group = group_count;
                    group_count += 1;
                    cells.entry(cell).or_default().push((group, p));
                    group
                }
            };
            group_of.push(group);
        }

        (group_of, group_count)
    }
}

impl MeshModifier for SmoothNormals {
    fn apply(&self, mesh: &mut ShardMesh) {
        let (group_of, group_count) = self.weld_groups(&mesh.positions);
        let mut accum = vec![Vec3::ZERO; group_count];

        for tri in mesh.triangles() {
            let p0 = Vec3::from(mesh.positions[tri[0]]);
            let p1 = Vec3::from(mesh.positions[tri[1]]);
            let p2 = Vec3::from(mesh.positions[tri[2]]);

            // Degenerate triangles contribute nothing
            let face_normal = (p1 - p0).cross(p2 - p0).normalize_or_zero();

            // A triangle touching a group twice (collapsed edge) counts once
            let groups = [group_of[tri[0]], group_of[tri[1]], group_of[tri[2]]];
            for (k, &g) in groups.iter().enumerate() {
                if !groups[..k].contains(&g) {
                    accum[g] += face_normal;
                }
            }
        }

        for (i, normal) in mesh.normals.iter_mut().enumerate() {
            let n = accum[group_of[i]].normalize_or_zero();
            let n = if n == Vec3::ZERO {
                // Isolated or fully degenerate: fall back to the radial direction
                let radial = Vec3::from(mesh.positions[i]).normalize_or_zero();
                if radial == Vec3::ZERO { Vec3::Z } else { radial }
            } else {
                n
            };
            *normal = n.to_array();
        }
    }
}

/// Expand an indexed mesh into one vertex per triangle corner
///
/// Normals and auxiliary scalars are copied from the source vertex, and
/// every triangle's corners are tagged (1,0,0), (0,1,0), (0,0,1) so a
/// shader can draw crisp edges without connectivity. A mesh that is
/// already non-indexed only gets (re)tagged.
pub struct Unweld;

impl MeshModifier for Unweld {
    fn apply(&self, mesh: &mut ShardMesh) {
        if mesh.is_indexed() {
            let corner_count = mesh.indices.len() - mesh.indices.len() % 3;
            let mut positions = Vec::with_capacity(corner_count);
            let mut normals = Vec::with_capacity(corner_count);
            let mut window = Vec::with_capacity(corner_count);
            let mut displacement = Vec::with_capacity(corner_count);

            for &idx in &mesh.indices[..corner_count] {
                let idx = idx as usize;
                positions.push(mesh.positions[idx]);
                normals.push(mesh.normals[idx]);
                window.push(mesh.window[idx]);
                displacement.push(mesh.displacement[idx]);
            }

            mesh.positions = positions;
            mesh.normals = normals;
            mesh.window = window;
            mesh.displacement = displacement;
            mesh.indices.clear();
        }

        mesh.barycentric = (0..mesh.positions.len())
            .map(|i| BARYCENTRIC_CYCLE[i % 3])
            .collect();
    }
}
