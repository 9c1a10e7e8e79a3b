//! Shard mesh buffers, base primitives and modifiers

mod export;
mod modifiers;
mod primitives;

pub use export::write_obj;
pub use modifiers::{MeshApply, MeshModifier, SmoothNormals, Transform, Unweld};
pub use primitives::{generate_box, generate_icosphere};

use glam::Vec3;

/// Barycentric tags cycled over every triangle of a non-indexed mesh
pub const BARYCENTRIC_CYCLE: [[f32; 3]; 3] = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

/// Plain-data mesh handed to the host renderer
///
/// `window` and `displacement` are per-vertex and always as long as
/// `positions`. `barycentric` is only filled after [`Unweld`], at which
/// point `indices` is empty and every three consecutive vertices form a
/// triangle.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ShardMesh {
    /// Vertex positions as [x, y, z]
    pub positions: Vec<[f32; 3]>,
    /// Vertex normals as [x, y, z]
    pub normals: Vec<[f32; 3]>,
    /// Window membership per vertex, 0 (natural) to 1 (fully flattened)
    pub window: Vec<f32>,
    /// Radial displacement applied by the sculptor per vertex
    pub displacement: Vec<f32>,
    /// Per-vertex barycentric tag (empty while indexed)
    pub barycentric: Vec<[f32; 3]>,
    /// Triangle indices (empty once non-indexed)
    pub indices: Vec<u32>,
}

impl ShardMesh {
    /// Create an empty mesh
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a vertex with zeroed auxiliary scalars, returning its index
    ///
    /// On a tagged non-indexed mesh the vertex continues the barycentric cycle.
    pub fn add_vertex(&mut self, position: Vec3, normal: Vec3) -> u32 {
        let index = self.positions.len();
        self.positions.push(position.to_array());
        self.normals.push(normal.to_array());
        self.window.push(0.0);
        self.displacement.push(0.0);
        if !self.barycentric.is_empty() {
            self.barycentric.push(BARYCENTRIC_CYCLE[index % 3]);
        }
        index as u32
    }

    /// Add a triangle using three vertex indices
    pub fn add_triangle(&mut self, i0: u32, i1: u32, i2: u32) {
        self.indices.extend_from_slice(&[i0, i1, i2]);
    }

    /// Get vertex count
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Get triangle count
    pub fn triangle_count(&self) -> usize {
        if self.is_indexed() {
            self.indices.len() / 3
        } else {
            self.positions.len() / 3
        }
    }

    /// Whether triangles are described by `indices`
    pub fn is_indexed(&self) -> bool {
        !self.indices.is_empty()
    }

    /// Vertex indices of every triangle, indexed or not
    pub fn triangles(&self) -> Vec<[usize; 3]> {
        if self.is_indexed() {
            self.indices
                .chunks_exact(3)
                .map(|c| [c[0] as usize, c[1] as usize, c[2] as usize])
                .collect()
        } else {
            (0..self.positions.len() / 3)
                .map(|t| [t * 3, t * 3 + 1, t * 3 + 2])
                .collect()
        }
    }

    /// Axis-aligned bounds as (min, max); `None` for an empty mesh
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let first = Vec3::from(*self.positions.first()?);
        Some(
            self.positions
                .iter()
                .fold((first, first), |(min, max), p| {
                    let p = Vec3::from(*p);
                    (min.min(p), max.max(p))
                }),
        )
    }

    /// Whether every auxiliary array matches the vertex count
    pub fn aux_parity(&self) -> bool {
        let n = self.positions.len();
        self.normals.len() == n
            && self.window.len() == n
            && self.displacement.len() == n
            && (self.barycentric.is_empty() || self.barycentric.len() == n)
    }

    /// Whether every position and normal component is finite
    pub fn is_finite(&self) -> bool {
        self.positions
            .iter()
            .chain(self.normals.iter())
            .all(|v| v.iter().all(|c| c.is_finite()))
    }

    /// Raw position bytes for GPU upload
    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Raw normal bytes for GPU upload
    pub fn normal_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.normals)
    }

    /// Raw window-mask bytes for GPU upload
    pub fn window_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.window)
    }

    /// Raw displacement bytes for GPU upload
    pub fn displacement_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.displacement)
    }

    /// Raw barycentric bytes for GPU upload
    pub fn barycentric_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.barycentric)
    }

    /// Raw index bytes for GPU upload
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}
