//! Seeded shard generation
//!
//! One seed drives everything in a fixed order: the RNG builds the noise
//! permutation table (255 draws), then draws the lattice tilt. The same seed
//! and parameters always produce the same shard.

use tracing::{debug, info};

use crate::mesh::{generate_box, generate_icosphere, MeshApply, ShardMesh, Transform};
use crate::noise::NoiseEngine;
use crate::params::{ShadingUniforms, ShardParams};
use crate::rng::ShardRng;
use crate::sculpt::{Nucleus, Sculptor};
use crate::texture::{bake_surface, Raster, DEFAULT_TEXTURE_SIZE};

/// Default box segments along X, Y, Z
pub const DEFAULT_BOX_SEGMENTS: [u32; 3] = [32, 48, 32];
/// Default icosahedron subdivision detail
pub const DEFAULT_ICOSAHEDRON_DETAIL: u32 = 24;

/// Base mesh the sculptor starts from, sized by the habit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseShape {
    /// Segmented box
    Box { segments: [u32; 3] },
    /// Subdivided icosahedron stretched to the box half extents
    Icosahedron { detail: u32 },
}

impl Default for BaseShape {
    fn default() -> Self {
        Self::Box {
            segments: DEFAULT_BOX_SEGMENTS,
        }
    }
}

/// Output options that don't affect the crystal itself
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerateOptions {
    pub shape: BaseShape,
    /// Surface texture edge length in pixels
    pub texture_size: u32,
    /// Expand to non-indexed triangles with barycentric tags
    pub edge_overlay: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            shape: BaseShape::default(),
            texture_size: DEFAULT_TEXTURE_SIZE,
            edge_overlay: false,
        }
    }
}

/// Everything the host needs to draw one shard
#[derive(Debug, Clone)]
pub struct Shard {
    pub mesh: ShardMesh,
    pub texture: Raster,
    pub uniforms: ShadingUniforms,
    pub nucleus: Nucleus,
}

/// Seeded generator owning its noise engine and nucleus
pub struct ShardGenerator {
    seed: u32,
    params: ShardParams,
    noise: NoiseEngine,
    nucleus: Nucleus,
}

impl ShardGenerator {
    pub fn new(seed: u32, params: ShardParams) -> Self {
        let mut rng = ShardRng::new(seed);
        let noise = NoiseEngine::new(&mut rng);
        let nucleus = Nucleus::nucleate(&mut rng, &params.resolve());
        Self {
            seed,
            params,
            noise,
            nucleus,
        }
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn params(&self) -> &ShardParams {
        &self.params
    }

    pub fn noise(&self) -> &NoiseEngine {
        &self.noise
    }

    pub fn nucleus(&self) -> Nucleus {
        self.nucleus
    }

    /// Build the unsculpted base mesh for `shape`
    pub fn base_mesh(&self, shape: BaseShape) -> ShardMesh {
        let [w, h, d] = self.params.resolve().box_dimensions();
        match shape {
            BaseShape::Box { segments } => generate_box(w, h, d, segments),
            BaseShape::Icosahedron { detail } => {
                let mut mesh = generate_icosphere(1.0, detail);
                mesh.apply(Transform::scale(w * 0.5, h * 0.5, d * 0.5));
                mesh
            }
        }
    }

    /// Sculpt the mesh and bake the surface texture
    pub fn generate(&self, options: &GenerateOptions) -> Shard {
        let base = self.base_mesh(options.shape);
        let sculptor = Sculptor::new(&self.noise, &self.params)
            .with_nucleus(self.nucleus)
            .with_edge_overlay(options.edge_overlay);

        let mesh = sculptor.sculpt(&base);
        let texture = bake_surface(&self.noise, &self.params, options.texture_size);
        let uniforms = sculptor.params().shading_uniforms();

        debug!(
            "generate: tilt ({:.3}, {:.3}), habit mix {:.3}",
            self.nucleus.lattice_tilt.x, self.nucleus.lattice_tilt.y, self.nucleus.habit_mix
        );
        info!(
            "Generated shard (seed {}): {} vertices, {} triangles, {}x{} texture",
            self.seed,
            mesh.vertex_count(),
            mesh.triangle_count(),
            texture.width,
            texture.height
        );

        Shard {
            mesh,
            texture,
            uniforms,
            nucleus: self.nucleus,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_options() -> GenerateOptions {
        GenerateOptions {
            shape: BaseShape::Box {
                segments: [8, 8, 8],
            },
            texture_size: 16,
            edge_overlay: false,
        }
    }

    #[test]
    fn test_nucleus_follows_permutation_draws() {
        let generator = ShardGenerator::new(42, ShardParams::default());

        let mut rng = ShardRng::new(42);
        for _ in 0..255 {
            rng.next_f64();
        }
        let expected = Nucleus::nucleate(&mut rng, &ShardParams::default().resolve());
        assert_eq!(generator.nucleus(), expected);
    }

    #[test]
    fn test_generate_deterministic() {
        let a = ShardGenerator::new(42, ShardParams::default()).generate(&small_options());
        let b = ShardGenerator::new(42, ShardParams::default()).generate(&small_options());
        assert_eq!(a.mesh, b.mesh);
        assert_eq!(a.texture, b.texture);
        assert_eq!(a.uniforms, b.uniforms);
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = ShardGenerator::new(1, ShardParams::default()).generate(&small_options());
        let b = ShardGenerator::new(2, ShardParams::default()).generate(&small_options());
        assert_ne!(a.mesh.positions, b.mesh.positions);
    }

    #[test]
    fn test_icosahedron_base_extents() {
        let generator = ShardGenerator::new(3, ShardParams::default());
        let base = generator.base_mesh(BaseShape::Icosahedron { detail: 8 });
        let (min, max) = base.bounds().unwrap();

        // Default habit 0.5 gives 2.75 x 3.75 x 1.6
        assert!(max.y > 1.8 && max.y <= 1.875 + 1e-4);
        assert!(min.y < -1.8 && min.y >= -1.875 - 1e-4);
        assert!(max.x <= 1.375 + 1e-4);
        assert!(max.z <= 0.8 + 1e-4);
    }

    #[test]
    fn test_generate_icosahedron_overlay() {
        let options = GenerateOptions {
            shape: BaseShape::Icosahedron { detail: 4 },
            texture_size: 8,
            edge_overlay: true,
        };
        let shard = ShardGenerator::new(9, ShardParams::default()).generate(&options);
        assert!(!shard.mesh.is_indexed());
        assert!(shard.mesh.aux_parity());
        assert!(shard.mesh.is_finite());
        assert_eq!(shard.texture.width, 8);
    }

    #[test]
    fn test_uniforms_carry_habit_mix() {
        let shard = ShardGenerator::new(5, ShardParams::default()).generate(&small_options());
        assert_eq!(shard.uniforms.habit_mix, shard.nucleus.habit_mix);
        assert_eq!(shard.uniforms.ior, crate::params::DEFAULT_IOR);
    }
}
