//! Procedural crystal shard generation
//!
//! A seed and a parameter set deterministically produce an ice shard: a
//! sculpted mesh with a flattened front window and fractured caps, a
//! frost/crack surface texture, and the scalar uniforms a refraction shader
//! needs. Everything is plain data; GPU upload happens on the host side via
//! [`RenderHost`].
//!
//! # Example
//! ```no_run
//! use nether_shard::*;
//! use std::path::Path;
//!
//! let params = ShardParams {
//!     temperature: Some(-15.0),
//!     habit: Some(0.7),
//!     ..Default::default()
//! };
//! let shard = ShardGenerator::new(42, params).generate(&GenerateOptions::default());
//!
//! mesh::write_obj(&shard.mesh, Path::new("shard.obj"), "shard")?;
//! texture::write_png(&shard.texture, Path::new("shard.png"))?;
//! # Ok::<(), std::io::Error>(())
//! ```
//!
//! The lower-level stages can also be driven directly:
//!
//! ```no_run
//! use nether_shard::mesh::generate_box;
//! use nether_shard::{sculpt, NoiseEngine, ShardParams, ShardRng};
//!
//! let mut rng = ShardRng::new(7);
//! let noise = NoiseEngine::new(&mut rng);
//! let base = generate_box(2.75, 3.75, 1.6, [32, 48, 32]);
//! let mesh = sculpt(&base, &noise, &ShardParams::default());
//! assert_eq!(mesh.vertex_count(), base.vertex_count());
//! ```

pub mod generator;
pub mod instance;
pub mod mesh;
pub mod noise;
pub mod params;
pub mod rng;
pub mod sculpt;
pub mod texture;

pub use generator::{BaseShape, GenerateOptions, Shard, ShardGenerator};
pub use instance::{RebuildDebouncer, RenderHost, ShardInstance};
pub use mesh::ShardMesh;
pub use noise::NoiseEngine;
pub use params::{ParamsError, ResolvedParams, ShadingUniforms, ShardParams};
pub use rng::ShardRng;
pub use sculpt::{sculpt, Nucleus, Sculptor};
pub use texture::{bake_surface, MaskRaster, Raster};
