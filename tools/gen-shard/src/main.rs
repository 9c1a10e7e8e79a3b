//! gen-shard - crystal shard generator
//!
//! Runs the shard pipeline for one seed and writes the sculpted mesh (OBJ),
//! surface texture and mask (PNG) and shading uniforms (JSON).

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};

use nether_shard::mesh::write_obj;
use nether_shard::texture::write_png;
use nether_shard::{BaseShape, GenerateOptions, MaskRaster, ShardGenerator, ShardParams, ShardRng};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Shape {
    /// Segmented box
    Box,
    /// Subdivided icosahedron
    Icosahedron,
}

#[derive(Parser)]
#[command(name = "gen-shard")]
#[command(about = "Procedural crystal shard generator")]
#[command(version)]
struct Cli {
    /// Seed (negative values wrap to 32 bits, 0 behaves as 1)
    #[arg(short, long, default_value_t = 42, allow_negative_numbers = true)]
    seed: i64,

    /// Parameter file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output directory
    #[arg(short, long, default_value = "shard-out")]
    output: PathBuf,

    /// Base mesh
    #[arg(long, value_enum, default_value_t = Shape::Box)]
    shape: Shape,

    /// Box segments as X,Y,Z
    #[arg(long, value_delimiter = ',', default_values_t = [32, 48, 32])]
    segments: Vec<u32>,

    /// Icosahedron subdivision detail
    #[arg(long, default_value_t = 24)]
    detail: u32,

    /// Surface texture size in pixels
    #[arg(long, default_value_t = 512)]
    texture_size: u32,

    /// Write non-indexed triangles (barycentric edge overlay)
    #[arg(long)]
    non_indexed: bool,

    /// Growth temperature override (°C)
    #[arg(long, allow_negative_numbers = true)]
    temperature: Option<f32>,

    /// Habit override (0 = short and fat, 1 = tall and thin)
    #[arg(long)]
    habit: Option<f32>,

    /// Supersaturation override
    #[arg(long)]
    supersaturation: Option<f32>,

    /// Turbulence override
    #[arg(long)]
    turbulence: Option<f32>,

    /// Pitting override
    #[arg(long)]
    pitting: Option<f32>,
}

impl Cli {
    fn overrides(&self) -> ShardParams {
        ShardParams {
            temperature: self.temperature,
            habit: self.habit,
            supersaturation: self.supersaturation,
            turbulence: self.turbulence,
            pitting: self.pitting,
            ..Default::default()
        }
    }

    fn options(&self) -> GenerateOptions {
        let shape = match self.shape {
            Shape::Box => {
                let mut segments = [32, 48, 32];
                for (dst, src) in segments.iter_mut().zip(&self.segments) {
                    *dst = *src;
                }
                BaseShape::Box { segments }
            }
            Shape::Icosahedron => BaseShape::Icosahedron {
                detail: self.detail,
            },
        };
        GenerateOptions {
            shape,
            texture_size: self.texture_size,
            edge_overlay: self.non_indexed,
        }
    }
}

fn load_params(config: Option<&Path>) -> Result<ShardParams> {
    match config {
        Some(path) => ShardParams::load(path)
            .with_context(|| format!("Failed to load parameters from {}", path.display())),
        None => Ok(ShardParams::default()),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    // defaults < file < command line
    let params = load_params(cli.config.as_deref())?.merged(&cli.overrides());
    let seed = ShardRng::from_signed(cli.seed).state();

    tracing::info!("Generating shard: seed {} -> {:?}", cli.seed, cli.output);
    let shard = ShardGenerator::new(seed, params).generate(&cli.options());

    std::fs::create_dir_all(&cli.output)
        .with_context(|| format!("Failed to create {}", cli.output.display()))?;

    let obj_path = cli.output.join("shard.obj");
    write_obj(&shard.mesh, &obj_path, "shard")
        .with_context(|| format!("Failed to write {}", obj_path.display()))?;

    let texture_path = cli.output.join("surface.png");
    write_png(&shard.texture, &texture_path)
        .with_context(|| format!("Failed to write {}", texture_path.display()))?;

    let mask_path = cli.output.join("mask.png");
    write_png(MaskRaster::default().raster(), &mask_path)
        .with_context(|| format!("Failed to write {}", mask_path.display()))?;

    let uniforms_path = cli.output.join("uniforms.json");
    let json = serde_json::to_string_pretty(&shard.uniforms)?;
    std::fs::write(&uniforms_path, json)
        .with_context(|| format!("Failed to write {}", uniforms_path.display()))?;

    tracing::info!(
        "Wrote {} vertices, {} triangles to {:?}",
        shard.mesh.vertex_count(),
        shard.mesh.triangle_count(),
        cli.output
    );
    Ok(())
}
