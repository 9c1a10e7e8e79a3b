//! Integration tests for nether-shard
//!
//! Runs the full pipeline: seed -> noise -> sculpt/bake -> export

use glam::Vec2;
use nether_shard::mesh::{generate_box, write_obj};
use nether_shard::texture::write_png;
use nether_shard::*;
use tempfile::tempdir;

fn reference_params() -> ShardParams {
    ShardParams {
        temperature: Some(-12.0),
        habit: Some(0.5),
        supersaturation: Some(0.35),
        turbulence: Some(0.22),
        pitting: Some(0.5),
        ..Default::default()
    }
}

fn box_vertex_count(sx: usize, sy: usize, sz: usize) -> usize {
    2 * ((sx + 1) * (sy + 1) + (sx + 1) * (sz + 1) + (sy + 1) * (sz + 1))
}

/// Seed 42 on the 32x48x32 reference box
#[test]
fn test_reference_scenario() {
    let params = reference_params();
    let [w, h, d] = params.resolve().box_dimensions();
    assert_eq!([w, h, d], [2.75, 3.75, 1.6]);

    let base = generate_box(w, h, d, [32, 48, 32]);
    let sculpt_once = || {
        let mut rng = ShardRng::new(42);
        let noise = NoiseEngine::new(&mut rng);
        sculpt(&base, &noise, &params)
    };

    let mesh = sculpt_once();
    assert_eq!(mesh.vertex_count(), base.vertex_count());
    assert_eq!(mesh.vertex_count(), box_vertex_count(32, 48, 32));
    assert!(mesh.is_finite());
    assert!(mesh.aux_parity());

    let mut window_vertices = 0;
    for (p, &w) in mesh.positions.iter().zip(&mesh.window) {
        if w > 0.0 {
            window_vertices += 1;
            assert!(p[2] > 0.0, "window vertex outside +Z: {:?}", p);
        }
    }
    assert!(window_vertices > 0);

    assert_eq!(sculpt_once().positions, mesh.positions);
}

#[test]
fn test_generator_matches_reference_vertex_count() {
    let shard = ShardGenerator::new(42, reference_params()).generate(&GenerateOptions {
        texture_size: 64,
        ..Default::default()
    });
    assert_eq!(shard.mesh.vertex_count(), box_vertex_count(32, 48, 32));
    assert_eq!(shard.texture.pixels.len(), 64 * 64 * 4);
}

#[test]
fn test_empty_params_match_defaults() {
    let options = GenerateOptions {
        shape: BaseShape::Box {
            segments: [8, 8, 8],
        },
        texture_size: 32,
        edge_overlay: true,
    };

    let implicit = ShardGenerator::new(42, ShardParams::default()).generate(&options);
    let explicit =
        ShardGenerator::new(42, ShardParams::default().resolve().to_explicit()).generate(&options);

    assert_eq!(implicit.mesh, explicit.mesh);
    assert_eq!(implicit.texture, explicit.texture);
    assert_eq!(implicit.uniforms, explicit.uniforms);
}

#[test]
fn test_toml_params_drive_generation() {
    let params = ShardParams::from_toml_str(
        r#"
        temperature = -18.0
        habit = 0.9
        pitting = 0.0
        "#,
    )
    .expect("Failed to parse params");

    let shard = ShardGenerator::new(3, params).generate(&GenerateOptions {
        shape: BaseShape::Icosahedron { detail: 6 },
        texture_size: 16,
        edge_overlay: false,
    });

    // Habit 0.9 is taller than it is wide
    let (min, max) = shard.mesh.bounds().expect("Mesh should not be empty");
    let size = max - min;
    assert!(size.y > size.x);
    assert!(shard.mesh.is_finite());
}

#[test]
fn test_mask_paint_sequence() {
    let mut mask = MaskRaster::default();
    let strokes = [
        (Vec2::new(0.5, 0.5), 30.0),
        (Vec2::new(0.52, 0.48), 30.0),
        (Vec2::new(0.1, 0.95), 12.0),
        (Vec2::new(1.2, -0.3), 40.0),
    ];

    let mut whites = 0;
    for (uv, radius) in strokes {
        mask.mark_clean();
        mask.paint(uv, radius);
        assert!(mask.is_dirty());

        let now = mask
            .raster()
            .pixels
            .chunks_exact(4)
            .filter(|c| c[0] == 255)
            .count();
        assert!(now >= whites);
        whites = now;
    }
    assert!(whites > 0);
}

#[test]
fn test_export_outputs() {
    let dir = tempdir().expect("Failed to create temp dir");
    let shard = ShardGenerator::new(8, ShardParams::default()).generate(&GenerateOptions {
        shape: BaseShape::Box {
            segments: [4, 4, 4],
        },
        texture_size: 32,
        edge_overlay: false,
    });

    let obj_path = dir.path().join("shard.obj");
    let png_path = dir.path().join("shard.png");
    write_obj(&shard.mesh, &obj_path, "shard").expect("Failed to write OBJ");
    write_png(&shard.texture, &png_path).expect("Failed to write PNG");

    let obj = std::fs::read_to_string(&obj_path).expect("Failed to read OBJ");
    assert_eq!(
        obj.lines().filter(|l| l.starts_with("v ")).count(),
        shard.mesh.vertex_count()
    );

    let png = std::fs::read(&png_path).expect("Failed to read PNG");
    assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");

    let json = serde_json::to_value(shard.uniforms).expect("Failed to serialize uniforms");
    assert!(json.get("ior").is_some());
    assert!(json.get("habit_mix").is_some());
}
