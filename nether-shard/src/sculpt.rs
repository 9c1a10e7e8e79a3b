//! Shard sculptor
//!
//! Deforms a base mesh into a crystal shard. Per vertex, using the base
//! (untransformed) coordinates:
//!
//! 1. Classify: top/bottom fracture cap, front window zone, or neither.
//!    The cap gate is evaluated first, so no vertex is claimed by both.
//! 2. Macro shape: `fbm3` scaled by turbulence, spread by a temperature wobble.
//! 3. Pits: `|noise3|^2` scaled by pitting, always erosive.
//! 4. Caps only: ridged fracture erosion along the tilted lattice.
//! 5. Displace radially (along the vertex's direction from the origin),
//!    attenuated inside the window.
//! 6. Window: blend toward the flat plane with `1 - bevel^6`.
//!
//! Normals are recomputed from the new positions afterwards.

use glam::{DVec3, Vec2, Vec3};
use tracing::debug;

use crate::mesh::{MeshApply, ShardMesh, SmoothNormals, Unweld};
use crate::noise::{NoiseEngine, RIDGED_OCTAVES};
use crate::params::{ResolvedParams, ShardParams};
use crate::rng::ShardRng;

/// Octaves of macro shape noise
const SHAPE_OCTAVES: u32 = 3;
/// Turbulence to shape-noise frequency
const TURBULENCE_FREQUENCY: f32 = 2.5;
/// Spatial frequency of the pit field
const PIT_FREQUENCY: f64 = 1.8;
/// Vertical weight of the hexagonal window metric (≈ sin 60°)
const HEX_Y: f32 = 0.866;
/// Window edge sharpness: `cutMask = 1 - bevel^BEVEL_POWER`
const BEVEL_POWER: i32 = 6;
/// Radial scaling never shrinks a vertex below this fraction of its length
const MIN_RADIAL_SCALE: f32 = 0.05;
/// Lattice tilt range drawn at nucleation
const MAX_LATTICE_TILT: f64 = 0.15;

const LENGTH_EPSILON: f32 = 1.0e-6;

/// Per-crystal random state drawn after the noise table is built
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Nucleus {
    /// Shear of the fracture lattice as (x, z) slopes
    pub lattice_tilt: Vec2,
    /// Dendritic/habit blend in [0, 1]
    pub habit_mix: f32,
}

impl Nucleus {
    /// Draw the lattice tilt from `rng` (two values) and derive the habit mix
    pub fn nucleate(rng: &mut ShardRng, params: &ResolvedParams) -> Self {
        let tx = rng.range(-MAX_LATTICE_TILT, MAX_LATTICE_TILT) as f32;
        let tz = rng.range(-MAX_LATTICE_TILT, MAX_LATTICE_TILT) as f32;
        Self {
            lattice_tilt: Vec2::new(tx, tz),
            habit_mix: params.habit_mix(),
        }
    }

    /// Untilted nucleus for sculpting without an RNG
    pub fn neutral(params: &ResolvedParams) -> Self {
        Self {
            lattice_tilt: Vec2::ZERO,
            habit_mix: params.habit_mix(),
        }
    }
}

/// Which flattening rule a base vertex falls under
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Zone {
    /// Top or bottom fracture cap, weighted 0 at the band edge to 1 at the extreme
    Cap(f32),
    /// Front window with its cut mask in (0, 1]
    Window(f32),
    /// Untouched by either rule
    Natural,
}

/// Window and cap geometry derived from the base mesh bounds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShardFrame {
    /// Largest |y| of the base mesh
    pub half_height: f32,
    /// |y| where the fracture caps begin
    pub band_y: f32,
    /// Hex-distance radius of the window (0 disables it)
    pub window_radius: f32,
    /// Z of the flat window plane
    pub plane_z: f32,
}

impl ShardFrame {
    /// Derive the frame for `base`; `None` for an empty mesh
    pub fn new(base: &ShardMesh, params: &ResolvedParams) -> Option<Self> {
        let (min, max) = base.bounds()?;
        let half_height = min.y.abs().max(max.y.abs());
        let band_y = params.fracture_band * half_height;

        let half_width = min.x.abs().min(max.x.abs());

        // Keep the window inside the band so the mask is already 0 at the cap
        // gate, and inside the side faces so it never wraps past the front
        let window_radius = (1.0 - params.supersaturation.clamp(0.0, 1.0) * 0.5)
            .min(HEX_Y * band_y)
            .min(half_width)
            .max(0.0);

        Some(Self {
            half_height,
            band_y,
            window_radius,
            plane_z: max.z + params.window_lift,
        })
    }

    /// Classify a base-mesh position
    pub fn classify(&self, p: Vec3) -> Zone {
        let ay = p.y.abs();
        if ay >= self.band_y && self.half_height > LENGTH_EPSILON {
            return Zone::Cap(smoothstep(self.band_y, self.half_height, ay));
        }

        if p.z > 0.0 && self.window_radius > LENGTH_EPSILON {
            let mask = cut_mask(hex_distance(p.x, p.y) / self.window_radius);
            if mask > 0.0 {
                return Zone::Window(mask);
            }
        }

        Zone::Natural
    }
}

/// Hexagonal distance on the XY plane
fn hex_distance(x: f32, y: f32) -> f32 {
    let ax = x.abs();
    ax.max(ax * 0.5 + y.abs() * HEX_Y)
}

/// `1 - bevel^6` with bevel clamped to [0, 1]
pub fn cut_mask(bevel: f32) -> f32 {
    1.0 - bevel.clamp(0.0, 1.0).powi(BEVEL_POWER)
}

fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    if edge1 <= edge0 {
        return if x >= edge1 { 1.0 } else { 0.0 };
    }
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Sculpts base meshes with one noise engine and parameter set
pub struct Sculptor<'a> {
    noise: &'a NoiseEngine,
    params: ResolvedParams,
    nucleus: Nucleus,
    edge_overlay: bool,
}

impl<'a> Sculptor<'a> {
    /// Create a sculptor; absent parameters take their defaults
    pub fn new(noise: &'a NoiseEngine, params: &ShardParams) -> Self {
        let params = params.resolve();
        Self {
            noise,
            params,
            nucleus: Nucleus::neutral(&params),
            edge_overlay: false,
        }
    }

    /// Use a nucleus drawn from the shard's RNG
    pub fn with_nucleus(mut self, nucleus: Nucleus) -> Self {
        self.nucleus = nucleus;
        self
    }

    /// Expand the result to a non-indexed mesh with barycentric tags
    pub fn with_edge_overlay(mut self, enabled: bool) -> Self {
        self.edge_overlay = enabled;
        self
    }

    /// Resolved parameters in use
    pub fn params(&self) -> &ResolvedParams {
        &self.params
    }

    /// Deform `base` into a new shard mesh
    pub fn sculpt(&self, base: &ShardMesh) -> ShardMesh {
        let mut mesh = base.clone();
        let n = mesh.positions.len();
        mesh.normals.resize(n, [0.0, 0.0, 1.0]);
        mesh.window.resize(n, 0.0);
        mesh.displacement.resize(n, 0.0);

        let Some(frame) = ShardFrame::new(base, &self.params) else {
            return mesh;
        };

        let p = &self.params;
        let turbulence = (p.turbulence * TURBULENCE_FREQUENCY) as f64;
        let spread = 0.1 + (p.temperature.abs() / 40.0) * 0.4;
        let pit_depth = p.pitting * 0.5;
        let fracture_depth = p.fracture_depth * (0.5 + 0.5 * self.nucleus.habit_mix);
        let ridge_density = p.ridge_density as f64;
        let tilt = self.nucleus.lattice_tilt;

        let mut window_count = 0usize;
        let mut cap_count = 0usize;

        for i in 0..n {
            let pos = Vec3::from(base.positions[i]);
            let zone = frame.classify(pos);
            let q = pos.as_dvec3();

            let shape = self.noise.fbm3(
                q.x * turbulence,
                q.y * turbulence,
                q.z * turbulence,
                SHAPE_OCTAVES,
            ) as f32;
            let mut disp = (shape - 0.5) * spread;

            let pit = self
                .noise
                .noise3(q.x * PIT_FREQUENCY, q.y * PIT_FREQUENCY, q.z * PIT_FREQUENCY)
                .abs() as f32;
            disp -= pit * pit * pit_depth;

            let mask = match zone {
                Zone::Cap(weight) => {
                    cap_count += 1;
                    let tilted = DVec3::new(
                        q.x,
                        q.y + (tilt.x * pos.x + tilt.y * pos.z) as f64,
                        q.z,
                    ) * ridge_density;
                    let ridge = self.noise.ridged3(tilted.x, tilted.y, tilted.z, RIDGED_OCTAVES);
                    disp -= ridge as f32 * fracture_depth * weight;
                    0.0
                }
                Zone::Window(mask) => {
                    window_count += 1;
                    mask
                }
                Zone::Natural => 0.0,
            };

            // Huge coefficients can overflow the sum; the host still gets a finite attribute
            let disp = if disp.is_nan() { 0.0 } else { disp.clamp(-f32::MAX, f32::MAX) };

            let applied = disp * (1.0 - mask);
            let len = pos.length();
            let mut out = if len > LENGTH_EPSILON {
                pos * (1.0 + applied / len).max(MIN_RADIAL_SCALE)
            } else {
                pos
            };

            if mask > 0.0 {
                let keep = 1.0 - mask;
                out.z = out.z * keep + frame.plane_z * mask;
                out.x = out.x * keep + pos.x * mask;
                out.y = out.y * keep + pos.y * mask;
            }

            mesh.positions[i] = out.to_array();
            mesh.window[i] = mask;
            mesh.displacement[i] = disp;
        }

        debug!(
            "sculpt: {} vertices, {} window, {} cap, plane z {:.3}",
            n, window_count, cap_count, frame.plane_z
        );

        mesh.apply(SmoothNormals::default());
        if self.edge_overlay {
            mesh.apply(Unweld);
        }
        mesh
    }
}

/// Sculpt `base` with default nucleus and no edge overlay
pub fn sculpt(base: &ShardMesh, noise: &NoiseEngine, params: &ShardParams) -> ShardMesh {
    Sculptor::new(noise, params).sculpt(base)
}
