//! Shard parameter set
//!
//! Every knob is optional. Absent values resolve to documented defaults, so a
//! partial (or empty) parameter set is always valid. Explicit values are kept
//! as given, including zero.
//!
//! Parameters can be read from TOML:
//!
//! ```toml
//! temperature = -18.0
//! habit = 0.7
//! supersaturation = 0.2
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_TEMPERATURE: f32 = -12.0;
pub const DEFAULT_HABIT: f32 = 0.5;
pub const DEFAULT_SUPERSATURATION: f32 = 0.35;
pub const DEFAULT_TURBULENCE: f32 = 0.22;
pub const DEFAULT_PITTING: f32 = 0.5;
pub const DEFAULT_ANISOTROPY: f32 = 0.5;

pub const DEFAULT_WINDOW_LIFT: f32 = 0.1;
pub const DEFAULT_FRACTURE_BAND: f32 = 0.8;
pub const DEFAULT_FRACTURE_DEPTH: f32 = 0.12;
pub const DEFAULT_RIDGE_DENSITY: f32 = 2.0;
pub const DEFAULT_CRACK_SHARPNESS: f32 = 3.0;

pub const DEFAULT_IOR: f32 = 1.31;
pub const DEFAULT_DISPERSION: f32 = 0.018;
pub const DEFAULT_ABSORPTION: f32 = 0.05;
pub const DEFAULT_REFRACT_STRENGTH: f32 = 0.12;
pub const DEFAULT_PATCH_SCALE: f32 = 2.5;
pub const DEFAULT_MICRO_SCALE: f32 = 250.0;
pub const DEFAULT_BUMP_INTENSITY: f32 = 0.015;
pub const DEFAULT_VERTICAL_STRETCH: f32 = 20.0;

/// Error loading a parameter file
#[derive(Debug, thiserror::Error)]
pub enum ParamsError {
    #[error("Failed to read parameter file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid parameter file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Caller-supplied shard parameters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShardParams {
    /// Growth temperature in °C (≈ -40 to -1), drives the dendritic habit curve
    pub temperature: Option<f32>,
    /// Aspect ratio control (0 = short and fat, 1 = tall and thin)
    pub habit: Option<f32>,
    /// Shrinks the flat window as it grows (0-1)
    pub supersaturation: Option<f32>,
    /// Macro shape noise and texture warp amplitude (0-1)
    pub turbulence: Option<f32>,
    /// Depth of erosive pits (0-1)
    pub pitting: Option<f32>,
    /// Secondary habit-mix input
    pub anisotropy: Option<f32>,

    /// Height of the flat window plane above the base mesh's +Z extent
    pub window_lift: Option<f32>,
    /// Fraction of the half height where the fracture caps begin
    pub fracture_band: Option<f32>,
    /// Depth of ridged fracture erosion on the caps
    pub fracture_depth: Option<f32>,
    /// Spatial frequency of the fracture ridges
    pub ridge_density: Option<f32>,
    /// Exponent applied to crack noise in the surface texture (>= 2)
    pub crack_sharpness: Option<f32>,

    pub ior: Option<f32>,
    pub dispersion: Option<f32>,
    pub absorption: Option<f32>,
    pub refract_strength: Option<f32>,
    pub patch_scale: Option<f32>,
    pub micro_scale: Option<f32>,
    pub bump_intensity: Option<f32>,
    pub vertical_stretch: Option<f32>,
}

/// Fully-populated parameters with every default substituted
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedParams {
    pub temperature: f32,
    pub habit: f32,
    pub supersaturation: f32,
    pub turbulence: f32,
    pub pitting: f32,
    pub anisotropy: f32,
    pub window_lift: f32,
    pub fracture_band: f32,
    pub fracture_depth: f32,
    pub ridge_density: f32,
    pub crack_sharpness: f32,
    pub ior: f32,
    pub dispersion: f32,
    pub absorption: f32,
    pub refract_strength: f32,
    pub patch_scale: f32,
    pub micro_scale: f32,
    pub bump_intensity: f32,
    pub vertical_stretch: f32,
}

impl Default for ResolvedParams {
    fn default() -> Self {
        ShardParams::default().resolve()
    }
}

impl ShardParams {
    /// Parse parameters from a TOML document
    pub fn from_toml_str(s: &str) -> Result<Self, ParamsError> {
        Ok(toml::from_str(s)?)
    }

    /// Load parameters from a TOML file
    pub fn load(path: &Path) -> Result<Self, ParamsError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Overlay `other` on top of `self`: values set in `other` win
    pub fn merged(&self, other: &ShardParams) -> ShardParams {
        ShardParams {
            temperature: other.temperature.or(self.temperature),
            habit: other.habit.or(self.habit),
            supersaturation: other.supersaturation.or(self.supersaturation),
            turbulence: other.turbulence.or(self.turbulence),
            pitting: other.pitting.or(self.pitting),
            anisotropy: other.anisotropy.or(self.anisotropy),
            window_lift: other.window_lift.or(self.window_lift),
            fracture_band: other.fracture_band.or(self.fracture_band),
            fracture_depth: other.fracture_depth.or(self.fracture_depth),
            ridge_density: other.ridge_density.or(self.ridge_density),
            crack_sharpness: other.crack_sharpness.or(self.crack_sharpness),
            ior: other.ior.or(self.ior),
            dispersion: other.dispersion.or(self.dispersion),
            absorption: other.absorption.or(self.absorption),
            refract_strength: other.refract_strength.or(self.refract_strength),
            patch_scale: other.patch_scale.or(self.patch_scale),
            micro_scale: other.micro_scale.or(self.micro_scale),
            bump_intensity: other.bump_intensity.or(self.bump_intensity),
            vertical_stretch: other.vertical_stretch.or(self.vertical_stretch),
        }
    }

    /// Substitute defaults for every absent value
    pub fn resolve(&self) -> ResolvedParams {
        ResolvedParams {
            temperature: self.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            habit: self.habit.unwrap_or(DEFAULT_HABIT),
            supersaturation: self.supersaturation.unwrap_or(DEFAULT_SUPERSATURATION),
            turbulence: self.turbulence.unwrap_or(DEFAULT_TURBULENCE),
            pitting: self.pitting.unwrap_or(DEFAULT_PITTING),
            anisotropy: self.anisotropy.unwrap_or(DEFAULT_ANISOTROPY),
            window_lift: self.window_lift.unwrap_or(DEFAULT_WINDOW_LIFT),
            fracture_band: self.fracture_band.unwrap_or(DEFAULT_FRACTURE_BAND),
            fracture_depth: self.fracture_depth.unwrap_or(DEFAULT_FRACTURE_DEPTH),
            ridge_density: self.ridge_density.unwrap_or(DEFAULT_RIDGE_DENSITY),
            crack_sharpness: self.crack_sharpness.unwrap_or(DEFAULT_CRACK_SHARPNESS),
            ior: self.ior.unwrap_or(DEFAULT_IOR),
            dispersion: self.dispersion.unwrap_or(DEFAULT_DISPERSION),
            absorption: self.absorption.unwrap_or(DEFAULT_ABSORPTION),
            refract_strength: self.refract_strength.unwrap_or(DEFAULT_REFRACT_STRENGTH),
            patch_scale: self.patch_scale.unwrap_or(DEFAULT_PATCH_SCALE),
            micro_scale: self.micro_scale.unwrap_or(DEFAULT_MICRO_SCALE),
            bump_intensity: self.bump_intensity.unwrap_or(DEFAULT_BUMP_INTENSITY),
            vertical_stretch: self.vertical_stretch.unwrap_or(DEFAULT_VERTICAL_STRETCH),
        }
    }
}

impl ResolvedParams {
    /// Spell every value out explicitly (the inverse of [`ShardParams::resolve`])
    pub fn to_explicit(&self) -> ShardParams {
        ShardParams {
            temperature: Some(self.temperature),
            habit: Some(self.habit),
            supersaturation: Some(self.supersaturation),
            turbulence: Some(self.turbulence),
            pitting: Some(self.pitting),
            anisotropy: Some(self.anisotropy),
            window_lift: Some(self.window_lift),
            fracture_band: Some(self.fracture_band),
            fracture_depth: Some(self.fracture_depth),
            ridge_density: Some(self.ridge_density),
            crack_sharpness: Some(self.crack_sharpness),
            ior: Some(self.ior),
            dispersion: Some(self.dispersion),
            absorption: Some(self.absorption),
            refract_strength: Some(self.refract_strength),
            patch_scale: Some(self.patch_scale),
            micro_scale: Some(self.micro_scale),
            bump_intensity: Some(self.bump_intensity),
            vertical_stretch: Some(self.vertical_stretch),
        }
    }

    /// Habit clamped to [0, 1] for anything that must stay geometrically valid
    pub fn habit_clamped(&self) -> f32 {
        self.habit.clamp(0.0, 1.0)
    }

    /// Base box dimensions (width, height, depth) driven by habit
    ///
    /// Low habit gives a short, fat crystal; high habit a tall, thin one.
    pub fn box_dimensions(&self) -> [f32; 3] {
        let h = self.habit_clamped();
        [3.5 - h * 1.5, 2.5 + h * 2.5, 2.0 - h * 0.8]
    }

    /// Bell curve over normalized temperature, peaking in the dendritic zone
    pub fn dendritic_zone(&self) -> f32 {
        let t_norm = (self.temperature.abs() - 1.0) / 39.0;
        1.0 - (t_norm * 2.0 - 0.5).abs() * 2.0
    }

    /// Blend of dendritic growth and habit, clamped to [0, 1]
    pub fn habit_mix(&self) -> f32 {
        (self.dendritic_zone() * self.anisotropy + self.habit).clamp(0.0, 1.0)
    }

    /// Shading uniforms for the host renderer
    pub fn shading_uniforms(&self) -> ShadingUniforms {
        ShadingUniforms {
            ior: self.ior,
            dispersion: self.dispersion,
            absorption: self.absorption,
            refract_strength: self.refract_strength,
            patch_scale: self.patch_scale,
            micro_scale: self.micro_scale,
            bump_intensity: self.bump_intensity,
            vertical_stretch: self.vertical_stretch,
            habit_mix: self.habit_mix(),
        }
    }
}

/// Scalar uniforms consumed by the refraction/frost shader
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ShadingUniforms {
    pub ior: f32,
    pub dispersion: f32,
    pub absorption: f32,
    pub refract_strength: f32,
    pub patch_scale: f32,
    pub micro_scale: f32,
    pub bump_intensity: f32,
    pub vertical_stretch: f32,
    pub habit_mix: f32,
}
