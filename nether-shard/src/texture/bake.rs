//! Frost/crack surface texture
//!
//! Each pixel warps its x coordinate by a low-frequency noise field scaled by
//! turbulence, samples a second field at the warped point and turns it into
//! a crack intensity `|n|^sharpness * supersaturation * 2` over mid-gray.

use tracing::{debug, warn};

use super::Raster;
use crate::noise::NoiseEngine;
use crate::params::ShardParams;

const MAX_TEXTURE_SIZE: u32 = 8192;

const WARP_FREQUENCY: f64 = 0.05;
const WARP_SLICE: f64 = 10.0;
const WARP_AMPLITUDE: f64 = 20.0;
const CRACK_FREQUENCY: f64 = 0.02;
const CRACK_SLICE: f64 = 5.0;
const MIN_SHARPNESS: f64 = 2.0;
const BASELINE: f64 = 128.0;

/// Bake a square surface texture of `size` × `size` pixels
///
/// Sizes that are not a power of two are honored with a warning; a size of
/// zero is clamped to 1.
pub fn bake_surface(noise: &NoiseEngine, params: &ShardParams, size: u32) -> Raster {
    let size = match size {
        0 => {
            warn!("bake_surface: size must be >= 1, clamping to 1");
            1
        }
        s if s > MAX_TEXTURE_SIZE => {
            warn!("bake_surface: size {} too large, clamping to {}", s, MAX_TEXTURE_SIZE);
            MAX_TEXTURE_SIZE
        }
        s => {
            if !s.is_power_of_two() {
                warn!("bake_surface: size {} is not a power of two", s);
            }
            s
        }
    };

    let params = params.resolve();
    let turbulence = params.turbulence as f64;
    let saturation = params.supersaturation as f64;
    let sharpness = (params.crack_sharpness as f64).max(MIN_SHARPNESS);

    let mut raster = Raster::new(size, size);
    let mut cracked = 0usize;

    for py in 0..size {
        let y = py as f64;
        for px in 0..size {
            let x = px as f64;
            let warp = noise.noise3(x * WARP_FREQUENCY, y * WARP_FREQUENCY, WARP_SLICE)
                * turbulence
                * WARP_AMPLITUDE;
            let n = noise.noise3((x + warp) * CRACK_FREQUENCY, y * CRACK_FREQUENCY, CRACK_SLICE);
            let crack = n.abs().powf(sharpness) * saturation * 2.0;

            // NaN from extreme inputs lands on the baseline
            let value = BASELINE + crack * 255.0;
            let value = if value.is_nan() { BASELINE } else { value.clamp(0.0, 255.0) };
            let v = value as u8;
            if v != BASELINE as u8 {
                cracked += 1;
            }
            raster.set_pixel(px, py, [v, v, v, 255]);
        }
    }

    debug!("bake_surface: {}x{}, {} pixels off baseline", size, size, cracked);
    raster
}
