//! Shard surface rasters
//!
//! [`bake_surface`] produces the frost/crack texture, [`MaskRaster`] is the
//! paintable repaint mask. Both are plain RGBA8 buffers for the host to upload.

mod bake;
mod export;
mod mask;

pub use bake::bake_surface;
pub use export::write_png;
pub use mask::{MaskRaster, DEFAULT_MASK_SIZE};

/// Default surface texture edge length in pixels
pub const DEFAULT_TEXTURE_SIZE: u32 = 512;

/// RGBA8 raster, row-major, 4 bytes per pixel
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Raster {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// RGBA pixel data (row-major order)
    pub pixels: Vec<u8>,
}

impl Raster {
    /// Create a raster initialized to transparent black
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0u8; width as usize * height as usize * 4],
        }
    }

    /// Create a raster filled with a solid color
    pub fn filled(width: u32, height: u32, color: [u8; 4]) -> Self {
        let mut raster = Self::new(width, height);
        for chunk in raster.pixels.chunks_exact_mut(4) {
            chunk.copy_from_slice(&color);
        }
        raster
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    /// Get pixel at (x, y)
    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let idx = self.index(x, y);
        [
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ]
    }

    /// Set pixel at (x, y)
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, color: [u8; 4]) {
        let idx = self.index(x, y);
        self.pixels[idx..idx + 4].copy_from_slice(&color);
    }

    /// Whether both edges are powers of two (GPU mipmapping friendly)
    pub fn is_power_of_two(&self) -> bool {
        self.width.is_power_of_two() && self.height.is_power_of_two()
    }
}
