//! Paintable repaint mask
//!
//! Starts black. [`MaskRaster::paint`] stamps filled white discs and flags
//! the mask dirty so the host knows to reupload it.

use glam::Vec2;
use tracing::warn;

use super::Raster;

/// Default mask edge length in pixels
pub const DEFAULT_MASK_SIZE: u32 = 512;

const BLACK: [u8; 4] = [0, 0, 0, 255];
const WHITE: [u8; 4] = [255, 255, 255, 255];

/// Square mask raster with a reupload flag
#[derive(Clone, Debug, PartialEq)]
pub struct MaskRaster {
    raster: Raster,
    dirty: bool,
}

impl Default for MaskRaster {
    fn default() -> Self {
        Self::new(DEFAULT_MASK_SIZE)
    }
}

impl MaskRaster {
    /// Create an all-black mask of `size` × `size` pixels
    pub fn new(size: u32) -> Self {
        let size = if size == 0 {
            warn!("MaskRaster: size must be >= 1, clamping to 1");
            1
        } else {
            if !size.is_power_of_two() {
                warn!("MaskRaster: size {} is not a power of two", size);
            }
            size
        };
        Self {
            raster: Raster::filled(size, size, BLACK),
            dirty: false,
        }
    }

    /// Edge length in pixels
    pub fn size(&self) -> u32 {
        self.raster.width
    }

    pub fn raster(&self) -> &Raster {
        &self.raster
    }

    /// Whether the mask changed since the host last uploaded it
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clear the reupload flag after the host has consumed the mask
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Stamp a filled white disc centered at `uv` with a radius in pixels
    ///
    /// UV (0, 0) is the bottom-left corner, so V is flipped onto raster rows.
    /// A pixel is covered when its center lies inside the disc. The mask is
    /// flagged dirty on every call, even when the disc misses the raster.
    pub fn paint(&mut self, uv: Vec2, radius: f32) {
        self.dirty = true;

        let size = self.raster.width as f32;
        let center = Vec2::new(uv.x * size, (1.0 - uv.y) * size);
        if !center.is_finite() || !radius.is_finite() || radius <= 0.0 {
            return;
        }

        let max = self.raster.width as f32 - 1.0;
        let x0 = (center.x - radius).floor().clamp(0.0, max) as u32;
        let x1 = (center.x + radius).ceil().clamp(0.0, max) as u32;
        let y0 = (center.y - radius).floor().clamp(0.0, max) as u32;
        let y1 = (center.y + radius).ceil().clamp(0.0, max) as u32;

        let r2 = radius * radius;
        for y in y0..=y1 {
            for x in x0..=x1 {
                let pixel_center = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                if pixel_center.distance_squared(center) <= r2 {
                    self.raster.set_pixel(x, y, WHITE);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn white_count(mask: &MaskRaster) -> usize {
        mask.raster()
            .pixels
            .chunks_exact(4)
            .filter(|c| *c == WHITE)
            .count()
    }

    #[test]
    fn test_mask_starts_black_and_clean() {
        let mask = MaskRaster::default();
        assert_eq!(mask.size(), 512);
        assert!(!mask.is_dirty());
        assert!(mask.raster().pixels.chunks_exact(4).all(|c| c == BLACK));
    }

    #[test]
    fn test_mask_sizes() {
        let mask = MaskRaster::new(100);
        assert_eq!(mask.size(), 100);
        assert!(!mask.raster().is_power_of_two());
        assert!(!mask.is_dirty());

        assert_eq!(MaskRaster::new(0).size(), 1);
        assert!(MaskRaster::new(256).raster().is_power_of_two());
    }

    #[test]
    fn test_paint_flips_v() {
        let mut mask = MaskRaster::new(64);
        // Near the bottom of UV space means near the last raster row
        mask.paint(Vec2::new(0.5, 0.05), 3.0);

        assert_eq!(mask.raster().get_pixel(32, 60), WHITE);
        assert_eq!(mask.raster().get_pixel(32, 3), BLACK);
        assert!(mask.is_dirty());
    }

    #[test]
    fn test_paint_disc_area() {
        let mut mask = MaskRaster::new(128);
        mask.paint(Vec2::new(0.5, 0.5), 10.0);
        let area = white_count(&mask) as f32;
        let expected = std::f32::consts::PI * 100.0;
        assert!((area - expected).abs() < expected * 0.1, "area {}", area);
    }

    #[test]
    fn test_paint_monotonic_and_dirty_each_call() {
        let mut mask = MaskRaster::new(64);
        let strokes = [
            (Vec2::new(0.2, 0.3), 5.0),
            (Vec2::new(0.25, 0.3), 2.0),
            (Vec2::new(0.9, 0.9), 8.0),
            (Vec2::new(-1.0, 2.0), 4.0),
            (Vec2::new(0.5, 0.5), 0.0),
        ];

        let mut before = mask.raster().clone();
        for (uv, radius) in strokes {
            mask.mark_clean();
            mask.paint(uv, radius);
            assert!(mask.is_dirty());

            for (old, new) in before.pixels.chunks_exact(4).zip(mask.raster().pixels.chunks_exact(4)) {
                if old == WHITE {
                    assert_eq!(new, WHITE);
                }
            }
            before = mask.raster().clone();
        }
    }

    #[test]
    fn test_paint_off_raster_and_nan() {
        let mut mask = MaskRaster::new(32);
        mask.paint(Vec2::new(5.0, 5.0), 3.0);
        mask.paint(Vec2::new(f32::NAN, 0.5), 3.0);
        assert_eq!(white_count(&mask), 0);
        assert!(mask.is_dirty());
    }

    #[test]
    fn test_paint_edge_clipped() {
        let mut mask = MaskRaster::new(32);
        mask.paint(Vec2::new(0.0, 1.0), 4.0);
        assert_eq!(mask.raster().get_pixel(0, 0), WHITE);
        assert!(white_count(&mask) > 0);
        assert!(white_count(&mask) < 32);
    }
}
