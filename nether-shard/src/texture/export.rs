//! PNG export for rasters

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use super::Raster;

/// Write a raster to an RGBA8 PNG file
///
/// # Example
/// ```no_run
/// use nether_shard::texture::{write_png, MaskRaster};
/// use std::path::Path;
///
/// let mask = MaskRaster::default();
/// write_png(mask.raster(), Path::new("mask.png"))?;
/// # Ok::<(), std::io::Error>(())
/// ```
pub fn write_png(raster: &Raster, path: &Path) -> std::io::Result<()> {
    let file = File::create(path)?;
    let w = BufWriter::new(file);

    let mut encoder = png::Encoder::new(w, raster.width, raster.height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_compression(png::Compression::Default);

    let mut writer = encoder.write_header().map_err(std::io::Error::other)?;
    writer
        .write_image_data(&raster.pixels)
        .map_err(std::io::Error::other)?;
    writer.finish().map_err(std::io::Error::other)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::texture::MaskRaster;
    use glam::Vec2;

    #[test]
    fn test_write_png_roundtrip_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mask.png");

        let mut mask = MaskRaster::new(16);
        mask.paint(Vec2::splat(0.5), 4.0);
        write_png(mask.raster(), &path).unwrap();

        let decoder = png::Decoder::new(File::open(&path).unwrap());
        let reader = decoder.read_info().unwrap();
        let info = reader.info();
        assert_eq!((info.width, info.height), (16, 16));
        assert_eq!(info.color_type, png::ColorType::Rgba);
    }
}
