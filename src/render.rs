use image::ImageEncoder;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};

use crate::foundation::error::{AvatrError, AvatrResult};

/// Rendered assets are always square at this edge length.
pub const RASTER_SIZE: u32 = 256;

/// Rasterize composite SVG text to a 256x256 PNG with maximum lossless
/// compression.
pub fn rasterize_png(svg: &str) -> AvatrResult<Vec<u8>> {
    let opt = usvg::Options::default();
    let tree = usvg::Tree::from_str(svg, &opt)
        .map_err(|e| AvatrError::render(format!("composite svg did not parse: {e}")))?;

    let size = tree.size();
    if !size.width().is_finite()
        || !size.height().is_finite()
        || size.width() <= 0.0
        || size.height() <= 0.0
    {
        return Err(AvatrError::render("composite svg has invalid dimensions"));
    }

    let mut pixmap = resvg::tiny_skia::Pixmap::new(RASTER_SIZE, RASTER_SIZE)
        .ok_or_else(|| AvatrError::render("failed to allocate output pixmap"))?;

    let sx = (RASTER_SIZE as f32) / size.width();
    let sy = (RASTER_SIZE as f32) / size.height();
    let xform = resvg::tiny_skia::Transform::from_scale(sx, sy);
    resvg::render(&tree, xform, &mut pixmap.as_mut());

    // tiny-skia pixels are premultiplied; PNG wants straight alpha.
    let mut rgba = Vec::with_capacity((RASTER_SIZE * RASTER_SIZE * 4) as usize);
    for px in pixmap.pixels() {
        let c = px.demultiply();
        rgba.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }

    let mut out = Vec::new();
    let encoder = PngEncoder::new_with_quality(&mut out, CompressionType::Best, FilterType::Adaptive);
    encoder
        .write_image(&rgba, RASTER_SIZE, RASTER_SIZE, image::ExtendedColorType::Rgba8)
        .map_err(|e| AvatrError::render(format!("png encoding failed: {e}")))?;
    Ok(out)
}

#[cfg(test)]
#[path = "../tests/unit/render.rs"]
mod tests;
