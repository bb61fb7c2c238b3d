use bridge_lib::color::sRGB;

use crate::{RenderError, DPI, UNITS_PER_INCH};

#[derive(Debug, Clone)]
pub struct RasterOptions {
    /// Pixels per canvas unit.
    pub scale: f32,
    pub background: Option<sRGB>,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            scale: (DPI / UNITS_PER_INCH) as f32,
            background: None,
        }
    }
}

pub fn svg_to_png(svg: &str, options: &RasterOptions) -> Result<Vec<u8>, RenderError> {
    let pixmap = svg_to_pixmap(svg, options)?;
    pixmap.encode_png().map_err(|_| RenderError::PngEncode)
}

fn svg_to_pixmap(svg: &str, options: &RasterOptions) -> Result<tiny_skia::Pixmap, RenderError> {
    let mut opt = usvg::Options::default();
    opt.fontdb_mut().load_system_fonts();
    opt.font_family = "Arial".to_string();

    let tree = usvg::Tree::from_str(svg, &opt).map_err(|_| RenderError::SvgParse)?;
    let size = tree.size();
    let scale = options.scale;
    let width_px = (size.width() * scale).ceil().max(1.0) as u32;
    let height_px = (size.height() * scale).ceil().max(1.0) as u32;

    let mut pixmap =
        tiny_skia::Pixmap::new(width_px, height_px).ok_or(RenderError::PixmapAlloc)?;
    if let Some([r, g, b]) = options.background {
        pixmap.fill(tiny_skia::Color::from_rgba8(r, g, b, 255));
    }

    resvg::render(
        &tree,
        tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );
    Ok(pixmap)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_png_signature_and_size() {
        let svg = r##"<svg xmlns="http://www.w3.org/2000/svg" width="20" height="10" viewBox="0 0 20 10"><rect width="20" height="10" fill="#0B1D3A"/></svg>"##;
        let bytes = svg_to_png(svg, &RasterOptions::default()).unwrap();
        assert!(bytes.starts_with(b"\x89PNG\r\n\x1a\n"));
        // IHDR width and height at 1.5 px per unit
        assert_eq!(u32::from_be_bytes(bytes[16..20].try_into().unwrap()), 30);
        assert_eq!(u32::from_be_bytes(bytes[20..24].try_into().unwrap()), 15);
    }

    #[test]
    fn test_rejects_garbage() {
        let err = svg_to_png("not svg", &RasterOptions::default()).unwrap_err();
        assert!(matches!(err, RenderError::SvgParse));
    }
}
