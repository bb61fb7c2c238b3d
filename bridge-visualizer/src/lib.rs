//! SVG/PNG page rendering and PDF slide decks for bridge charts.

pub mod axes;
pub mod canvas;
pub mod charts;
pub mod chrome;
pub mod cubeview;
pub mod deck;
pub mod raster;
pub mod waterfall;

use std::path::Path;

use bridge_lib::InvalidInput;
use svg::Document;
use tracing::debug;

pub use canvas::{Canvas, Rect, Stroke, TextStyle};
pub use raster::RasterOptions;
pub use waterfall::{draw_bridge_panel, draw_waterfall, WaterfallStyle};

/// Canvas units per inch.
pub const UNITS_PER_INCH: f64 = 100.0;
/// Output resolution of rasterized pages.
pub const DPI: f64 = 150.0;

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("failed to parse SVG")]
    SvgParse,
    #[error("failed to allocate pixmap for raster rendering")]
    PixmapAlloc,
    #[error("failed to encode PNG")]
    PngEncode,
    #[error("failed to write PDF: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error(transparent)]
    Bridge(#[from] InvalidInput),
}

pub fn save_svg<P: AsRef<Path>>(path: P, document: &Document) -> Result<(), RenderError> {
    svg::save(path.as_ref(), document)?;
    debug!(path = %path.as_ref().display(), "wrote svg");
    Ok(())
}

pub fn save_png<P: AsRef<Path>>(
    path: P,
    document: &Document,
    options: &RasterOptions,
) -> Result<(), RenderError> {
    let bytes = raster::svg_to_png(&document.to_string(), options)?;
    std::fs::write(path.as_ref(), bytes)?;
    debug!(path = %path.as_ref().display(), "wrote png");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_lib::color::WHITE;

    #[test]
    fn test_save_png_and_svg() {
        let dir = tempfile::tempdir().unwrap();
        let mut canvas = Canvas::new(40.0, 20.0, WHITE);
        canvas.rect(Rect::new(5.0, 5.0, 10.0, 10.0), bridge_lib::color::NAVY);
        let doc = canvas.into_document();

        let png = dir.path().join("page.png");
        save_png(&png, &doc, &RasterOptions::default()).unwrap();
        let bytes = std::fs::read(&png).unwrap();
        assert!(bytes.starts_with(b"\x89PNG"));

        let svg_path = dir.path().join("page.svg");
        save_svg(&svg_path, &doc).unwrap();
        assert!(std::fs::read_to_string(&svg_path).unwrap().contains("#0B1D3A"));
    }
}
