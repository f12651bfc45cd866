use std::io::BufWriter;

use crate::{
    foundation::error::{LayerlineError, LayerlineResult},
    render::backend::Raster,
};

/// Logical pixels per inch used to size the page.
pub const CSS_PX_PER_INCH: f64 = 96.0;
const MM_PER_INCH: f64 = 25.4;

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PageOrientation {
    Portrait,
    Landscape,
}

impl PageOrientation {
    /// Landscape only when strictly wider than tall.
    pub fn for_size(width: f64, height: f64) -> Self {
        if width > height {
            Self::Landscape
        } else {
            Self::Portrait
        }
    }
}

fn px_to_mm(px: f64) -> f32 {
    (px / CSS_PX_PER_INCH * MM_PER_INCH) as f32
}

/// Single-page PDF whose page is the scene's logical size and whose only content is `raster`
/// stretched over the whole page.
pub fn encode_pdf(raster: &Raster, logical_width: f64, logical_height: f64) -> LayerlineResult<Vec<u8>> {
    if !(logical_width > 0.0 && logical_height > 0.0) {
        return Err(LayerlineError::export(format!(
            "page size {logical_width}x{logical_height} must be positive"
        )));
    }
    let expected = raster.width as usize * raster.height as usize * 4;
    if raster.data.len() != expected {
        return Err(LayerlineError::export(format!(
            "raster has {} bytes, expected {expected} for {}x{}",
            raster.data.len(),
            raster.width,
            raster.height
        )));
    }
    let orientation = PageOrientation::for_size(logical_width, logical_height);
    tracing::debug!(?orientation, logical_width, logical_height, "pdf page");

    let (doc, page, layer) = printpdf::PdfDocument::new(
        "Timeline",
        printpdf::Mm(px_to_mm(logical_width)),
        printpdf::Mm(px_to_mm(logical_height)),
        "Timeline",
    );
    let layer = doc.get_page(page).get_layer(layer);

    let image = printpdf::Image::from(printpdf::ImageXObject {
        width: printpdf::Px(raster.width as usize),
        height: printpdf::Px(raster.height as usize),
        color_space: printpdf::ColorSpace::Rgb,
        bits_per_component: printpdf::ColorBits::Bit8,
        interpolate: true,
        image_data: raster.to_rgb8(),
        image_filter: None,
        smask: None,
        clipping_bbox: None,
    });
    // Device pixels per logical inch, so the image covers exactly one page.
    let dpi = f64::from(raster.width) / logical_width * CSS_PX_PER_INCH;
    image.add_to_layer(
        layer,
        printpdf::ImageTransform {
            dpi: Some(dpi as f32),
            ..Default::default()
        },
    );

    let mut out = BufWriter::new(Vec::new());
    doc.save(&mut out)
        .map_err(|e| LayerlineError::export(format!("pdf write failed: {e}")))?;
    out.into_inner()
        .map_err(|e| LayerlineError::export(format!("pdf flush failed: {}", e.error())))
}
