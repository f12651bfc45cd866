use image::ImageEncoder as _;

use crate::{
    foundation::error::{LayerlineError, LayerlineResult},
    geometry::layout::SceneLayout,
    render::{
        backend::{Raster, execute_scene},
        cpu::CpuBackend,
        scene::compile_scene,
        settings::RenderSettings,
        text::FontBook,
    },
    timeline::diagram::Diagram,
};

/// Render the full scene to a bitmap at `settings.scale`.
///
/// This is the only rendering path: PNG and PDF output both start from its result.
#[tracing::instrument(skip_all, fields(layers = diagram.layers().len(), scale = settings.scale))]
pub fn render_raster(diagram: &Diagram, settings: &RenderSettings) -> LayerlineResult<Raster> {
    settings.validate()?;
    let mut fonts = FontBook::load(&settings.font);
    render_raster_with(diagram, settings, &mut fonts)
}

/// [`render_raster`] with a caller-owned font book, to reuse resolved faces across renders.
pub fn render_raster_with(
    diagram: &Diagram,
    settings: &RenderSettings,
    fonts: &mut FontBook,
) -> LayerlineResult<Raster> {
    settings.validate()?;
    let layout = SceneLayout::new(diagram, settings.canvas_width);
    let scene = compile_scene(diagram, &layout, settings, fonts);
    let mut backend = CpuBackend::new(settings.scale, fonts);
    execute_scene(&mut backend, &scene)
}

pub fn encode_png(raster: &Raster) -> LayerlineResult<Vec<u8>> {
    let expected = raster.width as usize * raster.height as usize * 4;
    if raster.data.len() != expected {
        return Err(LayerlineError::export(format!(
            "raster has {} bytes, expected {expected} for {}x{}",
            raster.data.len(),
            raster.width,
            raster.height
        )));
    }
    let mut out = Vec::new();
    image::codecs::png::PngEncoder::new(&mut out)
        .write_image(
            &raster.data,
            raster.width,
            raster.height,
            image::ExtendedColorType::Rgba8,
        )
        .map_err(|e| LayerlineError::export(format!("png encode failed: {e}")))?;
    Ok(out)
}
