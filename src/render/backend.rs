use crate::{
    foundation::{
        color::Color,
        core::{BezPath, Rect},
        error::LayerlineResult,
    },
    render::scene::{DrawOp, Scene, StrokeStyle, TextRun},
};

/// Rasterized scene in straight (non-premultiplied) RGBA8, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Raster {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl Raster {
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// RGB bytes with alpha dropped, for encoders without an alpha channel.
    pub fn to_rgb8(&self) -> Vec<u8> {
        self.data
            .chunks_exact(4)
            .flat_map(|px| [px[0], px[1], px[2]])
            .collect()
    }
}

/// A drawing surface that can replay a [`Scene`].
pub trait SceneBackend {
    fn begin(&mut self, scene: &Scene) -> LayerlineResult<()>;

    fn fill_rect(&mut self, rect: Rect, color: Color) -> LayerlineResult<()>;

    fn stroke_rect(&mut self, rect: Rect, stroke: &StrokeStyle) -> LayerlineResult<()>;

    fn stroke_path(&mut self, path: &BezPath, stroke: &StrokeStyle) -> LayerlineResult<()>;

    fn fill_path(&mut self, path: &BezPath, color: Color) -> LayerlineResult<()>;

    fn draw_text(&mut self, text: &TextRun) -> LayerlineResult<()>;

    fn finish(&mut self) -> LayerlineResult<Raster>;
}

pub fn execute_scene<B: SceneBackend + ?Sized>(
    backend: &mut B,
    scene: &Scene,
) -> LayerlineResult<Raster> {
    backend.begin(scene)?;

    for item in &scene.items {
        match &item.op {
            DrawOp::FillRect { rect, color } => backend.fill_rect(*rect, *color)?,
            DrawOp::StrokeRect { rect, stroke } => backend.stroke_rect(*rect, stroke)?,
            DrawOp::StrokePath { path, stroke } => backend.stroke_path(path, stroke)?,
            DrawOp::FillPath { path, color } => backend.fill_path(path, *color)?,
            DrawOp::Text(run) => backend.draw_text(run)?,
        }
    }

    backend.finish()
}

#[cfg(test)]
#[path = "../../tests/unit/render/backend.rs"]
mod tests;
