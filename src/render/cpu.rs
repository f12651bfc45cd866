use std::collections::HashMap;

use crate::{
    foundation::{
        color::Color,
        core::{Affine, BezPath, Rect},
        error::{LayerlineError, LayerlineResult},
    },
    render::{
        backend::{Raster, SceneBackend},
        scene::{Scene, StrokeStyle, TextAlign, TextRun},
        text::{FontBook, TextFace},
    },
};

/// `vello_cpu` rasterizer for compiled scenes.
///
/// Draws in logical units under a uniform `scale` transform and reads back straight RGBA8.
pub struct CpuBackend<'f> {
    scale: f64,
    fonts: &'f mut FontBook,
    font_cache: HashMap<TextFace, vello_cpu::peniko::FontData>,
    ctx: Option<vello_cpu::RenderContext>,
}

impl<'f> CpuBackend<'f> {
    pub fn new(scale: f64, fonts: &'f mut FontBook) -> Self {
        Self {
            scale,
            fonts,
            font_cache: HashMap::new(),
            ctx: None,
        }
    }

    fn base_transform(&self) -> vello_cpu::kurbo::Affine {
        affine_to_cpu(Affine::scale(self.scale))
    }

    fn ctx_mut(&mut self) -> LayerlineResult<&mut vello_cpu::RenderContext> {
        self.ctx
            .as_mut()
            .ok_or_else(|| LayerlineError::render("draw call before begin"))
    }
}

impl SceneBackend for CpuBackend<'_> {
    fn begin(&mut self, scene: &Scene) -> LayerlineResult<()> {
        let width = device_extent(scene.width, self.scale, "width")?;
        let height = device_extent(scene.height, self.scale, "height")?;
        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == width && ctx.height() == height => ctx,
            _ => vello_cpu::RenderContext::new(width, height),
        };
        ctx.reset();
        ctx.set_transform(self.base_transform());
        self.ctx = Some(ctx);
        tracing::debug!(width, height, scale = self.scale, "cpu raster begin");
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) -> LayerlineResult<()> {
        let ctx = self.ctx_mut()?;
        ctx.set_paint(color_to_cpu(color));
        ctx.fill_rect(&rect_to_cpu(rect));
        Ok(())
    }

    fn stroke_rect(&mut self, rect: Rect, stroke: &StrokeStyle) -> LayerlineResult<()> {
        let ctx = self.ctx_mut()?;
        ctx.set_stroke(stroke_to_cpu(stroke));
        ctx.set_paint(color_to_cpu(stroke.color));
        ctx.stroke_rect(&rect_to_cpu(rect));
        Ok(())
    }

    fn stroke_path(&mut self, path: &BezPath, stroke: &StrokeStyle) -> LayerlineResult<()> {
        let ctx = self.ctx_mut()?;
        ctx.set_stroke(stroke_to_cpu(stroke));
        ctx.set_paint(color_to_cpu(stroke.color));
        ctx.stroke_path(&bezpath_to_cpu(path));
        Ok(())
    }

    fn fill_path(&mut self, path: &BezPath, color: Color) -> LayerlineResult<()> {
        let ctx = self.ctx_mut()?;
        ctx.set_paint(color_to_cpu(color));
        ctx.fill_path(&bezpath_to_cpu(path));
        Ok(())
    }

    fn draw_text(&mut self, run: &TextRun) -> LayerlineResult<()> {
        let base = self.base_transform();
        let scale = self.scale;
        let Self {
            fonts,
            font_cache,
            ctx,
            ..
        } = self;
        let ctx = ctx
            .as_mut()
            .ok_or_else(|| LayerlineError::render("draw call before begin"))?;

        let Some(shaped) = fonts.shape(&run.text, run.face, run.size) else {
            return Ok(());
        };
        if shaped.glyphs.is_empty() {
            return Ok(());
        }
        let font = match font_cache.entry(run.face) {
            std::collections::hash_map::Entry::Occupied(e) => e.into_mut(),
            std::collections::hash_map::Entry::Vacant(v) => {
                let Some((bytes, index)) = fonts.font_data(run.face) else {
                    return Ok(());
                };
                v.insert(vello_cpu::peniko::FontData::new(
                    vello_cpu::peniko::Blob::from(bytes.to_vec()),
                    index,
                ))
            }
        };

        // Canvas `maxWidth`: condense horizontally instead of clipping.
        let squeeze = run
            .max_width
            .filter(|&max| shaped.width > max && shaped.width > 0.0)
            .map_or(1.0, |max| max / shaped.width);
        let drawn_width = shaped.width * squeeze;
        let left = match run.align {
            TextAlign::Left => run.origin.x,
            TextAlign::Center => run.origin.x - drawn_width / 2.0,
        };
        let transform = Affine::scale(scale)
            * Affine::translate((left, run.origin.y - shaped.baseline))
            * Affine::scale_non_uniform(squeeze, 1.0);

        ctx.set_transform(affine_to_cpu(transform));
        ctx.set_paint(color_to_cpu(run.color));
        ctx.glyph_run(&*font)
            .font_size(run.size as f32)
            .fill_glyphs(shaped.glyphs.iter().map(|g| vello_cpu::Glyph {
                id: g.id,
                x: g.x,
                y: g.y,
            }));
        ctx.set_transform(base);
        Ok(())
    }

    fn finish(&mut self) -> LayerlineResult<Raster> {
        let mut ctx = self
            .ctx
            .take()
            .ok_or_else(|| LayerlineError::render("finish before begin"))?;
        ctx.flush();
        let (width, height) = (ctx.width(), ctx.height());
        let mut pixmap = vello_cpu::Pixmap::new(width, height);
        ctx.render_to_pixmap(&mut pixmap);
        let data = unpremultiply_rgba8(pixmap.data_as_u8_slice());
        self.ctx = Some(ctx);
        Ok(Raster {
            width: u32::from(width),
            height: u32::from(height),
            data,
        })
    }
}

/// Device pixels for a logical extent; must land in `1..=u16::MAX`.
pub(crate) fn device_extent(logical: f64, scale: f64, what: &str) -> LayerlineResult<u16> {
    let px = (logical * scale).round();
    if !px.is_finite() || px < 1.0 || px > f64::from(u16::MAX) {
        return Err(LayerlineError::render(format!(
            "raster {what} {px} px out of range (1..={})",
            u16::MAX
        )));
    }
    Ok(px as u16)
}

fn unpremultiply_rgba8(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len());
    for px in data.chunks_exact(4) {
        let a = px[3];
        match a {
            0 => out.extend_from_slice(&[0, 0, 0, 0]),
            255 => out.extend_from_slice(px),
            _ => {
                let a16 = u16::from(a);
                let un = |c: u8| ((u16::from(c) * 255 + a16 / 2) / a16).min(255) as u8;
                out.extend_from_slice(&[un(px[0]), un(px[1]), un(px[2]), a]);
            }
        }
    }
    out
}

fn color_to_cpu(c: Color) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn stroke_to_cpu(stroke: &StrokeStyle) -> vello_cpu::kurbo::Stroke {
    let s = vello_cpu::kurbo::Stroke::new(stroke.width);
    if stroke.dash.is_empty() {
        s
    } else {
        s.with_dashes(0.0, stroke.dash.iter().copied())
    }
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::LineTo(p) => out.line_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::QuadTo(p1, p2) => out.quad_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
            ),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
                vello_cpu::kurbo::Point::new(p3.x, p3.y),
            ),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
