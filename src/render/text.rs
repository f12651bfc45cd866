use std::{borrow::Cow, path::Path};

use crate::render::settings::FontSource;

/// Em fraction per character used when no real face is available.
pub const APPROX_CHAR_ADVANCE_EM: f64 = 0.55;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextFace {
    Regular,
    Bold,
    Italic,
}

impl TextFace {
    pub const ALL: [Self; 3] = [Self::Regular, Self::Bold, Self::Italic];

    fn slot(self) -> usize {
        match self {
            Self::Regular => 0,
            Self::Bold => 1,
            Self::Italic => 2,
        }
    }
}

/// Advance width of a single line of text, in logical pixels.
pub trait TextMeasure {
    fn measure(&mut self, text: &str, face: TextFace, size: f64) -> f64;
}

/// Deterministic metrics that need no font files.
#[derive(Clone, Copy, Debug, Default)]
pub struct ApproxMeasure;

impl TextMeasure for ApproxMeasure {
    fn measure(&mut self, text: &str, _face: TextFace, size: f64) -> f64 {
        text.chars().count() as f64 * size * APPROX_CHAR_ADVANCE_EM
    }
}

/// Split a label into lines no wider than `max_width`.
///
/// Words are appended greedily. A line only breaks once it holds at least one word, so a single
/// over-long word stays on its own line.
pub fn wrap_label(
    label: &str,
    max_width: f64,
    face: TextFace,
    size: f64,
    measure: &mut dyn TextMeasure,
) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for (i, word) in label.split(' ').enumerate() {
        let candidate = format!("{line}{word} ");
        if measure.measure(&candidate, face, size) > max_width && i > 0 {
            lines.push(finish_line(line));
            line = format!("{word} ");
        } else {
            line = candidate;
        }
    }
    lines.push(finish_line(line));
    lines
}

fn finish_line(mut line: String) -> String {
    if line.ends_with(' ') {
        line.pop();
    }
    line
}

/// One glyph positioned relative to the layout's top-left corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct PositionedGlyph {
    pub(crate) id: u32,
    pub(crate) x: f32,
    pub(crate) y: f32,
}

/// Shaped single-line text ready to be drawn.
#[derive(Clone, Debug, Default)]
pub(crate) struct ShapedText {
    pub(crate) glyphs: Vec<PositionedGlyph>,
    pub(crate) width: f64,
    /// Distance from the layout top to the first baseline.
    pub(crate) baseline: f64,
}

/// Parley layout state bound to one registered face.
struct FaceEngine {
    bytes: Vec<u8>,
    index: u32,
    family: String,
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<()>,
}

impl FaceEngine {
    fn new(bytes: Vec<u8>, index: u32) -> Option<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(bytes.clone()), None);
        let family_id = families
            .iter()
            .find(|(_, fonts)| fonts.iter().any(|f| f.index() == index))
            .or_else(|| families.first())
            .map(|(id, _)| *id)?;
        let family = font_ctx.collection.family_name(family_id)?.to_string();
        Some(Self {
            bytes,
            index,
            family,
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
        })
    }

    fn layout(&mut self, text: &str, size: f64) -> parley::Layout<()> {
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(self.family.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size as f32));
        let mut layout: parley::Layout<()> = builder.build(text);
        layout.break_all_lines(None);
        layout
    }
}

/// Resolved text faces plus their layout engines.
///
/// Missing faces are not an error: measurement falls back to [`ApproxMeasure`] and the
/// rasterizer skips glyphs it cannot shape.
pub struct FontBook {
    faces: [Option<FaceEngine>; 3],
}

impl FontBook {
    pub fn disabled() -> Self {
        Self {
            faces: [None, None, None],
        }
    }

    #[tracing::instrument(skip_all, fields(source = ?source))]
    pub fn load(source: &FontSource) -> Self {
        let mut db = usvg::fontdb::Database::new();
        match source {
            FontSource::Disabled => return Self::disabled(),
            FontSource::System => db.load_system_fonts(),
            FontSource::Directory(dir) => load_fonts_from_dir(&mut db, dir),
        }

        let mut book = Self::disabled();
        for face in TextFace::ALL {
            let engine = select_face(&db, face)
                .and_then(|id| db.with_face_data(id, |data, index| (data.to_vec(), index)))
                .and_then(|(bytes, index)| FaceEngine::new(bytes, index));
            match &engine {
                Some(e) => tracing::debug!(?face, family = %e.family, "resolved text face"),
                None => tracing::warn!(?face, "no font face found; text uses approximate metrics"),
            }
            book.faces[face.slot()] = engine;
        }
        book
    }

    pub fn has_face(&self, face: TextFace) -> bool {
        self.faces[face.slot()].is_some()
    }

    /// Raw font bytes and collection index of a resolved face.
    pub(crate) fn font_data(&self, face: TextFace) -> Option<(&[u8], u32)> {
        self.faces[face.slot()]
            .as_ref()
            .map(|e| (e.bytes.as_slice(), e.index))
    }

    /// Shape one line of text. `None` when the face is unavailable.
    pub(crate) fn shape(&mut self, text: &str, face: TextFace, size: f64) -> Option<ShapedText> {
        let engine = self.faces[face.slot()].as_mut()?;
        let layout = engine.layout(text, size);

        let mut shaped = ShapedText {
            glyphs: Vec::new(),
            width: f64::from(layout.full_width()),
            baseline: layout
                .lines()
                .next()
                .map(|line| f64::from(line.metrics().baseline))
                .unwrap_or(size),
        };
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                shaped.glyphs.extend(run.glyphs().map(|g| PositionedGlyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                }));
            }
        }
        Some(shaped)
    }
}

impl TextMeasure for FontBook {
    fn measure(&mut self, text: &str, face: TextFace, size: f64) -> f64 {
        match self.faces[face.slot()].as_mut() {
            Some(engine) => f64::from(engine.layout(text, size).full_width()),
            None => ApproxMeasure.measure(text, face, size),
        }
    }
}

impl std::fmt::Debug for FontBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let families: Vec<Option<&str>> = self
            .faces
            .iter()
            .map(|e| e.as_ref().map(|e| e.family.as_str()))
            .collect();
        f.debug_struct("FontBook").field("faces", &families).finish()
    }
}

fn select_face(db: &usvg::fontdb::Database, face: TextFace) -> Option<usvg::fontdb::ID> {
    let (weight, style) = match face {
        TextFace::Regular => (usvg::fontdb::Weight::NORMAL, usvg::fontdb::Style::Normal),
        TextFace::Bold => (usvg::fontdb::Weight::BOLD, usvg::fontdb::Style::Normal),
        TextFace::Italic => (usvg::fontdb::Weight::NORMAL, usvg::fontdb::Style::Italic),
    };
    let families = [usvg::fontdb::Family::SansSerif];
    let query = usvg::fontdb::Query {
        families: &families,
        weight,
        stretch: usvg::fontdb::Stretch::Normal,
        style,
    };
    if let Some(id) = db.query(&query) {
        return Some(id);
    }
    db.faces()
        .find(|f| f.weight == weight && f.style == style)
        .or_else(|| db.faces().next())
        .map(|f| f.id)
}

fn load_fonts_from_dir(db: &mut usvg::fontdb::Database, dir: &Path) {
    let Ok(rd) = std::fs::read_dir(dir) else {
        tracing::warn!(dir = %dir.display(), "font directory is not readable");
        return;
    };

    for entry in rd.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
            continue;
        };
        let ext = ext.to_ascii_lowercase();
        if ext != "ttf" && ext != "otf" && ext != "ttc" {
            continue;
        }
        if let Err(err) = db.load_font_file(&path) {
            tracing::debug!(path = %path.display(), %err, "skipping unreadable font file");
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
