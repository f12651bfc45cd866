use std::path::PathBuf;

use crate::{
    foundation::error::{LayerlineError, LayerlineResult},
    geometry::{layout::DEFAULT_CANVAS_WIDTH, projection::OverflowPolicy},
};

pub const DEFAULT_EXPORT_SCALE: f64 = 2.0;

/// Where the regular, bold and italic sans-serif faces come from.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum FontSource {
    /// Installed system fonts.
    #[default]
    System,
    /// `.ttf`/`.otf`/`.ttc` files in one directory.
    Directory(PathBuf),
    /// No faces; text is measured approximately and not drawn.
    Disabled,
}

/// Knobs for scene layout and rasterization.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderSettings {
    /// Logical scene width in pixels.
    pub canvas_width: f64,
    /// Supersampling factor applied when rasterizing.
    pub scale: f64,
    pub overflow: OverflowPolicy,
    pub font: FontSource,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            canvas_width: DEFAULT_CANVAS_WIDTH,
            scale: DEFAULT_EXPORT_SCALE,
            overflow: OverflowPolicy::Clamp,
            font: FontSource::System,
        }
    }
}

impl RenderSettings {
    /// Defaults overlaid with `LAYERLINE_*` environment variables. Unparsable values are ignored.
    pub fn from_env() -> Self {
        let mut settings = Self::default();
        if let Some(w) = env_f64("LAYERLINE_CANVAS_WIDTH") {
            settings.canvas_width = w;
        }
        if let Some(s) = env_f64("LAYERLINE_EXPORT_SCALE") {
            settings.scale = s;
        }
        if let Some(policy) = std::env::var("LAYERLINE_OVERFLOW")
            .ok()
            .and_then(|v| v.parse::<OverflowPolicy>().ok())
        {
            settings.overflow = policy;
        }
        if let Some(dir) = std::env::var_os("LAYERLINE_FONT_DIR").filter(|v| !v.is_empty()) {
            settings.font = FontSource::Directory(PathBuf::from(dir));
        }
        settings
    }

    pub fn validate(&self) -> LayerlineResult<()> {
        if !self.canvas_width.is_finite() || self.canvas_width <= 0.0 {
            return Err(LayerlineError::validation(format!(
                "canvas width must be finite and > 0, got {}",
                self.canvas_width
            )));
        }
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(LayerlineError::validation(format!(
                "export scale must be finite and > 0, got {}",
                self.scale
            )));
        }
        Ok(())
    }
}

fn env_f64(key: &str) -> Option<f64> {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite() && *v > 0.0)
}
