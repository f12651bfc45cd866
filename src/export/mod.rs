pub(crate) mod document;
pub(crate) mod pdf;
pub(crate) mod raster;

use std::{fmt, path::Path, str::FromStr};

use crate::{
    foundation::error::{LayerlineError, LayerlineResult},
    geometry::layout::SceneLayout,
    render::settings::RenderSettings,
    timeline::diagram::Diagram,
};

use self::{
    document::{to_document, to_json_string},
    pdf::{PageOrientation, encode_pdf},
    raster::{encode_png, render_raster},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Json,
    Png,
    Pdf,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Png => "png",
            Self::Pdf => "pdf",
        }
    }

    /// `timeline.<ext>`
    pub fn default_file_name(self) -> String {
        format!("timeline.{}", self.extension())
    }

    /// Infer the format from a file extension (case-insensitive).
    pub fn from_path(path: &Path) -> LayerlineResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| {
                LayerlineError::validation(format!(
                    "cannot infer export format from '{}' (no extension)",
                    path.display()
                ))
            })?;
        ext.parse()
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = LayerlineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "png" => Ok(Self::Png),
            "pdf" => Ok(Self::Pdf),
            other => Err(LayerlineError::validation(format!(
                "unknown export format '{other}' (expected json|png|pdf)"
            ))),
        }
    }
}

/// Summary of one export.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ExportReport {
    pub format: ExportFormat,
    /// Encoded size.
    pub bytes: usize,
    /// Raster size in device pixels; zero for JSON.
    pub width: u32,
    pub height: u32,
    /// Page orientation, PDF only.
    pub orientation: Option<PageOrientation>,
}

/// Encode `diagram` in memory. The diagram is only read.
#[tracing::instrument(skip(diagram, settings), fields(events = diagram.events().len()))]
pub fn export_to_bytes(
    diagram: &Diagram,
    format: ExportFormat,
    settings: &RenderSettings,
) -> LayerlineResult<(Vec<u8>, ExportReport)> {
    let (bytes, width, height, orientation) = match format {
        ExportFormat::Json => {
            let json = to_json_string(&to_document(diagram))?;
            (json.into_bytes(), 0, 0, None)
        }
        ExportFormat::Png => {
            let raster = render_raster(diagram, settings)?;
            (encode_png(&raster)?, raster.width, raster.height, None)
        }
        ExportFormat::Pdf => {
            let raster = render_raster(diagram, settings)?;
            let layout = SceneLayout::new(diagram, settings.canvas_width);
            let pdf = encode_pdf(&raster, layout.width(), layout.height())?;
            let orientation = PageOrientation::for_size(layout.width(), layout.height());
            (pdf, raster.width, raster.height, Some(orientation))
        }
    };

    let report = ExportReport {
        format,
        bytes: bytes.len(),
        width,
        height,
        orientation,
    };
    tracing::debug!(?report, "export encoded");
    Ok((bytes, report))
}

/// Encode and write to `path`. The format comes from `format` or, when absent, the extension.
#[tracing::instrument(skip(diagram, settings), fields(path = %path.display()))]
pub fn export_to_file(
    diagram: &Diagram,
    path: &Path,
    format: Option<ExportFormat>,
    settings: &RenderSettings,
) -> LayerlineResult<ExportReport> {
    let format = match format {
        Some(f) => f,
        None => ExportFormat::from_path(path)?,
    };
    let (bytes, report) = export_to_bytes(diagram, format, settings)?;

    use anyhow::Context as _;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    std::fs::write(path, &bytes)
        .with_context(|| format!("failed to write '{}'", path.display()))?;
    Ok(report)
}

#[cfg(test)]
#[path = "../../tests/unit/export/mod.rs"]
mod tests;
