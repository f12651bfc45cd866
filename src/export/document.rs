use serde::{Deserialize, Serialize};

use crate::{
    foundation::{
        color::Color,
        core::Year,
        error::{LayerlineError, LayerlineResult},
    },
    timeline::{
        diagram::Diagram,
        model::{
            Column, ConnectionStyle, EventSpec, EventStyle, LineStyle, TimelineConfig, Trend,
            default_event_border, default_event_color, default_line_color,
        },
    },
};

/// Interchange format revision written by [`to_document`].
pub const FORMAT_VERSION: u32 = 1;

/// Structured interchange form of a diagram.
///
/// Cross references are positional: `EventRecord::layer` indexes `layers`, and connection
/// endpoints index `events`. Documents without a `version` key are read as version 1.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
    pub layers: Vec<String>,
    pub start_year: Year,
    pub end_year: Year,
    #[serde(default)]
    pub events: Vec<EventRecord>,
    #[serde(default)]
    pub connections: Vec<ConnectionRecord>,
    #[serde(default)]
    pub columns: Vec<Column>,
    #[serde(default)]
    pub trends: Vec<Trend>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    pub label: String,
    pub year: Year,
    pub layer: usize,
    /// Horizontal percent at export time. Informational; recomputed from `year` on import.
    #[serde(default)]
    pub x: f64,
    #[serde(default = "default_event_color")]
    pub color: Color,
    #[serde(default = "default_event_border")]
    pub border_color: Color,
    #[serde(default)]
    pub style: EventStyle,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionRecord {
    pub from: usize,
    pub to: usize,
    #[serde(default = "default_line_color")]
    pub color: Color,
    #[serde(default)]
    pub line_style: LineStyle,
    #[serde(default = "default_connection_width")]
    pub width: u8,
    #[serde(default = "default_show_arrow")]
    pub show_arrow: bool,
}

fn default_connection_width() -> u8 {
    ConnectionStyle::default().width
}

fn default_show_arrow() -> bool {
    true
}

impl ConnectionRecord {
    fn style(&self) -> ConnectionStyle {
        ConnectionStyle {
            color: self.color,
            line_style: self.line_style,
            width: self.width,
            show_arrow: self.show_arrow,
        }
    }
}

/// Snapshot a diagram into its interchange form, projecting every event's `x` under the current
/// bounds.
pub fn to_document(diagram: &Diagram) -> TimelineDocument {
    let config = diagram.config();
    let projector = diagram.projector();

    let events = diagram
        .events()
        .iter()
        .filter_map(|e| {
            Some(EventRecord {
                label: e.label.clone(),
                year: e.year,
                layer: diagram.layer_index(e.layer)?,
                x: projector.year_to_x(e.year),
                color: e.color,
                border_color: e.border_color,
                style: e.style,
            })
        })
        .collect();

    let connections = diagram
        .connections()
        .iter()
        .filter_map(|c| {
            Some(ConnectionRecord {
                from: diagram.event_index(c.from)?,
                to: diagram.event_index(c.to)?,
                color: c.style.color,
                line_style: c.style.line_style,
                width: c.style.width,
                show_arrow: c.style.show_arrow,
            })
        })
        .collect();

    TimelineDocument {
        version: Some(FORMAT_VERSION),
        layers: diagram.layers().iter().map(|l| l.name.clone()).collect(),
        start_year: config.start_year(),
        end_year: config.end_year(),
        events,
        connections,
        columns: diagram.columns().to_vec(),
        trends: diagram.trends().to_vec(),
    }
}

impl Diagram {
    /// Rebuild a diagram through the regular mutation surface, so every invariant is checked
    /// against the document's contents.
    pub fn from_document(doc: &TimelineDocument) -> LayerlineResult<Self> {
        if let Some(v) = doc.version.filter(|&v| v > FORMAT_VERSION) {
            return Err(LayerlineError::validation(format!(
                "document version {v} is newer than supported version {FORMAT_VERSION}"
            )));
        }

        let mut diagram = Diagram::new(TimelineConfig::new(doc.start_year, doc.end_year)?);

        let mut layer_ids = Vec::with_capacity(doc.layers.len());
        for name in &doc.layers {
            layer_ids.push(diagram.add_layer(name.clone())?);
        }

        let mut event_ids = Vec::with_capacity(doc.events.len());
        for (i, rec) in doc.events.iter().enumerate() {
            let layer = *layer_ids.get(rec.layer).ok_or_else(|| {
                LayerlineError::reference(format!(
                    "event {i} ('{}') references layer {} but the document has {} layers",
                    rec.label,
                    rec.layer,
                    layer_ids.len()
                ))
            })?;
            let spec = EventSpec::new(rec.label.clone(), rec.year, layer)
                .color(rec.color)
                .border_color(rec.border_color)
                .style(rec.style);
            event_ids.push(diagram.add_event(spec)?);
        }

        for (i, rec) in doc.connections.iter().enumerate() {
            let resolve = |index: usize| {
                event_ids.get(index).copied().ok_or_else(|| {
                    LayerlineError::reference(format!(
                        "connection {i} references event {index} but the document has {} events",
                        event_ids.len()
                    ))
                })
            };
            diagram.add_connection(resolve(rec.from)?, resolve(rec.to)?, rec.style())?;
        }

        for column in &doc.columns {
            diagram.add_column(column.clone())?;
        }
        for trend in &doc.trends {
            diagram.add_trend(trend.clone())?;
        }

        diagram.check_invariants()?;
        Ok(diagram)
    }
}

/// Pretty JSON with two-space indentation.
pub fn to_json_string(doc: &TimelineDocument) -> LayerlineResult<String> {
    Ok(serde_json::to_string_pretty(doc)?)
}

pub fn from_json_str(s: &str) -> LayerlineResult<TimelineDocument> {
    Ok(serde_json::from_str(s)?)
}

#[cfg(test)]
#[path = "../../tests/unit/export/document.rs"]
mod tests;
