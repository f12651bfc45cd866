use crate::{
    foundation::{
        color::Color,
        core::Year,
        error::{LayerlineError, LayerlineResult},
    },
    timeline::ids::{EventId, LayerId},
};

/// Hard cap on stacked trend bands.
pub const MAX_TRENDS: usize = 4;

/// Accepted connection stroke widths, in logical pixels.
pub const CONNECTION_WIDTH_RANGE: std::ops::RangeInclusive<u8> = 1..=6;

/// Year bounds of the horizontal axis. `start_year < end_year` always holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimelineConfig {
    start_year: Year,
    end_year: Year,
}

impl TimelineConfig {
    pub fn new(start_year: Year, end_year: Year) -> LayerlineResult<Self> {
        if start_year >= end_year {
            return Err(LayerlineError::validation(format!(
                "timeline start year ({start_year}) must be before end year ({end_year})"
            )));
        }
        Ok(Self {
            start_year,
            end_year,
        })
    }

    pub fn start_year(self) -> Year {
        self.start_year
    }

    pub fn end_year(self) -> Year {
        self.end_year
    }

    /// Number of years covered, always > 0.
    pub fn span(self) -> i64 {
        i64::from(self.end_year) - i64::from(self.start_year)
    }

    /// Middle of the range; a half year rounds up.
    pub fn mid_year(self) -> Year {
        let sum = i64::from(self.start_year) + i64::from(self.end_year);
        (sum + 1).div_euclid(2) as Year
    }

    pub fn contains(self, year: Year) -> bool {
        self.start_year <= year && year <= self.end_year
    }
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            start_year: 2008,
            end_year: 2025,
        }
    }
}

/// Label style of an event. Any style other than `italic` reads as `normal`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStyle {
    #[default]
    Normal,
    Italic,
}

impl<'de> serde::Deserialize<'de> for EventStyle {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(if s.trim().eq_ignore_ascii_case("italic") {
            Self::Italic
        } else {
            Self::Normal
        })
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Layer {
    pub id: LayerId,
    pub name: String,
}

/// Field set for creating or editing an event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventSpec {
    pub label: String,
    pub year: Year,
    pub layer: LayerId,
    pub color: Color,
    pub border_color: Color,
    pub style: EventStyle,
}

impl EventSpec {
    pub fn new(label: impl Into<String>, year: Year, layer: LayerId) -> Self {
        Self {
            label: label.into(),
            year,
            layer,
            color: default_event_color(),
            border_color: default_event_border(),
            style: EventStyle::Normal,
        }
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn border_color(mut self, color: Color) -> Self {
        self.border_color = color;
        self
    }

    pub fn style(mut self, style: EventStyle) -> Self {
        self.style = style;
        self
    }
}

/// A labeled point in time on one layer.
///
/// The horizontal position is not stored: it is projected from `year` and the diagram's
/// current bounds whenever a scene or document is produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Event {
    pub id: EventId,
    pub label: String,
    pub year: Year,
    pub layer: LayerId,
    pub color: Color,
    pub border_color: Color,
    pub style: EventStyle,
}

impl Event {
    pub(crate) fn from_spec(id: EventId, spec: EventSpec) -> Self {
        Self {
            id,
            label: spec.label,
            year: spec.year,
            layer: spec.layer,
            color: spec.color,
            border_color: spec.border_color,
            style: spec.style,
        }
    }

    pub fn to_spec(&self) -> EventSpec {
        EventSpec {
            label: self.label.clone(),
            year: self.year,
            layer: self.layer,
            color: self.color,
            border_color: self.border_color,
            style: self.style,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConnectionStyle {
    pub color: Color,
    pub line_style: LineStyle,
    pub width: u8,
    pub show_arrow: bool,
}

impl Default for ConnectionStyle {
    fn default() -> Self {
        Self {
            color: default_line_color(),
            line_style: LineStyle::Solid,
            width: 2,
            show_arrow: true,
        }
    }
}

impl ConnectionStyle {
    pub fn validate(&self) -> LayerlineResult<()> {
        if !CONNECTION_WIDTH_RANGE.contains(&self.width) {
            return Err(LayerlineError::validation(format!(
                "connection width {} outside {}..={}",
                self.width,
                CONNECTION_WIDTH_RANGE.start(),
                CONNECTION_WIDTH_RANGE.end()
            )));
        }
        Ok(())
    }
}

/// Directed link between two events.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Connection {
    pub from: EventId,
    pub to: EventId,
    pub style: ConnectionStyle,
}

/// Vertical background band over a year range. Columns may overlap and need not be ordered.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub label: String,
    pub start_year: Year,
    pub end_year: Year,
}

impl Column {
    pub fn new(label: impl Into<String>, start_year: Year, end_year: Year) -> Self {
        Self {
            label: label.into(),
            start_year,
            end_year,
        }
    }
}

/// Horizontal banner over a year range, stacked bottom-up in insertion order.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trend {
    pub label: String,
    pub start_year: Year,
    pub end_year: Year,
    #[serde(default = "default_trend_color")]
    pub color: Color,
}

impl Trend {
    pub fn new(label: impl Into<String>, start_year: Year, end_year: Year) -> Self {
        Self {
            label: label.into(),
            start_year,
            end_year,
            color: default_trend_color(),
        }
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }
}

pub(crate) fn default_event_color() -> Color {
    Color::WHITE
}

pub(crate) fn default_event_border() -> Color {
    Color::rgb(0x33, 0x33, 0x33)
}

pub(crate) fn default_line_color() -> Color {
    Color::rgb(0x66, 0x66, 0x66)
}

pub(crate) fn default_trend_color() -> Color {
    Color::rgb(0x66, 0x66, 0x66)
}

pub(crate) fn require_label(kind: &str, label: &str) -> LayerlineResult<()> {
    if label.trim().is_empty() {
        return Err(LayerlineError::validation(format!(
            "{kind} label must be non-empty"
        )));
    }
    Ok(())
}
