use crate::{
    foundation::{
        color::Color,
        core::{BezPath, Point, Rect},
    },
    geometry::{
        connector::{ConnectorPath, dash_pattern},
        layout::{EVENT_BOX_WIDTH, SceneLayout, TICK_LABEL_OFFSET, TICK_LENGTH, TREND_HEIGHT},
    },
    render::{
        settings::RenderSettings,
        text::{TextFace, TextMeasure, wrap_label},
    },
    timeline::{diagram::Diagram, model::EventStyle},
};

pub const COLUMN_FILL: Color = Color::rgba(243, 244, 246, 128);
pub const COLUMN_STROKE: Color = Color::rgb(209, 213, 219);
pub const LABEL_COLOR: Color = Color::rgb(0x37, 0x41, 0x51);
pub const SEPARATOR_COLOR: Color = Color::rgb(0xd1, 0xd5, 0xdb);
pub const AXIS_COLOR: Color = Color::rgb(0x9c, 0xa3, 0xaf);
pub const TICK_LABEL_COLOR: Color = Color::rgb(0x4b, 0x55, 0x63);
pub const TREND_ALPHA: f64 = 0.8;

const COLUMN_LABEL_SIZE: f64 = 12.0;
const COLUMN_LABEL_BASELINE: f64 = 15.0;
const LAYER_LABEL_SIZE: f64 = 11.0;
const LAYER_LABEL_X: f64 = 8.0;
const LAYER_LABEL_BASELINE: f64 = 15.0;
const LAYER_LABEL_MAX_WIDTH: f64 = 140.0;
const EVENT_BORDER_WIDTH: f64 = 2.0;
const EVENT_TEXT_SIZE: f64 = 10.0;
const EVENT_TEXT_PADDING: f64 = 10.0;
const EVENT_FIRST_BASELINE: f64 = 15.0;
const EVENT_LINE_STEP: f64 = 12.0;
const SMALL_TEXT_SIZE: f64 = 10.0;
const TREND_LABEL_BASELINE: f64 = 15.0;
const HAIRLINE: f64 = 1.0;

/// Back-to-front drawing phases. Every item of a phase is drawn before the next phase starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ScenePhase {
    Background,
    Columns,
    Layers,
    Connections,
    Events,
    Axis,
    Trends,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAlign {
    /// `origin.x` is the left edge.
    Left,
    /// `origin.x` is the horizontal center.
    Center,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StrokeStyle {
    pub color: Color,
    pub width: f64,
    /// Dash intervals; empty draws a solid line.
    pub dash: Vec<f64>,
}

impl StrokeStyle {
    pub fn solid(color: Color, width: f64) -> Self {
        Self {
            color,
            width,
            dash: Vec::new(),
        }
    }
}

/// A single line of text anchored at its alphabetic baseline.
#[derive(Clone, Debug, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub origin: Point,
    pub align: TextAlign,
    pub face: TextFace,
    pub size: f64,
    pub color: Color,
    /// Wider text is condensed horizontally to fit.
    pub max_width: Option<f64>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    FillRect { rect: Rect, color: Color },
    StrokeRect { rect: Rect, stroke: StrokeStyle },
    StrokePath { path: BezPath, stroke: StrokeStyle },
    FillPath { path: BezPath, color: Color },
    Text(TextRun),
}

#[derive(Clone, Debug, PartialEq)]
pub struct SceneItem {
    pub phase: ScenePhase,
    pub op: DrawOp,
}

/// Resolved draw list for one diagram, in logical pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    pub width: f64,
    pub height: f64,
    pub items: Vec<SceneItem>,
}

impl Scene {
    pub fn ops_in(&self, phase: ScenePhase) -> impl Iterator<Item = &DrawOp> {
        self.items
            .iter()
            .filter(move |item| item.phase == phase)
            .map(|item| &item.op)
    }

    fn push(&mut self, phase: ScenePhase, op: DrawOp) {
        self.items.push(SceneItem { phase, op });
    }
}

/// Resolve a diagram into its draw list.
///
/// Event x positions are projected from the year under the current bounds; nothing cached on the
/// diagram is trusted for geometry.
#[tracing::instrument(skip_all, fields(layers = diagram.layers().len(), events = diagram.events().len()))]
pub fn compile_scene(
    diagram: &Diagram,
    layout: &SceneLayout,
    settings: &RenderSettings,
    measure: &mut dyn TextMeasure,
) -> Scene {
    let width = layout.width();
    let height = layout.height();
    let projector = layout.projector();
    let mut scene = Scene {
        width,
        height,
        items: Vec::new(),
    };

    scene.push(
        ScenePhase::Background,
        DrawOp::FillRect {
            rect: Rect::new(0.0, 0.0, width, height),
            color: Color::WHITE,
        },
    );

    for column in diagram.columns() {
        let Some((x0, x1)) =
            projector.visible_span(column.start_year, column.end_year, settings.overflow)
        else {
            continue;
        };
        let (x0, x1) = (layout.percent_to_px(x0), layout.percent_to_px(x1));
        let rect = Rect::new(x0, 0.0, x1, height).abs();
        scene.push(
            ScenePhase::Columns,
            DrawOp::FillRect {
                rect,
                color: COLUMN_FILL,
            },
        );
        scene.push(
            ScenePhase::Columns,
            DrawOp::StrokeRect {
                rect,
                stroke: StrokeStyle::solid(COLUMN_STROKE, HAIRLINE),
            },
        );
        scene.push(
            ScenePhase::Columns,
            DrawOp::Text(TextRun {
                text: column.label.clone(),
                origin: Point::new((x0 + x1) / 2.0, COLUMN_LABEL_BASELINE),
                align: TextAlign::Center,
                face: TextFace::Regular,
                size: COLUMN_LABEL_SIZE,
                color: LABEL_COLOR,
                max_width: None,
            }),
        );
    }

    for (i, layer) in diagram.layers().iter().enumerate() {
        let y = layout.layer_top(i);
        let mut path = BezPath::new();
        path.move_to(Point::new(0.0, y));
        path.line_to(Point::new(width, y));
        scene.push(
            ScenePhase::Layers,
            DrawOp::StrokePath {
                path,
                stroke: StrokeStyle::solid(SEPARATOR_COLOR, HAIRLINE),
            },
        );
        scene.push(
            ScenePhase::Layers,
            DrawOp::Text(TextRun {
                text: layer.name.clone(),
                origin: Point::new(LAYER_LABEL_X, y + LAYER_LABEL_BASELINE),
                align: TextAlign::Left,
                face: TextFace::Bold,
                size: LAYER_LABEL_SIZE,
                color: LABEL_COLOR,
                max_width: Some(LAYER_LABEL_MAX_WIDTH),
            }),
        );
    }

    for connection in diagram.connections() {
        let (Some((fx, fl)), Some((tx, tl))) = (
            layout.event_slot(diagram, connection.from),
            layout.event_slot(diagram, connection.to),
        ) else {
            tracing::warn!(from = %connection.from, to = %connection.to, "skipping unresolved connection");
            continue;
        };
        let route =
            ConnectorPath::between(layout.event_anchor(fx, fl), layout.event_anchor(tx, tl));
        let style = &connection.style;
        scene.push(
            ScenePhase::Connections,
            DrawOp::StrokePath {
                path: route.to_bezpath(),
                stroke: StrokeStyle {
                    color: style.color,
                    width: f64::from(style.width),
                    dash: dash_pattern(style.line_style).to_vec(),
                },
            },
        );
        if style.show_arrow {
            scene.push(
                ScenePhase::Connections,
                DrawOp::FillPath {
                    path: route.arrowhead_path(),
                    color: style.color,
                },
            );
        }
    }

    for event in diagram.events() {
        let Some((x, layer_index)) = layout.event_slot(diagram, event.id) else {
            continue;
        };
        let rect = layout.event_box(x, layer_index);
        scene.push(
            ScenePhase::Events,
            DrawOp::FillRect {
                rect,
                color: event.color,
            },
        );
        scene.push(
            ScenePhase::Events,
            DrawOp::StrokeRect {
                rect,
                stroke: StrokeStyle::solid(event.border_color, EVENT_BORDER_WIDTH),
            },
        );

        let face = match event.style {
            EventStyle::Normal => TextFace::Regular,
            EventStyle::Italic => TextFace::Italic,
        };
        let lines = wrap_label(
            &event.label,
            EVENT_BOX_WIDTH - EVENT_TEXT_PADDING,
            face,
            EVENT_TEXT_SIZE,
            measure,
        );
        for (n, line) in lines.into_iter().enumerate() {
            scene.push(
                ScenePhase::Events,
                DrawOp::Text(TextRun {
                    text: line,
                    origin: Point::new(x, rect.y0 + EVENT_FIRST_BASELINE + n as f64 * EVENT_LINE_STEP),
                    align: TextAlign::Center,
                    face,
                    size: EVENT_TEXT_SIZE,
                    color: Color::BLACK,
                    max_width: None,
                }),
            );
        }
    }

    let axis_y = layout.axis_y();
    let mut axis = BezPath::new();
    axis.move_to(Point::new(0.0, axis_y));
    axis.line_to(Point::new(width, axis_y));
    scene.push(
        ScenePhase::Axis,
        DrawOp::StrokePath {
            path: axis,
            stroke: StrokeStyle::solid(AXIS_COLOR, HAIRLINE),
        },
    );
    for year in layout.tick_years() {
        let x = layout.year_to_px(year);
        let mut tick = BezPath::new();
        tick.move_to(Point::new(x, axis_y));
        tick.line_to(Point::new(x, axis_y + TICK_LENGTH));
        scene.push(
            ScenePhase::Axis,
            DrawOp::StrokePath {
                path: tick,
                stroke: StrokeStyle::solid(AXIS_COLOR, HAIRLINE),
            },
        );
        scene.push(
            ScenePhase::Axis,
            DrawOp::Text(TextRun {
                text: year.to_string(),
                origin: Point::new(x, axis_y + TICK_LABEL_OFFSET),
                align: TextAlign::Center,
                face: TextFace::Regular,
                size: SMALL_TEXT_SIZE,
                color: TICK_LABEL_COLOR,
                max_width: None,
            }),
        );
    }

    for (i, trend) in diagram.trends().iter().enumerate() {
        // Hidden trends keep their stacking slot.
        let Some((x0, x1)) =
            projector.visible_span(trend.start_year, trend.end_year, settings.overflow)
        else {
            continue;
        };
        let (x0, x1) = (layout.percent_to_px(x0), layout.percent_to_px(x1));
        let top = layout.trend_top(i);
        scene.push(
            ScenePhase::Trends,
            DrawOp::FillRect {
                rect: Rect::new(x0, top, x1, top + TREND_HEIGHT).abs(),
                color: trend.color.with_alpha_factor(TREND_ALPHA),
            },
        );
        scene.push(
            ScenePhase::Trends,
            DrawOp::Text(TextRun {
                text: trend.label.clone(),
                origin: Point::new((x0 + x1) / 2.0, top + TREND_LABEL_BASELINE),
                align: TextAlign::Center,
                face: TextFace::Regular,
                size: SMALL_TEXT_SIZE,
                color: Color::WHITE,
                max_width: None,
            }),
        );
    }

    debug_assert!(scene.items.windows(2).all(|w| w[0].phase <= w[1].phase));
    tracing::debug!(items = scene.items.len(), width, height, "compiled scene");
    scene
}

#[cfg(test)]
#[path = "../../tests/unit/render/scene.rs"]
mod tests;
