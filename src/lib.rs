//! Layerline builds layered timeline charts and exports them.
//!
//! A [`Diagram`] holds layers, events placed on a year axis, directed connections between
//! events, background columns and up to four trend bands. It is the only mutation surface and
//! keeps its cross references valid after every call.
//!
//! # Pipeline overview
//!
//! 1. **Model**: build or load a [`Diagram`] (directly, through [`DiagramBuilder`], or from a
//!    [`TimelineDocument`]).
//! 2. **Layout**: [`SceneLayout`] maps years and layers to logical pixels.
//! 3. **Compile**: [`compile_scene`] turns the diagram into a back-to-front [`Scene`].
//! 4. **Render**: [`CpuBackend`] rasterizes the scene into a [`Raster`].
//! 5. **Encode**: PNG and PDF wrap that one raster; JSON serializes the document form.
//!
//! Interactive editing is modelled by [`EditorSession`], an explicit state machine over the
//! same mutation surface.
#![forbid(unsafe_code)]

mod editor;
mod export;
mod foundation;
mod geometry;
mod render;
mod timeline;

pub use editor::session::{EditorAction, EditorSession, EditorState, EventDraft, Outcome};
pub use export::document::{
    ConnectionRecord, EventRecord, FORMAT_VERSION, TimelineDocument, from_json_str, to_document,
    to_json_string,
};
pub use export::pdf::{CSS_PX_PER_INCH, PageOrientation, encode_pdf};
pub use export::raster::{encode_png, render_raster, render_raster_with};
pub use export::{ExportFormat, ExportReport, export_to_bytes, export_to_file};
pub use foundation::color::Color;
pub use foundation::core::{Affine, BezPath, Point, Rect, Vec2, Year};
pub use foundation::error::{LayerlineError, LayerlineResult};
pub use geometry::connector::{ARROW_SIZE, ConnectorPath, EVENT_HALF_WIDTH, Side, dash_pattern};
pub use geometry::layout::{
    DEFAULT_CANVAS_WIDTH, EVENT_BOX_HEIGHT, EVENT_BOX_WIDTH, FOOTER_HEIGHT, LAYER_HEIGHT,
    MIN_TICK_SPACING, Placement, SceneLayout, YEAR_TICK_STRIDE,
};
pub use geometry::projection::{OverflowPolicy, Projector};
pub use render::backend::{Raster, SceneBackend, execute_scene};
pub use render::cpu::CpuBackend;
pub use render::scene::{
    DrawOp, Scene, SceneItem, ScenePhase, StrokeStyle, TextAlign, TextRun, compile_scene,
};
pub use render::settings::{DEFAULT_EXPORT_SCALE, FontSource, RenderSettings};
pub use render::text::{ApproxMeasure, FontBook, TextFace, TextMeasure, wrap_label};
pub use timeline::diagram::{Diagram, EventRemoval, LayerRemoval};
pub use timeline::dsl::DiagramBuilder;
pub use timeline::ids::{EventId, LayerId};
pub use timeline::model::{
    CONNECTION_WIDTH_RANGE, Column, Connection, ConnectionStyle, Event, EventSpec, EventStyle,
    Layer, LineStyle, MAX_TRENDS, TimelineConfig, Trend,
};
