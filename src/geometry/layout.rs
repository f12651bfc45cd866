use crate::{
    foundation::core::{Point, Rect, Year},
    geometry::projection::Projector,
    timeline::{diagram::Diagram, ids::EventId, model::TimelineConfig},
};

pub const DEFAULT_CANVAS_WIDTH: f64 = 1200.0;
pub const LAYER_HEIGHT: f64 = 120.0;
/// Space below the last layer holding the trend stack and the year axis.
pub const FOOTER_HEIGHT: f64 = 100.0;

pub const EVENT_BOX_WIDTH: f64 = 110.0;
pub const EVENT_BOX_HEIGHT: f64 = 40.0;
pub const EVENT_TOP_INSET: f64 = 20.0;
pub const EVENT_ANCHOR_INSET: f64 = 50.0;

pub const AXIS_BOTTOM_OFFSET: f64 = 48.0;
pub const TICK_LENGTH: f64 = 8.0;
pub const TICK_LABEL_OFFSET: f64 = 20.0;
pub const YEAR_TICK_STRIDE: i64 = 5;
/// Narrowest horizontal gap between ticks; wider spans widen the stride instead.
pub const MIN_TICK_SPACING: f64 = 4.0;

pub const TREND_BOTTOM_OFFSET: f64 = 64.0;
pub const TREND_STACK_STEP: f64 = 8.0;
pub const TREND_HEIGHT: f64 = 24.0;

/// Where a pointer landed in domain terms.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    pub layer_index: usize,
    pub year: Year,
    pub x_percent: f64,
}

/// Logical-pixel geometry of one diagram at a given width.
///
/// Height follows the layer count: one band per layer plus the footer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneLayout {
    width: f64,
    layer_count: usize,
    config: TimelineConfig,
    projector: Projector,
}

impl SceneLayout {
    pub fn new(diagram: &Diagram, width: f64) -> Self {
        Self {
            width,
            layer_count: diagram.layers().len(),
            config: diagram.config(),
            projector: diagram.projector(),
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.layer_count as f64 * LAYER_HEIGHT + FOOTER_HEIGHT
    }

    pub fn projector(&self) -> Projector {
        self.projector
    }

    pub fn percent_to_px(&self, x_percent: f64) -> f64 {
        x_percent / 100.0 * self.width
    }

    pub fn px_to_percent(&self, x: f64) -> f64 {
        x / self.width * 100.0
    }

    pub fn year_to_px(&self, year: Year) -> f64 {
        self.percent_to_px(self.projector.year_to_x(year))
    }

    pub fn layer_top(&self, layer_index: usize) -> f64 {
        layer_index as f64 * LAYER_HEIGHT
    }

    /// Event box centered horizontally on `x`.
    pub fn event_box(&self, x: f64, layer_index: usize) -> Rect {
        let top = self.layer_top(layer_index) + EVENT_TOP_INSET;
        Rect::new(
            x - EVENT_BOX_WIDTH / 2.0,
            top,
            x + EVENT_BOX_WIDTH / 2.0,
            top + EVENT_BOX_HEIGHT,
        )
    }

    /// Point connectors are routed from, before the half-width offset is applied.
    pub fn event_anchor(&self, x: f64, layer_index: usize) -> Point {
        Point::new(x, self.layer_top(layer_index) + EVENT_ANCHOR_INSET)
    }

    /// Center x and layer position of an event, if it and its layer resolve.
    pub fn event_slot(&self, diagram: &Diagram, id: EventId) -> Option<(f64, usize)> {
        let event = diagram.event(id)?;
        let layer_index = diagram.layer_index(event.layer)?;
        Some((self.year_to_px(event.year), layer_index))
    }

    pub fn axis_y(&self) -> f64 {
        self.height() - AXIS_BOTTOM_OFFSET
    }

    /// Year step between ticks: [`YEAR_TICK_STRIDE`], or a multiple of it once the ticks
    /// would sit closer than [`MIN_TICK_SPACING`].
    pub fn tick_stride(&self) -> i64 {
        let max_ticks = ((self.width / MIN_TICK_SPACING).floor() as i64).max(1);
        let ticks = self.config.span() / YEAR_TICK_STRIDE + 1;
        if ticks <= max_ticks {
            YEAR_TICK_STRIDE
        } else {
            YEAR_TICK_STRIDE * ((ticks + max_ticks - 1) / max_ticks)
        }
    }

    /// Years that get a tick: every stride from the start, never past the end.
    pub fn tick_years(&self) -> Vec<Year> {
        let start = i64::from(self.config.start_year());
        let stride = self.tick_stride();
        let steps = self.config.span() / stride;
        (0..=steps).map(|i| (start + i * stride) as Year).collect()
    }

    /// Top edge of the trend band at stacking position `index`.
    pub fn trend_top(&self, index: usize) -> f64 {
        self.height() - TREND_BOTTOM_OFFSET - index as f64 * TREND_STACK_STEP
    }

    /// Map a pointer position to a layer and whole year. `None` outside the layer bands.
    pub fn locate(&self, point: Point) -> Option<Placement> {
        if !point.y.is_finite() || !point.x.is_finite() || point.y < 0.0 {
            return None;
        }
        let layer_index = (point.y / LAYER_HEIGHT).floor() as usize;
        if layer_index >= self.layer_count {
            return None;
        }
        let x_percent = self.px_to_percent(point.x);
        Some(Placement {
            layer_index,
            year: self.projector.x_to_nearest_year(x_percent),
            x_percent,
        })
    }

    /// Topmost event whose box contains `point`. Later events draw over earlier ones.
    pub fn hit_event(&self, diagram: &Diagram, point: Point) -> Option<EventId> {
        diagram.events().iter().rev().find_map(|e| {
            let (x, layer_index) = self.event_slot(diagram, e.id)?;
            self.event_box(x, layer_index)
                .contains(point)
                .then_some(e.id)
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/layout.rs"]
mod tests;
