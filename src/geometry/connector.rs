use std::f64::consts::FRAC_PI_6;

use crate::{
    foundation::core::{BezPath, Point},
    timeline::model::LineStyle,
};

/// Horizontal offset from an event's center to the point where a connector attaches.
pub const EVENT_HALF_WIDTH: f64 = 60.0;
/// Length of the arrowhead's sides.
pub const ARROW_SIZE: f64 = 10.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// Cubic "elbow" connector between two event anchors.
///
/// Both control points sit at the horizontal midpoint of the attachment points, each at the
/// height of its own endpoint, which yields a horizontal S-curve.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConnectorPath {
    pub start: Point,
    pub c1: Point,
    pub c2: Point,
    pub end: Point,
    /// Side of the source event the curve leaves from.
    pub exit: Side,
    /// Side of the target event the curve enters.
    pub entry: Side,
}

impl ConnectorPath {
    /// Route between two event centers. A source strictly left of its target exits right and
    /// enters left; anything else is mirrored.
    pub fn between(from: Point, to: Point) -> Self {
        let (exit, entry) = if from.x < to.x {
            (Side::Right, Side::Left)
        } else {
            (Side::Left, Side::Right)
        };

        let start_x = match exit {
            Side::Right => from.x + EVENT_HALF_WIDTH,
            Side::Left => from.x - EVENT_HALF_WIDTH,
        };
        let end_x = match entry {
            Side::Left => to.x - EVENT_HALF_WIDTH,
            Side::Right => to.x + EVENT_HALF_WIDTH,
        };
        let mid_x = start_x + (end_x - start_x) * 0.5;

        Self {
            start: Point::new(start_x, from.y),
            c1: Point::new(mid_x, from.y),
            c2: Point::new(mid_x, to.y),
            end: Point::new(end_x, to.y),
            exit,
            entry,
        }
    }

    pub fn to_bezpath(&self) -> BezPath {
        let mut path = BezPath::new();
        path.move_to(self.start);
        path.curve_to(self.c1, self.c2, self.end);
        path
    }

    /// Direction of travel at the end of the curve, in radians.
    pub fn end_angle(&self) -> f64 {
        (self.end.y - self.c2.y).atan2(self.end.x - self.c2.x)
    }

    /// Arrowhead triangle: the tip at the endpoint, then both barbs.
    pub fn arrowhead(&self) -> [Point; 3] {
        let angle = self.end_angle();
        let tip = self.end;
        let barb = |a: f64| Point::new(tip.x - ARROW_SIZE * a.cos(), tip.y - ARROW_SIZE * a.sin());
        [tip, barb(angle - FRAC_PI_6), barb(angle + FRAC_PI_6)]
    }

    pub fn arrowhead_path(&self) -> BezPath {
        let [tip, a, b] = self.arrowhead();
        let mut path = BezPath::new();
        path.move_to(tip);
        path.line_to(a);
        path.line_to(b);
        path.close_path();
        path
    }
}

/// Dash intervals (on, off, ...) for a line style; empty means solid.
pub fn dash_pattern(style: LineStyle) -> &'static [f64] {
    match style {
        LineStyle::Solid => &[],
        LineStyle::Dashed => &[5.0, 5.0],
        LineStyle::Dotted => &[2.0, 3.0],
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/connector.rs"]
mod tests;
