pub use kurbo::{Affine, BezPath, Point, Rect, Vec2};

/// Calendar year on the timeline axis.
pub type Year = i32;
