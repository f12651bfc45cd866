use crate::{foundation::core::Year, timeline::model::TimelineConfig};

/// How column and trend year bounds outside the axis range are drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverflowPolicy {
    /// Clamp to the visible 0..100 interval and order reversed bounds.
    #[default]
    Clamp,
    /// Keep raw projected values, which may be negative, beyond 100, or reversed.
    Overflow,
}

impl std::str::FromStr for OverflowPolicy {
    type Err = crate::foundation::error::LayerlineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "clamp" => Ok(Self::Clamp),
            "overflow" => Ok(Self::Overflow),
            other => Err(crate::foundation::error::LayerlineError::validation(
                format!("unknown overflow policy '{other}' (expected clamp|overflow)"),
            )),
        }
    }
}

/// Year <-> horizontal percent mapping for one set of axis bounds.
///
/// Built from a validated [`TimelineConfig`], so the span is never zero.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projector {
    start: f64,
    span: f64,
}

impl Projector {
    pub fn new(config: TimelineConfig) -> Self {
        Self {
            start: f64::from(config.start_year()),
            span: config.span() as f64,
        }
    }

    /// Percent of the axis width (0 at `start_year`, 100 at `end_year`).
    pub fn year_to_x(&self, year: Year) -> f64 {
        (f64::from(year) - self.start) / self.span * 100.0
    }

    /// Fractional year at a percent position.
    pub fn x_to_year(&self, x_percent: f64) -> f64 {
        self.start + (x_percent / 100.0) * self.span
    }

    /// Nearest whole year at a percent position; halves round up.
    pub fn x_to_nearest_year(&self, x_percent: f64) -> Year {
        let y = (self.x_to_year(x_percent) + 0.5).floor();
        y.clamp(f64::from(Year::MIN), f64::from(Year::MAX)) as Year
    }

    /// Horizontal percent interval `(left, right)` of a year range.
    pub fn span_x(&self, start_year: Year, end_year: Year, policy: OverflowPolicy) -> (f64, f64) {
        let x0 = self.year_to_x(start_year);
        let x1 = self.year_to_x(end_year);
        match policy {
            OverflowPolicy::Overflow => (x0, x1),
            OverflowPolicy::Clamp => {
                let (lo, hi) = if x0 <= x1 { (x0, x1) } else { (x1, x0) };
                (lo.clamp(0.0, 100.0), hi.clamp(0.0, 100.0))
            }
        }
    }

    /// [`Projector::span_x`] for drawing: `None` when clamping collapses a range that lies
    /// entirely off the axis.
    pub fn visible_span(
        &self,
        start_year: Year,
        end_year: Year,
        policy: OverflowPolicy,
    ) -> Option<(f64, f64)> {
        let (x0, x1) = self.span_x(start_year, end_year, policy);
        let single_year_on_axis =
            start_year == end_year && (0.0..=100.0).contains(&self.year_to_x(start_year));
        let collapsed = policy == OverflowPolicy::Clamp && x0 == x1 && !single_year_on_axis;
        (!collapsed).then_some((x0, x1))
    }
}
