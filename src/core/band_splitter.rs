use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{CoordinateMapper, Path, Rect, Series};
use crate::error::{ChartError, ChartResult};
use crate::render::Color;

pub const DEFAULT_ABOVE_COLOR: Color = Color::rgb(0.0, 1.0, 0.0);
pub const DEFAULT_BELOW_COLOR: Color = Color::rgb(1.0, 0.0, 0.0);
pub const DEFAULT_UNCERTAIN_COLOR: Color = Color::rgb(0.5, 0.5, 0.5);

/// Stroke colors for one draw call, resolved once with defaults applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorRule {
    pub threshold_y: f64,
    pub above: Color,
    pub below: Color,
    pub uncertain: Color,
}

impl ColorRule {
    #[must_use]
    pub fn new(threshold_y: f64) -> Self {
        Self {
            threshold_y,
            above: DEFAULT_ABOVE_COLOR,
            below: DEFAULT_BELOW_COLOR,
            uncertain: DEFAULT_UNCERTAIN_COLOR,
        }
    }

    /// Default rule for `series`: the threshold sits on the series minimum.
    #[must_use]
    pub fn for_series(series: &Series) -> Self {
        Self::new(series.y_range().map_or(0.0, |(min, _)| min))
    }

    #[must_use]
    pub fn with_colors(mut self, above: Color, below: Color, uncertain: Color) -> Self {
        self.above = above;
        self.below = below;
        self.uncertain = uncertain;
        self
    }

    pub fn validate(self) -> ChartResult<()> {
        if !self.threshold_y.is_finite() {
            return Err(ChartError::InvalidData(
                "color threshold must be finite".to_owned(),
            ));
        }
        self.above.validate()?;
        self.below.validate()?;
        self.uncertain.validate()
    }
}

/// Caller-selected x-interval drawn with the normal colors; the rest of the
/// series is drawn in the uncertain color. Bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActiveRange {
    from_x: f64,
    to_x: f64,
}

impl ActiveRange {
    /// Accepts the two handles in either order.
    pub fn new(a: f64, b: f64) -> ChartResult<Self> {
        if !a.is_finite() || !b.is_finite() {
            return Err(ChartError::InvalidData(
                "active range bounds must be finite".to_owned(),
            ));
        }
        Ok(Self {
            from_x: a.min(b),
            to_x: a.max(b),
        })
    }

    #[must_use]
    pub fn from_x(self) -> f64 {
        self.from_x
    }

    #[must_use]
    pub fn to_x(self) -> f64 {
        self.to_x
    }

    #[must_use]
    pub fn contains(self, x: f64) -> bool {
        x >= self.from_x && x <= self.to_x
    }
}

/// Which part of the chart a band pass covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BandRole {
    Above,
    Below,
    LeftUncertain,
    RightUncertain,
}

/// Geometry shared by every band of one draw call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandFrame {
    pub mapper: CoordinateMapper,
    /// Drawable chart area; every clip is clamped to it.
    pub content: Rect,
    /// Series y-range in data space (unscaled).
    pub y_range: (f64, f64),
    pub progress_y: f64,
    /// Extra pixels added to the outer (non-seam) band edges.
    pub edge_padding_px: f64,
}

/// Canvas rows of the two threshold bands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandRows {
    pub above: (f64, f64),
    pub below: (f64, f64),
}

/// Canvas columns of the three active-range zones.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneColumns {
    pub left: (f64, f64),
    pub active: (f64, f64),
    pub right: (f64, f64),
}

impl BandFrame {
    #[must_use]
    pub fn new(mapper: CoordinateMapper, content: Rect, y_range: (f64, f64)) -> Self {
        Self {
            mapper,
            content,
            y_range,
            progress_y: 1.0,
            edge_padding_px: 0.0,
        }
    }

    #[must_use]
    pub fn with_progress_y(mut self, progress_y: f64) -> Self {
        self.progress_y = progress_y;
        self
    }

    #[must_use]
    pub fn with_edge_padding(mut self, edge_padding_px: f64) -> Self {
        self.edge_padding_px = edge_padding_px;
        self
    }

    fn clamp_row(&self, y: f64) -> f64 {
        y.clamp(self.content.top(), self.content.bottom())
    }

    fn clamp_column(&self, x: f64) -> f64 {
        x.clamp(self.content.left(), self.content.right())
    }

    /// Rows (top, bottom) of the above/below bands for `threshold_y`.
    ///
    /// The threshold is clamped into the series range, so a threshold outside
    /// it collapses one band to zero height instead of failing.
    #[must_use]
    pub fn band_rows(&self, threshold_y: f64) -> BandRows {
        let progress = self.progress_y.clamp(0.0, 1.0);
        let (min_y, max_y) = self.y_range;
        let lo = min_y * progress;
        let hi = max_y * progress;
        let threshold = if threshold_y.is_finite() {
            (threshold_y * progress).clamp(lo.min(hi), lo.max(hi))
        } else {
            lo
        };

        let seam = self.mapper.y_to_canvas(threshold);
        let padding = self.edge_padding_px.max(0.0);
        let outer = |value: f64| {
            let edge = self.mapper.y_to_canvas(value);
            if edge == seam {
                edge
            } else {
                edge + (edge - seam).signum() * padding
            }
        };
        let rows = |edge: f64| {
            let (a, b) = (self.clamp_row(edge), self.clamp_row(seam));
            (a.min(b), a.max(b))
        };

        BandRows {
            above: rows(outer(hi)),
            below: rows(outer(lo)),
        }
    }

    /// Columns of the left-uncertain, active and right-uncertain zones.
    #[must_use]
    pub fn zone_columns(&self, active: ActiveRange) -> ZoneColumns {
        let a = self.clamp_column(self.mapper.x_to_canvas(active.from_x));
        let b = self.clamp_column(self.mapper.x_to_canvas(active.to_x));
        let (start, end) = (a.min(b), a.max(b));
        ZoneColumns {
            left: (self.content.left(), start),
            active: (start, end),
            right: (end, self.content.right()),
        }
    }

    #[must_use]
    pub fn full_columns(&self) -> (f64, f64) {
        (self.content.left(), self.content.right())
    }

    #[must_use]
    pub fn full_rows(&self) -> (f64, f64) {
        (self.content.top(), self.content.bottom())
    }
}

/// Builds a clip rectangle from (start, end) column and row pairs.
#[must_use]
pub fn clip_rect(columns: (f64, f64), rows: (f64, f64)) -> Rect {
    Rect::new_unchecked(columns.0, rows.0, columns.1 - columns.0, rows.1 - rows.0)
}

/// One stroke pass: the shared path, a clip and a color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandStroke<'p> {
    pub path: &'p Path,
    pub role: BandRole,
    pub clip: Rect,
    pub color: Color,
}

pub type BandStrokes<'p> = SmallVec<[BandStroke<'p>; 4]>;

/// Splits `path` into colored stroke passes.
///
/// Every pass borrows the same path, so zone seams line up exactly; passes
/// differ only in clip and color. Degenerate clips are returned as-is.
#[must_use]
pub fn split_bands<'p>(
    path: &'p Path,
    frame: &BandFrame,
    rule: &ColorRule,
    active: Option<ActiveRange>,
) -> BandStrokes<'p> {
    let rows = frame.band_rows(rule.threshold_y);
    let mut strokes = BandStrokes::new();

    let Some(active) = active else {
        let columns = frame.full_columns();
        strokes.push(BandStroke {
            path,
            role: BandRole::Above,
            clip: clip_rect(columns, rows.above),
            color: rule.above,
        });
        strokes.push(BandStroke {
            path,
            role: BandRole::Below,
            clip: clip_rect(columns, rows.below),
            color: rule.below,
        });
        return strokes;
    };

    let zones = frame.zone_columns(active);
    let full_rows = frame.full_rows();
    strokes.push(BandStroke {
        path,
        role: BandRole::LeftUncertain,
        clip: clip_rect(zones.left, full_rows),
        color: rule.uncertain,
    });
    strokes.push(BandStroke {
        path,
        role: BandRole::Above,
        clip: clip_rect(zones.active, rows.above),
        color: rule.above,
    });
    strokes.push(BandStroke {
        path,
        role: BandRole::Below,
        clip: clip_rect(zones.active, rows.below),
        color: rule.below,
    });
    strokes.push(BandStroke {
        path,
        role: BandRole::RightUncertain,
        clip: clip_rect(zones.right, full_rows),
        color: rule.uncertain,
    });
    strokes
}
