use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::core::primitives::finite_extent;
use crate::core::{DataPoint, VisibleWindow};
use crate::error::{ChartError, ChartResult};

/// Which y-axis (and therefore which coordinate mapper) a series is drawn against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AxisDependency {
    #[default]
    Left,
    Right,
}

/// Ordered line-series data.
///
/// Entries are finite and sorted by non-decreasing `x`; index `i` always
/// follows x order. The renderer only ever reads a series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    points: Vec<DataPoint>,
    #[serde(default)]
    axis: AxisDependency,
}

impl Series {
    /// Wraps already-ordered points, rejecting non-finite or unsorted input.
    pub fn new(points: Vec<DataPoint>) -> ChartResult<Self> {
        for (index, point) in points.iter().enumerate() {
            if !point.is_finite() {
                return Err(ChartError::InvalidData(format!(
                    "series entry {index} must have finite x/y"
                )));
            }
        }
        if let Some(index) = points.windows(2).position(|pair| pair[1].x < pair[0].x) {
            return Err(ChartError::InvalidData(format!(
                "series x must be non-decreasing (entry {} < entry {index})",
                index + 1
            )));
        }
        Ok(Self {
            points,
            axis: AxisDependency::Left,
        })
    }

    /// Drops non-finite entries and stable-sorts the rest by `x`.
    #[must_use]
    pub fn canonicalized(mut points: Vec<DataPoint>) -> Self {
        points.retain(|point| point.is_finite());
        points.sort_by_key(|point| OrderedFloat(point.x));
        Self {
            points,
            axis: AxisDependency::Left,
        }
    }

    #[must_use]
    pub fn empty() -> Self {
        Self {
            points: Vec::new(),
            axis: AxisDependency::Left,
        }
    }

    #[must_use]
    pub fn with_axis(mut self, axis: AxisDependency) -> Self {
        self.axis = axis;
        self
    }

    #[must_use]
    pub fn axis(&self) -> AxisDependency {
        self.axis
    }

    #[must_use]
    pub fn points(&self) -> &[DataPoint] {
        &self.points
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Entry at `index`, or `None` when out of range.
    #[must_use]
    pub fn entry(&self, index: usize) -> Option<DataPoint> {
        self.points.get(index).copied()
    }

    /// Same as [`Series::entry`] for signed indices (`index - 1` lookups at the start).
    #[must_use]
    pub fn entry_signed(&self, index: isize) -> Option<DataPoint> {
        usize::try_from(index).ok().and_then(|i| self.entry(i))
    }

    #[must_use]
    pub fn x_range(&self) -> Option<(f64, f64)> {
        let first = self.points.first()?;
        let last = self.points.last()?;
        Some((first.x, last.x))
    }

    #[must_use]
    pub fn y_range(&self) -> Option<(f64, f64)> {
        finite_extent(self.points.iter().map(|point| point.y))
    }

    /// Index of the last entry with `entry.x <= x`, falling back to the first entry.
    #[must_use]
    pub fn index_at_or_before(&self, x: f64) -> Option<usize> {
        if self.points.is_empty() {
            return None;
        }
        let after = self.points.partition_point(|point| point.x <= x);
        Some(after.saturating_sub(1))
    }

    /// Index of the first entry with `entry.x >= x`, falling back to the last entry.
    #[must_use]
    pub fn index_at_or_after(&self, x: f64) -> Option<usize> {
        if self.points.is_empty() {
            return None;
        }
        let first = self.points.partition_point(|point| point.x < x);
        Some(first.min(self.points.len() - 1))
    }

    /// Window covering `[x_start, x_end]` plus one padding entry on each side.
    #[must_use]
    pub fn visible_window(&self, x_start: f64, x_end: f64) -> Option<VisibleWindow> {
        VisibleWindow::for_x_range(self, x_start, x_end)
    }

    /// Points of `window` in x order; out-of-range indices are skipped.
    pub fn window_points(&self, window: VisibleWindow) -> impl Iterator<Item = DataPoint> + '_ {
        window.indices().filter_map(|index| self.entry(index))
    }
}
