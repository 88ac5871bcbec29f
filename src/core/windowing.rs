use serde::{Deserialize, Serialize};

use crate::core::Series;

/// Contiguous index range of a series that is drawn in one pass.
///
/// Always satisfies `min_index <= max_index`. The range is derived per draw
/// and never stored on the series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibleWindow {
    pub min_index: usize,
    pub max_index: usize,
}

impl VisibleWindow {
    /// Returns `None` for reversed bounds.
    #[must_use]
    pub fn new(min_index: usize, max_index: usize) -> Option<Self> {
        (min_index <= max_index).then_some(Self {
            min_index,
            max_index,
        })
    }

    /// Window over every entry of `series`, `None` when it is empty.
    #[must_use]
    pub fn full(series: &Series) -> Option<Self> {
        let last = series.len().checked_sub(1)?;
        Self::new(0, last)
    }

    /// Entries inside the inclusive x-range plus one neighbour on each side,
    /// so splines entering or leaving the visible area stay continuous.
    #[must_use]
    pub fn for_x_range(series: &Series, x_start: f64, x_end: f64) -> Option<Self> {
        let (low, high) = if x_start <= x_end {
            (x_start, x_end)
        } else {
            (x_end, x_start)
        };
        let last = series.len().checked_sub(1)?;
        let first_inside = series.index_at_or_after(low)?;
        let last_inside = series.index_at_or_before(high)?;

        let min_index = first_inside.saturating_sub(1);
        let max_index = (last_inside + 1).min(last);
        Self::new(min_index.min(max_index), max_index)
    }

    /// Shortens the window for a horizontal reveal animation.
    ///
    /// `progress_x` is clamped to `[0, 1]`; the first entry is always kept.
    #[must_use]
    pub fn revealed(self, progress_x: f64) -> Self {
        let progress = if progress_x.is_finite() {
            progress_x.clamp(0.0, 1.0)
        } else {
            1.0
        };
        let span = (self.range() as f64 * progress).round() as usize;
        Self {
            min_index: self.min_index,
            max_index: self.min_index + span,
        }
    }

    /// `max_index - min_index`; a one-entry window has range 0.
    #[must_use]
    pub fn range(self) -> usize {
        self.max_index - self.min_index
    }

    #[must_use]
    pub fn entry_count(self) -> usize {
        self.range() + 1
    }

    #[must_use]
    pub fn contains(self, index: usize) -> bool {
        (self.min_index..=self.max_index).contains(&index)
    }

    pub fn indices(self) -> std::ops::RangeInclusive<usize> {
        self.min_index..=self.max_index
    }

    /// Intersection with the valid index range of `series`.
    #[must_use]
    pub fn clamped_to(self, series: &Series) -> Option<Self> {
        let last = series.len().checked_sub(1)?;
        if self.min_index > last {
            return None;
        }
        Self::new(self.min_index, self.max_index.min(last))
    }
}
