use serde::{Deserialize, Serialize};

use crate::core::{CanvasPoint, CoordinateMapper, DataPoint, Path, Series, VisibleWindow};
use crate::error::{ChartError, ChartResult};

pub const DEFAULT_CUBIC_INTENSITY: f64 = 0.2;

/// How consecutive entries are joined.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LineMode {
    /// Straight segments between entries.
    #[default]
    Linear,
    /// Horizontal run at the previous y, then a vertical riser.
    Stepped,
    /// Cubic segments with both controls at the segment's mid-x.
    CubicHorizontal,
    /// Cubic Bézier through neighbour tangents scaled by `intensity`.
    CubicNatural { intensity: f64 },
}

impl LineMode {
    #[must_use]
    pub fn cubic_natural() -> Self {
        Self::CubicNatural {
            intensity: DEFAULT_CUBIC_INTENSITY,
        }
    }

    #[must_use]
    pub fn is_cubic(self) -> bool {
        matches!(self, Self::CubicHorizontal | Self::CubicNatural { .. })
    }

    #[must_use]
    pub fn is_stepped(self) -> bool {
        matches!(self, Self::Stepped)
    }

    pub fn validate(self) -> ChartResult<()> {
        if let Self::CubicNatural { intensity } = self {
            if !intensity.is_finite() || intensity <= 0.0 || intensity > 1.0 {
                return Err(ChartError::InvalidData(
                    "cubic intensity must be finite and in (0, 1]".to_owned(),
                ));
            }
        }
        Ok(())
    }
}

/// Builds the stroke path of `window` in canvas space.
///
/// Every y is multiplied by `progress_y` before mapping. Indices outside the
/// series are skipped; a window that resolves to no entries yields an empty
/// path.
#[must_use]
pub fn build_path(
    series: &Series,
    window: VisibleWindow,
    mode: LineMode,
    progress_y: f64,
    mapper: CoordinateMapper,
) -> Path {
    let Some(window) = window.clamped_to(series) else {
        return Path::new();
    };

    match mode {
        LineMode::Linear => build_linear(series, window, false, progress_y, mapper),
        LineMode::Stepped => build_linear(series, window, true, progress_y, mapper),
        LineMode::CubicHorizontal => build_cubic_horizontal(series, window, progress_y, mapper),
        LineMode::CubicNatural { intensity } => {
            build_cubic_natural(series, window, intensity, progress_y, mapper)
        }
    }
}

fn build_linear(
    series: &Series,
    window: VisibleWindow,
    stepped: bool,
    progress_y: f64,
    mapper: CoordinateMapper,
) -> Path {
    let points = &series.points()[window.min_index..=window.max_index];
    let mapped = mapper.map_points(points, progress_y);
    let per_entry = if stepped { 2 } else { 1 };
    let mut path = Path::with_capacity(mapped.len() * per_entry);

    let mut previous: Option<CanvasPoint> = None;
    for point in mapped {
        match previous {
            None => path.move_to(point),
            Some(prev) => {
                if stepped {
                    path.line_to(CanvasPoint::new(point.x, prev.y));
                }
                path.line_to(point);
            }
        }
        previous = Some(point);
    }
    path
}

fn build_cubic_horizontal(
    series: &Series,
    window: VisibleWindow,
    progress_y: f64,
    mapper: CoordinateMapper,
) -> Path {
    let mut path = Path::with_capacity(window.entry_count());
    let mut entries = series.window_points(window);
    let Some(mut prev) = entries.next() else {
        return path;
    };
    path.move_to(mapper.data_to_canvas(prev.x, prev.y * progress_y));

    for cur in entries {
        let cpx = prev.x + (cur.x - prev.x) / 2.0;
        path.curve_to(
            mapper.data_to_canvas(cpx, prev.y * progress_y),
            mapper.data_to_canvas(cpx, cur.y * progress_y),
            mapper.data_to_canvas(cur.x, cur.y * progress_y),
        );
        prev = cur;
    }
    path
}

fn build_cubic_natural(
    series: &Series,
    window: VisibleWindow,
    intensity: f64,
    progress_y: f64,
    mapper: CoordinateMapper,
) -> Path {
    let mut path = Path::with_capacity(window.entry_count());
    let last_index = series.len() - 1;
    let at = |index: usize| -> Option<DataPoint> { series.entry(index.min(last_index)) };

    let Some(start) = at(window.min_index) else {
        return path;
    };
    path.move_to(mapper.data_to_canvas(start.x, start.y * progress_y));

    for j in (window.min_index + 1)..=window.max_index {
        // Neighbours outside the series clamp to the first/last entry.
        let (Some(prev_prev), Some(prev), Some(cur), Some(next)) = (
            at(j.saturating_sub(2)),
            at(j - 1),
            at(j),
            at(j + 1),
        ) else {
            continue;
        };

        let prev_dx = (cur.x - prev_prev.x) * intensity;
        let prev_dy = (cur.y - prev_prev.y) * intensity;
        let cur_dx = (next.x - prev.x) * intensity;
        let cur_dy = (next.y - prev.y) * intensity;

        path.curve_to(
            mapper.data_to_canvas(prev.x + prev_dx, (prev.y + prev_dy) * progress_y),
            mapper.data_to_canvas(cur.x - cur_dx, (cur.y - cur_dy) * progress_y),
            mapper.data_to_canvas(cur.x, cur.y * progress_y),
        );
    }
    path
}
