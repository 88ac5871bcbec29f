use serde::{Deserialize, Serialize};

use crate::core::{CanvasPoint, CoordinateMapper, DataPoint, Path, Series, VisibleWindow};

/// Which side of the fill line a polygon covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FillSide {
    Above,
    Below,
}

impl FillSide {
    /// Strictly on this side of `fill_min`.
    #[must_use]
    pub fn holds(self, y: f64, fill_min: f64) -> bool {
        match self {
            Self::Above => y > fill_min,
            Self::Below => y < fill_min,
        }
    }

    /// `y` when it is on this side, otherwise the fill line.
    #[must_use]
    pub fn clamp(self, y: f64, fill_min: f64) -> f64 {
        if self.holds(y, fill_min) { y } else { fill_min }
    }
}

/// Closed fill polygon in canvas space.
///
/// `vertices` explicitly repeats the first vertex at the end, so consumers
/// never need an implicit closing rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FillPolygon {
    pub side: FillSide,
    pub vertices: Vec<CanvasPoint>,
}

impl FillPolygon {
    #[must_use]
    pub fn empty(side: FillSide) -> Self {
        Self {
            side,
            vertices: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        match (self.vertices.first(), self.vertices.last()) {
            (Some(first), Some(last)) => first == last,
            _ => false,
        }
    }

    /// Absolute shoelace area of the closed ring.
    ///
    /// Coordinates are taken relative to the first vertex, so a ring lying
    /// entirely on one canvas row sums to exactly zero.
    #[must_use]
    pub fn area(&self) -> f64 {
        let Some(&origin) = self.vertices.first() else {
            return 0.0;
        };
        let twice: f64 = self
            .vertices
            .windows(2)
            .map(|pair| {
                let (ax, ay) = (pair[0].x - origin.x, pair[0].y - origin.y);
                let (bx, by) = (pair[1].x - origin.x, pair[1].y - origin.y);
                ax * by - bx * ay
            })
            .sum();
        (twice * 0.5).abs()
    }

    /// Closed ring with three distinct corners enclosing a non-zero area.
    /// Rings collapsed onto the fill line fill nothing.
    #[must_use]
    pub fn has_area(&self) -> bool {
        self.vertices.len() >= 4 && self.area() > f64::EPSILON
    }

    #[must_use]
    pub fn to_path(&self) -> Path {
        let mut path = Path::with_capacity(self.vertices.len() + 1);
        let mut vertices = self.vertices.iter().copied();
        let Some(first) = vertices.next() else {
            return path;
        };
        path.move_to(first);
        let remaining = self.vertices.len().saturating_sub(2);
        // The trailing copy of the first vertex is expressed by `Close`.
        for vertex in vertices.take(remaining) {
            path.line_to(vertex);
        }
        path.close();
        path
    }
}

/// X where segment `a -> b` crosses `y = level`, when the endpoints lie
/// strictly on opposite sides of it.
///
/// Strict straddling implies `a.y != b.y`, so the division is always defined;
/// flat or touching segments return `None` and are handled by clamping.
#[must_use]
pub fn crossing_x(a: DataPoint, b: DataPoint, level: f64) -> Option<f64> {
    if (a.y - level) * (b.y - level) >= 0.0 {
        return None;
    }
    let x = a.x + (level - a.y) * (b.x - a.x) / (b.y - a.y);
    x.is_finite().then_some(x)
}

struct PolygonSink {
    mapper: CoordinateMapper,
    vertices: Vec<CanvasPoint>,
}

impl PolygonSink {
    fn new(mapper: CoordinateMapper, capacity: usize) -> Self {
        Self {
            mapper,
            vertices: Vec::with_capacity(capacity),
        }
    }

    fn push(&mut self, x: f64, y: f64) {
        let point = self.mapper.data_to_canvas(x, y);
        if self.vertices.last() != Some(&point) {
            self.vertices.push(point);
        }
    }

    fn finish(mut self, side: FillSide) -> FillPolygon {
        if let Some(&first) = self.vertices.first() {
            if self.vertices.last() != Some(&first) {
                self.vertices.push(first);
            }
        }
        FillPolygon {
            side,
            vertices: self.vertices,
        }
    }
}

/// Builds the polygon between the series and `fill_min` on one side.
///
/// Entries on the other side are clamped onto the fill line and every
/// segment that strictly straddles the line contributes one interpolated
/// crossing. In stepped mode crossings fall on the vertical risers, so
/// clamping alone is exact and no interpolation happens. Each y is scaled
/// by `progress_y` first.
#[must_use]
pub fn build_fill_polygon(
    series: &Series,
    window: VisibleWindow,
    fill_min: f64,
    side: FillSide,
    progress_y: f64,
    mapper: CoordinateMapper,
    stepped: bool,
) -> FillPolygon {
    let Some(window) = window.clamped_to(series) else {
        return FillPolygon::empty(side);
    };
    let points: Vec<DataPoint> = series
        .window_points(window)
        .map(|point| DataPoint::new(point.x, point.y * progress_y))
        .collect();

    let (Some(&first), Some(&last)) = (points.first(), points.last()) else {
        return FillPolygon::empty(side);
    };

    let mut sink = PolygonSink::new(mapper, points.len() * 2 + 3);
    if points.len() == 1 {
        sink.push(first.x, fill_min);
        return sink.finish(side);
    }

    sink.push(first.x, fill_min);
    for (index, entry) in points.iter().enumerate() {
        if stepped {
            if let Some(prev) = index.checked_sub(1).map(|i| points[i]) {
                sink.push(entry.x, side.clamp(prev.y, fill_min));
            }
            sink.push(entry.x, side.clamp(entry.y, fill_min));
            continue;
        }

        sink.push(entry.x, side.clamp(entry.y, fill_min));
        if let Some(&next) = points.get(index + 1) {
            if let Some(x) = crossing_x(*entry, next, fill_min) {
                sink.push(x, fill_min);
            }
        }
    }
    sink.push(last.x, fill_min);
    sink.finish(side)
}

/// Closes a (cubic) stroke path down to the fill line.
///
/// The result covers both sides of `fill_min`; callers separate them by
/// clipping to the rows above or below the fill line.
#[must_use]
pub fn build_spline_fill(stroke: &Path, fill_min: f64, mapper: CoordinateMapper) -> Path {
    let (Some(first), Some(last)) = (stroke.first_point(), stroke.last_point()) else {
        return Path::new();
    };
    let baseline = mapper.y_to_canvas(fill_min);
    let mut fill = stroke.clone();
    fill.line_to(CanvasPoint::new(last.x, baseline));
    fill.line_to(CanvasPoint::new(first.x, baseline));
    fill.close();
    fill
}
