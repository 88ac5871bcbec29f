#[cfg(feature = "parallel-projection")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::core::{CanvasPoint, DataPoint, Rect};
use crate::error::{ChartError, ChartResult};

/// Windows at least this long are mapped with rayon when `parallel-projection` is on.
#[cfg(feature = "parallel-projection")]
const PARALLEL_MAPPING_MIN_POINTS: usize = 4_096;

/// 2D affine transform `(x, y) -> (a·x + c·y + tx, b·x + d·y + ty)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AffineTransform {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub tx: f64,
    pub ty: f64,
}

impl AffineTransform {
    pub const IDENTITY: Self = Self {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        tx: 0.0,
        ty: 0.0,
    };

    #[must_use]
    pub fn apply(self, x: f64, y: f64) -> (f64, f64) {
        (
            self.a * x + self.c * y + self.tx,
            self.b * x + self.d * y + self.ty,
        )
    }

    #[must_use]
    pub fn determinant(self) -> f64 {
        self.a * self.d - self.b * self.c
    }

    fn validate(self) -> ChartResult<()> {
        let finite = [self.a, self.b, self.c, self.d, self.tx, self.ty]
            .iter()
            .all(|v| v.is_finite());
        if !finite {
            return Err(ChartError::InvalidData(
                "affine transform entries must be finite".to_owned(),
            ));
        }
        let det = self.determinant();
        if det == 0.0 || !det.is_finite() {
            return Err(ChartError::InvalidData(
                "affine transform must be invertible".to_owned(),
            ));
        }
        Ok(())
    }
}

/// Data-space to canvas-space mapping.
///
/// Stateless apart from its matrix: the same input always maps to the same
/// pixel, which keeps band clips and paths of one draw call aligned.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoordinateMapper {
    transform: AffineTransform,
}

impl CoordinateMapper {
    pub fn from_affine(transform: AffineTransform) -> ChartResult<Self> {
        transform.validate()?;
        Ok(Self { transform })
    }

    #[must_use]
    pub fn identity() -> Self {
        Self {
            transform: AffineTransform::IDENTITY,
        }
    }

    /// Maps `[x_min, x_max] x [y_min, y_max]` onto `content` with y pointing down,
    /// so `y_max` lands on the content top edge.
    pub fn from_ranges(
        x_min: f64,
        x_max: f64,
        y_min: f64,
        y_max: f64,
        content: Rect,
    ) -> ChartResult<Self> {
        for (name, start, end) in [("x", x_min, x_max), ("y", y_min, y_max)] {
            if !start.is_finite() || !end.is_finite() || start == end {
                return Err(ChartError::InvalidData(format!(
                    "{name} domain must be finite and non-zero"
                )));
            }
        }
        content.validate()?;
        if content.is_degenerate() {
            return Err(ChartError::InvalidData(
                "content rect must have a positive area".to_owned(),
            ));
        }

        let sx = content.width / (x_max - x_min);
        let sy = content.height / (y_max - y_min);
        Self::from_affine(AffineTransform {
            a: sx,
            b: 0.0,
            c: 0.0,
            d: -sy,
            tx: content.left() - x_min * sx,
            ty: content.bottom() + y_min * sy,
        })
    }

    #[must_use]
    pub fn affine(self) -> AffineTransform {
        self.transform
    }

    #[must_use]
    pub fn data_to_canvas(self, x: f64, y: f64) -> CanvasPoint {
        let (px, py) = self.transform.apply(x, y);
        CanvasPoint::new(px, py)
    }

    #[must_use]
    pub fn point_to_canvas(self, point: DataPoint) -> CanvasPoint {
        self.data_to_canvas(point.x, point.y)
    }

    /// Canvas x of a data x (y-independent for axis-aligned transforms).
    #[must_use]
    pub fn x_to_canvas(self, x: f64) -> f64 {
        self.data_to_canvas(x, 0.0).x
    }

    /// Canvas y of a data y (x-independent for axis-aligned transforms).
    #[must_use]
    pub fn y_to_canvas(self, y: f64) -> f64 {
        self.data_to_canvas(0.0, y).y
    }

    /// Inverse mapping.
    #[must_use]
    pub fn canvas_to_data(self, px: f64, py: f64) -> DataPoint {
        let t = self.transform;
        let det = t.determinant();
        let dx = px - t.tx;
        let dy = py - t.ty;
        DataPoint::new((t.d * dx - t.c * dy) / det, (t.a * dy - t.b * dx) / det)
    }

    /// Maps points with y scaled by `progress_y` before transforming.
    #[must_use]
    pub fn map_points(self, points: &[DataPoint], progress_y: f64) -> Vec<CanvasPoint> {
        #[cfg(feature = "parallel-projection")]
        {
            if points.len() >= PARALLEL_MAPPING_MIN_POINTS {
                return points
                    .par_iter()
                    .map(|point| self.data_to_canvas(point.x, point.y * progress_y))
                    .collect();
            }
        }

        points
            .iter()
            .map(|point| self.data_to_canvas(point.x, point.y * progress_y))
            .collect()
    }
}
