use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{CanvasPoint, CoordinateMapper, Rect};
use crate::error::{ChartError, ChartResult};

/// RGBA color in normalized 0..=1 channel values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Color {
    #[must_use]
    pub const fn rgba(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    #[must_use]
    pub const fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Self::rgba(red, green, blue, 1.0)
    }

    #[must_use]
    pub fn with_alpha(self, alpha: f64) -> Self {
        Self { alpha, ..self }
    }

    pub fn validate(self) -> ChartResult<()> {
        for (channel, value) in [
            ("red", self.red),
            ("green", self.green),
            ("blue", self.blue),
            ("alpha", self.alpha),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ChartError::InvalidData(format!(
                    "color channel `{channel}` must be finite and in [0, 1]"
                )));
            }
        }
        Ok(())
    }
}

/// Pen used for one stroke pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub color: Color,
    pub width: f64,
}

impl StrokeStyle {
    #[must_use]
    pub const fn new(color: Color, width: f64) -> Self {
        Self { color, width }
    }

    pub fn validate(self) -> ChartResult<()> {
        if !self.width.is_finite() || self.width <= 0.0 {
            return Err(ChartError::InvalidData(
                "stroke width must be finite and > 0".to_owned(),
            ));
        }
        self.color.validate()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    pub offset: f64,
    pub color: Color,
}

impl GradientStop {
    #[must_use]
    pub const fn new(offset: f64, color: Color) -> Self {
        Self { offset, color }
    }
}

pub type GradientStops = SmallVec<[GradientStop; 4]>;

/// Linear gradient laid across the content rect at `angle_deg`.
///
/// With `middle_y` set, the gradient is centred on that data y instead of
/// the content center, which keeps a two-color gradient split on the fill line.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearGradientFill {
    pub stops: GradientStops,
    pub angle_deg: f64,
    pub middle_y: Option<f64>,
}

impl LinearGradientFill {
    #[must_use]
    pub fn new(stops: impl IntoIterator<Item = GradientStop>, angle_deg: f64) -> Self {
        Self {
            stops: stops.into_iter().collect(),
            angle_deg,
            middle_y: None,
        }
    }

    #[must_use]
    pub fn centred_on(mut self, middle_y: f64) -> Self {
        self.middle_y = Some(middle_y);
        self
    }
}

/// Caller-facing description of how a fill polygon is painted.
#[derive(Debug, Clone, PartialEq)]
pub enum FillSpec {
    Solid(Color),
    LinearGradient(LinearGradientFill),
}

impl FillSpec {
    pub fn validate(&self) -> ChartResult<()> {
        match self {
            Self::Solid(color) => color.validate(),
            Self::LinearGradient(gradient) => {
                if gradient.stops.is_empty() {
                    return Err(ChartError::InvalidData(
                        "gradient needs at least one stop".to_owned(),
                    ));
                }
                if !gradient.angle_deg.is_finite() {
                    return Err(ChartError::InvalidData(
                        "gradient angle must be finite".to_owned(),
                    ));
                }
                for stop in &gradient.stops {
                    if !(0.0..=1.0).contains(&stop.offset) {
                        return Err(ChartError::InvalidData(
                            "gradient stop offset must be in [0, 1]".to_owned(),
                        ));
                    }
                    stop.color.validate()?;
                }
                Ok(())
            }
        }
    }

    /// Resolves the fill to canvas space for one draw call.
    #[must_use]
    pub fn resolve(&self, content: Rect, mapper: CoordinateMapper) -> ResolvedFill {
        match self {
            Self::Solid(color) => ResolvedFill::Solid(*color),
            Self::LinearGradient(gradient) => {
                let radians = (360.0 - gradient.angle_deg).to_radians();
                let center_y = gradient
                    .middle_y
                    .map_or(content.mid_y(), |y| mapper.y_to_canvas(y));
                let center = CanvasPoint::new(content.mid_x(), center_y);
                let dx = radians.cos() * content.width / 2.0;
                let dy = radians.sin() * content.height / 2.0;
                ResolvedFill::LinearGradient {
                    start: CanvasPoint::new(center.x - dx, center.y - dy),
                    end: CanvasPoint::new(center.x + dx, center.y + dy),
                    stops: gradient.stops.clone(),
                }
            }
        }
    }
}

/// Fill in canvas coordinates, ready for a backend.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedFill {
    Solid(Color),
    /// Extends past both ends (pad), matching the usual chart gradient look.
    LinearGradient {
        start: CanvasPoint,
        end: CanvasPoint,
        stops: GradientStops,
    },
}
