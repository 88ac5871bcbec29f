use crate::core::{ColorRule, Series};
use crate::core::band_splitter::{DEFAULT_ABOVE_COLOR, DEFAULT_BELOW_COLOR, DEFAULT_UNCERTAIN_COLOR};
use crate::error::{ChartError, ChartResult};
use crate::render::{Color, FillSpec};

/// Caller-supplied source of colors and fills for one series.
///
/// Every method is optional; unanswered questions fall back to defaults when
/// the formatter is resolved into a [`ResolvedStyle`] at the start of a draw.
pub trait FillFormatter {
    /// Data y of the fill line (`fillMin`).
    fn fill_line_position(&self, _series: &Series) -> f64 {
        0.0
    }

    /// Data y where the stroke switches from the below to the above color.
    /// `None` uses the series minimum.
    fn color_change_threshold(&self, _series: &Series) -> Option<f64> {
        None
    }

    fn above_color(&self) -> Option<Color> {
        None
    }

    fn below_color(&self) -> Option<Color> {
        None
    }

    fn uncertain_color(&self) -> Option<Color> {
        None
    }

    fn above_fill(&self) -> Option<FillSpec> {
        None
    }

    fn below_fill(&self) -> Option<FillSpec> {
        None
    }

    /// Fill below the fill line outside the active range.
    fn uncertain_fill(&self) -> Option<FillSpec> {
        None
    }

    /// Fill above the fill line outside the active range.
    /// `None` reuses [`FillFormatter::uncertain_fill`].
    fn uncertain_above_fill(&self) -> Option<FillSpec> {
        None
    }
}

/// Formatter that answers nothing, yielding green / red / gray defaults.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultFillFormatter;

impl FillFormatter for DefaultFillFormatter {}

/// Formatter backed by plain values, for hosts that configure colors up front.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaticFillFormatter {
    pub fill_line_position: f64,
    pub color_change_threshold: Option<f64>,
    pub above_color: Option<Color>,
    pub below_color: Option<Color>,
    pub uncertain_color: Option<Color>,
    pub above_fill: Option<FillSpec>,
    pub below_fill: Option<FillSpec>,
    pub uncertain_fill: Option<FillSpec>,
    pub uncertain_above_fill: Option<FillSpec>,
}

impl StaticFillFormatter {
    #[must_use]
    pub fn new(fill_line_position: f64) -> Self {
        Self {
            fill_line_position,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_threshold(mut self, threshold_y: f64) -> Self {
        self.color_change_threshold = Some(threshold_y);
        self
    }

    #[must_use]
    pub fn with_colors(mut self, above: Color, below: Color, uncertain: Color) -> Self {
        self.above_color = Some(above);
        self.below_color = Some(below);
        self.uncertain_color = Some(uncertain);
        self
    }

    #[must_use]
    pub fn with_fills(mut self, above: FillSpec, below: FillSpec, uncertain: FillSpec) -> Self {
        self.above_fill = Some(above);
        self.below_fill = Some(below);
        self.uncertain_fill = Some(uncertain);
        self
    }

    #[must_use]
    pub fn with_uncertain_above_fill(mut self, fill: FillSpec) -> Self {
        self.uncertain_above_fill = Some(fill);
        self
    }
}

impl FillFormatter for StaticFillFormatter {
    fn fill_line_position(&self, _series: &Series) -> f64 {
        self.fill_line_position
    }

    fn color_change_threshold(&self, _series: &Series) -> Option<f64> {
        self.color_change_threshold
    }

    fn above_color(&self) -> Option<Color> {
        self.above_color
    }

    fn below_color(&self) -> Option<Color> {
        self.below_color
    }

    fn uncertain_color(&self) -> Option<Color> {
        self.uncertain_color
    }

    fn above_fill(&self) -> Option<FillSpec> {
        self.above_fill.clone()
    }

    fn below_fill(&self) -> Option<FillSpec> {
        self.below_fill.clone()
    }

    fn uncertain_fill(&self) -> Option<FillSpec> {
        self.uncertain_fill.clone()
    }

    fn uncertain_above_fill(&self) -> Option<FillSpec> {
        self.uncertain_above_fill.clone()
    }
}

/// Fill paints for one draw call.
#[derive(Debug, Clone, PartialEq)]
pub struct FillRule {
    pub fill_min: f64,
    pub above: FillSpec,
    pub below: FillSpec,
    pub uncertain: FillSpec,
    pub uncertain_above: FillSpec,
}

impl FillRule {
    /// Solid fills matching the stroke colors of `rule`.
    #[must_use]
    pub fn solid(fill_min: f64, rule: &ColorRule) -> Self {
        Self {
            fill_min,
            above: FillSpec::Solid(rule.above),
            below: FillSpec::Solid(rule.below),
            uncertain: FillSpec::Solid(rule.uncertain),
            uncertain_above: FillSpec::Solid(rule.uncertain),
        }
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.fill_min.is_finite() {
            return Err(ChartError::InvalidData(
                "fill line position must be finite".to_owned(),
            ));
        }
        self.above.validate()?;
        self.below.validate()?;
        self.uncertain.validate()?;
        self.uncertain_above.validate()
    }
}

/// Colors and fills resolved once per draw call.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedStyle {
    pub colors: ColorRule,
    pub fills: FillRule,
}

impl ResolvedStyle {
    #[must_use]
    pub fn resolve(formatter: &dyn FillFormatter, series: &Series) -> Self {
        let default_rule = ColorRule::for_series(series);
        let colors = ColorRule {
            threshold_y: formatter
                .color_change_threshold(series)
                .unwrap_or(default_rule.threshold_y),
            above: formatter.above_color().unwrap_or(DEFAULT_ABOVE_COLOR),
            below: formatter.below_color().unwrap_or(DEFAULT_BELOW_COLOR),
            uncertain: formatter.uncertain_color().unwrap_or(DEFAULT_UNCERTAIN_COLOR),
        };
        let solid = FillRule::solid(formatter.fill_line_position(series), &colors);
        let uncertain = formatter.uncertain_fill().unwrap_or(solid.uncertain);
        let fills = FillRule {
            above: formatter.above_fill().unwrap_or(solid.above),
            below: formatter.below_fill().unwrap_or(solid.below),
            uncertain_above: formatter
                .uncertain_above_fill()
                .unwrap_or_else(|| uncertain.clone()),
            uncertain,
            fill_min: solid.fill_min,
        };
        Self { colors, fills }
    }
}
