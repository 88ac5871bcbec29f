use serde::{Deserialize, Serialize};

use crate::core::LineMode;
use crate::error::{ChartError, ChartResult};
use crate::render::Color;

/// Shaded vertical strip behind the series, spanning the content height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BackgroundFill {
    pub from_x: f64,
    pub to_x: f64,
    pub color: Color,
}

/// Guide lines drawn through a highlighted entry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HighlightIndicatorStyle {
    #[serde(default = "default_true")]
    pub vertical: bool,
    #[serde(default = "default_true")]
    pub horizontal: bool,
    pub color: Color,
    #[serde(default = "default_highlight_line_width")]
    pub line_width: f64,
}

impl HighlightIndicatorStyle {
    #[must_use]
    pub fn new(color: Color) -> Self {
        Self {
            vertical: true,
            horizontal: true,
            color,
            line_width: default_highlight_line_width(),
        }
    }
}

/// Per-series render configuration.
///
/// Serializable so hosts can persist chart setup; see
/// [`LineRenderConfig::to_json_contract_v1_pretty`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LineRenderConfig {
    #[serde(default)]
    pub mode: LineMode,
    #[serde(default = "default_line_width")]
    pub line_width: f64,
    #[serde(default)]
    pub draw_filled: bool,
    #[serde(default = "default_fill_alpha")]
    pub fill_alpha: f64,
    #[serde(default)]
    pub band_edge_padding_px: f64,
    #[serde(default)]
    pub background: Option<BackgroundFill>,
    #[serde(default)]
    pub highlight_indicator: Option<HighlightIndicatorStyle>,
}

impl Default for LineRenderConfig {
    fn default() -> Self {
        Self {
            mode: LineMode::default(),
            line_width: default_line_width(),
            draw_filled: false,
            fill_alpha: default_fill_alpha(),
            band_edge_padding_px: 0.0,
            background: None,
            highlight_indicator: None,
        }
    }
}

impl LineRenderConfig {
    #[must_use]
    pub fn new(mode: LineMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_line_width(mut self, line_width: f64) -> Self {
        self.line_width = line_width;
        self
    }

    #[must_use]
    pub fn with_fill(mut self, fill_alpha: f64) -> Self {
        self.draw_filled = true;
        self.fill_alpha = fill_alpha;
        self
    }

    #[must_use]
    pub fn with_band_edge_padding(mut self, padding_px: f64) -> Self {
        self.band_edge_padding_px = padding_px;
        self
    }

    #[must_use]
    pub fn with_background(mut self, background: BackgroundFill) -> Self {
        self.background = Some(background);
        self
    }

    #[must_use]
    pub fn with_highlight_indicator(mut self, style: HighlightIndicatorStyle) -> Self {
        self.highlight_indicator = Some(style);
        self
    }

    pub fn validate(self) -> ChartResult<Self> {
        self.mode.validate()?;
        if !self.line_width.is_finite() || self.line_width <= 0.0 {
            return Err(ChartError::InvalidData(
                "line width must be finite and > 0".to_owned(),
            ));
        }
        if !self.fill_alpha.is_finite() || !(0.0..=1.0).contains(&self.fill_alpha) {
            return Err(ChartError::InvalidData(
                "fill alpha must be finite and in [0, 1]".to_owned(),
            ));
        }
        if !self.band_edge_padding_px.is_finite() || self.band_edge_padding_px < 0.0 {
            return Err(ChartError::InvalidData(
                "band edge padding must be finite and >= 0".to_owned(),
            ));
        }
        if let Some(background) = self.background {
            if !background.from_x.is_finite() || !background.to_x.is_finite() {
                return Err(ChartError::InvalidData(
                    "background range must be finite".to_owned(),
                ));
            }
            background.color.validate()?;
        }
        if let Some(style) = self.highlight_indicator {
            if !style.line_width.is_finite() || style.line_width <= 0.0 {
                return Err(ChartError::InvalidData(
                    "highlight line width must be finite and > 0".to_owned(),
                ));
            }
            style.color.validate()?;
        }
        Ok(self)
    }
}

fn default_true() -> bool {
    true
}

fn default_line_width() -> f64 {
    1.0
}

fn default_highlight_line_width() -> f64 {
    0.5
}

fn default_fill_alpha() -> f64 {
    0.33
}
