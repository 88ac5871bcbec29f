mod primitives;
mod recording_canvas;

pub use primitives::{
    Color, FillSpec, GradientStop, GradientStops, LinearGradientFill, ResolvedFill, StrokeStyle,
};
pub use recording_canvas::{DrawCommand, RecordingCanvas};

use crate::core::{Path, Rect};
use crate::error::ChartResult;

/// Drawing capability consumed by the render dispatcher.
///
/// Clips intersect with the current clip and last until the matching
/// `restore`. Backends report failures through `ChartResult`; the dispatcher
/// logs and absorbs them so one bad frame never reaches the host.
pub trait Canvas {
    fn save(&mut self) -> ChartResult<()>;

    fn restore(&mut self) -> ChartResult<()>;

    fn clip(&mut self, rect: Rect) -> ChartResult<()>;

    /// Strokes `path`, additionally clipped to `clip` for this call only.
    fn stroke_path(&mut self, path: &Path, stroke: StrokeStyle, clip: Option<Rect>)
    -> ChartResult<()>;

    fn fill_path(&mut self, path: &Path, fill: &ResolvedFill, alpha: f64) -> ChartResult<()>;

    fn fill_rect(&mut self, rect: Rect, color: Color) -> ChartResult<()>;
}

#[cfg(feature = "cairo-backend")]
mod cairo_backend;
#[cfg(feature = "cairo-backend")]
pub use cairo_backend::{CairoCanvas, CairoCanvasStats};
