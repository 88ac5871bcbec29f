use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::core::{
    ActiveRange, AxisDependency, BandFrame, CanvasPoint, ColorRule, CoordinateMapper, DataPoint,
    FillSide, Path, Rect, Series, Viewport, build_fill_polygon, build_path, build_spline_fill,
};
use crate::error::{ChartError, ChartResult};
use crate::render::{Canvas, StrokeStyle};

use super::{
    FillFormatter, FillRule, LineRenderConfig, LineRenderStrategy, ResolvedStyle,
    UncertainRangeStrategy,
};

/// Reveal-animation progress supplied by the host's animator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnimationProgress {
    pub x: f64,
    pub y: f64,
}

impl Default for AnimationProgress {
    fn default() -> Self {
        Self::COMPLETE
    }
}

impl AnimationProgress {
    pub const COMPLETE: Self = Self { x: 1.0, y: 1.0 };

    /// Clamps both phases into `[0, 1]`; non-finite phases count as complete.
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        let clamp = |v: f64| if v.is_finite() { v.clamp(0.0, 1.0) } else { 1.0 };
        Self {
            x: clamp(x),
            y: clamp(y),
        }
    }
}

/// Host-side frame state for one draw callback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartFrame {
    /// Drawable chart area in canvas space.
    pub content: Rect,
    pub left_mapper: CoordinateMapper,
    /// Mapper for right-axis series; falls back to the left mapper.
    pub right_mapper: Option<CoordinateMapper>,
    /// Visible data x-range.
    pub visible_x: (f64, f64),
    pub progress: AnimationProgress,
}

impl ChartFrame {
    #[must_use]
    pub fn new(content: Rect, mapper: CoordinateMapper, visible_x: (f64, f64)) -> Self {
        Self {
            content,
            left_mapper: mapper,
            right_mapper: None,
            visible_x,
            progress: AnimationProgress::COMPLETE,
        }
    }

    /// Frame whose mapper shows `[x_min, x_max] x [y_min, y_max]` inside `content`.
    pub fn for_ranges(
        content: Rect,
        x_range: (f64, f64),
        y_range: (f64, f64),
    ) -> ChartResult<Self> {
        let mapper =
            CoordinateMapper::from_ranges(x_range.0, x_range.1, y_range.0, y_range.1, content)?;
        Ok(Self::new(content, mapper, x_range))
    }

    /// Frame covering the whole host surface, for hosts without axis gutters.
    pub fn for_viewport(
        viewport: Viewport,
        x_range: (f64, f64),
        y_range: (f64, f64),
    ) -> ChartResult<Self> {
        if !viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }
        Self::for_ranges(viewport.full_rect(), x_range, y_range)
    }

    #[must_use]
    pub fn with_right_mapper(mut self, mapper: CoordinateMapper) -> Self {
        self.right_mapper = Some(mapper);
        self
    }

    #[must_use]
    pub fn with_progress(mut self, progress: AnimationProgress) -> Self {
        self.progress = progress;
        self
    }

    #[must_use]
    pub fn mapper_for(&self, axis: AxisDependency) -> CoordinateMapper {
        match axis {
            AxisDependency::Left => self.left_mapper,
            AxisDependency::Right => self.right_mapper.unwrap_or(self.left_mapper),
        }
    }
}

/// Everything a single series contributes to one draw call.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderRequest<'a> {
    pub series: &'a Series,
    pub colors: ColorRule,
    pub fills: FillRule,
    pub active_range: Option<ActiveRange>,
    pub highlight: Option<DataPoint>,
}

impl<'a> RenderRequest<'a> {
    #[must_use]
    pub fn new(series: &'a Series, colors: ColorRule, fills: FillRule) -> Self {
        Self {
            series,
            colors,
            fills,
            active_range: None,
            highlight: None,
        }
    }

    /// Resolves the formatter once for this draw call.
    #[must_use]
    pub fn from_formatter(series: &'a Series, formatter: &dyn FillFormatter) -> Self {
        let style = ResolvedStyle::resolve(formatter, series);
        Self::new(series, style.colors, style.fills)
    }

    #[must_use]
    pub fn with_active_range(mut self, active_range: ActiveRange) -> Self {
        self.active_range = Some(active_range);
        self
    }

    #[must_use]
    pub fn with_highlight(mut self, highlight: DataPoint) -> Self {
        self.highlight = Some(highlight);
        self
    }
}

/// Counters for one `render` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RenderStats {
    pub strokes_drawn: usize,
    pub fills_drawn: usize,
    pub rects_drawn: usize,
    /// Passes skipped for degenerate clips or empty geometry.
    pub passes_skipped: usize,
    /// Canvas calls that failed and were absorbed.
    pub canvas_failures: usize,
}

/// Geometry of the fill line, either per-side polygons or one spline region.
enum FillGeometry {
    Polygons { above: Path, below: Path },
    Spline { path: Path, baseline: f64 },
}

/// Turns a series into canvas calls: fills first, then banded strokes.
///
/// Rendering never fails. Missing data and degenerate geometry are skipped,
/// canvas failures are logged and counted in [`RenderStats`].
#[derive(Debug, Clone)]
pub struct RenderDispatcher<S = UncertainRangeStrategy> {
    config: LineRenderConfig,
    strategy: S,
}

impl RenderDispatcher<UncertainRangeStrategy> {
    /// Threshold bands over the full width, split into uncertain zones
    /// whenever a request carries an active range.
    pub fn with_threshold_bands(config: LineRenderConfig) -> ChartResult<Self> {
        Self::new(config, UncertainRangeStrategy)
    }
}

impl<S: LineRenderStrategy> RenderDispatcher<S> {
    pub fn new(config: LineRenderConfig, strategy: S) -> ChartResult<Self> {
        Ok(Self {
            config: config.validate()?,
            strategy,
        })
    }

    #[must_use]
    pub fn config(&self) -> LineRenderConfig {
        self.config
    }

    #[must_use]
    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    pub fn render<C: Canvas>(
        &self,
        frame: &ChartFrame,
        request: &RenderRequest<'_>,
        canvas: &mut C,
    ) -> RenderStats {
        let mut stats = RenderStats::default();
        let series = request.series;
        let mapper = frame.mapper_for(series.axis());
        let progress = frame.progress;

        let (Some(window), Some(y_range)) = (
            series.visible_window(frame.visible_x.0, frame.visible_x.1),
            series.y_range(),
        ) else {
            debug!(strategy = self.strategy.name(), "skip render: empty series");
            return stats;
        };
        let window = window.revealed(progress.x);
        if request.active_range.is_some() && !self.strategy.uses_active_range() {
            debug!(
                strategy = self.strategy.name(),
                "active range ignored by strategy"
            );
        }
        debug!(
            strategy = self.strategy.name(),
            series_len = series.len(),
            min_index = window.min_index,
            max_index = window.max_index,
            mode = ?self.config.mode,
            "render line series"
        );

        let band_frame = BandFrame::new(mapper, frame.content, y_range)
            .with_progress_y(progress.y)
            .with_edge_padding(self.config.band_edge_padding_px);

        self.draw_background(frame, mapper, canvas, &mut stats);

        let stroke = build_path(series, window, self.config.mode, progress.y, mapper);

        if self.config.draw_filled {
            let geometry = if self.config.mode.is_cubic() {
                FillGeometry::Spline {
                    path: build_spline_fill(&stroke, request.fills.fill_min, mapper),
                    baseline: mapper.y_to_canvas(request.fills.fill_min),
                }
            } else {
                let stepped = self.config.mode.is_stepped();
                let polygon = |side| {
                    let polygon = build_fill_polygon(
                        series,
                        window,
                        request.fills.fill_min,
                        side,
                        progress.y,
                        mapper,
                        stepped,
                    );
                    if polygon.has_area() {
                        polygon.to_path()
                    } else {
                        Path::new()
                    }
                };
                FillGeometry::Polygons {
                    above: polygon(FillSide::Above),
                    below: polygon(FillSide::Below),
                }
            };
            self.draw_fills(&band_frame, request, &geometry, canvas, &mut stats);
        }

        if stroke.is_empty() {
            debug!("skip strokes: empty path");
        } else {
            let passes = self.strategy.stroke_passes(
                &stroke,
                &band_frame,
                &request.colors,
                request.active_range,
            );
            for pass in passes {
                if pass.clip.is_degenerate() {
                    trace!(role = ?pass.role, "skip degenerate band");
                    stats.passes_skipped += 1;
                    continue;
                }
                trace!(role = ?pass.role, clip = ?pass.clip, "stroke band");
                let style = StrokeStyle::new(pass.color, self.config.line_width);
                match canvas.stroke_path(pass.path, style, Some(pass.clip)) {
                    Ok(()) => stats.strokes_drawn += 1,
                    Err(err) => record_failure(&mut stats, "stroke band", &err),
                }
            }
        }

        self.draw_highlight(frame, mapper, request.highlight, progress.y, canvas, &mut stats);
        stats
    }

    /// Renders several series in order (a combined chart), keyed by id.
    pub fn render_series_set<'a, C: Canvas>(
        &self,
        frame: &ChartFrame,
        requests: impl IntoIterator<Item = (&'a str, RenderRequest<'a>)>,
        canvas: &mut C,
    ) -> IndexMap<String, RenderStats> {
        let mut out = IndexMap::new();
        for (id, request) in requests {
            if out.contains_key(id) {
                warn!(series_id = id, "duplicate series id; later entry replaces stats");
            }
            let stats = self.render(frame, &request, canvas);
            out.insert(id.to_owned(), stats);
        }
        out
    }

    fn draw_background<C: Canvas>(
        &self,
        frame: &ChartFrame,
        mapper: CoordinateMapper,
        canvas: &mut C,
        stats: &mut RenderStats,
    ) {
        let Some(background) = self.config.background else {
            return;
        };
        let rect = Rect::from_edges(
            mapper.x_to_canvas(background.from_x),
            frame.content.top(),
            mapper.x_to_canvas(background.to_x),
            frame.content.bottom(),
        )
        .intersect(frame.content);
        if rect.is_degenerate() {
            stats.passes_skipped += 1;
            return;
        }
        match canvas.fill_rect(rect, background.color) {
            Ok(()) => stats.rects_drawn += 1,
            Err(err) => record_failure(stats, "background", &err),
        }
    }

    fn draw_fills<C: Canvas>(
        &self,
        band_frame: &BandFrame,
        request: &RenderRequest<'_>,
        geometry: &FillGeometry,
        canvas: &mut C,
        stats: &mut RenderStats,
    ) {
        let passes = self
            .strategy
            .fill_passes(band_frame, &request.fills, request.active_range);
        let content = band_frame.content;

        for pass in passes {
            let (path, side_clip) = match geometry {
                FillGeometry::Polygons { above, below } => match pass.side {
                    FillSide::Above => (above, None),
                    FillSide::Below => (below, None),
                },
                FillGeometry::Spline { path, baseline } => {
                    (path, Some(side_rows(content, *baseline, pass.side, band_frame)))
                }
            };
            let clip = match side_clip {
                Some(rows) => pass.clip.intersect(rows),
                None => pass.clip,
            };
            if path.is_empty() || clip.is_degenerate() {
                trace!(side = ?pass.side, "skip fill pass");
                stats.passes_skipped += 1;
                continue;
            }

            let resolved = pass.fill.resolve(content, band_frame.mapper);
            let alpha = self.config.fill_alpha;
            let drawn = clipped(canvas, clip, |canvas| canvas.fill_path(path, &resolved, alpha));
            match drawn {
                Ok(()) => stats.fills_drawn += 1,
                Err(err) => record_failure(stats, "fill", &err),
            }
        }
    }

    fn draw_highlight<C: Canvas>(
        &self,
        frame: &ChartFrame,
        mapper: CoordinateMapper,
        highlight: Option<DataPoint>,
        progress_y: f64,
        canvas: &mut C,
        stats: &mut RenderStats,
    ) {
        let (Some(style), Some(point)) = (self.config.highlight_indicator, highlight) else {
            return;
        };
        if !point.is_finite() {
            warn!(?point, "skip highlight: non-finite point");
            stats.passes_skipped += 1;
            return;
        }
        let at = mapper.data_to_canvas(point.x, point.y * progress_y);
        let content = frame.content;
        let mut lines = Path::new();
        if style.vertical {
            lines.move_to(CanvasPoint::new(at.x, content.top()));
            lines.line_to(CanvasPoint::new(at.x, content.bottom()));
        }
        if style.horizontal {
            lines.move_to(CanvasPoint::new(content.left(), at.y));
            lines.line_to(CanvasPoint::new(content.right(), at.y));
        }
        if lines.is_empty() {
            return;
        }
        let stroke = StrokeStyle::new(style.color, style.line_width);
        match canvas.stroke_path(&lines, stroke, Some(content)) {
            Ok(()) => stats.strokes_drawn += 1,
            Err(err) => record_failure(stats, "highlight", &err),
        }
    }
}

/// Rows of the content rect on one side of the fill line.
fn side_rows(content: Rect, baseline: f64, side: FillSide, band_frame: &BandFrame) -> Rect {
    let baseline = baseline.clamp(content.top(), content.bottom());
    // Larger data y maps upwards unless the mapper flips the axis.
    let up_is_above = band_frame.mapper.affine().d <= 0.0;
    let toward_top = matches!(side, FillSide::Above) == up_is_above;
    if toward_top {
        Rect::from_edges(content.left(), content.top(), content.right(), baseline)
    } else {
        Rect::from_edges(content.left(), baseline, content.right(), content.bottom())
    }
}

/// Runs `draw` inside save/clip/restore, restoring even when drawing fails.
fn clipped<C: Canvas>(
    canvas: &mut C,
    clip: Rect,
    draw: impl FnOnce(&mut C) -> ChartResult<()>,
) -> ChartResult<()> {
    canvas.save()?;
    let drawn = canvas.clip(clip).and_then(|()| draw(canvas));
    let restored = canvas.restore();
    drawn.and(restored)
}

fn record_failure(stats: &mut RenderStats, pass: &'static str, err: &ChartError) {
    warn!(pass, error = %err, "canvas call failed; pass skipped");
    stats.canvas_failures += 1;
}
