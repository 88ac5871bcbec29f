use approx::assert_relative_eq;
use chart_bands::api::{
    AnimationProgress, BackgroundFill, ChartFrame, DefaultFillFormatter, HighlightIndicatorStyle,
    LineRenderConfig, LineRenderStrategy, PlainLineStrategy, RenderDispatcher, RenderRequest, RenderStats,
    ResolvedStyle, StaticFillFormatter, ThresholdBandStrategy, UncertainRangeStrategy,
};
use chart_bands::core::{
    ActiveRange, AxisDependency, CanvasPoint, CoordinateMapper, DataPoint, LineMode, Path,
    PathCommand, Rect, Series, Viewport,
};
use chart_bands::render::{
    Canvas, Color, DrawCommand, FillSpec, GradientStop, LinearGradientFill, RecordingCanvas,
    ResolvedFill, StrokeStyle,
};
use chart_bands::{ChartError, ChartResult};

fn series(points: &[(f64, f64)]) -> Series {
    Series::new(points.iter().map(|&(x, y)| DataPoint::new(x, y)).collect()).expect("series")
}

fn peak_series() -> Series {
    series(&[(0.0, 2.0), (1.0, 8.0), (2.0, 3.0)])
}

fn content() -> Rect {
    Rect::new(0.0, 0.0, 200.0, 60.0).expect("content")
}

fn frame() -> ChartFrame {
    ChartFrame::for_ranges(content(), (0.0, 2.0), (2.0, 8.0)).expect("frame")
}

fn formatter() -> StaticFillFormatter {
    StaticFillFormatter::new(5.0).with_threshold(5.0)
}

fn clip_of(command: &DrawCommand) -> Option<Rect> {
    match command {
        DrawCommand::Stroke { clip, .. } => *clip,
        DrawCommand::Fill { effective_clip, .. } => *effective_clip,
        _ => None,
    }
}

#[test]
fn threshold_line_draws_two_clipped_strokes_of_one_path() {
    let s = peak_series();
    let dispatcher = RenderDispatcher::with_threshold_bands(LineRenderConfig::default()).expect("dispatcher");
    let request = RenderRequest::from_formatter(&s, &formatter());
    let mut canvas = RecordingCanvas::new();

    let stats = dispatcher.render(&frame(), &request, &mut canvas);
    assert_eq!(stats.strokes_drawn, 2);
    assert_eq!(stats.fills_drawn, 0);
    assert_eq!(stats.canvas_failures, 0);

    let strokes: Vec<&DrawCommand> = canvas.strokes().collect();
    assert_eq!(strokes.len(), 2);
    let paths: Vec<&Path> = strokes
        .iter()
        .filter_map(|command| match command {
            DrawCommand::Stroke { path, .. } => Some(path),
            _ => None,
        })
        .collect();
    assert_eq!(paths[0], paths[1]);
    assert_eq!(paths[0].vertices().count(), 3);

    let above = clip_of(strokes[0]).expect("above clip");
    let below = clip_of(strokes[1]).expect("below clip");
    assert_relative_eq!(above.bottom(), 30.0, epsilon = 1e-9);
    assert_relative_eq!(below.top(), 30.0, epsilon = 1e-9);
    assert_relative_eq!(below.bottom(), 60.0, epsilon = 1e-9);
}

#[test]
fn fills_are_drawn_before_strokes_inside_save_restore() {
    let s = peak_series();
    let config = LineRenderConfig::default().with_fill(0.33);
    let dispatcher = RenderDispatcher::with_threshold_bands(config).expect("dispatcher");
    let request = RenderRequest::from_formatter(&s, &formatter());
    let mut canvas = RecordingCanvas::new();

    let stats = dispatcher.render(&frame(), &request, &mut canvas);
    assert_eq!(stats.fills_drawn, 2);
    assert_eq!(stats.strokes_drawn, 2);
    assert_eq!(canvas.save_depth(), 0);

    let kinds: Vec<&'static str> = canvas
        .commands()
        .iter()
        .map(|command| match command {
            DrawCommand::Save => "save",
            DrawCommand::Restore => "restore",
            DrawCommand::Clip(_) => "clip",
            DrawCommand::Stroke { .. } => "stroke",
            DrawCommand::Fill { .. } => "fill",
            DrawCommand::FillRect { .. } => "rect",
        })
        .collect();
    assert_eq!(
        kinds,
        vec![
            "save", "clip", "fill", "restore", "save", "clip", "fill", "restore", "stroke",
            "stroke"
        ]
    );

    let Some(DrawCommand::Fill { fill, alpha, .. }) = canvas.fills().next() else {
        panic!("expected a fill");
    };
    assert_relative_eq!(*alpha, 0.33);
    assert_eq!(*fill, ResolvedFill::Solid(Color::rgb(0.0, 1.0, 0.0)));
}

#[test]
fn degenerate_band_is_skipped() {
    let s = peak_series();
    let dispatcher = RenderDispatcher::with_threshold_bands(LineRenderConfig::default()).expect("dispatcher");
    // Default threshold is the series minimum, so the below band has no height.
    let request = RenderRequest::from_formatter(&s, &DefaultFillFormatter);
    let mut canvas = RecordingCanvas::new();

    let stats = dispatcher.render(&frame(), &request, &mut canvas);
    assert_eq!(stats.strokes_drawn, 1);
    assert_eq!(stats.passes_skipped, 1);
}

#[test]
fn fill_collapsed_onto_the_fill_line_is_skipped() {
    let s = series(&[(0.0, 9.0), (1.0, 9.0), (2.0, 9.0)]);
    let frame = ChartFrame::for_ranges(content(), (0.0, 2.0), (0.0, 10.0)).expect("frame");
    let config = LineRenderConfig::default().with_fill(0.5);
    let dispatcher = RenderDispatcher::with_threshold_bands(config).expect("dispatcher");
    let request = RenderRequest::from_formatter(&s, &formatter());
    let mut canvas = RecordingCanvas::new();

    let stats = dispatcher.render(&frame, &request, &mut canvas);
    assert_eq!(stats.fills_drawn, 1);
    assert_eq!(canvas.fills().count(), 1);
    assert_eq!(canvas.save_depth(), 0);
}

#[test]
fn active_range_draws_uncertain_zones_and_six_fill_passes() {
    let s = peak_series();
    let config = LineRenderConfig::default().with_fill(0.5);
    let dispatcher = RenderDispatcher::new(config, UncertainRangeStrategy).expect("dispatcher");
    let request = RenderRequest::from_formatter(&s, &formatter())
        .with_active_range(ActiveRange::new(0.5, 1.5).expect("range"));
    let mut canvas = RecordingCanvas::new();

    let stats = dispatcher.render(&frame(), &request, &mut canvas);
    assert_eq!(stats.strokes_drawn, 4);
    assert_eq!(stats.fills_drawn, 6);
    assert_eq!(stats.passes_skipped, 0);

    let gray = Color::rgb(0.5, 0.5, 0.5);
    let colors: Vec<Color> = canvas
        .strokes()
        .filter_map(|command| match command {
            DrawCommand::Stroke { stroke, .. } => Some(stroke.color),
            _ => None,
        })
        .collect();
    assert_eq!(colors[0], gray);
    assert_eq!(colors[3], gray);

    let clips: Vec<Rect> = canvas.strokes().filter_map(clip_of).collect();
    assert_relative_eq!(clips[0].right(), 50.0, epsilon = 1e-9);
    assert_relative_eq!(clips[1].left(), 50.0, epsilon = 1e-9);
    assert_relative_eq!(clips[1].right(), 150.0, epsilon = 1e-9);
    assert_relative_eq!(clips[3].left(), 150.0, epsilon = 1e-9);
}

#[test]
fn default_dispatcher_honors_the_active_range() {
    let s = peak_series();
    let dispatcher = RenderDispatcher::with_threshold_bands(LineRenderConfig::default()).expect("dispatcher");
    assert!(dispatcher.strategy().uses_active_range());
    let request = RenderRequest::from_formatter(&s, &formatter())
        .with_active_range(ActiveRange::new(0.5, 1.5).expect("range"));
    let mut canvas = RecordingCanvas::new();

    let stats = dispatcher.render(&frame(), &request, &mut canvas);
    assert_eq!(stats.strokes_drawn, 4);
    let gray = Color::rgb(0.5, 0.5, 0.5);
    let first = canvas.strokes().next();
    assert!(matches!(first, Some(DrawCommand::Stroke { stroke, .. }) if stroke.color == gray));
}

#[test]
fn threshold_strategy_reports_that_it_drops_the_active_range() {
    let s = peak_series();
    let dispatcher =
        RenderDispatcher::new(LineRenderConfig::default(), ThresholdBandStrategy).expect("dispatcher");
    assert!(!dispatcher.strategy().uses_active_range());
    let request = RenderRequest::from_formatter(&s, &formatter())
        .with_active_range(ActiveRange::new(0.5, 1.5).expect("range"));
    let mut canvas = RecordingCanvas::new();

    let stats = dispatcher.render(&frame(), &request, &mut canvas);
    assert_eq!(stats.strokes_drawn, 2);
}

#[test]
fn uncertain_zones_paint_above_and_below_with_their_own_fills() {
    let s = peak_series();
    let solid = |r, g, b| FillSpec::Solid(Color::rgb(r, g, b));
    let formatter = formatter()
        .with_fills(solid(0.0, 1.0, 0.0), solid(1.0, 0.0, 0.0), solid(0.5, 0.5, 0.5))
        .with_uncertain_above_fill(solid(0.0, 0.0, 1.0));
    let config = LineRenderConfig::default().with_fill(0.5);
    let dispatcher = RenderDispatcher::new(config, UncertainRangeStrategy).expect("dispatcher");
    let request = RenderRequest::from_formatter(&s, &formatter)
        .with_active_range(ActiveRange::new(0.5, 1.5).expect("range"));
    let mut canvas = RecordingCanvas::new();

    let stats = dispatcher.render(&frame(), &request, &mut canvas);
    assert_eq!(stats.fills_drawn, 6);
    let fills: Vec<ResolvedFill> = canvas
        .fills()
        .filter_map(|command| match command {
            DrawCommand::Fill { fill, .. } => Some(fill.clone()),
            _ => None,
        })
        .collect();
    let blue = ResolvedFill::Solid(Color::rgb(0.0, 0.0, 1.0));
    let gray = ResolvedFill::Solid(Color::rgb(0.5, 0.5, 0.5));
    let green = ResolvedFill::Solid(Color::rgb(0.0, 1.0, 0.0));
    let red = ResolvedFill::Solid(Color::rgb(1.0, 0.0, 0.0));
    assert_eq!(fills, vec![blue.clone(), gray.clone(), green, red, blue, gray]);
}

#[test]
fn uncertain_above_fill_falls_back_to_the_uncertain_fill() {
    let s = peak_series();
    let uncertain = FillSpec::Solid(Color::rgb(0.2, 0.2, 0.2));
    let formatter = formatter().with_fills(
        FillSpec::Solid(Color::rgb(0.0, 1.0, 0.0)),
        FillSpec::Solid(Color::rgb(1.0, 0.0, 0.0)),
        uncertain.clone(),
    );
    let style = ResolvedStyle::resolve(&formatter, &s);
    assert_eq!(style.fills.uncertain, uncertain);
    assert_eq!(style.fills.uncertain_above, uncertain);

    let defaults = ResolvedStyle::resolve(&DefaultFillFormatter, &s);
    assert_eq!(defaults.fills.uncertain_above, defaults.fills.uncertain);
}

#[test]
fn plain_strategy_draws_a_single_stroke() {
    let s = peak_series();
    let dispatcher = RenderDispatcher::new(LineRenderConfig::default(), PlainLineStrategy).expect("dispatcher");
    let request = RenderRequest::from_formatter(&s, &formatter());
    let mut canvas = RecordingCanvas::new();

    let stats = dispatcher.render(&frame(), &request, &mut canvas);
    assert_eq!(stats.strokes_drawn, 1);
    assert_eq!(dispatcher.strategy().name(), "plain");
}

#[test]
fn cubic_fill_is_clipped_to_each_side_of_the_fill_line() {
    let s = peak_series();
    let config = LineRenderConfig::new(LineMode::CubicHorizontal).with_fill(0.33);
    let dispatcher = RenderDispatcher::with_threshold_bands(config).expect("dispatcher");
    let request = RenderRequest::from_formatter(&s, &formatter());
    let mut canvas = RecordingCanvas::new();

    let stats = dispatcher.render(&frame(), &request, &mut canvas);
    assert_eq!(stats.fills_drawn, 2);

    let clips: Vec<Rect> = canvas.fills().filter_map(clip_of).collect();
    assert_relative_eq!(clips[0].top(), 0.0, epsilon = 1e-9);
    assert_relative_eq!(clips[0].bottom(), 30.0, epsilon = 1e-9);
    assert_relative_eq!(clips[1].top(), 30.0, epsilon = 1e-9);
    assert_relative_eq!(clips[1].bottom(), 60.0, epsilon = 1e-9);

    let Some(DrawCommand::Fill { path, .. }) = canvas.fills().next() else {
        panic!("expected a fill");
    };
    assert!(path.is_closed());
    assert!(
        path.commands()
            .iter()
            .any(|command| matches!(command, PathCommand::CurveTo { .. }))
    );
}

#[test]
fn rendering_twice_is_identical() {
    let s = peak_series();
    let config = LineRenderConfig::new(LineMode::cubic_natural()).with_fill(0.2);
    let dispatcher = RenderDispatcher::new(config, UncertainRangeStrategy).expect("dispatcher");
    let request = RenderRequest::from_formatter(&s, &formatter())
        .with_active_range(ActiveRange::new(0.2, 1.7).expect("range"));

    let mut first = RecordingCanvas::new();
    let mut second = RecordingCanvas::new();
    let a = dispatcher.render(&frame(), &request, &mut first);
    let b = dispatcher.render(&frame(), &request, &mut second);
    assert_eq!(a, b);
    assert_eq!(first.commands(), second.commands());
}

#[test]
fn empty_series_draws_nothing() {
    let s = Series::empty();
    let dispatcher = RenderDispatcher::with_threshold_bands(LineRenderConfig::default().with_fill(0.3))
        .expect("dispatcher");
    let request = RenderRequest::from_formatter(&s, &DefaultFillFormatter);
    let mut canvas = RecordingCanvas::new();

    let stats = dispatcher.render(&frame(), &request, &mut canvas);
    assert_eq!(stats, RenderStats::default());
    assert!(canvas.commands().is_empty());
}

#[test]
fn background_strip_is_drawn_first() {
    let s = peak_series();
    let shade = Color::rgba(0.1, 0.1, 0.1, 0.2);
    let config = LineRenderConfig::default().with_background(BackgroundFill {
        from_x: 1.0,
        to_x: 0.5,
        color: shade,
    });
    let dispatcher = RenderDispatcher::with_threshold_bands(config).expect("dispatcher");
    let request = RenderRequest::from_formatter(&s, &formatter());
    let mut canvas = RecordingCanvas::new();

    let stats = dispatcher.render(&frame(), &request, &mut canvas);
    assert_eq!(stats.rects_drawn, 1);
    let Some(DrawCommand::FillRect { rect, color, .. }) = canvas.commands().first() else {
        panic!("expected the background first");
    };
    assert_eq!(*color, shade);
    assert_relative_eq!(rect.left(), 50.0, epsilon = 1e-9);
    assert_relative_eq!(rect.right(), 100.0, epsilon = 1e-9);
    assert_relative_eq!(rect.top(), 0.0, epsilon = 1e-9);
    assert_relative_eq!(rect.bottom(), 60.0, epsilon = 1e-9);
}

#[test]
fn highlight_draws_guide_lines_last() {
    let s = peak_series();
    let guide = Color::rgb(0.0, 0.0, 0.0);
    let config = LineRenderConfig::default().with_highlight_indicator(HighlightIndicatorStyle::new(guide));
    let dispatcher = RenderDispatcher::with_threshold_bands(config).expect("dispatcher");
    let request =
        RenderRequest::from_formatter(&s, &formatter()).with_highlight(DataPoint::new(1.0, 8.0));
    let mut canvas = RecordingCanvas::new();

    let stats = dispatcher.render(&frame(), &request, &mut canvas);
    assert_eq!(stats.strokes_drawn, 3);
    let Some(DrawCommand::Stroke { path, stroke, .. }) = canvas.commands().last() else {
        panic!("expected the highlight last");
    };
    assert_eq!(*stroke, StrokeStyle::new(guide, 0.5));
    assert_eq!(
        path.commands(),
        &[
            PathCommand::MoveTo(CanvasPoint::new(100.0, 0.0)),
            PathCommand::LineTo(CanvasPoint::new(100.0, 60.0)),
            PathCommand::MoveTo(CanvasPoint::new(0.0, 0.0)),
            PathCommand::LineTo(CanvasPoint::new(200.0, 0.0)),
        ]
    );
}

#[test]
fn right_axis_series_uses_the_right_mapper() {
    let s = peak_series().with_axis(AxisDependency::Right);
    let right = CoordinateMapper::from_ranges(0.0, 2.0, 0.0, 10.0, content()).expect("right mapper");
    let frame = frame().with_right_mapper(right);
    let dispatcher = RenderDispatcher::new(LineRenderConfig::default(), PlainLineStrategy).expect("dispatcher");
    let request = RenderRequest::from_formatter(&s, &formatter());
    let mut canvas = RecordingCanvas::new();

    dispatcher.render(&frame, &request, &mut canvas);
    let Some(DrawCommand::Stroke { path, .. }) = canvas.strokes().next() else {
        panic!("expected a stroke");
    };
    let first = path.first_point().expect("first point");
    assert_relative_eq!(first.y, right.y_to_canvas(2.0), epsilon = 1e-9);
}

#[test]
fn vertical_reveal_scales_the_line() {
    let s = peak_series();
    let dispatcher = RenderDispatcher::new(LineRenderConfig::default(), PlainLineStrategy).expect("dispatcher");
    let request = RenderRequest::from_formatter(&s, &formatter());
    let frame = frame().with_progress(AnimationProgress::new(1.0, 0.5));
    let mut canvas = RecordingCanvas::new();

    dispatcher.render(&frame, &request, &mut canvas);
    let Some(DrawCommand::Stroke { path, .. }) = canvas.strokes().next() else {
        panic!("expected a stroke");
    };
    let peak = path.vertices().nth(1).expect("peak");
    assert_relative_eq!(peak.y, frame.left_mapper.y_to_canvas(4.0), epsilon = 1e-9);
}

#[test]
fn animation_progress_is_clamped() {
    let progress = AnimationProgress::new(2.0, -1.0);
    assert_eq!(progress, AnimationProgress { x: 1.0, y: 0.0 });
    assert_eq!(AnimationProgress::new(f64::NAN, 0.5).x, 1.0);
}

#[test]
fn gradient_fill_is_resolved_against_the_content_rect() {
    let s = peak_series();
    let gradient = FillSpec::LinearGradient(LinearGradientFill::new(
        [
            GradientStop::new(0.0, Color::rgb(0.0, 1.0, 0.0)),
            GradientStop::new(1.0, Color::rgba(0.0, 1.0, 0.0, 0.0)),
        ],
        90.0,
    ));
    let solid = FillSpec::Solid(Color::rgb(1.0, 0.0, 0.0));
    let formatter = formatter().with_fills(gradient, solid.clone(), solid);
    let dispatcher = RenderDispatcher::with_threshold_bands(LineRenderConfig::default().with_fill(1.0))
        .expect("dispatcher");
    let request = RenderRequest::from_formatter(&s, &formatter);
    let mut canvas = RecordingCanvas::new();

    dispatcher.render(&frame(), &request, &mut canvas);
    let Some(DrawCommand::Fill {
        fill: ResolvedFill::LinearGradient { start, end, stops },
        ..
    }) = canvas.fills().next()
    else {
        panic!("expected a gradient fill");
    };
    assert_eq!(stops.len(), 2);
    assert_relative_eq!(start.x, 100.0, epsilon = 1e-9);
    assert_relative_eq!(start.y, 60.0, epsilon = 1e-9);
    assert_relative_eq!(end.x, 100.0, epsilon = 1e-9);
    assert_relative_eq!(end.y, 0.0, epsilon = 1e-9);
}

/// Records everything but refuses to fill paths.
#[derive(Default)]
struct FailingFillCanvas {
    inner: RecordingCanvas,
}

impl Canvas for FailingFillCanvas {
    fn save(&mut self) -> ChartResult<()> {
        self.inner.save()
    }

    fn restore(&mut self) -> ChartResult<()> {
        self.inner.restore()
    }

    fn clip(&mut self, rect: Rect) -> ChartResult<()> {
        self.inner.clip(rect)
    }

    fn stroke_path(&mut self, path: &Path, stroke: StrokeStyle, clip: Option<Rect>) -> ChartResult<()> {
        self.inner.stroke_path(path, stroke, clip)
    }

    fn fill_path(&mut self, _path: &Path, _fill: &ResolvedFill, _alpha: f64) -> ChartResult<()> {
        Err(ChartError::Canvas {
            backend: "failing",
            message: "fill unavailable".to_owned(),
        })
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) -> ChartResult<()> {
        self.inner.fill_rect(rect, color)
    }
}

#[test]
fn canvas_failures_are_absorbed_and_state_is_restored() {
    let s = peak_series();
    let config = LineRenderConfig::default().with_fill(0.33);
    let dispatcher = RenderDispatcher::with_threshold_bands(config).expect("dispatcher");
    let request = RenderRequest::from_formatter(&s, &formatter());
    let mut canvas = FailingFillCanvas::default();

    let stats = dispatcher.render(&frame(), &request, &mut canvas);
    assert_eq!(stats.canvas_failures, 2);
    assert_eq!(stats.fills_drawn, 0);
    assert_eq!(stats.strokes_drawn, 2);
    assert_eq!(canvas.inner.save_depth(), 0);
}

#[test]
fn series_set_keeps_insertion_order() {
    let a = peak_series();
    let b = series(&[(0.0, 3.0), (2.0, 7.0)]);
    let dispatcher = RenderDispatcher::with_threshold_bands(LineRenderConfig::default()).expect("dispatcher");
    let formatter = formatter();
    let mut canvas = RecordingCanvas::new();

    let stats = dispatcher.render_series_set(
        &frame(),
        [
            ("zeta", RenderRequest::from_formatter(&a, &formatter)),
            ("alpha", RenderRequest::from_formatter(&b, &formatter)),
        ],
        &mut canvas,
    );
    let keys: Vec<&str> = stats.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["zeta", "alpha"]);
    assert_eq!(stats["zeta"].strokes_drawn, 2);
    assert_eq!(canvas.strokes().count(), 4);
}

#[test]
fn invalid_config_is_rejected_up_front() {
    let config = LineRenderConfig::default().with_line_width(0.0);
    assert!(RenderDispatcher::with_threshold_bands(config).is_err());
    let config = LineRenderConfig::new(LineMode::CubicNatural { intensity: 0.0 });
    assert!(RenderDispatcher::with_threshold_bands(config).is_err());
    let config = LineRenderConfig::default().with_fill(1.5);
    assert!(RenderDispatcher::with_threshold_bands(config).is_err());
}

#[test]
fn viewport_frame_spans_the_whole_surface() {
    let frame = ChartFrame::for_viewport(Viewport::new(320, 200), (0.0, 2.0), (2.0, 8.0))
        .expect("frame");
    assert_eq!(frame.content, Rect::new_unchecked(0.0, 0.0, 320.0, 200.0));
    assert_relative_eq!(frame.left_mapper.y_to_canvas(8.0), 0.0, epsilon = 1e-9);

    let err = ChartFrame::for_viewport(Viewport::new(0, 200), (0.0, 2.0), (2.0, 8.0))
        .expect_err("empty viewport");
    assert!(matches!(err, ChartError::InvalidViewport { width: 0, height: 200 }));
}
