use cairo::{Context, Extend, Format, ImageSurface, LinearGradient};

use crate::core::{Path, PathCommand, Rect};
use crate::error::{ChartError, ChartResult};
use crate::render::{Canvas, Color, ResolvedFill, StrokeStyle};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CairoCanvasStats {
    pub strokes_drawn: usize,
    pub fills_drawn: usize,
    pub rects_drawn: usize,
}

/// Cairo canvas backend.
///
/// Draws on any `cairo::Context`: an offscreen image surface created with
/// [`CairoCanvas::offscreen`], or the context handed to a host draw callback
/// through [`CairoCanvas::on_context`].
#[derive(Debug)]
pub struct CairoCanvas {
    context: Context,
    surface: Option<ImageSurface>,
    stats: CairoCanvasStats,
}

impl CairoCanvas {
    pub fn offscreen(width: i32, height: i32, clear_color: Color) -> ChartResult<Self> {
        if width <= 0 || height <= 0 {
            return Err(ChartError::InvalidData(
                "cairo surface size must be > 0".to_owned(),
            ));
        }
        clear_color.validate()?;

        let surface = ImageSurface::create(Format::ARgb32, width, height)
            .map_err(|err| map_backend_error("failed to create cairo surface", err))?;
        let context = Context::new(&surface)
            .map_err(|err| map_backend_error("failed to create cairo context", err))?;

        apply_color(&context, clear_color);
        context
            .paint()
            .map_err(|err| map_backend_error("failed to clear surface", err))?;

        Ok(Self {
            context,
            surface: Some(surface),
            stats: CairoCanvasStats::default(),
        })
    }

    /// Wraps an external context, e.g. from a GTK `DrawingArea` callback.
    #[must_use]
    pub fn on_context(context: &Context) -> Self {
        Self {
            context: context.clone(),
            surface: None,
            stats: CairoCanvasStats::default(),
        }
    }

    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        "cairo"
    }

    #[must_use]
    pub fn surface(&self) -> Option<&ImageSurface> {
        self.surface.as_ref()
    }

    #[must_use]
    pub fn stats(&self) -> CairoCanvasStats {
        self.stats
    }

    fn append_path(&self, path: &Path) {
        self.context.new_path();
        for command in path.commands() {
            match *command {
                PathCommand::MoveTo(p) => self.context.move_to(p.x, p.y),
                PathCommand::LineTo(p) => self.context.line_to(p.x, p.y),
                PathCommand::CurveTo {
                    control1,
                    control2,
                    to,
                } => self.context.curve_to(
                    control1.x, control1.y, control2.x, control2.y, to.x, to.y,
                ),
                PathCommand::Close => self.context.close_path(),
            }
        }
    }

    fn apply_fill(&self, fill: &ResolvedFill, alpha: f64) -> ChartResult<()> {
        match fill {
            ResolvedFill::Solid(color) => {
                apply_color(&self.context, color.with_alpha(color.alpha * alpha));
                Ok(())
            }
            ResolvedFill::LinearGradient { start, end, stops } => {
                let gradient = LinearGradient::new(start.x, start.y, end.x, end.y);
                for stop in stops {
                    let c = stop.color;
                    gradient.add_color_stop_rgba(stop.offset, c.red, c.green, c.blue, c.alpha * alpha);
                }
                gradient.set_extend(Extend::Pad);
                self.context
                    .set_source(&gradient)
                    .map_err(|err| map_backend_error("failed to set gradient source", err))
            }
        }
    }
}

impl Canvas for CairoCanvas {
    fn save(&mut self) -> ChartResult<()> {
        self.context
            .save()
            .map_err(|err| map_backend_error("failed to save state", err))
    }

    fn restore(&mut self) -> ChartResult<()> {
        self.context
            .restore()
            .map_err(|err| map_backend_error("failed to restore state", err))
    }

    fn clip(&mut self, rect: Rect) -> ChartResult<()> {
        rect.validate()?;
        self.context.new_path();
        self.context.rectangle(rect.x, rect.y, rect.width, rect.height);
        self.context.clip();
        Ok(())
    }

    fn stroke_path(
        &mut self,
        path: &Path,
        stroke: StrokeStyle,
        clip: Option<Rect>,
    ) -> ChartResult<()> {
        stroke.validate()?;
        if let Some(rect) = clip {
            self.save()?;
            self.clip(rect)?;
        }

        self.append_path(path);
        apply_color(&self.context, stroke.color);
        self.context.set_line_width(stroke.width);
        let stroked = self
            .context
            .stroke()
            .map_err(|err| map_backend_error("failed to stroke path", err));

        if clip.is_some() {
            self.restore()?;
        }
        stroked?;
        self.stats.strokes_drawn += 1;
        Ok(())
    }

    fn fill_path(&mut self, path: &Path, fill: &ResolvedFill, alpha: f64) -> ChartResult<()> {
        self.apply_fill(fill, alpha)?;
        self.append_path(path);
        self.context
            .fill()
            .map_err(|err| map_backend_error("failed to fill path", err))?;
        self.stats.fills_drawn += 1;
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) -> ChartResult<()> {
        rect.validate()?;
        apply_color(&self.context, color);
        self.context.new_path();
        self.context.rectangle(rect.x, rect.y, rect.width, rect.height);
        self.context
            .fill()
            .map_err(|err| map_backend_error("failed to fill rectangle", err))?;
        self.stats.rects_drawn += 1;
        Ok(())
    }
}

fn apply_color(context: &Context, color: Color) {
    context.set_source_rgba(color.red, color.green, color.blue, color.alpha);
}

fn map_backend_error(prefix: &str, err: cairo::Error) -> ChartError {
    ChartError::Canvas {
        backend: "cairo",
        message: format!("{prefix}: {err}"),
    }
}
