use crate::core::{Path, Rect};
use crate::error::{ChartError, ChartResult};
use crate::render::{Canvas, Color, ResolvedFill, StrokeStyle};

/// One call received by a [`RecordingCanvas`].
///
/// Draw commands carry the clip in effect when they were issued (the
/// intersection of every active clip), so tests can assert on visible areas
/// without replaying the save/restore stack.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Save,
    Restore,
    Clip(Rect),
    Stroke {
        path: Path,
        stroke: StrokeStyle,
        clip: Option<Rect>,
        effective_clip: Option<Rect>,
    },
    Fill {
        path: Path,
        fill: ResolvedFill,
        alpha: f64,
        effective_clip: Option<Rect>,
    },
    FillRect {
        rect: Rect,
        color: Color,
        effective_clip: Option<Rect>,
    },
}

/// Headless canvas used by tests and by hosts that replay draw lists.
///
/// It validates every call the way a real backend would reject it, so
/// invalid geometry is caught before a pixel backend is involved.
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    commands: Vec<DrawCommand>,
    clip_stack: Vec<Option<Rect>>,
    current_clip: Option<Rect>,
}

impl RecordingCanvas {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    #[must_use]
    pub fn into_commands(self) -> Vec<DrawCommand> {
        self.commands
    }

    /// Stroke commands in drawing order.
    pub fn strokes(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|command| matches!(command, DrawCommand::Stroke { .. }))
    }

    /// Path fill commands in drawing order.
    pub fn fills(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|command| matches!(command, DrawCommand::Fill { .. }))
    }

    /// Open `save` calls without a matching `restore`.
    #[must_use]
    pub fn save_depth(&self) -> usize {
        self.clip_stack.len()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
        self.clip_stack.clear();
        self.current_clip = None;
    }

    fn intersect_clip(&self, rect: Rect) -> Rect {
        match self.current_clip {
            Some(current) => current.intersect(rect),
            None => rect,
        }
    }
}

fn recording_error(message: impl Into<String>) -> ChartError {
    ChartError::Canvas {
        backend: "recording",
        message: message.into(),
    }
}

impl Canvas for RecordingCanvas {
    fn save(&mut self) -> ChartResult<()> {
        self.clip_stack.push(self.current_clip);
        self.commands.push(DrawCommand::Save);
        Ok(())
    }

    fn restore(&mut self) -> ChartResult<()> {
        let Some(previous) = self.clip_stack.pop() else {
            return Err(recording_error("restore without matching save"));
        };
        self.current_clip = previous;
        self.commands.push(DrawCommand::Restore);
        Ok(())
    }

    fn clip(&mut self, rect: Rect) -> ChartResult<()> {
        rect.validate()?;
        self.current_clip = Some(self.intersect_clip(rect));
        self.commands.push(DrawCommand::Clip(rect));
        Ok(())
    }

    fn stroke_path(
        &mut self,
        path: &Path,
        stroke: StrokeStyle,
        clip: Option<Rect>,
    ) -> ChartResult<()> {
        path.validate()?;
        stroke.validate()?;
        let effective_clip = match clip {
            Some(rect) => {
                rect.validate()?;
                Some(self.intersect_clip(rect))
            }
            None => self.current_clip,
        };
        self.commands.push(DrawCommand::Stroke {
            path: path.clone(),
            stroke,
            clip,
            effective_clip,
        });
        Ok(())
    }

    fn fill_path(&mut self, path: &Path, fill: &ResolvedFill, alpha: f64) -> ChartResult<()> {
        path.validate()?;
        if !alpha.is_finite() || !(0.0..=1.0).contains(&alpha) {
            return Err(ChartError::InvalidData(
                "fill alpha must be finite and in [0, 1]".to_owned(),
            ));
        }
        match fill {
            ResolvedFill::Solid(color) => color.validate()?,
            ResolvedFill::LinearGradient { stops, .. } => {
                for stop in stops {
                    stop.color.validate()?;
                }
            }
        }
        self.commands.push(DrawCommand::Fill {
            path: path.clone(),
            fill: fill.clone(),
            alpha,
            effective_clip: self.current_clip,
        });
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) -> ChartResult<()> {
        rect.validate()?;
        color.validate()?;
        self.commands.push(DrawCommand::FillRect {
            rect,
            color,
            effective_clip: self.current_clip,
        });
        Ok(())
    }
}
