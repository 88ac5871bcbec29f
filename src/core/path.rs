use serde::{Deserialize, Serialize};

use crate::core::{CanvasPoint, Rect};
use crate::error::{ChartError, ChartResult};

/// One canvas-space path command.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PathCommand {
    MoveTo(CanvasPoint),
    LineTo(CanvasPoint),
    CurveTo {
        control1: CanvasPoint,
        control2: CanvasPoint,
        to: CanvasPoint,
    },
    Close,
}

impl PathCommand {
    /// Point the pen ends on, `None` for `Close`.
    #[must_use]
    pub fn end_point(self) -> Option<CanvasPoint> {
        match self {
            Self::MoveTo(p) | Self::LineTo(p) => Some(p),
            Self::CurveTo { to, .. } => Some(to),
            Self::Close => None,
        }
    }
}

/// Stroke or fill geometry in canvas space, rebuilt every draw.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Path {
    commands: Vec<PathCommand>,
}

impl Path {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            commands: Vec::with_capacity(capacity),
        }
    }

    pub fn move_to(&mut self, point: CanvasPoint) {
        self.commands.push(PathCommand::MoveTo(point));
    }

    /// Appends a line, starting a subpath instead when the path is empty.
    pub fn line_to(&mut self, point: CanvasPoint) {
        if self.commands.is_empty() {
            self.move_to(point);
        } else {
            self.commands.push(PathCommand::LineTo(point));
        }
    }

    pub fn curve_to(&mut self, control1: CanvasPoint, control2: CanvasPoint, to: CanvasPoint) {
        self.commands.push(PathCommand::CurveTo {
            control1,
            control2,
            to,
        });
    }

    pub fn close(&mut self) {
        if !self.commands.is_empty() {
            self.commands.push(PathCommand::Close);
        }
    }

    #[must_use]
    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        matches!(self.commands.last(), Some(PathCommand::Close))
    }

    /// On-curve points in drawing order (control points excluded).
    pub fn vertices(&self) -> impl Iterator<Item = CanvasPoint> + '_ {
        self.commands.iter().filter_map(|command| command.end_point())
    }

    #[must_use]
    pub fn first_point(&self) -> Option<CanvasPoint> {
        self.vertices().next()
    }

    #[must_use]
    pub fn last_point(&self) -> Option<CanvasPoint> {
        self.commands.iter().rev().find_map(|command| command.end_point())
    }

    /// Bounding box of every point including curve controls.
    #[must_use]
    pub fn bounds(&self) -> Option<Rect> {
        let mut points = self.commands.iter().flat_map(|command| {
            let (a, b, c) = match *command {
                PathCommand::MoveTo(p) | PathCommand::LineTo(p) => (Some(p), None, None),
                PathCommand::CurveTo {
                    control1,
                    control2,
                    to,
                } => (Some(control1), Some(control2), Some(to)),
                PathCommand::Close => (None, None, None),
            };
            [a, b, c].into_iter().flatten()
        });
        let first = points.next()?;
        let (mut left, mut top, mut right, mut bottom) = (first.x, first.y, first.x, first.y);
        for p in points {
            left = left.min(p.x);
            right = right.max(p.x);
            top = top.min(p.y);
            bottom = bottom.max(p.y);
        }
        Some(Rect::from_edges(left, top, right, bottom))
    }

    pub fn validate(&self) -> ChartResult<()> {
        if let Some(PathCommand::LineTo(_) | PathCommand::CurveTo { .. }) = self.commands.first() {
            return Err(ChartError::InvalidData(
                "path must start with a move".to_owned(),
            ));
        }
        for command in &self.commands {
            let finite = match *command {
                PathCommand::MoveTo(p) | PathCommand::LineTo(p) => p.x.is_finite() && p.y.is_finite(),
                PathCommand::CurveTo {
                    control1,
                    control2,
                    to,
                } => [control1, control2, to]
                    .iter()
                    .all(|p| p.x.is_finite() && p.y.is_finite()),
                PathCommand::Close => true,
            };
            if !finite {
                return Err(ChartError::InvalidData(
                    "path coordinates must be finite".to_owned(),
                ));
            }
        }
        Ok(())
    }
}
