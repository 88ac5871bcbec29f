use smallvec::SmallVec;

use crate::core::{
    ActiveRange, BandFrame, BandRole, BandStroke, BandStrokes, ColorRule, FillSide, Path, Rect,
    clip_rect, split_bands,
};
use crate::render::FillSpec;

use super::FillRule;

/// One fill pass: paint the `side` polygon with `fill`, clipped to `clip`.
#[derive(Debug, Clone, PartialEq)]
pub struct FillPass {
    pub side: FillSide,
    pub clip: Rect,
    pub fill: FillSpec,
}

pub type FillPasses = SmallVec<[FillPass; 6]>;

/// Decides which clipped stroke and fill passes a line series gets.
///
/// Geometry is built once by the dispatcher; a strategy only chooses clips
/// and paints, so every variant draws the same path and polygons.
pub trait LineRenderStrategy {
    fn name(&self) -> &'static str;

    /// Whether an active range changes the passes this strategy emits.
    fn uses_active_range(&self) -> bool {
        true
    }

    fn stroke_passes<'p>(
        &self,
        path: &'p Path,
        frame: &BandFrame,
        colors: &ColorRule,
        active: Option<ActiveRange>,
    ) -> BandStrokes<'p>;

    fn fill_passes(
        &self,
        frame: &BandFrame,
        fills: &FillRule,
        active: Option<ActiveRange>,
    ) -> FillPasses;
}

/// Single-color line: one unclipped pass in the above color.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainLineStrategy;

impl LineRenderStrategy for PlainLineStrategy {
    fn name(&self) -> &'static str {
        "plain"
    }

    fn uses_active_range(&self) -> bool {
        false
    }

    fn stroke_passes<'p>(
        &self,
        path: &'p Path,
        frame: &BandFrame,
        colors: &ColorRule,
        _active: Option<ActiveRange>,
    ) -> BandStrokes<'p> {
        let mut strokes = BandStrokes::new();
        strokes.push(BandStroke {
            path,
            role: BandRole::Above,
            clip: frame.content,
            color: colors.above,
        });
        strokes
    }

    fn fill_passes(
        &self,
        frame: &BandFrame,
        fills: &FillRule,
        _active: Option<ActiveRange>,
    ) -> FillPasses {
        [FillSide::Above, FillSide::Below]
            .into_iter()
            .map(|side| FillPass {
                side,
                clip: frame.content,
                fill: fills.above.clone(),
            })
            .collect()
    }
}

/// Above/below threshold coloring over the full chart width.
///
/// Active ranges are ignored; the dispatcher logs a `debug!` line when a
/// request carries one. Use [`UncertainRangeStrategy`] to honor them.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThresholdBandStrategy;

impl LineRenderStrategy for ThresholdBandStrategy {
    fn name(&self) -> &'static str {
        "threshold-bands"
    }

    fn uses_active_range(&self) -> bool {
        false
    }

    fn stroke_passes<'p>(
        &self,
        path: &'p Path,
        frame: &BandFrame,
        colors: &ColorRule,
        _active: Option<ActiveRange>,
    ) -> BandStrokes<'p> {
        split_bands(path, frame, colors, None)
    }

    fn fill_passes(
        &self,
        frame: &BandFrame,
        fills: &FillRule,
        _active: Option<ActiveRange>,
    ) -> FillPasses {
        let mut passes = FillPasses::new();
        passes.push(FillPass {
            side: FillSide::Above,
            clip: frame.content,
            fill: fills.above.clone(),
        });
        passes.push(FillPass {
            side: FillSide::Below,
            clip: frame.content,
            fill: fills.below.clone(),
        });
        passes
    }
}

/// Threshold coloring inside an active range, uncertain color outside it.
///
/// Without an active range it behaves like [`ThresholdBandStrategy`].
#[derive(Debug, Clone, Copy, Default)]
pub struct UncertainRangeStrategy;

impl LineRenderStrategy for UncertainRangeStrategy {
    fn name(&self) -> &'static str {
        "uncertain-range"
    }

    fn stroke_passes<'p>(
        &self,
        path: &'p Path,
        frame: &BandFrame,
        colors: &ColorRule,
        active: Option<ActiveRange>,
    ) -> BandStrokes<'p> {
        split_bands(path, frame, colors, active)
    }

    fn fill_passes(
        &self,
        frame: &BandFrame,
        fills: &FillRule,
        active: Option<ActiveRange>,
    ) -> FillPasses {
        let Some(active) = active else {
            return ThresholdBandStrategy.fill_passes(frame, fills, None);
        };

        let zones = frame.zone_columns(active);
        let rows = frame.full_rows();
        let mut passes = FillPasses::new();
        for (columns, above, below) in [
            (zones.left, &fills.uncertain_above, &fills.uncertain),
            (zones.active, &fills.above, &fills.below),
            (zones.right, &fills.uncertain_above, &fills.uncertain),
        ] {
            let clip = clip_rect(columns, rows);
            passes.push(FillPass {
                side: FillSide::Above,
                clip,
                fill: above.clone(),
            });
            passes.push(FillPass {
                side: FillSide::Below,
                clip,
                fill: below.clone(),
            });
        }
        passes
    }
}
