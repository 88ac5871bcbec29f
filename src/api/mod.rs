mod config;
mod dispatcher;
mod formatter;
mod json_contract;
mod strategy;

pub use config::{BackgroundFill, HighlightIndicatorStyle, LineRenderConfig};
pub use dispatcher::{AnimationProgress, ChartFrame, RenderDispatcher, RenderRequest, RenderStats};
pub use formatter::{
    DefaultFillFormatter, FillFormatter, FillRule, ResolvedStyle, StaticFillFormatter,
};
pub use json_contract::{LINE_RENDER_CONFIG_JSON_SCHEMA_V1, LineRenderConfigJsonContractV1};
pub use strategy::{
    FillPass, FillPasses, LineRenderStrategy, PlainLineStrategy, ThresholdBandStrategy,
    UncertainRangeStrategy,
};
