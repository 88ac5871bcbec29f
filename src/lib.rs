//! chart-bands: geometry and color-banding engine for line charts.
//!
//! The crate turns an ordered series into stroke paths, threshold color bands
//! and fill polygons, then drives drawing through an abstract [`render::Canvas`].
//! Nothing here owns a window or a view; hosts call [`api::RenderDispatcher`]
//! from their own draw callback.

pub mod api;
pub mod core;
pub mod error;
pub mod render;
pub mod telemetry;

pub use api::{LineRenderConfig, RenderDispatcher};
pub use error::{ChartError, ChartResult};
