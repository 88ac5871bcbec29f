pub mod band_splitter;
pub mod fill_region;
pub mod mapper;
pub mod path;
pub mod path_builder;
pub mod primitives;
pub mod series;
pub mod types;
pub mod windowing;

pub use band_splitter::{
    ActiveRange, BandFrame, BandRole, BandRows, BandStroke, BandStrokes, ColorRule, ZoneColumns,
    clip_rect, split_bands,
};
pub use fill_region::{
    FillPolygon, FillSide, build_fill_polygon, build_spline_fill, crossing_x,
};
pub use mapper::{AffineTransform, CoordinateMapper};
pub use path::{Path, PathCommand};
pub use path_builder::{DEFAULT_CUBIC_INTENSITY, LineMode, build_path};
pub use series::{AxisDependency, Series};
pub use types::{CanvasPoint, DataPoint, Rect, Viewport};
pub use windowing::VisibleWindow;
