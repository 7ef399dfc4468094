//! Canvas 2D scene graph: surface trait, primitives, renderer, text metrics.

pub mod font;
pub mod metrics;
pub mod scene;
pub mod shape;
pub mod style;
pub mod surface;
pub mod transform;

#[cfg(feature = "web")]
pub mod web;

pub use font::{Font, FontStyle};
pub use metrics::{measure_text, MetricsCache, TextMeasure};
pub use scene::{apply, apply_all, SaveGuard, Scene};
pub use shape::{Paint, PathSegment, Shape};
pub use style::{apply_styles, Style};
pub use surface::{Direction, ImagePlacement, LineCap, LineJoin, Surface, TextAlign, TextBaseline, TextMetrics};
pub use transform::Transformation;
