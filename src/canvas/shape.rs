//! Drawable primitives: rectangles, paths, arcs, text and images.

use std::f64::consts::TAU;

use crate::error::Result;
use crate::geometry::{Point, Rect};

use super::surface::{ImagePlacement, Surface};

/// How a built path is painted.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Paint {
    #[default]
    Fill,
    Stroke,
    /// Fill first, then stroke on top.
    FillAndStroke,
}

impl Paint {
    fn apply<S: Surface + ?Sized>(self, surface: &mut S) -> Result<()> {
        match self {
            Paint::Fill => surface.fill(),
            Paint::Stroke => surface.stroke(),
            Paint::FillAndStroke => {
                surface.fill()?;
                surface.stroke()
            }
        }
    }
}

/// One step of a path.
#[derive(Clone, Debug, PartialEq)]
pub enum PathSegment {
    MoveTo(Point),
    LineTo(Point),
    QuadraticCurveTo { control: Point, to: Point },
    BezierCurveTo { control1: Point, control2: Point, to: Point },
    Arc { center: Point, radius: f64, start_angle: f64, end_angle: f64, anticlockwise: bool },
    ArcTo { p1: Point, p2: Point, radius: f64 },
    Rect(Rect),
    Close,
}

impl PathSegment {
    fn apply<S: Surface + ?Sized>(&self, surface: &mut S) -> Result<()> {
        match self {
            PathSegment::MoveTo(to) => surface.move_to(*to),
            PathSegment::LineTo(to) => surface.line_to(*to),
            PathSegment::QuadraticCurveTo { control, to } => surface.quadratic_curve_to(*control, *to),
            PathSegment::BezierCurveTo { control1, control2, to } => {
                surface.bezier_curve_to(*control1, *control2, *to)
            }
            PathSegment::Arc { center, radius, start_angle, end_angle, anticlockwise } => {
                surface.arc(*center, *radius, *start_angle, *end_angle, *anticlockwise)
            }
            PathSegment::ArcTo { p1, p2, radius } => surface.arc_to(*p1, *p2, *radius),
            PathSegment::Rect(rect) => surface.rect(*rect),
            PathSegment::Close => surface.close_path(),
        }
    }
}

/// A primitive drawing operation.
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    FillRect(Rect),
    StrokeRect(Rect),
    /// Erase to transparent black.
    ClearRect(Rect),
    /// A fresh path built from `segments`, then painted.
    Path { segments: Vec<PathSegment>, paint: Paint },
    /// A fresh path holding a single arc, then painted.
    Arc { center: Point, radius: f64, start_angle: f64, end_angle: f64, anticlockwise: bool, paint: Paint },
    FillText { text: String, at: Point, max_width: Option<f64> },
    StrokeText { text: String, at: Point, max_width: Option<f64> },
    /// An image known to the surface by its source key.
    Image { source: String, placement: ImagePlacement },
}

impl Shape {
    /// A filled full circle.
    pub fn circle(center: Point, radius: f64) -> Self {
        Shape::Arc { center, radius, start_angle: 0.0, end_angle: TAU, anticlockwise: false, paint: Paint::Fill }
    }

    /// A filled text run without a width limit.
    pub fn text(text: impl Into<String>, at: Point) -> Self {
        Shape::FillText { text: text.into(), at, max_width: None }
    }

    /// A closed polygon through `points`. Fewer than two points draw nothing.
    pub fn polygon(points: &[Point], paint: Paint) -> Self {
        let mut segments = Vec::with_capacity(points.len() + 1);
        if points.len() >= 2 {
            segments.push(PathSegment::MoveTo(points[0]));
            segments.extend(points[1..].iter().copied().map(PathSegment::LineTo));
            segments.push(PathSegment::Close);
        }
        Shape::Path { segments, paint }
    }

    /// Issue the drawing calls for this shape.
    pub fn apply<S: Surface + ?Sized>(&self, surface: &mut S) -> Result<()> {
        match self {
            Shape::FillRect(rect) => surface.fill_rect(*rect),
            Shape::StrokeRect(rect) => surface.stroke_rect(*rect),
            Shape::ClearRect(rect) => surface.clear_rect(*rect),
            Shape::Path { segments, paint } => {
                surface.begin_path()?;
                for segment in segments {
                    segment.apply(surface)?;
                }
                paint.apply(surface)
            }
            Shape::Arc { center, radius, start_angle, end_angle, anticlockwise, paint } => {
                surface.begin_path()?;
                surface.arc(*center, *radius, *start_angle, *end_angle, *anticlockwise)?;
                paint.apply(surface)
            }
            Shape::FillText { text, at, max_width } => surface.fill_text(text, *at, *max_width),
            Shape::StrokeText { text, at, max_width } => surface.stroke_text(text, *at, *max_width),
            Shape::Image { source, placement } => surface.draw_image(source, *placement),
        }
    }
}
