//! Headless drawing surface that records every call.
//!
//! [`RecordingSurface`] behaves like a canvas context for state purposes: it
//! keeps the current paint state and transform, a save/restore stack, and a
//! log of [`Command`]s. Text is measured with a fixed-advance model so that
//! layouts are deterministic in tests.

use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::canvas::font::Font;
use crate::canvas::surface::{
    Direction, ImagePlacement, LineCap, LineJoin, Surface, TextAlign, TextBaseline, TextMetrics,
};
use crate::color::Color;
use crate::error::{Error, Result};
use crate::geometry::{Matrix, Point, Rect, Size};

/// Advance of one character, in ems.
const ADVANCE_EM: f64 = 0.5;
/// Ascent above the alphabetic baseline, in ems.
const ASCENT_EM: f64 = 0.8;
/// Descent below the alphabetic baseline, in ems.
const DESCENT_EM: f64 = 0.2;

// ---------------------------------------------------------------------------
// PaintState
// ---------------------------------------------------------------------------

/// Everything `save` pushes and `restore` pops.
#[derive(Clone, Debug, PartialEq)]
pub struct PaintState {
    pub fill_style: Color,
    pub stroke_style: Color,
    pub line_width: f64,
    pub line_cap: LineCap,
    pub line_join: LineJoin,
    pub miter_limit: f64,
    pub global_alpha: f64,
    pub shadow_color: Color,
    pub shadow_blur: f64,
    pub shadow_offset: (f64, f64),
    pub font: String,
    pub text_align: TextAlign,
    pub text_baseline: TextBaseline,
    pub direction: Direction,
    pub transform: Matrix,
}

impl Default for PaintState {
    /// The initial state of a fresh canvas context.
    fn default() -> Self {
        Self {
            fill_style: Color::BLACK,
            stroke_style: Color::BLACK,
            line_width: 1.0,
            line_cap: LineCap::Butt,
            line_join: LineJoin::Miter,
            miter_limit: 10.0,
            global_alpha: 1.0,
            shadow_color: Color::TRANSPARENT,
            shadow_blur: 0.0,
            shadow_offset: (0.0, 0.0),
            font: Font::canvas_default().to_string(),
            text_align: TextAlign::Start,
            text_baseline: TextBaseline::Alphabetic,
            direction: Direction::Inherit,
            transform: Matrix::IDENTITY,
        }
    }
}

// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

/// One recorded surface call. Getters are not recorded.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Save,
    Restore,
    SetFillStyle(Color),
    SetStrokeStyle(Color),
    SetLineWidth(f64),
    SetLineCap(LineCap),
    SetLineJoin(LineJoin),
    SetMiterLimit(f64),
    SetGlobalAlpha(f64),
    SetShadowColor(Color),
    SetShadowBlur(f64),
    SetShadowOffset(f64, f64),
    SetFont(String),
    SetTextAlign(TextAlign),
    SetTextBaseline(TextBaseline),
    SetDirection(Direction),
    Translate(f64, f64),
    Rotate(f64),
    Scale(f64, f64),
    Transform(Matrix),
    SetTransform(Matrix),
    FillRect(Rect),
    StrokeRect(Rect),
    ClearRect(Rect),
    BeginPath,
    ClosePath,
    MoveTo(Point),
    LineTo(Point),
    QuadraticCurveTo(Point, Point),
    BezierCurveTo(Point, Point, Point),
    Arc { center: Point, radius: f64, start_angle: f64, end_angle: f64, anticlockwise: bool },
    ArcTo(Point, Point, f64),
    Rect(Rect),
    Fill,
    Stroke,
    FillText { text: String, at: Point, max_width: Option<f64> },
    StrokeText { text: String, at: Point, max_width: Option<f64> },
    DrawImage { source: String, placement: ImagePlacement },
    MeasureText(String),
}

impl Command {
    /// Whether this command puts pixels on the surface.
    pub fn is_draw(&self) -> bool {
        matches!(
            self,
            Command::FillRect(_)
                | Command::StrokeRect(_)
                | Command::ClearRect(_)
                | Command::Fill
                | Command::Stroke
                | Command::FillText { .. }
                | Command::StrokeText { .. }
                | Command::DrawImage { .. }
        )
    }
}

fn fmt_point(f: &mut fmt::Formatter<'_>, p: Point) -> fmt::Result {
    write!(f, "{} {}", p.x, p.y)
}

fn fmt_rect(f: &mut fmt::Formatter<'_>, r: Rect) -> fmt::Result {
    write!(f, "{} {} {} {}", r.x, r.y, r.width, r.height)
}

fn fmt_matrix(f: &mut fmt::Formatter<'_>, m: Matrix) -> fmt::Result {
    write!(f, "{} {} {} {} {} {}", m.a, m.b, m.c, m.d, m.e, m.f)
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Save => f.write_str("save"),
            Command::Restore => f.write_str("restore"),
            Command::SetFillStyle(c) => write!(f, "fill_style {c}"),
            Command::SetStrokeStyle(c) => write!(f, "stroke_style {c}"),
            Command::SetLineWidth(w) => write!(f, "line_width {w}"),
            Command::SetLineCap(cap) => write!(f, "line_cap {cap}"),
            Command::SetLineJoin(join) => write!(f, "line_join {join}"),
            Command::SetMiterLimit(limit) => write!(f, "miter_limit {limit}"),
            Command::SetGlobalAlpha(alpha) => write!(f, "global_alpha {alpha}"),
            Command::SetShadowColor(c) => write!(f, "shadow_color {c}"),
            Command::SetShadowBlur(blur) => write!(f, "shadow_blur {blur}"),
            Command::SetShadowOffset(x, y) => write!(f, "shadow_offset {x} {y}"),
            Command::SetFont(font) => write!(f, "font {font}"),
            Command::SetTextAlign(align) => write!(f, "text_align {align}"),
            Command::SetTextBaseline(baseline) => write!(f, "text_baseline {baseline}"),
            Command::SetDirection(direction) => write!(f, "direction {direction}"),
            Command::Translate(x, y) => write!(f, "translate {x} {y}"),
            Command::Rotate(angle) => write!(f, "rotate {angle}"),
            Command::Scale(x, y) => write!(f, "scale {x} {y}"),
            Command::Transform(m) => {
                f.write_str("transform ")?;
                fmt_matrix(f, *m)
            }
            Command::SetTransform(m) => {
                f.write_str("set_transform ")?;
                fmt_matrix(f, *m)
            }
            Command::FillRect(r) => {
                f.write_str("fill_rect ")?;
                fmt_rect(f, *r)
            }
            Command::StrokeRect(r) => {
                f.write_str("stroke_rect ")?;
                fmt_rect(f, *r)
            }
            Command::ClearRect(r) => {
                f.write_str("clear_rect ")?;
                fmt_rect(f, *r)
            }
            Command::BeginPath => f.write_str("begin_path"),
            Command::ClosePath => f.write_str("close_path"),
            Command::MoveTo(p) => {
                f.write_str("move_to ")?;
                fmt_point(f, *p)
            }
            Command::LineTo(p) => {
                f.write_str("line_to ")?;
                fmt_point(f, *p)
            }
            Command::QuadraticCurveTo(c, p) => {
                f.write_str("quadratic_curve_to ")?;
                fmt_point(f, *c)?;
                f.write_str(" ")?;
                fmt_point(f, *p)
            }
            Command::BezierCurveTo(c1, c2, p) => {
                f.write_str("bezier_curve_to ")?;
                fmt_point(f, *c1)?;
                f.write_str(" ")?;
                fmt_point(f, *c2)?;
                f.write_str(" ")?;
                fmt_point(f, *p)
            }
            Command::Arc { center, radius, start_angle, end_angle, anticlockwise } => {
                f.write_str("arc ")?;
                fmt_point(f, *center)?;
                write!(f, " {radius} {start_angle} {end_angle}")?;
                if *anticlockwise {
                    f.write_str(" anticlockwise")?;
                }
                Ok(())
            }
            Command::ArcTo(p1, p2, radius) => {
                f.write_str("arc_to ")?;
                fmt_point(f, *p1)?;
                f.write_str(" ")?;
                fmt_point(f, *p2)?;
                write!(f, " {radius}")
            }
            Command::Rect(r) => {
                f.write_str("rect ")?;
                fmt_rect(f, *r)
            }
            Command::Fill => f.write_str("fill"),
            Command::Stroke => f.write_str("stroke"),
            Command::FillText { text, at, max_width } | Command::StrokeText { text, at, max_width } => {
                let name = if matches!(self, Command::FillText { .. }) { "fill_text" } else { "stroke_text" };
                write!(f, "{name} {text:?} ")?;
                fmt_point(f, *at)?;
                if let Some(width) = max_width {
                    write!(f, " max {width}")?;
                }
                Ok(())
            }
            Command::DrawImage { source, placement } => {
                write!(f, "draw_image {source:?} ")?;
                match placement {
                    ImagePlacement::At(p) => fmt_point(f, *p),
                    ImagePlacement::Scaled(r) => fmt_rect(f, *r),
                }
            }
            Command::MeasureText(text) => write!(f, "measure_text {text:?}"),
        }
    }
}

// ---------------------------------------------------------------------------
// RecordingSurface
// ---------------------------------------------------------------------------

/// A [`Surface`] that tracks canvas state and logs calls instead of drawing.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    state: PaintState,
    stack: Vec<PaintState>,
    commands: Vec<Command>,
    images: HashMap<String, Size>,
    failures: HashSet<&'static str>,
    text_anchors: Vec<Point>,
    measured: usize,
}

impl RecordingSurface {
    /// A surface in the initial canvas state with an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call to `op` (a [`Surface`] method name) fail.
    pub fn fail_on(&mut self, op: &'static str) {
        self.failures.insert(op);
    }

    /// Stop injecting failures.
    pub fn clear_failures(&mut self) {
        self.failures.clear();
    }

    /// Make `source` drawable with the given natural size.
    pub fn register_image(&mut self, source: impl Into<String>, width: f64, height: f64) {
        self.images.insert(source.into(), Size::new(width, height));
    }

    /// The current (top of stack) paint state.
    pub fn state(&self) -> &PaintState {
        &self.state
    }

    /// Number of unmatched `save` calls.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Successful calls so far, in order.
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Drain the log, keeping state.
    pub fn take_commands(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.commands)
    }

    /// How many times text was measured.
    pub fn measure_count(&self) -> usize {
        self.measured
    }

    /// Device-space anchor of every text run drawn, in order.
    pub fn device_points(&self) -> Vec<Point> {
        self.text_anchors.clone()
    }

    fn check(&self, op: &'static str) -> Result<()> {
        if self.failures.contains(op) {
            return Err(Error::surface(op, "injected failure"));
        }
        Ok(())
    }

    fn record(&mut self, op: &'static str, command: Command) -> Result<()> {
        self.check(op)?;
        self.commands.push(command);
        Ok(())
    }

    fn multiply(&mut self, matrix: Matrix) {
        self.state.transform = self.state.transform.then(matrix);
    }

    fn font_px(&self) -> Result<f64> {
        Ok(Font::parse(&self.state.font)?.size_px)
    }
}

impl Surface for RecordingSurface {
    fn save(&mut self) -> Result<()> {
        self.record("save", Command::Save)?;
        self.stack.push(self.state.clone());
        Ok(())
    }

    fn restore(&mut self) -> Result<()> {
        self.check("restore")?;
        self.state = self.stack.pop().ok_or(Error::RestoreWithoutSave)?;
        self.commands.push(Command::Restore);
        Ok(())
    }

    fn set_fill_style(&mut self, color: Color) -> Result<()> {
        self.record("set_fill_style", Command::SetFillStyle(color))?;
        self.state.fill_style = color;
        Ok(())
    }

    fn set_stroke_style(&mut self, color: Color) -> Result<()> {
        self.record("set_stroke_style", Command::SetStrokeStyle(color))?;
        self.state.stroke_style = color;
        Ok(())
    }

    fn set_line_width(&mut self, width: f64) -> Result<()> {
        self.record("set_line_width", Command::SetLineWidth(width))?;
        self.state.line_width = width;
        Ok(())
    }

    fn set_line_cap(&mut self, cap: LineCap) -> Result<()> {
        self.record("set_line_cap", Command::SetLineCap(cap))?;
        self.state.line_cap = cap;
        Ok(())
    }

    fn set_line_join(&mut self, join: LineJoin) -> Result<()> {
        self.record("set_line_join", Command::SetLineJoin(join))?;
        self.state.line_join = join;
        Ok(())
    }

    fn set_miter_limit(&mut self, limit: f64) -> Result<()> {
        self.record("set_miter_limit", Command::SetMiterLimit(limit))?;
        self.state.miter_limit = limit;
        Ok(())
    }

    fn set_global_alpha(&mut self, alpha: f64) -> Result<()> {
        self.record("set_global_alpha", Command::SetGlobalAlpha(alpha))?;
        self.state.global_alpha = alpha;
        Ok(())
    }

    fn set_shadow_color(&mut self, color: Color) -> Result<()> {
        self.record("set_shadow_color", Command::SetShadowColor(color))?;
        self.state.shadow_color = color;
        Ok(())
    }

    fn set_shadow_blur(&mut self, blur: f64) -> Result<()> {
        self.record("set_shadow_blur", Command::SetShadowBlur(blur))?;
        self.state.shadow_blur = blur;
        Ok(())
    }

    fn set_shadow_offset(&mut self, x: f64, y: f64) -> Result<()> {
        self.record("set_shadow_offset", Command::SetShadowOffset(x, y))?;
        self.state.shadow_offset = (x, y);
        Ok(())
    }

    fn font(&self) -> Result<String> {
        self.check("font")?;
        Ok(self.state.font.clone())
    }

    fn set_font(&mut self, font: &str) -> Result<()> {
        self.check("set_font")?;
        Font::parse(font)?;
        self.commands.push(Command::SetFont(font.to_owned()));
        self.state.font = font.to_owned();
        Ok(())
    }

    fn text_align(&self) -> Result<TextAlign> {
        self.check("text_align")?;
        Ok(self.state.text_align)
    }

    fn set_text_align(&mut self, align: TextAlign) -> Result<()> {
        self.record("set_text_align", Command::SetTextAlign(align))?;
        self.state.text_align = align;
        Ok(())
    }

    fn text_baseline(&self) -> Result<TextBaseline> {
        self.check("text_baseline")?;
        Ok(self.state.text_baseline)
    }

    fn set_text_baseline(&mut self, baseline: TextBaseline) -> Result<()> {
        self.record("set_text_baseline", Command::SetTextBaseline(baseline))?;
        self.state.text_baseline = baseline;
        Ok(())
    }

    fn direction(&self) -> Result<Direction> {
        self.check("direction")?;
        Ok(self.state.direction)
    }

    fn set_direction(&mut self, direction: Direction) -> Result<()> {
        self.record("set_direction", Command::SetDirection(direction))?;
        self.state.direction = direction;
        Ok(())
    }

    fn translate(&mut self, x: f64, y: f64) -> Result<()> {
        self.record("translate", Command::Translate(x, y))?;
        self.multiply(Matrix::translation(x, y));
        Ok(())
    }

    fn rotate(&mut self, angle: f64) -> Result<()> {
        self.record("rotate", Command::Rotate(angle))?;
        self.multiply(Matrix::rotation(angle));
        Ok(())
    }

    fn scale(&mut self, x: f64, y: f64) -> Result<()> {
        self.record("scale", Command::Scale(x, y))?;
        self.multiply(Matrix::scaling(x, y));
        Ok(())
    }

    fn transform(&mut self, matrix: Matrix) -> Result<()> {
        self.record("transform", Command::Transform(matrix))?;
        self.multiply(matrix);
        Ok(())
    }

    fn set_transform(&mut self, matrix: Matrix) -> Result<()> {
        self.record("set_transform", Command::SetTransform(matrix))?;
        self.state.transform = matrix;
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect) -> Result<()> {
        self.record("fill_rect", Command::FillRect(rect))
    }

    fn stroke_rect(&mut self, rect: Rect) -> Result<()> {
        self.record("stroke_rect", Command::StrokeRect(rect))
    }

    fn clear_rect(&mut self, rect: Rect) -> Result<()> {
        self.record("clear_rect", Command::ClearRect(rect))
    }

    fn begin_path(&mut self) -> Result<()> {
        self.record("begin_path", Command::BeginPath)
    }

    fn close_path(&mut self) -> Result<()> {
        self.record("close_path", Command::ClosePath)
    }

    fn move_to(&mut self, to: Point) -> Result<()> {
        self.record("move_to", Command::MoveTo(to))
    }

    fn line_to(&mut self, to: Point) -> Result<()> {
        self.record("line_to", Command::LineTo(to))
    }

    fn quadratic_curve_to(&mut self, control: Point, to: Point) -> Result<()> {
        self.record("quadratic_curve_to", Command::QuadraticCurveTo(control, to))
    }

    fn bezier_curve_to(&mut self, control1: Point, control2: Point, to: Point) -> Result<()> {
        self.record("bezier_curve_to", Command::BezierCurveTo(control1, control2, to))
    }

    fn arc(
        &mut self,
        center: Point,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        anticlockwise: bool,
    ) -> Result<()> {
        if radius < 0.0 {
            return Err(Error::surface("arc", format!("negative radius {radius}")));
        }
        self.record("arc", Command::Arc { center, radius, start_angle, end_angle, anticlockwise })
    }

    fn arc_to(&mut self, p1: Point, p2: Point, radius: f64) -> Result<()> {
        if radius < 0.0 {
            return Err(Error::surface("arc_to", format!("negative radius {radius}")));
        }
        self.record("arc_to", Command::ArcTo(p1, p2, radius))
    }

    fn rect(&mut self, rect: Rect) -> Result<()> {
        self.record("rect", Command::Rect(rect))
    }

    fn fill(&mut self) -> Result<()> {
        self.record("fill", Command::Fill)
    }

    fn stroke(&mut self) -> Result<()> {
        self.record("stroke", Command::Stroke)
    }

    fn fill_text(&mut self, text: &str, at: Point, max_width: Option<f64>) -> Result<()> {
        self.record("fill_text", Command::FillText { text: text.to_owned(), at, max_width })?;
        self.text_anchors.push(self.state.transform.apply(at));
        Ok(())
    }

    fn stroke_text(&mut self, text: &str, at: Point, max_width: Option<f64>) -> Result<()> {
        self.record("stroke_text", Command::StrokeText { text: text.to_owned(), at, max_width })?;
        self.text_anchors.push(self.state.transform.apply(at));
        Ok(())
    }

    fn draw_image(&mut self, source: &str, placement: ImagePlacement) -> Result<()> {
        self.check("draw_image")?;
        if !self.images.contains_key(source) {
            return Err(Error::UnknownImage(source.to_owned()));
        }
        self.commands.push(Command::DrawImage { source: source.to_owned(), placement });
        Ok(())
    }

    fn measure_text(&mut self, text: &str) -> Result<TextMetrics> {
        self.check("measure_text")?;
        let px = self.font_px()?;
        let width = text.chars().count() as f64 * px * ADVANCE_EM;
        let (left, right) = match self.state.text_align {
            TextAlign::Left => (0.0, width),
            TextAlign::Right => (width, 0.0),
            TextAlign::Center => (width / 2.0, width / 2.0),
            TextAlign::Start | TextAlign::End => {
                let rtl = self.state.direction == Direction::Rtl;
                if (self.state.text_align == TextAlign::End) != rtl {
                    (width, 0.0)
                } else {
                    (0.0, width)
                }
            }
        };
        self.commands.push(Command::MeasureText(text.to_owned()));
        self.measured += 1;
        Ok(TextMetrics {
            width,
            actual_bounding_box_left: left,
            actual_bounding_box_right: right,
            actual_bounding_box_ascent: px * ASCENT_EM,
            actual_bounding_box_descent: px * DESCENT_EM,
            font_bounding_box_ascent: px * ASCENT_EM,
            font_bounding_box_descent: px * DESCENT_EM,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_in_canvas_default_state() {
        let surface = RecordingSurface::new();
        assert_eq!(surface.state(), &PaintState::default());
        assert_eq!(surface.state().font, "10px sans-serif");
        assert_eq!(surface.depth(), 0);
        assert!(surface.commands().is_empty());
    }

    #[test]
    fn save_restore_round_trips_state() {
        let mut surface = RecordingSurface::new();
        surface.save().unwrap();
        surface.set_fill_style(Color::WHITE).unwrap();
        surface.translate(5.0, 5.0).unwrap();
        assert_eq!(surface.depth(), 1);
        surface.restore().unwrap();
        assert_eq!(surface.state(), &PaintState::default());
    }

    #[test]
    fn restore_without_save_is_an_error() {
        let mut surface = RecordingSurface::new();
        assert_eq!(surface.restore(), Err(Error::RestoreWithoutSave));
        assert!(surface.commands().is_empty());
    }

    #[test]
    fn invalid_font_is_rejected_and_not_applied() {
        let mut surface = RecordingSurface::new();
        assert!(matches!(surface.set_font("huge"), Err(Error::InvalidFont(_))));
        assert_eq!(surface.state().font, "10px sans-serif");
    }

    #[test]
    fn injected_failure_leaves_no_trace() {
        let mut surface = RecordingSurface::new();
        surface.fail_on("translate");
        assert_eq!(surface.translate(1.0, 1.0), Err(Error::surface("translate", "injected failure")));
        assert!(surface.state().transform.is_identity());
        assert!(surface.commands().is_empty());
        surface.clear_failures();
        surface.translate(1.0, 1.0).unwrap();
        assert_eq!(surface.commands(), &[Command::Translate(1.0, 1.0)]);
    }

    #[test]
    fn negative_radius_is_a_host_error() {
        let mut surface = RecordingSurface::new();
        assert!(surface.arc(Point::ORIGIN, -1.0, 0.0, 1.0, false).is_err());
        assert!(surface.arc_to(Point::ORIGIN, Point::ORIGIN, -1.0).is_err());
    }

    #[test]
    fn measure_respects_alignment() {
        let mut surface = RecordingSurface::new();
        surface.set_text_align(TextAlign::Center).unwrap();
        let m = surface.measure_text("abcd").unwrap();
        assert_eq!(m.width, 20.0);
        assert_eq!((m.actual_bounding_box_left, m.actual_bounding_box_right), (10.0, 10.0));

        surface.set_text_align(TextAlign::End).unwrap();
        let m = surface.measure_text("abcd").unwrap();
        assert_eq!((m.actual_bounding_box_left, m.actual_bounding_box_right), (20.0, 0.0));

        surface.set_direction(Direction::Rtl).unwrap();
        let m = surface.measure_text("abcd").unwrap();
        assert_eq!((m.actual_bounding_box_left, m.actual_bounding_box_right), (0.0, 20.0));
    }

    #[test]
    fn take_commands_drains_log() {
        let mut surface = RecordingSurface::new();
        surface.begin_path().unwrap();
        assert_eq!(surface.take_commands(), vec![Command::BeginPath]);
        assert!(surface.commands().is_empty());
    }

    #[test]
    fn command_display() {
        assert_eq!(Command::FillRect(Rect::new(0.0, 1.0, 2.5, 3.0)).to_string(), "fill_rect 0 1 2.5 3");
        assert_eq!(
            Command::FillText { text: "hi".into(), at: Point::new(1.0, 2.0), max_width: Some(30.0) }.to_string(),
            "fill_text \"hi\" 1 2 max 30"
        );
        assert_eq!(Command::SetFillStyle(Color::rgb(255, 0, 0)).to_string(), "fill_style #ff0000");
        assert_eq!(Command::SetTextAlign(TextAlign::Center).to_string(), "text_align center");
    }

    #[test]
    fn draw_classification() {
        assert!(Command::Fill.is_draw());
        assert!(!Command::Save.is_draw());
        assert!(!Command::MoveTo(Point::ORIGIN).is_draw());
    }
}
