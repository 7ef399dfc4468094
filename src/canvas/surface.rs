//! The host drawing surface: a Canvas 2D context seen as a trait.
//!
//! Everything the scene renderer and the text-metrics query need from the
//! host goes through [`Surface`]. Implementations forward to a real context
//! (see the `web` feature) or record calls (see [`crate::testing`]).
//! Failures are the host's; they come back as [`Error`](crate::Error) and
//! are never translated here.

use std::fmt;

use crate::color::Color;
use crate::error::Result;
use crate::geometry::{Matrix, Point, Rect};

// ---------------------------------------------------------------------------
// Keyword enums
// ---------------------------------------------------------------------------

macro_rules! keyword_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident { $($(#[$vmeta:meta])* $variant:ident => $text:literal),+ $(,)? }
        default $default:ident
    ) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            /// The canvas keyword for this value.
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }

            /// Parse a canvas keyword. Returns `None` for unknown keywords.
            pub fn parse(s: &str) -> Option<Self> {
                match s.trim() {
                    $($text => Some($name::$variant),)+
                    _ => None,
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::$default
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

keyword_enum! {
    /// Shape used at the end of open line segments.
    pub enum LineCap {
        Butt => "butt",
        Round => "round",
        Square => "square",
    }
    default Butt
}

keyword_enum! {
    /// Shape used where two segments meet.
    pub enum LineJoin {
        Miter => "miter",
        Round => "round",
        Bevel => "bevel",
    }
    default Miter
}

keyword_enum! {
    /// Horizontal text alignment relative to the draw point.
    pub enum TextAlign {
        Start => "start",
        End => "end",
        Left => "left",
        Right => "right",
        Center => "center",
    }
    default Start
}

keyword_enum! {
    /// Vertical text alignment relative to the draw point.
    pub enum TextBaseline {
        Top => "top",
        Hanging => "hanging",
        Middle => "middle",
        Alphabetic => "alphabetic",
        Ideographic => "ideographic",
        Bottom => "bottom",
    }
    default Alphabetic
}

keyword_enum! {
    /// Text direction.
    pub enum Direction {
        Ltr => "ltr",
        Rtl => "rtl",
        Inherit => "inherit",
    }
    default Inherit
}

// ---------------------------------------------------------------------------
// TextMetrics
// ---------------------------------------------------------------------------

/// Measured dimensions of a text run, in device units.
///
/// Field names follow the canvas `TextMetrics` interface.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct TextMetrics {
    /// Advance width of the run.
    pub width: f64,
    /// Distance from the alignment point to the left of the ink box.
    pub actual_bounding_box_left: f64,
    /// Distance from the alignment point to the right of the ink box.
    pub actual_bounding_box_right: f64,
    /// Distance from the baseline to the top of the ink box.
    pub actual_bounding_box_ascent: f64,
    /// Distance from the baseline to the bottom of the ink box.
    pub actual_bounding_box_descent: f64,
    /// Distance from the baseline to the top of the font's em box.
    pub font_bounding_box_ascent: f64,
    /// Distance from the baseline to the bottom of the font's em box.
    pub font_bounding_box_descent: f64,
}

impl TextMetrics {
    /// Ink height: ascent plus descent.
    pub fn height(&self) -> f64 {
        self.actual_bounding_box_ascent + self.actual_bounding_box_descent
    }

    /// Font box height: font ascent plus font descent.
    pub fn font_height(&self) -> f64 {
        self.font_bounding_box_ascent + self.font_bounding_box_descent
    }
}

// ---------------------------------------------------------------------------
// Images
// ---------------------------------------------------------------------------

/// Where an image is drawn.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ImagePlacement {
    /// Natural size, top-left corner at the point.
    At(Point),
    /// Scaled to fill the rectangle.
    Scaled(Rect),
}

// ---------------------------------------------------------------------------
// Surface
// ---------------------------------------------------------------------------

/// A stateful Canvas 2D drawing surface.
///
/// `save`/`restore` push and pop the full paint and transform state, exactly
/// like the canvas state stack. Callers that mutate state should go through
/// [`SaveGuard`](crate::canvas::SaveGuard) rather than pairing the calls by
/// hand.
pub trait Surface {
    // ── State stack ─────────────────────────────────────────────────

    fn save(&mut self) -> Result<()>;
    fn restore(&mut self) -> Result<()>;

    // ── Paint state ─────────────────────────────────────────────────

    fn set_fill_style(&mut self, color: Color) -> Result<()>;
    fn set_stroke_style(&mut self, color: Color) -> Result<()>;
    fn set_line_width(&mut self, width: f64) -> Result<()>;
    fn set_line_cap(&mut self, cap: LineCap) -> Result<()>;
    fn set_line_join(&mut self, join: LineJoin) -> Result<()>;
    fn set_miter_limit(&mut self, limit: f64) -> Result<()>;
    fn set_global_alpha(&mut self, alpha: f64) -> Result<()>;
    fn set_shadow_color(&mut self, color: Color) -> Result<()>;
    fn set_shadow_blur(&mut self, blur: f64) -> Result<()>;
    fn set_shadow_offset(&mut self, x: f64, y: f64) -> Result<()>;

    // ── Text state ──────────────────────────────────────────────────

    fn font(&self) -> Result<String>;
    fn set_font(&mut self, font: &str) -> Result<()>;
    fn text_align(&self) -> Result<TextAlign>;
    fn set_text_align(&mut self, align: TextAlign) -> Result<()>;
    fn text_baseline(&self) -> Result<TextBaseline>;
    fn set_text_baseline(&mut self, baseline: TextBaseline) -> Result<()>;
    fn direction(&self) -> Result<Direction>;
    fn set_direction(&mut self, direction: Direction) -> Result<()>;

    // ── Transform ───────────────────────────────────────────────────

    fn translate(&mut self, x: f64, y: f64) -> Result<()>;
    /// Rotate clockwise by `angle` radians.
    fn rotate(&mut self, angle: f64) -> Result<()>;
    fn scale(&mut self, x: f64, y: f64) -> Result<()>;
    /// Multiply the current transform by `matrix`.
    fn transform(&mut self, matrix: Matrix) -> Result<()>;
    /// Replace the current transform with `matrix`.
    fn set_transform(&mut self, matrix: Matrix) -> Result<()>;

    // ── Rectangles ──────────────────────────────────────────────────

    fn fill_rect(&mut self, rect: Rect) -> Result<()>;
    fn stroke_rect(&mut self, rect: Rect) -> Result<()>;
    fn clear_rect(&mut self, rect: Rect) -> Result<()>;

    // ── Paths ───────────────────────────────────────────────────────

    fn begin_path(&mut self) -> Result<()>;
    fn close_path(&mut self) -> Result<()>;
    fn move_to(&mut self, to: Point) -> Result<()>;
    fn line_to(&mut self, to: Point) -> Result<()>;
    fn quadratic_curve_to(&mut self, control: Point, to: Point) -> Result<()>;
    fn bezier_curve_to(&mut self, control1: Point, control2: Point, to: Point) -> Result<()>;
    fn arc(
        &mut self,
        center: Point,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        anticlockwise: bool,
    ) -> Result<()>;
    fn arc_to(&mut self, p1: Point, p2: Point, radius: f64) -> Result<()>;
    fn rect(&mut self, rect: Rect) -> Result<()>;
    fn fill(&mut self) -> Result<()>;
    fn stroke(&mut self) -> Result<()>;

    // ── Text and images ─────────────────────────────────────────────

    fn fill_text(&mut self, text: &str, at: Point, max_width: Option<f64>) -> Result<()>;
    fn stroke_text(&mut self, text: &str, at: Point, max_width: Option<f64>) -> Result<()>;
    fn draw_image(&mut self, source: &str, placement: ImagePlacement) -> Result<()>;

    /// Measure `text` with the surface's current text state.
    ///
    /// This is a full text-shaping call on real hosts. Prefer
    /// [`measure_text`](crate::canvas::measure_text), which sets and restores
    /// the text state around the call.
    fn measure_text(&mut self, text: &str) -> Result<TextMetrics>;
}
