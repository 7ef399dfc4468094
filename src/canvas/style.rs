//! Paint styles: the closed set of appearance attributes a scene node can set.

use crate::color::Color;
use crate::error::Result;

use super::font::Font;
use super::surface::{Direction, LineCap, LineJoin, Surface, TextAlign, TextBaseline};

/// One paint or text attribute.
///
/// Applying a style mutates the surface's current state; the scene renderer
/// brackets it with save/restore so it stays local to the node.
#[derive(Clone, Debug, PartialEq)]
pub enum Style {
    FillColor(Color),
    StrokeColor(Color),
    LineWidth(f64),
    LineCap(LineCap),
    LineJoin(LineJoin),
    MiterLimit(f64),
    /// Opacity multiplier in `0.0..=1.0`.
    GlobalAlpha(f64),
    ShadowColor(Color),
    ShadowBlur(f64),
    ShadowOffset { x: f64, y: f64 },
    Font(Font),
    TextAlign(TextAlign),
    TextBaseline(TextBaseline),
    Direction(Direction),
}

impl Style {
    /// Set this attribute on `surface`.
    pub fn apply<S: Surface + ?Sized>(&self, surface: &mut S) -> Result<()> {
        match self {
            Style::FillColor(color) => surface.set_fill_style(*color),
            Style::StrokeColor(color) => surface.set_stroke_style(*color),
            Style::LineWidth(width) => surface.set_line_width(*width),
            Style::LineCap(cap) => surface.set_line_cap(*cap),
            Style::LineJoin(join) => surface.set_line_join(*join),
            Style::MiterLimit(limit) => surface.set_miter_limit(*limit),
            Style::GlobalAlpha(alpha) => surface.set_global_alpha(*alpha),
            Style::ShadowColor(color) => surface.set_shadow_color(*color),
            Style::ShadowBlur(blur) => surface.set_shadow_blur(*blur),
            Style::ShadowOffset { x, y } => surface.set_shadow_offset(*x, *y),
            Style::Font(font) => surface.set_font(&font.to_string()),
            Style::TextAlign(align) => surface.set_text_align(*align),
            Style::TextBaseline(baseline) => surface.set_text_baseline(*baseline),
            Style::Direction(direction) => surface.set_direction(*direction),
        }
    }
}

/// Apply `styles` in order, stopping at the first failure.
pub fn apply_styles<S: Surface + ?Sized>(surface: &mut S, styles: &[Style]) -> Result<()> {
    for style in styles {
        style.apply(surface)?;
    }
    Ok(())
}
