//! RGBA colors with CSS parsing and rendering.
//!
//! Parsing accepts any CSS color syntax through `csscolorparser`. Colors
//! render back to CSS text: `#rrggbb` when opaque, `rgba(r, g, b, a)`
//! otherwise.

use std::fmt;
use std::str::FromStr;

use csscolorparser::Color as CssColor;

use crate::error::{Error, Result};

/// An sRGB color with 8-bit channels and a floating-point alpha in `0.0..=1.0`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0.0);

    /// An opaque color.
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// A color with explicit alpha. Alpha is clamped when rendered.
    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Same color with a different alpha.
    #[inline]
    pub const fn with_alpha(self, a: f64) -> Self {
        Self { a, ..self }
    }

    /// Whether the color is fully opaque.
    #[inline]
    pub fn is_opaque(&self) -> bool {
        self.a >= 1.0
    }

    /// Parse any CSS color: hex forms, the full named palette, `rgb()`,
    /// `rgba()`, `hsl()` and friends.
    ///
    /// Returns `None` if the string cannot be parsed.
    pub fn parse(s: &str) -> Option<Color> {
        let parsed = CssColor::from_str(s).ok()?;
        let [r, g, b, _] = parsed.to_rgba8();
        Some(Color::rgba(r, g, b, parsed.a.clamp(0.0, 1.0)))
    }
}

impl FromStr for Color {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Color::parse(s).ok_or_else(|| Error::InvalidColor(s.to_owned()))
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_opaque() {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            let a = self.a.clamp(0.0, 1.0);
            write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, a)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_hex_6digit() {
        assert_eq!(Color::parse("#ff8800"), Some(Color::rgb(255, 136, 0)));
        assert_eq!(Color::parse("#FF8800"), Some(Color::rgb(255, 136, 0)));
    }

    #[test]
    fn parse_hex_3digit_expands() {
        assert_eq!(Color::parse("#abc"), Some(Color::rgb(0xaa, 0xbb, 0xcc)));
    }

    #[test]
    fn parse_hex_8digit_alpha() {
        let c = Color::parse("#00000080").unwrap();
        assert_eq!((c.r, c.g, c.b), (0, 0, 0));
        assert!((c.a - 128.0 / 255.0).abs() < 1e-9);
    }

    #[test]
    fn parse_hex_invalid() {
        assert_eq!(Color::parse("#ff00f"), None);
        assert_eq!(Color::parse("#gghhii"), None);
        assert_eq!(Color::parse("#ééé"), None);
    }

    #[test]
    fn parse_named_case_insensitive() {
        assert_eq!(Color::parse("Red"), Some(Color::rgb(255, 0, 0)));
        assert_eq!(Color::parse("  grey "), Color::parse("gray"));
        assert_eq!(Color::parse("rebeccapurple"), Some(Color::rgb(102, 51, 153)));
        assert_eq!(Color::parse("transparent").map(|c| c.a), Some(0.0));
        assert_eq!(Color::parse("rainbow"), None);
        assert_eq!(Color::parse(""), None);
    }

    #[test]
    fn parse_functional_notation() {
        assert_eq!(Color::parse("rgb(10, 20, 30)"), Some(Color::rgb(10, 20, 30)));
        assert_eq!(Color::parse("hsl(0, 100%, 50%)"), Some(Color::rgb(255, 0, 0)));
        let c = Color::parse("rgba(0, 0, 255, 0.5)").unwrap();
        assert_eq!((c.r, c.g, c.b, c.a), (0, 0, 255, 0.5));
    }

    #[test]
    fn from_str_reports_input() {
        assert_eq!("#fff".parse::<Color>(), Ok(Color::WHITE));
        assert_eq!("nope".parse::<Color>(), Err(Error::InvalidColor("nope".into())));
    }

    #[test]
    fn parsed_color_renders_as_css() {
        assert_eq!(Color::parse("orange").unwrap().to_string(), "#ffa500");
    }

    #[test]
    fn display_opaque_as_hex() {
        assert_eq!(Color::rgb(255, 0, 16).to_string(), "#ff0010");
    }

    #[test]
    fn display_translucent_as_rgba() {
        assert_eq!(Color::rgba(1, 2, 3, 0.5).to_string(), "rgba(1, 2, 3, 0.5)");
        assert_eq!(Color::TRANSPARENT.to_string(), "rgba(0, 0, 0, 0)");
    }

    #[test]
    fn with_alpha_keeps_channels() {
        let c = Color::WHITE.with_alpha(0.25);
        assert_eq!((c.r, c.g, c.b, c.a), (255, 255, 255, 0.25));
    }
}
