//! CSS font shorthand: typed model and logos-based parser.
//!
//! Canvas fonts are CSS `font` shorthand strings such as
//! `italic bold 16px "Helvetica Neue", sans-serif`. [`Font`] models the parts
//! the canvas uses (style, weight, size, family list) and renders back to the
//! shorthand; [`Font::parse`] reads one.
//!
//! Sizes are normalized to pixels: `pt` is 4/3 px, `em`/`rem` are 16 px and
//! `%` is relative to 16 px.

use std::fmt;

use logos::Logos;

use crate::error::{Error, Result};

/// Pixel size of `1em` when nothing else is known.
const DEFAULT_EM_PX: f64 = 16.0;

// ---------------------------------------------------------------------------
// Tokens
// ---------------------------------------------------------------------------

#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"[ \t\n\r\f]+")]
enum Token {
    /// Number with unit: `16px`, `12pt`, `1.5em`, `120%`.
    #[regex(r"[0-9]+(\.[0-9]+)?(px|pt|em|rem|%)")]
    Dimension,

    /// Bare number: weights (`700`) and unitless line heights.
    #[regex(r"[0-9]+(\.[0-9]+)?")]
    Number,

    /// Quoted family name; a backslash escapes the next character.
    #[regex(r#""([^"\\]|\\.)*""#)]
    DoubleQuoted,

    #[regex(r"'([^'\\]|\\.)*'")]
    SingleQuoted,

    /// Keywords and unquoted family name words.
    #[regex(r"[a-zA-Z_-][a-zA-Z0-9_-]*")]
    Ident,

    #[token(",")]
    Comma,

    #[token("/")]
    Slash,
}

// ---------------------------------------------------------------------------
// Font
// ---------------------------------------------------------------------------

/// Font slant.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
    Oblique,
}

/// A parsed CSS font shorthand.
#[derive(Clone, Debug, PartialEq)]
pub struct Font {
    pub style: FontStyle,
    /// Numeric weight, 1..=1000. 400 is normal, 700 is bold.
    pub weight: u16,
    /// Size in CSS pixels.
    pub size_px: f64,
    /// Family names in fallback order.
    pub families: Vec<String>,
}

impl Font {
    /// The canvas default font: `10px sans-serif`.
    pub fn canvas_default() -> Self {
        Font::new(10.0, "sans-serif")
    }

    /// A normal-weight, upright font.
    pub fn new(size_px: f64, family: impl Into<String>) -> Self {
        Self {
            style: FontStyle::Normal,
            weight: 400,
            size_px,
            families: vec![family.into()],
        }
    }

    /// Set weight 700 (builder).
    pub fn bold(mut self) -> Self {
        self.weight = 700;
        self
    }

    /// Set italic (builder).
    pub fn italic(mut self) -> Self {
        self.style = FontStyle::Italic;
        self
    }

    /// Set an explicit numeric weight (builder).
    pub fn with_weight(mut self, weight: u16) -> Self {
        self.weight = weight;
        self
    }

    /// Append a fallback family (builder).
    pub fn with_fallback(mut self, family: impl Into<String>) -> Self {
        self.families.push(family.into());
        self
    }

    /// Parse a CSS font shorthand.
    ///
    /// Grammar (subset of CSS Fonts):
    /// `[style || weight || normal]* size [/ line-height]? family [, family]*`
    pub fn parse(input: &str) -> Result<Font> {
        let invalid = || Error::InvalidFont(input.to_owned());

        let mut tokens = Vec::new();
        for (token, span) in Token::lexer(input).spanned() {
            let token = token.map_err(|_| invalid())?;
            tokens.push((token, &input[span]));
        }
        let mut iter = tokens.into_iter().peekable();

        let mut style = FontStyle::Normal;
        let mut weight = 400;

        // Prefix keywords up to the mandatory size.
        let size_px = loop {
            let (token, text) = iter.next().ok_or_else(invalid)?;
            match token {
                Token::Dimension => break parse_size(text).ok_or_else(invalid)?,
                Token::Number => {
                    weight = text.parse::<u16>().ok().filter(|w| (1..=1000).contains(w)).ok_or_else(invalid)?;
                }
                Token::Ident => match text.to_ascii_lowercase().as_str() {
                    "normal" | "small-caps" => {}
                    "italic" => style = FontStyle::Italic,
                    "oblique" => style = FontStyle::Oblique,
                    "bold" | "bolder" => weight = 700,
                    "lighter" => weight = 300,
                    _ => return Err(invalid()),
                },
                _ => return Err(invalid()),
            }
        };

        // Optional line height, ignored by canvas.
        if matches!(iter.peek(), Some((Token::Slash, _))) {
            iter.next();
            match iter.next() {
                Some((Token::Dimension | Token::Number | Token::Ident, _)) => {}
                _ => return Err(invalid()),
            }
        }

        // Family list: quoted names or runs of identifiers, comma separated.
        let mut families = Vec::new();
        let mut current: Vec<String> = Vec::new();
        for (token, text) in iter {
            match token {
                Token::Ident => current.push(text.to_owned()),
                Token::DoubleQuoted | Token::SingleQuoted if current.is_empty() => {
                    current.push(unescape(&text[1..text.len() - 1]));
                }
                Token::Comma if !current.is_empty() => {
                    families.push(current.join(" "));
                    current.clear();
                }
                _ => return Err(invalid()),
            }
        }
        if current.is_empty() {
            return Err(invalid());
        }
        families.push(current.join(" "));

        Ok(Font { style, weight, size_px, families })
    }
}

impl Default for Font {
    fn default() -> Self {
        Font::canvas_default()
    }
}

impl fmt::Display for Font {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.style {
            FontStyle::Normal => {}
            FontStyle::Italic => f.write_str("italic ")?,
            FontStyle::Oblique => f.write_str("oblique ")?,
        }
        match self.weight {
            400 => {}
            700 => f.write_str("bold ")?,
            w => write!(f, "{w} ")?,
        }
        write!(f, "{}px ", self.size_px)?;
        for (i, family) in self.families.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            if is_ident_sequence(family) {
                f.write_str(family)?;
            } else {
                write_quoted(f, family)?;
            }
        }
        Ok(())
    }
}

/// Whether `family` reads back unchanged without quotes: single-space
/// separated words, each matching the `Ident` token.
fn is_ident_sequence(family: &str) -> bool {
    !family.is_empty()
        && family.split(' ').all(|word| {
            let mut chars = word.chars();
            chars
                .next()
                .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '-')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        })
}

fn write_quoted(f: &mut fmt::Formatter<'_>, family: &str) -> fmt::Result {
    f.write_str("\"")?;
    for c in family.chars() {
        if c == '"' || c == '\\' {
            f.write_str("\\")?;
        }
        write!(f, "{c}")?;
    }
    f.write_str("\"")
}

fn unescape(quoted: &str) -> String {
    let mut out = String::with_capacity(quoted.len());
    let mut chars = quoted.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.extend(chars.next()),
            c => out.push(c),
        }
    }
    out
}

/// Convert a dimension token to pixels.
fn parse_size(text: &str) -> Option<f64> {
    let split = text.find(|c: char| !(c.is_ascii_digit() || c == '.'))?;
    let (number, unit) = text.split_at(split);
    let value: f64 = number.parse().ok()?;
    let px = match unit {
        "px" => value,
        "pt" => value * 4.0 / 3.0,
        "em" | "rem" => value * DEFAULT_EM_PX,
        "%" => value / 100.0 * DEFAULT_EM_PX,
        _ => return None,
    };
    Some(px)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_size_and_family() {
        let font = Font::parse("16px sans-serif").unwrap();
        assert_eq!(font, Font::new(16.0, "sans-serif"));
    }

    #[test]
    fn parse_style_and_weight_prefix() {
        let font = Font::parse("italic bold 12px serif").unwrap();
        assert_eq!(font.style, FontStyle::Italic);
        assert_eq!(font.weight, 700);
        assert_eq!(font.size_px, 12.0);
    }

    #[test]
    fn parse_numeric_weight() {
        assert_eq!(Font::parse("300 10px monospace").unwrap().weight, 300);
        assert!(Font::parse("0 10px monospace").is_err());
    }

    #[test]
    fn parse_units_normalize_to_px() {
        assert_eq!(Font::parse("12pt serif").unwrap().size_px, 16.0);
        assert_eq!(Font::parse("1.5em serif").unwrap().size_px, 24.0);
        assert_eq!(Font::parse("50% serif").unwrap().size_px, 8.0);
    }

    #[test]
    fn parse_line_height_is_skipped() {
        let font = Font::parse("14px/1.5 Arial").unwrap();
        assert_eq!(font.size_px, 14.0);
        assert_eq!(font.families, vec!["Arial"]);
    }

    #[test]
    fn parse_family_list() {
        let font = Font::parse("16px \"Helvetica Neue\", Open Sans, 'Fira Code', sans-serif").unwrap();
        assert_eq!(font.families, vec!["Helvetica Neue", "Open Sans", "Fira Code", "sans-serif"]);
    }

    #[test]
    fn parse_rejects_missing_parts() {
        assert_eq!(Font::parse("bold"), Err(Error::InvalidFont("bold".into())));
        assert!(Font::parse("16px").is_err());
        assert!(Font::parse("sans-serif").is_err());
        assert!(Font::parse("16px serif,").is_err());
        assert!(Font::parse("wiggly 16px serif").is_err());
        assert!(Font::parse("").is_err());
    }

    #[test]
    fn display_shorthand() {
        let font = Font::new(16.0, "Helvetica Neue").bold().italic().with_fallback("sans-serif");
        assert_eq!(font.to_string(), "italic bold 16px \"Helvetica Neue\", sans-serif");
        assert_eq!(Font::canvas_default().to_string(), "10px sans-serif");
        assert_eq!(Font::new(9.5, "serif").with_weight(600).to_string(), "600 9.5px serif");
    }

    #[test]
    fn display_then_parse_is_stable() {
        let font = Font::new(13.0, "Fira Code").with_fallback("monospace").bold();
        assert_eq!(Font::parse(&font.to_string()).unwrap(), font);
    }

    #[test]
    fn display_quotes_families_that_are_not_identifiers() {
        assert_eq!(Font::new(12.0, "3Dumb").to_string(), "12px \"3Dumb\"");
        assert_eq!(Font::new(12.0, "Noto Sans 日本語").to_string(), "12px \"Noto Sans 日本語\"");
        assert_eq!(Font::new(12.0, "My \"Quoted\" Face").to_string(), r#"12px "My \"Quoted\" Face""#);
        assert_eq!(Font::new(12.0, "Open Sans").to_string(), "12px Open Sans");
    }

    #[test]
    fn awkward_family_names_survive_display_then_parse() {
        for family in ["3Dumb", "Noto Sans 日本語", "My \"Quoted\" Face", r"back\slash", "Two  Spaces", "Font, Inc."] {
            let font = Font::new(12.0, family).with_fallback("serif");
            assert_eq!(Font::parse(&font.to_string()).unwrap(), font, "family {family:?}");
        }
    }

    #[test]
    fn parse_escaped_quotes() {
        let font = Font::parse(r#"10px 'It\'s', "A\"B""#).unwrap();
        assert_eq!(font.families, vec!["It's", "A\"B"]);
    }
}
