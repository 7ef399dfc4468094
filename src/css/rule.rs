//! CSS rules: simple rules, media rules, stylesheets.
//!
//! A [`MediaRule`] holds [`SimpleRule`]s only, so a media query nested in
//! another media query cannot be built. Rendering is compact:
//!
//! ```text
//! .a, .b{color:red;}
//! @media (max-width: 600px){.a{color:red;}
//! .b{color:blue;}}
//! ```

use std::fmt;

use crate::dom::node::NodeId;
use crate::error::{Error, Result};

use super::model::{Declaration, Selector};

// ---------------------------------------------------------------------------
// SimpleRule
// ---------------------------------------------------------------------------

/// Selectors plus declarations. Always has at least one selector.
#[derive(Debug, Clone, PartialEq)]
pub struct SimpleRule {
    selectors: Vec<Selector>,
    declarations: Vec<Declaration>,
}

impl SimpleRule {
    /// A rule for one selector, with no declarations yet.
    pub fn new(selector: Selector) -> Self {
        Self { selectors: vec![selector], declarations: Vec::new() }
    }

    /// A rule for several selectors. Fails on an empty list.
    pub fn try_from_selectors(selectors: impl IntoIterator<Item = Selector>) -> Result<Self> {
        let selectors: Vec<Selector> = selectors.into_iter().collect();
        if selectors.is_empty() {
            return Err(Error::EmptySelectorList);
        }
        Ok(Self { selectors, declarations: Vec::new() })
    }

    /// Also match `selector` (builder). Renders as `a, b`.
    pub fn or(mut self, selector: Selector) -> Self {
        self.selectors.push(selector);
        self
    }

    /// Append a declaration (builder).
    pub fn declare(mut self, declaration: Declaration) -> Self {
        self.declarations.push(declaration);
        self
    }

    /// Append several declarations (builder).
    pub fn with_declarations(mut self, declarations: impl IntoIterator<Item = Declaration>) -> Self {
        self.declarations.extend(declarations);
        self
    }

    /// `.name{...}`
    pub fn class(name: impl Into<String>, declarations: impl IntoIterator<Item = Declaration>) -> Self {
        Self::new(Selector::class(name)).with_declarations(declarations)
    }

    /// `tag{...}`
    pub fn tag(name: impl Into<String>, declarations: impl IntoIterator<Item = Declaration>) -> Self {
        Self::new(Selector::tag(name)).with_declarations(declarations)
    }

    /// `#name{...}`
    pub fn id(name: impl Into<String>, declarations: impl IntoIterator<Item = Declaration>) -> Self {
        Self::new(Selector::id(name)).with_declarations(declarations)
    }

    /// `[data-ref="..."]{...}` for one DOM element.
    pub fn element(node: NodeId, declarations: impl IntoIterator<Item = Declaration>) -> Self {
        Self::new(Selector::element(node)).with_declarations(declarations)
    }

    /// `*{...}`
    pub fn universal(declarations: impl IntoIterator<Item = Declaration>) -> Self {
        Self::new(Selector::universal()).with_declarations(declarations)
    }

    pub fn selectors(&self) -> &[Selector] {
        &self.selectors
    }

    pub fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }
}

impl fmt::Display for SimpleRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, selector) in self.selectors.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{selector}")?;
        }
        f.write_str("{")?;
        for declaration in &self.declarations {
            write!(f, "{declaration};")?;
        }
        f.write_str("}")
    }
}

// ---------------------------------------------------------------------------
// MediaRule
// ---------------------------------------------------------------------------

/// `@media (<query>){ ... }` around simple rules.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaRule {
    /// The condition without parentheses, e.g. `max-width: 600px`.
    pub query: String,
    pub rules: Vec<SimpleRule>,
}

impl MediaRule {
    pub fn new(query: impl Into<String>) -> Self {
        Self { query: query.into(), rules: Vec::new() }
    }

    /// Append a rule (builder).
    pub fn with_rule(mut self, rule: SimpleRule) -> Self {
        self.rules.push(rule);
        self
    }
}

impl fmt::Display for MediaRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@media ({}){{", self.query)?;
        for (i, rule) in self.rules.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{rule}")?;
        }
        f.write_str("}")
    }
}

// ---------------------------------------------------------------------------
// Rule / StyleSheet
// ---------------------------------------------------------------------------

/// A top-level rule.
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    Simple(SimpleRule),
    Media(MediaRule),
}

impl From<SimpleRule> for Rule {
    fn from(rule: SimpleRule) -> Self {
        Rule::Simple(rule)
    }
}

impl From<MediaRule> for Rule {
    fn from(rule: MediaRule) -> Self {
        Rule::Media(rule)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Simple(rule) => write!(f, "{rule}"),
            Rule::Media(rule) => write!(f, "{rule}"),
        }
    }
}

/// An ordered list of top-level rules.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleSheet {
    pub rules: Vec<Rule>,
}

impl StyleSheet {
    /// Create an empty stylesheet.
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Append a rule (builder).
    pub fn with(mut self, rule: impl Into<Rule>) -> Self {
        self.rules.push(rule.into());
        self
    }

    /// Append a rule.
    pub fn push(&mut self, rule: impl Into<Rule>) {
        self.rules.push(rule.into());
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl fmt::Display for StyleSheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, rule) in self.rules.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{rule}")?;
        }
        Ok(())
    }
}
