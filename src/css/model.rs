//! CSS AST: Selector, Declaration, and their CSS text rendering.

use std::fmt;

use crate::color::Color;
use crate::dom::node::{NodeId, DATA_REF};

/// A single CSS selector component.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectorComponent {
    /// Type selector: matches an element tag (e.g. `button`).
    Tag(String),
    /// Universal selector: `*`.
    Universal,
    /// Class selector: `.classname`.
    Class(String),
    /// ID selector: `#id`.
    Id(String),
    /// A specific element from a [`Dom`](crate::dom::Dom), matched through
    /// its `data-ref` attribute.
    Element(NodeId),
    /// Pseudo-class: `:hover`, `:first-child`, etc.
    PseudoClass(String),
}

impl fmt::Display for SelectorComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectorComponent::Tag(name) => f.write_str(name),
            SelectorComponent::Universal => f.write_str("*"),
            SelectorComponent::Class(name) => write!(f, ".{name}"),
            SelectorComponent::Id(name) => write!(f, "#{name}"),
            SelectorComponent::Element(node) => write!(f, "[{DATA_REF}=\"{}\"]", node.data_ref()),
            SelectorComponent::PseudoClass(name) => write!(f, ":{name}"),
        }
    }
}

/// A combinator between selector components.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// Descendant combinator (whitespace): `A B`.
    Descendant,
    /// Child combinator: `A > B`.
    Child,
}

impl fmt::Display for Combinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Combinator::Descendant => f.write_str(" "),
            Combinator::Child => f.write_str(" > "),
        }
    }
}

/// A single compound selector (sequence of components without combinators).
///
/// For example, `button.primary:hover` is one `CompoundSelector` with three
/// components: `Tag("button")`, `Class("primary")`, `PseudoClass("hover")`.
#[derive(Debug, Clone, PartialEq)]
pub struct CompoundSelector {
    pub components: Vec<SelectorComponent>,
}

impl CompoundSelector {
    /// A compound selector with one component.
    pub fn new(component: SelectorComponent) -> Self {
        Self { components: vec![component] }
    }

    /// Append a component to this compound selector.
    pub fn push(&mut self, component: SelectorComponent) {
        self.components.push(component);
    }

    /// Returns `true` if this selector is the universal selector `*` alone.
    pub fn is_universal(&self) -> bool {
        self.components.len() == 1 && matches!(self.components[0], SelectorComponent::Universal)
    }
}

impl fmt::Display for CompoundSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for component in &self.components {
            write!(f, "{component}")?;
        }
        Ok(())
    }
}

/// One element in a selector chain: either a compound selector or a combinator.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectorPart {
    /// A compound selector (one or more simple selectors).
    Compound(CompoundSelector),
    /// A combinator between compound selectors.
    Combinator(Combinator),
}

/// A full CSS selector: chain of compound selectors joined by combinators.
///
/// For example, `nav > button.primary:hover` is a `Selector` with parts:
/// `[Compound(nav), Combinator(Child), Compound(button.primary:hover)]`.
///
/// Built only through the constructors below, so `parts` always starts and
/// ends with a compound selector and alternates in between.
#[derive(Debug, Clone, PartialEq)]
pub struct Selector {
    parts: Vec<SelectorPart>,
}

impl Selector {
    fn single(component: SelectorComponent) -> Self {
        Self { parts: vec![SelectorPart::Compound(CompoundSelector::new(component))] }
    }

    /// `*`
    pub fn universal() -> Self {
        Self::single(SelectorComponent::Universal)
    }

    /// `tag`
    pub fn tag(name: impl Into<String>) -> Self {
        Self::single(SelectorComponent::Tag(name.into()))
    }

    /// `.name`
    pub fn class(name: impl Into<String>) -> Self {
        Self::single(SelectorComponent::Class(name.into()))
    }

    /// `#name`
    pub fn id(name: impl Into<String>) -> Self {
        Self::single(SelectorComponent::Id(name.into()))
    }

    /// `[data-ref="..."]` for one element of a DOM.
    pub fn element(node: NodeId) -> Self {
        Self::single(SelectorComponent::Element(node))
    }

    /// Add a component to the rightmost compound selector (builder).
    ///
    /// `Selector::tag("button").and(SelectorComponent::Class("primary".into()))`
    /// is `button.primary`.
    pub fn and(mut self, component: SelectorComponent) -> Self {
        if let Some(SelectorPart::Compound(last)) = self.parts.last_mut() {
            last.push(component);
        }
        self
    }

    /// Add a class to the rightmost compound selector (builder).
    pub fn and_class(self, name: impl Into<String>) -> Self {
        self.and(SelectorComponent::Class(name.into()))
    }

    /// Add a pseudo-class to the rightmost compound selector (builder).
    pub fn pseudo(self, name: impl Into<String>) -> Self {
        self.and(SelectorComponent::PseudoClass(name.into()))
    }

    /// `self other`: `other` anywhere below `self`.
    pub fn descendant(self, other: Selector) -> Self {
        self.combine(Combinator::Descendant, other)
    }

    /// `self > other`: `other` directly below `self`.
    pub fn child(self, other: Selector) -> Self {
        self.combine(Combinator::Child, other)
    }

    fn combine(mut self, combinator: Combinator, other: Selector) -> Self {
        self.parts.push(SelectorPart::Combinator(combinator));
        self.parts.extend(other.parts);
        self
    }

    /// The alternating compound/combinator chain, left to right.
    pub fn parts(&self) -> &[SelectorPart] {
        &self.parts
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for part in &self.parts {
            match part {
                SelectorPart::Compound(compound) => write!(f, "{compound}")?,
                SelectorPart::Combinator(combinator) => write!(f, "{combinator}")?,
            }
        }
        Ok(())
    }
}

/// A value token within a CSS declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum DeclarationValue {
    /// An identifier or any verbatim text: `red`, `bold`, `1px solid`.
    Ident(String),
    /// A bare number like `10`, `0.5`.
    Number(f64),
    /// A number with a unit suffix like `12px`, `50%`, `2em`.
    Dimension(f64, String),
    /// A color, rendered as `#rrggbb` or `rgba(...)`.
    Color(Color),
    /// A quoted string value.
    String(String),
    /// A custom property reference, without the `--` prefix: `var(--name)`.
    Var(String),
}

impl DeclarationValue {
    /// `<n>px`
    pub fn px(value: f64) -> Self {
        DeclarationValue::Dimension(value, "px".into())
    }

    /// `<n>%`
    pub fn percent(value: f64) -> Self {
        DeclarationValue::Dimension(value, "%".into())
    }
}

impl From<&str> for DeclarationValue {
    fn from(value: &str) -> Self {
        DeclarationValue::Ident(value.to_owned())
    }
}

impl From<String> for DeclarationValue {
    fn from(value: String) -> Self {
        DeclarationValue::Ident(value)
    }
}

impl From<f64> for DeclarationValue {
    fn from(value: f64) -> Self {
        DeclarationValue::Number(value)
    }
}

impl From<Color> for DeclarationValue {
    fn from(value: Color) -> Self {
        DeclarationValue::Color(value)
    }
}

impl fmt::Display for DeclarationValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeclarationValue::Ident(text) => f.write_str(text),
            DeclarationValue::Number(n) => write!(f, "{n}"),
            DeclarationValue::Dimension(n, unit) => write!(f, "{n}{unit}"),
            DeclarationValue::Color(color) => write!(f, "{color}"),
            DeclarationValue::String(text) => {
                f.write_str("\"")?;
                for ch in text.chars() {
                    match ch {
                        '"' => f.write_str("\\\"")?,
                        '\\' => f.write_str("\\\\")?,
                        '\n' => f.write_str("\\a ")?,
                        c => write!(f, "{c}")?,
                    }
                }
                f.write_str("\"")
            }
            DeclarationValue::Var(name) => write!(f, "var(--{name})"),
        }
    }
}

/// A single CSS property declaration, e.g. `color: red` or `margin: 1px 2px`.
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    /// The property name, e.g. `"color"`, `"margin"`.
    pub property: String,
    /// The declaration values, space-separated when rendered.
    pub values: Vec<DeclarationValue>,
    /// Whether `!important` was specified.
    pub important: bool,
}

impl Declaration {
    /// A declaration with one value.
    pub fn new(property: impl Into<String>, value: impl Into<DeclarationValue>) -> Self {
        Self { property: property.into(), values: vec![value.into()], important: false }
    }

    /// A declaration with several space-separated values.
    pub fn with_values(property: impl Into<String>, values: impl IntoIterator<Item = DeclarationValue>) -> Self {
        Self { property: property.into(), values: values.into_iter().collect(), important: false }
    }

    /// Mark as `!important` (builder).
    pub fn important(mut self) -> Self {
        self.important = true;
        self
    }
}

impl fmt::Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.property)?;
        for (i, value) in self.values.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{value}")?;
        }
        if self.important {
            f.write_str(" !important")?;
        }
        Ok(())
    }
}
