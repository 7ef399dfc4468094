//! CSS rule model: selectors, declarations, rules and stylesheets that
//! render to CSS text.

pub mod model;
pub mod rule;

pub use model::{
    Combinator, CompoundSelector, Declaration, DeclarationValue, Selector, SelectorComponent,
    SelectorPart,
};
pub use rule::{MediaRule, Rule, SimpleRule, StyleSheet};
