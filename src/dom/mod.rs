//! Element arena: slotmap-backed tree of UI elements with selector queries.
//!
//! A [`NodeId`] is the element reference that CSS element selectors target
//! (see [`Selector::element`](crate::css::Selector::element)).

pub mod node;
pub mod query;
pub mod tree;

pub use node::{NodeData, NodeId};
pub use tree::Dom;
