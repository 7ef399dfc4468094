//! # canvas-mvc
//!
//! Declarative drawing for the HTML canvas 2D context, with a typed CSS rule
//! model and a small update/view runtime.
//!
//! A view is a list of [`Scene`](canvas::Scene) values: leaves that draw one
//! shape and groups that share styles and a transformation. Rendering wraps
//! every node in `save`/`restore`, so nothing a node sets leaks to its
//! siblings, even when a drawing call fails halfway.
//!
//! ## Core Systems
//!
//! - **[`canvas`]**: Surface trait, styles, transformations, shapes, scene renderer, text metrics
//! - **[`css`]**: Selectors, declarations, simple and media rules rendered to CSS text
//! - **[`dom`]**: Slotmap-backed element arena with selector queries
//! - **[`app`]**: Program trait, message queue, runtime
//! - **[`testing`]**: Headless recording surface and snapshot helpers
//! - **[`geometry`]** / **[`color`]**: Points, rects, matrices, colors
//!
//! The browser surface lives in `canvas::web` behind the `web` feature.

// Foundation
pub mod color;
pub mod error;
pub mod geometry;

// Core systems
pub mod canvas;
pub mod css;
pub mod dom;

// Application
pub mod app;

// Testing
pub mod testing;

pub use error::{Error, Result};
