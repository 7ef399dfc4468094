//! Headless testing support: a recording surface and snapshot helpers.
//!
//! Use [`RecordingSurface`] wherever a [`Surface`](crate::canvas::Surface) is
//! needed without a browser. Use [`commands_to_string`] and
//! [`render_to_string`] to capture its log as text for snapshot assertions.

pub mod recorder;
pub mod snapshot;

pub use recorder::{Command, PaintState, RecordingSurface};
pub use snapshot::{commands_to_string, render_to_string};
