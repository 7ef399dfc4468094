//! Crate-wide error type.
//!
//! Host surfaces report their own failures through [`Error::Surface`]; the
//! renderer passes them through untouched.

/// Errors produced by drawing surfaces and rule builders.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// The host drawing surface rejected an operation.
    #[error("surface operation `{op}` failed: {message}")]
    Surface { op: &'static str, message: String },
    /// `restore` was called with no matching `save`.
    #[error("restore called without a matching save")]
    RestoreWithoutSave,
    /// An image source that the surface does not know about.
    #[error("unknown image source: {0}")]
    UnknownImage(String),
    /// A CSS color that could not be parsed.
    #[error("invalid color: {0:?}")]
    InvalidColor(String),
    /// A font shorthand that could not be parsed.
    #[error("invalid font: {0:?}")]
    InvalidFont(String),
    /// A simple rule needs at least one selector.
    #[error("a rule needs at least one selector")]
    EmptySelectorList,
}

impl Error {
    /// Shorthand for a host failure on operation `op`.
    pub fn surface(op: &'static str, message: impl Into<String>) -> Self {
        Error::Surface { op, message: message.into() }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
