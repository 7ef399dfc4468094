//! Coordinate transformations applied to a scene node's scope.

use crate::error::Result;
use crate::geometry::Matrix;

use super::surface::Surface;

/// A change to the current coordinate system.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Transformation {
    /// Leave the coordinate system alone. Issues no surface calls.
    #[default]
    Identity,
    Translate { x: f64, y: f64 },
    /// Clockwise rotation in radians.
    Rotate(f64),
    Scale { x: f64, y: f64 },
    /// Multiply the current transform by a matrix.
    Matrix(Matrix),
    /// Replace the current transform, discarding what the parents set.
    SetMatrix(Matrix),
    /// Apply each transformation in order.
    Composite(Vec<Transformation>),
}

impl Transformation {
    pub fn translate(x: f64, y: f64) -> Self {
        Transformation::Translate { x, y }
    }

    pub fn rotate(angle: f64) -> Self {
        Transformation::Rotate(angle)
    }

    pub fn scale(x: f64, y: f64) -> Self {
        Transformation::Scale { x, y }
    }

    /// Follow this transformation with `next` (builder).
    ///
    /// Flattens into a single [`Transformation::Composite`] and drops
    /// identities.
    pub fn then(self, next: Transformation) -> Self {
        let mut steps = match self {
            Transformation::Identity => Vec::new(),
            Transformation::Composite(steps) => steps,
            other => vec![other],
        };
        match next {
            Transformation::Identity => {}
            Transformation::Composite(more) => steps.extend(more),
            other => steps.push(other),
        }
        match steps.len() {
            0 => Transformation::Identity,
            1 => steps.remove(0),
            _ => Transformation::Composite(steps),
        }
    }

    /// Update the surface's current transform.
    pub fn apply<S: Surface + ?Sized>(&self, surface: &mut S) -> Result<()> {
        match self {
            Transformation::Identity => Ok(()),
            Transformation::Translate { x, y } => surface.translate(*x, *y),
            Transformation::Rotate(angle) => surface.rotate(*angle),
            Transformation::Scale { x, y } => surface.scale(*x, *y),
            Transformation::Matrix(matrix) => surface.transform(*matrix),
            Transformation::SetMatrix(matrix) => surface.set_transform(*matrix),
            Transformation::Composite(steps) => {
                for step in steps {
                    step.apply(surface)?;
                }
                Ok(())
            }
        }
    }

    /// The matrix this transformation multiplies onto its parent's.
    ///
    /// Returns `None` when the transformation contains a
    /// [`Transformation::SetMatrix`], which does not compose.
    pub fn to_matrix(&self) -> Option<Matrix> {
        match self {
            Transformation::Identity => Some(Matrix::IDENTITY),
            Transformation::Translate { x, y } => Some(Matrix::translation(*x, *y)),
            Transformation::Rotate(angle) => Some(Matrix::rotation(*angle)),
            Transformation::Scale { x, y } => Some(Matrix::scaling(*x, *y)),
            Transformation::Matrix(matrix) => Some(*matrix),
            Transformation::SetMatrix(_) => None,
            Transformation::Composite(steps) => steps
                .iter()
                .try_fold(Matrix::IDENTITY, |acc, step| Some(acc.then(step.to_matrix()?))),
        }
    }
}
