//! Scene graph renderer.
//!
//! A [`Scene`] is an immutable tree of drawable leaves and groups. Every node
//! owns a style/transform scope: [`apply`] saves the surface state, applies
//! the node's styles and transform, draws, and restores. Restoring is tied to
//! a [`SaveGuard`], so the state stack stays balanced on every exit path,
//! including errors from the host surface half-way through a subtree.

use std::ops::{Deref, DerefMut};

use crate::error::Result;

use super::shape::Shape;
use super::style::{apply_styles, Style};
use super::surface::Surface;
use super::transform::Transformation;

// ---------------------------------------------------------------------------
// SaveGuard
// ---------------------------------------------------------------------------

/// Scoped `save`/`restore` around a surface.
///
/// Created by saving; restores when dropped. Use [`SaveGuard::finish`] on the
/// success path to get the result of `restore` back. A failing restore during
/// drop can only be logged.
pub struct SaveGuard<'a, S: Surface + ?Sized> {
    surface: &'a mut S,
    armed: bool,
}

impl<'a, S: Surface + ?Sized> SaveGuard<'a, S> {
    /// Save the surface state. No guard exists if `save` fails.
    pub fn new(surface: &'a mut S) -> Result<Self> {
        surface.save()?;
        Ok(Self { surface, armed: true })
    }

    /// Restore now and report the outcome.
    pub fn finish(mut self) -> Result<()> {
        self.armed = false;
        self.surface.restore()
    }
}

impl<S: Surface + ?Sized> Deref for SaveGuard<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        &*self.surface
    }
}

impl<S: Surface + ?Sized> DerefMut for SaveGuard<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        &mut *self.surface
    }
}

impl<S: Surface + ?Sized> Drop for SaveGuard<'_, S> {
    fn drop(&mut self) {
        if self.armed {
            if let Err(err) = self.surface.restore() {
                tracing::error!(%err, "failed to restore surface state");
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Scene
// ---------------------------------------------------------------------------

/// A tree describing what to draw.
#[derive(Clone, Debug, PartialEq)]
pub enum Scene {
    /// One shape under a local style/transform scope.
    Leaf { styles: Vec<Style>, transform: Transformation, shape: Shape },
    /// Child scenes under a shared style/transform scope, drawn in order.
    Group { styles: Vec<Style>, transform: Transformation, children: Vec<Scene> },
}

impl Scene {
    /// An unstyled, untransformed leaf.
    pub fn leaf(shape: Shape) -> Self {
        Scene::Leaf { styles: Vec::new(), transform: Transformation::Identity, shape }
    }

    /// An unstyled, untransformed group.
    pub fn group(children: impl IntoIterator<Item = Scene>) -> Self {
        Scene::Group {
            styles: Vec::new(),
            transform: Transformation::Identity,
            children: children.into_iter().collect(),
        }
    }

    /// Append a style to this node's scope (builder).
    pub fn with_style(mut self, style: Style) -> Self {
        self.styles_mut().push(style);
        self
    }

    /// Append several styles to this node's scope (builder).
    pub fn with_styles(mut self, styles: impl IntoIterator<Item = Style>) -> Self {
        self.styles_mut().extend(styles);
        self
    }

    /// Follow the node's transform with `transform` (builder).
    pub fn with_transform(mut self, transform: Transformation) -> Self {
        let slot = match &mut self {
            Scene::Leaf { transform: slot, .. } | Scene::Group { transform: slot, .. } => slot,
        };
        *slot = std::mem::take(slot).then(transform);
        self
    }

    /// Styles scoped to this node.
    pub fn styles(&self) -> &[Style] {
        match self {
            Scene::Leaf { styles, .. } | Scene::Group { styles, .. } => styles,
        }
    }

    /// Transform scoped to this node.
    pub fn transform(&self) -> &Transformation {
        match self {
            Scene::Leaf { transform, .. } | Scene::Group { transform, .. } => transform,
        }
    }

    /// Number of nodes in the tree, this one included.
    pub fn node_count(&self) -> usize {
        match self {
            Scene::Leaf { .. } => 1,
            Scene::Group { children, .. } => 1 + children.iter().map(Scene::node_count).sum::<usize>(),
        }
    }

    fn styles_mut(&mut self) -> &mut Vec<Style> {
        match self {
            Scene::Leaf { styles, .. } | Scene::Group { styles, .. } => styles,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Scene::Leaf { .. } => "leaf",
            Scene::Group { .. } => "group",
        }
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Render one scene node inside its own save/restore scope.
///
/// Order: save, styles in sequence, transform, then the shape (leaf) or every
/// child in sequence (group), then restore. The first host error stops the
/// walk and is returned; every scope opened so far is still restored.
pub fn apply<S: Surface + ?Sized>(surface: &mut S, scene: &Scene) -> Result<()> {
    tracing::trace!(node = scene.kind(), styles = scene.styles().len(), "applying scene node");

    let mut scope = SaveGuard::new(surface)?;
    apply_styles(&mut *scope, scene.styles())?;
    scene.transform().apply(&mut *scope)?;
    match scene {
        Scene::Leaf { shape, .. } => shape.apply(&mut *scope)?,
        Scene::Group { children, .. } => apply_all(&mut *scope, children)?,
    }
    scope.finish()
}

/// Render scenes in sequence, each in its own scope.
pub fn apply_all<S: Surface + ?Sized>(surface: &mut S, scenes: &[Scene]) -> Result<()> {
    for scene in scenes {
        apply(surface, scene)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::geometry::{Point, Rect};
    use crate::testing::{Command, RecordingSurface};
    use pretty_assertions::assert_eq;

    fn rect_leaf(x: f64, y: f64) -> Scene {
        Scene::leaf(Shape::FillRect(Rect::new(x, y, 1.0, 1.0)))
    }

    fn count(surface: &RecordingSurface, wanted: &Command) -> usize {
        surface.commands().iter().filter(|c| *c == wanted).count()
    }

    #[test]
    fn leaf_order_save_styles_transform_shape_restore() {
        let mut surface = RecordingSurface::new();
        let scene = rect_leaf(0.0, 0.0)
            .with_style(Style::FillColor(Color::WHITE))
            .with_style(Style::LineWidth(2.0))
            .with_transform(Transformation::translate(3.0, 4.0));
        apply(&mut surface, &scene).unwrap();
        assert_eq!(
            surface.commands(),
            &[
                Command::Save,
                Command::SetFillStyle(Color::WHITE),
                Command::SetLineWidth(2.0),
                Command::Translate(3.0, 4.0),
                Command::FillRect(Rect::new(0.0, 0.0, 1.0, 1.0)),
                Command::Restore,
            ]
        );
    }

    #[test]
    fn group_translate_applied_once_for_both_leaves() {
        let mut surface = RecordingSurface::new();
        let scene = Scene::group([rect_leaf(0.0, 0.0), rect_leaf(5.0, 5.0)])
            .with_transform(Transformation::translate(10.0, 10.0));
        apply(&mut surface, &scene).unwrap();

        assert_eq!(count(&surface, &Command::Save), 3);
        assert_eq!(count(&surface, &Command::Restore), 3);
        assert_eq!(count(&surface, &Command::Translate(10.0, 10.0)), 1);
        assert_eq!(
            surface.commands(),
            &[
                Command::Save,
                Command::Translate(10.0, 10.0),
                Command::Save,
                Command::FillRect(Rect::new(0.0, 0.0, 1.0, 1.0)),
                Command::Restore,
                Command::Save,
                Command::FillRect(Rect::new(5.0, 5.0, 1.0, 1.0)),
                Command::Restore,
                Command::Restore,
            ]
        );
    }

    #[test]
    fn styles_do_not_leak_to_siblings_or_parent() {
        let mut surface = RecordingSurface::new();
        let before = surface.state().clone();
        let scene = Scene::group([
            rect_leaf(0.0, 0.0).with_style(Style::FillColor(Color::rgb(255, 0, 0))),
            rect_leaf(1.0, 1.0),
        ])
        .with_style(Style::LineWidth(7.0));
        apply(&mut surface, &scene).unwrap();
        assert_eq!(surface.state(), &before);
        assert_eq!(surface.depth(), 0);
    }

    #[test]
    fn apply_all_isolates_top_level_scenes() {
        let mut surface = RecordingSurface::new();
        let scenes = vec![
            rect_leaf(0.0, 0.0).with_transform(Transformation::scale(2.0, 2.0)),
            rect_leaf(1.0, 1.0),
        ];
        apply_all(&mut surface, &scenes).unwrap();
        assert_eq!(count(&surface, &Command::Save), 2);
        assert_eq!(surface.depth(), 0);
        assert!(surface.state().transform.is_identity());
    }

    #[test]
    fn children_render_in_sequence_order() {
        let mut surface = RecordingSurface::new();
        let children: Vec<Scene> = (0..5).map(|i| rect_leaf(f64::from(i), 0.0)).collect();
        apply(&mut surface, &Scene::group(children)).unwrap();
        let xs: Vec<f64> = surface
            .commands()
            .iter()
            .filter_map(|c| match c {
                Command::FillRect(r) => Some(r.x),
                _ => None,
            })
            .collect();
        assert_eq!(xs, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn failing_shape_still_restores_every_scope() {
        let mut surface = RecordingSurface::new();
        surface.fail_on("stroke_rect");
        let scene = Scene::group([
            rect_leaf(0.0, 0.0),
            Scene::group([Scene::leaf(Shape::StrokeRect(Rect::new(0.0, 0.0, 1.0, 1.0)))])
                .with_transform(Transformation::rotate(1.0)),
            rect_leaf(9.0, 9.0),
        ])
        .with_style(Style::GlobalAlpha(0.5));

        let before = surface.state().clone();
        let err = apply(&mut surface, &scene).unwrap_err();
        assert_eq!(err, crate::Error::surface("stroke_rect", "injected failure"));
        assert_eq!(surface.depth(), 0);
        assert_eq!(surface.state(), &before);
        // The third child is never reached.
        assert!(!surface.commands().contains(&Command::FillRect(Rect::new(9.0, 9.0, 1.0, 1.0))));
        assert_eq!(count(&surface, &Command::Save), count(&surface, &Command::Restore));
    }

    #[test]
    fn failing_save_opens_no_scope() {
        let mut surface = RecordingSurface::new();
        surface.fail_on("save");
        assert!(apply(&mut surface, &rect_leaf(0.0, 0.0)).is_err());
        assert!(surface.commands().is_empty());
    }

    #[test]
    fn failing_restore_is_reported_by_finish() {
        let mut surface = RecordingSurface::new();
        surface.fail_on("restore");
        let err = apply(&mut surface, &rect_leaf(0.0, 0.0)).unwrap_err();
        assert_eq!(err, crate::Error::surface("restore", "injected failure"));
    }

    #[test]
    fn guard_restores_on_drop() {
        let mut surface = RecordingSurface::new();
        {
            let mut scope = SaveGuard::new(&mut surface).unwrap();
            scope.set_line_width(9.0).unwrap();
            assert_eq!(scope.depth(), 1);
        }
        assert_eq!(surface.depth(), 0);
        assert_eq!(surface.state().line_width, 1.0);
    }

    #[test]
    fn nested_transforms_compose_through_the_stack() {
        let mut surface = RecordingSurface::new();
        let scene = Scene::group([Scene::leaf(Shape::text("x", Point::new(1.0, 1.0)))
            .with_transform(Transformation::scale(2.0, 2.0))])
        .with_transform(Transformation::translate(10.0, 0.0));
        apply(&mut surface, &scene).unwrap();
        let device = surface.device_points();
        assert_eq!(device, vec![Point::new(12.0, 2.0)]);
    }

    #[test]
    fn builders_and_node_count() {
        let scene = Scene::group([rect_leaf(0.0, 0.0), Scene::group([rect_leaf(1.0, 1.0)])])
            .with_styles([Style::LineWidth(1.0), Style::LineWidth(2.0)])
            .with_transform(Transformation::translate(1.0, 0.0))
            .with_transform(Transformation::rotate(0.25));
        assert_eq!(scene.node_count(), 4);
        assert_eq!(scene.styles().len(), 2);
        assert_eq!(
            scene.transform(),
            &Transformation::Composite(vec![Transformation::translate(1.0, 0.0), Transformation::rotate(0.25)])
        );
    }
}
