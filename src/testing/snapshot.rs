//! Snapshot rendering helpers.
//!
//! Turn a recorded command log into plain text for snapshot assertions: one
//! command per line, indented two spaces per open `save`.

use crate::canvas::scene::{apply_all, Scene};
use crate::error::Result;

use super::recorder::{Command, RecordingSurface};

/// Render a command log as indented text.
///
/// `save` opens a level after its own line and `restore` closes one before
/// its own line, so each scope's body sits one level deeper than its
/// brackets. Lines are joined with `'\n'`; there is no trailing newline.
pub fn commands_to_string(commands: &[Command]) -> String {
    let mut depth = 0usize;
    let mut lines = Vec::with_capacity(commands.len());
    for command in commands {
        if matches!(command, Command::Restore) {
            depth = depth.saturating_sub(1);
        }
        lines.push(format!("{}{}", "  ".repeat(depth), command));
        if matches!(command, Command::Save) {
            depth += 1;
        }
    }
    lines.join("\n")
}

/// Render scenes onto a fresh [`RecordingSurface`] and return the log as text.
pub fn render_to_string(scenes: &[Scene]) -> Result<String> {
    let mut surface = RecordingSurface::new();
    apply_all(&mut surface, scenes)?;
    Ok(commands_to_string(surface.commands()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{Shape, Style, Transformation};
    use crate::color::Color;
    use crate::geometry::{Point, Rect};

    #[test]
    fn empty_log_is_empty_string() {
        assert_eq!(commands_to_string(&[]), "");
    }

    #[test]
    fn nested_scopes_indent() {
        let scene = Scene::group([
            Scene::leaf(Shape::FillRect(Rect::new(0.0, 0.0, 4.0, 4.0)))
                .with_style(Style::FillColor(Color::rgb(255, 0, 0))),
            Scene::leaf(Shape::text("ok", Point::new(1.0, 2.0))),
        ])
        .with_transform(Transformation::translate(10.0, 10.0));

        insta::assert_snapshot!(render_to_string(&[scene]).unwrap(), @r#"
        save
          translate 10 10
          save
            fill_style #ff0000
            fill_rect 0 0 4 4
          restore
          save
            fill_text "ok" 1 2
          restore
        restore
        "#);
    }

    #[test]
    fn unbalanced_restore_does_not_underflow() {
        let text = commands_to_string(&[Command::Restore, Command::Fill]);
        assert_eq!(text, "restore\nfill");
    }
}
