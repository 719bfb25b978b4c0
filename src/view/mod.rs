//! Presentational entity views.
//!
//! A view is mounted from the props the dashboard supplies, owns its sprite
//! animator (and through it the frame timer), and renders to a [`Node`] tree.
//! Dropping a view releases its timer.

mod animator;
mod character;
mod node;
mod source;
mod zone;

use serde::{Deserialize, Serialize};

pub use animator::SpriteAnimator;
pub use character::{CharacterProps, CharacterView};
pub use node::Node;
pub use source::SpriteSource;
pub use zone::{ZoneProps, ZoneView};

use crate::sheet::Style;

/// Screen placement supplied by the dashboard layout, in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Position {
    pub left: f64,
    pub top: f64,
}

/// Root style shared by every entity: absolute placement plus stacking order.
fn placement_style(position: &Position, z_index: i32) -> Style {
    Style::new()
        .set("left", format!("{}px", position.left))
        .set("top", format!("{}px", position.top))
        .set("z-index", z_index.to_string())
}

/// Any mounted entity.
pub enum EntityView {
    Character(CharacterView),
    Zone(ZoneView),
}

impl EntityView {
    pub fn label(&self) -> String {
        match self {
            EntityView::Character(view) => view.name().unwrap_or("?").to_string(),
            EntityView::Zone(view) => view.label().to_string(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            EntityView::Character(_) => "character",
            EntityView::Zone(_) => "zone",
        }
    }

    pub fn z_index(&self) -> i32 {
        match self {
            EntityView::Character(view) => view.props().z_index,
            EntityView::Zone(view) => view.props().z_index,
        }
    }

    pub fn animator(&self) -> Option<&SpriteAnimator> {
        match self {
            EntityView::Character(view) => view.animator(),
            EntityView::Zone(view) => view.animator(),
        }
    }

    /// Text shown instead of the sprite, when there is no sprite.
    pub fn fallback(&self) -> Option<String> {
        match self {
            EntityView::Character(view) => (!view.is_showing_sprite()).then(|| view.glyph()),
            EntityView::Zone(view) => (!view.is_showing_sprite()).then(|| view.fallback_emoji().to_string()),
        }
    }

    pub fn mark_broken(&mut self) {
        match self {
            EntityView::Character(view) => view.mark_broken(),
            EntityView::Zone(view) => view.mark_broken(),
        }
    }

    pub fn render(&self) -> Node {
        match self {
            EntityView::Character(view) => view.render(),
            EntityView::Zone(view) => view.render(),
        }
    }

    /// Render with every animator sampled at `frame_for(animator)` instead of its live frame.
    pub fn render_with(&self, frame_for: impl Fn(&SpriteAnimator) -> usize) -> Node {
        match self {
            EntityView::Character(view) => view.render_with(frame_for),
            EntityView::Zone(view) => view.render_with(frame_for),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placement_style() {
        let style = placement_style(
            &Position {
                left: 12.0,
                top: 40.5,
            },
            3,
        );
        assert_eq!(style.to_string(), "left: 12px; top: 40.5px; z-index: 3;");
    }

    #[test]
    fn test_position_defaults_missing_fields() {
        let pos: Position = serde_yaml::from_str("left: 5").unwrap();
        assert_eq!(pos, Position { left: 5.0, top: 0.0 });
    }
}
