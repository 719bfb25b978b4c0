//! Agent character: an animated sprite, or an initial when there is no sprite.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

use super::animator::{AnimatorProps, SpriteAnimator};
use super::node::{Element, Node};
use super::source::SpriteSource;
use super::{Position, placement_style};
use crate::clock::ClockMode;
use crate::config::{Config, StatusIcons};
use crate::policy::{Resolved, RowPolicy};
use crate::status::AnimationState;

/// Per-character input from the dashboard.
///
/// Sheet fields override the `sprite` config section for this character only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterProps {
    pub name: Option<String>,
    pub role: Option<String>,
    pub status: Option<AnimationState>,
    pub sprite: Option<String>,
    pub title: Option<String>,
    pub position: Position,
    #[serde(alias = "zIndex")]
    pub z_index: i32,
    #[serde(alias = "frameWidth")]
    pub frame_width: Option<u32>,
    #[serde(alias = "frameHeight")]
    pub frame_height: Option<u32>,
    #[serde(alias = "frameCount")]
    pub frame_count: Option<usize>,
    pub fps: Option<u32>,
    pub scale: Option<f64>,
}

/// First character of the name, or `?` when there is no usable name.
pub fn fallback_glyph(name: Option<&str>) -> String {
    name.and_then(|n| n.trim().chars().next())
        .map(String::from)
        .unwrap_or_else(|| "?".to_string())
}

pub struct CharacterView {
    props: CharacterProps,
    status: AnimationState,
    resolved: Resolved,
    rows: RowPolicy,
    fps: u32,
    icons: StatusIcons,
    animator: Option<SpriteAnimator>,
}

impl CharacterView {
    /// Mount a character. Never fails: anything that prevents showing the
    /// sprite (no locator, missing file, unusable sheet) mounts the glyph instead.
    ///
    /// A [`ClockMode::Frozen`] mount resolves everything but never starts the clock.
    pub fn mount(
        props: CharacterProps,
        config: &Config,
        base_dir: &Path,
        mode: ClockMode,
    ) -> Self {
        let status = props
            .status
            .clone()
            .unwrap_or_else(|| AnimationState::Other(String::new()));
        let fps = props.fps.unwrap_or_else(|| config.sprite.fps());
        let resolved = config.rows.resolve(&status, fps);

        let animator = props
            .sprite
            .as_deref()
            .map(|locator| SpriteSource::parse(locator, base_dir))
            .filter(|source| {
                let available = source.is_available();
                if !available {
                    debug!(
                        name = ?props.name,
                        sprite = source.locator(),
                        "character:sprite unavailable, using glyph"
                    );
                }
                available
            })
            .and_then(|source| {
                let sheet = config
                    .sprite
                    .sheet_with(props.frame_width, props.frame_height, props.frame_count)
                    .inspect_err(|e| {
                        warn!(name = ?props.name, error = %e, "character:invalid sheet, using glyph")
                    })
                    .ok()?;
                let look = config.sprite.look_with(props.scale);
                Some(SpriteAnimator::mount(AnimatorProps {
                    src: source.locator().to_string(),
                    geometry: sheet.into(),
                    row: resolved.row,
                    playback: resolved.playback,
                    look,
                }, mode))
            });

        Self {
            props,
            status,
            resolved,
            rows: config.rows.clone(),
            fps,
            icons: config.status_icons.clone(),
            animator,
        }
    }

    pub fn props(&self) -> &CharacterProps {
        &self.props
    }

    pub fn name(&self) -> Option<&str> {
        self.props.name.as_deref().filter(|n| !n.trim().is_empty())
    }

    pub fn status(&self) -> &AnimationState {
        &self.status
    }

    pub fn resolved(&self) -> Resolved {
        self.resolved
    }

    pub fn animator(&self) -> Option<&SpriteAnimator> {
        self.animator.as_ref()
    }

    pub fn is_showing_sprite(&self) -> bool {
        self.animator.is_some()
    }

    pub fn glyph(&self) -> String {
        fallback_glyph(self.name())
    }

    /// Switch activity state. The row follows the policy for the new state
    /// alone; the timer is only recreated if playback changed.
    pub fn set_status(&mut self, status: AnimationState) {
        self.resolved = self.rows.resolve(&status, self.fps);
        if let Some(animator) = &mut self.animator {
            let props = AnimatorProps {
                row: self.resolved.row,
                playback: self.resolved.playback,
                ..animator.props().clone()
            };
            animator.set_props(props);
        }
        self.props.status = Some(status.clone());
        self.status = status;
    }

    /// The image failed to load: drop the animator (and its timer) and show the glyph.
    pub fn mark_broken(&mut self) {
        if let Some(animator) = self.animator.take() {
            debug!(name = ?self.props.name, sprite = %animator.props().src, "character:sprite broken");
        }
    }

    fn indicator(&self) -> Option<&str> {
        if self.status.is_active() {
            Some(self.icons.working())
        } else if self.status.is_idle() {
            Some(self.icons.idle())
        } else {
            None
        }
    }

    pub fn render(&self) -> Node {
        self.render_with(|animator| animator.frame())
    }

    pub fn render_with(&self, frame_for: impl Fn(&SpriteAnimator) -> usize) -> Node {
        let mut root = Element::new("div")
            .class("character")
            .style(placement_style(&self.props.position, self.props.z_index))
            .attr_opt("title", self.props.title.as_deref());
        if self.status.is_idle() {
            root = root.class("character-idle");
        }
        if let Some(role) = self.props.role.as_deref() {
            root = root.attr("data-role", role);
        }

        let body = match &self.animator {
            Some(animator) => animator.render_at(frame_for(animator)),
            None => Element::new("div")
                .class("character-avatar")
                .text(self.glyph())
                .into(),
        };
        root = root.child(Element::new("div").class("character-sprite-container").child(body));

        if let Some(icon) = self.indicator() {
            root = root.child(Element::new("div").class("status-indicator").text(icon));
        }

        root.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::Playback;
    use std::fs;
    use tempfile::TempDir;

    fn props(name: &str, status: &str, sprite: Option<&str>) -> CharacterProps {
        CharacterProps {
            name: Some(name.to_string()),
            status: Some(AnimationState::parse(status)),
            sprite: sprite.map(String::from),
            title: Some(format!("{} tooltip", name)),
            position: Position {
                left: 10.0,
                top: 20.0,
            },
            z_index: 2,
            ..Default::default()
        }
    }

    fn sprite_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("mayor.png"), b"png").unwrap();
        dir
    }

    #[test]
    fn test_fallback_glyph() {
        assert_eq!(fallback_glyph(Some("mayor")), "m");
        assert_eq!(fallback_glyph(Some("Émile")), "É");
        assert_eq!(fallback_glyph(Some("  ")), "?");
        assert_eq!(fallback_glyph(None), "?");
    }

    #[test]
    fn test_no_sprite_renders_glyph_without_timer() {
        let view = CharacterView::mount(
            props("Witness", "WORKING", None),
            &Config::default(),
            Path::new("."),
            ClockMode::Live,
        );
        assert!(view.animator().is_none());

        let node = view.render();
        assert_eq!(
            node.find_class("character-avatar").unwrap().children(),
            &[Node::Text("W".to_string())]
        );
        assert!(node.find_class("sprite-animator").is_none());
    }

    #[test]
    fn test_missing_sprite_file_falls_back() {
        let dir = TempDir::new().unwrap();
        let view = CharacterView::mount(
            props("mayor", "WORKING", Some("missing.png")),
            &Config::default(),
            dir.path(),
            ClockMode::Live,
        );
        assert!(!view.is_showing_sprite());
        assert!(view.render().to_html().contains("character-avatar"));
    }

    #[test]
    fn test_working_plays_action_row() {
        let dir = sprite_dir();
        let view = CharacterView::mount(
            props("mayor", "WORKING", Some("mayor.png")),
            &Config::default(),
            dir.path(),
            ClockMode::Live,
        );
        let animator = view.animator().unwrap();
        assert_eq!(animator.props().row, 1);
        assert_eq!(animator.props().playback, Playback::Playing { fps: 8 });
        assert!(animator.is_ticking());

        let node = view.render();
        let root = node.find_class("character").unwrap();
        assert!(!root.has_class("character-idle"));
        assert_eq!(root.get_attr("title"), Some("mayor tooltip"));
        assert_eq!(root.get_style().get("z-index"), Some("2"));
        assert_eq!(
            node.find_class("status-indicator").unwrap().children(),
            &[Node::Text("🔨".to_string())]
        );
    }

    #[test]
    fn test_idle_is_paused_at_rest_frame() {
        let dir = sprite_dir();
        let view = CharacterView::mount(
            props("mayor", "IDLE", Some("mayor.png")),
            &Config::default(),
            dir.path(),
            ClockMode::Live,
        );
        let animator = view.animator().unwrap();
        assert!(!animator.is_ticking());
        assert_eq!(animator.frame(), 0);
        assert_eq!(animator.props().row, 0);

        let node = view.render();
        assert!(node.find_class("character").unwrap().has_class("character-idle"));
        assert_eq!(node.text_content(), "💤");
    }

    #[test]
    fn test_other_status_plays_row_zero_without_indicator() {
        let dir = sprite_dir();
        let view = CharacterView::mount(
            props("mayor", "REVIEWING", Some("mayor.png")),
            &Config::default(),
            dir.path(),
            ClockMode::Live,
        );
        assert_eq!(view.resolved().row, 0);
        assert!(view.animator().unwrap().is_ticking());
        assert!(view.render().find_class("status-indicator").is_none());
    }

    #[test]
    fn test_set_status_follows_policy_regardless_of_previous_state() {
        let dir = sprite_dir();
        let mut view = CharacterView::mount(
            props("mayor", "IDLE", Some("mayor.png")),
            &Config::default(),
            dir.path(),
            ClockMode::Live,
        );
        view.set_status(AnimationState::Merging);
        view.set_status(AnimationState::Working);
        let animator = view.animator().unwrap();
        assert_eq!(animator.props().row, 1);
        assert!(animator.is_ticking());

        view.set_status(AnimationState::Idle);
        assert!(!view.animator().unwrap().is_ticking());
        assert_eq!(view.animator().unwrap().frame(), 0);
    }

    #[test]
    fn test_mark_broken_stops_timer_and_shows_glyph() {
        let dir = sprite_dir();
        let mut view = CharacterView::mount(
            props("mayor", "WORKING", Some("mayor.png")),
            &Config::default(),
            dir.path(),
            ClockMode::Live,
        );
        assert!(view.is_showing_sprite());
        view.mark_broken();
        assert!(!view.is_showing_sprite());
        assert!(view.render().find_class("character-avatar").is_some());
    }

    #[test]
    fn test_frozen_mount_resolves_without_ticking() {
        let dir = sprite_dir();
        let view = CharacterView::mount(
            props("mayor", "WORKING", Some("mayor.png")),
            &Config::default(),
            dir.path(),
            ClockMode::Frozen,
        );
        let animator = view.animator().unwrap();
        assert!(!animator.is_ticking());
        assert_eq!(animator.props().row, 1);
        assert_eq!(animator.sequence().fps(), 8);
    }

    #[test]
    fn test_unusable_scale_override_uses_config_scale() {
        let dir = sprite_dir();
        let view = CharacterView::mount(
            CharacterProps {
                scale: Some(f64::NAN),
                ..props("mayor", "IDLE", Some("mayor.png"))
            },
            &Config::default(),
            dir.path(),
            ClockMode::Live,
        );
        assert_eq!(
            view.animator().unwrap().style().get("transform"),
            Some("scale(2)")
        );
    }

    #[test]
    fn test_invalid_sheet_override_falls_back() {
        let dir = sprite_dir();
        let mut p = props("mayor", "WORKING", Some("mayor.png"));
        p.frame_count = Some(0);
        let view = CharacterView::mount(p, &Config::default(), dir.path(), ClockMode::Live);
        assert!(!view.is_showing_sprite());
    }

    #[test]
    fn test_sheet_overrides_apply() {
        let dir = sprite_dir();
        let mut p = props("mayor", "IDLE", Some("mayor.png"));
        p.frame_width = Some(48);
        p.scale = Some(3.0);
        let view = CharacterView::mount(p, &Config::default(), dir.path(), ClockMode::Live);
        let style = view.animator().unwrap().style();
        assert_eq!(style.get("width"), Some("48px"));
        assert_eq!(style.get("height"), Some("32px"));
        assert_eq!(style.get("transform"), Some("scale(3)"));
    }

    #[test]
    fn test_camel_case_props() {
        let p: CharacterProps =
            serde_json::from_str(r#"{"name":"mayor","zIndex":4,"frameWidth":16,"status":"merging"}"#)
                .unwrap();
        assert_eq!(p.z_index, 4);
        assert_eq!(p.frame_width, Some(16));
        assert_eq!(p.status, Some(AnimationState::Merging));
    }
}
