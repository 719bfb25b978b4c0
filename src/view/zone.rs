//! Zone (building/location): a static frame from a grid sheet, or an emoji.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

use super::animator::{AnimatorProps, SpriteAnimator};
use super::node::{Element, Node};
use super::source::SpriteSource;
use super::{Position, placement_style};
use crate::clock::ClockMode;
use crate::config::Config;
use crate::policy::{Playback, RestFrame};
use crate::sheet::{GridSheet, Style};

const DEFAULT_FALLBACK_EMOJI: &str = "🏠";

fn one() -> usize {
    1
}

/// Per-zone input from the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneProps {
    pub label: String,
    #[serde(default)]
    pub sprite: Option<String>,
    #[serde(default = "one")]
    pub cols: usize,
    #[serde(default = "one")]
    pub rows: usize,
    #[serde(default)]
    pub position: Position,
    #[serde(default, alias = "zIndex")]
    pub z_index: i32,
    #[serde(default, alias = "fallbackEmoji")]
    pub fallback_emoji: Option<String>,
}

impl ZoneProps {
    #[cfg(test)]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            sprite: None,
            cols: 1,
            rows: 1,
            position: Position::default(),
            z_index: 0,
            fallback_emoji: None,
        }
    }
}

pub struct ZoneView {
    props: ZoneProps,
    size: u32,
    animator: Option<SpriteAnimator>,
}

impl ZoneView {
    /// Mount a zone. Zones never animate: the first frame of row 0 is held,
    /// so no timer is ever started.
    pub fn mount(props: ZoneProps, config: &Config, base_dir: &Path) -> Self {
        let animator = props
            .sprite
            .as_deref()
            .map(|locator| SpriteSource::parse(locator, base_dir))
            .filter(|source| {
                let available = source.is_available();
                if !available {
                    debug!(
                        label = %props.label,
                        sprite = source.locator(),
                        "zone:sprite unavailable, using emoji"
                    );
                }
                available
            })
            .and_then(|source| {
                let sheet = GridSheet::new(props.cols, props.rows)
                    .inspect_err(|e| {
                        warn!(label = %props.label, error = %e, "zone:invalid sheet, using emoji")
                    })
                    .ok()?;
                Some(SpriteAnimator::mount(AnimatorProps {
                    src: source.locator().to_string(),
                    geometry: sheet.into(),
                    row: 0,
                    playback: Playback::Paused {
                        rest: RestFrame::First,
                    },
                    look: config.zone.look(),
                }, ClockMode::Frozen))
            });

        Self {
            props,
            size: config.zone.size(),
            animator,
        }
    }

    pub fn props(&self) -> &ZoneProps {
        &self.props
    }

    pub fn label(&self) -> &str {
        &self.props.label
    }

    pub fn animator(&self) -> Option<&SpriteAnimator> {
        self.animator.as_ref()
    }

    pub fn is_showing_sprite(&self) -> bool {
        self.animator.is_some()
    }

    pub fn fallback_emoji(&self) -> &str {
        self.props
            .fallback_emoji
            .as_deref()
            .filter(|e| !e.is_empty())
            .unwrap_or(DEFAULT_FALLBACK_EMOJI)
    }

    /// The image failed to load: switch to the emoji for the rest of this view's life.
    pub fn mark_broken(&mut self) {
        if let Some(animator) = self.animator.take() {
            debug!(label = %self.props.label, sprite = %animator.props().src, "zone:sprite broken");
        }
    }

    pub fn render(&self) -> Node {
        self.render_with(|animator| animator.frame())
    }

    pub fn render_with(&self, frame_for: impl Fn(&SpriteAnimator) -> usize) -> Node {
        let body: Node = match &self.animator {
            Some(animator) => animator.render_at(frame_for(animator)),
            None => Element::new("div")
                .class("zone-fallback")
                .attr("aria-label", self.props.label.as_str())
                .child(Element::new("span").text(self.fallback_emoji()))
                .into(),
        };

        let viewport = Element::new("div")
            .class("zone-sprite")
            .style(
                Style::new()
                    .set("width", format!("{}px", self.size))
                    .set("height", format!("{}px", self.size)),
            )
            .child(body);

        Element::new("div")
            .class("zone")
            .style(placement_style(&self.props.position, self.props.z_index))
            .child(viewport)
            .child(Element::new("span").class("zone-label").text(self.props.label.as_str()))
            .into()
    }
}
