//! Scene manifests: the entities a dashboard wants drawn.
//!
//! ```yaml
//! title: Town
//! entities:
//!   - kind: character
//!     name: mayor
//!     status: WORKING
//!     sprite: sprites/mayor.png
//!     position: { left: 120, top: 80 }
//!     z_index: 3
//!   - kind: zone
//!     label: Refinery
//!     sprite: sprites/refinery.png
//!     cols: 3
//!     rows: 4
//!     fallback_emoji: "🏭"
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

use crate::clock::ClockMode;
use crate::config::Config;
use crate::view::{CharacterProps, CharacterView, EntityView, SpriteSource, ZoneProps, ZoneView};

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("unsupported scene format '{0}': expected .yaml, .yml or .json")]
    UnsupportedFormat(String),
    #[error("failed to read scene {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid YAML scene")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid JSON scene")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneFormat {
    Yaml,
    Json,
}

impl SceneFormat {
    pub fn from_path(path: &Path) -> Result<Self, SceneError> {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "yaml" | "yml" => Ok(SceneFormat::Yaml),
            "json" => Ok(SceneFormat::Json),
            _ => Err(SceneError::UnsupportedFormat(ext)),
        }
    }
}

/// One entity entry, tagged by `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum EntitySpec {
    Character(CharacterProps),
    Zone(ZoneProps),
}

impl EntitySpec {
    fn sprite_mut(&mut self) -> &mut Option<String> {
        match self {
            EntitySpec::Character(props) => &mut props.sprite,
            EntitySpec::Zone(props) => &mut props.sprite,
        }
    }
}

#[derive(Debug, Default, Deserialize, Serialize)]
struct SceneFile {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    entities: Vec<EntitySpec>,
}

#[derive(Debug, Clone)]
pub struct Scene {
    pub title: Option<String>,
    /// Directory relative sprite paths resolve against.
    pub base_dir: PathBuf,
    pub entities: Vec<EntitySpec>,
}

impl Scene {
    pub fn load(path: &Path) -> Result<Self, SceneError> {
        let format = SceneFormat::from_path(path)?;
        let content = fs::read_to_string(path).map_err(|source| SceneError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let base_dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let scene = Self::parse(&content, format, base_dir)?;
        debug!(path = %path.display(), entities = scene.entities.len(), "scene:loaded");
        Ok(scene)
    }

    pub fn parse(content: &str, format: SceneFormat, base_dir: PathBuf) -> Result<Self, SceneError> {
        let file: SceneFile = match format {
            SceneFormat::Yaml if content.trim().is_empty() => SceneFile::default(),
            SceneFormat::Yaml => serde_yaml::from_str(content)?,
            SceneFormat::Json => serde_json::from_str(content)?,
        };
        Ok(Self {
            title: file.title,
            base_dir,
            entities: file.entities,
        })
    }

    /// Replace local sprite paths with base64 `data:` URIs so the rendered page
    /// is self-contained. Sprites that can't be read are left alone and will
    /// fall back at mount.
    pub fn inline_sprites(&mut self) {
        for entity in &mut self.entities {
            let sprite = entity.sprite_mut();
            let Some(locator) = sprite.as_deref() else {
                continue;
            };
            let source = SpriteSource::parse(locator, &self.base_dir);
            if source.local_path().is_none() || !source.is_available() {
                continue;
            }
            match source.to_inline() {
                Ok(inline) => *sprite = Some(inline.locator().to_string()),
                Err(e) => warn!(sprite = locator, error = %e, "scene:failed to inline sprite"),
            }
        }
    }

    /// Mount a live view for every entity, in manifest order.
    pub fn mount(&self, config: &Config) -> Vec<EntityView> {
        self.mount_with(config, ClockMode::Live)
    }

    /// Mount views whose clocks never start, for one-shot output that samples
    /// frames with `FrameSequence::frame_at` or only reads resolved state.
    pub fn snapshot(&self, config: &Config) -> Vec<EntityView> {
        self.mount_with(config, ClockMode::Frozen)
    }

    fn mount_with(&self, config: &Config, mode: ClockMode) -> Vec<EntityView> {
        self.entities
            .iter()
            .cloned()
            .map(|entity| match entity {
                EntitySpec::Character(props) => EntityView::Character(CharacterView::mount(
                    props,
                    config,
                    &self.base_dir,
                    mode,
                )),
                EntitySpec::Zone(props) => {
                    EntityView::Zone(ZoneView::mount(props, config, &self.base_dir))
                }
            })
            .collect()
    }
}
