//! User and project configuration.
//!
//! Two YAML files are layered, project over global:
//! - `~/.config/spritemux/config.yaml` (or `$XDG_CONFIG_HOME/spritemux/config.yaml`)
//! - `.spritemux.yaml` in the current directory
//!
//! An explicit `--config` path replaces the project file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::policy::RowPolicy;
use crate::sheet::{PixelSheet, SheetError, SheetLook};

const PROJECT_CONFIG_FILE: &str = ".spritemux.yaml";

const DEFAULT_FRAME_WIDTH: u32 = 32;
const DEFAULT_FRAME_HEIGHT: u32 = 32;
const DEFAULT_FRAME_COUNT: usize = 4;
const DEFAULT_FPS: u32 = 8;
const DEFAULT_SCALE: f64 = 2.0;
const DEFAULT_ZONE_SIZE: u32 = 128;
const DEFAULT_BLEND_MODE: &str = "multiply";

const DEFAULT_WORKING_ICON: &str = "🔨";
const DEFAULT_IDLE_ICON: &str = "💤";

/// Character sprite defaults (strip sheets with a fixed frame size).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpriteConfig {
    pub frame_width: Option<u32>,
    pub frame_height: Option<u32>,
    pub frame_count: Option<usize>,
    pub fps: Option<u32>,
    pub scale: Option<f64>,
    pub shadow: Option<bool>,
}

impl SpriteConfig {
    pub fn fps(&self) -> u32 {
        self.fps.unwrap_or(DEFAULT_FPS)
    }

    /// Configured scale; anything that isn't finite and positive means the default.
    pub fn scale(&self) -> f64 {
        self.scale
            .filter(|s| is_valid_scale(*s))
            .unwrap_or(DEFAULT_SCALE)
    }

    pub fn shadow(&self) -> bool {
        self.shadow.unwrap_or(true)
    }

    #[cfg(test)]
    pub fn sheet(&self) -> Result<PixelSheet, SheetError> {
        self.sheet_with(None, None, None)
    }

    /// Sheet geometry with per-entity overrides layered on the configured defaults.
    pub fn sheet_with(
        &self,
        frame_width: Option<u32>,
        frame_height: Option<u32>,
        frame_count: Option<usize>,
    ) -> Result<PixelSheet, SheetError> {
        PixelSheet::new(
            frame_width
                .or(self.frame_width)
                .unwrap_or(DEFAULT_FRAME_WIDTH),
            frame_height
                .or(self.frame_height)
                .unwrap_or(DEFAULT_FRAME_HEIGHT),
            frame_count
                .or(self.frame_count)
                .unwrap_or(DEFAULT_FRAME_COUNT),
        )
    }

    /// Look with an optional per-entity scale. An unusable override is
    /// logged and the configured scale is used instead.
    pub fn look_with(&self, scale: Option<f64>) -> SheetLook {
        let scale = match scale {
            Some(s) if is_valid_scale(s) => s,
            Some(s) => {
                warn!(scale = s, "config:invalid scale, using default");
                self.scale()
            }
            None => self.scale(),
        };
        SheetLook {
            scale,
            shadow: self.shadow(),
            blend_mode: None,
        }
    }

    fn merge(self, project: SpriteConfig) -> SpriteConfig {
        SpriteConfig {
            frame_width: project.frame_width.or(self.frame_width),
            frame_height: project.frame_height.or(self.frame_height),
            frame_count: project.frame_count.or(self.frame_count),
            fps: project.fps.or(self.fps),
            scale: project.scale.or(self.scale),
            shadow: project.shadow.or(self.shadow),
        }
    }
}

/// Zone (building/location) display defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoneConfig {
    /// Edge length of the square zone viewport, in pixels.
    pub size: Option<u32>,
    /// CSS blend mode that knocks out the sheet's flat background.
    /// Set to `none` to disable.
    pub blend_mode: Option<String>,
}

impl ZoneConfig {
    pub fn size(&self) -> u32 {
        self.size.unwrap_or(DEFAULT_ZONE_SIZE)
    }

    pub fn look(&self) -> SheetLook {
        let blend_mode = match self.blend_mode.as_deref() {
            Some("none") | Some("") => None,
            Some(mode) => Some(mode.to_string()),
            None => Some(DEFAULT_BLEND_MODE.to_string()),
        };
        SheetLook {
            scale: 1.0,
            shadow: false,
            blend_mode,
        }
    }

    fn merge(self, project: ZoneConfig) -> ZoneConfig {
        ZoneConfig {
            size: project.size.or(self.size),
            blend_mode: project.blend_mode.or(self.blend_mode),
        }
    }
}

/// Indicator glyphs drawn next to a character.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusIcons {
    pub working: Option<String>,
    pub idle: Option<String>,
}

impl StatusIcons {
    pub fn working(&self) -> &str {
        self.working.as_deref().unwrap_or(DEFAULT_WORKING_ICON)
    }

    pub fn idle(&self) -> &str {
        self.idle.as_deref().unwrap_or(DEFAULT_IDLE_ICON)
    }

    fn merge(self, project: StatusIcons) -> StatusIcons {
        StatusIcons {
            working: project.working.or(self.working),
            idle: project.idle.or(self.idle),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub sprite: SpriteConfig,
    pub zone: ZoneConfig,
    pub rows: RowPolicy,
    pub status_icons: StatusIcons,
}

impl Config {
    /// Load the global config layered under the project (or explicit) config.
    ///
    /// Missing files are fine. An unreadable or malformed global or project
    /// file is logged and skipped; an explicit path must load.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let global = global_config_path()
            .and_then(|path| read_lenient(&path))
            .unwrap_or_default();

        let project = match explicit {
            Some(path) => {
                let content = fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config file: {}", path.display()))?;
                parse(&content)
                    .with_context(|| format!("Invalid config file: {}", path.display()))?
            }
            None => read_lenient(Path::new(PROJECT_CONFIG_FILE)).unwrap_or_default(),
        };

        Ok(global.merge(project))
    }

    /// Layer `project` on top of `self`.
    pub fn merge(self, project: Config) -> Config {
        Config {
            sprite: self.sprite.merge(project.sprite),
            zone: self.zone.merge(project.zone),
            rows: self.rows.merge(project.rows),
            status_icons: self.status_icons.merge(project.status_icons),
        }
    }
}

fn is_valid_scale(scale: f64) -> bool {
    scale.is_finite() && scale > 0.0
}

fn parse(content: &str) -> Result<Config> {
    if content.trim().is_empty() {
        return Ok(Config::default());
    }
    Ok(serde_yaml::from_str(content)?)
}

/// Read a config file, treating absence and corruption as "no config".
fn read_lenient(path: &Path) -> Option<Config> {
    match fs::read_to_string(path) {
        Ok(content) => match parse(&content) {
            Ok(config) => {
                debug!(path = %path.display(), "config:loaded");
                Some(config)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "config:invalid, ignoring");
                None
            }
        },
        Err(e) if e.kind() == io::ErrorKind::NotFound => None,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "config:unreadable, ignoring");
            None
        }
    }
}

/// Checks XDG_CONFIG_HOME first, falls back to ~/.config.
fn global_config_path() -> Option<PathBuf> {
    let base = std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| home::home_dir().map(|home| home.join(".config")))?;
    Some(base.join("spritemux").join("config.yaml"))
}
