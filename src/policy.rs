//! Mapping from activity state to sprite-sheet row and playback.
//!
//! Sheets disagree on which row holds the "action" animation and on whether
//! idle sprites should hold still, so every part of the table can be
//! overridden from config. Built-in defaults:
//!
//! | State              | Row | Playback                 |
//! |--------------------|-----|--------------------------|
//! | WORKING, MERGING   | 1   | playing at sprite fps    |
//! | IDLE               | 0   | paused on the rest frame |
//! | anything else      | 0   | playing at sprite fps    |

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::clock::FrameSequence;
use crate::status::AnimationState;

const DEFAULT_ACTION_ROW: usize = 1;
const DEFAULT_IDLE_ROW: usize = 0;

/// Which frame a paused animation holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "RestFrameRepr", into = "RestFrameRepr")]
pub enum RestFrame {
    #[default]
    First,
    /// The middle column, a common "standing" pose in walk cycles.
    Middle,
    Index(usize),
}

impl RestFrame {
    /// Concrete frame index for a row of `frame_count` frames.
    pub fn resolve(self, frame_count: usize) -> usize {
        let last = frame_count.max(1) - 1;
        match self {
            RestFrame::First => 0,
            RestFrame::Middle => frame_count / 2,
            RestFrame::Index(i) => i,
        }
        .min(last)
    }
}

/// Config form: either `first`/`middle` or a bare index.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RestFrameRepr {
    Named(String),
    Index(usize),
}

impl TryFrom<RestFrameRepr> for RestFrame {
    type Error = String;

    fn try_from(repr: RestFrameRepr) -> Result<Self, Self::Error> {
        match repr {
            RestFrameRepr::Index(i) => Ok(RestFrame::Index(i)),
            RestFrameRepr::Named(name) => match name.trim().to_lowercase().as_str() {
                "first" => Ok(RestFrame::First),
                "middle" => Ok(RestFrame::Middle),
                other => other
                    .parse()
                    .map(RestFrame::Index)
                    .map_err(|_| format!("invalid rest frame '{}': expected first, middle or an index", name)),
            },
        }
    }
}

impl From<RestFrame> for RestFrameRepr {
    fn from(rest: RestFrame) -> Self {
        match rest {
            RestFrame::First => RestFrameRepr::Named("first".to_string()),
            RestFrame::Middle => RestFrameRepr::Named("middle".to_string()),
            RestFrame::Index(i) => RestFrameRepr::Index(i),
        }
    }
}

/// Whether an animation runs, and how.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Playback {
    Playing { fps: u32 },
    Paused { rest: RestFrame },
}

impl Playback {
    pub fn sequence(&self, frame_count: usize) -> FrameSequence {
        match *self {
            Playback::Playing { fps } => FrameSequence::playing(frame_count, fps),
            Playback::Paused { rest } => FrameSequence::held(frame_count, rest.resolve(frame_count)),
        }
    }
}

impl fmt::Display for Playback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Playback::Playing { fps } => write!(f, "playing @ {} fps", fps),
            Playback::Paused { rest } => match rest {
                RestFrame::First => f.write_str("paused (first)"),
                RestFrame::Middle => f.write_str("paused (middle)"),
                RestFrame::Index(i) => write!(f, "paused (frame {})", i),
            },
        }
    }
}

/// Row and playback an entity should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolved {
    pub row: usize,
    pub playback: Playback,
}

/// Per-state overrides. Unset fields fall back to the built-in table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StateRule {
    pub row: Option<usize>,
    pub animate: Option<bool>,
    pub fps: Option<u32>,
    pub rest_frame: Option<RestFrame>,
}

impl StateRule {
    fn merge(self, project: StateRule) -> StateRule {
        StateRule {
            row: project.row.or(self.row),
            animate: project.animate.or(self.animate),
            fps: project.fps.or(self.fps),
            rest_frame: project.rest_frame.or(self.rest_frame),
        }
    }

    fn apply(&self, row: usize, animate: bool, default_fps: u32) -> Resolved {
        let playback = if self.animate.unwrap_or(animate) {
            Playback::Playing {
                fps: self.fps.unwrap_or(default_fps),
            }
        } else {
            Playback::Paused {
                rest: self.rest_frame.unwrap_or_default(),
            }
        };
        Resolved {
            row: self.row.unwrap_or(row),
            playback,
        }
    }
}

/// The `rows` config section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RowPolicy {
    /// Row shared by WORKING and MERGING unless they set their own.
    /// Strip sheets usually put it at 1; some grid sheets use 2.
    pub action_row: Option<usize>,
    pub working: StateRule,
    pub merging: StateRule,
    pub idle: StateRule,
    pub other: StateRule,
}

impl RowPolicy {
    /// Resolve the row and playback for `state`. Independent of any previous state.
    pub fn resolve(&self, state: &AnimationState, default_fps: u32) -> Resolved {
        let action_row = self.action_row.unwrap_or(DEFAULT_ACTION_ROW);
        match state {
            AnimationState::Working => self.working.apply(action_row, true, default_fps),
            AnimationState::Merging => self.merging.apply(action_row, true, default_fps),
            AnimationState::Idle => self.idle.apply(DEFAULT_IDLE_ROW, false, default_fps),
            AnimationState::Other(_) => self.other.apply(DEFAULT_IDLE_ROW, true, default_fps),
        }
    }

    /// Layer `project` on top of `self`, field by field.
    pub fn merge(self, project: RowPolicy) -> RowPolicy {
        RowPolicy {
            action_row: project.action_row.or(self.action_row),
            working: self.working.merge(project.working),
            merging: self.merging.merge(project.merging),
            idle: self.idle.merge(project.idle),
            other: self.other.merge(project.other),
        }
    }
}
