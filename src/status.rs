//! Activity states reported by the surrounding dashboard.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Activity state of an entity, as supplied by the dashboard.
///
/// Parsing is total: any status string the dashboard sends that isn't one of
/// the known states is kept verbatim as `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AnimationState {
    Idle,
    Working,
    Merging,
    Other(String),
}

impl AnimationState {
    /// Parse a status string (case-insensitive, surrounding whitespace ignored).
    pub fn parse(s: &str) -> Self {
        let trimmed = s.trim();
        match trimmed.to_ascii_uppercase().as_str() {
            "IDLE" => AnimationState::Idle,
            "WORKING" => AnimationState::Working,
            "MERGING" => AnimationState::Merging,
            _ => AnimationState::Other(trimmed.to_string()),
        }
    }

    /// Wire form used by the dashboard.
    pub fn as_str(&self) -> &str {
        match self {
            AnimationState::Idle => "IDLE",
            AnimationState::Working => "WORKING",
            AnimationState::Merging => "MERGING",
            AnimationState::Other(s) => s,
        }
    }

    /// True for states that play the action row.
    pub fn is_active(&self) -> bool {
        matches!(self, AnimationState::Working | AnimationState::Merging)
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, AnimationState::Idle)
    }
}

impl fmt::Display for AnimationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for AnimationState {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl Serialize for AnimationState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for AnimationState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::parse(&s))
    }
}
