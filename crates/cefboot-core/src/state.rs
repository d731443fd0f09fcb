//! Build-once state machine

use serde::{Deserialize, Serialize};

/// States of a bootstrap coordinator
///
/// State transitions:
/// ```text
/// Unbuilt → Building → Built
///    ↑          │
///    └──────────┘ (build failed, retry allowed)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildState {
    /// No runtime handle has been produced yet
    #[default]
    Unbuilt,
    /// One thread is resolving, extracting and initializing
    Building,
    /// The runtime handle is memoized
    Built,
}

impl BuildState {
    /// Check if this state can transition to the target state
    pub fn can_transition_to(&self, target: BuildState) -> bool {
        use BuildState::*;
        matches!(
            (self, target),
            (Unbuilt, Building) | (Building, Built) | (Building, Unbuilt)
        )
    }

    /// Check if a handle is available in this state
    pub fn has_handle(&self) -> bool {
        matches!(self, BuildState::Built)
    }

    /// Check if this is the terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, BuildState::Built)
    }

    /// Get a human-readable description of this state
    pub fn description(&self) -> &'static str {
        match self {
            BuildState::Unbuilt => "Runtime has not been built",
            BuildState::Building => "Runtime is being built",
            BuildState::Built => "Runtime is built and ready",
        }
    }
}

impl std::fmt::Display for BuildState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildState::Unbuilt => write!(f, "Unbuilt"),
            BuildState::Building => write!(f, "Building"),
            BuildState::Built => write!(f, "Built"),
        }
    }
}
