//! Progress router: where the conversation loop goes after a collect step.
//!
//! Ingredients are the only hard gate. Preferences never block a search.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::state::ConversationState;

/// Collection rounds before the loop proceeds to search with whatever it has.
pub const DEFAULT_ITERATION_CEILING: u32 = 3;

/// Loop stage decided after each collect step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Stage {
    /// Keep asking the model.
    Collecting,
    /// Wait for a new user turn.
    Paused,
    /// Enough to search.
    Ready,
}

impl Stage {
    /// Route key used in the loop's conditional edges.
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Collecting => "collecting",
            Stage::Paused => "paused",
            Stage::Ready => "ready",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Total over all states: exactly one stage for every input.
///
/// Order: non-empty ingredients → `Ready`; ceiling reached → `Ready`; pause requested
/// → `Paused`; otherwise `Collecting`. The ceiling is checked before the pause so a
/// paused session still terminates.
pub fn decide(state: &ConversationState, ceiling: u32) -> Stage {
    if state.has_ingredients() {
        Stage::Ready
    } else if state.iterations >= ceiling {
        Stage::Ready
    } else if state.force_pause {
        Stage::Paused
    } else {
        Stage::Collecting
    }
}
