//! Running state of one conversation session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::message::Message;
use crate::recipes::RecipeSource;

use super::{Preferences, Recipe};

/// Main state for the collection loop.
///
/// Created once per session with everything empty. Mutated only by the collect node
/// (via the merge policy), the pause node and the search node; the extractor never
/// touches it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationState {
    /// Available ingredients, deduplicated, in first-seen order.
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub preferences: Preferences,
    /// User and assistant turns in order.
    #[serde(default)]
    pub messages: Vec<Message>,
    /// Collection attempts taken in the current turn.
    #[serde(default)]
    pub iterations: u32,
    /// Collection attempts in the current turn whose model call failed.
    #[serde(default)]
    pub failed_rounds: u32,
    /// When true the loop must not call the model again until a new user turn arrives.
    #[serde(default)]
    pub force_pause: bool,
    #[serde(default)]
    pub recipes: Vec<Recipe>,
    /// Which lookup tier produced `recipes`; `None` until a search ran.
    #[serde(default)]
    pub recipe_source: Option<RecipeSource>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Default for ConversationState {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationState {
    pub fn new() -> Self {
        Self {
            ingredients: Vec::new(),
            preferences: Preferences::default(),
            messages: Vec::new(),
            iterations: 0,
            failed_rounds: 0,
            force_pause: false,
            recipes: Vec::new(),
            recipe_source: None,
            created_at: Utc::now(),
        }
    }

    /// Appends a user turn. A new user turn is what lifts a pause.
    pub fn push_user(&mut self, content: impl Into<String>) {
        self.messages.push(Message::user(content));
        self.force_pause = false;
    }

    /// Opens a new turn: appends the user message and clears the per-turn counters and
    /// the previous turn's recipes. Ingredients and preferences carry over.
    pub fn start_turn(&mut self, content: impl Into<String>) {
        self.push_user(content);
        self.iterations = 0;
        self.failed_rounds = 0;
        self.recipes.clear();
        self.recipe_source = None;
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.messages.push(Message::assistant(content));
    }

    pub fn has_ingredients(&self) -> bool {
        !self.ingredients.is_empty()
    }

    /// True when every collect round of this turn failed and nothing was collected, so
    /// a lookup would run on an empty query.
    pub fn all_rounds_failed(&self) -> bool {
        self.iterations > 0 && self.failed_rounds >= self.iterations && !self.has_ingredients()
    }

    /// Content of the last assistant turn, if any.
    pub fn last_assistant_reply(&self) -> Option<&str> {
        self.messages.iter().rev().find_map(|m| match m {
            Message::Assistant(s) => Some(s.as_str()),
            _ => None,
        })
    }

    /// Fresh state that keeps the transcript. Used after an unrecoverable loop failure.
    pub fn reset_keeping_messages(&self) -> Self {
        Self {
            messages: self.messages.clone(),
            ..Self::new()
        }
    }
}
