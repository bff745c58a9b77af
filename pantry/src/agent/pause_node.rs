//! Pause node: ask the user for ingredients and stop the run.

use async_trait::async_trait;

use crate::error::AgentError;
use crate::graph::{Next, Node};
use crate::prompts::CLARIFYING_QUESTION;
use crate::state::ConversationState;

pub const PAUSE_NODE: &str = "pause";

/// Appends the clarifying question (once per pause) and ends the run.
/// `force_pause` stays set until the next user turn.
pub struct PauseNode {
    question: String,
}

impl Default for PauseNode {
    fn default() -> Self {
        Self {
            question: CLARIFYING_QUESTION.to_string(),
        }
    }
}

#[async_trait]
impl Node<ConversationState> for PauseNode {
    fn id(&self) -> &str {
        PAUSE_NODE
    }

    async fn run(
        &self,
        mut state: ConversationState,
    ) -> Result<(ConversationState, Next), AgentError> {
        if state.last_assistant_reply() != Some(self.question.as_str())
            || matches!(state.messages.last(), Some(m) if m.role() == "user")
        {
            state.push_assistant(self.question.clone());
        }
        Ok((state, Next::End))
    }
}
