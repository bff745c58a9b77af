//! Collect node: ask the model what the user has said, extract, merge.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::AgentError;
use crate::extract::{Extraction, Extractor};
use crate::graph::{Next, Node};
use crate::llm::LlmClient;
use crate::merge::{CandidateUpdater, MergePolicy};
use crate::prompts::extraction_messages;
use crate::state::ConversationState;

pub const COLLECT_NODE: &str = "collect";

/// One collection round.
///
/// Always advances `iterations`, even when the model call fails, so the ceiling
/// bounds the loop. Sets `force_pause` when the model answered but there are still
/// no ingredients. Never returns `Err`.
pub struct CollectNode {
    llm: Arc<dyn LlmClient>,
    extractor: Extractor,
    updater: Arc<dyn CandidateUpdater>,
}

impl CollectNode {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self {
            llm,
            extractor: Extractor::default(),
            updater: Arc::new(MergePolicy),
        }
    }

    pub fn with_extractor(mut self, extractor: Extractor) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn with_updater(mut self, updater: Arc<dyn CandidateUpdater>) -> Self {
        self.updater = updater;
        self
    }
}

#[async_trait]
impl Node<ConversationState> for CollectNode {
    fn id(&self) -> &str {
        COLLECT_NODE
    }

    async fn run(
        &self,
        mut state: ConversationState,
    ) -> Result<(ConversationState, Next), AgentError> {
        if state.force_pause {
            tracing::debug!("paused; waiting for a new user turn");
            return Ok((state, Next::Continue));
        }

        let messages = extraction_messages(&state);
        let extraction = self.extractor.from_response(self.llm.invoke(&messages).await);
        match &extraction {
            Extraction::Parsed(candidate) => {
                if candidate.replace_ingredients && !candidate.ingredients.is_empty() {
                    tracing::debug!(dropped = state.ingredients.len(), "replacing ingredients");
                    state.ingredients.clear();
                }
                self.updater.apply_update(&mut state, candidate);
            }
            Extraction::Empty => tracing::debug!("nothing extracted"),
            Extraction::CollaboratorFailure(reason) => {
                tracing::warn!(reason = %reason, "model call failed; counting as empty round");
                state.failed_rounds += 1;
            }
        }

        state.iterations += 1;
        if !extraction.is_failure() && !state.has_ingredients() {
            state.force_pause = true;
        }
        tracing::info!(
            iterations = state.iterations,
            ingredients = state.ingredients.len(),
            force_pause = state.force_pause,
            "collect round done"
        );
        Ok((state, Next::Continue))
    }
}
