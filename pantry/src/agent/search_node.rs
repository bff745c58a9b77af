//! Search node: look up recipes for the collected state.

use async_trait::async_trait;

use crate::error::AgentError;
use crate::graph::{Next, Node};
use crate::recipes::{RecipeFinder, RecipeQuery};
use crate::state::ConversationState;

pub const SEARCH_NODE: &str = "search";

/// Runs the [`RecipeFinder`] and stores its recipes and source in the state.
pub struct SearchNode {
    finder: RecipeFinder,
}

impl SearchNode {
    pub fn new(finder: RecipeFinder) -> Self {
        Self { finder }
    }
}

#[async_trait]
impl Node<ConversationState> for SearchNode {
    fn id(&self) -> &str {
        SEARCH_NODE
    }

    async fn run(
        &self,
        mut state: ConversationState,
    ) -> Result<(ConversationState, Next), AgentError> {
        if state.all_rounds_failed() {
            tracing::warn!(
                failed_rounds = state.failed_rounds,
                "every collect round failed; skipping recipe lookup"
            );
            return Ok((state, Next::End));
        }
        if !state.has_ingredients() {
            tracing::info!("searching without ingredients after reaching the iteration ceiling");
        }
        let result = self.finder.find(&RecipeQuery::from_state(&state)).await;
        state.recipes = result.recipes;
        state.recipe_source = Some(result.source);
        Ok((state, Next::End))
    }
}
