//! Wiring the conversation loop graph.

use std::collections::HashMap;
use std::sync::Arc;

use crate::extract::{Extractor, MAX_EXTRACTED_INGREDIENTS};
use crate::graph::{CompilationError, CompiledStateGraph, StateGraph, END, START};
use crate::llm::LlmClient;
use crate::recipes::RecipeFinder;
use crate::router::{decide, Stage, DEFAULT_ITERATION_CEILING};
use crate::state::ConversationState;

use super::{CollectNode, PauseNode, SearchNode, COLLECT_NODE, PAUSE_NODE, SEARCH_NODE};

/// Knobs for [`build_conversation_loop`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopConfig {
    /// Collection rounds before searching with whatever is known.
    pub iteration_ceiling: u32,
    /// Extraction cardinality guard.
    pub max_ingredients: usize,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            iteration_ceiling: DEFAULT_ITERATION_CEILING,
            max_ingredients: MAX_EXTRACTED_INGREDIENTS,
        }
    }
}

impl LoopConfig {
    /// Node steps one run may take: every collect round plus the final pause or search.
    pub fn recursion_limit(&self) -> usize {
        self.iteration_ceiling as usize + 2
    }
}

/// Builds `START → collect`, `collect → {collect, pause, search}` by [`decide`],
/// `pause → END`, `search → END`.
pub fn build_conversation_loop(
    llm: Arc<dyn LlmClient>,
    finder: RecipeFinder,
    config: LoopConfig,
) -> Result<CompiledStateGraph<ConversationState>, CompilationError> {
    let collect = CollectNode::new(llm).with_extractor(Extractor::new(config.max_ingredients));
    let ceiling = config.iteration_ceiling;

    let mut graph =
        StateGraph::<ConversationState>::new().with_recursion_limit(config.recursion_limit());
    graph
        .add_node(COLLECT_NODE, Arc::new(collect))
        .add_node(PAUSE_NODE, Arc::new(PauseNode::default()))
        .add_node(SEARCH_NODE, Arc::new(SearchNode::new(finder)))
        .add_edge(START, COLLECT_NODE)
        .add_edge(PAUSE_NODE, END)
        .add_edge(SEARCH_NODE, END);

    let path_map: HashMap<String, String> = [
        (Stage::Collecting, COLLECT_NODE),
        (Stage::Paused, PAUSE_NODE),
        (Stage::Ready, SEARCH_NODE),
    ]
    .into_iter()
    .map(|(stage, node)| (stage.as_str().to_string(), node.to_string()))
    .collect();
    graph.add_conditional_edges(
        COLLECT_NODE,
        Arc::new(move |state: &ConversationState| {
            let stage = decide(state, ceiling);
            tracing::debug!(stage = %stage, iterations = state.iterations, "routed");
            stage.as_str().to_string()
        }),
        Some(path_map),
    );
    graph.compile()
}
