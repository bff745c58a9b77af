//! Compiled state graph: immutable, supports invoke only.
//!
//! Built by `StateGraph::compile`. Runs from the START node; after each node the
//! conditional router (if any) or the node's `Next` picks the following node.

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

use tracing::Instrument;

use crate::error::AgentError;

use super::logging::{
    log_graph_complete, log_graph_error, log_graph_start, log_node_complete, log_node_start,
    log_node_state,
};
use super::state_graph::END;
use super::{Next, NextEntry, Node};

/// Node steps allowed per `invoke` unless overridden with `StateGraph::with_recursion_limit`.
pub const DEFAULT_RECURSION_LIMIT: usize = 25;

/// Compiled graph: immutable structure, supports invoke only.
#[derive(Clone)]
pub struct CompiledStateGraph<S> {
    pub(super) nodes: HashMap<String, Arc<dyn Node<S>>>,
    pub(super) first_node_id: String,
    pub(super) next_map: HashMap<String, NextEntry<S>>,
    pub(super) recursion_limit: usize,
}

impl<S> CompiledStateGraph<S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    pub fn recursion_limit(&self) -> usize {
        self.recursion_limit
    }

    /// Runs the graph from the first node until END.
    ///
    /// Fails with `AgentError::RecursionLimit` when more than `recursion_limit` nodes
    /// would run, and with the node's error when a node fails.
    pub async fn invoke(&self, state: S) -> Result<S, AgentError> {
        let mut state = state;
        let mut current_id = self.first_node_id.clone();
        let mut steps = 0usize;
        log_graph_start();

        loop {
            if steps >= self.recursion_limit {
                let err = AgentError::RecursionLimit(self.recursion_limit);
                log_graph_error(&err);
                return Err(err);
            }
            let node = self.nodes.get(&current_id).cloned().ok_or_else(|| {
                AgentError::ExecutionFailed(format!("unknown node: {}", current_id))
            })?;
            steps += 1;
            log_node_start(&current_id, steps);
            log_node_state(&current_id, &state);

            let span = tracing::debug_span!("node", node_id = %current_id, step = steps);
            let (new_state, next) = match node.run(state).instrument(span).await {
                Ok(output) => output,
                Err(e) => {
                    log_graph_error(&e);
                    return Err(e);
                }
            };
            log_node_complete(&current_id, &next);
            state = new_state;

            let next_id = match self.next_map.get(&current_id) {
                Some(NextEntry::Conditional(router)) => {
                    let target = router.resolve_next(&state);
                    tracing::debug!(from = %current_id, to = %target, "conditional routing");
                    Some(target)
                }
                Some(NextEntry::Unconditional(to)) => match next {
                    Next::End => None,
                    Next::Node(id) => Some(id),
                    Next::Continue => Some(to.clone()),
                },
                None => match next {
                    Next::Node(id) => Some(id),
                    Next::End | Next::Continue => None,
                },
            };

            match next_id {
                Some(id) if id != END => current_id = id,
                _ => {
                    log_graph_complete(steps);
                    return Ok(state);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{StateGraph, START};
    use async_trait::async_trait;

    struct Add(&'static str, u32);

    #[async_trait]
    impl Node<u32> for Add {
        fn id(&self) -> &str {
            self.0
        }
        async fn run(&self, state: u32) -> Result<(u32, Next), AgentError> {
            Ok((state + self.1, Next::Continue))
        }
    }

    struct Fail;

    #[async_trait]
    impl Node<u32> for Fail {
        fn id(&self) -> &str {
            "fail"
        }
        async fn run(&self, _state: u32) -> Result<(u32, Next), AgentError> {
            Err(AgentError::ExecutionFailed("nope".into()))
        }
    }

    #[tokio::test]
    async fn linear_chain_runs_in_order() {
        let mut g = StateGraph::<u32>::new();
        g.add_node("a", Arc::new(Add("a", 1)));
        g.add_node("b", Arc::new(Add("b", 10)));
        g.add_edge(START, "a").add_edge("a", "b").add_edge("b", END);
        assert_eq!(g.compile().unwrap().invoke(0).await.unwrap(), 11);
    }

    #[tokio::test]
    async fn conditional_self_loop_until_router_exits() {
        let mut g = StateGraph::<u32>::new();
        g.add_node("inc", Arc::new(Add("inc", 1)));
        g.add_edge(START, "inc");
        g.add_conditional_edges(
            "inc",
            Arc::new(|s: &u32| if *s < 3 { "again".into() } else { "done".into() }),
            Some(
                [
                    ("again".to_string(), "inc".to_string()),
                    ("done".to_string(), END.to_string()),
                ]
                .into_iter()
                .collect(),
            ),
        );
        assert_eq!(g.compile().unwrap().invoke(0).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn recursion_limit_stops_endless_loop() {
        let mut g = StateGraph::<u32>::new().with_recursion_limit(4);
        g.add_node("inc", Arc::new(Add("inc", 1)));
        g.add_edge(START, "inc");
        g.add_conditional_edges(
            "inc",
            Arc::new(|_: &u32| "loop".to_string()),
            Some(
                [
                    ("loop".to_string(), "inc".to_string()),
                    ("stop".to_string(), END.to_string()),
                ]
                .into_iter()
                .collect(),
            ),
        );
        let compiled = g.compile().unwrap();
        assert_eq!(compiled.recursion_limit(), 4);
        let err = compiled.invoke(0).await.unwrap_err();
        assert!(matches!(err, AgentError::RecursionLimit(4)));
    }

    #[tokio::test]
    async fn node_error_propagates() {
        let mut g = StateGraph::<u32>::new();
        g.add_node("fail", Arc::new(Fail));
        g.add_edge(START, "fail").add_edge("fail", END);
        let err = g.compile().unwrap().invoke(0).await.unwrap_err();
        assert!(err.to_string().contains("nope"));
    }
}
