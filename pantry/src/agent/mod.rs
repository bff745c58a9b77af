//! The conversation loop: collect → (collect | pause | search) as a state graph.
//!
//! # Main types
//!
//! - **[`CollectNode`]**: prompts the model, extracts, merges, counts the round.
//! - **[`PauseNode`]**: appends the clarifying question and stops the run.
//! - **[`SearchNode`]**: fills `recipes` through the [`RecipeFinder`](crate::recipes::RecipeFinder).
//! - **[`build_conversation_loop`]**: wires them with the progress router.

mod build;
mod collect_node;
mod pause_node;
mod search_node;

pub use build::{build_conversation_loop, LoopConfig};
pub use collect_node::{CollectNode, COLLECT_NODE};
pub use pause_node::{PauseNode, PAUSE_NODE};
pub use search_node::{SearchNode, SEARCH_NODE};
