//! Minimal state graph: nodes, fixed edges, conditional edges and a step limit.
//!
//! Build with [`StateGraph`], `compile()` into a [`CompiledStateGraph`], then
//! `invoke(state)`. The conversation loop is one such graph.

mod compile_error;
mod compiled;
mod conditional;
mod logging;
mod next;
mod node;
mod state_graph;

pub use compile_error::CompilationError;
pub use compiled::{CompiledStateGraph, DEFAULT_RECURSION_LIMIT};
pub use conditional::{ConditionalRouter, ConditionalRouterFn, NextEntry};
pub use next::Next;
pub use node::Node;
pub use state_graph::{StateGraph, END, START};
