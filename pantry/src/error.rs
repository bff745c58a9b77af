//! Error types for graph execution and external collaborators.
//!
//! `AgentError` is returned by `Node::run` and `CompiledStateGraph::invoke`.
//! `CollaboratorError` is returned by the model and recipe/search clients; the
//! conversation loop never lets either reach the user as a raw error.

use thiserror::Error;

/// Node or graph execution error.
///
/// Returned by `Node::run` when a step fails and by `CompiledStateGraph::invoke`
/// when the run cannot complete.
#[derive(Debug, Error)]
pub enum AgentError {
    /// Execution failed with a message (e.g. LLM call failed, invalid routing target).
    #[error("execution failed: {0}")]
    ExecutionFailed(String),

    /// The run took more node steps than the compiled graph allows.
    #[error("recursion limit of {0} steps reached")]
    RecursionLimit(usize),
}

/// Failure of an external collaborator (language model, recipe API, web search).
///
/// The finder and the collect step treat every variant as "no result from this
/// collaborator"; only logging distinguishes them.
#[derive(Debug, Error)]
pub enum CollaboratorError {
    /// Required credential (API key env var) is not set.
    #[error("missing credential: {0}")]
    MissingCredential(&'static str),

    /// Network or client-side failure before a response was received.
    #[error("transport error: {0}")]
    Transport(String),

    /// Non-success HTTP status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body could not be decoded into the expected shape.
    #[error("decode error: {0}")]
    Decode(String),

    /// Collaborator answered but with nothing usable.
    #[error("empty response")]
    EmptyResponse,
}

impl From<reqwest::Error> for CollaboratorError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            CollaboratorError::Decode(e.to_string())
        } else {
            CollaboratorError::Transport(e.to_string())
        }
    }
}

impl From<AgentError> for CollaboratorError {
    fn from(e: AgentError) -> Self {
        CollaboratorError::Transport(e.to_string())
    }
}
