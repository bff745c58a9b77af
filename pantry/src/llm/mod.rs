//! Language model abstraction for the collect step and the generative fallback.
//!
//! `LlmClient` takes the full message list (system prompt first) and returns an
//! [`LlmResponse`]. Implementations: [`MockLlm`] (scripted, for tests) and
//! [`ChatOpenAI`] (any OpenAI-compatible endpoint, e.g. OpenRouter).

mod mock;
mod openai;

pub use mock::{MockLlm, MockReply};
pub use openai::{ChatOpenAI, OPENROUTER_API_BASE};

use async_trait::async_trait;

use crate::error::AgentError;
use crate::message::Message;

/// What a model call produced.
///
/// Providers differ in shape: most return text, some a list of messages, some an
/// already-decoded JSON value (JSON mode). Consumers match on the variant instead
/// of probing for attributes.
#[derive(Debug, Clone, PartialEq)]
pub enum LlmResponse {
    /// Plain assistant text.
    Text(String),
    /// A list of messages; the last assistant message is the reply.
    MessageList(Vec<Message>),
    /// Structured output already decoded by the provider.
    Structured(serde_json::Value),
}

impl LlmResponse {
    /// Reply as text. Structured values are serialized back to JSON.
    pub fn into_text(self) -> String {
        match self {
            LlmResponse::Text(s) => s,
            LlmResponse::MessageList(messages) => messages
                .into_iter()
                .rev()
                .find_map(|m| match m {
                    Message::Assistant(s) => Some(s),
                    _ => None,
                })
                .unwrap_or_default(),
            LlmResponse::Structured(v) => v.to_string(),
        }
    }
}

/// LLM client: given messages, returns the assistant reply.
///
/// **Interaction**: Used by `CollectNode` (extraction) and `LlmRecipeWriter` (fallback).
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Invoke one turn: read messages, return the reply.
    async fn invoke(&self, messages: &[Message]) -> Result<LlmResponse, AgentError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn into_text_of_each_variant() {
        assert_eq!(LlmResponse::Text("hi".into()).into_text(), "hi");
        let list = LlmResponse::MessageList(vec![
            Message::user("q"),
            Message::assistant("first"),
            Message::assistant("last"),
        ]);
        assert_eq!(list.into_text(), "last");
        assert_eq!(
            LlmResponse::MessageList(vec![Message::user("q")]).into_text(),
            ""
        );
        assert_eq!(
            LlmResponse::Structured(json!({"a": 1})).into_text(),
            r#"{"a":1}"#
        );
    }
}
