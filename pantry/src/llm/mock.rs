//! Mock LLM for tests.
//!
//! Replays a script of replies in order; the last entry repeats once the script
//! runs out. Records every request so tests can inspect prompts.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::AgentError;
use crate::llm::{LlmClient, LlmResponse};
use crate::message::Message;

/// One scripted outcome.
#[derive(Debug, Clone)]
pub enum MockReply {
    Respond(LlmResponse),
    Fail(String),
}

/// Mock LLM: scripted replies and a call counter.
///
/// **Interaction**: Implements `LlmClient`; used by collect-node, loop and session tests.
pub struct MockLlm {
    script: Vec<MockReply>,
    calls: AtomicUsize,
    requests: Mutex<Vec<Vec<Message>>>,
}

impl MockLlm {
    /// Always answers with `content` as plain text.
    pub fn with_text(content: impl Into<String>) -> Self {
        Self::scripted(vec![MockReply::Respond(LlmResponse::Text(content.into()))])
    }

    /// Answers with each text in turn, repeating the last.
    pub fn with_texts<I, S>(contents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::scripted(
            contents
                .into_iter()
                .map(|c| MockReply::Respond(LlmResponse::Text(c.into())))
                .collect(),
        )
    }

    /// Every call fails with `reason`.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self::scripted(vec![MockReply::Fail(reason.into())])
    }

    pub fn scripted(script: Vec<MockReply>) -> Self {
        Self {
            script,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Number of `invoke` calls so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Messages passed to each call, in call order.
    pub fn requests(&self) -> Vec<Vec<Message>> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl LlmClient for MockLlm {
    async fn invoke(&self, messages: &[Message]) -> Result<LlmResponse, AgentError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut r) = self.requests.lock() {
            r.push(messages.to_vec());
        }
        let reply = self
            .script
            .get(n)
            .or_else(|| self.script.last())
            .cloned()
            .unwrap_or(MockReply::Respond(LlmResponse::Text(String::new())));
        match reply {
            MockReply::Respond(r) => Ok(r),
            MockReply::Fail(reason) => Err(AgentError::ExecutionFailed(reason)),
        }
    }
}
