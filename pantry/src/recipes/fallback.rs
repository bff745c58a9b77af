//! Generative fallback: ask the language model to write recipes.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::CollaboratorError;
use crate::llm::LlmClient;
use crate::prompts::recipe_writer_messages;

use super::GenerativeFallback;

/// [`GenerativeFallback`] backed by an [`LlmClient`].
pub struct LlmRecipeWriter {
    llm: Arc<dyn LlmClient>,
    count: usize,
}

impl LlmRecipeWriter {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm, count: 1 }
    }

    /// How many recipes to ask for.
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count.max(1);
        self
    }
}

#[async_trait]
impl GenerativeFallback for LlmRecipeWriter {
    async fn suggest(&self, description: &str) -> Result<String, CollaboratorError> {
        let messages = recipe_writer_messages(description, self.count);
        let text = self.llm.invoke(&messages).await?.into_text();
        if text.trim().is_empty() {
            return Err(CollaboratorError::EmptyResponse);
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MockLlm;

    #[tokio::test]
    async fn returns_model_text_and_sends_description() {
        let llm = Arc::new(MockLlm::with_text(r#"[{"title": "Soup"}]"#));
        let writer = LlmRecipeWriter::new(llm.clone()).with_count(2);
        let text = writer.suggest("ingredients: leek").await.unwrap();
        assert!(text.contains("Soup"));
        let sent = &llm.requests()[0];
        assert!(sent[1].content().contains("ingredients: leek"));
        assert!(sent[1].content().contains("up to 2"));
    }

    #[tokio::test]
    async fn blank_reply_is_empty_response() {
        let writer = LlmRecipeWriter::new(Arc::new(MockLlm::with_text("  ")));
        assert!(matches!(
            writer.suggest("x").await,
            Err(CollaboratorError::EmptyResponse)
        ));
    }

    #[tokio::test]
    async fn model_failure_maps_to_transport() {
        let writer = LlmRecipeWriter::new(Arc::new(MockLlm::failing("down")));
        assert!(matches!(
            writer.suggest("x").await,
            Err(CollaboratorError::Transport(_))
        ));
    }
}
