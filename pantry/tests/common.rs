//! Shared fakes for the loop and session tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use pantry::{
    CollaboratorError, GenerativeFallback, Recipe, RecipeFinder, RecipeQuery, RecipeSearch,
    SearchOutcome,
};

/// Structured search that returns one recipe per ingredient and counts calls.
#[derive(Default)]
pub struct CountingSearch {
    pub calls: AtomicUsize,
}

#[async_trait]
impl RecipeSearch for CountingSearch {
    async fn search(&self, query: &RecipeQuery) -> Result<SearchOutcome, CollaboratorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if query.ingredients.is_empty() {
            return Ok(SearchOutcome::NoResults);
        }
        Ok(SearchOutcome::Found(
            query
                .ingredients
                .iter()
                .map(|i| Recipe::titled(format!("{i} bowl")))
                .collect(),
        ))
    }
}

/// Fallback that always answers with the same prose.
pub struct FixedWriter(pub &'static str);

#[async_trait]
impl GenerativeFallback for FixedWriter {
    async fn suggest(&self, _description: &str) -> Result<String, CollaboratorError> {
        Ok(self.0.to_string())
    }
}

pub fn finder_with(search: Arc<CountingSearch>) -> RecipeFinder {
    RecipeFinder::new()
        .with_structured(search)
        .with_generative(Arc::new(FixedWriter("Pantry omelette\nWhisk and fry.")))
}
