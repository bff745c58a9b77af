//! Tiered recipe lookup: structured search, then web search, then the generative fallback.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::state::{Recipe, DEFAULT_RECIPE_TITLE};

use super::normalize::recipes_from_text;
use super::{
    GenerativeFallback, RecipeQuery, RecipeSearch, SearchOutcome, WebOutcome, WebSearch,
    WebSnippet,
};

/// Which tier produced the recipes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecipeSource {
    Structured,
    Web,
    Generative,
    /// Every tier came back empty or failed.
    Nothing,
}

impl fmt::Display for RecipeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RecipeSource::Structured => "structured",
            RecipeSource::Web => "web",
            RecipeSource::Generative => "generative",
            RecipeSource::Nothing => "nothing",
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FinderResult {
    pub source: RecipeSource,
    pub recipes: Vec<Recipe>,
}

impl FinderResult {
    fn nothing() -> Self {
        Self {
            source: RecipeSource::Nothing,
            recipes: Vec::new(),
        }
    }
}

/// Tries each configured tier in order and stops at the first with results.
///
/// A failing tier is logged and treated as "no results" for that tier. Unset tiers
/// are skipped.
#[derive(Clone, Default)]
pub struct RecipeFinder {
    structured: Option<Arc<dyn RecipeSearch>>,
    web: Option<Arc<dyn WebSearch>>,
    generative: Option<Arc<dyn GenerativeFallback>>,
    max_recipes: Option<usize>,
}

impl RecipeFinder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_structured(mut self, search: Arc<dyn RecipeSearch>) -> Self {
        self.structured = Some(search);
        self
    }

    pub fn with_web(mut self, search: Arc<dyn WebSearch>) -> Self {
        self.web = Some(search);
        self
    }

    pub fn with_generative(mut self, fallback: Arc<dyn GenerativeFallback>) -> Self {
        self.generative = Some(fallback);
        self
    }

    /// Caps the number of recipes returned from any tier.
    pub fn with_max_recipes(mut self, max: usize) -> Self {
        self.max_recipes = Some(max.max(1));
        self
    }

    pub async fn find(&self, query: &RecipeQuery) -> FinderResult {
        let mut result = self.find_uncapped(query).await;
        if let Some(max) = self.max_recipes {
            result.recipes.truncate(max);
        }
        tracing::info!(
            source = %result.source,
            count = result.recipes.len(),
            "recipe lookup finished"
        );
        result
    }

    async fn find_uncapped(&self, query: &RecipeQuery) -> FinderResult {
        if let Some(search) = &self.structured {
            match search.search(query).await {
                Ok(SearchOutcome::Found(recipes)) if !recipes.is_empty() => {
                    return FinderResult {
                        source: RecipeSource::Structured,
                        recipes,
                    };
                }
                Ok(_) => tracing::debug!("structured search: no results"),
                Err(e) => tracing::warn!(error = %e, "structured search failed"),
            }
        }

        if let Some(search) = &self.web {
            let text = query.search_text();
            match search.search(&text).await {
                Ok(WebOutcome::Found(snippets)) if !snippets.is_empty() => {
                    return FinderResult {
                        source: RecipeSource::Web,
                        recipes: snippets.into_iter().map(snippet_recipe).collect(),
                    };
                }
                Ok(_) => tracing::debug!(query = %text, "web search: no results"),
                Err(e) => tracing::warn!(error = %e, "web search failed"),
            }
        }

        if let Some(fallback) = &self.generative {
            match fallback.suggest(&query.describe()).await {
                Ok(text) => {
                    let recipes = recipes_from_text(&text, &query.ingredients);
                    if !recipes.is_empty() {
                        return FinderResult {
                            source: RecipeSource::Generative,
                            recipes,
                        };
                    }
                    tracing::debug!("generative fallback: nothing usable");
                }
                Err(e) => tracing::warn!(error = %e, "generative fallback failed"),
            }
        }

        FinderResult::nothing()
    }
}

fn snippet_recipe(snippet: WebSnippet) -> Recipe {
    Recipe {
        title: snippet
            .title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_RECIPE_TITLE.to_string()),
        source_url: snippet.url,
        instructions: vec![snippet.content],
        ..Recipe::default()
    }
}
