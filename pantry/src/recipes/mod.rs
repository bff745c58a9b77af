//! Recipe collaborators and the tiered finder.
//!
//! Three sources, tried in order by [`RecipeFinder`]:
//! structured search ([`RecipeSearch`], e.g. Spoonacular), web search ([`WebSearch`],
//! e.g. Tavily), then a generative fallback ([`GenerativeFallback`]).
//! Each tier distinguishes "no results" from a transport error.

mod fallback;
mod finder;
mod normalize;
mod spoonacular;
mod tavily;

pub use fallback::LlmRecipeWriter;
pub use finder::{FinderResult, RecipeFinder, RecipeSource};
pub use normalize::{normalize_recipe, recipes_from_text, recipes_from_value};
pub use spoonacular::{SpoonacularClient, SPOONACULAR_API_BASE};
pub use tavily::{TavilyClient, TAVILY_API_BASE};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CollaboratorError;
use crate::state::{ConversationState, Recipe};

/// What to search for, taken from the conversation state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeQuery {
    pub ingredients: Vec<String>,
    pub diet: Option<String>,
    pub allergies: Vec<String>,
    pub cuisine: Option<String>,
    /// Maximum minutes.
    pub prep_time: Option<u32>,
    pub craving: Option<String>,
}

impl RecipeQuery {
    /// Allergies may repeat in the state; the query lists each once, first-seen order.
    pub fn from_state(state: &ConversationState) -> Self {
        let p = &state.preferences;
        let mut allergies: Vec<String> = Vec::with_capacity(p.allergies.len());
        for a in &p.allergies {
            if !allergies.contains(a) {
                allergies.push(a.clone());
            }
        }
        Self {
            ingredients: state.ingredients.clone(),
            diet: p.diet.clone(),
            allergies,
            cuisine: p.cuisine.clone(),
            prep_time: p.prep_time,
            craving: p.craving.clone(),
        }
    }

    /// Free-text description for the generative fallback.
    pub fn describe(&self) -> String {
        let mut parts = Vec::new();
        if self.ingredients.is_empty() {
            parts.push("any ingredients".to_string());
        } else {
            parts.push(format!("ingredients: {}", self.ingredients.join(", ")));
        }
        if let Some(d) = &self.diet {
            parts.push(format!("diet: {d}"));
        }
        if !self.allergies.is_empty() {
            parts.push(format!("allergies: {}", self.allergies.join(", ")));
        }
        if let Some(c) = &self.cuisine {
            parts.push(format!("cuisine: {c}"));
        }
        if let Some(t) = self.prep_time {
            parts.push(format!("ready in {t} minutes or less"));
        }
        if let Some(c) = &self.craving {
            parts.push(format!("craving: {c}"));
        }
        parts.join("; ")
    }

    /// Web query such as `"vegan thai meal with tofu, rice"`.
    pub fn search_text(&self) -> String {
        let mut words: Vec<&str> = Vec::new();
        if let Some(d) = &self.diet {
            words.push(d);
        }
        if let Some(c) = &self.cuisine {
            words.push(c);
        }
        if let Some(c) = &self.craving {
            words.push(c);
        }
        let mut text = words.join(" ");
        if !text.is_empty() {
            text.push(' ');
        }
        text.push_str("meal");
        if !self.ingredients.is_empty() {
            text.push_str(" with ");
            text.push_str(&self.ingredients.join(", "));
        }
        text
    }
}

/// Result of a structured recipe search.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Found(Vec<Recipe>),
    NoResults,
}

/// One web search hit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebSnippet {
    pub title: Option<String>,
    pub url: Option<String>,
    pub content: String,
}

/// Result of a web search.
#[derive(Debug, Clone, PartialEq)]
pub enum WebOutcome {
    Found(Vec<WebSnippet>),
    NoResults,
}

/// Structured recipe search (ingredients plus filters).
#[async_trait]
pub trait RecipeSearch: Send + Sync {
    async fn search(&self, query: &RecipeQuery) -> Result<SearchOutcome, CollaboratorError>;
}

/// Free-text web search.
#[async_trait]
pub trait WebSearch: Send + Sync {
    async fn search(&self, query: &str) -> Result<WebOutcome, CollaboratorError>;
}

/// Writes a recipe suggestion from a free-text description.
#[async_trait]
pub trait GenerativeFallback: Send + Sync {
    async fn suggest(&self, description: &str) -> Result<String, CollaboratorError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query() -> RecipeQuery {
        RecipeQuery {
            ingredients: vec!["tofu".into(), "rice".into()],
            diet: Some("vegan".into()),
            allergies: vec!["peanuts".into()],
            cuisine: Some("thai".into()),
            prep_time: Some(30),
            craving: None,
        }
    }

    #[test]
    fn search_text_joins_filters_and_ingredients() {
        assert_eq!(query().search_text(), "vegan thai meal with tofu, rice");
        assert_eq!(RecipeQuery::default().search_text(), "meal");
    }

    #[test]
    fn describe_lists_every_known_field() {
        let d = query().describe();
        assert_eq!(
            d,
            "ingredients: tofu, rice; diet: vegan; allergies: peanuts; cuisine: thai; ready in 30 minutes or less"
        );
        assert_eq!(RecipeQuery::default().describe(), "any ingredients");
    }

    #[test]
    fn from_state_copies_fields() {
        let mut state = ConversationState::new();
        state.ingredients.push("kale".into());
        state.preferences.prep_time = Some(15);
        let q = RecipeQuery::from_state(&state);
        assert_eq!(q.ingredients, vec!["kale"]);
        assert_eq!(q.prep_time, Some(15));
    }

    #[test]
    fn from_state_lists_each_allergy_once() {
        let mut state = ConversationState::new();
        state.preferences.allergies = vec!["peanuts".into(), "soy".into(), "peanuts".into()];
        let q = RecipeQuery::from_state(&state);
        assert_eq!(q.allergies, vec!["peanuts", "soy"]);
        assert_eq!(state.preferences.allergies.len(), 3);
    }
}
