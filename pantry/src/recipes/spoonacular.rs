//! Structured recipe search via Spoonacular's `complexSearch`.
//!
//! Requires `SPOONACULAR_API_KEY` (passed in by the caller).
//! API: https://spoonacular.com/food-api/docs#Search-Recipes-Complex

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::CollaboratorError;

use super::normalize::recipes_from_value;
use super::{RecipeQuery, RecipeSearch, SearchOutcome};

pub const SPOONACULAR_API_BASE: &str = "https://api.spoonacular.com";

const DEFAULT_RESULT_COUNT: usize = 5;

/// Spoonacular client implementing [`RecipeSearch`].
pub struct SpoonacularClient {
    api_key: Option<Arc<str>>,
    base_url: String,
    number: usize,
    client: reqwest::Client,
}

impl SpoonacularClient {
    /// A missing key is accepted here; `search` then fails with `MissingCredential`.
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key: api_key.filter(|k| !k.trim().is_empty()).map(Arc::from),
            base_url: SPOONACULAR_API_BASE.to_string(),
            number: DEFAULT_RESULT_COUNT,
            client: reqwest::Client::new(),
        }
    }

    /// Points the client at another host (e.g. a mock server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Maximum recipes per search.
    pub fn with_result_count(mut self, number: usize) -> Self {
        self.number = number.max(1);
        self
    }

    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Query parameters for `query`; absent filters are omitted rather than sent empty.
    fn params(&self, api_key: &str, query: &RecipeQuery) -> Vec<(&'static str, String)> {
        let mut params = vec![("apiKey", api_key.to_string())];
        if !query.ingredients.is_empty() {
            params.push(("includeIngredients", query.ingredients.join(",")));
        }
        if let Some(diet) = &query.diet {
            params.push(("diet", diet.clone()));
        }
        if !query.allergies.is_empty() {
            params.push(("intolerances", query.allergies.join(",")));
        }
        if let Some(cuisine) = &query.cuisine {
            params.push(("cuisine", cuisine.clone()));
        }
        if let Some(minutes) = query.prep_time {
            params.push(("maxReadyTime", minutes.to_string()));
        }
        params.push(("number", self.number.to_string()));
        params.push(("addRecipeInformation", "true".to_string()));
        params.push(("fillIngredients", "true".to_string()));
        params
    }
}

#[async_trait]
impl RecipeSearch for SpoonacularClient {
    async fn search(&self, query: &RecipeQuery) -> Result<SearchOutcome, CollaboratorError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(CollaboratorError::MissingCredential("SPOONACULAR_API_KEY"))?;
        let url = format!(
            "{}/recipes/complexSearch",
            self.base_url.trim_end_matches('/')
        );
        tracing::debug!(url = %url, ingredients = query.ingredients.len(), "spoonacular search");

        let response = self
            .client
            .get(&url)
            .query(&self.params(api_key, query))
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CollaboratorError::Status {
                status: status.as_u16(),
                body,
            });
        }
        let body: Value = response.json().await?;
        let results = body
            .get("results")
            .ok_or_else(|| CollaboratorError::Decode("missing 'results'".to_string()))?;
        let recipes = recipes_from_value(results, &query.ingredients);
        tracing::debug!(count = recipes.len(), "spoonacular results");
        if recipes.is_empty() {
            Ok(SearchOutcome::NoResults)
        } else {
            Ok(SearchOutcome::Found(recipes))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_omit_absent_filters() {
        let client = SpoonacularClient::new(Some("k".into()));
        let q = RecipeQuery {
            ingredients: vec!["a".into(), "b".into()],
            ..Default::default()
        };
        let keys: Vec<_> = client.params("k", &q).into_iter().map(|(k, _)| k).collect();
        assert_eq!(
            keys,
            vec![
                "apiKey",
                "includeIngredients",
                "number",
                "addRecipeInformation",
                "fillIngredients"
            ]
        );
    }

    #[test]
    fn params_skip_empty_ingredient_list() {
        let client = SpoonacularClient::new(Some("k".into()));
        let params = client.params("k", &RecipeQuery::default());
        assert!(params.iter().all(|(k, _)| *k != "includeIngredients"));
    }

    #[test]
    fn params_include_all_filters() {
        let client = SpoonacularClient::new(Some("k".into())).with_result_count(3);
        let q = RecipeQuery {
            ingredients: vec!["tofu".into()],
            diet: Some("vegan".into()),
            allergies: vec!["peanut".into(), "soy".into()],
            cuisine: Some("thai".into()),
            prep_time: Some(20),
            craving: Some("spicy".into()),
        };
        let params = client.params("k", &q);
        assert!(params.contains(&("intolerances", "peanut,soy".to_string())));
        assert!(params.contains(&("maxReadyTime", "20".to_string())));
        assert!(params.contains(&("number", "3".to_string())));
        assert!(params.contains(&("cuisine", "thai".to_string())));
    }

    #[tokio::test]
    async fn missing_key_is_a_credential_error() {
        let client = SpoonacularClient::new(Some("  ".into()));
        let err = client.search(&RecipeQuery::default()).await.unwrap_err();
        assert!(matches!(
            err,
            CollaboratorError::MissingCredential("SPOONACULAR_API_KEY")
        ));
    }
}
