//! Normalized recipe suggestion.

use serde::{Deserialize, Serialize};

/// Title used when a source omits one.
pub const DEFAULT_RECIPE_TITLE: &str = "Untitled recipe";

/// One recipe suggestion. List fields are always present (possibly empty);
/// see [`recipes::normalize_recipe`](crate::recipes::normalize_recipe) for coercion from raw JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    pub title: String,
    #[serde(default)]
    pub image_url: Option<String>,
    /// Page the recipe came from, when known.
    #[serde(default)]
    pub source_url: Option<String>,
    /// Ingredients with quantities (e.g. "2 tablespoons olive oil").
    #[serde(default)]
    pub ingredients: Vec<String>,
    /// Full cooking steps in order.
    #[serde(default)]
    pub instructions: Vec<String>,
    /// Items the user does not already have.
    #[serde(default)]
    pub grocery_list: Vec<String>,
    #[serde(default)]
    pub calories: Option<u32>,
}

impl Default for Recipe {
    fn default() -> Self {
        Self {
            title: DEFAULT_RECIPE_TITLE.to_string(),
            image_url: None,
            source_url: None,
            ingredients: Vec::new(),
            instructions: Vec::new(),
            grocery_list: Vec::new(),
            calories: None,
        }
    }
}

impl Recipe {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_recipe_uses_placeholder_title_and_empty_lists() {
        let r = Recipe::default();
        assert_eq!(r.title, DEFAULT_RECIPE_TITLE);
        assert!(r.ingredients.is_empty());
        assert!(r.instructions.is_empty());
        assert!(r.grocery_list.is_empty());
        assert!(r.calories.is_none());
    }
}
