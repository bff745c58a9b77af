//! Resolved runtime configuration: defaults, then the `[assistant]` settings table,
//! then environment variables.

use crate::agent::LoopConfig;
use crate::extract::MAX_EXTRACTED_INGREDIENTS;
use crate::llm::OPENROUTER_API_BASE;
use crate::router::DEFAULT_ITERATION_CEILING;

/// App name for `~/.config/<app>/config.toml`.
pub const APP_NAME: &str = "pantry";

pub const DEFAULT_MODEL: &str = "mistralai/mistral-7b-instruct:free";
pub const DEFAULT_TEMPERATURE: f32 = 0.3;
pub const DEFAULT_RECIPE_COUNT: usize = 5;

/// Everything needed to build a session.
///
/// Keys are kept as `Option` so a missing credential disables that collaborator
/// instead of failing startup.
#[derive(Clone, PartialEq)]
pub struct AssistantConfig {
    pub model: String,
    pub temperature: f32,
    pub api_base: String,
    pub iteration_ceiling: u32,
    pub max_ingredients: usize,
    pub recipe_count: usize,
    pub llm_api_key: Option<String>,
    pub spoonacular_api_key: Option<String>,
    pub tavily_api_key: Option<String>,
}

impl std::fmt::Debug for AssistantConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mask = |k: &Option<String>| k.as_ref().map(|_| "***");
        f.debug_struct("AssistantConfig")
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("api_base", &self.api_base)
            .field("iteration_ceiling", &self.iteration_ceiling)
            .field("max_ingredients", &self.max_ingredients)
            .field("recipe_count", &self.recipe_count)
            .field("llm_api_key", &mask(&self.llm_api_key))
            .field("spoonacular_api_key", &mask(&self.spoonacular_api_key))
            .field("tavily_api_key", &mask(&self.tavily_api_key))
            .finish()
    }
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            api_base: OPENROUTER_API_BASE.to_string(),
            iteration_ceiling: DEFAULT_ITERATION_CEILING,
            max_ingredients: MAX_EXTRACTED_INGREDIENTS,
            recipe_count: DEFAULT_RECIPE_COUNT,
            llm_api_key: None,
            spoonacular_api_key: None,
            tavily_api_key: None,
        }
    }
}

impl AssistantConfig {
    /// Defaults overlaid with `settings` and the process environment.
    ///
    /// Call `env_config::load_and_apply` first so `.env` and `[env]` values are visible.
    pub fn from_env_and_settings(settings: &env_config::AssistantSettings) -> Self {
        Self::resolve(settings, |key| std::env::var(key).ok())
    }

    /// Loads `[assistant]` from the XDG config file (ignoring a broken file) and resolves.
    pub fn load() -> Self {
        let settings = env_config::load_settings(APP_NAME).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "ignoring unreadable [assistant] settings");
            env_config::AssistantSettings::default()
        });
        Self::from_env_and_settings(&settings)
    }

    fn resolve(
        settings: &env_config::AssistantSettings,
        var: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let var = |key: &str| var(key).filter(|v| !v.trim().is_empty());
        let d = Self::default();
        Self {
            model: var("PANTRY_MODEL")
                .or_else(|| settings.model.clone())
                .unwrap_or(d.model),
            temperature: parse_var(&var, "PANTRY_TEMPERATURE")
                .or(settings.temperature)
                .unwrap_or(d.temperature),
            api_base: var("PANTRY_API_BASE")
                .or_else(|| settings.api_base.clone())
                .unwrap_or(d.api_base),
            iteration_ceiling: parse_var(&var, "PANTRY_MAX_ITERATIONS")
                .or(settings.max_iterations)
                .filter(|n: &u32| *n > 0)
                .unwrap_or(d.iteration_ceiling),
            max_ingredients: settings
                .max_ingredients
                .filter(|n| *n > 0)
                .unwrap_or(d.max_ingredients),
            recipe_count: parse_var(&var, "PANTRY_RECIPE_COUNT")
                .or(settings.recipe_count)
                .filter(|n: &usize| *n > 0)
                .unwrap_or(d.recipe_count),
            llm_api_key: var("OPENROUTER_API_KEY").or_else(|| var("OPENAI_API_KEY")),
            spoonacular_api_key: var("SPOONACULAR_API_KEY"),
            tavily_api_key: var("TAVILY_API_KEY"),
        }
    }

    pub fn loop_config(&self) -> LoopConfig {
        LoopConfig {
            iteration_ceiling: self.iteration_ceiling,
            max_ingredients: self.max_ingredients,
        }
    }
}

fn parse_var<T: std::str::FromStr>(
    var: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Option<T> {
    var(key).and_then(|v| v.trim().parse().ok())
}
