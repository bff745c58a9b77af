//! One user's conversation: owns the state and runs the loop once per user turn.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::Instrument;

use crate::agent::{build_conversation_loop, LoopConfig};
use crate::config::AssistantConfig;
use crate::graph::{CompilationError, CompiledStateGraph};
use crate::llm::{ChatOpenAI, LlmClient};
use crate::recipes::{
    LlmRecipeWriter, RecipeFinder, RecipeSource, SpoonacularClient, TavilyClient,
};
use crate::router::Stage;
use crate::state::{ConversationState, Preferences, Recipe};

/// Temperature for the recipe writer; a little more creative than extraction.
pub const RECIPE_WRITER_TEMPERATURE: f32 = 0.5;

pub const NO_RECIPES_MESSAGE: &str = "I need specific ingredients to suggest recipes. \
Please tell me what ingredients you have available.";

pub const TRY_AGAIN_MESSAGE: &str = "Sorry, I ran into a problem while working on that. \
Please try again and mention the specific ingredients you have.";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("missing credential: {0}")]
    MissingCredential(&'static str),
    #[error(transparent)]
    Compile(#[from] CompilationError),
}

/// What one user turn produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnReply {
    /// `Paused` when waiting for ingredients, `Ready` after a search.
    pub stage: Stage,
    /// Text to show the user.
    pub text: String,
    pub recipes: Vec<Recipe>,
    pub source: Option<RecipeSource>,
}

/// Session state plus the compiled loop.
///
/// Not shared between users; call [`handle_user_message`](Self::handle_user_message)
/// once per turn.
pub struct ConversationSession {
    graph: CompiledStateGraph<ConversationState>,
    state: ConversationState,
}

impl ConversationSession {
    pub fn new(graph: CompiledStateGraph<ConversationState>) -> Self {
        Self {
            graph,
            state: ConversationState::new(),
        }
    }

    /// Builds the loop from explicit collaborators.
    pub fn with_collaborators(
        llm: Arc<dyn LlmClient>,
        finder: RecipeFinder,
        config: LoopConfig,
    ) -> Result<Self, CompilationError> {
        Ok(Self::new(build_conversation_loop(llm, finder, config)?))
    }

    /// Builds the production session: OpenAI-compatible model, Spoonacular, Tavily,
    /// and the model as generative fallback.
    pub fn from_config(config: &AssistantConfig) -> Result<Self, SessionError> {
        let key = config
            .llm_api_key
            .clone()
            .ok_or(SessionError::MissingCredential("OPENROUTER_API_KEY"))?;
        let extractor_llm = ChatOpenAI::for_endpoint(&config.api_base, &key, &config.model)
            .with_temperature(config.temperature);
        let writer_llm = ChatOpenAI::for_endpoint(&config.api_base, &key, &config.model)
            .with_temperature(RECIPE_WRITER_TEMPERATURE);

        let finder = RecipeFinder::new()
            .with_structured(Arc::new(
                SpoonacularClient::new(config.spoonacular_api_key.clone())
                    .with_result_count(config.recipe_count),
            ))
            .with_web(Arc::new(TavilyClient::new(config.tavily_api_key.clone())))
            .with_generative(Arc::new(
                LlmRecipeWriter::new(Arc::new(writer_llm)).with_count(config.recipe_count),
            ))
            .with_max_recipes(config.recipe_count);

        Ok(Self::with_collaborators(
            Arc::new(extractor_llm),
            finder,
            config.loop_config(),
        )?)
    }

    pub fn state(&self) -> &ConversationState {
        &self.state
    }

    /// Starts over with an empty state.
    pub fn reset(&mut self) {
        self.state = ConversationState::new();
    }

    /// Adds the user turn, runs the loop and returns the reply. Never fails: a loop
    /// error resets the state (keeping the transcript) and asks the user to try again.
    ///
    /// The iteration ceiling bounds the collect rounds of this turn only. When every
    /// round's model call failed and nothing was collected, the reply asks the user to
    /// try again and the state is kept for the next turn.
    pub async fn handle_user_message(&mut self, text: &str) -> TurnReply {
        self.state.start_turn(text.trim());
        let span = tracing::info_span!("turn", messages = self.state.messages.len());

        let next = match self.graph.invoke(self.state.clone()).instrument(span.clone()).await {
            Ok(next) => next,
            Err(e) => {
                span.in_scope(|| tracing::warn!(error = %e, "conversation loop failed; resetting"));
                self.state = self.state.reset_keeping_messages();
                return self.try_again();
            }
        };
        self.state = next;

        if self.state.all_rounds_failed() {
            span.in_scope(|| {
                tracing::warn!(failed_rounds = self.state.failed_rounds, "model unavailable this turn")
            });
            return self.try_again();
        }

        if self.state.recipe_source.is_none() {
            let text = self
                .state
                .last_assistant_reply()
                .unwrap_or(NO_RECIPES_MESSAGE)
                .to_string();
            return TurnReply {
                stage: Stage::Paused,
                text,
                recipes: Vec::new(),
                source: None,
            };
        }

        let summary = extraction_summary(&self.state.ingredients, &self.state.preferences);
        let (text, transcript_note) = if self.state.recipes.is_empty() {
            let text = format!("{summary}\n\n{NO_RECIPES_MESSAGE}");
            (text.clone(), text)
        } else {
            let body = self
                .state
                .recipes
                .iter()
                .map(format_recipe)
                .collect::<Vec<_>>()
                .join("\n\n");
            let titles = self
                .state
                .recipes
                .iter()
                .map(|r| r.title.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            (
                format!("{summary}\n\nHere are some recipes you can make:\n\n{body}"),
                format!("{summary}\n\nSuggested recipes: {titles}"),
            )
        };
        self.state.push_assistant(transcript_note);
        TurnReply {
            stage: Stage::Ready,
            text,
            recipes: self.state.recipes.clone(),
            source: self.state.recipe_source,
        }
    }

    fn try_again(&mut self) -> TurnReply {
        self.state.push_assistant(TRY_AGAIN_MESSAGE);
        TurnReply {
            stage: Stage::Collecting,
            text: TRY_AGAIN_MESSAGE.to_string(),
            recipes: Vec::new(),
            source: None,
        }
    }
}

/// "I extracted the following information" block shown before recipes.
pub fn extraction_summary(ingredients: &[String], prefs: &Preferences) -> String {
    let or_unspecified = |v: &Option<String>| v.clone().unwrap_or_else(|| "Not specified".into());
    let ingredients = if ingredients.is_empty() {
        "None".to_string()
    } else {
        ingredients.join(", ")
    };
    let allergies = if prefs.allergies.is_empty() {
        "None".to_string()
    } else {
        prefs.allergies.join(", ")
    };
    let prep = prefs
        .prep_time
        .map(|m| format!("{m} minutes"))
        .unwrap_or_else(|| "Not specified".into());
    format!(
        "I extracted the following information:\n\
         - Ingredients: {ingredients}\n\
         - Diet: {}\n\
         - Allergies: {allergies}\n\
         - Cuisine: {}\n\
         - Prep time: {prep}\n\
         - Craving: {}",
        or_unspecified(&prefs.diet),
        or_unspecified(&prefs.cuisine),
        or_unspecified(&prefs.craving),
    )
}

/// Plain-text rendering of one recipe.
pub fn format_recipe(recipe: &Recipe) -> String {
    let mut out = format!("## {}", recipe.title);
    if let Some(url) = &recipe.image_url {
        out.push_str(&format!("\nImage: {url}"));
    }
    if let Some(url) = &recipe.source_url {
        out.push_str(&format!("\nSource: {url}"));
    }
    if !recipe.ingredients.is_empty() {
        out.push_str("\n\nIngredients:");
        for item in &recipe.ingredients {
            out.push_str(&format!("\n- {item}"));
        }
    }
    if !recipe.instructions.is_empty() {
        out.push_str("\n\nInstructions:");
        for (i, step) in recipe.instructions.iter().enumerate() {
            out.push_str(&format!("\n{}. {step}", i + 1));
        }
    }
    if !recipe.grocery_list.is_empty() {
        out.push_str("\n\nShopping list:");
        for item in &recipe.grocery_list {
            out.push_str(&format!("\n- {item}"));
        }
    }
    if let Some(kcal) = recipe.calories {
        out.push_str(&format!("\n\nCalories: {kcal} kcal"));
    }
    out
}
