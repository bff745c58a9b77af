//! # Pantry
//!
//! A conversational recipe assistant built on a small state graph. One
//! [`ConversationState`] flows through the loop; every user turn runs it once.
//!
//! ## How a turn runs
//!
//! - **Collect**: the model reads the transcript and returns a JSON fragment; the
//!   [`Extractor`] turns whatever came back into a [`Candidate`] and the
//!   [`MergePolicy`] folds it into the state.
//! - **Route**: [`decide`] picks the next stage: keep collecting, pause and ask for
//!   ingredients, or search once ingredients are known or the iteration ceiling is hit.
//! - **Search**: the [`RecipeFinder`] tries Spoonacular, then Tavily web search, then
//!   the model itself, and stores normalized [`Recipe`]s.
//!
//! [`ConversationSession`] wraps the loop for a chat front end and formats replies.
//!
//! ## Main modules
//!
//! - [`graph`]: [`StateGraph`], [`CompiledStateGraph`], [`Node`], [`Next`].
//! - [`agent`]: collect, pause and search nodes; [`build_conversation_loop`].
//! - [`extract`]: lenient JSON recovery and normalization of model output.
//! - [`merge`]: how a candidate updates the state.
//! - [`router`]: [`Stage`] and [`decide`].
//! - [`recipes`]: collaborators ([`SpoonacularClient`], [`TavilyClient`], [`LlmRecipeWriter`]) and [`RecipeFinder`].
//! - [`llm`]: [`LlmClient`] trait, [`MockLlm`], [`ChatOpenAI`].
//! - [`config`]: [`AssistantConfig`] from `.env`, XDG `config.toml` and the environment.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use pantry::{AssistantConfig, ConversationSession};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AssistantConfig::load();
//! let mut session = ConversationSession::from_config(&config)?;
//! let reply = session.handle_user_message("I have chicken, rice and garlic").await;
//! println!("{}", reply.text);
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod config;
pub mod error;
pub mod extract;
pub mod graph;
pub mod llm;
pub mod merge;
pub mod message;
pub mod prompts;
pub mod recipes;
pub mod router;
pub mod session;
pub mod state;

pub use agent::{build_conversation_loop, CollectNode, LoopConfig, PauseNode, SearchNode};
pub use config::AssistantConfig;
pub use error::{AgentError, CollaboratorError};
pub use extract::{Candidate, CandidatePreferences, Extraction, Extractor, MAX_EXTRACTED_INGREDIENTS};
pub use graph::{CompilationError, CompiledStateGraph, Next, Node, StateGraph, END, START};
pub use llm::{ChatOpenAI, LlmClient, LlmResponse, MockLlm, MockReply};
pub use merge::{CandidateUpdater, MergePolicy};
pub use message::Message;
pub use recipes::{
    FinderResult, GenerativeFallback, LlmRecipeWriter, RecipeFinder, RecipeQuery, RecipeSearch,
    RecipeSource, SearchOutcome, SpoonacularClient, TavilyClient, WebOutcome, WebSearch,
    WebSnippet,
};
pub use router::{decide, Stage, DEFAULT_ITERATION_CEILING};
pub use session::{ConversationSession, SessionError, TurnReply};
pub use state::{ConversationState, Preferences, Recipe};
