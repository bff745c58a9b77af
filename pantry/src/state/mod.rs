//! State types for the collection loop.
//!
//! One [`ConversationState`] flows through the compiled loop
//! ([`build_conversation_loop`](crate::agent::build_conversation_loop)); the collect node
//! merges extracted fields into it, the router reads it, and the search node fills
//! [`ConversationState::recipes`].
//!
//! # Main types
//!
//! - [`ConversationState`]: ingredients, preferences, transcript, progress counters, recipes.
//! - [`Preferences`]: diet, allergies, cuisine, prep time, craving.
//! - [`Recipe`]: one normalized recipe suggestion.
//!
//! # Example
//!
//! ```rust
//! use pantry::ConversationState;
//!
//! let mut state = ConversationState::new();
//! state.push_user("I have chicken and rice");
//! assert!(!state.force_pause);
//! assert_eq!(state.iterations, 0);
//! ```

mod conversation_state;
mod preferences;
mod recipe;

pub use conversation_state::ConversationState;
pub use preferences::Preferences;
pub use recipe::{Recipe, DEFAULT_RECIPE_TITLE};
