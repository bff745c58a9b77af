//! Prompt text for the model collaborator.

use crate::message::{render_transcript, Message};
use crate::state::ConversationState;

/// System prompt for preference extraction.
pub const EXTRACTION_SYSTEM_PROMPT: &str = r#"You are a helpful cooking assistant. Extract what the user has told you so far:
- ingredients: a list of individual ingredients the user actually has
- preferences: diet, allergies, cuisine, prep_time, craving

Rules:
- Only include ingredients the user mentioned. Never invent or suggest items.
- prep_time must be a number of minutes (e.g. 30) or null if not specified.
- allergies is a list of specific allergies.
- diet is a diet type such as "vegetarian", "vegan", "halal", "keto", "low carb".
- cuisine is a cuisine type such as "Italian", "Chinese", "Mexican".
- Use null for anything the user has not mentioned.
- If the user says their earlier ingredients were wrong and lists new ones, add "ingredients_intent": "replace".

Respond with JSON only, like this:
{
  "ingredients": ["..."],
  "preferences": {
    "diet": null,
    "allergies": [],
    "cuisine": null,
    "prep_time": null,
    "craving": null
  }
}"#;

/// Assistant turn appended when the loop pauses.
pub const CLARIFYING_QUESTION: &str = "I still need to know what ingredients you have. \
Could you list the main ingredients in your kitchen (for example: chicken, rice, tomatoes)?";

/// System prompt for the generative recipe fallback.
pub const RECIPE_WRITER_SYSTEM_PROMPT: &str = r#"You are a professional chef and recipe assistant who gives clear, detailed cooking guidance.
Suggest only recipes that fit the user's ingredients and preferences. Respond with a valid JSON array of recipe objects with these fields:
- "title": a clear, descriptive title
- "image_url": URL of a representative image, or null
- "ingredients": every ingredient with a precise quantity (e.g. "2 tablespoons olive oil")
- "instructions": detailed step-by-step directions a beginner can follow, with times, temperatures and visual cues
- "grocery_list": items needed that are not in the user's ingredient list
- "calories": approximate calories per serving as a number, or null
Return JSON only."#;

/// Builds the extraction request: system prompt, then the transcript and the partial
/// state so the model does not re-ask for fields it already has.
pub fn extraction_messages(state: &ConversationState) -> Vec<Message> {
    let mut user = String::from("Conversation so far:\n");
    user.push_str(&render_transcript(&state.messages));
    user.push_str("\n\nAlready known (keep unless the user changed it):\n");
    user.push_str(&known_fields(state));
    vec![
        Message::system(EXTRACTION_SYSTEM_PROMPT),
        Message::user(user),
    ]
}

fn known_fields(state: &ConversationState) -> String {
    let value = serde_json::json!({
        "ingredients": state.ingredients,
        "preferences": state.preferences,
    });
    serde_json::to_string(&value).unwrap_or_else(|_| "{}".to_string())
}

/// Builds the generative fallback request from a free-text description of the query.
pub fn recipe_writer_messages(description: &str, count: usize) -> Vec<Message> {
    vec![
        Message::system(RECIPE_WRITER_SYSTEM_PROMPT),
        Message::user(format!(
            "Suggest up to {} recipes for: {}",
            count.max(1),
            description
        )),
    ]
}
