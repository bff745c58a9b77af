//! Turning free-form model replies into candidate ingredients and preferences.
//!
//! The pipeline: strip code fences, isolate the first balanced `{...}`/`[...]`,
//! parse strictly, retry after [`repair_json`], then normalise into a [`Candidate`].
//! Every path ends in a value; malformed input yields the empty candidate.
//!
//! The extractor is pure. It never reads or writes conversation state; the merge
//! policy decides what a candidate does to the state.

mod repair;
mod scan;

pub use repair::repair_json;
pub use scan::{find_json_span, strip_code_fences};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::AgentError;
use crate::llm::LlmResponse;

/// Above this many ingredients a single extraction is treated as hallucinated.
pub const MAX_EXTRACTED_INGREDIENTS: usize = 10;

/// Raw preference values as the model stated them, before merge validation.
///
/// `prep_time` stays textual so the merge policy can reject non-numeric values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidatePreferences {
    pub diet: Option<String>,
    pub allergies: Option<Vec<String>>,
    pub cuisine: Option<String>,
    pub prep_time: Option<String>,
    pub craving: Option<String>,
}

impl CandidatePreferences {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// One extraction result in canonical shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub ingredients: Vec<String>,
    pub preferences: CandidatePreferences,
    /// The user asked to start the ingredient list over ("actually I only have rice").
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub replace_ingredients: bool,
}

impl Candidate {
    pub fn is_empty(&self) -> bool {
        self.ingredients.is_empty() && self.preferences.is_empty() && !self.replace_ingredients
    }
}

/// Outcome of one extraction attempt, including the model call that fed it.
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    /// Something usable was recovered.
    Parsed(Candidate),
    /// The model answered but nothing could be recovered.
    Empty,
    /// The model call itself failed.
    CollaboratorFailure(String),
}

impl Extraction {
    /// The candidate to merge; empty unless parsed.
    pub fn candidate(&self) -> Candidate {
        match self {
            Extraction::Parsed(c) => c.clone(),
            _ => Candidate::default(),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Extraction::CollaboratorFailure(_))
    }
}

/// Stateless extractor holding the hallucination guard threshold.
#[derive(Debug, Clone, Copy)]
pub struct Extractor {
    max_ingredients: usize,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(MAX_EXTRACTED_INGREDIENTS)
    }
}

impl Extractor {
    pub fn new(max_ingredients: usize) -> Self {
        Self { max_ingredients }
    }

    pub fn max_ingredients(&self) -> usize {
        self.max_ingredients
    }

    /// Extracts from raw text. Always returns the canonical structure.
    pub fn extract_candidate(&self, text: &str) -> Candidate {
        match parse_json_lenient(text) {
            Some(value) => self.normalize(&value),
            None => Candidate::default(),
        }
    }

    /// Extracts a bare ingredient list, for prompts that ask for only that.
    pub fn extract_ingredient_list(&self, text: &str) -> Vec<String> {
        self.extract_candidate(text).ingredients
    }

    /// Classifies a model call result into an [`Extraction`].
    pub fn from_response(&self, response: Result<LlmResponse, AgentError>) -> Extraction {
        let response = match response {
            Ok(r) => r,
            Err(e) => return Extraction::CollaboratorFailure(e.to_string()),
        };
        let candidate = match response {
            LlmResponse::Structured(value) => self.normalize(&value),
            other => self.extract_candidate(&other.into_text()),
        };
        if candidate.is_empty() {
            Extraction::Empty
        } else {
            Extraction::Parsed(candidate)
        }
    }

    /// Normalises an already-parsed value into a candidate, applying the guard.
    pub fn normalize(&self, value: &Value) -> Candidate {
        let candidate = match value {
            Value::Object(map) => candidate_from_object(map),
            Value::Array(items) => match items.iter().find_map(Value::as_object) {
                Some(first) => candidate_from_object(first),
                None => Candidate {
                    ingredients: string_list(value).unwrap_or_default(),
                    ..Candidate::default()
                },
            },
            Value::String(s) => match parse_json_lenient(s) {
                // Double-encoded JSON string.
                Some(inner) if !inner.is_string() => return self.normalize(&inner),
                _ => Candidate::default(),
            },
            _ => Candidate::default(),
        };
        if candidate.ingredients.len() > self.max_ingredients {
            tracing::warn!(
                count = candidate.ingredients.len(),
                max = self.max_ingredients,
                "discarding extraction with too many ingredients"
            );
            return Candidate::default();
        }
        candidate
    }
}

/// Fence strip, balanced scan, strict parse, then one repaired parse.
pub fn parse_json_lenient(text: &str) -> Option<Value> {
    let body = strip_code_fences(text);
    let span = find_json_span(body)?;
    match serde_json::from_str::<Value>(span) {
        Ok(v) => Some(v),
        Err(strict_err) => {
            let repaired = repair_json(span);
            match serde_json::from_str::<Value>(&repaired) {
                Ok(v) => {
                    tracing::debug!(error = %strict_err, "parsed model output after repair");
                    Some(v)
                }
                Err(e) => {
                    tracing::debug!(error = %e, "model output is not recoverable JSON");
                    None
                }
            }
        }
    }
}

fn candidate_from_object(map: &Map<String, Value>) -> Candidate {
    let ingredients = map
        .get("ingredients")
        .and_then(string_list)
        .unwrap_or_default();
    // Some models flatten the preference fields onto the top level.
    let prefs_source = match map.get("preferences") {
        Some(Value::Object(p)) => p,
        _ => map,
    };
    let replace_ingredients = map
        .get("ingredients_intent")
        .and_then(Value::as_str)
        .is_some_and(|s| s.trim().eq_ignore_ascii_case("replace"));

    Candidate {
        ingredients,
        preferences: CandidatePreferences {
            diet: text_field(prefs_source.get("diet")),
            allergies: prefs_source.get("allergies").and_then(string_list),
            cuisine: text_field(prefs_source.get("cuisine")),
            prep_time: prep_time_field(prefs_source.get("prep_time")),
            craving: text_field(prefs_source.get("craving")),
        },
        replace_ingredients,
    }
}

/// A list of trimmed non-empty strings. A scalar string is split on commas.
fn string_list(value: &Value) -> Option<Vec<String>> {
    match value {
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(|v| v.as_str())
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
        ),
        Value::String(s) => Some(
            s.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
        ),
        _ => None,
    }
}

fn text_field(value: Option<&Value>) -> Option<String> {
    let s = value?.as_str()?.trim();
    if s.is_empty() || is_null_word(s) {
        None
    } else {
        Some(s.to_string())
    }
}

/// Numbers become their integer text when whole; strings are kept as stated.
fn prep_time_field(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                Some(u.to_string())
            } else if let Some(f) = n.as_f64().filter(|f| f.fract() == 0.0 && *f >= 0.0) {
                Some(format!("{}", f as u64))
            } else {
                Some(n.to_string())
            }
        }
        other => text_field(Some(other)),
    }
}

fn is_null_word(s: &str) -> bool {
    ["null", "none", "n/a", "not specified"]
        .iter()
        .any(|w| s.eq_ignore_ascii_case(w))
}
