//! Merging an extracted candidate into the running conversation state.
//!
//! Per-field rules:
//!
//! | field | rule |
//! |---|---|
//! | `ingredients` | union, case-sensitive dedup, first-seen order |
//! | `diet`, `cuisine`, `craving` | last write wins; absent never clears |
//! | `allergies` | appended, null sentinels dropped, not deduplicated |
//! | `prep_time` | last write wins if it parses as a non-negative integer |

use std::fmt::Debug;

use crate::extract::Candidate;
use crate::state::ConversationState;

/// Customises how a candidate is folded into the state.
///
/// `CollectNode` calls this once per model reply. The default is [`MergePolicy`].
pub trait CandidateUpdater: Send + Sync + Debug {
    fn apply_update(&self, state: &mut ConversationState, candidate: &Candidate);
}

/// The base merge policy described in the module docs.
#[derive(Debug, Clone, Copy, Default)]
pub struct MergePolicy;

impl CandidateUpdater for MergePolicy {
    fn apply_update(&self, state: &mut ConversationState, candidate: &Candidate) {
        merge_candidate(state, candidate);
    }
}

/// Applies `candidate` to `state` field by field. Never fails; invalid values are skipped.
pub fn merge_candidate(state: &mut ConversationState, candidate: &Candidate) {
    for item in &candidate.ingredients {
        let item = item.trim();
        if !item.is_empty() && !state.ingredients.iter().any(|i| i == item) {
            state.ingredients.push(item.to_string());
        }
    }

    let incoming = &candidate.preferences;
    let prefs = &mut state.preferences;
    overwrite_if_present(&mut prefs.diet, &incoming.diet);
    overwrite_if_present(&mut prefs.cuisine, &incoming.cuisine);
    overwrite_if_present(&mut prefs.craving, &incoming.craving);

    if let Some(allergies) = &incoming.allergies {
        prefs.allergies.extend(
            allergies
                .iter()
                .map(|a| a.trim())
                .filter(|a| !is_sentinel(a))
                .map(String::from),
        );
    }

    if let Some(raw) = &incoming.prep_time {
        match parse_prep_time(raw) {
            Some(minutes) => prefs.prep_time = Some(minutes),
            None => tracing::debug!(value = %raw, "ignoring non-numeric prep_time"),
        }
    }
}

fn overwrite_if_present(slot: &mut Option<String>, value: &Option<String>) {
    if let Some(v) = value.as_deref().map(str::trim).filter(|v| !is_sentinel(v)) {
        *slot = Some(v.to_string());
    }
}

fn is_sentinel(value: &str) -> bool {
    value.is_empty() || value.eq_ignore_ascii_case("null")
}

/// Minutes as a non-negative integer; anything else is rejected.
pub fn parse_prep_time(raw: &str) -> Option<u32> {
    let raw = raw.trim();
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::CandidatePreferences;

    fn candidate(ingredients: &[&str], prefs: CandidatePreferences) -> Candidate {
        Candidate {
            ingredients: ingredients.iter().map(|s| s.to_string()).collect(),
            preferences: prefs,
            replace_ingredients: false,
        }
    }

    #[test]
    fn chicken_rice_vegan_into_empty_state() {
        let mut state = ConversationState::new();
        let c = candidate(
            &["chicken", "rice"],
            CandidatePreferences {
                diet: Some("vegan".into()),
                ..Default::default()
            },
        );
        merge_candidate(&mut state, &c);
        assert_eq!(state.ingredients, vec!["chicken", "rice"]);
        assert_eq!(state.preferences.diet.as_deref(), Some("vegan"));
    }

    #[test]
    fn ingredients_union_is_case_sensitive() {
        let mut state = ConversationState::new();
        merge_candidate(&mut state, &candidate(&["Rice", "beans"], Default::default()));
        merge_candidate(&mut state, &candidate(&["rice", "beans", " "], Default::default()));
        assert_eq!(state.ingredients, vec!["Rice", "beans", "rice"]);
    }

    #[test]
    fn merging_twice_is_idempotent_except_allergies() {
        let c = candidate(
            &["eggs"],
            CandidatePreferences {
                diet: Some("keto".into()),
                allergies: Some(vec!["peanuts".into()]),
                cuisine: Some("thai".into()),
                prep_time: Some("20".into()),
                craving: Some("spicy".into()),
            },
        );
        let mut once = ConversationState::new();
        merge_candidate(&mut once, &c);
        let mut twice = once.clone();
        merge_candidate(&mut twice, &c);

        assert_eq!(twice.ingredients, once.ingredients);
        assert_eq!(twice.preferences.diet, once.preferences.diet);
        assert_eq!(twice.preferences.cuisine, once.preferences.cuisine);
        assert_eq!(twice.preferences.craving, once.preferences.craving);
        assert_eq!(twice.preferences.prep_time, once.preferences.prep_time);
        assert_eq!(twice.preferences.allergies, vec!["peanuts", "peanuts"]);
    }

    #[test]
    fn absent_values_never_clear() {
        let mut state = ConversationState::new();
        state.preferences.diet = Some("vegetarian".into());
        state.preferences.cuisine = Some("italian".into());
        merge_candidate(
            &mut state,
            &candidate(
                &[],
                CandidatePreferences {
                    diet: None,
                    cuisine: Some("null".into()),
                    ..Default::default()
                },
            ),
        );
        assert_eq!(state.preferences.diet.as_deref(), Some("vegetarian"));
        assert_eq!(state.preferences.cuisine.as_deref(), Some("italian"));
    }

    #[test]
    fn later_value_overwrites() {
        let mut state = ConversationState::new();
        state.preferences.craving = Some("soup".into());
        merge_candidate(
            &mut state,
            &candidate(
                &[],
                CandidatePreferences {
                    craving: Some("noodles".into()),
                    ..Default::default()
                },
            ),
        );
        assert_eq!(state.preferences.craving.as_deref(), Some("noodles"));
    }

    #[test]
    fn allergy_sentinels_are_dropped() {
        let mut state = ConversationState::new();
        merge_candidate(
            &mut state,
            &candidate(
                &[],
                CandidatePreferences {
                    allergies: Some(vec!["null".into(), "".into(), "shellfish".into()]),
                    ..Default::default()
                },
            ),
        );
        assert_eq!(state.preferences.allergies, vec!["shellfish"]);
    }

    #[test]
    fn word_prep_time_is_rejected_and_number_kept() {
        let mut state = ConversationState::new();
        state.preferences.prep_time = Some(45);
        merge_candidate(
            &mut state,
            &candidate(
                &[],
                CandidatePreferences {
                    prep_time: Some("thirty".into()),
                    ..Default::default()
                },
            ),
        );
        assert_eq!(state.preferences.prep_time, Some(45));
    }

    #[test]
    fn prep_time_parsing() {
        assert_eq!(parse_prep_time("30"), Some(30));
        assert_eq!(parse_prep_time(" 0 "), Some(0));
        assert_eq!(parse_prep_time("-5"), None);
        assert_eq!(parse_prep_time("+5"), None);
        assert_eq!(parse_prep_time("30 minutes"), None);
        assert_eq!(parse_prep_time("2.5"), None);
        assert_eq!(parse_prep_time(""), None);
        assert_eq!(parse_prep_time("99999999999"), None);
    }

    #[test]
    fn policy_trait_delegates_to_merge() {
        let mut state = ConversationState::new();
        MergePolicy.apply_update(&mut state, &candidate(&["leek"], Default::default()));
        assert_eq!(state.ingredients, vec!["leek"]);
    }
}
