//! Dietary and cooking preferences gathered during the conversation.

use serde::{Deserialize, Serialize};

/// User preferences for recipe selection. Every field starts absent or empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    /// Dietary restriction (e.g. vegan, halal, keto).
    #[serde(default)]
    pub diet: Option<String>,
    /// Food allergies. Accumulated across turns; duplicates are kept.
    #[serde(default)]
    pub allergies: Vec<String>,
    /// Preferred cuisine (e.g. Italian, Mexican).
    #[serde(default)]
    pub cuisine: Option<String>,
    /// Maximum preparation time in minutes.
    #[serde(default)]
    pub prep_time: Option<u32>,
    /// What the user is in the mood for.
    #[serde(default)]
    pub craving: Option<String>,
}

impl Preferences {
    /// True when no field has been filled yet.
    pub fn is_empty(&self) -> bool {
        self.diet.is_none()
            && self.allergies.is_empty()
            && self.cuisine.is_none()
            && self.prep_time.is_none()
            && self.craving.is_none()
    }
}
