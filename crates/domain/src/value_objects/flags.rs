//! Boolean story flags.
//!
//! Flags gate one-time content (intros, briefings, decisions). The set is an
//! explicit value that callers pass by reference into gate checks.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Name -> boolean flag mapping. Missing flags read as unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlagSet(BTreeMap<String, bool>);

impl FlagSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_set(&self, name: &str) -> bool {
        self.0.get(name).copied().unwrap_or(false)
    }

    pub fn set(&mut self, name: impl Into<String>) {
        self.0.insert(name.into(), true);
    }

    pub fn clear(&mut self, name: &str) {
        self.0.insert(name.to_string(), false);
    }

    /// Builder-style variant of [`FlagSet::set`].
    pub fn with(mut self, name: impl Into<String>) -> Self {
        self.set(name);
        self
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl FromIterator<(String, bool)> for FlagSet {
    fn from_iter<T: IntoIterator<Item = (String, bool)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Well-known flag names.
pub mod flag_keys {
    pub const CHARACTER_CREATED: &str = "character_created";

    pub fn chapter_intro_seen(chapter: u32) -> String {
        format!("chapter_{chapter}_intro_seen")
    }

    pub fn day_briefing_seen(day: u32) -> String {
        format!("day_{day}_briefing_seen")
    }

    pub fn decision_made(decision_id: &str) -> String {
        format!("decision_{decision_id}_made")
    }
}
