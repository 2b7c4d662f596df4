//! Flag-gated progression
//!
//! One-time content (chapter intros, day briefings, decisions) is shown when
//! its required flags are set, the content exists for the current position,
//! and its own "seen" flag is not yet set. Acknowledging content sets exactly
//! that one "seen" flag.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::aggregates::GameState;
use crate::value_objects::{flag_keys, FlagSet};

/// Position and flags a gate is evaluated against.
#[derive(Debug, Clone, Copy)]
pub struct GateContext<'a> {
    pub flags: &'a FlagSet,
    pub chapter: u32,
    pub day: u32,
}

impl<'a> GateContext<'a> {
    pub fn new(flags: &'a FlagSet, chapter: u32, day: u32) -> Self {
        Self {
            flags,
            chapter,
            day,
        }
    }
}

impl<'a> From<&'a GameState> for GateContext<'a> {
    fn from(state: &'a GameState) -> Self {
        Self::new(&state.flags, state.chapter, state.day)
    }
}

/// Precondition flags AND content exists AND NOT already seen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentGate {
    pub requires: Vec<String>,
    pub seen_flag: String,
}

impl ContentGate {
    pub fn new(requires: Vec<String>, seen_flag: impl Into<String>) -> Self {
        Self {
            requires,
            seen_flag: seen_flag.into(),
        }
    }

    pub fn is_open(&self, flags: &FlagSet, content_exists: bool) -> bool {
        content_exists
            && self.requires.iter().all(|flag| flags.is_set(flag))
            && !flags.is_set(&self.seen_flag)
    }

    pub fn acknowledge(&self, flags: &mut FlagSet) {
        flags.set(self.seen_flag.clone());
    }
}

/// Briefing shown at the start of a day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Briefing {
    pub title: String,
    #[serde(default)]
    pub lines: Vec<String>,
}

/// A one-time choice offered on a day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub id: String,
    pub prompt: String,
    /// Extra flags that must be set before the decision is offered
    #[serde(default)]
    pub requires: Vec<String>,
}

/// Per-day configuration of a chapter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayConfig {
    #[serde(default)]
    pub briefing: Option<Briefing>,
    #[serde(default)]
    pub decisions: Vec<Decision>,
}

/// Content configuration for one chapter, keyed by chapter-relative day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterScript {
    pub chapter: u32,
    #[serde(default)]
    pub intro: Option<Briefing>,
    #[serde(default)]
    pub days: BTreeMap<u32, DayConfig>,
}

impl ChapterScript {
    pub fn day(&self, day: u32) -> Option<&DayConfig> {
        self.days.get(&day)
    }
}

pub fn intro_gate(chapter: u32) -> ContentGate {
    ContentGate::new(
        vec![flag_keys::CHARACTER_CREATED.to_string()],
        flag_keys::chapter_intro_seen(chapter),
    )
}

pub fn briefing_gate(chapter: u32, day: u32) -> ContentGate {
    ContentGate::new(
        vec![flag_keys::chapter_intro_seen(chapter)],
        flag_keys::day_briefing_seen(day),
    )
}

pub fn decision_gate(chapter: u32, decision: &Decision) -> ContentGate {
    let mut requires = vec![flag_keys::chapter_intro_seen(chapter)];
    requires.extend(decision.requires.iter().cloned());
    ContentGate::new(requires, flag_keys::decision_made(&decision.id))
}

/// The chapter intro, if it should be shown now.
pub fn eligible_intro<'s>(script: &'s ChapterScript, ctx: GateContext<'_>) -> Option<&'s Briefing> {
    if script.chapter != ctx.chapter {
        return None;
    }
    let intro = script.intro.as_ref();
    intro_gate(ctx.chapter)
        .is_open(ctx.flags, intro.is_some())
        .then_some(intro)
        .flatten()
}

/// The current day's briefing, if it should be shown now.
pub fn eligible_briefing<'s>(
    script: &'s ChapterScript,
    ctx: GateContext<'_>,
) -> Option<&'s Briefing> {
    if script.chapter != ctx.chapter {
        return None;
    }
    let briefing = script.day(ctx.day).and_then(|d| d.briefing.as_ref());
    briefing_gate(ctx.chapter, ctx.day)
        .is_open(ctx.flags, briefing.is_some())
        .then_some(briefing)
        .flatten()
}

/// Decisions for the current day that have not been made yet.
pub fn eligible_decisions<'s>(script: &'s ChapterScript, ctx: GateContext<'_>) -> Vec<&'s Decision> {
    if script.chapter != ctx.chapter {
        return Vec::new();
    }
    script
        .day(ctx.day)
        .map(|d| d.decisions.iter())
        .into_iter()
        .flatten()
        .filter(|decision| decision_gate(ctx.chapter, decision).is_open(ctx.flags, true))
        .collect()
}

pub fn acknowledge_intro(flags: &mut FlagSet, chapter: u32) {
    intro_gate(chapter).acknowledge(flags);
}

pub fn acknowledge_briefing(flags: &mut FlagSet, chapter: u32, day: u32) {
    briefing_gate(chapter, day).acknowledge(flags);
}

pub fn record_decision(flags: &mut FlagSet, chapter: u32, decision: &Decision) {
    decision_gate(chapter, decision).acknowledge(flags);
}
