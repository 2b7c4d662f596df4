//! GameState aggregate - one saved playthrough
//!
//! A save belongs to a session identifier and, once the player is signed in,
//! to an account as well. Every write stamps `last_played`. Partial updates
//! arrive as a [`GameStatePatch`] and replace whole top-level fields.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::entities::KanbanBoard;
use crate::error::DomainError;
use crate::ids::{BadgeId, SaveId, SessionId, UserId};
use crate::value_objects::{flag_keys, FlagSet, PlayerName, ResourceDelta, Resources};

/// Working days in one in-game week.
pub const DAYS_PER_WEEK: u32 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    /// Assigned by the remote service; a placeholder while only held locally
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<SaveId>,
    pub session_id: SessionId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub player_name: String,
    pub chapter: u32,
    pub week: u32,
    /// Chapter-relative day
    pub day: u32,
    pub resources: Resources,
    #[serde(default)]
    pub flags: FlagSet,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kanban_state: Option<KanbanBoard>,
    #[serde(default)]
    pub completed_chapters: BTreeSet<u32>,
    #[serde(default)]
    pub unlocked_badges: BTreeSet<BadgeId>,
    pub last_played: DateTime<Utc>,
}

impl GameState {
    /// Fresh playthrough for a newly created character.
    pub fn new_game(session_id: SessionId, player_name: PlayerName, now: DateTime<Utc>) -> Self {
        let mut state = Self::blank(session_id, now);
        state.player_name = player_name.into();
        state.flags.set(flag_keys::CHARACTER_CREATED);
        state
    }

    /// Starting values with no player data, used when a patch arrives for a
    /// session that has nothing saved yet.
    pub fn blank(session_id: SessionId, now: DateTime<Utc>) -> Self {
        Self {
            id: None,
            session_id,
            user_id: None,
            player_name: String::new(),
            chapter: 1,
            week: 1,
            day: 1,
            resources: Resources::default(),
            flags: FlagSet::new(),
            kanban_state: None,
            completed_chapters: BTreeSet::new(),
            unlocked_badges: BTreeSet::new(),
            last_played: now,
        }
    }

    pub fn with_id(mut self, id: SaveId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_user_id(mut self, user_id: Option<UserId>) -> Self {
        self.user_id = user_id;
        self
    }

    /// Stamp the write time.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.last_played = now;
    }

    /// Shallow merge: every field present in the patch replaces the current value.
    pub fn apply_patch(&mut self, patch: &GameStatePatch) {
        if let Some(player_name) = &patch.player_name {
            self.player_name = player_name.clone();
        }
        if let Some(chapter) = patch.chapter {
            self.chapter = chapter;
        }
        if let Some(week) = patch.week {
            self.week = week;
        }
        if let Some(day) = patch.day {
            self.day = day;
        }
        if let Some(resources) = patch.resources {
            self.resources = resources;
        }
        if let Some(flags) = &patch.flags {
            self.flags = flags.clone();
        }
        if let Some(kanban_state) = &patch.kanban_state {
            self.kanban_state = Some(kanban_state.clone());
        }
        if let Some(completed) = &patch.completed_chapters {
            self.completed_chapters = completed.clone();
        }
        if let Some(badges) = &patch.unlocked_badges {
            self.unlocked_badges = badges.clone();
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        validate_progress(Some(self.chapter), Some(self.week), Some(self.day))?;
        if let Some(board) = &self.kanban_state {
            board.validate()?;
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Progression
    // -------------------------------------------------------------------------

    /// Move to the next day, rolling into a new week every `DAYS_PER_WEEK` days.
    pub fn advance_day(&mut self) {
        self.day = self.day.saturating_add(1);
        if (self.day - 1) % DAYS_PER_WEEK == 0 {
            self.week = self.week.saturating_add(1);
        }
    }

    /// Record the current chapter as complete and open the next one at day 1.
    pub fn complete_chapter(&mut self) {
        self.completed_chapters.insert(self.chapter);
        self.chapter = self.chapter.saturating_add(1);
        self.week = self.week.saturating_add(1);
        self.day = 1;
    }

    /// Returns false when the badge was already unlocked.
    pub fn unlock_badge(&mut self, badge: BadgeId) -> bool {
        self.unlocked_badges.insert(badge)
    }

    pub fn apply_resources(&mut self, delta: &ResourceDelta) {
        self.resources = self.resources.apply(delta);
    }
}

/// Partial update payload. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStatePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chapter: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub week: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<Resources>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flags: Option<FlagSet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kanban_state: Option<KanbanBoard>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_chapters: Option<BTreeSet<u32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unlocked_badges: Option<BTreeSet<BadgeId>>,
}

impl GameStatePatch {
    pub fn flags(flags: FlagSet) -> Self {
        Self {
            flags: Some(flags),
            ..Self::default()
        }
    }

    pub fn resources(resources: Resources) -> Self {
        Self {
            resources: Some(resources),
            ..Self::default()
        }
    }

    pub fn kanban(board: KanbanBoard) -> Self {
        Self {
            kanban_state: Some(board),
            ..Self::default()
        }
    }

    /// Progress fields (chapter, week, day, completed chapters) copied from a state.
    pub fn progress_of(state: &GameState) -> Self {
        Self {
            chapter: Some(state.chapter),
            week: Some(state.week),
            day: Some(state.day),
            completed_chapters: Some(state.completed_chapters.clone()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if let Some(name) = &self.player_name {
            PlayerName::new(name.as_str())?;
        }
        validate_progress(self.chapter, self.week, self.day)?;
        if let Some(board) = &self.kanban_state {
            board.validate()?;
        }
        Ok(())
    }
}

fn validate_progress(
    chapter: Option<u32>,
    week: Option<u32>,
    day: Option<u32>,
) -> Result<(), DomainError> {
    for (name, value) in [("chapter", chapter), ("week", week), ("day", day)] {
        if value == Some(0) {
            return Err(DomainError::validation(format!("{name} must be at least 1")));
        }
    }
    Ok(())
}
