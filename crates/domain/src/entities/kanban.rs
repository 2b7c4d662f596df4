//! Kanban board - columns with WIP limits and the tasks placed on them
//!
//! Column membership is the only record of a task's status. A task id lives in
//! exactly one column's `task_ids`; the order of that sequence is the visual and
//! priority order. Moves never push a column past its WIP limit, but boards that
//! arrive over the limit (edited directly) are kept as-is and reported through
//! [`KanbanBoard::over_limit_columns`].

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use crate::error::DomainError;
use crate::ids::{ColumnId, TaskId};

/// Task difficulty on a 1-3 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Difficulty(u8);

impl Difficulty {
    pub fn new(value: u8) -> Result<Self, DomainError> {
        if !(1..=3).contains(&value) {
            return Err(DomainError::validation(format!(
                "Task difficulty must be between 1 and 3, got {value}"
            )));
        }
        Ok(Self(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Difficulty {
    type Error = DomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Difficulty> for u8 {
    fn from(value: Difficulty) -> u8 {
        value.0
    }
}

/// A unit of work on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    /// Free-form category (e.g. "design", "procurement", "inspection")
    #[serde(rename = "type")]
    pub task_type: String,
    pub difficulty: Difficulty,
}

impl Task {
    pub fn new(
        id: TaskId,
        title: impl Into<String>,
        task_type: impl Into<String>,
        difficulty: Difficulty,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            task_type: task_type.into(),
            difficulty,
        }
    }
}

/// A board column. `task_ids` order is the display/priority order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub id: ColumnId,
    pub title: String,
    pub wip_limit: u32,
    #[serde(default)]
    pub task_ids: Vec<TaskId>,
}

impl Column {
    pub fn new(id: ColumnId, title: impl Into<String>, wip_limit: u32) -> Result<Self, DomainError> {
        if wip_limit == 0 {
            return Err(DomainError::validation(format!(
                "Column '{id}' must have a positive WIP limit"
            )));
        }
        Ok(Self {
            id,
            title: title.into(),
            wip_limit,
            task_ids: Vec::new(),
        })
    }

    pub fn task_count(&self) -> u32 {
        u32::try_from(self.task_ids.len()).unwrap_or(u32::MAX)
    }

    /// True once the column holds as many tasks as its WIP limit allows.
    pub fn is_full(&self) -> bool {
        self.task_count() >= self.wip_limit
    }

    pub fn is_over_limit(&self) -> bool {
        self.task_count() > self.wip_limit
    }

    pub fn contains(&self, task_id: &TaskId) -> bool {
        self.task_ids.iter().any(|id| id == task_id)
    }
}

/// Result of a move that did not violate a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved { from: ColumnId, to: ColumnId },
    /// The task is not on the board; nothing changed.
    TaskNotFound,
    /// The task already sits in the target column; nothing changed.
    AlreadyInColumn,
}

impl MoveOutcome {
    pub fn changed(&self) -> bool {
        matches!(self, Self::Moved { .. })
    }
}

/// Columns plus the task records they reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KanbanBoard {
    pub columns: Vec<Column>,
    #[serde(default)]
    pub tasks: BTreeMap<TaskId, Task>,
}

impl KanbanBoard {
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            tasks: BTreeMap::new(),
        }
    }

    pub fn column(&self, column_id: &ColumnId) -> Option<&Column> {
        self.columns.iter().find(|c| &c.id == column_id)
    }

    pub fn task(&self, task_id: &TaskId) -> Option<&Task> {
        self.tasks.get(task_id)
    }

    /// The column a task currently belongs to; this is the task's status.
    pub fn status_of(&self, task_id: &TaskId) -> Option<&ColumnId> {
        self.columns
            .iter()
            .find(|c| c.contains(task_id))
            .map(|c| &c.id)
    }

    /// Tasks of a column in display order. Ids without a task record are skipped.
    pub fn tasks_in<'a>(&'a self, column_id: &ColumnId) -> impl Iterator<Item = &'a Task> + 'a {
        self.column(column_id)
            .into_iter()
            .flat_map(|c| c.task_ids.iter())
            .filter_map(|id| self.tasks.get(id))
    }

    /// Put a new task at the end of a column, respecting the WIP limit.
    pub fn add_task(&mut self, task: Task, column_id: &ColumnId) -> Result<(), DomainError> {
        if self.tasks.contains_key(&task.id) || self.status_of(&task.id).is_some() {
            return Err(DomainError::constraint(format!(
                "Task '{}' is already on the board",
                task.id
            )));
        }

        let column = self
            .columns
            .iter_mut()
            .find(|c| &c.id == column_id)
            .ok_or_else(|| DomainError::not_found("Column", column_id.as_str()))?;
        if column.is_full() {
            return Err(DomainError::capacity_exceeded(
                column.id.as_str(),
                column.task_count(),
                column.wip_limit,
            ));
        }

        column.task_ids.push(task.id.clone());
        self.tasks.insert(task.id.clone(), task);
        Ok(())
    }

    /// Move a task to the end of another column.
    ///
    /// Unknown tasks and same-column moves are no-ops. A full target column
    /// rejects the move with [`DomainError::CapacityExceeded`] and the board is
    /// left untouched.
    pub fn move_task(
        &mut self,
        task_id: &TaskId,
        target: &ColumnId,
    ) -> Result<MoveOutcome, DomainError> {
        let Some(source_idx) = self.columns.iter().position(|c| c.contains(task_id)) else {
            return Ok(MoveOutcome::TaskNotFound);
        };

        let target_idx = self
            .columns
            .iter()
            .position(|c| &c.id == target)
            .ok_or_else(|| DomainError::not_found("Column", target.as_str()))?;

        if source_idx == target_idx {
            return Ok(MoveOutcome::AlreadyInColumn);
        }

        let target_column = &self.columns[target_idx];
        if target_column.is_full() {
            return Err(DomainError::capacity_exceeded(
                target_column.id.as_str(),
                target_column.task_count(),
                target_column.wip_limit,
            ));
        }

        self.columns[source_idx].task_ids.retain(|id| id != task_id);
        self.columns[target_idx].task_ids.push(task_id.clone());

        Ok(MoveOutcome::Moved {
            from: self.columns[source_idx].id.clone(),
            to: self.columns[target_idx].id.clone(),
        })
    }

    /// Columns holding more tasks than their limit (flagged, never corrected).
    pub fn over_limit_columns(&self) -> Vec<&Column> {
        self.columns.iter().filter(|c| c.is_over_limit()).collect()
    }

    /// Check the structural invariants of a board received from outside.
    ///
    /// Over-limit columns are tolerated here.
    pub fn validate(&self) -> Result<(), DomainError> {
        let mut column_ids = HashSet::new();
        let mut placed = HashSet::new();

        for column in &self.columns {
            if column.wip_limit == 0 {
                return Err(DomainError::validation(format!(
                    "Column '{}' must have a positive WIP limit",
                    column.id
                )));
            }
            if !column_ids.insert(&column.id) {
                return Err(DomainError::validation(format!(
                    "Duplicate column id '{}'",
                    column.id
                )));
            }
            for task_id in &column.task_ids {
                if !placed.insert(task_id) {
                    return Err(DomainError::validation(format!(
                        "Task '{task_id}' appears in more than one place on the board"
                    )));
                }
                if !self.tasks.contains_key(task_id) {
                    return Err(DomainError::validation(format!(
                        "Task '{task_id}' is placed on the board but has no task record"
                    )));
                }
            }
        }

        if let Some((orphan, _)) = self.tasks.iter().find(|(id, _)| !placed.contains(id)) {
            return Err(DomainError::validation(format!(
                "Task '{orphan}' is not placed in any column"
            )));
        }

        for (key, task) in &self.tasks {
            if key != &task.id {
                return Err(DomainError::validation(format!(
                    "Task record keyed '{key}' carries id '{}'",
                    task.id
                )));
            }
        }

        Ok(())
    }
}
