//! Domain errors
//!
//! Every fallible rule in this crate returns [`DomainError`]. The Kanban WIP
//! rejection is its own variant because callers surface it to the player.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed its range or format check
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Entity not found
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// The operation conflicts with existing state
    #[error("Constraint violation: {0}")]
    Constraint(String),

    /// A Kanban column is already holding its WIP limit
    #[error("Column '{column}' is at its WIP limit: {current}/{limit} tasks")]
    CapacityExceeded {
        column: String,
        current: u32,
        limit: u32,
    },
}

impl DomainError {
    /// A value outside its allowed range or format.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a not found error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Create a constraint violation error
    pub fn constraint(msg: impl Into<String>) -> Self {
        Self::Constraint(msg.into())
    }

    /// Create a capacity exceeded error for a WIP-limited column
    pub fn capacity_exceeded(column: impl Into<String>, current: u32, limit: u32) -> Self {
        Self::CapacityExceeded {
            column: column.into(),
            current,
            limit,
        }
    }

    /// Check if this is a WIP capacity rejection.
    pub fn is_capacity_exceeded(&self) -> bool {
        matches!(self, Self::CapacityExceeded { .. })
    }
}
