use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

macro_rules! define_id {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            pub fn to_uuid(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(value: Uuid) -> Self {
                Self(value)
            }
        }

        impl From<$name> for Uuid {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

/// Opaque string identifiers: non-empty after trimming, compared verbatim.
macro_rules! define_string_id {
    ($name:ident, $label:literal) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
                let value = value.into();
                let trimmed = value.trim();
                if trimmed.is_empty() {
                    return Err(DomainError::validation(concat!($label, " cannot be empty")));
                }
                Ok(Self(trimmed.to_string()))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = DomainError;

            fn try_from(s: String) -> Result<Self, Self::Error> {
                Self::new(s)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = DomainError;

            fn try_from(s: &str) -> Result<Self, Self::Error> {
                Self::new(s)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> String {
                id.0
            }
        }
    };
}

// Server-assigned record IDs
define_id!(SaveId);
define_id!(LeaderboardEntryId);

impl SaveId {
    /// Identity given to a save that only exists locally (remote save failed).
    pub fn placeholder() -> Self {
        Self(Uuid::nil())
    }

    pub fn is_placeholder(&self) -> bool {
        self.0.is_nil()
    }
}

// Client/session identity
define_string_id!(SessionId, "Session id");
define_string_id!(UserId, "User id");

// Kanban board identity
define_string_id!(TaskId, "Task id");
define_string_id!(ColumnId, "Column id");

// Achievements
define_string_id!(BadgeId, "Badge id");

impl SessionId {
    /// Generate a fresh random (v4) session identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_ids_are_trimmed() {
        let id = SessionId::new("  abc-123 ").expect("valid id");
        assert_eq!(id.as_str(), "abc-123");
    }

    #[test]
    fn empty_string_ids_are_rejected() {
        assert!(TaskId::new("   ").is_err());
        assert!(serde_json::from_str::<ColumnId>("\"\"").is_err());
    }

    #[test]
    fn generated_session_ids_are_v4_uuids() {
        let id = SessionId::generate();
        let parsed = Uuid::parse_str(id.as_str()).expect("uuid string");
        assert_eq!(parsed.get_version_num(), 4);
    }

    #[test]
    fn placeholder_save_id_is_nil() {
        assert!(SaveId::placeholder().is_placeholder());
        assert!(!SaveId::new().is_placeholder());
    }
}
