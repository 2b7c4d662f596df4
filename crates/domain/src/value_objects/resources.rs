//! Project resources tracked across a playthrough.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;

/// A whole-number percentage in `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Percentage(u8);

impl Percentage {
    pub const MIN: Percentage = Percentage(0);
    pub const MAX: Percentage = Percentage(100);

    pub fn new(value: i64) -> Result<Self, DomainError> {
        if !(0..=100).contains(&value) {
            return Err(DomainError::validation(format!(
                "Percentage must be between 0 and 100, got {value}"
            )));
        }
        Ok(Self(value as u8))
    }

    /// Clamp any value into range.
    pub fn saturating(value: i64) -> Self {
        Self(value.clamp(0, 100) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Apply a signed change, clamping at the bounds.
    pub fn adjust(self, delta: i32) -> Self {
        Self::saturating(i64::from(self.0) + i64::from(delta))
    }
}

impl TryFrom<i64> for Percentage {
    type Error = DomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Percentage> for u8 {
    fn from(value: Percentage) -> u8 {
        value.0
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Team and project health meters plus the remaining budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resources {
    pub morale: Percentage,
    pub trust: Percentage,
    pub productivity: Percentage,
    pub quality: Percentage,
    /// Remaining budget in whole currency units
    pub budget: u64,
}

impl Default for Resources {
    /// Starting position for a new project.
    fn default() -> Self {
        Self {
            morale: Percentage(70),
            trust: Percentage(50),
            productivity: Percentage(60),
            quality: Percentage(70),
            budget: 100_000,
        }
    }
}

impl Resources {
    /// Apply a set of signed changes, clamping meters to `0..=100` and the budget at zero.
    pub fn apply(self, delta: &ResourceDelta) -> Self {
        let budget = if delta.budget.is_negative() {
            self.budget.saturating_sub(delta.budget.unsigned_abs())
        } else {
            self.budget.saturating_add(delta.budget.unsigned_abs())
        };

        Self {
            morale: self.morale.adjust(delta.morale),
            trust: self.trust.adjust(delta.trust),
            productivity: self.productivity.adjust(delta.productivity),
            quality: self.quality.adjust(delta.quality),
            budget,
        }
    }
}

/// Signed changes produced by a decision or event outcome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceDelta {
    pub morale: i32,
    pub trust: i32,
    pub productivity: i32,
    pub quality: i32,
    pub budget: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_rejects_out_of_range() {
        assert!(Percentage::new(-1).is_err());
        assert!(Percentage::new(101).is_err());
        assert_eq!(Percentage::new(42).expect("in range").value(), 42);
    }

    #[test]
    fn percentage_deserialization_enforces_range() {
        assert!(serde_json::from_str::<Percentage>("150").is_err());
        assert_eq!(
            serde_json::from_str::<Percentage>("0").expect("in range"),
            Percentage::MIN
        );
    }

    #[test]
    fn apply_clamps_meters_and_budget() {
        let resources = Resources {
            morale: Percentage::saturating(95),
            trust: Percentage::saturating(5),
            productivity: Percentage::saturating(50),
            quality: Percentage::saturating(50),
            budget: 1_000,
        };
        let delta = ResourceDelta {
            morale: 10,
            trust: -10,
            productivity: 5,
            quality: 0,
            budget: -5_000,
        };

        let updated = resources.apply(&delta);

        assert_eq!(updated.morale, Percentage::MAX);
        assert_eq!(updated.trust, Percentage::MIN);
        assert_eq!(updated.productivity.value(), 55);
        assert_eq!(updated.quality.value(), 50);
        assert_eq!(updated.budget, 0);
    }

    #[test]
    fn resources_serialize_as_plain_numbers() {
        let json = serde_json::to_value(Resources::default()).expect("serialize");
        assert_eq!(json["morale"], 70);
        assert_eq!(json["budget"], 100_000);
    }
}
