//! Weight value object.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// Contribution weight of a child inside its parent rollup, 0-100.
///
/// Weight 0 is legal and means "visible but non-contributing".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Weight(u8);

impl Weight {
    pub const ZERO: Self = Self(0);
    pub const MAX: Self = Self(100);

    /// Validates a raw weight.
    pub fn try_new(value: i64) -> Result<Self, ValidationError> {
        Self::checked("weight", value, 0)
    }

    /// Validates a raw weight for a named field with a custom lower bound.
    pub fn checked(field: &str, value: i64, min: i64) -> Result<Self, ValidationError> {
        if value < min || value > 100 {
            return Err(ValidationError::out_of_range(field, min, 100, value));
        }
        Ok(Self(value as u8))
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    pub fn as_i64(&self) -> i64 {
        i64::from(self.0)
    }
}

impl TryFrom<i64> for Weight {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

impl From<Weight> for i64 {
    fn from(weight: Weight) -> Self {
        weight.as_i64()
    }
}

impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_bounds() {
        assert_eq!(Weight::try_new(0).unwrap(), Weight::ZERO);
        assert_eq!(Weight::try_new(100).unwrap(), Weight::MAX);
    }

    #[test]
    fn rejects_negative_and_over_hundred() {
        assert!(Weight::try_new(-1).is_err());
        assert!(Weight::try_new(101).is_err());
    }

    #[test]
    fn checked_enforces_custom_minimum() {
        let err = Weight::checked("stage_weight", 0, 1).unwrap_err();
        assert_eq!(err, ValidationError::out_of_range("stage_weight", 1, 100, 0));
    }

    #[test]
    fn deserializing_validates_range() {
        assert!(serde_json::from_str::<Weight>("101").is_err());
        assert_eq!(serde_json::from_str::<Weight>("60").unwrap().value(), 60);
    }
}
