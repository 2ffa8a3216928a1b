//! Percentage value object (0-100 scale).
//!
//! Every computed progress value in the engine is a `Percentage`.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// A value between 0 and 100 inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Percentage(u8);

impl Percentage {
    /// Zero percent.
    pub const ZERO: Self = Self(0);

    /// One hundred percent.
    pub const HUNDRED: Self = Self(100);

    /// Creates a new Percentage, clamping to valid range.
    pub fn new(value: u8) -> Self {
        Self(value.min(100))
    }

    /// Creates a Percentage, returning error if out of range.
    pub fn try_new(value: i64) -> Result<Self, ValidationError> {
        if !(0..=100).contains(&value) {
            return Err(ValidationError::out_of_range("percentage", 0, 100, value));
        }
        Ok(Self(value as u8))
    }

    /// Rounds a raw ratio (already scaled to 0-100) and clamps it into range.
    ///
    /// NaN clamps to zero.
    pub fn from_f64_clamped(value: f64) -> Self {
        if value.is_nan() || value <= 0.0 {
            return Self::ZERO;
        }
        if value >= 100.0 {
            return Self::HUNDRED;
        }
        Self(value.round() as u8)
    }

    /// Returns the value as u8.
    pub fn value(&self) -> u8 {
        self.0
    }

    /// Returns the value as a fraction (0.0 to 1.0).
    pub fn as_fraction(&self) -> f64 {
        f64::from(self.0) / 100.0
    }
}

impl Default for Percentage {
    fn default() -> Self {
        Self::ZERO
    }
}

impl TryFrom<i64> for Percentage {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

impl From<Percentage> for i64 {
    fn from(percentage: Percentage) -> Self {
        i64::from(percentage.0)
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_new_clamps_to_100() {
        assert_eq!(Percentage::new(101).value(), 100);
        assert_eq!(Percentage::new(255).value(), 100);
    }

    #[test]
    fn percentage_try_new_rejects_out_of_range() {
        assert!(Percentage::try_new(101).is_err());
        assert!(Percentage::try_new(-1).is_err());
        assert_eq!(Percentage::try_new(40).unwrap().value(), 40);
    }

    #[test]
    fn from_f64_clamped_rounds_and_clamps() {
        assert_eq!(Percentage::from_f64_clamped(49.5).value(), 50);
        assert_eq!(Percentage::from_f64_clamped(49.4).value(), 49);
        assert_eq!(Percentage::from_f64_clamped(-20.0), Percentage::ZERO);
        assert_eq!(Percentage::from_f64_clamped(180.0), Percentage::HUNDRED);
        assert_eq!(Percentage::from_f64_clamped(f64::NAN), Percentage::ZERO);
    }

    #[test]
    fn percentage_as_fraction_converts_correctly() {
        assert!((Percentage::new(50).as_fraction() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn percentage_displays_correctly() {
        assert_eq!(format!("{}", Percentage::new(75)), "75%");
    }

    #[test]
    fn percentage_serializes_to_json() {
        assert_eq!(serde_json::to_string(&Percentage::new(42)).unwrap(), "42");
    }

    #[test]
    fn percentage_deserialize_rejects_out_of_range() {
        assert!(serde_json::from_str::<Percentage>("150").is_err());
        assert!(serde_json::from_str::<Percentage>("-1").is_err());
        assert_eq!(serde_json::from_str::<Percentage>("80").unwrap(), Percentage::new(80));
    }
}
