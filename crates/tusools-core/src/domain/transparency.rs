//! Terminal transparency level.
//!
//! The user enters a percentage.  The OS stores an 8-bit alpha value, called
//! the *backend unit* here, so the percentage is converted with a fixed
//! linear transform:
//!
//! ```text
//! unit = round_half_up(percent / 100 * 255)
//!
//!   20 % ->  51
//!   50 % -> 128   (127.5 rounds up)
//!   80 % -> 204
//! ```
//!
//! The rounding is done in integer arithmetic, `(percent * 255 + 50) / 100`,
//! so there is no floating-point edge case at the half.

use super::validation::ValidationError;

/// A validated transparency percentage in `MIN..=MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TransparencyLevel(u8);

impl TransparencyLevel {
    /// Lowest accepted percentage.
    pub const MIN: u8 = 20;
    /// Highest accepted percentage.
    pub const MAX: u8 = 80;

    /// Validates `percent` against `MIN..=MAX`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::OutOfRange`] carrying the allowed range for
    /// any value outside it.
    pub fn new(percent: i64) -> Result<Self, ValidationError> {
        if percent < i64::from(Self::MIN) || percent > i64::from(Self::MAX) {
            return Err(ValidationError::OutOfRange {
                value: percent,
                min: i64::from(Self::MIN),
                max: i64::from(Self::MAX),
            });
        }
        // Range check above guarantees the value fits in u8.
        Ok(Self(percent as u8))
    }

    pub fn percent(self) -> u8 {
        self.0
    }

    /// Alpha value in `0..=255` handed to the settings backend.
    pub fn backend_unit(self) -> u8 {
        let unit = (u32::from(self.0) * 255 + 50) / 100;
        // percent <= 80 keeps unit <= 204
        unit as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_are_accepted() {
        assert_eq!(TransparencyLevel::new(20).unwrap().percent(), 20);
        assert_eq!(TransparencyLevel::new(80).unwrap().percent(), 80);
    }

    #[test]
    fn test_values_just_outside_bounds_are_rejected_with_range() {
        for value in [19, 81] {
            let err = TransparencyLevel::new(value).unwrap_err();
            assert_eq!(
                err,
                ValidationError::OutOfRange { value, min: 20, max: 80 }
            );
        }
    }

    #[test]
    fn test_negative_and_huge_values_are_rejected_not_clamped() {
        assert!(TransparencyLevel::new(-5).is_err());
        assert!(TransparencyLevel::new(i64::MAX).is_err());
    }

    #[test]
    fn test_backend_unit_rounds_half_up() {
        // 0.50 * 255 = 127.5
        assert_eq!(TransparencyLevel::new(50).unwrap().backend_unit(), 128);
    }

    #[test]
    fn test_backend_unit_at_bounds() {
        assert_eq!(TransparencyLevel::new(20).unwrap().backend_unit(), 51);
        assert_eq!(TransparencyLevel::new(80).unwrap().backend_unit(), 204);
    }

    #[test]
    fn test_backend_unit_rounds_to_nearest() {
        // 0.21 * 255 = 53.55 -> 54, 0.33 * 255 = 84.15 -> 84
        assert_eq!(TransparencyLevel::new(21).unwrap().backend_unit(), 54);
        assert_eq!(TransparencyLevel::new(33).unwrap().backend_unit(), 84);
    }
}
