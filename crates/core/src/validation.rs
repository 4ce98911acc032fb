//! Borrow-window date validation.

use chrono::NaiveDate;

use crate::error::CoreError;

/// Validate that a borrow window is well-ordered.
///
/// A pickup date after the return date is rejected; picking up and
/// returning on the same day is allowed.
pub fn validate_borrow_window(pickup: NaiveDate, ret: NaiveDate) -> Result<(), CoreError> {
    if pickup > ret {
        return Err(CoreError::InvalidDateRange(format!(
            "pickup date {pickup} is after return date {ret}"
        )));
    }
    Ok(())
}

/// Validate that a pickup date is not in the past relative to `today`.
///
/// `today` is passed in by the caller so the check stays pure and
/// deterministic under test.
pub fn validate_pickup_not_past(pickup: NaiveDate, today: NaiveDate) -> Result<(), CoreError> {
    if pickup < today {
        return Err(CoreError::Validation(
            "Pickup date cannot be in the past".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn ordered_window_passes() {
        assert!(validate_borrow_window(date(2025, 6, 1), date(2025, 6, 10)).is_ok());
    }

    #[test]
    fn same_day_window_passes() {
        assert!(validate_borrow_window(date(2025, 6, 1), date(2025, 6, 1)).is_ok());
    }

    #[test]
    fn inverted_window_is_rejected() {
        let err = validate_borrow_window(date(2025, 6, 10), date(2025, 6, 1))
            .expect_err("inverted window");
        assert!(matches!(err, CoreError::InvalidDateRange(_)));
    }

    #[test]
    fn past_pickup_is_rejected() {
        let today = date(2025, 6, 5);
        assert!(validate_pickup_not_past(date(2025, 6, 4), today).is_err());
        assert!(validate_pickup_not_past(today, today).is_ok());
        assert!(validate_pickup_not_past(date(2025, 6, 6), today).is_ok());
    }
}
