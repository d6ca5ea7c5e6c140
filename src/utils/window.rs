//! Reporting windows relative to the current date.

use chrono::Utc;
use serde_json::json;

use crate::AppError;
use crate::domain::entities::DateRange;

/// Window ending today (UTC) and starting `days` days earlier.
///
/// # Errors
///
/// Returns [`AppError::Validation`] if the start date would underflow the
/// calendar.
pub fn last_days(days: u32) -> Result<DateRange, AppError> {
    DateRange::last_days(Utc::now().date_naive(), days)
        .map_err(|e| AppError::bad_request(e.to_string(), json!({ "days": days })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_days_ends_today() {
        let range = last_days(30).unwrap();
        assert_eq!(range.end(), Utc::now().date_naive());
        assert_eq!(range.day_count(), 31);
    }
}
