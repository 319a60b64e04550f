//! Expiry date parsing.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde_json::json;

use crate::error::AppError;

/// Accepted expiry format, e.g. `31-12-2030`.
pub const EXPIRY_FORMAT: &str = "%d-%m-%Y";

/// Parses an optional `DD-MM-YYYY` expiry into midnight UTC of that day.
///
/// `None` and blank input mean "never expires". Dates in the past are accepted;
/// such links are created and then refused at resolution time.
///
/// # Errors
///
/// Returns [`AppError::Validation`] when the date does not match the format.
pub fn parse_expiry(input: Option<&str>) -> Result<Option<DateTime<Utc>>, AppError> {
    let Some(raw) = input.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };

    let date = NaiveDate::parse_from_str(raw, EXPIRY_FORMAT).map_err(|e| {
        AppError::bad_request(
            "Expiry date must use the DD-MM-YYYY format",
            json!({ "expiryDate": raw, "reason": e.to_string() }),
        )
    })?;

    Ok(Some(date.and_time(NaiveTime::MIN).and_utc()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_absent_expiry() {
        assert_eq!(parse_expiry(None).unwrap(), None);
        assert_eq!(parse_expiry(Some("")).unwrap(), None);
        assert_eq!(parse_expiry(Some("  ")).unwrap(), None);
    }

    #[test]
    fn test_valid_expiry_is_midnight_utc() {
        let expiry = parse_expiry(Some("31-12-2030")).unwrap().unwrap();

        assert_eq!(expiry.year(), 2030);
        assert_eq!(expiry.month(), 12);
        assert_eq!(expiry.day(), 31);
        assert_eq!(expiry.hour(), 0);
        assert_eq!(expiry.minute(), 0);
    }

    #[test]
    fn test_past_expiry_is_accepted() {
        let expiry = parse_expiry(Some("01-01-2000")).unwrap().unwrap();
        assert!(expiry < Utc::now());
    }

    #[test]
    fn test_wrong_format_is_validation_error() {
        for input in ["2030-12-31", "31/12/2030", "32-01-2030", "tomorrow"] {
            let err = parse_expiry(Some(input)).unwrap_err();
            assert!(matches!(err, AppError::Validation { .. }), "{input}");
        }
    }
}
