use chrono::NaiveDate;

use crate::constants::DATE_STORAGE_FORMAT;
use crate::errors::{Result, ValidationError};

/// Parses a user-supplied date in `YYYYMMDD` or `YYYY-MM-DD` form.
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    let trimmed = input.trim();
    let parsed = if trimmed.contains('-') {
        NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
    } else {
        NaiveDate::parse_from_str(trimmed, DATE_STORAGE_FORMAT)
    };
    Ok(parsed?)
}

/// Normalizes a user-supplied date to the `YYYYMMDD` storage form.
pub fn normalize_date(input: &str) -> Result<String> {
    Ok(parse_date(input)?.format(DATE_STORAGE_FORMAT).to_string())
}

/// Validates a four digit year used as a date prefix.
pub fn validate_year(input: &str) -> Result<String> {
    let year = input.trim();
    if year.len() == 4 && year.chars().all(|c| c.is_ascii_digit()) {
        Ok(year.to_string())
    } else {
        Err(ValidationError::InvalidInput(format!("'{}' is not a four digit year", input)).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_date_accepts_both_forms() {
        assert_eq!(normalize_date("20240131").unwrap(), "20240131");
        assert_eq!(normalize_date("2024-01-31").unwrap(), "20240131");
        assert_eq!(normalize_date(" 2024-02-05 ").unwrap(), "20240205");
    }

    #[test]
    fn test_normalize_date_rejects_garbage() {
        assert!(normalize_date("20241341").is_err());
        assert!(normalize_date("yesterday").is_err());
        assert!(normalize_date("").is_err());
    }

    #[test]
    fn test_validate_year() {
        assert_eq!(validate_year("2023").unwrap(), "2023");
        assert!(validate_year("23").is_err());
        assert!(validate_year("20x3").is_err());
    }
}
