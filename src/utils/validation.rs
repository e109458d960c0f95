use chrono::NaiveDate;
use validator::{Validate, ValidationError};

use crate::errors::AppError;

pub fn validate_payload<T: Validate>(payload: &T) -> Result<(), AppError> {
    payload.validate().map_err(AppError::from)
}

pub fn validate_iso_date(date: &str) -> Result<(), ValidationError> {
    if NaiveDate::parse_from_str(date, "%Y-%m-%d").is_err() {
        return Err(ValidationError::new("Date must be formatted as YYYY-MM-DD"));
    }
    Ok(())
}

/// Stored records leave unknown dates empty.
pub fn validate_optional_iso_date(date: &str) -> Result<(), ValidationError> {
    if date.is_empty() {
        return Ok(());
    }
    validate_iso_date(date)
}

/// Theme colors are stored as space separated RGB channels, e.g. `79 70 229`.
pub fn validate_theme_color(color: &str) -> Result<(), ValidationError> {
    let channels: Vec<&str> = color.split_whitespace().collect();
    if channels.len() != 3 || channels.iter().any(|c| c.parse::<u8>().is_err()) {
        return Err(ValidationError::new("Theme color must be three 0-255 channels"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iso_dates() {
        assert!(validate_iso_date("2023-10-01").is_ok());
        assert!(validate_iso_date("2023-13-01").is_err());
        assert!(validate_iso_date("").is_err());
        assert!(validate_optional_iso_date("").is_ok());
        assert!(validate_optional_iso_date("1990-02-30").is_err());
    }

    #[test]
    fn theme_colors() {
        assert!(validate_theme_color("79 70 229").is_ok());
        assert!(validate_theme_color("79 70").is_err());
        assert!(validate_theme_color("79 70 300").is_err());
    }
}
