//! User age derivation
//!
//! Benchmarks are bracketed by age in whole years. The identity provider only
//! carries a birth date, so the age is derived here.

use chrono::{Datelike, NaiveDate, Utc};

use crate::error::BenchmarkError;

/// Oldest age considered plausible
pub const MAX_PLAUSIBLE_AGE: u32 = 150;

/// Parse an ISO `YYYY-MM-DD` birth date
pub fn parse_birthdate(birthdate: &str) -> Result<NaiveDate, BenchmarkError> {
    NaiveDate::parse_from_str(birthdate.trim(), "%Y-%m-%d")
        .map_err(|e| BenchmarkError::InvalidBirthdate(format!("'{birthdate}': {e}")))
}

/// Age in whole years on `today`, or `None` when the birth date is invalid,
/// in the future, or implies an age above [`MAX_PLAUSIBLE_AGE`]
pub fn age_on(birthdate: &str, today: NaiveDate) -> Option<u32> {
    let born = match parse_birthdate(birthdate) {
        Ok(date) => date,
        Err(e) => {
            log::warn!("{e}");
            return None;
        }
    };

    let mut age = today.year() - born.year();
    if (today.month(), today.day()) < (born.month(), born.day()) {
        age -= 1;
    }

    if age < 0 || age > MAX_PLAUSIBLE_AGE as i32 {
        log::warn!("Calculated age is out of reasonable range: {age}");
        return None;
    }

    Some(age as u32)
}

/// Age in whole years as of today's UTC date
pub fn age_from_birthdate(birthdate: &str) -> Option<u32> {
    age_on(birthdate, Utc::now().date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_birthday_already_passed() {
        assert_eq!(age_on("1990-03-15", date(2024, 6, 1)), Some(34));
    }

    #[test]
    fn test_birthday_not_yet_reached() {
        assert_eq!(age_on("1990-03-15", date(2024, 3, 14)), Some(33));
        assert_eq!(age_on("1990-03-15", date(2024, 3, 15)), Some(34));
    }

    #[test]
    fn test_invalid_birthdates() {
        assert_eq!(age_on("not-a-date", date(2024, 1, 1)), None);
        assert_eq!(age_on("1990-02-30", date(2024, 1, 1)), None);
        assert!(parse_birthdate("15/03/1990").is_err());
    }

    #[test]
    fn test_implausible_ages() {
        assert_eq!(age_on("2030-01-01", date(2024, 1, 1)), None);
        assert_eq!(age_on("1850-01-01", date(2024, 1, 1)), None);
        assert_eq!(age_on("1874-01-01", date(2024, 1, 1)), Some(150));
    }
}
