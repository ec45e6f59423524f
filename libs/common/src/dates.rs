//! Calendar date handling
//!
//! Birthdates travel as `YYYY-MM-DD` strings. They are read by pulling the
//! literal year, month and day tokens out of the text, so a date never
//! shifts across a timezone boundary on its way in.

use std::sync::OnceLock;

use chrono::{Datelike, Local, NaiveDate};
use regex::Regex;

use crate::error::{ModelError, ModelResult};

/// Parse a calendar date from `YYYY-MM-DD`, ignoring anything from a `T` on.
pub fn parse_calendar_date(text: &str) -> ModelResult<NaiveDate> {
    static DATE_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = DATE_REGEX.get_or_init(|| {
        Regex::new(r"^(\d{4})-(\d{1,2})-(\d{1,2})$").expect("Failed to compile date regex")
    });

    let invalid = || ModelError::InvalidDate(text.to_string());

    let date_part = text.trim().split('T').next().unwrap_or_default();
    let captures = regex.captures(date_part).ok_or_else(invalid)?;

    let year: i32 = captures[1].parse().map_err(|_| invalid())?;
    let month: u32 = captures[2].parse().map_err(|_| invalid())?;
    let day: u32 = captures[3].parse().map_err(|_| invalid())?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
}

/// Format a date for the wire (`YYYY-MM-DD`)
pub fn format_iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Format a date for display (`dd/mm/yyyy`)
pub fn format_display(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Today's date in the local calendar
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Full years elapsed between `birthdate` and `today`.
///
/// One year is taken off when today's month/day falls before the birth
/// month/day, so a Feb 29 birthdate turns over on Mar 1 in common years.
pub fn calculate_age(birthdate: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - birthdate.year();
    if (today.month(), today.day()) < (birthdate.month(), birthdate.day()) {
        age -= 1;
    }
    age
}

/// Serde adapter for `YYYY-MM-DD` calendar dates
pub mod calendar_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_iso(*date))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        super::parse_calendar_date(&text).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_plain_date() {
        assert_eq!(parse_calendar_date("1990-05-17").unwrap(), date(1990, 5, 17));
    }

    #[test]
    fn test_parse_ignores_time_part() {
        // a UTC timestamp late in the day must not roll over to the next date
        assert_eq!(
            parse_calendar_date("1990-05-17T23:30:00.000Z").unwrap(),
            date(1990, 5, 17)
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_calendar_date("17/05/1990").is_err());
        assert!(parse_calendar_date("").is_err());
        assert_eq!(
            parse_calendar_date("1990-02-30"),
            Err(ModelError::InvalidDate("1990-02-30".to_string()))
        );
    }

    #[test]
    fn test_formats() {
        assert_eq!(format_iso(date(2001, 3, 9)), "2001-03-09");
        assert_eq!(format_display(date(2001, 3, 9)), "09/03/2001");
    }

    #[test]
    fn test_age_on_anniversary() {
        assert_eq!(calculate_age(date(2000, 10, 19), date(2026, 10, 19)), 26);
    }

    #[test]
    fn test_age_day_before_anniversary() {
        assert_eq!(calculate_age(date(2000, 10, 19), date(2026, 10, 18)), 25);
    }

    #[test]
    fn test_age_earlier_month() {
        assert_eq!(calculate_age(date(2000, 12, 1), date(2026, 11, 30)), 25);
        assert_eq!(calculate_age(date(2000, 1, 31), date(2026, 2, 1)), 26);
    }

    #[test]
    fn test_age_leap_day_birthdate() {
        assert_eq!(calculate_age(date(2004, 2, 29), date(2025, 2, 28)), 20);
        assert_eq!(calculate_age(date(2004, 2, 29), date(2025, 3, 1)), 21);
        assert_eq!(calculate_age(date(2004, 2, 29), date(2028, 2, 29)), 24);
    }

    #[test]
    fn test_age_born_today() {
        assert_eq!(calculate_age(date(2026, 10, 19), date(2026, 10, 19)), 0);
    }
}
