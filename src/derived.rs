//! Derived employee fields
//!
//! Pure functions of their inputs; callers pass `today` so results are
//! deterministic.

use chrono::{Datelike, Local, NaiveDate};

/// Average year length used for tenure
pub const DAYS_PER_YEAR: f64 = 365.25;

/// Current local date
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Exact calendar age: one less than the year difference until the
/// birthday has passed this year.
pub fn compute_age(birth_date: Option<NaiveDate>, today: NaiveDate) -> i32 {
    let Some(birth) = birth_date else {
        return 0;
    };
    let before_birthday = (today.month(), today.day()) < (birth.month(), birth.day());
    today.year() - birth.year() - i32::from(before_birthday)
}

/// Years since joining plus prior experience.
pub fn compute_total_experience(
    join_date: Option<NaiveDate>,
    previous_experience: f64,
    today: NaiveDate,
) -> f64 {
    match join_date {
        Some(joined) => {
            let days = (today - joined).num_days() as f64;
            days / DAYS_PER_YEAR + previous_experience
        }
        None => previous_experience,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_age_day_before_birthday() {
        assert_eq!(compute_age(Some(date(1990, 6, 15)), date(2024, 6, 14)), 33);
    }

    #[test]
    fn test_age_on_birthday() {
        assert_eq!(compute_age(Some(date(1990, 6, 15)), date(2024, 6, 15)), 34);
    }

    #[test]
    fn test_age_earlier_month() {
        assert_eq!(compute_age(Some(date(1990, 12, 1)), date(2024, 3, 1)), 33);
    }

    #[test]
    fn test_age_without_birth_date() {
        assert_eq!(compute_age(None, date(2024, 1, 1)), 0);
    }

    #[test]
    fn test_leap_day_birthday() {
        assert_eq!(compute_age(Some(date(2000, 2, 29)), date(2023, 2, 28)), 22);
        assert_eq!(compute_age(Some(date(2000, 2, 29)), date(2023, 3, 1)), 23);
    }

    #[test]
    fn test_total_experience_two_years_plus_prior() {
        let today = date(2024, 6, 15);
        let joined = today - Duration::days(730);
        let total = compute_total_experience(Some(joined), 3.0, today);
        assert!((total - 5.0).abs() < 0.01, "got {}", total);
    }

    #[test]
    fn test_total_experience_without_join_date() {
        assert_eq!(compute_total_experience(None, 2.5, date(2024, 1, 1)), 2.5);
        assert_eq!(compute_total_experience(None, 0.0, date(2024, 1, 1)), 0.0);
    }
}
