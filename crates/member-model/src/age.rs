//! Birth dates and ages.

use chrono::{Datelike, NaiveDate};

/// Date layouts the portal has been seen to submit, tried in order.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%B %d, %Y", "%b %d, %Y", "%d %B %Y"];

/// Parse a birth date from any of the accepted layouts.
///
/// ISO date-times (`1990-05-14T00:00:00.000Z`) are cut to their date part.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    let candidate = match value.find('T') {
        Some(10) => &value[..10],
        _ => value,
    };

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(candidate, fmt).ok())
}

/// Whole years between `birth` and `today`.
///
/// The year difference drops by one while this year's birthday has not
/// arrived yet. A birthday falling on today counts as reached.
pub fn calculate_age(birth: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    age
}

/// Age for a free-form birth date, `None` when unparsable or in the future.
pub fn age_on(birth_date: &str, today: NaiveDate) -> Option<u32> {
    let birth = parse_date(birth_date)?;
    u32::try_from(calculate_age(birth, today)).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_age_before_birthday_this_year() {
        let today = date(2025, 3, 10);
        assert_eq!(calculate_age(date(1990, 7, 1), today), 2025 - 1990 - 1);
        assert_eq!(calculate_age(date(1990, 3, 11), today), 2025 - 1990 - 1);
    }

    #[test]
    fn test_age_on_or_after_birthday() {
        let today = date(2025, 3, 10);
        assert_eq!(calculate_age(date(1990, 3, 10), today), 35);
        assert_eq!(calculate_age(date(1990, 1, 31), today), 35);
    }

    #[test]
    fn test_leap_day_birthday() {
        assert_eq!(calculate_age(date(2000, 2, 29), date(2025, 2, 28)), 24);
        assert_eq!(calculate_age(date(2000, 2, 29), date(2025, 3, 1)), 25);
    }

    #[test]
    fn test_parse_date_layouts() {
        let expected = Some(date(1988, 11, 5));
        assert_eq!(parse_date("1988-11-05"), expected);
        assert_eq!(parse_date("1988/11/05"), expected);
        assert_eq!(parse_date("11/05/1988"), expected);
        assert_eq!(parse_date("November 5, 1988"), expected);
        assert_eq!(parse_date("Nov 5, 1988"), expected);
        assert_eq!(parse_date("5 November 1988"), expected);
        assert_eq!(parse_date("1988-11-05T00:00:00.000Z"), expected);
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("sometime in the 80s"), None);
        assert_eq!(parse_date("1988-13-40"), None);
    }

    #[test]
    fn test_age_on_future_birth_is_none() {
        assert_eq!(age_on("2030-01-01", date(2025, 1, 1)), None);
        assert_eq!(age_on("2000-01-01", date(2025, 1, 1)), Some(25));
    }
}
