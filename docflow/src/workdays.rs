//! Working-day calendar for the Russian Federation.
//!
//! Uses the fixed federal public-holiday table; regional holidays and
//! government-decreed bridge days are out of scope, which matches how the
//! ranges are used (rough billing-period boundaries, not payroll law).

use chrono::{Datelike, NaiveDate, Weekday};

/// Fixed federal public holidays as (month, day).
const PUBLIC_HOLIDAYS: &[(u32, u32)] = &[
    (1, 1),
    (1, 2),
    (1, 3),
    (1, 4),
    (1, 5),
    (1, 6),
    (1, 7),
    (1, 8),
    (2, 23),
    (3, 8),
    (5, 1),
    (5, 9),
    (6, 12),
    (11, 4),
];

/// True when the date is neither a weekend day nor a public holiday.
pub fn is_working_day(date: NaiveDate) -> bool {
    if matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
        return false;
    }
    !PUBLIC_HOLIDAYS.contains(&(date.month(), date.day()))
}

/// First and last working day of the given month, or None when the month has
/// no working days (or the year/month pair is not a valid date).
pub fn working_day_range(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let mut day = NaiveDate::from_ymd_opt(year, month, 1)?;
    let mut first = None;
    let mut last = None;

    while day.month() == month {
        if is_working_day(day) {
            first.get_or_insert(day);
            last = Some(day);
        }
        day = match day.succ_opt() {
            Some(next) => next,
            None => break, // end of the calendar (year 262143)
        };
    }

    Some((first?, last?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_weekends_are_not_working_days() {
        assert!(!is_working_day(date(2024, 3, 2))); // Saturday
        assert!(!is_working_day(date(2024, 3, 3))); // Sunday
        assert!(is_working_day(date(2024, 3, 4))); // Monday
    }

    #[test]
    fn test_public_holidays_are_not_working_days() {
        assert!(!is_working_day(date(2024, 1, 1)));
        assert!(!is_working_day(date(2024, 5, 9)));
        assert!(!is_working_day(date(2024, 6, 12))); // a Wednesday in 2024
    }

    #[test]
    fn test_may_2024_range_skips_first_of_may() {
        // May 1 2024 is a Wednesday but a holiday; May 2 is the first working day
        let (start, end) = working_day_range(2024, 5).unwrap();
        assert_eq!(start, date(2024, 5, 2));
        assert_eq!(end, date(2024, 5, 31)); // Friday
    }

    #[test]
    fn test_january_range_starts_after_new_year_holidays() {
        let (start, end) = working_day_range(2024, 1).unwrap();
        assert_eq!(start, date(2024, 1, 9)); // Jan 1-8 holidays
        assert_eq!(end, date(2024, 1, 31));
    }

    #[test]
    fn test_last_calendar_day_counts_when_working() {
        // September 30 2024 is a Monday and must be included
        let (_, end) = working_day_range(2024, 9).unwrap();
        assert_eq!(end, date(2024, 9, 30));
    }

    #[test]
    fn test_invalid_month_yields_none() {
        assert!(working_day_range(2024, 13).is_none());
        assert!(working_day_range(2024, 0).is_none());
    }
}
