//! Business-day date assignment for forecast steps

use chrono::{Datelike, Days, NaiveDate, Weekday};

/// Whether `date` falls on a Saturday or Sunday
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// The `horizon` weekdays following `last`.
///
/// Each step advances one calendar day at a time from the previous step's
/// date until it lands on a weekday.
pub fn next_business_days(last: NaiveDate, horizon: usize) -> Vec<NaiveDate> {
    let mut dates = Vec::with_capacity(horizon);
    let mut current = last;
    for _ in 0..horizon {
        current = next_weekday(current);
        dates.push(current);
    }
    dates
}

fn next_weekday(from: NaiveDate) -> NaiveDate {
    let mut next = from;
    loop {
        next = next.checked_add_days(Days::new(1)).unwrap_or(NaiveDate::MAX);
        if !is_weekend(next) || next == NaiveDate::MAX {
            return next;
        }
    }
}
