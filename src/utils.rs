use crate::error::{AnalysisError, Result};
use chrono::{Datelike, Days, NaiveDate};

pub fn last_day_of_month(year: i32, month: u32) -> NaiveDate {
    let next_month = if month == 12 { 1 } else { month + 1 };
    let next_year = if month == 12 { year + 1 } else { year };

    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .unwrap()
        .checked_sub_days(Days::new(1))
        .unwrap()
}

/// Month-end anchor for the month a date falls in. Used to bucket
/// transactions into calendar months.
pub fn month_end_of(date: NaiveDate) -> NaiveDate {
    last_day_of_month(date.year(), date.month())
}

/// Month-end `offset` calendar months after (or before, if negative) the
/// month of `date`. Fails only when the target month falls outside the range
/// chrono can represent.
pub fn add_months_to_month_end(date: NaiveDate, offset: i32) -> Result<NaiveDate> {
    // First day of the month after the target month, minus one day. Built
    // from fallible constructors so a target outside chrono's representable
    // range surfaces as an error instead of a panic.
    let next_first = date.year() * 12 + date.month0() as i32 + offset + 1;
    let year = next_first.div_euclid(12);
    let month = next_first.rem_euclid(12) as u32 + 1;

    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|d| d.checked_sub_days(Days::new(1)))
        .ok_or_else(|| {
            AnalysisError::DateError(format!(
                "Month {} offset by {} is out of the representable date range",
                date.format("%Y-%m"),
                offset
            ))
        })
}

/// `YYYY-MM` label for the month a date falls in.
pub fn format_month(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}
