//! Helpers for turning month/year query parameters into date windows.
//!
//! Date-range construction happens here, in the controllers' domain. The
//! statistics code in [crate::stats] only ever sees already-bounded windows.

use time::Date;

use crate::Error;

/// The half-open date window `[start, end)` covering `month` of `year`.
///
/// # Errors
///
/// Returns [Error::InvalidMonth] if `month` is outside 1-12, or
/// [Error::YearOutOfRange] if the year cannot be represented as a date.
pub fn month_window(year: i32, month: u8) -> Result<(Date, Date), Error> {
    let start = first_of_month(year, month)?;

    let end = if month == 12 {
        first_of_month(year + 1, 1)?
    } else {
        first_of_month(year, month + 1)?
    };

    Ok((start, end))
}

/// The first day of the month `count` calendar months before `month` of `year`.
///
/// Used to build the lookback window for budget recommendations.
pub fn months_before(year: i32, month: u8, count: u8) -> Result<Date, Error> {
    let months_since_epoch = year * 12 + i32::from(month) - 1 - i32::from(count);
    let year = months_since_epoch.div_euclid(12);
    let month = (months_since_epoch.rem_euclid(12) + 1) as u8;

    first_of_month(year, month)
}

/// The month and year to use for a statistics window, defaulting to the
/// month containing `today` when the client did not pass query parameters.
pub fn resolve_month(month: Option<u8>, year: Option<i32>, today: Date) -> (i32, u8) {
    (
        year.unwrap_or_else(|| today.year()),
        month.unwrap_or_else(|| u8::from(today.month())),
    )
}

fn first_of_month(year: i32, month: u8) -> Result<Date, Error> {
    let month = time::Month::try_from(month).map_err(|_| Error::InvalidMonth(month))?;

    Date::from_calendar_date(year, month, 1).map_err(|_| Error::YearOutOfRange(year))
}

#[cfg(test)]
mod calendar_tests {
    use time::macros::date;

    use crate::Error;

    use super::{month_window, months_before, resolve_month};

    #[test]
    fn month_window_is_half_open() {
        let (start, end) = month_window(2024, 1).unwrap();

        assert_eq!(start, date!(2024 - 01 - 01));
        assert_eq!(end, date!(2024 - 02 - 01));
    }

    #[test]
    fn month_window_wraps_december_into_next_year() {
        let (start, end) = month_window(2024, 12).unwrap();

        assert_eq!(start, date!(2024 - 12 - 01));
        assert_eq!(end, date!(2025 - 01 - 01));
    }

    #[test]
    fn month_window_rejects_invalid_month() {
        assert_eq!(month_window(2024, 13), Err(Error::InvalidMonth(13)));
        assert_eq!(month_window(2024, 0), Err(Error::InvalidMonth(0)));
    }

    #[test]
    fn months_before_crosses_year_boundary() {
        let start = months_before(2024, 2, 3).unwrap();

        assert_eq!(start, date!(2023 - 11 - 01));
    }

    #[test]
    fn months_before_stays_within_year() {
        let start = months_before(2024, 8, 3).unwrap();

        assert_eq!(start, date!(2024 - 05 - 01));
    }

    #[test]
    fn resolve_month_prefers_query_parameters() {
        let today = date!(2024 - 06 - 15);

        assert_eq!(resolve_month(Some(1), Some(2023), today), (2023, 1));
        assert_eq!(resolve_month(None, None, today), (2024, 6));
    }
}
