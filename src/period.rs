//! The month or year a view of transactions is restricted to.
//!
//! Handlers parse a [PeriodQuery] from the query string once and pass the
//! resulting [Period] to the database functions that need it.

use serde::Deserialize;
use time::{Date, Month};

use crate::Error;

/// The raw `month` and `year` query parameters.
#[derive(Debug, Default, Clone, Copy, Deserialize)]
pub struct PeriodQuery {
    /// The calendar month, 1 to 12.
    pub month: Option<u8>,
    /// The calendar year.
    pub year: Option<i32>,
}

/// A calendar month or a whole year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    /// A single calendar month.
    Month {
        /// The year the month belongs to.
        year: i32,
        /// The month.
        month: Month,
    },
    /// A whole calendar year.
    Year(i32),
}

impl PeriodQuery {
    /// Convert the query into a period.
    ///
    /// Returns `Ok(None)` if neither a month nor a year were given, meaning
    /// the view should not be restricted.
    ///
    /// # Errors
    /// Returns an [Error::InvalidPeriod] if the month is outside 1 to 12 or a
    /// month is given without a year.
    pub fn to_period(self) -> Result<Option<Period>, Error> {
        match (self.month, self.year) {
            (None, None) => Ok(None),
            (None, Some(year)) => Ok(Some(Period::Year(year))),
            (Some(_), None) => Err(Error::InvalidPeriod(
                "a month must be given with a year".to_owned(),
            )),
            (Some(month), Some(year)) => {
                let month = Month::try_from(month).map_err(|_| {
                    Error::InvalidPeriod(format!("{month} is not a month between 1 and 12"))
                })?;

                Ok(Some(Period::Month { year, month }))
            }
        }
    }
}

impl Period {
    /// The first day of the period and the first day after the period.
    ///
    /// # Errors
    /// Returns an [Error::InvalidPeriod] if the year is outside the supported date range.
    pub fn date_range(&self) -> Result<(Date, Date), Error> {
        let (start, end) = match *self {
            Period::Month { year, month } => {
                let (end_year, end_month) = match month {
                    Month::December => (year + 1, Month::January),
                    month => (year, month.next()),
                };

                (
                    Date::from_calendar_date(year, month, 1),
                    Date::from_calendar_date(end_year, end_month, 1),
                )
            }
            Period::Year(year) => (
                Date::from_calendar_date(year, Month::January, 1),
                Date::from_calendar_date(year + 1, Month::January, 1),
            ),
        };

        let start = start.map_err(|error| Error::InvalidPeriod(error.to_string()))?;
        let end = end.map_err(|error| Error::InvalidPeriod(error.to_string()))?;

        Ok((start, end))
    }
}

#[cfg(test)]
mod tests {
    use time::{Month, macros::date};

    use crate::Error;

    use super::{Period, PeriodQuery};

    #[test]
    fn empty_query_is_unrestricted() {
        let period = PeriodQuery::default().to_period();

        assert_eq!(period, Ok(None));
    }

    #[test]
    fn year_only_query_is_whole_year() {
        let query = PeriodQuery {
            month: None,
            year: Some(2024),
        };

        assert_eq!(query.to_period(), Ok(Some(Period::Year(2024))));
    }

    #[test]
    fn month_and_year_query_is_month() {
        let query = PeriodQuery {
            month: Some(3),
            year: Some(2024),
        };

        assert_eq!(
            query.to_period(),
            Ok(Some(Period::Month {
                year: 2024,
                month: Month::March
            }))
        );
    }

    #[test]
    fn month_out_of_range_is_rejected() {
        for month in [0, 13] {
            let query = PeriodQuery {
                month: Some(month),
                year: Some(2024),
            };

            assert!(matches!(query.to_period(), Err(Error::InvalidPeriod(_))));
        }
    }

    #[test]
    fn month_without_year_is_rejected() {
        let query = PeriodQuery {
            month: Some(3),
            year: None,
        };

        assert!(matches!(query.to_period(), Err(Error::InvalidPeriod(_))));
    }

    #[test]
    fn month_range_covers_whole_month() {
        let period = Period::Month {
            year: 2024,
            month: Month::February,
        };

        assert_eq!(
            period.date_range(),
            Ok((date!(2024 - 02 - 01), date!(2024 - 03 - 01)))
        );
    }

    #[test]
    fn december_range_ends_in_next_year() {
        let period = Period::Month {
            year: 2024,
            month: Month::December,
        };

        assert_eq!(
            period.date_range(),
            Ok((date!(2024 - 12 - 01), date!(2025 - 01 - 01)))
        );
    }

    #[test]
    fn year_range_covers_whole_year() {
        assert_eq!(
            Period::Year(2023).date_range(),
            Ok((date!(2023 - 01 - 01), date!(2024 - 01 - 01)))
        );
    }
}
