use rusqlite::Connection;

use crate::{Error, auth::UserID, period::Period, summary::SummaryRow};

/// Get the date, amount and raw category of the transactions of `user_id` in `period`.
///
/// If `period` is `None`, every transaction of the user is returned.
///
/// # Errors
/// Returns an [Error::InvalidPeriod] if the period is outside the supported
/// date range or an [Error::SqlError] if there is an SQL error.
pub fn get_summary_rows(
    user_id: UserID,
    period: Option<Period>,
    connection: &Connection,
) -> Result<Vec<SummaryRow>, Error> {
    let (start, end) = match period {
        Some(period) => {
            let (start, end) = period.date_range()?;
            (Some(start), Some(end))
        }
        None => (None, None),
    };

    connection
        .prepare(
            "SELECT date, amount, category FROM \"transaction\"
             WHERE user_id = ?1
             AND (?2 IS NULL OR date >= ?2)
             AND (?3 IS NULL OR date < ?3)",
        )?
        .query_map((user_id.as_i64(), start, end), |row| {
            Ok(SummaryRow {
                date: row.get(0)?,
                amount: row.get(1)?,
                category: row.get(2)?,
            })
        })?
        .map(|maybe_row| maybe_row.map_err(|error| error.into()))
        .collect()
}
