//! Download of a period's transactions as a CSV file.

use axum::{
    Extension,
    extract::{Query, State},
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::IntoResponse,
};
use time::{Date, macros::format_description};

use crate::{
    Category, Error,
    auth::UserID,
    period::PeriodQuery,
    timezone::local_today,
    transaction::{Transaction, TransactionState, get_transactions},
};

/// Write `transactions` as CSV with the columns date, name, category and amount.
///
/// Ignored transactions are left out and amounts are written without a sign.
///
/// # Errors
/// Returns an [Error::CsvError] if a record could not be written.
pub fn write_transactions_csv(transactions: &[Transaction]) -> Result<Vec<u8>, Error> {
    let date_format = format_description!("[month]/[day]/[year]");
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record(["date", "name", "category", "amount"])
        .map_err(|error| Error::CsvError(error.to_string()))?;

    for transaction in transactions
        .iter()
        .filter(|transaction| transaction.category != Category::Ignore)
    {
        let date = transaction
            .date
            .format(&date_format)
            .map_err(|error| Error::CsvError(error.to_string()))?;
        let amount = transaction.amount.abs().to_string();

        writer
            .write_record([
                date.as_str(),
                transaction.name.as_str(),
                transaction.category.as_str(),
                amount.as_str(),
            ])
            .map_err(|error| Error::CsvError(error.to_string()))?;
    }

    writer
        .into_inner()
        .map_err(|error| Error::CsvError(error.to_string()))
}

/// The name of the downloaded file, e.g. "2025_1_31_transactions.csv".
pub fn export_file_name(today: Date) -> String {
    format!(
        "{}_{}_{}_transactions.csv",
        today.year(),
        u8::from(today.month()),
        today.day()
    )
}

/// Download the logged in user's transactions for a period as CSV.
pub async fn export_transactions_endpoint(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<PeriodQuery>,
) -> Result<impl IntoResponse, Error> {
    let period = query.to_period()?;
    let today = local_today(&state.local_timezone)?;

    let transactions = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        get_transactions(user_id, period, &connection)?
    };

    let body = write_transactions_csv(&transactions)?;
    let content_disposition = format!("attachment; filename=\"{}\"", export_file_name(today));

    Ok((
        [
            (CONTENT_TYPE, "text/csv; charset=utf-8".to_owned()),
            (CONTENT_DISPOSITION, content_disposition),
        ],
        body,
    ))
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{
        Category,
        auth::UserID,
        endpoints,
        test_utils::{TEST_USER_ID, get_test_app_state, get_test_server, log_in},
        transaction::{Transaction, create_transaction},
    };

    use super::{export_file_name, write_transactions_csv};

    fn transaction(name: &str, category: Category, amount: f64) -> Transaction {
        Transaction {
            id: 1,
            user_id: UserID::new(1),
            date: date!(2025 - 01 - 05),
            name: name.to_owned(),
            category,
            amount,
            enrollment_id: None,
            user_created: true,
        }
    }

    #[test]
    fn csv_skips_ignored_and_drops_sign() {
        let transactions = vec![
            transaction("Countdown, Newmarket", Category::Groceries, -12.5),
            transaction("Transfer", Category::Ignore, -100.0),
            transaction("Salary", Category::Income, 2000.0),
        ];

        let csv = String::from_utf8(write_transactions_csv(&transactions).unwrap()).unwrap();

        assert_eq!(
            csv,
            "date,name,category,amount\n\
             01/05/2025,\"Countdown, Newmarket\",groceries,12.5\n\
             01/05/2025,Salary,income,2000\n"
        );
    }

    #[test]
    fn file_name_has_unpadded_date() {
        assert_eq!(
            export_file_name(date!(2025 - 01 - 05)),
            "2025_1_5_transactions.csv"
        );
    }

    #[tokio::test]
    async fn download_has_attachment_header() {
        let state = get_test_app_state();
        {
            let connection = state.db_connection.lock().unwrap();
            create_transaction(
                TEST_USER_ID,
                Transaction::build(date!(2025 - 01 - 03), "Bus", 4.0)
                    .category(Category::Transportation),
                &connection,
            )
            .unwrap();
        }
        let server = get_test_server(state);
        let cookie = log_in(&server).await;

        let response = server
            .get(endpoints::TRANSACTIONS_EXPORT)
            .add_query_param("month", 1)
            .add_query_param("year", 2025)
            .add_cookie(cookie)
            .await;

        response.assert_status_ok();
        let content_disposition = response.header("content-disposition");
        let content_disposition = content_disposition.to_str().unwrap();
        assert!(content_disposition.starts_with("attachment; filename=\""));
        assert!(content_disposition.ends_with("_transactions.csv\""));
        assert_eq!(
            response.text(),
            "date,name,category,amount\n01/03/2025,Bus,transportation,4\n"
        );
    }
}
