//! Defines the endpoint for listing the transactions of a month or year.

use axum::{
    Extension, Json,
    extract::{Query, State},
};
use serde::Serialize;

use crate::{
    Error,
    auth::UserID,
    period::PeriodQuery,
    transaction::{Transaction, TransactionState, get_transaction_years, get_transactions},
};

/// The transactions in the requested period and the years the user has data for.
#[derive(Debug, Serialize)]
pub struct TransactionsResponse {
    /// The transactions in the period, newest first.
    pub transactions: Vec<Transaction>,
    /// The number of transactions returned.
    pub count: usize,
    /// Every year the user has transactions in, newest first, regardless of the period.
    pub years: Vec<i32>,
}

/// List the logged in user's transactions, newest first.
///
/// Without `month` and `year` every transaction is returned.
pub async fn get_transactions_endpoint(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<TransactionsResponse>, Error> {
    let period = query.to_period()?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let transactions = get_transactions(user_id, period, &connection)?;
    let years = get_transaction_years(user_id, &connection)?;

    Ok(Json(TransactionsResponse {
        count: transactions.len(),
        transactions,
        years,
    }))
}
