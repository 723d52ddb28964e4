//! Defines the endpoint for deleting a transaction.

use axum::{
    Extension,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    Error,
    auth::UserID,
    database_id::TransactionId,
    transaction::{TransactionState, core::delete_transaction},
};

/// A route handler for deleting a transaction the user entered by hand.
pub async fn delete_transaction_endpoint(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserID>,
    Path(transaction_id): Path<TransactionId>,
) -> Result<StatusCode, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    delete_transaction(transaction_id, user_id, &connection).inspect_err(|error| {
        tracing::debug!("Could not delete transaction {transaction_id}: {error}")
    })?;

    Ok(StatusCode::OK)
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{
        endpoints::{self, format_endpoint},
        enrollment::create_enrollment,
        test_utils::{TEST_USER_ID, get_test_app_state, get_test_server, log_in},
        transaction::{Transaction, create_transaction, get_transactions},
    };

    #[tokio::test]
    async fn deletes_user_created_transaction() {
        let state = get_test_app_state();
        let transaction = {
            let connection = state.db_connection.lock().unwrap();
            create_transaction(
                TEST_USER_ID,
                Transaction::build(date!(2025 - 01 - 03), "Cash", 10.0).user_created(true),
                &connection,
            )
            .unwrap()
        };
        let server = get_test_server(state.clone());
        let cookie = log_in(&server).await;

        server
            .delete(&format_endpoint(endpoints::TRANSACTION, transaction.id))
            .add_cookie(cookie)
            .await
            .assert_status_ok();

        let connection = state.db_connection.lock().unwrap();
        assert_eq!(get_transactions(TEST_USER_ID, None, &connection), Ok(vec![]));
    }

    #[tokio::test]
    async fn synced_transaction_is_bad_request() {
        let state = get_test_app_state();
        let transaction = {
            let connection = state.db_connection.lock().unwrap();
            let enrollment =
                create_enrollment(TEST_USER_ID, "ASB", "token", &connection).unwrap();
            create_transaction(
                TEST_USER_ID,
                Transaction::build(date!(2025 - 01 - 03), "Countdown", 10.0)
                    .enrollment_id(Some(enrollment.id)),
                &connection,
            )
            .unwrap()
        };
        let server = get_test_server(state);
        let cookie = log_in(&server).await;

        server
            .delete(&format_endpoint(endpoints::TRANSACTION, transaction.id))
            .add_cookie(cookie)
            .await
            .assert_status_bad_request();
    }

    #[tokio::test]
    async fn missing_transaction_is_not_found() {
        let server = get_test_server(get_test_app_state());
        let cookie = log_in(&server).await;

        server
            .delete(&format_endpoint(endpoints::TRANSACTION, 42))
            .add_cookie(cookie)
            .await
            .assert_status_not_found();
    }
}
