//! Defines the endpoints for editing a transaction.

use axum::{Extension, Json, extract::State};

use crate::{
    Category, Error,
    auth::UserID,
    timezone::local_today,
    transaction::{
        CategoryForm, Transaction, TransactionForm, TransactionState, UpdateTransactionForm,
        core::{update_transaction, update_transaction_category},
    },
};

/// Replace the date, name, category and amount of a transaction.
pub async fn update_transaction_endpoint(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserID>,
    Json(form): Json<UpdateTransactionForm>,
) -> Result<Json<Transaction>, Error> {
    let transaction_id = form.transaction_id;
    let today = local_today(&state.local_timezone)?;
    let builder = TransactionForm::from(form).validate(today)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let transaction = update_transaction(transaction_id, user_id, builder, &connection)
        .inspect_err(|error| tracing::debug!("Could not update transaction {transaction_id}: {error}"))?;

    Ok(Json(transaction))
}

/// Change the category of a single transaction.
pub async fn update_category_endpoint(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserID>,
    Json(form): Json<CategoryForm>,
) -> Result<Json<Transaction>, Error> {
    let category: Category = form.category.parse()?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let transaction =
        update_transaction_category(form.transaction_id, user_id, category, &connection)?;

    Ok(Json(transaction))
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};
    use time::macros::date;

    use crate::{
        Category, endpoints,
        test_utils::{
            TEST_USER_ID, create_standard_user, get_test_app_state, get_test_server, log_in,
            log_in_as,
        },
        transaction::{Transaction, create_transaction},
    };

    #[tokio::test]
    async fn can_update_transaction() {
        let state = get_test_app_state();
        let transaction = {
            let connection = state.db_connection.lock().unwrap();
            create_transaction(
                TEST_USER_ID,
                Transaction::build(date!(2025 - 01 - 03), "Countdown", 10.0)
                    .category(Category::Groceries),
                &connection,
            )
            .unwrap()
        };
        let server = get_test_server(state);
        let cookie = log_in(&server).await;

        let response = server
            .patch(endpoints::TRANSACTIONS)
            .add_cookie(cookie)
            .json(&json!({
                "transaction_id": transaction.id,
                "date": "2025-01-04",
                "name": "Pak n Save",
                "category": "groceries",
                "amount": "55.20"
            }))
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["id"], transaction.id);
        assert_eq!(body["date"], "2025-01-04");
        assert_eq!(body["name"], "Pak n Save");
        assert_eq!(body["amount"], -55.2);
    }

    #[tokio::test]
    async fn update_missing_transaction_is_not_found() {
        let server = get_test_server(get_test_app_state());
        let cookie = log_in(&server).await;

        server
            .patch(endpoints::TRANSACTIONS)
            .add_cookie(cookie)
            .json(&json!({
                "transaction_id": 42,
                "date": "2025-01-04",
                "name": "Pak n Save",
                "category": "groceries",
                "amount": "55.20"
            }))
            .await
            .assert_status_not_found();
    }

    #[tokio::test]
    async fn category_change_flips_sign_for_income() {
        let state = get_test_app_state();
        let transaction = {
            let connection = state.db_connection.lock().unwrap();
            create_transaction(
                TEST_USER_ID,
                Transaction::build(date!(2025 - 01 - 03), "Refund", 25.0),
                &connection,
            )
            .unwrap()
        };
        let server = get_test_server(state);
        let cookie = log_in(&server).await;

        let response = server
            .patch(endpoints::TRANSACTION_CATEGORY)
            .add_cookie(cookie)
            .json(&json!({"transaction_id": transaction.id, "category": "income"}))
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["category"], "income");
        assert_eq!(body["amount"], 25.0);
    }

    #[tokio::test]
    async fn cannot_change_category_of_other_users_transaction() {
        let state = get_test_app_state();
        let transaction = {
            let connection = state.db_connection.lock().unwrap();
            create_transaction(
                TEST_USER_ID,
                Transaction::build(date!(2025 - 01 - 03), "Refund", 25.0),
                &connection,
            )
            .unwrap()
        };
        create_standard_user(&state, "bob");
        let server = get_test_server(state);
        let cookie = log_in_as(&server, "bob").await;

        server
            .patch(endpoints::TRANSACTION_CATEGORY)
            .add_cookie(cookie)
            .json(&json!({"transaction_id": transaction.id, "category": "income"}))
            .await
            .assert_status_not_found();
    }

    #[tokio::test]
    async fn unknown_category_is_bad_request() {
        let server = get_test_server(get_test_app_state());
        let cookie = log_in(&server).await;

        server
            .patch(endpoints::TRANSACTION_CATEGORY)
            .add_cookie(cookie)
            .json(&json!({"transaction_id": 1, "category": "coffee"}))
            .await
            .assert_status_bad_request();
    }
}
