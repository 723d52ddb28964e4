use axum::{
    Extension,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    Error,
    auth::UserID,
    database_id::RuleId,
    rule::{db::delete_rule, models::RuleState},
};

/// A route handler for deleting a rule.
///
/// Transactions keep the category the rule gave them.
pub async fn delete_rule_endpoint(
    State(state): State<RuleState>,
    Extension(user_id): Extension<UserID>,
    Path(rule_id): Path<RuleId>,
) -> Result<StatusCode, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    delete_rule(rule_id, user_id, &connection)
        .inspect_err(|error| tracing::debug!("Could not delete rule {rule_id}: {error}"))?;

    Ok(StatusCode::OK)
}

#[cfg(test)]
mod tests {
    use crate::{
        Category,
        endpoints::{self, format_endpoint},
        rule::db::{create_rule, get_rules},
        test_utils::{TEST_USER_ID, get_test_app_state, get_test_server, log_in},
    };

    #[tokio::test]
    async fn deletes_rule() {
        let state = get_test_app_state();
        let rule = {
            let connection = state.db_connection.lock().unwrap();
            create_rule(TEST_USER_ID, "BP", Category::Transportation, &connection).unwrap()
        };
        let server = get_test_server(state.clone());
        let cookie = log_in(&server).await;

        server
            .delete(&format_endpoint(endpoints::RULE, rule.id))
            .add_cookie(cookie)
            .await
            .assert_status_ok();

        let connection = state.db_connection.lock().unwrap();
        assert_eq!(get_rules(TEST_USER_ID, &connection), Ok(vec![]));
    }

    #[tokio::test]
    async fn missing_rule_is_not_found() {
        let server = get_test_server(get_test_app_state());
        let cookie = log_in(&server).await;

        server
            .delete(&format_endpoint(endpoints::RULE, 42))
            .add_cookie(cookie)
            .await
            .assert_status_not_found();
    }
}
