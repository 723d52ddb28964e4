//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router,
    http::StatusCode,
    middleware,
    routing::{delete, get, patch, post},
};

use crate::{
    AppState, Error,
    auth::{
        auth_guard, get_is_admin, get_logged_in, get_registration_enabled, get_user_info,
        get_users, post_log_in, post_log_out, register_user,
    },
    endpoints,
    enrollment::{
        create_enrollment_endpoint, delete_enrollment_endpoint, get_enrollments_endpoint,
        update_enrollment_endpoint,
    },
    rule::{apply_rules_endpoint, create_rule_endpoint, delete_rule_endpoint, get_rules_endpoint},
    settings::{get_configs, get_teller_app_id, put_configs},
    summary::{get_expenses_chart_endpoint, get_monthly_totals_endpoint, get_summary_endpoint},
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, export_transactions_endpoint,
        get_transactions_endpoint, update_category_endpoint, update_transaction_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::COFFEE, get(get_coffee))
        .route(endpoints::LOG_IN, post(post_log_in))
        .route(endpoints::LOG_OUT, post(post_log_out))
        .route(
            endpoints::REGISTRATION_ENABLED,
            get(get_registration_enabled),
        )
        .route(endpoints::USERS, post(register_user));

    let protected_routes = Router::new()
        .route(endpoints::LOGGED_IN, get(get_logged_in))
        .route(endpoints::IS_ADMIN, get(get_is_admin))
        .route(endpoints::USER_INFO, get(get_user_info))
        .route(endpoints::USERS, get(get_users))
        .route(
            endpoints::TRANSACTIONS,
            get(get_transactions_endpoint)
                .post(create_transaction_endpoint)
                .patch(update_transaction_endpoint),
        )
        .route(
            endpoints::TRANSACTION_CATEGORY,
            patch(update_category_endpoint),
        )
        .route(
            endpoints::TRANSACTION,
            delete(delete_transaction_endpoint),
        )
        .route(endpoints::TRANSACTIONS_SUMMARY, get(get_summary_endpoint))
        .route(
            endpoints::TRANSACTIONS_MONTHLY,
            get(get_monthly_totals_endpoint),
        )
        .route(endpoints::EXPENSES_CHART, get(get_expenses_chart_endpoint))
        .route(
            endpoints::TRANSACTIONS_EXPORT,
            get(export_transactions_endpoint),
        )
        .route(
            endpoints::RULES,
            get(get_rules_endpoint).post(create_rule_endpoint),
        )
        .route(endpoints::RULE, delete(delete_rule_endpoint))
        .route(endpoints::APPLY_RULES, post(apply_rules_endpoint))
        .route(
            endpoints::ENROLLMENTS,
            get(get_enrollments_endpoint).post(create_enrollment_endpoint),
        )
        .route(
            endpoints::ENROLLMENT,
            patch(update_enrollment_endpoint).delete(delete_enrollment_endpoint),
        )
        .route(endpoints::TELLER_APP_ID, get(get_teller_app_id))
        .route(endpoints::CONFIGS, get(get_configs).put(put_configs))
        .layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    protected_routes
        .merge(unprotected_routes)
        .fallback(get_404_not_found)
        .with_state(state)
}

/// Attempt to get a cup of coffee from the server.
async fn get_coffee() -> (StatusCode, &'static str) {
    (StatusCode::IM_A_TEAPOT, "I'm a teapot")
}

async fn get_404_not_found() -> Error {
    Error::NotFound
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::{
        endpoints::{self, format_endpoint},
        test_utils::{get_test_app_state, get_test_server, log_in},
    };

    #[tokio::test]
    async fn coffee_is_a_teapot() {
        let server = get_test_server(get_test_app_state());

        server
            .get(endpoints::COFFEE)
            .await
            .assert_status(StatusCode::IM_A_TEAPOT);
    }

    #[tokio::test]
    async fn protected_routes_need_cookie() {
        let server = get_test_server(get_test_app_state());

        for path in [
            endpoints::LOGGED_IN,
            endpoints::USERS,
            endpoints::TRANSACTIONS,
            endpoints::TRANSACTIONS_SUMMARY,
            endpoints::RULES,
            endpoints::ENROLLMENTS,
            endpoints::CONFIGS,
        ] {
            server.get(path).await.assert_status_unauthorized();
        }
    }

    #[tokio::test]
    async fn static_paths_are_not_transaction_ids() {
        let server = get_test_server(get_test_app_state());
        let cookie = log_in(&server).await;

        server
            .get(endpoints::TRANSACTIONS_MONTHLY)
            .add_query_param("year", 2025)
            .add_cookie(cookie.clone())
            .await
            .assert_status_ok();
        server
            .delete(&format_endpoint(endpoints::TRANSACTION, 99))
            .add_cookie(cookie)
            .await
            .assert_status_not_found();
    }

    #[tokio::test]
    async fn unknown_route_is_json_not_found() {
        let server = get_test_server(get_test_app_state());

        let response = server.get("/does/not/exist").await;

        response.assert_status_not_found();
        response.assert_json(&json!({"error": "the requested resource could not be found"}));
    }
}
