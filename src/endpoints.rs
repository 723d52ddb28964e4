//! The API endpoints URIs.
//!
//! Tests fill in endpoints that take a parameter, e.g., '/rules/{rule_id}',
//! with `format_endpoint`.

/// The route to request a cup of coffee (experimental).
pub const COFFEE: &str = "/coffee";
/// The route for logging in a user.
pub const LOG_IN: &str = "/login";
/// The route for the client to log out the current user.
pub const LOG_OUT: &str = "/logout";
/// The route for checking whether new users may register.
pub const REGISTRATION_ENABLED: &str = "/registration_enabled";
/// The route to register and list users.
pub const USERS: &str = "/users";
/// The route for checking whether the auth cookie is valid.
pub const LOGGED_IN: &str = "/logged_in";
/// The route for checking whether the current user is an admin.
pub const IS_ADMIN: &str = "/is_admin";
/// The route for the current user's details.
pub const USER_INFO: &str = "/user_info";
/// The route to access transactions.
pub const TRANSACTIONS: &str = "/transactions";
/// The route to change the category of a single transaction.
pub const TRANSACTION_CATEGORY: &str = "/transactions/category";
/// The route to access a single transaction.
pub const TRANSACTION: &str = "/transactions/{transaction_id}";
/// The route for the income/expense totals of a period.
pub const TRANSACTIONS_SUMMARY: &str = "/transactions/summary";
/// The route for the per-month totals of a year.
pub const TRANSACTIONS_MONTHLY: &str = "/transactions/monthly";
/// The route for the ECharts options of the expense distribution chart.
pub const EXPENSES_CHART: &str = "/transactions/expenses_chart";
/// The route to download transactions as CSV.
pub const TRANSACTIONS_EXPORT: &str = "/transactions/export";
/// The route to list and create rules.
pub const RULES: &str = "/rules";
/// The route to delete a rule.
pub const RULE: &str = "/rules/{rule_id}";
/// The route to apply every rule to every transaction.
pub const APPLY_RULES: &str = "/rules/apply";
/// The route to list and create enrollments.
pub const ENROLLMENTS: &str = "/enrollments";
/// The route to update or delete an enrollment.
pub const ENROLLMENT: &str = "/enrollments/{enrollment_id}";
/// The route for the Teller application ID used by the client to link accounts.
pub const TELLER_APP_ID: &str = "/teller_app_id";
/// The route for the admin-editable server settings.
pub const CONFIGS: &str = "/configs";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/rules/{rule_id}', '{rule_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
#[cfg(test)]
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_string();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|offset| param_start + offset + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}

// These tests are here so that we know when we call `Uri::from_shared` it will not panic.
#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints;

    use super::format_endpoint;

    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok());
    }

    #[test]
    fn endpoints_are_valid_uris() {
        assert_endpoint_is_valid_uri(endpoints::COFFEE);
        assert_endpoint_is_valid_uri(endpoints::LOG_IN);
        assert_endpoint_is_valid_uri(endpoints::LOG_OUT);
        assert_endpoint_is_valid_uri(endpoints::REGISTRATION_ENABLED);
        assert_endpoint_is_valid_uri(endpoints::USERS);
        assert_endpoint_is_valid_uri(endpoints::LOGGED_IN);
        assert_endpoint_is_valid_uri(endpoints::IS_ADMIN);
        assert_endpoint_is_valid_uri(endpoints::USER_INFO);
        assert_endpoint_is_valid_uri(endpoints::TRANSACTIONS);
        assert_endpoint_is_valid_uri(endpoints::TRANSACTION_CATEGORY);
        assert_endpoint_is_valid_uri(&format_endpoint(endpoints::TRANSACTION, 1));
        assert_endpoint_is_valid_uri(endpoints::TRANSACTIONS_SUMMARY);
        assert_endpoint_is_valid_uri(endpoints::TRANSACTIONS_MONTHLY);
        assert_endpoint_is_valid_uri(endpoints::EXPENSES_CHART);
        assert_endpoint_is_valid_uri(endpoints::TRANSACTIONS_EXPORT);
        assert_endpoint_is_valid_uri(endpoints::RULES);
        assert_endpoint_is_valid_uri(&format_endpoint(endpoints::RULE, 1));
        assert_endpoint_is_valid_uri(endpoints::APPLY_RULES);
        assert_endpoint_is_valid_uri(endpoints::ENROLLMENTS);
        assert_endpoint_is_valid_uri(&format_endpoint(endpoints::ENROLLMENT, 1));
        assert_endpoint_is_valid_uri(endpoints::TELLER_APP_ID);
        assert_endpoint_is_valid_uri(endpoints::CONFIGS);
    }

    #[test]
    fn format_endpoint_replaces_parameter() {
        assert_eq!(format_endpoint(endpoints::RULE, 42), "/rules/42");
        assert_eq!(
            format_endpoint(endpoints::TRANSACTION, 7),
            "/transactions/7"
        );
    }

    #[test]
    fn format_endpoint_without_parameter_is_unchanged() {
        assert_eq!(format_endpoint(endpoints::RULES, 42), endpoints::RULES);
    }
}
