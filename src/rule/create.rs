use axum::{Extension, Json, extract::State, http::StatusCode};
use serde::Serialize;

use crate::{
    Category, Error,
    auth::UserID,
    rule::{
        Rule,
        apply::apply_rules,
        db::create_rule,
        models::{RuleForm, RuleState},
    },
};

/// The new rule and how many existing transactions it categorized.
#[derive(Debug, Serialize)]
pub struct CreateRuleResponse {
    /// The stored rule.
    pub rule: Rule,
    /// The number of existing transactions the rule categorized.
    pub transactions_updated: usize,
}

/// A route handler for creating a new rule.
///
/// The substring is stored exactly as entered, surrounding whitespace included.
/// The rule is applied to the user's existing transactions straight away.
///
/// # Errors
///
/// This function will return an:
/// - [Error::EmptyRuleSubstring] if the substring is blank, before touching the database,
/// - [Error::UnknownCategory] if the category is not one of [Category::ALL],
/// - [Error::DuplicateRule] if the user already has the same rule.
pub async fn create_rule_endpoint(
    State(state): State<RuleState>,
    Extension(user_id): Extension<UserID>,
    Json(form): Json<RuleForm>,
) -> Result<(StatusCode, Json<CreateRuleResponse>), Error> {
    if form.substring.trim().is_empty() {
        return Err(Error::EmptyRuleSubstring);
    }

    let category: Category = form.category.parse()?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let transaction = connection.unchecked_transaction()?;
    let rule = create_rule(user_id, &form.substring, category, &transaction)?;
    let transactions_updated = apply_rules(user_id, std::slice::from_ref(&rule), &transaction)
        .inspect_err(|error| {
            tracing::error!("An unexpected error occurred while applying a new rule: {error}")
        })?;
    transaction.commit()?;

    tracing::info!(
        "User {user_id} created rule {} which categorized {transactions_updated} transactions",
        rule.id
    );

    Ok((
        StatusCode::CREATED,
        Json(CreateRuleResponse {
            rule,
            transactions_updated,
        }),
    ))
}
