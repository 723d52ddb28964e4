use axum::{Extension, Json, extract::State};
use rusqlite::Connection;
use serde_json::{Value, json};

use crate::{
    Category, Error,
    auth::UserID,
    database_id::TransactionId,
    rule::{Rule, db::get_rules_by_creation, matching::rule_for_name, models::RuleState},
};

/// A route handler for applying every rule of the user to all of their transactions.
pub async fn apply_rules_endpoint(
    State(state): State<RuleState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<Value>, Error> {
    let start_time = std::time::Instant::now();

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let transaction = connection.unchecked_transaction()?;
    let rules = get_rules_by_creation(user_id, &transaction)?;
    let transactions_updated = apply_rules(user_id, &rules, &transaction)
        .inspect_err(|error| tracing::error!("Failed to apply rules for user {user_id}: {error}"))?;
    transaction.commit()?;

    tracing::info!(
        "Applied {} rules for user {user_id} in {}ms: {transactions_updated} transactions updated",
        rules.len(),
        start_time.elapsed().as_millis(),
    );

    Ok(Json(json!({ "transactions_updated": transactions_updated })))
}

/// Categorize the transactions of `user_id` with `rules`.
///
/// `rules` must be in creation order, see [rule_for_name]. Every matching
/// transaction gets the category of its rule and an amount with the sign
/// normalized for that category. Returns the number of matching transactions.
///
/// **Note**: If you want transactional integrity (all or nothing), pass in a
/// transaction for `connection`.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an SQL error.
pub fn apply_rules(
    user_id: UserID,
    rules: &[Rule],
    connection: &Connection,
) -> Result<usize, Error> {
    if rules.is_empty() {
        return Ok(0);
    }

    let transactions: Vec<(TransactionId, String, f64)> = connection
        .prepare("SELECT id, name, amount FROM \"transaction\" WHERE user_id = ?1")?
        .query_map([user_id.as_i64()], |row| {
            Ok((row.get(0)?, row.get(1)?, row.get(2)?))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let updates: Vec<(TransactionId, Category, f64)> = transactions
        .into_iter()
        .filter_map(|(id, name, amount)| {
            rule_for_name(&name, rules)
                .map(|rule| (id, rule.category, rule.category.normalize_amount(amount)))
        })
        .collect();

    let mut statement = connection
        .prepare("UPDATE \"transaction\" SET category = ?1, amount = ?2 WHERE id = ?3")?;

    for (id, category, amount) in &updates {
        statement.execute((category, amount, id))?;
    }

    Ok(updates.len())
}
