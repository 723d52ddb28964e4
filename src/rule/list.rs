use axum::{Extension, Json, extract::State};
use serde_json::{Value, json};

use crate::{
    Error,
    auth::UserID,
    rule::{db::get_rules, models::RuleState},
};

/// Route handler for listing the user's rules, sorted by substring in descending order.
pub async fn get_rules_endpoint(
    State(state): State<RuleState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<Value>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let rules = get_rules(user_id, &connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve rules: {error}"))?;

    Ok(Json(json!({ "rules": rules })))
}
