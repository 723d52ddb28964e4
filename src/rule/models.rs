use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{AppState, Category, auth::UserID, database_id::RuleId};

/// A rule that categorizes transactions whose names contain `substring`.
/// Matching is case-sensitive.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rule {
    /// The ID of the rule.
    pub id: RuleId,

    /// The user the rule belongs to.
    pub user_id: UserID,

    /// The text that transaction names must contain.
    pub substring: String,

    /// The category to give matching transactions.
    pub category: Category,

    /// When the rule was created. Later rules take precedence.
    pub created_at: OffsetDateTime,
}

/// Unified state for all rule-related operations.
#[derive(Debug, Clone)]
pub struct RuleState {
    /// The database connection.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for RuleState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Form data for creating rules.
#[derive(Debug, Serialize, Deserialize)]
pub struct RuleForm {
    /// The text that transaction names must contain.
    pub substring: String,
    /// The lowercase category name, e.g. "groceries".
    pub category: String,
}
