use rusqlite::{Connection, Row};
use time::OffsetDateTime;

use crate::{
    Category, Error,
    auth::UserID,
    database_id::RuleId,
    rule::models::Rule,
};

/// Create a rule for `user_id` in the database.
///
/// # Errors
/// This function will return a:
/// - [Error::DuplicateRule] if the user already has a rule with the same substring and category,
/// - [Error::SqlError] if there is some other SQL error.
pub fn create_rule(
    user_id: UserID,
    substring: &str,
    category: Category,
    connection: &Connection,
) -> Result<Rule, Error> {
    let created_at = OffsetDateTime::now_utc();

    connection
        .execute(
            "INSERT INTO rule (user_id, substring, category, created_at) VALUES (?1, ?2, ?3, ?4);",
            (user_id.as_i64(), substring, category, created_at),
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
                },
                _,
            ) => Error::DuplicateRule(substring.to_owned()),
            error => error.into(),
        })?;

    Ok(Rule {
        id: connection.last_insert_rowid(),
        user_id,
        substring: substring.to_owned(),
        category,
        created_at,
    })
}

/// Retrieve the rules of `user_id` for display, sorted by substring in descending order.
///
/// # Errors
/// This function will return an error if there is an SQL error.
pub fn get_rules(user_id: UserID, connection: &Connection) -> Result<Vec<Rule>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, substring, category, created_at FROM rule
             WHERE user_id = :user_id
             ORDER BY substring DESC, id ASC;",
        )?
        .query_map(&[(":user_id", &user_id.as_i64())], map_rule_row)?
        .map(|maybe_rule| maybe_rule.map_err(|error| error.into()))
        .collect()
}

/// Retrieve the rules of `user_id` in the order they were created.
///
/// # Errors
/// This function will return an error if there is an SQL error.
pub fn get_rules_by_creation(
    user_id: UserID,
    connection: &Connection,
) -> Result<Vec<Rule>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, substring, category, created_at FROM rule
             WHERE user_id = :user_id
             ORDER BY id ASC;",
        )?
        .query_map(&[(":user_id", &user_id.as_i64())], map_rule_row)?
        .map(|maybe_rule| maybe_rule.map_err(|error| error.into()))
        .collect()
}

/// Delete a rule from the database.
///
/// # Errors
/// This function will return an error if there is an SQL error or if `user_id`
/// has no rule with `rule_id`.
pub fn delete_rule(rule_id: RuleId, user_id: UserID, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM rule WHERE id = ?1 AND user_id = ?2",
        (rule_id, user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingRule);
    }

    Ok(())
}

/// Create the rule table.
pub fn create_rule_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS rule (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                substring TEXT NOT NULL,
                category TEXT NOT NULL,
                created_at TEXT NOT NULL,
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE,
                UNIQUE(user_id, substring, category)
            );",
        (),
    )?;

    // Ensure the sequence starts at 1
    connection.execute(
        "INSERT OR IGNORE INTO sqlite_sequence (name, seq) VALUES ('rule', 0)",
        (),
    )?;

    Ok(())
}

fn map_rule_row(row: &Row) -> Result<Rule, rusqlite::Error> {
    Ok(Rule {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        substring: row.get(2)?,
        category: row.get(3)?,
        created_at: row.get(4)?,
    })
}
