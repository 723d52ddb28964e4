//! Defines the core data models and database queries for transactions.

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::{Connection, Row};
use serde::Serialize;
use time::Date;

use crate::{
    AppState, Category, Error,
    auth::UserID,
    database_id::{EnrollmentId, TransactionId},
    period::Period,
};

// ============================================================================
// MODELS
// ============================================================================

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The user the transaction belongs to.
    pub user_id: UserID,
    /// When the transaction happened.
    pub date: Date,
    /// A text description of what the transaction was for.
    pub name: String,
    /// What the money was spent on, or [Category::Income].
    pub category: Category,
    /// The amount of money spent (negative) or earned (positive).
    pub amount: f64,
    /// The linked bank the transaction was synced from, if any.
    pub enrollment_id: Option<EnrollmentId>,
    /// Whether the user entered the transaction by hand.
    pub user_created: bool,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(date: Date, name: &str, amount: f64) -> TransactionBuilder {
        TransactionBuilder {
            date,
            name: name.to_owned(),
            amount,
            category: Category::default(),
            enrollment_id: None,
            user_created: false,
        }
    }
}

/// A builder for creating [Transaction] instances.
///
/// The name has runs of whitespace collapsed and the amount has its sign
/// normalized for the category when the transaction is stored.
///
/// # Examples
///
/// ```ignore
/// use time::macros::date;
///
/// let transaction = Transaction::build(date!(2025 - 01 - 15), "Countdown  Newmarket", 45.99)
///     .category(Category::Groceries)
///     .user_created(true);
/// ```
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    /// The date when the transaction occurred.
    pub date: Date,
    /// A human-readable description of the transaction, usually the bank's
    /// description for synced transactions.
    pub name: String,
    /// The monetary amount of the transaction. Only the magnitude matters
    /// for categories other than [Category::Ignore].
    pub amount: f64,
    /// The category of the transaction.
    pub category: Category,
    /// The linked bank the transaction came from.
    pub enrollment_id: Option<EnrollmentId>,
    /// Whether the user entered the transaction by hand.
    pub user_created: bool,
}

impl TransactionBuilder {
    /// Set the category for the transaction.
    pub fn category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    /// Set the enrollment the transaction was synced from.
    #[cfg(test)]
    pub fn enrollment_id(mut self, enrollment_id: Option<EnrollmentId>) -> Self {
        self.enrollment_id = enrollment_id;
        self
    }

    /// Set whether the user entered the transaction by hand.
    pub fn user_created(mut self, user_created: bool) -> Self {
        self.user_created = user_created;
        self
    }
}

/// Replace every run of whitespace in `text` with a single space and trim the ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// The state needed by the transaction endpoints.
#[derive(Debug, Clone)]
pub struct TransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for TransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

const SELECT_TRANSACTION: &str = "SELECT id, user_id, date, name, category, amount, enrollment_id, user_created FROM \"transaction\"";

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                date TEXT NOT NULL,
                name TEXT NOT NULL,
                category TEXT NOT NULL DEFAULT 'uncategorized',
                amount REAL NOT NULL,
                enrollment_id INTEGER,
                user_created INTEGER NOT NULL DEFAULT 0,
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE,
                FOREIGN KEY(enrollment_id) REFERENCES enrollment(id) ON UPDATE CASCADE ON DELETE SET NULL
                )",
        (),
    )?;

    // Ensure the sequence starts at 1
    connection.execute(
        "INSERT OR IGNORE INTO sqlite_sequence (name, seq) VALUES ('transaction', 0)",
        (),
    )?;

    // Every query filters by user and most by date.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_user_date ON \"transaction\"(user_id, date);",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_enrollment_id ON \"transaction\"(enrollment_id);",
        (),
    )?;

    Ok(())
}

/// Create a new transaction for `user_id` in the database from a builder.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn create_transaction(
    user_id: UserID,
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "INSERT INTO \"transaction\" (user_id, date, name, category, amount, enrollment_id, user_created)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             RETURNING id, user_id, date, name, category, amount, enrollment_id, user_created",
        )?
        .query_row(
            (
                user_id.as_i64(),
                builder.date,
                collapse_whitespace(&builder.name),
                builder.category,
                builder.category.normalize_amount(builder.amount),
                builder.enrollment_id,
                builder.user_created,
            ),
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Retrieve a transaction of `user_id` from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a transaction of `user_id`,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction(
    id: TransactionId,
    user_id: UserID,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(&format!(
            "{SELECT_TRANSACTION} WHERE id = :id AND user_id = :user_id"
        ))?
        .query_one(
            &[(":id", &id), (":user_id", &user_id.as_i64())],
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Get the transactions of `user_id`, newest first.
///
/// If `period` is `None`, every transaction of the user is returned.
///
/// # Errors
/// Returns an [Error::InvalidPeriod] if the period is outside the supported
/// date range or an [Error::SqlError] if there is an SQL error.
pub fn get_transactions(
    user_id: UserID,
    period: Option<Period>,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    let (start, end) = match period {
        Some(period) => {
            let (start, end) = period.date_range()?;
            (Some(start), Some(end))
        }
        None => (None, None),
    };

    // Sort by date, and then ID to keep transaction order stable after updates
    connection
        .prepare(&format!(
            "{SELECT_TRANSACTION}
             WHERE user_id = ?1
             AND (?2 IS NULL OR date >= ?2)
             AND (?3 IS NULL OR date < ?3)
             ORDER BY date DESC, id DESC"
        ))?
        .query_map((user_id.as_i64(), start, end), map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(|error| error.into()))
        .collect()
}

/// Get the distinct years that `user_id` has transactions in, newest first.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an SQL error.
pub fn get_transaction_years(user_id: UserID, connection: &Connection) -> Result<Vec<i32>, Error> {
    connection
        .prepare(
            "SELECT DISTINCT CAST(strftime('%Y', date) AS INTEGER) AS year
             FROM \"transaction\"
             WHERE user_id = ?1
             ORDER BY year DESC",
        )?
        .query_map([user_id.as_i64()], |row| row.get(0))?
        .map(|maybe_year| maybe_year.map_err(|error| error.into()))
        .collect()
}

/// Replace the date, name, category and amount of a transaction.
///
/// # Errors
/// Returns an [Error::UpdateMissingTransaction] if `id` does not refer to a
/// transaction of `user_id`.
pub fn update_transaction(
    id: TransactionId,
    user_id: UserID,
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let rows_affected = connection.execute(
        "UPDATE \"transaction\"
         SET date = ?1, name = ?2, category = ?3, amount = ?4
         WHERE id = ?5 AND user_id = ?6",
        (
            builder.date,
            collapse_whitespace(&builder.name),
            builder.category,
            builder.category.normalize_amount(builder.amount),
            id,
            user_id.as_i64(),
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingTransaction);
    }

    get_transaction(id, user_id, connection)
}

/// Change the category of a transaction, normalizing the sign of its amount.
///
/// # Errors
/// Returns an [Error::UpdateMissingTransaction] if `id` does not refer to a
/// transaction of `user_id`.
pub fn update_transaction_category(
    id: TransactionId,
    user_id: UserID,
    category: Category,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = get_transaction(id, user_id, connection).map_err(|error| match error {
        Error::NotFound => Error::UpdateMissingTransaction,
        error => error,
    })?;
    let amount = category.normalize_amount(transaction.amount);

    connection.execute(
        "UPDATE \"transaction\" SET category = ?1, amount = ?2 WHERE id = ?3",
        (category, amount, id),
    )?;

    Ok(Transaction {
        category,
        amount,
        ..transaction
    })
}

/// Delete a transaction that the user entered by hand.
///
/// # Errors
/// This function will return a:
/// - [Error::DeleteMissingTransaction] if `id` does not refer to a transaction of `user_id`,
/// - [Error::DeleteSyncedTransaction] if the transaction was synced from a bank,
/// - or [Error::SqlError] there is some other SQL error.
pub fn delete_transaction(
    id: TransactionId,
    user_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    let transaction = get_transaction(id, user_id, connection).map_err(|error| match error {
        Error::NotFound => Error::DeleteMissingTransaction,
        error => error,
    })?;

    if !transaction.user_created {
        return Err(Error::DeleteSyncedTransaction);
    }

    connection.execute("DELETE FROM \"transaction\" WHERE id = ?1", [id])?;

    Ok(())
}

/// Map a database row to a Transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        date: row.get(2)?,
        name: row.get(3)?,
        category: row.get(4)?,
        amount: row.get(5)?,
        enrollment_id: row.get(6)?,
        user_created: row.get(7)?,
    })
}

// ============================================================================
// TESTS
// ============================================================================
