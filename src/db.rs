//! Creates the application's database schema.

use rusqlite::Connection;

use crate::{
    Error, auth::create_user_table, enrollment::create_enrollment_table,
    rule::create_rule_table, settings::create_settings_table,
    transaction::create_transaction_table,
};

/// Create the tables for the domain models if they do not already exist and
/// turn on foreign key enforcement for `connection`.
///
/// # Errors
/// Returns an [Error::SqlError] if any of the tables could not be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    // Foreign keys are off by default in SQLite and the setting is per connection.
    connection.execute_batch("PRAGMA foreign_keys = ON;")?;

    let transaction = connection.unchecked_transaction()?;

    create_user_table(&transaction)?;
    create_settings_table(&transaction)?;
    create_enrollment_table(&transaction)?;
    create_transaction_table(&transaction)?;
    create_rule_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
