use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{Error, auth::UserID, database_id::EnrollmentId};

/// A link between a user and one of their banks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Enrollment {
    /// The id for the enrollment.
    pub id: EnrollmentId,
    /// The user that linked the bank.
    pub user_id: UserID,
    /// The name of the bank, e.g. "ASB".
    pub institution: String,
    /// The token the sync process uses to fetch transactions.
    #[serde(skip_serializing)]
    pub access_token: String,
    /// Whether the bank has revoked access and the user needs to reconnect.
    pub disconnected: bool,
    /// When the bank was linked.
    pub created_at: OffsetDateTime,
}

/// The fields of an enrollment the client may change.
///
/// Fields that are `None` are left as they are.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EnrollmentUpdate {
    /// The new display name of the linked bank.
    pub institution: Option<String>,
    /// Whether the link to the bank has stopped working.
    pub disconnected: Option<bool>,
}

/// Create the enrollment table.
pub fn create_enrollment_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS enrollment (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL,
            institution TEXT NOT NULL,
            access_token TEXT NOT NULL,
            disconnected INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
        )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_enrollment_user_id ON enrollment(user_id)",
        (),
    )?;

    Ok(())
}

/// Store a new enrollment for `user_id`.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an SQL error.
pub fn create_enrollment(
    user_id: UserID,
    institution: &str,
    access_token: &str,
    connection: &Connection,
) -> Result<Enrollment, Error> {
    let institution = institution.trim();
    let created_at = OffsetDateTime::now_utc();

    connection.execute(
        "INSERT INTO enrollment (user_id, institution, access_token, disconnected, created_at)
         VALUES (?1, ?2, ?3, 0, ?4)",
        (user_id.as_i64(), institution, access_token, created_at),
    )?;

    Ok(Enrollment {
        id: connection.last_insert_rowid(),
        user_id,
        institution: institution.to_owned(),
        access_token: access_token.to_owned(),
        disconnected: false,
        created_at,
    })
}

/// Get the enrollments of `user_id`, sorted by institution name.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an SQL error.
pub fn get_enrollments(user_id: UserID, connection: &Connection) -> Result<Vec<Enrollment>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, institution, access_token, disconnected, created_at
             FROM enrollment
             WHERE user_id = :user_id
             ORDER BY institution ASC, id ASC",
        )?
        .query_map(&[(":user_id", &user_id.as_i64())], map_enrollment_row)?
        .map(|maybe_enrollment| maybe_enrollment.map_err(|error| error.into()))
        .collect()
}

fn get_enrollment(
    enrollment_id: EnrollmentId,
    user_id: UserID,
    connection: &Connection,
) -> Result<Enrollment, Error> {
    connection
        .query_row(
            "SELECT id, user_id, institution, access_token, disconnected, created_at
             FROM enrollment
             WHERE id = ?1 AND user_id = ?2",
            (enrollment_id, user_id.as_i64()),
            map_enrollment_row,
        )
        .map_err(|error| error.into())
}

/// Apply `update` to the enrollment and return the updated enrollment.
///
/// # Errors
/// Returns an [Error::UpdateMissingEnrollment] if `user_id` has no enrollment
/// with `enrollment_id`.
pub fn update_enrollment(
    enrollment_id: EnrollmentId,
    user_id: UserID,
    update: &EnrollmentUpdate,
    connection: &Connection,
) -> Result<Enrollment, Error> {
    let rows_affected = connection.execute(
        "UPDATE enrollment
         SET institution = COALESCE(?1, institution),
             disconnected = COALESCE(?2, disconnected)
         WHERE id = ?3 AND user_id = ?4",
        (
            update.institution.as_deref().map(str::trim),
            update.disconnected,
            enrollment_id,
            user_id.as_i64(),
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingEnrollment);
    }

    get_enrollment(enrollment_id, user_id, connection)
}

/// Delete the enrollment. Its transactions are kept and lose the link.
///
/// # Errors
/// Returns an [Error::DeleteMissingEnrollment] if `user_id` has no enrollment
/// with `enrollment_id`.
pub fn delete_enrollment(
    enrollment_id: EnrollmentId,
    user_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM enrollment WHERE id = ?1 AND user_id = ?2",
        (enrollment_id, user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingEnrollment);
    }

    Ok(())
}

fn map_enrollment_row(row: &Row) -> Result<Enrollment, rusqlite::Error> {
    Ok(Enrollment {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        institution: row.get(2)?,
        access_token: row.get(3)?,
        disconnected: row.get(4)?,
        created_at: row.get(5)?,
    })
}
