//! Code for creating the user table and fetching users from the database.

use std::fmt::Display;

use rusqlite::{
    Connection, Row, ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};

use crate::{Error, PasswordHash};

/// A newtype wrapper for integer user IDs.
///
/// This helps disambiguate user IDs from other types of IDs, leading to better compile time
/// errors, and more flexible generics that can have distinct implementations for multiple ID types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct UserID(i64);

impl UserID {
    /// Create a new user ID.
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Cast the user ID to a 64 bit integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// What a user is allowed to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    /// May change server settings and list every user.
    Admin,
    /// May only access their own data.
    Standard,
}

impl UserType {
    fn as_str(&self) -> &'static str {
        match self {
            UserType::Admin => "admin",
            UserType::Standard => "standard",
        }
    }
}

impl ToSql for UserType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for UserType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "admin" => Ok(UserType::Admin),
            "standard" => Ok(UserType::Standard),
            other => Err(FromSqlError::Other(
                format!("unknown user type \"{other}\"").into(),
            )),
        }
    }
}

/// A user of the application.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    /// The user's ID in the application database.
    pub id: UserID,
    /// The unique name the user logs in with.
    pub username: String,
    /// The user's password hash.
    pub password_hash: PasswordHash,
    /// Whether the user is an admin.
    pub user_type: UserType,
}

/// The parts of a [User] that are safe to send to the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    /// The user's ID in the application database.
    pub id: UserID,
    /// The unique name the user logs in with.
    pub username: String,
    /// Whether the user is an admin.
    pub user_type: UserType,
}

impl From<User> for UserInfo {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            user_type: user.user_type,
        }
    }
}

/// Create the user table.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_user_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS user (
                id INTEGER PRIMARY KEY,
                username TEXT NOT NULL UNIQUE,
                password TEXT NOT NULL,
                user_type TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// Create and insert a new user into the database.
///
/// `username` is trimmed before it is stored.
///
/// # Errors
///
/// Returns a:
/// - [Error::EmptyUsername] if `username` is empty or only whitespace,
/// - [Error::DuplicateUsername] if another user already has `username`,
/// - [Error::SqlError] if some other SQL related error occurred.
pub fn create_user(
    username: &str,
    password_hash: PasswordHash,
    user_type: UserType,
    connection: &Connection,
) -> Result<User, Error> {
    let username = username.trim();

    if username.is_empty() {
        return Err(Error::EmptyUsername);
    }

    connection
        .execute(
            "INSERT INTO user (username, password, user_type) VALUES (?1, ?2, ?3)",
            (username, &password_hash, user_type),
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
                },
                _,
            ) => Error::DuplicateUsername(username.to_owned()),
            error => error.into(),
        })?;

    Ok(User {
        id: UserID::new(connection.last_insert_rowid()),
        username: username.to_owned(),
        password_hash,
        user_type,
    })
}

/// Get the user from the database with an ID equal to `user_id`.
///
/// # Errors
///
/// This function will return an error if:
/// - `user_id` does not belong to a registered user.
/// - there was an error trying to access the store.
pub fn get_user_by_id(user_id: UserID, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare("SELECT id, username, password, user_type FROM user WHERE id = :id")?
        .query_row(&[(":id", &user_id.as_i64())], map_user_row)
        .map_err(|error| error.into())
}

/// Get the user from the database that logs in with `username`.
///
/// # Errors
///
/// Returns an [Error::NotFound] if no user has `username`.
pub fn get_user_by_username(username: &str, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare("SELECT id, username, password, user_type FROM user WHERE username = :username")?
        .query_row(&[(":username", &username.trim())], map_user_row)
        .map_err(|error| error.into())
}

/// Get every user, ordered by ID.
///
/// # Errors
///
/// Returns a [Error::SqlError] if an SQL related error occurred.
pub fn get_all_users(connection: &Connection) -> Result<Vec<User>, Error> {
    connection
        .prepare("SELECT id, username, password, user_type FROM user ORDER BY id")?
        .query_map([], map_user_row)?
        .map(|maybe_user| maybe_user.map_err(|error| error.into()))
        .collect()
}

/// Replace the password hash of `user_id`.
///
/// # Errors
///
/// Returns an [Error::NotFound] if `user_id` does not belong to a registered user.
pub fn update_password(
    user_id: UserID,
    password_hash: &PasswordHash,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE user SET password = ?1 WHERE id = ?2",
        (password_hash, user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// Get the number of users in the database.
///
/// # Errors
///
/// Returns a [Error::SqlError] if an SQL related error occurred.
pub fn count_users(connection: &Connection) -> Result<usize, Error> {
    let count: i64 =
        connection.query_row("SELECT COUNT(id) FROM user;", [], |row| row.get(0))?;

    Ok(usize::try_from(count).unwrap_or_default())
}

fn map_user_row(row: &Row) -> Result<User, rusqlite::Error> {
    Ok(User {
        id: UserID::new(row.get(0)?),
        username: row.get(1)?,
        password_hash: row.get(2)?,
        user_type: row.get(3)?,
    })
}

#[cfg(test)]
mod user_tests {
    use crate::{Error, PasswordHash, test_utils::get_test_connection};

    use super::{
        UserID, UserType, count_users, create_user, get_all_users, get_user_by_id,
        get_user_by_username, update_password,
    };

    #[test]
    fn insert_user_succeeds() {
        let connection = get_test_connection();
        let password_hash = PasswordHash::new_unchecked("hunter2");

        let inserted_user = create_user(
            " alice ",
            password_hash.clone(),
            UserType::Admin,
            &connection,
        )
        .unwrap();

        assert!(inserted_user.id.as_i64() > 0);
        assert_eq!(inserted_user.username, "alice");
        assert_eq!(inserted_user.password_hash, password_hash);
        assert_eq!(inserted_user.user_type, UserType::Admin);
    }

    #[test]
    fn insert_user_fails_on_empty_username() {
        let connection = get_test_connection();

        let result = create_user(
            "   ",
            PasswordHash::new_unchecked("hunter2"),
            UserType::Standard,
            &connection,
        );

        assert_eq!(result, Err(Error::EmptyUsername));
    }

    #[test]
    fn insert_user_fails_on_duplicate_username() {
        let connection = get_test_connection();
        create_user(
            "alice",
            PasswordHash::new_unchecked("hunter2"),
            UserType::Admin,
            &connection,
        )
        .unwrap();

        let result = create_user(
            "alice",
            PasswordHash::new_unchecked("hunter3"),
            UserType::Standard,
            &connection,
        );

        assert_eq!(result, Err(Error::DuplicateUsername("alice".to_owned())));
    }

    #[test]
    fn get_user_fails_with_non_existent_id() {
        let connection = get_test_connection();

        assert_eq!(
            get_user_by_id(UserID::new(42), &connection),
            Err(Error::NotFound)
        );
    }

    #[test]
    fn get_user_by_id_and_username_return_same_user() {
        let connection = get_test_connection();
        let user = create_user(
            "bob",
            PasswordHash::new_unchecked("hunter2"),
            UserType::Standard,
            &connection,
        )
        .unwrap();

        assert_eq!(get_user_by_id(user.id, &connection), Ok(user.clone()));
        assert_eq!(get_user_by_username("bob", &connection), Ok(user));
    }

    #[test]
    fn get_user_by_username_fails_for_unknown_user() {
        let connection = get_test_connection();

        assert_eq!(
            get_user_by_username("nobody", &connection),
            Err(Error::NotFound)
        );
    }

    #[test]
    fn get_all_users_returns_users_in_id_order() {
        let connection = get_test_connection();
        let alice = create_user(
            "alice",
            PasswordHash::new_unchecked("hunter2"),
            UserType::Admin,
            &connection,
        )
        .unwrap();
        let bob = create_user(
            "bob",
            PasswordHash::new_unchecked("hunter2"),
            UserType::Standard,
            &connection,
        )
        .unwrap();

        assert_eq!(get_all_users(&connection), Ok(vec![alice, bob]));
    }

    #[test]
    fn update_password_replaces_hash() {
        let connection = get_test_connection();
        let user = create_user(
            "alice",
            PasswordHash::new_unchecked("hunter2"),
            UserType::Admin,
            &connection,
        )
        .unwrap();
        let new_hash = PasswordHash::new_unchecked("hunter3");

        update_password(user.id, &new_hash, &connection).unwrap();

        let got = get_user_by_id(user.id, &connection).unwrap();
        assert_eq!(got.password_hash, new_hash);
    }

    #[test]
    fn update_password_fails_for_missing_user() {
        let connection = get_test_connection();

        let result = update_password(
            UserID::new(42),
            &PasswordHash::new_unchecked("hunter3"),
            &connection,
        );

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn returns_correct_count() {
        let connection = get_test_connection();

        let count = count_users(&connection).expect("Could not get user count");
        assert_eq!(0, count, "Want zero users before insertion, got {count}");

        create_user(
            "alice",
            PasswordHash::new_unchecked("hunter2"),
            UserType::Admin,
            &connection,
        )
        .unwrap();

        let count = count_users(&connection).expect("Could not get user count");
        assert_eq!(1, count, "Want one user after insertion, got {count}");
    }
}
