//! Registration of new users.
//!
//! The first user to register becomes the admin. After that, new users may
//! only register while an admin has registration enabled.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::{
    AppState, Error, PasswordHash,
    auth::{UserInfo, UserType, count_users, create_user},
    settings::get_settings,
};

/// The state needed to register a user.
#[derive(Debug, Clone)]
pub struct RegistrationState {
    /// The bcrypt cost used to hash new passwords.
    pub password_hash_cost: u32,
    /// The database connection.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for RegistrationState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            password_hash_cost: state.password_hash_cost,
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The details sent by the client to register.
#[derive(Clone, Serialize, Deserialize)]
pub struct RegisterForm {
    /// The name to log in with.
    pub username: String,
    /// The plaintext password, checked for strength before hashing.
    pub password: String,
}

/// Whether a new user would be allowed to register right now.
fn is_registration_open(connection: &Connection) -> Result<bool, Error> {
    if count_users(connection)? == 0 {
        return Ok(true);
    }

    Ok(get_settings(connection)?.registration_enabled)
}

/// Report whether the client should offer the registration page.
pub async fn get_registration_enabled(
    State(state): State<RegistrationState>,
) -> Result<Json<Value>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let registration_enabled = is_registration_open(&connection)?;

    Ok(Json(json!({ "registration_enabled": registration_enabled })))
}

/// Register a new user.
///
/// # Errors
///
/// This function will return an:
/// - [Error::RegistrationDisabled] if users exist and registration is turned off,
/// - [Error::EmptyUsername] if the username is blank,
/// - [Error::TooWeak] if the password is too easy to guess,
/// - [Error::DuplicateUsername] if the username is taken.
pub async fn register_user(
    State(state): State<RegistrationState>,
    Json(form): Json<RegisterForm>,
) -> Result<(StatusCode, Json<UserInfo>), Error> {
    {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        if !is_registration_open(&connection)? {
            return Err(Error::RegistrationDisabled);
        }
    }

    let username = form.username.trim();
    if username.is_empty() {
        return Err(Error::EmptyUsername);
    }

    // The database lock must not be held while hashing.
    let password_hash =
        PasswordHash::from_raw_password(&form.password, &[username], state.password_hash_cost)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let user_type = if count_users(&connection)? == 0 {
        UserType::Admin
    } else {
        UserType::Standard
    };

    let user = create_user(username, password_hash, user_type, &connection)
        .inspect_err(|error| tracing::debug!("Could not register user: {error}"))?;

    tracing::info!("Registered user {} as {:?}", user.id, user.user_type);

    Ok((StatusCode::CREATED, Json(user.into())))
}
