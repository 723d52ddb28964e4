//! Server-wide settings that an admin can change at runtime.
//!
//! The settings live in a single row of the `settings` table.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::{
    AppState, Error,
    auth::{UserID, require_admin},
};

/// The server-wide settings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Whether new users may register once an admin exists.
    pub registration_enabled: bool,
    /// The Teller application ID the client uses to link bank accounts.
    pub teller_application_id: String,
}

/// Create the settings table and insert the default settings if there are none.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_settings_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS settings (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                registration_enabled INTEGER NOT NULL,
                teller_application_id TEXT NOT NULL
                )",
        (),
    )?;

    let defaults = Settings::default();
    connection.execute(
        "INSERT OR IGNORE INTO settings (id, registration_enabled, teller_application_id)
         VALUES (1, ?1, ?2)",
        (defaults.registration_enabled, defaults.teller_application_id),
    )?;

    Ok(())
}

/// Get the current settings.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an SQL error.
pub fn get_settings(connection: &Connection) -> Result<Settings, Error> {
    connection
        .query_row(
            "SELECT registration_enabled, teller_application_id FROM settings WHERE id = 1",
            [],
            |row| {
                Ok(Settings {
                    registration_enabled: row.get(0)?,
                    teller_application_id: row.get(1)?,
                })
            },
        )
        .map_err(|error| error.into())
}

/// Replace the settings with `settings`.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an SQL error.
pub fn update_settings(settings: &Settings, connection: &Connection) -> Result<(), Error> {
    connection.execute(
        "UPDATE settings SET registration_enabled = ?1, teller_application_id = ?2 WHERE id = 1",
        (
            settings.registration_enabled,
            settings.teller_application_id.trim(),
        ),
    )?;

    Ok(())
}

/// The state needed for the settings endpoints.
#[derive(Debug, Clone)]
pub struct SettingsState {
    /// The database connection.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for SettingsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Get the Teller application ID for linking accounts.
pub async fn get_teller_app_id(State(state): State<SettingsState>) -> Result<Json<Value>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let settings = get_settings(&connection)?;

    Ok(Json(
        json!({ "teller_app_id": settings.teller_application_id }),
    ))
}

/// Get the server settings. Admin only.
pub async fn get_configs(
    State(state): State<SettingsState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<Settings>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    require_admin(user_id, &connection)?;

    Ok(Json(get_settings(&connection)?))
}

/// Replace the server settings. Admin only.
pub async fn put_configs(
    State(state): State<SettingsState>,
    Extension(user_id): Extension<UserID>,
    Json(settings): Json<Settings>,
) -> Result<Json<Settings>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    require_admin(user_id, &connection)?;
    update_settings(&settings, &connection)?;
    tracing::info!("User {user_id} updated the server settings");

    Ok(Json(get_settings(&connection)?))
}

#[cfg(test)]
mod settings_tests {
    use serde_json::json;

    use crate::{
        endpoints,
        test_utils::{
            create_standard_user, get_test_app_state, get_test_connection, get_test_server,
            log_in, log_in_as,
        },
    };

    use super::{Settings, get_settings, update_settings};

    #[test]
    fn defaults_are_inserted_once() {
        let connection = get_test_connection();

        assert_eq!(get_settings(&connection), Ok(Settings::default()));
    }

    #[test]
    fn update_replaces_settings() {
        let connection = get_test_connection();
        let want = Settings {
            registration_enabled: true,
            teller_application_id: "app_123".to_owned(),
        };

        update_settings(&want, &connection).unwrap();

        assert_eq!(get_settings(&connection), Ok(want));
    }

    #[tokio::test]
    async fn anyone_logged_in_can_get_teller_app_id() {
        let state = get_test_app_state();
        {
            let connection = state.db_connection.lock().unwrap();
            update_settings(
                &Settings {
                    registration_enabled: false,
                    teller_application_id: "app_123".to_owned(),
                },
                &connection,
            )
            .unwrap();
        }
        create_standard_user(&state, "bob");
        let server = get_test_server(state);
        let cookie = log_in_as(&server, "bob").await;

        let response = server.get(endpoints::TELLER_APP_ID).add_cookie(cookie).await;

        response.assert_status_ok();
        response.assert_json(&json!({"teller_app_id": "app_123"}));
    }

    #[tokio::test]
    async fn admin_can_replace_configs() {
        let server = get_test_server(get_test_app_state());
        let cookie = log_in(&server).await;

        let response = server
            .put(endpoints::CONFIGS)
            .add_cookie(cookie.clone())
            .json(&json!({"registration_enabled": true, "teller_application_id": "app_456"}))
            .await;
        response.assert_status_ok();

        let response = server.get(endpoints::CONFIGS).add_cookie(cookie).await;
        response.assert_status_ok();
        response.assert_json(&json!({
            "registration_enabled": true,
            "teller_application_id": "app_456"
        }));
    }

    #[tokio::test]
    async fn standard_user_cannot_access_configs() {
        let state = get_test_app_state();
        create_standard_user(&state, "bob");
        let server = get_test_server(state);
        let cookie = log_in_as(&server, "bob").await;

        server
            .get(endpoints::CONFIGS)
            .add_cookie(cookie.clone())
            .await
            .assert_status_unauthorized();
        server
            .put(endpoints::CONFIGS)
            .add_cookie(cookie)
            .json(&json!({"registration_enabled": true, "teller_application_id": ""}))
            .await
            .assert_status_unauthorized();
    }
}
