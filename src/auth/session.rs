//! Endpoints that tell the client about the logged in user.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, State},
    http::StatusCode,
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::{User, UserID, UserInfo, UserType, get_all_users, get_user_by_id},
};

/// The state needed for the user endpoints.
#[derive(Debug, Clone)]
pub struct UserState {
    /// The database connection.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for UserState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Get the user with `user_id` and check that they are an admin.
///
/// # Errors
/// Returns an [Error::Unauthorized] if the user no longer exists or an
/// [Error::NotAdmin] if the user is a standard user.
pub fn require_admin(user_id: UserID, connection: &Connection) -> Result<User, Error> {
    let user = get_user_by_id(user_id, connection).map_err(|error| match error {
        Error::NotFound => Error::Unauthorized,
        error => error,
    })?;

    if user.user_type != UserType::Admin {
        tracing::warn!("User {user_id} tried to access an admin only resource");
        return Err(Error::NotAdmin);
    }

    Ok(user)
}

/// Succeeds if the auth cookie is valid, which the auth middleware has already checked.
pub async fn get_logged_in() -> StatusCode {
    StatusCode::OK
}

/// Succeeds if the logged in user is an admin.
pub async fn get_is_admin(
    State(state): State<UserState>,
    Extension(user_id): Extension<UserID>,
) -> Result<StatusCode, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    require_admin(user_id, &connection)?;

    Ok(StatusCode::OK)
}

/// Get the name and type of the logged in user.
pub async fn get_user_info(
    State(state): State<UserState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<UserInfo>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let user = get_user_by_id(user_id, &connection).map_err(|error| match error {
        Error::NotFound => Error::Unauthorized,
        error => error,
    })?;

    Ok(Json(user.into()))
}

/// List every registered user. Admin only.
pub async fn get_users(
    State(state): State<UserState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<Vec<UserInfo>>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    require_admin(user_id, &connection)?;

    let users = get_all_users(&connection)?
        .into_iter()
        .map(UserInfo::from)
        .collect();

    Ok(Json(users))
}

#[cfg(test)]
mod session_tests {
    use serde_json::json;

    use crate::{
        Error,
        auth::UserID,
        endpoints,
        test_utils::{
            TEST_USERNAME, create_standard_user, get_test_app_state, get_test_connection,
            get_test_server, log_in, log_in_as,
        },
    };

    use super::require_admin;

    #[test]
    fn require_admin_fails_for_missing_user() {
        let connection = get_test_connection();

        assert_eq!(
            require_admin(UserID::new(42), &connection),
            Err(Error::Unauthorized)
        );
    }

    #[tokio::test]
    async fn logged_in_requires_cookie() {
        let server = get_test_server(get_test_app_state());

        server.get(endpoints::LOGGED_IN).await.assert_status_unauthorized();

        let cookie = log_in(&server).await;
        server
            .get(endpoints::LOGGED_IN)
            .add_cookie(cookie)
            .await
            .assert_status_ok();
    }

    #[tokio::test]
    async fn first_user_is_admin() {
        let server = get_test_server(get_test_app_state());
        let cookie = log_in(&server).await;

        server
            .get(endpoints::IS_ADMIN)
            .add_cookie(cookie)
            .await
            .assert_status_ok();
    }

    #[tokio::test]
    async fn standard_user_is_not_admin() {
        let state = get_test_app_state();
        create_standard_user(&state, "bob");
        let server = get_test_server(state);
        let cookie = log_in_as(&server, "bob").await;

        server
            .get(endpoints::IS_ADMIN)
            .add_cookie(cookie.clone())
            .await
            .assert_status_unauthorized();
        server
            .get(endpoints::USERS)
            .add_cookie(cookie)
            .await
            .assert_status_unauthorized();
    }

    #[tokio::test]
    async fn user_info_returns_logged_in_user() {
        let server = get_test_server(get_test_app_state());
        let cookie = log_in(&server).await;

        let response = server.get(endpoints::USER_INFO).add_cookie(cookie).await;

        response.assert_status_ok();
        response.assert_json(&json!({
            "id": 1,
            "username": TEST_USERNAME,
            "user_type": "admin"
        }));
    }

    #[tokio::test]
    async fn admin_can_list_users() {
        let state = get_test_app_state();
        create_standard_user(&state, "bob");
        let server = get_test_server(state);
        let cookie = log_in(&server).await;

        let response = server.get(endpoints::USERS).add_cookie(cookie).await;

        response.assert_status_ok();
        response.assert_json(&json!([
            {"id": 1, "username": TEST_USERNAME, "user_type": "admin"},
            {"id": 2, "username": "bob", "user_type": "standard"}
        ]));
    }
}
