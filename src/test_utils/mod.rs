#![allow(missing_docs)]

use axum_extra::extract::cookie::Cookie;
use axum_test::TestServer;
use rusqlite::Connection;
use serde_json::json;

use crate::{
    AppState, PasswordHash, ValidatedPassword,
    auth::{COOKIE_TOKEN, User, UserID, UserType, create_user},
    build_router,
    db::initialize,
    endpoints,
};

pub(crate) const TEST_USERNAME: &str = "test";
pub(crate) const TEST_PASSWORD: &str = "test";
/// The ID of the user created by [get_test_app_state].
pub(crate) const TEST_USER_ID: UserID = UserID::new(1);

pub(crate) fn get_test_connection() -> Connection {
    let connection = Connection::open_in_memory().unwrap();
    initialize(&connection).unwrap();
    connection
}

/// Insert a user with [TEST_PASSWORD] hashed at the cheapest bcrypt cost.
pub(crate) fn insert_test_user(
    username: &str,
    user_type: UserType,
    connection: &Connection,
) -> User {
    let password_hash =
        PasswordHash::new(ValidatedPassword::new_unchecked(TEST_PASSWORD), 4).unwrap();

    create_user(username, password_hash, user_type, connection).unwrap()
}

/// App state backed by an in-memory database that holds one admin user, [TEST_USERNAME].
pub(crate) fn get_test_app_state() -> AppState {
    let state = AppState::new(Connection::open_in_memory().unwrap(), "foobar", "Etc/UTC")
        .unwrap()
        .with_password_hash_cost(4);

    {
        let connection = state.db_connection.lock().unwrap();
        let user = insert_test_user(TEST_USERNAME, UserType::Admin, &connection);
        assert_eq!(user.id, TEST_USER_ID);
    }

    state
}

pub(crate) fn create_standard_user(state: &AppState, username: &str) -> User {
    let connection = state.db_connection.lock().unwrap();
    insert_test_user(username, UserType::Standard, &connection)
}

pub(crate) fn get_test_server(state: AppState) -> TestServer {
    TestServer::new(build_router(state))
}

/// Log in as [TEST_USERNAME] and return the auth cookie.
pub(crate) async fn log_in(server: &TestServer) -> Cookie<'static> {
    log_in_as(server, TEST_USERNAME).await
}

pub(crate) async fn log_in_as(server: &TestServer, username: &str) -> Cookie<'static> {
    let response = server
        .post(endpoints::LOG_IN)
        .json(&json!({"username": username, "password": TEST_PASSWORD}))
        .await;

    response.assert_status_ok();
    response.cookie(COOKIE_TOKEN)
}
