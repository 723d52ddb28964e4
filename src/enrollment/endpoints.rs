//! The endpoints for linking and unlinking banks.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, Path, State},
    http::StatusCode,
};
use rusqlite::Connection;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
    AppState, Error,
    auth::UserID,
    database_id::EnrollmentId,
    enrollment::{
        Enrollment, EnrollmentUpdate, create_enrollment, delete_enrollment, get_enrollments,
        update_enrollment,
    },
};

/// The state needed for the enrollment endpoints.
#[derive(Debug, Clone)]
pub struct EnrollmentState {
    /// The database connection.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EnrollmentState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The details the client receives after linking a bank.
#[derive(Debug, Deserialize)]
pub struct EnrollmentForm {
    /// The token for fetching the linked accounts. Never sent back to the client.
    pub access_token: String,
    /// The display name of the linked bank.
    pub institution: String,
}

/// List the logged in user's linked banks.
pub async fn get_enrollments_endpoint(
    State(state): State<EnrollmentState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<Value>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let enrollments = get_enrollments(user_id, &connection)?;

    Ok(Json(json!({ "enrollments": enrollments })))
}

/// Store a newly linked bank.
pub async fn create_enrollment_endpoint(
    State(state): State<EnrollmentState>,
    Extension(user_id): Extension<UserID>,
    Json(form): Json<EnrollmentForm>,
) -> Result<(StatusCode, Json<Enrollment>), Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let enrollment =
        create_enrollment(user_id, &form.institution, &form.access_token, &connection)?;
    tracing::info!("User {user_id} linked {}", enrollment.institution);

    Ok((StatusCode::CREATED, Json(enrollment)))
}

/// Rename an enrollment or mark it as disconnected.
pub async fn update_enrollment_endpoint(
    State(state): State<EnrollmentState>,
    Extension(user_id): Extension<UserID>,
    Path(enrollment_id): Path<EnrollmentId>,
    Json(update): Json<EnrollmentUpdate>,
) -> Result<Json<Enrollment>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let enrollment = update_enrollment(enrollment_id, user_id, &update, &connection)?;

    Ok(Json(enrollment))
}

/// Unlink a bank. The transactions synced from it are kept.
pub async fn delete_enrollment_endpoint(
    State(state): State<EnrollmentState>,
    Extension(user_id): Extension<UserID>,
    Path(enrollment_id): Path<EnrollmentId>,
) -> Result<StatusCode, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    delete_enrollment(enrollment_id, user_id, &connection)
        .inspect_err(|error| tracing::debug!("Could not delete enrollment {enrollment_id}: {error}"))?;

    Ok(StatusCode::OK)
}
