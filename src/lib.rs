//! Cashbook is a JSON API for tracking personal expenses.
//!
//! Transactions are grouped into a closed set of categories, either by hand or
//! by substring rules, and summarised per month for charting.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use time::Date;
use tokio::signal;

mod app_state;
mod auth;
mod category;
mod database_id;
mod db;
mod endpoints;
mod enrollment;
mod logging;
mod period;
mod routing;
mod rule;
mod settings;
mod summary;
mod timezone;
mod transaction;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use auth::{
    PasswordHash, User, UserID, UserType, ValidatedPassword, create_user, get_user_by_username,
    update_password,
};
pub use category::{Category, CategoryMetadata};
pub use db::initialize as initialize_db;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;
pub use rule::{Rule, matches_rule, rule_for_name};
pub use summary::{CategoryTotal, MonthlyTotals, PeriodTotals, SummaryRow, monthly_totals, summarize};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(error) => {
                tracing::error!("failed to install terminate signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The password did not match the stored password hash.
    #[error("incorrect password")]
    InvalidCredentials,

    /// The request did not carry a valid auth cookie.
    #[error("you must be logged in to access this resource")]
    Unauthorized,

    /// The user is logged in but is not an administrator.
    #[error("you must be an administrator to access this resource")]
    NotAdmin,

    /// The user provided a password that is too easy to guess.
    #[error("password is too weak: {0}")]
    TooWeak(String),

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// An empty string was used as a username.
    #[error("username cannot be empty")]
    EmptyUsername,

    /// The username is already taken by another user.
    #[error("the username \"{0}\" is already taken")]
    DuplicateUsername(String),

    /// New users cannot register because registration has been disabled by an admin.
    #[error("registration is disabled")]
    RegistrationDisabled,

    /// An empty string was used as a transaction name.
    #[error("transaction name cannot be empty")]
    EmptyTransactionName,

    /// A date in the future was used for a transaction.
    ///
    /// Transactions record events that have already happened, therefore future
    /// dates are not allowed.
    #[error("{0} is a date in the future, which is not allowed")]
    FutureDate(Date),

    /// A transaction amount of zero was given.
    #[error("amount cannot be zero")]
    ZeroAmount,

    /// The amount string could not be parsed as a number.
    #[error("\"{0}\" is not a valid amount")]
    InvalidAmount(String),

    /// The month and year in a query do not form a valid calendar month.
    #[error("invalid period: {0}")]
    InvalidPeriod(String),

    /// A category string did not match any known category.
    #[error("unknown category \"{0}\"")]
    UnknownCategory(String),

    /// An empty string was used as a rule substring.
    #[error("Substring cannot be empty")]
    EmptyRuleSubstring,

    /// A rule with the same substring and category already exists for the user.
    #[error("a rule for \"{0}\" with the same category already exists")]
    DuplicateRule(String),

    /// Transactions synced from a linked account cannot be deleted.
    #[error("only transactions created by hand can be deleted")]
    DeleteSyncedTransaction,

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// Tried to update a transaction that does not exist
    #[error("tried to update a transaction that is not in the database")]
    UpdateMissingTransaction,

    /// Tried to delete a transaction that does not exist
    #[error("tried to delete a transaction that is not in the database")]
    DeleteMissingTransaction,

    /// Tried to delete a rule that does not exist
    #[error("tried to delete a rule that is not in the database")]
    DeleteMissingRule,

    /// Tried to update an enrollment that does not exist
    #[error("tried to update an enrollment that is not in the database")]
    UpdateMissingEnrollment,

    /// Tried to delete an enrollment that does not exist
    #[error("tried to delete an enrollment that is not in the database")]
    DeleteMissingEnrollment,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// An error occurred while serializing or deserializing JSON.
    #[error("could not serialize as JSON: {0}")]
    JSONSerializationError(String),

    /// An error occurred while writing CSV data.
    #[error("could not write CSV: {0}")]
    CsvError(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::Unauthorized | Error::NotAdmin => StatusCode::UNAUTHORIZED,
            Error::InvalidCredentials | Error::RegistrationDisabled => StatusCode::FORBIDDEN,
            Error::TooWeak(_)
            | Error::EmptyUsername
            | Error::EmptyTransactionName
            | Error::FutureDate(_)
            | Error::ZeroAmount
            | Error::InvalidAmount(_)
            | Error::InvalidPeriod(_)
            | Error::UnknownCategory(_)
            | Error::EmptyRuleSubstring
            | Error::DeleteSyncedTransaction => StatusCode::BAD_REQUEST,
            Error::DuplicateUsername(_) | Error::DuplicateRule(_) => StatusCode::CONFLICT,
            Error::NotFound
            | Error::UpdateMissingTransaction
            | Error::DeleteMissingTransaction
            | Error::DeleteMissingRule
            | Error::UpdateMissingEnrollment
            | Error::DeleteMissingEnrollment => StatusCode::NOT_FOUND,
            Error::HashingError(_)
            | Error::SqlError(_)
            | Error::DatabaseLockError
            | Error::InvalidTimezoneError(_)
            | Error::JSONSerializationError(_)
            | Error::CsvError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        // Internal errors are not intended to be shown to the client.
        let message = if status_code == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("An unexpected error occurred: {}", self);
            "Something went wrong".to_owned()
        } else {
            self.to_string()
        };

        (status_code, Json(json!({ "error": message }))).into_response()
    }
}
