//! Spend Log is a REST API for tracking personal finances.
//!
//! Users register with an email and password, record income and expense
//! transactions, set per-category monthly budgets, track a savings goal, and
//! read aggregated statistics. Every response is a JSON envelope of the shape
//! `{ "success": bool, "data": ..., "message": ... }`.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

use crate::response::ApiFailure;

mod auth;
mod budget;
mod calendar;
mod db;
mod endpoints;
mod pagination;
mod password;
mod response;
mod routing;
mod savings_goal;
mod state;
mod stats;
mod transaction;
mod user;

pub use db::initialize;
pub use pagination::PaginationConfig;
pub use password::{PasswordHash, ValidatedPassword};
pub use routing::build_router;
pub use state::AppState;
pub use user::{User, UserID};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
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
    /// The user provided an email and password combination that does not
    /// match a registered user.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The user provided a password that is too easy to guess.
    #[error("password is too weak: {0}")]
    TooWeak(String),

    /// An unexpected error occurred in the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    /// When communicating with the application client this error should be
    /// replaced with a general error type indicating an internal server error.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// The email used to register already belongs to another account.
    #[error("a user already exists with this email")]
    DuplicateEmail,

    /// A transaction amount that was zero or negative.
    ///
    /// The transaction type records whether money came in or went out, so
    /// amounts are always positive.
    #[error("amount must be greater than zero")]
    NonPositiveAmount,

    /// An empty string was used for a transaction or budget category.
    #[error("category cannot be empty")]
    EmptyCategory,

    /// A transaction description longer than 200 characters.
    #[error("description cannot be more than 200 characters")]
    DescriptionTooLong,

    /// A month outside the range 1-12.
    #[error("{0} is not a valid month, expected a number between 1 and 12")]
    InvalidMonth(u8),

    /// A budget year outside the supported range.
    #[error("{0} is outside the supported year range 2020-2030")]
    YearOutOfRange(i32),

    /// A negative budget amount.
    #[error("budget amount cannot be negative")]
    NegativeBudgetAmount,

    /// A savings goal amount that was zero or negative.
    #[error("goal amount must be greater than zero")]
    NonPositiveGoalAmount,

    /// An empty string was used for a savings goal name.
    #[error("goal name cannot be empty")]
    EmptyGoalName,

    /// A savings goal name longer than 100 characters.
    #[error("goal name cannot be more than 100 characters")]
    GoalNameTooLong,

    /// A savings goal description longer than 500 characters.
    #[error("goal description cannot be more than 500 characters")]
    GoalDescriptionTooLong,

    /// A savings goal target date earlier than today.
    #[error("target date must be today or in the future")]
    TargetDateInPast,

    /// An export format other than `csv` or `json`.
    #[error("{0:?} is not a supported export format, expected \"csv\" or \"json\"")]
    InvalidExportFormat(String),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// A bearer token could not be created for a user.
    #[error("token creation error")]
    TokenCreation,

    /// Could not acquire the database lock.
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An error occurred while serializing a struct as JSON.
    #[error("could not serialize as JSON: {0}")]
    JSONSerializationError(String),

    /// An error occurred while writing CSV data.
    #[error("could not write CSV data: {0}")]
    CSVError(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.ends_with("user.email") =>
            {
                Error::DuplicateEmail
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Error::JSONSerializationError(value.to_string())
    }
}

impl Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::TooWeak(_)
            | Error::DuplicateEmail
            | Error::NonPositiveAmount
            | Error::EmptyCategory
            | Error::DescriptionTooLong
            | Error::InvalidMonth(_)
            | Error::YearOutOfRange(_)
            | Error::NegativeBudgetAmount
            | Error::NonPositiveGoalAmount
            | Error::EmptyGoalName
            | Error::GoalNameTooLong
            | Error::GoalDescriptionTooLong
            | Error::TargetDateInPast
            | Error::InvalidExportFormat(_) => StatusCode::BAD_REQUEST,
            Error::HashingError(_)
            | Error::TokenCreation
            | Error::DatabaseLockError
            | Error::JSONSerializationError(_)
            | Error::CSVError(_)
            | Error::SqlError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Server side details stay in the logs, the client only gets a
        // generic message for 5xx responses.
        let message = if status.is_server_error() {
            tracing::error!("An unexpected error occurred: {}", self);
            "Internal server error".to_owned()
        } else {
            self.to_string()
        };

        (status, Json(ApiFailure::new(message))).into_response()
    }
}
