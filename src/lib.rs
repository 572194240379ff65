//! Expenseur is a personal expense-tracking web service.
//!
//! This library provides a JSON REST API for creating, listing, updating and
//! deleting expense records, plus an endpoint that asks an external
//! text-generation service for a natural-language summary of recent spending.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

mod database_id;
mod db;
mod endpoints;
mod expense;
mod routing;
mod state;
mod summary;
mod timestamp;

pub use database_id::{DatabaseId, ExpenseId};
pub use db::initialize as initialize_db;
pub use expense::Expense;
pub use routing::build_router;
pub use state::AppState;
pub use summary::SummaryGenerator;

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
    /// A create or update request did not include both mandatory fields.
    #[error("Missing required fields (amount, category)")]
    MissingRequiredFields,

    /// A timestamp string in a request could not be parsed.
    #[error("Invalid timestamp format. Use ISO 8601.")]
    InvalidTimestamp,

    /// A timestamp could not be formatted for storage.
    ///
    /// This should never happen for a valid date-time and indicates a bug or
    /// an unrepresentable value.
    #[error("could not format timestamp: {0}")]
    TimestampFormat(String),

    /// The requested expense was not found.
    ///
    /// For HTTP request handlers, the client should check that the ID is
    /// correct and that the expense has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("Expense not found")]
    NotFound,

    /// The summary generator was never configured with a credential for the
    /// external text-generation service.
    #[error("The AI summary service is not configured")]
    SummaryUnavailable,

    /// The external text-generation service failed or returned a response
    /// that could not be understood.
    #[error("AI summary generation failed: {0}")]
    SummaryFailed(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
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

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match self {
            Error::MissingRequiredFields | Error::InvalidTimestamp => StatusCode::BAD_REQUEST,
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::SummaryUnavailable
            | Error::SummaryFailed(_)
            | Error::TimestampFormat(_)
            | Error::SqlError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("request failed: {self}");
        }

        let body = Json(json!({
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod error_tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use crate::Error;

    fn status_of(error: Error) -> StatusCode {
        error.into_response().status()
    }

    #[test]
    fn validation_errors_map_to_bad_request() {
        assert_eq!(
            status_of(Error::MissingRequiredFields),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status_of(Error::InvalidTimestamp), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn not_found_maps_to_404() {
        assert_eq!(status_of(Error::NotFound), StatusCode::NOT_FOUND);
    }

    #[test]
    fn summary_errors_map_to_internal_server_error() {
        assert_eq!(
            status_of(Error::SummaryUnavailable),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_of(Error::SummaryFailed("timed out".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
