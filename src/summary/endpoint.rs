//! Defines the endpoint for requesting an AI-generated spending summary.
use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::{expense::list_expenses, state::SummaryState};

/// A route handler for generating a natural-language summary of recent
/// spending.
///
/// The expense list is read inside the database lock, which is released
/// before the external service is contacted. A missing credential or a
/// failure of the external service responds with a 500 and a descriptive
/// error, never a degraded success.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn get_ai_summary_endpoint(State(state): State<SummaryState>) -> Response {
    let expenses = {
        let connection = state.db_connection.lock().unwrap();

        match list_expenses(&connection) {
            Ok(expenses) => expenses,
            Err(error) => return error.into_response(),
        }
    };

    match state.summary_generator.summarize(&expenses).await {
        Ok(summary) => Json(json!({ "summary": summary })).into_response(),
        Err(error) => error.into_response(),
    }
}
