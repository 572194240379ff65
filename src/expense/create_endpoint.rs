//! Defines the endpoint for creating a new expense.
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    expense::{ExpenseData, core::create_expense},
    state::ExpenseState,
};

/// A route handler for creating a new expense, responds with the persisted
/// record including its assigned ID.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn create_expense_endpoint(
    State(state): State<ExpenseState>,
    Json(data): Json<ExpenseData>,
) -> Response {
    let connection = state.db_connection.lock().unwrap();

    match create_expense(data, &connection) {
        Ok(expense) => (StatusCode::CREATED, Json(expense)).into_response(),
        Err(error) => error.into_response(),
    }
}
