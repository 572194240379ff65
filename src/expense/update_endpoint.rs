//! Defines the endpoint for updating an existing expense.
use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};

use crate::{
    database_id::ExpenseId,
    expense::{ExpenseData, core::update_expense},
    state::ExpenseState,
};

/// A route handler for updating an expense, responds with the updated record.
///
/// Fields omitted from the request body keep their stored values, except
/// `amount` and `category` which are mandatory on every update.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn update_expense_endpoint(
    State(state): State<ExpenseState>,
    Path(expense_id): Path<ExpenseId>,
    Json(data): Json<ExpenseData>,
) -> Response {
    let connection = state.db_connection.lock().unwrap();

    match update_expense(expense_id, data, &connection) {
        Ok(expense) => Json(expense).into_response(),
        Err(error) => error.into_response(),
    }
}
