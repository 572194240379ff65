//! Defines the endpoint for listing all expenses.
use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};

use crate::{expense::core::list_expenses, state::ExpenseState};

/// A route handler for listing all expenses, most recent first.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn list_expenses_endpoint(State(state): State<ExpenseState>) -> Response {
    let connection = state.db_connection.lock().unwrap();

    match list_expenses(&connection) {
        Ok(expenses) => Json(expenses).into_response(),
        Err(error) => error.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{extract::State, http::StatusCode};
    use rusqlite::Connection;

    use crate::{db::initialize, state::ExpenseState};

    use super::list_expenses_endpoint;

    #[tokio::test]
    async fn responds_with_ok_for_empty_database() {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        let state = ExpenseState {
            db_connection: Arc::new(Mutex::new(conn)),
        };

        let response = list_expenses_endpoint(State(state)).await;

        assert_eq!(response.status(), StatusCode::OK);
    }
}
