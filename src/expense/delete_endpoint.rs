//! Defines the endpoint for deleting an expense.
use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::{
    database_id::ExpenseId,
    expense::core::delete_expense,
    state::ExpenseState,
};

/// A route handler for deleting an expense, responds with a confirmation
/// message.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn delete_expense_endpoint(
    State(state): State<ExpenseState>,
    Path(expense_id): Path<ExpenseId>,
) -> Response {
    let connection = state.db_connection.lock().unwrap();

    match delete_expense(expense_id, &connection) {
        Ok(()) => Json(json!({ "message": "Expense deleted successfully" })).into_response(),
        Err(error) => error.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Path, State},
        http::StatusCode,
    };
    use rusqlite::Connection;

    use crate::{
        db::initialize,
        expense::{ExpenseData, core::create_expense},
        state::ExpenseState,
    };

    use super::delete_expense_endpoint;

    fn get_test_state() -> ExpenseState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        ExpenseState {
            db_connection: Arc::new(Mutex::new(conn)),
        }
    }

    #[tokio::test]
    async fn responds_with_ok_on_success() {
        let state = get_test_state();
        let expense = {
            let connection = state.db_connection.lock().unwrap();
            create_expense(
                ExpenseData {
                    amount: Some(1.0),
                    category: Some("food".to_string()),
                    ..Default::default()
                },
                &connection,
            )
            .unwrap()
        };

        let response = delete_expense_endpoint(State(state), Path(expense.id)).await;

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn responds_with_not_found_for_unknown_id() {
        let state = get_test_state();

        let response = delete_expense_endpoint(State(state), Path(999)).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
