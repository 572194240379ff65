//! Application router configuration.

use axum::{
    Router,
    routing::{get, put},
};
use tower_http::cors::CorsLayer;

use crate::{
    endpoints,
    expense::{
        create_expense_endpoint, delete_expense_endpoint, list_expenses_endpoint,
        update_expense_endpoint,
    },
    state::AppState,
    summary::get_ai_summary_endpoint,
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            endpoints::EXPENSES,
            get(list_expenses_endpoint).post(create_expense_endpoint),
        )
        .route(endpoints::EXPENSE_SUMMARY, get(get_ai_summary_endpoint))
        .route(
            endpoints::EXPENSE,
            put(update_expense_endpoint).delete(delete_expense_endpoint),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}
