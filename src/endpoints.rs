//! The API endpoint URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/v1/expenses/{expense_id}',
//! use [format_endpoint].

/// The route to create or list expenses.
pub const EXPENSES: &str = "/api/v1/expenses";
/// The route to update or delete a single expense.
pub const EXPENSE: &str = "/api/v1/expenses/{expense_id}";
/// The route to request an AI-generated summary of recent spending.
pub const EXPENSE_SUMMARY: &str = "/api/v1/expenses/summary-ai";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/api/v1/expenses/{expense_id}',
/// '{expense_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let mut param_start = None;
    let mut param_end = None;

    for (i, c) in endpoint_path.chars().enumerate() {
        if c == '{' {
            param_start = Some(i);
        } else if param_start.is_some() && c == '}' {
            param_end = Some(i + 1);
            break;
        }
    }

    let param_start = match param_start {
        Some(start) => start,
        None => return endpoint_path.to_string(),
    };

    let param_end = param_end.unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
