//! Expense management for the expense-tracking API.
//!
//! This module contains everything related to expenses:
//! - The `Expense` model and the `ExpenseData` request payload
//! - Database functions for storing, querying and deleting expenses
//! - The JSON endpoint handlers for the expense resource

pub mod core;
mod create_endpoint;
mod delete_endpoint;
mod list_endpoint;
mod update_endpoint;

pub use self::core::{Expense, ExpenseData, create_expense_table, map_expense_row};
pub use create_endpoint::create_expense_endpoint;
pub use delete_endpoint::delete_expense_endpoint;
pub use list_endpoint::list_expenses_endpoint;
pub use update_endpoint::update_expense_endpoint;

pub(crate) use self::core::list_expenses;
