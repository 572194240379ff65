//! Defines the core data model and database queries for expenses.

use rusqlite::{Connection, Row, types::Type};
use serde::{Deserialize, Deserializer, Serialize};
use time::OffsetDateTime;

use crate::{
    Error,
    database_id::ExpenseId,
    timestamp::{from_sql_text, parse_timestamp, to_sql_text},
};

// ============================================================================
// MODELS
// ============================================================================

/// A single recorded spending transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// The ID of the expense, assigned by the database on creation.
    pub id: ExpenseId,

    /// The amount of money spent.
    ///
    /// No sign constraint is enforced, so refunds may be recorded as
    /// negative amounts.
    pub amount: f64,

    /// An optional text description of what the money was spent on.
    ///
    /// Serialized as `null` when unset.
    pub description: Option<String>,

    /// A free-form label grouping related expenses, e.g. "food" or "rent".
    pub category: String,

    /// When the expense happened, in UTC.
    ///
    /// Defaults to the creation time when the client does not supply one.
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

/// The request body for creating or updating an expense.
///
/// `amount` and `category` are mandatory on every request but modeled as
/// options so that their absence maps to [Error::MissingRequiredFields]
/// rather than a deserialization rejection. The timestamp arrives as a raw
/// string and is parsed by the repository so that malformed values map to
/// [Error::InvalidTimestamp].
#[derive(Debug, Default, Deserialize)]
pub struct ExpenseData {
    /// The amount of money spent.
    pub amount: Option<f64>,

    /// The label grouping related expenses.
    pub category: Option<String>,

    /// The description. The outer option distinguishes an omitted field
    /// (keep the stored value on update) from an explicit `null` (clear it).
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,

    /// An ISO 8601 timestamp string.
    pub timestamp: Option<String>,
}

/// Deserialize a field so that an omitted key and an explicit `null` can be
/// told apart when combined with `#[serde(default)]`.
fn double_option<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create a new expense in the database.
///
/// The timestamp defaults to the current time (UTC) when absent or empty.
///
/// # Errors
/// This function will return a:
/// - [Error::MissingRequiredFields] if `amount` or `category` is absent,
/// - [Error::InvalidTimestamp] if the timestamp string cannot be parsed as
///   ISO 8601,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_expense(data: ExpenseData, connection: &Connection) -> Result<Expense, Error> {
    let ExpenseData {
        amount,
        category,
        description,
        timestamp,
    } = data;

    let (amount, category) = match (amount, category) {
        (Some(amount), Some(category)) => (amount, category),
        _ => return Err(Error::MissingRequiredFields),
    };

    let timestamp = match timestamp.as_deref() {
        Some(value) if !value.is_empty() => parse_timestamp(value)?,
        _ => OffsetDateTime::now_utc(),
    };

    let expense = connection
        .prepare(
            "INSERT INTO expense (amount, description, category, timestamp)
             VALUES (?1, ?2, ?3, ?4)
             RETURNING id, amount, description, category, timestamp",
        )?
        .query_row(
            (
                amount,
                description.flatten(),
                category,
                to_sql_text(timestamp)?,
            ),
            map_expense_row,
        )?;

    Ok(expense)
}

/// Retrieve all expenses, most recent first.
///
/// Expenses sharing a timestamp are returned in insertion order. An empty
/// database yields an empty vec, never an error.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is a SQL error.
pub fn list_expenses(connection: &Connection) -> Result<Vec<Expense>, Error> {
    connection
        .prepare(
            "SELECT id, amount, description, category, timestamp FROM expense
             ORDER BY timestamp DESC, id ASC",
        )?
        .query_map([], map_expense_row)?
        .map(|maybe_expense| maybe_expense.map_err(Error::from))
        .collect()
}

/// Retrieve an expense from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid expense,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_expense(id: ExpenseId, connection: &Connection) -> Result<Expense, Error> {
    let expense = connection
        .prepare(
            "SELECT id, amount, description, category, timestamp FROM expense WHERE id = :id",
        )?
        .query_one(&[(":id", &id)], map_expense_row)?;

    Ok(expense)
}

/// Update an expense in the database.
///
/// `amount` and `category` are mandatory. An omitted `description` keeps the
/// stored value while an explicit `null` clears it. An omitted or empty
/// `timestamp` keeps the stored value. All fields are applied atomically:
/// the record is either fully updated or left untouched.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid expense,
/// - [Error::MissingRequiredFields] if `amount` or `category` is absent,
/// - [Error::InvalidTimestamp] if the timestamp string cannot be parsed as
///   ISO 8601,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_expense(
    id: ExpenseId,
    data: ExpenseData,
    connection: &Connection,
) -> Result<Expense, Error> {
    // The guard rolls the transaction back unless it is committed, so any
    // early return leaves the record untouched.
    let transaction = connection.unchecked_transaction()?;

    let existing = get_expense(id, &transaction)?;

    let ExpenseData {
        amount,
        category,
        description,
        timestamp,
    } = data;

    let (amount, category) = match (amount, category) {
        (Some(amount), Some(category)) => (amount, category),
        _ => return Err(Error::MissingRequiredFields),
    };

    let description = match description {
        Some(description) => description,
        None => existing.description,
    };

    let timestamp = match timestamp.as_deref() {
        Some(value) if !value.is_empty() => parse_timestamp(value)?,
        _ => existing.timestamp,
    };

    let expense = transaction
        .prepare(
            "UPDATE expense SET amount = ?1, description = ?2, category = ?3, timestamp = ?4
             WHERE id = ?5
             RETURNING id, amount, description, category, timestamp",
        )?
        .query_row(
            (amount, description, category, to_sql_text(timestamp)?, id),
            map_expense_row,
        )?;

    transaction.commit()?;

    Ok(expense)
}

/// Delete an expense from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid expense,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_expense(id: ExpenseId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM expense WHERE id = :id", &[(":id", &id)])?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// Create the expense table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS expense (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                amount REAL NOT NULL,
                description TEXT,
                category TEXT NOT NULL,
                timestamp TEXT NOT NULL
                )",
        (),
    )?;

    // Ensure the sequence starts at 1
    connection.execute(
        "INSERT OR IGNORE INTO sqlite_sequence (name, seq) VALUES ('expense', 0)",
        (),
    )?;

    // Index used by the list endpoint's ordered scan.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_expense_timestamp ON expense(timestamp);",
        (),
    )?;

    Ok(())
}

/// Map a database row to an [Expense].
pub fn map_expense_row(row: &Row) -> Result<Expense, rusqlite::Error> {
    let id = row.get(0)?;
    let amount = row.get(1)?;
    let description = row.get(2)?;
    let category = row.get(3)?;
    let timestamp_text: String = row.get(4)?;

    let timestamp = from_sql_text(&timestamp_text)
        .map_err(|error| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(error)))?;

    Ok(Expense {
        id,
        amount,
        description,
        category,
        timestamp,
    })
}

// ============================================================================
// TESTS
// ============================================================================
