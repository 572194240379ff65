//! Implements the structs that hold the state of the REST server.

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::Connection;

use crate::{Error, db::initialize, summary::SummaryGenerator};

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The database connection.
    pub db_connection: Arc<Mutex<Connection>>,

    /// The generator for AI spending summaries, constructed once at startup.
    pub summary_generator: SummaryGenerator,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for the domain models.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(
        db_connection: Connection,
        summary_generator: SummaryGenerator,
    ) -> Result<Self, Error> {
        initialize(&db_connection)?;

        Ok(Self {
            db_connection: Arc::new(Mutex::new(db_connection)),
            summary_generator,
        })
    }
}

/// The state needed to create, list, update or delete expenses.
#[derive(Debug, Clone)]
pub struct ExpenseState {
    /// The database connection for managing expenses.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The state needed to produce an AI spending summary.
#[derive(Debug, Clone)]
pub struct SummaryState {
    /// The database connection for reading the expense list.
    pub db_connection: Arc<Mutex<Connection>>,

    /// The generator that talks to the external text-generation service.
    pub summary_generator: SummaryGenerator,
}

impl FromRef<AppState> for SummaryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            summary_generator: state.summary_generator.clone(),
        }
    }
}
