//! Implements a struct that holds the state of the server.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{Error, db::initialize};

/// The default number of months shown in the dashboard history.
pub const DEFAULT_HISTORY_MONTHS: usize = 6;

/// Settings that control what the dashboard shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardConfig {
    /// How many months, including the selected one, the income/expense history covers.
    pub history_months: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            history_months: DEFAULT_HISTORY_MONTHS,
        }
    }
}

/// The state of the server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The local timezone as a canonical timezone name, e.g. "America/Sao_Paulo".
    pub local_timezone: String,

    /// Settings for the dashboard page.
    pub dashboard_config: DashboardConfig,

    /// The database connection
    pub db_connection: Arc<Mutex<Connection>>,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for the domain models.
    /// `local_timezone` should be a valid, canonical timezone name, e.g. "America/Sao_Paulo".
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(
        db_connection: Connection,
        local_timezone: &str,
        dashboard_config: DashboardConfig,
    ) -> Result<Self, Error> {
        initialize(&db_connection)?;

        Ok(Self {
            local_timezone: local_timezone.to_owned(),
            dashboard_config,
            db_connection: Arc::new(Mutex::new(db_connection)),
        })
    }
}
