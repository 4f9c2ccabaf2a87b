//! Creates the database schema.

use rusqlite::Connection;

use crate::{
    Error, account::create_account_table, recurrence::create_recurrence_rule_table,
    transaction::create_transaction_table,
};

/// Create all of the database tables for the application.
///
/// Foreign key constraints are enabled on `connection`.
///
/// # Errors
/// This function may return an [Error::SqlError] if a SQL related error occurred.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    connection.pragma_update(None, "foreign_keys", true)?;

    let transaction = connection.unchecked_transaction()?;

    create_account_table(&transaction)?;
    create_transaction_table(&transaction)?;
    create_recurrence_rule_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use super::initialize;

    #[test]
    fn initialize_is_idempotent() {
        let connection = Connection::open_in_memory().unwrap();

        assert_eq!(initialize(&connection), Ok(()));
        assert_eq!(initialize(&connection), Ok(()));
    }

    #[test]
    fn enables_foreign_keys() {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        let enabled: bool = connection
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();

        assert!(enabled);
    }
}
